//! Map session state
//!
//! One `SessionState` value holds everything the map screen observes:
//! search text, results, selection, the active route, path markers, and
//! camera framing. It is created on screen activation and discarded on
//! teardown; nothing is persisted.

use mapping_client::{Coordinate, MapRect, Place, Region, Route};
use serde::{Deserialize, Serialize};

use crate::token::RequestToken;

/// How `path_markers` behaves across successive route fetches.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum MarkerPolicy {
    /// Reset to the home seed before appending the new route's markers.
    #[default]
    ResetOnFetch,

    /// Append forever, never clearing: markers accumulate across every
    /// route fetch in the session.
    Accumulate,
}

/// Outcome of the most recent platform call for one operation.
///
/// Lets the host distinguish "no results" from "search failed" and
/// "route computed but empty" from "route failed", even though the
/// default display treats them alike.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FetchOutcome {
    /// The platform call resolved successfully
    Success,
    /// The platform call failed
    Failed,
}

/// Camera framing for the map view.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum CameraTarget {
    /// Frame a region (center plus spans)
    Region {
        /// Region to frame
        region: Region,
        /// Whether the transition is animated
        animated: bool,
    },
    /// Frame a bounding rectangle
    Rect {
        /// Rectangle to frame
        rect: MapRect,
        /// Whether the transition is animated
        animated: bool,
    },
}

/// Fixed per-session configuration.
#[derive(Debug, Clone)]
pub struct SessionConfig {
    /// The user's fixed home coordinate
    pub home: Coordinate,
    /// Span of the home region, meters in both axes
    pub home_span_meters: f64,
    /// Marker accumulation behavior
    pub marker_policy: MarkerPolicy,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            home: Coordinate::new(-6.195125, 106.822832),
            home_span_meters: 10_000.0,
            marker_policy: MarkerPolicy::default(),
        }
    }
}

impl SessionConfig {
    /// Create a config with defaults
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the home coordinate
    pub fn with_home(mut self, home: Coordinate) -> Self {
        self.home = home;
        self
    }

    /// Set the home region span in meters
    pub fn with_home_span_meters(mut self, meters: f64) -> Self {
        self.home_span_meters = meters;
        self
    }

    /// Set the marker accumulation behavior
    pub fn with_marker_policy(mut self, policy: MarkerPolicy) -> Self {
        self.marker_policy = policy;
        self
    }

    /// The region searches are scoped to
    pub fn home_region(&self) -> Region {
        Region::new(self.home, self.home_span_meters, self.home_span_meters)
    }
}

/// All observable state for one map screen activation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionState {
    /// Current contents of the search field
    pub search_text: String,
    /// Search results, in platform order
    pub results: Vec<Place>,
    /// The selected place, if any
    pub selected_place: Option<Place>,
    /// The route currently drawn on the map
    pub active_route: Option<Route>,
    /// Dot markers along the path; the home seed is always first
    pub path_markers: Vec<Coordinate>,
    /// The place that was selected when the active route was fetched
    pub route_destination: Option<Place>,
    /// Whether the screen is in route-displayed mode
    pub route_displayed: bool,
    /// Whether the place details sheet is open
    pub details_visible: bool,
    /// Current camera framing
    pub camera: CameraTarget,
    /// Outcome of the most recent search, `None` before the first
    pub search_outcome: Option<FetchOutcome>,
    /// Outcome of the most recent route fetch, `None` before the first
    pub route_outcome: Option<FetchOutcome>,
    /// Newest issued search token
    pub latest_search_token: Option<RequestToken>,
    /// Newest issued route token
    pub latest_route_token: Option<RequestToken>,
}

impl SessionState {
    /// Initial state for a fresh screen activation: empty search, the
    /// home marker seeded, camera centered on the home region.
    pub fn new(config: &SessionConfig) -> Self {
        Self {
            search_text: String::new(),
            results: Vec::new(),
            selected_place: None,
            active_route: None,
            path_markers: vec![config.home],
            route_destination: None,
            route_displayed: false,
            details_visible: false,
            camera: CameraTarget::Region {
                region: config.home_region(),
                animated: false,
            },
            search_outcome: None,
            route_outcome: None,
            latest_search_token: None,
            latest_route_token: None,
        }
    }

    /// Results that should currently be rendered as markers.
    ///
    /// While a route is displayed, only the route destination is shown;
    /// otherwise every result is.
    pub fn visible_results(&self) -> impl Iterator<Item = &Place> {
        let destination = self.route_destination.as_ref();
        let route_displayed = self.route_displayed;
        self.results.iter().filter(move |place| {
            if route_displayed {
                Some(*place) == destination
            } else {
                true
            }
        })
    }
}
