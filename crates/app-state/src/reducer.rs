//! Pure session reducer
//!
//! The reducer applies one [`SessionEvent`] to a [`SessionState`] and
//! returns the next state. It performs no I/O and takes no locks; the
//! effect layer in `app-core` issues the platform calls and feeds their
//! completions back through here.

use mapping_client::{Place, PlatformError, Route};

use crate::session::{CameraTarget, FetchOutcome, MarkerPolicy, SessionConfig, SessionState};
use crate::token::RequestToken;

/// One step of the session state machine.
#[derive(Debug, Clone)]
pub enum SessionEvent {
    /// The search field text changed
    SearchTextChanged(String),

    /// A search request was issued
    SearchStarted {
        /// Token of the issued request
        token: RequestToken,
    },

    /// A search request resolved
    SearchCompleted {
        /// Token of the resolving request
        token: RequestToken,
        /// The platform's answer
        outcome: Result<Vec<Place>, PlatformError>,
    },

    /// A place was selected on the map, or deselected with `None`
    PlaceSelected(Option<Place>),

    /// The details sheet was dismissed without deselecting
    DetailsDismissed,

    /// A route request was issued
    DirectionsStarted {
        /// Token of the issued request
        token: RequestToken,
    },

    /// A route request resolved
    DirectionsCompleted {
        /// Token of the resolving request
        token: RequestToken,
        /// The place that was selected when the request was issued
        destination: Place,
        /// The platform's answer
        outcome: Result<Route, PlatformError>,
    },
}

/// Apply `event` to `state`, returning the next state.
///
/// Completions carrying a token older than the newest issued one are
/// discarded wholesale: the state they would have written is stale.
pub fn reduce(config: &SessionConfig, mut state: SessionState, event: SessionEvent) -> SessionState {
    match event {
        SessionEvent::SearchTextChanged(text) => {
            state.search_text = text;
        }

        SessionEvent::SearchStarted { token } => {
            if state.latest_search_token.is_none_or(|newest| token > newest) {
                state.latest_search_token = Some(token);
            }
        }

        SessionEvent::SearchCompleted { token, outcome } => {
            if state.latest_search_token != Some(token) {
                tracing::debug!(?token, "discarding stale search completion");
                return state;
            }
            match outcome {
                Ok(places) => {
                    state.results = places;
                    state.search_outcome = Some(FetchOutcome::Success);
                }
                Err(err) => {
                    tracing::warn!(error = %err, "search failed, clearing results");
                    state.results.clear();
                    state.search_outcome = Some(FetchOutcome::Failed);
                }
            }
        }

        SessionEvent::PlaceSelected(place) => {
            state.details_visible = place.is_some();
            state.selected_place = place;
        }

        SessionEvent::DetailsDismissed => {
            state.details_visible = false;
        }

        SessionEvent::DirectionsStarted { token } => {
            if state.latest_route_token.is_none_or(|newest| token > newest) {
                state.latest_route_token = Some(token);
            }
        }

        SessionEvent::DirectionsCompleted {
            token,
            destination,
            outcome,
        } => {
            if state.latest_route_token != Some(token) {
                tracing::debug!(?token, "discarding stale route completion");
                return state;
            }
            match outcome {
                Ok(route) => {
                    if config.marker_policy == MarkerPolicy::ResetOnFetch {
                        state.path_markers.clear();
                        state.path_markers.push(config.home);
                    }
                    for step in &route.steps {
                        if let Some(coordinate) = step.polyline.representative() {
                            state.path_markers.push(coordinate);
                        }
                    }
                    if let Some(rect) = route.bounding_rect() {
                        state.camera = CameraTarget::Rect {
                            rect,
                            animated: true,
                        };
                    }
                    state.active_route = Some(route);
                    state.route_outcome = Some(FetchOutcome::Success);
                }
                Err(err) => {
                    // The screen still flips to route-displayed mode on
                    // failure; only the outcome field records the truth.
                    tracing::warn!(error = %err, "route fetch failed");
                    state.active_route = None;
                    state.route_outcome = Some(FetchOutcome::Failed);
                }
            }
            state.route_destination = Some(destination);
            state.route_displayed = true;
            state.details_visible = false;
        }
    }
    state
}
