//! Geographic value types
//!
//! Plain value types shared between the platform boundary and the session
//! layer: coordinates, regions, bounding rectangles, polylines, route
//! steps, routes, and places.

use serde::{Deserialize, Serialize};
use std::hash::{Hash, Hasher};

/// A geographic coordinate in decimal degrees.
///
/// Equality and hashing are defined natively over the exact value pair
/// (bit-pattern comparison on both axes), so coordinates can key hash
/// maps and drive marker identity in the rendering layer.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Coordinate {
    /// Latitude in decimal degrees
    pub latitude: f64,
    /// Longitude in decimal degrees
    pub longitude: f64,
}

impl Coordinate {
    /// Create a new coordinate
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self { latitude, longitude }
    }
}

impl PartialEq for Coordinate {
    fn eq(&self, other: &Self) -> bool {
        self.latitude.to_bits() == other.latitude.to_bits()
            && self.longitude.to_bits() == other.longitude.to_bits()
    }
}

impl Eq for Coordinate {}

impl Hash for Coordinate {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.latitude.to_bits().hash(state);
        self.longitude.to_bits().hash(state);
    }
}

/// A geographic area expressed as a center point plus spans in meters.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Region {
    /// Center of the region
    pub center: Coordinate,
    /// North-south extent in meters
    pub latitudinal_meters: f64,
    /// East-west extent in meters
    pub longitudinal_meters: f64,
}

impl Region {
    /// Create a new region centered at `center`
    pub fn new(center: Coordinate, latitudinal_meters: f64, longitudinal_meters: f64) -> Self {
        Self {
            center,
            latitudinal_meters,
            longitudinal_meters,
        }
    }
}

/// An axis-aligned bounding rectangle in coordinate space.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MapRect {
    /// Southernmost latitude
    pub min_latitude: f64,
    /// Westernmost longitude
    pub min_longitude: f64,
    /// Northernmost latitude
    pub max_latitude: f64,
    /// Easternmost longitude
    pub max_longitude: f64,
}

impl MapRect {
    /// Compute the bounding rectangle of a coordinate sequence.
    ///
    /// Returns `None` for an empty sequence.
    pub fn from_coordinates<I>(coordinates: I) -> Option<Self>
    where
        I: IntoIterator<Item = Coordinate>,
    {
        let mut iter = coordinates.into_iter();
        let first = iter.next()?;
        let mut rect = Self {
            min_latitude: first.latitude,
            min_longitude: first.longitude,
            max_latitude: first.latitude,
            max_longitude: first.longitude,
        };
        for point in iter {
            rect.min_latitude = rect.min_latitude.min(point.latitude);
            rect.min_longitude = rect.min_longitude.min(point.longitude);
            rect.max_latitude = rect.max_latitude.max(point.latitude);
            rect.max_longitude = rect.max_longitude.max(point.longitude);
        }
        Some(rect)
    }

    /// Center point of the rectangle
    pub fn center(&self) -> Coordinate {
        Coordinate::new(
            (self.min_latitude + self.max_latitude) / 2.0,
            (self.min_longitude + self.max_longitude) / 2.0,
        )
    }
}

/// An ordered sequence of coordinates describing path geometry.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Polyline {
    points: Vec<Coordinate>,
}

impl Polyline {
    /// Create a polyline from an ordered point sequence
    pub fn new(points: Vec<Coordinate>) -> Self {
        Self { points }
    }

    /// The ordered points of the polyline
    pub fn points(&self) -> &[Coordinate] {
        &self.points
    }

    /// Whether the polyline has no points
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Representative coordinate of the polyline.
    ///
    /// The midpoint element, mirroring the single-coordinate accessor the
    /// platform exposes on its polyline type. `None` when empty.
    pub fn representative(&self) -> Option<Coordinate> {
        self.points.get(self.points.len() / 2).copied()
    }

    /// Bounding rectangle of the polyline, `None` when empty
    pub fn bounding_rect(&self) -> Option<MapRect> {
        MapRect::from_coordinates(self.points.iter().copied())
    }
}

/// One maneuver of a route, with its path geometry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RouteStep {
    /// Turn-by-turn instructions for this step
    pub instructions: String,
    /// Geometry of the step
    pub polyline: Polyline,
    /// Length of the step in meters
    pub distance_meters: f64,
}

/// A computed path between two points, composed of ordered steps.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Route {
    /// Route name as reported by the platform (e.g. the main road)
    pub name: Option<String>,
    /// Overview geometry of the whole route
    pub polyline: Polyline,
    /// Ordered maneuvers
    pub steps: Vec<RouteStep>,
    /// Total length in meters
    pub distance_meters: f64,
    /// Expected travel time in seconds
    pub expected_travel_secs: f64,
}

impl Route {
    /// Bounding rectangle of the overview polyline, `None` when the
    /// route has no geometry
    pub fn bounding_rect(&self) -> Option<MapRect> {
        self.polyline.bounding_rect()
    }
}

/// A search result representing a point of interest.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Place {
    /// Display name of the place
    pub name: Option<String>,
    /// Location of the place
    pub coordinate: Coordinate,
    /// Postal address, when the platform provides one
    pub address: Option<String>,
    /// Platform category (e.g. "restaurant", "museum")
    pub category: Option<String>,
}

impl Place {
    /// Create a named place at `coordinate`
    pub fn new(name: impl Into<String>, coordinate: Coordinate) -> Self {
        Self {
            name: Some(name.into()),
            coordinate,
            address: None,
            category: None,
        }
    }
}
