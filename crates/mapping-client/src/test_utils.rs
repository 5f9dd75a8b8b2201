//! Test utilities and fixtures for mapping platform testing
//!
//! This module provides fixture coordinates, places, and routes, plus
//! scripted in-memory platforms used by the session-layer tests.

#![allow(dead_code)] // Test utilities may not all be used yet

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use tokio::sync::Notify;

use crate::platform::{MappingPlatform, PlatformError, Result};
use crate::types::{Coordinate, Place, Polyline, Region, Route, RouteStep};

/// Fixture coordinates around central Jakarta
pub mod coords {
    use super::*;

    /// The session's fixed home location
    pub fn home() -> Coordinate {
        Coordinate::new(-6.195125, 106.822832)
    }

    /// National Monument
    pub fn monas() -> Coordinate {
        Coordinate::new(-6.1754, 106.8272)
    }

    /// Old Town square
    pub fn kota_tua() -> Coordinate {
        Coordinate::new(-6.1352, 106.8133)
    }

    /// Senayan sports complex
    pub fn senayan() -> Coordinate {
        Coordinate::new(-6.2185, 106.8023)
    }
}

/// Fixture places for use in tests
pub mod places {
    use super::*;

    /// National Monument
    pub fn monas() -> Place {
        Place {
            name: Some("Monas".to_string()),
            coordinate: coords::monas(),
            address: Some("Gambir, Central Jakarta".to_string()),
            category: Some("landmark".to_string()),
        }
    }

    /// Old Town square
    pub fn kota_tua() -> Place {
        Place {
            name: Some("Kota Tua".to_string()),
            coordinate: coords::kota_tua(),
            address: Some("Pinangsia, West Jakarta".to_string()),
            category: Some("historic".to_string()),
        }
    }

    /// Senayan sports complex
    pub fn senayan() -> Place {
        Place::new("Gelora Bung Karno", coords::senayan())
    }

    /// An unnamed place, as the platform sometimes returns
    pub fn unnamed() -> Place {
        Place {
            name: None,
            coordinate: Coordinate::new(-6.19, 106.83),
            address: None,
            category: None,
        }
    }
}

/// Fixture routes for use in tests
pub mod routes {
    use super::*;

    fn step(instructions: &str, points: Vec<Coordinate>, distance_meters: f64) -> RouteStep {
        RouteStep {
            instructions: instructions.to_string(),
            polyline: Polyline::new(points),
            distance_meters,
        }
    }

    /// A three-step route from home to Monas
    pub fn to_monas() -> Route {
        let a = coords::home();
        let b = Coordinate::new(-6.1900, 106.8250);
        let c = Coordinate::new(-6.1820, 106.8260);
        let d = coords::monas();

        Route {
            name: Some("Jl. Medan Merdeka".to_string()),
            polyline: Polyline::new(vec![a, b, c, d]),
            steps: vec![
                step("Head north", vec![a, b], 620.0),
                step("Continue onto Jl. Medan Merdeka Selatan", vec![b, c], 910.0),
                step("Arrive at Monas", vec![c, d], 740.0),
            ],
            distance_meters: 2270.0,
            expected_travel_secs: 540.0,
        }
    }

    /// A single-step route
    pub fn short() -> Route {
        let a = coords::home();
        let b = Coordinate::new(-6.1940, 106.8240);

        Route {
            name: None,
            polyline: Polyline::new(vec![a, b]),
            steps: vec![step("Head west", vec![a, b], 150.0)],
            distance_meters: 150.0,
            expected_travel_secs: 40.0,
        }
    }

    /// A route the platform computed but which has no steps
    pub fn empty() -> Route {
        Route {
            name: None,
            polyline: Polyline::default(),
            steps: vec![],
            distance_meters: 0.0,
            expected_travel_secs: 0.0,
        }
    }
}

/// Scripted platform returning canned responses.
///
/// Call counts are recorded so tests can assert that an operation did or
/// did not reach the collaborator.
pub struct StaticPlatform {
    search_response: Result<Vec<Place>>,
    route_response: Result<Route>,
    search_calls: AtomicUsize,
    route_calls: AtomicUsize,
}

impl StaticPlatform {
    /// Platform with empty search results and a failing route
    pub fn new() -> Self {
        Self {
            search_response: Ok(vec![]),
            route_response: Err(PlatformError::RouteFailed("no route staged".to_string())),
            search_calls: AtomicUsize::new(0),
            route_calls: AtomicUsize::new(0),
        }
    }

    /// Stage the search response
    pub fn with_search(mut self, response: Result<Vec<Place>>) -> Self {
        self.search_response = response;
        self
    }

    /// Stage the route response
    pub fn with_route(mut self, response: Result<Route>) -> Self {
        self.route_response = response;
        self
    }

    /// Number of search calls observed
    pub fn search_calls(&self) -> usize {
        self.search_calls.load(Ordering::SeqCst)
    }

    /// Number of route calls observed
    pub fn route_calls(&self) -> usize {
        self.route_calls.load(Ordering::SeqCst)
    }
}

impl Default for StaticPlatform {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl MappingPlatform for StaticPlatform {
    async fn search(&self, _query: &str, _region: Region) -> Result<Vec<Place>> {
        self.search_calls.fetch_add(1, Ordering::SeqCst);
        self.search_response.clone()
    }

    async fn route(&self, _origin: Coordinate, _destination: &Place) -> Result<Route> {
        self.route_calls.fetch_add(1, Ordering::SeqCst);
        self.route_response.clone()
    }
}

/// Platform where every operation fails
pub struct FailingPlatform;

#[async_trait]
impl MappingPlatform for FailingPlatform {
    async fn search(&self, _query: &str, _region: Region) -> Result<Vec<Place>> {
        Err(PlatformError::SearchFailed("service unreachable".to_string()))
    }

    async fn route(&self, _origin: Coordinate, _destination: &Place) -> Result<Route> {
        Err(PlatformError::RouteFailed("service unreachable".to_string()))
    }
}

/// Platform whose responses are held until the test releases them.
///
/// Each call blocks on a gate keyed by the search query (or the
/// destination name for routes), letting tests resolve overlapping
/// requests in a chosen order.
#[derive(Default)]
pub struct GatedPlatform {
    search_responses: Mutex<HashMap<String, Result<Vec<Place>>>>,
    route_responses: Mutex<HashMap<String, Result<Route>>>,
    gates: Mutex<HashMap<String, Arc<Notify>>>,
}

impl GatedPlatform {
    /// Create a platform with nothing staged
    pub fn new() -> Self {
        Self::default()
    }

    /// Stage the response for a search query
    pub fn stage_search(&self, query: impl Into<String>, response: Result<Vec<Place>>) {
        self.search_responses
            .lock()
            .unwrap()
            .insert(query.into(), response);
    }

    /// Stage the response for a route to the named destination
    pub fn stage_route(&self, destination: impl Into<String>, response: Result<Route>) {
        self.route_responses
            .lock()
            .unwrap()
            .insert(destination.into(), response);
    }

    /// Release the in-flight call gated on `key`
    pub fn release(&self, key: &str) {
        self.gate(key).notify_one();
    }

    fn gate(&self, key: &str) -> Arc<Notify> {
        self.gates
            .lock()
            .unwrap()
            .entry(key.to_string())
            .or_default()
            .clone()
    }
}

#[async_trait]
impl MappingPlatform for GatedPlatform {
    async fn search(&self, query: &str, _region: Region) -> Result<Vec<Place>> {
        let gate = self.gate(query);
        gate.notified().await;
        self.search_responses
            .lock()
            .unwrap()
            .get(query)
            .cloned()
            .unwrap_or_else(|| Ok(vec![]))
    }

    async fn route(&self, _origin: Coordinate, destination: &Place) -> Result<Route> {
        let key = destination.name.clone().unwrap_or_default();
        let gate = self.gate(&key);
        gate.notified().await;
        self.route_responses
            .lock()
            .unwrap()
            .get(&key)
            .cloned()
            .unwrap_or_else(|| Err(PlatformError::RouteFailed("no route staged".to_string())))
    }
}
