//! Mapping platform collaborator contract
//!
//! The session layer delegates all heavy lifting (search ranking, route
//! calculation, polyline geometry) to an external mapping platform behind
//! this trait. `MappingHttpClient` is the production implementation;
//! tests substitute the scripted platforms in [`crate::test_utils`].

use async_trait::async_trait;
use thiserror::Error;

use crate::types::{Coordinate, Place, Region, Route};

/// Failures originating from the mapping platform.
///
/// The taxonomy is deliberately narrow: the session layer only needs to
/// know which operation failed. The detail string is carried for logging.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PlatformError {
    /// Place search could not be completed
    #[error("search failed: {0}")]
    SearchFailed(String),

    /// Route calculation could not be completed
    #[error("route failed: {0}")]
    RouteFailed(String),
}

/// Result type for platform operations
pub type Result<T> = std::result::Result<T, PlatformError>;

/// External mapping platform: place search and routing.
#[async_trait]
pub trait MappingPlatform: Send + Sync {
    /// Search for places matching `query` within `region`.
    ///
    /// The result order is the platform's ranking; callers must not
    /// re-sort it. An empty query is permitted and yields whatever the
    /// platform returns for one.
    async fn search(&self, query: &str, region: Region) -> Result<Vec<Place>>;

    /// Compute a route from `origin` to `destination`.
    ///
    /// A route with zero steps is a valid result, distinct from an error.
    async fn route(&self, origin: Coordinate, destination: &Place) -> Result<Route>;
}
