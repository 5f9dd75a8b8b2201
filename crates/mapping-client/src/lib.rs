//! Mapping platform client for MapPath
//!
//! This crate defines the boundary to the external mapping platform:
//! the geographic value types, the `MappingPlatform` collaborator trait,
//! and an HTTP-backed implementation of that trait.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod http;
pub mod platform;
pub mod test_utils;
pub mod types;

pub use http::{MappingClientConfig, MappingHttpClient, MappingHttpError, RetryConfig};
pub use platform::{MappingPlatform, PlatformError};
pub use types::{Coordinate, MapRect, Place, Polyline, Region, Route, RouteStep};
