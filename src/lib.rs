//! MapPath — map screen session layer
//!
//! Facade crate re-exporting the workspace layers: the mapping platform
//! boundary (`mapping-client`), the session state machine (`app-state`),
//! and the session controller (`app-core`).

#![warn(missing_docs)]
#![warn(clippy::all)]

pub use app_core::MapSessionController;
pub use app_state::{
    reduce, CameraTarget, FetchOutcome, MarkerPolicy, RequestToken, SessionConfig, SessionEvent,
    SessionState, TokenSequence,
};
pub use mapping_client::{
    Coordinate, MapRect, MappingClientConfig, MappingHttpClient, MappingPlatform, Place,
    PlatformError, Polyline, Region, Route, RouteStep,
};
