//! HTTP mapping client
//!
//! Production implementation of [`MappingPlatform`] backed by an HTTP
//! mapping service. Provides request configuration, error classification,
//! and retry with capped exponential backoff for transient failures.

use async_trait::async_trait;
use serde::Deserialize;
use std::future::Future;
use std::time::Duration;
use tokio::time::sleep;

use crate::platform::{self, MappingPlatform, PlatformError};
use crate::types::{Coordinate, Place, Region, Route};

// =============================================================================
// Error Types
// =============================================================================

/// Error returned by the HTTP mapping service.
///
/// Wraps both transport failures (status 0) and application-level errors
/// reported by the service.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MappingHttpError {
    /// HTTP status code, 0 for transport failures
    status: u16,
    /// Error code (e.g. "InvalidQuery", "NoRoute")
    error: String,
    /// Human-readable error message
    message: String,
}

impl MappingHttpError {
    /// Create a new error
    pub fn new(status: u16, error: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            status,
            error: error.into(),
            message: message.into(),
        }
    }

    /// Get the HTTP status code
    pub fn status(&self) -> u16 {
        self.status
    }

    /// Get the error code
    pub fn error(&self) -> &str {
        &self.error
    }

    /// Get the error message
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Whether this failure is transient and worth retrying.
    pub fn is_network_error(&self) -> bool {
        matches!(self.status, 0 | 408 | 429 | 500 | 502 | 503 | 504)
    }
}

impl std::fmt::Display for MappingHttpError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "mapping service error {}: {} - {}",
            self.status, self.error, self.message
        )
    }
}

impl std::error::Error for MappingHttpError {}

/// Error response body format used by the mapping service
#[derive(Debug, Clone, Deserialize)]
struct ServiceErrorBody {
    error: String,
    message: String,
}

// =============================================================================
// Configuration
// =============================================================================

/// Configuration for the HTTP mapping client
#[derive(Debug, Clone)]
pub struct MappingClientConfig {
    /// Base service URL
    pub service_url: String,
    /// Request timeout
    pub timeout: Duration,
    /// User agent string
    pub user_agent: String,
    /// Retry policy for transient failures
    pub retry: RetryConfig,
}

impl Default for MappingClientConfig {
    fn default() -> Self {
        Self {
            service_url: "https://maps.mappath.dev".to_string(),
            timeout: Duration::from_secs(30),
            user_agent: format!("MapPath/{}", env!("CARGO_PKG_VERSION")),
            retry: RetryConfig::default(),
        }
    }
}

impl MappingClientConfig {
    /// Create a config pointing at `service_url`
    pub fn new(service_url: impl Into<String>) -> Self {
        Self {
            service_url: service_url.into(),
            ..Default::default()
        }
    }

    /// Set the request timeout
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Set the user agent
    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }

    /// Set the retry policy
    pub fn with_retry(mut self, retry: RetryConfig) -> Self {
        self.retry = retry;
        self
    }
}

// =============================================================================
// Retry
// =============================================================================

/// Retry policy for transient service failures
#[derive(Debug, Clone)]
pub struct RetryConfig {
    /// Maximum number of retries after the initial attempt
    pub max_retries: usize,
    /// Delay before the first retry
    pub initial_delay: Duration,
    /// Upper bound on the delay between retries
    pub max_delay: Duration,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_retries: 2,
            initial_delay: Duration::from_millis(100),
            max_delay: Duration::from_secs(5),
        }
    }
}

impl RetryConfig {
    /// Disable retries
    pub fn none() -> Self {
        Self {
            max_retries: 0,
            ..Default::default()
        }
    }

    /// Delay for a given zero-based retry attempt, doubling up to `max_delay`.
    fn delay_for(&self, attempt: usize) -> Duration {
        let delay = self
            .initial_delay
            .saturating_mul(1u32.checked_shl(attempt as u32).unwrap_or(u32::MAX));
        delay.min(self.max_delay)
    }
}

/// Run `operation`, retrying transient failures per `config`.
///
/// Non-transient errors are returned immediately.
pub async fn with_retry<F, Fut, T>(
    config: &RetryConfig,
    mut operation: F,
) -> Result<T, MappingHttpError>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, MappingHttpError>>,
{
    let mut attempt = 0;
    loop {
        match operation().await {
            Ok(value) => return Ok(value),
            Err(err) if err.is_network_error() && attempt < config.max_retries => {
                let delay = config.delay_for(attempt);
                tracing::debug!(attempt, ?delay, error = %err, "retrying mapping request");
                sleep(delay).await;
                attempt += 1;
            }
            Err(err) => return Err(err),
        }
    }
}

// =============================================================================
// Wire Format
// =============================================================================

#[derive(Debug, Deserialize)]
struct SearchEnvelope {
    places: Vec<Place>,
}

#[derive(Debug, Deserialize)]
struct DirectionsEnvelope {
    route: Route,
}

// =============================================================================
// Client
// =============================================================================

/// HTTP client for the mapping service.
///
/// # Examples
/// ```no_run
/// use mapping_client::{Coordinate, MappingClientConfig, MappingHttpClient, Region};
///
/// async fn example() -> Result<(), Box<dyn std::error::Error>> {
///     let config = MappingClientConfig::new("https://maps.example.com");
///     let client = MappingHttpClient::new(config);
///
///     let region = Region::new(Coordinate::new(-6.195125, 106.822832), 10_000.0, 10_000.0);
///     let places = client.search_places("coffee", region).await?;
///     for place in places {
///         println!("{}", place.name.unwrap_or_default());
///     }
///     Ok(())
/// }
/// ```
#[derive(Debug, Clone)]
pub struct MappingHttpClient {
    client: reqwest::Client,
    config: MappingClientConfig,
}

impl MappingHttpClient {
    /// Create a new client
    pub fn new(config: MappingClientConfig) -> Self {
        let client = reqwest::Client::builder()
            .timeout(config.timeout)
            .user_agent(&config.user_agent)
            .build()
            .expect("Failed to build HTTP client");

        Self { client, config }
    }

    /// Get the client configuration
    pub fn config(&self) -> &MappingClientConfig {
        &self.config
    }

    /// Search for places matching `query` within `region`.
    pub async fn search_places(
        &self,
        query: &str,
        region: Region,
    ) -> Result<Vec<Place>, MappingHttpError> {
        let url = format!("{}/v1/places/search", self.config.service_url);
        let request = self.client.get(&url).query(&[
            ("q", query.to_string()),
            ("lat", region.center.latitude.to_string()),
            ("lon", region.center.longitude.to_string()),
            ("lat_span", region.latitudinal_meters.to_string()),
            ("lon_span", region.longitudinal_meters.to_string()),
        ]);

        let envelope: SearchEnvelope = Self::execute(request).await?;
        Ok(envelope.places)
    }

    /// Compute a route between two coordinates.
    pub async fn directions(
        &self,
        origin: Coordinate,
        destination: Coordinate,
    ) -> Result<Route, MappingHttpError> {
        let url = format!("{}/v1/directions", self.config.service_url);
        let request = self.client.get(&url).query(&[
            ("from_lat", origin.latitude.to_string()),
            ("from_lon", origin.longitude.to_string()),
            ("to_lat", destination.latitude.to_string()),
            ("to_lon", destination.longitude.to_string()),
        ]);

        let envelope: DirectionsEnvelope = Self::execute(request).await?;
        Ok(envelope.route)
    }

    async fn execute<T>(request: reqwest::RequestBuilder) -> Result<T, MappingHttpError>
    where
        T: for<'de> Deserialize<'de>,
    {
        let response = request.send().await.map_err(|e| {
            MappingHttpError::new(0, "NetworkError", format!("request failed: {}", e))
        })?;

        let status = response.status().as_u16();

        if !response.status().is_success() {
            let body = response.text().await.unwrap_or_default();
            return match serde_json::from_str::<ServiceErrorBody>(&body) {
                Ok(err) => Err(MappingHttpError::new(status, err.error, err.message)),
                Err(_) => Err(MappingHttpError::new(
                    status,
                    "Unknown",
                    format!("HTTP {}: {}", status, body),
                )),
            };
        }

        let body = response.text().await.map_err(|e| {
            MappingHttpError::new(0, "ParseError", format!("failed to read response: {}", e))
        })?;

        serde_json::from_str(&body).map_err(|e| {
            MappingHttpError::new(0, "ParseError", format!("failed to parse JSON: {}", e))
        })
    }
}

#[async_trait]
impl MappingPlatform for MappingHttpClient {
    async fn search(&self, query: &str, region: Region) -> platform::Result<Vec<Place>> {
        with_retry(&self.config.retry, || self.search_places(query, region))
            .await
            .map_err(|e| PlatformError::SearchFailed(e.to_string()))
    }

    async fn route(&self, origin: Coordinate, destination: &Place) -> platform::Result<Route> {
        with_retry(&self.config.retry, || {
            self.directions(origin, destination.coordinate)
        })
        .await
        .map_err(|e| PlatformError::RouteFailed(e.to_string()))
    }
}

// =============================================================================
// Tests
// =============================================================================
