//! Map session controller
//!
//! `MapSessionController` owns the session state for one map screen
//! activation and mediates between user actions and the mapping
//! platform. It translates the three user-initiated events — submit
//! search, select place, request directions — into platform calls and
//! reducer events.
//!
//! Concurrency model: cooperative suspension on the caller's task. The
//! state lock is held only while applying an event, never across a
//! platform await, so overlapping operations interleave freely; request
//! tokens ensure that only the newest request's completion is applied.

use std::sync::Arc;

use app_state::{reduce, SessionConfig, SessionEvent, SessionState, TokenSequence};
use mapping_client::{MappingPlatform, Place};
use tokio::sync::RwLock;

/// Session controller for one map screen activation.
///
/// Created on screen activation and dropped on teardown; completions
/// that race teardown are dropped along with the state they would have
/// written.
pub struct MapSessionController {
    platform: Arc<dyn MappingPlatform>,
    config: SessionConfig,
    state: Arc<RwLock<SessionState>>,
    search_tokens: TokenSequence,
    route_tokens: TokenSequence,
}

impl MapSessionController {
    /// Create a controller over `platform` with the given configuration.
    pub fn new(platform: Arc<dyn MappingPlatform>, config: SessionConfig) -> Self {
        let state = SessionState::new(&config);
        Self {
            platform,
            config,
            state: Arc::new(RwLock::new(state)),
            search_tokens: TokenSequence::new(),
            route_tokens: TokenSequence::new(),
        }
    }

    /// The session configuration
    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    /// Cloned snapshot of the current session state, for rendering.
    pub async fn snapshot(&self) -> SessionState {
        self.state.read().await.clone()
    }

    async fn apply(&self, event: SessionEvent) {
        let mut state = self.state.write().await;
        *state = reduce(&self.config, state.clone(), event);
    }

    /// Update the search field text.
    pub async fn set_search_text(&self, text: impl Into<String>) {
        self.apply(SessionEvent::SearchTextChanged(text.into())).await;
    }

    /// Submit the current search text to the platform.
    ///
    /// Suspends until the platform resolves. An empty query is permitted
    /// and yields whatever the platform returns for one. Overlapping
    /// submissions are allowed; only the newest one's results are applied.
    pub async fn submit_search(&self) {
        let query = self.state.read().await.search_text.clone();
        let token = self.search_tokens.next();
        self.apply(SessionEvent::SearchStarted { token }).await;

        tracing::debug!(%query, "submitting place search");
        let outcome = self.platform.search(&query, self.config.home_region()).await;
        if let Err(err) = &outcome {
            tracing::warn!(error = %err, "place search failed");
        }
        self.apply(SessionEvent::SearchCompleted { token, outcome }).await;
    }

    /// Select a place from the results, or deselect with `None`.
    ///
    /// Opens the details sheet when a place is given. No platform call.
    pub async fn select_place(&self, place: Option<Place>) {
        self.apply(SessionEvent::PlaceSelected(place)).await;
    }

    /// Close the details sheet without deselecting.
    pub async fn dismiss_details(&self) {
        self.apply(SessionEvent::DetailsDismissed).await;
    }

    /// Request directions from home to the currently selected place.
    ///
    /// A no-op when nothing is selected: no platform call, no state
    /// change. In-flight fetches are not cancelled by a newer request;
    /// their completions are discarded by the token check.
    pub async fn request_directions(&self) {
        let Some(destination) = self.state.read().await.selected_place.clone() else {
            tracing::debug!("directions requested with no selection");
            return;
        };

        let token = self.route_tokens.next();
        self.apply(SessionEvent::DirectionsStarted { token }).await;

        tracing::debug!(
            destination = destination.name.as_deref().unwrap_or("<unnamed>"),
            "fetching route"
        );
        let outcome = self.platform.route(self.config.home, &destination).await;
        if let Err(err) = &outcome {
            tracing::warn!(error = %err, "route fetch failed");
        }
        self.apply(SessionEvent::DirectionsCompleted {
            token,
            destination,
            outcome,
        })
        .await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use app_state::{CameraTarget, FetchOutcome, MarkerPolicy};
    use async_trait::async_trait;
    use mapping_client::test_utils::{places, routes};
    use mapping_client::{Coordinate, PlatformError, Region, Route};
    use mockall::mock;

    mock! {
        Platform {}

        #[async_trait]
        impl MappingPlatform for Platform {
            async fn search(
                &self,
                query: &str,
                region: Region,
            ) -> Result<Vec<Place>, PlatformError>;

            async fn route(
                &self,
                origin: Coordinate,
                destination: &Place,
            ) -> Result<Route, PlatformError>;
        }
    }

    fn controller(platform: MockPlatform) -> MapSessionController {
        MapSessionController::new(Arc::new(platform), SessionConfig::default())
    }

    #[tokio::test]
    async fn test_submit_search_replaces_results_exactly() {
        let mut platform = MockPlatform::new();
        platform
            .expect_search()
            .withf(|query, _| query == "monument")
            .times(1)
            .returning(|_, _| Ok(vec![places::monas(), places::kota_tua()]));

        let controller = controller(platform);
        controller.set_search_text("monument").await;
        controller.submit_search().await;

        let state = controller.snapshot().await;
        assert_eq!(state.results, vec![places::monas(), places::kota_tua()]);
        assert_eq!(state.search_outcome, Some(FetchOutcome::Success));
    }

    #[tokio::test]
    async fn test_submit_search_scopes_to_home_region() {
        let config = SessionConfig::default();
        let expected = config.home_region();

        let mut platform = MockPlatform::new();
        platform
            .expect_search()
            .withf(move |_, region| *region == expected)
            .times(1)
            .returning(|_, _| Ok(vec![]));

        let controller = MapSessionController::new(Arc::new(platform), config);
        controller.submit_search().await;
    }

    #[tokio::test]
    async fn test_empty_query_is_submitted() {
        let mut platform = MockPlatform::new();
        platform
            .expect_search()
            .withf(|query, _| query.is_empty())
            .times(1)
            .returning(|_, _| Ok(vec![places::senayan()]));

        let controller = controller(platform);
        controller.submit_search().await;

        let state = controller.snapshot().await;
        assert_eq!(state.results, vec![places::senayan()]);
    }

    #[tokio::test]
    async fn test_failed_search_degrades_to_empty_results() {
        let mut platform = MockPlatform::new();
        platform
            .expect_search()
            .returning(|_, _| Ok(vec![places::monas()]));

        let first = controller(platform);
        first.submit_search().await;
        assert_eq!(first.snapshot().await.results.len(), 1);

        let mut platform = MockPlatform::new();
        platform
            .expect_search()
            .returning(|_, _| Err(PlatformError::SearchFailed("timeout".to_string())));

        let controller = controller(platform);
        controller.submit_search().await;

        let state = controller.snapshot().await;
        assert!(state.results.is_empty());
        assert_eq!(state.search_outcome, Some(FetchOutcome::Failed));
    }

    #[tokio::test]
    async fn test_select_place_is_idempotent() {
        let controller = controller(MockPlatform::new());

        controller.select_place(Some(places::monas())).await;
        let once = controller.snapshot().await;

        controller.select_place(Some(places::monas())).await;
        let twice = controller.snapshot().await;

        assert_eq!(once, twice);
        assert!(twice.details_visible);
        assert_eq!(twice.selected_place, Some(places::monas()));
    }

    #[tokio::test]
    async fn test_directions_without_selection_is_a_no_op() {
        // No expectations: any platform call would panic the mock.
        let controller = controller(MockPlatform::new());
        let before = controller.snapshot().await;

        controller.request_directions().await;

        let after = controller.snapshot().await;
        assert_eq!(after.active_route, before.active_route);
        assert_eq!(after.path_markers, before.path_markers);
        assert_eq!(after.route_displayed, before.route_displayed);
    }

    #[tokio::test]
    async fn test_directions_success_transition() {
        let mut platform = MockPlatform::new();
        platform
            .expect_route()
            .withf(|origin, destination| {
                *origin == Coordinate::new(-6.195125, 106.822832)
                    && destination.name.as_deref() == Some("Monas")
            })
            .times(1)
            .returning(|_, _| Ok(routes::to_monas()));

        let controller = controller(platform);
        controller.select_place(Some(places::monas())).await;
        controller.request_directions().await;

        let state = controller.snapshot().await;
        assert_eq!(state.active_route, Some(routes::to_monas()));
        assert_eq!(state.path_markers.len(), 4); // home seed + 3 steps
        assert_eq!(state.route_destination, Some(places::monas()));
        assert!(state.route_displayed);
        assert!(!state.details_visible);
        assert!(matches!(
            state.camera,
            CameraTarget::Rect { animated: true, .. }
        ));
    }

    #[tokio::test]
    async fn test_directions_failure_still_enters_route_mode() {
        let mut platform = MockPlatform::new();
        platform
            .expect_route()
            .times(1)
            .returning(|_, _| Err(PlatformError::RouteFailed("no road".to_string())));

        let controller = controller(platform);
        controller.select_place(Some(places::monas())).await;
        controller.request_directions().await;

        let state = controller.snapshot().await;
        assert!(state.active_route.is_none());
        assert!(state.route_displayed);
        assert!(!state.details_visible);
        assert_eq!(state.route_destination, Some(places::monas()));
        assert_eq!(state.route_outcome, Some(FetchOutcome::Failed));
    }

    #[tokio::test]
    async fn test_repeated_directions_reseed_markers_by_default() {
        let mut platform = MockPlatform::new();
        platform
            .expect_route()
            .times(2)
            .returning(|_, _| Ok(routes::to_monas()));

        let controller = controller(platform);
        controller.select_place(Some(places::monas())).await;
        controller.request_directions().await;
        controller.request_directions().await;

        let state = controller.snapshot().await;
        assert_eq!(state.path_markers.len(), 4);
    }

    #[tokio::test]
    async fn test_accumulate_policy_grows_markers_monotonically() {
        let mut platform = MockPlatform::new();
        platform
            .expect_route()
            .times(3)
            .returning(|_, _| Ok(routes::short()));

        let config = SessionConfig::default().with_marker_policy(MarkerPolicy::Accumulate);
        let controller = MapSessionController::new(Arc::new(platform), config);
        controller.select_place(Some(places::kota_tua())).await;

        let mut lengths = vec![controller.snapshot().await.path_markers.len()];
        for _ in 0..3 {
            controller.request_directions().await;
            lengths.push(controller.snapshot().await.path_markers.len());
        }

        assert_eq!(lengths, vec![1, 2, 3, 4]);
    }

    #[tokio::test]
    async fn test_destination_is_place_selected_at_call_time() {
        let mut platform = MockPlatform::new();
        platform
            .expect_route()
            .times(1)
            .returning(|_, _| Ok(routes::short()));

        let controller = controller(platform);
        controller.select_place(Some(places::kota_tua())).await;
        controller.request_directions().await;

        // Selecting a different place afterwards does not retarget the route.
        controller.select_place(Some(places::monas())).await;

        let state = controller.snapshot().await;
        assert_eq!(state.route_destination, Some(places::kota_tua()));
        assert_eq!(state.selected_place, Some(places::monas()));
    }

    #[tokio::test]
    async fn test_dismiss_details_closes_sheet_only() {
        let controller = controller(MockPlatform::new());
        controller.select_place(Some(places::monas())).await;
        controller.dismiss_details().await;

        let state = controller.snapshot().await;
        assert!(!state.details_visible);
        assert_eq!(state.selected_place, Some(places::monas()));
    }
}
