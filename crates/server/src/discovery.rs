//! User-facing operations: search, recommendations, reset.
//!
//! `DiscoveryService` is built once per process and holds what sessions
//! share: the catalog (through `GenreSearch`) and, if a credential was
//! installed, the recommendation orchestrator. Each user interaction
//! lifetime gets its own `DiscoverySession`, which owns its state outright.

use std::sync::Arc;

use data_loader::{Catalog, GenreSet};
use pipeline::{GenreSearch, SearchResult, ValidationError};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing::{debug, info};

use crate::error::RecommendationError;
use crate::flow::{CautionNotice, RecommendationFlow, RecommendationPhase};
use crate::orchestrator::{RecommendationOrchestrator, RecommendationResult};
use crate::session::SessionState;

/// Shared, read-only parts of the application
#[derive(Clone)]
pub struct DiscoveryService {
    search: Arc<GenreSearch>,
    orchestrator: Option<Arc<RecommendationOrchestrator>>,
}

impl DiscoveryService {
    /// Search-only service. Recommendations stay unreachable until
    /// `with_recommendations` installs an orchestrator.
    pub fn new(catalog: Arc<Catalog>) -> Self {
        Self {
            search: Arc::new(GenreSearch::new(catalog)),
            orchestrator: None,
        }
    }

    /// Configure how many titles a search returns (default: 10)
    pub fn with_sample_size(mut self, sample_size: usize) -> Self {
        let search = (*self.search).clone().with_sample_size(sample_size);
        self.search = Arc::new(search);
        self
    }

    /// Enable the recommendation feature
    pub fn with_recommendations(mut self, orchestrator: RecommendationOrchestrator) -> Self {
        info!(
            "Recommendations via {} (timeout {:?})",
            orchestrator.generator_name(),
            orchestrator.timeout()
        );
        self.orchestrator = Some(Arc::new(orchestrator));
        self
    }

    /// False when no credential was installed or the service rejected it
    pub fn recommendations_enabled(&self) -> bool {
        self.orchestrator
            .as_ref()
            .is_some_and(|orchestrator| !orchestrator.is_disabled())
    }

    pub fn genres(&self) -> &GenreSet {
        self.search.genres()
    }

    /// Open a session seeded from the OS
    pub fn open_session(&self) -> DiscoverySession<StdRng> {
        self.open_session_with_rng(StdRng::from_os_rng())
    }

    /// Open a session with a caller-supplied random source
    pub fn open_session_with_rng<R: Rng>(&self, rng: R) -> DiscoverySession<R> {
        debug!(
            "Opening session (recommendations {})",
            if self.recommendations_enabled() { "enabled" } else { "disabled" }
        );
        DiscoverySession {
            search: self.search.clone(),
            flow: self.orchestrator.clone().map(RecommendationFlow::new),
            state: SessionState::new(),
            rng,
        }
    }
}

/// One user's session
pub struct DiscoverySession<R> {
    search: Arc<GenreSearch>,
    flow: Option<RecommendationFlow>,
    state: SessionState,
    rng: R,
}

impl<R: Rng> DiscoverySession<R> {
    /// Search the catalog by genre.
    ///
    /// On success the genre and titles become the session's active genre
    /// and last result, and any half-finished recommendation round is
    /// dropped. On failure the session is left exactly as it was.
    pub fn search(&mut self, genre_text: &str) -> Result<SearchResult, ValidationError> {
        let result = self.search.search(genre_text, &mut self.rng)?;

        self.state.record_search(result.clone());
        if let Some(flow) = self.flow.as_mut() {
            flow.reset();
        }

        info!("Active genre is now '{}'", result.genre);
        Ok(result)
    }

    /// First step of a recommendation request: returns the caution notice
    /// to show. The caller is expected to display it before confirming.
    pub fn prepare_recommendations(&mut self) -> Result<CautionNotice, RecommendationError> {
        let flow = self
            .flow
            .as_mut()
            .ok_or(RecommendationError::FeatureDisabled)?;
        let notice = flow.begin(&self.state)?;
        flow.acknowledge_notice()?;
        Ok(notice)
    }

    /// Second step: the user confirmed, call the service once
    pub async fn confirm_recommendations(
        &mut self,
    ) -> Result<RecommendationResult, RecommendationError> {
        let flow = self
            .flow
            .as_mut()
            .ok_or(RecommendationError::FeatureDisabled)?;
        flow.confirm().await
    }

    /// Second step, the other way: the user backed out
    pub fn decline_recommendations(&mut self) -> Result<RecommendationResult, RecommendationError> {
        let flow = self
            .flow
            .as_mut()
            .ok_or(RecommendationError::FeatureDisabled)?;
        flow.decline()
    }

    /// Run the whole two-step request.
    ///
    /// `confirm` sees the caution notice and decides whether to go ahead;
    /// declining yields an empty result, not an error.
    pub async fn request_recommendations<F>(
        &mut self,
        confirm: F,
    ) -> Result<RecommendationResult, RecommendationError>
    where
        F: FnOnce(&CautionNotice) -> bool,
    {
        let notice = self.prepare_recommendations()?;
        if confirm(&notice) {
            self.confirm_recommendations().await
        } else {
            self.decline_recommendations()
        }
    }

    /// Clear the active genre, the last result and the recommendation
    /// flow. Calling it on an empty session is a no-op.
    pub fn reset(&mut self) {
        self.state.reset();
        if let Some(flow) = self.flow.as_mut() {
            flow.reset();
        }
        debug!("Session reset");
    }

    pub fn state(&self) -> &SessionState {
        &self.state
    }

    pub fn genres(&self) -> &GenreSet {
        self.search.genres()
    }

    /// False when no credential was installed or the service rejected it
    pub fn recommendations_enabled(&self) -> bool {
        self.flow.as_ref().is_some_and(|flow| !flow.is_disabled())
    }

    pub fn recommendation_phase(&self) -> Option<&RecommendationPhase> {
        self.flow.as_ref().map(RecommendationFlow::phase)
    }
}
