//! # Recommendation Orchestrator
//!
//! Builds the prompt for a genre, makes one call to the text service and
//! shapes the answer into a `RecommendationResult`:
//! 1. Build the system instruction and user message
//! 2. Call the generator under a timeout
//! 3. Classify failures
//! 4. Return the reply as a single text block
//!
//! The answer is shown to the user as-is; titles are not checked against
//! the catalog.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::{Duration, Instant};

use llm_client::config::DEFAULT_TIMEOUT;
use llm_client::TextGenerator;
use serde::Serialize;
use tracing::{info, instrument, warn};

use crate::error::RecommendationError;

/// Shown before every call, since answers may cover genres outside the catalog
pub const CAUTION_NOTICE: &str =
    "Be aware you could get movie recommendations for genres that do not appear in our catalogue.";

/// How many movies the service is asked for
pub const RECOMMENDATION_COUNT: usize = 5;

/// The message pair sent to the text service
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecommendationPrompt {
    pub system: String,
    pub user: String,
}

/// Build the prompt for `genre`.
///
/// The system instruction names the canonical genre; the user message is
/// `query`, the genre as the user typed it.
pub fn build_prompt(genre: &str, query: &str) -> RecommendationPrompt {
    let system = format!(
        "You are a film expert providing movie recommendations based on the genre '{genre}'. \
         Recommend {RECOMMENDATION_COUNT} top movies in this genre. Be concise yet engaging. \
         Also, remind the user to enjoy watching the movies and encourage them to write \
         reviews on the website."
    );

    RecommendationPrompt {
        system,
        user: query.to_string(),
    }
}

/// What the text service suggested for a genre.
///
/// Holds zero blocks when the user declined, one block otherwise.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RecommendationResult {
    pub genre: String,
    pub suggestions: Vec<String>,
}

impl RecommendationResult {
    pub fn empty(genre: impl Into<String>) -> Self {
        Self {
            genre: genre.into(),
            suggestions: Vec::new(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.suggestions.is_empty()
    }

    /// The model's reply, if there is one
    pub fn text(&self) -> Option<&str> {
        self.suggestions.first().map(String::as_str)
    }
}

/// Calls the text service on behalf of the recommendation flow.
///
/// One orchestrator is shared by every session. Once the service rejects
/// the credential it stays disabled for all of them.
pub struct RecommendationOrchestrator {
    generator: Arc<dyn TextGenerator>,
    timeout: Duration,
    disabled: AtomicBool,
}

impl RecommendationOrchestrator {
    /// Create an orchestrator around a text generator.
    ///
    /// Only constructible with a generator in hand, which in practice means
    /// a credential has already been installed.
    pub fn new(generator: Arc<dyn TextGenerator>) -> Self {
        Self {
            generator,
            timeout: DEFAULT_TIMEOUT,
            disabled: AtomicBool::new(false),
        }
    }

    /// Configure the per-call timeout (default: 30s)
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    pub fn generator_name(&self) -> &str {
        self.generator.name()
    }

    /// True once the service has rejected the credential
    pub fn is_disabled(&self) -> bool {
        self.disabled.load(Ordering::Acquire)
    }

    /// Ask the service for recommendations in `genre`, with `query` as the
    /// user's own wording of it.
    ///
    /// Exactly one attempt; a failure is returned to the caller, who decides
    /// whether to ask again. An authentication failure disables the
    /// orchestrator.
    #[instrument(skip(self), fields(generator = self.generator.name()))]
    pub async fn recommend(
        &self,
        genre: &str,
        query: &str,
    ) -> Result<RecommendationResult, RecommendationError> {
        if self.is_disabled() {
            return Err(RecommendationError::FeatureDisabled);
        }

        let start_time = Instant::now();
        let prompt = build_prompt(genre, query);

        let reply = tokio::time::timeout(
            self.timeout,
            self.generator.generate(&prompt.system, &prompt.user),
        )
        .await;

        let text = match reply {
            Err(_) => {
                warn!("Text service timed out after {:?}", self.timeout);
                return Err(RecommendationError::Timeout(self.timeout));
            }
            Ok(Err(e)) => {
                warn!("Text service call failed: {}", e);
                let error = RecommendationError::from(e);
                if matches!(error, RecommendationError::Authentication(_)) {
                    warn!("Credential rejected; disabling recommendations");
                    self.disabled.store(true, Ordering::Release);
                }
                return Err(error);
            }
            Ok(Ok(text)) => text,
        };

        let text = text.trim();
        if text.is_empty() {
            warn!("Text service returned a blank answer");
            return Err(RecommendationError::EmptyRecommendation);
        }

        info!(
            "Received {} bytes of recommendations for '{}' in {:.2?}",
            text.len(),
            genre,
            start_time.elapsed()
        );

        Ok(RecommendationResult {
            genre: genre.to_string(),
            suggestions: vec![text.to_string()],
        })
    }
}
