use std::time::Duration;

use llm_client::GenerationError;
use thiserror::Error;

/// Errors from the recommendation feature.
///
/// None of these touch the session's genre or search results; the search
/// feature keeps working whatever happens here.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum RecommendationError {
    /// No genre has been accepted by a search yet (or it was reset)
    #[error("Search for a genre before asking for recommendations")]
    MissingGenre,

    /// No credential installed, or the service rejected it
    #[error("Recommendations are unavailable: no valid API key has been installed")]
    FeatureDisabled,

    #[error("Cannot {action} while the recommendation flow is {from}")]
    InvalidTransition {
        from: &'static str,
        action: &'static str,
    },

    #[error("Authentication with the recommendation service failed: {0}")]
    Authentication(String),

    #[error("Recommendation service unavailable: {0}")]
    ServiceUnavailable(String),

    #[error("Recommendation service did not answer within {0:?}")]
    Timeout(Duration),

    #[error("No suggestions available")]
    EmptyRecommendation,
}

impl RecommendationError {
    /// Whether confirming again may succeed
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            RecommendationError::ServiceUnavailable(_)
                | RecommendationError::Timeout(_)
                | RecommendationError::EmptyRecommendation
        )
    }
}

impl From<GenerationError> for RecommendationError {
    fn from(e: GenerationError) -> Self {
        match e {
            GenerationError::Authentication(msg) => RecommendationError::Authentication(msg),
            GenerationError::ServiceUnavailable(msg) => RecommendationError::ServiceUnavailable(msg),
            GenerationError::Timeout(after) => RecommendationError::Timeout(after),
            GenerationError::EmptyResponse | GenerationError::InvalidResponse(_) => {
                RecommendationError::EmptyRecommendation
            }
        }
    }
}
