//! The two-step recommendation flow.
//!
//! A caution notice is always shown first; only an explicit confirmation
//! triggers the call to the text service.
//!
//! ```text
//! Idle --begin--> PromptReady --acknowledge_notice--> AwaitingConfirmation
//!                                                        |        |
//!                                                     decline  confirm
//!                                                        |        v
//!                                                      Idle    Calling --> Completed
//!                                                                  \-----> Failed
//! Failed (recoverable) --confirm--> Calling
//! ```
//!
//! Every confirmation is one attempt at most. An authentication failure
//! disables the shared orchestrator, and with it every session's flow.

use std::sync::Arc;

use pipeline::CanonicalGenre;
use tracing::{debug, info, warn};

use crate::error::RecommendationError;
use crate::orchestrator::{CAUTION_NOTICE, RecommendationOrchestrator, RecommendationResult};
use crate::session::SessionState;

/// Where the flow currently stands
#[derive(Debug, Clone, PartialEq)]
pub enum RecommendationPhase {
    Idle,
    PromptReady { genre: CanonicalGenre },
    AwaitingConfirmation { genre: CanonicalGenre },
    Calling { genre: CanonicalGenre },
    Completed { result: RecommendationResult },
    Failed {
        genre: CanonicalGenre,
        error: RecommendationError,
    },
}

impl RecommendationPhase {
    pub fn name(&self) -> &'static str {
        match self {
            RecommendationPhase::Idle => "idle",
            RecommendationPhase::PromptReady { .. } => "prompt ready",
            RecommendationPhase::AwaitingConfirmation { .. } => "awaiting confirmation",
            RecommendationPhase::Calling { .. } => "calling",
            RecommendationPhase::Completed { .. } => "completed",
            RecommendationPhase::Failed { .. } => "failed",
        }
    }
}

/// The notice shown before the user confirms
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CautionNotice {
    pub genre: CanonicalGenre,
    pub message: &'static str,
}

pub struct RecommendationFlow {
    orchestrator: Arc<RecommendationOrchestrator>,
    phase: RecommendationPhase,
    /// The user's wording of the genre for the current round
    query: String,
}

impl RecommendationFlow {
    pub fn new(orchestrator: Arc<RecommendationOrchestrator>) -> Self {
        Self {
            orchestrator,
            phase: RecommendationPhase::Idle,
            query: String::new(),
        }
    }

    pub fn phase(&self) -> &RecommendationPhase {
        &self.phase
    }

    /// True once the service has rejected the credential, in this session
    /// or any other sharing the orchestrator
    pub fn is_disabled(&self) -> bool {
        self.orchestrator.is_disabled()
    }

    /// Start the flow for the session's active genre.
    ///
    /// The genre is read from the session, never taken as raw text, so a
    /// search that failed validation can't feed a stale genre in here.
    /// Starting again from any phase discards the previous round.
    pub fn begin(&mut self, session: &SessionState) -> Result<CautionNotice, RecommendationError> {
        if self.is_disabled() {
            return Err(RecommendationError::FeatureDisabled);
        }
        let genre = session
            .genre()
            .cloned()
            .ok_or(RecommendationError::MissingGenre)?;

        debug!("Recommendation flow ready for '{}'", genre);
        self.query = session.genre_input().unwrap_or(genre.as_str()).to_string();
        self.phase = RecommendationPhase::PromptReady {
            genre: genre.clone(),
        };

        Ok(CautionNotice {
            genre,
            message: CAUTION_NOTICE,
        })
    }

    /// Record that the caution notice has been shown
    pub fn acknowledge_notice(&mut self) -> Result<(), RecommendationError> {
        match &self.phase {
            RecommendationPhase::PromptReady { genre } => {
                self.phase = RecommendationPhase::AwaitingConfirmation {
                    genre: genre.clone(),
                };
                Ok(())
            }
            other => Err(RecommendationError::InvalidTransition {
                from: other.name(),
                action: "acknowledge the notice",
            }),
        }
    }

    /// The user confirmed: make one call to the text service.
    ///
    /// Allowed while awaiting confirmation, or after a recoverable failure
    /// (which is how a retry happens).
    pub async fn confirm(&mut self) -> Result<RecommendationResult, RecommendationError> {
        if self.is_disabled() {
            return Err(RecommendationError::FeatureDisabled);
        }

        let genre = match &self.phase {
            RecommendationPhase::AwaitingConfirmation { genre } => genre.clone(),
            RecommendationPhase::Failed { genre, error } if error.is_recoverable() => {
                info!("Retrying recommendations for '{}' after: {}", genre, error);
                genre.clone()
            }
            other => {
                return Err(RecommendationError::InvalidTransition {
                    from: other.name(),
                    action: "confirm",
                });
            }
        };

        self.phase = RecommendationPhase::Calling {
            genre: genre.clone(),
        };

        match self.orchestrator.recommend(genre.as_str(), &self.query).await {
            Ok(result) => {
                self.phase = RecommendationPhase::Completed {
                    result: result.clone(),
                };
                Ok(result)
            }
            Err(error) => {
                if matches!(error, RecommendationError::Authentication(_)) {
                    warn!("Recommendations disabled for every session");
                }
                self.phase = RecommendationPhase::Failed {
                    genre,
                    error: error.clone(),
                };
                Err(error)
            }
        }
    }

    /// The user backed out before confirming. Nothing is called.
    pub fn decline(&mut self) -> Result<RecommendationResult, RecommendationError> {
        match &self.phase {
            RecommendationPhase::PromptReady { genre }
            | RecommendationPhase::AwaitingConfirmation { genre } => {
                let result = RecommendationResult::empty(genre.as_str());
                self.phase = RecommendationPhase::Idle;
                Ok(result)
            }
            other => Err(RecommendationError::InvalidTransition {
                from: other.name(),
                action: "decline",
            }),
        }
    }

    pub fn reset(&mut self) {
        self.phase = RecommendationPhase::Idle;
    }
}
