//! Server crate for the movie finder.
//!
//! This crate holds the orchestration around a search: the per-session
//! state, the recommendation orchestrator with its confirmation flow, and
//! the user-facing operations that tie them together.

pub mod discovery;
pub mod error;
pub mod flow;
pub mod orchestrator;
pub mod session;

#[cfg(test)]
pub(crate) mod testing;

pub use discovery::{DiscoveryService, DiscoverySession};
pub use error::RecommendationError;
pub use flow::{CautionNotice, RecommendationFlow, RecommendationPhase};
pub use orchestrator::{
    CAUTION_NOTICE, RecommendationOrchestrator, RecommendationPrompt, RecommendationResult,
    build_prompt,
};
pub use session::SessionState;
