//! Client for the generative-text service that produces open-domain
//! movie recommendations.
//!
//! This crate provides:
//! - The `TextGenerator` trait, the only thing the rest of the system knows
//!   about the service: an ordered (system, user) message pair in, free text out
//! - `OpenAiChatClient`, an implementation over an OpenAI-compatible
//!   chat completion endpoint
//! - `ApiKey`, the single-line credential the service needs
//! - `LlmConfig`, endpoint/model/timeout settings

use std::time::Duration;

use async_trait::async_trait;
use thiserror::Error;

pub mod config;
pub mod credential;
pub mod openai;

pub use config::LlmConfig;
pub use credential::{ApiKey, CredentialError, DEFAULT_API_KEY_VAR};
pub use openai::OpenAiChatClient;

/// Errors that can occur when calling the generative-text service
#[derive(Error, Debug, Clone, PartialEq)]
pub enum GenerationError {
    /// The service rejected the credential
    #[error("Authentication with the text service failed: {0}")]
    Authentication(String),

    /// Transport failure, rate limiting or a provider-side error
    #[error("Text service unavailable: {0}")]
    ServiceUnavailable(String),

    #[error("Text service did not answer within {0:?}")]
    Timeout(Duration),

    /// The service answered but with no text
    #[error("Text service returned an empty response")]
    EmptyResponse,

    /// The service answered with something we couldn't decode
    #[error("Invalid response from text service: {0}")]
    InvalidResponse(String),
}

impl GenerationError {
    /// Whether retrying with the same credential can succeed
    pub fn is_recoverable(&self) -> bool {
        !matches!(self, GenerationError::Authentication(_))
    }
}

/// A generative-text capability.
///
/// Implementations make exactly one request per call; retry policy belongs
/// to the caller.
#[async_trait]
pub trait TextGenerator: Send + Sync {
    /// Returns the name of this generator (for logging/debugging)
    fn name(&self) -> &str;

    /// Send a system instruction and a user message, return the reply text
    async fn generate(&self, system_prompt: &str, user_text: &str)
        -> Result<String, GenerationError>;
}
