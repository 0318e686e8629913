//! The API credential.
//!
//! A credential is a single line of text. When read from a file (the
//! equivalent of an uploaded key file) only the first line counts, so a
//! trailing newline or a comment on the next line is harmless.

use std::fmt;
use std::fs;
use std::path::Path;
use thiserror::Error;

/// Environment variable consulted when no key file is given
pub const DEFAULT_API_KEY_VAR: &str = "OPENAI_API_KEY";

#[derive(Error, Debug)]
pub enum CredentialError {
    #[error("API key is empty")]
    Empty,

    #[error("Failed to read API key file {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Environment variable {0} is not set")]
    MissingEnv(String),
}

/// A validated, non-empty API key
#[derive(Clone, PartialEq, Eq)]
pub struct ApiKey(String);

impl ApiKey {
    /// Take the first line of `text`, trimmed
    pub fn parse(text: &str) -> Result<Self, CredentialError> {
        let key = text.lines().next().unwrap_or("").trim();
        if key.is_empty() {
            return Err(CredentialError::Empty);
        }
        Ok(Self(key.to_string()))
    }

    pub fn from_file(path: &Path) -> Result<Self, CredentialError> {
        let text = fs::read_to_string(path).map_err(|source| CredentialError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::parse(&text)
    }

    pub fn from_env(var: &str) -> Result<Self, CredentialError> {
        let value = std::env::var(var).map_err(|_| CredentialError::MissingEnv(var.to_string()))?;
        Self::parse(&value)
    }

    /// The raw secret, for building the auth header
    pub fn expose(&self) -> &str {
        &self.0
    }
}

// Never print the secret itself
impl fmt::Debug for ApiKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("ApiKey(****)")
    }
}
