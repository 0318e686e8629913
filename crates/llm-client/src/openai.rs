//! OpenAI-compatible chat completion client.
//!
//! Sends the system instruction and user message as a two-message chat and
//! returns the first choice's content. One request per call, no retries.

use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::{Client as HttpClient, StatusCode};
use serde::{Deserialize, Serialize};
use tracing::{debug, error, info};

use crate::{ApiKey, GenerationError, LlmConfig, TextGenerator};

#[derive(Debug, Serialize)]
struct ChatCompletionRequest<'a> {
    model: &'a str,
    temperature: f32,
    messages: [ChatMessage<'a>; 2],
}

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'static str,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
struct ChatCompletionResponse {
    #[serde(default)]
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: ChoiceMessage,
}

#[derive(Debug, Deserialize)]
struct ChoiceMessage {
    #[serde(default)]
    content: Option<String>,
}

/// Client for an OpenAI-compatible `/chat/completions` endpoint
#[derive(Clone)]
pub struct OpenAiChatClient {
    http_client: HttpClient,
    api_key: ApiKey,
    config: LlmConfig,
}

impl OpenAiChatClient {
    /// Create a client for the configured endpoint.
    ///
    /// Nothing is sent until the first `generate` call; a bad key only
    /// surfaces then, as `GenerationError::Authentication`.
    pub fn new(api_key: ApiKey, config: LlmConfig) -> Result<Self> {
        info!(
            "Configuring text service client for {} (model {})",
            config.api_base, config.model
        );

        let http_client = HttpClient::builder()
            .timeout(config.timeout)
            .build()
            .context("Building HTTP client")?;

        Ok(Self {
            http_client,
            api_key,
            config,
        })
    }

    pub fn config(&self) -> &LlmConfig {
        &self.config
    }

    fn build_request<'a>(&'a self, system_prompt: &'a str, user_text: &'a str) -> ChatCompletionRequest<'a> {
        ChatCompletionRequest {
            model: &self.config.model,
            temperature: self.config.temperature,
            messages: [
                ChatMessage {
                    role: "system",
                    content: system_prompt,
                },
                ChatMessage {
                    role: "user",
                    content: user_text,
                },
            ],
        }
    }

    fn map_transport_error(&self, e: reqwest::Error) -> GenerationError {
        if e.is_timeout() {
            GenerationError::Timeout(self.config.timeout)
        } else {
            GenerationError::ServiceUnavailable(e.to_string())
        }
    }
}

#[async_trait]
impl TextGenerator for OpenAiChatClient {
    fn name(&self) -> &str {
        "OpenAiChatClient"
    }

    async fn generate(
        &self,
        system_prompt: &str,
        user_text: &str,
    ) -> Result<String, GenerationError> {
        let url = self.config.completions_url();
        debug!("POST {} (model {})", url, self.config.model);

        let response = self
            .http_client
            .post(&url)
            .bearer_auth(self.api_key.expose())
            .json(&self.build_request(system_prompt, user_text))
            .send()
            .await
            .map_err(|e| {
                error!("Request to text service failed: {}", e);
                self.map_transport_error(e)
            })?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| self.map_transport_error(e))?;

        if !status.is_success() {
            error!("Text service returned {}", status);
            return Err(classify_status(status, &body));
        }

        extract_content(&body)
    }
}

/// Map a non-success HTTP status onto the error taxonomy
fn classify_status(status: StatusCode, body: &str) -> GenerationError {
    let detail = format!("HTTP {}: {}", status, body.trim());
    match status {
        StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => GenerationError::Authentication(detail),
        _ => GenerationError::ServiceUnavailable(detail),
    }
}

/// Pull the reply text out of a chat completion body
fn extract_content(body: &str) -> Result<String, GenerationError> {
    let parsed: ChatCompletionResponse = serde_json::from_str(body)
        .map_err(|e| GenerationError::InvalidResponse(e.to_string()))?;

    let content = parsed
        .choices
        .into_iter()
        .next()
        .and_then(|choice| choice.message.content)
        .unwrap_or_default();

    if content.trim().is_empty() {
        return Err(GenerationError::EmptyResponse);
    }
    Ok(content)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn client() -> OpenAiChatClient {
        OpenAiChatClient::new(ApiKey::parse("sk-test").unwrap(), LlmConfig::default()).unwrap()
    }

    #[test]
    fn test_request_shape() {
        let client = client();
        let request = client.build_request("You are a film expert", "horror");
        let json = serde_json::to_value(&request).unwrap();

        assert_eq!(json["model"], "gpt-3.5-turbo");
        assert_eq!(json["messages"][0]["role"], "system");
        assert_eq!(json["messages"][0]["content"], "You are a film expert");
        assert_eq!(json["messages"][1]["role"], "user");
        assert_eq!(json["messages"][1]["content"], "horror");
    }

    #[test]
    fn test_request_uses_configured_model_and_temperature() {
        let config = LlmConfig::default()
            .with_model("gpt-4o-mini")
            .with_temperature(0.5);
        let client = OpenAiChatClient::new(ApiKey::parse("sk-test").unwrap(), config).unwrap();
        let json = serde_json::to_value(client.build_request("system", "drama")).unwrap();

        assert_eq!(client.config().model, "gpt-4o-mini");
        assert_eq!(json["model"], "gpt-4o-mini");
        assert_eq!(json["temperature"], 0.5);
    }

    #[test]
    fn test_extract_content() {
        let body = r#"{"choices":[{"index":0,"message":{"role":"assistant","content":"1. Alien"}}]}"#;
        assert_eq!(extract_content(body).unwrap(), "1. Alien");
    }

    #[test]
    fn test_extract_content_empty() {
        assert_eq!(
            extract_content(r#"{"choices":[]}"#),
            Err(GenerationError::EmptyResponse)
        );
        assert_eq!(
            extract_content(r#"{"choices":[{"message":{"content":"  \n"}}]}"#),
            Err(GenerationError::EmptyResponse)
        );
        assert_eq!(
            extract_content(r#"{"choices":[{"message":{"content":null}}]}"#),
            Err(GenerationError::EmptyResponse)
        );
    }

    #[test]
    fn test_extract_content_malformed() {
        assert!(matches!(
            extract_content("<html>bad gateway</html>"),
            Err(GenerationError::InvalidResponse(_))
        ));
    }

    #[test]
    fn test_classify_status() {
        assert!(matches!(
            classify_status(StatusCode::UNAUTHORIZED, "invalid key"),
            GenerationError::Authentication(_)
        ));
        assert!(matches!(
            classify_status(StatusCode::FORBIDDEN, ""),
            GenerationError::Authentication(_)
        ));
        assert!(matches!(
            classify_status(StatusCode::TOO_MANY_REQUESTS, "slow down"),
            GenerationError::ServiceUnavailable(_)
        ));
        assert!(matches!(
            classify_status(StatusCode::BAD_GATEWAY, ""),
            GenerationError::ServiceUnavailable(_)
        ));
    }
}
