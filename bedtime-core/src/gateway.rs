//! The model gateway: the only place the program talks to the outside world.
//!
//! Everything above this module works against the [`ModelGateway`] trait,
//! so tests can swap in [`crate::testing::MockGateway`].

use crate::config::GenerationParams;
use async_trait::async_trait;
use claude::{Claude, Message, Request};
use thiserror::Error;

/// Errors from a gateway call.
#[derive(Debug, Error)]
pub enum GatewayError {
    #[error("No API key configured - set ANTHROPIC_API_KEY environment variable")]
    NoApiKey,

    #[error("Claude API error: {0}")]
    Api(#[from] claude::Error),

    #[error("Gateway error: {0}")]
    Other(String),
}

/// Sends a single-turn prompt to a text-generation model.
#[async_trait]
pub trait ModelGateway: Send + Sync {
    /// Return the model's reply to `prompt`, verbatim.
    async fn call_model(
        &self,
        prompt: &str,
        params: GenerationParams,
    ) -> Result<String, GatewayError>;
}

/// Gateway backed by the Claude Messages API.
pub struct ClaudeGateway {
    client: Option<Claude>,
}

impl ClaudeGateway {
    /// Build a gateway for `model`.
    ///
    /// Without an API key the gateway still constructs, but every call fails
    /// with [`GatewayError::NoApiKey`].
    pub fn new(api_key: Option<String>, model: impl Into<String>) -> Result<Self, GatewayError> {
        let client = match api_key {
            Some(key) if !key.trim().is_empty() => Some(Claude::new(key)?.with_model(model)),
            _ => None,
        };
        Ok(Self { client })
    }

    /// Whether a credential was supplied.
    pub fn is_configured(&self) -> bool {
        self.client.is_some()
    }
}

#[async_trait]
impl ModelGateway for ClaudeGateway {
    async fn call_model(
        &self,
        prompt: &str,
        params: GenerationParams,
    ) -> Result<String, GatewayError> {
        let client = self.client.as_ref().ok_or(GatewayError::NoApiKey)?;

        tracing::debug!(
            prompt_len = prompt.len(),
            temperature = params.temperature,
            max_output_tokens = params.max_output_tokens,
            "calling model"
        );

        let response = client.complete(build_request(prompt, params)).await?;

        tracing::debug!(
            output_tokens = response.usage.output_tokens,
            stop_reason = ?response.stop_reason,
            "model replied"
        );

        Ok(response.text())
    }
}

/// A single-turn request carrying `prompt` as the only user message.
fn build_request(prompt: &str, params: GenerationParams) -> Request {
    Request::new(vec![Message::user(prompt)])
        .with_max_tokens(params.max_output_tokens)
        .with_temperature(params.temperature)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::StoryConfig;

    #[test]
    fn test_judge_params_map_onto_request() {
        let params = StoryConfig::default().judge_params();
        let request = build_request("Rate this story", params);

        assert_eq!(request.max_tokens, 700);
        assert_eq!(request.temperature, Some(0.2));
        assert_eq!(request.messages.len(), 1);
        assert_eq!(request.messages[0].text, "Rate this story");
    }

    #[test]
    fn test_story_params_map_onto_request() {
        let config = StoryConfig::new().with_max_tokens(300).with_temperature(0.9);
        let request = build_request("Write a story", config.story_params());

        assert_eq!(request.max_tokens, 300);
        assert_eq!(request.temperature, Some(0.9));
    }

    #[test]
    fn test_gateway_sends_to_configured_model() {
        let gateway = ClaudeGateway::new(Some("test-key".to_string()), "claude-test").unwrap();
        let client = gateway.client.as_ref().unwrap();
        assert_eq!(client.model(), "claude-test");
    }

    #[test]
    fn test_gateway_with_key_is_configured() {
        let gateway = ClaudeGateway::new(Some("test-key".to_string()), "claude-test").unwrap();
        assert!(gateway.is_configured());
    }

    #[test]
    fn test_gateway_with_blank_key_is_not_configured() {
        let gateway = ClaudeGateway::new(Some("   ".to_string()), "claude-test").unwrap();
        assert!(!gateway.is_configured());
    }

    #[tokio::test]
    async fn test_missing_key_fails_every_call() {
        let gateway = ClaudeGateway::new(None, "claude-test").unwrap();
        let result = gateway
            .call_model("Tell me a story", GenerationParams::default())
            .await;
        assert!(matches!(result, Err(GatewayError::NoApiKey)));
    }
}
