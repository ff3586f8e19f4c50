//! OpenAI chat completions client.

use std::time::Duration;

use reqwest::header::{AUTHORIZATION, CONTENT_TYPE, HeaderMap, HeaderValue};
use reqwest_middleware::ClientWithMiddleware;
use serde::Deserialize;

use super::{build_http_client, check_status, transport_error};
use crate::config::Config;
use crate::error::{ClientError, ClientResult};
use crate::models::ModelTier;
use crate::services::{CompletionRequest, CompletionService};

/// Completion service backed by an OpenAI-compatible chat completions endpoint.
#[derive(Clone)]
pub struct OpenAiClient {
    client: ClientWithMiddleware,
    completions_url: String,
    default_model: String,
    strong_model: String,
    request_timeout: Duration,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: ChatMessage,
}

#[derive(Debug, Deserialize)]
struct ChatMessage {
    #[serde(default)]
    content: Option<String>,
}

impl OpenAiClient {
    /// Create a new client.
    ///
    /// # Errors
    ///
    /// Returns error if no API key is configured or the HTTP client cannot be built.
    pub fn new(config: &Config) -> anyhow::Result<Self> {
        let Some(key) = config.openai_api_key.as_deref() else {
            anyhow::bail!("OPENAI_API_KEY is not set");
        };

        let mut auth: HeaderValue = format!("Bearer {key}").parse()?;
        auth.set_sensitive(true);

        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        headers.insert(AUTHORIZATION, auth);

        Ok(Self {
            client: build_http_client(config, headers)?,
            completions_url: format!("{}/chat/completions", config.openai_api_url),
            default_model: config.model_for(ModelTier::Default).to_string(),
            strong_model: config.model_for(ModelTier::Strong).to_string(),
            request_timeout: config.request_timeout,
        })
    }

    /// Model name used for a tier.
    #[must_use]
    pub fn model(&self, tier: ModelTier) -> &str {
        match tier {
            ModelTier::Default => &self.default_model,
            ModelTier::Strong => &self.strong_model,
        }
    }
}

#[async_trait::async_trait]
impl CompletionService for OpenAiClient {
    async fn complete(&self, request: &CompletionRequest) -> ClientResult<String> {
        let model = self.model(request.tier);
        let body = serde_json::json!({
            "model": model,
            "messages": [{"role": "user", "content": request.prompt}],
            "temperature": request.temperature,
            "max_tokens": request.max_tokens,
            "top_p": 1,
            "frequency_penalty": 0,
            "presence_penalty": 0,
        });

        tracing::debug!(model, max_tokens = request.max_tokens, "Requesting completion");

        let response = self
            .client
            .post(&self.completions_url)
            .body(serde_json::to_string(&body)?)
            .send()
            .await
            .map_err(transport_error(self.request_timeout))?;

        let response = check_status(response).await?;
        let value: serde_json::Value =
            response.json().await.map_err(transport_error(self.request_timeout))?;
        let chat: ChatResponse = serde_json::from_value(value)?;

        let content = chat
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .ok_or_else(|| ClientError::malformed("completion response has no message content"))?;

        Ok(content.trim().to_string())
    }
}

impl std::fmt::Debug for OpenAiClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OpenAiClient")
            .field("completions_url", &self.completions_url)
            .field("default_model", &self.default_model)
            .field("strong_model", &self.strong_model)
            .finish()
    }
}
