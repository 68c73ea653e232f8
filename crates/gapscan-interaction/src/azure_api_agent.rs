//! AzureCompletionAgent - REST client for Azure OpenAI chat completions.
//!
//! Calls the deployment's chat-completions endpoint directly.
//! Configuration priority: ~/.config/gapscan/secret.json > environment
//! variables (AZURE_OPENAI_ENDPOINT, AZURE_OPENAI_KEY,
//! AZURE_OPENAI_DEPLOYMENT, AZURE_OPENAI_API_VERSION).

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};
use std::env;
use std::time::Duration;

use gapscan_core::config::{
    CompletionSecretConfig, DEFAULT_COMPLETION_API_VERSION, DEFAULT_COMPLETION_DEPLOYMENT,
};
use gapscan_core::error::CompletionError;
use gapscan_infrastructure::SecretStorage;

use crate::completion::{CompletionAgent, CompletionTuning};

/// Per-request HTTP timeout; the orchestrator bounds the whole
/// call-plus-retries separately.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(60);

/// Agent implementation that talks to an Azure OpenAI deployment.
#[derive(Clone)]
pub struct AzureCompletionAgent {
    client: Client,
    endpoint: String,
    api_key: String,
    deployment: String,
    api_version: String,
}

impl AzureCompletionAgent {
    /// Creates an agent with explicit settings.
    pub fn new(endpoint: impl Into<String>, api_key: impl Into<String>) -> Self {
        let client = Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .unwrap_or_else(|_| Client::new());
        Self {
            client,
            endpoint: endpoint.into().trim_end_matches('/').to_string(),
            api_key: api_key.into(),
            deployment: DEFAULT_COMPLETION_DEPLOYMENT.to_string(),
            api_version: DEFAULT_COMPLETION_API_VERSION.to_string(),
        }
    }

    /// Loads configuration from secret.json or environment variables.
    ///
    /// Priority:
    /// 1. ~/.config/gapscan/secret.json (`completion` section)
    /// 2. Environment variables
    pub fn try_from_env() -> Result<Self, CompletionError> {
        if let Ok(storage) = SecretStorage::new() {
            if let Ok(secrets) = storage.load() {
                if let Some(completion) = secrets.completion {
                    return Ok(Self::from_secret(completion));
                }
            }
        }

        let endpoint = env::var("AZURE_OPENAI_ENDPOINT").map_err(|_| {
            CompletionError::Config(
                "AZURE_OPENAI_ENDPOINT not found in ~/.config/gapscan/secret.json or environment"
                    .into(),
            )
        })?;
        let api_key = env::var("AZURE_OPENAI_KEY").map_err(|_| {
            CompletionError::Config(
                "AZURE_OPENAI_KEY not found in ~/.config/gapscan/secret.json or environment".into(),
            )
        })?;

        let mut agent = Self::new(endpoint, api_key);
        if let Ok(deployment) = env::var("AZURE_OPENAI_DEPLOYMENT") {
            agent.deployment = deployment;
        }
        if let Ok(api_version) = env::var("AZURE_OPENAI_API_VERSION") {
            agent.api_version = api_version;
        }
        Ok(agent)
    }

    fn from_secret(secret: CompletionSecretConfig) -> Self {
        let mut agent = Self::new(secret.endpoint, secret.api_key);
        if let Some(deployment) = secret.deployment {
            agent.deployment = deployment;
        }
        if let Some(api_version) = secret.api_version {
            agent.api_version = api_version;
        }
        agent
    }

    /// Overrides the deployment after construction.
    pub fn with_deployment(mut self, deployment: impl Into<String>) -> Self {
        self.deployment = deployment.into();
        self
    }

    fn request_url(&self) -> String {
        format!(
            "{}/openai/deployments/{}/chat/completions?api-version={}",
            self.endpoint, self.deployment, self.api_version
        )
    }

    async fn send_request(&self, body: &ChatCompletionRequest) -> Result<String, CompletionError> {
        let response = self
            .client
            .post(self.request_url())
            .header("api-key", &self.api_key)
            .header("content-type", "application/json")
            .json(body)
            .send()
            .await
            .map_err(|err| {
                if err.is_timeout() || err.is_connect() {
                    CompletionError::ServerError {
                        status: None,
                        message: format!("completion request failed: {err}"),
                    }
                } else {
                    CompletionError::Other(format!("completion request failed: {err}"))
                }
            })?;

        if !response.status().is_success() {
            let status = response.status();
            let body_text = response
                .text()
                .await
                .unwrap_or_else(|_| "failed to read error body".to_string());
            return Err(map_http_error(status, body_text));
        }

        let parsed: ChatCompletionResponse = response.json().await.map_err(|err| {
            CompletionError::Other(format!("failed to parse completion response: {err}"))
        })?;

        extract_text_response(parsed)
    }
}

#[async_trait]
impl CompletionAgent for AzureCompletionAgent {
    async fn complete(
        &self,
        system_prompt: &str,
        user_prompt: &str,
        tuning: CompletionTuning,
    ) -> Result<String, CompletionError> {
        let request = ChatCompletionRequest {
            messages: vec![
                ChatMessage {
                    role: "system",
                    content: system_prompt.to_string(),
                },
                ChatMessage {
                    role: "user",
                    content: user_prompt.to_string(),
                },
            ],
            max_tokens: tuning.max_tokens,
            temperature: tuning.temperature,
            top_p: tuning.top_p,
        };

        self.send_request(&request).await
    }
}

#[derive(Serialize)]
struct ChatCompletionRequest {
    messages: Vec<ChatMessage>,
    max_tokens: u32,
    temperature: f32,
    top_p: f32,
}

#[derive(Serialize)]
struct ChatMessage {
    role: &'static str,
    content: String,
}

#[derive(Deserialize)]
struct ChatCompletionResponse {
    #[serde(default)]
    choices: Vec<Choice>,
}

#[derive(Deserialize)]
struct Choice {
    message: ResponseMessage,
}

#[derive(Deserialize)]
struct ResponseMessage {
    content: Option<String>,
}

#[derive(Deserialize)]
struct ErrorResponse {
    error: ErrorBody,
}

#[derive(Deserialize)]
struct ErrorBody {
    message: String,
}

fn extract_text_response(response: ChatCompletionResponse) -> Result<String, CompletionError> {
    response
        .choices
        .into_iter()
        .next()
        .and_then(|choice| choice.message.content)
        .filter(|content| !content.trim().is_empty())
        .ok_or(CompletionError::EmptyResponse)
}

fn map_http_error(status: StatusCode, body: String) -> CompletionError {
    let message = serde_json::from_str::<ErrorResponse>(&body)
        .map(|wrapper| wrapper.error.message)
        .unwrap_or(body);

    match status {
        StatusCode::TOO_MANY_REQUESTS => CompletionError::RateLimited { message },
        StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => CompletionError::Config(message),
        StatusCode::BAD_REQUEST => CompletionError::InvalidRequest(message),
        s if s.is_server_error() => CompletionError::ServerError {
            status: Some(s.as_u16()),
            message,
        },
        s => CompletionError::Other(format!("HTTP {}: {}", s.as_u16(), message)),
    }
}
