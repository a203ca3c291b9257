//! OpenAI-compatible chat completion provider.
//!
//! Serves both OpenAI and xAI (Grok), which share the
//! `POST {base_url}/chat/completions` wire format with bearer auth.

use super::{
    factory::{validate_base_url, ProviderFactory},
    http_client, retry_after,
    secrets::{ApiCredential, CredentialSource},
    ChatMessage, ProviderError, ReasoningConfig, ReasoningProvider, ReasoningResponse,
    TokenUsage,
};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;
use std::sync::Arc;
use std::time::Duration;

pub const OPENAI_API_KEY_ENV: &str = "OPENAI_API_KEY";
pub const XAI_API_KEY_ENV: &str = "XAI_API_KEY";

/// Connection details that distinguish one OpenAI-compatible vendor from another.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Vendor {
    pub name: &'static str,
    pub credential_name: &'static str,
    pub env_var: &'static str,
    pub base_url: &'static str,
    pub default_model: &'static str,
}

pub const OPENAI: Vendor = Vendor {
    name: "openai",
    credential_name: "OpenAI API key",
    env_var: OPENAI_API_KEY_ENV,
    base_url: "https://api.openai.com/v1",
    default_model: "gpt-4",
};

pub const XAI: Vendor = Vendor {
    name: "xai",
    credential_name: "xAI API key",
    env_var: XAI_API_KEY_ENV,
    base_url: "https://api.x.ai/v1",
    default_model: "grok-3",
};

/// Chat completion provider for OpenAI-compatible APIs.
pub struct OpenAiCompatibleProvider {
    vendor: Vendor,
    credential: ApiCredential,
    base_url: String,
    default_model: String,
    client: reqwest::Client,
}

impl std::fmt::Debug for OpenAiCompatibleProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OpenAiCompatibleProvider")
            .field("vendor", &self.vendor.name)
            .field("credential", &self.credential)
            .field("base_url", &self.base_url)
            .field("default_model", &self.default_model)
            .finish()
    }
}

impl OpenAiCompatibleProvider {
    /// Create a provider with an explicit API key.
    pub fn new(vendor: Vendor, api_key: impl Into<String>) -> Self {
        Self {
            vendor,
            credential: ApiCredential::new(
                api_key,
                CredentialSource::Programmatic,
                vendor.credential_name,
            ),
            base_url: vendor.base_url.to_string(),
            default_model: vendor.default_model.to_string(),
            client: reqwest::Client::new(),
        }
    }

    /// Create from JSON configuration with environment fallback.
    ///
    /// Recognized keys: `api_key`, `base_url`, `model`, `timeout_secs`.
    pub fn from_config(vendor: Vendor, config: &JsonValue) -> Result<Self, ProviderError> {
        let credential = ApiCredential::from_config_or_env(
            config,
            "api_key",
            vendor.env_var,
            vendor.credential_name,
        )?;

        let base_url = config["base_url"]
            .as_str()
            .unwrap_or(vendor.base_url)
            .trim_end_matches('/')
            .to_string();

        let default_model = config["model"]
            .as_str()
            .unwrap_or(vendor.default_model)
            .to_string();

        let timeout = config["timeout_secs"]
            .as_u64()
            .map(Duration::from_secs)
            .unwrap_or(Duration::from_secs(60));

        Ok(Self {
            vendor,
            credential,
            base_url,
            default_model,
            client: http_client(timeout)?,
        })
    }

    /// Set custom base URL.
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }
}

#[derive(Debug, Serialize)]
struct CompletionRequest<'a> {
    model: &'a str,
    messages: &'a [ChatMessage],
    temperature: f32,
    max_tokens: u32,
}

#[derive(Debug, Deserialize)]
struct CompletionBody {
    choices: Vec<Choice>,
    #[serde(default)]
    model: Option<String>,
    #[serde(default)]
    usage: Option<Usage>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: ChoiceMessage,
    #[serde(default)]
    finish_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ChoiceMessage {
    #[serde(default)]
    content: Option<String>,
}

#[derive(Debug, Deserialize)]
struct Usage {
    #[serde(default)]
    prompt_tokens: u32,
    #[serde(default)]
    completion_tokens: u32,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    error: ErrorDetail,
}

#[derive(Debug, Deserialize)]
struct ErrorDetail {
    message: String,
}

#[async_trait]
impl ReasoningProvider for OpenAiCompatibleProvider {
    async fn reason(
        &self,
        messages: Vec<ChatMessage>,
        config: &ReasoningConfig,
    ) -> Result<ReasoningResponse, ProviderError> {
        let model = config.model_or(&self.default_model);
        let request = CompletionRequest {
            model,
            messages: &messages,
            temperature: config.temperature,
            max_tokens: config.max_tokens,
        };

        let response = self
            .client
            .post(format!("{}/chat/completions", self.base_url))
            .bearer_auth(self.credential.expose())
            .timeout(config.timeout)
            .json(&request)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    ProviderError::Timeout(config.timeout)
                } else {
                    ProviderError::HttpError(e.to_string())
                }
            })?;

        let status = response.status();

        if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
            return Err(ProviderError::RateLimited {
                retry_after: retry_after(response.headers()),
            });
        }
        if status == reqwest::StatusCode::UNAUTHORIZED || status == reqwest::StatusCode::FORBIDDEN
        {
            return Err(ProviderError::AuthError);
        }
        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            let message = serde_json::from_str::<ErrorBody>(&text)
                .map(|b| b.error.message)
                .unwrap_or(text);
            return Err(ProviderError::ApiError {
                status: status.as_u16(),
                message,
            });
        }

        let body: CompletionBody = response
            .json()
            .await
            .map_err(|e| ProviderError::ParseError(e.to_string()))?;

        let choice = body
            .choices
            .into_iter()
            .next()
            .ok_or_else(|| ProviderError::ParseError("response contained no choices".to_string()))?;

        let usage = body
            .usage
            .map(|u| TokenUsage {
                prompt_tokens: u.prompt_tokens,
                completion_tokens: u.completion_tokens,
            })
            .unwrap_or_default();

        tracing::debug!(
            provider = self.vendor.name,
            total_tokens = usage.total(),
            "Chat completion finished"
        );

        Ok(ReasoningResponse {
            content: choice.message.content.unwrap_or_default(),
            usage,
            model: body.model.unwrap_or_else(|| model.to_string()),
            stop_reason: choice.finish_reason,
        })
    }

    async fn health_check(&self) -> bool {
        !self.credential.is_empty()
    }

    fn name(&self) -> &str {
        self.vendor.name
    }
}

fn validate_vendor_config(vendor: Vendor, config: &JsonValue) -> Result<(), ProviderError> {
    if !ApiCredential::is_available(config, "api_key", vendor.env_var) {
        return Err(ProviderError::NotConfigured(format!(
            "{} required: set 'api_key' in config or {} env",
            vendor.credential_name, vendor.env_var
        )));
    }
    validate_base_url(config)
}

/// Factory for OpenAI providers.
///
/// ```json
/// { "api_key": "sk-...", "base_url": "https://...", "model": "gpt-4" }
/// ```
pub struct OpenAiProviderFactory;

impl ProviderFactory for OpenAiProviderFactory {
    fn provider_type(&self) -> &'static str {
        OPENAI.name
    }

    fn create(&self, config: &JsonValue) -> Result<Arc<dyn ReasoningProvider>, ProviderError> {
        Ok(Arc::new(OpenAiCompatibleProvider::from_config(OPENAI, config)?))
    }

    fn validate_config(&self, config: &JsonValue) -> Result<(), ProviderError> {
        validate_vendor_config(OPENAI, config)
    }

    fn default_config(&self) -> JsonValue {
        serde_json::json!({ "model": OPENAI.default_model, "base_url": OPENAI.base_url })
    }

    fn description(&self) -> &'static str {
        "OpenAI chat completions"
    }
}

/// Factory for xAI (Grok) providers.
pub struct XaiProviderFactory;

impl ProviderFactory for XaiProviderFactory {
    fn provider_type(&self) -> &'static str {
        XAI.name
    }

    fn create(&self, config: &JsonValue) -> Result<Arc<dyn ReasoningProvider>, ProviderError> {
        Ok(Arc::new(OpenAiCompatibleProvider::from_config(XAI, config)?))
    }

    fn validate_config(&self, config: &JsonValue) -> Result<(), ProviderError> {
        validate_vendor_config(XAI, config)
    }

    fn default_config(&self) -> JsonValue {
        serde_json::json!({ "model": XAI.default_model, "base_url": XAI.base_url })
    }

    fn description(&self) -> &'static str {
        "xAI Grok chat completions"
    }
}
