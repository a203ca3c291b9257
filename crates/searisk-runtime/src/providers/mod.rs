//! Reasoning provider abstractions for searisk-runtime.
//!
//! This module defines the trait for the external reasoning capability and
//! includes implementations for OpenAI-compatible chat completion APIs
//! (OpenAI, xAI) and Anthropic.
//!
//! ## Security
//!
//! All providers use the [`secrets`] module for credential handling.
//! See [`ApiCredential`].

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use thiserror::Error;

mod anthropic;
mod factory;
mod openai;
pub mod secrets;

pub use anthropic::{AnthropicProvider, AnthropicProviderFactory, ANTHROPIC_API_KEY_ENV};
pub use factory::{ProviderFactory, ProviderRegistry};
pub use openai::{
    OpenAiCompatibleProvider, OpenAiProviderFactory, Vendor, XaiProviderFactory, OPENAI,
    OPENAI_API_KEY_ENV, XAI, XAI_API_KEY_ENV,
};
pub use secrets::{ApiCredential, CredentialSource};

/// Errors from reasoning providers.
#[derive(Error, Debug)]
pub enum ProviderError {
    #[error("HTTP request failed: {0}")]
    HttpError(String),

    #[error("Rate limit exceeded, retry after {retry_after:?}")]
    RateLimited { retry_after: Option<Duration> },

    #[error("API error: {status} - {message}")]
    ApiError { status: u16, message: String },

    #[error("JSON parse error: {0}")]
    ParseError(String),

    #[error("Authentication failed")]
    AuthError,

    #[error("Timeout after {0:?}")]
    Timeout(Duration),

    #[error("Provider not configured: {0}")]
    NotConfigured(String),
}

/// Settings for a single reasoning request.
#[derive(Debug, Clone, PartialEq)]
pub struct ReasoningConfig {
    /// Model to use; empty selects the provider's default
    pub model: String,

    /// Maximum tokens to generate
    pub max_tokens: u32,

    /// Sampling temperature, 0.0 to 2.0
    pub temperature: f32,

    /// Ceiling on the wait for a response
    pub timeout: Duration,
}

impl Default for ReasoningConfig {
    fn default() -> Self {
        Self {
            model: String::new(),
            max_tokens: 2000,
            temperature: 0.3,
            timeout: Duration::from_secs(60),
        }
    }
}

impl ReasoningConfig {
    /// The configured model, or `fallback` when none is set.
    pub fn model_or<'a>(&'a self, fallback: &'a str) -> &'a str {
        if self.model.is_empty() {
            fallback
        } else {
            &self.model
        }
    }
}

/// A chat message sent to the reasoning provider.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatMessage {
    /// Role: "system", "user", or "assistant"
    pub role: String,

    /// Message content
    pub content: String,
}

impl ChatMessage {
    /// Create a system message.
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: "system".to_string(),
            content: content.into(),
        }
    }

    /// Create a user message.
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: "user".to_string(),
            content: content.into(),
        }
    }
}

/// Raw response from a reasoning provider.
#[derive(Debug, Clone)]
pub struct ReasoningResponse {
    /// Generated text, possibly wrapping a JSON document
    pub content: String,

    pub usage: TokenUsage,

    /// Model that actually served the request
    pub model: String,

    pub stop_reason: Option<String>,
}

/// Token usage reported by a provider.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TokenUsage {
    pub prompt_tokens: u32,
    pub completion_tokens: u32,
}

impl TokenUsage {
    /// Total tokens used.
    pub fn total(&self) -> u32 {
        self.prompt_tokens + self.completion_tokens
    }
}

/// The external reasoning capability.
///
/// Every reasoning call the service makes goes through this trait, so the
/// orchestrator can be exercised with deterministic stand-ins.
#[async_trait]
pub trait ReasoningProvider: Send + Sync {
    /// Send a conversation and return the provider's reply.
    async fn reason(
        &self,
        messages: Vec<ChatMessage>,
        config: &ReasoningConfig,
    ) -> Result<ReasoningResponse, ProviderError>;

    /// Check if provider is usable.
    async fn health_check(&self) -> bool;

    /// Provider name for logs and health reports.
    fn name(&self) -> &str;
}

/// Build a reqwest client bounded by `timeout`.
pub(crate) fn http_client(timeout: Duration) -> Result<reqwest::Client, ProviderError> {
    reqwest::Client::builder()
        .timeout(timeout)
        .build()
        .map_err(|e| ProviderError::HttpError(e.to_string()))
}

/// Parse a `retry-after` header given in seconds.
pub(crate) fn retry_after(headers: &reqwest::header::HeaderMap) -> Option<Duration> {
    headers
        .get("retry-after")
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.parse::<u64>().ok())
        .map(Duration::from_secs)
}
