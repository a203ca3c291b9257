//! Service configuration.
//!
//! Loaded once at startup from flags and environment (a `.env` file is read
//! first by `main`). API keys are not flags: each provider reads its own key
//! through `ApiCredential` so it never shows up in argument dumps.

use clap::Parser;
use serde_json::{json, Value};
use std::net::SocketAddr;
use std::time::Duration;
use thiserror::Error;

use searisk_runtime::{ProviderError, ProviderRegistry, ReasoningConfig};

/// Errors in service configuration. Fatal at startup.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Invalid configuration: {0}")]
    Invalid(String),

    #[error(transparent)]
    Provider(#[from] ProviderError),
}

/// Shipping route risk assessment service.
#[derive(Parser, Debug, Clone)]
#[command(name = "searisk", version, about)]
pub struct ServiceConfig {
    /// Address to bind
    #[arg(long, env = "HOST", default_value = "0.0.0.0")]
    pub host: String,

    /// Port to listen on
    #[arg(long, env = "PORT", default_value_t = 8000)]
    pub port: u16,

    /// Reasoning backend: openai, xai or anthropic
    #[arg(long, env = "REASONING_PROVIDER", default_value = "openai")]
    pub reasoning_provider: String,

    /// Model override; the backend's default when unset
    #[arg(long, env = "REASONING_MODEL")]
    pub reasoning_model: Option<String>,

    /// Base URL override for the reasoning backend
    #[arg(long, env = "REASONING_BASE_URL")]
    pub reasoning_base_url: Option<String>,

    #[arg(long, env = "REASONING_TEMPERATURE", default_value_t = 0.3)]
    pub temperature: f32,

    #[arg(long, env = "REASONING_MAX_TOKENS", default_value_t = 2000)]
    pub max_tokens: u32,

    /// Ceiling on each reasoning call, e.g. "60s" or "2m"
    #[arg(long, env = "REASONING_TIMEOUT", default_value = "60s", value_parser = humantime::parse_duration)]
    pub reasoning_timeout: Duration,

    /// HTTP timeout for the weather and news sources
    #[arg(long, env = "WEATHER_TIMEOUT", default_value = "30s", value_parser = humantime::parse_duration)]
    pub source_timeout: Duration,

    /// Verbose logging
    #[arg(long, env = "DEBUG")]
    pub debug: bool,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8000,
            reasoning_provider: "openai".to_string(),
            reasoning_model: None,
            reasoning_base_url: None,
            temperature: 0.3,
            max_tokens: 2000,
            reasoning_timeout: Duration::from_secs(60),
            source_timeout: Duration::from_secs(30),
            debug: false,
        }
    }
}

impl ServiceConfig {
    /// Check everything that would otherwise fail on the first request.
    ///
    /// # Arguments
    /// * `registry` - Registry the reasoning provider will be created from
    pub fn validate(&self, registry: &ProviderRegistry) -> Result<(), ConfigError> {
        if !(0.0..=2.0).contains(&self.temperature) {
            return Err(ConfigError::Invalid(format!(
                "temperature must be between 0.0 and 2.0, got {}",
                self.temperature
            )));
        }
        if self.max_tokens == 0 {
            return Err(ConfigError::Invalid("max tokens must be positive".to_string()));
        }
        if self.reasoning_timeout.is_zero() {
            return Err(ConfigError::Invalid("reasoning timeout must be positive".to_string()));
        }
        if self.source_timeout.is_zero() {
            return Err(ConfigError::Invalid("source timeout must be positive".to_string()));
        }
        self.socket_addr()?;

        registry.validate(&self.reasoning_provider, &self.provider_json())?;
        Ok(())
    }

    /// Factory configuration for the reasoning provider.
    pub fn provider_json(&self) -> Value {
        let mut config = json!({ "timeout_secs": self.reasoning_timeout.as_secs().max(1) });
        if let Some(model) = &self.reasoning_model {
            config["model"] = json!(model);
        }
        if let Some(url) = &self.reasoning_base_url {
            config["base_url"] = json!(url);
        }
        config
    }

    /// Configuration shared by the weather and news sources.
    pub fn source_json(&self) -> Value {
        json!({ "timeout_secs": self.source_timeout.as_secs().max(1) })
    }

    pub fn reasoning_config(&self) -> ReasoningConfig {
        ReasoningConfig {
            model: self.reasoning_model.clone().unwrap_or_default(),
            max_tokens: self.max_tokens,
            temperature: self.temperature,
            timeout: self.reasoning_timeout,
        }
    }

    pub fn socket_addr(&self) -> Result<SocketAddr, ConfigError> {
        format!("{}:{}", self.host, self.port)
            .parse()
            .map_err(|e| ConfigError::Invalid(format!("invalid bind address: {}", e)))
    }

    /// Default tracing filter when `RUST_LOG` is unset.
    pub fn log_filter(&self) -> &'static str {
        if self.debug {
            "searisk=debug,searisk_server=debug,searisk_runtime=debug,searisk_core=debug,tower_http=debug"
        } else {
            "searisk=info,searisk_server=info,searisk_runtime=info,tower_http=info"
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn with_key() -> ServiceConfig {
        ServiceConfig {
            reasoning_provider: "anthropic".to_string(),
            reasoning_base_url: Some("https://proxy.internal/v1".to_string()),
            ..Default::default()
        }
    }

    #[test]
    fn test_parse_defaults() {
        let config = ServiceConfig::try_parse_from(["searisk"]).unwrap();
        assert_eq!(config.port, 8000);
        assert_eq!(config.reasoning_timeout, Duration::from_secs(60));
        assert!((config.temperature - 0.3).abs() < f32::EPSILON);
    }

    #[test]
    fn test_parse_humantime() {
        let config =
            ServiceConfig::try_parse_from(["searisk", "--reasoning-timeout", "2m"]).unwrap();
        assert_eq!(config.reasoning_timeout, Duration::from_secs(120));
        assert!(ServiceConfig::try_parse_from(["searisk", "--reasoning-timeout", "soon"]).is_err());
    }

    #[test]
    fn test_temperature_out_of_range() {
        let config = ServiceConfig {
            temperature: 2.5,
            ..with_key()
        };
        let err = config.validate(&ProviderRegistry::with_defaults()).unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(_)));
    }

    #[test]
    fn test_zero_max_tokens() {
        let config = ServiceConfig {
            max_tokens: 0,
            ..with_key()
        };
        assert!(config.validate(&ProviderRegistry::with_defaults()).is_err());
    }

    #[test]
    fn test_unknown_provider() {
        let config = ServiceConfig {
            reasoning_provider: "mystery".to_string(),
            ..Default::default()
        };
        let err = config.validate(&ProviderRegistry::with_defaults()).unwrap_err();
        assert!(matches!(err, ConfigError::Provider(_)));
    }

    #[test]
    fn test_provider_json() {
        let config = ServiceConfig {
            reasoning_model: Some("grok-3".to_string()),
            ..with_key()
        };
        let json = config.provider_json();
        assert_eq!(json["model"], "grok-3");
        assert_eq!(json["base_url"], "https://proxy.internal/v1");
        assert_eq!(json["timeout_secs"], 60);
    }

    #[test]
    fn test_reasoning_config() {
        let rc = ServiceConfig::default().reasoning_config();
        assert!(rc.model.is_empty());
        assert_eq!(rc.max_tokens, 2000);
    }

    #[test]
    fn test_bad_host() {
        let config = ServiceConfig {
            host: "not a host".to_string(),
            ..Default::default()
        };
        assert!(config.socket_addr().is_err());
    }
}
