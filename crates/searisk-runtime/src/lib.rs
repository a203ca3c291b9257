//! # searisk-runtime
//!
//! Everything in the assessment path that performs I/O: the reasoning
//! providers, the weather and news sources, and the orchestrator that ties
//! them to the pure validation and context code in `searisk-core`.
//!
//! ## Example
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use searisk_runtime::{AssessmentOrchestratorBuilder, ProviderRegistry};
//!
//! let registry = ProviderRegistry::with_defaults();
//! let reasoning = registry.create("xai", &serde_json::json!({}))?;
//!
//! let orchestrator = AssessmentOrchestratorBuilder::new()
//!     .reasoning(reasoning)
//!     .build()?;
//!
//! let strategies = orchestrator.assess_mitigation(&body).await?;
//! ```

pub mod orchestrator;
pub mod output;
pub mod prompts;
pub mod providers;
pub mod sources;

pub use orchestrator::{
    AssessmentError, AssessmentOrchestrator, AssessmentOrchestratorBuilder, HealthReport,
};
pub use output::{extract_json, parse_output, OutputError};
pub use providers::{
    ApiCredential, ChatMessage, ProviderError, ProviderFactory, ProviderRegistry,
    ReasoningConfig, ReasoningProvider, ReasoningResponse, TokenUsage,
};
pub use sources::{
    GeopoliticalDataProvider, NewsApiProvider, RouteIntelligence, RouteQuery, SourceError,
    WeatherApiProvider, WeatherProvider,
};
