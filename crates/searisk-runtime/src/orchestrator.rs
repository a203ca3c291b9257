//! Request orchestrator for shipping risk assessments.
//!
//! Every variant follows the same five steps:
//! 1. Validate the body (no external call happens before this succeeds)
//! 2. Fetch variant data (port weather or route news), if any
//! 3. Build the reasoning context
//! 4. Ask the reasoning provider, bounded by the configured timeout
//! 5. Recover and schema-check the structured reply
//!
//! The orchestrator holds no mutable state and is shared behind `Arc`.

use chrono::{NaiveDate, Utc};
use serde_json::Value;
use std::sync::Arc;
use thiserror::Error;

use searisk_core::{
    country_profile, ContextBuilder, FieldIssue, GeopoliticalRiskOutput,
    GeopoliticalRiskResponse, MitigationResponse, RequestVariant, RouteAnalysis, SchemaDocument,
    SchemaError, ShippingRiskRequest, WeatherRiskOutput, WeatherRiskResponse,
};

use crate::output::parse_output;
use crate::prompts;
use crate::providers::{ProviderError, ReasoningConfig, ReasoningProvider};
use crate::sources::{GeopoliticalDataProvider, RouteQuery, SourceError, WeatherProvider};

/// Errors from an assessment.
///
/// Upstream variants deliberately carry no provider detail; that is logged
/// where it happens and never reaches the caller.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum AssessmentError {
    #[error("Validation failed with {} issue(s)", .0.len())]
    Validation(Vec<FieldIssue>),

    #[error("Upstream service is unavailable")]
    UpstreamUnavailable,

    #[error("Upstream service timed out")]
    UpstreamTimeout,

    #[error("Upstream service returned an unusable response")]
    UpstreamFormat,

    #[error("Service not configured: {0}")]
    Configuration(String),
}

impl AssessmentError {
    /// Stable error category reported to callers.
    pub fn error_type(&self) -> &'static str {
        match self {
            AssessmentError::Validation(_) => "ValidationError",
            AssessmentError::UpstreamUnavailable => "UpstreamUnavailableError",
            AssessmentError::UpstreamTimeout => "UpstreamTimeoutError",
            AssessmentError::UpstreamFormat => "UpstreamFormatError",
            AssessmentError::Configuration(_) => "ConfigurationError",
        }
    }
}

impl From<SchemaError> for AssessmentError {
    fn from(e: SchemaError) -> Self {
        match e {
            SchemaError::Invalid(issues) => AssessmentError::Validation(issues),
            SchemaError::LoadError(msg) => AssessmentError::Configuration(msg),
        }
    }
}

impl From<SourceError> for AssessmentError {
    fn from(e: SourceError) -> Self {
        match e {
            SourceError::Timeout(_) => AssessmentError::UpstreamTimeout,
            SourceError::NotConfigured(msg) => AssessmentError::Configuration(msg),
            SourceError::Unavailable(_) | SourceError::RateLimited { .. } => {
                AssessmentError::UpstreamUnavailable
            }
        }
    }
}

impl From<ProviderError> for AssessmentError {
    fn from(e: ProviderError) -> Self {
        match e {
            ProviderError::Timeout(_) => AssessmentError::UpstreamTimeout,
            ProviderError::ParseError(_) => AssessmentError::UpstreamFormat,
            ProviderError::NotConfigured(msg) => AssessmentError::Configuration(msg),
            ProviderError::HttpError(_)
            | ProviderError::RateLimited { .. }
            | ProviderError::ApiError { .. }
            | ProviderError::AuthError => AssessmentError::UpstreamUnavailable,
        }
    }
}

/// Health of each configured collaborator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HealthReport {
    pub reasoning: bool,

    /// `None` when no weather provider is configured
    pub weather: Option<bool>,

    /// `None` when no news provider is configured
    pub news: Option<bool>,
}

impl HealthReport {
    /// True when every configured collaborator is healthy.
    pub fn is_healthy(&self) -> bool {
        self.reasoning && self.weather.unwrap_or(true) && self.news.unwrap_or(true)
    }
}

/// Coordinates validation, data sources and the reasoning provider.
pub struct AssessmentOrchestrator {
    reasoning: Arc<dyn ReasoningProvider>,
    weather: Option<Arc<dyn WeatherProvider>>,
    news: Option<Arc<dyn GeopoliticalDataProvider>>,
    config: ReasoningConfig,

    /// Source of "today" for the departure window
    clock: fn() -> NaiveDate,
}

fn utc_today() -> NaiveDate {
    Utc::now().date_naive()
}

impl AssessmentOrchestrator {
    /// Create an orchestrator with only a reasoning provider.
    pub fn new(reasoning: Arc<dyn ReasoningProvider>, config: ReasoningConfig) -> Self {
        Self {
            reasoning,
            weather: None,
            news: None,
            config,
            clock: utc_today,
        }
    }

    pub fn config(&self) -> &ReasoningConfig {
        &self.config
    }

    /// Validate a body for `variant` against today's date.
    pub fn validate(
        &self,
        body: &Value,
        variant: RequestVariant,
    ) -> Result<ShippingRiskRequest, AssessmentError> {
        ShippingRiskRequest::from_value(body, variant, (self.clock)()).map_err(|e| {
            tracing::debug!(variant = ?variant, error = %e, "Request rejected");
            AssessmentError::from(e)
        })
    }

    /// Mitigation strategies for a route with both assessments supplied.
    ///
    /// # Arguments
    /// * `body` - Untyped request body
    ///
    /// # Returns
    /// Strategies recommended by the reasoning provider.
    pub async fn assess_mitigation(&self, body: &Value) -> Result<MitigationResponse, AssessmentError> {
        let request = self.validate(body, RequestVariant::Mitigation)?;
        tracing::info!(route = %request.route(), variant = "mitigation", "Assessing shipping risk");

        let context = ContextBuilder::for_request(&request).build();
        self.reason(RequestVariant::Mitigation, &context, SchemaDocument::MitigationResponse)
            .await
    }

    /// Weather risk from conditions observed at both ports.
    pub async fn assess_weather(&self, body: &Value) -> Result<WeatherRiskResponse, AssessmentError> {
        let request = self.validate(body, RequestVariant::Weather)?;
        tracing::info!(route = %request.route(), variant = "weather", "Assessing shipping risk");

        let provider = self.weather.as_ref().ok_or_else(|| {
            AssessmentError::Configuration("weather data provider not configured".to_string())
        })?;

        let (departure, destination) = futures::try_join!(
            provider.fetch(&request.departure_port, request.departure_date),
            provider.fetch(&request.destination_port, request.departure_date),
        )
        .map_err(|e| {
            tracing::warn!(provider = provider.name(), error = %e, "Weather lookup failed");
            AssessmentError::from(e)
        })?;

        let context = ContextBuilder::for_request(&request)
            .observed_weather(&departure, &destination)
            .build();
        let output: WeatherRiskOutput = self
            .reason(RequestVariant::Weather, &context, SchemaDocument::WeatherRiskOutput)
            .await?;

        Ok(WeatherRiskResponse::from_output(
            output,
            departure,
            destination,
            Utc::now(),
        ))
    }

    /// Geopolitical risk from recent route news.
    pub async fn assess_geopolitical(
        &self,
        body: &Value,
    ) -> Result<GeopoliticalRiskResponse, AssessmentError> {
        let request = self.validate(body, RequestVariant::Geopolitical)?;
        tracing::info!(route = %request.route(), variant = "geopolitical", "Assessing shipping risk");

        let provider = self.news.as_ref().ok_or_else(|| {
            AssessmentError::Configuration("news data provider not configured".to_string())
        })?;

        let analysis = RouteAnalysis::for_request(&request);
        let departure_risk = country_profile(&analysis.departure_country, &request.goods_type);
        let destination_risk = country_profile(&analysis.destination_country, &request.goods_type);

        let query = RouteQuery::from(&request).with_chokepoints(&analysis.chokepoints);
        let intel = provider.fetch(&query).await.map_err(|e| {
            tracing::warn!(provider = provider.name(), error = %e, "News lookup failed");
            AssessmentError::from(e)
        })?;

        let context = ContextBuilder::for_request(&request)
            .route_analysis(&analysis, &departure_risk, &destination_risk)
            .route_intelligence(&intel.chokepoints, &intel.security_zones, &intel.events)
            .build();
        let output: GeopoliticalRiskOutput = self
            .reason(
                RequestVariant::Geopolitical,
                &context,
                SchemaDocument::GeopoliticalRiskOutput,
            )
            .await?;

        let intel = intel.with_route(&analysis);
        Ok(GeopoliticalRiskResponse {
            risk_score: output.risk_score,
            risk_description: output.risk_description,
            geopolitical_summary: output.geopolitical_summary,
            chokepoints: intel.chokepoints,
            security_zones: intel.security_zones,
            shipping_lanes: output.shipping_lanes,
            departure_country_risk: departure_risk,
            destination_country_risk: destination_risk,
            travel_days: analysis.travel_days,
            route_analysis: analysis,
            recent_events: intel.events,
            assessment_timestamp: Utc::now(),
        })
    }

    /// One bounded reasoning call, then structured output recovery.
    async fn reason<T: serde::de::DeserializeOwned>(
        &self,
        variant: RequestVariant,
        context: &str,
        document: SchemaDocument,
    ) -> Result<T, AssessmentError> {
        let messages = prompts::conversation(variant, context);
        let provider = self.reasoning.name();
        tracing::debug!(
            provider,
            variant = ?variant,
            prompt_chars = messages.iter().map(|m| m.content.len()).sum::<usize>(),
            "Sending reasoning request"
        );

        let timeout = self.config.timeout;
        let response = match tokio::time::timeout(timeout, self.reasoning.reason(messages, &self.config)).await {
            Ok(Ok(response)) => response,
            Ok(Err(e)) => {
                tracing::warn!(provider, error = %e, "Reasoning request failed");
                return Err(e.into());
            }
            Err(_) => {
                tracing::warn!(provider, timeout = ?timeout, "Reasoning request timed out");
                return Err(AssessmentError::UpstreamTimeout);
            }
        };

        tracing::debug!(
            provider,
            model = %response.model,
            tokens = response.usage.total(),
            "Reasoning response received"
        );

        parse_output(&response.content, document).map_err(|e| {
            tracing::warn!(provider, error = %e, "Reasoning output rejected");
            AssessmentError::UpstreamFormat
        })
    }

    /// Health-check every configured collaborator concurrently.
    pub async fn health(&self) -> HealthReport {
        let weather = async {
            match &self.weather {
                Some(w) => Some(w.health_check().await),
                None => None,
            }
        };
        let news = async {
            match &self.news {
                Some(n) => Some(n.health_check().await),
                None => None,
            }
        };

        let (reasoning, weather, news) =
            tokio::join!(self.reasoning.health_check(), weather, news);

        HealthReport {
            reasoning,
            weather,
            news,
        }
    }
}

/// Builder for AssessmentOrchestrator.
pub struct AssessmentOrchestratorBuilder {
    reasoning: Option<Arc<dyn ReasoningProvider>>,
    weather: Option<Arc<dyn WeatherProvider>>,
    news: Option<Arc<dyn GeopoliticalDataProvider>>,
    config: ReasoningConfig,
    clock: fn() -> NaiveDate,
}

impl AssessmentOrchestratorBuilder {
    /// Create a new builder.
    pub fn new() -> Self {
        Self {
            reasoning: None,
            weather: None,
            news: None,
            config: ReasoningConfig::default(),
            clock: utc_today,
        }
    }

    /// Set the reasoning provider.
    pub fn reasoning(mut self, provider: Arc<dyn ReasoningProvider>) -> Self {
        self.reasoning = Some(provider);
        self
    }

    /// Enable the weather variant.
    pub fn weather(mut self, provider: Arc<dyn WeatherProvider>) -> Self {
        self.weather = Some(provider);
        self
    }

    /// Enable the geopolitical variant.
    pub fn news(mut self, provider: Arc<dyn GeopoliticalDataProvider>) -> Self {
        self.news = Some(provider);
        self
    }

    /// Set the reasoning configuration.
    pub fn config(mut self, config: ReasoningConfig) -> Self {
        self.config = config;
        self
    }

    /// Override the source of today's date.
    pub fn clock(mut self, clock: fn() -> NaiveDate) -> Self {
        self.clock = clock;
        self
    }

    /// Build the orchestrator.
    pub fn build(self) -> Result<AssessmentOrchestrator, AssessmentError> {
        let reasoning = self.reasoning.ok_or_else(|| {
            AssessmentError::Configuration("No reasoning provider set".to_string())
        })?;

        Ok(AssessmentOrchestrator {
            reasoning,
            weather: self.weather,
            news: self.news,
            config: self.config,
            clock: self.clock,
        })
    }
}

impl Default for AssessmentOrchestratorBuilder {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::providers::{ChatMessage, ReasoningResponse, TokenUsage};
    use crate::sources::RouteIntelligence;
    use async_trait::async_trait;
    use searisk_core::{GeopoliticalEvent, IssueKind, WeatherSnapshot};
    use serde_json::json;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;
    use std::time::Duration;

    const MITIGATION_REPLY: &str = r#"{
        "overall_risk_assessment": "Elevated risk from Pacific storms and Strait tensions",
        "recommended_action": "Proceed with weather routing",
        "strategies": [{
            "strategy_type": "Weather Mitigation",
            "priority": "High",
            "description": "Route south of the storm track",
            "implementation_time": "1-2 days",
            "cost_impact": "moderate",
            "risk_reduction": "25-35%"
        }],
        "alternative_routes": ["Via Busan transshipment"],
        "timeline_recommendations": "Depart as planned",
        "compliance_checks": ["ISF-10+2 Importer Security Filing"]
    }"#;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 6, 1).unwrap()
    }

    struct StubReasoner {
        calls: AtomicUsize,
        reply: String,
        delay: Duration,
    }

    impl StubReasoner {
        fn replying(reply: &str) -> Arc<Self> {
            Arc::new(Self {
                calls: AtomicUsize::new(0),
                reply: reply.to_string(),
                delay: Duration::ZERO,
            })
        }

        fn slow(delay: Duration) -> Arc<Self> {
            Arc::new(Self {
                calls: AtomicUsize::new(0),
                reply: MITIGATION_REPLY.to_string(),
                delay,
            })
        }
    }

    #[async_trait]
    impl ReasoningProvider for StubReasoner {
        async fn reason(
            &self,
            _messages: Vec<ChatMessage>,
            _config: &ReasoningConfig,
        ) -> Result<ReasoningResponse, ProviderError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if !self.delay.is_zero() {
                tokio::time::sleep(self.delay).await;
            }
            Ok(ReasoningResponse {
                content: self.reply.clone(),
                usage: TokenUsage::default(),
                model: "stub".to_string(),
                stop_reason: Some("stop".to_string()),
            })
        }

        async fn health_check(&self) -> bool {
            true
        }

        fn name(&self) -> &str {
            "stub"
        }
    }

    struct StubWeather {
        calls: AtomicUsize,
    }

    #[async_trait]
    impl WeatherProvider for StubWeather {
        async fn fetch(&self, port: &str, _date: NaiveDate) -> Result<WeatherSnapshot, SourceError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(WeatherSnapshot {
                conditions: Some(format!("Clear at {}", port)),
                wind_speed_kph: Some(12.0),
                ..Default::default()
            })
        }

        async fn health_check(&self) -> bool {
            false
        }

        fn name(&self) -> &str {
            "stub-weather"
        }
    }

    #[derive(Default)]
    struct StubNews {
        calls: AtomicUsize,
        last_query: Mutex<Option<RouteQuery>>,
    }

    #[async_trait]
    impl GeopoliticalDataProvider for StubNews {
        async fn fetch(&self, route: &RouteQuery) -> Result<RouteIntelligence, SourceError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            *self.last_query.lock().unwrap() = Some(route.clone());
            Ok(RouteIntelligence::from_events(vec![GeopoliticalEvent {
                title: "Naval drills near the Taiwan Strait".to_string(),
                summary: "Traffic through the South China Sea slows".to_string(),
                source: "Wire".to_string(),
                published_at: None,
                url: None,
            }]))
        }

        async fn health_check(&self) -> bool {
            true
        }

        fn name(&self) -> &str {
            "stub-news"
        }
    }

    fn orchestrator(reasoner: Arc<StubReasoner>) -> AssessmentOrchestrator {
        AssessmentOrchestratorBuilder::new()
            .reasoning(reasoner)
            .config(ReasoningConfig {
                timeout: Duration::from_secs(5),
                ..Default::default()
            })
            .clock(today)
            .build()
            .unwrap()
    }

    fn body(date: &str) -> Value {
        json!({
            "departure_port": "Los Angeles",
            "destination_port": "Shanghai",
            "departure_date": date,
            "carrier_name": "Maersk Line",
            "goods_type": "Electronics",
            "weather_conditions": {
                "risk_score": 6,
                "risk_description": "Storm season in the North Pacific",
                "weather_summary": "Strong westerlies",
                "departure_weather": {"temperature": 21.0, "conditions": "Clear"},
                "destination_weather": {"wind_speed": 35.0},
                "estimated_travel_days": 16
            },
            "geopolitical_conditions": {
                "risk_score": 7,
                "risk_description": "Regional naval activity",
                "geopolitical_summary": "Heightened tension",
                "chokepoints": [],
                "security_zones": ["Taiwan Strait"],
                "shipping_lanes": "Trans-Pacific"
            }
        })
    }

    #[tokio::test]
    async fn test_mitigation_success() {
        let reasoner = StubReasoner::replying(MITIGATION_REPLY);
        let response = orchestrator(reasoner.clone())
            .assess_mitigation(&body("2025-07-01"))
            .await
            .unwrap();
        assert!(!response.strategies.is_empty());
        assert_eq!(reasoner.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_past_date_makes_no_external_call() {
        let reasoner = StubReasoner::replying(MITIGATION_REPLY);
        let err = orchestrator(reasoner.clone())
            .assess_mitigation(&body("2025-05-31"))
            .await
            .unwrap_err();

        match err {
            AssessmentError::Validation(issues) => {
                assert!(issues.iter().any(|i| i.kind == IssueKind::DateInPast));
            }
            other => panic!("expected validation error, got {:?}", other),
        }
        assert_eq!(reasoner.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_date_beyond_window_rejected() {
        let reasoner = StubReasoner::replying(MITIGATION_REPLY);
        let err = orchestrator(reasoner.clone())
            .assess_mitigation(&body("2026-06-02"))
            .await
            .unwrap_err();
        assert_eq!(err.error_type(), "ValidationError");
        assert_eq!(reasoner.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_identical_input_identical_output() {
        let orch = orchestrator(StubReasoner::replying(MITIGATION_REPLY));
        let first = orch.assess_mitigation(&body("2025-07-01")).await.unwrap();
        let second = orch.assess_mitigation(&body("2025-07-01")).await.unwrap();
        assert_eq!(
            serde_json::to_string(&first).unwrap(),
            serde_json::to_string(&second).unwrap()
        );
    }

    #[tokio::test(start_paused = true)]
    async fn test_slow_provider_times_out() {
        let err = orchestrator(StubReasoner::slow(Duration::from_secs(30)))
            .assess_mitigation(&body("2025-07-01"))
            .await
            .unwrap_err();
        assert_eq!(err, AssessmentError::UpstreamTimeout);
        assert_eq!(err.error_type(), "UpstreamTimeoutError");
    }

    #[tokio::test]
    async fn test_malformed_output_is_format_error() {
        let err = orchestrator(StubReasoner::replying("Sorry, I can't produce JSON today."))
            .assess_mitigation(&body("2025-07-01"))
            .await
            .unwrap_err();
        assert_eq!(err, AssessmentError::UpstreamFormat);
    }

    #[tokio::test]
    async fn test_fenced_output_accepted() {
        let reply = format!("Here you go:\n```json\n{}\n```", MITIGATION_REPLY);
        let response = orchestrator(StubReasoner::replying(&reply))
            .assess_mitigation(&body("2025-07-01"))
            .await
            .unwrap();
        assert_eq!(response.recommended_action, "Proceed with weather routing");
    }

    #[tokio::test]
    async fn test_weather_variant_fetches_both_ports() {
        let weather = Arc::new(StubWeather {
            calls: AtomicUsize::new(0),
        });
        let reply = r#"{"risk_score": 3, "risk_description": "Calm", "weather_summary": "Light winds", "estimated_travel_days": 15}"#;
        let orch = AssessmentOrchestratorBuilder::new()
            .reasoning(StubReasoner::replying(reply))
            .weather(weather.clone())
            .clock(today)
            .build()
            .unwrap();

        let mut request = body("2025-06-05");
        request.as_object_mut().unwrap().remove("weather_conditions");
        request.as_object_mut().unwrap().remove("geopolitical_conditions");

        let response = orch.assess_weather(&request).await.unwrap();
        assert_eq!(weather.calls.load(Ordering::SeqCst), 2);
        assert_eq!(response.risk_score, 3);
        assert_eq!(
            response.destination_weather.conditions.as_deref(),
            Some("Clear at Shanghai")
        );
    }

    #[tokio::test]
    async fn test_weather_variant_unconfigured() {
        let err = orchestrator(StubReasoner::replying(MITIGATION_REPLY))
            .assess_weather(&body("2025-07-01"))
            .await
            .unwrap_err();
        assert_eq!(err.error_type(), "ConfigurationError");
    }

    const GEOPOLITICAL_REPLY: &str = r#"{"risk_score": 7, "risk_description": "Drills", "geopolitical_summary": "Tense", "shipping_lanes": "Trans-Pacific"}"#;

    fn geopolitical(news: Arc<StubNews>) -> AssessmentOrchestrator {
        AssessmentOrchestratorBuilder::new()
            .reasoning(StubReasoner::replying(GEOPOLITICAL_REPLY))
            .news(news)
            .clock(today)
            .build()
            .unwrap()
    }

    #[tokio::test]
    async fn test_geopolitical_variant_carries_intelligence() {
        let news = Arc::new(StubNews::default());
        let response = geopolitical(news.clone())
            .assess_geopolitical(&body("2025-07-01"))
            .await
            .unwrap();
        assert_eq!(response.chokepoints, vec!["South China Sea"]);
        assert_eq!(response.security_zones, vec!["Taiwan Strait"]);
        assert_eq!(response.recent_events.len(), 1);
        assert_eq!(response.shipping_lanes, "Trans-Pacific");
        assert_eq!(news.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_geopolitical_variant_adds_route_geography() {
        let news = Arc::new(StubNews::default());
        let mut request = body("2025-07-01");
        request["departure_port"] = json!("Rotterdam");
        let response = geopolitical(news.clone())
            .assess_geopolitical(&request)
            .await
            .unwrap();

        assert_eq!(
            response.chokepoints,
            vec!["Suez Canal", "Strait of Malacca", "South China Sea"]
        );
        assert_eq!(response.route_analysis.departure_country, "Netherlands");
        assert_eq!(response.departure_country_risk.country, "Netherlands");
        assert_eq!(response.destination_country_risk.country, "China");
        assert_eq!(response.travel_days, response.route_analysis.travel_days);
        assert!(response.travel_days > 1);

        let query = news.last_query.lock().unwrap().clone().unwrap();
        assert_eq!(query.chokepoints, response.route_analysis.chokepoints);
    }

    #[tokio::test]
    async fn test_weather_past_date_makes_no_source_call() {
        let weather = Arc::new(StubWeather {
            calls: AtomicUsize::new(0),
        });
        let reasoner = StubReasoner::replying(MITIGATION_REPLY);
        let orch = AssessmentOrchestratorBuilder::new()
            .reasoning(reasoner.clone())
            .weather(weather.clone())
            .clock(today)
            .build()
            .unwrap();

        let err = orch.assess_weather(&body("2025-05-31")).await.unwrap_err();
        assert_eq!(err.error_type(), "ValidationError");
        assert_eq!(weather.calls.load(Ordering::SeqCst), 0);
        assert_eq!(reasoner.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_geopolitical_past_date_makes_no_source_call() {
        let news = Arc::new(StubNews::default());
        let err = geopolitical(news.clone())
            .assess_geopolitical(&body("2025-05-31"))
            .await
            .unwrap_err();
        assert_eq!(err.error_type(), "ValidationError");
        assert_eq!(news.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_health_report() {
        let orch = AssessmentOrchestratorBuilder::new()
            .reasoning(StubReasoner::replying(MITIGATION_REPLY))
            .weather(Arc::new(StubWeather {
                calls: AtomicUsize::new(0),
            }))
            .build()
            .unwrap();
        let report = orch.health().await;
        assert!(report.reasoning);
        assert_eq!(report.weather, Some(false));
        assert_eq!(report.news, None);
        assert!(!report.is_healthy());
    }

    #[test]
    fn test_builder_requires_reasoning_provider() {
        assert!(matches!(
            AssessmentOrchestratorBuilder::new().build(),
            Err(AssessmentError::Configuration(_))
        ));
    }

    #[test]
    fn test_provider_error_mapping() {
        assert_eq!(
            AssessmentError::from(ProviderError::AuthError),
            AssessmentError::UpstreamUnavailable
        );
        assert_eq!(
            AssessmentError::from(ProviderError::Timeout(Duration::from_secs(1))),
            AssessmentError::UpstreamTimeout
        );
        assert_eq!(
            AssessmentError::from(SourceError::RateLimited { retry_after: None }),
            AssessmentError::UpstreamUnavailable
        );
    }
}
