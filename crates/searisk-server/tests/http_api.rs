//! End-to-end scenarios against the router with stub collaborators.

use async_trait::async_trait;
use axum::{
    body::{to_bytes, Body},
    http::{header, Request, StatusCode},
    Router,
};
use chrono::{Duration as Days, NaiveDate, Utc};
use serde_json::{json, Value};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tower::ServiceExt;

use searisk_core::WeatherSnapshot;
use searisk_runtime::{
    AssessmentOrchestratorBuilder, ChatMessage, ProviderError, ReasoningConfig,
    ReasoningProvider, ReasoningResponse, SourceError, TokenUsage, WeatherProvider,
};
use searisk_server::{build_router, AppState};

const STRATEGIES: &str = r#"{
    "overall_risk_assessment": "Moderate to high: Pacific weather plus regional tension",
    "recommended_action": "Proceed with enhanced monitoring",
    "strategies": [
        {
            "strategy_type": "Route Optimization",
            "priority": "High",
            "description": "Use weather routing to avoid the storm belt",
            "implementation_time": "immediate",
            "cost_impact": "moderate",
            "risk_reduction": "30%"
        },
        {
            "strategy_type": "Insurance & Financial",
            "priority": "Medium",
            "description": "Extend war risk cover",
            "implementation_time": "1 week",
            "cost_impact": "significant",
            "risk_reduction": "financial exposure reduced"
        }
    ],
    "alternative_routes": [],
    "timeline_recommendations": "Depart as planned",
    "compliance_checks": ["Certificate of Origin (CO)"]
}"#;

struct StubReasoner {
    calls: AtomicUsize,
    delay: Duration,
}

#[async_trait]
impl ReasoningProvider for StubReasoner {
    async fn reason(
        &self,
        _messages: Vec<ChatMessage>,
        _config: &ReasoningConfig,
    ) -> Result<ReasoningResponse, ProviderError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        tokio::time::sleep(self.delay).await;
        Ok(ReasoningResponse {
            content: STRATEGIES.to_string(),
            usage: TokenUsage::default(),
            model: "stub".to_string(),
            stop_reason: None,
        })
    }

    async fn health_check(&self) -> bool {
        true
    }

    fn name(&self) -> &str {
        "stub"
    }
}

struct DownWeather;

#[async_trait]
impl WeatherProvider for DownWeather {
    async fn fetch(&self, _port: &str, _date: NaiveDate) -> Result<WeatherSnapshot, SourceError> {
        Err(SourceError::Unavailable("connection refused".to_string()))
    }

    async fn health_check(&self) -> bool {
        false
    }

    fn name(&self) -> &str {
        "down"
    }
}

fn app_with(delay: Duration, timeout: Duration) -> (Router, Arc<StubReasoner>) {
    let reasoner = Arc::new(StubReasoner {
        calls: AtomicUsize::new(0),
        delay,
    });
    let orchestrator = AssessmentOrchestratorBuilder::new()
        .reasoning(reasoner.clone())
        .weather(Arc::new(DownWeather))
        .config(ReasoningConfig {
            timeout,
            ..Default::default()
        })
        .build()
        .unwrap();
    (build_router(AppState::new(orchestrator)), reasoner)
}

fn app() -> (Router, Arc<StubReasoner>) {
    app_with(Duration::ZERO, Duration::from_secs(5))
}

fn date_from_today(days: i64) -> String {
    (Utc::now().date_naive() + Days::days(days))
        .format("%Y-%m-%d")
        .to_string()
}

fn shipment(departure_port: &str, departure_date: &str) -> Value {
    json!({
        "departure_port": departure_port,
        "destination_port": "Shanghai",
        "departure_date": departure_date,
        "carrier_name": "Maersk Line",
        "goods_type": "Electronics",
        "weather_conditions": {
            "risk_score": 6,
            "risk_description": "Typhoon season approaching",
            "weather_summary": "Rough seas mid-Pacific",
            "departure_weather": {"temperature": 22.5, "wind_speed": 18.0, "conditions": "Clear"},
            "destination_weather": {"temperature": 29.0, "wave_height": 2.5, "conditions": "Rain"},
            "estimated_travel_days": 16
        },
        "geopolitical_conditions": {
            "risk_score": 7,
            "risk_description": "Naval exercises near the approach",
            "geopolitical_summary": "Elevated regional tension",
            "chokepoints": [],
            "security_zones": ["Taiwan Strait"],
            "shipping_lanes": "North Pacific great circle"
        }
    })
}

fn post(uri: &str, body: impl Into<Body>) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(body.into())
        .unwrap()
}

async fn send(app: Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = app.oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    (status, serde_json::from_slice(&bytes).unwrap())
}

#[tokio::test]
async fn test_mitigation_scenario() {
    let (app, reasoner) = app();
    let body = shipment("Los Angeles", &date_from_today(30));
    let (status, json) = send(app, post("/analyze-shipping-risk", body.to_string())).await;

    assert_eq!(status, StatusCode::OK);
    assert!(!json["strategies"].as_array().unwrap().is_empty());
    assert_eq!(json["strategies"][0]["priority"], "High");
    assert_eq!(reasoner.calls.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn test_yesterday_is_rejected() {
    let (app, reasoner) = app();
    let body = shipment("Los Angeles", &date_from_today(-1));
    let (status, json) = send(app, post("/analyze-shipping-risk", body.to_string())).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["error_type"], "ValidationError");
    assert!(json["detail"].to_string().contains("past"));
    assert_eq!(reasoner.calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn test_slow_reasoning_is_timeout() {
    let (app, _) = app_with(Duration::from_secs(5), Duration::from_millis(50));
    let body = shipment("Los Angeles", &date_from_today(30));
    let (status, json) = send(app, post("/analyze-shipping-risk", body.to_string())).await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(json["error_type"], "UpstreamTimeoutError");
}

#[tokio::test]
async fn test_invalid_port_characters() {
    let (app, _) = app();
    let body = shipment("Los@Angeles", &date_from_today(30));
    let (status, json) = send(app, post("/analyze-shipping-risk", body.to_string())).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    let issues = json["detail"].as_array().unwrap();
    assert!(issues.iter().any(|i| {
        i["location"] == "departure_port"
            && i["message"].as_str().unwrap().contains("invalid characters")
    }));
}

#[tokio::test]
async fn test_malformed_json_is_structured_400() {
    let (app, _) = app();
    let (status, json) = send(app, post("/analyze-shipping-risk", "{\"departure_port\": ")).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["error_type"], "ValidationError");
    assert_eq!(json["detail"][0]["location"], "body");
}

#[tokio::test]
async fn test_missing_fields_all_reported() {
    let (app, _) = app();
    let (status, json) = send(app, post("/analyze-shipping-risk", "{}")).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(json["detail"].as_array().unwrap().len() >= 5);
}

#[tokio::test]
async fn test_weather_source_down_is_generic_500() {
    let (app, reasoner) = app();
    let body = shipment("Los Angeles", &date_from_today(3));
    let (status, json) = send(app, post("/assess-shipping-risk", body.to_string())).await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(json["error_type"], "UpstreamUnavailableError");
    assert!(!json["detail"].to_string().contains("connection refused"));
    assert_eq!(reasoner.calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn test_geopolitical_unconfigured() {
    let (app, _) = app();
    let body = shipment("Los Angeles", &date_from_today(3));
    let (status, json) = send(app, post("/assess-geopolitical-risk", body.to_string())).await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(json["error_type"], "ConfigurationError");
}

#[tokio::test]
async fn test_health_reports_degraded() {
    let (app, _) = app();
    let request = Request::builder().uri("/health").body(Body::empty()).unwrap();
    let (status, json) = send(app, request).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["status"], "degraded");
    assert_eq!(json["reasoning"], "healthy");
    assert_eq!(json["weather"], "unhealthy");
    assert!(json.get("news").is_none());
    assert!(json["timestamp"].is_string());
}

#[tokio::test]
async fn test_root_metadata() {
    let (app, _) = app();
    let request = Request::builder().uri("/").body(Body::empty()).unwrap();
    let (status, json) = send(app, request).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["name"], "searisk");
    assert_eq!(json["endpoints"]["health"], "GET /health");
}
