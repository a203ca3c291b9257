//! Route handlers.
//!
//! Assessment bodies are taken as raw bytes so malformed JSON is answered
//! with the same structured error body as every other failure.

use axum::{body::Bytes, extract::State, Json};
use chrono::Utc;
use serde_json::{json, Map, Value};

use searisk_core::{GeopoliticalRiskResponse, MitigationResponse, WeatherRiskResponse};

use crate::error::ApiError;
use crate::AppState;

fn parse_body(body: &Bytes) -> Result<Value, ApiError> {
    serde_json::from_slice(body).map_err(|e| ApiError::MalformedBody(e.to_string()))
}

/// `POST /analyze-shipping-risk`
pub async fn analyze_shipping_risk(
    State(state): State<AppState>,
    body: Bytes,
) -> Result<Json<MitigationResponse>, ApiError> {
    let body = parse_body(&body)?;
    Ok(Json(state.orchestrator.assess_mitigation(&body).await?))
}

/// `POST /assess-shipping-risk`
pub async fn assess_shipping_risk(
    State(state): State<AppState>,
    body: Bytes,
) -> Result<Json<WeatherRiskResponse>, ApiError> {
    let body = parse_body(&body)?;
    Ok(Json(state.orchestrator.assess_weather(&body).await?))
}

/// `POST /assess-geopolitical-risk`
pub async fn assess_geopolitical_risk(
    State(state): State<AppState>,
    body: Bytes,
) -> Result<Json<GeopoliticalRiskResponse>, ApiError> {
    let body = parse_body(&body)?;
    Ok(Json(state.orchestrator.assess_geopolitical(&body).await?))
}

fn label(healthy: bool) -> &'static str {
    if healthy {
        "healthy"
    } else {
        "unhealthy"
    }
}

/// `GET /health`: one key per configured collaborator.
pub async fn health(State(state): State<AppState>) -> Json<Value> {
    let report = state.orchestrator.health().await;

    let mut body = Map::new();
    body.insert(
        "status".to_string(),
        json!(if report.is_healthy() { "healthy" } else { "degraded" }),
    );
    body.insert("reasoning".to_string(), json!(label(report.reasoning)));
    if let Some(weather) = report.weather {
        body.insert("weather".to_string(), json!(label(weather)));
    }
    if let Some(news) = report.news {
        body.insert("news".to_string(), json!(label(news)));
    }
    body.insert("timestamp".to_string(), json!(Utc::now()));

    Json(Value::Object(body))
}

/// `GET /`
pub async fn root() -> Json<Value> {
    Json(json!({
        "name": "searisk",
        "description": "Shipping route risk assessment",
        "version": env!("CARGO_PKG_VERSION"),
        "endpoints": {
            "analyze_shipping_risk": "POST /analyze-shipping-risk",
            "assess_shipping_risk": "POST /assess-shipping-risk",
            "assess_geopolitical_risk": "POST /assess-geopolitical-risk",
            "health": "GET /health"
        }
    }))
}
