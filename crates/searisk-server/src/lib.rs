//! # searisk-server
//!
//! HTTP surface for shipping route risk assessment.
//!
//! | Method | Path                        | Response                   |
//! |--------|-----------------------------|----------------------------|
//! | POST   | `/analyze-shipping-risk`    | `MitigationResponse`       |
//! | POST   | `/assess-shipping-risk`     | `WeatherRiskResponse`      |
//! | POST   | `/assess-geopolitical-risk` | `GeopoliticalRiskResponse` |
//! | GET    | `/health`                   | collaborator health        |
//! | GET    | `/`                         | service metadata           |
//!
//! Failures are always an `ErrorResponse`: 400 for validation, 500 otherwise.

pub mod config;
pub mod error;
pub mod routes;

use axum::{
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use searisk_runtime::AssessmentOrchestrator;

pub use config::{ConfigError, ServiceConfig};
pub use error::ApiError;

/// Shared handler state.
#[derive(Clone)]
pub struct AppState {
    pub orchestrator: Arc<AssessmentOrchestrator>,
}

impl AppState {
    pub fn new(orchestrator: AssessmentOrchestrator) -> Self {
        Self {
            orchestrator: Arc::new(orchestrator),
        }
    }
}

/// Build the service router.
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/", get(routes::root))
        .route("/health", get(routes::health))
        .route("/analyze-shipping-risk", post(routes::analyze_shipping_risk))
        .route("/assess-shipping-risk", post(routes::assess_shipping_risk))
        .route("/assess-geopolitical-risk", post(routes::assess_geopolitical_risk))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}
