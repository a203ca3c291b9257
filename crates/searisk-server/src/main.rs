//! searisk binary: loads configuration, wires providers, serves HTTP.

use anyhow::Context;
use clap::Parser;
use std::sync::Arc;
use tokio::signal;
use tracing::{error, info, warn};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use searisk_runtime::{
    AssessmentOrchestratorBuilder, NewsApiProvider, ProviderRegistry, SourceError,
    WeatherApiProvider,
};
use searisk_server::{build_router, AppState, ServiceConfig};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // A missing .env is fine
    dotenvy::dotenv().ok();

    let config = ServiceConfig::parse();
    init_tracing(&config);

    let registry = ProviderRegistry::with_defaults();
    if let Err(e) = config.validate(&registry) {
        error!(error = %e, "Configuration validation failed");
        return Err(e).context("ConfigurationError");
    }

    let reasoning = registry
        .create(&config.reasoning_provider, &config.provider_json())
        .context("creating reasoning provider")?;
    info!(provider = reasoning.name(), "Reasoning provider ready");

    let mut builder = AssessmentOrchestratorBuilder::new()
        .reasoning(reasoning)
        .config(config.reasoning_config());

    match WeatherApiProvider::from_config(&config.source_json()) {
        Ok(weather) => builder = builder.weather(Arc::new(weather)),
        Err(SourceError::NotConfigured(reason)) => {
            warn!(%reason, "Weather assessments disabled")
        }
        Err(e) => return Err(e).context("creating weather provider"),
    }

    match NewsApiProvider::from_config(&config.source_json()) {
        Ok(news) => builder = builder.news(Arc::new(news)),
        Err(SourceError::NotConfigured(reason)) => {
            warn!(%reason, "Geopolitical assessments disabled")
        }
        Err(e) => return Err(e).context("creating news provider"),
    }

    let orchestrator = builder.build().context("building orchestrator")?;
    let app = build_router(AppState::new(orchestrator));

    let addr = config.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("binding {}", addr))?;

    info!(%addr, "searisk listening");
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("server error")?;

    info!("Shutdown complete");
    Ok(())
}

fn init_tracing(config: &ServiceConfig) {
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| config.log_filter().into());

    tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt::layer().with_target(true))
        .init();
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            error!(error = %e, "Failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
            }
            Err(e) => {
                error!(error = %e, "Failed to install terminate handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => info!("Received Ctrl+C signal"),
        _ = terminate => info!("Received terminate signal"),
    }
}
