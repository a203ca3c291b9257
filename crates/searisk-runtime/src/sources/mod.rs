//! External data sources: port weather and route news.
//!
//! Both are thin, stateless pass-throughs. No caching, no retry.

use async_trait::async_trait;
use chrono::NaiveDate;
use std::time::Duration;
use thiserror::Error;

use searisk_core::{GeopoliticalEvent, RouteAnalysis, ShippingRiskRequest, WeatherSnapshot};

mod catalogue;
mod news;
mod weather;

pub use catalogue::{detect_mentions, CHOKEPOINTS, SECURITY_ZONES};
pub use news::{NewsApiProvider, NEWSAPI_KEY_ENV};
pub use weather::{WeatherApiProvider, FORECAST_WINDOW_DAYS, WEATHERAPI_KEY_ENV};

/// Errors from data sources.
#[derive(Error, Debug)]
pub enum SourceError {
    #[error("Source unavailable: {0}")]
    Unavailable(String),

    #[error("Rate limit exceeded, retry after {retry_after:?}")]
    RateLimited { retry_after: Option<Duration> },

    #[error("Timeout after {0:?}")]
    Timeout(Duration),

    #[error("Source not configured: {0}")]
    NotConfigured(String),
}

impl SourceError {
    pub(crate) fn from_reqwest(e: reqwest::Error, timeout: Duration) -> Self {
        if e.is_timeout() {
            SourceError::Timeout(timeout)
        } else {
            SourceError::Unavailable(e.to_string())
        }
    }
}

/// Weather lookup for a named port.
#[async_trait]
pub trait WeatherProvider: Send + Sync {
    /// Conditions at `port` for `date`.
    async fn fetch(&self, port: &str, date: NaiveDate) -> Result<WeatherSnapshot, SourceError>;

    async fn health_check(&self) -> bool;

    fn name(&self) -> &str;
}

/// What a geopolitical lookup is about.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RouteQuery {
    pub departure_port: String,
    pub destination_port: String,
    pub goods_type: String,

    /// Chokepoints the route is known to pass, searched alongside the ports
    pub chokepoints: Vec<String>,
}

impl RouteQuery {
    pub fn with_chokepoints(mut self, chokepoints: &[String]) -> Self {
        self.chokepoints = chokepoints.to_vec();
        self
    }
}

impl From<&ShippingRiskRequest> for RouteQuery {
    fn from(request: &ShippingRiskRequest) -> Self {
        Self {
            departure_port: request.departure_port.clone(),
            destination_port: request.destination_port.clone(),
            goods_type: request.goods_type.clone(),
            chokepoints: Vec::new(),
        }
    }
}

/// Recent events plus the chokepoints and security zones they mention.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RouteIntelligence {
    pub events: Vec<GeopoliticalEvent>,

    /// First-mention order across `events`
    pub chokepoints: Vec<String>,

    /// First-mention order across `events`
    pub security_zones: Vec<String>,
}

impl RouteIntelligence {
    /// Build from events, detecting catalogue mentions in title and summary.
    pub fn from_events(events: Vec<GeopoliticalEvent>) -> Self {
        let texts: Vec<String> = events
            .iter()
            .map(|e| format!("{} {}", e.title, e.summary))
            .collect();
        Self {
            chokepoints: detect_mentions(CHOKEPOINTS, &texts),
            security_zones: detect_mentions(SECURITY_ZONES, &texts),
            events,
        }
    }

    /// Merge in what the route's geography implies.
    ///
    /// Route-derived names come first, followed by any further names the
    /// events mention.
    pub fn with_route(mut self, analysis: &RouteAnalysis) -> Self {
        self.chokepoints = merge_names(&analysis.chokepoints, self.chokepoints);
        self.security_zones = merge_names(&analysis.security_zones, self.security_zones);
        self
    }
}

fn merge_names(first: &[String], then: Vec<String>) -> Vec<String> {
    let mut merged = first.to_vec();
    for name in then {
        if !merged.contains(&name) {
            merged.push(name);
        }
    }
    merged
}

/// Route news and intelligence lookup.
#[async_trait]
pub trait GeopoliticalDataProvider: Send + Sync {
    async fn fetch(&self, route: &RouteQuery) -> Result<RouteIntelligence, SourceError>;

    async fn health_check(&self) -> bool;

    fn name(&self) -> &str;
}
