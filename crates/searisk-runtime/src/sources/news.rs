//! NewsAPI.org client for route news.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::Deserialize;
use serde_json::Value as JsonValue;
use std::time::Duration;

use searisk_core::GeopoliticalEvent;

use super::{GeopoliticalDataProvider, RouteIntelligence, RouteQuery, SourceError};
use crate::providers::{retry_after, ApiCredential};

/// Environment variable name for the NewsAPI key.
pub const NEWSAPI_KEY_ENV: &str = "NEWSAPI_KEY";

const DEFAULT_BASE_URL: &str = "https://newsapi.org/v2";
const DEFAULT_PAGE_SIZE: u64 = 10;

/// Geopolitical data provider backed by the NewsAPI `everything` endpoint.
pub struct NewsApiProvider {
    credential: ApiCredential,
    base_url: String,
    page_size: u64,
    timeout: Duration,
    client: reqwest::Client,
}

impl std::fmt::Debug for NewsApiProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NewsApiProvider")
            .field("credential", &self.credential)
            .field("base_url", &self.base_url)
            .field("page_size", &self.page_size)
            .finish()
    }
}

impl NewsApiProvider {
    /// Create from JSON configuration, falling back to `NEWSAPI_KEY`.
    ///
    /// Recognized keys: `api_key`, `base_url`, `page_size`, `timeout_secs`.
    pub fn from_config(config: &JsonValue) -> Result<Self, SourceError> {
        let credential =
            ApiCredential::from_config_or_env(config, "api_key", NEWSAPI_KEY_ENV, "NewsAPI key")
                .map_err(|e| SourceError::NotConfigured(e.to_string()))?;

        let base_url = config["base_url"]
            .as_str()
            .unwrap_or(DEFAULT_BASE_URL)
            .trim_end_matches('/')
            .to_string();

        let page_size = config["page_size"]
            .as_u64()
            .unwrap_or(DEFAULT_PAGE_SIZE)
            .clamp(1, 100);

        let timeout = config["timeout_secs"]
            .as_u64()
            .map(Duration::from_secs)
            .unwrap_or(Duration::from_secs(30));

        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| SourceError::NotConfigured(e.to_string()))?;

        Ok(Self {
            credential,
            base_url,
            page_size,
            timeout,
            client,
        })
    }
}

/// Search expression for news touching either end of the route or one of
/// its chokepoints.
pub(crate) fn route_search(route: &RouteQuery) -> String {
    let terms: Vec<String> = [&route.departure_port, &route.destination_port]
        .into_iter()
        .chain(route.chokepoints.iter())
        .map(|term| format!("\"{}\"", term.replace('"', "")))
        .collect();
    format!("({}) AND (shipping OR maritime OR port)", terms.join(" OR "))
}

#[derive(Debug, Deserialize)]
struct EverythingResponse {
    #[serde(default)]
    articles: Vec<Article>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Article {
    #[serde(default)]
    source: Option<ArticleSource>,
    #[serde(default)]
    title: Option<String>,
    #[serde(default)]
    description: Option<String>,
    #[serde(default)]
    url: Option<String>,
    #[serde(default)]
    published_at: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ArticleSource {
    #[serde(default)]
    name: Option<String>,
}

impl Article {
    /// Articles without a usable title are dropped.
    fn into_event(self) -> Option<GeopoliticalEvent> {
        let title = self.title.map(|t| t.trim().to_string()).filter(|t| !t.is_empty())?;
        // NewsAPI marks removed items with this placeholder
        if title == "[Removed]" {
            return None;
        }

        Some(GeopoliticalEvent {
            title,
            summary: self.description.unwrap_or_default(),
            source: self
                .source
                .and_then(|s| s.name)
                .unwrap_or_else(|| "unknown".to_string()),
            published_at: self
                .published_at
                .as_deref()
                .and_then(|p| DateTime::parse_from_rfc3339(p).ok())
                .map(|p| p.with_timezone(&Utc)),
            url: self.url,
        })
    }
}

fn events_from(body: EverythingResponse) -> Vec<GeopoliticalEvent> {
    body.articles
        .into_iter()
        .filter_map(Article::into_event)
        .collect()
}

#[async_trait]
impl GeopoliticalDataProvider for NewsApiProvider {
    async fn fetch(&self, route: &RouteQuery) -> Result<RouteIntelligence, SourceError> {
        let response = self
            .client
            .get(format!("{}/everything", self.base_url))
            .header("X-Api-Key", self.credential.expose())
            .query(&[
                ("q", route_search(route)),
                ("language", "en".to_string()),
                ("sortBy", "publishedAt".to_string()),
                ("pageSize", self.page_size.to_string()),
            ])
            .send()
            .await
            .map_err(|e| SourceError::from_reqwest(e, self.timeout))?;

        let status = response.status();
        if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
            return Err(SourceError::RateLimited {
                retry_after: retry_after(response.headers()),
            });
        }
        if !status.is_success() {
            let body: JsonValue = response.json().await.unwrap_or(JsonValue::Null);
            return Err(SourceError::Unavailable(format!(
                "news lookup failed ({}): {}",
                status.as_u16(),
                body["message"].as_str().unwrap_or("unexpected response")
            )));
        }

        let body: EverythingResponse = response
            .json()
            .await
            .map_err(|e| SourceError::Unavailable(format!("unreadable news response: {}", e)))?;

        let events = events_from(body);
        tracing::debug!(
            departure = %route.departure_port,
            destination = %route.destination_port,
            events = events.len(),
            "Fetched route news"
        );
        Ok(RouteIntelligence::from_events(events))
    }

    async fn health_check(&self) -> bool {
        !self.credential.is_empty()
    }

    fn name(&self) -> &str {
        "newsapi"
    }
}
