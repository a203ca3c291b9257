//! WeatherAPI.com client.
//!
//! Today and later dates use `forecast.json`. Dates past the forecast window
//! get the last forecast day. Past dates fall back to `current.json`.

use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use serde::Deserialize;
use serde_json::Value as JsonValue;
use std::time::Duration;

use searisk_core::WeatherSnapshot;

use super::{SourceError, WeatherProvider};
use crate::providers::{retry_after, ApiCredential};

/// Environment variable name for the WeatherAPI.com key.
pub const WEATHERAPI_KEY_ENV: &str = "WEATHERAPI_KEY";

/// Days ahead covered by the forecast endpoint.
pub const FORECAST_WINDOW_DAYS: i64 = 14;

const DEFAULT_BASE_URL: &str = "https://api.weatherapi.com/v1";

/// Weather provider backed by WeatherAPI.com.
pub struct WeatherApiProvider {
    credential: ApiCredential,
    base_url: String,
    timeout: Duration,
    client: reqwest::Client,
}

impl std::fmt::Debug for WeatherApiProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WeatherApiProvider")
            .field("credential", &self.credential)
            .field("base_url", &self.base_url)
            .field("timeout", &self.timeout)
            .finish()
    }
}

impl WeatherApiProvider {
    /// Create from JSON configuration, falling back to `WEATHERAPI_KEY`.
    ///
    /// Recognized keys: `api_key`, `base_url`, `timeout_secs`.
    pub fn from_config(config: &JsonValue) -> Result<Self, SourceError> {
        let credential = ApiCredential::from_config_or_env(
            config,
            "api_key",
            WEATHERAPI_KEY_ENV,
            "WeatherAPI key",
        )
        .map_err(|e| SourceError::NotConfigured(e.to_string()))?;

        let base_url = config["base_url"]
            .as_str()
            .unwrap_or(DEFAULT_BASE_URL)
            .trim_end_matches('/')
            .to_string();

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
            timeout,
            client,
        })
    }

    async fn get(&self, endpoint: &str, query: &[(&str, String)]) -> Result<JsonValue, SourceError> {
        let response = self
            .client
            .get(format!("{}/{}", self.base_url, endpoint))
            .query(&[("key", self.credential.expose())])
            .query(query)
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
            let message = body["error"]["message"]
                .as_str()
                .unwrap_or("unexpected response")
                .to_string();
            return Err(SourceError::Unavailable(format!(
                "weather lookup failed ({}): {}",
                status.as_u16(),
                message
            )));
        }

        response
            .json()
            .await
            .map_err(|e| SourceError::Unavailable(format!("unreadable weather response: {}", e)))
    }
}

/// Number of forecast days to request for `date`, or `None` for a past date.
///
/// Capped at [`FORECAST_WINDOW_DAYS`].
pub(crate) fn forecast_days(date: NaiveDate, today: NaiveDate) -> Option<i64> {
    let ahead = (date - today).num_days();
    if ahead < 0 {
        None
    } else {
        Some((ahead + 1).min(FORECAST_WINDOW_DAYS))
    }
}

#[derive(Debug, Deserialize)]
struct Condition {
    #[serde(default)]
    text: Option<String>,
    #[serde(default)]
    code: Option<u32>,
}

#[derive(Debug, Deserialize)]
struct CurrentBody {
    current: Current,
}

#[derive(Debug, Deserialize)]
struct Current {
    temp_c: Option<f64>,
    feelslike_c: Option<f64>,
    humidity: Option<f64>,
    wind_kph: Option<f64>,
    wind_dir: Option<String>,
    wind_degree: Option<u32>,
    pressure_mb: Option<f64>,
    vis_km: Option<f64>,
    uv: Option<f64>,
    condition: Option<Condition>,
    precip_mm: Option<f64>,
    last_updated_epoch: Option<i64>,
}

impl From<Current> for WeatherSnapshot {
    fn from(c: Current) -> Self {
        let (conditions, condition_code) = split_condition(c.condition);
        WeatherSnapshot {
            temperature_c: c.temp_c,
            wind_speed_kph: c.wind_kph,
            visibility_km: c.vis_km,
            conditions,
            feels_like_c: c.feelslike_c,
            humidity: c.humidity,
            wind_direction: c.wind_dir,
            wind_degree: c.wind_degree,
            pressure_mb: c.pressure_mb,
            uv_index: c.uv,
            condition_code,
            precipitation_mm: c.precip_mm,
            is_forecast: Some(false),
            observed_at: c
                .last_updated_epoch
                .and_then(|s| DateTime::<Utc>::from_timestamp(s, 0)),
            ..Default::default()
        }
    }
}

#[derive(Debug, Deserialize)]
struct ForecastBody {
    forecast: Forecast,
}

#[derive(Debug, Deserialize)]
struct Forecast {
    forecastday: Vec<ForecastDay>,
}

#[derive(Debug, Deserialize)]
struct ForecastDay {
    date: String,
    day: Day,
}

#[derive(Debug, Deserialize)]
struct Day {
    avgtemp_c: Option<f64>,
    maxwind_kph: Option<f64>,
    avgvis_km: Option<f64>,
    avghumidity: Option<f64>,
    totalprecip_mm: Option<f64>,
    uv: Option<f64>,
    condition: Option<Condition>,
}

impl From<Day> for WeatherSnapshot {
    fn from(d: Day) -> Self {
        let (conditions, condition_code) = split_condition(d.condition);
        WeatherSnapshot {
            temperature_c: d.avgtemp_c,
            wind_speed_kph: d.maxwind_kph,
            visibility_km: d.avgvis_km,
            conditions,
            humidity: d.avghumidity,
            uv_index: d.uv,
            condition_code,
            precipitation_mm: d.totalprecip_mm,
            is_forecast: Some(true),
            ..Default::default()
        }
    }
}

fn split_condition(condition: Option<Condition>) -> (Option<String>, Option<u32>) {
    match condition {
        Some(c) => (c.text, c.code),
        None => (None, None),
    }
}

/// Pick the forecast day matching `date`, else the last one returned.
fn pick_day(days: Vec<ForecastDay>, date: NaiveDate) -> Option<Day> {
    let wanted = date.format("%Y-%m-%d").to_string();
    let mut last = None;
    for fd in days {
        if fd.date == wanted {
            return Some(fd.day);
        }
        last = Some(fd.day);
    }
    last
}

#[async_trait]
impl WeatherProvider for WeatherApiProvider {
    async fn fetch(&self, port: &str, date: NaiveDate) -> Result<WeatherSnapshot, SourceError> {
        let today = Utc::now().date_naive();

        match forecast_days(date, today) {
            Some(days) => {
                if (date - today).num_days() >= FORECAST_WINDOW_DAYS {
                    tracing::warn!(
                        port,
                        %date,
                        "Date beyond forecast window, using last forecast day"
                    );
                }
                tracing::debug!(port, days, "Fetching forecast weather");
                let body = self
                    .get(
                        "forecast.json",
                        &[
                            ("q", port.to_string()),
                            ("days", days.to_string()),
                            ("aqi", "no".to_string()),
                            ("alerts", "no".to_string()),
                        ],
                    )
                    .await?;
                let body: ForecastBody = serde_json::from_value(body)
                    .map_err(|e| SourceError::Unavailable(format!("unreadable forecast: {}", e)))?;
                pick_day(body.forecast.forecastday, date)
                    .map(WeatherSnapshot::from)
                    .ok_or_else(|| SourceError::Unavailable("forecast contained no days".to_string()))
            }
            None => {
                tracing::debug!(port, "Date in the past, using current weather");
                let body = self
                    .get("current.json", &[("q", port.to_string()), ("aqi", "no".to_string())])
                    .await?;
                let body: CurrentBody = serde_json::from_value(body)
                    .map_err(|e| SourceError::Unavailable(format!("unreadable conditions: {}", e)))?;
                Ok(body.current.into())
            }
        }
    }

    async fn health_check(&self) -> bool {
        !self.credential.is_empty()
    }

    fn name(&self) -> &str {
        "weatherapi"
    }
}
