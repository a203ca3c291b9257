//! Request and response types for shipping risk assessment.
//!
//! Every entity here is built fresh per request, validated once at
//! construction and discarded after serialization.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Deserializer, Serialize};

/// Which assessment a request is submitted for.
///
/// The variant decides whether the embedded weather and geopolitical
/// assessments are mandatory.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RequestVariant {
    /// Mitigation planning. Both embedded assessments are required.
    Mitigation,
    /// Weather risk. Conditions are fetched, embedded assessments optional.
    Weather,
    /// Geopolitical risk. Route intelligence is fetched, embedded assessments optional.
    Geopolitical,
}

impl RequestVariant {
    /// Whether both embedded assessments must be present.
    pub fn requires_conditions(&self) -> bool {
        matches!(self, RequestVariant::Mitigation)
    }
}

/// Point-in-time weather at one port.
///
/// Every field is independently optional. Absent is distinct from zero and
/// absent fields are omitted from serialized output.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct WeatherSnapshot {
    #[serde(default, alias = "temperature", skip_serializing_if = "Option::is_none")]
    pub temperature_c: Option<f64>,

    #[serde(default, alias = "wind_speed", skip_serializing_if = "Option::is_none")]
    pub wind_speed_kph: Option<f64>,

    #[serde(default, alias = "wave_height", skip_serializing_if = "Option::is_none")]
    pub wave_height_m: Option<f64>,

    #[serde(default, alias = "visibility", skip_serializing_if = "Option::is_none")]
    pub visibility_km: Option<f64>,

    /// Free-text description, e.g. "Partly cloudy"
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub conditions: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub feels_like_c: Option<f64>,

    /// Relative humidity in percent
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub humidity: Option<f64>,

    /// Compass label, e.g. "NNE"
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub wind_direction: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub wind_degree: Option<u32>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pressure_mb: Option<f64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub uv_index: Option<f64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub condition_code: Option<u32>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub precipitation_mm: Option<f64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub swell_height_m: Option<f64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub swell_direction: Option<String>,

    /// True when the values come from a forecast rather than observation
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_forecast: Option<bool>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub observed_at: Option<DateTime<Utc>>,
}

impl WeatherSnapshot {
    /// Populated fields as `(label, rendered value)` pairs, in declaration order.
    pub fn populated_fields(&self) -> Vec<(&'static str, String)> {
        let mut fields = Vec::new();

        push_measure(&mut fields, "Temperature", self.temperature_c, " °C");
        push_measure(&mut fields, "Wind speed", self.wind_speed_kph, " km/h");
        push_measure(&mut fields, "Wave height", self.wave_height_m, " m");
        push_measure(&mut fields, "Visibility", self.visibility_km, " km");
        push_text(&mut fields, "Conditions", self.conditions.as_deref());
        push_measure(&mut fields, "Feels like", self.feels_like_c, " °C");
        push_measure(&mut fields, "Humidity", self.humidity, "%");
        push_text(&mut fields, "Wind direction", self.wind_direction.as_deref());
        if let Some(d) = self.wind_degree {
            fields.push(("Wind degree", format!("{}°", d)));
        }
        push_measure(&mut fields, "Pressure", self.pressure_mb, " mb");
        push_measure(&mut fields, "UV index", self.uv_index, "");
        if let Some(code) = self.condition_code {
            fields.push(("Condition code", code.to_string()));
        }
        push_measure(&mut fields, "Precipitation", self.precipitation_mm, " mm");
        push_measure(&mut fields, "Swell height", self.swell_height_m, " m");
        push_text(&mut fields, "Swell direction", self.swell_direction.as_deref());
        if let Some(forecast) = self.is_forecast {
            let source = if forecast { "forecast" } else { "observed" };
            fields.push(("Source", source.to_string()));
        }
        if let Some(at) = self.observed_at {
            fields.push(("Observed at", at.to_rfc3339()));
        }

        fields
    }

    /// True when no field is populated.
    pub fn is_empty(&self) -> bool {
        self.populated_fields().is_empty()
    }
}

fn push_measure(
    fields: &mut Vec<(&'static str, String)>,
    label: &'static str,
    value: Option<f64>,
    unit: &str,
) {
    if let Some(v) = value {
        fields.push((label, format!("{}{}", v, unit)));
    }
}

fn push_text(fields: &mut Vec<(&'static str, String)>, label: &'static str, value: Option<&str>) {
    if let Some(v) = value {
        fields.push((label, v.to_string()));
    }
}

/// Weather risk assessment for a route, as embedded in a request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeatherAssessment {
    /// 1 (lowest risk) to 10
    pub risk_score: u8,
    pub risk_description: String,
    pub weather_summary: String,
    pub departure_weather: WeatherSnapshot,
    pub destination_weather: WeatherSnapshot,
    pub estimated_travel_days: u16,
}

/// Geopolitical risk assessment for a route, as embedded in a request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeopoliticalAssessment {
    /// 1 (lowest risk) to 10
    pub risk_score: u8,
    pub risk_description: String,
    pub geopolitical_summary: String,

    /// Maritime chokepoints on the route, in route order
    #[serde(default)]
    pub chokepoints: Vec<String>,

    #[serde(default)]
    pub security_zones: Vec<String>,

    pub shipping_lanes: String,
}

/// A shipping plan submitted for assessment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShippingRiskRequest {
    pub departure_port: String,
    pub destination_port: String,
    pub departure_date: NaiveDate,
    pub carrier_name: String,
    pub goods_type: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub weather_conditions: Option<WeatherAssessment>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub geopolitical_conditions: Option<GeopoliticalAssessment>,
}

/// Priority of a mitigation strategy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Priority {
    High,
    Medium,
    Low,
}

impl std::fmt::Display for Priority {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Priority::High => write!(f, "High"),
            Priority::Medium => write!(f, "Medium"),
            Priority::Low => write!(f, "Low"),
        }
    }
}

/// A single recommended mitigation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MitigationStrategy {
    pub strategy_type: String,
    pub priority: Priority,
    pub description: String,
    pub implementation_time: String,
    pub cost_impact: String,
    pub risk_reduction: String,
}

/// Structured mitigation plan returned to the caller.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MitigationResponse {
    pub overall_risk_assessment: String,
    pub recommended_action: String,

    /// At least one strategy, in the order the reasoning provider ranked them
    pub strategies: Vec<MitigationStrategy>,

    #[serde(default, deserialize_with = "null_as_default")]
    pub alternative_routes: Vec<String>,

    #[serde(default, deserialize_with = "null_as_default")]
    pub timeline_recommendations: String,

    #[serde(default, deserialize_with = "null_as_default")]
    pub compliance_checks: Vec<String>,
}

/// Providers send `null` for optional fields they have nothing to say about.
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Option::unwrap_or_default)
}

/// Fields the reasoning provider produces for a weather assessment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeatherRiskOutput {
    pub risk_score: u8,
    pub risk_description: String,
    pub weather_summary: String,
    pub estimated_travel_days: u16,
}

/// Weather risk assessment returned to the caller.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeatherRiskResponse {
    pub risk_score: u8,
    pub risk_description: String,
    pub weather_summary: String,
    pub departure_weather: WeatherSnapshot,
    pub destination_weather: WeatherSnapshot,
    pub estimated_travel_days: u16,
    pub assessment_timestamp: DateTime<Utc>,
}

impl WeatherRiskResponse {
    /// Combine reasoning output with the snapshots it was derived from.
    pub fn from_output(
        output: WeatherRiskOutput,
        departure_weather: WeatherSnapshot,
        destination_weather: WeatherSnapshot,
        assessment_timestamp: DateTime<Utc>,
    ) -> Self {
        Self {
            risk_score: output.risk_score,
            risk_description: output.risk_description,
            weather_summary: output.weather_summary,
            departure_weather,
            destination_weather,
            estimated_travel_days: output.estimated_travel_days,
            assessment_timestamp,
        }
    }
}

/// A news item relevant to a route.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeopoliticalEvent {
    pub title: String,

    #[serde(default)]
    pub summary: String,

    /// Publisher name
    pub source: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub published_at: Option<DateTime<Utc>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
}

/// Fields the reasoning provider produces for a geopolitical assessment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeopoliticalRiskOutput {
    pub risk_score: u8,
    pub risk_description: String,
    pub geopolitical_summary: String,
    pub shipping_lanes: String,
}

/// Standing risk profile of a port's country, adjusted for the cargo.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CountryRiskProfile {
    pub country: String,

    /// 1 (unstable) to 10
    pub political_stability: u8,

    /// 0 to 100
    pub trade_freedom: u8,
    pub corruption_level: String,
    pub security_threat: String,
    pub sanctions_status: String,
    pub port_security: String,
    pub labor_conditions: String,
    pub regulatory_stability: String,
    pub cargo_restrictions: String,
}

/// Characteristics of a route derived from the geography of its two ports.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RouteAnalysis {
    pub departure_country: String,
    pub destination_country: String,
    pub distance_km: u32,
    pub travel_days: u32,
    pub chokepoints: Vec<String>,
    pub security_zones: Vec<String>,
    pub seasonal_factors: String,
    pub alternative_routes: String,
    pub shipping_lanes: String,
    pub goods_specific_risks: String,
}

/// Geopolitical risk assessment returned to the caller.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeopoliticalRiskResponse {
    pub risk_score: u8,
    pub risk_description: String,
    pub geopolitical_summary: String,

    /// Route-derived first, then any further ones named in recent events
    pub chokepoints: Vec<String>,
    pub security_zones: Vec<String>,
    pub shipping_lanes: String,
    pub departure_country_risk: CountryRiskProfile,
    pub destination_country_risk: CountryRiskProfile,
    pub route_analysis: RouteAnalysis,
    pub recent_events: Vec<GeopoliticalEvent>,
    pub travel_days: u32,
    pub assessment_timestamp: DateTime<Utc>,
}

/// Category of a field-level validation problem.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IssueKind {
    Missing,
    Type,
    Length,
    Range,
    Pattern,
    Format,
    Enum,
    UnknownField,
    Empty,
    InvalidCharacters,
    DateInPast,
    DateTooFar,
}

/// One field-level validation problem.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldIssue {
    /// Dotted path to the offending field, e.g. `weather_conditions.risk_score`
    pub location: String,
    pub message: String,
    pub kind: IssueKind,
}

impl FieldIssue {
    pub fn new(location: impl Into<String>, message: impl Into<String>, kind: IssueKind) -> Self {
        Self {
            location: location.into(),
            message: message.into(),
            kind,
        }
    }
}

impl std::fmt::Display for FieldIssue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.location, self.message)
    }
}

/// Body of an error response: a message, or the list of field issues.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ErrorDetail {
    Message(String),
    Issues(Vec<FieldIssue>),
}

/// Error payload returned for every failed request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub detail: ErrorDetail,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error_type: Option<String>,

    pub timestamp: DateTime<Utc>,
}

impl ErrorResponse {
    pub fn message(detail: impl Into<String>, error_type: Option<&str>) -> Self {
        Self {
            detail: ErrorDetail::Message(detail.into()),
            error_type: error_type.map(str::to_string),
            timestamp: Utc::now(),
        }
    }

    pub fn issues(issues: Vec<FieldIssue>, error_type: Option<&str>) -> Self {
        Self {
            detail: ErrorDetail::Issues(issues),
            error_type: error_type.map(str::to_string),
            timestamp: Utc::now(),
        }
    }
}
