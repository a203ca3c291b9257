//! # searisk-core
//!
//! Request schema, validation rules and reasoning context for shipping
//! route risk assessment.
//!
//! This crate answers, without any I/O:
//! - Is this shipping plan well-formed?
//! - What exactly is wrong with it, field by field?
//! - What does the route's geography imply (chokepoints, travel time)?
//! - What context does the reasoning provider see?
//! - Does the provider's answer have the promised shape?
//!
//! ## Example
//!
//! ```rust,ignore
//! use searisk_core::{ContextBuilder, RequestVariant, ShippingRiskRequest};
//!
//! let request = ShippingRiskRequest::from_value(&body, RequestVariant::Mitigation, today)?;
//! let context = ContextBuilder::for_request(&request).build();
//! ```

pub mod context;
pub mod route;
pub mod schema;
pub mod types;
pub mod validation;

pub use context::{ContextBuilder, ContextSection};
pub use schema::{is_valid_document, validate_document, SchemaDocument, SchemaError};
pub use route::{analyze_route, country_profile, find_port, Port, Region};
pub use types::{
    CountryRiskProfile, ErrorDetail, ErrorResponse, FieldIssue, GeopoliticalAssessment,
    GeopoliticalEvent, GeopoliticalRiskOutput, GeopoliticalRiskResponse, IssueKind,
    MitigationResponse, MitigationStrategy, Priority, RequestVariant, RouteAnalysis,
    ShippingRiskRequest, WeatherAssessment, WeatherRiskOutput, WeatherRiskResponse,
    WeatherSnapshot,
};
pub use validation::{check_departure_date, is_valid_port_name, MAX_DAYS_AHEAD};

use serde::de::DeserializeOwned;
use serde_json::Value;

/// Validate a JSON value against `document`, then deserialize it.
///
/// Used for reasoning provider output, where the schema is the contract and
/// serde only maps the already-checked shape.
pub fn parse_document<T: DeserializeOwned>(
    document: SchemaDocument,
    value: Value,
) -> Result<T, SchemaError> {
    validate_document(document, &value)?;
    serde_json::from_value(value).map_err(|e| {
        SchemaError::Invalid(vec![FieldIssue::new("", e.to_string(), IssueKind::Type)])
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn mitigation_json() -> Value {
        json!({
            "overall_risk_assessment": "Moderate risk driven by Pacific weather",
            "recommended_action": "Proceed with monitoring",
            "strategies": [{
                "strategy_type": "Weather Mitigation",
                "priority": "High",
                "description": "Track the low pressure system daily",
                "implementation_time": "immediate",
                "cost_impact": "minimal",
                "risk_reduction": "20-30%"
            }],
            "alternative_routes": ["Northern great circle"],
            "timeline_recommendations": "Depart as planned",
            "compliance_checks": ["ISF-10+2 Importer Security Filing"]
        })
    }

    #[test]
    fn test_parse_mitigation_document() {
        let response: MitigationResponse =
            parse_document(SchemaDocument::MitigationResponse, mitigation_json()).unwrap();
        assert_eq!(response.strategies.len(), 1);
        assert_eq!(response.compliance_checks[0], "ISF-10+2 Importer Security Filing");
    }

    #[test]
    fn test_mitigation_response_round_trip() {
        let response: MitigationResponse =
            parse_document(SchemaDocument::MitigationResponse, mitigation_json()).unwrap();
        let text = serde_json::to_string(&response).unwrap();
        let back: MitigationResponse = serde_json::from_str(&text).unwrap();
        assert_eq!(response, back);
    }

    #[test]
    fn test_null_optional_fields_read_as_empty() {
        let mut value = mitigation_json();
        value["alternative_routes"] = Value::Null;
        value["timeline_recommendations"] = Value::Null;
        value["compliance_checks"] = Value::Null;
        let response: MitigationResponse =
            parse_document(SchemaDocument::MitigationResponse, value).unwrap();
        assert!(response.alternative_routes.is_empty());
        assert!(response.timeline_recommendations.is_empty());
        assert!(response.compliance_checks.is_empty());
    }

    #[test]
    fn test_weather_output_out_of_range() {
        let err = parse_document::<WeatherRiskOutput>(
            SchemaDocument::WeatherRiskOutput,
            json!({
                "risk_score": 0,
                "risk_description": "Calm",
                "weather_summary": "Clear skies",
                "estimated_travel_days": 12
            }),
        )
        .unwrap_err();
        assert_eq!(err.issues()[0].location, "risk_score");
    }
}
