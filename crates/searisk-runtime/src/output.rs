//! Structured output recovery from reasoning provider text.
//!
//! Providers are asked for bare JSON but routinely wrap it in a fenced block
//! or a sentence of prose. Recovery tries, in order:
//! 1. the whole text as JSON
//! 2. the first fenced block (```` ```json ```` or bare ```` ``` ````)
//! 3. the span between the outermost braces
//!
//! The first candidate that parses as a JSON object is then checked against
//! the expected schema. There is no best-effort repair.

use lazy_static::lazy_static;
use regex::Regex;
use serde::de::DeserializeOwned;
use serde_json::Value;
use thiserror::Error;

use searisk_core::{parse_document, SchemaDocument, SchemaError};

lazy_static! {
    static ref FENCED_JSON: Regex =
        Regex::new(r"(?s)```(?:json)?\s*(\{.*?\})\s*```").unwrap();
}

/// Errors from output recovery.
#[derive(Error, Debug)]
pub enum OutputError {
    #[error("no JSON object found in provider output")]
    NoJson,

    #[error("provider output does not match the expected shape: {0}")]
    Shape(#[from] SchemaError),
}

/// Locate the first JSON object in `text`.
pub fn extract_json(text: &str) -> Option<Value> {
    let trimmed = text.trim();

    if let Some(value) = parse_object(trimmed) {
        return Some(value);
    }

    if let Some(value) = FENCED_JSON
        .captures(trimmed)
        .and_then(|c| c.get(1))
        .and_then(|m| parse_object(m.as_str()))
    {
        return Some(value);
    }

    let start = trimmed.find('{')?;
    let end = trimmed.rfind('}')?;
    if end <= start {
        return None;
    }
    parse_object(&trimmed[start..=end])
}

fn parse_object(candidate: &str) -> Option<Value> {
    serde_json::from_str::<Value>(candidate)
        .ok()
        .filter(Value::is_object)
}

/// Recover a typed document of kind `document` from provider text.
pub fn parse_output<T: DeserializeOwned>(
    text: &str,
    document: SchemaDocument,
) -> Result<T, OutputError> {
    let value = extract_json(text).ok_or(OutputError::NoJson)?;
    Ok(parse_document(document, value)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use searisk_core::{MitigationResponse, WeatherRiskOutput};

    const WEATHER: &str = r#"{"risk_score": 4, "risk_description": "Moderate swell", "weather_summary": "Trade winds", "estimated_travel_days": 18}"#;

    #[test]
    fn test_bare_json() {
        let value = extract_json(WEATHER).unwrap();
        assert_eq!(value["risk_score"], 4);
    }

    #[test]
    fn test_fenced_json() {
        let text = format!("Here is the assessment:\n```json\n{}\n```\nStay safe.", WEATHER);
        let out: WeatherRiskOutput = parse_output(&text, SchemaDocument::WeatherRiskOutput).unwrap();
        assert_eq!(out.estimated_travel_days, 18);
    }

    #[test]
    fn test_unlabelled_fence() {
        let text = format!("```\n{}\n```", WEATHER);
        assert!(extract_json(&text).is_some());
    }

    #[test]
    fn test_json_in_prose() {
        let text = format!("Assessment follows {} as requested.", WEATHER);
        let out: WeatherRiskOutput = parse_output(&text, SchemaDocument::WeatherRiskOutput).unwrap();
        assert_eq!(out.risk_score, 4);
    }

    #[test]
    fn test_no_json() {
        let err = parse_output::<MitigationResponse>(
            "I cannot help with that.",
            SchemaDocument::MitigationResponse,
        )
        .unwrap_err();
        assert!(matches!(err, OutputError::NoJson));
    }

    #[test]
    fn test_array_is_not_an_object() {
        assert!(extract_json("[1, 2, 3]").is_none());
    }

    proptest! {
        #[test]
        fn prop_recovered_from_brace_free_prose(
            before in "[a-zA-Z0-9 .,:\n]{0,40}",
            after in "[a-zA-Z0-9 .,:\n]{0,40}",
        ) {
            let text = format!("{}{}{}", before, WEATHER, after);
            let value = extract_json(&text).unwrap();
            prop_assert_eq!(&value["weather_summary"], "Trade winds");
        }
    }

    #[test]
    fn test_wrong_shape() {
        let err = parse_output::<MitigationResponse>(
            r#"{"overall_risk_assessment": "High"}"#,
            SchemaDocument::MitigationResponse,
        )
        .unwrap_err();
        assert!(matches!(err, OutputError::Shape(_)));
    }
}
