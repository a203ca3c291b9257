//! JSON Schema validation for requests and reasoning output.
//!
//! Schemas live under `schemas/` at the workspace root and are embedded at
//! compile time. Each is compiled once per process and reused.
//!
//! Validation reports every problem found, not just the first, as
//! [`FieldIssue`]s with dotted locations.

use std::sync::OnceLock;

use jsonschema::error::ValidationErrorKind;
use jsonschema::{ValidationError, Validator};
use serde_json::Value;
use thiserror::Error;

use crate::types::{FieldIssue, IssueKind};

const SHIPPING_REQUEST_SCHEMA_JSON: &str =
    include_str!("../../../schemas/shipping_request.schema.json");
const MITIGATION_RESPONSE_SCHEMA_JSON: &str =
    include_str!("../../../schemas/mitigation_response.schema.json");
const WEATHER_RISK_OUTPUT_SCHEMA_JSON: &str =
    include_str!("../../../schemas/weather_risk_output.schema.json");
const GEOPOLITICAL_RISK_OUTPUT_SCHEMA_JSON: &str =
    include_str!("../../../schemas/geopolitical_risk_output.schema.json");

static SHIPPING_REQUEST: OnceLock<Result<Validator, String>> = OnceLock::new();
static MITIGATION_RESPONSE: OnceLock<Result<Validator, String>> = OnceLock::new();
static WEATHER_RISK_OUTPUT: OnceLock<Result<Validator, String>> = OnceLock::new();
static GEOPOLITICAL_RISK_OUTPUT: OnceLock<Result<Validator, String>> = OnceLock::new();

/// The embedded schema documents.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SchemaDocument {
    /// Client-submitted shipping plan
    ShippingRequest,
    /// Mitigation plan produced by the reasoning provider
    MitigationResponse,
    /// Weather risk fields produced by the reasoning provider
    WeatherRiskOutput,
    /// Geopolitical risk fields produced by the reasoning provider
    GeopoliticalRiskOutput,
}

impl SchemaDocument {
    fn source(&self) -> &'static str {
        match self {
            SchemaDocument::ShippingRequest => SHIPPING_REQUEST_SCHEMA_JSON,
            SchemaDocument::MitigationResponse => MITIGATION_RESPONSE_SCHEMA_JSON,
            SchemaDocument::WeatherRiskOutput => WEATHER_RISK_OUTPUT_SCHEMA_JSON,
            SchemaDocument::GeopoliticalRiskOutput => GEOPOLITICAL_RISK_OUTPUT_SCHEMA_JSON,
        }
    }

    fn cell(&self) -> &'static OnceLock<Result<Validator, String>> {
        match self {
            SchemaDocument::ShippingRequest => &SHIPPING_REQUEST,
            SchemaDocument::MitigationResponse => &MITIGATION_RESPONSE,
            SchemaDocument::WeatherRiskOutput => &WEATHER_RISK_OUTPUT,
            SchemaDocument::GeopoliticalRiskOutput => &GEOPOLITICAL_RISK_OUTPUT,
        }
    }
}

/// Errors from schema validation.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SchemaError {
    #[error("Failed to load schema: {0}")]
    LoadError(String),

    #[error("Validation failed with {} issue(s)", .0.len())]
    Invalid(Vec<FieldIssue>),
}

impl SchemaError {
    /// Field issues carried by this error, empty for load failures.
    pub fn issues(&self) -> &[FieldIssue] {
        match self {
            SchemaError::Invalid(issues) => issues,
            SchemaError::LoadError(_) => &[],
        }
    }
}

fn get_validator(document: SchemaDocument) -> Result<&'static Validator, SchemaError> {
    let result = document.cell().get_or_init(|| {
        let schema_value: Value = match serde_json::from_str(document.source()) {
            Ok(v) => v,
            Err(e) => return Err(format!("Invalid schema JSON: {}", e)),
        };

        match jsonschema::options().build(&schema_value) {
            Ok(v) => Ok(v),
            Err(e) => Err(format!("Failed to compile schema: {}", e)),
        }
    });

    match result {
        Ok(v) => Ok(v),
        Err(e) => Err(SchemaError::LoadError(e.clone())),
    }
}

/// Validate a JSON value against one of the embedded schemas.
///
/// # Returns
///
/// * `Ok(())` - Value conforms
/// * `Err(SchemaError::Invalid(_))` - Every structural problem found
pub fn validate_document(document: SchemaDocument, value: &Value) -> Result<(), SchemaError> {
    let validator = get_validator(document)?;

    let issues: Vec<FieldIssue> = validator.iter_errors(value).map(|e| to_issue(&e)).collect();

    if issues.is_empty() {
        Ok(())
    } else {
        Err(SchemaError::Invalid(issues))
    }
}

/// Check if a value conforms without collecting issues.
pub fn is_valid_document(document: SchemaDocument, value: &Value) -> bool {
    get_validator(document)
        .map(|v| v.is_valid(value))
        .unwrap_or(false)
}

/// Convert a JSON pointer (`/a/0/b`) into a dotted location (`a.0.b`).
fn dotted(pointer: &str) -> String {
    pointer
        .split('/')
        .filter(|segment| !segment.is_empty())
        .map(|segment| segment.replace("~1", "/").replace("~0", "~"))
        .collect::<Vec<_>>()
        .join(".")
}

fn join_location(parent: &str, child: &str) -> String {
    if parent.is_empty() {
        child.to_string()
    } else {
        format!("{}.{}", parent, child)
    }
}

fn to_issue(error: &ValidationError<'_>) -> FieldIssue {
    let location = dotted(&error.instance_path.to_string());

    match &error.kind {
        ValidationErrorKind::Required { property } => {
            let name = property.as_str().map(str::to_string).unwrap_or_else(|| property.to_string());
            FieldIssue::new(join_location(&location, &name), "field required", IssueKind::Missing)
        }
        ValidationErrorKind::AdditionalProperties { unexpected } => FieldIssue::new(
            join_location(&location, &unexpected.join(",")),
            "unknown field",
            IssueKind::UnknownField,
        ),
        ValidationErrorKind::Minimum { .. }
        | ValidationErrorKind::Maximum { .. }
        | ValidationErrorKind::ExclusiveMinimum { .. }
        | ValidationErrorKind::ExclusiveMaximum { .. } => {
            FieldIssue::new(location, "out of range", IssueKind::Range)
        }
        ValidationErrorKind::MinLength { .. } => {
            // Whitespace-only text reads as empty to the caller
            let blank = error
                .instance
                .as_str()
                .map(|s| s.trim().is_empty())
                .unwrap_or(false);
            if blank {
                FieldIssue::new(location, "field cannot be empty", IssueKind::Empty)
            } else {
                FieldIssue::new(location, "text is too short", IssueKind::Length)
            }
        }
        ValidationErrorKind::MaxLength { .. } => {
            FieldIssue::new(location, "text is too long", IssueKind::Length)
        }
        ValidationErrorKind::MinItems { .. } => {
            FieldIssue::new(location, "list has too few items", IssueKind::Length)
        }
        ValidationErrorKind::Type { .. } => {
            FieldIssue::new(location, error.to_string(), IssueKind::Type)
        }
        ValidationErrorKind::Pattern { .. } => {
            FieldIssue::new(location, "value does not match expected format", IssueKind::Pattern)
        }
        ValidationErrorKind::Enum { .. } => {
            FieldIssue::new(location, error.to_string(), IssueKind::Enum)
        }
        _ => FieldIssue::new(location, error.to_string(), IssueKind::Format),
    }
}
