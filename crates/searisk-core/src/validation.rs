//! Validation rules for shipping plans.
//!
//! A request is accepted in two passes:
//! 1. Structural: the embedded request schema (types, lengths, ranges,
//!    required and unknown fields)
//! 2. Rules: trimming, port name allow-list, departure date window and the
//!    variant's required sections
//!
//! Both passes always run and their failures are reported together, so a
//! caller can fix everything in one round trip.

use std::collections::HashSet;

use chrono::{Duration, NaiveDate};
use lazy_static::lazy_static;
use regex::Regex;
use serde_json::Value;

use crate::schema::{validate_document, SchemaDocument, SchemaError};
use crate::types::{FieldIssue, IssueKind, RequestVariant, ShippingRiskRequest};

/// Furthest a departure may be scheduled ahead of today.
pub const MAX_DAYS_AHEAD: i64 = 365;

pub const MSG_EMPTY: &str = "field cannot be empty";
pub const MSG_INVALID_PORT: &str = "port name contains invalid characters";
pub const MSG_DATE_PAST: &str = "departure date cannot be in the past";
pub const MSG_DATE_TOO_FAR: &str = "departure date too far in future";
pub const MSG_REQUIRED: &str = "field required";
pub const MSG_BAD_CALENDAR_DATE: &str = "invalid calendar date, expected YYYY-MM-DD";

lazy_static! {
    /// Letters, digits, whitespace, hyphen and period
    pub static ref PORT_NAME_PATTERN: Regex = Regex::new(r"^[a-zA-Z0-9\s\-\.]+$").unwrap();
}

/// Check a port name against the allow-list.
pub fn is_valid_port_name(name: &str) -> bool {
    PORT_NAME_PATTERN.is_match(name)
}

/// Check a departure date against the window `[today, today + 365 days]`.
pub fn check_departure_date(date: NaiveDate, today: NaiveDate) -> Option<FieldIssue> {
    if date < today {
        return Some(FieldIssue::new(
            "departure_date",
            MSG_DATE_PAST,
            IssueKind::DateInPast,
        ));
    }
    if date > today + Duration::days(MAX_DAYS_AHEAD) {
        return Some(FieldIssue::new(
            "departure_date",
            MSG_DATE_TOO_FAR,
            IssueKind::DateTooFar,
        ));
    }
    None
}

/// Trim `value` in place, reporting an issue if nothing is left.
fn trim_required(value: &mut String, location: &str, issues: &mut Vec<FieldIssue>) {
    let trimmed = value.trim();
    if trimmed.len() != value.len() {
        *value = trimmed.to_string();
    }
    if value.is_empty() {
        issues.push(FieldIssue::new(location, MSG_EMPTY, IssueKind::Empty));
    }
}

fn trim_port(value: &mut String, location: &str, issues: &mut Vec<FieldIssue>) {
    trim_required(value, location, issues);
    if !value.is_empty() && !is_valid_port_name(value) {
        issues.push(FieldIssue::new(
            location,
            MSG_INVALID_PORT,
            IssueKind::InvalidCharacters,
        ));
    }
}

fn text_at(value: &Value, location: &str) -> Option<String> {
    let pointer = format!("/{}", location.replace('.', "/"));
    value.pointer(&pointer).and_then(Value::as_str).map(str::to_string)
}

/// Rule pass over an untyped body.
///
/// Only fields that are present and of the right JSON type are checked, so
/// this can run alongside a failed schema pass.
fn rule_issues(value: &Value, variant: RequestVariant, today: NaiveDate) -> Vec<FieldIssue> {
    let mut issues = Vec::new();

    for location in ["departure_port", "destination_port"] {
        if let Some(mut port) = text_at(value, location) {
            trim_port(&mut port, location, &mut issues);
        }
    }

    // The schema only checks the date's shape
    if let Some(raw) = value.get("departure_date").and_then(Value::as_str) {
        match NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
            Ok(date) => issues.extend(check_departure_date(date, today)),
            Err(_) => issues.push(FieldIssue::new(
                "departure_date",
                MSG_BAD_CALENDAR_DATE,
                IssueKind::Format,
            )),
        }
    }

    for location in ["carrier_name", "goods_type"] {
        if let Some(mut text) = text_at(value, location) {
            trim_required(&mut text, location, &mut issues);
        }
    }

    let sections: [(&str, &[&str]); 2] = [
        ("weather_conditions", &["risk_description", "weather_summary"]),
        (
            "geopolitical_conditions",
            &["risk_description", "geopolitical_summary", "shipping_lanes"],
        ),
    ];
    for (section, fields) in sections {
        match value.get(section) {
            Some(Value::Object(_)) => {
                for field in fields {
                    let location = format!("{}.{}", section, field);
                    if let Some(mut text) = text_at(value, &location) {
                        trim_required(&mut text, &location, &mut issues);
                    }
                }
            }
            None | Some(Value::Null) if variant.requires_conditions() => {
                issues.push(FieldIssue::new(section, MSG_REQUIRED, IssueKind::Missing))
            }
            _ => {}
        }
    }

    issues
}

impl ShippingRiskRequest {
    /// Build a validated request from an untyped JSON body.
    ///
    /// # Arguments
    /// * `value` - The request body
    /// * `variant` - Which assessment the request is for
    /// * `today` - Reference date for the departure window
    ///
    /// # Returns
    /// A trimmed, fully validated request, or every problem found.
    pub fn from_value(
        value: &Value,
        variant: RequestVariant,
        today: NaiveDate,
    ) -> Result<Self, SchemaError> {
        let mut issues = match validate_document(SchemaDocument::ShippingRequest, value) {
            Ok(()) => Vec::new(),
            Err(SchemaError::Invalid(issues)) => issues,
            Err(e) => return Err(e),
        };

        // A field the schema already rejected is reported once
        let reported: HashSet<String> = issues.iter().map(|i| i.location.clone()).collect();
        issues.extend(
            rule_issues(value, variant, today)
                .into_iter()
                .filter(|issue| !reported.contains(&issue.location)),
        );

        if !issues.is_empty() {
            tracing::debug!(issue_count = issues.len(), "Request failed validation");
            return Err(SchemaError::Invalid(issues));
        }

        let mut request: ShippingRiskRequest =
            serde_json::from_value(value.clone()).map_err(|e| {
                SchemaError::Invalid(vec![FieldIssue::new("body", e.to_string(), IssueKind::Type)])
            })?;

        request.normalize(variant, today)?;
        Ok(request)
    }

    /// Trim text fields in place and apply the rule pass.
    ///
    /// Idempotent: normalizing an already normalized request changes nothing.
    pub fn normalize(&mut self, variant: RequestVariant, today: NaiveDate) -> Result<(), SchemaError> {
        let mut issues = Vec::new();

        trim_port(&mut self.departure_port, "departure_port", &mut issues);
        trim_port(&mut self.destination_port, "destination_port", &mut issues);

        if let Some(issue) = check_departure_date(self.departure_date, today) {
            issues.push(issue);
        }

        trim_required(&mut self.carrier_name, "carrier_name", &mut issues);
        trim_required(&mut self.goods_type, "goods_type", &mut issues);

        match self.weather_conditions.as_mut() {
            Some(weather) => {
                trim_required(
                    &mut weather.risk_description,
                    "weather_conditions.risk_description",
                    &mut issues,
                );
                trim_required(
                    &mut weather.weather_summary,
                    "weather_conditions.weather_summary",
                    &mut issues,
                );
            }
            None if variant.requires_conditions() => issues.push(FieldIssue::new(
                "weather_conditions",
                MSG_REQUIRED,
                IssueKind::Missing,
            )),
            None => {}
        }

        match self.geopolitical_conditions.as_mut() {
            Some(geo) => {
                trim_required(
                    &mut geo.risk_description,
                    "geopolitical_conditions.risk_description",
                    &mut issues,
                );
                trim_required(
                    &mut geo.geopolitical_summary,
                    "geopolitical_conditions.geopolitical_summary",
                    &mut issues,
                );
                trim_required(
                    &mut geo.shipping_lanes,
                    "geopolitical_conditions.shipping_lanes",
                    &mut issues,
                );
            }
            None if variant.requires_conditions() => issues.push(FieldIssue::new(
                "geopolitical_conditions",
                MSG_REQUIRED,
                IssueKind::Missing,
            )),
            None => {}
        }

        if issues.is_empty() {
            Ok(())
        } else {
            tracing::debug!(issue_count = issues.len(), "Request failed rule validation");
            Err(SchemaError::Invalid(issues))
        }
    }

    /// Route label, e.g. `Los Angeles → Shanghai`.
    pub fn route(&self) -> String {
        format!("{} → {}", self.departure_port, self.destination_port)
    }
}
