//! Prompts for the three assessment variants.
//!
//! Each conversation is two messages:
//! 1. A variant system prompt (role, factors to weigh, JSON-only reply)
//! 2. The rendered context followed by the variant's output format

use searisk_core::RequestVariant;

use crate::providers::ChatMessage;

/// System prompt for mitigation planning.
pub const MITIGATION_SYSTEM_PROMPT: &str = "You are a shipping logistics expert specializing in \
risk mitigation. Provide practical, actionable strategies for reducing shipping risks. \
Format your response as valid JSON with the structure specified.";

/// System prompt for weather risk assessment.
pub const WEATHER_SYSTEM_PROMPT: &str = r#"
You are an expert maritime risk analyst. You know weather patterns and their
impact on vessel operations, maritime safety, cargo protection, and the
seasonal hazards of international shipping lanes.

Weigh these factors:
- Wind speed and direction
- Wave height and sea state
- Visibility
- Precipitation and deck operations
- Temperature extremes for cargo and crew
- Seasonal patterns for the route and the cargo's sensitivity to them

Be conservative: err on the side of cargo and crew safety.
Reply with a single JSON object and nothing else.
"#;

/// System prompt for geopolitical risk assessment.
pub const GEOPOLITICAL_SYSTEM_PROMPT: &str = r#"
You are an expert geopolitical risk analyst specializing in maritime security
and international trade.

Weigh these factors:
- Political stability of the departure and destination countries
- Sanctions, embargoes and trade restrictions affecting the cargo
- Piracy, terrorism and naval conflict along the route
- Current status of chokepoints and strategic waterways
- Port security and labor disputes
- Recent events reported for the route
- The route analysis: distance, travel days, seasonal factors, country profiles

Focus on actionable intelligence for shipping decision-makers.
Reply with a single JSON object and nothing else.
"#;

const MITIGATION_FORMAT: &str = r#"
Provide a risk mitigation analysis in the following JSON format:

{
  "overall_risk_assessment": "Overall assessment of the risk level and key concerns",
  "recommended_action": "Primary action, e.g. proceed as planned, delay, reroute",
  "strategies": [
    {
      "strategy_type": "Weather Mitigation | Route Optimization | Documentation & Compliance | Insurance & Financial | Operational Adjustment",
      "priority": "High | Medium | Low",
      "description": "What to do",
      "implementation_time": "e.g. immediate, 1-2 days, 1 week",
      "cost_impact": "e.g. minimal, moderate, significant",
      "risk_reduction": "e.g. 25-35%, moderate reduction"
    }
  ],
  "alternative_routes": ["Alternative routes, if any"],
  "timeline_recommendations": "Timing advice, e.g. delay by 3 days",
  "compliance_checks": ["Specific documents and forms to verify, by name and number"]
}

Address the specific weather and geopolitical risks above. At least one strategy is required.
"#;

const WEATHER_FORMAT: &str = r#"
Assess the weather-related risk for this shipment, considering weather impact
on vessel operations, seasonal patterns, risks specific to the cargo, and port
conditions for loading and unloading.

Respond in JSON format:
{
  "risk_score": <integer 1-10>,
  "risk_description": "<detailed explanation of risks and reasoning>",
  "weather_summary": "<key weather conditions affecting the route>",
  "estimated_travel_days": <integer 1-365>
}
"#;

const GEOPOLITICAL_FORMAT: &str = r#"
Assess the geopolitical and security risk for this shipment, considering
bilateral relations, sanctions, maritime security threats, chokepoint status,
port labor conditions and cargo-specific restrictions.

Respond in JSON format:
{
  "risk_score": <integer 1-10>,
  "risk_description": "<specific threats and recommended precautions>",
  "geopolitical_summary": "<key political and security factors for this route>",
  "shipping_lanes": "<lanes the voyage is likely to use>"
}
"#;

/// Get the system prompt for a variant.
pub fn system_prompt(variant: RequestVariant) -> &'static str {
    match variant {
        RequestVariant::Mitigation => MITIGATION_SYSTEM_PROMPT,
        RequestVariant::Weather => WEATHER_SYSTEM_PROMPT.trim(),
        RequestVariant::Geopolitical => GEOPOLITICAL_SYSTEM_PROMPT.trim(),
    }
}

/// Get the output format instructions for a variant.
pub fn output_format(variant: RequestVariant) -> &'static str {
    match variant {
        RequestVariant::Mitigation => MITIGATION_FORMAT,
        RequestVariant::Weather => WEATHER_FORMAT,
        RequestVariant::Geopolitical => GEOPOLITICAL_FORMAT,
    }
}

/// Assemble the conversation for `variant` around a rendered context.
pub fn conversation(variant: RequestVariant, context: &str) -> Vec<ChatMessage> {
    let user = format!("{}{}", context, output_format(variant));
    vec![
        ChatMessage::system(system_prompt(variant)),
        ChatMessage::user(user),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    const ALL: [RequestVariant; 3] = [
        RequestVariant::Mitigation,
        RequestVariant::Weather,
        RequestVariant::Geopolitical,
    ];

    #[test]
    fn test_every_variant_asks_for_json() {
        for variant in ALL {
            assert!(system_prompt(variant).contains("JSON"));
            assert!(output_format(variant).contains('{'));
        }
    }

    #[test]
    fn test_formats_name_required_fields() {
        assert!(MITIGATION_FORMAT.contains("\"strategies\""));
        assert!(MITIGATION_FORMAT.contains("High | Medium | Low"));
        assert!(WEATHER_FORMAT.contains("\"estimated_travel_days\""));
        assert!(GEOPOLITICAL_FORMAT.contains("\"shipping_lanes\""));
    }

    #[test]
    fn test_conversation_shape() {
        let messages = conversation(RequestVariant::Weather, "SHIPPING DETAILS:\n- Route: A → B\n");
        assert_eq!(messages.len(), 2);
        assert_eq!(messages[0].role, "system");
        assert!(!messages[0].content.starts_with('\n'));
        assert!(messages[1].content.starts_with("SHIPPING DETAILS:"));
        assert!(messages[1].content.contains("risk_score"));
    }
}
