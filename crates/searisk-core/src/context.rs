//! Structured context handed to the reasoning provider.
//!
//! The context carries the route metadata plus every populated field of the
//! request's weather snapshots and assessment text. Nothing populated is
//! dropped.

use crate::types::{
    CountryRiskProfile, GeopoliticalAssessment, GeopoliticalEvent, RouteAnalysis,
    ShippingRiskRequest, WeatherAssessment, WeatherSnapshot,
};

/// A titled block of `label: value` lines.
#[derive(Debug, Clone, PartialEq)]
pub struct ContextSection {
    pub title: String,
    pub lines: Vec<(String, String)>,
}

impl ContextSection {
    fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            lines: Vec::new(),
        }
    }

    fn line(mut self, label: impl Into<String>, value: impl Into<String>) -> Self {
        self.lines.push((label.into(), value.into()));
        self
    }

    fn render(&self, out: &mut String) {
        out.push_str(&self.title);
        out.push_str(":\n");
        for (label, value) in &self.lines {
            out.push_str("- ");
            out.push_str(label);
            out.push_str(": ");
            out.push_str(value);
            out.push('\n');
        }
    }
}

/// Builds the reasoning context for a validated request.
#[derive(Debug, Clone, Default)]
pub struct ContextBuilder {
    sections: Vec<ContextSection>,
}

impl ContextBuilder {
    /// Start from a validated request: route metadata plus any embedded assessments.
    pub fn for_request(request: &ShippingRiskRequest) -> Self {
        let mut builder = Self::default();

        builder.sections.push(
            ContextSection::new("SHIPPING DETAILS")
                .line("Route", request.route())
                .line("Departure Date", request.departure_date.format("%Y-%m-%d").to_string())
                .line("Carrier", request.carrier_name.as_str())
                .line("Goods Type", request.goods_type.as_str()),
        );

        if let Some(weather) = &request.weather_conditions {
            builder.push_weather_assessment(weather);
        }
        if let Some(geo) = &request.geopolitical_conditions {
            builder.push_geopolitical_assessment(geo);
        }

        builder
    }

    fn push_weather_assessment(&mut self, weather: &WeatherAssessment) {
        self.sections.push(
            ContextSection::new(format!(
                "WEATHER CONDITIONS (Risk Score: {}/10)",
                weather.risk_score
            ))
            .line("Summary", weather.weather_summary.as_str())
            .line("Risk Description", weather.risk_description.as_str())
            .line("Estimated Travel Days", weather.estimated_travel_days.to_string()),
        );
        self.push_snapshot("DEPARTURE WEATHER", &weather.departure_weather);
        self.push_snapshot("DESTINATION WEATHER", &weather.destination_weather);
    }

    fn push_geopolitical_assessment(&mut self, geo: &GeopoliticalAssessment) {
        let mut section = ContextSection::new(format!(
            "GEOPOLITICAL CONDITIONS (Risk Score: {}/10)",
            geo.risk_score
        ))
        .line("Summary", geo.geopolitical_summary.as_str())
        .line("Risk Description", geo.risk_description.as_str());

        if !geo.chokepoints.is_empty() {
            section = section.line("Chokepoints", geo.chokepoints.join(", "));
        }
        if !geo.security_zones.is_empty() {
            section = section.line("Security Zones", geo.security_zones.join(", "));
        }
        self.sections
            .push(section.line("Shipping Lanes", geo.shipping_lanes.as_str()));
    }

    fn push_snapshot(&mut self, title: &str, snapshot: &WeatherSnapshot) {
        let fields = snapshot.populated_fields();
        if fields.is_empty() {
            return;
        }
        let mut section = ContextSection::new(title);
        for (label, value) in fields {
            section = section.line(label, value);
        }
        self.sections.push(section);
    }

    /// Add conditions fetched for both ports.
    pub fn observed_weather(
        mut self,
        departure: &WeatherSnapshot,
        destination: &WeatherSnapshot,
    ) -> Self {
        self.push_snapshot("OBSERVED DEPARTURE WEATHER", departure);
        self.push_snapshot("OBSERVED DESTINATION WEATHER", destination);
        self
    }

    /// Add the route's geography and the risk profiles of both countries.
    pub fn route_analysis(
        mut self,
        analysis: &RouteAnalysis,
        departure: &CountryRiskProfile,
        destination: &CountryRiskProfile,
    ) -> Self {
        let mut section = ContextSection::new("ROUTE ANALYSIS")
            .line(
                "Countries",
                format!("{} → {}", analysis.departure_country, analysis.destination_country),
            )
            .line("Distance", format!("{} km", analysis.distance_km))
            .line("Estimated Travel Days", analysis.travel_days.to_string());
        if !analysis.chokepoints.is_empty() {
            section = section.line("Chokepoints", analysis.chokepoints.join(", "));
        }
        if !analysis.security_zones.is_empty() {
            section = section.line("Security Zones", analysis.security_zones.join(", "));
        }
        self.sections.push(
            section
                .line("Shipping Lanes", analysis.shipping_lanes.as_str())
                .line("Seasonal Factors", analysis.seasonal_factors.as_str())
                .line("Alternative Routes", analysis.alternative_routes.as_str())
                .line("Cargo Risks", analysis.goods_specific_risks.as_str()),
        );

        self.push_country("DEPARTURE COUNTRY RISK", departure);
        self.push_country("DESTINATION COUNTRY RISK", destination);
        self
    }

    fn push_country(&mut self, title: &str, profile: &CountryRiskProfile) {
        self.sections.push(
            ContextSection::new(format!("{} ({})", title, profile.country))
                .line("Political Stability", format!("{}/10", profile.political_stability))
                .line("Trade Freedom", format!("{}/100", profile.trade_freedom))
                .line("Corruption", profile.corruption_level.as_str())
                .line("Security Threat", profile.security_threat.as_str())
                .line("Sanctions", profile.sanctions_status.as_str())
                .line("Port Security", profile.port_security.as_str())
                .line("Labor", profile.labor_conditions.as_str())
                .line("Regulatory Stability", profile.regulatory_stability.as_str())
                .line("Cargo Restrictions", profile.cargo_restrictions.as_str()),
        );
    }

    /// Add chokepoints, security zones and recent events gathered for the route.
    pub fn route_intelligence(
        mut self,
        chokepoints: &[String],
        security_zones: &[String],
        events: &[GeopoliticalEvent],
    ) -> Self {
        let mut section = ContextSection::new("ROUTE INTELLIGENCE");
        if !chokepoints.is_empty() {
            section = section.line("Chokepoints mentioned", chokepoints.join(", "));
        }
        if !security_zones.is_empty() {
            section = section.line("Security zones mentioned", security_zones.join(", "));
        }
        if !section.lines.is_empty() {
            self.sections.push(section);
        }

        if !events.is_empty() {
            let mut recent = ContextSection::new("RECENT EVENTS");
            for event in events {
                let dated = match event.published_at {
                    Some(at) => format!("{} ({})", event.title, at.format("%Y-%m-%d")),
                    None => event.title.clone(),
                };
                let body = if event.summary.is_empty() {
                    event.source.clone()
                } else {
                    format!("{} [{}]", event.summary, event.source)
                };
                recent = recent.line(dated, body);
            }
            self.sections.push(recent);
        }
        self
    }

    /// Sections in insertion order.
    pub fn sections(&self) -> &[ContextSection] {
        &self.sections
    }

    /// Render all sections as plain text.
    pub fn build(&self) -> String {
        let mut out = String::new();
        for (i, section) in self.sections.iter().enumerate() {
            if i > 0 {
                out.push('\n');
            }
            section.render(&mut out);
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn request() -> ShippingRiskRequest {
        ShippingRiskRequest {
            departure_port: "Rotterdam".to_string(),
            destination_port: "Singapore".to_string(),
            departure_date: NaiveDate::from_ymd_opt(2025, 9, 10).unwrap(),
            carrier_name: "CMA CGM".to_string(),
            goods_type: "Machinery".to_string(),
            weather_conditions: Some(WeatherAssessment {
                risk_score: 4,
                risk_description: "Monsoon season".to_string(),
                weather_summary: "Heavy rain near Malacca".to_string(),
                departure_weather: WeatherSnapshot {
                    temperature_c: Some(14.0),
                    visibility_km: Some(8.5),
                    ..Default::default()
                },
                destination_weather: WeatherSnapshot {
                    conditions: Some("Thunderstorms".to_string()),
                    swell_height_m: Some(1.8),
                    ..Default::default()
                },
                estimated_travel_days: 28,
            }),
            geopolitical_conditions: Some(GeopoliticalAssessment {
                risk_score: 8,
                risk_description: "Red Sea disruptions".to_string(),
                geopolitical_summary: "Attacks on merchant vessels".to_string(),
                chokepoints: vec!["Bab el-Mandeb".to_string(), "Suez Canal".to_string()],
                security_zones: vec![],
                shipping_lanes: "Asia-Europe via Suez".to_string(),
            }),
        }
    }

    #[test]
    fn test_every_populated_field_present() {
        let text = ContextBuilder::for_request(&request()).build();
        for expected in [
            "Rotterdam → Singapore",
            "2025-09-10",
            "CMA CGM",
            "Machinery",
            "Risk Score: 4/10",
            "Monsoon season",
            "Heavy rain near Malacca",
            "28",
            "14 °C",
            "8.5 km",
            "Thunderstorms",
            "1.8 m",
            "Risk Score: 8/10",
            "Red Sea disruptions",
            "Attacks on merchant vessels",
            "Bab el-Mandeb, Suez Canal",
            "Asia-Europe via Suez",
        ] {
            assert!(text.contains(expected), "context missing {:?}", expected);
        }
        assert!(!text.contains("Security Zones"));
    }

    #[test]
    fn test_route_only_request() {
        let mut req = request();
        req.weather_conditions = None;
        req.geopolitical_conditions = None;
        let builder = ContextBuilder::for_request(&req);
        assert_eq!(builder.sections().len(), 1);
        assert_eq!(builder.sections()[0].title, "SHIPPING DETAILS");
    }

    #[test]
    fn test_observed_weather_and_intelligence() {
        let mut req = request();
        req.weather_conditions = None;
        req.geopolitical_conditions = None;

        let departure = WeatherSnapshot {
            wind_speed_kph: Some(32.0),
            ..Default::default()
        };
        let events = vec![GeopoliticalEvent {
            title: "Convoy rerouted".to_string(),
            summary: String::new(),
            source: "Lloyd's List".to_string(),
            published_at: None,
            url: None,
        }];
        let text = ContextBuilder::for_request(&req)
            .observed_weather(&departure, &WeatherSnapshot::default())
            .route_intelligence(&["Suez Canal".to_string()], &[], &events)
            .build();

        assert!(text.contains("OBSERVED DEPARTURE WEATHER"));
        assert!(!text.contains("OBSERVED DESTINATION WEATHER"));
        assert!(text.contains("Chokepoints mentioned: Suez Canal"));
        assert!(text.contains("- Convoy rerouted: Lloyd's List"));
    }

    #[test]
    fn test_route_analysis_sections() {
        let req = request();
        let analysis = RouteAnalysis::for_request(&req);
        let departure = crate::route::country_profile("Netherlands", &req.goods_type);
        let destination = crate::route::country_profile("Singapore", &req.goods_type);
        let builder = ContextBuilder::for_request(&req).route_analysis(&analysis, &departure, &destination);

        let titles: Vec<_> = builder.sections().iter().map(|s| s.title.as_str()).collect();
        assert!(titles.contains(&"ROUTE ANALYSIS"));
        assert!(titles.contains(&"DEPARTURE COUNTRY RISK (Netherlands)"));
        assert!(titles.contains(&"DESTINATION COUNTRY RISK (Singapore)"));

        let text = builder.build();
        assert!(text.contains("Countries: Netherlands → Singapore"));
        assert!(text.contains("Chokepoints: Suez Canal, Strait of Malacca"));
        assert!(text.contains("Cargo Restrictions: Dual-use export license may be required"));
    }
}
