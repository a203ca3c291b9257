//! Route geography.
//!
//! A static catalogue of major container ports and country baselines, and
//! the route analysis derived from them: chokepoints, security zones,
//! distance, travel time and seasonal factors. Ports are matched by name,
//! full name or UN/LOCODE, ignoring case. There is no fuzzy matching; an
//! unknown port yields an analysis with unknown country and fallback
//! distance and travel time.

use chrono::{Datelike, NaiveDate};

use crate::types::{CountryRiskProfile, RouteAnalysis, ShippingRiskRequest};

/// Distance reported when either port is not in the catalogue.
pub const FALLBACK_DISTANCE_KM: u32 = 10_000;

/// Travel time reported when either port is not in the catalogue.
pub const FALLBACK_TRAVEL_DAYS: u32 = 14;

const UNKNOWN: &str = "Unknown";
const EARTH_RADIUS_KM: f64 = 6371.0;
const SERVICE_SPEED_KNOTS: f64 = 22.0;
const KM_PER_NAUTICAL_MILE: f64 = 1.852;
const VOYAGE_EFFICIENCY: f64 = 0.65;
const BASE_PORT_DAYS: f64 = 2.0;

/// Shipping region of a port.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Region {
    NorthAmerica,
    SouthAmerica,
    EastAsia,
    SoutheastAsia,
    SouthAsia,
    MiddleEast,
    Europe,
    Africa,
    Oceania,
    Unknown,
}

impl Region {
    pub fn is_asia(&self) -> bool {
        matches!(self, Region::EastAsia | Region::SoutheastAsia | Region::SouthAsia)
    }

    pub fn is_americas(&self) -> bool {
        matches!(self, Region::NorthAmerica | Region::SouthAmerica)
    }

    pub fn is_europe(&self) -> bool {
        matches!(self, Region::Europe)
    }
}

/// A catalogued port.
#[derive(Debug, Clone, PartialEq)]
pub struct Port {
    pub key: &'static str,
    pub name: &'static str,
    pub code: &'static str,
    pub country: &'static str,
    pub latitude: f64,
    pub longitude: f64,
    pub region: Region,
    pub labor_stability: &'static str,
    pub infrastructure: &'static str,
}

macro_rules! port {
    ($key:expr, $name:expr, $code:expr, $country:expr, $lat:expr, $lon:expr, $region:ident, $labor:expr, $infra:expr) => {
        Port {
            key: $key,
            name: $name,
            code: $code,
            country: $country,
            latitude: $lat,
            longitude: $lon,
            region: Region::$region,
            labor_stability: $labor,
            infrastructure: $infra,
        }
    };
}

pub const PORTS: &[Port] = &[
    port!("Los Angeles", "Port of Los Angeles", "USLAX", "United States", 33.7361, -118.2922, NorthAmerica, "Good", "Excellent"),
    port!("Long Beach", "Port of Long Beach", "USLGB", "United States", 33.7700, -118.2100, NorthAmerica, "Good", "Excellent"),
    port!("New York", "Port of New York and New Jersey", "USNYC", "United States", 40.6700, -74.0400, NorthAmerica, "Good", "Excellent"),
    port!("Seattle", "Port of Seattle", "USSEA", "United States", 47.6062, -122.3321, NorthAmerica, "Good", "Very Good"),
    port!("Oakland", "Port of Oakland", "USOAK", "United States", 37.8044, -122.2711, NorthAmerica, "Fair", "Good"),
    port!("Savannah", "Port of Savannah", "USSAV", "United States", 32.0800, -81.0900, NorthAmerica, "Good", "Very Good"),
    port!("Charleston", "Port of Charleston", "USCHS", "United States", 32.7767, -79.9311, NorthAmerica, "Good", "Good"),
    port!("Houston", "Port of Houston", "USHOU", "United States", 29.7633, -95.3633, NorthAmerica, "Good", "Very Good"),
    port!("Miami", "Port of Miami", "USMIA", "United States", 25.7742, -80.1936, NorthAmerica, "Good", "Good"),
    port!("Vancouver", "Port of Vancouver", "CAVAN", "Canada", 49.2827, -123.1207, NorthAmerica, "Good", "Excellent"),
    port!("Shanghai", "Port of Shanghai", "CNSHA", "China", 31.2304, 121.4737, EastAsia, "Controlled", "Excellent"),
    port!("Shenzhen", "Port of Shenzhen", "CNSZN", "China", 22.5431, 114.0579, EastAsia, "Controlled", "Excellent"),
    port!("Ningbo", "Port of Ningbo-Zhoushan", "CNNGB", "China", 29.8683, 121.5440, EastAsia, "Controlled", "Very Good"),
    port!("Hong Kong", "Port of Hong Kong", "HKHKG", "Hong Kong SAR", 22.3193, 114.1694, EastAsia, "Good", "Excellent"),
    port!("Singapore", "Port of Singapore", "SGSIN", "Singapore", 1.2966, 103.7764, SoutheastAsia, "Excellent", "Excellent"),
    port!("Tokyo", "Port of Tokyo", "JPTYO", "Japan", 35.6528, 139.7594, EastAsia, "Excellent", "Excellent"),
    port!("Yokohama", "Port of Yokohama", "JPYOK", "Japan", 35.4647, 139.6221, EastAsia, "Excellent", "Excellent"),
    port!("Kobe", "Port of Kobe", "JPUKB", "Japan", 34.6901, 135.1956, EastAsia, "Excellent", "Very Good"),
    port!("Busan", "Port of Busan", "KRPUS", "South Korea", 35.1796, 129.0756, EastAsia, "Good", "Very Good"),
    port!("Kaohsiung", "Port of Kaohsiung", "TWKHH", "Taiwan", 22.6163, 120.3133, EastAsia, "Good", "Very Good"),
    port!("Rotterdam", "Port of Rotterdam", "NLRTM", "Netherlands", 51.9225, 4.4792, Europe, "Excellent", "Excellent"),
    port!("Antwerp", "Port of Antwerp", "BEANR", "Belgium", 51.2213, 4.4051, Europe, "Very Good", "Excellent"),
    port!("Hamburg", "Port of Hamburg", "DEHAM", "Germany", 53.5511, 9.9937, Europe, "Very Good", "Excellent"),
    port!("Felixstowe", "Port of Felixstowe", "GBFXT", "United Kingdom", 51.9542, 1.3511, Europe, "Good", "Very Good"),
    port!("Le Havre", "Port of Le Havre", "FRLEH", "France", 49.4944, 0.1079, Europe, "Fair", "Good"),
    port!("Genoa", "Port of Genoa", "ITGOA", "Italy", 44.4056, 8.9463, Europe, "Fair", "Good"),
    port!("Barcelona", "Port of Barcelona", "ESBCN", "Spain", 41.3851, 2.1734, Europe, "Good", "Good"),
    port!("Valencia", "Port of Valencia", "ESVLC", "Spain", 39.4699, -0.3763, Europe, "Good", "Good"),
    port!("Dubai", "Port of Dubai", "AEDXB", "United Arab Emirates", 25.2769, 55.2962, MiddleEast, "Good", "Very Good"),
    port!("Jebel Ali", "Jebel Ali Port", "AEJEA", "United Arab Emirates", 25.0118, 55.1370, MiddleEast, "Good", "Excellent"),
    port!("Santos", "Port of Santos", "BRSSZ", "Brazil", -23.9618, -46.3322, SouthAmerica, "Fair", "Good"),
    port!("Buenos Aires", "Port of Buenos Aires", "ARBUE", "Argentina", -34.6118, -58.3960, SouthAmerica, "Poor", "Fair"),
    port!("Melbourne", "Port of Melbourne", "AUMEL", "Australia", -37.8136, 144.9631, Oceania, "Good", "Very Good"),
    port!("Sydney", "Port of Sydney", "AUSYD", "Australia", -33.8688, 151.2093, Oceania, "Good", "Good"),
    port!("Durban", "Port of Durban", "ZADUR", "South Africa", -29.8587, 31.0218, Africa, "Poor", "Fair"),
    port!("Cape Town", "Port of Cape Town", "ZACPT", "South Africa", -33.9249, 18.4241, Africa, "Fair", "Good"),
];

/// Look up a port by short name, full name or code.
pub fn find_port(query: &str) -> Option<&'static Port> {
    let query = query.trim();
    PORTS.iter().find(|port| {
        port.key.eq_ignore_ascii_case(query)
            || port.name.eq_ignore_ascii_case(query)
            || port.code.eq_ignore_ascii_case(query)
    })
}

struct CountryBaseline {
    country: &'static str,
    political_stability: u8,
    trade_freedom: u8,
    corruption_level: &'static str,
    security_threat: &'static str,
    sanctions_status: &'static str,
    port_security: &'static str,
    labor_conditions: &'static str,
    regulatory_stability: &'static str,
}

const COUNTRIES: &[CountryBaseline] = &[
    CountryBaseline {
        country: "United States",
        political_stability: 8,
        trade_freedom: 85,
        corruption_level: "Low",
        security_threat: "Low",
        sanctions_status: "Sanctions issuer",
        port_security: "High",
        labor_conditions: "Stable",
        regulatory_stability: "High",
    },
    CountryBaseline {
        country: "China",
        political_stability: 7,
        trade_freedom: 65,
        corruption_level: "Medium",
        security_threat: "Low-Medium",
        sanctions_status: "Subject to some US sanctions",
        port_security: "High",
        labor_conditions: "Controlled",
        regulatory_stability: "Medium",
    },
    CountryBaseline {
        country: "Singapore",
        political_stability: 9,
        trade_freedom: 95,
        corruption_level: "Very Low",
        security_threat: "Very Low",
        sanctions_status: "None",
        port_security: "Very High",
        labor_conditions: "Excellent",
        regulatory_stability: "Very High",
    },
    CountryBaseline {
        country: "United Kingdom",
        political_stability: 8,
        trade_freedom: 82,
        corruption_level: "Low",
        security_threat: "Low",
        sanctions_status: "Sanctions issuer",
        port_security: "High",
        labor_conditions: "Stable",
        regulatory_stability: "High",
    },
    CountryBaseline {
        country: "Germany",
        political_stability: 8,
        trade_freedom: 78,
        corruption_level: "Low",
        security_threat: "Low",
        sanctions_status: "EU sanctions participant",
        port_security: "High",
        labor_conditions: "Good",
        regulatory_stability: "High",
    },
    CountryBaseline {
        country: "South Korea",
        political_stability: 7,
        trade_freedom: 75,
        corruption_level: "Medium",
        security_threat: "Medium (North Korea tensions)",
        sanctions_status: "None",
        port_security: "High",
        labor_conditions: "Good",
        regulatory_stability: "High",
    },
    CountryBaseline {
        country: "Japan",
        political_stability: 8,
        trade_freedom: 78,
        corruption_level: "Low",
        security_threat: "Low",
        sanctions_status: "G7 sanctions participant",
        port_security: "Very High",
        labor_conditions: "Excellent",
        regulatory_stability: "Very High",
    },
    CountryBaseline {
        country: "Netherlands",
        political_stability: 8,
        trade_freedom: 86,
        corruption_level: "Very Low",
        security_threat: "Low",
        sanctions_status: "EU sanctions participant",
        port_security: "Very High",
        labor_conditions: "Excellent",
        regulatory_stability: "Very High",
    },
    CountryBaseline {
        country: "United Arab Emirates",
        political_stability: 7,
        trade_freedom: 82,
        corruption_level: "Low",
        security_threat: "Low-Medium",
        sanctions_status: "None",
        port_security: "High",
        labor_conditions: "Good",
        regulatory_stability: "High",
    },
    CountryBaseline {
        country: "Iran",
        political_stability: 3,
        trade_freedom: 45,
        corruption_level: "High",
        security_threat: "High",
        sanctions_status: "Major international sanctions",
        port_security: "Medium",
        labor_conditions: "Poor",
        regulatory_stability: "Low",
    },
    CountryBaseline {
        country: "Russia",
        political_stability: 4,
        trade_freedom: 50,
        corruption_level: "High",
        security_threat: "High",
        sanctions_status: "Extensive international sanctions",
        port_security: "Medium",
        labor_conditions: "Poor",
        regulatory_stability: "Low",
    },
    CountryBaseline {
        country: "Brazil",
        political_stability: 6,
        trade_freedom: 68,
        corruption_level: "Medium-High",
        security_threat: "Medium",
        sanctions_status: "None",
        port_security: "Medium",
        labor_conditions: "Fair",
        regulatory_stability: "Medium",
    },
    CountryBaseline {
        country: "India",
        political_stability: 6,
        trade_freedom: 55,
        corruption_level: "Medium-High",
        security_threat: "Medium",
        sanctions_status: "None",
        port_security: "Medium",
        labor_conditions: "Fair",
        regulatory_stability: "Medium",
    },
    CountryBaseline {
        country: "Australia",
        political_stability: 9,
        trade_freedom: 82,
        corruption_level: "Very Low",
        security_threat: "Very Low",
        sanctions_status: "Western sanctions participant",
        port_security: "Very High",
        labor_conditions: "Excellent",
        regulatory_stability: "Very High",
    },
];

const TECH_CONTROLLED: &[&str] = &["China", "Russia", "Iran", "North Korea"];
const SANCTIONED: &[&str] = &["Iran", "Russia", "North Korea"];

fn goods_is(goods_type: &str, kinds: &[&str]) -> bool {
    let goods = goods_type.trim().to_ascii_lowercase();
    kinds.iter().any(|kind| *kind == goods)
}

fn cargo_restrictions(country: &str, goods_type: &str) -> String {
    let mut restrictions = Vec::new();

    if goods_is(goods_type, &["electronics", "technology", "semiconductors", "software"]) {
        if TECH_CONTROLLED.contains(&country) {
            restrictions.push("Technology export controls");
        }
        if country == "China" {
            restrictions.push("CFIUS review may be required");
        }
    }
    if goods_is(goods_type, &["chemicals", "materials", "machinery"]) {
        restrictions.push("Dual-use export license may be required");
    }
    if SANCTIONED.contains(&country) {
        restrictions.push("Comprehensive sanctions apply");
    }

    if restrictions.is_empty() {
        "Standard regulations".to_string()
    } else {
        restrictions.join("; ")
    }
}

/// Risk profile for `country`, adjusted for the cargo being shipped.
///
/// Countries outside the baseline table get a neutral profile.
pub fn country_profile(country: &str, goods_type: &str) -> CountryRiskProfile {
    let mut profile = match COUNTRIES.iter().find(|c| c.country == country) {
        Some(base) => CountryRiskProfile {
            country: country.to_string(),
            political_stability: base.political_stability,
            trade_freedom: base.trade_freedom,
            corruption_level: base.corruption_level.to_string(),
            security_threat: base.security_threat.to_string(),
            sanctions_status: base.sanctions_status.to_string(),
            port_security: base.port_security.to_string(),
            labor_conditions: base.labor_conditions.to_string(),
            regulatory_stability: base.regulatory_stability.to_string(),
            cargo_restrictions: String::new(),
        },
        None => CountryRiskProfile {
            country: country.to_string(),
            political_stability: 5,
            trade_freedom: 60,
            corruption_level: UNKNOWN.to_string(),
            security_threat: UNKNOWN.to_string(),
            sanctions_status: UNKNOWN.to_string(),
            port_security: UNKNOWN.to_string(),
            labor_conditions: UNKNOWN.to_string(),
            regulatory_stability: UNKNOWN.to_string(),
            cargo_restrictions: String::new(),
        },
    };

    profile.cargo_restrictions = cargo_restrictions(country, goods_type);

    if goods_is(goods_type, &["electronics", "technology", "semiconductors"]) {
        if TECH_CONTROLLED.contains(&country) {
            profile
                .cargo_restrictions
                .push_str(" HIGH RISK: Technology transfer restrictions apply.");
            profile.regulatory_stability = "Low (tech restrictions)".to_string();
        }
    } else if goods_is(goods_type, &["military", "defense", "weapons"]) {
        profile
            .cargo_restrictions
            .push_str(" CRITICAL: Military/dual-use export controls apply.");
        profile.regulatory_stability = "High scrutiny required".to_string();
    } else if goods_is(goods_type, &["energy", "oil", "gas"]) && ["Russia", "Iran"].contains(&country) {
        profile
            .cargo_restrictions
            .push_str(" SANCTIONS: Energy sector sanctions in effect.");
        profile.sanctions_status = "Energy sanctions active".to_string();
    }

    profile
}

fn push_unique(list: &mut Vec<String>, name: &str) {
    if !list.iter().any(|existing| existing == name) {
        list.push(name.to_string());
    }
}

fn either(a: Region, b: Region, test: impl Fn(Region) -> bool) -> bool {
    test(a) || test(b)
}

fn between(a: Region, b: Region, one: impl Fn(Region) -> bool, other: impl Fn(Region) -> bool) -> bool {
    (one(a) && other(b)) || (other(a) && one(b))
}

/// North American port on the Atlantic or Gulf coast.
fn is_atlantic_americas(port: Option<&Port>) -> bool {
    port.map(|p| p.region == Region::NorthAmerica && p.longitude > -100.0)
        .unwrap_or(false)
}

/// Chokepoints implied by the two ports, in rule order.
pub fn route_chokepoints(departure: Option<&Port>, destination: Option<&Port>) -> Vec<String> {
    let a = departure.map(|p| p.region).unwrap_or(Region::Unknown);
    let b = destination.map(|p| p.region).unwrap_or(Region::Unknown);
    let mut chokepoints = Vec::new();

    if between(a, b, |r| r.is_europe(), |r| r.is_asia()) {
        push_unique(&mut chokepoints, "Suez Canal");
        push_unique(&mut chokepoints, "Strait of Malacca");
    }
    if either(a, b, |r| r == Region::MiddleEast) {
        push_unique(&mut chokepoints, "Strait of Hormuz");
        push_unique(&mut chokepoints, "Bab el-Mandeb");
    }
    if (is_atlantic_americas(departure) && b.is_asia())
        || (is_atlantic_americas(destination) && a.is_asia())
    {
        push_unique(&mut chokepoints, "Panama Canal");
    }
    if either(a, b, |r| r == Region::EastAsia) {
        push_unique(&mut chokepoints, "South China Sea");
    }

    chokepoints
}

/// Security zones implied by the two ports, in rule order.
pub fn route_security_zones(departure: Option<&Port>, destination: Option<&Port>) -> Vec<String> {
    let a = departure.map(|p| p.region).unwrap_or(Region::Unknown);
    let b = destination.map(|p| p.region).unwrap_or(Region::Unknown);
    let countries = [
        departure.map(|p| p.country).unwrap_or(UNKNOWN),
        destination.map(|p| p.country).unwrap_or(UNKNOWN),
    ];
    let touches = |names: &[&str]| countries.iter().any(|c| names.contains(c));
    let mut zones = Vec::new();

    if either(a, b, |r| r == Region::Africa) {
        push_unique(&mut zones, "Gulf of Guinea");
    }
    if either(a, b, |r| r == Region::MiddleEast) {
        push_unique(&mut zones, "Persian Gulf");
        push_unique(&mut zones, "Somalia Coast");
    }
    if touches(&["Ukraine", "Russia"]) {
        push_unique(&mut zones, "Black Sea");
    }
    if touches(&["Taiwan", "China"]) {
        push_unique(&mut zones, "Taiwan Strait");
    }

    zones
}

/// Great circle distance in kilometres.
pub fn great_circle_km(from: &Port, to: &Port) -> f64 {
    let (lat1, lat2) = (from.latitude.to_radians(), to.latitude.to_radians());
    let delta_lat = (to.latitude - from.latitude).to_radians();
    let delta_lon = (to.longitude - from.longitude).to_radians();

    let a = (delta_lat / 2.0).sin().powi(2)
        + lat1.cos() * lat2.cos() * (delta_lon / 2.0).sin().powi(2);
    let c = 2.0 * a.sqrt().atan2((1.0 - a).sqrt());
    EARTH_RADIUS_KM * c
}

/// Ratio of sailed distance to great circle distance.
fn route_factor(a: Region, b: Region) -> f64 {
    if a == b {
        1.1
    } else if between(a, b, |r| r.is_asia(), |r| r.is_europe()) {
        1.4
    } else if between(a, b, |r| r.is_asia(), |r| r.is_americas()) {
        1.3
    } else if between(a, b, |r| r.is_europe(), |r| r.is_americas()) {
        1.2
    } else {
        1.3
    }
}

fn speed_factor(goods_type: &str) -> f64 {
    if goods_is(goods_type, &["perishables", "food", "pharmaceuticals"]) {
        1.1
    } else if goods_is(goods_type, &["hazardous", "chemicals", "oil", "gas"]) {
        0.9
    } else if goods_is(goods_type, &["automobiles", "machinery", "heavy"]) {
        0.95
    } else {
        1.0
    }
}

/// Loading and unloading time at both ends.
fn port_days(departure: &Port, destination: &Port, goods_type: &str) -> u32 {
    let infra = [departure.infrastructure, destination.infrastructure];
    let infra_factor = if infra.contains(&"Poor") {
        1.5
    } else if infra.contains(&"Fair") {
        1.2
    } else if infra.iter().all(|i| *i == "Excellent") {
        0.8
    } else {
        1.0
    };

    let labor = [departure.labor_stability, destination.labor_stability];
    let labor_factor = if labor.contains(&"Poor") {
        1.3
    } else if labor.contains(&"Fair") {
        1.1
    } else {
        1.0
    };

    let cargo_factor = if goods_is(goods_type, &["hazardous", "chemicals"]) {
        1.4
    } else if goods_is(goods_type, &["automobiles", "machinery"]) {
        1.2
    } else if goods_is(goods_type, &["bulk", "containers"]) {
        0.9
    } else {
        1.0
    };

    ((BASE_PORT_DAYS * infra_factor * labor_factor * cargo_factor) as u32).max(1)
}

/// Sailed distance and door-to-door travel days between two catalogued ports.
pub fn voyage_estimate(departure: &Port, destination: &Port, goods_type: &str) -> (u32, u32) {
    let sailed_km =
        great_circle_km(departure, destination) * route_factor(departure.region, destination.region);
    let speed_kmh =
        SERVICE_SPEED_KNOTS * KM_PER_NAUTICAL_MILE * speed_factor(goods_type) * VOYAGE_EFFICIENCY;
    let sailing_days = ((sailed_km / speed_kmh / 24.0) as u32).max(1);

    (
        sailed_km as u32,
        sailing_days + port_days(departure, destination, goods_type),
    )
}

fn seasonal_factors(departure: Option<&Port>, destination: Option<&Port>, month: u32) -> String {
    let region = departure.map(|p| p.region).unwrap_or(Region::Unknown);
    let northern = [departure, destination]
        .iter()
        .flatten()
        .any(|p| ["Russia", "Canada"].contains(&p.country));
    let mut factors = Vec::new();

    if (6..=9).contains(&month) && region.is_asia() {
        factors.push("Monsoon season in Asia");
    }
    if (6..=11).contains(&month) && region.is_americas() {
        factors.push("Hurricane season in Atlantic/Pacific");
    }
    if matches!(month, 12 | 1 | 2 | 3) && northern {
        factors.push("Winter ice conditions in northern routes");
    }

    if factors.is_empty() {
        "No significant seasonal factors".to_string()
    } else {
        factors.join("; ")
    }
}

fn alternative_routes(chokepoints: &[String]) -> String {
    let mut alternatives = Vec::new();
    let has = |name: &str| chokepoints.iter().any(|c| c == name);

    if has("Suez Canal") {
        alternatives.push("Cape of Good Hope (adds ~2 weeks)");
    }
    if has("Panama Canal") {
        alternatives.push("Cape Horn or US land bridge");
    }
    if has("Strait of Malacca") {
        alternatives.push("Lombok Strait or Sunda Strait");
    }

    if alternatives.is_empty() {
        "Limited alternative routes".to_string()
    } else {
        alternatives.join("; ")
    }
}

fn shipping_lanes(a: Region, b: Region) -> &'static str {
    if between(a, b, |r| r.is_europe(), |r| r.is_asia()) {
        "Europe-Asia main line (via Suez Canal)"
    } else if between(a, b, |r| r.is_americas(), |r| r.is_asia()) {
        "Trans-Pacific main line"
    } else if between(a, b, |r| r.is_americas(), |r| r.is_europe()) {
        "Trans-Atlantic main line"
    } else {
        "Regional feeder routes"
    }
}

fn goods_specific_risks(goods_type: &str, chokepoints: &[String]) -> String {
    let has = |name: &str| chokepoints.iter().any(|c| c == name);
    let mut risks = Vec::new();

    if goods_is(goods_type, &["electronics", "technology"]) && has("South China Sea") {
        risks.push("Technology transfer scrutiny in disputed waters");
    }
    if goods_is(goods_type, &["energy", "oil", "gas"]) && has("Strait of Hormuz") {
        risks.push("Energy chokepoint vulnerability");
    }
    if goods_is(goods_type, &["food", "agriculture"]) {
        risks.push("Temperature-sensitive cargo considerations");
    }

    if risks.is_empty() {
        "Standard cargo handling protocols".to_string()
    } else {
        risks.join("; ")
    }
}

/// Analyse a route from its two port names.
///
/// # Arguments
/// * `departure_port` / `destination_port` - Port names as submitted
/// * `goods_type` - Cargo, for speed, port time and cargo risks
/// * `departure_date` - Its month drives the seasonal factors
pub fn analyze_route(
    departure_port: &str,
    destination_port: &str,
    goods_type: &str,
    departure_date: NaiveDate,
) -> RouteAnalysis {
    let departure = find_port(departure_port);
    let destination = find_port(destination_port);
    for (port, found) in [(departure_port, departure), (destination_port, destination)] {
        if found.is_none() {
            tracing::debug!(port, "Port not in catalogue, using fallback route figures");
        }
    }

    let a = departure.map(|p| p.region).unwrap_or(Region::Unknown);
    let b = destination.map(|p| p.region).unwrap_or(Region::Unknown);

    let (distance_km, travel_days) = match (departure, destination) {
        (Some(from), Some(to)) => voyage_estimate(from, to, goods_type),
        _ => (FALLBACK_DISTANCE_KM, FALLBACK_TRAVEL_DAYS),
    };

    let chokepoints = route_chokepoints(departure, destination);

    RouteAnalysis {
        departure_country: departure.map(|p| p.country).unwrap_or(UNKNOWN).to_string(),
        destination_country: destination.map(|p| p.country).unwrap_or(UNKNOWN).to_string(),
        distance_km,
        travel_days,
        security_zones: route_security_zones(departure, destination),
        seasonal_factors: seasonal_factors(departure, destination, departure_date.month()),
        alternative_routes: alternative_routes(&chokepoints),
        shipping_lanes: shipping_lanes(a, b).to_string(),
        goods_specific_risks: goods_specific_risks(goods_type, &chokepoints),
        chokepoints,
    }
}

impl RouteAnalysis {
    /// Analyse the route of a validated request.
    pub fn for_request(request: &ShippingRiskRequest) -> Self {
        analyze_route(
            &request.departure_port,
            &request.destination_port,
            &request.goods_type,
            request.departure_date,
        )
    }
}
