use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

/// What to look up: a city name or an exact coordinate pair.
///
/// Exactly one variant is active per request. The city name is passed through
/// as typed; whether an empty or nonsense name is worth sending is the
/// caller's decision, the remote API will reject it on its own terms.
#[derive(Debug, Clone, PartialEq)]
pub enum WeatherQuery {
    City(String),
    Coordinates { lat: f64, lon: f64 },
}

impl WeatherQuery {
    /// Value of the `q=` query parameter.
    ///
    /// City names are percent-encoded so reserved characters survive URL
    /// assembly; coordinate pairs are formatted as the literal `"{lat},{lon}"`
    /// with no added encoding, which is what the API expects.
    pub fn as_query_value(&self) -> String {
        match self {
            WeatherQuery::City(name) => urlencoding::encode(name).into_owned(),
            WeatherQuery::Coordinates { lat, lon } => format!("{lat},{lon}"),
        }
    }
}

impl std::fmt::Display for WeatherQuery {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            WeatherQuery::City(name) => f.write_str(name),
            WeatherQuery::Coordinates { lat, lon } => write!(f, "{lat},{lon}"),
        }
    }
}

/// Decoded snapshot of current conditions for one location.
///
/// Constructed fresh from each successful response and replaces any prior
/// reading wholesale; there is no merging of partial updates.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeatherReading {
    pub location: String,
    pub region: String,
    pub country: String,
    pub latitude: f64,
    pub longitude: f64,
    /// Local time at the location as reported by the API, `"YYYY-MM-DD HH:MM"`.
    pub localtime: String,
    pub temp_c: f64,
    pub temp_f: f64,
    pub condition: String,
    /// Icon reference (protocol-relative URL) for the condition.
    pub condition_icon: String,
    pub wind_kph: f64,
    pub wind_mph: f64,
    /// Relative humidity, 0–100.
    pub humidity: u8,
    pub feelslike_c: f64,
    pub feelslike_f: f64,
    pub uv: f64,
}

impl WeatherReading {
    /// Parse `localtime` into a `NaiveDateTime`, if it matches the API's
    /// `"YYYY-MM-DD HH:MM"` shape. Display layers can fall back to the raw
    /// string when this returns `None`.
    pub fn localtime_parsed(&self) -> Option<NaiveDateTime> {
        NaiveDateTime::parse_from_str(&self.localtime, "%Y-%m-%d %H:%M").ok()
    }
}
