//! Raw forecast and alert payloads as returned by the upstream services.
//!
//! Sections are optional at the type level so that a response missing one of them
//! still deserializes; the projector reports it as a malformed payload instead.

use serde::{Deserialize, Deserializer, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RawForecastPayload {
    #[serde(default)]
    pub utc_offset_seconds: Option<i64>,
    #[serde(default)]
    pub timezone: Option<String>,
    pub current: Option<RawCurrent>,
    pub hourly: Option<RawHourly>,
    pub daily: Option<RawDaily>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawCurrent {
    pub temperature_2m: f64,
    pub weather_code: i32,
    #[serde(deserialize_with = "flag")]
    pub is_day: bool,
    pub relative_humidity_2m: f64,
    pub apparent_temperature: f64,
    pub wind_speed_10m: f64,
    #[serde(default)]
    pub visibility: Option<f64>,
}

/// Parallel arrays, one entry per hour.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RawHourly {
    pub time: Vec<String>,
    pub temperature_2m: Vec<f64>,
    pub weather_code: Vec<i32>,
    #[serde(deserialize_with = "flags")]
    pub is_day: Vec<bool>,
}

/// Parallel arrays, one entry per day. Optional arrays depend on the requested fields,
/// and their individual entries may be `null`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RawDaily {
    pub time: Vec<String>,
    pub temperature_2m_max: Vec<f64>,
    pub temperature_2m_min: Vec<f64>,
    pub weather_code: Vec<i32>,
    #[serde(default)]
    pub sunrise: Option<Vec<Option<String>>>,
    #[serde(default)]
    pub sunset: Option<Vec<Option<String>>>,
    #[serde(default)]
    pub precipitation_probability_max: Option<Vec<Option<f64>>>,
    #[serde(default)]
    pub wind_speed_10m_max: Option<Vec<Option<f64>>>,
    #[serde(default)]
    pub uv_index_max: Option<Vec<Option<f64>>>,
}

/// GeoJSON feature collection of active alerts.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct AlertPayload {
    #[serde(default)]
    pub features: Vec<AlertFeature>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct AlertFeature {
    pub properties: AlertProperties,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct AlertProperties {
    pub event: String,
}

/// The day/night flag arrives as `0`/`1` from the forecast API but `true`/`false` is accepted too.
#[derive(Deserialize)]
#[serde(untagged)]
enum Flag {
    Bool(bool),
    Number(f64),
}

impl From<Flag> for bool {
    fn from(flag: Flag) -> Self {
        match flag {
            Flag::Bool(b) => b,
            Flag::Number(n) => n != 0.0,
        }
    }
}

fn flag<'de, D: Deserializer<'de>>(deserializer: D) -> Result<bool, D::Error> {
    Flag::deserialize(deserializer).map(bool::from)
}

fn flags<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Vec<bool>, D::Error> {
    let raw = Vec::<Flag>::deserialize(deserializer)?;
    Ok(raw.into_iter().map(bool::from).collect())
}
