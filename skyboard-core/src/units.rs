//! Unit conversions for display values.
//!
//! The unit system switches temperature, speed and distance together. Inputs are
//! always the forecast API's metric values (°C, km/h, metres).
//!
//! Whole-number conversions return `f64` so that non-finite inputs survive
//! (a NaN temperature displays as NaN rather than silently becoming 0).

use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};

const MPH_PER_KMH: f64 = 0.621371;
const METRES_PER_MILE: f64 = 1609.34;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UnitSystem {
    #[default]
    Metric,
    Imperial,
}

impl UnitSystem {
    pub fn as_str(&self) -> &'static str {
        match self {
            UnitSystem::Metric => "metric",
            UnitSystem::Imperial => "imperial",
        }
    }

    pub fn toggled(self) -> Self {
        match self {
            UnitSystem::Metric => UnitSystem::Imperial,
            UnitSystem::Imperial => UnitSystem::Metric,
        }
    }

    pub fn temperature_suffix(&self) -> &'static str {
        match self {
            UnitSystem::Metric => "°C",
            UnitSystem::Imperial => "°F",
        }
    }

    pub fn speed_suffix(&self) -> &'static str {
        match self {
            UnitSystem::Metric => "km/h",
            UnitSystem::Imperial => "mph",
        }
    }

    pub fn distance_suffix(&self) -> &'static str {
        match self {
            UnitSystem::Metric => "km",
            UnitSystem::Imperial => "mi",
        }
    }

    pub const fn all() -> &'static [UnitSystem] {
        &[UnitSystem::Metric, UnitSystem::Imperial]
    }
}

impl fmt::Display for UnitSystem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for UnitSystem {
    type Err = anyhow::Error;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.to_lowercase().as_str() {
            "metric" | "c" | "celsius" => Ok(UnitSystem::Metric),
            "imperial" | "f" | "fahrenheit" => Ok(UnitSystem::Imperial),
            _ => Err(anyhow::anyhow!(
                "Unknown unit system '{value}'. Supported: metric, imperial."
            )),
        }
    }
}

/// Temperature in the target system, rounded to a whole degree.
pub fn temperature(celsius: f64, system: UnitSystem) -> f64 {
    match system {
        UnitSystem::Metric => round_half_up(celsius),
        UnitSystem::Imperial => round_half_up(celsius * 9.0 / 5.0 + 32.0),
    }
}

/// Speed in km/h or mph, rounded to a whole number.
pub fn speed(kmh: f64, system: UnitSystem) -> f64 {
    match system {
        UnitSystem::Metric => round_half_up(kmh),
        UnitSystem::Imperial => round_half_up(kmh * MPH_PER_KMH),
    }
}

/// Distance in km or miles with one decimal place, e.g. `"24.1"`.
pub fn distance(meters: f64, system: UnitSystem) -> String {
    let value = match system {
        UnitSystem::Metric => meters / 1000.0,
        UnitSystem::Imperial => meters / METRES_PER_MILE,
    };
    format!("{value:.1}")
}

/// Formats a whole-number display value without a trailing `.0` or a negative zero.
pub fn whole(value: f64) -> String {
    // -0.0 + 0.0 == +0.0
    format!("{:.0}", value + 0.0)
}

/// Rounds halves towards positive infinity (`-2.5` becomes `-2`).
fn round_half_up(value: f64) -> f64 {
    (value + 0.5).floor()
}
