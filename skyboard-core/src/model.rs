use std::fmt;

use serde::{Deserialize, Serialize};

use crate::units::UnitSystem;

/// Placeholder shown for a sunrise/sunset the payload did not carry.
pub const MISSING_TIME: &str = "--:--";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DayPhase {
    Day,
    Night,
}

impl DayPhase {
    pub fn from_flag(is_day: bool) -> Self {
        if is_day { DayPhase::Day } else { DayPhase::Night }
    }
}

impl fmt::Display for DayPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DayPhase::Day => f.write_str("Day"),
            DayPhase::Night => f.write_str("Night"),
        }
    }
}

/// Display-ready forecast, derived fresh from a raw payload for one unit system.
///
/// Whole-number fields (temperatures, speeds) are already converted and rounded.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PresentationModel {
    pub units: UnitSystem,
    pub current: CurrentSnapshot,
    pub today: TodaySummary,
    pub hourly: Vec<HourlySample>,
    pub daily: Vec<DailySummary>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CurrentSnapshot {
    pub temperature: f64,
    pub unit_suffix: String,
    pub description: String,
    pub icon_id: String,
    pub humidity_pct: f64,
    pub wind: f64,
    pub feels_like: f64,
    /// One-decimal distance, present only when visibility was requested.
    pub visibility: Option<String>,
    pub day_or_night: DayPhase,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TodaySummary {
    pub high: f64,
    pub low: f64,
    pub rain_chance_pct: f64,
    /// Absent when the UV panel is turned off.
    pub uv_index: Option<f64>,
    pub sunrise: String,
    pub sunset: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HourlySample {
    pub time_label: String,
    pub temperature: f64,
    pub icon_id: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DailySummary {
    pub date: String,
    pub day_name: String,
    pub high: f64,
    pub low: f64,
    pub icon_id: String,
    pub rain_chance_pct: f64,
    pub wind: f64,
    pub sunrise: String,
    pub sunset: String,
}

/// An active weather advisory, e.g. "Heat Advisory".
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Advisory {
    pub event_name: String,
}
