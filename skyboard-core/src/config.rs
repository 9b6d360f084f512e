use anyhow::{Context, Result, anyhow};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::{fs, path::PathBuf};

use crate::{projector::ClockStyle, units::UnitSystem};

pub const DEFAULT_USER_AGENT: &str = concat!("skyboard/", env!("CARGO_PKG_VERSION"));
pub const MIN_FORECAST_DAYS: u8 = 6;
pub const MAX_FORECAST_DAYS: u8 = 8;

/// Which optional fields are requested and which panels are produced.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Panels {
    pub hourly: bool,
    pub visibility: bool,
    pub uv_index: bool,
    pub alerts: bool,
}

impl Default for Panels {
    fn default() -> Self {
        Self { hourly: true, visibility: true, uv_index: true, alerts: true }
    }
}

/// Coordinates used when the current location is requested.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct HomeLocation {
    pub latitude: f64,
    pub longitude: f64,
}

/// Base URLs of the external services.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Endpoints {
    pub geocode: String,
    pub reverse_geocode: String,
    pub forecast: String,
    pub alerts: String,
}

impl Default for Endpoints {
    fn default() -> Self {
        Self {
            geocode: "https://nominatim.openstreetmap.org/search".to_string(),
            reverse_geocode: "https://nominatim.openstreetmap.org/reverse".to_string(),
            forecast: "https://api.open-meteo.com/v1/forecast".to_string(),
            alerts: "https://api.weather.gov/alerts/active".to_string(),
        }
    }
}

/// Top-level configuration stored on disk.
///
/// Example TOML:
/// ```toml
/// units = "imperial"
/// clock = "12h"
///
/// [home]
/// latitude = 40.71
/// longitude = -74.01
///
/// [panels]
/// alerts = false
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub units: UnitSystem,
    pub clock: ClockStyle,
    pub forecast_days: u8,
    /// When false, requesting the current location fails with a denial.
    pub share_location: bool,
    pub user_agent: String,
    pub panels: Panels,
    pub home: Option<HomeLocation>,
    pub endpoints: Endpoints,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            units: UnitSystem::default(),
            clock: ClockStyle::default(),
            forecast_days: 7,
            share_location: true,
            user_agent: DEFAULT_USER_AGENT.to_string(),
            panels: Panels::default(),
            home: None,
            endpoints: Endpoints::default(),
        }
    }
}

impl Config {
    /// Load config from disk, or return an empty default if it doesn't exist yet.
    pub fn load() -> Result<Self> {
        let path = Self::config_file_path()?;
        if !path.exists() {
            // First run: no config file, return defaults.
            return Ok(Self::default());
        }

        let contents = fs::read_to_string(&path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        Self::from_toml(&contents)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))
    }

    pub fn from_toml(contents: &str) -> Result<Self> {
        let cfg: Config = toml::from_str(contents)?;
        Ok(cfg)
    }

    /// Save config to disk, creating parent directories as needed.
    pub fn save(&self) -> Result<()> {
        let path = Self::config_file_path()?;

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).with_context(|| {
                format!("Failed to create config directory: {}", parent.display())
            })?;
        }

        let toml =
            toml::to_string_pretty(self).context("Failed to serialize configuration to TOML")?;

        fs::write(&path, toml)
            .with_context(|| format!("Failed to write config file: {}", path.display()))?;

        Ok(())
    }

    /// Path to the config file.
    pub fn config_file_path() -> Result<PathBuf> {
        let dirs = ProjectDirs::from("dev", "skyboard", "skyboard")
            .ok_or_else(|| anyhow!("Could not determine platform config directory"))?;

        Ok(dirs.config_dir().join("config.toml"))
    }

    /// Forecast horizon clamped to what the dashboard can use.
    pub fn forecast_days(&self) -> u8 {
        self.forecast_days.clamp(MIN_FORECAST_DAYS, MAX_FORECAST_DAYS)
    }

    /// Set the home location and re-enable location sharing.
    pub fn upsert_home(&mut self, latitude: f64, longitude: f64) {
        self.home = Some(HomeLocation { latitude, longitude });
        self.share_location = true;
    }

    pub fn set_units(&mut self, units: UnitSystem) {
        self.units = units;
    }
}
