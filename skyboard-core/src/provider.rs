use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::fmt::Debug;

use crate::{
    config::{Config, Panels},
    error::DashboardError,
    model::Advisory,
    payload::RawForecastPayload,
};

pub mod nominatim;
pub mod nws;
pub mod open_meteo;

pub use nominatim::NominatimGeocoder;
pub use nws::NwsAlertSource;
pub use open_meteo::OpenMeteoProvider;

/// Name shown when the current location cannot be resolved to a place.
pub const FALLBACK_LOCATION_NAME: &str = "Your Location";

/// Outcome of a best-effort lookup: a value, or the designated "unavailable" marker.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Lookup<T> {
    Resolved(T),
    Unavailable,
}

impl<T> Lookup<T> {
    pub fn is_resolved(&self) -> bool {
        matches!(self, Lookup::Resolved(_))
    }

    pub fn unwrap_or(self, default: T) -> T {
        match self {
            Lookup::Resolved(value) => value,
            Lookup::Unavailable => default,
        }
    }

    pub fn into_option(self) -> Option<T> {
        match self {
            Lookup::Resolved(value) => Some(value),
            Lookup::Unavailable => None,
        }
    }
}

impl<T> From<Option<T>> for Lookup<T> {
    fn from(value: Option<T>) -> Self {
        value.map_or(Lookup::Unavailable, Lookup::Resolved)
    }
}

impl Lookup<String> {
    /// The resolved place name, or "Your Location".
    pub fn display_name(self) -> String {
        self.unwrap_or(FALLBACK_LOCATION_NAME.to_string())
    }
}

/// A geocoded place.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Place {
    pub latitude: f64,
    pub longitude: f64,
    pub display_name: String,
}

/// Which fields the forecast request asks for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ForecastOptions {
    pub forecast_days: u8,
    pub panels: Panels,
}

impl ForecastOptions {
    pub fn from_config(config: &Config) -> Self {
        Self { forecast_days: config.forecast_days(), panels: config.panels }
    }
}

impl Default for ForecastOptions {
    fn default() -> Self {
        Self::from_config(&Config::default())
    }
}

#[async_trait]
pub trait Geocoder: Send + Sync + Debug {
    /// Resolve free text to the first matching place.
    async fn forward_geocode(&self, query: &str) -> Result<Place, DashboardError>;

    /// Resolve coordinates to a place name. Never fails: problems yield `Unavailable`.
    async fn reverse_geocode(&self, latitude: f64, longitude: f64) -> Lookup<String>;
}

#[async_trait]
pub trait ForecastSource: Send + Sync + Debug {
    async fn fetch_forecast(
        &self,
        latitude: f64,
        longitude: f64,
        options: &ForecastOptions,
    ) -> Result<RawForecastPayload, DashboardError>;
}

#[async_trait]
pub trait AlertSource: Send + Sync + Debug {
    /// Active advisories at a point. Coverage gaps and failures yield `Unavailable`.
    async fn fetch_alerts(&self, latitude: f64, longitude: f64) -> Lookup<Vec<Advisory>>;
}

/// Construct the default set of sources from config.
pub fn sources_from_config(
    config: &Config,
) -> (Box<dyn Geocoder>, Box<dyn ForecastSource>, Box<dyn AlertSource>) {
    let ua = config.user_agent.clone();
    let endpoints = &config.endpoints;

    (
        Box::new(NominatimGeocoder::new(
            endpoints.geocode.clone(),
            endpoints.reverse_geocode.clone(),
            ua.clone(),
        )),
        Box::new(OpenMeteoProvider::new(endpoints.forecast.clone(), ua.clone())),
        Box::new(NwsAlertSource::new(endpoints.alerts.clone(), ua)),
    )
}

pub(crate) fn truncate_body(body: &str) -> String {
    const MAX: usize = 200;
    match body.char_indices().nth(MAX) {
        Some((idx, _)) => format!("{}...", &body[..idx]),
        None => body.to_string(),
    }
}
