use async_trait::async_trait;
use reqwest::{Client, header::USER_AGENT};

use crate::{error::DashboardError, payload::RawForecastPayload};

use super::{ForecastOptions, ForecastSource, truncate_body};

const CURRENT_FIELDS: &[&str] = &[
    "temperature_2m",
    "relative_humidity_2m",
    "apparent_temperature",
    "is_day",
    "weather_code",
    "wind_speed_10m",
];
const HOURLY_FIELDS: &[&str] = &["temperature_2m", "weather_code", "is_day"];
const DAILY_FIELDS: &[&str] = &[
    "weather_code",
    "temperature_2m_max",
    "temperature_2m_min",
    "sunrise",
    "sunset",
    "precipitation_probability_max",
    "wind_speed_10m_max",
];

/// Open-Meteo forecast API. Keyless; values come back in °C, km/h and metres.
#[derive(Debug, Clone)]
pub struct OpenMeteoProvider {
    url: String,
    user_agent: String,
    http: Client,
}

impl OpenMeteoProvider {
    pub fn new(url: String, user_agent: String) -> Self {
        Self { url, user_agent, http: Client::new() }
    }
}

/// Query parameters for one forecast request.
pub fn forecast_query(
    latitude: f64,
    longitude: f64,
    options: &ForecastOptions,
) -> Vec<(&'static str, String)> {
    let mut current = CURRENT_FIELDS.to_vec();
    if options.panels.visibility {
        current.push("visibility");
    }

    let mut daily = DAILY_FIELDS.to_vec();
    if options.panels.uv_index {
        daily.push("uv_index_max");
    }

    vec![
        ("latitude", latitude.to_string()),
        ("longitude", longitude.to_string()),
        ("current", current.join(",")),
        ("hourly", HOURLY_FIELDS.join(",")),
        ("daily", daily.join(",")),
        ("timezone", "auto".to_string()),
        ("forecast_days", options.forecast_days.to_string()),
    ]
}

#[async_trait]
impl ForecastSource for OpenMeteoProvider {
    async fn fetch_forecast(
        &self,
        latitude: f64,
        longitude: f64,
        options: &ForecastOptions,
    ) -> Result<RawForecastPayload, DashboardError> {
        tracing::debug!("Fetching forecast for ({}, {})", latitude, longitude);

        let res = self
            .http
            .get(&self.url)
            .header(USER_AGENT, &self.user_agent)
            .query(&forecast_query(latitude, longitude, options))
            .send()
            .await?;

        let status = res.status();
        let body = res.text().await?;

        if !status.is_success() {
            tracing::warn!("Forecast request failed with status {}", status);
            return Err(DashboardError::UpstreamUnavailable { status, body: truncate_body(&body) });
        }

        serde_json::from_str(&body)
            .map_err(|e| DashboardError::Decode(format!("forecast response: {e}")))
    }
}
