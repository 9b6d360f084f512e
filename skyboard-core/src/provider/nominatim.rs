//! Forward and reverse geocoding against Nominatim (OpenStreetMap).

use async_trait::async_trait;
use reqwest::{Client, header::USER_AGENT};
use serde::Deserialize;

use crate::error::DashboardError;

use super::{Geocoder, Lookup, Place, truncate_body};

#[derive(Debug, Clone)]
pub struct NominatimGeocoder {
    search_url: String,
    reverse_url: String,
    user_agent: String,
    http: Client,
}

impl NominatimGeocoder {
    pub fn new(search_url: String, reverse_url: String, user_agent: String) -> Self {
        Self { search_url, reverse_url, user_agent, http: Client::new() }
    }

    async fn try_reverse(&self, latitude: f64, longitude: f64) -> Result<Option<String>, String> {
        let res = self
            .http
            .get(&self.reverse_url)
            .header(USER_AGENT, &self.user_agent)
            .query(&[
                ("lat", latitude.to_string()),
                ("lon", longitude.to_string()),
                ("format", "json".to_string()),
            ])
            .send()
            .await
            .map_err(|e| format!("request failed: {e}"))?;

        let status = res.status();
        if !status.is_success() {
            return Err(format!("status {status}"));
        }

        let body: NmReverse = res.json().await.map_err(|e| format!("parse error: {e}"))?;

        Ok(body.address.and_then(NmAddress::place_name))
    }
}

#[derive(Debug, Deserialize)]
struct NmPlace {
    lat: String,
    lon: String,
    display_name: String,
}

#[derive(Debug, Deserialize)]
struct NmReverse {
    address: Option<NmAddress>,
}

#[derive(Debug, Default, Deserialize)]
struct NmAddress {
    city: Option<String>,
    town: Option<String>,
    village: Option<String>,
    suburb: Option<String>,
    county: Option<String>,
}

impl NmAddress {
    /// Prefer city > town > village > suburb > county.
    fn place_name(self) -> Option<String> {
        self.city.or(self.town).or(self.village).or(self.suburb).or(self.county)
    }
}

#[async_trait]
impl Geocoder for NominatimGeocoder {
    async fn forward_geocode(&self, query: &str) -> Result<Place, DashboardError> {
        let query = query.trim();
        if query.is_empty() {
            return Err(DashboardError::PlaceNotFound(String::new()));
        }

        tracing::debug!("Geocoding '{}'", query);

        let res = self
            .http
            .get(&self.search_url)
            .header(USER_AGENT, &self.user_agent)
            .query(&[("q", query), ("format", "json"), ("limit", "1")])
            .send()
            .await?;

        let status = res.status();
        let body = res.text().await?;

        if !status.is_success() {
            return Err(DashboardError::UpstreamUnavailable { status, body: truncate_body(&body) });
        }

        let results: Vec<NmPlace> = serde_json::from_str(&body)
            .map_err(|e| DashboardError::Decode(format!("geocoding response: {e}")))?;

        let first = results
            .into_iter()
            .next()
            .ok_or_else(|| DashboardError::PlaceNotFound(query.to_string()))?;

        let latitude = parse_coordinate(&first.lat)?;
        let longitude = parse_coordinate(&first.lon)?;

        let place = Place { latitude, longitude, display_name: first_segment(&first.display_name) };
        tracing::info!("Geocoded '{}' to {}", query, place.display_name);

        Ok(place)
    }

    async fn reverse_geocode(&self, latitude: f64, longitude: f64) -> Lookup<String> {
        match self.try_reverse(latitude, longitude).await {
            Ok(Some(name)) => {
                tracing::info!("Reverse geocoded to: {}", name);
                Lookup::Resolved(name)
            }
            Ok(None) => {
                tracing::debug!("No named place at ({}, {})", latitude, longitude);
                Lookup::Unavailable
            }
            Err(e) => {
                tracing::warn!("Reverse geocode failed: {}", e);
                Lookup::Unavailable
            }
        }
    }
}

fn parse_coordinate(value: &str) -> Result<f64, DashboardError> {
    value
        .trim()
        .parse()
        .map_err(|_| DashboardError::Decode(format!("invalid coordinate '{value}'")))
}

/// "Paris, Île-de-France, France" -> "Paris".
fn first_segment(display_name: &str) -> String {
    display_name.split(',').next().unwrap_or_default().trim().to_string()
}
