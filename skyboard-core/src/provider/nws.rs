//! Active weather alerts from the US National Weather Service.
//!
//! The service only covers the United States, so anything other than a clean
//! response is treated as "no data" rather than an error.

use async_trait::async_trait;
use reqwest::{
    Client,
    header::{ACCEPT, USER_AGENT},
};

use crate::{model::Advisory, payload::AlertPayload};

use super::{AlertSource, Lookup};

#[derive(Debug, Clone)]
pub struct NwsAlertSource {
    url: String,
    user_agent: String,
    http: Client,
}

impl NwsAlertSource {
    pub fn new(url: String, user_agent: String) -> Self {
        Self { url, user_agent, http: Client::new() }
    }

    async fn try_fetch(&self, latitude: f64, longitude: f64) -> Result<AlertPayload, String> {
        let point = format!("{latitude:.4},{longitude:.4}");

        let res = self
            .http
            .get(&self.url)
            .header(USER_AGENT, &self.user_agent)
            .header(ACCEPT, "application/geo+json")
            .query(&[("point", point)])
            .send()
            .await
            .map_err(|e| format!("request failed: {e}"))?;

        let status = res.status();
        if !status.is_success() {
            return Err(format!("status {status}"));
        }

        res.json().await.map_err(|e| format!("parse error: {e}"))
    }
}

/// Event names of every feature, in payload order.
pub fn advisories(payload: &AlertPayload) -> Vec<Advisory> {
    payload
        .features
        .iter()
        .map(|f| Advisory { event_name: f.properties.event.clone() })
        .collect()
}

#[async_trait]
impl AlertSource for NwsAlertSource {
    async fn fetch_alerts(&self, latitude: f64, longitude: f64) -> Lookup<Vec<Advisory>> {
        match self.try_fetch(latitude, longitude).await {
            Ok(payload) => Lookup::Resolved(advisories(&payload)),
            Err(e) => {
                tracing::debug!("Alerts unavailable: {}", e);
                Lookup::Unavailable
            }
        }
    }
}
