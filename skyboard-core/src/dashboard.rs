//! Fetch orchestration: resolve a location, fetch its forecast, and hand back a [`Session`].

use crate::{
    config::{Config, HomeLocation, Panels},
    error::DashboardError,
    model::Advisory,
    payload::RawForecastPayload,
    projector::ClockStyle,
    provider::{AlertSource, ForecastOptions, ForecastSource, Geocoder, sources_from_config},
    session::Session,
    units::UnitSystem,
};

#[derive(Debug)]
pub struct Dashboard {
    geocoder: Box<dyn Geocoder>,
    forecast: Box<dyn ForecastSource>,
    alerts: Box<dyn AlertSource>,
    options: ForecastOptions,
    units: UnitSystem,
    clock: ClockStyle,
    home: Option<HomeLocation>,
    share_location: bool,
}

impl Dashboard {
    pub fn new(config: &Config) -> Self {
        let (geocoder, forecast, alerts) = sources_from_config(config);
        Self::with_sources(geocoder, forecast, alerts, config)
    }

    pub fn with_sources(
        geocoder: Box<dyn Geocoder>,
        forecast: Box<dyn ForecastSource>,
        alerts: Box<dyn AlertSource>,
        config: &Config,
    ) -> Self {
        Self {
            geocoder,
            forecast,
            alerts,
            options: ForecastOptions::from_config(config),
            units: config.units,
            clock: config.clock,
            home: config.home,
            share_location: config.share_location,
        }
    }

    /// Render sessions in this unit system instead of the configured one.
    pub fn with_units(mut self, units: UnitSystem) -> Self {
        self.units = units;
        self
    }

    pub fn panels(&self) -> Panels {
        self.options.panels
    }

    /// Coordinates standing in for the device location.
    pub fn current_location(&self) -> Result<HomeLocation, DashboardError> {
        if !self.share_location {
            return Err(DashboardError::LocationDenied);
        }
        self.home.ok_or(DashboardError::LocationUnavailable)
    }

    pub async fn load_current(&self) -> Result<Session, DashboardError> {
        let home = self.current_location()?;
        self.load_coordinates(home.latitude, home.longitude).await
    }

    /// Forecast, place name and alerts for a point, fetched concurrently.
    pub async fn load_coordinates(
        &self,
        latitude: f64,
        longitude: f64,
    ) -> Result<Session, DashboardError> {
        let (payload, name, advisories) = tokio::join!(
            self.forecast.fetch_forecast(latitude, longitude, &self.options),
            self.geocoder.reverse_geocode(latitude, longitude),
            self.advisories(latitude, longitude),
        );

        self.session(payload?, name.display_name(), advisories)
    }

    /// Geocode the query, then fetch forecast and alerts for the first match.
    pub async fn search(&self, query: &str) -> Result<Session, DashboardError> {
        let place = self.geocoder.forward_geocode(query).await?;

        let (payload, advisories) = tokio::join!(
            self.forecast.fetch_forecast(place.latitude, place.longitude, &self.options),
            self.advisories(place.latitude, place.longitude),
        );

        self.session(payload?, place.display_name, advisories)
    }

    async fn advisories(&self, latitude: f64, longitude: f64) -> Vec<Advisory> {
        if !self.options.panels.alerts {
            return Vec::new();
        }
        self.alerts.fetch_alerts(latitude, longitude).await.unwrap_or(Vec::new())
    }

    fn session(
        &self,
        payload: RawForecastPayload,
        location_name: String,
        advisories: Vec<Advisory>,
    ) -> Result<Session, DashboardError> {
        let session = Session::new(payload, location_name, self.units)
            .with_clock(self.clock)
            .with_panels(self.options.panels)
            .with_advisories(advisories);

        // A payload that cannot be projected is dropped whole.
        if let Err(e) = session.render() {
            tracing::error!("Discarding forecast: {}", e);
            return Err(e.into());
        }

        Ok(session)
    }
}
