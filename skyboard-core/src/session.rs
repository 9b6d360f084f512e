use chrono::{NaiveDateTime, Utc};
use serde::Serialize;

use crate::{
    config::Panels,
    error::ProjectionError,
    model::{Advisory, PresentationModel},
    payload::RawForecastPayload,
    projector::{ClockStyle, Projector, utc_offset},
    units::UnitSystem,
};

/// The last successful fetch plus the display preferences it is rendered with.
///
/// Owned by whoever drives the dashboard. Changing units produces a new session
/// over the same raw payload; nothing is mutated in place.
#[derive(Debug, Clone, PartialEq)]
pub struct Session {
    payload: RawForecastPayload,
    location_name: String,
    units: UnitSystem,
    clock: ClockStyle,
    panels: Panels,
    advisories: Vec<Advisory>,
}

/// Everything a renderer needs for one paint.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DashboardView {
    pub location_name: String,
    #[serde(flatten)]
    pub model: PresentationModel,
    pub advisories: Vec<Advisory>,
}

impl Session {
    pub fn new(payload: RawForecastPayload, location_name: String, units: UnitSystem) -> Self {
        Self {
            payload,
            location_name,
            units,
            clock: ClockStyle::default(),
            panels: Panels::default(),
            advisories: Vec::new(),
        }
    }

    pub fn with_clock(mut self, clock: ClockStyle) -> Self {
        self.clock = clock;
        self
    }

    pub fn with_panels(mut self, panels: Panels) -> Self {
        self.panels = panels;
        self
    }

    pub fn with_advisories(mut self, advisories: Vec<Advisory>) -> Self {
        self.advisories = advisories;
        self
    }

    pub fn payload(&self) -> &RawForecastPayload {
        &self.payload
    }

    pub fn location_name(&self) -> &str {
        &self.location_name
    }

    pub fn units(&self) -> UnitSystem {
        self.units
    }

    pub fn advisories(&self) -> &[Advisory] {
        &self.advisories
    }

    /// Same payload and location, different unit system.
    pub fn with_units(&self, units: UnitSystem) -> Self {
        Self { units, ..self.clone() }
    }

    pub fn toggle_units(&self) -> Self {
        self.with_units(self.units.toggled())
    }

    /// Wall-clock time at the forecast location.
    pub fn local_now(&self) -> Result<NaiveDateTime, ProjectionError> {
        let offset = utc_offset(&self.payload)?;
        Utc::now().naive_utc().checked_add_signed(offset).ok_or_else(|| {
            ProjectionError::MalformedPayload("local time out of range".to_string())
        })
    }

    pub fn render(&self) -> Result<DashboardView, ProjectionError> {
        self.render_at(self.local_now()?)
    }

    pub fn render_at(&self, now: NaiveDateTime) -> Result<DashboardView, ProjectionError> {
        let mut model = Projector::new(self.clock).project(&self.payload, now, self.units)?;

        if !self.panels.hourly {
            model.hourly.clear();
        }
        if !self.panels.visibility {
            model.current.visibility = None;
        }
        if !self.panels.uv_index {
            model.today.uv_index = None;
        }

        Ok(DashboardView {
            location_name: self.location_name.clone(),
            model,
            advisories: if self.panels.alerts { self.advisories.clone() } else { Vec::new() },
        })
    }
}
