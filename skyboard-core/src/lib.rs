//! Core library for the `skyboard` weather dashboard.
//!
//! This crate defines:
//! - WMO code lookups and unit conversions
//! - Projection of raw forecast payloads into display-ready models
//! - Geocoding, forecast and alert providers
//! - Configuration and the fetch pipeline that ties them together
//!
//! It is used by `skyboard-cli`, but the projection layer has no I/O and can be
//! reused by any other renderer.

pub mod codes;
pub mod config;
pub mod dashboard;
pub mod error;
pub mod model;
pub mod payload;
pub mod projector;
pub mod provider;
pub mod session;
pub mod units;

pub use config::{Config, Endpoints, HomeLocation, Panels};
pub use dashboard::Dashboard;
pub use error::{DashboardError, ProjectionError};
pub use model::{
    Advisory, CurrentSnapshot, DailySummary, DayPhase, HourlySample, PresentationModel,
    TodaySummary,
};
pub use payload::{AlertPayload, RawForecastPayload};
pub use projector::{ClockStyle, Projector, project};
pub use provider::{AlertSource, ForecastOptions, ForecastSource, Geocoder, Lookup, Place};
pub use session::{DashboardView, Session};
pub use units::UnitSystem;
