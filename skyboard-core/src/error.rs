use reqwest::StatusCode;

/// The raw payload violated a shape invariant; nothing should be rendered from it.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ProjectionError {
    #[error("Malformed forecast payload: {0}")]
    MalformedPayload(String),
}

/// Failures surfaced to whoever drives the dashboard.
#[derive(Debug, thiserror::Error)]
pub enum DashboardError {
    #[error("Location access was denied")]
    LocationDenied,
    #[error("No location is available")]
    LocationUnavailable,
    #[error("No place found for '{0}'")]
    PlaceNotFound(String),
    #[error("Forecast service responded with status {status}: {body}")]
    UpstreamUnavailable { status: StatusCode, body: String },
    #[error(transparent)]
    MalformedPayload(#[from] ProjectionError),
    #[error("Network error: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("Failed to decode response: {0}")]
    Decode(String),
}

impl DashboardError {
    /// Fixed message suitable for showing to the user.
    pub fn user_message(&self) -> &'static str {
        match self {
            DashboardError::LocationDenied => {
                "Location access denied. Search for a city instead."
            }
            DashboardError::LocationUnavailable => {
                "Location is not available. Search for a city or configure a home location."
            }
            DashboardError::PlaceNotFound(_) => "City not found. Please try another search.",
            DashboardError::UpstreamUnavailable { .. } | DashboardError::Transport(_) => {
                "Unable to fetch weather data. Please try again later."
            }
            DashboardError::MalformedPayload(_) | DashboardError::Decode(_) => {
                "Weather data could not be displayed."
            }
        }
    }
}
