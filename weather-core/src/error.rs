//! Error taxonomy for a single fetch attempt.

use std::fmt;
use thiserror::Error;

/// Which remote call a network failure belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Geocoding,
    Weather,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Stage::Geocoding => f.write_str("geocoding"),
            Stage::Weather => f.write_str("weather"),
        }
    }
}

#[derive(Error, Debug)]
pub enum WeatherError {
    #[error("Neither a city nor a zip code was supplied")]
    Input,

    #[error("No geocoding candidates for '{0}'")]
    LocationNotFound(String),

    #[error("OpenWeather {stage} request failed: {detail}")]
    Network { stage: Stage, detail: String },

    #[error("Malformed weather response: {0}")]
    MalformedResponse(String),

    #[error("A fetch is already in flight")]
    Busy,
}

/// Field-less discriminant of [`WeatherError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Input,
    LocationNotFound,
    Network,
    MalformedResponse,
    Busy,
}

impl WeatherError {
    pub(crate) fn network(stage: Stage, detail: impl fmt::Display) -> Self {
        Self::Network { stage, detail: detail.to_string() }
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Input => ErrorKind::Input,
            Self::LocationNotFound(_) => ErrorKind::LocationNotFound,
            Self::Network { .. } => ErrorKind::Network,
            Self::MalformedResponse(_) => ErrorKind::MalformedResponse,
            Self::Busy => ErrorKind::Busy,
        }
    }

    /// User-facing message; never includes transport or parser detail.
    pub fn user_message(&self) -> String {
        match self {
            Self::Input => "Please enter either a city name or zip code.".to_string(),
            Self::LocationNotFound(_) => "Location not found. Please check inputs.".to_string(),
            Self::Network { stage: Stage::Geocoding, .. } => {
                "Failed to retrieve location data. Check input or API.".to_string()
            }
            Self::Network { stage: Stage::Weather, .. } => {
                "Failed to retrieve weather data. Check API connectivity.".to_string()
            }
            Self::MalformedResponse(_) => "Error parsing weather data.".to_string(),
            Self::Busy => "A weather fetch is already in progress.".to_string(),
        }
    }

    /// Title for the error dialog.
    pub fn title(&self) -> &'static str {
        match self {
            Self::Input => "Input Error",
            _ => "Error",
        }
    }
}
