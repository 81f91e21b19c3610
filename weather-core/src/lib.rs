//! Core library for the `weatherapp` CLI.
//!
//! This crate defines:
//! - Configuration & credentials handling
//! - The OpenWeather provider (geocoding + current weather)
//! - Weather payload parsing and the session history
//! - The fetch pipeline that ties them together
//!
//! It is used by `weatherapp-cli`, but any front end that can collect a
//! location and render a few strings can drive a [`WeatherSession`].

pub mod config;
pub mod error;
pub mod history;
pub mod model;
pub mod parser;
pub mod provider;
pub mod session;

pub use config::Config;
pub use error::{ErrorKind, Stage, WeatherError};
pub use history::HistoryLog;
pub use model::{
    Coordinates, DisplayFields, LocationQuery, RawPayload, UnitPreference, WeatherRecord,
};
pub use provider::{WeatherProvider, openweather::OpenWeatherProvider, provider_from_config};
pub use session::{FetchOutcome, FetchState, WeatherSession};
