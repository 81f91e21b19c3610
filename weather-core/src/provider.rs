use crate::{
    Config,
    error::WeatherError,
    model::{Coordinates, LocationQuery, RawPayload, UnitPreference},
    provider::openweather::OpenWeatherProvider,
};
use async_trait::async_trait;
use std::fmt::Debug;

pub mod openweather;

/// The two remote calls a fetch is made of.
#[async_trait]
pub trait WeatherProvider: Send + Sync + Debug {
    /// Geocode `query` and return the first candidate's coordinates.
    async fn resolve(&self, query: &LocationQuery) -> Result<Coordinates, WeatherError>;

    /// Fetch the current-weather payload for `coords`, unparsed.
    async fn fetch(
        &self,
        coords: Coordinates,
        unit: UnitPreference,
    ) -> Result<RawPayload, WeatherError>;
}

/// Construct the OpenWeather provider from config.
pub fn provider_from_config(config: &Config) -> anyhow::Result<Box<dyn WeatherProvider>> {
    let api_key = config.api_key()?;

    let provider = match config.base_url.as_deref() {
        Some(base_url) => OpenWeatherProvider::with_base_url(api_key.to_owned(), base_url),
        None => OpenWeatherProvider::new(api_key.to_owned()),
    };

    Ok(Box::new(provider))
}
