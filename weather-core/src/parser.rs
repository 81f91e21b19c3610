use serde::Deserialize;

use crate::{
    error::WeatherError,
    model::{RawPayload, UnitPreference, WeatherRecord},
};

#[derive(Debug, Deserialize)]
struct OwMain {
    temp: f64,
    humidity: u8,
}

#[derive(Debug, Deserialize)]
struct OwWind {
    speed: f64,
}

#[derive(Debug, Deserialize)]
struct OwWeather {
    description: String,
}

#[derive(Debug, Deserialize)]
struct OwCurrentResponse {
    main: OwMain,
    wind: OwWind,
    weather: Vec<OwWeather>,
}

/// Parse a current-weather payload into a [`WeatherRecord`].
///
/// The values are taken as the API reported them for `unit`; nothing is
/// converted. Any missing or mistyped field fails the whole parse.
pub fn parse(payload: &RawPayload, unit: UnitPreference) -> Result<WeatherRecord, WeatherError> {
    let parsed: OwCurrentResponse = serde_json::from_str(payload.as_str())
        .map_err(|e| WeatherError::MalformedResponse(e.to_string()))?;

    let condition = parsed
        .weather
        .into_iter()
        .next()
        .map(|w| w.description)
        .ok_or_else(|| WeatherError::MalformedResponse("empty `weather` list".to_string()))?;

    Ok(WeatherRecord {
        temperature: parsed.main.temp,
        humidity_pct: parsed.main.humidity,
        wind_speed_mps: parsed.wind.speed,
        condition,
        unit,
    })
}
