use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::Deserialize;
use tracing::debug;

use crate::{
    error::{Stage, WeatherError},
    model::{Coordinates, LocationQuery, RawPayload, UnitPreference},
};

use super::WeatherProvider;

pub const DEFAULT_BASE_URL: &str = "https://api.openweathermap.org";

const GEO_ZIP_PATH: &str = "geo/1.0/zip";
const GEO_DIRECT_PATH: &str = "geo/1.0/direct";
const WEATHER_PATH: &str = "data/2.5/weather";

/// Geocoding lookup derived from a [`LocationQuery`].
///
/// A ZIP wins over a city when both are present. The country code, when
/// given, is appended after a comma in either case.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GeocodeRequest {
    Zip(String),
    Direct(String),
}

impl GeocodeRequest {
    pub fn from_query(query: &LocationQuery) -> Result<Self, WeatherError> {
        let qualify = |value: &str| match query.country_value() {
            Some(country) => format!("{value},{country}"),
            None => value.to_string(),
        };

        if let Some(zip) = query.zip_value() {
            Ok(Self::Zip(qualify(zip)))
        } else if let Some(city) = query.city_value() {
            Ok(Self::Direct(qualify(city)))
        } else {
            Err(WeatherError::Input)
        }
    }

    pub fn path(&self) -> &'static str {
        match self {
            Self::Zip(_) => GEO_ZIP_PATH,
            Self::Direct(_) => GEO_DIRECT_PATH,
        }
    }

    /// Query parameter carrying the location.
    pub fn param(&self) -> (&'static str, &str) {
        match self {
            Self::Zip(value) => ("zip", value),
            Self::Direct(value) => ("q", value),
        }
    }
}

/// Query parameters for the current-weather call, minus the credential.
pub fn weather_query(coords: Coordinates, unit: UnitPreference) -> [(&'static str, String); 3] {
    [
        ("lat", format!("{:.2}", coords.latitude)),
        ("lon", format!("{:.2}", coords.longitude)),
        ("units", unit.as_str().to_string()),
    ]
}

#[derive(Debug, Clone)]
pub struct OpenWeatherProvider {
    api_key: String,
    base_url: String,
    http: Client,
}

impl OpenWeatherProvider {
    pub fn new(api_key: String) -> Self {
        Self::with_base_url(api_key, DEFAULT_BASE_URL)
    }

    pub fn with_base_url(api_key: String, base_url: &str) -> Self {
        Self {
            api_key,
            base_url: base_url.trim_end_matches('/').to_string(),
            http: Client::new(),
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path)
    }

    /// GET `url` and return the body of a 2xx response.
    async fn get_text(
        &self,
        stage: Stage,
        url: &str,
        query: &[(&str, &str)],
    ) -> Result<(StatusCode, String), WeatherError> {
        let res = self
            .http
            .get(url)
            .query(query)
            .query(&[("appid", self.api_key.as_str())])
            .send()
            .await
            .map_err(|e| WeatherError::network(stage, format!("failed to send request: {e}")))?;

        let status = res.status();
        let body = res
            .text()
            .await
            .map_err(|e| WeatherError::network(stage, format!("failed to read body: {e}")))?;

        Ok((status, body))
    }
}

#[derive(Debug, Deserialize)]
struct OwGeoCandidate {
    lat: f64,
    lon: f64,
}

/// `direct` answers with a list, `zip` with a single object.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum OwGeoResponse {
    Many(Vec<OwGeoCandidate>),
    One(OwGeoCandidate),
}

impl OwGeoResponse {
    fn first(self) -> Option<OwGeoCandidate> {
        match self {
            OwGeoResponse::Many(list) => list.into_iter().next(),
            OwGeoResponse::One(candidate) => Some(candidate),
        }
    }
}

#[async_trait]
impl WeatherProvider for OpenWeatherProvider {
    async fn resolve(&self, query: &LocationQuery) -> Result<Coordinates, WeatherError> {
        let request = GeocodeRequest::from_query(query)?;
        let url = self.url(request.path());
        let (name, value) = request.param();
        debug!(%url, %name, %value, "geocoding request");

        let (status, body) = self.get_text(Stage::Geocoding, &url, &[(name, value)]).await?;

        // The zip endpoint reports unknown codes as 404.
        if status == StatusCode::NOT_FOUND && matches!(request, GeocodeRequest::Zip(_)) {
            return Err(WeatherError::LocationNotFound(value.to_string()));
        }
        if !status.is_success() {
            return Err(WeatherError::network(
                Stage::Geocoding,
                format!("status {}: {}", status, truncate_body(&body)),
            ));
        }

        let parsed: OwGeoResponse = serde_json::from_str(&body).map_err(|e| {
            WeatherError::network(Stage::Geocoding, format!("unexpected geocoding body: {e}"))
        })?;

        let candidate =
            parsed.first().ok_or_else(|| WeatherError::LocationNotFound(value.to_string()))?;

        debug!(lat = candidate.lat, lon = candidate.lon, "resolved location");
        Ok(Coordinates { latitude: candidate.lat, longitude: candidate.lon })
    }

    async fn fetch(
        &self,
        coords: Coordinates,
        unit: UnitPreference,
    ) -> Result<RawPayload, WeatherError> {
        let url = self.url(WEATHER_PATH);
        let params = weather_query(coords, unit);
        let query: Vec<(&str, &str)> = params.iter().map(|(k, v)| (*k, v.as_str())).collect();
        debug!(%url, ?query, "weather request");

        let (status, body) = self.get_text(Stage::Weather, &url, &query).await?;

        if !status.is_success() {
            return Err(WeatherError::network(
                Stage::Weather,
                format!("status {}: {}", status, truncate_body(&body)),
            ));
        }

        Ok(RawPayload::from(body))
    }
}

fn truncate_body(body: &str) -> String {
    const MAX: usize = 200;
    match body.char_indices().nth(MAX) {
        Some((idx, _)) => format!("{}...", &body[..idx]),
        None => body.to_string(),
    }
}
