use serde::{Deserialize, Serialize};
use std::{fmt, str::FromStr};

use crate::error::WeatherError;

/// What the user typed into the location form.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LocationQuery {
    pub city: Option<String>,
    pub country_code: Option<String>,
    pub zip: Option<String>,
}

impl LocationQuery {
    pub fn new(city: Option<String>, country_code: Option<String>, zip: Option<String>) -> Self {
        Self { city, country_code, zip }
    }

    pub fn city(city: impl Into<String>) -> Self {
        Self { city: Some(city.into()), ..Self::default() }
    }

    pub fn zip(zip: impl Into<String>) -> Self {
        Self { zip: Some(zip.into()), ..Self::default() }
    }

    pub fn with_country(mut self, country_code: impl Into<String>) -> Self {
        self.country_code = Some(country_code.into());
        self
    }

    /// Trimmed, non-empty city.
    pub fn city_value(&self) -> Option<&str> {
        non_empty(self.city.as_deref())
    }

    /// Trimmed, non-empty country code.
    pub fn country_value(&self) -> Option<&str> {
        non_empty(self.country_code.as_deref())
    }

    /// Trimmed, non-empty ZIP.
    pub fn zip_value(&self) -> Option<&str> {
        non_empty(self.zip.as_deref())
    }

    /// Rejects a query with neither a city nor a ZIP.
    pub fn validate(&self) -> Result<(), WeatherError> {
        if self.city_value().is_none() && self.zip_value().is_none() {
            return Err(WeatherError::Input);
        }
        Ok(())
    }

    /// Label used for history entries: the city if given, otherwise the ZIP.
    pub fn label(&self) -> &str {
        self.city_value().or_else(|| self.zip_value()).unwrap_or_default()
    }
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|s| !s.is_empty())
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Coordinates {
    pub latitude: f64,
    pub longitude: f64,
}

/// Unit system requested from the weather API.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UnitPreference {
    #[default]
    Metric,
    Imperial,
}

impl UnitPreference {
    /// Value of the `units` query parameter.
    pub fn as_str(&self) -> &'static str {
        match self {
            UnitPreference::Metric => "metric",
            UnitPreference::Imperial => "imperial",
        }
    }

    pub fn temperature_suffix(&self) -> &'static str {
        match self {
            UnitPreference::Metric => "°C",
            UnitPreference::Imperial => "°F",
        }
    }

    /// Name shown in unit pickers.
    pub fn label(&self) -> &'static str {
        match self {
            UnitPreference::Metric => "Celsius",
            UnitPreference::Imperial => "Fahrenheit",
        }
    }

    pub const fn all() -> &'static [UnitPreference] {
        &[UnitPreference::Metric, UnitPreference::Imperial]
    }
}

impl fmt::Display for UnitPreference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for UnitPreference {
    type Err = anyhow::Error;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_lowercase().as_str() {
            "metric" | "celsius" | "c" => Ok(UnitPreference::Metric),
            "imperial" | "fahrenheit" | "f" => Ok(UnitPreference::Imperial),
            _ => Err(anyhow::anyhow!(
                "Unknown unit system '{value}'. Supported: metric, imperial."
            )),
        }
    }
}

/// Unparsed body returned by the weather endpoint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawPayload(String);

impl RawPayload {
    pub fn new(body: impl Into<String>) -> Self {
        Self(body.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<String> for RawPayload {
    fn from(body: String) -> Self {
        Self(body)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WeatherRecord {
    pub temperature: f64,
    pub humidity_pct: u8,
    pub wind_speed_mps: f64,
    pub condition: String,
    pub unit: UnitPreference,
}

/// The four labels of the weather panel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DisplayFields {
    pub temperature: String,
    pub humidity: String,
    pub wind_speed: String,
    pub conditions: String,
}

impl WeatherRecord {
    /// Decimal values always keep a fractional digit, so `8` renders as `8.0`.
    pub fn display(&self) -> DisplayFields {
        DisplayFields {
            temperature: format!(
                "Temperature: {:?} {}",
                self.temperature,
                self.unit.temperature_suffix()
            ),
            humidity: format!("Humidity: {} %", self.humidity_pct),
            wind_speed: format!("Wind Speed: {:?} m/s", self.wind_speed_mps),
            conditions: format!("Conditions: {}", self.condition),
        }
    }
}

impl DisplayFields {
    /// Placeholder shown before the first successful fetch.
    pub fn empty() -> Self {
        Self {
            temperature: "Temperature: N/A".to_string(),
            humidity: "Humidity: N/A".to_string(),
            wind_speed: "Wind Speed: N/A".to_string(),
            conditions: "Conditions: N/A".to_string(),
        }
    }

    pub fn lines(&self) -> [&str; 4] {
        [&self.temperature, &self.humidity, &self.wind_speed, &self.conditions]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_query_fails_validation() {
        let err = LocationQuery::default().validate().unwrap_err();
        assert!(matches!(err, WeatherError::Input));

        let blank = LocationQuery::new(Some("  ".into()), Some("GB".into()), Some(String::new()));
        assert!(matches!(blank.validate(), Err(WeatherError::Input)));
    }

    #[test]
    fn city_or_zip_is_enough() {
        assert!(LocationQuery::city("London").validate().is_ok());
        assert!(LocationQuery::zip("10001").validate().is_ok());
    }

    #[test]
    fn label_prefers_city_then_zip() {
        let both = LocationQuery::new(Some("Paris".into()), None, Some("75001".into()));
        assert_eq!(both.label(), "Paris");
        assert_eq!(LocationQuery::zip("10001").with_country("US").label(), "10001");
    }

    #[test]
    fn unit_vocabulary() {
        assert_eq!(UnitPreference::default(), UnitPreference::Metric);
        assert_eq!(UnitPreference::Metric.as_str(), "metric");
        assert_eq!(UnitPreference::Imperial.as_str(), "imperial");
        assert_eq!(UnitPreference::Imperial.temperature_suffix(), "°F");

        for unit in UnitPreference::all() {
            assert_eq!(unit.as_str().parse::<UnitPreference>().unwrap(), *unit);
        }
        assert!("kelvin".parse::<UnitPreference>().is_err());
    }

    #[test]
    fn display_fields_follow_unit() {
        let record = WeatherRecord {
            temperature: 70.3,
            humidity_pct: 45,
            wind_speed_mps: 5.5,
            condition: "few clouds".into(),
            unit: UnitPreference::Imperial,
        };

        let display = record.display();
        assert_eq!(display.temperature, "Temperature: 70.3 °F");
        assert_eq!(display.humidity, "Humidity: 45 %");
        assert_eq!(display.wind_speed, "Wind Speed: 5.5 m/s");
        assert_eq!(display.conditions, "Conditions: few clouds");

        let whole = WeatherRecord {
            temperature: 8.0,
            wind_speed_mps: 3.0,
            unit: UnitPreference::Metric,
            ..record
        };
        let display = whole.display();
        assert_eq!(display.temperature, "Temperature: 8.0 °C");
        assert_eq!(display.wind_speed, "Wind Speed: 3.0 m/s");
    }
}
