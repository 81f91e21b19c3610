use crate::model::WeatherRecord;

/// Session-lifetime, append-only list of fetch summaries.
#[derive(Debug, Clone, Default)]
pub struct HistoryLog {
    entries: Vec<String>,
}

impl HistoryLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Format `record` and append it; returns the appended line.
    pub fn append(&mut self, label: &str, record: &WeatherRecord) -> &str {
        self.entries.push(format_entry(label, record));
        self.entries.last().map(String::as_str).unwrap_or_default()
    }

    pub fn entries(&self) -> &[String] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

pub fn format_entry(label: &str, record: &WeatherRecord) -> String {
    format!(
        "Location: {}, Temp: {:.1}{}, Humidity: {}%, Wind: {:.1} m/s, Cond: {}",
        label,
        record.temperature,
        record.unit.temperature_suffix(),
        record.humidity_pct,
        record.wind_speed_mps,
        record.condition,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::UnitPreference;

    fn record(temperature: f64, unit: UnitPreference) -> WeatherRecord {
        WeatherRecord {
            temperature,
            humidity_pct: 60,
            wind_speed_mps: 3.4,
            condition: "clear sky".into(),
            unit,
        }
    }

    #[test]
    fn formats_reference_line() {
        let mut log = HistoryLog::new();
        let line = log.append("Paris", &record(21.5, UnitPreference::Metric)).to_string();

        assert_eq!(
            line,
            "Location: Paris, Temp: 21.5°C, Humidity: 60%, Wind: 3.4 m/s, Cond: clear sky"
        );
        assert_eq!(log.entries(), [line]);
    }

    #[test]
    fn rounds_to_one_digit() {
        let mut r = record(-3.04, UnitPreference::Imperial);
        r.wind_speed_mps = 12.0;
        assert_eq!(
            format_entry("Oslo", &r),
            "Location: Oslo, Temp: -3.0°F, Humidity: 60%, Wind: 12.0 m/s, Cond: clear sky"
        );
    }

    #[test]
    fn keeps_duplicates_in_insertion_order() {
        let mut log = HistoryLog::new();
        assert!(log.is_empty());

        log.append("Paris", &record(21.5, UnitPreference::Metric));
        log.append("Paris", &record(21.5, UnitPreference::Metric));
        log.append("Paris", &record(70.7, UnitPreference::Imperial));

        assert_eq!(log.len(), 3);
        assert_eq!(log.entries()[0], log.entries()[1]);
        assert!(log.entries()[0].contains("21.5°C"));
        assert!(log.entries()[2].contains("70.7°F"));
    }
}
