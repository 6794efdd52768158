//! Weather record model as returned by the current-weather endpoint

use serde::{Deserialize, Serialize};

/// Main measurement block of a weather response
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct MainReadings {
    /// Current temperature in the configured units
    pub temp: f64,
    /// Perceived temperature
    pub feels_like: f64,
    /// Minimum currently observed temperature
    pub temp_min: f64,
    /// Maximum currently observed temperature
    pub temp_max: f64,
    /// Atmospheric pressure in hPa
    pub pressure: i64,
    /// Humidity in percent
    pub humidity: i64,
}

/// Wind block of a weather response
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct WindReadings {
    /// Wind speed in the configured units
    pub speed: f64,
    /// Wind direction in degrees (0-360, where 0/360 is North)
    #[serde(rename = "deg", default)]
    pub direction: u16,
}

/// Snapshot of one city's current weather
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct WeatherRecord {
    /// Provider's city identifier
    pub id: i64,
    /// Display name reported by the provider
    pub name: String,
    pub main: MainReadings,
    pub wind: WindReadings,
}

impl WeatherRecord {
    #[must_use]
    pub fn temperature(&self) -> f64 {
        self.main.temp
    }

    #[must_use]
    pub fn wind_speed(&self) -> f64 {
        self.wind.speed
    }

    /// One-line summary used in logs
    #[must_use]
    pub fn summary(&self) -> String {
        format!(
            "{}: {:.1}° (feels {:.1}°), wind {:.1} from {}°, {} hPa, {}% humidity",
            self.name,
            self.main.temp,
            self.main.feels_like,
            self.wind.speed,
            self.wind.direction,
            self.main.pressure,
            self.main.humidity
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const LONDON: &str = r#"{
        "coord": {"lon": -0.13, "lat": 51.51},
        "weather": [{"id": 300, "main": "Drizzle"}],
        "main": {"temp": 14.2, "feels_like": 13.1, "temp_min": 12.8,
                 "temp_max": 15.6, "pressure": 1012, "humidity": 81},
        "wind": {"speed": 4.1, "deg": 80},
        "id": 2643743,
        "name": "London",
        "cod": 200
    }"#;

    #[test]
    fn test_deserialize_ignores_extra_fields() {
        let record: WeatherRecord = serde_json::from_str(LONDON).unwrap();
        assert_eq!(record.id, 2643743);
        assert_eq!(record.name, "London");
        assert_eq!(record.temperature(), 14.2);
        assert_eq!(record.main.pressure, 1012);
        assert_eq!(record.wind_speed(), 4.1);
        assert_eq!(record.wind.direction, 80);
    }

    #[test]
    fn test_missing_main_block_is_rejected() {
        let body = r#"{"id": 1, "name": "Nowhere", "wind": {"speed": 1.0, "deg": 0}}"#;
        assert!(serde_json::from_str::<WeatherRecord>(body).is_err());
    }

    #[test]
    fn test_summary_reports_readings() {
        let record: WeatherRecord = serde_json::from_str(LONDON).unwrap();
        assert_eq!(
            record.summary(),
            "London: 14.2° (feels 13.1°), wind 4.1 from 80°, 1012 hPa, 81% humidity"
        );
    }
}
