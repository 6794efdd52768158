//! Ranked result models

use serde::{Deserialize, Serialize};

use super::WeatherRecord;

/// Weather attribute a result set is ordered by
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Metric {
    Temperature,
    WindSpeed,
}

impl Metric {
    /// Project a record onto this metric axis
    #[must_use]
    pub fn value_of(self, record: &WeatherRecord) -> f64 {
        match self {
            Metric::Temperature => record.temperature(),
            Metric::WindSpeed => record.wind_speed(),
        }
    }

    /// CSV header for the value column
    #[must_use]
    pub fn column_header(self) -> &'static str {
        match self {
            Metric::Temperature => "Temperature",
            Metric::WindSpeed => "Wind Speed",
        }
    }

    /// Fixed destination key for this metric's result file
    #[must_use]
    pub fn output_key(self) -> &'static str {
        match self {
            Metric::Temperature => "highest_temperatures.csv",
            Metric::WindSpeed => "highest_wind.csv",
        }
    }
}

/// (city, metric value) pair
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RankedEntry {
    pub city: String,
    pub value: f64,
}

impl RankedEntry {
    pub fn new<S: Into<String>>(city: S, value: f64) -> Self {
        Self {
            city: city.into(),
            value,
        }
    }
}

/// Top entries for one metric, highest first
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResultSet {
    pub metric: Metric,
    pub entries: Vec<RankedEntry>,
}

impl ResultSet {
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    #[must_use]
    pub fn cities(&self) -> Vec<&str> {
        self.entries.iter().map(|e| e.city.as_str()).collect()
    }
}
