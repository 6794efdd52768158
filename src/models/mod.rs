//! Data models for the ranking pipeline
//!
//! - Weather: per-city snapshot parsed from the weather API
//! - Ranking: metric projections and top-N result sets

pub mod ranking;
pub mod weather;

pub use ranking::{Metric, RankedEntry, ResultSet};
pub use weather::{MainReadings, WeatherRecord, WindReadings};
