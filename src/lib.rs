//! `city-weather-ranker` - ranks uploaded city lists by current weather
//!
//! An upload of comma-separated city names triggers one pipeline run: fetch
//! current weather per city, keep the three hottest and three windiest, write
//! both rankings as CSV and remove the upload.

pub mod cleanup;
pub mod config;
pub mod error;
pub mod handler;
pub mod ingest;
pub mod models;
pub mod pipeline;
pub mod ranking;
pub mod storage;
pub mod weather;
pub mod writer;

// Re-export core types for public API
pub use config::PipelineConfig;
pub use error::{PipelineError, Stage};
pub use models::{Metric, RankedEntry, ResultSet, WeatherRecord};
pub use pipeline::{Pipeline, PipelineContext, PipelineReport};
pub use storage::{MemoryObjectStore, ObjectStore, S3ObjectStore};
pub use weather::{OpenWeatherClient, WeatherProvider};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Core result type used throughout the library
pub type Result<T> = std::result::Result<T, PipelineError>;
