//! Configuration management for the ranking pipeline
//!
//! Everything is read from environment variables once at process start and
//! then shared read-only between invocations.

use crate::PipelineError;
use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::env;
use std::time::Duration;

pub const INPUT_LOCATION_VAR: &str = "INPUT_LOCATION";
pub const OUTPUT_LOCATION_VAR: &str = "OUTPUT_LOCATION";
pub const WEATHER_API_KEY_VAR: &str = "WEATHER_API_KEY";
pub const WEATHER_BASE_URL_VAR: &str = "WEATHER_BASE_URL";
pub const WEATHER_TIMEOUT_VAR: &str = "WEATHER_TIMEOUT_SECONDS";
pub const WEATHER_UNITS_VAR: &str = "WEATHER_UNITS";
pub const LOG_FORMAT_VAR: &str = "LOG_FORMAT";

/// Root configuration structure
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PipelineConfig {
    /// Source and destination buckets
    pub locations: LocationConfig,
    /// Weather API configuration
    pub weather: WeatherConfig,
    /// Logging configuration
    pub logging: LoggingConfig,
}

/// Storage locations
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LocationConfig {
    /// Bucket the city lists are uploaded to
    pub input: String,
    /// Bucket the ranked CSV files are written to
    pub output: String,
}

/// Weather API configuration settings
#[derive(Clone, Serialize, Deserialize)]
pub struct WeatherConfig {
    /// OpenWeatherMap credential
    pub api_key: String,
    /// Base URL for weather API
    #[serde(default = "default_weather_base_url")]
    pub base_url: String,
    /// Request timeout in seconds
    #[serde(default = "default_weather_timeout")]
    pub timeout_seconds: u32,
    /// Unit system passed to the API
    #[serde(default = "default_weather_units")]
    pub units: String,
}

// Keeps the credential out of log output.
impl std::fmt::Debug for WeatherConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WeatherConfig")
            .field("api_key", &"<redacted>")
            .field("base_url", &self.base_url)
            .field("timeout_seconds", &self.timeout_seconds)
            .field("units", &self.units)
            .finish()
    }
}

/// Logging configuration settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log format (pretty or json)
    #[serde(default = "default_log_format")]
    pub format: String,
}

fn default_weather_base_url() -> String {
    "https://api.openweathermap.org/data/2.5".to_string()
}

fn default_weather_timeout() -> u32 {
    2
}

fn default_weather_units() -> String {
    "metric".to_string()
}

fn default_log_format() -> String {
    "json".to_string()
}

impl WeatherConfig {
    /// Weather config with defaults for everything except the credential
    pub fn with_api_key<S: Into<String>>(api_key: S) -> Self {
        Self {
            api_key: api_key.into(),
            base_url: default_weather_base_url(),
            timeout_seconds: default_weather_timeout(),
            units: default_weather_units(),
        }
    }

    #[must_use]
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_seconds.into())
    }
}

impl PipelineConfig {
    /// Load configuration from the process environment
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Load configuration from an arbitrary variable lookup
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let required = |name: &str| -> Result<String> {
            lookup(name)
                .ok_or_else(|| PipelineError::config(format!("Missing {name} env var")).into())
        };

        let timeout_seconds = match lookup(WEATHER_TIMEOUT_VAR) {
            Some(raw) => raw.trim().parse::<u32>().map_err(|_| {
                PipelineError::config(format!(
                    "{WEATHER_TIMEOUT_VAR} must be a whole number of seconds, got '{raw}'"
                ))
            })?,
            None => default_weather_timeout(),
        };

        let config = Self {
            locations: LocationConfig {
                input: required(INPUT_LOCATION_VAR)?,
                output: required(OUTPUT_LOCATION_VAR)?,
            },
            weather: WeatherConfig {
                api_key: required(WEATHER_API_KEY_VAR)?,
                base_url: lookup(WEATHER_BASE_URL_VAR).unwrap_or_else(default_weather_base_url),
                timeout_seconds,
                units: lookup(WEATHER_UNITS_VAR).unwrap_or_else(default_weather_units),
            },
            logging: LoggingConfig {
                format: lookup(LOG_FORMAT_VAR).unwrap_or_else(default_log_format),
            },
        };

        config.validate()?;
        Ok(config)
    }

    /// Validate all configuration settings
    pub fn validate(&self) -> Result<()> {
        self.validate_locations()?;
        self.validate_api_key()?;
        self.validate_numeric_ranges()?;
        self.validate_string_values()?;
        Ok(())
    }

    fn validate_locations(&self) -> Result<()> {
        if self.locations.input.trim().is_empty() {
            return Err(PipelineError::config(format!("{INPUT_LOCATION_VAR} cannot be empty")).into());
        }
        if self.locations.output.trim().is_empty() {
            return Err(
                PipelineError::config(format!("{OUTPUT_LOCATION_VAR} cannot be empty")).into(),
            );
        }
        Ok(())
    }

    /// Validate API keys and credentials
    pub fn validate_api_key(&self) -> Result<()> {
        if self.weather.api_key.trim().is_empty() {
            return Err(PipelineError::config(
                "Weather API key cannot be empty. Set WEATHER_API_KEY to a valid OpenWeatherMap key.",
            )
            .into());
        }
        Ok(())
    }

    fn validate_numeric_ranges(&self) -> Result<()> {
        if self.weather.timeout_seconds == 0 || self.weather.timeout_seconds > 30 {
            return Err(PipelineError::config(
                "Weather API timeout must be between 1 and 30 seconds",
            )
            .into());
        }
        Ok(())
    }

    fn validate_string_values(&self) -> Result<()> {
        let valid_units = ["standard", "metric", "imperial"];
        if !valid_units.contains(&self.weather.units.as_str()) {
            return Err(PipelineError::config(format!(
                "Invalid weather units '{}'. Must be one of: {}",
                self.weather.units,
                valid_units.join(", ")
            ))
            .into());
        }

        let valid_log_formats = ["pretty", "json"];
        if !valid_log_formats.contains(&self.logging.format.as_str()) {
            return Err(PipelineError::config(format!(
                "Invalid log format '{}'. Must be one of: {}",
                self.logging.format,
                valid_log_formats.join(", ")
            ))
            .into());
        }

        if !self.weather.base_url.starts_with("http://")
            && !self.weather.base_url.starts_with("https://")
        {
            return Err(PipelineError::config(
                "Weather API base URL must be a valid HTTP or HTTPS URL",
            )
            .into());
        }

        Ok(())
    }
}
