//! Error types and handling for the ranking pipeline

use thiserror::Error;

/// Pipeline stage that produced an error
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Config,
    Trigger,
    Ingest,
    Fetch,
    Write,
    Cleanup,
}

impl std::fmt::Display for Stage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Stage::Config => "config",
            Stage::Trigger => "trigger",
            Stage::Ingest => "ingest",
            Stage::Fetch => "fetch",
            Stage::Write => "write",
            Stage::Cleanup => "cleanup",
        };
        f.write_str(name)
    }
}

/// Main error type for the ranking pipeline
#[derive(Error, Debug)]
pub enum PipelineError {
    /// Missing or invalid environment configuration
    #[error("Configuration error: {message}")]
    Config { message: String },

    /// Malformed trigger notification
    #[error("Invalid trigger event: {message}")]
    Event { message: String },

    /// Input object could not be retrieved or decoded
    #[error("Failed to read source object '{key}': {message}")]
    SourceRead {
        key: String,
        message: String,
        /// The object does not exist, e.g. an earlier delivery already consumed it
        missing: bool,
    },

    /// Weather API unreachable, timed out, or answered with an error status
    #[error("Failed to fetch weather for '{city}': {message}")]
    WeatherFetch { city: String, message: String },

    /// Weather API body did not match the expected schema
    #[error("Failed to parse weather for '{city}': {message}")]
    WeatherParse { city: String, message: String },

    /// Result rows could not be encoded
    #[error("Failed to serialize '{key}': {message}")]
    Serialization { key: String, message: String },

    /// Output object could not be stored
    #[error("Failed to write '{key}': {message}")]
    SinkWrite { key: String, message: String },

    /// Input object could not be removed
    #[error("Failed to delete '{key}': {message}")]
    SinkDelete { key: String, message: String },

    /// One or more records of a notification batch failed
    #[error("{} of {total} records failed: {}", .failures.len(), join_failures(.failures))]
    Batch {
        total: usize,
        failures: Vec<PipelineError>,
    },
}

fn join_failures(failures: &[PipelineError]) -> String {
    failures
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

impl PipelineError {
    /// Create a new configuration error
    pub fn config<S: Into<String>>(message: S) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    /// Create a new trigger event error
    pub fn event<S: Into<String>>(message: S) -> Self {
        Self::Event {
            message: message.into(),
        }
    }

    pub fn source_read<K: Into<String>, S: ToString>(key: K, cause: S) -> Self {
        Self::SourceRead {
            key: key.into(),
            message: cause.to_string(),
            missing: false,
        }
    }

    pub fn source_missing<K: Into<String>, S: ToString>(key: K, cause: S) -> Self {
        Self::SourceRead {
            key: key.into(),
            message: cause.to_string(),
            missing: true,
        }
    }

    /// Whether the input object no longer exists
    #[must_use]
    pub fn is_missing_source(&self) -> bool {
        matches!(self, PipelineError::SourceRead { missing: true, .. })
    }

    pub fn weather_fetch<C: Into<String>, S: ToString>(city: C, cause: S) -> Self {
        Self::WeatherFetch {
            city: city.into(),
            message: cause.to_string(),
        }
    }

    pub fn weather_parse<C: Into<String>, S: ToString>(city: C, cause: S) -> Self {
        Self::WeatherParse {
            city: city.into(),
            message: cause.to_string(),
        }
    }

    pub fn serialization<K: Into<String>, S: ToString>(key: K, cause: S) -> Self {
        Self::Serialization {
            key: key.into(),
            message: cause.to_string(),
        }
    }

    pub fn sink_write<K: Into<String>, S: ToString>(key: K, cause: S) -> Self {
        Self::SinkWrite {
            key: key.into(),
            message: cause.to_string(),
        }
    }

    pub fn sink_delete<K: Into<String>, S: ToString>(key: K, cause: S) -> Self {
        Self::SinkDelete {
            key: key.into(),
            message: cause.to_string(),
        }
    }

    /// Stage of the pipeline the error belongs to
    #[must_use]
    pub fn stage(&self) -> Stage {
        match self {
            PipelineError::Config { .. } => Stage::Config,
            PipelineError::Event { .. } => Stage::Trigger,
            PipelineError::SourceRead { .. } => Stage::Ingest,
            PipelineError::WeatherFetch { .. } | PipelineError::WeatherParse { .. } => {
                Stage::Fetch
            }
            PipelineError::Serialization { .. } | PipelineError::SinkWrite { .. } => Stage::Write,
            PipelineError::SinkDelete { .. } => Stage::Cleanup,
            PipelineError::Batch { failures, .. } => failures
                .first()
                .map_or(Stage::Trigger, PipelineError::stage),
        }
    }

    /// Get a user-friendly error message
    #[must_use]
    pub fn user_message(&self) -> String {
        match self {
            PipelineError::Config { .. } => {
                "Configuration error. Please check the function environment variables.".to_string()
            }
            PipelineError::WeatherFetch { city, .. } => {
                format!("Unable to reach the weather service for {city}.")
            }
            PipelineError::WeatherParse { city, .. } => {
                format!("The weather service returned unexpected data for {city}.")
            }
            other => format!("{} stage failed: {other}", other.stage()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_creation() {
        let config_err = PipelineError::config("missing INPUT_LOCATION");
        assert!(matches!(config_err, PipelineError::Config { .. }));

        let fetch_err = PipelineError::weather_fetch("Paris", "timed out");
        assert!(matches!(
            fetch_err,
            PipelineError::WeatherFetch { ref city, .. } if city == "Paris"
        ));

        let delete_err = PipelineError::sink_delete("cities.txt", "access denied");
        assert!(matches!(delete_err, PipelineError::SinkDelete { .. }));
    }

    #[test]
    fn test_stage_mapping() {
        assert_eq!(PipelineError::source_read("k", "x").stage(), Stage::Ingest);
        assert_eq!(PipelineError::weather_parse("Oslo", "x").stage(), Stage::Fetch);
        assert_eq!(PipelineError::serialization("k", "x").stage(), Stage::Write);
        assert_eq!(PipelineError::sink_write("k", "x").stage(), Stage::Write);
        assert_eq!(PipelineError::sink_delete("k", "x").stage(), Stage::Cleanup);
        assert_eq!(PipelineError::event("no records").stage(), Stage::Trigger);
    }

    #[test]
    fn test_missing_source_flag() {
        assert!(PipelineError::source_missing("a.txt", "not found").is_missing_source());
        assert!(!PipelineError::source_read("a.txt", "denied").is_missing_source());
        assert!(!PipelineError::sink_delete("a.txt", "denied").is_missing_source());
    }

    #[test]
    fn test_batch_error_lists_every_failure() {
        let err = PipelineError::Batch {
            total: 3,
            failures: vec![
                PipelineError::weather_fetch("Tokyo", "timed out"),
                PipelineError::sink_delete("c.txt", "denied"),
            ],
        };
        let message = err.to_string();
        assert!(message.starts_with("2 of 3 records failed"));
        assert!(message.contains("Tokyo"));
        assert!(message.contains("c.txt"));
        assert_eq!(err.stage(), Stage::Fetch);
    }

    #[test]
    fn test_user_messages() {
        let config_err = PipelineError::config("test");
        assert!(config_err.user_message().contains("Configuration error"));

        let fetch_err = PipelineError::weather_fetch("Tokyo", "connection refused");
        assert!(fetch_err.user_message().contains("Tokyo"));

        let write_err = PipelineError::sink_write("highest_wind.csv", "denied");
        let message = write_err.user_message();
        assert!(message.starts_with("write stage failed"));
        assert!(message.contains("highest_wind.csv"));
    }
}
