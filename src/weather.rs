//! Weather API client for OpenWeatherMap
//!
//! Each city costs exactly one bounded-timeout GET against the
//! current-weather endpoint. There is no retry: the first failing city aborts
//! the whole fetch so that incomplete data is never ranked.

use async_trait::async_trait;
use reqwest::Client;
use std::time::{Duration, Instant};
use tracing::{debug, error, info, instrument, warn};

use crate::config::WeatherConfig;
use crate::models::WeatherRecord;
use crate::{PipelineError, Result};

const SLOW_RESPONSE: Duration = Duration::from_secs(1);

/// Source of current weather per city
#[async_trait]
pub trait WeatherProvider: Send + Sync {
    async fn current_weather(&self, city: &str) -> Result<WeatherRecord>;
}

/// OpenWeatherMap current-weather client
pub struct OpenWeatherClient {
    client: Client,
    config: WeatherConfig,
}

impl OpenWeatherClient {
    pub fn new(config: WeatherConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(config.timeout())
            .user_agent(concat!("city-weather-ranker/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| PipelineError::config(format!("Failed to create HTTP client: {e}")))?;

        Ok(Self { client, config })
    }

    /// Request URL for `city`, credential included
    #[must_use]
    pub fn request_url(&self, city: &str) -> String {
        format!(
            "{}/weather?q={}&units={}&appid={}",
            self.config.base_url.trim_end_matches('/'),
            urlencoding::encode(city),
            urlencoding::encode(&self.config.units),
            urlencoding::encode(&self.config.api_key)
        )
    }

    fn redacted(&self, url: &str) -> String {
        url.replace(&*urlencoding::encode(&self.config.api_key), "<redacted>")
    }
}

#[async_trait]
impl WeatherProvider for OpenWeatherClient {
    #[instrument(skip(self))]
    async fn current_weather(&self, city: &str) -> Result<WeatherRecord> {
        let url = self.request_url(city);
        debug!("OpenWeatherMap request URL: {}", self.redacted(&url));

        let start_time = Instant::now();
        let response = self.client.get(&url).send().await.map_err(|e| {
            let cause = if e.is_timeout() {
                format!("request timed out after {}s", self.config.timeout_seconds)
            } else {
                format!("request failed: {e}")
            };
            PipelineError::weather_fetch(city, cause)
        })?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| PipelineError::weather_fetch(city, format!("failed to read body: {e}")))?;

        if !status.is_success() {
            error!(%status, "Weather API rejected request");
            return Err(PipelineError::weather_fetch(
                city,
                format!("HTTP {}: {}", status.as_u16(), body.trim()),
            ));
        }

        let record = parse_weather(city, &body)?;

        let elapsed = start_time.elapsed();
        if elapsed > SLOW_RESPONSE {
            warn!("Slow API response detected: {:.3}s", elapsed.as_secs_f64());
        }
        debug!("{}", record.summary());
        Ok(record)
    }
}

/// Decode a current-weather body for `city`
pub fn parse_weather(city: &str, body: &str) -> Result<WeatherRecord> {
    serde_json::from_str(body).map_err(|e| PipelineError::weather_parse(city, e))
}

/// Fetch weather for every city in order, stopping at the first failure.
#[instrument(skip_all, fields(cities = cities.len()))]
pub async fn fetch_all(provider: &dyn WeatherProvider, cities: &[String]) -> Result<Vec<WeatherRecord>> {
    let start_time = Instant::now();
    let mut records = Vec::with_capacity(cities.len());

    for city in cities {
        records.push(provider.current_weather(city).await?);
    }

    info!(
        "Retrieved weather for {} cities in {:.3}s",
        records.len(),
        start_time.elapsed().as_secs_f64()
    );
    Ok(records)
}
