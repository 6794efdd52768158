use std::sync::Arc;

use anyhow::{Context, Result};
use city_weather_ranker::config::LoggingConfig;
use city_weather_ranker::handler::function_handler;
use city_weather_ranker::{OpenWeatherClient, Pipeline, PipelineConfig, S3ObjectStore};
use lambda_runtime::{run, service_fn};
use tracing::info;
use tracing_subscriber::EnvFilter;

fn init_tracing(logging: &LoggingConfig) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let builder = tracing_subscriber::fmt().with_env_filter(filter);

    if logging.format == "json" {
        // Lambda already stamps every line.
        builder.json().without_time().init();
    } else {
        builder.init();
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let config = PipelineConfig::from_env().context("Failed to load configuration")?;
    init_tracing(&config.logging);

    info!(
        version = city_weather_ranker::VERSION,
        input = %config.locations.input,
        output = %config.locations.output,
        "Starting city weather ranker"
    );

    let store = S3ObjectStore::from_env().await;
    let weather = OpenWeatherClient::new(config.weather.clone())
        .context("Failed to create weather client")?;
    let pipeline = Pipeline::new(Arc::new(store), Arc::new(weather), config.locations.clone());

    run(service_fn(|event| function_handler(&pipeline, event)))
        .await
        .map_err(|e| anyhow::anyhow!(e))
}
