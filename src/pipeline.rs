//! Orchestration of one ranking run
//!
//! A run reads the uploaded city list, fetches weather for every city,
//! writes the temperature and wind rankings, then deletes the upload.
//! Stages run strictly in that order and the first error ends the run;
//! nothing already written is rolled back.

use std::sync::Arc;
use std::time::Instant;

use chrono::{DateTime, Utc};
use tracing::{info, instrument};

use crate::config::LocationConfig;
use crate::models::ResultSet;
use crate::storage::ObjectStore;
use crate::weather::WeatherProvider;
use crate::{Result, cleanup, ingest, ranking, weather, writer};

/// Request-scoped input of a single run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PipelineContext {
    /// Key of the uploaded city list in the input location
    pub source_key: String,
}

impl PipelineContext {
    pub fn new<S: Into<String>>(source_key: S) -> Self {
        Self {
            source_key: source_key.into(),
        }
    }
}

/// Outcome of a successful run
#[derive(Debug, Clone)]
pub struct PipelineReport {
    pub source_key: String,
    pub cities: usize,
    pub temperature: ResultSet,
    pub wind: ResultSet,
    pub completed_at: DateTime<Utc>,
}

/// Collaborators shared by every run; holds no per-run state.
#[derive(Clone)]
pub struct Pipeline {
    store: Arc<dyn ObjectStore>,
    weather: Arc<dyn WeatherProvider>,
    locations: LocationConfig,
}

impl Pipeline {
    pub fn new(
        store: Arc<dyn ObjectStore>,
        weather: Arc<dyn WeatherProvider>,
        locations: LocationConfig,
    ) -> Self {
        Self {
            store,
            weather,
            locations,
        }
    }

    #[must_use]
    pub fn locations(&self) -> &LocationConfig {
        &self.locations
    }

    #[instrument(skip(self), fields(key = %ctx.source_key))]
    pub async fn run(&self, ctx: &PipelineContext) -> Result<PipelineReport> {
        let start_time = Instant::now();
        let store = &*self.store;

        let cities = ingest::read_cities(store, &self.locations.input, &ctx.source_key).await?;
        let records = weather::fetch_all(&*self.weather, &cities).await?;
        let (temperature, wind) = ranking::rank(&records);

        for results in [&temperature, &wind] {
            writer::write_results(
                store,
                &self.locations.output,
                results.metric.output_key(),
                results,
            )
            .await?;
        }

        cleanup::remove_input(store, &self.locations.input, &ctx.source_key).await?;

        info!(
            cities = cities.len(),
            "Pipeline completed in {:.3}s",
            start_time.elapsed().as_secs_f64()
        );

        Ok(PipelineReport {
            source_key: ctx.source_key.clone(),
            cities: cities.len(),
            temperature,
            wind,
            completed_at: Utc::now(),
        })
    }
}
