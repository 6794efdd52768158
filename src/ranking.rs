//! Top-N selection over fetched weather records

use std::cmp::Ordering;

use tracing::debug;

use crate::models::{Metric, RankedEntry, ResultSet, WeatherRecord};

/// Number of entries kept per result set
pub const TOP_N: usize = 3;

// NaN sinks below every real value; -0.0 and 0.0 compare equal.
fn descending(a: f64, b: f64) -> Ordering {
    let key = |v: f64| if v.is_nan() { f64::NEG_INFINITY } else { v + 0.0 };
    key(b).total_cmp(&key(a))
}

/// Rank already-projected entries: descending by value, input order among
/// ties, at most [`TOP_N`] kept.
#[must_use]
pub fn top_entries(mut entries: Vec<RankedEntry>) -> Vec<RankedEntry> {
    // sort_by is stable
    entries.sort_by(|a, b| descending(a.value, b.value));
    entries.truncate(TOP_N);
    entries
}

/// Rank records along a single metric
#[must_use]
pub fn rank_by(records: &[WeatherRecord], metric: Metric) -> ResultSet {
    let entries = records
        .iter()
        .map(|record| RankedEntry::new(record.name.clone(), metric.value_of(record)))
        .collect();

    let ranked = ResultSet {
        metric,
        entries: top_entries(entries),
    };
    debug!(?metric, cities = ?ranked.cities(), "Ranked records");
    ranked
}

/// Temperature and wind result sets, in that order
#[must_use]
pub fn rank(records: &[WeatherRecord]) -> (ResultSet, ResultSet) {
    (
        rank_by(records, Metric::Temperature),
        rank_by(records, Metric::WindSpeed),
    )
}
