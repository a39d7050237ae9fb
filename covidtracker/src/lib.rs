use anyhow::Result;
use log::debug;
use nonempty::NonEmpty;

use crate::config::Config;
use crate::dataset::{Dataset, Metric};
use crate::latest::LatestSnapshot;
use crate::series::Series;
use crate::stats::Superlatives;

// Re-exports
pub use column_names as COL;

// Modules
pub mod column_names;
pub mod config;
pub mod dataset;
pub mod error;
pub mod latest;
pub mod series;
pub mod stats;

/// Type for covidtracker data and API
pub struct CovidTracker {
    pub dataset: Dataset,
    pub config: Config,
}

impl CovidTracker {
    /// Setup the CovidTracker object with default configuration
    pub fn new() -> Result<Self> {
        Self::new_with_config(Config::default())
    }

    /// Setup the CovidTracker object with custom configuration
    pub fn new_with_config(config: Config) -> Result<Self> {
        debug!("config: {config:?}");
        let dataset = Dataset::from_csv_path(&config.data_path)?;
        Ok(Self { dataset, config })
    }

    /// Wrap an already-loaded dataset, e.g. one built in memory.
    pub fn with_dataset(dataset: Dataset, config: Config) -> Self {
        Self { dataset, config }
    }

    pub fn cohort(&self) -> &NonEmpty<String> {
        &self.config.cohort
    }

    /// Resolves the latest usable record per cohort member.
    pub fn latest_snapshot(&self) -> LatestSnapshot<'_> {
        LatestSnapshot::resolve(&self.dataset, &self.config.cohort)
    }

    /// Computes the superlative statistics over a snapshot under the
    /// configured rate policy.
    pub fn superlatives(&self, snapshot: &LatestSnapshot) -> Superlatives {
        stats::superlatives(snapshot, &self.config.rate_policy)
    }

    /// Extracts one time series per cohort member for the given metric.
    pub fn series(&self, metric: Metric) -> Vec<Series> {
        series::extract_series(&self.dataset, &self.config.cohort, metric)
    }
}
