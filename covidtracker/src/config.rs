use nonempty::{nonempty, NonEmpty};
use serde::{Deserialize, Serialize};

use crate::stats::RatePolicy;

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct Config {
    /// Where the OWID CSV export lives on disk.
    pub data_path: String,
    /// The countries under analysis, in display order. Always passed into
    /// computations explicitly; never read from ambient state.
    pub cohort: NonEmpty<String>,
    pub rate_policy: RatePolicy,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            data_path: "data/owid-covid-data.csv".into(),
            cohort: nonempty![
                "Kenya".into(),
                "United States".into(),
                "India".into(),
                "South Africa".into(),
                "United Kingdom".into(),
                "Brazil".into(),
                "China".into(),
            ],
            rate_policy: RatePolicy::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_cohort_keeps_design_order() {
        let config = Config::default();
        assert_eq!(config.cohort.len(), 7);
        assert_eq!(config.cohort.head, "Kenya");
        assert_eq!(config.cohort.last(), "China");
    }

    #[test]
    fn default_rate_policy_matches_source_behaviour() {
        let config = Config::default();
        assert_eq!(config.rate_policy.highest_cap, 0.10);
        assert!(!config.rate_policy.lowest_includes_zero);
    }
}
