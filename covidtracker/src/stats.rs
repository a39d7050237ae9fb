//! Death-rate computation and superlative statistics over a latest snapshot.

use serde::{Deserialize, Serialize};

use crate::dataset::{Metric, Record};
use crate::latest::LatestSnapshot;

/// Eligibility policy for the death-rate rankings.
///
/// `highest_cap` keeps early-pandemic reporting anomalies out of the
/// highest-rate ranking: tiny case denominators inflate the ratio well past
/// anything plausible. `lowest_includes_zero` decides whether a country with
/// zero recorded deaths can take the lowest-rate slot; the upstream data
/// excludes it, and that stays the default.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq)]
#[serde(default)]
pub struct RatePolicy {
    pub highest_cap: f64,
    pub lowest_includes_zero: bool,
}

impl Default for RatePolicy {
    fn default() -> Self {
        RatePolicy {
            highest_cap: 0.10,
            lowest_includes_zero: false,
        }
    }
}

/// Death rate for display: deaths over cases, 0.0 when cases are absent or
/// non-positive. Absent deaths count as a zero numerator.
pub fn death_rate(record: &Record) -> f64 {
    ranked_death_rate(record).unwrap_or(0.0)
}

/// Death rate for ranking: `None` when total_cases is absent or non-positive,
/// so a degenerate ratio can never masquerade as a genuine minimum.
pub fn ranked_death_rate(record: &Record) -> Option<f64> {
    let cases = record.metric(Metric::TotalCases).filter(|cases| *cases > 0.0)?;
    let deaths = record.metric(Metric::TotalDeaths).unwrap_or(0.0);
    Some(deaths / cases)
}

/// One superlative fact over an integer count.
#[derive(Clone, Debug, PartialEq)]
pub struct CountryCount {
    pub location: String,
    pub value: i64,
}

/// One superlative fact over a death rate.
#[derive(Clone, Debug, PartialEq)]
pub struct CountryRate {
    pub location: String,
    pub rate: f64,
}

/// The four superlative facts over a snapshot. A field is `None` when no
/// cohort member qualifies; that is a sentinel for the caller, not an error.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Superlatives {
    pub highest_cases: Option<CountryCount>,
    pub highest_deaths: Option<CountryCount>,
    pub highest_death_rate: Option<CountryRate>,
    pub lowest_death_rate: Option<CountryRate>,
}

/// Compute the superlatives in cohort order. All comparisons are strict, so
/// the first-encountered country keeps a tied slot.
pub fn superlatives(snapshot: &LatestSnapshot, policy: &RatePolicy) -> Superlatives {
    let mut result = Superlatives::default();
    for (location, record) in snapshot.with_data() {
        if let Some(cases) = record.count(Metric::TotalCases) {
            if result
                .highest_cases
                .as_ref()
                .map_or(true, |best| cases > best.value)
            {
                result.highest_cases = Some(CountryCount {
                    location: location.to_string(),
                    value: cases,
                });
            }
        }

        let deaths = record.count(Metric::TotalDeaths).unwrap_or(0);
        if result
            .highest_deaths
            .as_ref()
            .map_or(true, |best| deaths > best.value)
        {
            result.highest_deaths = Some(CountryCount {
                location: location.to_string(),
                value: deaths,
            });
        }

        if let Some(rate) = ranked_death_rate(record) {
            if rate < policy.highest_cap
                && result
                    .highest_death_rate
                    .as_ref()
                    .map_or(true, |best| rate > best.rate)
            {
                result.highest_death_rate = Some(CountryRate {
                    location: location.to_string(),
                    rate,
                });
            }
            if (policy.lowest_includes_zero || rate > 0.0)
                && result
                    .lowest_death_rate
                    .as_ref()
                    .map_or(true, |best| rate < best.rate)
            {
                result.lowest_death_rate = Some(CountryRate {
                    location: location.to_string(),
                    rate,
                });
            }
        }
    }
    result
}
