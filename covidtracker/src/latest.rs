//! Resolution of the latest usable observation per cohort member.
//!
//! A row is usable when its total_cases cell holds a value; countries report
//! sparsely and on irregular dates, so the latest usable row is found per
//! country rather than at the global maximum date.

use std::collections::HashMap;

use log::debug;
use nonempty::NonEmpty;

use crate::dataset::{Dataset, Metric, Record};

/// The latest usable record for each cohort member, in cohort order.
///
/// A member with no usable rows is carried as an explicit `None` so that every
/// downstream consumer has to handle the no-data case; it is never an error.
#[derive(Debug)]
pub struct LatestSnapshot<'a> {
    entries: Vec<(String, Option<&'a Record>)>,
}

impl<'a> LatestSnapshot<'a> {
    /// Resolve the snapshot with a single grouping pass over the dataset.
    ///
    /// Dates are compared as calendar dates. Duplicate rows sharing a
    /// member's maximum date keep the first occurrence in dataset order, so
    /// repeated runs over the same input produce identical snapshots.
    pub fn resolve(dataset: &'a Dataset, cohort: &NonEmpty<String>) -> Self {
        let mut by_location: HashMap<&str, Vec<&Record>> = HashMap::new();
        for record in dataset.records() {
            by_location
                .entry(record.location.as_str())
                .or_default()
                .push(record);
        }
        let entries: Vec<(String, Option<&Record>)> = cohort
            .iter()
            .map(|member| {
                let latest = by_location
                    .get(member.as_str())
                    .and_then(|rows| latest_usable(rows));
                if latest.is_none() {
                    debug!("no usable rows for cohort member '{member}'");
                }
                (member.clone(), latest)
            })
            .collect();
        Self { entries }
    }

    /// All cohort members with their resolution outcome, in cohort order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, Option<&'a Record>)> {
        self.entries
            .iter()
            .map(|(location, record)| (location.as_str(), *record))
    }

    /// Only the cohort members that resolved to a record, in cohort order.
    pub fn with_data(&self) -> impl Iterator<Item = (&str, &'a Record)> {
        self.entries
            .iter()
            .filter_map(|(location, record)| record.map(|r| (location.as_str(), r)))
    }

    pub fn get(&self, location: &str) -> Option<&'a Record> {
        self.entries
            .iter()
            .find(|(member, _)| member == location)
            .and_then(|(_, record)| *record)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// The usable row with the maximum date. Strictly-later dates replace the
/// candidate, so the first occurrence wins among duplicates.
fn latest_usable<'a>(rows: &[&'a Record]) -> Option<&'a Record> {
    let mut latest: Option<&Record> = None;
    for &row in rows {
        if row.metric(Metric::TotalCases).is_none() {
            continue;
        }
        match latest {
            Some(best) if row.date <= best.date => {}
            _ => latest = Some(row),
        }
    }
    latest
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;
    use nonempty::nonempty;

    use super::*;
    use crate::stats::death_rate;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn record(location: &str, date_: NaiveDate) -> Record {
        Record::new(location, date_, None)
    }

    #[test]
    fn latest_record_skips_rows_without_total_cases() {
        // The concrete scenario from the design discussion: the newest row has
        // an empty total_cases cell and must not win.
        let dataset = Dataset::from_records(vec![
            record("Kenya", date(2021, 1, 1))
                .with_metric(Metric::TotalCases, 100.0)
                .with_metric(Metric::TotalDeaths, 2.0),
            record("Kenya", date(2021, 1, 5))
                .with_metric(Metric::TotalCases, 150.0)
                .with_metric(Metric::TotalDeaths, 3.0),
            record("Kenya", date(2021, 1, 10)).with_metric(Metric::TotalDeaths, 5.0),
        ]);
        let cohort = nonempty!["Kenya".to_string()];
        let snapshot = LatestSnapshot::resolve(&dataset, &cohort);
        let latest = snapshot.get("Kenya").expect("Kenya should resolve");
        assert_eq!(latest.date, date(2021, 1, 5));
        assert_eq!(latest.metric(Metric::TotalCases), Some(150.0));
        assert!((death_rate(latest) - 0.0200).abs() < 1e-12);
    }

    #[test]
    fn latest_record_date_is_maximal_among_usable_rows() {
        let dataset = Dataset::from_records(vec![
            record("Brazil", date(2020, 6, 1)).with_metric(Metric::TotalCases, 10.0),
            record("Brazil", date(2021, 3, 1)).with_metric(Metric::TotalCases, 30.0),
            record("Brazil", date(2020, 12, 24)).with_metric(Metric::TotalCases, 20.0),
        ]);
        let cohort = nonempty!["Brazil".to_string()];
        let snapshot = LatestSnapshot::resolve(&dataset, &cohort);
        let latest = snapshot.get("Brazil").unwrap();
        for row in dataset.records() {
            if row.metric(Metric::TotalCases).is_some() {
                assert!(latest.date >= row.date, "resolved date must be maximal");
            }
        }
    }

    #[test]
    fn member_without_usable_rows_is_absent_not_an_error() {
        let dataset = Dataset::from_records(vec![
            record("Kenya", date(2021, 1, 1)).with_metric(Metric::TotalCases, 100.0),
            // China appears in the relation but never with a usable cell.
            record("China", date(2021, 1, 1)).with_metric(Metric::TotalDeaths, 4.0),
        ]);
        let cohort = nonempty!["Kenya".to_string(), "China".to_string(), "India".to_string()];
        let snapshot = LatestSnapshot::resolve(&dataset, &cohort);
        assert_eq!(snapshot.len(), 3, "every member keeps a slot");
        assert!(snapshot.get("Kenya").is_some());
        assert!(snapshot.get("China").is_none());
        assert!(snapshot.get("India").is_none());
        assert_eq!(snapshot.with_data().count(), 1);
    }

    #[test]
    fn duplicate_max_date_rows_keep_first_occurrence() {
        let dataset = Dataset::from_records(vec![
            record("India", date(2021, 5, 1))
                .with_metric(Metric::TotalCases, 1000.0)
                .with_metric(Metric::NewCases, 1.0),
            record("India", date(2021, 5, 1))
                .with_metric(Metric::TotalCases, 2000.0)
                .with_metric(Metric::NewCases, 2.0),
        ]);
        let cohort = nonempty!["India".to_string()];
        let snapshot = LatestSnapshot::resolve(&dataset, &cohort);
        let latest = snapshot.get("India").unwrap();
        assert_eq!(
            latest.metric(Metric::NewCases),
            Some(1.0),
            "first occurrence in dataset order should win the tie"
        );
    }

    #[test]
    fn resolution_is_deterministic_across_runs() {
        let dataset = Dataset::from_records(vec![
            record("Kenya", date(2021, 2, 1)).with_metric(Metric::TotalCases, 5.0),
            record("Brazil", date(2021, 1, 1)).with_metric(Metric::TotalCases, 7.0),
            record("Kenya", date(2021, 1, 1)).with_metric(Metric::TotalCases, 3.0),
        ]);
        let cohort = nonempty!["Kenya".to_string(), "Brazil".to_string()];
        let collect = |snapshot: &LatestSnapshot| -> Vec<(String, Option<Record>)> {
            snapshot
                .iter()
                .map(|(location, record)| (location.to_string(), record.cloned()))
                .collect()
        };
        let first = collect(&LatestSnapshot::resolve(&dataset, &cohort));
        let second = collect(&LatestSnapshot::resolve(&dataset, &cohort));
        assert_eq!(first, second);
    }
}
