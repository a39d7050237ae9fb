//! Time-series extraction for the plotting and export collaborators.

use std::collections::HashMap;

use chrono::NaiveDate;
use nonempty::NonEmpty;

use crate::dataset::{Dataset, Metric};

/// A single observation in a series. `value` is `None` where the source cell
/// was absent, so the renderer decides how to treat the gap (skip the point,
/// interpolate, or draw zero); nothing is coerced here.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SeriesPoint {
    pub date: NaiveDate,
    pub value: Option<f64>,
}

/// All observations of one metric for one cohort member, in ascending date
/// order.
#[derive(Clone, Debug, PartialEq)]
pub struct Series {
    pub location: String,
    pub metric: Metric,
    pub points: Vec<SeriesPoint>,
}

impl Series {
    /// Points that carry a value, for renderers that skip gaps.
    pub fn present(&self) -> impl Iterator<Item = (NaiveDate, f64)> + '_ {
        self.points
            .iter()
            .filter_map(|point| point.value.map(|value| (point.date, value)))
    }
}

/// Extract one series per cohort member with a single grouping pass. Every
/// record of a member contributes a point, usable or not, so no rows are
/// silently dropped; the stable sort keeps dataset order between equal dates.
pub fn extract_series(dataset: &Dataset, cohort: &NonEmpty<String>, metric: Metric) -> Vec<Series> {
    let mut grouped: HashMap<&str, Vec<SeriesPoint>> = cohort
        .iter()
        .map(|member| (member.as_str(), Vec::new()))
        .collect();
    for record in dataset.records() {
        if let Some(points) = grouped.get_mut(record.location.as_str()) {
            points.push(SeriesPoint {
                date: record.date,
                value: record.metric(metric),
            });
        }
    }
    cohort
        .iter()
        .map(|member| {
            let mut points = grouped.remove(member.as_str()).unwrap_or_default();
            points.sort_by_key(|point| point.date);
            Series {
                location: member.clone(),
                metric,
                points,
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use nonempty::nonempty;

    use super::*;
    use crate::dataset::Record;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn dataset() -> Dataset {
        Dataset::from_records(vec![
            Record::new("Kenya", date(2021, 1, 5), None).with_metric(Metric::TotalCases, 150.0),
            Record::new("Brazil", date(2021, 1, 1), None).with_metric(Metric::TotalCases, 500.0),
            Record::new("Kenya", date(2021, 1, 1), None).with_metric(Metric::TotalCases, 100.0),
            // A gap: the cell is absent but the row must still appear.
            Record::new("Kenya", date(2021, 1, 3), None),
            Record::new("France", date(2021, 1, 1), None).with_metric(Metric::TotalCases, 9.0),
        ])
    }

    #[test]
    fn series_preserve_row_count_and_ascending_order() {
        let cohort = nonempty!["Kenya".to_string(), "Brazil".to_string()];
        let series = extract_series(&dataset(), &cohort, Metric::TotalCases);
        assert_eq!(series.len(), 2, "one series per cohort member");

        let kenya = &series[0];
        assert_eq!(kenya.location, "Kenya");
        assert_eq!(kenya.points.len(), 3, "no rows may be dropped");
        let dates: Vec<NaiveDate> = kenya.points.iter().map(|point| point.date).collect();
        assert_eq!(
            dates,
            vec![date(2021, 1, 1), date(2021, 1, 3), date(2021, 1, 5)]
        );
    }

    #[test]
    fn absent_values_pass_through_as_missing() {
        let cohort = nonempty!["Kenya".to_string()];
        let series = extract_series(&dataset(), &cohort, Metric::TotalCases);
        let values: Vec<Option<f64>> = series[0].points.iter().map(|point| point.value).collect();
        assert_eq!(values, vec![Some(100.0), None, Some(150.0)]);
        let present: Vec<(NaiveDate, f64)> = series[0].present().collect();
        assert_eq!(
            present,
            vec![(date(2021, 1, 1), 100.0), (date(2021, 1, 5), 150.0)]
        );
    }

    #[test]
    fn non_cohort_locations_are_excluded() {
        let cohort = nonempty!["Kenya".to_string(), "Brazil".to_string()];
        let series = extract_series(&dataset(), &cohort, Metric::TotalCases);
        assert!(series.iter().all(|s| s.location != "France"));
    }

    #[test]
    fn member_without_rows_gets_an_empty_series() {
        let cohort = nonempty!["India".to_string()];
        let series = extract_series(&dataset(), &cohort, Metric::TotalCases);
        assert_eq!(series.len(), 1);
        assert!(series[0].points.is_empty());
    }

    #[test]
    fn equal_dates_keep_dataset_order() {
        let data = Dataset::from_records(vec![
            Record::new("Kenya", date(2021, 1, 1), None).with_metric(Metric::NewCases, 1.0),
            Record::new("Kenya", date(2021, 1, 1), None).with_metric(Metric::NewCases, 2.0),
        ]);
        let cohort = nonempty!["Kenya".to_string()];
        let series = extract_series(&data, &cohort, Metric::NewCases);
        let values: Vec<Option<f64>> = series[0].points.iter().map(|point| point.value).collect();
        assert_eq!(values, vec![Some(1.0), Some(2.0)]);
    }
}
