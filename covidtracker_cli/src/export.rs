//! Series serialization for the external reporting boundary.
//!
//! Absent values stay visible as gaps (empty CSV cells, JSON nulls) so the
//! consumer decides how to treat them.

use std::io::Write;

use covidtracker::dataset::Metric;
use covidtracker::series::Series;
use serde::Serialize;

use crate::error::CliResult;

/// Write series as flat CSV rows of (location, date, value).
pub fn write_series_csv<W: Write>(writer: W, series: &[Series]) -> CliResult<()> {
    let mut csv_writer = csv::Writer::from_writer(writer);
    csv_writer.write_record(["location", "date", "value"])?;
    for entry in series {
        for point in &entry.points {
            let date = point.date.to_string();
            let value = point
                .value
                .map(|value| value.to_string())
                .unwrap_or_default();
            csv_writer.write_record([entry.location.as_str(), date.as_str(), value.as_str()])?;
        }
    }
    csv_writer.flush()?;
    Ok(())
}

#[derive(Serialize)]
struct SeriesDoc<'a> {
    metric: String,
    series: Vec<SeriesEntry<'a>>,
}

#[derive(Serialize)]
struct SeriesEntry<'a> {
    location: &'a str,
    points: Vec<PointEntry>,
}

#[derive(Serialize)]
struct PointEntry {
    date: String,
    value: Option<f64>,
}

/// Write series as one JSON document keyed by metric.
pub fn write_series_json<W: Write>(
    mut writer: W,
    metric: Metric,
    series: &[Series],
) -> CliResult<()> {
    let doc = SeriesDoc {
        metric: metric.to_string(),
        series: series
            .iter()
            .map(|entry| SeriesEntry {
                location: &entry.location,
                points: entry
                    .points
                    .iter()
                    .map(|point| PointEntry {
                        date: point.date.to_string(),
                        value: point.value,
                    })
                    .collect(),
            })
            .collect(),
    };
    serde_json::to_writer_pretty(&mut writer, &doc)?;
    writeln!(writer)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;
    use covidtracker::series::SeriesPoint;

    use super::*;

    fn sample_series() -> Vec<Series> {
        vec![Series {
            location: "Kenya".to_string(),
            metric: Metric::TotalCases,
            points: vec![
                SeriesPoint {
                    date: NaiveDate::from_ymd_opt(2021, 1, 1).unwrap(),
                    value: Some(100.0),
                },
                SeriesPoint {
                    date: NaiveDate::from_ymd_opt(2021, 1, 2).unwrap(),
                    value: None,
                },
            ],
        }]
    }

    #[test]
    fn csv_export_keeps_gaps_as_empty_cells() {
        let mut buffer = Vec::new();
        write_series_csv(&mut buffer, &sample_series()).unwrap();
        let text = String::from_utf8(buffer).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines[0], "location,date,value");
        assert_eq!(lines[1], "Kenya,2021-01-01,100");
        assert_eq!(lines[2], "Kenya,2021-01-02,");
    }

    #[test]
    fn json_export_keeps_gaps_as_null() {
        let mut buffer = Vec::new();
        write_series_json(&mut buffer, Metric::TotalCases, &sample_series()).unwrap();
        let text = String::from_utf8(buffer).unwrap();
        let doc: serde_json::Value = serde_json::from_str(&text).unwrap();
        assert_eq!(doc["metric"], "total_cases");
        assert_eq!(doc["series"][0]["location"], "Kenya");
        assert_eq!(doc["series"][0]["points"][1]["value"], serde_json::Value::Null);
    }
}
