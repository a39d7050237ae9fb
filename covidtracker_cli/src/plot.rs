//! Chart rendering: one line chart per tracked metric and a bar chart of the
//! latest death rates.
//!
//! Gaps in a series are skipped rather than drawn as zero; the zero default
//! is a table/export concern only.

use std::path::{Path, PathBuf};

use covidtracker::dataset::Metric;
use covidtracker::series::Series;
use covidtracker::stats::death_rate;
use covidtracker::CovidTracker;
use itertools::Itertools;
use log::warn;
use plotters::prelude::*;

use crate::error::{CliError, CliResult};

const CHART_SIZE: (u32, u32) = (1280, 720);
const BAR_CHART_SIZE: (u32, u32) = (1000, 500);

/// The metrics rendered as per-country line charts, with chart title, y-axis
/// label and output file name.
const LINE_CHARTS: [(Metric, &str, &str, &str); 3] = [
    (
        Metric::TotalCases,
        "Total COVID-19 Cases Over Time",
        "Total Cases",
        "total_cases.png",
    ),
    (
        Metric::TotalDeaths,
        "Total COVID-19 Deaths Over Time",
        "Total Deaths",
        "total_deaths.png",
    ),
    (
        Metric::PeopleFullyVaccinatedPerHundred,
        "Percentage of Population Fully Vaccinated Over Time",
        "Percentage Fully Vaccinated",
        "vaccination_progress.png",
    ),
];

/// Render every chart into `output_dir` and return the written paths.
pub fn render_charts(tracker: &CovidTracker, output_dir: &Path) -> CliResult<Vec<PathBuf>> {
    let mut written = Vec::new();
    for (metric, title, y_label, file_name) in LINE_CHARTS {
        let path = output_dir.join(file_name);
        let series = tracker.series(metric);
        if draw_line_chart(&path, title, y_label, &series)? {
            written.push(path);
        }
    }
    let path = output_dir.join("death_rates.png");
    let rates = latest_death_rates(tracker);
    if draw_rate_chart(&path, &rates)? {
        written.push(path);
    }
    Ok(written)
}

/// Latest death rate per cohort member with data, highest rate first.
fn latest_death_rates(tracker: &CovidTracker) -> Vec<(String, f64)> {
    let snapshot = tracker.latest_snapshot();
    snapshot
        .with_data()
        .map(|(location, record)| (location.to_string(), death_rate(record)))
        .sorted_by(|a, b| b.1.total_cmp(&a.1))
        .collect()
}

/// Draw one line per cohort member. Returns false when there is nothing to
/// draw for any member.
fn draw_line_chart(
    path: &Path,
    title: &str,
    y_label: &str,
    series: &[Series],
) -> CliResult<bool> {
    let date_range = series
        .iter()
        .flat_map(|entry| entry.present())
        .map(|(date, _)| date)
        .minmax()
        .into_option();
    let Some((min_date, max_date)) = date_range else {
        warn!("no data points for '{title}', skipping chart");
        return Ok(false);
    };
    // A single-date range would collapse the x axis.
    let max_date = if min_date == max_date {
        max_date.succ_opt().unwrap_or(max_date)
    } else {
        max_date
    };
    let mut y_max = series
        .iter()
        .flat_map(|entry| entry.present())
        .map(|(_, value)| value)
        .fold(1.0f64, f64::max);
    if !y_max.is_finite() {
        y_max = 1.0;
    }

    let root = BitMapBackend::new(path, CHART_SIZE).into_drawing_area();
    root.fill(&WHITE).map_err(draw_error)?;
    let mut chart = ChartBuilder::on(&root)
        .caption(title, ("sans-serif", 28))
        .margin(25)
        .set_label_area_size(LabelAreaPosition::Left, 90)
        .set_label_area_size(LabelAreaPosition::Bottom, 50)
        .build_cartesian_2d(min_date..max_date, 0.0..y_max * 1.05)
        .map_err(draw_error)?;
    chart
        .configure_mesh()
        .x_desc("Date")
        .y_desc(y_label)
        .draw()
        .map_err(draw_error)?;

    for (idx, entry) in series.iter().enumerate() {
        let style = Palette99::pick(idx).mix(0.9).stroke_width(2);
        chart
            .draw_series(LineSeries::new(entry.present(), style))
            .map_err(draw_error)?
            .label(entry.location.clone())
            .legend(move |(x, y)| PathElement::new(vec![(x, y), (x + 30, y)], style));
    }
    chart
        .configure_series_labels()
        .background_style(&WHITE.mix(0.7))
        .border_style(&BLACK.mix(0.3))
        .position(SeriesLabelPosition::UpperLeft)
        .draw()
        .map_err(draw_error)?;
    root.present().map_err(draw_error)?;
    Ok(true)
}

/// Draw the latest death rates as one bar per country. Returns false when no
/// cohort member has data.
fn draw_rate_chart(path: &Path, rates: &[(String, f64)]) -> CliResult<bool> {
    if rates.is_empty() {
        warn!("no cohort member has data, skipping death-rate chart");
        return Ok(false);
    }
    let mut y_max = rates.iter().map(|(_, rate)| *rate).fold(0.0f64, f64::max);
    if y_max <= 0.0 {
        y_max = 0.01;
    }

    let root = BitMapBackend::new(path, BAR_CHART_SIZE).into_drawing_area();
    root.fill(&WHITE).map_err(draw_error)?;
    let mut chart = ChartBuilder::on(&root)
        .caption(
            "COVID-19 Death Rate by Country (Latest Data)",
            ("sans-serif", 24),
        )
        .margin(25)
        .set_label_area_size(LabelAreaPosition::Left, 80)
        .set_label_area_size(LabelAreaPosition::Bottom, 60)
        .build_cartesian_2d((0..rates.len()).into_segmented(), 0.0..y_max * 1.1)
        .map_err(draw_error)?;
    chart
        .configure_mesh()
        .disable_x_mesh()
        .x_desc("Country")
        .y_desc("Death Rate (Deaths/Cases)")
        .x_labels(rates.len())
        .x_label_formatter(&|value| match value {
            SegmentValue::Exact(idx) | SegmentValue::CenterOf(idx) => rates
                .get(*idx)
                .map(|(location, _)| location.clone())
                .unwrap_or_default(),
            SegmentValue::Last => String::new(),
        })
        .y_label_formatter(&|value| format!("{value:.4}"))
        .draw()
        .map_err(draw_error)?;
    chart
        .draw_series(rates.iter().enumerate().map(|(idx, (_, rate))| {
            Rectangle::new(
                [
                    (SegmentValue::Exact(idx), 0.0),
                    (SegmentValue::Exact(idx + 1), *rate),
                ],
                Palette99::pick(idx).mix(0.8).filled(),
            )
        }))
        .map_err(draw_error)?;
    root.present().map_err(draw_error)?;
    Ok(true)
}

fn draw_error<E: std::fmt::Display>(error: E) -> CliError {
    CliError::Drawing(error.to_string())
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;
    use covidtracker::config::Config;
    use covidtracker::dataset::{Dataset, Record};
    use nonempty::nonempty;

    use super::*;

    #[test]
    fn latest_death_rates_sort_highest_first_and_skip_no_data_members() {
        let date = NaiveDate::from_ymd_opt(2021, 6, 1).unwrap();
        let dataset = Dataset::from_records(vec![
            Record::new("Kenya", date, None)
                .with_metric(Metric::TotalCases, 100.0)
                .with_metric(Metric::TotalDeaths, 1.0),
            Record::new("Brazil", date, None)
                .with_metric(Metric::TotalCases, 100.0)
                .with_metric(Metric::TotalDeaths, 5.0),
        ]);
        let config = Config {
            cohort: nonempty!["Kenya".to_string(), "Brazil".to_string(), "China".to_string()],
            ..Config::default()
        };
        let tracker = CovidTracker::with_dataset(dataset, config);
        let rates = latest_death_rates(&tracker);
        assert_eq!(rates.len(), 2, "members without data have no bar");
        assert_eq!(rates[0].0, "Brazil");
        assert_eq!(rates[1].0, "Kenya");
    }
}
