use std::fs::File;
use std::io;
use std::path::{Path, PathBuf};

use clap::{Args, Parser, Subcommand};
use covidtracker::config::Config;
use covidtracker::dataset::Metric;
use covidtracker::series::Series;
use covidtracker::CovidTracker;
use enum_dispatch::enum_dispatch;
use log::{debug, info};
use nonempty::NonEmpty;
use strum_macros::EnumString;

use crate::display::{display_profile, display_snapshot, display_superlatives};
use crate::error::CliResult;
use crate::export::{write_series_csv, write_series_json};
use crate::plot::render_charts;

/// Trait that defines what to run when a given subcommand is invoked.
#[enum_dispatch]
pub trait RunCommand {
    fn run(&self, config: Config) -> CliResult<()>;
}

/// Arguments that override the configured dataset location and cohort.
#[derive(Args, Clone, Debug)]
pub struct DatasetArgs {
    #[arg(
        short,
        long,
        value_name = "FILE",
        help = "Path to the OWID CSV export; overrides the configured path"
    )]
    data: Option<PathBuf>,
    #[arg(
        short,
        long = "country",
        value_name = "NAME",
        help = "\
            Country to analyse; repeat the flag to replace the whole configured\n\
            cohort. Order determines display order."
    )]
    country: Vec<String>,
}

impl DatasetArgs {
    fn apply(&self, mut config: Config) -> Config {
        if let Some(data) = &self.data {
            config.data_path = data.display().to_string();
        }
        if let Some(cohort) = NonEmpty::from_vec(self.country.clone()) {
            config.cohort = cohort;
        }
        config
    }
}

/// The `summary` command prints the exploration header, the latest statistics
/// table and the superlative facts.
#[derive(Args, Debug)]
pub struct SummaryCommand {
    #[command(flatten)]
    dataset_args: DatasetArgs,
}

impl RunCommand for SummaryCommand {
    fn run(&self, config: Config) -> CliResult<()> {
        info!("Running `summary` subcommand");
        let tracker = CovidTracker::new_with_config(self.dataset_args.apply(config))?;
        display_profile(&tracker.dataset.profile(), tracker.cohort());
        let snapshot = tracker.latest_snapshot();
        display_snapshot(&snapshot);
        display_superlatives(&tracker.superlatives(&snapshot));
        Ok(())
    }
}

/// The `plot` command renders the comparison charts as PNG files.
#[derive(Args, Debug)]
pub struct PlotCommand {
    #[command(flatten)]
    dataset_args: DatasetArgs,
    #[arg(
        short,
        long,
        default_value = "output",
        help = "Directory to place the rendered charts"
    )]
    output_dir: PathBuf,
}

impl RunCommand for PlotCommand {
    fn run(&self, config: Config) -> CliResult<()> {
        info!("Running `plot` subcommand");
        let tracker = CovidTracker::new_with_config(self.dataset_args.apply(config))?;
        std::fs::create_dir_all(&self.output_dir)?;
        let written = render_charts(&tracker, &self.output_dir)?;
        for path in &written {
            println!("- Saved plot: {}", path.display());
        }
        Ok(())
    }
}

/// Defines the output formats the `series` command is able to produce.
#[derive(Clone, Debug, EnumString, PartialEq, Eq)]
#[strum(ascii_case_insensitive)]
pub enum SeriesFormat {
    Csv,
    Json,
}

/// The `series` command writes one time series per cohort member for a given
/// metric, for external plotting or reporting.
#[derive(Args, Debug)]
pub struct SeriesCommand {
    #[command(flatten)]
    dataset_args: DatasetArgs,
    #[arg(
        short,
        long,
        value_name = "METRIC",
        help = "Metric to extract, by its column name (e.g. total_cases)"
    )]
    metric: Metric,
    #[arg(
        short = 'f',
        long,
        value_name = "csv|json",
        default_value = "csv",
        help = "Output format for the series"
    )]
    format: SeriesFormat,
    #[arg(short = 'o', long, help = "Output file to place the results")]
    output_file: Option<PathBuf>,
}

impl RunCommand for SeriesCommand {
    fn run(&self, config: Config) -> CliResult<()> {
        info!("Running `series` subcommand");
        let tracker = CovidTracker::new_with_config(self.dataset_args.apply(config))?;
        let series = tracker.series(self.metric);
        debug!("extracted {} series", series.len());
        write_output(
            &self.format,
            self.metric,
            &series,
            self.output_file.as_deref(),
        )
    }
}

fn write_output(
    format: &SeriesFormat,
    metric: Metric,
    series: &[Series],
    output_file: Option<&Path>,
) -> CliResult<()> {
    if let Some(output_file) = output_file {
        let f = File::create(output_file)?;
        write_formatted(format, metric, series, f)
    } else {
        let stdout_lock = io::stdout().lock();
        write_formatted(format, metric, series, stdout_lock)
    }
}

fn write_formatted<W: io::Write>(
    format: &SeriesFormat,
    metric: Metric,
    series: &[Series],
    writer: W,
) -> CliResult<()> {
    match format {
        SeriesFormat::Csv => write_series_csv(writer, series),
        SeriesFormat::Json => write_series_json(writer, metric, series),
    }
}

/// The entrypoint for the CLI.
#[derive(Parser, Debug)]
#[command(
    version,
    about = "covidtracker summarises COVID-19 case, death and vaccination data for a fixed cohort of countries",
    long_about = None,
    name = "covidtracker"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Commands contains the list of subcommands available for use in the CLI.
/// Each command implements the RunCommand trait and specifies the list of
/// required args for that command.
#[derive(Subcommand, Debug)]
#[enum_dispatch(RunCommand)]
pub enum Commands {
    /// Print the latest statistics table and superlative facts
    Summary(SummaryCommand),
    /// Render the comparison charts as PNG files
    Plot(PlotCommand),
    /// Output per-country time series for a metric
    Series(SeriesCommand),
}
