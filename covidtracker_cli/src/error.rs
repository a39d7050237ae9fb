use covidtracker::error::TrackerError;

#[derive(thiserror::Error, Debug)]
pub enum CliError {
    #[error("Anyhow error")]
    Anyhow(#[from] anyhow::Error),
    #[error("covidtracker error")]
    Tracker(#[from] TrackerError),
    #[error("serde JSON error")]
    SerdeJson(#[from] serde_json::Error),
    #[error("CSV error")]
    Csv(#[from] csv::Error),
    #[error("std IO error")]
    Io(#[from] std::io::Error),
    #[error("drawing error: {0}")]
    Drawing(String),
}

pub type CliResult<T> = Result<T, CliError>;
