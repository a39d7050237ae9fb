//! Error types.

#[derive(thiserror::Error, Debug)]
pub enum TrackerError {
    #[error("Wrapped anyhow error: {0}")]
    AnyhowError(#[from] anyhow::Error),
    #[error("Dataset not found at '{0}'. Run the data acquisition step first to download the OWID export.")]
    DatasetNotFound(String),
    #[error("Required column '{0}' is missing from the input header.")]
    MissingColumn(String),
    #[error("Invalid date '{value}' on data row {row}: {source}")]
    InvalidDate {
        row: usize,
        value: String,
        source: chrono::ParseError,
    },
    #[error("Wrapped CSV error: {0}")]
    CsvError(#[from] csv::Error),
    #[error("Wrapped IO error: {0}")]
    IoError(#[from] std::io::Error),
}

#[cfg(test)]
mod tests {
    use anyhow::anyhow;

    use super::*;

    #[test]
    fn test_anyhow() {
        let anyhow_error = anyhow!("An anyhow error");
        let tracker_error: TrackerError = anyhow_error.into();
        println!("{}", tracker_error);
    }

    #[test]
    fn missing_dataset_message_points_at_acquisition() {
        let message = TrackerError::DatasetNotFound("data/owid-covid-data.csv".into()).to_string();
        assert!(
            message.contains("Run the data acquisition step first"),
            "the user should be told how to obtain the dataset"
        );
    }
}
