//! The in-memory relation: one [`Record`] per (location, date) observation.
//!
//! Metric cells are optional numerics. Absent means unknown, not zero; the
//! zero default exists only at presentation boundaries and is never fed back
//! into resolution or ranking logic.

use std::collections::HashSet;
use std::io;
use std::path::Path;

use chrono::NaiveDate;
use csv::StringRecord;
use itertools::{Itertools, MinMaxResult};
use log::{debug, warn};
use serde::{Deserialize, Serialize};
use strum_macros::{Display, EnumString};

use crate::error::TrackerError;
use crate::COL;

/// The numeric metrics carried by every record.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString,
)]
#[strum(serialize_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum Metric {
    TotalCases,
    NewCases,
    TotalDeaths,
    NewDeaths,
    TotalVaccinations,
    PeopleVaccinated,
    PeopleFullyVaccinated,
    PeopleFullyVaccinatedPerHundred,
}

impl Metric {
    pub const ALL: [Metric; 8] = [
        Metric::TotalCases,
        Metric::NewCases,
        Metric::TotalDeaths,
        Metric::NewDeaths,
        Metric::TotalVaccinations,
        Metric::PeopleVaccinated,
        Metric::PeopleFullyVaccinated,
        Metric::PeopleFullyVaccinatedPerHundred,
    ];

    /// Header name of the column backing this metric.
    pub fn column(&self) -> &'static str {
        match self {
            Metric::TotalCases => COL::TOTAL_CASES,
            Metric::NewCases => COL::NEW_CASES,
            Metric::TotalDeaths => COL::TOTAL_DEATHS,
            Metric::NewDeaths => COL::NEW_DEATHS,
            Metric::TotalVaccinations => COL::TOTAL_VACCINATIONS,
            Metric::PeopleVaccinated => COL::PEOPLE_VACCINATED,
            Metric::PeopleFullyVaccinated => COL::PEOPLE_FULLY_VACCINATED,
            Metric::PeopleFullyVaccinatedPerHundred => COL::PEOPLE_FULLY_VACCINATED_PER_HUNDRED,
        }
    }

    fn index(&self) -> usize {
        *self as usize
    }
}

/// One (location, date) observation.
#[derive(Clone, Debug, PartialEq)]
pub struct Record {
    pub location: String,
    pub date: NaiveDate,
    pub continent: Option<String>,
    metrics: [Option<f64>; Metric::ALL.len()],
}

impl Record {
    pub fn new(location: impl Into<String>, date: NaiveDate, continent: Option<String>) -> Self {
        Self {
            location: location.into(),
            date,
            continent,
            metrics: [None; Metric::ALL.len()],
        }
    }

    /// Builder-style setter, mostly useful when assembling records by hand.
    pub fn with_metric(mut self, metric: Metric, value: f64) -> Self {
        self.set_metric(metric, Some(value));
        self
    }

    pub fn set_metric(&mut self, metric: Metric, value: Option<f64>) {
        self.metrics[metric.index()] = value;
    }

    pub fn metric(&self, metric: Metric) -> Option<f64> {
        self.metrics[metric.index()]
    }

    /// Integer view of a count metric, truncated toward zero. Counts are
    /// serialized as floats upstream ("123.0"); every consumer printing the
    /// same figure goes through this one truncation.
    pub fn count(&self, metric: Metric) -> Option<i64> {
        self.metric(metric).map(|value| value as i64)
    }
}

/// Coerce a raw cell to an optional numeric value. Empty and whitespace-only
/// cells are absent; a malformed cell is treated as absent for that cell alone
/// rather than aborting the run.
pub fn coerce_cell(raw: &str, column: &str, row: usize) -> Option<f64> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return None;
    }
    match trimmed.parse::<f64>() {
        Ok(value) => Some(value),
        Err(_) => {
            warn!("row {row}: unparseable {column} cell '{trimmed}', treating as absent");
            None
        }
    }
}

/// The full relation, in input order. Loaded once and read-only thereafter;
/// the order is preserved because downstream tie-breaks depend on it.
#[derive(Clone, Debug, PartialEq)]
pub struct Dataset {
    records: Vec<Record>,
}

/// Headline facts about a loaded dataset, shown before any statistics.
#[derive(Clone, Debug, PartialEq)]
pub struct DatasetProfile {
    pub rows: usize,
    pub locations: usize,
    pub continents: Vec<String>,
    pub date_range: Option<(NaiveDate, NaiveDate)>,
}

/// Positions of the required columns within the input header.
struct ColumnIndex {
    location: usize,
    date: usize,
    continent: usize,
    metrics: [usize; Metric::ALL.len()],
}

impl ColumnIndex {
    fn from_headers(headers: &StringRecord) -> Result<Self, TrackerError> {
        let mut metrics = [0usize; Metric::ALL.len()];
        let location = column_position(headers, COL::LOCATION)?;
        let date = column_position(headers, COL::DATE)?;
        let continent = column_position(headers, COL::CONTINENT)?;
        for metric in Metric::ALL {
            metrics[metric.index()] = column_position(headers, metric.column())?;
        }
        Ok(Self {
            location,
            date,
            continent,
            metrics,
        })
    }
}

fn column_position(headers: &StringRecord, name: &'static str) -> Result<usize, TrackerError> {
    headers
        .iter()
        .position(|header| header == name)
        .ok_or_else(|| TrackerError::MissingColumn(name.to_string()))
}

fn parse_record(
    row: &StringRecord,
    columns: &ColumnIndex,
    row_number: usize,
) -> Result<Record, TrackerError> {
    let location = row.get(columns.location).unwrap_or_default().to_string();
    let raw_date = row.get(columns.date).unwrap_or_default().trim();
    let date = NaiveDate::parse_from_str(raw_date, "%Y-%m-%d").map_err(|source| {
        TrackerError::InvalidDate {
            row: row_number,
            value: raw_date.to_string(),
            source,
        }
    })?;
    let continent = row
        .get(columns.continent)
        .map(str::trim)
        .filter(|value| !value.is_empty())
        .map(str::to_string);
    let mut record = Record::new(location, date, continent);
    for metric in Metric::ALL {
        let value = row
            .get(columns.metrics[metric.index()])
            .and_then(|cell| coerce_cell(cell, metric.column(), row_number));
        record.set_metric(metric, value);
    }
    Ok(record)
}

impl Dataset {
    pub fn from_records(records: Vec<Record>) -> Self {
        Self { records }
    }

    /// Load the relation from a CSV file on disk. A missing file is reported
    /// separately from a malformed one so the caller can tell the user to run
    /// the acquisition step.
    pub fn from_csv_path<P: AsRef<Path>>(path: P) -> Result<Self, TrackerError> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(TrackerError::DatasetNotFound(path.display().to_string()));
        }
        let mut reader = csv::Reader::from_path(path)?;
        Self::from_csv_reader(&mut reader)
    }

    pub fn from_csv_reader<R: io::Read>(reader: &mut csv::Reader<R>) -> Result<Self, TrackerError> {
        let headers = reader.headers()?.clone();
        let columns = ColumnIndex::from_headers(&headers)?;
        let mut records = Vec::new();
        for (idx, row) in reader.records().enumerate() {
            let row = row?;
            records.push(parse_record(&row, &columns, idx + 1)?);
        }
        debug!("loaded {} records", records.len());
        Ok(Self { records })
    }

    pub fn records(&self) -> &[Record] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn profile(&self) -> DatasetProfile {
        let locations: HashSet<&str> = self
            .records
            .iter()
            .map(|record| record.location.as_str())
            .collect();
        let continents: Vec<String> = self
            .records
            .iter()
            .filter_map(|record| record.continent.as_deref())
            .unique()
            .sorted()
            .map(str::to_string)
            .collect();
        let date_range = match self.records.iter().map(|record| record.date).minmax() {
            MinMaxResult::NoElements => None,
            MinMaxResult::OneElement(date) => Some((date, date)),
            MinMaxResult::MinMax(min, max) => Some((min, max)),
        };
        DatasetProfile {
            rows: self.records.len(),
            locations: locations.len(),
            continents,
            date_range,
        }
    }
}
