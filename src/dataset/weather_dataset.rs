//! Contains the `WeatherDataset` structure: the typed, time-indexed result of parsing a
//! provider CSV export.

use crate::dataset::error::DatasetError;
use crate::types::attribute::Attribute;
use chrono::{DateTime, Duration, NaiveDateTime, Utc};
use log::warn;
use polars::prelude::*;
use std::io::Write;

/// Name of the time index column in exported frames.
pub const COL_DATETIME: &str = "datetime";

/// Timestamp format used when writing CSV.
pub const CSV_DATETIME_FORMAT: &str = "%Y-%m-%dT%H:%M:%SZ";

/// An ordered, time-indexed table of floating-point weather columns.
///
/// Guarantees, upheld by every constructor:
/// * the time index is strictly increasing (so there are no duplicate timestamps),
/// * every column has exactly one value per timestamp,
/// * column names are unique and fixed for the dataset's lifetime.
///
/// Column names are the lower-cased header labels written by the provider, e.g.
/// `ghi`, `wind speed`, `temperature`. Use [`WeatherDataset::attribute`] to look a column up by
/// [`Attribute`] instead of by label.
#[derive(Debug, Clone, PartialEq)]
pub struct WeatherDataset {
    index: Vec<DateTime<Utc>>,
    columns: Vec<String>,
    // Column-major: data[c][r] is column c at row r.
    data: Vec<Vec<f64>>,
}

/// A borrowed view of one row of a [`WeatherDataset`].
#[derive(Debug, Clone, Copy)]
pub struct WeatherRecord<'a> {
    dataset: &'a WeatherDataset,
    row: usize,
}

impl<'a> WeatherRecord<'a> {
    pub fn timestamp(&self) -> DateTime<Utc> {
        self.dataset.index[self.row]
    }

    /// Value of the named column in this row.
    pub fn get(&self, column: &str) -> Option<f64> {
        self.dataset.column(column).map(|values| values[self.row])
    }

    pub fn attribute(&self, attribute: Attribute) -> Option<f64> {
        self.get(attribute.header_label())
    }

    /// `(column name, value)` pairs in column order.
    pub fn values(&self) -> impl Iterator<Item = (&'a str, f64)> + 'a {
        let row = self.row;
        let dataset = self.dataset;
        dataset
            .columns
            .iter()
            .zip(&dataset.data)
            .map(move |(name, values)| (name.as_str(), values[row]))
    }
}

impl WeatherDataset {
    /// Builds a dataset from a time index and matching columns, checking every invariant.
    ///
    /// # Errors
    ///
    /// * [`DatasetError::ShapeMismatch`] when a column's length differs from the index length.
    /// * [`DatasetError::NonIncreasingIndex`] when a timestamp does not follow its predecessor.
    /// * [`DatasetError::DuplicateColumn`] when two columns share a name.
    pub fn new(
        index: Vec<DateTime<Utc>>,
        columns: Vec<(String, Vec<f64>)>,
    ) -> Result<Self, DatasetError> {
        if let Some(position) = index.windows(2).position(|pair| pair[1] <= pair[0]) {
            return Err(DatasetError::NonIncreasingIndex {
                position: position + 1,
            });
        }
        let mut names: Vec<String> = Vec::with_capacity(columns.len());
        let mut data = Vec::with_capacity(columns.len());
        for (name, values) in columns {
            if values.len() != index.len() {
                return Err(DatasetError::ShapeMismatch {
                    column: name,
                    expected: index.len(),
                    found: values.len(),
                });
            }
            if names.contains(&name) {
                return Err(DatasetError::DuplicateColumn(name));
            }
            names.push(name);
            data.push(values);
        }
        Ok(Self::from_parts(index, names, data))
    }

    /// Assembles a dataset whose invariants the caller has already established.
    pub(crate) fn from_parts(
        index: Vec<DateTime<Utc>>,
        columns: Vec<String>,
        data: Vec<Vec<f64>>,
    ) -> Self {
        debug_assert_eq!(columns.len(), data.len());
        debug_assert!(data.iter().all(|c| c.len() == index.len()));
        Self {
            index,
            columns,
            data,
        }
    }

    /// Number of records.
    pub fn len(&self) -> usize {
        self.index.len()
    }

    pub fn is_empty(&self) -> bool {
        self.index.is_empty()
    }

    pub fn column_names(&self) -> &[String] {
        &self.columns
    }

    /// The full UTC time index, in row order.
    pub fn time_index(&self) -> &[DateTime<Utc>] {
        &self.index
    }

    pub fn first_timestamp(&self) -> Option<DateTime<Utc>> {
        self.index.first().copied()
    }

    pub fn last_timestamp(&self) -> Option<DateTime<Utc>> {
        self.index.last().copied()
    }

    /// Spacing between the first two records.
    pub fn interval(&self) -> Option<Duration> {
        match self.index.as_slice() {
            [first, second, ..] => Some(*second - *first),
            _ => None,
        }
    }

    pub fn column(&self, name: &str) -> Option<&[f64]> {
        self.columns
            .iter()
            .position(|c| c == name)
            .map(|i| self.data[i].as_slice())
    }

    pub fn attribute(&self, attribute: Attribute) -> Option<&[f64]> {
        self.column(attribute.header_label())
    }

    pub fn require_column(&self, name: &str) -> Result<&[f64], DatasetError> {
        self.column(name)
            .ok_or_else(|| DatasetError::ColumnNotFound(name.to_string()))
    }

    pub fn record(&self, row: usize) -> Option<WeatherRecord<'_>> {
        (row < self.len()).then_some(WeatherRecord { dataset: self, row })
    }

    pub fn records(&self) -> impl Iterator<Item = WeatherRecord<'_>> + '_ {
        (0..self.len()).map(move |row| WeatherRecord { dataset: self, row })
    }

    /// The record at exactly `timestamp`, found by binary search on the time index.
    pub fn get(&self, timestamp: DateTime<Utc>) -> Option<WeatherRecord<'_>> {
        self.index
            .binary_search(&timestamp)
            .ok()
            .map(|row| WeatherRecord { dataset: self, row })
    }

    /// Requested attributes that have no column in this dataset.
    pub fn missing_attributes(&self, requested: &[Attribute]) -> Vec<Attribute> {
        let mut missing: Vec<Attribute> = Vec::new();
        for attribute in requested {
            if self.attribute(*attribute).is_none() && !missing.contains(attribute) {
                missing.push(*attribute);
            }
        }
        missing
    }

    /// Fails with [`DatasetError::MissingAttributes`] when the provider silently omitted
    /// any of the `requested` attributes.
    pub fn ensure_attributes(&self, requested: &[Attribute]) -> Result<(), DatasetError> {
        let missing = self.missing_attributes(requested);
        if missing.is_empty() {
            return Ok(());
        }
        warn!(
            "Dataset columns {:?} lack requested attributes {}",
            self.columns,
            Attribute::join_query_names(&missing)
        );
        Err(DatasetError::MissingAttributes { missing })
    }

    /// Exports to a Polars `DataFrame`: a timezone-naive UTC `datetime` column followed by
    /// one `f64` column per dataset column.
    pub fn to_dataframe(&self) -> Result<DataFrame, DatasetError> {
        let datetimes: Vec<NaiveDateTime> = self.index.iter().map(|t| t.naive_utc()).collect();
        let mut columns: Vec<Column> = Vec::with_capacity(self.columns.len() + 1);
        columns.push(Column::from(Series::new(COL_DATETIME.into(), datetimes)));
        for (name, values) in self.columns.iter().zip(&self.data) {
            columns.push(Column::from(Series::new(name.as_str().into(), values.as_slice())));
        }
        Ok(DataFrame::new(columns)?)
    }

    /// Writes the dataset as CSV with a header row and ISO-8601 UTC timestamps.
    pub fn write_csv<W: Write>(&self, writer: W) -> Result<(), DatasetError> {
        let mut df = self.to_dataframe()?;
        CsvWriter::new(writer)
            .include_header(true)
            .with_datetime_format(Some(CSV_DATETIME_FORMAT.to_string()))
            .finish(&mut df)?;
        Ok(())
    }
}
