use chrono::{DateTime, Utc};
use thiserror::Error;

/// Failures while turning a [`crate::RawTable`] into a [`crate::WeatherDataset`].
///
/// Line numbers are 1-based physical lines of the CSV text.
#[derive(Debug, Error)]
pub enum ParseError {
    #[error("Failed to split CSV fields on line {line_number}")]
    Csv {
        line_number: usize,
        #[source]
        source: csv::Error,
    },

    #[error("Missing header line: expected it on line {expected_line}")]
    MissingHeader { expected_line: usize },

    #[error("No data rows after the header on line {header_line}")]
    NoDataRows { header_line: usize },

    #[error("Malformed row on line {line_number} ({reason}): '{text}'")]
    MalformedRow {
        line_number: usize,
        reason: String,
        text: String,
    },

    #[error("Invalid timestamp on line {line_number} ({reason}): '{text}'")]
    InvalidTimestamp {
        line_number: usize,
        reason: String,
        text: String,
    },

    #[error("Invalid numeric value '{value}' in column '{column}' on line {line_number}")]
    InvalidNumericField {
        line_number: usize,
        column: String,
        value: String,
    },

    #[error("Timestamp {timestamp} on line {line_number} does not follow {previous}")]
    NonIncreasingTimestamp {
        line_number: usize,
        timestamp: DateTime<Utc>,
        previous: DateTime<Utc>,
    },

    #[error("Irregular spacing on line {line_number}: expected {expected_minutes} minutes after the previous row, found {found_minutes}")]
    IrregularInterval {
        line_number: usize,
        expected_minutes: i64,
        found_minutes: i64,
    },
}

impl ParseError {
    /// Line the error refers to, when there is one.
    pub fn line_number(&self) -> Option<usize> {
        match self {
            ParseError::MissingHeader { expected_line } => Some(*expected_line),
            ParseError::NoDataRows { header_line } => Some(*header_line),
            ParseError::Csv { line_number, .. }
            | ParseError::MalformedRow { line_number, .. }
            | ParseError::InvalidTimestamp { line_number, .. }
            | ParseError::InvalidNumericField { line_number, .. }
            | ParseError::NonIncreasingTimestamp { line_number, .. }
            | ParseError::IrregularInterval { line_number, .. } => Some(*line_number),
        }
    }
}
