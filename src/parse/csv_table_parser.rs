//! Parser for the provider's multi-header CSV export.
//!
//! Layout of a PSM3 CSV body:
//!
//! ```text
//! Source,Location ID,City,State,Country,Latitude,Longitude,...   <- preamble (metadata names)
//! NSRDB,149190,-,-,-,35.02,-106.65,...                           <- preamble (metadata values)
//! Year,Month,Day,Hour,Minute,GHI,DHI,DNI,...                     <- header
//! 2020,1,1,0,0,0,0,0,...                                         <- data rows
//! ```
//!
//! The number of preamble lines is a parser setting ([`CsvTableParser::with_preamble_lines`]);
//! the header always follows the preamble directly.

use crate::dataset::weather_dataset::WeatherDataset;
use crate::parse::error::ParseError;
use crate::parse::raw_table::RawTable;
use chrono::{DateTime, Datelike, Duration, NaiveDate, Utc};
use csv::{ReaderBuilder, StringRecord};
use log::{debug, info, warn};

/// Metadata lines before the header in a PSM3 export.
pub const DEFAULT_PREAMBLE_LINES: usize = 2;

/// Name of the field synthesized from the leading date/time columns.
pub const TIMESTAMP_FIELD: &str = "timestamp";

const DATE_TIME_FIELDS: [&str; 5] = ["year", "month", "day", "hour", "minute"];

/// Parses a [`RawTable`] into a [`WeatherDataset`].
///
/// Per data row:
/// * the five leading fields (year, month, day, hour, minute) become one UTC timestamp;
/// * the remaining fields are parsed as `f64`. Blank fields are dropped positionally, so
///   a blank in the middle of a row shifts later values one column to the left. Rows whose
///   resulting value count differs from the first row's are rejected.
///
/// The first data row decides how many value columns the dataset has; header labels beyond
/// that count are ignored and missing labels are synthesized as `column_<n>`.
///
/// # Examples
///
/// ```
/// use nsrdb_pv::{CsvTableParser, RawTable};
///
/// let raw = RawTable::from_lines([
///     "Source,Location ID,Latitude,Longitude",
///     "NSRDB,149190,35.02,-106.65",
///     "Year,Month,Day,Hour,Minute,GHI,DHI,DNI",
///     "2020,1,1,0,0,0,0,0",
/// ]);
/// let dataset = CsvTableParser::new().parse(&raw)?;
///
/// assert_eq!(dataset.len(), 1);
/// assert_eq!(dataset.column_names(), ["ghi", "dhi", "dni"]);
/// assert_eq!(dataset.time_index()[0].to_rfc3339(), "2020-01-01T00:00:00+00:00");
/// # Ok::<(), nsrdb_pv::ParseError>(())
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CsvTableParser {
    preamble_lines: usize,
    expected_interval_minutes: Option<u32>,
}

impl Default for CsvTableParser {
    fn default() -> Self {
        Self {
            preamble_lines: DEFAULT_PREAMBLE_LINES,
            expected_interval_minutes: None,
        }
    }
}

struct ParsedRow {
    timestamp: DateTime<Utc>,
    values: Vec<f64>,
    dropped: usize,
}

impl CsvTableParser {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of lines to skip before the header line.
    pub fn with_preamble_lines(self, preamble_lines: usize) -> Self {
        Self {
            preamble_lines,
            ..self
        }
    }

    /// Require consecutive rows to be `minutes` apart. A single gap that skips
    /// 29 February is accepted, since requests are made with `leap_day=false`.
    pub fn with_expected_interval(self, minutes: u32) -> Self {
        Self {
            expected_interval_minutes: Some(minutes),
            ..self
        }
    }

    /// Field names derived from a header line: `timestamp` followed by the lower-cased,
    /// trimmed labels after the five date/time columns.
    ///
    /// ```
    /// use nsrdb_pv::CsvTableParser;
    ///
    /// assert_eq!(
    ///     CsvTableParser::header_names("Year,Month,Day,Hour,Minute, GHI ,Wind Speed"),
    ///     ["timestamp", "ghi", "wind speed"]
    /// );
    /// ```
    pub fn header_names(header_line: &str) -> Vec<String> {
        let labels = value_labels(&StringRecord::from(header_line.split(',').collect::<Vec<_>>()));
        std::iter::once(TIMESTAMP_FIELD.to_string())
            .chain(labels)
            .collect()
    }

    /// Parses `raw`. Pure: the same input always yields the same dataset.
    ///
    /// # Errors
    ///
    /// * [`ParseError::MissingHeader`] / [`ParseError::NoDataRows`] when the body ends early.
    /// * [`ParseError::MalformedRow`] for rows with no values after the date/time fields,
    ///   or whose value count differs from the first data row's.
    /// * [`ParseError::InvalidTimestamp`] when the date/time fields are not integers or do
    ///   not form a valid calendar date.
    /// * [`ParseError::InvalidNumericField`] when a value field is not a number.
    /// * [`ParseError::NonIncreasingTimestamp`] / [`ParseError::IrregularInterval`] when the
    ///   time index is out of order or unevenly spaced.
    pub fn parse(&self, raw: &RawTable) -> Result<WeatherDataset, ParseError> {
        // Lines are numbered from 1 and counted on the raw text, so the preamble is
        // skipped the same way whatever the line terminator.
        let mut lines = raw
            .lines()
            .enumerate()
            .map(|(i, text)| (i + 1, text))
            .skip(self.preamble_lines);

        let (header_line, header_text) = lines.next().ok_or(ParseError::MissingHeader {
            expected_line: self.preamble_lines + 1,
        })?;
        let header = split_fields(header_text, header_line)?;
        let labels = value_labels(&header);
        debug!("Header on line {}: {:?}", header_line, labels);

        let mut index: Vec<DateTime<Utc>> = Vec::new();
        let mut data: Vec<Vec<f64>> = Vec::new();
        let mut columns: Option<Vec<String>> = None;
        let mut dropped_blanks = 0usize;

        for (line, text) in lines {
            if text.trim().is_empty() {
                continue;
            }
            let record = split_fields(text, line)?;
            let row = parse_row(&record, line, &labels)?;

            match columns.as_ref().map(Vec::len) {
                None => {
                    let width = row.values.len();
                    if width != labels.len() {
                        warn!(
                            "Header on line {} lists {} value columns but the first data row on line {} has {}; using {}",
                            header_line,
                            labels.len(),
                            line,
                            width,
                            width
                        );
                    }
                    columns = Some(column_names(&labels, width));
                    data = vec![Vec::new(); width];
                }
                Some(width) if width != row.values.len() => {
                    return Err(ParseError::MalformedRow {
                        line_number: line,
                        reason: format!("expected {} values, found {}", width, row.values.len()),
                        text: record_text(&record),
                    });
                }
                Some(_) => {}
            }

            self.check_spacing(index.last().copied(), row.timestamp, line)?;
            dropped_blanks += row.dropped;
            index.push(row.timestamp);
            for (column, value) in data.iter_mut().zip(row.values) {
                column.push(value);
            }
        }

        let Some(columns) = columns else {
            return Err(ParseError::NoDataRows { header_line });
        };
        if dropped_blanks > 0 {
            debug!("Dropped {} blank fields while parsing", dropped_blanks);
        }
        info!(
            "Parsed {} rows x {} columns ({} .. {})",
            index.len(),
            columns.len(),
            index[0],
            index[index.len() - 1]
        );
        Ok(WeatherDataset::from_parts(index, columns, data))
    }

    fn check_spacing(
        &self,
        previous: Option<DateTime<Utc>>,
        timestamp: DateTime<Utc>,
        line: usize,
    ) -> Result<(), ParseError> {
        let Some(previous) = previous else {
            return Ok(());
        };
        if timestamp <= previous {
            return Err(ParseError::NonIncreasingTimestamp {
                line_number: line,
                timestamp,
                previous,
            });
        }
        if let Some(minutes) = self.expected_interval_minutes {
            let expected = Duration::minutes(i64::from(minutes));
            let gap = timestamp - previous;
            if gap != expected && !skips_leap_day(previous, gap, expected) {
                return Err(ParseError::IrregularInterval {
                    line_number: line,
                    expected_minutes: expected.num_minutes(),
                    found_minutes: gap.num_minutes(),
                });
            }
        }
        Ok(())
    }
}

/// Splits one line into fields with CSV quoting rules.
fn split_fields(text: &str, line: usize) -> Result<StringRecord, ParseError> {
    let mut reader = ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .buffer_capacity(text.len() + 1)
        .from_reader(text.as_bytes());
    let mut record = StringRecord::new();
    reader
        .read_record(&mut record)
        .map_err(|source| ParseError::Csv {
            line_number: line,
            source,
        })?;
    Ok(record)
}

fn record_text(record: &StringRecord) -> String {
    record.iter().collect::<Vec<_>>().join(",")
}

/// Lower-cased, trimmed header labels after the date/time columns.
fn value_labels(header: &StringRecord) -> Vec<String> {
    header
        .iter()
        .skip(DATE_TIME_FIELDS.len())
        .map(|label| label.trim().to_lowercase())
        .collect()
}

fn synthesized_name(position: usize) -> String {
    format!("column_{position}")
}

/// Label for the value column at `position` (0-based, after the date/time fields).
fn column_label(labels: &[String], position: usize) -> String {
    labels
        .get(position)
        .filter(|label| !label.is_empty())
        .cloned()
        .unwrap_or_else(|| synthesized_name(position))
}

/// Column names for the first `width` value columns. A name already taken gets a
/// `_<n>` suffix, so names are always unique.
fn column_names(labels: &[String], width: usize) -> Vec<String> {
    let mut names: Vec<String> = Vec::with_capacity(width);
    for position in 0..width {
        let base = column_label(labels, position);
        let mut name = base.clone();
        let mut suffix = 1;
        while names.contains(&name) {
            name = format!("{base}_{suffix}");
            suffix += 1;
        }
        names.push(name);
    }
    names
}

fn parse_row(
    record: &StringRecord,
    line: usize,
    labels: &[String],
) -> Result<ParsedRow, ParseError> {
    if record.len() <= DATE_TIME_FIELDS.len() {
        return Err(ParseError::MalformedRow {
            line_number: line,
            reason: format!(
                "expected {} date/time fields followed by values, found {} fields",
                DATE_TIME_FIELDS.len(),
                record.len()
            ),
            text: record_text(record),
        });
    }

    let timestamp = parse_timestamp(record, line)?;

    let mut values = Vec::with_capacity(record.len() - DATE_TIME_FIELDS.len());
    let mut dropped = 0;
    for (position, field) in record.iter().skip(DATE_TIME_FIELDS.len()).enumerate() {
        let field = field.trim();
        if field.is_empty() {
            dropped += 1;
            continue;
        }
        let value = field
            .parse::<f64>()
            .map_err(|_| ParseError::InvalidNumericField {
                line_number: line,
                column: column_label(labels, position),
                value: field.to_string(),
            })?;
        values.push(value);
    }
    if values.is_empty() {
        return Err(ParseError::MalformedRow {
            line_number: line,
            reason: "no values after the date/time fields".to_string(),
            text: record_text(record),
        });
    }

    Ok(ParsedRow {
        timestamp,
        values,
        dropped,
    })
}

fn parse_timestamp(record: &StringRecord, line: usize) -> Result<DateTime<Utc>, ParseError> {
    let invalid = |reason: String| ParseError::InvalidTimestamp {
        line_number: line,
        reason,
        text: record
            .iter()
            .take(DATE_TIME_FIELDS.len())
            .collect::<Vec<_>>()
            .join(","),
    };

    let mut parts = [0i64; 5];
    for (slot, (name, field)) in parts
        .iter_mut()
        .zip(DATE_TIME_FIELDS.iter().zip(record.iter()))
    {
        *slot = field
            .trim()
            .parse::<i64>()
            .map_err(|_| invalid(format!("{name} '{}' is not an integer", field.trim())))?;
    }
    let [year, month, day, hour, minute] = parts;

    let date = i32::try_from(year)
        .ok()
        .zip(u32::try_from(month).ok())
        .zip(u32::try_from(day).ok())
        .and_then(|((y, m), d)| NaiveDate::from_ymd_opt(y, m, d))
        .ok_or_else(|| invalid(format!("{year}-{month}-{day} is not a calendar date")))?;
    let datetime = u32::try_from(hour)
        .ok()
        .zip(u32::try_from(minute).ok())
        .and_then(|(h, m)| date.and_hms_opt(h, m, 0))
        .ok_or_else(|| invalid(format!("{hour:02}:{minute:02} is not a time of day")))?;
    Ok(datetime.and_utc())
}

/// `true` when the gap from `previous` equals `expected` plus exactly the omitted 29 February.
fn skips_leap_day(previous: DateTime<Utc>, gap: Duration, expected: Duration) -> bool {
    if gap != expected + Duration::days(1) {
        return false;
    }
    let skipped = previous + expected;
    skipped.month() == 2 && skipped.day() == 29
}
