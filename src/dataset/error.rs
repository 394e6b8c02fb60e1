use crate::types::attribute::Attribute;
use polars::error::PolarsError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum DatasetError {
    #[error("Provider omitted requested attributes: {}", Attribute::join_query_names(.missing))]
    MissingAttributes { missing: Vec<Attribute> },

    #[error("Required column '{0}' not found in dataset")]
    ColumnNotFound(String),

    #[error("Duplicate column '{0}'")]
    DuplicateColumn(String),

    #[error("Column '{column}' has {found} values but the time index has {expected}")]
    ShapeMismatch {
        column: String,
        expected: usize,
        found: usize,
    },

    #[error("Time index is not strictly increasing at position {position}")]
    NonIncreasingIndex { position: usize },

    #[error("Failed building DataFrame: {0}")]
    Polars(#[from] PolarsError),
}
