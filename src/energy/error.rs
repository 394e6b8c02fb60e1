use crate::types::attribute::Attribute;
use polars::error::PolarsError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SimulationError {
    #[error("Weather data has no '{}' column, required by the energy model", .0.header_label())]
    MissingColumn(Attribute),

    #[error("Invalid system description: {0}")]
    InvalidSystem(String),

    #[error("Weather data is empty")]
    EmptyWeather,

    #[error("Failed building results DataFrame: {0}")]
    Polars(#[from] PolarsError),
}
