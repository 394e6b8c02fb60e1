use crate::config::error::ConfigError;
use crate::dataset::error::DatasetError;
use crate::energy::error::SimulationError;
use crate::fetch::error::FetchError;
use crate::parse::error::ParseError;
use crate::request::error::RequestError;
use std::path::PathBuf;
use thiserror::Error;

/// Any failure of the download-parse-simulate pipeline, tagged with the stage it came from.
#[derive(Debug, Error)]
pub enum NsrdbError {
    #[error("config: {0}")]
    Config(#[from] ConfigError),

    #[error("request: {0}")]
    Request(#[from] RequestError),

    #[error("fetch: {0}")]
    Fetch(#[from] FetchError),

    #[error("parse: {0}")]
    Parse(#[from] ParseError),

    #[error("dataset: {0}")]
    Dataset(#[from] DatasetError),

    #[error("simulation: {0}")]
    Simulation(#[from] SimulationError),

    #[error("input: failed to read '{0}'")]
    Input(PathBuf, #[source] std::io::Error),

    #[error("output: failed to write '{0}'")]
    Output(PathBuf, #[source] std::io::Error),
}
