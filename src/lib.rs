mod config;
mod dataset;
mod energy;
mod error;
mod fetch;
mod nsrdb;
mod parse;
mod request;
mod types;
mod utils;

pub use error::NsrdbError;
pub use nsrdb::*;

pub use config::error::ConfigError;
pub use config::{Config, Credentials, DEFAULT_AFFILIATION, DEFAULT_ENDPOINT, DEFAULT_TIMEOUT_SECS};

pub use types::attribute::{Attribute, UnknownAttribute};
pub use types::location::{LatLon, Location};

pub use request::error::RequestError;
pub use request::parameters::{RequestParameters, DEFAULT_INTERVAL_MINUTES, SUPPORTED_INTERVALS};
pub use request::request_builder::{RequestBuilder, YearRange, FIRST_PROVIDER_YEAR};
pub use request::wkt;

pub use fetch::error::FetchError;
pub use fetch::response_fetcher::ResponseFetcher;

pub use parse::csv_table_parser::{CsvTableParser, DEFAULT_PREAMBLE_LINES};
pub use parse::error::ParseError;
pub use parse::raw_table::RawTable;

pub use dataset::error::DatasetError;
pub use dataset::weather_dataset::{WeatherDataset, WeatherRecord, COL_DATETIME};

pub use energy::error::SimulationError;
pub use energy::model::{EnergyModel, SimulationResults, SystemDescription, DEFAULT_DC_CAPACITY_KW};
pub use energy::pvwatts::PvWattsModel;
pub use energy::solar_position::{solar_position, SolarPosition};
