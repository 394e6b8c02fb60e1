//! This module provides the main entry point of the library: a client that downloads one
//! year of PSM3 data for a point and returns it as a validated [`WeatherDataset`].

use crate::config::Config;
use crate::dataset::weather_dataset::WeatherDataset;
use crate::error::NsrdbError;
use crate::fetch::response_fetcher::ResponseFetcher;
use crate::parse::csv_table_parser::CsvTableParser;
use crate::parse::raw_table::RawTable;
use crate::request::parameters::{RequestParameters, DEFAULT_INTERVAL_MINUTES};
use crate::request::request_builder::RequestBuilder;
use crate::types::attribute::Attribute;
use crate::types::location::Location;
use bon::bon;
use log::info;
use std::path::Path;

/// The client struct for accessing NSRDB PSM3 data.
///
/// Holds the process configuration and the three pipeline stages. Each call to
/// [`Nsrdb::weather`] performs exactly one HTTP request.
///
/// # Examples
///
/// ```rust,no_run
/// # use nsrdb_pv::{Config, Location, Nsrdb, NsrdbError};
/// # fn run() -> Result<(), NsrdbError> {
/// let client = Nsrdb::new(Config::load_default()?.with_env_overrides())?;
/// let weather = client
///     .weather()
///     .location(Location::new(35.02, -106.65))
///     .year(2020)
///     .call()?;
/// println!("{} hourly records", weather.len());
/// # Ok(())
/// # }
/// ```
pub struct Nsrdb {
    config: Config,
    request_builder: RequestBuilder,
    fetcher: ResponseFetcher,
    parser: CsvTableParser,
}

#[bon]
impl Nsrdb {
    /// Creates a client from an already loaded configuration.
    ///
    /// # Errors
    ///
    /// [`NsrdbError::Request`] when the configured endpoint is not an http(s) URL, and
    /// [`NsrdbError::Fetch`] when the HTTP client cannot be set up.
    pub fn new(config: Config) -> Result<Self, NsrdbError> {
        let request_builder = RequestBuilder::from_config(&config)?;
        let fetcher = ResponseFetcher::from_config(&config)?;
        Ok(Self {
            config,
            request_builder,
            fetcher,
            parser: CsvTableParser::new(),
        })
    }

    /// Creates a client from [`Config::load_default`] with environment overrides applied.
    pub fn from_default_config() -> Result<Self, NsrdbError> {
        Self::new(Config::load_default()?.with_env_overrides())
    }

    /// Downloads and parses one year of data for a point location.
    ///
    /// This method uses a builder pattern.
    ///
    /// # Arguments
    ///
    /// * `.location(Location)`: **Required.** The site to request.
    /// * `.year(i32)`: **Required.** Calendar year.
    /// * `.attributes(Vec<Attribute>)`: Optional. Defaults to [`Attribute::DEFAULTS`].
    /// * `.interval_minutes(u32)`: Optional. 30 or 60; defaults to 60.
    ///
    /// # Errors
    ///
    /// The returned [`NsrdbError`] names the failing stage: `Request` for invalid input
    /// (nothing is sent), `Fetch` for transport or HTTP failures, `Parse` for malformed
    /// CSV and `Dataset` when the provider omitted requested attributes.
    #[builder]
    pub fn weather(
        &self,
        location: Location,
        year: i32,
        attributes: Option<Vec<Attribute>>,
        interval_minutes: Option<u32>,
    ) -> Result<WeatherDataset, NsrdbError> {
        let params = RequestParameters::builder()
            .location(location)
            .year(year)
            .credentials(self.config.credentials.clone())
            .attributes(attributes.unwrap_or_else(|| Attribute::DEFAULTS.to_vec()))
            .interval_minutes(interval_minutes.unwrap_or(DEFAULT_INTERVAL_MINUTES))
            .build();

        let url = self.request_builder.build(&params)?;
        let raw = self.fetcher.fetch(&url)?;
        let dataset = self
            .parser
            .with_expected_interval(params.interval_minutes())
            .parse(&raw)?;
        dataset.ensure_attributes(params.attributes())?;

        info!(
            "Loaded {} records for '{}' ({})",
            dataset.len(),
            params.location().name(),
            params.year()
        );
        Ok(dataset)
    }

    /// Parses a CSV export saved to disk earlier (same layout as the download).
    pub fn parse_file(path: impl AsRef<Path>) -> Result<WeatherDataset, NsrdbError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)
            .map_err(|e| NsrdbError::Input(path.to_path_buf(), e))?;
        info!("Parsing {} ({} bytes)", path.display(), text.len());
        Ok(CsvTableParser::new().parse(&RawTable::new(text))?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Credentials;
    use crate::dataset::error::DatasetError;
    use crate::fetch::error::FetchError;
    use crate::fetch::test_server::{serve_once, OneShotServer};
    use crate::request::error::RequestError;
    use std::io::Write;
    use tempfile::NamedTempFile;

    const BODY: &str = "Source,Location ID,City,State,Country,Latitude,Longitude\n\
        NSRDB,149190,-,-,-,35.02,-106.65\n\
        Year,Month,Day,Hour,Minute,GHI,DHI,DNI\n\
        2020,6,1,17,0,800,110,780\n\
        2020,6,1,18,0,900,120,850\n";

    fn client_for(server: &OneShotServer) -> Nsrdb {
        let mut endpoint = server.url.clone();
        endpoint.set_query(None);
        let config = Config {
            credentials: Credentials::new("test-key", "me@example.com", "Jane Doe"),
            endpoint: endpoint.to_string(),
            timeout_secs: 10,
            ..Config::default()
        };
        Nsrdb::new(config).unwrap()
    }

    fn site() -> Location {
        Location::new(35.02, -106.65)
    }

    #[test]
    fn test_weather_runs_the_pipeline() -> Result<(), NsrdbError> {
        let server = serve_once("200 OK", "text/csv", BODY);
        let weather = client_for(&server)
            .weather()
            .location(site())
            .year(2020)
            .attributes(vec![Attribute::Ghi, Attribute::Dhi, Attribute::Dni])
            .call()?;
        assert_eq!(weather.len(), 2);
        assert_eq!(weather.column_names(), ["ghi", "dhi", "dni"]);

        let request_line = server.request_line();
        assert!(request_line.contains("names=2020"));
        assert!(request_line.contains("attributes=ghi%2Cdhi%2Cdni"));
        assert!(request_line.contains("api_key=test-key"));
        Ok(())
    }

    #[test]
    fn test_missing_attribute_fails_in_dataset_stage() {
        let server = serve_once("200 OK", "text/csv", BODY);
        let err = client_for(&server)
            .weather()
            .location(site())
            .year(2020)
            .call()
            .unwrap_err();
        match &err {
            NsrdbError::Dataset(DatasetError::MissingAttributes { missing }) => {
                assert_eq!(
                    missing,
                    &[
                        Attribute::WindSpeed,
                        Attribute::AirTemperature,
                        Attribute::SolarZenithAngle
                    ]
                );
            }
            other => panic!("expected MissingAttributes, got {other:?}"),
        }
        assert!(err.to_string().starts_with("dataset: "));
    }

    #[test]
    fn test_rejected_request_fails_in_fetch_stage() {
        let server = serve_once("403 Forbidden", "text/plain", "nope");
        let err = client_for(&server)
            .weather()
            .location(site())
            .year(2020)
            .call()
            .unwrap_err();
        assert!(matches!(
            err,
            NsrdbError::Fetch(FetchError::RequestRejected { code: 403, .. })
        ));
    }

    #[test]
    fn test_invalid_location_sends_nothing() {
        let client = Nsrdb::new(Config {
            credentials: Credentials::new("k", "me@example.com", "Me"),
            endpoint: "http://127.0.0.1:9/unused".to_string(),
            ..Config::default()
        })
        .unwrap();
        let err = client
            .weather()
            .location(Location::new(100.0, 0.0))
            .year(2020)
            .call()
            .unwrap_err();
        assert!(matches!(
            err,
            NsrdbError::Request(RequestError::InvalidLocation { .. })
        ));
        assert!(err.to_string().starts_with("request: "));
    }

    #[test]
    fn test_bad_endpoint_is_rejected_up_front() {
        let config = Config {
            endpoint: "ftp://example.com/data.csv".to_string(),
            ..Config::default()
        };
        assert!(matches!(
            Nsrdb::new(config),
            Err(NsrdbError::Request(RequestError::InvalidEndpoint { .. }))
        ));
    }

    #[test]
    fn test_parse_file() -> Result<(), NsrdbError> {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(BODY.as_bytes()).unwrap();
        let weather = Nsrdb::parse_file(file.path())?;
        assert_eq!(weather.len(), 2);
        assert_eq!(weather.column("dni"), Some(&[780.0, 850.0][..]));

        let missing = Nsrdb::parse_file("/definitely/not/here.csv").unwrap_err();
        assert!(matches!(missing, NsrdbError::Input(..)));
        Ok(())
    }
}
