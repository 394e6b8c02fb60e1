//! Turns [`RequestParameters`] into a PSM3 CSV download URL.

use crate::config::{Config, Credentials, DEFAULT_AFFILIATION};
use crate::request::error::RequestError;
use crate::request::parameters::{RequestParameters, SUPPORTED_INTERVALS};
use crate::request::wkt;
use crate::types::attribute::Attribute;
use crate::utils::redact_url;
use chrono::{Datelike, Utc};
use log::debug;
use reqwest::Url;

/// First calendar year the PSM3 dataset covers.
pub const FIRST_PROVIDER_YEAR: i32 = 1998;

/// Inclusive range of calendar years the provider serves.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct YearRange {
    pub first: i32,
    pub last: i32,
}

impl YearRange {
    /// 1998 through the last full calendar year.
    pub fn provider_default() -> Self {
        Self {
            first: FIRST_PROVIDER_YEAR,
            last: Utc::now().year() - 1,
        }
    }

    pub fn contains(&self, year: i32) -> bool {
        (self.first..=self.last).contains(&year)
    }
}

/// Builds fully-formed PSM3 download queries. Performs no I/O.
///
/// The query always forces `utc=true`, `leap_day=false` and `mailing_list=false`;
/// the point geometry is written longitude first, see [`wkt::point`].
///
/// # Examples
///
/// ```
/// use nsrdb_pv::{Credentials, Location, RequestBuilder, RequestParameters};
///
/// let builder = RequestBuilder::new("https://developer.nrel.gov/api/nsrdb/v2/solar/psm3-download.csv")?;
/// let params = RequestParameters::builder()
///     .location(Location::new(35.02, -106.65))
///     .year(2020)
///     .credentials(Credentials::new("key", "me@example.com", "Jane Doe"))
///     .build();
///
/// let url = builder.build(&params)?;
/// let wkt = url.query_pairs().find(|(k, _)| k == "wkt").unwrap().1;
/// assert_eq!(wkt, "POINT(-106.65 35.02)");
/// # Ok::<(), nsrdb_pv::RequestError>(())
/// ```
#[derive(Debug, Clone)]
pub struct RequestBuilder {
    endpoint: Url,
    affiliation: String,
    years: YearRange,
}

impl RequestBuilder {
    pub fn new(endpoint: &str) -> Result<Self, RequestError> {
        let invalid = |reason: String| RequestError::InvalidEndpoint {
            endpoint: endpoint.to_string(),
            reason,
        };
        let url = Url::parse(endpoint).map_err(|e| invalid(e.to_string()))?;
        if !matches!(url.scheme(), "http" | "https") {
            return Err(invalid(format!("unsupported scheme '{}'", url.scheme())));
        }
        Ok(Self {
            endpoint: url,
            affiliation: DEFAULT_AFFILIATION.to_string(),
            years: YearRange::provider_default(),
        })
    }

    pub fn from_config(config: &Config) -> Result<Self, RequestError> {
        Ok(Self::new(&config.endpoint)?.with_affiliation(config.affiliation.clone()))
    }

    pub fn with_affiliation(self, affiliation: impl Into<String>) -> Self {
        Self {
            affiliation: affiliation.into(),
            ..self
        }
    }

    pub fn with_year_range(self, years: YearRange) -> Self {
        Self { years, ..self }
    }

    pub fn year_range(&self) -> YearRange {
        self.years
    }

    /// Validates `params` and renders the download URL.
    ///
    /// # Errors
    ///
    /// * [`RequestError::InvalidLocation`] when latitude or longitude is out of range or not finite.
    /// * [`RequestError::InvalidYear`] when the year is outside [`Self::year_range`].
    /// * [`RequestError::MissingCredentials`] when the API key, email or username is blank.
    /// * [`RequestError::EmptyAttributes`] / [`RequestError::InvalidInterval`] for unusable sampling settings.
    pub fn build(&self, params: &RequestParameters) -> Result<Url, RequestError> {
        let coordinate = params.location().coordinate();
        if !coordinate.is_valid() {
            return Err(RequestError::InvalidLocation {
                latitude: coordinate.0,
                longitude: coordinate.1,
            });
        }
        if !self.years.contains(params.year()) {
            return Err(RequestError::InvalidYear {
                year: params.year(),
                first: self.years.first,
                last: self.years.last,
            });
        }
        let credentials = params.credentials();
        validate_credentials(credentials)?;

        let attributes = params.unique_attributes();
        if attributes.is_empty() {
            return Err(RequestError::EmptyAttributes);
        }
        let interval = params.interval_minutes();
        if !SUPPORTED_INTERVALS.contains(&interval) {
            return Err(RequestError::InvalidInterval { minutes: interval });
        }

        let mut url = self.endpoint.clone();
        {
            let mut query = url.query_pairs_mut();
            query
                .append_pair("wkt", &wkt::point(coordinate))
                .append_pair("names", &params.year().to_string())
                .append_pair("leap_day", "false")
                .append_pair("interval", &interval.to_string())
                .append_pair("utc", "true");
            query
                .append_pair("full_name", credentials.username.trim())
                .append_pair("email", credentials.email.trim())
                .append_pair("api_key", credentials.api_key.trim())
                .append_pair("affiliation", &self.affiliation)
                .append_pair("mailing_list", "false")
                .append_pair("attributes", &Attribute::join_query_names(&attributes));
        }
        debug!("Built request {}", redact_url(&url));
        Ok(url)
    }
}

fn validate_credentials(credentials: &Credentials) -> Result<(), RequestError> {
    if credentials.api_key.trim().is_empty() {
        return Err(RequestError::MissingCredentials { field: "api_key" });
    }
    if credentials.email.trim().is_empty() {
        return Err(RequestError::MissingCredentials { field: "email" });
    }
    if credentials.username.trim().is_empty() {
        return Err(RequestError::MissingCredentials { field: "username" });
    }
    Ok(())
}
