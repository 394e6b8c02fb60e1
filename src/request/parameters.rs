//! The full description of one point-location, single-year request.

use crate::config::Credentials;
use crate::types::attribute::Attribute;
use crate::types::location::Location;
use bon::Builder;

/// Sampling interval used when none is given, in minutes.
pub const DEFAULT_INTERVAL_MINUTES: u32 = 60;

/// Sampling intervals the PSM3 CSV endpoint serves, in minutes. 5 and 15 minute data
/// come from a separate endpoint.
pub const SUPPORTED_INTERVALS: [u32; 2] = [30, 60];

/// Everything needed to build one PSM3 download query.
///
/// Built once per invocation with the generated builder. `attributes` defaults to
/// [`Attribute::DEFAULTS`] and `interval_minutes` to [`DEFAULT_INTERVAL_MINUTES`].
///
/// # Examples
///
/// ```
/// use nsrdb_pv::{Attribute, Credentials, Location, RequestParameters};
///
/// let params = RequestParameters::builder()
///     .location(Location::new(35.02, -106.65))
///     .year(2020)
///     .credentials(Credentials::new("key", "me@example.com", "Me"))
///     .build();
///
/// assert_eq!(params.interval_minutes(), 60);
/// assert_eq!(params.attributes(), &Attribute::DEFAULTS);
/// ```
#[derive(Debug, Clone, PartialEq, Builder)]
pub struct RequestParameters {
    location: Location,
    year: i32,
    credentials: Credentials,
    #[builder(default = Attribute::DEFAULTS.to_vec())]
    attributes: Vec<Attribute>,
    #[builder(default = DEFAULT_INTERVAL_MINUTES)]
    interval_minutes: u32,
}

impl RequestParameters {
    pub fn location(&self) -> &Location {
        &self.location
    }

    pub fn year(&self) -> i32 {
        self.year
    }

    pub fn credentials(&self) -> &Credentials {
        &self.credentials
    }

    /// Requested attributes in request order.
    pub fn attributes(&self) -> &[Attribute] {
        &self.attributes
    }

    pub fn interval_minutes(&self) -> u32 {
        self.interval_minutes
    }

    /// Requested attributes with duplicates removed, keeping first occurrence order.
    pub(crate) fn unique_attributes(&self) -> Vec<Attribute> {
        let mut unique: Vec<Attribute> = Vec::with_capacity(self.attributes.len());
        for attribute in &self.attributes {
            if !unique.contains(attribute) {
                unique.push(*attribute);
            }
        }
        unique
    }
}
