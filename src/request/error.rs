use thiserror::Error;

#[derive(Debug, Error)]
pub enum RequestError {
    #[error("Invalid location: latitude {latitude} must be within [-90, 90] and longitude {longitude} within [-180, 180]")]
    InvalidLocation { latitude: f64, longitude: f64 },

    #[error("Invalid year {year}: the provider serves {first} through {last}")]
    InvalidYear { year: i32, first: i32, last: i32 },

    #[error("Missing credentials: '{field}' is empty")]
    MissingCredentials { field: &'static str },

    #[error("Invalid endpoint '{endpoint}': {reason}")]
    InvalidEndpoint { endpoint: String, reason: String },

    #[error("At least one attribute must be requested")]
    EmptyAttributes,

    #[error("Unsupported interval of {minutes} minutes (expected 30 or 60)")]
    InvalidInterval { minutes: u32 },
}
