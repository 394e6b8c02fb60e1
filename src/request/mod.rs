//! Request construction: parameters, validation and query rendering.

pub mod error;
pub mod parameters;
pub mod request_builder;
pub mod wkt;
