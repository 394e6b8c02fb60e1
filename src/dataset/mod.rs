//! The in-memory weather table handed to the energy model.

pub mod error;
pub mod weather_dataset;
