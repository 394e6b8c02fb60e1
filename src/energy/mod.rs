pub mod error;
pub mod model;
pub mod pvwatts;
pub mod solar_position;
