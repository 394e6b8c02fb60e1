pub mod attribute;
pub mod location;
