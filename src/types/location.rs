//! Geographic types used to describe the point a solar resource request is made for.

/// Represents a geographical coordinate using latitude and longitude.
///
/// Latitude is the first element (index 0), and longitude is the second (index 1).
/// Both values are represented as `f64` in decimal degrees.
///
/// # Examples
///
/// ```
/// use nsrdb_pv::LatLon;
///
/// let albuquerque = LatLon(35.02, -106.65);
/// assert_eq!(albuquerque.0, 35.02); // Latitude
/// assert_eq!(albuquerque.1, -106.65); // Longitude
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LatLon(pub f64, pub f64);

impl LatLon {
    /// Returns `true` when latitude is within `[-90, 90]` and longitude within `[-180, 180]`.
    ///
    /// Non-finite values are never valid.
    pub fn is_valid(&self) -> bool {
        (-90.0..=90.0).contains(&self.0) && (-180.0..=180.0).contains(&self.1)
    }
}

/// A named site: coordinate, optional altitude and a label.
///
/// A `Location` is immutable once constructed. Range checks are not performed here;
/// [`crate::RequestBuilder`] rejects out-of-range coordinates with
/// [`crate::RequestError::InvalidLocation`] before any network call is made.
///
/// # Examples
///
/// ```
/// use nsrdb_pv::Location;
///
/// let site = Location::new(35.02, -106.65)
///     .with_altitude(1619.0)
///     .with_name("albuquerque");
/// assert_eq!(site.latitude(), 35.02);
/// assert_eq!(site.longitude(), -106.65);
/// assert_eq!(site.altitude(), Some(1619.0));
/// assert_eq!(site.name(), "albuquerque");
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct Location {
    coordinate: LatLon,
    altitude: Option<f64>,
    name: String,
}

impl Location {
    /// Label used when no name is given.
    pub const DEFAULT_NAME: &'static str = "generic-name";

    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            coordinate: LatLon(latitude, longitude),
            altitude: None,
            name: Self::DEFAULT_NAME.to_string(),
        }
    }

    /// Altitude above sea level in metres.
    pub fn with_altitude(self, altitude: f64) -> Self {
        Self {
            altitude: Some(altitude),
            ..self
        }
    }

    pub fn with_name(self, name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..self
        }
    }

    pub fn coordinate(&self) -> LatLon {
        self.coordinate
    }

    pub fn latitude(&self) -> f64 {
        self.coordinate.0
    }

    pub fn longitude(&self) -> f64 {
        self.coordinate.1
    }

    pub fn altitude(&self) -> Option<f64> {
        self.altitude
    }

    pub fn name(&self) -> &str {
        &self.name
    }
}

impl From<LatLon> for Location {
    fn from(coordinate: LatLon) -> Self {
        Location::new(coordinate.0, coordinate.1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_coordinate_ranges() {
        assert!(LatLon(90.0, 180.0).is_valid());
        assert!(LatLon(-90.0, -180.0).is_valid());
        assert!(!LatLon(90.01, 0.0).is_valid());
        assert!(!LatLon(0.0, -180.5).is_valid());
        assert!(!LatLon(f64::NAN, 0.0).is_valid());
        assert!(!LatLon(0.0, f64::INFINITY).is_valid());
    }

    #[test]
    fn test_location_defaults() {
        let site = Location::from(LatLon(1.0, 2.0));
        assert_eq!(site.name(), Location::DEFAULT_NAME);
        assert_eq!(site.altitude(), None);
        assert_eq!(site.coordinate(), LatLon(1.0, 2.0));
    }
}
