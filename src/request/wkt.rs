//! Well-Known-Text point encoding.
//!
//! The provider reads `POINT(x y)` with x = longitude and y = latitude.

use crate::types::location::LatLon;

/// Encodes a coordinate as `POINT(<longitude> <latitude>)`.
///
/// `f64`'s `Display` prints the shortest representation that parses back to the same
/// value, so [`parse_point`] recovers the exact coordinate.
///
/// ```
/// use nsrdb_pv::{wkt, LatLon};
///
/// assert_eq!(wkt::point(LatLon(35.02, -106.65)), "POINT(-106.65 35.02)");
/// ```
pub fn point(coordinate: LatLon) -> String {
    format!("POINT({} {})", coordinate.1, coordinate.0)
}

/// Decodes `POINT(<longitude> <latitude>)` into a [`LatLon`].
///
/// Returns `None` for anything that is not a two-dimensional WKT point.
pub fn parse_point(wkt: &str) -> Option<LatLon> {
    let inner = wkt
        .trim()
        .strip_prefix("POINT")?
        .trim_start()
        .strip_prefix('(')?
        .strip_suffix(')')?;
    let mut parts = inner.split_whitespace();
    let longitude = parts.next()?.parse::<f64>().ok()?;
    let latitude = parts.next()?.parse::<f64>().ok()?;
    if parts.next().is_some() {
        return None;
    }
    Some(LatLon(latitude, longitude))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_longitude_comes_first() {
        assert_eq!(point(LatLon(40.0, -105.0)), "POINT(-105 40)");
    }

    #[test]
    fn test_round_trip() {
        let coordinates = [
            LatLon(35.02, -106.65),
            LatLon(-33.8688, 151.2093),
            LatLon(90.0, 180.0),
            LatLon(-90.0, -180.0),
            LatLon(0.1 + 0.2, 1.0 / 3.0),
            LatLon(0.0, -0.0),
        ];
        for coordinate in coordinates {
            let decoded = parse_point(&point(coordinate)).unwrap();
            assert_eq!(decoded.0.to_bits(), coordinate.0.to_bits());
            assert_eq!(decoded.1.to_bits(), coordinate.1.to_bits());
        }
    }

    #[test]
    fn test_rejects_other_geometries() {
        assert_eq!(parse_point("POINT(1)"), None);
        assert_eq!(parse_point("POINT(1 2 3)"), None);
        assert_eq!(parse_point("LINESTRING(1 2, 3 4)"), None);
        assert_eq!(parse_point("POINT(a b)"), None);
        assert_eq!(parse_point(" POINT (1 2) "), Some(LatLon(2.0, 1.0)));
    }
}
