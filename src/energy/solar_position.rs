//! Low-precision solar geometry from Spencer's (1971) Fourier series.
//!
//! Accurate to a few tenths of a degree, which is well inside the noise of hourly
//! irradiance data.

use crate::types::location::LatLon;
use chrono::{DateTime, Datelike, Timelike, Utc};
use std::f64::consts::PI;

const DEG: f64 = PI / 180.0;

/// Apparent sun position for one instant and place.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SolarPosition {
    /// Angle between the sun and the local vertical, degrees.
    pub zenith_deg: f64,
    /// Degrees clockwise from north.
    pub azimuth_deg: f64,
}

impl SolarPosition {
    pub fn elevation_deg(&self) -> f64 {
        90.0 - self.zenith_deg
    }

    /// `true` while the sun is above the horizon.
    pub fn is_day(&self) -> bool {
        self.zenith_deg < 90.0
    }
}

/// Day angle in radians for the given UTC instant.
fn day_angle(timestamp: DateTime<Utc>) -> f64 {
    2.0 * PI * (f64::from(timestamp.ordinal()) - 1.0) / 365.0
}

/// Solar declination in radians.
pub fn declination(timestamp: DateTime<Utc>) -> f64 {
    let b = day_angle(timestamp);
    0.006918 - 0.399912 * b.cos() + 0.070257 * b.sin() - 0.006758 * (2.0 * b).cos()
        + 0.000907 * (2.0 * b).sin()
        - 0.002697 * (3.0 * b).cos()
        + 0.00148 * (3.0 * b).sin()
}

/// Equation of time in minutes.
pub fn equation_of_time(timestamp: DateTime<Utc>) -> f64 {
    let b = day_angle(timestamp);
    229.18
        * (0.000075 + 0.001868 * b.cos()
            - 0.032077 * b.sin()
            - 0.014615 * (2.0 * b).cos()
            - 0.04089 * (2.0 * b).sin())
}

/// Computes the sun's zenith and azimuth at `timestamp` as seen from `coordinate`.
///
/// ```
/// use chrono::{TimeZone, Utc};
/// use nsrdb_pv::{solar_position, LatLon};
///
/// // Solar noon near the June solstice in Albuquerque.
/// let noon = Utc.with_ymd_and_hms(2020, 6, 21, 19, 0, 0).unwrap();
/// let sun = solar_position(noon, LatLon(35.02, -106.65));
/// assert!((sun.zenith_deg - 11.6).abs() < 1.0);
/// assert!((sun.azimuth_deg - 180.0).abs() < 25.0);
/// ```
pub fn solar_position(timestamp: DateTime<Utc>, coordinate: LatLon) -> SolarPosition {
    let LatLon(latitude, longitude) = coordinate;
    let utc_hours = f64::from(timestamp.hour())
        + f64::from(timestamp.minute()) / 60.0
        + f64::from(timestamp.second()) / 3600.0;
    let solar_time = utc_hours + longitude / 15.0 + equation_of_time(timestamp) / 60.0;
    let hour_angle = 15.0 * (solar_time - 12.0) * DEG;

    let lat = latitude * DEG;
    let decl = declination(timestamp);
    let cos_zenith =
        (lat.sin() * decl.sin() + lat.cos() * decl.cos() * hour_angle.cos()).clamp(-1.0, 1.0);
    let zenith = cos_zenith.acos();

    let denominator = zenith.sin() * lat.cos();
    let azimuth_deg = if denominator.abs() < 1e-9 {
        // Sun at the zenith, or observer at a pole: azimuth is undefined, report due south.
        180.0
    } else {
        let cos_az = ((decl.sin() - cos_zenith * lat.sin()) / denominator).clamp(-1.0, 1.0);
        let az = cos_az.acos() / DEG;
        // Afternoon (positive hour angle, wrapped into [-180, 180)) puts the sun west of south.
        let wrapped = (hour_angle / DEG + 180.0).rem_euclid(360.0) - 180.0;
        if wrapped > 0.0 {
            360.0 - az
        } else {
            az
        }
    };

    SolarPosition {
        zenith_deg: zenith / DEG,
        azimuth_deg,
    }
}

/// Cosine of the angle of incidence between the sun and a plane with the given tilt and
/// azimuth (degrees). Negative values mean the sun is behind the plane.
pub fn cos_incidence(sun: SolarPosition, tilt_deg: f64, surface_azimuth_deg: f64) -> f64 {
    let zenith = sun.zenith_deg * DEG;
    let tilt = tilt_deg * DEG;
    zenith.cos() * tilt.cos()
        + zenith.sin() * tilt.sin() * ((sun.azimuth_deg - surface_azimuth_deg) * DEG).cos()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_declination_at_solstices() {
        let june = Utc.with_ymd_and_hms(2021, 6, 21, 12, 0, 0).unwrap();
        let december = Utc.with_ymd_and_hms(2021, 12, 21, 12, 0, 0).unwrap();
        assert!((declination(june) / DEG - 23.44).abs() < 0.5);
        assert!((declination(december) / DEG + 23.44).abs() < 0.5);
    }

    #[test]
    fn test_morning_and_afternoon_azimuths() {
        let site = LatLon(35.02, -106.65);
        // 08:00 and 16:00 local solar time, roughly.
        let morning = solar_position(Utc.with_ymd_and_hms(2021, 3, 20, 15, 0, 0).unwrap(), site);
        let afternoon = solar_position(Utc.with_ymd_and_hms(2021, 3, 20, 23, 0, 0).unwrap(), site);
        assert!(morning.is_day() && afternoon.is_day());
        assert!(morning.azimuth_deg > 90.0 && morning.azimuth_deg < 180.0);
        assert!(afternoon.azimuth_deg > 180.0 && afternoon.azimuth_deg < 270.0);
    }

    #[test]
    fn test_night() {
        let midnight_local = Utc.with_ymd_and_hms(2021, 6, 1, 7, 0, 0).unwrap();
        let sun = solar_position(midnight_local, LatLon(35.02, -106.65));
        assert!(!sun.is_day());
        assert!(sun.elevation_deg() < -30.0);
    }

    #[test]
    fn test_incidence_on_flat_and_facing_planes() {
        let sun = SolarPosition {
            zenith_deg: 30.0,
            azimuth_deg: 180.0,
        };
        assert!((cos_incidence(sun, 0.0, 180.0) - (30.0 * DEG).cos()).abs() < 1e-12);
        assert!((cos_incidence(sun, 30.0, 180.0) - 1.0).abs() < 1e-12);
        assert!(cos_incidence(sun, 90.0, 0.0) < 0.0);
    }
}
