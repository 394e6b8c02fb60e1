//! Defines the `Attribute` enum, mapping the physical variables the NSRDB PSM3 endpoint
//! can return to their query names and CSV header labels.

use std::fmt;
use std::str::FromStr;

/// A physical variable that can be requested from the NSRDB PSM3 download endpoint.
///
/// Each variant has two spellings:
/// * the **query name** sent in the `attributes` parameter (e.g. `air_temperature`), and
/// * the **header label** the provider writes in the CSV header line, lower-cased and
///   trimmed (e.g. `temperature`).
///
/// The parser names dataset columns after header labels, so lookups from an `Attribute`
/// into a [`crate::WeatherDataset`] go through [`Attribute::header_label`].
///
/// Units follow the provider: irradiance in W/m², temperatures in °C, wind speed in m/s,
/// pressure in mbar, angles in degrees.
#[derive(Debug, PartialEq, Eq, Hash, Clone, Copy)]
pub enum Attribute {
    /// Global horizontal irradiance (W/m²).
    Ghi,
    /// Diffuse horizontal irradiance (W/m²).
    Dhi,
    /// Direct normal irradiance (W/m²).
    Dni,
    /// Wind speed at 2 m (m/s).
    WindSpeed,
    /// Air temperature at 2 m (°C).
    AirTemperature,
    /// Solar zenith angle (degrees).
    SolarZenithAngle,
    /// Dew point (°C).
    DewPoint,
    /// Relative humidity (%).
    RelativeHumidity,
    /// Surface pressure (mbar).
    SurfacePressure,
    /// Surface albedo (unitless).
    SurfaceAlbedo,
    /// Wind direction (degrees from north).
    WindDirection,
    /// Clear-sky global horizontal irradiance (W/m²).
    ClearskyGhi,
    /// Clear-sky diffuse horizontal irradiance (W/m²).
    ClearskyDhi,
    /// Clear-sky direct normal irradiance (W/m²).
    ClearskyDni,
    /// Total precipitable water (cm).
    TotalPrecipitableWater,
    /// Cloud type code.
    CloudType,
}

impl Attribute {
    /// Every attribute the endpoint understands, in catalogue order.
    pub const ALL: [Attribute; 16] = [
        Attribute::Ghi,
        Attribute::Dhi,
        Attribute::Dni,
        Attribute::WindSpeed,
        Attribute::AirTemperature,
        Attribute::SolarZenithAngle,
        Attribute::DewPoint,
        Attribute::RelativeHumidity,
        Attribute::SurfacePressure,
        Attribute::SurfaceAlbedo,
        Attribute::WindDirection,
        Attribute::ClearskyGhi,
        Attribute::ClearskyDhi,
        Attribute::ClearskyDni,
        Attribute::TotalPrecipitableWater,
        Attribute::CloudType,
    ];

    /// The attributes requested when none are specified: the inputs a PV energy model needs.
    pub const DEFAULTS: [Attribute; 6] = [
        Attribute::Ghi,
        Attribute::Dhi,
        Attribute::Dni,
        Attribute::WindSpeed,
        Attribute::AirTemperature,
        Attribute::SolarZenithAngle,
    ];

    /// Name used in the `attributes` query parameter.
    pub fn query_name(&self) -> &'static str {
        match self {
            Attribute::Ghi => "ghi",
            Attribute::Dhi => "dhi",
            Attribute::Dni => "dni",
            Attribute::WindSpeed => "wind_speed",
            Attribute::AirTemperature => "air_temperature",
            Attribute::SolarZenithAngle => "solar_zenith_angle",
            Attribute::DewPoint => "dew_point",
            Attribute::RelativeHumidity => "relative_humidity",
            Attribute::SurfacePressure => "surface_pressure",
            Attribute::SurfaceAlbedo => "surface_albedo",
            Attribute::WindDirection => "wind_direction",
            Attribute::ClearskyGhi => "clearsky_ghi",
            Attribute::ClearskyDhi => "clearsky_dhi",
            Attribute::ClearskyDni => "clearsky_dni",
            Attribute::TotalPrecipitableWater => "total_precipitable_water",
            Attribute::CloudType => "cloud_type",
        }
    }

    /// Lower-cased CSV header label the provider uses for this attribute.
    pub fn header_label(&self) -> &'static str {
        match self {
            Attribute::Ghi => "ghi",
            Attribute::Dhi => "dhi",
            Attribute::Dni => "dni",
            Attribute::WindSpeed => "wind speed",
            Attribute::AirTemperature => "temperature",
            Attribute::SolarZenithAngle => "solar zenith angle",
            Attribute::DewPoint => "dew point",
            Attribute::RelativeHumidity => "relative humidity",
            Attribute::SurfacePressure => "pressure",
            Attribute::SurfaceAlbedo => "surface albedo",
            Attribute::WindDirection => "wind direction",
            Attribute::ClearskyGhi => "clearsky ghi",
            Attribute::ClearskyDhi => "clearsky dhi",
            Attribute::ClearskyDni => "clearsky dni",
            Attribute::TotalPrecipitableWater => "precipitable water",
            Attribute::CloudType => "cloud type",
        }
    }

    /// Looks up an attribute by its (already lower-cased) CSV header label.
    ///
    /// # Examples
    ///
    /// ```
    /// use nsrdb_pv::Attribute;
    ///
    /// assert_eq!(Attribute::from_header_label("temperature"), Some(Attribute::AirTemperature));
    /// assert_eq!(Attribute::from_header_label("fill flag"), None);
    /// ```
    pub fn from_header_label(label: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|a| a.header_label() == label)
    }

    /// Joins attributes into the comma-separated form the `attributes` parameter expects.
    pub(crate) fn join_query_names(attributes: &[Attribute]) -> String {
        attributes
            .iter()
            .map(Attribute::query_name)
            .collect::<Vec<_>>()
            .join(",")
    }
}

/// Formats an `Attribute` using its query name.
///
/// ```
/// use nsrdb_pv::Attribute;
///
/// assert_eq!(Attribute::WindSpeed.to_string(), "wind_speed");
/// ```
impl fmt::Display for Attribute {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.query_name())
    }
}

/// Error returned when a string names no known [`Attribute`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown NSRDB attribute '{0}'")]
pub struct UnknownAttribute(pub String);

/// Parses either the query name or the header label, case-insensitively.
impl FromStr for Attribute {
    type Err = UnknownAttribute;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let needle = s.trim().to_lowercase();
        Self::ALL
            .into_iter()
            .find(|a| a.query_name() == needle || a.header_label() == needle)
            .ok_or_else(|| UnknownAttribute(s.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_query_string() {
        assert_eq!(
            Attribute::join_query_names(&Attribute::DEFAULTS),
            "ghi,dhi,dni,wind_speed,air_temperature,solar_zenith_angle"
        );
    }

    #[test]
    fn test_parse_either_spelling() {
        assert_eq!("air_temperature".parse(), Ok(Attribute::AirTemperature));
        assert_eq!(" Temperature ".parse(), Ok(Attribute::AirTemperature));
        assert_eq!("Solar Zenith Angle".parse(), Ok(Attribute::SolarZenithAngle));
        assert_eq!(
            "sunshine".parse::<Attribute>(),
            Err(UnknownAttribute("sunshine".to_string()))
        );
    }

    #[test]
    fn test_labels_are_unique() {
        for (i, a) in Attribute::ALL.iter().enumerate() {
            for b in &Attribute::ALL[i + 1..] {
                assert_ne!(a.query_name(), b.query_name());
                assert_ne!(a.header_label(), b.header_label());
            }
        }
    }
}
