//! The seam between weather data and a PV performance model.

use crate::dataset::weather_dataset::{WeatherDataset, COL_DATETIME, CSV_DATETIME_FORMAT};
use crate::energy::error::SimulationError;
use crate::types::location::Location;
use bon::Builder;
use chrono::{DateTime, NaiveDateTime, Utc};
use polars::prelude::*;
use std::io::Write;

/// DC rating of the reference module (Canadian Solar CS5P-220M), kW.
pub const DEFAULT_DC_CAPACITY_KW: f64 = 0.22;

pub const COL_POA_GLOBAL: &str = "poa_global";
pub const COL_CELL_TEMPERATURE: &str = "cell_temperature";
pub const COL_DC_POWER: &str = "dc_power";
pub const COL_AC_POWER: &str = "ac_power";

/// Runs a PV system against a weather dataset.
///
/// Implementations must not mutate or reorder the weather data; results are aligned
/// row-for-row with the dataset's time index.
pub trait EnergyModel {
    fn simulate(
        &self,
        location: &Location,
        weather: &WeatherDataset,
        system: &SystemDescription,
    ) -> Result<SimulationResults, SimulationError>;
}

/// A fixed-mount PV array with a single inverter.
///
/// # Examples
///
/// ```
/// use nsrdb_pv::{Location, SystemDescription};
///
/// let system = SystemDescription::builder()
///     .dc_capacity_kw(5.0)
///     .surface_azimuth_deg(170.0)
///     .build();
///
/// // Tilt defaults to the site's absolute latitude.
/// assert_eq!(system.surface_tilt_for(&Location::new(-33.9, 18.4)), 33.9);
/// assert_eq!(system.inverter_efficiency(), 0.96);
/// ```
#[derive(Debug, Clone, PartialEq, Builder)]
pub struct SystemDescription {
    #[builder(default = DEFAULT_DC_CAPACITY_KW)]
    dc_capacity_kw: f64,
    /// Degrees from horizontal. `None` means "tilt equal to |latitude|".
    surface_tilt_deg: Option<f64>,
    /// Degrees clockwise from north; 180 faces due south.
    #[builder(default = 180.0)]
    surface_azimuth_deg: f64,
    /// Relative change in DC power per °C of cell temperature above 25 °C, in percent.
    #[builder(default = -0.47)]
    temperature_coefficient_pct: f64,
    #[builder(default = 0.96)]
    inverter_efficiency: f64,
    #[builder(default = 0.2)]
    albedo: f64,
}

impl Default for SystemDescription {
    fn default() -> Self {
        Self::builder().build()
    }
}

impl SystemDescription {
    pub fn dc_capacity_kw(&self) -> f64 {
        self.dc_capacity_kw
    }

    pub fn surface_tilt_deg(&self) -> Option<f64> {
        self.surface_tilt_deg
    }

    /// Tilt used at `location`.
    pub fn surface_tilt_for(&self, location: &Location) -> f64 {
        self.surface_tilt_deg
            .unwrap_or_else(|| location.latitude().abs())
    }

    pub fn surface_azimuth_deg(&self) -> f64 {
        self.surface_azimuth_deg
    }

    pub fn temperature_coefficient_pct(&self) -> f64 {
        self.temperature_coefficient_pct
    }

    pub fn inverter_efficiency(&self) -> f64 {
        self.inverter_efficiency
    }

    pub fn albedo(&self) -> f64 {
        self.albedo
    }

    /// Checks that every parameter is finite and physically meaningful.
    pub fn validate(&self) -> Result<(), SimulationError> {
        let invalid = |what: String| Err(SimulationError::InvalidSystem(what));
        if !(self.dc_capacity_kw.is_finite() && self.dc_capacity_kw > 0.0) {
            return invalid(format!(
                "dc capacity must be positive, got {} kW",
                self.dc_capacity_kw
            ));
        }
        if let Some(tilt) = self.surface_tilt_deg {
            if !(0.0..=90.0).contains(&tilt) {
                return invalid(format!("tilt must be within 0..=90 degrees, got {tilt}"));
            }
        }
        if !(0.0..360.0).contains(&self.surface_azimuth_deg) {
            return invalid(format!(
                "azimuth must be within 0..360 degrees, got {}",
                self.surface_azimuth_deg
            ));
        }
        if !self.temperature_coefficient_pct.is_finite() {
            return invalid("temperature coefficient must be finite".to_string());
        }
        if !(self.inverter_efficiency > 0.0 && self.inverter_efficiency <= 1.0) {
            return invalid(format!(
                "inverter efficiency must be within (0, 1], got {}",
                self.inverter_efficiency
            ));
        }
        if !(0.0..=1.0).contains(&self.albedo) {
            return invalid(format!("albedo must be within 0..=1, got {}", self.albedo));
        }
        Ok(())
    }
}

/// Per-timestamp model output, aligned with the weather dataset it was computed from.
///
/// Powers are in W, irradiance in W/m², temperatures in °C.
#[derive(Debug, Clone, PartialEq)]
pub struct SimulationResults {
    index: Vec<DateTime<Utc>>,
    poa_global: Vec<f64>,
    cell_temperature: Vec<f64>,
    dc_power: Vec<f64>,
    ac_power: Vec<f64>,
    step_hours: f64,
}

impl SimulationResults {
    pub(crate) fn new(
        index: Vec<DateTime<Utc>>,
        poa_global: Vec<f64>,
        cell_temperature: Vec<f64>,
        dc_power: Vec<f64>,
        ac_power: Vec<f64>,
        step_hours: f64,
    ) -> Self {
        Self {
            index,
            poa_global,
            cell_temperature,
            dc_power,
            ac_power,
            step_hours,
        }
    }

    pub fn len(&self) -> usize {
        self.index.len()
    }

    pub fn is_empty(&self) -> bool {
        self.index.is_empty()
    }

    pub fn time_index(&self) -> &[DateTime<Utc>] {
        &self.index
    }

    pub fn poa_global(&self) -> &[f64] {
        &self.poa_global
    }

    pub fn cell_temperature(&self) -> &[f64] {
        &self.cell_temperature
    }

    pub fn dc_power(&self) -> &[f64] {
        &self.dc_power
    }

    pub fn ac_power(&self) -> &[f64] {
        &self.ac_power
    }

    /// Duration each sample stands for, in hours.
    pub fn step_hours(&self) -> f64 {
        self.step_hours
    }

    /// Total AC energy over the simulated period, kWh.
    pub fn annual_ac_kwh(&self) -> f64 {
        self.ac_power.iter().sum::<f64>() * self.step_hours / 1000.0
    }

    pub fn peak_ac_power(&self) -> f64 {
        self.ac_power.iter().copied().fold(0.0, f64::max)
    }

    pub fn to_dataframe(&self) -> Result<DataFrame, SimulationError> {
        let datetimes: Vec<NaiveDateTime> = self.index.iter().map(|t| t.naive_utc()).collect();
        let df = DataFrame::new(vec![
            Column::from(Series::new(COL_DATETIME.into(), datetimes)),
            Column::from(Series::new(COL_POA_GLOBAL.into(), self.poa_global.as_slice())),
            Column::from(Series::new(
                COL_CELL_TEMPERATURE.into(),
                self.cell_temperature.as_slice(),
            )),
            Column::from(Series::new(COL_DC_POWER.into(), self.dc_power.as_slice())),
            Column::from(Series::new(COL_AC_POWER.into(), self.ac_power.as_slice())),
        ])?;
        Ok(df)
    }

    pub fn write_csv<W: Write>(&self, writer: W) -> Result<(), SimulationError> {
        let mut df = self.to_dataframe()?;
        CsvWriter::new(writer)
            .include_header(true)
            .with_datetime_format(Some(CSV_DATETIME_FORMAT.to_string()))
            .finish(&mut df)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_defaults() {
        let system = SystemDescription::default();
        assert_eq!(system.dc_capacity_kw(), DEFAULT_DC_CAPACITY_KW);
        assert_eq!(system.surface_tilt_deg(), None);
        assert_eq!(system.surface_tilt_for(&Location::new(35.02, -106.65)), 35.02);
        assert_eq!(system.surface_azimuth_deg(), 180.0);
        assert_eq!(system.temperature_coefficient_pct(), -0.47);
        assert_eq!(system.albedo(), 0.2);
        assert!(system.validate().is_ok());
    }

    #[test]
    fn test_validation() {
        let cases = [
            SystemDescription::builder().dc_capacity_kw(0.0).build(),
            SystemDescription::builder().surface_tilt_deg(95.0).build(),
            SystemDescription::builder().surface_azimuth_deg(360.0).build(),
            SystemDescription::builder().inverter_efficiency(1.2).build(),
            SystemDescription::builder().albedo(-0.1).build(),
            SystemDescription::builder()
                .temperature_coefficient_pct(f64::NAN)
                .build(),
        ];
        for system in cases {
            assert!(
                matches!(system.validate(), Err(SimulationError::InvalidSystem(_))),
                "{system:?} should be rejected"
            );
        }
    }

    #[test]
    fn test_results_energy_and_frame() -> Result<(), SimulationError> {
        let start = Utc.with_ymd_and_hms(2020, 6, 1, 11, 0, 0).unwrap();
        let index = vec![start, start + chrono::Duration::hours(1)];
        let results = SimulationResults::new(
            index,
            vec![800.0, 900.0],
            vec![45.0, 48.0],
            vec![170.0, 190.0],
            vec![160.0, 180.0],
            1.0,
        );
        assert_eq!(results.len(), 2);
        assert!((results.annual_ac_kwh() - 0.34).abs() < 1e-12);
        assert_eq!(results.peak_ac_power(), 180.0);

        let df = results.to_dataframe()?;
        assert_eq!(df.height(), 2);
        assert_eq!(
            df.get_column_names_str(),
            [COL_DATETIME, COL_POA_GLOBAL, COL_CELL_TEMPERATURE, COL_DC_POWER, COL_AC_POWER]
        );

        let mut out = Vec::new();
        results.write_csv(&mut out)?;
        let text = String::from_utf8(out).unwrap();
        assert!(text.starts_with("datetime,poa_global,cell_temperature,dc_power,ac_power\n"));
        assert!(text.contains("2020-06-01T12:00:00Z"));
        Ok(())
    }
}
