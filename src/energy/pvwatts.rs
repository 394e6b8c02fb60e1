use crate::dataset::weather_dataset::WeatherDataset;
use crate::energy::error::SimulationError;
use crate::energy::model::{EnergyModel, SimulationResults, SystemDescription};
use crate::energy::solar_position::{cos_incidence, solar_position};
use crate::types::attribute::Attribute;
use crate::types::location::Location;
use log::{info, warn};

/// Air temperature assumed when the dataset has no temperature column, °C.
pub const DEFAULT_AIR_TEMPERATURE_C: f64 = 20.0;
/// Wind speed assumed when the dataset has no wind column, m/s.
pub const DEFAULT_WIND_SPEED_MS: f64 = 0.0;

const STC_IRRADIANCE: f64 = 1000.0;
const STC_CELL_TEMPERATURE: f64 = 25.0;

/// PVWatts-style model: isotropic-sky transposition, Faiman cell temperature, linear
/// temperature derate and a flat-efficiency inverter clipped at the DC rating.
///
/// # Examples
///
/// ```
/// use chrono::{TimeZone, Utc};
/// use nsrdb_pv::{EnergyModel, Location, PvWattsModel, SystemDescription, WeatherDataset};
///
/// let noon = Utc.with_ymd_and_hms(2020, 6, 21, 19, 0, 0).unwrap();
/// let weather = WeatherDataset::new(
///     vec![noon],
///     vec![
///         ("ghi".to_string(), vec![1000.0]),
///         ("dhi".to_string(), vec![100.0]),
///         ("dni".to_string(), vec![920.0]),
///     ],
/// )?;
/// let results = PvWattsModel::default().simulate(
///     &Location::new(35.02, -106.65),
///     &weather,
///     &SystemDescription::default(),
/// )?;
/// assert!(results.ac_power()[0] > 150.0);
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PvWattsModel {
    faiman_u0: f64,
    faiman_u1: f64,
}

impl Default for PvWattsModel {
    fn default() -> Self {
        Self {
            faiman_u0: 25.0,
            faiman_u1: 6.84,
        }
    }
}

impl PvWattsModel {
    fn cell_temperature(&self, poa: f64, air_temperature: f64, wind_speed: f64) -> f64 {
        air_temperature + poa / (self.faiman_u0 + self.faiman_u1 * wind_speed.max(0.0))
    }
}

fn required(weather: &WeatherDataset, attribute: Attribute) -> Result<&[f64], SimulationError> {
    weather
        .attribute(attribute)
        .ok_or(SimulationError::MissingColumn(attribute))
}

fn optional(weather: &WeatherDataset, attribute: Attribute, fallback: f64) -> Vec<f64> {
    match weather.attribute(attribute) {
        Some(values) => values.to_vec(),
        None => {
            warn!(
                "Weather data has no '{}' column; assuming {} for every row",
                attribute.header_label(),
                fallback
            );
            vec![fallback; weather.len()]
        }
    }
}

impl EnergyModel for PvWattsModel {
    fn simulate(
        &self,
        location: &Location,
        weather: &WeatherDataset,
        system: &SystemDescription,
    ) -> Result<SimulationResults, SimulationError> {
        system.validate()?;
        if weather.is_empty() {
            return Err(SimulationError::EmptyWeather);
        }

        let ghi = required(weather, Attribute::Ghi)?;
        let dhi = required(weather, Attribute::Dhi)?;
        let dni = required(weather, Attribute::Dni)?;
        let air_temperature = optional(weather, Attribute::AirTemperature, DEFAULT_AIR_TEMPERATURE_C);
        let wind_speed = optional(weather, Attribute::WindSpeed, DEFAULT_WIND_SPEED_MS);
        let zenith = weather.attribute(Attribute::SolarZenithAngle);

        let tilt = system.surface_tilt_for(location);
        let cos_tilt = tilt.to_radians().cos();
        let sky_view = (1.0 + cos_tilt) / 2.0;
        let ground_view = (1.0 - cos_tilt) / 2.0;
        let pdc0 = system.dc_capacity_kw() * 1000.0;
        let gamma = system.temperature_coefficient_pct() / 100.0;

        let n = weather.len();
        let mut poa_global = Vec::with_capacity(n);
        let mut cell_temperature = Vec::with_capacity(n);
        let mut dc_power = Vec::with_capacity(n);
        let mut ac_power = Vec::with_capacity(n);

        for (row, timestamp) in weather.time_index().iter().enumerate() {
            let mut sun = solar_position(*timestamp, location.coordinate());
            if let Some(zenith) = zenith {
                sun.zenith_deg = zenith[row];
            }

            let beam = if sun.is_day() {
                dni[row].max(0.0)
                    * cos_incidence(sun, tilt, system.surface_azimuth_deg()).max(0.0)
            } else {
                0.0
            };
            let poa = beam
                + dhi[row].max(0.0) * sky_view
                + ghi[row].max(0.0) * system.albedo() * ground_view;

            let t_cell = self.cell_temperature(poa, air_temperature[row], wind_speed[row]);
            let dc = (pdc0 * poa / STC_IRRADIANCE * (1.0 + gamma * (t_cell - STC_CELL_TEMPERATURE)))
                .max(0.0);
            let ac = (dc * system.inverter_efficiency()).min(pdc0);

            poa_global.push(poa);
            cell_temperature.push(t_cell);
            dc_power.push(dc);
            ac_power.push(ac);
        }

        let step_hours = weather
            .interval()
            .map_or(1.0, |step| step.num_seconds() as f64 / 3600.0);
        let results = SimulationResults::new(
            weather.time_index().to_vec(),
            poa_global,
            cell_temperature,
            dc_power,
            ac_power,
            step_hours,
        );
        info!(
            "Simulated {} rows for '{}' (tilt {:.1}, azimuth {:.1}): {:.2} kWh AC, peak {:.1} W",
            results.len(),
            location.name(),
            tilt,
            system.surface_azimuth_deg(),
            results.annual_ac_kwh(),
            results.peak_ac_power()
        );
        Ok(results)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{DateTime, Duration, TimeZone, Utc};

    fn hours(n: usize) -> Vec<DateTime<Utc>> {
        let start = Utc.with_ymd_and_hms(2020, 6, 21, 12, 0, 0).unwrap();
        (0..n).map(|i| start + Duration::hours(i as i64)).collect()
    }

    fn weather(columns: &[(&str, Vec<f64>)]) -> WeatherDataset {
        let n = columns[0].1.len();
        WeatherDataset::new(
            hours(n),
            columns
                .iter()
                .map(|(name, values)| (name.to_string(), values.clone()))
                .collect(),
        )
        .unwrap()
    }

    fn site() -> Location {
        Location::new(35.02, -106.65)
    }

    #[test]
    fn test_missing_irradiance_column() {
        let data = weather(&[("ghi", vec![500.0]), ("dni", vec![400.0])]);
        let err = PvWattsModel::default()
            .simulate(&site(), &data, &SystemDescription::default())
            .unwrap_err();
        assert!(matches!(err, SimulationError::MissingColumn(Attribute::Dhi)));
    }

    #[test]
    fn test_horizontal_array_matches_hand_calculation() -> Result<(), SimulationError> {
        let data = weather(&[
            ("ghi", vec![879.4228634059948]),
            ("dhi", vec![100.0]),
            ("dni", vec![900.0]),
            ("temperature", vec![25.0]),
            ("wind speed", vec![0.0]),
            ("solar zenith angle", vec![30.0]),
        ]);
        let system = SystemDescription::builder().surface_tilt_deg(0.0).build();
        let results = PvWattsModel::default().simulate(&site(), &data, &system)?;

        let poa = 900.0 * 30f64.to_radians().cos() + 100.0;
        let t_cell = 25.0 + poa / 25.0;
        let dc = 220.0 * poa / 1000.0 * (1.0 - 0.0047 * (t_cell - 25.0));
        assert!((results.poa_global()[0] - poa).abs() < 1e-9);
        assert!((results.cell_temperature()[0] - t_cell).abs() < 1e-9);
        assert!((results.dc_power()[0] - dc).abs() < 1e-9);
        assert!((results.ac_power()[0] - dc * 0.96).abs() < 1e-9);
        Ok(())
    }

    #[test]
    fn test_night_and_defaults() -> Result<(), SimulationError> {
        let data = weather(&[
            ("ghi", vec![0.0, 0.0]),
            ("dhi", vec![0.0, 0.0]),
            ("dni", vec![0.0, 0.0]),
            ("solar zenith angle", vec![120.0, 110.0]),
        ]);
        let results =
            PvWattsModel::default().simulate(&site(), &data, &SystemDescription::default())?;
        assert_eq!(results.ac_power(), [0.0, 0.0]);
        assert_eq!(results.cell_temperature(), [DEFAULT_AIR_TEMPERATURE_C; 2]);
        assert_eq!(results.annual_ac_kwh(), 0.0);
        Ok(())
    }

    #[test]
    fn test_ac_is_clipped_at_dc_rating() -> Result<(), SimulationError> {
        let data = weather(&[
            ("ghi", vec![1200.0]),
            ("dhi", vec![1200.0]),
            ("dni", vec![0.0]),
            ("temperature", vec![-40.0]),
            ("wind speed", vec![10.0]),
        ]);
        let system = SystemDescription::builder()
            .dc_capacity_kw(1.0)
            .surface_tilt_deg(0.0)
            .inverter_efficiency(1.0)
            .build();
        let results = PvWattsModel::default().simulate(&site(), &data, &system)?;
        assert!(results.dc_power()[0] > 1000.0);
        assert_eq!(results.ac_power()[0], 1000.0);
        Ok(())
    }

    #[test]
    fn test_energy_uses_dataset_interval() -> Result<(), SimulationError> {
        let data = weather(&[
            ("ghi", vec![0.0, 0.0, 0.0]),
            ("dhi", vec![500.0, 500.0, 500.0]),
            ("dni", vec![0.0, 0.0, 0.0]),
            ("temperature", vec![25.0, 25.0, 25.0]),
        ]);
        let system = SystemDescription::builder().surface_tilt_deg(0.0).build();
        let results = PvWattsModel::default().simulate(&site(), &data, &system)?;
        assert_eq!(results.len(), 3);
        assert_eq!(results.step_hours(), 1.0);
        let expected: f64 = results.ac_power().iter().sum::<f64>() / 1000.0;
        assert!((results.annual_ac_kwh() - expected).abs() < 1e-12);
        assert!(results.annual_ac_kwh() > 0.0);
        Ok(())
    }

    #[test]
    fn test_invalid_system_is_rejected() {
        let data = weather(&[("ghi", vec![0.0]), ("dhi", vec![0.0]), ("dni", vec![0.0])]);
        let system = SystemDescription::builder().albedo(2.0).build();
        assert!(matches!(
            PvWattsModel::default().simulate(&site(), &data, &system),
            Err(SimulationError::InvalidSystem(_))
        ));
    }
}
