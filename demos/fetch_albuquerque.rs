//! Downloads one year of hourly PSM3 data for Albuquerque and prints a short summary.
//!
//! Credentials come from the config file or `NSRDB_API_KEY` / `NSRDB_EMAIL`.

use nsrdb_pv::{Attribute, EnergyModel, Location, Nsrdb, NsrdbError, PvWattsModel, SystemDescription};

fn main() -> Result<(), NsrdbError> {
    env_logger::init();
    let client = Nsrdb::from_default_config()?;
    let site = Location::new(35.02, -106.65)
        .with_altitude(1619.0)
        .with_name("albuquerque");

    let weather = client
        .weather()
        .location(site.clone())
        .year(2020)
        .call()?;

    println!(
        "{} records from {:?} to {:?}",
        weather.len(),
        weather.first_timestamp(),
        weather.last_timestamp()
    );
    if let Some(ghi) = weather.attribute(Attribute::Ghi) {
        let insolation: f64 = ghi.iter().sum::<f64>() / 1000.0;
        println!("Horizontal insolation: {insolation:.0} kWh/m2");
    }

    let system = SystemDescription::builder().dc_capacity_kw(5.0).build();
    let results = PvWattsModel::default().simulate(&site, &weather, &system)?;
    println!("5 kW array: {:.0} kWh AC", results.annual_ac_kwh());

    Ok(())
}
