//! Parses a saved PSM3 CSV export given on the command line and prints the first rows.

use nsrdb_pv::{Nsrdb, NsrdbError};
use std::env;
use std::process::ExitCode;

fn main() -> Result<ExitCode, NsrdbError> {
    let Some(path) = env::args().nth(1) else {
        eprintln!("usage: parse_saved_csv <export.csv>");
        return Ok(ExitCode::FAILURE);
    };
    let weather = Nsrdb::parse_file(&path)?;
    println!("columns: {:?}", weather.column_names());

    for record in weather.records().take(5) {
        let values: Vec<String> = record
            .values()
            .map(|(name, value)| format!("{name}={value}"))
            .collect();
        println!("{} {}", record.timestamp(), values.join(" "));
    }

    let df = weather.to_dataframe()?;
    println!("{df}");
    Ok(ExitCode::SUCCESS)
}
