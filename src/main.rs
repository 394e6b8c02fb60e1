use clap::Parser;
use log::{error, info};
use nsrdb_pv::{
    Attribute, Config, EnergyModel, Location, Nsrdb, NsrdbError, PvWattsModel,
    SystemDescription, WeatherDataset,
};
use std::error::Error;
use std::fs::{self, File};
use std::io::BufWriter;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

#[derive(Parser, Debug)]
#[command(name = "nsrdb-pv", version)]
#[command(about = "Download NSRDB PSM3 irradiance data and estimate PV output", long_about = None)]
struct Cli {
    /// Directory for the output CSV files
    #[arg(long, default_value = "./")]
    filepath: PathBuf,

    /// The year for which to pull data
    #[arg(long)]
    year: i32,

    /// NSRDB API key (overrides config file and NSRDB_API_KEY)
    #[arg(long)]
    api_key: Option<String>,

    /// Email address associated with the API key
    #[arg(long)]
    email: Option<String>,

    /// Name sent as `full_name`
    #[arg(long)]
    username: Option<String>,

    /// Latitude of the site, decimal degrees
    #[arg(long, allow_negative_numbers = true)]
    latitude: f64,

    /// Longitude of the site, decimal degrees
    #[arg(long, allow_negative_numbers = true)]
    longitude: f64,

    /// Altitude of the site, metres
    #[arg(long, allow_negative_numbers = true)]
    altitude: Option<f64>,

    /// Name of the site
    #[arg(long, default_value = Location::DEFAULT_NAME)]
    name: String,

    /// Comma-separated attributes to request, e.g. ghi,dhi,dni,air_temperature
    #[arg(long, value_delimiter = ',')]
    attributes: Option<Vec<Attribute>>,

    /// Sampling interval in minutes (30 or 60)
    #[arg(long)]
    interval: Option<u32>,

    /// JSON config file (defaults to the user config directory)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Parse a previously saved CSV export instead of downloading
    #[arg(long)]
    input: Option<PathBuf>,

    /// Request timeout in seconds, 0 for none
    #[arg(long)]
    timeout: Option<u64>,
}

impl Cli {
    fn load_config(&self) -> Result<Config, NsrdbError> {
        let config = match &self.config {
            Some(path) => Config::load(path)?,
            None => Config::load_default()?,
        };
        let mut config = config.with_env_overrides();
        if let Some(api_key) = &self.api_key {
            config.credentials.api_key = api_key.clone();
        }
        if let Some(email) = &self.email {
            config.credentials.email = email.clone();
        }
        if let Some(username) = &self.username {
            config.credentials.username = username.clone();
        }
        if let Some(timeout) = self.timeout {
            config.timeout_secs = timeout;
        }
        Ok(config)
    }

    fn location(&self) -> Location {
        let location = Location::new(self.latitude, self.longitude).with_name(self.name.clone());
        match self.altitude {
            Some(altitude) => location.with_altitude(altitude),
            None => location,
        }
    }
}

fn create_output(path: &Path) -> Result<BufWriter<File>, NsrdbError> {
    File::create(path)
        .map(BufWriter::new)
        .map_err(|e| NsrdbError::Output(path.to_path_buf(), e))
}

fn load_weather(cli: &Cli, location: &Location) -> Result<WeatherDataset, NsrdbError> {
    if let Some(input) = &cli.input {
        return Nsrdb::parse_file(input);
    }
    let client = Nsrdb::new(cli.load_config()?)?;
    client
        .weather()
        .location(location.clone())
        .year(cli.year)
        .maybe_attributes(cli.attributes.clone())
        .maybe_interval_minutes(cli.interval)
        .call()
}

fn run(cli: &Cli) -> Result<(), NsrdbError> {
    let location = cli.location();
    let weather = load_weather(cli, &location)?;

    fs::create_dir_all(&cli.filepath).map_err(|e| NsrdbError::Output(cli.filepath.clone(), e))?;

    let weather_path = cli.filepath.join(format!("weather_{}.csv", cli.year));
    weather.write_csv(create_output(&weather_path)?)?;
    info!("Wrote {} records to {}", weather.len(), weather_path.display());

    let results =
        PvWattsModel::default().simulate(&location, &weather, &SystemDescription::default())?;
    let simulation_path = cli.filepath.join(format!("simulation_{}.csv", cli.year));
    results.write_csv(create_output(&simulation_path)?)?;
    info!("Wrote simulation results to {}", simulation_path.display());

    info!(
        "Annual AC energy for '{}' in {}: {:.2} kWh",
        location.name(),
        cli.year,
        results.annual_ac_kwh()
    );
    Ok(())
}

/// Lines printed to stderr for a failed run: the error, then each cause that the
/// previous message does not already contain.
fn failure_report(err: &NsrdbError) -> Vec<String> {
    let mut report = vec![format!("error: {err}")];
    let mut message = err.to_string();
    let mut source = err.source();
    while let Some(cause) = source {
        let text = cause.to_string();
        // Stage wrappers repeat their inner message.
        if !message.contains(&text) {
            report.push(format!("  caused by: {text}"));
        }
        message = text;
        source = cause.source();
    }
    report
}

fn exit_status(result: &Result<(), NsrdbError>) -> u8 {
    match result {
        Ok(()) => 0,
        Err(_) => 1,
    }
}

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let cli = Cli::parse();

    let result = run(&cli);
    if let Err(err) = &result {
        error!("{err}");
        for line in failure_report(err) {
            eprintln!("{line}");
        }
    }
    ExitCode::from(exit_status(&result))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::{tempdir, NamedTempFile};

    fn cli_for(input: &Path, output_dir: &Path) -> Cli {
        Cli::try_parse_from([
            "nsrdb-pv",
            "--year",
            "2020",
            "--latitude",
            "35.02",
            "--longitude=-106.65",
            "--input",
            input.to_str().unwrap(),
            "--filepath",
            output_dir.to_str().unwrap(),
        ])
        .unwrap()
    }

    fn saved_export(body: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(body.as_bytes()).unwrap();
        file
    }

    #[test]
    fn test_missing_input_reports_cause_and_fails() {
        let out = tempdir().unwrap();
        let cli = cli_for(Path::new("/definitely/not/here.csv"), out.path());
        let result = run(&cli);
        assert!(matches!(result, Err(NsrdbError::Input(..))));
        assert_eq!(exit_status(&result), 1);

        let report = failure_report(result.as_ref().unwrap_err());
        assert_eq!(report.len(), 2);
        assert!(report[0].starts_with("error: input: failed to read '/definitely/not/here.csv'"));
        assert!(report[1].starts_with("  caused by: "));
    }

    #[test]
    fn test_parse_failure_is_reported_once() {
        let out = tempdir().unwrap();
        let input = saved_export(
            "Source,Latitude\nNSRDB,35.02\nYear,Month,Day,Hour,Minute,GHI\n2020,1,1,0,0,bad\n",
        );
        let result = run(&cli_for(input.path(), out.path()));
        assert_eq!(exit_status(&result), 1);

        let report = failure_report(result.as_ref().unwrap_err());
        assert_eq!(report.len(), 1);
        assert!(report[0].starts_with("error: parse: "));
        assert!(report[0].contains("line 4"));
    }

    #[test]
    fn test_saved_export_writes_both_outputs() {
        let out = tempdir().unwrap();
        let input = saved_export(
            "Source,Latitude\nNSRDB,35.02\nYear,Month,Day,Hour,Minute,GHI,DHI,DNI\n\
             2020,6,1,18,0,900,120,850\n2020,6,1,19,0,950,125,880\n",
        );
        let result = run(&cli_for(input.path(), out.path()));
        assert_eq!(exit_status(&result), 0);
        assert!(out.path().join("weather_2020.csv").is_file());
        assert!(out.path().join("simulation_2020.csv").is_file());
    }
}
