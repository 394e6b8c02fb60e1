use chrono::{Datelike, Duration, TimeZone, Timelike, Utc};
use criterion::{black_box, criterion_group, criterion_main, Criterion};
use nsrdb_pv::{CsvTableParser, EnergyModel, Location, PvWattsModel, RawTable, SystemDescription};

/// One non-leap year of hourly rows in the PSM3 export layout.
fn synthetic_year() -> RawTable {
    let mut text = String::from(
        "Source,Location ID,City,State,Country,Latitude,Longitude,Time Zone,Elevation\n\
         NSRDB,149190,-,-,-,35.02,-106.65,0,1619\n\
         Year,Month,Day,Hour,Minute,GHI,DHI,DNI,Wind Speed,Temperature,Solar Zenith Angle\n",
    );
    let start = Utc.with_ymd_and_hms(2021, 1, 1, 0, 0, 0).unwrap();
    for i in 0..8760 {
        let t = start + Duration::hours(i);
        let day = (f64::from(t.hour()) - 12.0).abs() < 6.0;
        let (ghi, dhi, dni) = if day { (650.0, 95.0, 720.0) } else { (0.0, 0.0, 0.0) };
        text.push_str(&format!(
            "{},{},{},{},0,{ghi},{dhi},{dni},{:.1},{:.1},{:.2}\n",
            t.year(),
            t.month(),
            t.day(),
            t.hour(),
            2.0 + (i % 7) as f64 * 0.3,
            15.0 + (i % 24) as f64 * 0.5,
            if day { 45.0 } else { 110.0 },
        ));
    }
    RawTable::new(text)
}

fn bench_parse(c: &mut Criterion) {
    let raw = synthetic_year();
    let parser = CsvTableParser::new().with_expected_interval(60);
    c.bench_function("parse_hourly_year", |b| {
        b.iter(|| parser.parse(black_box(&raw)).unwrap())
    });

    let weather = parser.parse(&raw).unwrap();
    let location = Location::new(35.02, -106.65);
    let system = SystemDescription::default();
    c.bench_function("simulate_hourly_year", |b| {
        b.iter(|| {
            PvWattsModel::default()
                .simulate(&location, black_box(&weather), &system)
                .unwrap()
        })
    });
}

criterion_group!(benches, bench_parse);
criterion_main!(benches);
