//! Integration tests: load a small XEphem catalog from disk, compute the sky
//! for known observers and check ordering, ranges and error reporting.

use std::io::Write;

use approx::assert_abs_diff_eq;
use chrono::{DateTime, TimeZone, Utc};
use skycat::{CatalogMode, Location, SkyCatalog, SkyError};
use tempfile::NamedTempFile;

const BRIGHT_STARS: &str = "\
# name, type, ra, dec, mag, epoch
Polaris|POL,f|S|F7,02:31:49|x,+89:15:51|y,1.98,2000
Sirius,f|S|A1,06:45:08.9,-16:42:58,-1.44,2000

Vega,f|S|A0,18:36:56.3,+38:47:01,0.03,2000
Betelgeuse,f|S|M2,05:55:10.3,+07:24:25,0.50,2000
HR 1234,f|S|K0,04:00:00,+20:00:00,6.20,2000
";

fn write_catalog(contents: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().expect("Failed to create temp file");
    file.write_all(contents.as_bytes())
        .expect("Failed to write catalog");
    file.flush().expect("Failed to flush catalog");
    file
}

fn zurich() -> Location {
    Location::from_degrees(47.37, 8.54, 408.0)
}

fn evening() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2016, 3, 14, 22, 30, 0).unwrap()
}

#[test]
fn test_full_catalog_order() {
    let _ = tracing_subscriber::fmt().with_env_filter("debug").try_init();

    let file = write_catalog(BRIGHT_STARS);
    let mut catalog = SkyCatalog::new(&CatalogMode::Full {
        catalog_path: file.path().to_path_buf(),
    })
    .expect("Failed to load catalog");
    assert_eq!(catalog.stars().map(|s| s.len()), Some(5));

    catalog.set_location(zurich());
    catalog.set_time(evening());
    let set = catalog.calculate().expect("calculate failed");

    let names: Vec<Option<&str>> = set.iter().map(|o| o.name).collect();
    assert_eq!(
        names,
        [
            Some("Sun"),
            Some("Moon"),
            Some("Saturn"),
            Some("Jupiter"),
            Some("Mars"),
            Some("Venus"),
            Some("Polaris"),
            Some("Sirius"),
            Some("Vega"),
            Some("Betelgeuse"),
            Some("HR 1234"),
        ]
    );

    for obj in set.iter() {
        assert!((-90.0..=90.0).contains(&obj.alt_deg), "{:?}", obj);
        assert!((0.0..360.0).contains(&obj.az_deg), "{:?}", obj);
    }

    // star magnitudes pass straight through from the file
    assert_abs_diff_eq!(set.magnitudes[6], 1.98);
    assert_abs_diff_eq!(set.magnitudes[7], -1.44);
}

#[test]
fn test_polaris_sits_at_observer_latitude() {
    let file = write_catalog(BRIGHT_STARS);
    let mut catalog = SkyCatalog::load(file.path()).unwrap();
    catalog.set_location(zurich());

    for hour in [0, 6, 12, 18] {
        catalog.set_time(Utc.with_ymd_and_hms(2020, 1, 1, hour, 0, 0).unwrap());
        let set = catalog.calculate().unwrap();
        let polaris = set.get(6).unwrap();
        assert_eq!(polaris.name, Some("Polaris"));
        // within a degree of the pole, which sits at the latitude
        assert_abs_diff_eq!(polaris.alt_deg, 47.37, epsilon = 1.0);
        let az = polaris.az_deg.to_radians();
        assert!(az.cos() > 0.999, "Polaris azimuth {}", polaris.az_deg);
    }
}

#[test]
fn test_repeated_calculate_does_not_grow() {
    let file = write_catalog(BRIGHT_STARS);
    let mut catalog = SkyCatalog::load(file.path()).unwrap();
    catalog.set_location(zurich());
    catalog.set_time(evening());

    let first = catalog.calculate().unwrap().clone();
    let second = catalog.calculate().unwrap().clone();
    assert_eq!(first.len(), 11);
    assert_eq!(first, second);

    catalog.set_time(Utc.with_ymd_and_hms(2016, 3, 15, 4, 0, 0).unwrap());
    let later = catalog.calculate().unwrap();
    assert_eq!(later.len(), 11);
    assert_ne!(later.altitudes_deg, first.altitudes_deg);
}

#[test]
fn test_filter_visible_bright() {
    let file = write_catalog(BRIGHT_STARS);
    let mut catalog = SkyCatalog::load(file.path()).unwrap();
    catalog.set_location(zurich());
    catalog.set_time(evening());
    catalog.calculate().unwrap();

    let visible = catalog.filter(0.0, 5.0).unwrap();
    assert!(!visible.is_empty());
    for obj in visible.iter() {
        assert!(obj.alt_deg >= 0.0);
        assert!(obj.mag < 5.0);
        assert_ne!(obj.name, Some("HR 1234"));
        assert_ne!(obj.name, Some("Sun"), "the Sun is down at 22:30 in March");
    }
    assert!(visible.iter().any(|o| o.name == Some("Polaris")));

    // filtering a filtered set changes nothing
    assert_eq!(visible.filter(0.0, 5.0), visible);
}

#[test]
fn test_sun_only_across_observers() {
    let sites = [
        Location::from_degrees(0.0, 0.0, 0.0),
        Location::from_degrees(-33.9, 18.4, 10.0),
        Location::from_degrees(78.2, 15.6, 5.0),
        Location::from_degrees(-77.8, 166.7, 20.0),
        Location::from_degrees(19.8, -155.5, 4200.0),
    ];
    let times = [
        Utc.with_ymd_and_hms(2000, 1, 1, 12, 0, 0).unwrap(),
        Utc.with_ymd_and_hms(2016, 6, 21, 0, 0, 0).unwrap(),
        Utc.with_ymd_and_hms(2024, 12, 31, 18, 45, 0).unwrap(),
    ];

    let mut catalog = SkyCatalog::new(&CatalogMode::SunOnly).unwrap();
    for site in &sites {
        for time in &times {
            catalog.set_location(*site);
            catalog.set_time(*time);
            let set = catalog.calculate().unwrap();
            assert_eq!(set.len(), 1);
            let sun = set.get(0).unwrap();
            assert_eq!(sun.name, Some("Sun"));
            assert!((-90.0..=90.0).contains(&sun.alt_deg));
            assert!((0.0..360.0).contains(&sun.az_deg));
            assert_abs_diff_eq!(sun.mag, -26.74, epsilon = 0.05);
        }
    }
}

#[test]
fn test_equinox_noon_sun_overhead() {
    let mut catalog = SkyCatalog::sun_only();
    catalog.set_location(Location::from_degrees(0.0, 0.0, 0.0));
    // solar noon at Greenwich runs about seven minutes late on the equinox
    catalog.set_time(Utc.with_ymd_and_hms(2016, 3, 20, 12, 7, 0).unwrap());
    let sun = catalog.calculate().unwrap().get(0).unwrap();
    assert_abs_diff_eq!(sun.alt_deg, 90.0, epsilon = 1.0);
}

#[test]
fn test_moon_only() {
    let mut catalog = SkyCatalog::new(&CatalogMode::MoonOnly).unwrap();
    assert!(catalog.stars().is_none());
    catalog.set_location(zurich());
    catalog.set_time(evening());
    let set = catalog.calculate().unwrap();
    assert_eq!(set.len(), 1);
    let moon = set.get(0).unwrap();
    assert_eq!(moon.name, Some("Moon"));
    assert!((-13.0..=-2.0).contains(&moon.mag), "Moon magnitude {}", moon.mag);
}

#[test]
fn test_missing_catalog_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("nope.edb");
    match SkyCatalog::load(&path) {
        Err(SkyError::ResourceNotFound { path: p }) => assert_eq!(p, path),
        other => panic!("expected ResourceNotFound, got {:?}", other.map(|_| ())),
    }
}

#[test]
fn test_malformed_record_reports_line() {
    let file = write_catalog(
        "Sirius,f|S|A1,06:45:08.9,-16:42:58,-1.44\nBroken,f,not-an-angle,+10:00:00,3.0\n",
    );
    match SkyCatalog::load(file.path()) {
        Err(SkyError::MalformedCatalogRecord { line, .. }) => assert_eq!(line, 2),
        other => panic!("expected MalformedCatalogRecord, got {:?}", other.map(|_| ())),
    }

    let file = write_catalog("Short,f,01:00:00\n");
    assert!(matches!(
        SkyCatalog::load(file.path()),
        Err(SkyError::MalformedCatalogRecord { .. })
    ));
}

#[test]
fn test_calculate_requires_location_and_time() {
    let mut catalog = SkyCatalog::sun_only();
    assert!(matches!(
        catalog.calculate(),
        Err(SkyError::PreconditionViolation(_))
    ));
    catalog.set_location(zurich());
    assert!(matches!(
        catalog.calculate(),
        Err(SkyError::PreconditionViolation(_))
    ));
    assert!(matches!(
        catalog.filter(0.0, 5.0),
        Err(SkyError::PreconditionViolation(_))
    ));
    catalog.set_time(evening());
    assert!(catalog.calculate().is_ok());
}
