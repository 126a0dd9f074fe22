mod common;

use astrolog::celestial::{second_focus, MOON, SUN};
use astrolog::{AstrologError, ChartConfig, Selection, SnapshotEphemeris};
use chrono::Duration;
use common::{birth, rising_snapshot};

const CHART: &str = r#"
person = "Test"
birth = "2000-01-01T12:00:00Z"
bodies = ["Sun", "moon", "BE Moon"]
aspect_orb = 1.5

[location]
longitude = 13.405
latitude = 52.52
"#;

#[test]
fn test_parse_chart_config() {
    let config = ChartConfig::from_toml_str(CHART).unwrap();
    assert_eq!(config.person, "Test");
    assert_eq!(config.birth, birth());
    assert_eq!(config.location.latitude.degrees(), 52.52);
    assert_eq!(config.aspect_orb, 1.5);
    assert_eq!(config.paran_orb(), Duration::minutes(5));

    let celestials = config.celestials().unwrap();
    assert_eq!(celestials.len(), 3);
    assert!(std::ptr::eq(celestials[0], &SUN));
    assert!(std::ptr::eq(celestials[1], &MOON));
    assert!(std::ptr::eq(celestials[2], &second_focus::MOON));
}

#[test]
fn test_defaults() {
    let config = ChartConfig::from_toml_str(
        r#"
person = "Default"
birth = "1990-06-15T08:45:00Z"
location = { longitude = 0.0, latitude = 0.0 }
"#,
    )
    .unwrap();
    assert_eq!(config.aspect_orb, 1.01);
    assert_eq!(config.paran_orb_minutes, 5);
    assert_eq!(config.bodies.len(), 7);
    assert_eq!(config.bodies[1], "Mars");
}

#[test]
fn test_unknown_body_name() {
    let config = ChartConfig::from_toml_str(&CHART.replace("BE Moon", "Vulcan")).unwrap();
    assert_eq!(
        config.celestials(),
        Err(AstrologError::UnknownBodyName("Vulcan".to_string()))
    );
}

#[test]
fn test_invalid_config_is_rejected() {
    assert!(ChartConfig::from_toml_str("person = \"No birth\"").is_err());
    assert!(ChartConfig::from_toml_str(&CHART.replace("aspect_orb = 1.5", "paran_orb_minutes = -1")).is_err());
    assert!(ChartConfig::load("/nonexistent/chart.toml").is_err());
}

#[test]
fn test_chart_from_config() {
    let config = ChartConfig::from_toml_str(&CHART.replace(", \"BE Moon\"", "")).unwrap();
    let provider = rising_snapshot(3);
    let natal = config.natal(&provider).unwrap();
    assert_eq!(natal.len(), 2);
    assert_eq!(natal.parans(config.paran_orb()).unwrap().len(), 1);
    assert_eq!(natal.aspects(config.aspect_orb, Selection::All, Selection::All).count(), 1);
}

#[test]
fn test_mean_bodies_from_config() {
    let text = CHART.replace("aspect_orb = 1.5", "mean_bodies = [\"be moon\"]");
    let config = ChartConfig::from_toml_str(&text).unwrap();
    assert_eq!(config.mean_bodies, ["be moon"]);
    let provider = rising_snapshot(3);
    let natal = config.natal(&provider).unwrap();
    assert!(natal.get(&second_focus::MOON).unwrap().is_mean());
    assert!(!natal.get(&MOON).unwrap().is_mean());

    let planet = ChartConfig::from_toml_str(&CHART.replace("aspect_orb = 1.5", "mean_bodies = [\"Sun\"]")).unwrap();
    assert!(matches!(planet.natal(&provider), Err(AstrologError::UnsupportedOption { .. })));
}

#[test]
fn test_snapshot_from_toml() {
    let snapshot = SnapshotEphemeris::from_toml_str(
        r#"
greenwich_sidereal_time = 101.25

[[positions]]
target = { body = 0 }
frame = "ecliptic"
position = { lon = 280.37, lat = 0.0, lon_speed = 1.019 }

[[events]]
target = { body = 0 }
kind = "rise"
time = 2451544.8
"#,
    )
    .unwrap();
    assert_eq!(snapshot.positions.len(), 1);
    assert_eq!(snapshot.events.len(), 1);
    let config = ChartConfig::from_toml_str(&CHART.replace(", \"moon\", \"BE Moon\"", "")).unwrap();
    let natal = config.natal(&snapshot).unwrap();
    let sun = natal.get(&SUN).unwrap();
    assert_eq!(sun.ecl_coord().unwrap().longitude.degrees(), 280.37);
    assert!(sun.transits().unwrap().rise.is_some());
}
