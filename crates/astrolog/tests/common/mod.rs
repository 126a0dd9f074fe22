#![allow(dead_code)]

use astrolog::celestial::{SE_MOON, SE_SUN};
use astrolog::ephemeris::{
    Frame, JulianDay, OrbitalMethod, OrbitalPoints, Origin, RawPosition, SnapshotTarget, TransitKind,
};
use astrolog::{GeoLocation, SnapshotEphemeris};
use chrono::{DateTime, TimeZone, Utc};

/// 0h UT on 2000-01-01.
pub const JD_DAY_START: f64 = 2451544.5;

pub fn birth() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2000, 1, 1, 12, 0, 0).unwrap()
}

pub fn berlin() -> GeoLocation {
    GeoLocation::new(13.405, 52.52)
}

/// Julian Day for a time on the birth date, half a second past the minute.
pub fn jd_at(hour: u32, minute: u32) -> JulianDay {
    let h = f64::from(hour) + f64::from(minute) / 60.0 + 0.5 / 3600.0;
    JulianDay(JD_DAY_START + h / 24.0)
}

/// Sun and Moon 120° apart, with a second-focus record for the Moon.
pub fn snapshot() -> SnapshotEphemeris {
    let orbital = OrbitalPoints {
        ascending_node: RawPosition::new(125.0, 0.0),
        descending_node: RawPosition::new(305.0, 0.0),
        periapsis: RawPosition::new(83.0, -1.2),
        apoapsis: RawPosition::new(263.0, 1.2),
    };
    SnapshotEphemeris::new(100.0)
        .with_body(SE_SUN, RawPosition::new(280.37, 0.0).with_speed(1.019, 0.0))
        .with_body(SE_MOON, RawPosition::new(160.37, 0.0).with_speed(13.1, 0.2))
        .with_position(
            SnapshotTarget::Body(SE_SUN),
            Frame::Equatorial,
            Origin::Topocentric,
            RawPosition::new(281.29, -23.03),
        )
        .with_position(
            SnapshotTarget::Body(SE_SUN),
            Frame::Ecliptic,
            Origin::Heliocentric,
            RawPosition::new(100.37, 0.0).with_distance(0.983, 0.0),
        )
        .with_orbital(
            SE_MOON,
            Frame::Ecliptic,
            OrbitalMethod {
                second_focus: true,
                ..OrbitalMethod::default()
            },
            orbital,
        )
}

/// Snapshot whose Sun and Moon rise `gap` minutes apart after 07:00.
pub fn rising_snapshot(gap: u32) -> SnapshotEphemeris {
    snapshot()
        .with_event(SnapshotTarget::Body(SE_SUN), TransitKind::Rise, jd_at(7, 0))
        .with_event(SnapshotTarget::Body(SE_MOON), TransitKind::Rise, jd_at(7, gap))
}
