use chrono::{NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};
use std::fmt;

const MJD_ZERO_POINT: f64 = 2400000.5;

/// Time as a Julian Day number (UT).
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Serialize, Deserialize)]
#[serde(transparent)]
pub struct JulianDay(pub f64);

impl JulianDay {
    /// Gregorian calendar date plus hour fraction to Julian Day.
    pub fn from_calendar(year: i32, month: u32, day: u32, hour: f64) -> Self {
        let month = month as i32;
        let my = (month - 14) / 12;
        let iypmy = year + my;
        let mjd = (1461 * (iypmy + 4800)) / 4 + (367 * (month - 2 - 12 * my)) / 12
            - (3 * ((iypmy + 4900) / 100)) / 4
            + day as i32
            - 2432076;
        Self(MJD_ZERO_POINT + f64::from(mjd) + hour / 24.0)
    }

    /// Back to Gregorian calendar date and hour fraction.
    pub fn to_calendar(self) -> CalendarInstant {
        let shifted = self.0 + 0.5;
        let jdn = shifted.floor();
        let fraction = shifted - jdn;

        let mut l = jdn as i64 + 68569;
        let n = (4 * l) / 146097;
        l -= (146097 * n + 3) / 4;
        let i = (4000 * (l + 1)) / 1461001;
        l = l - (1461 * i) / 4 + 31;
        let k = (80 * l) / 2447;
        let day = l - (2447 * k) / 80;
        l = k / 11;
        let month = k + 2 - 12 * l;
        let year = 100 * (n - 49) + i + l;

        CalendarInstant {
            year: year as i32,
            month: month as u32,
            day: day as u32,
            hour: fraction * 24.0,
        }
    }

    pub fn value(self) -> f64 {
        self.0
    }
}

impl fmt::Display for JulianDay {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "JD {:.6}", self.0)
    }
}

/// Calendar date with the time of day as an hour fraction.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CalendarInstant {
    pub year: i32,
    pub month: u32,
    pub day: u32,
    pub hour: f64,
}

impl CalendarInstant {
    pub fn date(&self) -> Option<NaiveDate> {
        NaiveDate::from_ymd_opt(self.year, self.month, self.day)
    }

    /// Time of day with whole seconds; the fractional second is dropped.
    pub fn time_of_day(&self) -> Option<NaiveTime> {
        let hours = self.hour.trunc();
        let minutes = (self.hour - hours) * 60.0;
        let seconds = (self.hour - hours - minutes.trunc() / 60.0) * 3600.0;
        NaiveTime::from_hms_opt(hours as u32, minutes as u32, seconds as u32)
    }
}

/// Reference plane of a position request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Frame {
    Ecliptic,
    Equatorial,
}

/// Center a position is measured from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Origin {
    #[default]
    Topocentric,
    Geocentric,
    Heliocentric,
    Barycentric,
}

/// What to compute for one position query.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PositionRequest {
    pub frame: Frame,
    pub origin: Origin,
    pub speed: bool,
    pub mean: bool,
}

impl PositionRequest {
    pub fn ecliptic() -> Self {
        Self {
            frame: Frame::Ecliptic,
            origin: Origin::Topocentric,
            speed: false,
            mean: false,
        }
    }

    pub fn equatorial() -> Self {
        Self {
            frame: Frame::Equatorial,
            ..Self::ecliptic()
        }
    }

    pub fn with_speed(mut self, speed: bool) -> Self {
        self.speed = speed;
        self
    }

    pub fn with_mean(mut self, mean: bool) -> Self {
        self.mean = mean;
        self
    }

    pub fn with_origin(mut self, origin: Origin) -> Self {
        self.origin = origin;
        self
    }
}

/// Position as the provider reports it: two angles in degrees, optional
/// distance in AU, and their daily derivatives.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct RawPosition {
    pub lon: f64,
    pub lat: f64,
    #[serde(default)]
    pub dist: Option<f64>,
    #[serde(default)]
    pub lon_speed: f64,
    #[serde(default)]
    pub lat_speed: f64,
    #[serde(default)]
    pub dist_speed: Option<f64>,
}

impl RawPosition {
    pub fn new(lon: f64, lat: f64) -> Self {
        Self {
            lon,
            lat,
            ..Self::default()
        }
    }

    pub fn with_speed(mut self, lon_speed: f64, lat_speed: f64) -> Self {
        self.lon_speed = lon_speed;
        self.lat_speed = lat_speed;
        self
    }

    pub fn with_distance(mut self, dist: f64, dist_speed: f64) -> Self {
        self.dist = Some(dist);
        self.dist_speed = Some(dist_speed);
        self
    }
}

/// How orbital nodes and apsides are solved.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NodeMode {
    #[default]
    Osculating,
    Mean,
}

/// Node/apsis method: mode plus whether the fourth slot holds the second
/// focus of the orbit instead of the apoapsis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct OrbitalMethod {
    #[serde(default)]
    pub mode: NodeMode,
    #[serde(default)]
    pub second_focus: bool,
}

/// The four points a single node/apsis query returns.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct OrbitalPoints {
    pub ascending_node: RawPosition,
    pub descending_node: RawPosition,
    pub periapsis: RawPosition,
    /// Apoapsis, or the second focus when requested.
    pub apoapsis: RawPosition,
}

/// Horizon and meridian crossings searched on a given day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TransitKind {
    Rise,
    Set,
    UpperTransit,
    LowerTransit,
}

impl TransitKind {
    /// Fixed reporting order: rise, set, mc, ic.
    pub const ALL: [TransitKind; 4] = [
        TransitKind::Rise,
        TransitKind::Set,
        TransitKind::UpperTransit,
        TransitKind::LowerTransit,
    ];

    pub fn key(self) -> &'static str {
        match self {
            TransitKind::Rise => "rise",
            TransitKind::Set => "set",
            TransitKind::UpperTransit => "mc",
            TransitKind::LowerTransit => "ic",
        }
    }
}

impl fmt::Display for TransitKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

/// Identifier the provider knows a body by.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ProviderId<'a> {
    Body(i32),
    Star(&'a str),
}

impl fmt::Display for ProviderId<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProviderId::Body(id) => write!(f, "body {id}"),
            ProviderId::Star(key) => write!(f, "star {key}"),
        }
    }
}

/// Result of an azimuth/altitude conversion, all in degrees.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HorizontalPosition {
    pub azimuth: f64,
    pub true_altitude: f64,
    pub apparent_altitude: f64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_julian_day_epochs() {
        assert_eq!(JulianDay::from_calendar(2000, 1, 1, 12.0).value(), 2451545.0);
        assert_eq!(JulianDay::from_calendar(1970, 1, 1, 0.0).value(), 2440587.5);
    }

    #[test]
    fn test_calendar_roundtrip_keeps_day_and_hour() {
        let cal = JulianDay::from_calendar(1987, 6, 19, 18.5).to_calendar();
        assert_eq!((cal.year, cal.month, cal.day), (1987, 6, 19));
        assert!((cal.hour - 18.5).abs() < 1e-6);
    }

    #[test]
    fn test_time_of_day_truncates_seconds() {
        let cal = CalendarInstant {
            year: 2020,
            month: 3,
            day: 1,
            hour: 6.0 + 30.0 / 60.0 + 15.7 / 3600.0,
        };
        assert_eq!(cal.time_of_day(), NaiveTime::from_hms_opt(6, 30, 15));
    }
}
