//! Scalar value types: angles, angular speeds, distances and observer location.
//!
//! All of them are thin `Copy` wrappers around `f64` so that the unit travels
//! with the number. They serialize as the bare number.

use crate::error::{AstrologError, Result};
use serde::{Deserialize, Serialize};
use std::f64::consts::PI;
use std::fmt;
use std::str::FromStr;

/// Orb used by [`Angle::classify_aspect`] callers that have no preference.
pub const DEFAULT_ASPECT_ORB: f64 = 0.5;

/// Largest harmonic divisor considered an aspect.
pub const MAX_HARMONIC: u8 = 13;

/// Angle measured in degrees.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Angle {
    degrees: f64,
}

impl Angle {
    pub const ZERO: Angle = Angle { degrees: 0.0 };

    pub const fn from_degrees(degrees: f64) -> Self {
        Self { degrees }
    }

    pub fn from_radians(radians: f64) -> Self {
        Self {
            degrees: radians * 180.0 / PI,
        }
    }

    /// Build an angle from exactly one of the two representations.
    pub fn new(degrees: Option<f64>, radians: Option<f64>) -> Result<Self> {
        match (degrees, radians) {
            (Some(d), None) => Ok(Self::from_degrees(d)),
            (None, Some(r)) => Ok(Self::from_radians(r)),
            (Some(_), Some(_)) => Err(AstrologError::InvalidArgument(
                "angle takes either degrees or radians, not both".to_string(),
            )),
            (None, None) => Err(AstrologError::InvalidArgument(
                "angle needs degrees or radians".to_string(),
            )),
        }
    }

    pub const fn degrees(&self) -> f64 {
        self.degrees
    }

    pub fn to_radians(&self) -> f64 {
        self.degrees * 2.0 * PI / 360.0
    }

    /// Same direction reduced into `[0, 360)`.
    pub fn normalized(&self) -> Self {
        Self::from_degrees(self.degrees.rem_euclid(360.0))
    }

    /// Harmonic aspect this angle falls into, if any.
    ///
    /// Conjunction is checked first against `0 ± orb`, then divisors 2 through
    /// 13 in increasing order against `360/n ± orb`. The first hit wins even
    /// when a later divisor would be numerically closer.
    pub fn classify_aspect(&self, orb: f64) -> Option<Aspect> {
        if -orb <= self.degrees && self.degrees <= orb {
            return Some(Aspect::CONJUNCTION);
        }
        (2..=MAX_HARMONIC)
            .find(|&div| {
                let exact = 360.0 / f64::from(div);
                exact - orb <= self.degrees && self.degrees <= exact + orb
            })
            .map(Aspect)
    }

    /// [`classify_aspect`](Self::classify_aspect) with [`DEFAULT_ASPECT_ORB`].
    pub fn aspect(&self) -> Option<Aspect> {
        self.classify_aspect(DEFAULT_ASPECT_ORB)
    }
}

impl fmt::Display for Angle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.4}°", self.degrees)
    }
}

impl FromStr for Angle {
    type Err = AstrologError;

    /// Decimal degrees, optionally suffixed with `°`.
    fn from_str(s: &str) -> Result<Self> {
        let trimmed = s.trim().trim_end_matches('°');
        trimmed
            .parse::<f64>()
            .map(Self::from_degrees)
            .map_err(|_| AstrologError::InvalidArgument(format!("not a decimal angle: {s:?}")))
    }
}

impl From<f64> for Angle {
    fn from(degrees: f64) -> Self {
        Self::from_degrees(degrees)
    }
}

/// Angular speed measured in degrees per day. Negative means retrograde.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AngularSpeed {
    deg_per_day: f64,
}

impl AngularSpeed {
    pub const fn new(deg_per_day: f64) -> Self {
        Self { deg_per_day }
    }

    pub const fn deg_per_day(&self) -> f64 {
        self.deg_per_day
    }

    pub fn is_retrograde(&self) -> bool {
        self.deg_per_day < 0.0
    }
}

/// Distance in astronomical units.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Au(f64);

impl Au {
    pub const fn new(au: f64) -> Self {
        Self(au)
    }

    pub const fn au(&self) -> f64 {
        self.0
    }
}

/// Radial speed in astronomical units per day.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AuSpeed(f64);

impl AuSpeed {
    pub const fn new(au_per_day: f64) -> Self {
        Self(au_per_day)
    }

    pub const fn au_per_day(&self) -> f64 {
        self.0
    }
}

/// Location on the earth
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoLocation {
    pub longitude: Angle,
    pub latitude: Angle,
}

impl GeoLocation {
    pub const fn new(longitude: f64, latitude: f64) -> Self {
        Self {
            longitude: Angle::from_degrees(longitude),
            latitude: Angle::from_degrees(latitude),
        }
    }
}

/// Aspect names indexed by harmonic - 1.
const ASPECT_NAMES: [&str; MAX_HARMONIC as usize] = [
    "conjunction",
    "opposition",
    "trine",
    "square",
    "quintile",
    "sextile",
    "septile",
    "octile",
    "novile",
    "decile",
    "undecile",
    "semisextile",
    "tredecile",
];

/// Angular relationship named by its harmonic divisor of the full circle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct Aspect(u8);

impl Aspect {
    pub const CONJUNCTION: Aspect = Aspect(1);
    pub const OPPOSITION: Aspect = Aspect(2);
    pub const TRINE: Aspect = Aspect(3);
    pub const SQUARE: Aspect = Aspect(4);
    pub const SEXTILE: Aspect = Aspect(6);

    pub fn from_harmonic(harmonic: u8) -> Option<Self> {
        (1..=MAX_HARMONIC).contains(&harmonic).then_some(Self(harmonic))
    }

    pub const fn harmonic(&self) -> u8 {
        self.0
    }

    /// Separation at which the aspect is exact, in degrees.
    pub fn exact_angle(&self) -> f64 {
        if self.0 == 1 {
            0.0
        } else {
            360.0 / f64::from(self.0)
        }
    }

    pub fn name(&self) -> &'static str {
        ASPECT_NAMES[usize::from(self.0) - 1]
    }
}

impl fmt::Display for Aspect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
