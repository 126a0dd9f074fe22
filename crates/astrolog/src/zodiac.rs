//! Partitions of the ecliptic longitude circle.
//!
//! [`Zodiac`] is the tropical zodiac: 12 signs of exactly 30° starting at the
//! vernal point. [`ZodiacConstell`] follows the 13 astronomical constellations
//! the ecliptic actually crosses, with unequal widths; Pisces spans 0°.

use crate::angle::Angle;
use serde::Serialize;
use std::fmt;

/// Tropical zodiac sign.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Zodiac {
    Aries,
    Taurus,
    Gemini,
    Cancer,
    Leo,
    Virgo,
    Libra,
    Scorpio,
    Sagittarius,
    Capricorn,
    Aquarius,
    Pisces,
}

impl Zodiac {
    pub const WIDTH: f64 = 30.0;

    /// Signs in ascending offset order.
    pub const ALL: [Zodiac; 12] = [
        Zodiac::Aries,
        Zodiac::Taurus,
        Zodiac::Gemini,
        Zodiac::Cancer,
        Zodiac::Leo,
        Zodiac::Virgo,
        Zodiac::Libra,
        Zodiac::Scorpio,
        Zodiac::Sagittarius,
        Zodiac::Capricorn,
        Zodiac::Aquarius,
        Zodiac::Pisces,
    ];

    pub const fn name(self) -> &'static str {
        match self {
            Zodiac::Aries => "Aries",
            Zodiac::Taurus => "Taurus",
            Zodiac::Gemini => "Gemini",
            Zodiac::Cancer => "Cancer",
            Zodiac::Leo => "Leo",
            Zodiac::Virgo => "Virgo",
            Zodiac::Libra => "Libra",
            Zodiac::Scorpio => "Scorpio",
            Zodiac::Sagittarius => "Sagittarius",
            Zodiac::Capricorn => "Capricorn",
            Zodiac::Aquarius => "Aquarius",
            Zodiac::Pisces => "Pisces",
        }
    }

    pub fn abbr(self) -> &'static str {
        &self.name()[..3]
    }

    pub const fn symbol(self) -> char {
        match self {
            Zodiac::Aries => '♈',
            Zodiac::Taurus => '♉',
            Zodiac::Gemini => '♊',
            Zodiac::Cancer => '♋',
            Zodiac::Leo => '♌',
            Zodiac::Virgo => '♍',
            Zodiac::Libra => '♎',
            Zodiac::Scorpio => '♏',
            Zodiac::Sagittarius => '♐',
            Zodiac::Capricorn => '♑',
            Zodiac::Aquarius => '♒',
            Zodiac::Pisces => '♓',
        }
    }

    /// Starting longitude of the sign in degrees.
    pub fn offset(self) -> f64 {
        self as usize as f64 * Self::WIDTH
    }

    /// Sign whose `[offset, offset + 30)` interval holds `longitude`.
    ///
    /// Longitudes outside `[0, 360)` are not normalized and yield `None`.
    pub fn from_longitude(longitude: Angle) -> Option<Zodiac> {
        let lon = longitude.degrees();
        Self::ALL
            .iter()
            .copied()
            .find(|sign| sign.offset() <= lon && lon < sign.offset() + Self::WIDTH)
    }
}

impl fmt::Display for Zodiac {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Astronomical constellation crossed by the ecliptic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum ZodiacConstell {
    Aries,
    Taurus,
    Gemini,
    Cancer,
    Leo,
    Virgo,
    Libra,
    Scorpio,
    Ophiuchus,
    Sagittarius,
    Capricorn,
    Aquarius,
    Pisces,
}

// (name, symbol, from, upto) in scan order
const CONSTELLATIONS: [(&str, char, f64, f64); 13] = [
    ("Aries", '♈', 29.09, 53.47),
    ("Taurus", '♉', 53.47, 90.43),
    ("Gemini", '♊', 90.43, 118.26),
    ("Cancer", '♋', 118.26, 138.18),
    ("Leo", '♌', 138.18, 174.16),
    ("Virgo", '♍', 174.16, 217.80),
    ("Libra", '♎', 217.80, 241.14),
    ("Scorpio", '♏', 241.14, 248.04),
    ("Ophiuchus", '⛎', 248.04, 266.61),
    ("Sagittarius", '♐', 266.61, 299.71),
    ("Capricorn", '♑', 299.71, 327.89),
    ("Aquarius", '♒', 327.89, 351.57),
    ("Pisces", '♓', 351.57, 29.09),
];

impl ZodiacConstell {
    pub const ALL: [ZodiacConstell; 13] = [
        ZodiacConstell::Aries,
        ZodiacConstell::Taurus,
        ZodiacConstell::Gemini,
        ZodiacConstell::Cancer,
        ZodiacConstell::Leo,
        ZodiacConstell::Virgo,
        ZodiacConstell::Libra,
        ZodiacConstell::Scorpio,
        ZodiacConstell::Ophiuchus,
        ZodiacConstell::Sagittarius,
        ZodiacConstell::Capricorn,
        ZodiacConstell::Aquarius,
        ZodiacConstell::Pisces,
    ];

    fn row(self) -> &'static (&'static str, char, f64, f64) {
        &CONSTELLATIONS[self as usize]
    }

    pub fn name(self) -> &'static str {
        self.row().0
    }

    pub fn abbr(self) -> &'static str {
        &self.name()[..3]
    }

    pub fn symbol(self) -> char {
        self.row().1
    }

    /// Lower longitude bound in degrees.
    pub fn from_lng(self) -> f64 {
        self.row().2
    }

    /// Upper (exclusive) longitude bound in degrees.
    pub fn upto_lng(self) -> f64 {
        self.row().3
    }

    /// True for the one constellation whose span crosses 0°.
    pub fn wraps(self) -> bool {
        self.from_lng() > self.upto_lng()
    }

    fn contains(self, lon: f64) -> bool {
        if self.wraps() {
            (0.0 <= lon && lon < self.upto_lng()) || (self.from_lng() <= lon && lon <= 360.0)
        } else {
            self.from_lng() <= lon && lon < self.upto_lng()
        }
    }

    /// Constellation holding `longitude`, scanning in table order.
    pub fn from_longitude(longitude: Angle) -> Option<ZodiacConstell> {
        let lon = longitude.degrees();
        Self::ALL.iter().copied().find(|constell| constell.contains(lon))
    }
}

impl fmt::Display for ZodiacConstell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
