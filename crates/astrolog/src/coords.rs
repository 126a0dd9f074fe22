//! Coordinate records for the reference frames a body can be placed in.
//!
//! Each frame has a plain variant and a speed variant carrying the first
//! derivative of every positional field. Speed variants dereference to their
//! plain frame, so everything that works on an [`EclCoord`] works on an
//! [`EclSpeed`] too.

use crate::angle::{Angle, AngularSpeed, Au, AuSpeed};
use crate::ephemeris::RawPosition;
use crate::zodiac::{Zodiac, ZodiacConstell};
use serde::Serialize;
use std::f64::consts::PI;
use std::ops::{BitXor, Deref};

/// Ecliptic coordinate
#[derive(Debug, Clone, Copy, Serialize)]
pub struct EclCoord {
    #[serde(rename = "long")]
    pub longitude: Angle,
    #[serde(rename = "lat")]
    pub latitude: Angle,
    #[serde(rename = "dist", skip_serializing_if = "Option::is_none")]
    pub distance: Option<Au>,
}

impl EclCoord {
    pub const fn new(longitude: f64, latitude: f64) -> Self {
        Self {
            longitude: Angle::from_degrees(longitude),
            latitude: Angle::from_degrees(latitude),
            distance: None,
        }
    }

    pub const fn with_distance(longitude: f64, latitude: f64, distance: f64) -> Self {
        Self {
            longitude: Angle::from_degrees(longitude),
            latitude: Angle::from_degrees(latitude),
            distance: Some(Au::new(distance)),
        }
    }

    pub(crate) fn from_raw(raw: &RawPosition) -> Self {
        Self {
            longitude: Angle::from_degrees(raw.lon),
            latitude: Angle::from_degrees(raw.lat),
            distance: raw.dist.map(Au::new),
        }
    }

    /// Angular distance to `other` along the great circle, in `[0°, 180°]`.
    pub fn separation(&self, other: &EclCoord) -> Angle {
        if self == other {
            return Angle::ZERO;
        }
        let long1 = self.longitude.to_radians();
        let long2 = other.longitude.to_radians();
        let lat1 = self.latitude.to_radians();
        let lat2 = other.latitude.to_radians();
        let dalpha = long1 - long2;
        let cosd = lat1.sin() * lat2.sin() + lat1.cos() * lat2.cos() * dalpha.cos();
        // Rounding can push the cosine just past 1 for near-identical points
        let mut ang = cosd.clamp(-1.0, 1.0).acos();
        if ang > PI {
            ang = 2.0 * PI - ang;
        }
        Angle::from_radians(ang)
    }

    /// Tropical sign and the offset into it in degrees.
    pub fn sign_pos(&self) -> (Zodiac, f64) {
        let lon = self.longitude.normalized();
        // rem_euclid can round a tiny negative up to exactly 360
        let sign = Zodiac::from_longitude(lon).unwrap_or(Zodiac::Pisces);
        (sign, lon.degrees() - sign.offset())
    }

    /// Constellation and the offset past its starting bound in degrees.
    ///
    /// Inside the part of Pisces that lies past 0° the offset is the raw
    /// longitude, not the distance from the 351.57° bound.
    pub fn constell_pos(&self) -> (ZodiacConstell, f64) {
        let lon = self.longitude.normalized();
        let constell = ZodiacConstell::from_longitude(lon).unwrap_or(ZodiacConstell::Pisces);
        let pos = lon.degrees();
        let (from, upto) = (constell.from_lng(), constell.upto_lng());
        let offset = if upto < from && from < pos {
            pos - from
        } else if pos < upto && upto < from {
            pos
        } else {
            pos - from
        };
        (constell, offset)
    }
}

/// Equality on the two angles only; distance does not take part.
impl PartialEq for EclCoord {
    fn eq(&self, other: &Self) -> bool {
        self.latitude == other.latitude && self.longitude == other.longitude
    }
}

impl BitXor for EclCoord {
    type Output = Angle;

    fn bitxor(self, rhs: EclCoord) -> Angle {
        self.separation(&rhs)
    }
}

impl<'a> BitXor<&'a EclCoord> for &'a EclCoord {
    type Output = Angle;

    fn bitxor(self, rhs: &'a EclCoord) -> Angle {
        self.separation(rhs)
    }
}

/// Equatorial coordinate
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct EquatorCoord {
    pub ra: Angle,
    pub decl: Angle,
    #[serde(rename = "dist", skip_serializing_if = "Option::is_none")]
    pub distance: Option<Au>,
}

impl EquatorCoord {
    pub const fn new(ra: f64, decl: f64) -> Self {
        Self {
            ra: Angle::from_degrees(ra),
            decl: Angle::from_degrees(decl),
            distance: None,
        }
    }

    pub(crate) fn from_raw(raw: &RawPosition) -> Self {
        Self {
            ra: Angle::from_degrees(raw.lon),
            decl: Angle::from_degrees(raw.lat),
            distance: raw.dist.map(Au::new),
        }
    }
}

/// Horizontal coordinate
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct HorCoord {
    pub azimuth: Angle,
    #[serde(rename = "alt")]
    pub altitude: Angle,
}

impl HorCoord {
    pub const fn new(azimuth: f64, altitude: f64) -> Self {
        Self {
            azimuth: Angle::from_degrees(azimuth),
            altitude: Angle::from_degrees(altitude),
        }
    }

    /// Position in the 13-sector house scheme as `(sector, offset)`.
    ///
    /// The sector runs 1..=13. The offset is the fractional part of the
    /// sector scaled by 180/π.
    pub fn house_pos(&self) -> (u8, f64) {
        let alt = self.altitude.to_radians();
        let azimuth = self.azimuth.to_radians();
        let mut angle = alt.tan().atan2(azimuth.cos()) / PI * 180.0 - 90.0;
        if angle < 0.0 {
            angle += 360.0;
        }
        let house13 = (angle * 13.0 / 360.0).floor() + 1.0;
        let mut house_pos = angle * 13.0 / 360.0 + 1.0 - house13;
        house_pos *= 180.0 / PI;
        (house13 as u8, house_pos)
    }
}

/// Ecliptic position relative to the solar system barycenter.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct BaryCoord {
    #[serde(rename = "long")]
    pub longitude: Angle,
    #[serde(rename = "lat")]
    pub latitude: Angle,
    #[serde(rename = "dist")]
    pub distance: Au,
}

impl BaryCoord {
    pub const fn new(longitude: f64, latitude: f64, distance: f64) -> Self {
        Self {
            longitude: Angle::from_degrees(longitude),
            latitude: Angle::from_degrees(latitude),
            distance: Au::new(distance),
        }
    }

    pub(crate) fn from_raw(raw: &RawPosition) -> Self {
        Self::new(raw.lon, raw.lat, raw.dist.unwrap_or_default())
    }
}

/// Ecliptic position relative to the Sun.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct HelioCoord {
    #[serde(rename = "long")]
    pub longitude: Angle,
    #[serde(rename = "lat")]
    pub latitude: Angle,
    #[serde(rename = "dist")]
    pub distance: Au,
}

impl HelioCoord {
    pub const fn new(longitude: f64, latitude: f64, distance: f64) -> Self {
        Self {
            longitude: Angle::from_degrees(longitude),
            latitude: Angle::from_degrees(latitude),
            distance: Au::new(distance),
        }
    }

    pub(crate) fn from_raw(raw: &RawPosition) -> Self {
        Self::new(raw.lon, raw.lat, raw.dist.unwrap_or_default())
    }
}

/// Ecliptic coordinate with speed
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct EclSpeed {
    #[serde(flatten)]
    pub coord: EclCoord,
    #[serde(rename = "long_spd")]
    pub longitude_speed: AngularSpeed,
    #[serde(rename = "lat_spd")]
    pub latitude_speed: AngularSpeed,
    #[serde(rename = "dist_spd", skip_serializing_if = "Option::is_none")]
    pub distance_speed: Option<AuSpeed>,
}

impl EclSpeed {
    pub const fn new(longitude: f64, latitude: f64, longitude_speed: f64, latitude_speed: f64) -> Self {
        Self {
            coord: EclCoord::new(longitude, latitude),
            longitude_speed: AngularSpeed::new(longitude_speed),
            latitude_speed: AngularSpeed::new(latitude_speed),
            distance_speed: None,
        }
    }

    pub(crate) fn from_raw(raw: &RawPosition) -> Self {
        Self {
            coord: EclCoord::from_raw(raw),
            longitude_speed: AngularSpeed::new(raw.lon_speed),
            latitude_speed: AngularSpeed::new(raw.lat_speed),
            distance_speed: raw.dist_speed.map(AuSpeed::new),
        }
    }

    pub fn is_retrograde(&self) -> bool {
        self.longitude_speed.is_retrograde()
    }
}

impl Deref for EclSpeed {
    type Target = EclCoord;

    fn deref(&self) -> &EclCoord {
        &self.coord
    }
}

/// Equatorial coordinate with speed
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct EquatorSpeed {
    #[serde(flatten)]
    pub coord: EquatorCoord,
    #[serde(rename = "ra_spd")]
    pub ra_speed: AngularSpeed,
    #[serde(rename = "decl_spd")]
    pub decl_speed: AngularSpeed,
    #[serde(rename = "dist_spd", skip_serializing_if = "Option::is_none")]
    pub distance_speed: Option<AuSpeed>,
}

impl EquatorSpeed {
    pub const fn new(ra: f64, decl: f64, ra_speed: f64, decl_speed: f64) -> Self {
        Self {
            coord: EquatorCoord::new(ra, decl),
            ra_speed: AngularSpeed::new(ra_speed),
            decl_speed: AngularSpeed::new(decl_speed),
            distance_speed: None,
        }
    }

    pub(crate) fn from_raw(raw: &RawPosition) -> Self {
        Self {
            coord: EquatorCoord::from_raw(raw),
            ra_speed: AngularSpeed::new(raw.lon_speed),
            decl_speed: AngularSpeed::new(raw.lat_speed),
            distance_speed: raw.dist_speed.map(AuSpeed::new),
        }
    }
}

impl Deref for EquatorSpeed {
    type Target = EquatorCoord;

    fn deref(&self) -> &EquatorCoord {
        &self.coord
    }
}

/// Barycentric coordinate with speed
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct BarySpeed {
    #[serde(flatten)]
    pub coord: BaryCoord,
    #[serde(rename = "long_spd")]
    pub longitude_speed: AngularSpeed,
    #[serde(rename = "lat_spd")]
    pub latitude_speed: AngularSpeed,
    #[serde(rename = "dist_spd")]
    pub distance_speed: AuSpeed,
}

impl BarySpeed {
    pub(crate) fn from_raw(raw: &RawPosition) -> Self {
        Self {
            coord: BaryCoord::from_raw(raw),
            longitude_speed: AngularSpeed::new(raw.lon_speed),
            latitude_speed: AngularSpeed::new(raw.lat_speed),
            distance_speed: AuSpeed::new(raw.dist_speed.unwrap_or_default()),
        }
    }
}

impl Deref for BarySpeed {
    type Target = BaryCoord;

    fn deref(&self) -> &BaryCoord {
        &self.coord
    }
}

/// Heliocentric coordinate with speed
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct HelioSpeed {
    #[serde(flatten)]
    pub coord: HelioCoord,
    #[serde(rename = "long_spd")]
    pub longitude_speed: AngularSpeed,
    #[serde(rename = "lat_spd")]
    pub latitude_speed: AngularSpeed,
    #[serde(rename = "dist_spd")]
    pub distance_speed: AuSpeed,
}

impl HelioSpeed {
    pub(crate) fn from_raw(raw: &RawPosition) -> Self {
        Self {
            coord: HelioCoord::from_raw(raw),
            longitude_speed: AngularSpeed::new(raw.lon_speed),
            latitude_speed: AngularSpeed::new(raw.lat_speed),
            distance_speed: AuSpeed::new(raw.dist_speed.unwrap_or_default()),
        }
    }
}

impl Deref for HelioSpeed {
    type Target = HelioCoord;

    fn deref(&self) -> &HelioCoord {
        &self.coord
    }
}
