//! Provider that replays recorded ephemeris answers for a single instant.
//!
//! Positions, orbital points and event times are looked up rather than
//! computed. The horizontal conversion is done here from a recorded Greenwich
//! sidereal time and obliquity, so `hor_coord` works without an engine.
//! Snapshots load from TOML:
//!
//! ```toml
//! greenwich_sidereal_time = 101.25
//!
//! [[positions]]
//! target = { body = 0 }
//! frame = "ecliptic"
//! position = { lon = 280.1, lat = 0.0, lon_speed = 1.019 }
//!
//! [[events]]
//! target = { body = 0 }
//! kind = "rise"
//! time = 2451545.8
//! ```

use super::types::{
    Frame, HorizontalPosition, JulianDay, OrbitalMethod, OrbitalPoints, Origin,
    PositionRequest, ProviderId, RawPosition, TransitKind,
};
use super::EphemerisProvider;
use crate::angle::{Angle, GeoLocation};
use crate::error::{AstrologError, Result};
use anyhow::Context;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Mean obliquity of the ecliptic at J2000, degrees.
pub const J2000_OBLIQUITY: f64 = 23.439_291;

/// Body or star a record belongs to.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SnapshotTarget {
    Body(i32),
    Star(String),
}

impl SnapshotTarget {
    fn matches(&self, id: ProviderId<'_>) -> bool {
        match (self, id) {
            (SnapshotTarget::Body(a), ProviderId::Body(b)) => *a == b,
            (SnapshotTarget::Star(a), ProviderId::Star(b)) => a == b,
            _ => false,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PositionRecord {
    pub target: SnapshotTarget,
    pub frame: Frame,
    #[serde(default)]
    pub origin: Origin,
    pub position: RawPosition,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrbitalRecord {
    pub body: i32,
    pub frame: Frame,
    #[serde(default)]
    pub method: OrbitalMethod,
    pub points: OrbitalPoints,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EventRecord {
    pub target: SnapshotTarget,
    pub kind: TransitKind,
    pub time: JulianDay,
}

fn default_obliquity() -> f64 {
    J2000_OBLIQUITY
}

/// Recorded ephemeris answers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SnapshotEphemeris {
    /// Greenwich apparent sidereal time in degrees.
    #[serde(default)]
    pub greenwich_sidereal_time: f64,
    #[serde(default = "default_obliquity")]
    pub obliquity: f64,
    #[serde(default)]
    pub positions: Vec<PositionRecord>,
    #[serde(default)]
    pub orbital: Vec<OrbitalRecord>,
    #[serde(default)]
    pub events: Vec<EventRecord>,
}

impl Default for SnapshotEphemeris {
    fn default() -> Self {
        Self::new(0.0)
    }
}

impl SnapshotEphemeris {
    pub fn new(greenwich_sidereal_time: f64) -> Self {
        Self {
            greenwich_sidereal_time,
            obliquity: J2000_OBLIQUITY,
            positions: Vec::new(),
            orbital: Vec::new(),
            events: Vec::new(),
        }
    }

    pub fn from_toml_str(text: &str) -> anyhow::Result<Self> {
        toml::from_str(text).context("Failed to parse ephemeris snapshot")
    }

    pub fn load(path: impl AsRef<Path>) -> anyhow::Result<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("Could not read ephemeris snapshot {}", path.display()))?;
        Self::from_toml_str(&text)
    }

    pub fn with_position(
        mut self,
        target: SnapshotTarget,
        frame: Frame,
        origin: Origin,
        position: RawPosition,
    ) -> Self {
        self.positions.push(PositionRecord {
            target,
            frame,
            origin,
            position,
        });
        self
    }

    /// Topocentric ecliptic position of a numbered body.
    pub fn with_body(self, body: i32, position: RawPosition) -> Self {
        self.with_position(SnapshotTarget::Body(body), Frame::Ecliptic, Origin::Topocentric, position)
    }

    pub fn with_orbital(mut self, body: i32, frame: Frame, method: OrbitalMethod, points: OrbitalPoints) -> Self {
        self.orbital.push(OrbitalRecord {
            body,
            frame,
            method,
            points,
        });
        self
    }

    pub fn with_event(mut self, target: SnapshotTarget, kind: TransitKind, time: JulianDay) -> Self {
        self.events.push(EventRecord { target, kind, time });
        self
    }

    fn knows(&self, id: ProviderId<'_>) -> bool {
        self.positions.iter().any(|r| r.target.matches(id))
            || self.events.iter().any(|r| r.target.matches(id))
            || matches!(id, ProviderId::Body(body) if self.orbital.iter().any(|r| r.body == body))
    }

    fn lookup(&self, id: ProviderId<'_>, request: PositionRequest) -> Result<RawPosition> {
        let record = self
            .positions
            .iter()
            .find(|r| r.target.matches(id) && r.frame == request.frame && r.origin == request.origin);
        match record {
            Some(r) if request.speed => Ok(r.position),
            Some(r) => Ok(RawPosition {
                lon_speed: 0.0,
                lat_speed: 0.0,
                dist_speed: r.position.dist_speed.map(|_| 0.0),
                ..r.position
            }),
            None if !self.knows(id) => Err(match id {
                ProviderId::Body(body) => AstrologError::UnknownBody(body),
                ProviderId::Star(key) => AstrologError::UnknownStar(key.to_string()),
            }),
            None => Err(AstrologError::CalculationFailed {
                target: id.to_string(),
                message: format!(
                    "no {:?}/{:?} position in snapshot",
                    request.frame, request.origin
                ),
            }),
        }
    }

    /// Ecliptic (longitude, latitude) to (right ascension, declination).
    fn ecliptic_to_equatorial(&self, lon: f64, lat: f64) -> (f64, f64) {
        let eps = self.obliquity.to_radians();
        let (lon, lat) = (lon.to_radians(), lat.to_radians());
        let decl = (lat.sin() * eps.cos() + lat.cos() * eps.sin() * lon.sin()).asin();
        let ra = (lon.sin() * eps.cos() - lat.tan() * eps.sin()).atan2(lon.cos());
        (ra.to_degrees().rem_euclid(360.0), decl.to_degrees())
    }
}

impl EphemerisProvider for SnapshotEphemeris {
    fn body_position(
        &self,
        body: i32,
        time: JulianDay,
        _observer: &GeoLocation,
        request: PositionRequest,
    ) -> Result<RawPosition> {
        log::trace!("snapshot body_position {} at {}", body, time);
        self.lookup(ProviderId::Body(body), request)
    }

    fn orbital_points(
        &self,
        body: i32,
        time: JulianDay,
        _observer: &GeoLocation,
        method: OrbitalMethod,
        request: PositionRequest,
    ) -> Result<OrbitalPoints> {
        log::trace!("snapshot orbital_points {} {:?} at {}", body, method, time);
        self.orbital
            .iter()
            .find(|r| r.body == body && r.frame == request.frame && r.method == method)
            .map(|r| r.points)
            .ok_or(AstrologError::UnknownBody(body))
    }

    fn fixed_star_position(
        &self,
        key: &str,
        time: JulianDay,
        _observer: &GeoLocation,
        request: PositionRequest,
    ) -> Result<RawPosition> {
        log::trace!("snapshot fixed_star_position {} at {}", key, time);
        self.lookup(ProviderId::Star(key), request)
    }

    fn azimuth_altitude(
        &self,
        _time: JulianDay,
        frame: Frame,
        observer: &GeoLocation,
        target: (Angle, Angle),
    ) -> Result<HorizontalPosition> {
        let (ra, decl) = match frame {
            Frame::Equatorial => (target.0.degrees(), target.1.degrees()),
            Frame::Ecliptic => self.ecliptic_to_equatorial(target.0.degrees(), target.1.degrees()),
        };
        let local_sidereal = self.greenwich_sidereal_time + observer.longitude.degrees();
        let hour_angle = (local_sidereal - ra).to_radians();
        let phi = observer.latitude.to_radians();
        let delta = decl.to_radians();

        // Azimuth counted from the south point towards the west
        let azimuth = hour_angle
            .sin()
            .atan2(hour_angle.cos() * phi.sin() - delta.tan() * phi.cos());
        let altitude = (phi.sin() * delta.sin() + phi.cos() * delta.cos() * hour_angle.cos()).asin();

        Ok(HorizontalPosition {
            azimuth: azimuth.to_degrees().rem_euclid(360.0),
            true_altitude: altitude.to_degrees(),
            apparent_altitude: altitude.to_degrees(),
        })
    }

    fn find_event(
        &self,
        start: JulianDay,
        target: ProviderId<'_>,
        event: TransitKind,
        _observer: &GeoLocation,
    ) -> Result<Option<JulianDay>> {
        if !self.knows(target) {
            return Err(match target {
                ProviderId::Body(body) => AstrologError::UnknownBody(body),
                ProviderId::Star(key) => AstrologError::UnknownStar(key.to_string()),
            });
        }
        Ok(self
            .events
            .iter()
            .filter(|r| r.target.matches(target) && r.kind == event && r.time >= start)
            .map(|r| r.time)
            .min_by(|a, b| a.0.total_cmp(&b.0)))
    }
}
