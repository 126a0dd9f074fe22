//! Celestial objects whose location can be computed.
//!
//! A [`Celestial`] is a named body plus the way the ephemeris provider finds
//! it: a numbered planet or asteroid, one of the orbital points of such a body
//! (nodes, apsides, second focus), or a catalog star. All coordinate requests
//! go through one dispatch on that kind.

use crate::angle::GeoLocation;
use crate::coords::{
    BaryCoord, BarySpeed, EclCoord, EclSpeed, EquatorCoord, EquatorSpeed, HelioCoord, HelioSpeed,
    HorCoord,
};
use crate::ephemeris::{
    EphemerisProvider, Frame, JulianDay, NodeMode, OrbitalMethod, Origin, PositionRequest,
    ProviderId, RawPosition, TransitKind,
};
use crate::error::{AstrologError, Result};
use chrono::{DateTime, NaiveDate, NaiveTime, Timelike, Utc};
use serde::Serialize;
use std::borrow::Cow;
use std::collections::HashMap;
use std::fmt;

// Swiss Ephemeris body numbering
pub const SE_SUN: i32 = 0;
pub const SE_MOON: i32 = 1;
pub const SE_MERCURY: i32 = 2;
pub const SE_VENUS: i32 = 3;
pub const SE_MARS: i32 = 4;
pub const SE_JUPITER: i32 = 5;
pub const SE_SATURN: i32 = 6;
pub const SE_URANUS: i32 = 7;
pub const SE_NEPTUNE: i32 = 8;
pub const SE_PLUTO: i32 = 9;
pub const SE_EARTH: i32 = 14;
pub const SE_AST_OFFSET: i32 = 10000;

const BODY_IDS: &[(&str, i32)] = &[
    ("sun", SE_SUN),
    ("moon", SE_MOON),
    ("mercury", SE_MERCURY),
    ("venus", SE_VENUS),
    ("mars", SE_MARS),
    ("earth", SE_EARTH),
    ("jupiter", SE_JUPITER),
    ("saturn", SE_SATURN),
    ("uranus", SE_URANUS),
    ("neptune", SE_NEPTUNE),
    ("pluto", SE_PLUTO),
    ("eris", SE_AST_OFFSET + 136199),
    ("ceto", SE_AST_OFFSET + 65489),
    ("sedna", SE_AST_OFFSET + 90377),
];

/// Provider number of a named body, case-insensitive.
pub fn provider_id_by_name(name: &str) -> Result<i32> {
    let lower = name.to_lowercase();
    BODY_IDS
        .iter()
        .find(|(id, _)| *id == lower)
        .map(|(_, code)| *code)
        .ok_or_else(|| AstrologError::UnknownBodyName(name.to_string()))
}

/// Which of the points returned by a node/apsis query a body stands for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum OrbitalPoint {
    AscendingNode,
    DescendingNode,
    Periapsis,
    Apoapsis,
    SecondFocus,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum CelestialKind {
    /// Moving physical body
    Planet { id: i32 },
    /// Node, apsis or second focus of a body's orbit
    ApsisNode { id: i32, point: OrbitalPoint },
    /// Star, galactic or deep space object from the provider's catalog
    Fixed { key: Cow<'static, str> },
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Celestial {
    name: Cow<'static, str>,
    kind: CelestialKind,
}

impl Celestial {
    pub const fn planet(name: &'static str, id: i32) -> Self {
        Self {
            name: Cow::Borrowed(name),
            kind: CelestialKind::Planet { id },
        }
    }

    /// Planet whose provider number is resolved from its name.
    pub fn planet_named(name: &str) -> Result<Self> {
        let id = provider_id_by_name(name)?;
        Ok(Self {
            name: Cow::Owned(name.to_string()),
            kind: CelestialKind::Planet { id },
        })
    }

    pub const fn apsis_node(name: &'static str, id: i32, point: OrbitalPoint) -> Self {
        Self {
            name: Cow::Borrowed(name),
            kind: CelestialKind::ApsisNode { id, point },
        }
    }

    /// Orbital point of a named body, e.g. `("North Node", "Moon", AscendingNode)`.
    pub fn apsis_node_of(name: impl Into<Cow<'static, str>>, body: &str, point: OrbitalPoint) -> Result<Self> {
        let id = provider_id_by_name(body)?;
        Ok(Self {
            name: name.into(),
            kind: CelestialKind::ApsisNode { id, point },
        })
    }

    pub fn fixed(name: impl Into<Cow<'static, str>>, key: impl Into<Cow<'static, str>>) -> Self {
        Self {
            name: name.into(),
            kind: CelestialKind::Fixed { key: key.into() },
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn kind(&self) -> &CelestialKind {
        &self.kind
    }

    pub fn provider_id(&self) -> ProviderId<'_> {
        match &self.kind {
            CelestialKind::Planet { id } | CelestialKind::ApsisNode { id, .. } => ProviderId::Body(*id),
            CelestialKind::Fixed { key } => ProviderId::Star(key),
        }
    }

    pub fn is_fixed(&self) -> bool {
        matches!(self.kind, CelestialKind::Fixed { .. })
    }

    /// Orbital points have no disk, so they never rise, set or culminate.
    pub fn is_focal_point(&self) -> bool {
        matches!(self.kind, CelestialKind::ApsisNode { .. })
    }

    /// Look up a registered body by name, case-insensitive.
    pub fn by_name(name: &str) -> Result<&'static Celestial> {
        REGISTRY
            .get(name.to_lowercase().as_str())
            .copied()
            .ok_or_else(|| AstrologError::UnknownBodyName(name.to_string()))
    }

    fn unsupported_mean(&self) -> AstrologError {
        AstrologError::UnsupportedOption {
            body: self.name.to_string(),
            option: "mean position".to_string(),
        }
    }

    /// Raw position for one request; the only place that branches on kind.
    pub fn position<P: EphemerisProvider + ?Sized>(
        &self,
        provider: &P,
        time: JulianDay,
        observer: &GeoLocation,
        request: PositionRequest,
    ) -> Result<RawPosition> {
        match &self.kind {
            CelestialKind::Planet { id } => {
                if request.mean {
                    return Err(self.unsupported_mean());
                }
                provider.body_position(*id, time, observer, request)
            }
            CelestialKind::ApsisNode { id, point } => {
                let method = OrbitalMethod {
                    mode: if request.mean { NodeMode::Mean } else { NodeMode::Osculating },
                    second_focus: *point == OrbitalPoint::SecondFocus,
                };
                let points = provider.orbital_points(*id, time, observer, method, request)?;
                Ok(match point {
                    OrbitalPoint::AscendingNode => points.ascending_node,
                    OrbitalPoint::DescendingNode => points.descending_node,
                    OrbitalPoint::Periapsis => points.periapsis,
                    OrbitalPoint::Apoapsis | OrbitalPoint::SecondFocus => points.apoapsis,
                })
            }
            CelestialKind::Fixed { key } => {
                if request.mean {
                    return Err(self.unsupported_mean());
                }
                provider.fixed_star_position(key, time, observer, request)
            }
        }
    }

    pub fn ecl_coord<P: EphemerisProvider + ?Sized>(
        &self,
        provider: &P,
        time: DateTime<Utc>,
        location: &GeoLocation,
        mean: bool,
    ) -> Result<EclCoord> {
        let request = PositionRequest::ecliptic().with_mean(mean);
        let raw = self.position(provider, internal_time(provider, time), location, request)?;
        Ok(EclCoord::from_raw(&raw))
    }

    pub fn ecl_speed<P: EphemerisProvider + ?Sized>(
        &self,
        provider: &P,
        time: DateTime<Utc>,
        location: &GeoLocation,
        mean: bool,
    ) -> Result<EclSpeed> {
        let request = PositionRequest::ecliptic().with_mean(mean).with_speed(true);
        let raw = self.position(provider, internal_time(provider, time), location, request)?;
        Ok(EclSpeed::from_raw(&raw))
    }

    pub fn equator_coord<P: EphemerisProvider + ?Sized>(
        &self,
        provider: &P,
        time: DateTime<Utc>,
        location: &GeoLocation,
        mean: bool,
    ) -> Result<EquatorCoord> {
        let request = PositionRequest::equatorial().with_mean(mean);
        let raw = self.position(provider, internal_time(provider, time), location, request)?;
        Ok(EquatorCoord::from_raw(&raw))
    }

    pub fn equator_speed<P: EphemerisProvider + ?Sized>(
        &self,
        provider: &P,
        time: DateTime<Utc>,
        location: &GeoLocation,
        mean: bool,
    ) -> Result<EquatorSpeed> {
        let request = PositionRequest::equatorial().with_mean(mean).with_speed(true);
        let raw = self.position(provider, internal_time(provider, time), location, request)?;
        Ok(EquatorSpeed::from_raw(&raw))
    }

    /// Azimuth and true altitude, converted from the equatorial position.
    pub fn hor_coord<P: EphemerisProvider + ?Sized>(
        &self,
        provider: &P,
        time: DateTime<Utc>,
        location: &GeoLocation,
        mean: bool,
    ) -> Result<HorCoord> {
        let jd = internal_time(provider, time);
        let raw = self.position(provider, jd, location, PositionRequest::equatorial().with_mean(mean))?;
        let coord = EquatorCoord::from_raw(&raw);
        let hor = provider.azimuth_altitude(jd, Frame::Equatorial, location, (coord.ra, coord.decl))?;
        Ok(HorCoord::new(hor.azimuth, hor.true_altitude))
    }

    pub fn bary_coord<P: EphemerisProvider + ?Sized>(
        &self,
        provider: &P,
        time: DateTime<Utc>,
        location: &GeoLocation,
    ) -> Result<BaryCoord> {
        let request = PositionRequest::ecliptic().with_origin(Origin::Barycentric);
        let raw = self.position(provider, internal_time(provider, time), location, request)?;
        Ok(BaryCoord::from_raw(&raw))
    }

    pub fn bary_speed<P: EphemerisProvider + ?Sized>(
        &self,
        provider: &P,
        time: DateTime<Utc>,
        location: &GeoLocation,
    ) -> Result<BarySpeed> {
        let request = PositionRequest::ecliptic()
            .with_origin(Origin::Barycentric)
            .with_speed(true);
        let raw = self.position(provider, internal_time(provider, time), location, request)?;
        Ok(BarySpeed::from_raw(&raw))
    }

    pub fn helio_coord<P: EphemerisProvider + ?Sized>(
        &self,
        provider: &P,
        time: DateTime<Utc>,
        location: &GeoLocation,
    ) -> Result<HelioCoord> {
        let request = PositionRequest::ecliptic().with_origin(Origin::Heliocentric);
        let raw = self.position(provider, internal_time(provider, time), location, request)?;
        Ok(HelioCoord::from_raw(&raw))
    }

    pub fn helio_speed<P: EphemerisProvider + ?Sized>(
        &self,
        provider: &P,
        time: DateTime<Utc>,
        location: &GeoLocation,
    ) -> Result<HelioSpeed> {
        let request = PositionRequest::ecliptic()
            .with_origin(Origin::Heliocentric)
            .with_speed(true);
        let raw = self.position(provider, internal_time(provider, time), location, request)?;
        Ok(HelioSpeed::from_raw(&raw))
    }

    /// Rise, set and both meridian transits on `date` (UTC).
    pub fn transits<P: EphemerisProvider + ?Sized>(
        &self,
        provider: &P,
        date: NaiveDate,
        location: &GeoLocation,
    ) -> Result<Transits> {
        Ok(Transits {
            rise: self.transit(provider, date, location, TransitKind::Rise)?,
            set: self.transit(provider, date, location, TransitKind::Set)?,
            mc: self.transit(provider, date, location, TransitKind::UpperTransit)?,
            ic: self.transit(provider, date, location, TransitKind::LowerTransit)?,
        })
    }

    pub fn rises<P: EphemerisProvider + ?Sized>(
        &self,
        provider: &P,
        date: NaiveDate,
        location: &GeoLocation,
    ) -> Result<Option<NaiveTime>> {
        self.transit(provider, date, location, TransitKind::Rise)
    }

    pub fn sets<P: EphemerisProvider + ?Sized>(
        &self,
        provider: &P,
        date: NaiveDate,
        location: &GeoLocation,
    ) -> Result<Option<NaiveTime>> {
        self.transit(provider, date, location, TransitKind::Set)
    }

    pub fn mc_trans<P: EphemerisProvider + ?Sized>(
        &self,
        provider: &P,
        date: NaiveDate,
        location: &GeoLocation,
    ) -> Result<Option<NaiveTime>> {
        self.transit(provider, date, location, TransitKind::UpperTransit)
    }

    pub fn ic_trans<P: EphemerisProvider + ?Sized>(
        &self,
        provider: &P,
        date: NaiveDate,
        location: &GeoLocation,
    ) -> Result<Option<NaiveTime>> {
        self.transit(provider, date, location, TransitKind::LowerTransit)
    }

    /// Time of day of one event, searched from 0h UT of `date`.
    ///
    /// `None` for focal points, when the provider finds nothing, and when the
    /// event it finds falls on another day.
    pub fn transit<P: EphemerisProvider + ?Sized>(
        &self,
        provider: &P,
        date: NaiveDate,
        location: &GeoLocation,
        kind: TransitKind,
    ) -> Result<Option<NaiveTime>> {
        if self.is_focal_point() {
            return Ok(None);
        }
        let start = provider.to_internal_time(date, 0.0);
        let Some(found) = provider.find_event(start, self.provider_id(), kind, location)? else {
            return Ok(None);
        };
        let calendar = provider.to_calendar(found);
        if calendar.date() != Some(date) {
            log::debug!(
                "{} {} at {} falls outside {}, dropped",
                self.name,
                kind,
                found,
                date
            );
            return Ok(None);
        }
        Ok(calendar.time_of_day())
    }
}

impl fmt::Display for Celestial {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}

/// Instant to provider time, at minute resolution plus seconds.
pub(crate) fn internal_time<P: EphemerisProvider + ?Sized>(provider: &P, time: DateTime<Utc>) -> JulianDay {
    let hour = f64::from(time.hour())
        + f64::from(time.minute()) / 60.0
        + f64::from(time.second()) / 3600.0;
    provider.to_internal_time(time.date_naive(), hour)
}

/// The four daily events of one body, in rise/set/mc/ic order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct Transits {
    pub rise: Option<NaiveTime>,
    pub set: Option<NaiveTime>,
    pub mc: Option<NaiveTime>,
    pub ic: Option<NaiveTime>,
}

impl Transits {
    pub fn get(&self, kind: TransitKind) -> Option<NaiveTime> {
        match kind {
            TransitKind::Rise => self.rise,
            TransitKind::Set => self.set,
            TransitKind::UpperTransit => self.mc,
            TransitKind::LowerTransit => self.ic,
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (TransitKind, Option<NaiveTime>)> + '_ {
        TransitKind::ALL.iter().map(move |&kind| (kind, self.get(kind)))
    }
}

pub static SUN: Celestial = Celestial::planet("Sun", SE_SUN);
pub static MOON: Celestial = Celestial::planet("Moon", SE_MOON);
pub static MERCURY: Celestial = Celestial::planet("Mercury", SE_MERCURY);
pub static VENUS: Celestial = Celestial::planet("Venus", SE_VENUS);
pub static EARTH: Celestial = Celestial::planet("Earth", SE_EARTH);
pub static MARS: Celestial = Celestial::planet("Mars", SE_MARS);
pub static JUPITER: Celestial = Celestial::planet("Jupiter", SE_JUPITER);
pub static SATURN: Celestial = Celestial::planet("Saturn", SE_SATURN);
pub static URANUS: Celestial = Celestial::planet("Uranus", SE_URANUS);
pub static NEPTUNE: Celestial = Celestial::planet("Neptune", SE_NEPTUNE);
pub static PLUTO: Celestial = Celestial::planet("Pluto", SE_PLUTO);
pub static ERIS: Celestial = Celestial::planet("Eris", SE_AST_OFFSET + 136199);
pub static CETO: Celestial = Celestial::planet("Ceto", SE_AST_OFFSET + 65489);
pub static SEDNA: Celestial = Celestial::planet("Sedna", SE_AST_OFFSET + 90377);

/// Second focal points of the orbits.
pub mod second_focus {
    use super::*;

    pub static MOON: Celestial = Celestial::apsis_node("BE Moon", SE_MOON, OrbitalPoint::SecondFocus);
    pub static MERCURY: Celestial = Celestial::apsis_node("BS Mercury", SE_MERCURY, OrbitalPoint::SecondFocus);
    pub static VENUS: Celestial = Celestial::apsis_node("BS Venus", SE_VENUS, OrbitalPoint::SecondFocus);
    pub static EARTH: Celestial = Celestial::apsis_node("BS Earth", SE_EARTH, OrbitalPoint::SecondFocus);
    pub static MARS: Celestial = Celestial::apsis_node("BS Mars", SE_MARS, OrbitalPoint::SecondFocus);
    pub static JUPITER: Celestial = Celestial::apsis_node("BS Jupiter", SE_JUPITER, OrbitalPoint::SecondFocus);
    pub static SATURN: Celestial = Celestial::apsis_node("BS Saturn", SE_SATURN, OrbitalPoint::SecondFocus);
    pub static URANUS: Celestial = Celestial::apsis_node("BS Uranus", SE_URANUS, OrbitalPoint::SecondFocus);
    pub static NEPTUNE: Celestial = Celestial::apsis_node("BS Neptune", SE_NEPTUNE, OrbitalPoint::SecondFocus);
}

/// The seven classical bodies in Chaldean weekday order.
pub static SEPTENER: [&Celestial; 7] = [&SUN, &MARS, &MOON, &MERCURY, &JUPITER, &VENUS, &SATURN];

pub static NOVILE: [&Celestial; 9] = [
    &SUN, &MARS, &MOON, &MERCURY, &JUPITER, &VENUS, &SATURN, &URANUS, &NEPTUNE,
];

lazy_static::lazy_static! {
    static ref REGISTRY: HashMap<String, &'static Celestial> = {
        let all: [&'static Celestial; 23] = [
            &SUN, &MOON, &MERCURY, &VENUS, &EARTH, &MARS, &JUPITER, &SATURN, &URANUS,
            &NEPTUNE, &PLUTO, &ERIS, &CETO, &SEDNA,
            &second_focus::MOON, &second_focus::MERCURY, &second_focus::VENUS,
            &second_focus::EARTH, &second_focus::MARS, &second_focus::JUPITER,
            &second_focus::SATURN, &second_focus::URANUS, &second_focus::NEPTUNE,
        ];
        all.into_iter().map(|c| (c.name().to_lowercase(), c)).collect()
    };
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_provider_id_by_name() {
        assert_eq!(provider_id_by_name("Sun").unwrap(), 0);
        assert_eq!(provider_id_by_name("SEDNA").unwrap(), 100377);
        assert_eq!(
            provider_id_by_name("Vulcan"),
            Err(AstrologError::UnknownBodyName("Vulcan".to_string()))
        );
    }

    #[test]
    fn test_registry_lookup_returns_singletons() {
        assert!(std::ptr::eq(Celestial::by_name("moon").unwrap(), &MOON));
        assert!(std::ptr::eq(Celestial::by_name("bs mars").unwrap(), &second_focus::MARS));
        assert!(Celestial::by_name("Quaoar").is_err());
    }

    #[test]
    fn test_kind_flags() {
        assert!(!SUN.is_fixed() && !SUN.is_focal_point());
        assert!(second_focus::SATURN.is_focal_point());
        let regulus = Celestial::fixed("Regulus", "Regulus");
        assert!(regulus.is_fixed() && !regulus.is_focal_point());
        assert_eq!(regulus.provider_id(), ProviderId::Star("Regulus"));
    }
}
