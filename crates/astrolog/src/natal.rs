//! Natal chart: a set of bodies bound to one birth instant and place, and the
//! relations between them.

use crate::angle::{Angle, Aspect, GeoLocation};
use crate::celestial::{internal_time, Celestial, Transits};
use crate::coords::{EclCoord, EclSpeed, EquatorCoord, HorCoord};
use crate::ephemeris::{EphemerisProvider, Frame, JulianDay, PositionRequest, TransitKind};
use crate::error::{AstrologError, Result};
use crate::zodiac::{Zodiac, ZodiacConstell};
use chrono::{DateTime, Duration, NaiveTime, Utc};
use std::fmt;
use std::ptr;
use std::sync::OnceLock;

/// Orb used by [`Natal::aspects`] when the caller has no preference.
pub const DEFAULT_CHART_ORB: f64 = 1.01;

/// Time window in minutes used by [`Natal::parans`] when the caller has no
/// preference.
pub const DEFAULT_PARAN_ORB_MINUTES: i64 = 5;

fn memoized<T: Copy>(cell: &OnceLock<T>, compute: impl FnOnce() -> Result<T>) -> Result<T> {
    if let Some(value) = cell.get() {
        return Ok(*value);
    }
    let value = compute()?;
    Ok(*cell.get_or_init(|| value))
}

/// One body of a chart. Ecliptic and equatorial coordinates and the transit
/// set are computed on first access and kept for the object's lifetime.
///
/// An object in mean mode asks for the mean instead of the osculating orbit,
/// which only orbital points support.
pub struct NatalObject<'a, P: ?Sized> {
    celestial: &'a Celestial,
    birth: DateTime<Utc>,
    place: GeoLocation,
    provider: &'a P,
    mean: bool,
    ecl_coord: OnceLock<EclCoord>,
    equator_coord: OnceLock<EquatorCoord>,
    transits: OnceLock<Transits>,
}

impl<'a, P: EphemerisProvider + ?Sized> NatalObject<'a, P> {
    pub fn new(celestial: &'a Celestial, birth: DateTime<Utc>, place: GeoLocation, provider: &'a P) -> Self {
        Self {
            celestial,
            birth,
            place,
            provider,
            mean: false,
            ecl_coord: OnceLock::new(),
            equator_coord: OnceLock::new(),
            transits: OnceLock::new(),
        }
    }

    pub fn with_mean(mut self, mean: bool) -> Self {
        self.set_mean(mean);
        self
    }

    fn set_mean(&mut self, mean: bool) {
        if self.mean != mean {
            self.mean = mean;
            self.ecl_coord = OnceLock::new();
            self.equator_coord = OnceLock::new();
        }
    }

    pub fn is_mean(&self) -> bool {
        self.mean
    }

    pub fn name(&self) -> &str {
        self.celestial.name()
    }

    pub fn celestial(&self) -> &'a Celestial {
        self.celestial
    }

    pub fn birth(&self) -> DateTime<Utc> {
        self.birth
    }

    pub fn place(&self) -> &GeoLocation {
        &self.place
    }

    pub fn julday(&self) -> JulianDay {
        internal_time(self.provider, self.birth)
    }

    fn request(&self, frame: Frame) -> PositionRequest {
        let request = match frame {
            Frame::Ecliptic => PositionRequest::ecliptic(),
            Frame::Equatorial => PositionRequest::equatorial(),
        };
        request.with_mean(self.mean)
    }

    pub fn ecl_coord(&self) -> Result<EclCoord> {
        memoized(&self.ecl_coord, || {
            let raw = self
                .celestial
                .position(self.provider, self.julday(), &self.place, self.request(Frame::Ecliptic))?;
            Ok(EclCoord::from_raw(&raw))
        })
    }

    /// Ecliptic position with daily motion. Not cached.
    pub fn ecl_speed(&self) -> Result<EclSpeed> {
        let request = self.request(Frame::Ecliptic).with_speed(true);
        let raw = self.celestial.position(self.provider, self.julday(), &self.place, request)?;
        Ok(EclSpeed::from_raw(&raw))
    }

    pub fn equator_coord(&self) -> Result<EquatorCoord> {
        memoized(&self.equator_coord, || {
            let raw = self
                .celestial
                .position(self.provider, self.julday(), &self.place, self.request(Frame::Equatorial))?;
            Ok(EquatorCoord::from_raw(&raw))
        })
    }

    /// Horizontal position converted from the cached ecliptic coordinate.
    pub fn hor_coord(&self) -> Result<HorCoord> {
        let coord = self.ecl_coord()?;
        let hor = self.provider.azimuth_altitude(
            self.julday(),
            Frame::Ecliptic,
            &self.place,
            (coord.longitude, coord.latitude),
        )?;
        Ok(HorCoord::new(hor.azimuth, hor.true_altitude))
    }

    pub fn sign_pos(&self) -> Result<(Zodiac, f64)> {
        Ok(self.ecl_coord()?.sign_pos())
    }

    pub fn constell_pos(&self) -> Result<(ZodiacConstell, f64)> {
        Ok(self.ecl_coord()?.constell_pos())
    }

    pub fn house_pos(&self) -> Result<(u8, f64)> {
        Ok(self.hor_coord()?.house_pos())
    }

    /// Events on the birth date (UTC).
    pub fn transits(&self) -> Result<Transits> {
        memoized(&self.transits, || {
            self.celestial
                .transits(self.provider, self.birth.date_naive(), &self.place)
        })
    }
}

/// Bodies to take part in an aspect search.
#[derive(Debug, Clone, Copy, Default)]
pub enum Selection<'s> {
    /// Every body of the chart, in chart order
    #[default]
    All,
    One(&'s Celestial),
    Many(&'s [&'s Celestial]),
}

impl<'s> From<&'s Celestial> for Selection<'s> {
    fn from(celestial: &'s Celestial) -> Self {
        Selection::One(celestial)
    }
}

impl<'s> From<&'s [&'s Celestial]> for Selection<'s> {
    fn from(celestials: &'s [&'s Celestial]) -> Self {
        Selection::Many(celestials)
    }
}

impl<'s, const N: usize> From<&'s [&'s Celestial; N]> for Selection<'s> {
    fn from(celestials: &'s [&'s Celestial; N]) -> Self {
        Selection::Many(celestials.as_slice())
    }
}

/// Two bodies whose separation falls on an aspect.
#[derive(Debug, Clone, Copy)]
pub struct AspectHit<'s> {
    pub first: &'s Celestial,
    pub second: &'s Celestial,
    pub aspect: Aspect,
    pub separation: Angle,
}

impl fmt::Display for AspectHit<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} {} ({})", self.first, self.aspect, self.second, self.separation)
    }
}

/// A horizon or meridian crossing of one chart body.
#[derive(Debug, Clone, Copy)]
pub struct TransitEvent<'a> {
    pub kind: TransitKind,
    pub celestial: &'a Celestial,
    pub time: NaiveTime,
}

/// Two events of different bodies close together in time.
#[derive(Debug, Clone, Copy)]
pub struct Paran<'a> {
    /// The event recorded earlier while walking the chart
    pub first: TransitEvent<'a>,
    pub second: TransitEvent<'a>,
}

impl fmt::Display for Paran<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {} {} / {} {} {}",
            self.first.celestial,
            self.first.kind,
            self.first.time,
            self.second.celestial,
            self.second.kind,
            self.second.time
        )
    }
}

/// Natal chart
pub struct Natal<'a, P: ?Sized> {
    person: String,
    birth: DateTime<Utc>,
    place: GeoLocation,
    objects: Vec<NatalObject<'a, P>>,
}

impl<'a, P: EphemerisProvider + ?Sized> Natal<'a, P> {
    /// Bind `celestials` to the birth instant and place. A body listed twice
    /// (the same object, not just the same name) appears once, at its first
    /// position.
    pub fn new(
        person: impl Into<String>,
        birth: DateTime<Utc>,
        place: GeoLocation,
        celestials: &[&'a Celestial],
        provider: &'a P,
    ) -> Self {
        let mut objects: Vec<NatalObject<'a, P>> = Vec::with_capacity(celestials.len());
        for &celestial in celestials {
            if objects.iter().any(|o| ptr::eq(o.celestial, celestial)) {
                continue;
            }
            objects.push(NatalObject::new(celestial, birth, place, provider));
        }
        let person = person.into();
        log::debug!(
            "chart for {} at {} ({}, {}) with {} bodies",
            person,
            birth,
            place.longitude,
            place.latitude,
            objects.len()
        );
        Self {
            person,
            birth,
            place,
            objects,
        }
    }

    pub fn person(&self) -> &str {
        &self.person
    }

    pub fn birth(&self) -> DateTime<Utc> {
        self.birth
    }

    pub fn place(&self) -> &GeoLocation {
        &self.place
    }

    pub fn len(&self) -> usize {
        self.objects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, NatalObject<'a, P>> {
        self.objects.iter()
    }

    pub fn celestials(&self) -> impl Iterator<Item = &'a Celestial> + '_ {
        self.objects.iter().map(|o| o.celestial)
    }

    /// Chart entry for `celestial`, matched by identity.
    pub fn get(&self, celestial: &Celestial) -> Option<&NatalObject<'a, P>> {
        self.objects.iter().find(|o| ptr::eq(o.celestial, celestial))
    }

    pub fn object(&self, celestial: &Celestial) -> Result<&NatalObject<'a, P>> {
        self.get(celestial)
            .ok_or_else(|| AstrologError::NotInChart(celestial.name().to_string()))
    }

    /// Switch `celestial` to its mean orbit. Planets and stars have no mean
    /// form and are refused.
    pub fn with_mean(mut self, celestial: &Celestial) -> Result<Self> {
        if !celestial.is_focal_point() {
            return Err(AstrologError::UnsupportedOption {
                body: celestial.name().to_string(),
                option: "mean position".to_string(),
            });
        }
        let object = self
            .objects
            .iter_mut()
            .find(|o| ptr::eq(o.celestial, celestial))
            .ok_or_else(|| AstrologError::NotInChart(celestial.name().to_string()))?;
        object.set_mean(true);
        Ok(self)
    }

    fn resolve<'s>(&'s self, selection: Selection<'s>) -> Vec<&'s Celestial> {
        match selection {
            Selection::All => self.objects.iter().map(|o| o.celestial).collect(),
            Selection::One(celestial) => vec![celestial],
            Selection::Many(celestials) => celestials.to_vec(),
        }
    }

    /// Aspect between two chart bodies, if their separation forms one.
    pub fn aspect_between<'s>(
        &'s self,
        first: &'s Celestial,
        second: &'s Celestial,
        orb: f64,
    ) -> Result<Option<AspectHit<'s>>> {
        let separation = self.object(first)?.ecl_coord()? ^ self.object(second)?.ecl_coord()?;
        Ok(separation.classify_aspect(orb).map(|aspect| AspectHit {
            first,
            second,
            aspect,
            separation,
        }))
    }

    /// Lazily walk `of × to` and yield the pairs that form an aspect.
    ///
    /// For each body of `of` the walk over `to` stops at the first entry that
    /// is the same body. With both lists in chart order this visits every
    /// unordered pair once and never a body with itself.
    pub fn aspects<'s>(
        &'s self,
        orb: f64,
        of: impl Into<Selection<'s>>,
        to: impl Into<Selection<'s>>,
    ) -> Aspects<'s, 'a, P> {
        Aspects {
            natal: self,
            orb,
            first: self.resolve(of.into()),
            second: self.resolve(to.into()),
            i: 0,
            j: 0,
        }
    }

    /// Pairs of events from different bodies at most `orb` apart.
    ///
    /// Bodies are walked in chart order and their events in rise, set, mc, ic
    /// order. Each event is compared with every event recorded so far, then
    /// recorded under its time; an event at an already recorded time replaces
    /// the earlier one.
    pub fn parans(&self, orb: Duration) -> Result<Vec<Paran<'a>>> {
        let mut parans = Vec::new();
        let mut timeline: Vec<TransitEvent<'a>> = Vec::new();
        for object in &self.objects {
            let transits = object.transits()?;
            for (kind, time) in transits.iter() {
                let Some(time) = time else { continue };
                let event = TransitEvent {
                    kind,
                    celestial: object.celestial,
                    time,
                };
                for recorded in &timeline {
                    if ptr::eq(recorded.celestial, event.celestial) {
                        continue;
                    }
                    let delta = time.signed_duration_since(recorded.time);
                    if -orb <= delta && delta <= orb {
                        parans.push(Paran {
                            first: *recorded,
                            second: event,
                        });
                    }
                }
                match timeline.iter_mut().find(|e| e.time == time) {
                    Some(slot) => *slot = event,
                    None => timeline.push(event),
                }
            }
        }
        Ok(parans)
    }
}

impl<'n, 'a, P: EphemerisProvider + ?Sized> IntoIterator for &'n Natal<'a, P> {
    type Item = &'n NatalObject<'a, P>;
    type IntoIter = std::slice::Iter<'n, NatalObject<'a, P>>;

    fn into_iter(self) -> Self::IntoIter {
        self.objects.iter()
    }
}

/// Iterator returned by [`Natal::aspects`]. Position errors surface at the
/// element being computed; earlier elements stay valid.
pub struct Aspects<'s, 'a, P: ?Sized> {
    natal: &'s Natal<'a, P>,
    orb: f64,
    first: Vec<&'s Celestial>,
    second: Vec<&'s Celestial>,
    i: usize,
    j: usize,
}

impl<'s, 'a, P: EphemerisProvider + ?Sized> Iterator for Aspects<'s, 'a, P> {
    type Item = Result<AspectHit<'s>>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let cel1 = *self.first.get(self.i)?;
            match self.second.get(self.j) {
                Some(&cel2) if !ptr::eq(cel1, cel2) => {
                    self.j += 1;
                    match self.natal.aspect_between(cel1, cel2, self.orb) {
                        Ok(Some(hit)) => return Some(Ok(hit)),
                        Ok(None) => continue,
                        Err(e) => return Some(Err(e)),
                    }
                }
                _ => {
                    self.i += 1;
                    self.j = 0;
                }
            }
        }
    }
}
