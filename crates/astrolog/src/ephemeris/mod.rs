//! Access to the raw ephemeris computation.
//!
//! Everything here sits behind [`EphemerisProvider`]. The observer location is
//! passed into every call, so a provider holds no per-chart state and two
//! charts with different observers can be queried side by side.

pub mod snapshot;
#[cfg(feature = "swisseph")]
pub mod swiss;
pub mod types;

pub use snapshot::{EventRecord, OrbitalRecord, PositionRecord, SnapshotEphemeris, SnapshotTarget};
#[cfg(feature = "swisseph")]
pub use swiss::SwissEphemerisAdapter;
pub use types::{
    CalendarInstant, Frame, HorizontalPosition, JulianDay, NodeMode, OrbitalMethod,
    OrbitalPoints, Origin, PositionRequest, ProviderId, RawPosition, TransitKind,
};

use crate::angle::{Angle, GeoLocation};
use crate::error::Result;
use chrono::{Datelike, NaiveDate};

/// Narrow interface onto an ephemeris engine.
pub trait EphemerisProvider {
    /// Calendar date plus hour fraction (UT) to the provider's time scale.
    fn to_internal_time(&self, date: NaiveDate, hour: f64) -> JulianDay {
        JulianDay::from_calendar(date.year(), date.month(), date.day(), hour)
    }

    fn to_calendar(&self, time: JulianDay) -> CalendarInstant {
        time.to_calendar()
    }

    /// Position of a numbered body. Fails with `UnknownBody` for ids the
    /// provider does not know.
    fn body_position(
        &self,
        body: i32,
        time: JulianDay,
        observer: &GeoLocation,
        request: PositionRequest,
    ) -> Result<RawPosition>;

    /// Nodes and apsides of a body's orbit. `request.mean` is ignored in
    /// favour of `method.mode`.
    fn orbital_points(
        &self,
        body: i32,
        time: JulianDay,
        observer: &GeoLocation,
        method: OrbitalMethod,
        request: PositionRequest,
    ) -> Result<OrbitalPoints>;

    /// Position of a catalog star. Fails with `UnknownStar`.
    fn fixed_star_position(
        &self,
        key: &str,
        time: JulianDay,
        observer: &GeoLocation,
        request: PositionRequest,
    ) -> Result<RawPosition>;

    /// Horizontal position of `target`, given as (longitude, latitude) or
    /// (right ascension, declination) depending on `frame`.
    fn azimuth_altitude(
        &self,
        time: JulianDay,
        frame: Frame,
        observer: &GeoLocation,
        target: (Angle, Angle),
    ) -> Result<HorizontalPosition>;

    /// First `event` of `target` after `start`, or `None` if the body does not
    /// cross that circle.
    fn find_event(
        &self,
        start: JulianDay,
        target: ProviderId<'_>,
        event: TransitKind,
        observer: &GeoLocation,
    ) -> Result<Option<JulianDay>>;
}
