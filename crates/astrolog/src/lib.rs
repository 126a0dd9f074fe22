pub mod angle;
pub mod celestial;
pub mod config;
pub mod coords;
pub mod ephemeris;
pub mod error;
pub mod natal;
pub mod zodiac;

pub use angle::{Angle, AngularSpeed, Aspect, Au, AuSpeed, GeoLocation};
pub use celestial::{Celestial, CelestialKind, OrbitalPoint, Transits};
pub use config::ChartConfig;
pub use coords::{
    BaryCoord, BarySpeed, EclCoord, EclSpeed, EquatorCoord, EquatorSpeed, HelioCoord, HelioSpeed,
    HorCoord,
};
pub use ephemeris::{EphemerisProvider, SnapshotEphemeris};
#[cfg(feature = "swisseph")]
pub use ephemeris::SwissEphemerisAdapter;
pub use error::{AstrologError, Result};
pub use natal::{AspectHit, Natal, NatalObject, Paran, Selection, TransitEvent};
pub use zodiac::{Zodiac, ZodiacConstell};
