use super::types::{
    CalendarInstant, Frame, HorizontalPosition, JulianDay, NodeMode, OrbitalMethod,
    OrbitalPoints, Origin, PositionRequest, ProviderId, RawPosition, TransitKind,
};
use super::EphemerisProvider;
use crate::angle::{Angle, GeoLocation};
use crate::error::{AstrologError, Result};
use chrono::{Datelike, NaiveDate};
use libswisseph_sys as raw;
use std::env;
use std::os::raw::c_char;
use std::path::PathBuf;
use std::ptr;
use std::sync::{Mutex, MutexGuard};
use swisseph::swe;

// Swiss Ephemeris flag values (swephexp.h)
const FLG_SWIEPH: i32 = 2;
const FLG_HELCTR: i32 = 8;
const FLG_SPEED: i32 = 256;
const FLG_EQUATORIAL: i32 = 2048;
const FLG_BARYCTR: i32 = 16384;
const FLG_TOPOCTR: i32 = 32768;

const NODBIT_MEAN: i32 = 1;
const NODBIT_OSCU: i32 = 2;
const NODBIT_FOPOINT: i32 = 256;

const CALC_RISE: i32 = 1;
const CALC_SET: i32 = 2;
const CALC_MTRANSIT: i32 = 4;
const CALC_ITRANSIT: i32 = 8;
const BIT_DISC_CENTER: i32 = 256;
const BIT_NO_REFRACTION: i32 = 512;
const BIT_ASTRO_TWILIGHT: i32 = 4096;
const BIT_FIXED_DISC_SIZE: i32 = 16384;

const ECL2HOR: i32 = 0;
const EQU2HOR: i32 = 1;

const GREG_CAL: i32 = 1;

const ERR_CIRCUMPOLAR: i32 = -2;

// AS_MAXCH, the size the engine expects for names and error text
const BUFFER_LEN: usize = 256;

/// Swiss Ephemeris adapter implementation
///
/// The engine keeps the topocentric observer as global state, so every call
/// takes the lock, sets the observer it was given and only then computes.
pub struct SwissEphemerisAdapter {
    ephemeris_path: PathBuf,
    engine: Mutex<()>,
}

impl SwissEphemerisAdapter {
    /// Create a new adapter with optional ephemeris path
    pub fn new(ephemeris_path: Option<PathBuf>) -> anyhow::Result<Self> {
        let path = ephemeris_path.unwrap_or_else(|| {
            env::var("SWISS_EPHEMERIS_PATH")
                .map(PathBuf::from)
                .unwrap_or_else(|_| PathBuf::from("/usr/local/share/swisseph"))
        });

        if !path.exists() {
            anyhow::bail!(
                "Ephemeris path {} does not exist. Please ensure Swiss Ephemeris data files are installed.",
                path.display()
            );
        }

        let path_text = path.to_string_lossy();
        if path_text.contains('\0') {
            anyhow::bail!("Ephemeris path {} contains a NUL byte", path.display());
        }
        swe::set_ephe_path(&path_text);
        log::debug!("Swiss Ephemeris data path set to {}", path.display());

        Ok(Self {
            ephemeris_path: path,
            engine: Mutex::new(()),
        })
    }

    pub fn ephemeris_path(&self) -> &PathBuf {
        &self.ephemeris_path
    }

    fn lock_at(&self, observer: &GeoLocation) -> MutexGuard<'_, ()> {
        // A poisoned lock only means another query panicked; the engine state
        // is reset below anyway.
        let guard = self.engine.lock().unwrap_or_else(|e| e.into_inner());
        unsafe {
            raw::swe_set_topo(observer.longitude.degrees(), observer.latitude.degrees(), 0.0);
        }
        guard
    }
}

fn position_flags(request: PositionRequest) -> i32 {
    let mut flags = FLG_SWIEPH;
    flags |= match request.origin {
        Origin::Topocentric => FLG_TOPOCTR,
        Origin::Geocentric => 0,
        Origin::Heliocentric => FLG_HELCTR,
        Origin::Barycentric => FLG_BARYCTR,
    };
    if request.speed {
        flags |= FLG_SPEED;
    }
    if request.frame == Frame::Equatorial {
        flags |= FLG_EQUATORIAL;
    }
    flags
}

/// Star name as a writable C buffer. The engine writes the resolved name back.
fn star_buffer(key: &str) -> Result<[c_char; BUFFER_LEN]> {
    let bytes = key.as_bytes();
    if bytes.is_empty() || bytes.len() >= BUFFER_LEN || bytes.contains(&0) {
        return Err(AstrologError::UnknownStar(key.to_string()));
    }
    let mut buffer = [0 as c_char; BUFFER_LEN];
    for (slot, &byte) in buffer.iter_mut().zip(bytes) {
        *slot = byte as c_char;
    }
    Ok(buffer)
}

fn error_text(serr: &[c_char]) -> String {
    let bytes: Vec<u8> = serr.iter().take_while(|&&c| c != 0).map(|&c| c as u8).collect();
    String::from_utf8_lossy(&bytes).into_owned()
}

fn raw_from_array(out: [f64; 6]) -> RawPosition {
    RawPosition {
        lon: out[0],
        lat: out[1],
        dist: Some(out[2]),
        lon_speed: out[3],
        lat_speed: out[4],
        dist_speed: Some(out[5]),
    }
}

impl EphemerisProvider for SwissEphemerisAdapter {
    fn to_internal_time(&self, date: NaiveDate, hour: f64) -> JulianDay {
        JulianDay(swe::julday(
            date.year(),
            date.month() as i32,
            date.day() as i32,
            hour,
            GREG_CAL as u32,
        ))
    }

    fn to_calendar(&self, time: JulianDay) -> CalendarInstant {
        let (year, month, day, hour) = swe::revjul(time.0, GREG_CAL);
        CalendarInstant {
            year,
            month: month as u32,
            day: day as u32,
            hour,
        }
    }

    fn body_position(
        &self,
        body: i32,
        time: JulianDay,
        observer: &GeoLocation,
        request: PositionRequest,
    ) -> Result<RawPosition> {
        let _engine = self.lock_at(observer);
        log::trace!("swe calc_ut {} at {}", body, time);
        let result = swe::calc_ut(time.0, body as u32, position_flags(request) as u32).map_err(|e| {
            AstrologError::CalculationFailed {
                target: format!("body {body}"),
                message: format!("Swiss Ephemeris error: {e}"),
            }
        })?;
        Ok(raw_from_array(result.out))
    }

    fn orbital_points(
        &self,
        body: i32,
        time: JulianDay,
        observer: &GeoLocation,
        method: OrbitalMethod,
        request: PositionRequest,
    ) -> Result<OrbitalPoints> {
        let mut bits = match method.mode {
            NodeMode::Mean => NODBIT_MEAN,
            NodeMode::Osculating => NODBIT_OSCU,
        };
        if method.second_focus {
            bits |= NODBIT_FOPOINT;
        }
        let mut asc = [0.0; 6];
        let mut dsc = [0.0; 6];
        let mut peri = [0.0; 6];
        let mut apo = [0.0; 6];
        let mut serr = [0 as c_char; BUFFER_LEN];
        let _engine = self.lock_at(observer);
        log::trace!("swe nod_aps_ut {} {:?} at {}", body, method, time);
        // Each output array holds the six doubles the engine writes
        let code = unsafe {
            raw::swe_nod_aps_ut(
                time.0,
                body,
                position_flags(request),
                bits,
                asc.as_mut_ptr(),
                dsc.as_mut_ptr(),
                peri.as_mut_ptr(),
                apo.as_mut_ptr(),
                serr.as_mut_ptr(),
            )
        };
        if code < 0 {
            return Err(AstrologError::CalculationFailed {
                target: format!("nodes of body {body}"),
                message: format!("Swiss Ephemeris error: {}", error_text(&serr)),
            });
        }
        Ok(OrbitalPoints {
            ascending_node: raw_from_array(asc),
            descending_node: raw_from_array(dsc),
            periapsis: raw_from_array(peri),
            apoapsis: raw_from_array(apo),
        })
    }

    fn fixed_star_position(
        &self,
        key: &str,
        time: JulianDay,
        observer: &GeoLocation,
        request: PositionRequest,
    ) -> Result<RawPosition> {
        let mut star = star_buffer(key)?;
        let _engine = self.lock_at(observer);
        log::trace!("swe fixstar_ut {} at {}", key, time);
        let result = swe::fixstar_ut(star.as_mut_ptr(), time.0, position_flags(request)).map_err(|e| {
            log::debug!("star {} not resolved: {}", key, e);
            AstrologError::UnknownStar(key.to_string())
        })?;
        Ok(raw_from_array(result.out))
    }

    fn azimuth_altitude(
        &self,
        time: JulianDay,
        frame: Frame,
        observer: &GeoLocation,
        target: (Angle, Angle),
    ) -> Result<HorizontalPosition> {
        let mode = match frame {
            Frame::Ecliptic => ECL2HOR,
            Frame::Equatorial => EQU2HOR,
        };
        let mut geopos = [observer.longitude.degrees(), observer.latitude.degrees(), 0.0];
        let mut xin = [target.0.degrees(), target.1.degrees(), 0.0];
        let mut xaz = [0.0; 3];
        let _engine = self.lock_at(observer);
        unsafe {
            raw::swe_azalt(
                time.0,
                mode,
                geopos.as_mut_ptr(),
                0.0,
                0.0,
                xin.as_mut_ptr(),
                xaz.as_mut_ptr(),
            );
        }
        let [azimuth, true_altitude, apparent_altitude] = xaz;
        Ok(HorizontalPosition {
            azimuth,
            true_altitude,
            apparent_altitude,
        })
    }

    fn find_event(
        &self,
        start: JulianDay,
        target: ProviderId<'_>,
        event: TransitKind,
        observer: &GeoLocation,
    ) -> Result<Option<JulianDay>> {
        let rsmi = match event {
            TransitKind::Rise => CALC_RISE,
            TransitKind::Set => CALC_SET,
            TransitKind::UpperTransit => CALC_MTRANSIT,
            TransitKind::LowerTransit => CALC_ITRANSIT,
        } | BIT_DISC_CENTER
            | BIT_FIXED_DISC_SIZE
            | BIT_NO_REFRACTION
            | BIT_ASTRO_TWILIGHT;
        // A null name selects a body, otherwise the body number is ignored
        let mut star = match target {
            ProviderId::Body(_) => None,
            ProviderId::Star(key) => Some(star_buffer(key)?),
        };
        let body = match target {
            ProviderId::Body(id) => id,
            ProviderId::Star(_) => 0,
        };
        let star_ptr = star.as_mut().map_or(ptr::null_mut(), |buffer| buffer.as_mut_ptr());
        let mut geopos = [observer.longitude.degrees(), observer.latitude.degrees(), 0.0];
        let mut tret = 0.0;
        let mut serr = [0 as c_char; BUFFER_LEN];
        let _engine = self.lock_at(observer);
        log::trace!("swe rise_trans {} {} from {}", target, event, start);
        let code = unsafe {
            raw::swe_rise_trans(
                start.0,
                body,
                star_ptr,
                FLG_SWIEPH | FLG_TOPOCTR,
                rsmi,
                geopos.as_mut_ptr(),
                0.0,
                0.0,
                &mut tret,
                serr.as_mut_ptr(),
            )
        };
        match code {
            ERR_CIRCUMPOLAR => Ok(None),
            c if c < 0 => Err(AstrologError::CalculationFailed {
                target: target.to_string(),
                message: format!("Swiss Ephemeris error: {}", error_text(&serr)),
            }),
            _ => Ok(Some(JulianDay(tret))),
        }
    }
}
