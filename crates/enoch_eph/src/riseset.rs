//! Oracle-based sunset computation.
//!
//! Hour-angle method: convert the Sun's ecliptic longitude to equatorial
//! coordinates, derive the setting hour angle for the standard refracted
//! altitude (-0.8333 deg), and iterate against Greenwich sidereal time
//! until the setting instant converges. Five iterations suffice because
//! the Sun's coordinates change slowly over a day.

use tracing::debug;

use crate::{Body, Ephemeris, EphemerisError, GeoCoordinate};

const DEG: f64 = std::f64::consts::PI / 180.0;

/// Refracted-limb altitude of the Sun at rise/set (degrees).
const SET_ALTITUDE_DEG: f64 = -0.8333;

/// Sidereal rate in degrees per day.
const SIDEREAL_RATE: f64 = 360.985_647_366_29;

const MAX_ITERATIONS: usize = 5;

/// Outcome of a sunset computation for one civil day.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SunsetOutcome {
    /// Sunset occurs; the JD (UT) of the event.
    Event(f64),
    /// Sun stays below the horizon all day (polar night).
    NeverRises,
    /// Sun stays above the horizon all day (midnight sun).
    NeverSets,
}

/// Mean Greenwich sidereal time in degrees at `jd` (UT).
pub(crate) fn gmst_deg(jd: f64) -> f64 {
    (280.460_618_37 + SIDEREAL_RATE * (jd - 2_451_545.0)).rem_euclid(360.0)
}

/// Mean obliquity of the ecliptic in degrees.
pub(crate) fn obliquity_deg(jd: f64) -> f64 {
    let t = (jd - 2_451_545.0) / 36_525.0;
    23.439_291_1 - 0.013_004_2 * t
}

/// Sun's right ascension and declination (degrees) from its ecliptic longitude.
fn sun_equatorial(eph: &dyn Ephemeris, jd: f64) -> Result<(f64, f64), EphemerisError> {
    let sun = eph.ecliptic(Body::Sun, jd)?;
    let lam = sun.lon_deg * DEG;
    let eps = obliquity_deg(jd) * DEG;
    let ra = (eps.cos() * lam.sin()).atan2(lam.cos()) / DEG;
    let dec = (eps.sin() * lam.sin()).asin() / DEG;
    Ok((ra.rem_euclid(360.0), dec))
}

fn wrap_pm180(deg: f64) -> f64 {
    let mut d = deg % 360.0;
    if d > 180.0 {
        d -= 360.0;
    } else if d <= -180.0 {
        d += 360.0;
    }
    d
}

/// Compute the sunset instant for the civil day starting at `jd0` (0h UT).
///
/// Iterates the hour-angle condition; returns `NeverRises`/`NeverSets`
/// at polar latitudes where the setting hour angle does not exist.
pub fn sunset_jd(
    eph: &dyn Ephemeris,
    jd0: f64,
    geo: &GeoCoordinate,
) -> Result<SunsetOutcome, EphemerisError> {
    let lat = geo.latitude_deg() * DEG;
    let lon = geo.longitude_deg();

    // First guess: 18:00 local mean time.
    let mut t = jd0 + 0.75 - lon / 360.0;

    for _ in 0..MAX_ITERATIONS {
        let (ra, dec) = sun_equatorial(eph, t)?;
        let dec_r = dec * DEG;

        let cos_h =
            ((SET_ALTITUDE_DEG * DEG).sin() - lat.sin() * dec_r.sin()) / (lat.cos() * dec_r.cos());
        if cos_h > 1.0 {
            debug!(jd0, lat = geo.latitude_deg(), "polar night, sun never rises");
            return Ok(SunsetOutcome::NeverRises);
        }
        if cos_h < -1.0 {
            debug!(jd0, lat = geo.latitude_deg(), "midnight sun, sun never sets");
            return Ok(SunsetOutcome::NeverSets);
        }
        let h_set = cos_h.acos() / DEG; // setting hour angle, positive west

        // Local hour angle of the Sun right now.
        let lha = wrap_pm180(gmst_deg(t) + lon - ra);
        let correction = wrap_pm180(h_set - lha) / SIDEREAL_RATE;
        t += correction;
        if correction.abs() < 1e-7 {
            break;
        }
    }

    Ok(SunsetOutcome::Event(t))
}
