//! Eclipse detection from scanned new/full moons.
//!
//! Lunar: filter full moons by the Moon's ecliptic latitude, compute Earth
//! shadow radii at the Moon's distance (Danjon augmented method), classify
//! by comparing the Moon's offset from the shadow axis to the radii.
//!
//! Solar: filter new moons the same way, then compare apparent Sun/Moon
//! angular radii against the separation reduced by the Moon's horizontal
//! parallax. The reduction stands in for the best-placed observer on
//! Earth's surface; no per-site circumstances are computed.
//!
//! Shadow geometry after standard spherical astronomy (Meeus Ch. 54,
//! IAU 2015 nominal radii). Magnitudes are geocentric.

use enoch_core::UT_TO_TT_DAYS;
use enoch_eph::{Body, Ephemeris};
use tracing::debug;

use crate::eclipse_types::{LunarEclipse, LunarEclipseKind, SolarEclipse, SolarEclipseKind};
use crate::error::SearchError;
use crate::events::{PhaseEvent, PhaseKind};

// ---------------------------------------------------------------------------
// Constants (IAU 2015 nominal values)
// ---------------------------------------------------------------------------

/// Earth equatorial radius in km.
const EARTH_RADIUS_KM: f64 = 6378.137;

/// Sun nominal radius in km.
const SUN_RADIUS_KM: f64 = 696_000.0;

/// Moon mean radius in km.
const MOON_RADIUS_KM: f64 = 1737.4;

/// Danjon atmospheric enlargement of Earth's shadow (~2%).
const DANJON_ENLARGEMENT: f64 = 1.02;

/// Ecliptic latitude filter for eclipse candidacy (degrees). Generous;
/// exact geometry decides afterward.
const ECLIPSE_LAT_THRESHOLD_DEG: f64 = 2.0;

// ---------------------------------------------------------------------------
// Geometry helpers
// ---------------------------------------------------------------------------

/// Earth shadow angular radii (penumbral, umbral) in degrees at the
/// Moon's distance, Danjon enlarged.
fn shadow_radii_deg(sun_dist_km: f64, moon_dist_km: f64) -> (f64, f64) {
    let pi_sun = (EARTH_RADIUS_KM / sun_dist_km).asin();
    let pi_moon = (EARTH_RADIUS_KM / moon_dist_km).asin();
    let s_sun = (SUN_RADIUS_KM / sun_dist_km).asin();

    let penumbral = DANJON_ENLARGEMENT * (pi_moon + pi_sun + s_sun);
    let umbral = DANJON_ENLARGEMENT * (pi_moon + pi_sun - s_sun);
    (penumbral.to_degrees(), umbral.to_degrees())
}

fn moon_angular_radius_deg(moon_dist_km: f64) -> f64 {
    (MOON_RADIUS_KM / moon_dist_km).asin().to_degrees()
}

fn sun_angular_radius_deg(sun_dist_km: f64) -> f64 {
    (SUN_RADIUS_KM / sun_dist_km).asin().to_degrees()
}

/// Angular separation of two ecliptic directions (degrees).
fn angular_separation_deg(lon1: f64, lat1: f64, lon2: f64, lat2: f64) -> f64 {
    let (l1, b1) = (lon1.to_radians(), lat1.to_radians());
    let (l2, b2) = (lon2.to_radians(), lat2.to_radians());
    let cos_sep = b1.sin() * b2.sin() + b1.cos() * b2.cos() * (l1 - l2).cos();
    cos_sep.clamp(-1.0, 1.0).acos().to_degrees()
}

/// Classify a lunar eclipse from shadow geometry; `None` means no eclipse.
fn classify_lunar(
    shadow_offset_deg: f64,
    moon_radius_deg: f64,
    umbral_radius_deg: f64,
    penumbral_radius_deg: f64,
) -> Option<LunarEclipseKind> {
    let near_edge = shadow_offset_deg - moon_radius_deg;
    let far_edge = shadow_offset_deg + moon_radius_deg;

    if near_edge >= penumbral_radius_deg {
        None
    } else if far_edge <= umbral_radius_deg {
        Some(LunarEclipseKind::Total)
    } else if near_edge < umbral_radius_deg {
        Some(LunarEclipseKind::Partial)
    } else {
        Some(LunarEclipseKind::Penumbral)
    }
}

/// Classify a geocentric solar eclipse; `None` means no overlap.
fn classify_solar(
    sun_radius_deg: f64,
    moon_radius_deg: f64,
    min_separation_deg: f64,
) -> Option<SolarEclipseKind> {
    if min_separation_deg >= sun_radius_deg + moon_radius_deg {
        return None;
    }
    if min_separation_deg < (moon_radius_deg - sun_radius_deg).abs() {
        if moon_radius_deg >= sun_radius_deg {
            Some(SolarEclipseKind::Total)
        } else {
            Some(SolarEclipseKind::Annular)
        }
    } else {
        Some(SolarEclipseKind::Partial)
    }
}

// ---------------------------------------------------------------------------
// Eclipse computation per syzygy
// ---------------------------------------------------------------------------

fn lunar_eclipse_at(eph: &dyn Ephemeris, full_moon_jd: f64) -> Result<Option<LunarEclipse>, SearchError> {
    let jd = full_moon_jd + UT_TO_TT_DAYS;
    let moon = eph.ecliptic(Body::Moon, jd)?;
    if moon.lat_deg.abs() > ECLIPSE_LAT_THRESHOLD_DEG {
        return Ok(None);
    }
    let sun = eph.ecliptic(Body::Sun, jd)?;

    let (penumbral_r, umbral_r) = shadow_radii_deg(sun.distance_km, moon.distance_km);
    let moon_r = moon_angular_radius_deg(moon.distance_km);

    // Offset of the Moon from the anti-solar shadow axis.
    let anti_lon = (sun.lon_deg + 180.0).rem_euclid(360.0);
    let offset = angular_separation_deg(moon.lon_deg, moon.lat_deg, anti_lon, 0.0);

    let Some(kind) = classify_lunar(offset, moon_r, umbral_r, penumbral_r) else {
        return Ok(None);
    };
    debug!(jd = full_moon_jd, ?kind, offset_deg = offset, "lunar eclipse");

    let umbral_magnitude = (umbral_r - offset + moon_r) / (2.0 * moon_r);
    let penumbral_magnitude = (penumbral_r - offset + moon_r) / (2.0 * moon_r);

    Ok(Some(LunarEclipse {
        kind,
        jd: full_moon_jd,
        umbral_magnitude,
        penumbral_magnitude,
        moon_lat_deg: moon.lat_deg,
    }))
}

fn solar_eclipse_at(eph: &dyn Ephemeris, new_moon_jd: f64) -> Result<Option<SolarEclipse>, SearchError> {
    let jd = new_moon_jd + UT_TO_TT_DAYS;
    let moon = eph.ecliptic(Body::Moon, jd)?;
    if moon.lat_deg.abs() > ECLIPSE_LAT_THRESHOLD_DEG {
        return Ok(None);
    }
    let sun = eph.ecliptic(Body::Sun, jd)?;

    let sun_r = sun_angular_radius_deg(sun.distance_km);
    let moon_r = moon_angular_radius_deg(moon.distance_km);
    let sep = angular_separation_deg(moon.lon_deg, moon.lat_deg, sun.lon_deg, sun.lat_deg);

    // A surface observer can cut the geocentric separation by up to the
    // Moon's horizontal parallax.
    let parallax = (EARTH_RADIUS_KM / moon.distance_km).asin().to_degrees();
    let sep_eff = (sep - parallax).max(0.0);

    let Some(kind) = classify_solar(sun_r, moon_r, sep_eff) else {
        return Ok(None);
    };
    debug!(jd = new_moon_jd, ?kind, separation_deg = sep, "solar eclipse");

    let magnitude = match kind {
        SolarEclipseKind::Partial => (moon_r + sun_r - sep_eff) / (2.0 * sun_r),
        SolarEclipseKind::Annular | SolarEclipseKind::Total => moon_r / sun_r,
    };

    Ok(Some(SolarEclipse {
        kind,
        jd: new_moon_jd,
        magnitude,
        moon_lat_deg: moon.lat_deg,
    }))
}

// ---------------------------------------------------------------------------
// Span search driven by scanned phase events
// ---------------------------------------------------------------------------

/// Lunar eclipses among already-refined full moons.
pub fn lunar_eclipses(
    eph: &dyn Ephemeris,
    phase_events: &[PhaseEvent],
) -> Result<Vec<LunarEclipse>, SearchError> {
    let mut out = Vec::new();
    for ev in phase_events.iter().filter(|e| e.kind == PhaseKind::Full) {
        if let Some(e) = lunar_eclipse_at(eph, ev.jd)? {
            out.push(e);
        }
    }
    Ok(out)
}

/// Geocentric solar eclipses among already-refined new moons.
pub fn solar_eclipses(
    eph: &dyn Ephemeris,
    phase_events: &[PhaseEvent],
) -> Result<Vec<SolarEclipse>, SearchError> {
    let mut out = Vec::new();
    for ev in phase_events.iter().filter(|e| e.kind == PhaseKind::New) {
        if let Some(e) = solar_eclipse_at(eph, ev.jd)? {
            out.push(e);
        }
    }
    Ok(out)
}
