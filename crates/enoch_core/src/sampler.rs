//! Sun/Moon state sampling with a bounded memo cache.
//!
//! Event scans evaluate the lunar state thousands of times per request,
//! frequently at repeated epochs (bisection re-probes bracket midpoints).
//! Results are memoized in an LRU cache keyed by JD rounded to 1e-6 days
//! (~86 ms), which is finer than any tolerance used downstream.

use std::num::NonZeroUsize;

use lru::LruCache;
use parking_lot::Mutex;
use tracing::warn;

use enoch_eph::{Body, Ephemeris};
use enoch_time::calendar_to_jd;

use crate::rootfind::norm360;

/// Fixed UT to dynamical-time offset in days (~69 s, adequate for
/// day-granularity phase work; documented approximation).
pub const UT_TO_TT_DAYS: f64 = 69.0 / 86_400.0;

/// Mean synodic month in days.
pub const SYNODIC_DAYS: f64 = 29.530_588_853;

/// Default cache capacity. A full 371-day scan at 6-hour steps plus
/// refinement touches a few thousand distinct epochs.
const DEFAULT_CACHE_CAPACITY: usize = 16_384;

/// Reference new moon: 2000-01-06 18:14 UT.
pub fn reference_new_moon_jd() -> f64 {
    calendar_to_jd(2000, 1, 6.0 + (18.0 + 14.0 / 60.0) / 24.0)
}

/// Sun/Moon state at one instant.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LunarState {
    /// Sun's geocentric ecliptic longitude (deg).
    pub sun_lon_deg: f64,
    /// Moon's geocentric ecliptic longitude (deg).
    pub moon_lon_deg: f64,
    /// Phase angle: moon longitude minus sun longitude, [0, 360).
    pub phase_deg: f64,
    /// Illuminated fraction, [0, 1].
    pub illumination: f64,
    /// Earth-Moon distance in km; `None` when the synodic fallback was used.
    pub moon_distance_km: Option<f64>,
    /// True when the closed-form fallback produced this state.
    pub approx: bool,
}

/// Memoizing Sun/Moon sampler over an ephemeris backend.
///
/// `state` never fails: when the backend errors, a closed-form synodic
/// model supplies phase and illumination (with a mean-sun longitude), and
/// the state is flagged `approx`.
pub struct SunMoonSampler<'e> {
    eph: &'e dyn Ephemeris,
    cache: Mutex<LruCache<i64, LunarState>>,
}

impl<'e> SunMoonSampler<'e> {
    pub fn new(eph: &'e dyn Ephemeris) -> Self {
        Self::with_capacity(eph, DEFAULT_CACHE_CAPACITY)
    }

    pub fn with_capacity(eph: &'e dyn Ephemeris, capacity: usize) -> Self {
        let cap = NonZeroUsize::new(capacity.max(1)).unwrap_or(NonZeroUsize::MIN);
        Self {
            eph,
            cache: Mutex::new(LruCache::new(cap)),
        }
    }

    pub fn ephemeris(&self) -> &'e dyn Ephemeris {
        self.eph
    }

    /// Sun/Moon state at `jd_ut`, memoized by rounded JD.
    pub fn state(&self, jd_ut: f64) -> LunarState {
        let key = (jd_ut * 1e6).round() as i64;
        if let Some(hit) = self.cache.lock().get(&key) {
            return *hit;
        }
        let state = self.compute(jd_ut);
        self.cache.lock().put(key, state);
        state
    }

    fn compute(&self, jd_ut: f64) -> LunarState {
        let jd = jd_ut + UT_TO_TT_DAYS;
        match (self.eph.ecliptic(Body::Sun, jd), self.eph.ecliptic(Body::Moon, jd)) {
            (Ok(sun), Ok(moon)) => {
                let phase = norm360(moon.lon_deg - sun.lon_deg);
                LunarState {
                    sun_lon_deg: norm360(sun.lon_deg),
                    moon_lon_deg: norm360(moon.lon_deg),
                    phase_deg: phase,
                    illumination: 0.5 * (1.0 - (phase.to_radians()).cos()),
                    moon_distance_km: Some(moon.distance_km),
                    approx: false,
                }
            }
            (sun_res, moon_res) => {
                if let Err(e) = sun_res {
                    warn!(jd_ut, error = %e, "sun query failed, using synodic fallback");
                } else if let Err(e) = moon_res {
                    warn!(jd_ut, error = %e, "moon query failed, using synodic fallback");
                }
                synodic_fallback(jd_ut)
            }
        }
    }

    /// Phase angle only; convenience for scan residuals.
    pub fn phase_deg(&self, jd_ut: f64) -> f64 {
        self.state(jd_ut).phase_deg
    }

    /// Moon distance, if the exact path is available.
    pub fn moon_distance_km(&self, jd_ut: f64) -> Option<f64> {
        self.state(jd_ut).moon_distance_km
    }
}

/// Closed-form synodic-month model. No distance; mean-sun longitude.
fn synodic_fallback(jd_ut: f64) -> LunarState {
    let age = (jd_ut - reference_new_moon_jd()).rem_euclid(SYNODIC_DAYS);
    let phase = 360.0 * age / SYNODIC_DAYS;
    let illumination = 0.5 * (1.0 - (phase.to_radians()).cos());

    // Mean-sun longitude keeps sign and cusp estimates usable.
    let n = jd_ut - 2_451_545.0;
    let sun_lon = norm360(280.460 + 0.985_647_4 * n);

    LunarState {
        sun_lon_deg: sun_lon,
        moon_lon_deg: norm360(sun_lon + phase),
        phase_deg: phase,
        illumination,
        moon_distance_km: None,
        approx: true,
    }
}
