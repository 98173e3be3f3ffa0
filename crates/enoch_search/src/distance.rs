//! Perigee/apogee scanning.
//!
//! Three-point local-extremum detection on coarse lunar-distance samples,
//! refined by ternary search. Skipped entirely when the sampler is running
//! on the synodic fallback (no distance data).

use enoch_core::SunMoonSampler;
use enoch_core::rootfind::ternary_extremum;

use crate::error::SearchError;
use crate::events::{DistanceEvent, DistanceKind};

/// Distance scan tuning.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DistanceConfig {
    /// Coarse sample step in hours. The anomalistic month is ~27.55 days;
    /// 6-hour sampling isolates each extremum cleanly.
    pub step_hours: f64,
    /// Ternary-search narrowing iterations.
    pub refine_iterations: u32,
}

impl Default for DistanceConfig {
    fn default() -> Self {
        Self {
            step_hours: 6.0,
            refine_iterations: 12,
        }
    }
}

impl DistanceConfig {
    pub fn validate(&self) -> Result<(), &'static str> {
        if !(self.step_hours > 0.0 && self.step_hours <= 24.0) {
            return Err("step_hours must be in (0, 24]");
        }
        if self.refine_iterations == 0 {
            return Err("refine_iterations must be at least 1");
        }
        Ok(())
    }
}

/// Scan `[jd_start, jd_end]` for lunar distance extrema.
///
/// Returns an empty list when distance data is unavailable; the caller
/// records the degradation.
pub fn scan_distance_extrema(
    sampler: &SunMoonSampler<'_>,
    jd_start: f64,
    jd_end: f64,
    config: &DistanceConfig,
) -> Result<Vec<DistanceEvent>, SearchError> {
    config.validate().map_err(SearchError::InvalidConfig)?;
    if jd_end <= jd_start {
        return Err(SearchError::InvalidConfig("jd_end must be after jd_start"));
    }

    let step = config.step_hours / 24.0;
    let Some(first) = sampler.moon_distance_km(jd_start) else {
        return Ok(Vec::new());
    };

    // Coarse samples, then 3-point extremum tests.
    let mut samples = vec![(jd_start, first)];
    let mut t = jd_start + step;
    while t < jd_end + step {
        let jd = t.min(jd_end);
        let Some(d) = sampler.moon_distance_km(jd) else {
            return Ok(Vec::new());
        };
        samples.push((jd, d));
        if jd >= jd_end {
            break;
        }
        t += step;
    }

    let dist_at = |jd: f64| sampler.moon_distance_km(jd).unwrap_or(f64::MAX);

    let mut events = Vec::new();
    for w in samples.windows(3) {
        let (t0, d0) = w[0];
        let d1 = w[1].1;
        let (t2, d2) = w[2];
        let kind = if d1 < d0 && d1 < d2 {
            DistanceKind::Perigee
        } else if d1 > d0 && d1 > d2 {
            DistanceKind::Apogee
        } else {
            continue;
        };
        let (jd, distance_km) = ternary_extremum(
            dist_at,
            t0,
            t2,
            config.refine_iterations,
            kind == DistanceKind::Perigee,
        );
        events.push(DistanceEvent {
            kind,
            jd,
            distance_km,
        });
    }

    Ok(events)
}
