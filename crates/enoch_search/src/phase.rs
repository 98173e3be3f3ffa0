//! Lunar phase event scanning.
//!
//! Samples the phase angle at a coarse step and bisects each wrapped
//! residual crossing against the four target angles {0, 90, 180, 270}.

use enoch_core::SunMoonSampler;
use enoch_core::rootfind::{BisectConfig, bisect_wrapped, is_genuine_crossing, wrap_pm180};

use crate::error::SearchError;
use crate::events::{PhaseEvent, PhaseKind};

/// Phase scan tuning.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PhaseConfig {
    /// Coarse sample step in hours. The phase angle advances ~12.2 deg/day,
    /// so 6-hour steps bracket every crossing with ample margin.
    pub step_hours: f64,
    /// Bisection residual tolerance in degrees.
    pub refine_tol_deg: f64,
    pub max_iterations: u32,
}

impl Default for PhaseConfig {
    fn default() -> Self {
        Self {
            step_hours: 6.0,
            refine_tol_deg: 1e-3,
            max_iterations: 20,
        }
    }
}

impl PhaseConfig {
    pub fn validate(&self) -> Result<(), &'static str> {
        if !(self.step_hours > 0.0 && self.step_hours <= 24.0) {
            return Err("step_hours must be in (0, 24]");
        }
        if !(self.refine_tol_deg > 0.0) {
            return Err("refine_tol_deg must be positive");
        }
        if self.max_iterations == 0 {
            return Err("max_iterations must be at least 1");
        }
        Ok(())
    }
}

const TARGETS: [PhaseKind; 4] = [
    PhaseKind::New,
    PhaseKind::FirstQuarter,
    PhaseKind::Full,
    PhaseKind::LastQuarter,
];

/// Scan `[jd_start, jd_end]` for all lunar phase events.
///
/// Events are returned in time order. `supermoon` is left false here;
/// tagging against perigees happens after the distance scan.
pub fn scan_phase_events(
    sampler: &SunMoonSampler<'_>,
    jd_start: f64,
    jd_end: f64,
    config: &PhaseConfig,
) -> Result<Vec<PhaseEvent>, SearchError> {
    config.validate().map_err(SearchError::InvalidConfig)?;
    if jd_end <= jd_start {
        return Err(SearchError::InvalidConfig("jd_end must be after jd_start"));
    }

    let step = config.step_hours / 24.0;
    let bisect = BisectConfig {
        tol_f: config.refine_tol_deg,
        tol_t: 60.0 / 86_400.0,
        max_iterations: config.max_iterations,
    };

    let mut events = Vec::new();
    let residual = |kind: PhaseKind, jd: f64| wrap_pm180(sampler.phase_deg(jd) - kind.target_deg());

    for kind in TARGETS {
        let mut t_prev = jd_start;
        let mut f_prev = residual(kind, t_prev);
        loop {
            let t_curr = (t_prev + step).min(jd_end);
            let f_curr = residual(kind, t_curr);

            if is_genuine_crossing(f_prev, f_curr) {
                let (jd, _) = bisect_wrapped(|t| residual(kind, t), t_prev, t_curr, &bisect);
                if jd >= jd_start && jd <= jd_end {
                    events.push(PhaseEvent {
                        kind,
                        jd,
                        supermoon: false,
                    });
                }
            }

            if t_curr >= jd_end {
                break;
            }
            t_prev = t_curr;
            f_prev = f_curr;
        }
    }

    events.sort_by(|a, b| a.jd.total_cmp(&b.jd));
    Ok(events)
}

/// Tag full moons whose nearest perigee lies within `window_days`.
pub fn tag_supermoons(events: &mut [PhaseEvent], perigee_jds: &[f64], window_days: f64) {
    for ev in events.iter_mut() {
        if ev.kind != PhaseKind::Full {
            continue;
        }
        let near = perigee_jds
            .iter()
            .any(|p| (p - ev.jd).abs() <= window_days);
        ev.supermoon = near;
    }
}
