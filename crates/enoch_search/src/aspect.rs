//! 2-body aspect scanning.
//!
//! For every body pair and aspect angle the offset |separation - angle| is
//! sampled coarsely; a 3-point local minimum brackets each closest
//! approach, ternary search narrows it, and the event is kept when the
//! refined offset sits inside the aspect's orb.

use enoch_core::UT_TO_TT_DAYS;
use enoch_core::rootfind::{ternary_extremum, wrap_pm180};
use enoch_eph::{Body, Ephemeris};

use crate::alignment_types::{AlignmentConfig, AspectEvent, AspectKind};
use crate::error::SearchError;

const REFINE_ITERATIONS: u32 = 12;

/// Moon pairs are sampled at most this coarsely; the Moon can cross a
/// conjunction orb in under a day.
const MOON_PAIR_MAX_STEP_DAYS: f64 = 0.25;

fn separation_deg(
    eph: &dyn Ephemeris,
    a: Body,
    b: Body,
    jd: f64,
) -> Result<f64, SearchError> {
    let jd_tt = jd + UT_TO_TT_DAYS;
    let la = eph.ecliptic(a, jd_tt)?.lon_deg;
    let lb = eph.ecliptic(b, jd_tt)?.lon_deg;
    Ok(wrap_pm180(la - lb).abs())
}

/// Scan `[jd_start, jd_end]` for aspects among the configured bodies.
pub fn scan_aspects(
    eph: &dyn Ephemeris,
    jd_start: f64,
    jd_end: f64,
    config: &AlignmentConfig,
) -> Result<Vec<AspectEvent>, SearchError> {
    config.validate().map_err(SearchError::InvalidConfig)?;
    if jd_end <= jd_start {
        return Err(SearchError::InvalidConfig("jd_end must be after jd_start"));
    }

    let bodies = config.body_list();
    let mut events = Vec::new();

    for i in 0..bodies.len() {
        for j in (i + 1)..bodies.len() {
            let (a, b) = (bodies[i], bodies[j]);
            let mut step = config.effective_step_days();
            if a == Body::Moon || b == Body::Moon {
                step = step.min(MOON_PAIR_MAX_STEP_DAYS);
            }

            // One separation sample series per pair, shared by all kinds.
            let mut samples: Vec<(f64, f64)> = Vec::new();
            let mut jd = jd_start;
            loop {
                samples.push((jd, separation_deg(eph, a, b, jd)?));
                if jd >= jd_end {
                    break;
                }
                jd = (jd + step).min(jd_end);
            }

            for kind in AspectKind::ALL {
                if kind == AspectKind::Opposition && !config.include_oppositions {
                    continue;
                }
                pair_aspects(eph, a, b, kind, &samples, &mut events)?;
            }
        }
    }

    events.sort_by(|a, b| a.jd.total_cmp(&b.jd));
    Ok(events)
}

fn pair_aspects(
    eph: &dyn Ephemeris,
    a: Body,
    b: Body,
    kind: AspectKind,
    samples: &[(f64, f64)],
    events: &mut Vec<AspectEvent>,
) -> Result<(), SearchError> {
    let angle = kind.angle_deg();
    let offset_at = |jd: f64| match separation_deg(eph, a, b, jd) {
        Ok(sep) => (sep - angle).abs(),
        Err(_) => f64::MAX,
    };

    for w in samples.windows(3) {
        let o0 = (w[0].1 - angle).abs();
        let o1 = (w[1].1 - angle).abs();
        let o2 = (w[2].1 - angle).abs();
        if !(o1 <= o0 && o1 <= o2) {
            continue;
        }
        let (jd, offset) = ternary_extremum(offset_at, w[0].0, w[2].0, REFINE_ITERATIONS, true);
        if offset > kind.orb_deg() {
            continue;
        }
        // A flat stretch can trip two adjacent windows on one approach.
        let duplicate = events.iter().any(|e| {
            e.kind == kind && e.body_a == a.name() && e.body_b == b.name() && (e.jd - jd).abs() < 1.0
        });
        if duplicate {
            continue;
        }
        events.push(AspectEvent {
            kind,
            jd,
            body_a: a.name(),
            body_b: b.name(),
            separation_deg: separation_deg(eph, a, b, jd)?,
            offset_deg: offset,
        });
    }
    Ok(())
}
