//! Multi-body alignment scanning.
//!
//! At each coarse step the selected bodies are placed on the ecliptic
//! circle and the densest longitude cluster is found by a two-pointer
//! sweep over the sorted (and wrapped) longitudes. A step contributes at
//! most one event: the cluster with the most bodies, ties broken by the
//! tighter arc.

use enoch_core::UT_TO_TT_DAYS;
use enoch_eph::{Body, Ephemeris};

use crate::alignment_types::{AlignmentConfig, AlignmentEvent};
use crate::error::SearchError;

/// Blended alignment score in [0, 1], rounded to 3 decimals.
///
/// Half the weight goes to participation (cluster size against the pool,
/// capped at 7), half to tightness (arc against the allowed span), with
/// small bonuses for luminaries and for every body past the second.
pub fn alignment_score(
    count: usize,
    total: usize,
    span_deg: f64,
    max_span_deg: f64,
    has_sun: bool,
    has_moon: bool,
) -> f64 {
    let denom = total.min(7).max(1) as f64;
    let mut score = 0.5 * (count as f64 / denom) + 0.5 * (1.0 - span_deg / max_span_deg);
    if has_sun {
        score += 0.06;
    }
    if has_moon {
        score += 0.04;
    }
    score += (0.02 * (count.saturating_sub(2) as f64)).min(0.08);
    (score.clamp(0.0, 1.0) * 1000.0).round() / 1000.0
}

/// Densest cluster among sorted longitudes within `max_span_deg`.
///
/// Returns indices into `sorted` as (start, len, span). The circle is
/// unrolled by appending each longitude + 360 so wrap-around clusters are
/// seen by the same linear sweep.
fn densest_cluster(sorted: &[f64], max_span_deg: f64) -> (usize, usize, f64) {
    let n = sorted.len();
    let mut best = (0usize, 1usize, 0.0f64);
    for i in 0..n {
        let mut len = 1;
        let mut span = 0.0;
        for k in 1..n {
            let lon = if i + k < n {
                sorted[i + k]
            } else {
                sorted[i + k - n] + 360.0
            };
            let arc = lon - sorted[i];
            if arc > max_span_deg {
                break;
            }
            len = k + 1;
            span = arc;
        }
        let better = len > best.1 || (len == best.1 && span < best.2);
        if better {
            best = (i, len, span);
        }
    }
    best
}

/// Scan `[jd_start, jd_end]` for alignments at each coarse step.
pub fn scan_alignments(
    eph: &dyn Ephemeris,
    jd_start: f64,
    jd_end: f64,
    config: &AlignmentConfig,
) -> Result<Vec<AlignmentEvent>, SearchError> {
    config.validate().map_err(SearchError::InvalidConfig)?;
    if jd_end <= jd_start {
        return Err(SearchError::InvalidConfig("jd_end must be after jd_start"));
    }

    let bodies = config.body_list();
    let max_span = config.effective_span_deg();
    let step = config.effective_step_days();

    let mut events = Vec::new();
    let mut jd = jd_start;
    while jd <= jd_end {
        if let Some(ev) = alignment_at(eph, &bodies, jd, max_span, config.min_count)? {
            events.push(ev);
        }
        jd += step;
    }
    Ok(events)
}

fn alignment_at(
    eph: &dyn Ephemeris,
    bodies: &[Body],
    jd: f64,
    max_span_deg: f64,
    min_count: usize,
) -> Result<Option<AlignmentEvent>, SearchError> {
    let jd_tt = jd + UT_TO_TT_DAYS;
    let mut placed: Vec<(f64, Body)> = Vec::with_capacity(bodies.len());
    for &body in bodies {
        let coord = eph.ecliptic(body, jd_tt)?;
        placed.push((coord.lon_deg.rem_euclid(360.0), body));
    }
    placed.sort_by(|a, b| a.0.total_cmp(&b.0));

    let lons: Vec<f64> = placed.iter().map(|p| p.0).collect();
    let (start, len, span) = densest_cluster(&lons, max_span_deg);
    if len < min_count {
        return Ok(None);
    }

    let members: Vec<(f64, Body)> = (0..len)
        .map(|k| placed[(start + k) % placed.len()])
        .collect();
    let has_sun = members.iter().any(|m| m.1 == Body::Sun);
    let has_moon = members.iter().any(|m| m.1 == Body::Moon);
    let center = (lons[start] + span / 2.0).rem_euclid(360.0);
    let score = alignment_score(len, bodies.len(), span, max_span_deg, has_sun, has_moon);

    Ok(Some(AlignmentEvent {
        jd,
        bodies: members.iter().map(|m| m.1.name()).collect(),
        count: len,
        span_deg: (span * 1000.0).round() / 1000.0,
        center_lon_deg: (center * 1000.0).round() / 1000.0,
        score,
    }))
}
