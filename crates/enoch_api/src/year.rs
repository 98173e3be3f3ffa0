//! Year-scan orchestration: epoch, days, events, bucketing, quality.
//!
//! The scan never fails for oracle reasons. Sub-scans that cannot run are
//! skipped with a recorded reason; if the whole exact path collapses, a
//! fully approximate rebuild (synodic moon, NOAA sunsets) answers instead,
//! flagged `quality: "approx"`. Only malformed input is returned as an
//! error.

use std::collections::HashMap;

use tracing::warn;

use enoch_core::{BuildOptions, QualityLog, SunMoonSampler, build_days, resolve_epoch};
use enoch_eph::{Body, EclipticCoord, Ephemeris, EphemerisError, GeoCoordinate};
use enoch_search::distance::DistanceConfig;
use enoch_search::phase::{PhaseConfig, scan_phase_events, tag_supermoons};
use enoch_search::{
    AlignmentEvent, AspectEvent, CardinalEvent, DistanceEvent, DistanceKind, LunarEclipse,
    PhaseEvent, SolarEclipse, alignment, aspect, cardinal, distance, eclipse,
};
use enoch_time::UtcTime;

use crate::error::ApiError;
use crate::request::YearRequest;
use crate::response::{DayView, EventView, YearResponse};

/// Full moons within this many days of a perigee count as supermoons.
const SUPERMOON_WINDOW_DAYS: f64 = 1.0;

/// Run a year-scan request against an ephemeris backend.
pub fn year_scan(eph: &dyn Ephemeris, req: &YearRequest) -> Result<YearResponse, ApiError> {
    let jd = req.instant_jd()?;
    let geo = req.geo()?;
    req.alignment_config()
        .validate()
        .map_err(|m| ApiError::BadRequest(m.to_string()))?;

    match compute_year(eph, jd, &geo, req) {
        Ok(resp) => Ok(resp),
        Err(e) => {
            warn!(error = %e, "year scan failed, rebuilding fully approximate");
            Ok(fallback_year(jd, &geo, req, &e))
        }
    }
}

fn compute_year(
    eph: &dyn Ephemeris,
    jd: f64,
    geo: &GeoCoordinate,
    req: &YearRequest,
) -> Result<YearResponse, ApiError> {
    let mut quality = QualityLog::new();
    if let Err(e) = eph.ensure_initialized() {
        quality.note_approx(format!("ephemeris initialization failed: {e}"));
    }

    let epoch = resolve_epoch(eph, jd, geo, req.approx, &mut quality);
    let sampler = SunMoonSampler::new(eph);
    let opts = BuildOptions {
        zodiac_mode: req.zodiac_mode.clone(),
        detail: !req.fast,
        force_approx: req.approx,
    };
    let days = build_days(&sampler, &epoch, geo, &opts, &mut quality);
    let span_start = epoch.start_jd;
    let span_end = days.last().map(|d| d.end_jd).unwrap_or(span_start);

    let mut phases =
        scan_phase_events(&sampler, span_start, span_end, &PhaseConfig::default())?;
    let distances =
        distance::scan_distance_extrema(&sampler, span_start, span_end, &DistanceConfig::default())?;
    if distances.is_empty() {
        quality.note_approx("lunar distance unavailable, perigee/apogee and supermoons skipped");
    }
    let perigees: Vec<f64> = distances
        .iter()
        .filter(|d| d.kind == DistanceKind::Perigee)
        .map(|d| d.jd)
        .collect();
    tag_supermoons(&mut phases, &perigees, SUPERMOON_WINDOW_DAYS);

    let cardinals = cardinal::scan_cardinal_points(&sampler, span_start, span_end)?;

    // Eclipse geometry needs latitude and distance from the oracle; degrade
    // rather than abort when it cannot answer.
    let (lunar_eclipses, solar_eclipses) = match (
        eclipse::lunar_eclipses(eph, &phases),
        eclipse::solar_eclipses(eph, &phases),
    ) {
        (Ok(l), Ok(s)) => (l, s),
        (l, s) => {
            quality.note_approx("eclipse detection unavailable for this span");
            (l.unwrap_or_default(), s.unwrap_or_default())
        }
    };

    let align_cfg = req.alignment_config();
    let alignments = match alignment::scan_alignments(eph, span_start, span_end, &align_cfg) {
        Ok(v) => v,
        Err(e) => {
            quality.note_approx(format!("alignment scan unavailable: {e}"));
            Vec::new()
        }
    };
    let aspects = if req.align_detect_aspects {
        match aspect::scan_aspects(eph, span_start, span_end, &align_cfg) {
            Ok(v) => v,
            Err(e) => {
                quality.note_approx(format!("aspect scan unavailable: {e}"));
                Vec::new()
            }
        }
    } else {
        Vec::new()
    };

    let views = assemble_days(
        days,
        &phases,
        &distances,
        &cardinals,
        &lunar_eclipses,
        &solar_eclipses,
        &aspects,
        alignments,
    );

    Ok(YearResponse {
        ok: true,
        enoch_year: epoch.year,
        days: views,
        quality: quality.quality(),
        quality_reasons: quality.reasons(),
    })
}

/// Ephemeris that always declines, forcing every closed-form fallback.
struct UnavailableEphemeris;

impl Ephemeris for UnavailableEphemeris {
    fn ecliptic(&self, body: Body, _jd: f64) -> Result<EclipticCoord, EphemerisError> {
        Err(EphemerisError::Unavailable(format!(
            "no backend for {body} in approximate rebuild"
        )))
    }
}

/// JD-only rebuild: synodic moon, NOAA sunsets, fixed equinox. Always
/// succeeds, always `quality: "approx"`. Event scans are omitted.
fn fallback_year(jd: f64, geo: &GeoCoordinate, req: &YearRequest, cause: &ApiError) -> YearResponse {
    let eph = UnavailableEphemeris;
    let mut quality = QualityLog::new();
    quality.note_approx(format!("exact year scan failed, approximate rebuild: {cause}"));

    let epoch = resolve_epoch(&eph, jd, geo, true, &mut quality);
    let sampler = SunMoonSampler::new(&eph);
    let opts = BuildOptions {
        zodiac_mode: req.zodiac_mode.clone(),
        detail: !req.fast,
        force_approx: true,
    };
    let days = build_days(&sampler, &epoch, geo, &opts, &mut quality);
    let views = days
        .into_iter()
        .map(|day| DayView {
            day,
            events: Vec::new(),
            alignments: Vec::new(),
            alignment: None,
        })
        .collect();

    YearResponse {
        ok: true,
        enoch_year: epoch.year,
        days: views,
        quality: quality.quality(),
        quality_reasons: quality.reasons(),
    }
}

// ---------------------------------------------------------------------------
// Event bucketing and alignment aggregation
// ---------------------------------------------------------------------------

/// Index of the day whose [start, end) interval holds `jd`; the final day
/// is closed on both ends.
fn bucket_index(days: &[enoch_core::DayRecord], jd: f64) -> Option<usize> {
    let idx = days.partition_point(|d| d.end_jd <= jd);
    if idx < days.len() {
        (jd >= days[idx].start_jd).then_some(idx)
    } else if let Some(last) = days.last() {
        ((jd - last.end_jd).abs() < 1e-9).then_some(days.len() - 1)
    } else {
        None
    }
}

fn time_utc(jd: f64) -> String {
    UtcTime::from_jd(jd).to_string()
}

#[allow(clippy::too_many_arguments)]
fn assemble_days(
    days: Vec<enoch_core::DayRecord>,
    phases: &[PhaseEvent],
    distances: &[DistanceEvent],
    cardinals: &[CardinalEvent],
    lunar_eclipses: &[LunarEclipse],
    solar_eclipses: &[SolarEclipse],
    aspects: &[AspectEvent],
    alignments: Vec<AlignmentEvent>,
) -> Vec<DayView> {
    // (day index, event jd, view), merged and time-sorted per day at the end.
    let mut buckets: Vec<(usize, f64, EventView)> = Vec::new();
    let mut push = |jd: f64, view: EventView| {
        if let Some(i) = bucket_index(&days, jd) {
            buckets.push((i, jd, view));
        }
    };

    for e in phases {
        push(
            e.jd,
            EventView::MoonPhase {
                phase: e.kind.label(),
                time_utc: time_utc(e.jd),
                supermoon: e.supermoon,
            },
        );
    }
    for e in distances {
        push(
            e.jd,
            EventView::MoonDistance {
                kind: e.kind,
                time_utc: time_utc(e.jd),
                distance_km: e.distance_km,
            },
        );
    }
    for e in cardinals {
        push(
            e.jd,
            EventView::Cardinal {
                kind: e.kind,
                time_utc: time_utc(e.jd),
            },
        );
    }
    for e in lunar_eclipses {
        push(
            e.jd,
            EventView::LunarEclipse {
                kind: e.kind,
                time_utc: time_utc(e.jd),
                umbral_magnitude: e.umbral_magnitude,
                penumbral_magnitude: e.penumbral_magnitude,
                moon_lat_deg: e.moon_lat_deg,
            },
        );
    }
    for e in solar_eclipses {
        push(
            e.jd,
            EventView::SolarEclipse {
                kind: e.kind,
                time_utc: time_utc(e.jd),
                magnitude: e.magnitude,
                moon_lat_deg: e.moon_lat_deg,
            },
        );
    }
    for e in aspects {
        push(
            e.jd,
            EventView::Aspect {
                kind: e.kind,
                body_a: e.body_a,
                body_b: e.body_b,
                time_utc: time_utc(e.jd),
                separation_deg: e.separation_deg,
                offset_deg: e.offset_deg,
            },
        );
    }

    let mut per_day_events: Vec<Vec<(f64, EventView)>> = vec![Vec::new(); days.len()];
    for (i, jd, view) in buckets {
        per_day_events[i].push((jd, view));
    }

    let mut per_day_alignments: Vec<Vec<AlignmentEvent>> = vec![Vec::new(); days.len()];
    for ev in alignments {
        if let Some(i) = bucket_index(&days, ev.jd) {
            per_day_alignments[i].push(ev);
        }
    }

    days.into_iter()
        .enumerate()
        .map(|(i, day)| {
            let mut evs = std::mem::take(&mut per_day_events[i]);
            evs.sort_by(|a, b| a.0.total_cmp(&b.0));
            let (alignments, alignment) =
                dedup_alignments(std::mem::take(&mut per_day_alignments[i]));
            DayView {
                day,
                events: evs.into_iter().map(|(_, v)| v).collect(),
                alignments,
                alignment,
            }
        })
        .collect()
}

/// Deduplicate one day's alignments by exact body set, preferring higher
/// count, then smaller span, then earlier time. Returns the surviving
/// list in time order plus the day's best alignment overall.
pub fn dedup_alignments(
    events: Vec<AlignmentEvent>,
) -> (Vec<AlignmentEvent>, Option<AlignmentEvent>) {
    let mut by_set: HashMap<Vec<&'static str>, AlignmentEvent> = HashMap::new();
    for ev in events {
        let mut key = ev.bodies.clone();
        key.sort_unstable();
        match by_set.get_mut(&key) {
            None => {
                by_set.insert(key, ev);
            }
            Some(kept) => {
                if prefer(&ev, kept) {
                    *kept = ev;
                }
            }
        }
    }

    let mut list: Vec<AlignmentEvent> = by_set.into_values().collect();
    list.sort_by(|a, b| a.jd.total_cmp(&b.jd));
    let best = list
        .iter()
        .reduce(|a, b| if prefer(b, a) { b } else { a })
        .cloned();
    (list, best)
}

/// Ranking: higher count, then smaller span, then earlier time.
fn prefer(a: &AlignmentEvent, b: &AlignmentEvent) -> bool {
    if a.count != b.count {
        return a.count > b.count;
    }
    if a.span_deg != b.span_deg {
        return a.span_deg < b.span_deg;
    }
    a.jd < b.jd
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ev(jd: f64, bodies: &[&'static str], span: f64) -> AlignmentEvent {
        AlignmentEvent {
            jd,
            bodies: bodies.to_vec(),
            count: bodies.len(),
            span_deg: span,
            center_lon_deg: 0.0,
            score: 0.5,
        }
    }

    #[test]
    fn dedup_keeps_one_per_body_set() {
        let (list, best) = dedup_alignments(vec![
            ev(10.1, &["sun", "mercury", "venus"], 12.0),
            ev(10.4, &["mercury", "sun", "venus"], 9.0),
            ev(10.6, &["mars", "jupiter", "saturn", "moon"], 25.0),
        ]);
        assert_eq!(list.len(), 2);
        // Same set, tighter span wins.
        assert_eq!(list[0].span_deg, 9.0);
        // Best overall prefers the higher count despite the wider span.
        assert_eq!(best.unwrap().count, 4);
    }

    #[test]
    fn dedup_ties_resolve_to_earlier_time() {
        let (list, _) = dedup_alignments(vec![
            ev(10.5, &["sun", "mercury", "venus"], 9.0),
            ev(10.2, &["sun", "mercury", "venus"], 9.0),
        ]);
        assert_eq!(list.len(), 1);
        assert_eq!(list[0].jd, 10.2);
    }

    #[test]
    fn dedup_empty() {
        let (list, best) = dedup_alignments(Vec::new());
        assert!(list.is_empty());
        assert!(best.is_none());
    }
}
