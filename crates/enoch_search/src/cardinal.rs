//! Equinox and solstice scanning.
//!
//! The solar longitude crosses each cardinal angle {0, 90, 180, 270} once
//! per tropical year. Daily coarse sampling brackets every crossing
//! (the Sun moves ~1 deg/day); bisection refines each bracket.

use enoch_core::SunMoonSampler;
use enoch_core::rootfind::{BisectConfig, bisect_wrapped, is_genuine_crossing, wrap_pm180};

use crate::error::SearchError;
use crate::events::{CardinalEvent, CardinalKind};

/// Coarse step in days for the solar longitude scan.
const STEP_DAYS: f64 = 1.0;

/// Scan `[jd_start, jd_end]` for all equinoxes and solstices.
pub fn scan_cardinal_points(
    sampler: &SunMoonSampler<'_>,
    jd_start: f64,
    jd_end: f64,
) -> Result<Vec<CardinalEvent>, SearchError> {
    if jd_end <= jd_start {
        return Err(SearchError::InvalidConfig("jd_end must be after jd_start"));
    }

    let bisect = BisectConfig {
        tol_f: 1e-5,
        tol_t: 1e-5,
        max_iterations: 50,
    };

    let mut events = Vec::new();
    for kind in CardinalKind::ALL {
        let residual =
            |jd: f64| wrap_pm180(sampler.state(jd).sun_lon_deg - kind.target_deg());

        let mut t_prev = jd_start;
        let mut f_prev = residual(t_prev);
        loop {
            let t_curr = (t_prev + STEP_DAYS).min(jd_end);
            let f_curr = residual(t_curr);

            if is_genuine_crossing(f_prev, f_curr) {
                let (jd, _) = bisect_wrapped(residual, t_prev, t_curr, &bisect);
                if jd >= jd_start && jd <= jd_end {
                    events.push(CardinalEvent { kind, jd });
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

#[cfg(test)]
mod tests {
    use super::*;
    use enoch_core::SunMoonSampler;
    use enoch_eph::AnalyticEphemeris;
    use enoch_time::calendar_to_jd;

    #[test]
    fn full_year_has_all_four_in_season_order() {
        let eph = AnalyticEphemeris::new();
        let sampler = SunMoonSampler::new(&eph);
        let start = calendar_to_jd(2025, 1, 1.0);
        let events = scan_cardinal_points(&sampler, start, start + 365.0).unwrap();
        let kinds: Vec<_> = events.iter().map(|e| e.kind).collect();
        assert_eq!(
            kinds,
            vec![
                CardinalKind::MarchEquinox,
                CardinalKind::JuneSolstice,
                CardinalKind::SeptemberEquinox,
                CardinalKind::DecemberSolstice,
            ]
        );
    }

    #[test]
    fn march_2025_equinox_matches_almanac() {
        let eph = AnalyticEphemeris::new();
        let sampler = SunMoonSampler::new(&eph);
        let start = calendar_to_jd(2025, 3, 1.0);
        let events = scan_cardinal_points(&sampler, start, start + 30.0).unwrap();
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].kind, CardinalKind::MarchEquinox);
        // Almanac: 2025-03-20 09:01 UT.
        let expected = calendar_to_jd(2025, 3, 20.0 + 9.02 / 24.0);
        assert!((events[0].jd - expected).abs() < 0.05, "jd = {}", events[0].jd);
    }

    #[test]
    fn june_2025_solstice_on_the_right_day() {
        let eph = AnalyticEphemeris::new();
        let sampler = SunMoonSampler::new(&eph);
        let start = calendar_to_jd(2025, 6, 1.0);
        let events = scan_cardinal_points(&sampler, start, start + 30.0).unwrap();
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].kind, CardinalKind::JuneSolstice);
        // Almanac: 2025-06-21 02:42 UT.
        let expected = calendar_to_jd(2025, 6, 21.0 + 2.7 / 24.0);
        assert!((events[0].jd - expected).abs() < 0.1, "jd = {}", events[0].jd);
    }

    #[test]
    fn kinds_expose_targets() {
        assert_eq!(CardinalKind::MarchEquinox.target_deg(), 0.0);
        assert_eq!(CardinalKind::DecemberSolstice.target_deg(), 270.0);
        assert!(CardinalKind::SeptemberEquinox.is_equinox());
        assert!(!CardinalKind::JuneSolstice.is_equinox());
    }
}
