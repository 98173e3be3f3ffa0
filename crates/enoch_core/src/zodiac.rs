//! Zodiac sign mapping and per-day lunar sign mix.
//!
//! Signs are fixed 30-degree tropical segments. A calendar day whose
//! sunset-to-sunset interval straddles a cusp reports both signs with
//! their time shares and the refined cusp instant.

use serde::Serialize;

use crate::rootfind::{BisectConfig, bisect_wrapped, norm360, wrap_pm180};
use crate::sampler::SunMoonSampler;

/// Tropical sign names in longitude order from 0 deg Aries.
pub const SIGNS: [&str; 12] = [
    "Aries",
    "Taurus",
    "Gemini",
    "Cancer",
    "Leo",
    "Virgo",
    "Libra",
    "Scorpio",
    "Sagittarius",
    "Capricorn",
    "Aquarius",
    "Pisces",
];

/// Sign index (0..=11) for an ecliptic longitude.
pub fn sign_index(lon_deg: f64) -> usize {
    (norm360(lon_deg) / 30.0).floor() as usize % 12
}

/// Sign name for an ecliptic longitude.
pub fn sign_from_longitude(lon_deg: f64) -> &'static str {
    SIGNS[sign_index(lon_deg)]
}

/// Lunar sign composition over one calendar day.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SignMix {
    /// Sign occupied for the larger share of the interval.
    pub primary: &'static str,
    /// Share of the interval in the primary sign, [0, 1].
    pub primary_share: f64,
    /// Second sign when the Moon crosses a cusp during the interval.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub secondary: Option<&'static str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub secondary_share: Option<f64>,
    /// Refined cusp crossing instant (JD UT), when one exists.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cusp_jd: Option<f64>,
    /// The 30-degree boundary crossed, when one exists.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cusp_deg: Option<f64>,
}

/// Compute the Moon's sign mix between `start_jd` and `end_jd`.
///
/// The Moon moves ~13 deg/day, so a sunset-to-sunset interval crosses at
/// most one cusp; multi-cusp days cannot occur with a 24-25h interval.
pub fn lunar_sign_mix(sampler: &SunMoonSampler<'_>, start_jd: f64, end_jd: f64) -> SignMix {
    let lon_start = sampler.state(start_jd).moon_lon_deg;
    let lon_end = sampler.state(end_jd).moon_lon_deg;
    let sign_start = sign_index(lon_start);
    let sign_end = sign_index(lon_end);

    if sign_start == sign_end {
        return SignMix {
            primary: SIGNS[sign_start],
            primary_share: 1.0,
            secondary: None,
            secondary_share: None,
            cusp_jd: None,
            cusp_deg: None,
        };
    }

    // Cusp at the start of the ending sign (forward motion).
    let cusp_deg = (sign_end as f64) * 30.0;
    let cfg = BisectConfig {
        tol_f: 1e-5,
        tol_t: 60.0 / 86_400.0,
        max_iterations: 40,
    };
    let (cusp_jd, _) = bisect_wrapped(
        |jd| wrap_pm180(sampler.state(jd).moon_lon_deg - cusp_deg),
        start_jd,
        end_jd,
        &cfg,
    );

    let total = end_jd - start_jd;
    let share_start = ((cusp_jd - start_jd) / total).clamp(0.0, 1.0);
    let share_end = 1.0 - share_start;

    let (primary, primary_share, secondary, secondary_share) = if share_start >= share_end {
        (SIGNS[sign_start], share_start, SIGNS[sign_end], share_end)
    } else {
        (SIGNS[sign_end], share_end, SIGNS[sign_start], share_start)
    };

    SignMix {
        primary,
        primary_share,
        secondary: Some(secondary),
        secondary_share: Some(secondary_share),
        cusp_jd: Some(cusp_jd),
        cusp_deg: Some(cusp_deg),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use enoch_eph::AnalyticEphemeris;

    #[test]
    fn sign_boundaries() {
        assert_eq!(sign_from_longitude(0.0), "Aries");
        assert_eq!(sign_from_longitude(29.999), "Aries");
        assert_eq!(sign_from_longitude(30.0), "Taurus");
        assert_eq!(sign_from_longitude(359.9), "Pisces");
        assert_eq!(sign_from_longitude(360.0), "Aries");
        assert_eq!(sign_from_longitude(-10.0), "Pisces");
    }

    #[test]
    fn mix_shares_sum_to_one() {
        let eph = AnalyticEphemeris::new();
        let sampler = SunMoonSampler::new(&eph);
        // Walk a month of day intervals; every mix must be consistent.
        let base = 2_460_754.5;
        for k in 0..29 {
            let a = base + k as f64;
            let mix = lunar_sign_mix(&sampler, a, a + 1.0);
            let total = mix.primary_share + mix.secondary_share.unwrap_or(0.0);
            assert!((total - 1.0).abs() < 1e-9, "day {k}: total = {total}");
            if let Some(cusp) = mix.cusp_jd {
                assert!(cusp >= a && cusp <= a + 1.0);
            }
        }
    }

    #[test]
    fn cusp_instant_lands_on_boundary() {
        let eph = AnalyticEphemeris::new();
        let sampler = SunMoonSampler::new(&eph);
        let base = 2_460_754.5;
        for k in 0..29 {
            let a = base + k as f64;
            let mix = lunar_sign_mix(&sampler, a, a + 1.0);
            if let (Some(cusp_jd), Some(cusp_deg)) = (mix.cusp_jd, mix.cusp_deg) {
                let lon = sampler.state(cusp_jd).moon_lon_deg;
                let resid = wrap_pm180(lon - cusp_deg).abs();
                assert!(resid < 0.02, "residual = {resid}");
            }
        }
    }
}
