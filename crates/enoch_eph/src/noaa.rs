//! NOAA almanac sunset approximation.
//!
//! Closed-form solar position from day-of-year; no ephemeris backend
//! needed, so this path works unconditionally, including proleptic BCE
//! dates. Accuracy is a couple of minutes in the modern era. At polar
//! latitudes where no sunset exists the formula returns a fixed 18:00 UT
//! placeholder instead of failing; callers treat the value as a sentinel,
//! not as real data.

use enoch_time::julian::{calendar_to_jd, jd_to_calendar, midnight_of_day};

use crate::GeoCoordinate;

const DEG: f64 = std::f64::consts::PI / 180.0;

/// Zenith angle of the Sun's upper limb at rise/set, including refraction.
const ZENITH_DEG: f64 = 90.833;

/// Day of year (1-based) for the civil day starting at `jd0` (0h UT).
fn day_of_year(jd0: f64) -> f64 {
    let (y, _, _) = jd_to_calendar(jd0);
    jd0 - calendar_to_jd(y, 1, 1.0) + 1.0
}

/// Sunset instant (JD, UT) for the civil day containing `jd`.
///
/// Returns the 18:00 UT sentinel when the Sun does not set that day.
pub fn approx_sunset_jd(jd: f64, geo: &GeoCoordinate) -> f64 {
    let jd0 = midnight_of_day(jd);
    let n = day_of_year(jd0).floor();
    let lat = geo.latitude_deg();
    let lon = geo.longitude_deg();

    let lng_hour = lon / 15.0;
    let t = n + (18.0 - lng_hour) / 24.0;

    // Mean anomaly and true longitude of the Sun.
    let m = 0.9856 * t - 3.289;
    let m_r = m * DEG;
    let l = (m + 1.916 * m_r.sin() + 0.020 * (2.0 * m_r).sin() + 282.634).rem_euclid(360.0);
    let l_r = l * DEG;

    // Right ascension, forced into the same quadrant as L, in hours.
    let mut ra = (0.91764 * l_r.tan()).atan() / DEG;
    ra = ra.rem_euclid(360.0);
    let l_quadrant = (l / 90.0).floor() * 90.0;
    let ra_quadrant = (ra / 90.0).floor() * 90.0;
    ra = (ra + (l_quadrant - ra_quadrant)) / 15.0;

    let sin_dec = 0.39782 * l_r.sin();
    let cos_dec = sin_dec.asin().cos();

    let cos_h =
        ((ZENITH_DEG * DEG).cos() - sin_dec * (lat * DEG).sin()) / (cos_dec * (lat * DEG).cos());
    if !(-1.0..=1.0).contains(&cos_h) {
        // Polar day or night: sentinel 18:00 UT.
        return jd0 + 0.75;
    }

    let h = cos_h.acos() / DEG / 15.0;
    let t_local = h + ra - 0.06571 * t - 6.622;
    let ut = (t_local - lng_hour).rem_euclid(24.0);

    jd0 + ut / 24.0
}
