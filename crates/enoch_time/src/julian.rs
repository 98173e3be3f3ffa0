//! Julian Day conversions for the proleptic Gregorian calendar.
//!
//! `calendar_to_jd` / `jd_to_calendar` use the Fliegel–Van Flandern and
//! Richards integer algorithms with Euclidean division, so they remain
//! correct for negative (BCE) years. JD values are UT day counts with the
//! conventional noon origin.

/// Convert a proleptic Gregorian calendar date to Julian Day.
///
/// `day` may carry a fractional part (e.g. 15.75 = the 15th at 18:00 UT).
pub fn calendar_to_jd(year: i32, month: u32, day: f64) -> f64 {
    let y = year as i64;
    let m = month as i64;
    let d_whole = day.floor() as i64;
    let d_frac = day - day.floor();

    let a = (14 - m).div_euclid(12);
    let yy = y + 4800 - a;
    let mm = m + 12 * a - 3;

    let jdn = d_whole + (153 * mm + 2).div_euclid(5) + 365 * yy + yy.div_euclid(4)
        - yy.div_euclid(100)
        + yy.div_euclid(400)
        - 32045;

    jdn as f64 - 0.5 + d_frac
}

/// Convert a Julian Day back to a proleptic Gregorian calendar date.
///
/// Returns `(year, month, day)` where `day` carries the fractional part.
pub fn jd_to_calendar(jd: f64) -> (i32, u32, f64) {
    let z = (jd + 0.5).floor();
    let frac = jd + 0.5 - z;
    let jdn = z as i64;

    let e = 4 * (jdn + 1401 + ((4 * jdn + 274277).div_euclid(146097) * 3).div_euclid(4) - 38) + 3;
    let h = 5 * e.rem_euclid(1461).div_euclid(4) + 2;

    let day = h.rem_euclid(153).div_euclid(5) + 1;
    let month = (h.div_euclid(153) + 2).rem_euclid(12) + 1;
    let year = e.div_euclid(1461) - 4716 + (14 - month).div_euclid(12);

    (year as i32, month as u32, day as f64 + frac)
}

/// Convert calendar parts with an explicit time-of-day to Julian Day.
pub fn jd_from_ymd_hms(year: i32, month: u32, day: u32, hour: u32, minute: u32, second: f64) -> f64 {
    let day_frac =
        day as f64 + hour as f64 / 24.0 + minute as f64 / 1440.0 + second / 86_400.0;
    calendar_to_jd(year, month, day_frac)
}

/// Civil noon JD of the calendar day containing `jd`.
pub fn noon_of_day(jd: f64) -> f64 {
    let (y, m, d) = jd_to_calendar(jd);
    calendar_to_jd(y, m, d.floor() + 0.5)
}

/// Midnight (0h UT) JD of the calendar day containing `jd`.
pub fn midnight_of_day(jd: f64) -> f64 {
    let (y, m, d) = jd_to_calendar(jd);
    calendar_to_jd(y, m, d.floor())
}
