//! Weekday indexing in Julian Day space.
//!
//! The index scheme is internal; callers should compare against an index
//! obtained from a known reference date rather than a numeric constant,
//! so the convention can never drift out of sync with the arithmetic.

use crate::julian::calendar_to_jd;

/// Weekday index (0..=6) of the civil day containing `jd`.
pub fn weekday_index(jd: f64) -> u8 {
    ((jd + 1.5).floor() as i64).rem_euclid(7) as u8
}

/// The weekday index of a Wednesday, computed from a reference date
/// (2025-03-19, a known Wednesday) at startup.
pub fn wednesday_index() -> u8 {
    weekday_index(calendar_to_jd(2025, 3, 19.5))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn known_saturday() {
        // 2000-01-01 was a Saturday; 2000-01-02 a Sunday.
        let sat = weekday_index(calendar_to_jd(2000, 1, 1.5));
        let sun = weekday_index(calendar_to_jd(2000, 1, 2.5));
        assert_eq!((sat + 1) % 7, sun);
    }

    #[test]
    fn wednesday_reference_consistent() {
        let wed = wednesday_index();
        // 2025-03-26 is the following Wednesday.
        assert_eq!(weekday_index(calendar_to_jd(2025, 3, 26.5)), wed);
        // 2025-03-20 is a Thursday.
        assert_eq!(weekday_index(calendar_to_jd(2025, 3, 20.5)), (wed + 1) % 7);
    }

    #[test]
    fn stable_within_a_civil_day() {
        let a = weekday_index(calendar_to_jd(2025, 3, 19.01));
        let b = weekday_index(calendar_to_jd(2025, 3, 19.99));
        assert_eq!(a, b);
    }
}
