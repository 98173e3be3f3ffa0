//! UTC calendar date/time with sub-second precision.
//!
//! `UtcTime` is the canonical UTC representation used at the output
//! boundary. It formats and parses an extended ISO-8601 form that allows
//! signed and more-than-4-digit years, which ordinary civil datetime
//! libraries reject.

use crate::TimeError;
use crate::julian::{calendar_to_jd, jd_to_calendar};

/// UTC calendar date with sub-second precision.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct UtcTime {
    pub year: i32,
    pub month: u32,
    pub day: u32,
    pub hour: u32,
    pub minute: u32,
    pub second: f64,
}

impl UtcTime {
    pub fn new(year: i32, month: u32, day: u32, hour: u32, minute: u32, second: f64) -> Self {
        Self {
            year,
            month,
            day,
            hour,
            minute,
            second,
        }
    }

    /// Convert to Julian Day (UT).
    pub fn to_jd(&self) -> f64 {
        let day_frac = self.day as f64
            + self.hour as f64 / 24.0
            + self.minute as f64 / 1440.0
            + self.second / 86_400.0;
        calendar_to_jd(self.year, self.month, day_frac)
    }

    /// Convert from a Julian Day (UT) back to UTC calendar fields.
    pub fn from_jd(jd: f64) -> Self {
        let (year, month, day_frac) = jd_to_calendar(jd);
        let day = day_frac.floor() as u32;
        // Round to the nearest millisecond to keep boundary instants stable.
        let mut total_seconds = (day_frac.fract() * 86_400.0 * 1000.0).round() / 1000.0;
        if total_seconds >= 86_400.0 {
            total_seconds = 86_400.0 - 0.001;
        }
        let hour = (total_seconds / 3600.0).floor() as u32;
        let minute = ((total_seconds % 3600.0) / 60.0).floor() as u32;
        let second = total_seconds % 60.0;
        Self {
            year,
            month,
            day,
            hour,
            minute,
            second,
        }
    }

    /// Parse an extended ISO-8601 datetime, e.g. `-0044-03-15T12:00:00Z`.
    ///
    /// The year may be signed and longer than 4 digits. The time part is
    /// optional (midnight assumed), as is a trailing `Z` or `±hh:mm`
    /// offset; an offset is folded into the returned UTC value.
    pub fn parse(input: &str) -> Result<Self, TimeError> {
        let s = input.trim();
        let bytes = s.as_bytes();
        if bytes.is_empty() {
            return Err(TimeError::Parse("empty string".into()));
        }

        let mut pos = 0usize;
        let negative = match bytes[0] {
            b'-' => {
                pos = 1;
                true
            }
            b'+' => {
                pos = 1;
                false
            }
            _ => false,
        };

        let year_start = pos;
        while pos < bytes.len() && bytes[pos].is_ascii_digit() {
            pos += 1;
        }
        if pos - year_start < 4 {
            return Err(TimeError::Parse(format!("bad year in {input:?}")));
        }
        let year_mag: i64 = s[year_start..pos]
            .parse()
            .map_err(|_| TimeError::Parse(format!("bad year in {input:?}")))?;
        if year_mag > i32::MAX as i64 {
            return Err(TimeError::Parse(format!("year out of range in {input:?}")));
        }
        let year = if negative { -(year_mag as i32) } else { year_mag as i32 };

        let month = parse_two(s, &mut pos, b'-', "month", input)?;
        let day = parse_two(s, &mut pos, b'-', "day", input)?;
        if !(1..=12).contains(&month) {
            return Err(TimeError::InvalidDate(format!("month {month}")));
        }
        if !(1..=31).contains(&day) {
            return Err(TimeError::InvalidDate(format!("day {day}")));
        }

        let (mut hour, mut minute, mut second) = (0u32, 0u32, 0.0f64);
        if pos < bytes.len() {
            if bytes[pos] != b'T' && bytes[pos] != b' ' {
                return Err(TimeError::Parse(format!("expected time separator in {input:?}")));
            }
            pos += 1;
            hour = parse_two_raw(s, &mut pos, "hour", input)?;
            minute = parse_two(s, &mut pos, b':', "minute", input)?;
            if pos < bytes.len() && bytes[pos] == b':' {
                pos += 1;
                let sec_start = pos;
                while pos < bytes.len() && (bytes[pos].is_ascii_digit() || bytes[pos] == b'.') {
                    pos += 1;
                }
                second = s[sec_start..pos]
                    .parse()
                    .map_err(|_| TimeError::Parse(format!("bad seconds in {input:?}")))?;
            }
            if hour > 23 || minute > 59 || second >= 61.0 {
                return Err(TimeError::InvalidDate(format!("time {hour}:{minute}:{second}")));
            }
        }

        // Optional offset: Z, or ±hh:mm / ±hhmm.
        let mut offset_minutes = 0i64;
        if pos < bytes.len() {
            match bytes[pos] {
                b'Z' | b'z' => pos += 1,
                b'+' | b'-' => {
                    let sign = if bytes[pos] == b'-' { -1i64 } else { 1i64 };
                    pos += 1;
                    let oh = parse_two_raw(s, &mut pos, "offset hour", input)? as i64;
                    if pos < bytes.len() && bytes[pos] == b':' {
                        pos += 1;
                    }
                    let om = if pos < bytes.len() {
                        parse_two_raw(s, &mut pos, "offset minute", input)? as i64
                    } else {
                        0
                    };
                    offset_minutes = sign * (oh * 60 + om);
                }
                _ => {}
            }
        }
        if pos != bytes.len() {
            return Err(TimeError::Parse(format!("trailing input in {input:?}")));
        }

        let t = Self::new(year, month, day, hour, minute, second);
        if offset_minutes == 0 {
            Ok(t)
        } else {
            Ok(Self::from_jd(t.to_jd() - offset_minutes as f64 / 1440.0))
        }
    }
}

fn parse_two(s: &str, pos: &mut usize, sep: u8, what: &str, input: &str) -> Result<u32, TimeError> {
    let bytes = s.as_bytes();
    if *pos >= bytes.len() || bytes[*pos] != sep {
        return Err(TimeError::Parse(format!("missing {what} in {input:?}")));
    }
    *pos += 1;
    parse_two_raw(s, pos, what, input)
}

fn parse_two_raw(s: &str, pos: &mut usize, what: &str, input: &str) -> Result<u32, TimeError> {
    let bytes = s.as_bytes();
    if *pos + 2 > bytes.len() || !bytes[*pos].is_ascii_digit() || !bytes[*pos + 1].is_ascii_digit()
    {
        return Err(TimeError::Parse(format!("bad {what} in {input:?}")));
    }
    let v = s[*pos..*pos + 2]
        .parse()
        .map_err(|_| TimeError::Parse(format!("bad {what} in {input:?}")))?;
    *pos += 2;
    Ok(v)
}

impl std::fmt::Display for UtcTime {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.year < 0 {
            write!(f, "-{:04}", -(self.year as i64))?;
        } else if self.year > 9999 {
            write!(f, "+{}", self.year)?;
        } else {
            write!(f, "{:04}", self.year)?;
        }
        let whole = self.second as u32;
        let frac = self.second - whole as f64;
        if frac.abs() < 1e-9 {
            write!(
                f,
                "-{:02}-{:02}T{:02}:{:02}:{:02}Z",
                self.month, self.day, self.hour, self.minute, whole
            )
        } else {
            write!(
                f,
                "-{:02}-{:02}T{:02}:{:02}:{:06.3}Z",
                self.month, self.day, self.hour, self.minute, self.second
            )
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_whole_seconds() {
        let t = UtcTime::new(2025, 3, 19, 18, 5, 0.0);
        assert_eq!(t.to_string(), "2025-03-19T18:05:00Z");
    }

    #[test]
    fn display_negative_year() {
        let t = UtcTime::new(-44, 3, 15, 0, 0, 0.0);
        assert_eq!(t.to_string(), "-0044-03-15T00:00:00Z");
    }

    #[test]
    fn display_extended_year() {
        let t = UtcTime::new(12345, 1, 2, 3, 4, 5.0);
        assert_eq!(t.to_string(), "+12345-01-02T03:04:05Z");
    }

    #[test]
    fn parse_basic() {
        let t = UtcTime::parse("2025-03-19T00:00:00Z").unwrap();
        assert_eq!((t.year, t.month, t.day), (2025, 3, 19));
        assert_eq!((t.hour, t.minute), (0, 0));
    }

    #[test]
    fn parse_date_only() {
        let t = UtcTime::parse("2025-03-19").unwrap();
        assert_eq!((t.hour, t.minute), (0, 0));
    }

    #[test]
    fn parse_negative_year() {
        let t = UtcTime::parse("-0044-03-15T12:00:00").unwrap();
        assert_eq!(t.year, -44);
        assert_eq!(t.hour, 12);
    }

    #[test]
    fn parse_offset_folds_to_utc() {
        let t = UtcTime::parse("2025-03-19T02:00:00+02:00").unwrap();
        assert_eq!((t.day, t.hour), (19, 0));
    }

    #[test]
    fn parse_rejects_garbage() {
        assert!(UtcTime::parse("not-a-date").is_err());
        assert!(UtcTime::parse("2025-13-01").is_err());
        assert!(UtcTime::parse("").is_err());
    }

    #[test]
    fn jd_round_trip() {
        let t = UtcTime::new(2025, 3, 20, 21, 24, 0.0);
        let back = UtcTime::from_jd(t.to_jd());
        assert_eq!((back.year, back.month, back.day), (2025, 3, 20));
        assert_eq!((back.hour, back.minute), (21, 24));
        assert!(back.second.abs() < 1e-3);
    }
}
