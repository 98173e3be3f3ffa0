//! Typed request records and boundary validation.
//!
//! All tuning knobs arrive as JSON fields with defaults matching the
//! established wire contract; string enums are closed variants validated
//! by serde, numeric knobs are clamped inside the search configs.

use chrono::{NaiveDate, NaiveDateTime, TimeZone, Utc};
use chrono_tz::Tz;
use serde::Deserialize;

use enoch_eph::GeoCoordinate;
use enoch_search::{AlignmentConfig, BodySet};
use enoch_time::{UtcTime, jd_from_ymd_hms};

use crate::error::ApiError;

fn default_timezone() -> String {
    "UTC".to_string()
}

fn default_zodiac_mode() -> String {
    "tropical".to_string()
}

fn default_true() -> bool {
    true
}

fn default_align_min_count() -> usize {
    4
}

fn default_align_span_deg() -> f64 {
    30.0
}

fn default_align_step_hours() -> f64 {
    24.0
}

fn default_body_set() -> BodySet {
    BodySet::Seven
}

/// Year-scan request.
#[derive(Debug, Clone, Deserialize)]
pub struct YearRequest {
    pub datetime: String,
    pub latitude: f64,
    pub longitude: f64,
    #[serde(default = "default_timezone")]
    pub timezone: String,
    #[serde(default = "default_zodiac_mode")]
    pub zodiac_mode: String,
    /// Force the approximate epoch/sunset path.
    #[serde(default)]
    pub approx: bool,
    /// Skip per-day bound enrichment; reported as `quality: "fast"`.
    #[serde(default)]
    pub fast: bool,

    #[serde(default = "default_align_min_count")]
    pub align_min_count: usize,
    #[serde(default = "default_align_span_deg")]
    pub align_span_deg: f64,
    #[serde(default = "default_align_step_hours")]
    pub align_step_hours: f64,
    #[serde(default = "default_body_set")]
    pub align_planets: BodySet,
    #[serde(default)]
    pub align_include_outer: bool,
    #[serde(default = "default_true")]
    pub align_include_moon: bool,
    #[serde(default = "default_true")]
    pub align_include_sun: bool,
    #[serde(default)]
    pub align_detect_aspects: bool,
    #[serde(default = "default_true")]
    pub align_include_oppositions: bool,
}

impl YearRequest {
    pub fn instant_jd(&self) -> Result<f64, ApiError> {
        datetime_to_jd(&self.datetime, &self.timezone)
    }

    pub fn geo(&self) -> Result<GeoCoordinate, ApiError> {
        GeoCoordinate::new(self.latitude, self.longitude)
            .map_err(|e| ApiError::BadRequest(e.to_string()))
    }

    pub fn alignment_config(&self) -> AlignmentConfig {
        AlignmentConfig {
            body_set: self.align_planets,
            min_count: self.align_min_count,
            max_span_deg: self.align_span_deg,
            step_hours: self.align_step_hours,
            include_sun: self.align_include_sun,
            include_moon: self.align_include_moon,
            include_outer: self.align_include_outer,
            detect_aspects: self.align_detect_aspects,
            include_oppositions: self.align_include_oppositions,
        }
    }
}

/// Single-instant request.
#[derive(Debug, Clone, Deserialize)]
pub struct InstantRequest {
    pub datetime: String,
    pub latitude: f64,
    pub longitude: f64,
    #[serde(default = "default_timezone")]
    pub timezone: String,
    #[serde(default)]
    pub approx: bool,
}

impl InstantRequest {
    pub fn instant_jd(&self) -> Result<f64, ApiError> {
        datetime_to_jd(&self.datetime, &self.timezone)
    }

    pub fn geo(&self) -> Result<GeoCoordinate, ApiError> {
        GeoCoordinate::new(self.latitude, self.longitude)
            .map_err(|e| ApiError::BadRequest(e.to_string()))
    }
}

/// Parse a civil datetime into JD (UT).
///
/// Offset-carrying ISO forms win; bare forms are localized in the request
/// timezone; negative/extended years fall through to the JD-native parser,
/// which reads them as UTC.
pub fn datetime_to_jd(datetime: &str, timezone: &str) -> Result<f64, ApiError> {
    let s = datetime.trim();

    if let Ok(dt) = chrono::DateTime::parse_from_rfc3339(s) {
        let utc = dt.with_timezone(&Utc).naive_utc();
        return Ok(naive_to_jd(&utc));
    }

    let tz: Tz = timezone
        .parse()
        .map_err(|_| ApiError::BadRequest(format!("unknown timezone: {timezone}")))?;

    let naive = parse_naive(s);
    if let Some(naive) = naive {
        // Ambiguous local times (DST fold) take the earlier instant.
        let localized = tz
            .from_local_datetime(&naive)
            .earliest()
            .ok_or_else(|| {
                ApiError::BadRequest(format!("datetime does not exist in {timezone}: {s}"))
            })?;
        return Ok(naive_to_jd(&localized.with_timezone(&Utc).naive_utc()));
    }

    UtcTime::parse(s)
        .map(|u| u.to_jd())
        .map_err(|e| ApiError::BadRequest(format!("unparseable datetime {s:?}: {e}")))
}

fn parse_naive(s: &str) -> Option<NaiveDateTime> {
    for fmt in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f", "%Y-%m-%dT%H:%M"] {
        if let Ok(dt) = NaiveDateTime::parse_from_str(s, fmt) {
            return Some(dt);
        }
    }
    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
}

fn naive_to_jd(dt: &NaiveDateTime) -> f64 {
    use chrono::{Datelike, Timelike};
    jd_from_ymd_hms(
        dt.year(),
        dt.month(),
        dt.day(),
        dt.hour(),
        dt.minute(),
        dt.second() as f64 + dt.nanosecond() as f64 / 1e9,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use enoch_time::calendar_to_jd;

    #[test]
    fn rfc3339_utc() {
        let jd = datetime_to_jd("2025-03-19T18:00:00Z", "UTC").unwrap();
        assert!((jd - calendar_to_jd(2025, 3, 19.75)).abs() < 1e-9);
    }

    #[test]
    fn rfc3339_offset_folds_to_utc() {
        let jd = datetime_to_jd("2025-03-19T20:00:00+02:00", "UTC").unwrap();
        assert!((jd - calendar_to_jd(2025, 3, 19.75)).abs() < 1e-9);
    }

    #[test]
    fn bare_datetime_localized_by_timezone_field() {
        // 13:00 in Jerusalem (UTC+2 on that date) is 11:00 UTC.
        let jd = datetime_to_jd("2025-01-15T13:00:00", "Asia/Jerusalem").unwrap();
        assert!((jd - calendar_to_jd(2025, 1, 15.0 + 11.0 / 24.0)).abs() < 1e-9);
    }

    #[test]
    fn date_only_means_local_midnight() {
        let jd = datetime_to_jd("2025-01-15", "UTC").unwrap();
        assert!((jd - calendar_to_jd(2025, 1, 15.0)).abs() < 1e-9);
    }

    #[test]
    fn negative_year_via_jd_native_parser() {
        let jd = datetime_to_jd("-0044-03-15T00:00:00Z", "UTC").unwrap();
        assert!((jd - calendar_to_jd(-44, 3, 15.0)).abs() < 1e-6);
    }

    #[test]
    fn malformed_inputs_are_bad_requests() {
        for bad in ["not-a-date", "2025-13-40T99:99:99Z", ""] {
            let err = datetime_to_jd(bad, "UTC").unwrap_err();
            assert_eq!(err.status_class(), 400, "input {bad:?}");
        }
        let err = datetime_to_jd("2025-01-15T13:00:00", "Mars/Olympus").unwrap_err();
        assert_eq!(err.status_class(), 400);
    }

    #[test]
    fn year_request_defaults() {
        let req: YearRequest = serde_json::from_str(
            r#"{"datetime": "2025-03-19T00:00:00Z", "latitude": 0.0, "longitude": 0.0}"#,
        )
        .unwrap();
        assert_eq!(req.timezone, "UTC");
        assert_eq!(req.zodiac_mode, "tropical");
        assert!(!req.approx);
        assert_eq!(req.align_min_count, 4);
        assert_eq!(req.align_planets, BodySet::Seven);
        assert!(req.align_include_sun && req.align_include_moon);
        assert!(!req.align_detect_aspects);
        let cfg = req.alignment_config();
        assert!(cfg.validate().is_ok());
    }

    #[test]
    fn body_set_strings() {
        for (s, v) in [
            ("inner", BodySet::Inner),
            ("classic5", BodySet::Classic5),
            ("seven", BodySet::Seven),
            ("all", BodySet::All),
        ] {
            let req: YearRequest = serde_json::from_str(&format!(
                r#"{{"datetime": "2025-01-01", "latitude": 0, "longitude": 0, "align_planets": "{s}"}}"#,
            ))
            .unwrap();
            assert_eq!(req.align_planets, v);
        }
    }

    #[test]
    fn out_of_range_coordinates_rejected() {
        let req: YearRequest = serde_json::from_str(
            r#"{"datetime": "2025-01-01", "latitude": 91.0, "longitude": 0.0}"#,
        )
        .unwrap();
        assert_eq!(req.geo().unwrap_err().status_class(), 400);
    }
}
