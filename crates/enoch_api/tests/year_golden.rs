//! Golden integration tests for the year-scan endpoint logic.

use enoch_api::{ApiError, YearRequest, year::dedup_alignments, year_scan};
use enoch_eph::{AnalyticEphemeris, Body, EclipticCoord, Ephemeris, EphemerisError};
use enoch_search::{AlignmentConfig, BodySet, alignment::scan_alignments};
use enoch_time::{UtcTime, weekday_index, wednesday_index};

fn request(json: &str) -> YearRequest {
    serde_json::from_str(json).expect("request should deserialize")
}

fn scan_2025() -> enoch_api::YearResponse {
    let eph = AnalyticEphemeris::new();
    let req = request(
        r#"{"datetime": "2025-04-19T00:00:00Z", "latitude": 0.0, "longitude": 0.0}"#,
    );
    year_scan(&eph, &req).expect("year scan should succeed")
}

#[test]
fn year_2025_resolves_enoch_5996() {
    let resp = scan_2025();
    assert!(resp.ok);
    assert_eq!(resp.enoch_year, 5996);
    assert_eq!(resp.quality, "full");
    assert!(resp.quality_reasons.is_empty());
    assert!(resp.days.len() == 364 || resp.days.len() == 371);

    // Start boundary is a Wednesday sunset near the 2025 March equinox.
    let start = resp.days[0].day.start_jd;
    assert_eq!(weekday_index(start), wednesday_index());
    let label = &resp.days[0].day.start_utc;
    assert!(label.starts_with("2025-03-"), "start = {label}");
}

#[test]
fn day_partition_is_seamless() {
    let resp = scan_2025();
    for w in resp.days.windows(2) {
        assert_eq!(w[0].day.end_utc, w[1].day.start_utc);
        assert_eq!(w[0].day.end_jd, w[1].day.start_jd);
    }
    for (i, d) in resp.days.iter().enumerate() {
        assert_eq!(d.day.day_of_year as usize, i + 1);
        assert_eq!(d.day.added_week, d.day.day_of_year > 364);
    }
}

#[test]
fn events_land_inside_their_days() {
    let resp = scan_2025();
    let body = serde_json::to_value(&resp).expect("response should serialize");

    let mut phase_count = 0usize;
    let mut cardinal_count = 0usize;
    let mut supermoons = 0usize;
    for day in body["days"].as_array().expect("days array") {
        let start = day["start_utc"].as_str().expect("start_utc");
        let end = day["end_utc"].as_str().expect("end_utc");
        let Some(events) = day["events"].as_array() else {
            continue;
        };
        for ev in events {
            let t = ev["time_utc"].as_str().expect("time_utc");
            let jd = UtcTime::parse(t).expect("event time parses").to_jd();
            let s = UtcTime::parse(start).expect("start parses").to_jd();
            let e = UtcTime::parse(end).expect("end parses").to_jd();
            assert!(jd >= s - 1e-6 && jd <= e + 1e-6, "event {t} outside [{start}, {end}]");

            match ev["type"].as_str().expect("event type") {
                "moon_phase" => {
                    phase_count += 1;
                    if ev["supermoon"].as_bool() == Some(true) {
                        supermoons += 1;
                    }
                }
                "cardinal" => cardinal_count += 1,
                _ => {}
            }
        }
    }

    // A 364-day year holds 12-13 of each phase and exactly 4 cardinals.
    assert!((48..=52).contains(&phase_count), "phases = {phase_count}");
    assert_eq!(cardinal_count, 4);
    // 2025-26 carries a run of perigee full moons.
    assert!(supermoons >= 1, "supermoons = {supermoons}");
}

#[test]
fn forced_approx_reports_quality_with_reasons() {
    let eph = AnalyticEphemeris::new();
    let req = request(
        r#"{"datetime": "2025-04-19T00:00:00Z", "latitude": 31.78, "longitude": 35.23, "approx": true}"#,
    );
    let resp = year_scan(&eph, &req).expect("year scan should succeed");
    assert!(resp.ok);
    assert_eq!(resp.quality, "approx");
    assert!(!resp.quality_reasons.is_empty());
}

#[test]
fn fast_mode_reports_fast_quality() {
    let eph = AnalyticEphemeris::new();
    let req = request(
        r#"{"datetime": "2025-04-19T00:00:00Z", "latitude": 0.0, "longitude": 0.0, "fast": true}"#,
    );
    let resp = year_scan(&eph, &req).expect("year scan should succeed");
    assert_eq!(resp.quality, "fast");
    assert!(resp.days[0].day.sign_mix.is_none());
}

#[test]
fn malformed_datetime_is_a_structured_400() {
    let eph = AnalyticEphemeris::new();
    let req = request(
        r#"{"datetime": "not-a-date", "latitude": 0.0, "longitude": 0.0}"#,
    );
    let err = year_scan(&eph, &req).expect_err("should fail");
    assert_eq!(err.status_class(), 400);
    assert!(matches!(err, ApiError::BadRequest(_)));
    let body = err.to_body();
    assert!(!body.ok);
    assert_eq!(body.status, 400);
}

#[test]
fn unreachable_min_count_is_rejected_not_scanned() {
    let eph = AnalyticEphemeris::new();
    let req = request(
        r#"{"datetime": "2025-04-19T00:00:00Z", "latitude": 0.0, "longitude": 0.0,
            "align_planets": "classic5", "align_min_count": 9}"#,
    );
    let err = year_scan(&eph, &req).expect_err("should fail");
    assert_eq!(err.status_class(), 400);
}

// ---------------------------------------------------------------------------
// Alignment dedup scenarios
// ---------------------------------------------------------------------------

/// Three bodies inside a 9 deg arc, the rest far away.
struct ThreeBodyEph;

impl Ephemeris for ThreeBodyEph {
    fn ecliptic(&self, body: Body, _jd: f64) -> Result<EclipticCoord, EphemerisError> {
        let lon = match body {
            Body::Sun => 10.0,
            Body::Mercury => 15.0,
            Body::Venus => 19.0,
            _ => 200.0,
        };
        Ok(EclipticCoord {
            lon_deg: lon,
            lat_deg: 0.0,
            distance_km: 1.0e8,
        })
    }
}

fn three_body_config(min_count: usize) -> AlignmentConfig {
    AlignmentConfig {
        body_set: BodySet::Inner,
        min_count,
        include_moon: false,
        ..AlignmentConfig::default()
    }
}

#[test]
fn one_day_three_body_cluster_dedupes_to_single_event() {
    let events = scan_alignments(&ThreeBodyEph, 0.0, 1.0, &three_body_config(3)).unwrap();
    // Two 24h samples see the same static configuration.
    assert_eq!(events.len(), 2);
    let (list, best) = dedup_alignments(events);
    assert_eq!(list.len(), 1);
    assert_eq!(list[0].count, 3);
    assert!((list[0].span_deg - 9.0).abs() < 1e-9);
    assert_eq!(best.unwrap().jd, list[0].jd);
}

#[test]
fn min_count_above_cluster_size_yields_nothing() {
    let events = scan_alignments(&ThreeBodyEph, 0.0, 1.0, &three_body_config(4)).unwrap();
    assert!(events.is_empty());
}
