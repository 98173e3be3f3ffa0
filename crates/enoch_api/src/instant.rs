//! Single-instant query: planet positions plus the Enoch date.

use std::collections::BTreeMap;

use enoch_core::{QualityLog, SunMoonSampler, UT_TO_TT_DAYS, enoch_date_at, resolve_epoch};
use enoch_eph::{Body, Ephemeris, houses};

use crate::error::ApiError;
use crate::request::InstantRequest;
use crate::response::{HousesData, InstantResponse, PlanetPosition};

/// Resolve one instant to planet positions and an Enoch date.
pub fn instant_query(
    eph: &dyn Ephemeris,
    req: &InstantRequest,
) -> Result<InstantResponse, ApiError> {
    let jd = req.instant_jd()?;
    let geo = req.geo()?;

    let mut quality = QualityLog::new();
    if let Err(e) = eph.ensure_initialized() {
        quality.note_approx(format!("ephemeris initialization failed: {e}"));
    }

    let sampler = SunMoonSampler::new(eph);
    let jd_tt = jd + UT_TO_TT_DAYS;

    let mut planets = BTreeMap::new();
    for body in Body::ALL {
        match eph.ecliptic(body, jd_tt) {
            Ok(c) => {
                planets.insert(
                    body.name(),
                    PlanetPosition {
                        longitude: c.lon_deg,
                        latitude: c.lat_deg,
                        distance: c.distance_km,
                    },
                );
            }
            Err(e) if body.is_luminary() => {
                // The synodic model still gives a longitude for these two.
                let state = sampler.state(jd);
                let longitude = if body == Body::Sun {
                    state.sun_lon_deg
                } else {
                    state.moon_lon_deg
                };
                quality.note_approx(format!("{body} position from synodic fallback: {e}"));
                planets.insert(
                    body.name(),
                    PlanetPosition {
                        longitude,
                        latitude: 0.0,
                        distance: state.moon_distance_km.unwrap_or(0.0),
                    },
                );
            }
            Err(e) => {
                quality.note_approx(format!("{body} position unavailable: {e}"));
            }
        }
    }

    let cusps = houses::house_cusps(jd, &geo);
    if !cusps.placidus {
        quality.note_approx("placidus arcs undefined at this latitude, equal house cusps used");
    }
    let houses_data = HousesData::from(cusps);

    let epoch = resolve_epoch(eph, jd, &geo, req.approx, &mut quality);
    let enoch = enoch_date_at(&epoch, jd)?;

    Ok(InstantResponse {
        julian_day: jd,
        planets,
        enoch: enoch.into(),
        houses_data,
        quality: quality.quality(),
        quality_reasons: quality.reasons(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use enoch_eph::AnalyticEphemeris;

    fn req(datetime: &str) -> InstantRequest {
        InstantRequest {
            datetime: datetime.to_string(),
            latitude: 0.0,
            longitude: 0.0,
            timezone: "UTC".to_string(),
            approx: false,
        }
    }

    #[test]
    fn all_ten_bodies_present() {
        let eph = AnalyticEphemeris::new();
        let resp = instant_query(&eph, &req("2025-06-01T12:00:00Z")).unwrap();
        assert_eq!(resp.planets.len(), 10);
        assert_eq!(resp.quality, "full");
        for (name, p) in &resp.planets {
            assert!((0.0..360.0).contains(&p.longitude), "{name}: {}", p.longitude);
            assert!(p.distance > 0.0, "{name}");
        }
    }

    #[test]
    fn enoch_date_matches_year_anchor() {
        let eph = AnalyticEphemeris::new();
        let resp = instant_query(&eph, &req("2025-06-01T12:00:00Z")).unwrap();
        assert_eq!(resp.enoch.year, 5996);
        assert!((1..=12).contains(&resp.enoch.month));
        assert!(!resp.enoch.added_week);
    }

    #[test]
    fn bad_datetime_is_rejected() {
        let eph = AnalyticEphemeris::new();
        let err = instant_query(&eph, &req("not-a-date")).unwrap_err();
        assert_eq!(err.status_class(), 400);
    }

    #[test]
    fn houses_block_is_present_on_the_wire() {
        let eph = AnalyticEphemeris::new();
        let mut r = req("2025-04-19T12:00:00Z");
        r.latitude = 40.0;
        r.longitude = -3.0;
        let resp = instant_query(&eph, &r).unwrap();
        assert_eq!(resp.houses_data.houses.len(), 12);
        assert_eq!(resp.houses_data.system, "placidus");
        assert_eq!(resp.houses_data.houses[0].degree, resp.houses_data.ascendant.degree);
        assert_eq!(resp.houses_data.houses[9].degree, resp.houses_data.midheaven.degree);
        for c in &resp.houses_data.houses {
            assert!((0.0..30.0).contains(&c.position), "house {}: {}", c.house, c.position);
        }

        let json = serde_json::to_string(&resp).unwrap();
        assert!(json.contains("\"houses_data\""));
        assert!(json.contains("\"ascendant\""));
        assert!(json.contains("\"midheaven\""));
    }

    #[test]
    fn polar_houses_degrade_to_equal_with_a_reason() {
        let eph = AnalyticEphemeris::new();
        let mut r = req("2025-04-19T12:00:00Z");
        r.latitude = 85.0;
        let resp = instant_query(&eph, &r).unwrap();
        assert_eq!(resp.houses_data.system, "equal");
        assert_eq!(resp.quality, "approx");
        assert!(resp.quality_reasons.iter().any(|m| m.contains("equal house")));
    }

    #[test]
    fn forced_approx_reports_quality() {
        let eph = AnalyticEphemeris::new();
        let mut r = req("2025-06-01T12:00:00Z");
        r.approx = true;
        let resp = instant_query(&eph, &r).unwrap();
        assert_eq!(resp.quality, "approx");
        assert!(!resp.quality_reasons.is_empty());
    }
}
