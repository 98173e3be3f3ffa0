//! Typed response records (spec'd wire shapes, serde-serialized).

use std::collections::BTreeMap;

use serde::Serialize;

use enoch_core::calendar::DayRecord;
use enoch_core::epoch::EnochDate;
use enoch_core::zodiac::sign_from_longitude;
use enoch_eph::houses::HouseCusps;
use enoch_search::{
    AlignmentEvent, AspectKind, CardinalKind, DistanceKind, LunarEclipseKind, SolarEclipseKind,
};

/// Year-scan response body.
#[derive(Debug, Clone, Serialize)]
pub struct YearResponse {
    pub ok: bool,
    pub enoch_year: i32,
    pub days: Vec<DayView>,
    pub quality: &'static str,
    pub quality_reasons: Vec<String>,
}

/// One calendar day with the events bucketed into its sunset interval.
#[derive(Debug, Clone, Serialize)]
pub struct DayView {
    #[serde(flatten)]
    pub day: DayRecord,
    /// Point events inside this day's [start, end) interval.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub events: Vec<EventView>,
    /// Deduplicated alignments sampled inside this day, time order.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub alignments: Vec<AlignmentEvent>,
    /// Best alignment of the day (highest count, then tightest, then
    /// earliest).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub alignment: Option<AlignmentEvent>,
}

/// A discrete event mapped into a day bucket.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum EventView {
    MoonPhase {
        phase: &'static str,
        time_utc: String,
        supermoon: bool,
    },
    MoonDistance {
        kind: DistanceKind,
        time_utc: String,
        distance_km: f64,
    },
    Cardinal {
        kind: CardinalKind,
        time_utc: String,
    },
    LunarEclipse {
        kind: LunarEclipseKind,
        time_utc: String,
        umbral_magnitude: f64,
        penumbral_magnitude: f64,
        moon_lat_deg: f64,
    },
    SolarEclipse {
        kind: SolarEclipseKind,
        time_utc: String,
        magnitude: f64,
        moon_lat_deg: f64,
    },
    Aspect {
        kind: AspectKind,
        body_a: &'static str,
        body_b: &'static str,
        time_utc: String,
        separation_deg: f64,
        offset_deg: f64,
    },
}

/// Single-instant response body.
#[derive(Debug, Clone, Serialize)]
pub struct InstantResponse {
    pub julian_day: f64,
    /// Per-body ecliptic position, keyed by lowercase body name.
    pub planets: BTreeMap<&'static str, PlanetPosition>,
    pub enoch: EnochDateView,
    pub houses_data: HousesData,
    pub quality: &'static str,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub quality_reasons: Vec<String>,
}

/// Ecliptic position of one body.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct PlanetPosition {
    /// Ecliptic longitude, degrees [0, 360).
    pub longitude: f64,
    /// Ecliptic latitude, degrees.
    pub latitude: f64,
    /// Geocentric distance, km.
    pub distance: f64,
}

/// Ascendant, midheaven, and house cusps on the wire.
#[derive(Debug, Clone, Serialize)]
pub struct HousesData {
    pub ascendant: HouseAngleView,
    pub midheaven: HouseAngleView,
    /// Twelve cusps, house 1 first.
    pub houses: Vec<HouseCuspView>,
    /// "placidus", or "equal" at latitudes where the arcs are undefined.
    pub system: &'static str,
}

/// One zodiac-decorated angle.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct HouseAngleView {
    /// Ecliptic longitude, degrees [0, 360).
    pub degree: f64,
    pub sign: &'static str,
    /// Degrees into the sign, [0, 30).
    pub position: f64,
}

/// One house cusp.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct HouseCuspView {
    pub house: u32,
    pub degree: f64,
    pub sign: &'static str,
    pub position: f64,
}

fn angle_view(degree: f64) -> HouseAngleView {
    HouseAngleView {
        degree,
        sign: sign_from_longitude(degree),
        position: degree.rem_euclid(30.0),
    }
}

impl From<HouseCusps> for HousesData {
    fn from(h: HouseCusps) -> Self {
        let houses = h
            .cusps_deg
            .iter()
            .enumerate()
            .map(|(i, &degree)| HouseCuspView {
                house: i as u32 + 1,
                degree,
                sign: sign_from_longitude(degree),
                position: degree.rem_euclid(30.0),
            })
            .collect();
        Self {
            ascendant: angle_view(h.ascendant_deg),
            midheaven: angle_view(h.midheaven_deg),
            houses,
            system: if h.placidus { "placidus" } else { "equal" },
        }
    }
}

/// Enoch calendar date on the wire.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct EnochDateView {
    pub year: i32,
    pub month: u32,
    pub day: u32,
    pub day_of_year: u32,
    pub added_week: bool,
}

impl From<EnochDate> for EnochDateView {
    fn from(d: EnochDate) -> Self {
        Self {
            year: d.year,
            month: d.month,
            day: d.day,
            day_of_year: d.day_of_year,
            added_week: d.added_week,
        }
    }
}
