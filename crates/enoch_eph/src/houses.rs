//! Ascendant, midheaven, and Placidus house cusps.
//!
//! All three derive from local sidereal time and the mean obliquity.
//! Intermediate cusps use the Placidus semi-arc iteration: the cusp's
//! right ascension satisfies `ra = lst + offset + frac * AD(ra)` where
//! `AD` is the ascensional difference of the ecliptic point at `ra`.
//! The iteration has no solution where that point is circumpolar, so at
//! high latitudes the cusps degrade to equal houses from the ascendant
//! and the result is flagged.

use crate::GeoCoordinate;
use crate::riseset::{gmst_deg, obliquity_deg};

const DEG: f64 = std::f64::consts::PI / 180.0;

const PLACIDUS_ITERATIONS: u32 = 12;

/// House angles for one instant and place. Longitudes in degrees, [0, 360).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HouseCusps {
    pub ascendant_deg: f64,
    pub midheaven_deg: f64,
    /// Cusp longitudes, house 1 first. Cusp 1 is the ascendant and cusp
    /// 10 the midheaven.
    pub cusps_deg: [f64; 12],
    /// False when the equal-house fallback replaced the Placidus arcs.
    pub placidus: bool,
}

fn norm360(deg: f64) -> f64 {
    deg.rem_euclid(360.0)
}

/// Ecliptic longitude of the ecliptic point with right ascension `ra_deg`.
fn ecliptic_lon_of_ra(ra_deg: f64, eps_rad: f64) -> f64 {
    let ra = ra_deg * DEG;
    norm360(ra.sin().atan2(ra.cos() * eps_rad.cos()) / DEG)
}

/// Ascensional difference (degrees) of the ecliptic point at `ra_deg`,
/// or `None` when the point is circumpolar at `lat_rad`.
fn ascensional_difference(ra_deg: f64, eps_rad: f64, lat_rad: f64) -> Option<f64> {
    // For ecliptic points, tan(dec) = tan(eps) * sin(ra).
    let tan_dec = eps_rad.tan() * (ra_deg * DEG).sin();
    let x = lat_rad.tan() * tan_dec;
    if x.abs() >= 1.0 {
        return None;
    }
    Some(x.asin() / DEG)
}

/// One cusp by semi-arc iteration: fixed point of
/// `ra = lst + offset + frac * AD(ra)`.
fn semi_arc_cusp(
    lst_deg: f64,
    offset_deg: f64,
    frac: f64,
    eps_rad: f64,
    lat_rad: f64,
) -> Option<f64> {
    let mut ra = lst_deg + offset_deg;
    for _ in 0..PLACIDUS_ITERATIONS {
        let ad = ascensional_difference(ra, eps_rad, lat_rad)?;
        ra = lst_deg + offset_deg + frac * ad;
    }
    Some(ecliptic_lon_of_ra(ra, eps_rad))
}

/// Ascendant, midheaven, and twelve house cusps at `jd_ut` for `geo`.
///
/// Never fails: where the Placidus arcs are undefined the cusps fall
/// back to equal houses and `placidus` is false.
pub fn house_cusps(jd_ut: f64, geo: &GeoCoordinate) -> HouseCusps {
    let lst = norm360(gmst_deg(jd_ut) + geo.longitude_deg());
    let eps = obliquity_deg(jd_ut) * DEG;
    let lat = geo.latitude_deg() * DEG;

    let midheaven_deg = ecliptic_lon_of_ra(lst, eps);
    let t = lst * DEG;
    let ascendant_deg =
        norm360(t.cos().atan2(-(t.sin() * eps.cos() + lat.tan() * eps.sin())) / DEG);

    // Eastern cusps between MC and IC; western ones are their opposites.
    let c11 = semi_arc_cusp(lst, 30.0, 1.0 / 3.0, eps, lat);
    let c12 = semi_arc_cusp(lst, 60.0, 2.0 / 3.0, eps, lat);
    let c2 = semi_arc_cusp(lst, 120.0, 2.0 / 3.0, eps, lat);
    let c3 = semi_arc_cusp(lst, 150.0, 1.0 / 3.0, eps, lat);

    if let (Some(c11), Some(c12), Some(c2), Some(c3)) = (c11, c12, c2, c3) {
        let cusps_deg = [
            ascendant_deg,
            c2,
            c3,
            norm360(midheaven_deg + 180.0),
            norm360(c11 + 180.0),
            norm360(c12 + 180.0),
            norm360(ascendant_deg + 180.0),
            norm360(c2 + 180.0),
            norm360(c3 + 180.0),
            midheaven_deg,
            c11,
            c12,
        ];
        return HouseCusps {
            ascendant_deg,
            midheaven_deg,
            cusps_deg,
            placidus: true,
        };
    }

    let mut cusps_deg = [0.0; 12];
    for (i, cusp) in cusps_deg.iter_mut().enumerate() {
        *cusp = norm360(ascendant_deg + 30.0 * i as f64);
    }
    HouseCusps {
        ascendant_deg,
        midheaven_deg,
        cusps_deg,
        placidus: false,
    }
}
