//! Self-contained low-precision ephemeris backend.
//!
//! Sun: truncated solar theory (Meeus Ch. 25, equation of centre to sin 3M).
//! Moon: largest periodic terms of the lunar theory (Meeus Ch. 47).
//! Planets: Keplerian mean elements with secular rates (Standish 1800-2050
//! table), heliocentric positions differenced against the Earth-Moon
//! barycentre.
//!
//! Accuracy is a few arcminutes for Sun/Moon and better than a degree for
//! the planets over several millennia around J2000, which suits calendar
//! boundaries and day-granularity event scanning. It degrades gracefully
//! far outside that span; no epoch is rejected.

use crate::{AU_KM, Body, EclipticCoord, Ephemeris, EphemerisError};

const DEG: f64 = std::f64::consts::PI / 180.0;

/// Julian centuries since J2000.0.
fn centuries(jd: f64) -> f64 {
    (jd - 2_451_545.0) / 36_525.0
}

fn norm360(deg: f64) -> f64 {
    deg.rem_euclid(360.0)
}

/// Keplerian mean elements at J2000 plus per-century rates.
/// Order: a (AU), e, i (deg), L (deg), long. perihelion (deg), long. node (deg).
struct Elements {
    a: [f64; 2],
    e: [f64; 2],
    i: [f64; 2],
    l: [f64; 2],
    peri: [f64; 2],
    node: [f64; 2],
}

const MERCURY: Elements = Elements {
    a: [0.387_099_27, 0.000_000_37],
    e: [0.205_635_93, 0.000_019_06],
    i: [7.004_979_02, -0.005_947_49],
    l: [252.250_323_50, 149_472.674_111_75],
    peri: [77.457_796_28, 0.160_476_89],
    node: [48.330_765_93, -0.125_340_81],
};
const VENUS: Elements = Elements {
    a: [0.723_335_66, 0.000_003_90],
    e: [0.006_776_72, -0.000_041_07],
    i: [3.394_676_05, -0.000_788_90],
    l: [181.979_099_50, 58_517.815_387_29],
    peri: [131.602_467_18, 0.002_683_29],
    node: [76.679_842_55, -0.277_694_18],
};
const EM_BARY: Elements = Elements {
    a: [1.000_002_61, 0.000_005_62],
    e: [0.016_711_23, -0.000_043_92],
    i: [-0.000_015_31, -0.012_946_68],
    l: [100.464_571_66, 35_999.372_449_81],
    peri: [102.937_681_93, 0.323_273_64],
    node: [0.0, 0.0],
};
const MARS: Elements = Elements {
    a: [1.523_710_34, 0.000_018_47],
    e: [0.093_394_10, 0.000_078_82],
    i: [1.849_691_42, -0.008_131_31],
    l: [-4.553_432_05, 19_140.302_684_99],
    peri: [-23.943_629_59, 0.444_410_88],
    node: [49.559_538_91, -0.292_573_43],
};
const JUPITER: Elements = Elements {
    a: [5.202_887_00, -0.000_116_07],
    e: [0.048_386_24, -0.000_132_53],
    i: [1.304_396_95, -0.001_837_14],
    l: [34.396_440_51, 3_034.746_127_75],
    peri: [14.728_479_83, 0.212_526_68],
    node: [100.473_909_09, 0.204_691_06],
};
const SATURN: Elements = Elements {
    a: [9.536_675_94, -0.001_250_60],
    e: [0.053_861_79, -0.000_509_91],
    i: [2.485_991_87, 0.001_936_09],
    l: [49.954_244_23, 1_222.493_622_01],
    peri: [92.598_878_31, -0.418_972_16],
    node: [113.662_424_48, -0.288_677_94],
};
const URANUS: Elements = Elements {
    a: [19.189_164_64, -0.001_961_76],
    e: [0.047_257_44, -0.000_043_97],
    i: [0.772_637_83, -0.002_429_39],
    l: [313.238_104_51, 428.482_027_85],
    peri: [170.954_276_30, 0.408_052_81],
    node: [74.016_925_03, 0.042_405_89],
};
const NEPTUNE: Elements = Elements {
    a: [30.069_922_76, 0.000_262_91],
    e: [0.008_590_48, 0.000_051_05],
    i: [1.770_043_47, 0.000_353_72],
    l: [-55.120_029_69, 218.459_453_25],
    peri: [44.964_762_27, -0.322_414_64],
    node: [131.784_225_74, -0.005_086_64],
};
const PLUTO: Elements = Elements {
    a: [39.482_116_75, -0.000_315_96],
    e: [0.248_827_30, 0.000_051_70],
    i: [17.140_012_06, 0.000_048_18],
    l: [238.929_038_33, 145.207_805_15],
    peri: [224.068_916_29, -0.040_629_42],
    node: [110.303_936_84, -0.011_834_82],
};

fn elements_for(body: Body) -> Option<&'static Elements> {
    match body {
        Body::Mercury => Some(&MERCURY),
        Body::Venus => Some(&VENUS),
        Body::Mars => Some(&MARS),
        Body::Jupiter => Some(&JUPITER),
        Body::Saturn => Some(&SATURN),
        Body::Uranus => Some(&URANUS),
        Body::Neptune => Some(&NEPTUNE),
        Body::Pluto => Some(&PLUTO),
        Body::Sun | Body::Moon => None,
    }
}

/// Solve Kepler's equation for eccentric anomaly (degrees).
fn eccentric_anomaly(mean_anomaly_deg: f64, e: f64) -> f64 {
    let e_star = e / DEG;
    let m = mean_anomaly_deg;
    let mut big_e = m + e_star * (m * DEG).sin();
    for _ in 0..10 {
        let delta_m = m - (big_e - e_star * (big_e * DEG).sin());
        let delta_e = delta_m / (1.0 - e * (big_e * DEG).cos());
        big_e += delta_e;
        if delta_e.abs() < 1e-8 {
            break;
        }
    }
    big_e
}

/// Heliocentric ecliptic rectangular position in AU.
fn heliocentric(el: &Elements, t: f64) -> [f64; 3] {
    let a = el.a[0] + el.a[1] * t;
    let e = el.e[0] + el.e[1] * t;
    let i = (el.i[0] + el.i[1] * t) * DEG;
    let l = el.l[0] + el.l[1] * t;
    let peri = el.peri[0] + el.peri[1] * t;
    let node = el.node[0] + el.node[1] * t;

    let m = norm360(l - peri + 180.0) - 180.0;
    let omega = (peri - node) * DEG;
    let node_r = node * DEG;

    let big_e = eccentric_anomaly(m, e) * DEG;
    let xp = a * (big_e.cos() - e);
    let yp = a * (1.0 - e * e).sqrt() * big_e.sin();

    let (so, co) = (omega.sin(), omega.cos());
    let (sn, cn) = (node_r.sin(), node_r.cos());
    let (si, ci) = (i.sin(), i.cos());

    [
        (co * cn - so * sn * ci) * xp + (-so * cn - co * sn * ci) * yp,
        (co * sn + so * cn * ci) * xp + (-so * sn + co * cn * ci) * yp,
        so * si * xp + co * si * yp,
    ]
}

/// Geometric solar longitude (deg), latitude (deg, 0), distance (km).
fn sun_position(jd: f64) -> EclipticCoord {
    let t = centuries(jd);
    let l0 = 280.46646 + 36_000.76983 * t + 0.000_3032 * t * t;
    let m = 357.52911 + 35_999.05029 * t - 0.000_1537 * t * t;
    let e = 0.016_708_634 - 0.000_042_037 * t - 0.000_000_1267 * t * t;
    let m_r = m * DEG;

    let c = (1.914_602 - 0.004_817 * t - 0.000_014 * t * t) * m_r.sin()
        + (0.019_993 - 0.000_101 * t) * (2.0 * m_r).sin()
        + 0.000_289 * (3.0 * m_r).sin();

    // Aberration brings the geometric longitude close to apparent.
    let lon = norm360(l0 + c - 0.005_69);
    let nu = (m + c) * DEG;
    let r_au = 1.000_001_018 * (1.0 - e * e) / (1.0 + e * nu.cos());

    EclipticCoord {
        lon_deg: lon,
        lat_deg: 0.0,
        distance_km: r_au * AU_KM,
    }
}

/// Lunar position from the dominant periodic terms.
fn moon_position(jd: f64) -> EclipticCoord {
    let t = centuries(jd);

    // Mean longitude, elongation, anomalies, argument of latitude (deg).
    let lp = 218.316_4477 + 481_267.881_234_21 * t - 0.001_5786 * t * t;
    let d = 297.850_1921 + 445_267.111_4034 * t - 0.001_8819 * t * t;
    let m = 357.529_1092 + 35_999.050_2909 * t - 0.000_1536 * t * t;
    let mp = 134.963_3964 + 477_198.867_5055 * t + 0.008_7414 * t * t;
    let f = 93.272_0950 + 483_202.017_5233 * t - 0.003_6539 * t * t;

    let (d, m, mp, f) = (d * DEG, m * DEG, mp * DEG, f * DEG);

    let lon = lp
        + 6.288_774 * mp.sin()
        + 1.274_027 * (2.0 * d - mp).sin()
        + 0.658_314 * (2.0 * d).sin()
        + 0.213_618 * (2.0 * mp).sin()
        - 0.185_116 * m.sin()
        - 0.114_332 * (2.0 * f).sin()
        + 0.058_793 * (2.0 * d - 2.0 * mp).sin()
        + 0.057_066 * (2.0 * d - m - mp).sin()
        + 0.053_322 * (2.0 * d + mp).sin()
        + 0.045_758 * (2.0 * d - m).sin();

    let lat = 5.128_122 * f.sin()
        + 0.280_602 * (mp + f).sin()
        + 0.277_693 * (mp - f).sin()
        + 0.173_237 * (2.0 * d - f).sin()
        + 0.055_413 * (2.0 * d - mp + f).sin()
        + 0.046_271 * (2.0 * d - mp - f).sin();

    let dist = 385_000.56 - 20_905.355 * mp.cos() - 3_699.111 * (2.0 * d - mp).cos()
        - 2_955.968 * (2.0 * d).cos()
        - 569.925 * (2.0 * mp).cos();

    EclipticCoord {
        lon_deg: norm360(lon),
        lat_deg: lat,
        distance_km: dist,
    }
}

fn planet_position(el: &Elements, jd: f64) -> EclipticCoord {
    let t = centuries(jd);
    let p = heliocentric(el, t);
    let earth = heliocentric(&EM_BARY, t);
    let g = [p[0] - earth[0], p[1] - earth[1], p[2] - earth[2]];

    let rho = (g[0] * g[0] + g[1] * g[1]).sqrt();
    let lon = norm360(g[1].atan2(g[0]) / DEG);
    let lat = g[2].atan2(rho) / DEG;
    let dist = (g[0] * g[0] + g[1] * g[1] + g[2] * g[2]).sqrt();

    EclipticCoord {
        lon_deg: lon,
        lat_deg: lat,
        distance_km: dist * AU_KM,
    }
}

/// Bundled analytic ephemeris backend. Stateless and always available.
#[derive(Debug, Default, Clone, Copy)]
pub struct AnalyticEphemeris;

impl AnalyticEphemeris {
    pub fn new() -> Self {
        Self
    }
}

impl Ephemeris for AnalyticEphemeris {
    fn ecliptic(&self, body: Body, jd: f64) -> Result<EclipticCoord, EphemerisError> {
        if !jd.is_finite() {
            return Err(EphemerisError::OutOfRange { body, jd });
        }
        let coord = match body {
            Body::Sun => sun_position(jd),
            Body::Moon => moon_position(jd),
            _ => {
                // elements_for covers every non-luminary variant
                let el = elements_for(body).ok_or(EphemerisError::OutOfRange { body, jd })?;
                planet_position(el, jd)
            }
        };
        Ok(coord)
    }
}
