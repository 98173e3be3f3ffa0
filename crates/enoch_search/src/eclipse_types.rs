//! Types for eclipse search results.

use serde::Serialize;

/// Lunar eclipse classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum LunarEclipseKind {
    Penumbral,
    Partial,
    Total,
}

/// Geocentric solar eclipse classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SolarEclipseKind {
    Partial,
    Annular,
    Total,
}

/// A lunar eclipse at a full moon.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct LunarEclipse {
    pub kind: LunarEclipseKind,
    /// Greatest eclipse instant (JD UT), the refined full moon.
    pub jd: f64,
    /// Umbral magnitude (fraction of the lunar diameter inside the umbra).
    pub umbral_magnitude: f64,
    /// Penumbral magnitude.
    pub penumbral_magnitude: f64,
    /// Moon's ecliptic latitude at greatest eclipse (deg).
    pub moon_lat_deg: f64,
}

/// A geocentric solar eclipse at a new moon.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SolarEclipse {
    pub kind: SolarEclipseKind,
    /// Greatest eclipse instant (JD UT), the refined new moon.
    pub jd: f64,
    /// Lunar/solar diameter ratio for central kinds, covered fraction of
    /// the solar diameter for partials.
    pub magnitude: f64,
    /// Moon's ecliptic latitude at greatest eclipse (deg).
    pub moon_lat_deg: f64,
}
