//! Event types shared by the phase, distance, and cardinal scanners.

use serde::Serialize;

/// Lunar phase event kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PhaseKind {
    New,
    FirstQuarter,
    Full,
    LastQuarter,
}

impl PhaseKind {
    /// Target phase angle in degrees.
    pub fn target_deg(self) -> f64 {
        match self {
            Self::New => 0.0,
            Self::FirstQuarter => 90.0,
            Self::Full => 180.0,
            Self::LastQuarter => 270.0,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::New => "new",
            Self::FirstQuarter => "first_quarter",
            Self::Full => "full",
            Self::LastQuarter => "last_quarter",
        }
    }
}

/// A refined lunar phase event.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct PhaseEvent {
    pub kind: PhaseKind,
    /// Instant of the exact phase angle (JD UT).
    pub jd: f64,
    /// True when a full moon falls within a day of perigee.
    pub supermoon: bool,
}

/// Lunar distance extremum kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DistanceKind {
    Perigee,
    Apogee,
}

/// A refined perigee or apogee.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct DistanceEvent {
    pub kind: DistanceKind,
    pub jd: f64,
    pub distance_km: f64,
}

/// Solar cardinal point kind, by target solar longitude.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CardinalKind {
    MarchEquinox,
    JuneSolstice,
    SeptemberEquinox,
    DecemberSolstice,
}

impl CardinalKind {
    pub const ALL: [CardinalKind; 4] = [
        CardinalKind::MarchEquinox,
        CardinalKind::JuneSolstice,
        CardinalKind::SeptemberEquinox,
        CardinalKind::DecemberSolstice,
    ];

    /// Target solar longitude in degrees.
    pub fn target_deg(self) -> f64 {
        match self {
            Self::MarchEquinox => 0.0,
            Self::JuneSolstice => 90.0,
            Self::SeptemberEquinox => 180.0,
            Self::DecemberSolstice => 270.0,
        }
    }

    /// Whether this is an equinox (vs solstice).
    pub fn is_equinox(self) -> bool {
        matches!(self, Self::MarchEquinox | Self::SeptemberEquinox)
    }
}

/// A refined equinox or solstice crossing.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct CardinalEvent {
    pub kind: CardinalKind,
    pub jd: f64,
}
