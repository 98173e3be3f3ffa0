//! Configuration and result types for alignment and aspect search.

use enoch_eph::Body;
use serde::{Deserialize, Serialize};

/// Named planet selections for alignment search.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BodySet {
    /// Sun, Moon and the inner planets through Mars.
    Inner,
    /// The five naked-eye planets.
    Classic5,
    /// The seven classical bodies (luminaries plus naked-eye planets).
    Seven,
    /// Everything through Pluto.
    All,
}

impl BodySet {
    fn base(self) -> &'static [Body] {
        match self {
            BodySet::Inner => &[Body::Sun, Body::Moon, Body::Mercury, Body::Venus, Body::Mars],
            BodySet::Classic5 => {
                &[Body::Mercury, Body::Venus, Body::Mars, Body::Jupiter, Body::Saturn]
            }
            BodySet::Seven => &[
                Body::Sun,
                Body::Moon,
                Body::Mercury,
                Body::Venus,
                Body::Mars,
                Body::Jupiter,
                Body::Saturn,
            ],
            BodySet::All => &Body::ALL,
        }
    }
}

/// Tuning for the alignment scanner (and the aspect scanner, which shares
/// the body selection and step).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AlignmentConfig {
    pub body_set: BodySet,
    /// Minimum cluster size worth reporting.
    pub min_count: usize,
    /// Maximum ecliptic-longitude arc of a cluster, degrees. Clamped to
    /// [1, 60] at scan time.
    pub max_span_deg: f64,
    /// Coarse step, hours. Clamped to [1, 24] at scan time.
    pub step_hours: f64,
    pub include_sun: bool,
    pub include_moon: bool,
    /// Keep Uranus, Neptune and Pluto when the set carries them.
    pub include_outer: bool,
    pub detect_aspects: bool,
    pub include_oppositions: bool,
}

impl Default for AlignmentConfig {
    fn default() -> Self {
        Self {
            body_set: BodySet::Seven,
            min_count: 4,
            max_span_deg: 30.0,
            step_hours: 24.0,
            include_sun: true,
            include_moon: true,
            include_outer: false,
            detect_aspects: false,
            include_oppositions: true,
        }
    }
}

impl AlignmentConfig {
    pub fn validate(&self) -> Result<(), &'static str> {
        if self.min_count < 2 {
            return Err("min_count must be at least 2");
        }
        if self.min_count > self.body_list().len() {
            return Err("min_count exceeds the selected body count");
        }
        if !self.max_span_deg.is_finite() || !self.step_hours.is_finite() {
            return Err("max_span_deg and step_hours must be finite");
        }
        Ok(())
    }

    /// The bodies actually scanned after the include filters.
    pub fn body_list(&self) -> Vec<Body> {
        self.body_set
            .base()
            .iter()
            .copied()
            .filter(|b| match b {
                Body::Sun => self.include_sun,
                Body::Moon => self.include_moon,
                Body::Uranus | Body::Neptune | Body::Pluto => self.include_outer,
                _ => true,
            })
            .collect()
    }

    pub(crate) fn effective_span_deg(&self) -> f64 {
        self.max_span_deg.clamp(1.0, 60.0)
    }

    pub(crate) fn effective_step_days(&self) -> f64 {
        self.step_hours.clamp(1.0, 24.0) / 24.0
    }
}

/// A multi-body longitude cluster at one sampling instant.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AlignmentEvent {
    /// Sampling instant (JD UT).
    pub jd: f64,
    /// Clustered body names, in longitude order along the arc.
    pub bodies: Vec<&'static str>,
    pub count: usize,
    /// Arc from first to last clustered body, degrees.
    pub span_deg: f64,
    /// Midpoint longitude of the arc, degrees in [0, 360).
    pub center_lon_deg: f64,
    /// Blended tightness/participation score in [0, 1].
    pub score: f64,
}

/// Classical 2-body aspect kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum AspectKind {
    Conjunction,
    Opposition,
    Square,
    Trine,
    Sextile,
}

impl AspectKind {
    pub const ALL: [AspectKind; 5] = [
        AspectKind::Conjunction,
        AspectKind::Opposition,
        AspectKind::Square,
        AspectKind::Trine,
        AspectKind::Sextile,
    ];

    /// Exact separation of the aspect, degrees.
    pub fn angle_deg(self) -> f64 {
        match self {
            Self::Conjunction => 0.0,
            Self::Opposition => 180.0,
            Self::Square => 90.0,
            Self::Trine => 120.0,
            Self::Sextile => 60.0,
        }
    }

    /// Maximum offset from exact still counted as the aspect, degrees.
    pub fn orb_deg(self) -> f64 {
        match self {
            Self::Conjunction | Self::Opposition => 8.0,
            Self::Square => 5.0,
            Self::Trine => 4.0,
            Self::Sextile => 3.0,
        }
    }
}

/// A refined 2-body aspect.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct AspectEvent {
    pub kind: AspectKind,
    /// Instant of minimal offset (JD UT).
    pub jd: f64,
    pub body_a: &'static str,
    pub body_b: &'static str,
    /// Angular separation at `jd`, degrees in [0, 180].
    pub separation_deg: f64,
    /// |separation - exact aspect angle| at `jd`, degrees.
    pub offset_deg: f64,
}
