//! Year-span event scanning: lunar phases, perigee/apogee, solar cardinal
//! points, eclipses, multi-body alignments, and 2-body aspects.
//!
//! Every scanner follows the same shape: coarse-step sampling of a scalar
//! function of JD, wrap-aware sign-change (or extremum) detection, then
//! root refinement with the generic routines in `enoch_core::rootfind`.

pub mod alignment;
mod alignment_types;
pub mod aspect;
pub mod cardinal;
pub mod distance;
pub mod eclipse;
mod eclipse_types;
mod error;
mod events;
pub mod phase;

pub use alignment_types::{AlignmentConfig, AlignmentEvent, AspectEvent, AspectKind, BodySet};
pub use eclipse_types::{LunarEclipse, LunarEclipseKind, SolarEclipse, SolarEclipseKind};
pub use error::SearchError;
pub use events::{
    CardinalEvent, CardinalKind, DistanceEvent, DistanceKind, PhaseEvent, PhaseKind,
};
