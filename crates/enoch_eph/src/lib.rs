//! Ephemeris oracle seam and bundled low-precision backend.
//!
//! The rest of the engine consumes positions through the [`Ephemeris`]
//! trait: ecliptic longitude, latitude, and distance for a body at a
//! Julian Day. A production deployment plugs a high-precision kernel in
//! here; [`AnalyticEphemeris`] is a self-contained truncated-series
//! backend good to a few arcminutes, which is enough for calendar and
//! event-scan work and requires no data files.

mod analytic;
mod body;
mod coord;
mod ephemeris;
pub mod houses;
pub mod noaa;
pub mod riseset;

pub use analytic::AnalyticEphemeris;
pub use body::Body;
pub use coord::{EclipticCoord, GeoCoordinate};
pub use ephemeris::{Ephemeris, EphemerisError};

/// Astronomical unit in kilometres (IAU 2012).
pub const AU_KM: f64 = 149_597_870.7;
