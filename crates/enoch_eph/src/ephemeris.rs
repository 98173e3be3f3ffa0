//! The ephemeris oracle trait and its error type.

use std::error::Error;
use std::fmt::{Display, Formatter};

use crate::{Body, EclipticCoord};

/// Errors from an ephemeris backend.
#[derive(Debug, Clone, PartialEq)]
#[non_exhaustive]
pub enum EphemerisError {
    /// Backend cannot serve queries (missing data files, failed init).
    Unavailable(String),
    /// Requested epoch lies outside the backend's valid span.
    OutOfRange { body: Body, jd: f64 },
    /// Geographic coordinate out of range.
    InvalidCoordinate(&'static str),
}

impl Display for EphemerisError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Unavailable(msg) => write!(f, "ephemeris unavailable: {msg}"),
            Self::OutOfRange { body, jd } => {
                write!(f, "epoch JD {jd} out of range for {body}")
            }
            Self::InvalidCoordinate(msg) => write!(f, "invalid coordinate: {msg}"),
        }
    }
}

impl Error for EphemerisError {}

/// Position oracle: geocentric ecliptic coordinates per body and epoch.
///
/// `jd` is a dynamical-time Julian Day; callers apply the UT offset before
/// querying. Implementations must be pure in `jd` (same input, same
/// output) so results can be memoized upstream.
pub trait Ephemeris: Send + Sync {
    /// Re-assert any process-wide backend state (data search paths).
    ///
    /// Called once at startup and again before heavy scans, since some
    /// hosts reset working directories between requests. The default is a
    /// no-op for self-contained backends.
    fn ensure_initialized(&self) -> Result<(), EphemerisError> {
        Ok(())
    }

    /// Geocentric ecliptic longitude/latitude/distance of `body` at `jd`.
    fn ecliptic(&self, body: Body, jd: f64) -> Result<EclipticCoord, EphemerisError>;
}
