//! Error types for event scanning.

use std::error::Error;
use std::fmt::{Display, Formatter};

use enoch_eph::EphemerisError;

/// Errors from event search.
#[derive(Debug, Clone, PartialEq)]
#[non_exhaustive]
pub enum SearchError {
    /// A scan config failed validation.
    InvalidConfig(&'static str),
    /// Ephemeris backend failure.
    Ephemeris(EphemerisError),
}

impl Display for SearchError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidConfig(msg) => write!(f, "invalid config: {msg}"),
            Self::Ephemeris(e) => write!(f, "ephemeris error: {e}"),
        }
    }
}

impl Error for SearchError {}

impl From<EphemerisError> for SearchError {
    fn from(e: EphemerisError) -> Self {
        Self::Ephemeris(e)
    }
}
