//! Error types for calendar core operations.

use std::error::Error;
use std::fmt::{Display, Formatter};

use enoch_eph::EphemerisError;

/// Errors from epoch resolution or calendar construction.
#[derive(Debug, Clone, PartialEq)]
#[non_exhaustive]
pub enum CoreError {
    /// Day-of-year outside the 1..=364 (or 371) range for the year.
    DayOfYearRange { day_of_year: i64, max: u32 },
    /// Ephemeris backend failure that no fallback absorbed.
    Ephemeris(EphemerisError),
}

impl Display for CoreError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::DayOfYearRange { day_of_year, max } => {
                write!(f, "day of year {day_of_year} outside 1..={max}")
            }
            Self::Ephemeris(e) => write!(f, "ephemeris error: {e}"),
        }
    }
}

impl Error for CoreError {}

impl From<EphemerisError> for CoreError {
    fn from(e: EphemerisError) -> Self {
        Self::Ephemeris(e)
    }
}
