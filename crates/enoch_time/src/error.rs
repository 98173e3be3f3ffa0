//! Error types for calendar parsing and conversion.

use std::error::Error;
use std::fmt::{Display, Formatter};

/// Errors from datetime parsing or calendar arithmetic.
#[derive(Debug, Clone, PartialEq)]
#[non_exhaustive]
pub enum TimeError {
    /// ISO-8601 datetime string could not be parsed.
    Parse(String),
    /// Calendar fields are out of range (month 13, day 0, ...).
    InvalidDate(String),
}

impl Display for TimeError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Parse(msg) => write!(f, "datetime parse error: {msg}"),
            Self::InvalidDate(msg) => write!(f, "invalid calendar date: {msg}"),
        }
    }
}

impl Error for TimeError {}
