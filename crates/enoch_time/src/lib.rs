//! Time foundations: Julian Day arithmetic and UTC calendar handling.
//!
//! Everything downstream works in Julian Day (UT) space so that proleptic
//! BCE years and far-future years never overflow civil-calendar types.
//! Conversions use the proleptic Gregorian calendar throughout.

mod error;
pub mod julian;
mod utc_time;
pub mod weekday;

pub use error::TimeError;
pub use julian::{calendar_to_jd, jd_from_ymd_hms, jd_to_calendar};
pub use utc_time::UtcTime;
pub use weekday::{wednesday_index, weekday_index};
