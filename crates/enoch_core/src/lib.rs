//! Enoch calendar core: sampling, root-finding, epoch resolution, and
//! the day-by-day calendar builder.
//!
//! The exact path uses the ephemeris oracle for equinoxes and sunsets;
//! every step has an approximate fallback (NOAA sunset, fixed equinox
//! offset, synodic lunar model) so a year can always be produced, with
//! the degradation recorded in a [`QualityLog`].

pub mod calendar;
pub mod epoch;
mod error;
mod quality;
pub mod rootfind;
mod sampler;
pub mod zodiac;

pub use calendar::{BuildOptions, DayRecord, build_days};
pub use epoch::{EnochDate, EnochEpoch, MONTH_LENGTHS, enoch_date_at, resolve_epoch};
pub use error::CoreError;
pub use quality::QualityLog;
pub use sampler::{LunarState, SunMoonSampler, UT_TO_TT_DAYS};
