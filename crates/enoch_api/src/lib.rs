//! Typed request/response layer and orchestration for the Enoch calendar
//! engine: year scans (epoch, day records, bucketed events, alignments)
//! and single-instant queries.
//!
//! No transport lives here; hosts embed these functions behind whatever
//! surface they choose. Errors carry a 400/500 status class and a
//! serializable body.

mod error;
pub mod instant;
pub mod request;
pub mod response;
pub mod year;

pub use enoch_search::BodySet;
pub use error::{ApiError, ErrorBody};
pub use instant::instant_query;
pub use request::{InstantRequest, YearRequest, datetime_to_jd};
pub use response::{
    DayView, EnochDateView, EventView, HouseAngleView, HouseCuspView, HousesData,
    InstantResponse, PlanetPosition, YearResponse,
};
pub use year::year_scan;
