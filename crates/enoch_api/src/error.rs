//! Structured errors with HTTP-style class semantics.

use serde::Serialize;

use enoch_core::CoreError;
use enoch_eph::EphemerisError;
use enoch_search::SearchError;

/// Request-level failure. `BadRequest` is the caller's fault (400-class);
/// `Internal` is ours (500-class) and only surfaces when even the
/// fully-approximate fallback cannot produce a response.
#[derive(Debug)]
#[non_exhaustive]
pub enum ApiError {
    BadRequest(String),
    Internal(String),
}

impl ApiError {
    pub fn status_class(&self) -> u16 {
        match self {
            ApiError::BadRequest(_) => 400,
            ApiError::Internal(_) => 500,
        }
    }

    /// Serializable error body.
    pub fn to_body(&self) -> ErrorBody {
        let message = match self {
            ApiError::BadRequest(m) | ApiError::Internal(m) => m.clone(),
        };
        ErrorBody {
            ok: false,
            status: self.status_class(),
            error: message,
        }
    }
}

impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ApiError::BadRequest(m) => write!(f, "bad request: {m}"),
            ApiError::Internal(m) => write!(f, "internal error: {m}"),
        }
    }
}

impl std::error::Error for ApiError {}

impl From<CoreError> for ApiError {
    fn from(e: CoreError) -> Self {
        ApiError::Internal(e.to_string())
    }
}

impl From<EphemerisError> for ApiError {
    fn from(e: EphemerisError) -> Self {
        ApiError::Internal(e.to_string())
    }
}

impl From<SearchError> for ApiError {
    fn from(e: SearchError) -> Self {
        ApiError::Internal(e.to_string())
    }
}

/// Wire shape of a failed request.
#[derive(Debug, Clone, Serialize)]
pub struct ErrorBody {
    pub ok: bool,
    pub status: u16,
    pub error: String,
}
