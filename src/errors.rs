use serde::Serialize;
use thiserror::Error;
use warp::http::StatusCode;
use warp::reject::Reject;

pub type ApiResult<T> = Result<T, ApiError>;

/// Failures surfaced by the computation engine and the serving layer.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("unknown utility '{0}'")]
    UnknownUtility(String),
    #[error("unsupported breakdown '{0}'")]
    UnsupportedBreakdown(String),
    #[error("carbon intensity factor feed unavailable: {0}")]
    FactorFeedUnavailable(String),
    #[error("invalid fuel weights for {utility}: {reason}")]
    InvalidFuelWeights { utility: String, reason: String },
    #[error("invalid date range: {0}")]
    InvalidDateRange(String),
    #[error("record source failure: {0}")]
    RecordSource(String),
}

impl ApiError {
    /// HTTP status the error maps to when served.
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::UnknownUtility(..)
            | ApiError::UnsupportedBreakdown(..)
            | ApiError::InvalidDateRange(..) => StatusCode::BAD_REQUEST,
            ApiError::FactorFeedUnavailable(..) => StatusCode::BAD_GATEWAY,
            ApiError::InvalidFuelWeights { .. } => StatusCode::INTERNAL_SERVER_ERROR,
            ApiError::RecordSource(..) => StatusCode::SERVICE_UNAVAILABLE,
        }
    }
}

impl Reject for ApiError {}

/// Wire shape shared by all error responses.
#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub message: String,
    pub code: u16,
}

impl ErrorBody {
    pub fn from_error(error: &ApiError) -> Self {
        ErrorBody {
            message: error.to_string(),
            code: error.status().as_u16(),
        }
    }
}
