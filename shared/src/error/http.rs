//! HTTP status code mapping for error codes

use super::codes::ErrorCode;
use http::StatusCode;

impl ErrorCode {
    /// Get the appropriate HTTP status code for this error code
    pub fn http_status(&self) -> StatusCode {
        match self {
            Self::Success => StatusCode::OK,

            Self::NotFound | Self::ReservationNotFound | Self::TableNotFound => {
                StatusCode::NOT_FOUND
            }

            Self::TableNotActive | Self::TableOccupied => StatusCode::CONFLICT,

            // Readiness probes and orchestration
            Self::NotReady => StatusCode::SERVICE_UNAVAILABLE,

            Self::Unknown
            | Self::ReservationWriteFailed
            | Self::StatusUpdateFailed
            | Self::StoreError
            | Self::StoreUnavailable
            | Self::StoreDecodeError
            | Self::InternalError => StatusCode::INTERNAL_SERVER_ERROR,

            // 400 Bad Request (validation)
            _ => StatusCode::BAD_REQUEST,
        }
    }
}
