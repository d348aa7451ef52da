//! Service-layer error type
//!
//! `ServiceError` bridges store errors (`StoreError`) and the API-layer
//! error (`AppError`), so services can use `?` on both without mapping
//! and logging at every call site.

use axum::response::IntoResponse;
use shared::error::{AppError, ErrorCode};

use crate::store::StoreError;

#[derive(Debug)]
pub enum ServiceError {
    /// Record store failure (auto-logged, mapped to a store error code)
    Store(StoreError),
    /// Business-rule error (passed through to the client)
    App(AppError),
}

impl From<StoreError> for ServiceError {
    fn from(e: StoreError) -> Self {
        ServiceError::Store(e)
    }
}

impl From<AppError> for ServiceError {
    fn from(e: AppError) -> Self {
        ServiceError::App(e)
    }
}

impl From<StoreError> for AppError {
    fn from(e: StoreError) -> Self {
        let code = match &e {
            StoreError::Transport(_) => ErrorCode::StoreUnavailable,
            StoreError::Decode(_) => ErrorCode::StoreDecodeError,
            StoreError::UnknownColumn { .. } | StoreError::Rejected { .. } => ErrorCode::StoreError,
        };
        AppError::with_message(code, e.to_string())
    }
}

impl From<ServiceError> for AppError {
    fn from(e: ServiceError) -> Self {
        match e {
            ServiceError::App(app_err) => app_err,
            ServiceError::Store(store_err) => {
                tracing::error!(error = %store_err, "Record store error");
                store_err.into()
            }
        }
    }
}

impl IntoResponse for ServiceError {
    fn into_response(self) -> axum::response::Response {
        let app_error: AppError = self.into();
        app_error.into_response()
    }
}

pub type ServiceResult<T> = Result<T, ServiceError>;

#[cfg(test)]
mod tests {
    use super::*;
    use http::StatusCode;

    #[test]
    fn test_store_errors_map_to_store_codes() {
        let err: AppError = ServiceError::from(StoreError::Transport("connection refused".into())).into();
        assert_eq!(err.code, ErrorCode::StoreUnavailable);
        assert_eq!(err.message, "store unreachable: connection refused");
        assert_eq!(err.http_status(), StatusCode::INTERNAL_SERVER_ERROR);

        let err: AppError = StoreError::rejected("permission denied for table areas").into();
        assert_eq!(err.code, ErrorCode::StoreError);
        assert_eq!(err.message, "permission denied for table areas");
    }

    #[test]
    fn test_app_errors_pass_through() {
        let err: AppError = ServiceError::from(AppError::new(ErrorCode::TableOccupied)).into();
        assert_eq!(err.code, ErrorCode::TableOccupied);
        assert_eq!(err.http_status(), StatusCode::CONFLICT);
    }
}
