use axum::{Json, http::StatusCode, response::IntoResponse};
use serde::Serialize;
use thiserror::Error;
use validator::{ValidationError, ValidationErrors};

use crate::{
    dao::{persistence::ImportError, storage::StorageError},
    state::list_store::ListError,
};

/// Errors that can occur in service layer operations.
#[derive(Debug, Error)]
pub enum ServiceError {
    /// A record with the same name (case-insensitive) already exists.
    #[error("duplicate game: {0}")]
    DuplicateName(String),
    /// Invalid input provided by the caller.
    #[error("invalid input: {0}")]
    InvalidInput(String),
    /// A release date failed validation; the previous value is kept.
    #[error("invalid release date: {0}")]
    Validation(String),
    /// The backup document was rejected; nothing was changed.
    #[error("import failed: {0}")]
    Import(#[from] ImportError),
    /// The banner payload is over the configured limit.
    #[error("banner too large ({estimated} bytes, limit {limit})")]
    BannerTooLarge {
        /// Estimated decoded size.
        estimated: u64,
        /// Configured limit.
        limit: u64,
    },
    /// Storage backend failed on an operation that must report it.
    #[error("storage unavailable")]
    Storage(#[from] StorageError),
}

impl From<ListError> for ServiceError {
    fn from(err: ListError) -> Self {
        match err {
            ListError::EmptyName => ServiceError::InvalidInput(err.to_string()),
            ListError::DuplicateName { name } => ServiceError::DuplicateName(name),
        }
    }
}

impl From<ValidationError> for ServiceError {
    fn from(err: ValidationError) -> Self {
        let message = err
            .message
            .map(|message| message.into_owned())
            .unwrap_or_else(|| err.code.into_owned());
        ServiceError::Validation(message)
    }
}

impl From<ValidationErrors> for AppError {
    fn from(err: ValidationErrors) -> Self {
        AppError::BadRequest(format!("validation failed: {}", err))
    }
}

/// Application-level errors that are converted to HTTP responses.
#[derive(Debug, Error)]
pub enum AppError {
    /// Bad request with invalid input.
    #[error("bad request: {0}")]
    BadRequest(String),
    /// Conflict with current state.
    #[error("conflict: {0}")]
    Conflict(String),
    /// Payload over the accepted size.
    #[error("payload too large: {0}")]
    PayloadTooLarge(String),
    /// Service unavailable or degraded.
    #[error("service unavailable: {0}")]
    ServiceUnavailable(String),
}

impl From<ServiceError> for AppError {
    fn from(err: ServiceError) -> Self {
        match err {
            ServiceError::DuplicateName(name) => {
                AppError::Conflict(format!("`{name}` is already in your tracker"))
            }
            ServiceError::InvalidInput(message) => AppError::BadRequest(message),
            ServiceError::Validation(message) => AppError::BadRequest(message),
            ServiceError::Import(source) => AppError::BadRequest(source.to_string()),
            err @ ServiceError::BannerTooLarge { .. } => AppError::PayloadTooLarge(err.to_string()),
            ServiceError::Storage(source) => AppError::ServiceUnavailable(source.to_string()),
        }
    }
}

#[derive(Serialize)]
struct ErrorBody {
    message: String,
}

impl IntoResponse for AppError {
    fn into_response(self) -> axum::response::Response {
        let status = match &self {
            AppError::BadRequest(_) => StatusCode::BAD_REQUEST,
            AppError::Conflict(_) => StatusCode::CONFLICT,
            AppError::PayloadTooLarge(_) => StatusCode::PAYLOAD_TOO_LARGE,
            AppError::ServiceUnavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
        };

        let payload = Json(ErrorBody {
            message: self.to_string(),
        });

        (status, payload).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn list_errors_map_to_service_errors() {
        assert!(matches!(
            ServiceError::from(ListError::DuplicateName { name: "Celeste".into() }),
            ServiceError::DuplicateName(name) if name == "Celeste"
        ));
        assert!(matches!(
            ServiceError::from(ListError::EmptyName),
            ServiceError::InvalidInput(_)
        ));
    }

    #[test]
    fn service_errors_map_to_status_codes() {
        let response = AppError::from(ServiceError::DuplicateName("Tunic".into())).into_response();
        assert_eq!(response.status(), StatusCode::CONFLICT);

        let response = AppError::from(ServiceError::BannerTooLarge {
            estimated: 3,
            limit: 2,
        })
        .into_response();
        assert_eq!(response.status(), StatusCode::PAYLOAD_TOO_LARGE);

        let response = AppError::from(ServiceError::Import(ImportError::MissingLists)).into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }
}
