//! Unified error handling for the inventory service.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use thiserror::Error;

use stockroom_core::ItemId;

use crate::db::RepositoryError;

/// Application-level error type.
///
/// Any failure inside an atomic storage unit has already been rolled back by
/// the time it surfaces here; callers may retry the whole operation, but
/// retries are not idempotent (reference-number uniqueness is not enforced).
#[derive(Debug, Error)]
pub enum AppError {
    /// Malformed or missing input.
    #[error("validation failed for {field}: {message}")]
    Validation {
        /// Request field that failed, in the wire naming.
        field: &'static str,
        message: String,
    },

    /// An entity reference did not resolve.
    #[error("{entity} {id} not found")]
    NotFound { entity: &'static str, id: i32 },

    /// The operation would drive an item's on-hand quantity negative.
    #[error("insufficient stock for item {item_id}: requested {requested}, available {available}")]
    InsufficientStock {
        item_id: ItemId,
        requested: i32,
        available: i32,
    },

    /// Role check failed at the boundary.
    #[error("forbidden: {0}")]
    Forbidden(String),

    /// Storage failure. Guaranteed no partial state.
    #[error("database error: {0}")]
    Database(RepositoryError),

    /// Internal server error.
    #[error("internal error: {0}")]
    Internal(String),
}

impl From<RepositoryError> for AppError {
    fn from(err: RepositoryError) -> Self {
        match err {
            RepositoryError::NotFound { entity, id } => Self::NotFound { entity, id },
            RepositoryError::InsufficientStock {
                item_id,
                requested,
                available,
            } => Self::InsufficientStock {
                item_id,
                requested,
                available,
            },
            other => Self::Database(other),
        }
    }
}

/// JSON error body returned to clients.
#[derive(Debug, Serialize)]
struct ErrorBody {
    error: &'static str,
    message: String,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        if matches!(self, Self::Database(_) | Self::Internal(_)) {
            tracing::error!(error = %self, "request failed");
        }

        let (status, code) = match &self {
            Self::Validation { .. } => (StatusCode::BAD_REQUEST, "validation_error"),
            Self::NotFound { .. } => (StatusCode::NOT_FOUND, "not_found"),
            Self::InsufficientStock { .. } => (StatusCode::CONFLICT, "insufficient_stock"),
            Self::Forbidden(_) => (StatusCode::FORBIDDEN, "forbidden"),
            Self::Database(_) | Self::Internal(_) => {
                (StatusCode::INTERNAL_SERVER_ERROR, "internal_error")
            }
        };

        // Don't expose internal error details to clients
        let message = match &self {
            Self::Database(_) | Self::Internal(_) => "Internal server error".to_owned(),
            other => other.to_string(),
        };

        (status, Json(ErrorBody { error: code, message })).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn get_status(err: AppError) -> StatusCode {
        err.into_response().status()
    }

    #[test]
    fn test_app_error_display() {
        let err = AppError::NotFound {
            entity: "item",
            id: 12,
        };
        assert_eq!(err.to_string(), "item 12 not found");

        let err = AppError::Validation {
            field: "referenceNumber",
            message: "reference number cannot be empty".to_owned(),
        };
        assert_eq!(
            err.to_string(),
            "validation failed for referenceNumber: reference number cannot be empty"
        );
    }

    #[test]
    fn test_app_error_status_codes() {
        assert_eq!(
            get_status(AppError::Validation {
                field: "items",
                message: "must not be empty".to_owned(),
            }),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            get_status(AppError::NotFound {
                entity: "sale",
                id: 1,
            }),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            get_status(AppError::InsufficientStock {
                item_id: ItemId::new(1),
                requested: 5,
                available: 2,
            }),
            StatusCode::CONFLICT
        );
        assert_eq!(
            get_status(AppError::Forbidden("role check failed".to_owned())),
            StatusCode::FORBIDDEN
        );
        assert_eq!(
            get_status(AppError::Internal("boom".to_owned())),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_repository_error_mapping() {
        let err: AppError = RepositoryError::NotFound {
            entity: "warehouse",
            id: 4,
        }
        .into();
        assert!(matches!(
            err,
            AppError::NotFound {
                entity: "warehouse",
                id: 4
            }
        ));

        let err: AppError = RepositoryError::InsufficientStock {
            item_id: ItemId::new(9),
            requested: 20,
            available: 15,
        }
        .into();
        assert!(matches!(err, AppError::InsufficientStock { .. }));
    }
}
