use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use describer_core::error::CoreError;
use describer_storage::StorageError;
use serde_json::json;

/// Application-level error type for HTTP handlers.
///
/// Wraps [`CoreError`] for domain errors and the store/storage errors, and
/// adds HTTP-specific variants. Implements [`IntoResponse`] to produce
/// consistent JSON error responses.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// A domain-level error from `describer_core`.
    #[error(transparent)]
    Core(#[from] CoreError),

    /// A record store error from sqlx.
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// A profile image storage error.
    #[error(transparent)]
    Storage(#[from] StorageError),

    /// An internal error with a human-readable message.
    #[error("Internal error: {0}")]
    InternalError(String),
}

/// Convenience type alias for handler return values.
pub type AppResult<T> = Result<T, AppError>;

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message) = match &self {
            // --- CoreError variants ---
            AppError::Core(core) => match core {
                CoreError::NotFound { entity, id } => (
                    StatusCode::NOT_FOUND,
                    "NOT_FOUND",
                    format!("{entity} with id {id} not found"),
                ),
                CoreError::Validation(msg) => {
                    (StatusCode::BAD_REQUEST, "VALIDATION_ERROR", msg.clone())
                }
                CoreError::Conflict(msg) => (StatusCode::CONFLICT, "CONFLICT", msg.clone()),
            },

            // --- Record store errors ---
            AppError::Database(err) => {
                tracing::error!(error = %err, "Database error");
                internal()
            }

            // --- Image storage errors ---
            AppError::Storage(err) => match err {
                StorageError::Empty => (
                    StatusCode::NOT_FOUND,
                    "NO_PROFILES",
                    "No profile images are available".to_string(),
                ),
                StorageError::NotFound(name) => (
                    StatusCode::NOT_FOUND,
                    "NOT_FOUND",
                    format!("Profile image {name} not found"),
                ),
                StorageError::Remote(msg) => {
                    tracing::error!(error = %msg, "Remote storage error");
                    (
                        StatusCode::BAD_GATEWAY,
                        "STORAGE_UNAVAILABLE",
                        "Profile storage is unavailable".to_string(),
                    )
                }
                StorageError::Io(_) | StorageError::Config(_) => {
                    tracing::error!(error = %err, "Storage error");
                    internal()
                }
            },

            // --- HTTP-specific errors ---
            AppError::InternalError(msg) => {
                tracing::error!(error = %msg, "Internal error");
                internal()
            }
        };

        let body = json!({
            "error": message,
            "code": code,
        });

        (status, axum::Json(body)).into_response()
    }
}

fn internal() -> (StatusCode, &'static str, String) {
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        "INTERNAL_ERROR",
        "An internal error occurred".to_string(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn status_of(err: AppError) -> StatusCode {
        err.into_response().status()
    }

    #[test]
    fn core_errors_map_to_client_statuses() {
        assert_eq!(
            status_of(CoreError::Validation("bad".into()).into()),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            status_of(CoreError::Conflict("dup".into()).into()),
            StatusCode::CONFLICT
        );
        assert_eq!(
            status_of(
                CoreError::NotFound {
                    entity: "Session",
                    id: "x".into()
                }
                .into()
            ),
            StatusCode::NOT_FOUND
        );
    }

    #[test]
    fn storage_errors_map_by_kind() {
        assert_eq!(status_of(StorageError::Empty.into()), StatusCode::NOT_FOUND);
        assert_eq!(
            status_of(StorageError::Remote("timeout".into()).into()),
            StatusCode::BAD_GATEWAY
        );
    }

    #[test]
    fn database_errors_are_sanitized() {
        assert_eq!(
            status_of(sqlx::Error::PoolTimedOut.into()),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }
}
