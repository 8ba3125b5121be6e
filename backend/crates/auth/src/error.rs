//! Auth Error Types
//!
//! Auth-specific error variants integrating with the unified
//! `kernel::error::AppError` system.
//!
//! User-facing messages are German (product language); operator logs are
//! English. Credential failures share one generic message so the response
//! never reveals whether the email or the password was wrong.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use kernel::error::{app_error::AppError, kind::ErrorKind};
use thiserror::Error;

/// Auth-specific result type alias
pub type AuthResult<T> = Result<T, AuthError>;

/// Auth-specific error variants
#[derive(Debug, Error)]
pub enum AuthError {
    /// Malformed or missing input, with the offending field
    #[error("{message}")]
    Validation {
        field: &'static str,
        message: String,
    },

    /// Unknown email or wrong password (deliberately indistinguishable)
    #[error("E-Mail oder Passwort ist falsch")]
    InvalidCredentials,

    /// Email is already registered
    #[error("Diese E-Mail-Adresse ist bereits registriert")]
    EmailTaken,

    /// Tenant slug collision that survived disambiguation (concurrent registration)
    #[error("Diese Firma ist bereits registriert")]
    SlugTaken,

    /// Session not found or expired
    #[error("Session not found or expired")]
    SessionInvalid,

    /// Backing store failure
    #[error("Database error: {0}")]
    Store(#[from] sqlx::Error),

    /// Internal error
    #[error("Internal error: {0}")]
    Internal(String),
}

impl AuthError {
    /// Shorthand for a field-level validation error
    pub fn validation(field: &'static str, message: impl Into<String>) -> Self {
        AuthError::Validation {
            field,
            message: message.into(),
        }
    }

    /// Get the HTTP status code for this error
    pub fn status_code(&self) -> StatusCode {
        match self {
            AuthError::Validation { .. } => StatusCode::BAD_REQUEST,
            AuthError::InvalidCredentials | AuthError::SessionInvalid => StatusCode::UNAUTHORIZED,
            AuthError::EmailTaken | AuthError::SlugTaken => StatusCode::CONFLICT,
            AuthError::Store(_) | AuthError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Get the ErrorKind for this error
    pub fn kind(&self) -> ErrorKind {
        match self {
            AuthError::Validation { .. } => ErrorKind::BadRequest,
            AuthError::InvalidCredentials | AuthError::SessionInvalid => ErrorKind::Unauthorized,
            AuthError::EmailTaken | AuthError::SlugTaken => ErrorKind::Conflict,
            AuthError::Store(_) | AuthError::Internal(_) => ErrorKind::InternalServerError,
        }
    }

    /// Convert to AppError with a client-safe message
    ///
    /// Store and internal errors are replaced with a generic message;
    /// their details stay in the logs.
    pub fn to_app_error(&self) -> AppError {
        match self {
            AuthError::Store(_) | AuthError::Internal(_) => {
                AppError::new(self.kind(), "Ein Fehler ist aufgetreten")
            }
            _ => AppError::new(self.kind(), self.to_string()),
        }
    }

    /// Log the error with appropriate level
    fn log(&self) {
        match self {
            AuthError::Store(e) => {
                tracing::error!(error = %e, "Auth store error");
            }
            AuthError::Internal(msg) => {
                tracing::error!(message = %msg, "Auth internal error");
            }
            AuthError::InvalidCredentials => {
                tracing::warn!("Invalid login attempt");
            }
            _ => {
                tracing::debug!(error = %self, "Auth error");
            }
        }
    }
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        self.log();
        self.to_app_error().into_response()
    }
}

impl From<AppError> for AuthError {
    fn from(err: AppError) -> Self {
        AuthError::Internal(err.to_string())
    }
}

impl From<platform::password::PasswordHashError> for AuthError {
    fn from(err: platform::password::PasswordHashError) -> Self {
        // Hashing must fail loudly, never degrade to storing plaintext
        AuthError::Internal(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_codes() {
        assert_eq!(
            AuthError::validation("email", "bad").status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            AuthError::InvalidCredentials.status_code(),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(AuthError::EmailTaken.status_code(), StatusCode::CONFLICT);
        assert_eq!(
            AuthError::Internal("x".into()).status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_internal_details_not_leaked() {
        let err = AuthError::Internal("pool exhausted at 10.0.0.3".into());
        let app = err.to_app_error();
        assert_eq!(app.message(), "Ein Fehler ist aufgetreten");
    }

    #[test]
    fn test_credential_error_is_generic() {
        // Same message regardless of which credential was wrong
        assert_eq!(
            AuthError::InvalidCredentials.to_string(),
            "E-Mail oder Passwort ist falsch"
        );
    }
}
