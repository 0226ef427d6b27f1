use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;
use tracing::{error, warn};

use service::auth::AuthError;

/// Malformed request body or field shape.
pub const CODE_VALIDATION: &str = "001";
/// Token valid but the account it names no longer exists.
pub const CODE_ACCOUNT_NOT_FOUND: &str = "005";
/// Missing, malformed, tampered or expired token.
pub const CODE_INVALID_TOKEN: &str = "009";

pub const MSG_INVALID_CREDENTIALS: &str = "check your id or password";

#[derive(Debug, Serialize, PartialEq, Eq)]
#[serde(untagged)]
pub enum ErrorBody {
    Code { error: String },
    Message { msg: String },
    Field { msg: String, field: String },
}

/// Transport rendering of an [`AuthError`].
#[derive(Debug)]
pub struct ApiError(pub AuthError);

impl From<AuthError> for ApiError {
    fn from(e: AuthError) -> Self {
        Self(e)
    }
}

impl ApiError {
    pub fn status_and_body(&self) -> (StatusCode, ErrorBody) {
        match &self.0 {
            AuthError::Validation(_) => (StatusCode::BAD_REQUEST, ErrorBody::Code { error: CODE_VALIDATION.into() }),
            AuthError::InvalidCredentials(_) => {
                (StatusCode::BAD_REQUEST, ErrorBody::Message { msg: MSG_INVALID_CREDENTIALS.into() })
            }
            AuthError::Duplicate(field) | AuthError::Conflict(field) => (
                StatusCode::BAD_REQUEST,
                ErrorBody::Field { msg: format!("{field} already exists"), field: field.as_str().into() },
            ),
            AuthError::Unauthorized => (StatusCode::BAD_REQUEST, ErrorBody::Code { error: CODE_INVALID_TOKEN.into() }),
            AuthError::AccountNotFound => {
                (StatusCode::BAD_REQUEST, ErrorBody::Code { error: CODE_ACCOUNT_NOT_FOUND.into() })
            }
            AuthError::HashError(_) | AuthError::TokenError(_) | AuthError::Repository(_) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                ErrorBody::Code { error: "internal server error".into() },
            ),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, body) = self.status_and_body();
        if self.0.is_internal() {
            error!(code = self.0.code(), error = %self.0, "request failed");
        } else {
            warn!(code = self.0.code(), error = %self.0, "request rejected");
        }
        (status, Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use service::auth::errors::{CredentialFailure, UniqueField};

    #[test]
    fn both_credential_failures_render_identically() {
        let a = ApiError(AuthError::InvalidCredentials(CredentialFailure::UnknownId)).status_and_body();
        let b = ApiError(AuthError::InvalidCredentials(CredentialFailure::PasswordMismatch)).status_and_body();
        assert_eq!(a, b);
    }

    #[test]
    fn conflict_renders_like_duplicate() {
        let dup = ApiError(AuthError::Duplicate(UniqueField::Phone)).status_and_body();
        let conflict = ApiError(AuthError::Conflict(UniqueField::Phone)).status_and_body();
        assert_eq!(dup, conflict);
        assert_eq!(
            serde_json::to_value(&dup.1).unwrap(),
            serde_json::json!({"msg": "phone already exists", "field": "phone"})
        );
    }

    #[test]
    fn internal_errors_hide_details() {
        let (status, body) = ApiError(AuthError::Repository("password=hunter2".into())).status_and_body();
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert!(!serde_json::to_string(&body).unwrap().contains("hunter2"));
    }

    #[test]
    fn token_codes() {
        let (_, body) = ApiError(AuthError::Unauthorized).status_and_body();
        assert_eq!(body, ErrorBody::Code { error: CODE_INVALID_TOKEN.into() });
        let (_, body) = ApiError(AuthError::AccountNotFound).status_and_body();
        assert_eq!(body, ErrorBody::Code { error: CODE_ACCOUNT_NOT_FOUND.into() });
    }
}
