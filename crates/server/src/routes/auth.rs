use std::sync::Arc;

use axum::{
    extract::{rejection::JsonRejection, State},
    http::{header, HeaderMap, StatusCode},
    Json,
};
use serde::Serialize;
use tracing::debug;

use service::auth::{
    domain::{LoginInput, RegisterInput, UserProfile},
    repository::AccountRepository,
    AuthError, AuthService,
};

use crate::errors::ApiError;

/// Header carrying the session token on user info requests.
pub const TOKEN_HEADER: &str = "token";

#[derive(Clone)]
pub struct ServerState {
    pub auth: Arc<AuthService<dyn AccountRepository>>,
}

#[derive(Serialize)]
pub struct LoginOutput {
    pub token: String,
}

fn body<T>(payload: Result<Json<T>, JsonRejection>) -> Result<T, ApiError> {
    payload.map(|Json(v)| v).map_err(|rejection| {
        debug!(error = %rejection.body_text(), "request body rejected");
        ApiError(AuthError::Validation(rejection.body_text()))
    })
}

/// Token from the `token` header, or from `Authorization: Bearer <token>`.
fn token_from_headers(headers: &HeaderMap) -> Option<&str> {
    if let Some(v) = headers.get(TOKEN_HEADER).and_then(|v| v.to_str().ok()) {
        return Some(v.trim());
    }
    headers
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
        .map(str::trim)
}

#[utoipa::path(post, path = "/auth/login", tag = "auth", request_body = crate::openapi::LoginRequest, responses((status = 200, description = "Logged in", body = crate::openapi::LoginResponse), (status = 400, description = "Bad shape or invalid credentials")))]
pub async fn login(
    State(state): State<ServerState>,
    payload: Result<Json<LoginInput>, JsonRejection>,
) -> Result<Json<LoginOutput>, ApiError> {
    let input = body(payload)?;
    let session = state.auth.login(input).await?;
    Ok(Json(LoginOutput { token: session.token }))
}

#[utoipa::path(post, path = "/auth/register", tag = "auth", request_body = crate::openapi::RegisterRequest, responses((status = 200, description = "Registered"), (status = 400, description = "Bad shape or duplicate id, email or phone")))]
pub async fn register(
    State(state): State<ServerState>,
    payload: Result<Json<RegisterInput>, JsonRejection>,
) -> Result<StatusCode, ApiError> {
    let input = body(payload)?;
    let registered = state.auth.register(input).await?;
    debug!(user_code = registered.user_code, id = %registered.id, "register responded");
    Ok(StatusCode::OK)
}

#[utoipa::path(get, path = "/auth/userinfo", tag = "auth", params(("token" = String, Header, description = "Session token from login")), responses((status = 200, description = "Profile", body = crate::openapi::ProfileResponse), (status = 400, description = "Invalid token or account not found")))]
pub async fn user_info(
    State(state): State<ServerState>,
    headers: HeaderMap,
) -> Result<Json<UserProfile>, ApiError> {
    let token = token_from_headers(&headers).ok_or(ApiError(AuthError::Unauthorized))?;
    let profile = state.auth.user_info(token).await?;
    Ok(Json(profile))
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    #[test]
    fn token_header_wins_over_authorization() {
        let mut headers = HeaderMap::new();
        headers.insert(TOKEN_HEADER, HeaderValue::from_static("abc"));
        headers.insert(header::AUTHORIZATION, HeaderValue::from_static("Bearer xyz"));
        assert_eq!(token_from_headers(&headers), Some("abc"));
    }

    #[test]
    fn bearer_fallback() {
        let mut headers = HeaderMap::new();
        headers.insert(header::AUTHORIZATION, HeaderValue::from_static("Bearer xyz"));
        assert_eq!(token_from_headers(&headers), Some("xyz"));
        headers.insert(header::AUTHORIZATION, HeaderValue::from_static("Basic xyz"));
        assert_eq!(token_from_headers(&headers), None);
        assert_eq!(token_from_headers(&HeaderMap::new()), None);
    }
}
