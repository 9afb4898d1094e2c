//! Mapping from the auth error taxonomy to HTTP responses.
//!
//! Internal detail (`AuthError::Server`) is logged server-side and surfaced
//! as a generic message; everything else carries its user-safe text.

use axum::http::StatusCode;
use axum::response::IntoResponse;
use serde_json::json;

use cabinet_auth::AuthError;

pub fn auth_error_to_response(err: &AuthError) -> axum::response::Response {
    match err {
        AuthError::InvalidCredentials => {
            json_error(StatusCode::UNAUTHORIZED, "invalid_credentials", err.to_string())
        }
        AuthError::MissingToken => {
            json_error(StatusCode::UNAUTHORIZED, "missing_token", err.to_string())
        }
        AuthError::InvalidToken => {
            json_error(StatusCode::UNAUTHORIZED, "invalid_token", err.to_string())
        }
        AuthError::TokenExpired => {
            json_error(StatusCode::UNAUTHORIZED, "token_expired", err.to_string())
        }
        AuthError::UserNotFound => {
            json_error(StatusCode::NOT_FOUND, "user_not_found", err.to_string())
        }
        AuthError::EmailTaken => json_error(StatusCode::CONFLICT, "email_taken", err.to_string()),
        AuthError::Validation(msg) => {
            json_error(StatusCode::BAD_REQUEST, "validation_error", msg.clone())
        }
        AuthError::Network(detail) => {
            tracing::warn!(detail = %detail, "upstream network failure");
            json_error(StatusCode::BAD_GATEWAY, "network_error", "upstream network failure")
        }
        AuthError::Server(detail) => {
            tracing::error!(detail = %detail, "internal error");
            json_error(StatusCode::INTERNAL_SERVER_ERROR, "server_error", "internal error")
        }
    }
}

pub fn json_error(
    status: StatusCode,
    code: &'static str,
    message: impl Into<String>,
) -> axum::response::Response {
    (
        status,
        axum::Json(json!({
            "error": code,
            "message": message.into(),
        })),
    )
        .into_response()
}
