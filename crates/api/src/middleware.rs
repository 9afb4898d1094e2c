//! Bearer-token middleware.
//!
//! Extracts the token, validates it through the configured provider and
//! inserts [`CurrentUser`] for downstream handlers. Failures map to the full
//! taxonomy (401 for token problems, 404 for a vanished user), not a blanket
//! 401.

use axum::{body::Body, extract::State, http::HeaderMap, middleware::Next, response::Response};

use cabinet_auth::AuthError;

use crate::app::AppState;
use crate::context::CurrentUser;
use crate::errors::auth_error_to_response;

pub async fn auth_middleware(
    State(state): State<AppState>,
    mut req: axum::http::Request<Body>,
    next: Next,
) -> Response {
    let token = match extract_bearer(req.headers()) {
        Ok(token) => token.to_string(),
        Err(err) => return auth_error_to_response(&err),
    };

    match state.provider.validate(&token).await {
        Ok(user) => {
            req.extensions_mut().insert(CurrentUser(user));
            next.run(req).await
        }
        Err(err) => auth_error_to_response(&err),
    }
}

/// Pull the token out of `Authorization: Bearer <token>`.
pub fn extract_bearer(headers: &HeaderMap) -> Result<&str, AuthError> {
    let header = headers
        .get(axum::http::header::AUTHORIZATION)
        .ok_or(AuthError::MissingToken)?;

    let header = header.to_str().map_err(|_| AuthError::InvalidToken)?;

    let token = header
        .strip_prefix("Bearer ")
        .ok_or(AuthError::InvalidToken)?
        .trim();

    if token.is_empty() {
        return Err(AuthError::MissingToken);
    }

    Ok(token)
}
