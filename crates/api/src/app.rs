//! Router and handlers for the auth surface.

use std::sync::Arc;

use axum::{
    Json, Router,
    extract::{Extension, State},
    http::{HeaderMap, StatusCode},
    response::IntoResponse,
    routing::{get, post},
};
use serde::{Deserialize, Serialize};
use tower::ServiceBuilder;

use cabinet_auth::{
    AuthProvider, Session, SessionUser, is_admin, permissions_for_level, resolve_access_level,
};

use crate::context::CurrentUser;
use crate::errors::auth_error_to_response;
use crate::middleware::{auth_middleware, extract_bearer};

#[derive(Clone)]
pub struct AppState {
    pub provider: Arc<dyn AuthProvider>,
}

/// Build the router. The provider is the only dependency; tests wire an
/// in-memory one, `main` wires whatever the configuration selected.
pub fn build_app(provider: Arc<dyn AuthProvider>) -> Router {
    let state = AppState { provider };

    let protected = Router::new()
        .route("/auth/validate", get(validate))
        .route("/auth/permissions", get(permissions))
        .layer(
            ServiceBuilder::new()
                .layer(axum::middleware::from_fn_with_state(state.clone(), auth_middleware)),
        );

    Router::new()
        .route("/auth/login", post(login))
        .route("/auth/signup", post(sign_up))
        .route("/auth/check-user", post(check_user))
        .route("/auth/logout", post(logout))
        .merge(protected)
        .with_state(state)
}

// ─────────────────────────────────────────────────────────────────────────────
// Request/response DTOs
// ─────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
struct LoginRequest {
    email: String,
    password: String,
}

#[derive(Debug, Deserialize)]
struct SignUpRequest {
    email: String,
    password: String,
    name: String,
}

#[derive(Debug, Deserialize)]
struct CheckUserRequest {
    email: String,
}

#[derive(Debug, Serialize)]
struct SessionResponse {
    user: SessionUser,
    token: String,
    expires_at: chrono::DateTime<chrono::Utc>,
}

impl From<Session> for SessionResponse {
    fn from(session: Session) -> Self {
        Self {
            user: session.user,
            token: session.token,
            expires_at: session.expires_at,
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Handlers
// ─────────────────────────────────────────────────────────────────────────────

/// POST /auth/login
async fn login(
    State(state): State<AppState>,
    Json(req): Json<LoginRequest>,
) -> axum::response::Response {
    match state.provider.login(&req.email, &req.password).await {
        Ok(session) => (StatusCode::OK, Json(SessionResponse::from(session))).into_response(),
        Err(err) => auth_error_to_response(&err),
    }
}

/// POST /auth/signup — self-registration.
async fn sign_up(
    State(state): State<AppState>,
    Json(req): Json<SignUpRequest>,
) -> axum::response::Response {
    match state.provider.sign_up(&req.email, &req.password, &req.name).await {
        Ok(session) => (StatusCode::CREATED, Json(SessionResponse::from(session))).into_response(),
        Err(err) => auth_error_to_response(&err),
    }
}

/// POST /auth/check-user — onboarding branch point.
///
/// Unauthenticated by design; account existence is partially observable
/// here, which is why the first serve is logged.
async fn check_user(
    State(state): State<AppState>,
    Json(req): Json<CheckUserRequest>,
) -> axum::response::Response {
    static EXPOSURE_NOTICE: std::sync::Once = std::sync::Once::new();
    EXPOSURE_NOTICE.call_once(|| {
        tracing::warn!("check-user is served unauthenticated; consider rate limiting upstream");
    });

    match state.provider.check_user_exists(&req.email).await {
        Ok(report) => (StatusCode::OK, Json(report)).into_response(),
        Err(err) => auth_error_to_response(&err),
    }
}

/// POST /auth/logout — always 200.
///
/// Server-side invalidation is best-effort; the client clears its local
/// session no matter what, so a failure here must not become an error.
async fn logout(State(state): State<AppState>, headers: HeaderMap) -> axum::response::Response {
    if let Ok(token) = extract_bearer(&headers) {
        if let Err(err) = state.provider.logout(token).await {
            tracing::warn!(error = %err, "server-side logout failed");
        }
    }

    (StatusCode::OK, Json(serde_json::json!({ "status": "logged_out" }))).into_response()
}

/// GET /auth/validate — echo the authenticated user.
async fn validate(Extension(current): Extension<CurrentUser>) -> axum::response::Response {
    (StatusCode::OK, Json(serde_json::json!({ "user": current.user() }))).into_response()
}

/// GET /auth/permissions — fresh matrix for the caller.
///
/// Derived per request so a role change takes effect immediately; UI guards
/// are expected to re-fetch rather than cache.
async fn permissions(Extension(current): Extension<CurrentUser>) -> axum::response::Response {
    let user = current.user();
    let level = resolve_access_level(Some(user));
    let matrix = permissions_for_level(level);

    (
        StatusCode::OK,
        Json(serde_json::json!({
            "access_level": level,
            "is_admin": is_admin(Some(user)),
            "permissions": matrix,
        })),
    )
        .into_response()
}
