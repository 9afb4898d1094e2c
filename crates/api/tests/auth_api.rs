use std::sync::Arc;

use chrono::{Duration as ChronoDuration, Utc};
use jsonwebtoken::{Algorithm, EncodingKey, Header};
use reqwest::StatusCode;
use serde_json::json;

use cabinet_auth::{CredentialVerifier, SessionManager, TokenClaims};
use cabinet_core::{UserId, UserRecord};
use cabinet_infra::{Argon2Verifier, InMemoryUserStore, JwtCodec};

const JWT_SECRET: &str = "test-secret";

struct TestServer {
    base_url: String,
    handle: tokio::task::JoinHandle<()>,
}

impl TestServer {
    /// Same router as prod, in-memory user store, ephemeral port.
    async fn spawn() -> Self {
        let store = Arc::new(InMemoryUserStore::new());
        seed_users(&store);

        let manager = SessionManager::new(
            store,
            Arc::new(Argon2Verifier),
            Arc::new(JwtCodec::new(JWT_SECRET)),
        );
        let app = cabinet_api::app::build_app(Arc::new(manager));

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("failed to bind ephemeral port");
        let addr = listener.local_addr().unwrap();
        let base_url = format!("http://{}", addr);

        let handle = tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        Self { base_url, handle }
    }
}

impl Drop for TestServer {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

fn seed_users(store: &InMemoryUserStore) {
    let verifier = Argon2Verifier;

    let mut avocat = UserRecord::new("maitre@cabinet.fr", "Maître Durand", "Avocat").unwrap();
    avocat.password_hash = Some(verifier.hash("plaidoirie-2024").unwrap());
    store.seed(avocat);

    let mut gerant = UserRecord::new("gerant@cabinet.fr", "Le Gérant", "Avocat").unwrap();
    gerant.function = Some("Gérant".to_string());
    gerant.password_hash = Some(verifier.hash("direction-2024").unwrap());
    store.seed(gerant);

    // Admin-provisioned account still waiting for its password.
    let mut pending = UserRecord::new("pending@cabinet.fr", "Nouvelle Recrue", "Secretaire").unwrap();
    pending.created_by = Some(UserId::new());
    store.seed(pending);
}

fn mint_jwt(user_id: UserId, issued_at: chrono::DateTime<Utc>, ttl: ChronoDuration) -> String {
    let claims = TokenClaims::new(user_id, issued_at, ttl);
    jsonwebtoken::encode(
        &Header::new(Algorithm::HS256),
        &claims,
        &EncodingKey::from_secret(JWT_SECRET.as_bytes()),
    )
    .expect("failed to encode jwt")
}

async fn login(client: &reqwest::Client, base_url: &str, email: &str, password: &str) -> reqwest::Response {
    client
        .post(format!("{}/auth/login", base_url))
        .json(&json!({ "email": email, "password": password }))
        .send()
        .await
        .unwrap()
}

#[tokio::test]
async fn login_then_validate_round_trips_the_user() {
    let srv = TestServer::spawn().await;
    let client = reqwest::Client::new();

    let res = login(&client, &srv.base_url, "maitre@cabinet.fr", "plaidoirie-2024").await;
    assert_eq!(res.status(), StatusCode::OK);
    let body: serde_json::Value = res.json().await.unwrap();

    let token = body["token"].as_str().unwrap().to_string();
    assert_eq!(body["user"]["email"], "maitre@cabinet.fr");
    assert!(body["user"].get("password_hash").is_none());

    let res = client
        .get(format!("{}/auth/validate", srv.base_url))
        .bearer_auth(&token)
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let validated: serde_json::Value = res.json().await.unwrap();
    assert_eq!(validated["user"]["id"], body["user"]["id"]);
    assert_eq!(validated["user"]["role"], "Avocat");
}

#[tokio::test]
async fn bad_credentials_are_indistinguishable() {
    let srv = TestServer::spawn().await;
    let client = reqwest::Client::new();

    let wrong_password = login(&client, &srv.base_url, "maitre@cabinet.fr", "nope").await;
    assert_eq!(wrong_password.status(), StatusCode::UNAUTHORIZED);
    let wrong_password: serde_json::Value = wrong_password.json().await.unwrap();

    let unknown_email = login(&client, &srv.base_url, "ghost@cabinet.fr", "nope").await;
    assert_eq!(unknown_email.status(), StatusCode::UNAUTHORIZED);
    let unknown_email: serde_json::Value = unknown_email.json().await.unwrap();

    assert_eq!(wrong_password, unknown_email);
    assert_eq!(wrong_password["error"], "invalid_credentials");
}

#[tokio::test]
async fn token_failures_map_to_the_taxonomy() {
    let srv = TestServer::spawn().await;
    let client = reqwest::Client::new();

    // No token at all.
    let res = client
        .get(format!("{}/auth/validate", srv.base_url))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
    let body: serde_json::Value = res.json().await.unwrap();
    assert_eq!(body["error"], "missing_token");

    // Garbage token.
    let res = client
        .get(format!("{}/auth/validate", srv.base_url))
        .bearer_auth("not-a-token")
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
    let body: serde_json::Value = res.json().await.unwrap();
    assert_eq!(body["error"], "invalid_token");

    // Expired token, properly signed.
    let expired = mint_jwt(UserId::new(), Utc::now() - ChronoDuration::hours(25), ChronoDuration::hours(24));
    let res = client
        .get(format!("{}/auth/validate", srv.base_url))
        .bearer_auth(&expired)
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
    let body: serde_json::Value = res.json().await.unwrap();
    assert_eq!(body["error"], "token_expired");

    // Valid token for a user that does not exist.
    let orphan = mint_jwt(UserId::new(), Utc::now(), ChronoDuration::hours(1));
    let res = client
        .get(format!("{}/auth/validate", srv.base_url))
        .bearer_auth(&orphan)
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::NOT_FOUND);
    let body: serde_json::Value = res.json().await.unwrap();
    assert_eq!(body["error"], "user_not_found");
}

#[tokio::test]
async fn logout_always_answers_200() {
    let srv = TestServer::spawn().await;
    let client = reqwest::Client::new();

    // Without a token.
    let res = client
        .post(format!("{}/auth/logout", srv.base_url))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);

    // With a garbage token.
    let res = client
        .post(format!("{}/auth/logout", srv.base_url))
        .bearer_auth("whatever")
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
}

#[tokio::test]
async fn lawyer_permissions_scenario() {
    let srv = TestServer::spawn().await;
    let client = reqwest::Client::new();

    let res = login(&client, &srv.base_url, "maitre@cabinet.fr", "plaidoirie-2024").await;
    let body: serde_json::Value = res.json().await.unwrap();
    let token = body["token"].as_str().unwrap().to_string();

    let res = client
        .get(format!("{}/auth/permissions", srv.base_url))
        .bearer_auth(&token)
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let body: serde_json::Value = res.json().await.unwrap();

    assert_eq!(body["access_level"], "lawyer");
    assert_eq!(body["is_admin"], false);
    let perms = &body["permissions"];
    assert_eq!(perms["clients"]["visible"], true);
    assert_eq!(perms["clients"]["actions"]["create"], true);
    assert_eq!(perms["clients"]["actions"]["delete"], false);
    assert_eq!(perms["team"]["visible"], false);
}

#[tokio::test]
async fn managing_partner_gets_team_management() {
    let srv = TestServer::spawn().await;
    let client = reqwest::Client::new();

    let res = login(&client, &srv.base_url, "gerant@cabinet.fr", "direction-2024").await;
    let body: serde_json::Value = res.json().await.unwrap();
    let token = body["token"].as_str().unwrap().to_string();

    let res = client
        .get(format!("{}/auth/permissions", srv.base_url))
        .bearer_auth(&token)
        .send()
        .await
        .unwrap();
    let body: serde_json::Value = res.json().await.unwrap();

    assert_eq!(body["access_level"], "manager");
    assert_eq!(body["is_admin"], true);
    assert_eq!(body["permissions"]["team"]["visible"], true);
    assert_eq!(body["permissions"]["team"]["actions"]["edit"], true);
}

#[tokio::test]
async fn signup_flow_and_duplicate_rejection() {
    let srv = TestServer::spawn().await;
    let client = reqwest::Client::new();

    let res = client
        .post(format!("{}/auth/signup", srv.base_url))
        .json(&json!({
            "email": "New.Associate@Cabinet.FR",
            "password": "longenough",
            "name": "New Associate"
        }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::CREATED);
    let body: serde_json::Value = res.json().await.unwrap();
    assert_eq!(body["user"]["email"], "new.associate@cabinet.fr");
    assert!(body["token"].as_str().is_some());

    // Same email again.
    let res = client
        .post(format!("{}/auth/signup", srv.base_url))
        .json(&json!({
            "email": "new.associate@cabinet.fr",
            "password": "longenough",
            "name": "Impostor"
        }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::CONFLICT);

    // Password policy.
    let res = client
        .post(format!("{}/auth/signup", srv.base_url))
        .json(&json!({ "email": "c@cabinet.fr", "password": "short", "name": "C" }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn check_user_reports_onboarding_state() {
    let srv = TestServer::spawn().await;
    let client = reqwest::Client::new();

    let res = client
        .post(format!("{}/auth/check-user", srv.base_url))
        .json(&json!({ "email": "maitre@cabinet.fr" }))
        .send()
        .await
        .unwrap();
    let body: serde_json::Value = res.json().await.unwrap();
    assert_eq!(body["exists"], true);
    assert_eq!(body["has_password"], true);
    assert!(body["user_id"].is_null());

    // Provisioned account without a password: the set-password flow gets the id.
    let res = client
        .post(format!("{}/auth/check-user", srv.base_url))
        .json(&json!({ "email": "pending@cabinet.fr" }))
        .send()
        .await
        .unwrap();
    let body: serde_json::Value = res.json().await.unwrap();
    assert_eq!(body["exists"], true);
    assert_eq!(body["has_password"], false);
    assert!(body["user_id"].as_str().is_some());

    let res = client
        .post(format!("{}/auth/check-user", srv.base_url))
        .json(&json!({ "email": "ghost@cabinet.fr" }))
        .send()
        .await
        .unwrap();
    let body: serde_json::Value = res.json().await.unwrap();
    assert_eq!(body["exists"], false);
}
