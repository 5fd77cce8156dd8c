// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

use axum::body::Body;
use axum::http::{header, Request, Response};
use dineingo::config::Config;
use dineingo::db::FirestoreDb;
use dineingo::middleware::auth::create_jwt;
use dineingo::routes::create_router;
use dineingo::services::{
    FirebaseTokenVerifier, LogMailer, Mailer, MemoryOtpStore, OtpService, OtpStore,
    ReservationService,
};
use dineingo::AppState;
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header};
use std::sync::Arc;

/// `kid` of the fixture ID token signing key.
#[allow(dead_code)]
pub const TEST_ID_TOKEN_KID: &str = "test-kid";

/// Check if emulator is available via environment variable.
#[allow(dead_code)]
pub fn emulator_available() -> bool {
    std::env::var("FIRESTORE_EMULATOR_HOST").is_ok()
}

/// Skip test with message if emulator not available.
#[macro_export]
macro_rules! require_emulator {
    () => {
        if !crate::common::emulator_available() {
            eprintln!("⚠️  Skipping: FIRESTORE_EMULATOR_HOST not set");
            return;
        }
    };
}

/// Create a test database connection.
#[allow(dead_code)]
pub async fn test_db() -> FirestoreDb {
    FirestoreDb::new("test-project")
        .await
        .expect("Failed to connect to Firestore emulator")
}

/// Offline app plus handles for inspecting side effects.
#[allow(dead_code)]
pub struct TestApp {
    pub router: axum::Router,
    pub state: Arc<AppState>,
    pub outbox: LogMailer,
    pub otp_store: MemoryOtpStore,
}

/// Create a test app with offline mock dependencies.
#[allow(dead_code)]
pub fn create_test_app() -> TestApp {
    create_test_app_with(FirestoreDb::new_mock())
}

/// Create a test app on top of the given database.
#[allow(dead_code)]
pub fn create_test_app_with(db: FirestoreDb) -> TestApp {
    let config = Config::test_default();
    let outbox = LogMailer::default();
    let mailer = Mailer::Log(outbox.clone());
    let otp_store = MemoryOtpStore::new();

    let otp_service = OtpService::new(
        OtpStore::Memory(otp_store.clone()),
        mailer.clone(),
        config.otp_ttl_secs,
    );
    let reservations = ReservationService::new(db.clone(), mailer.clone(), config.draft_ttl_secs);
    let id_tokens = FirebaseTokenVerifier::new_with_static_key(
        &config,
        TEST_ID_TOKEN_KID,
        DecodingKey::from_rsa_pem(include_bytes!("../fixtures/id_token_signing_key.pub.pem"))
            .unwrap(),
    )
    .unwrap();

    let state = Arc::new(AppState {
        config,
        db,
        id_tokens,
        mailer,
        otp_service,
        reservations,
    });

    TestApp {
        router: create_router(state.clone()),
        state,
        outbox,
        otp_store,
    }
}

/// Session token for `uid` signed with the test key.
#[allow(dead_code)]
pub fn create_test_jwt(uid: &str) -> String {
    create_jwt(uid, &Config::test_default().jwt_signing_key).unwrap()
}

/// Firebase-style ID token for `uid`, signed with the fixture RSA key.
///
/// `overrides` replaces or adds claims on top of valid defaults.
#[allow(dead_code)]
pub fn create_test_id_token(uid: &str, kid: &str, overrides: serde_json::Value) -> String {
    let now = chrono::Utc::now().timestamp();
    let project = Config::test_default().gcp_project_id;
    let mut claims = serde_json::json!({
        "iss": format!("https://securetoken.google.com/{project}"),
        "aud": project,
        "sub": uid,
        "iat": now,
        "auth_time": now,
        "exp": now + 3600,
        "email": format!("{uid}@example.com"),
    });
    if let (Some(claims), Some(overrides)) = (claims.as_object_mut(), overrides.as_object()) {
        for (k, v) in overrides {
            claims.insert(k.clone(), v.clone());
        }
    }

    let mut header = Header::new(Algorithm::RS256);
    header.kid = Some(kid.to_string());
    let key = EncodingKey::from_rsa_pem(include_bytes!("../fixtures/id_token_signing_key.pem"))
        .unwrap();
    jsonwebtoken::encode(&header, &claims, &key).unwrap()
}

/// JSON request, optionally authenticated as `uid`.
#[allow(dead_code)]
pub fn json_request(method: &str, uri: &str, uid: Option<&str>, body: serde_json::Value) -> Request<Body> {
    let mut builder = Request::builder()
        .method(method)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json");
    if let Some(uid) = uid {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", create_test_jwt(uid)));
    }
    builder.body(Body::from(body.to_string())).unwrap()
}

/// Body-less request, optionally authenticated as `uid`.
#[allow(dead_code)]
pub fn get_request(uri: &str, uid: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder().uri(uri);
    if let Some(uid) = uid {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", create_test_jwt(uid)));
    }
    builder.body(Body::empty()).unwrap()
}

/// Read a response body as JSON.
#[allow(dead_code)]
pub async fn body_json(response: Response<Body>) -> serde_json::Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&bytes).unwrap()
}
