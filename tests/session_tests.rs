// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Session exchange tests: Firebase ID token in, session cookie out.

use axum::{
    body::Body,
    http::{header, Request, Response, StatusCode},
};
use dineingo::middleware::auth::SESSION_COOKIE;
use serde_json::json;
use tower::ServiceExt;

mod common;
use common::{body_json, create_test_app, create_test_id_token, json_request, TEST_ID_TOKEN_KID};

fn session_request(id_token: &str) -> Request<Body> {
    json_request("POST", "/auth/session", None, json!({ "idToken": id_token }))
}

fn set_cookie(response: &Response<Body>) -> String {
    response
        .headers()
        .get(header::SET_COOKIE)
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default()
        .to_string()
}

#[tokio::test]
async fn test_id_token_exchange_issues_usable_session() {
    let app = create_test_app();
    let id_token = create_test_id_token("firebase-uid-9", TEST_ID_TOKEN_KID, json!({}));

    let response = app
        .router
        .clone()
        .oneshot(session_request(&id_token))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let cookie = set_cookie(&response);
    assert!(cookie.starts_with(&format!("{SESSION_COOKIE}=")));
    assert!(cookie.contains("HttpOnly"));
    assert!(cookie.contains("Secure"));

    let body = body_json(response).await;
    assert_eq!(body["uid"], "firebase-uid-9");
    let session = body["token"].as_str().unwrap().to_string();
    assert!(cookie.contains(&session));

    // The issued cookie opens protected routes
    let response = app
        .router
        .oneshot(
            Request::builder()
                .uri("/api/bookings")
                .header(header::COOKIE, format!("{SESSION_COOKIE}={session}"))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_id_token_rejections() {
    let app = create_test_app();
    let now = chrono::Utc::now().timestamp();

    let cases = [
        ("wrong audience", create_test_id_token("u1", TEST_ID_TOKEN_KID, json!({ "aud": "other-project" }))),
        (
            "wrong issuer",
            create_test_id_token(
                "u1",
                TEST_ID_TOKEN_KID,
                json!({ "iss": "https://securetoken.google.com/other-project" }),
            ),
        ),
        ("unknown kid", create_test_id_token("u1", "rotated-kid", json!({}))),
        (
            "expired",
            create_test_id_token("u1", TEST_ID_TOKEN_KID, json!({ "exp": now - 3600, "iat": now - 7200 })),
        ),
        ("future auth_time", create_test_id_token("u1", TEST_ID_TOKEN_KID, json!({ "auth_time": now + 3600 }))),
        ("empty subject", create_test_id_token("", TEST_ID_TOKEN_KID, json!({}))),
        ("not a jwt", "not.a.jwt".to_string()),
    ];

    for (what, token) in cases {
        let response = app
            .router
            .clone()
            .oneshot(session_request(&token))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED, "{what}");
        assert!(set_cookie(&response).is_empty(), "{what}");
    }
}

#[tokio::test]
async fn test_hs256_session_token_is_not_an_id_token() {
    let app = create_test_app();
    let session = common::create_test_jwt("u1");

    let response = app.router.oneshot(session_request(&session)).await.unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_missing_id_token_is_invalid_argument() {
    let app = create_test_app();

    let response = app
        .router
        .oneshot(json_request("POST", "/auth/session", None, json!({})))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(response).await["error"], "invalid-argument");
}

#[tokio::test]
async fn test_logout_expires_cookie() {
    let app = create_test_app();

    let response = app
        .router
        .oneshot(json_request("POST", "/auth/logout", None, json!({})))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let cookie = set_cookie(&response);
    assert!(cookie.starts_with(&format!("{SESSION_COOKIE}=;")));
    assert!(cookie.contains("Max-Age=0"));
    assert_eq!(body_json(response).await["success"], true);
}
