// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Session routes: exchange a Firebase ID token for a server session.

use crate::error::{AppError, Result};
use crate::middleware::auth::{create_jwt, SESSION_COOKIE, SESSION_LIFETIME_SECS};
use crate::services::firebase_auth::IdTokenError;
use crate::AppState;
use axum::{
    extract::{Json, State},
    routing::post,
    Router,
};
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
#[cfg(feature = "binding-generation")]
use ts_rs::TS;

/// Session routes (public).
pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/auth/session", post(create_session))
        .route("/auth/logout", post(logout))
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SessionRequest {
    #[serde(default)]
    id_token: String,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct SessionResponse {
    pub uid: String,
    /// Same value as the cookie, for clients that send `Authorization: Bearer`.
    pub token: String,
    pub expires_in: u64,
}

fn session_cookie(value: String, max_age_secs: i64) -> Cookie<'static> {
    Cookie::build((SESSION_COOKIE, value))
        .path("/")
        .http_only(true)
        .secure(true)
        .same_site(SameSite::None)
        .max_age(time::Duration::seconds(max_age_secs))
        .build()
}

/// Verify the caller's Firebase ID token and start a session.
async fn create_session(
    State(state): State<Arc<AppState>>,
    jar: CookieJar,
    Json(req): Json<SessionRequest>,
) -> Result<(CookieJar, Json<SessionResponse>)> {
    if req.id_token.trim().is_empty() {
        return Err(AppError::InvalidArgument("ID token is required".to_string()));
    }

    let verified = state.id_tokens.verify(&req.id_token).await.map_err(|e| match e {
        IdTokenError::Invalid(reason) => {
            tracing::warn!(reason = %reason, "Rejected ID token");
            AppError::InvalidToken
        }
        IdTokenError::Transient(reason) => {
            AppError::Internal(anyhow::anyhow!("ID token verification unavailable: {reason}"))
        }
    })?;

    let token = create_jwt(&verified.uid, &state.config.jwt_signing_key)
        .map_err(|e| AppError::Internal(anyhow::anyhow!("JWT creation failed: {}", e)))?;

    tracing::info!(uid = %verified.uid, "Session created");

    let jar = jar.add(session_cookie(token.clone(), SESSION_LIFETIME_SECS as i64));
    Ok((
        jar,
        Json(SessionResponse {
            uid: verified.uid,
            token,
            expires_in: SESSION_LIFETIME_SECS as u64,
        }),
    ))
}

#[derive(Serialize)]
pub struct LogoutResponse {
    pub success: bool,
}

/// Expire the session cookie.
async fn logout(jar: CookieJar) -> (CookieJar, Json<LogoutResponse>) {
    let jar = jar.add(session_cookie(String::new(), 0));
    (jar, Json(LogoutResponse { success: true }))
}
