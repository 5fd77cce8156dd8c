// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Platform event handlers.
//!
//! These endpoints are called by the auth, Firestore and analytics event
//! sources, not by users, and are guarded by the shared trigger token.
//! The platform does not retry, so failures are logged and reported in the
//! body with a 200 status.

use crate::error::AppError;
use crate::services::mail::{templates, OutgoingEmail};
use crate::services::profile;
use crate::AppState;
use axum::{
    extract::{Json, State},
    routing::post,
    Router,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Trigger routes (called by platform event sources).
pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/triggers/firestore/user-created", post(firestore_user_created))
        .route("/triggers/auth/user-created", post(auth_user_created))
        .route("/triggers/auth/user-deleted", post(auth_user_deleted))
        .route("/triggers/analytics/login", post(analytics_login))
}

#[derive(Debug, Serialize, PartialEq, Eq)]
pub struct TriggerResponse {
    pub success: bool,
}

impl TriggerResponse {
    fn from_result<T>(result: Result<T, AppError>, what: &str) -> Json<Self> {
        match result {
            Ok(_) => Json(Self { success: true }),
            Err(e) => {
                tracing::error!(error = %e, trigger = what, "Trigger handler failed");
                Json(Self { success: false })
            }
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct FirestoreUserCreated {
    user_id: String,
    #[serde(default)]
    data: serde_json::Value,
}

/// A `users/{userId}` document was created.
async fn firestore_user_created(Json(event): Json<FirestoreUserCreated>) -> Json<TriggerResponse> {
    let email = event.data.get("email").and_then(|v| v.as_str());
    tracing::info!(user_id = %event.user_id, email, "New user document created");
    Json(TriggerResponse { success: true })
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct AuthUserEvent {
    uid: String,
    #[serde(default)]
    email: Option<String>,
    #[serde(default)]
    display_name: Option<String>,
}

/// An auth account was created: send the welcome email.
async fn auth_user_created(
    State(state): State<Arc<AppState>>,
    Json(event): Json<AuthUserEvent>,
) -> Json<TriggerResponse> {
    tracing::info!(uid = %event.uid, "New user account created");

    let Some(email) = event.email.as_deref().map(str::trim).filter(|e| !e.is_empty()) else {
        tracing::warn!(uid = %event.uid, "New user has no email; skipping welcome email");
        return Json(TriggerResponse { success: true });
    };

    let content = match templates::welcome_email(event.display_name.as_deref()) {
        Ok(content) => content,
        Err(e) => return TriggerResponse::from_result(Err::<(), _>(e), "auth/user-created"),
    };
    let result = state.mailer.send(&OutgoingEmail::new(email, content)).await;
    if result.is_ok() {
        tracing::info!(uid = %event.uid, "Welcome email sent");
    }
    TriggerResponse::from_result(result, "auth/user-created")
}

#[derive(Debug, Deserialize)]
struct AuthUserDeleted {
    uid: String,
}

/// An auth account was deleted: remove everything the user owned.
async fn auth_user_deleted(
    State(state): State<Arc<AppState>>,
    Json(event): Json<AuthUserDeleted>,
) -> Json<TriggerResponse> {
    let result = profile::cleanup_user_data(&state.db, &event.uid).await;
    TriggerResponse::from_result(result, "auth/user-deleted")
}

#[derive(Debug, Deserialize)]
struct AnalyticsLogin {
    #[serde(default)]
    user_id: Option<String>,
}

/// Analytics `login` event.
async fn analytics_login(
    State(state): State<Arc<AppState>>,
    Json(event): Json<AnalyticsLogin>,
) -> Json<TriggerResponse> {
    let Some(uid) = event.user_id.as_deref().filter(|u| !u.is_empty()) else {
        tracing::debug!("Login event without user id");
        return Json(TriggerResponse { success: true });
    };

    let result = profile::record_login(&state.db, uid).await;
    TriggerResponse::from_result(result, "analytics/login")
}
