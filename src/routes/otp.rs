// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Email one-time password endpoints.
//!
//! Unauthenticated: these run before the user has a session.

use crate::error::Result;
use crate::services::otp::{SendOtpResponse, VerifyOtpResponse};
use crate::AppState;
use axum::{extract::State, routing::post, Json, Router};
use serde::Deserialize;
use std::sync::Arc;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/otp/send", post(send_otp))
        .route("/send-otp", post(send_otp))
        .route("/otp/verify", post(verify_otp))
        .route("/verify-otp", post(verify_otp))
}

#[derive(Debug, Default, Deserialize)]
pub struct OtpRequest {
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub otp: Option<String>,
}

async fn send_otp(
    State(state): State<Arc<AppState>>,
    Json(req): Json<OtpRequest>,
) -> Result<Json<SendOtpResponse>> {
    let response = state
        .otp_service
        .send_otp(req.email.as_deref(), req.otp.as_deref())
        .await?;
    Ok(Json(response))
}

async fn verify_otp(
    State(state): State<Arc<AppState>>,
    Json(req): Json<OtpRequest>,
) -> Result<Json<VerifyOtpResponse>> {
    let response = state
        .otp_service
        .verify_otp(req.email.as_deref(), req.otp.as_deref())
        .await?;
    Ok(Json(response))
}
