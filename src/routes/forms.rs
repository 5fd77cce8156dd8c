// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Form validation endpoints.
//!
//! The client submits its sign-up, sign-in and OTP forms here before
//! calling the auth provider, so every surface shows the same messages.

use crate::error::{AppError, Result};
use crate::services::forms::{
    self, AuthAction, AuthErrorMessage, LoginForm, PasswordStrength, SignupForm,
};
use crate::AppState;
use axum::{
    extract::{Path, Query},
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/forms/signup/validate", post(validate_signup))
        .route("/forms/login/validate", post(validate_login))
        .route("/forms/otp/validate", post(validate_otp))
        .route("/forms/password-strength", post(password_strength))
        .route("/forms/auth-errors/{code}", get(auth_error))
}

#[derive(Serialize)]
pub struct ValidResponse {
    pub valid: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub strength: Option<PasswordStrength>,
}

async fn validate_signup(Json(form): Json<SignupForm>) -> Result<Json<ValidResponse>> {
    forms::validate_signup(&form).map_err(AppError::Validation)?;
    Ok(Json(ValidResponse {
        valid: true,
        strength: Some(forms::password_strength(&form.password)),
    }))
}

async fn validate_login(Json(form): Json<LoginForm>) -> Result<Json<ValidResponse>> {
    forms::validate_login(&form).map_err(AppError::Validation)?;
    Ok(Json(ValidResponse {
        valid: true,
        strength: None,
    }))
}

#[derive(Deserialize)]
struct OtpForm {
    #[serde(default)]
    otp: String,
}

async fn validate_otp(Json(form): Json<OtpForm>) -> Result<Json<ValidResponse>> {
    if !forms::is_valid_otp_format(form.otp.trim()) {
        return Err(AppError::field("otp", "Please enter a valid 6-digit code"));
    }
    Ok(Json(ValidResponse {
        valid: true,
        strength: None,
    }))
}

#[derive(Deserialize)]
struct PasswordRequest {
    #[serde(default)]
    password: String,
}

async fn password_strength(Json(req): Json<PasswordRequest>) -> Json<PasswordStrength> {
    Json(forms::password_strength(&req.password))
}

#[derive(Deserialize)]
struct AuthErrorQuery {
    #[serde(default)]
    action: AuthAction,
}

/// Error codes contain a `/`, so clients send them percent-encoded.
async fn auth_error(
    Path(code): Path<String>,
    Query(query): Query<AuthErrorQuery>,
) -> Json<AuthErrorMessage> {
    Json(forms::auth_error_message(&code, query.action))
}
