// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Platform trigger authentication middleware.

use crate::config::TRIGGER_TOKEN_HEADER;
use crate::AppState;
use axum::{
    extract::{Request, State},
    http::StatusCode,
    middleware::Next,
    response::Response,
};
use std::sync::Arc;
use subtle::ConstantTimeEq;

/// Require the shared trigger token for `/triggers/*` routes.
pub async fn require_trigger_auth(
    State(state): State<Arc<AppState>>,
    request: Request,
    next: Next,
) -> Result<Response, StatusCode> {
    let presented = request
        .headers()
        .get(TRIGGER_TOKEN_HEADER)
        .map(|h| h.as_bytes())
        .unwrap_or_default();
    let expected = state.config.trigger_token.as_bytes();

    let is_valid = !expected.is_empty() && bool::from(presented.ct_eq(expected));
    if !is_valid {
        tracing::warn!(
            path = %request.uri().path(),
            has_header = !presented.is_empty(),
            "Blocked trigger request with invalid token"
        );
        return Err(StatusCode::FORBIDDEN);
    }

    Ok(next.run(request).await)
}
