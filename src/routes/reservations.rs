// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Reservation draft routes.

use crate::error::Result;
use crate::middleware::auth::AuthUser;
use crate::models::{GuestDetails, ReservationDraft, SlotSelection};
use crate::services::ReservationConfirmation;
use crate::AppState;
use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::{get, post, put},
    Extension, Json, Router,
};
use serde::Deserialize;
use std::sync::Arc;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/api/reservations/drafts", post(start_draft))
        .route("/api/reservations/drafts/{id}", get(get_draft))
        .route("/api/reservations/drafts/{id}/guest", put(set_guest))
        .route("/api/reservations/drafts/{id}/table", put(select_table))
        .route("/api/reservations/drafts/{id}/confirm", post(confirm))
}

async fn start_draft(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    Json(selection): Json<SlotSelection>,
) -> Result<(StatusCode, Json<ReservationDraft>)> {
    let draft = state.reservations.start(&user.uid, selection).await?;
    Ok((StatusCode::CREATED, Json(draft)))
}

async fn get_draft(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    Path(id): Path<String>,
) -> Result<Json<ReservationDraft>> {
    Ok(Json(state.reservations.get(&user.uid, &id)?))
}

async fn set_guest(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    Path(id): Path<String>,
    Json(guest): Json<GuestDetails>,
) -> Result<Json<ReservationDraft>> {
    Ok(Json(state.reservations.set_guest_details(&user.uid, &id, guest)?))
}

#[derive(Debug, Deserialize)]
struct TableRequest {
    #[serde(default)]
    table: String,
}

async fn select_table(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    Path(id): Path<String>,
    Json(req): Json<TableRequest>,
) -> Result<Json<ReservationDraft>> {
    Ok(Json(state.reservations.select_table(&user.uid, &id, &req.table)?))
}

async fn confirm(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    Path(id): Path<String>,
) -> Result<Json<ReservationConfirmation>> {
    Ok(Json(state.reservations.confirm(&user.uid, &id).await?))
}
