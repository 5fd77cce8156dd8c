// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! API routes for authenticated users.

use crate::error::{AppError, Result};
use crate::middleware::auth::AuthUser;
use crate::models::{
    Booking, DashboardSection, FavoriteItem, ItemKind, Language, Location, ProfileInput,
    UserProfile,
};
use crate::services::{catalog, dashboard, favorites, profile, DashboardView};
use crate::AppState;
use axum::{
    extract::{Path, State},
    routing::{delete, get, post, put},
    Extension, Json, Router,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
#[cfg(feature = "binding-generation")]
use ts_rs::TS;

/// API routes (require authentication via JWT).
/// The auth middleware is applied in routes/mod.rs for these routes.
pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/api/me", get(get_me).post(store_me))
        .route("/api/me/location", put(update_location))
        .route("/api/me/avatar", put(update_avatar))
        .route("/api/me/language", put(update_language))
        .route("/api/account", delete(delete_account))
        .route("/api/favorites", get(list_favorites))
        .route("/api/favorites/toggle", post(toggle_favorite))
        .route("/api/bookings", get(list_bookings))
        .route("/api/dashboard/{section}", get(get_dashboard))
        .route("/api/admin/user-role", post(set_user_role))
}

// ─── User Profile ────────────────────────────────────────────

async fn get_me(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
) -> Result<Json<UserProfile>> {
    Ok(Json(profile::fetch_user_data(&state.db, &user.uid).await?))
}

/// Sign-in upsert body.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StoreUserRequest {
    #[serde(default)]
    pub user_data: ProfileInput,
    #[serde(default)]
    pub location: Option<Location>,
}

/// Store the caller's profile.
///
/// The session's uid wins over any `uid` in the body.
async fn store_me(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    Json(req): Json<StoreUserRequest>,
) -> Result<Json<UserProfile>> {
    let mut input = req.user_data;
    if !input.uid.is_empty() && input.uid != user.uid {
        tracing::warn!(uid = %user.uid, body_uid = %input.uid, "Ignoring mismatched uid in profile body");
    }
    input.uid = user.uid;

    let stored = profile::store_user_data(&state.db, &input, req.location.as_ref()).await?;
    Ok(Json(stored))
}

async fn update_location(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    Json(location): Json<Location>,
) -> Result<Json<UserProfile>> {
    Ok(Json(
        profile::update_location(&state.db, &user.uid, location).await?,
    ))
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct AvatarRequest {
    #[serde(rename = "photoURL", default)]
    photo_url: Option<String>,
}

async fn update_avatar(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    Json(req): Json<AvatarRequest>,
) -> Result<Json<UserProfile>> {
    Ok(Json(
        profile::update_avatar(&state.db, &user.uid, req.photo_url).await?,
    ))
}

#[derive(Debug, Deserialize)]
struct LanguageRequest {
    language: Language,
}

async fn update_language(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    Json(req): Json<LanguageRequest>,
) -> Result<Json<UserProfile>> {
    Ok(Json(
        profile::update_language(&state.db, &user.uid, req.language).await?,
    ))
}

// ─── Account Deletion ────────────────────────────────────────

/// Response for account deletion.
#[derive(Serialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct DeleteAccountResponse {
    pub success: bool,
    pub deleted: usize,
}

/// Delete the caller's profile and everything they own.
async fn delete_account(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
) -> Result<Json<DeleteAccountResponse>> {
    tracing::info!(uid = %user.uid, "User-initiated account deletion");

    let deleted = profile::cleanup_user_data(&state.db, &user.uid).await?;

    Ok(Json(DeleteAccountResponse {
        success: true,
        deleted,
    }))
}

// ─── Favorites ───────────────────────────────────────────────

async fn list_favorites(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
) -> Result<Json<Vec<FavoriteItem>>> {
    let favorites = favorites::list_favorites(&state.db, &user.uid).await?;
    Ok(Json(favorites.into_items()))
}

#[derive(Debug, Deserialize)]
struct ToggleFavoriteRequest {
    #[serde(rename = "type")]
    kind: ItemKind,
    id: String,
}

#[derive(Serialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct ToggleFavoriteResponse {
    pub favorited: bool,
}

async fn toggle_favorite(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    Json(req): Json<ToggleFavoriteRequest>,
) -> Result<Json<ToggleFavoriteResponse>> {
    let favorited = favorites::toggle_favorite(&state.db, &user.uid, req.kind, &req.id).await?;
    Ok(Json(ToggleFavoriteResponse { favorited }))
}

// ─── Dashboard ───────────────────────────────────────────────

async fn list_bookings(Extension(_user): Extension<AuthUser>) -> Json<&'static [Booking]> {
    Json(catalog::bookings())
}

async fn get_dashboard(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    Path(section): Path<String>,
) -> Result<Json<DashboardView>> {
    let section: DashboardSection = section.parse().map_err(AppError::InvalidArgument)?;
    Ok(Json(dashboard::view(&state.db, &user.uid, section).await?))
}

// ─── Admin ───────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
struct UserRoleRequest {
    #[serde(default)]
    uid: String,
    #[serde(default)]
    role: String,
}

#[derive(Serialize)]
pub struct SuccessResponse {
    pub success: bool,
}

async fn set_user_role(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    Json(req): Json<UserRoleRequest>,
) -> Result<Json<SuccessResponse>> {
    profile::set_user_role(&state.db, &user.uid, &req.uid, &req.role).await?;
    Ok(Json(SuccessResponse { success: true }))
}
