// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! User profile storage.
//!
//! Profiles are upserted on every sign-in. Writes only touch the fields
//! they own so that data written by other paths (roles, login counters,
//! preferences) survives.

use crate::db::{collections, FirestoreDb};
use crate::error::AppError;
use crate::models::user::fields;
use crate::models::{Language, Location, ProfileInput, UserProfile};
use crate::time_utils::now_rfc3339;
use futures_util::future::try_join_all;

/// Fields written by `store_user_data`, besides `location`.
const UPSERT_FIELDS: [&str; 7] = [
    fields::UID,
    fields::EMAIL,
    fields::DISPLAY_NAME,
    fields::NAME,
    fields::PHOTO_URL,
    fields::CREATED_AT,
    fields::LAST_LOGIN,
];

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

/// Combine a sign-in payload with the stored profile.
///
/// Location precedence: explicit `location`, then `input.location`, then
/// the stored one. Incomplete locations are ignored.
pub fn merge_profile(
    existing: Option<&UserProfile>,
    input: &ProfileInput,
    location: Option<&Location>,
    now: &str,
) -> UserProfile {
    let email = input.email.clone().unwrap_or_default();
    let display_name = match non_blank(input.display_name.as_deref()) {
        Some(name) => name.to_string(),
        None => email.split('@').next().unwrap_or_default().to_string(),
    };

    let created_at = match existing {
        Some(profile) if !profile.created_at.is_empty() => profile.created_at.clone(),
        _ => non_blank(input.created_at.as_deref())
            .map(str::to_string)
            .unwrap_or_else(|| now.to_string()),
    };

    let location = location
        .filter(|l| l.is_complete())
        .or(input.location.as_ref().filter(|l| l.is_complete()))
        .or(existing.and_then(|p| p.location.as_ref()))
        .cloned();

    let carried = existing.cloned().unwrap_or_default();

    UserProfile {
        uid: input.uid.clone(),
        email,
        name: display_name.clone(),
        display_name,
        photo_url: non_blank(input.photo_url.as_deref()).map(str::to_string),
        location,
        created_at,
        last_login: now.to_string(),
        is_admin: carried.is_admin,
        role: carried.role,
        login_count: carried.login_count,
        language: carried.language,
        updated_at: carried.updated_at,
    }
}

/// Upsert the caller's profile. Idempotent per uid apart from `lastLogin`.
pub async fn store_user_data(
    db: &FirestoreDb,
    input: &ProfileInput,
    location: Option<&Location>,
) -> Result<UserProfile, AppError> {
    if input.uid.trim().is_empty() {
        return Err(AppError::InvalidArgument("User ID is required".to_string()));
    }

    let existing = db.get_user(&input.uid).await?;
    let profile = merge_profile(existing.as_ref(), input, location, &now_rfc3339());

    let mut mask: Vec<&str> = UPSERT_FIELDS.to_vec();
    if profile.location.is_some() {
        mask.push(fields::LOCATION);
    }
    db.write_user_fields(&profile, &mask).await?;

    tracing::info!(
        uid = %profile.uid,
        created = existing.is_none(),
        has_location = profile.location.is_some(),
        "Stored user data"
    );
    Ok(profile)
}

pub async fn fetch_user_data(db: &FirestoreDb, uid: &str) -> Result<UserProfile, AppError> {
    db.get_user(uid)
        .await?
        .ok_or_else(|| AppError::NotFound("User data not found".to_string()))
}

/// Apply `f` to an existing profile and write `field` plus `updatedAt`.
async fn update_field<F>(
    db: &FirestoreDb,
    uid: &str,
    field: &'static str,
    f: F,
) -> Result<UserProfile, AppError>
where
    F: FnOnce(&mut UserProfile),
{
    let mut profile = fetch_user_data(db, uid).await?;
    f(&mut profile);
    profile.updated_at = Some(now_rfc3339());
    db.write_user_fields(&profile, &[field, fields::UPDATED_AT])
        .await?;

    tracing::info!(uid, field, "Updated user profile");
    Ok(profile)
}

pub async fn update_location(
    db: &FirestoreDb,
    uid: &str,
    location: Location,
) -> Result<UserProfile, AppError> {
    if !location.is_complete() {
        return Err(AppError::InvalidArgument(
            "City, state and country are required".to_string(),
        ));
    }
    update_field(db, uid, fields::LOCATION, |p| p.location = Some(location)).await
}

/// Set or clear the avatar URL.
pub async fn update_avatar(
    db: &FirestoreDb,
    uid: &str,
    photo_url: Option<String>,
) -> Result<UserProfile, AppError> {
    let photo_url = non_blank(photo_url.as_deref()).map(str::to_string);
    update_field(db, uid, fields::PHOTO_URL, |p| p.photo_url = photo_url).await
}

pub async fn update_language(
    db: &FirestoreDb,
    uid: &str,
    language: Language,
) -> Result<UserProfile, AppError> {
    update_field(db, uid, fields::LANGUAGE, |p| p.language = Some(language)).await
}

/// Assign `role` to `target_uid`. Only admins may call this.
pub async fn set_user_role(
    db: &FirestoreDb,
    caller_uid: &str,
    target_uid: &str,
    role: &str,
) -> Result<(), AppError> {
    let is_admin = db
        .get_user(caller_uid)
        .await?
        .is_some_and(|p| p.is_admin);
    if !is_admin {
        tracing::warn!(caller_uid, target_uid, "Non-admin attempted to set a role");
        return Err(AppError::PermissionDenied("Must be an admin".to_string()));
    }

    let (target_uid, role) = (target_uid.trim(), role.trim());
    if target_uid.is_empty() || role.is_empty() {
        return Err(AppError::InvalidArgument("Missing uid or role".to_string()));
    }

    let role = role.to_string();
    update_field(db, target_uid, fields::ROLE, |p| p.role = Some(role)).await?;

    tracing::info!(caller_uid, target_uid, "User role set");
    Ok(())
}

/// Count a sign-in. Unknown users are logged and ignored.
pub async fn record_login(db: &FirestoreDb, uid: &str) -> Result<(), AppError> {
    if db.record_login(uid, &now_rfc3339()).await? {
        tracing::debug!(uid, "Recorded login");
    } else {
        tracing::warn!(uid, "Login event for unknown user");
    }
    Ok(())
}

/// Delete a user's profile and everything they own.
///
/// Returns the number of owned documents removed, not counting the profile.
pub async fn cleanup_user_data(db: &FirestoreDb, uid: &str) -> Result<usize, AppError> {
    db.delete_user(uid).await?;

    let counts = try_join_all(
        [
            collections::FAVORITES,
            collections::REVIEWS,
            collections::RESERVATION_EMAILS,
        ]
        .into_iter()
        .map(|collection| db.delete_where_user(collection, uid)),
    )
    .await?;
    let deleted: usize = counts.into_iter().sum();

    tracing::info!(uid, deleted, "User data cleaned up");
    Ok(deleted)
}
