//! User profile model for storage and API.

use crate::models::{Language, Location};
use serde::{Deserialize, Serialize};

/// User profile stored in Firestore at `users/{uid}`.
///
/// Field names match the documents the web client already writes.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    /// Auth provider user ID (also used as document ID)
    pub uid: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub display_name: String,
    /// Mirror of `display_name`
    #[serde(default)]
    pub name: String,
    #[serde(rename = "photoURL", default)]
    pub photo_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<Location>,
    /// When the profile was first written (RFC 3339)
    #[serde(default)]
    pub created_at: String,
    /// Last sign-in (RFC 3339)
    #[serde(default)]
    pub last_login: String,
    #[serde(default)]
    pub is_admin: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
    #[serde(default)]
    pub login_count: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub language: Option<Language>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<String>,
}

/// Stored field names, for field-mask (merge) writes.
pub mod fields {
    pub const UID: &str = "uid";
    pub const EMAIL: &str = "email";
    pub const DISPLAY_NAME: &str = "displayName";
    pub const NAME: &str = "name";
    pub const PHOTO_URL: &str = "photoURL";
    pub const LOCATION: &str = "location";
    pub const CREATED_AT: &str = "createdAt";
    pub const LAST_LOGIN: &str = "lastLogin";
    pub const ROLE: &str = "role";
    pub const LOGIN_COUNT: &str = "loginCount";
    pub const LANGUAGE: &str = "language";
    pub const UPDATED_AT: &str = "updatedAt";
}

/// What a client supplies when signing in or refreshing its profile.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileInput {
    #[serde(default)]
    pub uid: String,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub display_name: Option<String>,
    #[serde(rename = "photoURL", default)]
    pub photo_url: Option<String>,
    #[serde(default)]
    pub created_at: Option<String>,
    #[serde(default)]
    pub location: Option<Location>,
}
