// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Firestore client wrapper with typed operations.
//!
//! Provides high-level operations for:
//! - Users (profile storage, merge writes)
//! - Favorites (per-user saved restaurants and events)
//! - OTP codes (shared verification store)
//! - Reservation emails (confirmation log)

use crate::db::collections;
use crate::error::AppError;
use crate::models::user::fields;
use crate::models::{FavoriteItem, FavoriteRecord, ItemKind, OtpRecord, ReservationEmail, UserProfile};

// Firestore limits batch/transaction writes to 500 operations.
// We use a safe limit of 400 to allow headroom.
const BATCH_SIZE: usize = 400;

/// Firestore database client.
#[derive(Clone)]
pub struct FirestoreDb {
    client: Option<firestore::FirestoreDb>,
}

impl FirestoreDb {
    /// Create a new Firestore client.
    ///
    /// For local development with emulator, set FIRESTORE_EMULATOR_HOST.
    pub async fn new(project_id: &str) -> Result<Self, AppError> {
        // If the emulator environment variable is set, use unauthenticated connection
        // to avoid local credential warnings and leakage.
        if std::env::var("FIRESTORE_EMULATOR_HOST").is_ok() {
            return Self::create_emulator_client(project_id).await;
        }

        let client = firestore::FirestoreDb::new(project_id)
            .await
            .map_err(|e| AppError::Database(format!("Failed to connect to Firestore: {}", e)))?;

        tracing::info!(project = project_id, "Connected to Firestore");

        Ok(Self {
            client: Some(client),
        })
    }

    /// Create a Firestore client for the emulator with unauthenticated access.
    async fn create_emulator_client(project_id: &str) -> Result<Self, AppError> {
        tracing::info!("Using unauthenticated connection for Firestore Emulator");

        let token_source = gcloud_sdk::ExternalJwtFunctionSource::new(|| async {
            Ok(gcloud_sdk::Token {
                token_type: "Bearer".to_string(),
                token: gcloud_sdk::SecretValue::new(
                    "eyJhbGciOiJub25lIn0.eyJ1aWQiOiJ0ZXN0In0."
                        .to_string()
                        .into(),
                ),
                expiry: chrono::Utc::now() + chrono::Duration::hours(1),
            })
        });

        let options = firestore::FirestoreDbOptions::new(project_id.to_string());

        let client = firestore::FirestoreDb::with_options_token_source(
            options,
            gcloud_sdk::GCP_DEFAULT_SCOPES.clone(),
            gcloud_sdk::TokenSourceType::ExternalSource(Box::new(token_source)),
        )
        .await
        .map_err(|e| {
            AppError::Database(format!("Failed to connect to Firestore Emulator: {}", e))
        })?;

        tracing::info!(
            project = project_id,
            "Connected to Firestore (Emulator/Unauthenticated)"
        );

        Ok(Self {
            client: Some(client),
        })
    }

    /// Create a mock Firestore client for testing (offline mode).
    ///
    /// All database operations will return an error if called.
    pub fn new_mock() -> Self {
        Self { client: None }
    }

    /// Helper to get the client or return an error if offline.
    fn get_client(&self) -> Result<&firestore::FirestoreDb, AppError> {
        self.client
            .as_ref()
            .ok_or_else(|| AppError::Database("Database not connected (offline mode)".to_string()))
    }

    // ─── User Operations ─────────────────────────────────────────

    /// Get a user profile by uid.
    pub async fn get_user(&self, uid: &str) -> Result<Option<UserProfile>, AppError> {
        self.get_client()?
            .fluent()
            .select()
            .by_id_in(collections::USERS)
            .obj()
            .one(uid)
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Write only `field_paths` of `profile`, leaving every other stored
    /// field untouched (merge semantics). Creates the document if needed.
    pub async fn write_user_fields(
        &self,
        profile: &UserProfile,
        field_paths: &[&str],
    ) -> Result<(), AppError> {
        let _: () = self
            .get_client()?
            .fluent()
            .update()
            .fields(field_paths.iter().copied())
            .in_col(collections::USERS)
            .document_id(&profile.uid)
            .object(profile)
            .execute()
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;
        Ok(())
    }

    /// Delete a user profile document.
    pub async fn delete_user(&self, uid: &str) -> Result<(), AppError> {
        self.get_client()?
            .fluent()
            .delete()
            .from(collections::USERS)
            .document_id(uid)
            .execute()
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;
        Ok(())
    }

    /// Bump `loginCount` and set `lastLogin` in one write.
    ///
    /// The count uses a server-side increment transform, so concurrent
    /// logins are never lost. Returns `false` if the user has no profile
    /// document.
    pub async fn record_login(&self, uid: &str, now: &str) -> Result<bool, AppError> {
        let Some(mut profile) = self.get_user(uid).await? else {
            return Ok(false);
        };
        profile.last_login = now.to_string();

        let result: Result<(), firestore::errors::FirestoreError> = self
            .get_client()?
            .fluent()
            .update()
            .fields([fields::LAST_LOGIN])
            .in_col(collections::USERS)
            .precondition(firestore::FirestoreWritePrecondition::Exists(true))
            .transforms(|t| t.fields([t.field(fields::LOGIN_COUNT).increment(1)]))
            .document_id(uid)
            .object(&profile)
            .execute()
            .await;

        match result {
            Ok(()) => Ok(true),
            // Deleted between the read and the write.
            Err(firestore::errors::FirestoreError::DataNotFoundError(_)) => Ok(false),
            Err(e) => Err(AppError::Database(e.to_string())),
        }
    }

    // ─── Favorite Operations ─────────────────────────────────────

    /// List a user's favorites, unordered.
    pub async fn list_favorites(&self, uid: &str) -> Result<Vec<FavoriteRecord>, AppError> {
        self.get_client()?
            .fluent()
            .select()
            .from(collections::FAVORITES)
            .filter(|q| q.for_all([q.field("userId").eq(uid)]))
            .obj()
            .query()
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Get a single favorite.
    pub async fn get_favorite(
        &self,
        uid: &str,
        kind: ItemKind,
        item_id: &str,
    ) -> Result<Option<FavoriteRecord>, AppError> {
        self.get_client()?
            .fluent()
            .select()
            .by_id_in(collections::FAVORITES)
            .obj()
            .one(&FavoriteRecord::document_id(uid, kind, item_id))
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Store a favorite.
    pub async fn set_favorite(&self, record: &FavoriteRecord) -> Result<(), AppError> {
        let item: &FavoriteItem = &record.item;
        let _: () = self
            .get_client()?
            .fluent()
            .update()
            .in_col(collections::FAVORITES)
            .document_id(FavoriteRecord::document_id(
                &record.user_id,
                item.kind,
                &item.id,
            ))
            .object(record)
            .execute()
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;
        Ok(())
    }

    /// Remove a favorite.
    pub async fn delete_favorite(
        &self,
        uid: &str,
        kind: ItemKind,
        item_id: &str,
    ) -> Result<(), AppError> {
        self.get_client()?
            .fluent()
            .delete()
            .from(collections::FAVORITES)
            .document_id(FavoriteRecord::document_id(uid, kind, item_id))
            .execute()
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;
        Ok(())
    }

    // ─── OTP Operations ──────────────────────────────────────────

    /// Get the pending OTP for an email address.
    pub async fn get_otp(&self, email: &str) -> Result<Option<OtpRecord>, AppError> {
        self.get_client()?
            .fluent()
            .select()
            .by_id_in(collections::OTP_CODES)
            .obj()
            .one(&otp_document_id(email))
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Store (or replace) the pending OTP for an email address.
    pub async fn set_otp(&self, record: &OtpRecord) -> Result<(), AppError> {
        let _: () = self
            .get_client()?
            .fluent()
            .update()
            .in_col(collections::OTP_CODES)
            .document_id(otp_document_id(&record.email))
            .object(record)
            .execute()
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;
        Ok(())
    }

    /// Delete the pending OTP only if it is still there.
    ///
    /// Returns `false` when another request already removed it, so exactly
    /// one caller wins a concurrent consume.
    pub async fn consume_otp(&self, email: &str) -> Result<bool, AppError> {
        let result = self
            .get_client()?
            .fluent()
            .delete()
            .from(collections::OTP_CODES)
            .document_id(otp_document_id(email))
            .precondition(firestore::FirestoreWritePrecondition::Exists(true))
            .execute()
            .await;

        match result {
            Ok(()) => Ok(true),
            Err(firestore::errors::FirestoreError::DataNotFoundError(_)) => Ok(false),
            Err(e) => Err(AppError::Database(e.to_string())),
        }
    }

    /// Delete the pending OTP for an email address.
    pub async fn delete_otp(&self, email: &str) -> Result<(), AppError> {
        self.get_client()?
            .fluent()
            .delete()
            .from(collections::OTP_CODES)
            .document_id(otp_document_id(email))
            .execute()
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;
        Ok(())
    }

    // ─── Reservation Email Operations ────────────────────────────

    /// Log a sent confirmation email.
    pub async fn add_reservation_email(&self, record: &ReservationEmail) -> Result<(), AppError> {
        let _: () = self
            .get_client()?
            .fluent()
            .update()
            .in_col(collections::RESERVATION_EMAILS)
            .document_id(&record.reservation_id)
            .object(record)
            .execute()
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;
        Ok(())
    }

    // ─── Helper Methods ────────────────────────────────────────────

    /// Helper to batch delete documents using transactions.
    async fn batch_delete(&self, doc_ids: &[String], collection: &str) -> Result<(), AppError> {
        let client = self.get_client()?;

        for chunk in doc_ids.chunks(BATCH_SIZE) {
            let mut transaction = client
                .begin_transaction()
                .await
                .map_err(|e| AppError::Database(format!("Failed to begin transaction: {}", e)))?;

            for doc_id in chunk {
                client
                    .fluent()
                    .delete()
                    .from(collection)
                    .document_id(doc_id)
                    .add_to_transaction(&mut transaction)
                    .map_err(|e| {
                        AppError::Database(format!(
                            "Failed to add deletion to transaction for {}: {}",
                            collection, e
                        ))
                    })?;
            }

            transaction.commit().await.map_err(|e| {
                AppError::Database(format!("Failed to commit batch deletion: {}", e))
            })?;
        }

        Ok(())
    }

    /// Delete every document in `collection` whose `userId` equals `uid`.
    ///
    /// Returns the number of documents deleted.
    pub async fn delete_where_user(&self, collection: &str, uid: &str) -> Result<usize, AppError> {
        let docs: Vec<firestore::FirestoreDocument> = self
            .get_client()?
            .fluent()
            .select()
            .from(collection)
            .filter(|q| q.for_all([q.field("userId").eq(uid)]))
            .query()
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        let doc_ids: Vec<String> = docs
            .iter()
            .filter_map(|doc| doc.name.rsplit('/').next().map(str::to_string))
            .collect();

        self.batch_delete(&doc_ids, collection).await?;

        tracing::debug!(collection, uid, count = doc_ids.len(), "Deleted user documents");
        Ok(doc_ids.len())
    }
}

fn otp_document_id(email: &str) -> String {
    urlencoding::encode(&email.trim().to_lowercase()).into_owned()
}
