// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Favorite restaurants and events, persisted per user.

use crate::db::FirestoreDb;
use crate::error::AppError;
use crate::models::{FavoriteItem, FavoriteRecord, Favorites, ItemKind};
use crate::services::catalog;
use crate::time_utils::now_rfc3339;

/// Snapshot a catalog item for storage.
pub fn catalog_item(kind: ItemKind, id: &str) -> Option<FavoriteItem> {
    match kind {
        ItemKind::Restaurant => catalog::restaurant(id).map(FavoriteItem::from),
        ItemKind::Event => catalog::event(id).map(FavoriteItem::from),
    }
}

pub async fn list_favorites(db: &FirestoreDb, uid: &str) -> Result<Favorites, AppError> {
    Ok(Favorites::from_records(db.list_favorites(uid).await?))
}

/// Add or remove a favorite. Returns whether the item is now a favorite.
pub async fn toggle_favorite(
    db: &FirestoreDb,
    uid: &str,
    kind: ItemKind,
    id: &str,
) -> Result<bool, AppError> {
    let item = catalog_item(kind, id)
        .ok_or_else(|| AppError::NotFound(format!("Unknown {} {}", kind.as_str(), id)))?;

    if db.get_favorite(uid, kind, id).await?.is_some() {
        db.delete_favorite(uid, kind, id).await?;
        tracing::info!(uid, kind = kind.as_str(), id, "Favorite removed");
        return Ok(false);
    }

    let record = FavoriteRecord {
        user_id: uid.to_string(),
        item,
        added_at: now_rfc3339(),
    };
    db.set_favorite(&record).await?;
    tracing::info!(uid, kind = kind.as_str(), id, "Favorite added");
    Ok(true)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_catalog_item_kinds() {
        let r = catalog_item(ItemKind::Restaurant, "5").unwrap();
        assert_eq!(r.name, "Sushi Master");
        assert_eq!(r.kind, ItemKind::Restaurant);

        let e = catalog_item(ItemKind::Event, "1").unwrap();
        assert_eq!(e.name, "Wine Tasting Evening");
        assert_eq!(e.price, Some(75));

        assert!(catalog_item(ItemKind::Event, "5").is_none());
    }

    #[tokio::test]
    async fn test_toggle_unknown_item_is_not_found() {
        let db = FirestoreDb::new_mock();
        let err = toggle_favorite(&db, "u1", ItemKind::Restaurant, "42")
            .await
            .unwrap_err();
        assert_eq!(err.code(), "not-found");
    }
}
