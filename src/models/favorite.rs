// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@kernel.org>

//! Favorite restaurants and events.

use crate::models::{Event, ItemKind, Location, Restaurant};
use serde::{Deserialize, Serialize};
#[cfg(feature = "binding-generation")]
use ts_rs::TS;

/// Snapshot of a catalog item saved as a favorite.
///
/// Restaurant and event IDs overlap, so `(kind, id)` is the key.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct FavoriteItem {
    pub id: String,
    pub name: String,
    pub image: String,
    pub location: Location,
    #[serde(rename = "type")]
    pub kind: ItemKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rating: Option<f32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cuisine: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub price_level: Option<u8>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub open_now: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub time: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub price: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl From<&Restaurant> for FavoriteItem {
    fn from(r: &Restaurant) -> Self {
        Self {
            id: r.id.clone(),
            name: r.name.clone(),
            image: r.image.clone(),
            location: r.location.clone(),
            kind: ItemKind::Restaurant,
            rating: Some(r.rating),
            cuisine: Some(r.cuisine.clone()),
            price_level: Some(r.price_level),
            open_now: Some(r.open_now),
            date: None,
            time: None,
            price: None,
            category: None,
            description: None,
        }
    }
}

impl From<&Event> for FavoriteItem {
    fn from(e: &Event) -> Self {
        // Events only carry a venue string; keep it as the city.
        Self {
            id: e.id.clone(),
            name: e.name.clone(),
            image: e.image.clone(),
            location: Location::new(&e.location, "", "India"),
            kind: ItemKind::Event,
            rating: None,
            cuisine: None,
            price_level: None,
            open_now: None,
            date: Some(e.date.clone()),
            time: Some(e.time.clone()),
            price: Some(e.price),
            category: Some(e.category.clone()),
            description: Some(e.description.clone()),
        }
    }
}

/// Stored favorite at `favorites/{uid}_{kind}_{id}`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FavoriteRecord {
    /// Owner; matched by account cleanup
    pub user_id: String,
    pub item: FavoriteItem,
    /// When the favorite was added (RFC 3339)
    pub added_at: String,
}

impl FavoriteRecord {
    pub fn document_id(user_id: &str, kind: ItemKind, item_id: &str) -> String {
        format!(
            "{}_{}_{}",
            urlencoding::encode(user_id),
            kind.as_str(),
            urlencoding::encode(item_id)
        )
    }
}

/// A user's favorites, in the order they were added.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Favorites {
    items: Vec<FavoriteItem>,
}

impl Favorites {
    pub fn new(items: Vec<FavoriteItem>) -> Self {
        Self { items }
    }

    /// Build from stored records, oldest first.
    pub fn from_records(mut records: Vec<FavoriteRecord>) -> Self {
        records.sort_by(|a, b| a.added_at.cmp(&b.added_at));
        Self::new(records.into_iter().map(|r| r.item).collect())
    }

    pub fn items(&self) -> &[FavoriteItem] {
        &self.items
    }

    pub fn into_items(self) -> Vec<FavoriteItem> {
        self.items
    }

    pub fn contains(&self, kind: ItemKind, id: &str) -> bool {
        self.items.iter().any(|f| f.kind == kind && f.id == id)
    }

    /// Add the item if absent, remove it if present.
    ///
    /// Returns `true` if the item is a favorite afterwards.
    pub fn toggle(&mut self, item: FavoriteItem) -> bool {
        let before = self.items.len();
        self.items.retain(|f| !(f.kind == item.kind && f.id == item.id));
        if self.items.len() == before {
            self.items.push(item);
            true
        } else {
            false
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::catalog;

    #[test]
    fn test_toggle_round_trip_restores_list() {
        let mut favorites = Favorites::default();
        let event = catalog::event("1").unwrap();
        favorites.toggle(FavoriteItem::from(event));
        let original = favorites.clone();

        let restaurant = catalog::restaurant("3").unwrap();
        assert!(favorites.toggle(FavoriteItem::from(restaurant)));
        assert!(favorites.contains(ItemKind::Restaurant, "3"));
        assert!(!favorites.toggle(FavoriteItem::from(restaurant)));

        assert_eq!(favorites, original);
    }

    #[test]
    fn test_records_sorted_by_added_at() {
        let record = |id: &str, added_at: &str| FavoriteRecord {
            user_id: "u1".to_string(),
            item: FavoriteItem::from(catalog::restaurant(id).unwrap()),
            added_at: added_at.to_string(),
        };
        let favorites = Favorites::from_records(vec![
            record("3", "2026-05-03T10:00:00.000Z"),
            record("1", "2026-05-01T10:00:00.000Z"),
            record("2", "2026-05-02T10:00:00.000Z"),
        ]);

        let ids: Vec<&str> = favorites.items().iter().map(|f| f.id.as_str()).collect();
        assert_eq!(ids, ["1", "2", "3"]);
    }

    #[test]
    fn test_same_id_different_kind_are_distinct() {
        let mut favorites = Favorites::default();
        favorites.toggle(FavoriteItem::from(catalog::restaurant("1").unwrap()));
        favorites.toggle(FavoriteItem::from(catalog::event("1").unwrap()));

        assert_eq!(favorites.items().len(), 2);
        assert!(favorites.contains(ItemKind::Restaurant, "1"));
        assert!(favorites.contains(ItemKind::Event, "1"));
    }

    #[test]
    fn test_serializes_type_tag() {
        let item = FavoriteItem::from(catalog::restaurant("2").unwrap());
        let json = serde_json::to_value(&item).unwrap();
        assert_eq!(json["type"], "restaurant");
        assert_eq!(json["priceLevel"], 2);
        assert!(json.get("date").is_none());
    }
}
