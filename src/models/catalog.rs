// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@kernel.org>

//! Restaurant, event and booking records served by the catalog.

use serde::{Deserialize, Serialize};
#[cfg(feature = "binding-generation")]
use ts_rs::TS;

/// Which catalog an item comes from.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub enum ItemKind {
    #[default]
    Restaurant,
    Event,
}

impl ItemKind {
    pub fn as_str(self) -> &'static str {
        match self {
            ItemKind::Restaurant => "restaurant",
            ItemKind::Event => "event",
        }
    }
}

/// City/state/country triple used for restaurants and user profiles.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct Location {
    pub city: String,
    pub state: String,
    pub country: String,
}

impl Location {
    pub fn new(city: &str, state: &str, country: &str) -> Self {
        Self {
            city: city.to_string(),
            state: state.to_string(),
            country: country.to_string(),
        }
    }

    /// A location is only stored when every component is present.
    pub fn is_complete(&self) -> bool {
        !self.city.trim().is_empty()
            && !self.state.trim().is_empty()
            && !self.country.trim().is_empty()
    }
}

/// Latitude/longitude in degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct Coordinates {
    pub lat: f64,
    pub lng: f64,
}

/// A city the location picker offers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct City {
    pub city: String,
    pub state: String,
    pub country: String,
    pub coordinates: Coordinates,
}

impl City {
    /// Case-insensitive substring match on city or state.
    pub fn matches(&self, query: &str) -> bool {
        let query = query.to_lowercase();
        self.city.to_lowercase().contains(&query) || self.state.to_lowercase().contains(&query)
    }

    pub fn location(&self) -> Location {
        Location::new(&self.city, &self.state, &self.country)
    }
}

/// A bookable restaurant.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct Restaurant {
    pub id: String,
    pub name: String,
    pub location: Location,
    pub rating: f32,
    pub image: String,
    pub cuisine: Vec<String>,
    /// 1 (cheap) to 4 (expensive)
    pub price_level: u8,
    pub address: String,
    pub open_now: bool,
    pub phone_number: String,
}

/// A ticketed dining event.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct Event {
    pub id: String,
    pub name: String,
    pub description: String,
    /// Event date (YYYY-MM-DD)
    pub date: String,
    /// Start time (HH:MM, 24h)
    pub time: String,
    /// Free-form venue description
    pub location: String,
    pub image: String,
    pub price: u32,
    pub category: String,
    pub organizer: String,
    pub capacity: u32,
    pub registered_count: u32,
}

impl Event {
    pub fn seats_left(&self) -> u32 {
        self.capacity.saturating_sub(self.registered_count)
    }
}

/// A booking as shown on the dashboard.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct Booking {
    pub id: u32,
    pub restaurant_name: String,
    pub date: String,
    pub time: String,
    pub guests: u32,
    pub status: String,
}
