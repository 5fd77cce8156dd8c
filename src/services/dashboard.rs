// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Dashboard views.
//!
//! The dashboard is a single page whose content switches by section. Each
//! section is served as one tagged payload so the client renders whatever
//! variant it receives.

use crate::db::FirestoreDb;
use crate::error::AppError;
use crate::models::{Booking, DashboardSection, Event, FavoriteItem, Language, Restaurant, UserProfile};
use crate::services::{catalog, favorites};
use serde::Serialize;
#[cfg(feature = "binding-generation")]
use ts_rs::TS;

const FEATURED_RESTAURANTS: usize = 3;

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LanguageOption {
    pub code: Language,
    pub native_name: &'static str,
}

/// Inbox entry. No producer exists yet, so the list is always empty.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct Notification {
    pub id: String,
    pub title: String,
    pub body: String,
    pub created_at: String,
}

#[derive(Debug, Clone, Serialize)]
#[serde(tag = "section", rename_all = "lowercase")]
pub enum DashboardView {
    #[serde(rename_all = "camelCase")]
    Home {
        greeting: String,
        profile: Option<UserProfile>,
        upcoming_bookings: Vec<Booking>,
        featured_restaurants: Vec<Restaurant>,
        featured_events: Vec<Event>,
    },
    Bookings {
        bookings: Vec<Booking>,
    },
    Restaurants {
        restaurants: Vec<Restaurant>,
    },
    Events {
        events: Vec<Event>,
    },
    Favorites {
        favorites: Vec<FavoriteItem>,
    },
    Messages {
        notifications: Vec<Notification>,
    },
    Settings {
        profile: Option<UserProfile>,
        language: Language,
        languages: Vec<LanguageOption>,
    },
}

fn greeting(profile: Option<&UserProfile>) -> String {
    match profile.map(|p| p.display_name.trim()).filter(|n| !n.is_empty()) {
        Some(name) => format!("Welcome back, {}!", name),
        None => "Welcome to DineInGo!".to_string(),
    }
}

fn languages() -> Vec<LanguageOption> {
    Language::ALL
        .into_iter()
        .map(|code| LanguageOption {
            code,
            native_name: code.native_name(),
        })
        .collect()
}

/// Build the payload for one dashboard section.
pub async fn view(
    db: &FirestoreDb,
    uid: &str,
    section: DashboardSection,
) -> Result<DashboardView, AppError> {
    let view = match section {
        DashboardSection::Home => {
            // The greeting degrades to a generic one if the profile is unreadable.
            let profile = match db.get_user(uid).await {
                Ok(profile) => profile,
                Err(e) => {
                    tracing::warn!(uid, error = %e, "Dashboard profile lookup failed");
                    None
                }
            };
            DashboardView::Home {
                greeting: greeting(profile.as_ref()),
                profile,
                upcoming_bookings: catalog::bookings().to_vec(),
                featured_restaurants: catalog::top_rated(FEATURED_RESTAURANTS)
                    .into_iter()
                    .cloned()
                    .collect(),
                featured_events: catalog::events().to_vec(),
            }
        }
        DashboardSection::Bookings => DashboardView::Bookings {
            bookings: catalog::bookings().to_vec(),
        },
        DashboardSection::Restaurants => DashboardView::Restaurants {
            restaurants: catalog::restaurants(&Default::default())
                .into_iter()
                .cloned()
                .collect(),
        },
        DashboardSection::Events => DashboardView::Events {
            events: catalog::events().to_vec(),
        },
        DashboardSection::Favorites => DashboardView::Favorites {
            favorites: favorites::list_favorites(db, uid).await?.into_items(),
        },
        DashboardSection::Messages => DashboardView::Messages {
            notifications: Vec::new(),
        },
        DashboardSection::Settings => {
            let profile = db.get_user(uid).await?;
            let language = profile
                .as_ref()
                .and_then(|p| p.language)
                .unwrap_or_default();
            DashboardView::Settings {
                profile,
                language,
                languages: languages(),
            }
        }
    };

    tracing::debug!(uid, section = section.as_str(), "Dashboard view built");
    Ok(view)
}
