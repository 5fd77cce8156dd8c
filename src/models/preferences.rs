// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@kernel.org>

//! Dashboard preferences.

use serde::{Deserialize, Serialize};
use std::str::FromStr;
#[cfg(feature = "binding-generation")]
use ts_rs::TS;

/// Interface language offered on the dashboard.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub enum Language {
    #[default]
    English,
    Hindi,
    Tamil,
    Kannada,
    Telugu,
}

impl Language {
    pub const ALL: [Language; 5] = [
        Language::English,
        Language::Hindi,
        Language::Tamil,
        Language::Kannada,
        Language::Telugu,
    ];

    /// Name of the language in its own script.
    pub fn native_name(self) -> &'static str {
        match self {
            Language::English => "English",
            Language::Hindi => "हिंदी",
            Language::Tamil => "தமிழ்",
            Language::Kannada => "ಕನ್ನಡ",
            Language::Telugu => "తెలుగు",
        }
    }
}

/// Dashboard views. The client switches between these without navigation.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub enum DashboardSection {
    #[default]
    Home,
    Bookings,
    Restaurants,
    Events,
    Favorites,
    Messages,
    Settings,
}

impl DashboardSection {
    pub const ALL: [DashboardSection; 7] = [
        DashboardSection::Home,
        DashboardSection::Bookings,
        DashboardSection::Restaurants,
        DashboardSection::Events,
        DashboardSection::Favorites,
        DashboardSection::Messages,
        DashboardSection::Settings,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            DashboardSection::Home => "home",
            DashboardSection::Bookings => "bookings",
            DashboardSection::Restaurants => "restaurants",
            DashboardSection::Events => "events",
            DashboardSection::Favorites => "favorites",
            DashboardSection::Messages => "messages",
            DashboardSection::Settings => "settings",
        }
    }
}

impl FromStr for DashboardSection {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|section| section.as_str() == s)
            .ok_or_else(|| format!("Unknown dashboard section: {}", s))
    }
}
