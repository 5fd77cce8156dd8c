// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@kernel.org>

//! Data models for the application.

pub mod catalog;
pub mod favorite;
pub mod otp;
pub mod preferences;
pub mod reservation;
pub mod user;

pub use catalog::{Booking, City, Coordinates, Event, ItemKind, Location, Restaurant};
pub use favorite::{FavoriteItem, FavoriteRecord, Favorites};
pub use otp::OtpRecord;
pub use preferences::{DashboardSection, Language};
pub use reservation::{
    DraftError, DraftStep, GuestDetails, ReservationDraft, ReservationEmail, SlotSelection,
};
pub use user::{ProfileInput, UserProfile};
