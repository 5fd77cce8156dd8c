// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Services module - business logic layer.

pub mod catalog;
pub mod dashboard;
pub mod favorites;
pub mod firebase_auth;
pub mod forms;
pub mod mail;
pub mod otp;
pub mod profile;
pub mod reservation;
pub mod ttl_cache;

pub use dashboard::DashboardView;
pub use firebase_auth::FirebaseTokenVerifier;
pub use mail::{LogMailer, Mailer};
pub use otp::{MemoryOtpStore, OtpService, OtpStore};
pub use reservation::{ReservationConfirmation, ReservationService};
pub use ttl_cache::TtlCache;
