// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@kernel.org>

//! DineInGo: restaurant and event reservations
//!
//! This crate provides the backend API: email OTP verification, user
//! profiles and favorites, the restaurant/event catalog, the reservation
//! flow, and handlers for platform auth and analytics events.

pub mod config;
pub mod db;
pub mod error;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod services;
pub mod time_utils;

use config::Config;
use db::FirestoreDb;
use services::{FirebaseTokenVerifier, Mailer, OtpService, ReservationService};

/// Shared application state.
pub struct AppState {
    pub config: Config,
    pub db: FirestoreDb,
    pub id_tokens: FirebaseTokenVerifier,
    pub mailer: Mailer,
    pub otp_service: OtpService,
    pub reservations: ReservationService,
}
