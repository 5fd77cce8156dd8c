// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! DineInGo API Server
//!
//! Serves the reservation API, email OTP verification and the platform
//! event handlers for the DineInGo web client.

use dineingo::{
    config::{Config, OtpStoreKind},
    db::FirestoreDb,
    services::{FirebaseTokenVerifier, Mailer, MemoryOtpStore, OtpService, OtpStore, ReservationService},
    AppState,
};
use std::sync::Arc;
use std::time::Duration;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// How often expired OTPs and reservation drafts are dropped from memory.
const PURGE_INTERVAL: Duration = Duration::from_secs(60);

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize structured JSON logging for GCP
    init_logging();

    // Load configuration from environment
    let config = Config::from_env()?;
    tracing::info!(port = config.port, "Starting DineInGo API");

    // Initialize Firestore database
    let db = FirestoreDb::new(&config.gcp_project_id).await?;

    let id_tokens = FirebaseTokenVerifier::new(&config)?;
    let mailer = Mailer::from_config(&config)?;

    let otp_store = match config.otp_store {
        OtpStoreKind::Memory => OtpStore::Memory(MemoryOtpStore::new()),
        OtpStoreKind::Firestore => OtpStore::Firestore(db.clone()),
    };
    tracing::info!(store = ?config.otp_store, ttl_secs = config.otp_ttl_secs, "OTP store initialized");

    let otp_service = OtpService::new(otp_store, mailer.clone(), config.otp_ttl_secs);
    let reservations = ReservationService::new(db.clone(), mailer.clone(), config.draft_ttl_secs);

    // Build shared state
    let state = Arc::new(AppState {
        config: config.clone(),
        db,
        id_tokens,
        mailer,
        otp_service,
        reservations,
    });

    spawn_purge_task(state.clone());

    // Build router
    let app = dineingo::routes::create_router(state);

    // Start server
    let addr = format!("0.0.0.0:{}", config.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!(address = %addr, "Server listening");

    axum::serve(listener, app).await?;
    Ok(())
}

/// Periodically drop expired in-memory entries.
fn spawn_purge_task(state: Arc<AppState>) {
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(PURGE_INTERVAL);
        loop {
            interval.tick().await;
            let now = chrono::Utc::now();
            let otps = state.otp_service.store().purge_expired(now);
            let drafts = state.reservations.purge_expired(now);
            if otps > 0 || drafts > 0 {
                tracing::debug!(otps, drafts, "Purged expired entries");
            }
        }
    });
}

/// Initialize structured JSON logging (GCP-compliant).
fn init_logging() {
    let format = tracing_subscriber::fmt::layer()
        .json()
        .with_target(false)
        .with_current_span(true)
        .flatten_event(true);

    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("dineingo=debug,info"));

    tracing_subscriber::registry().with(filter).with(format).init();
}
