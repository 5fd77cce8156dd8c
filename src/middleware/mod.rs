// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Middleware modules (authentication, security, etc.).

pub mod auth;
pub mod security;
pub mod trigger_auth;

pub use auth::require_auth;
pub use trigger_auth::require_trigger_auth;
