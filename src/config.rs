// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Application configuration loaded from environment variables.
//!
//! Cloud Run injects secrets as environment variables via secret bindings,
//! so everything is read once at startup.

use std::env;

/// Default transactional mail endpoint (Resend-compatible JSON API).
pub const DEFAULT_MAIL_API_URL: &str = "https://api.resend.com/emails";

/// Longest accepted OTP or draft lifetime.
pub const MAX_TTL_SECS: i64 = 24 * 60 * 60;

/// Header carrying the shared secret on `/triggers/*` requests.
pub const TRIGGER_TOKEN_HEADER: &str = "x-trigger-token";

/// Where OTP records are kept.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OtpStoreKind {
    /// Process-local map; lost on restart and not shared across instances.
    Memory,
    /// `otp_codes` collection, shared by every instance.
    Firestore,
}

impl std::str::FromStr for OtpStoreKind {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "memory" => Ok(Self::Memory),
            "firestore" => Ok(Self::Firestore),
            other => Err(ConfigError::Invalid {
                name: "OTP_STORE",
                value: other.to_string(),
            }),
        }
    }
}

/// Application configuration, loaded once at startup.
#[derive(Debug, Clone)]
pub struct Config {
    // --- Environment Variables (non-sensitive) ---
    /// Frontend URL allowed by CORS
    pub frontend_url: String,
    /// GCP project ID
    pub gcp_project_id: String,
    /// Server port
    pub port: u16,
    /// Transactional mail API endpoint
    pub mail_api_url: String,
    /// Sender shown on outgoing mail
    pub mail_from: String,
    /// OTP lifetime in seconds
    pub otp_ttl_secs: i64,
    /// OTP storage backend
    pub otp_store: OtpStoreKind,
    /// Reservation draft lifetime in seconds
    pub draft_ttl_secs: i64,

    // --- Secrets ---
    /// JWT signing key for session tokens (raw bytes)
    pub jwt_signing_key: Vec<u8>,
    /// Shared secret expected on trigger requests
    pub trigger_token: String,
    /// Mail API key; without one, mail is only logged
    pub mail_api_key: Option<String>,
}

impl Config {
    /// Config for tests only.
    pub fn test_default() -> Self {
        Self {
            frontend_url: "http://localhost:5173".to_string(),
            gcp_project_id: "test-project".to_string(),
            port: 8080,
            mail_api_url: DEFAULT_MAIL_API_URL.to_string(),
            mail_from: "DineInGo <noreply@dineingo.app>".to_string(),
            otp_ttl_secs: 300,
            otp_store: OtpStoreKind::Memory,
            draft_ttl_secs: 1800,
            jwt_signing_key: b"test_jwt_key_32_bytes_minimum!!".to_vec(),
            trigger_token: "test_trigger_token".to_string(),
            mail_api_key: None,
        }
    }

    /// Load configuration from environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok(); // Load .env file if present

        Ok(Self {
            frontend_url: env::var("FRONTEND_URL")
                .unwrap_or_else(|_| "http://localhost:5173".to_string()),
            gcp_project_id: env::var("GCP_PROJECT_ID").unwrap_or_else(|_| "local-dev".to_string()),
            port: parse_or("PORT", 8080),
            mail_api_url: env::var("MAIL_API_URL")
                .unwrap_or_else(|_| DEFAULT_MAIL_API_URL.to_string()),
            mail_from: env::var("MAIL_FROM")
                .unwrap_or_else(|_| "DineInGo <noreply@dineingo.app>".to_string()),
            otp_ttl_secs: parse_ttl("OTP_TTL_SECONDS", 300)?,
            otp_store: env::var("OTP_STORE")
                .unwrap_or_else(|_| "memory".to_string())
                .parse()?,
            draft_ttl_secs: parse_ttl("DRAFT_TTL_SECONDS", 1800)?,

            jwt_signing_key: env::var("JWT_SIGNING_KEY")
                .map_err(|_| ConfigError::Missing("JWT_SIGNING_KEY"))?
                .into_bytes(),
            trigger_token: env::var("TRIGGER_TOKEN")
                .map(|v| v.trim().to_string())
                .map_err(|_| ConfigError::Missing("TRIGGER_TOKEN"))?,
            mail_api_key: env::var("MAIL_API_KEY")
                .ok()
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty()),
        })
    }
}

fn parse_or<T: std::str::FromStr>(name: &str, default: T) -> T {
    env::var(name)
        .ok()
        .and_then(|v| v.trim().parse().ok())
        .unwrap_or(default)
}

/// Lifetime in seconds, `1..=MAX_TTL_SECS`. Unset means `default`.
fn parse_ttl(name: &'static str, default: i64) -> Result<i64, ConfigError> {
    let Ok(raw) = env::var(name) else {
        return Ok(default);
    };

    match raw.trim().parse::<i64>() {
        Ok(secs) if (1..=MAX_TTL_SECS).contains(&secs) => Ok(secs),
        _ => Err(ConfigError::Invalid { name, value: raw }),
    }
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    Missing(&'static str),

    #[error("Invalid value for {name}: {value}")]
    Invalid { name: &'static str, value: String },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_from_env() {
        env::set_var("JWT_SIGNING_KEY", "test_jwt_key_32_bytes_minimum!!");
        env::set_var("TRIGGER_TOKEN", " trigger ");
        env::remove_var("OTP_STORE");

        let config = Config::from_env().expect("Config should load");

        assert_eq!(config.trigger_token, "trigger");
        assert_eq!(config.otp_ttl_secs, 300);
        assert_eq!(config.otp_store, OtpStoreKind::Memory);
    }

    #[test]
    fn test_ttl_bounds() {
        env::set_var("DINEINGO_TEST_TTL_OK", " 600 ");
        assert_eq!(parse_ttl("DINEINGO_TEST_TTL_OK", 300).unwrap(), 600);

        env::remove_var("DINEINGO_TEST_TTL_UNSET");
        assert_eq!(parse_ttl("DINEINGO_TEST_TTL_UNSET", 300).unwrap(), 300);

        for bad in ["0", "-1", "9000000000000", "soon"] {
            env::set_var("DINEINGO_TEST_TTL_BAD", bad);
            assert!(
                matches!(
                    parse_ttl("DINEINGO_TEST_TTL_BAD", 300),
                    Err(ConfigError::Invalid { name: "DINEINGO_TEST_TTL_BAD", .. })
                ),
                "{bad} should be rejected"
            );
        }
    }

    #[test]
    fn test_otp_store_kind_parse() {
        assert_eq!("Firestore".parse::<OtpStoreKind>().unwrap(), OtpStoreKind::Firestore);
        assert_eq!(" memory ".parse::<OtpStoreKind>().unwrap(), OtpStoreKind::Memory);
        assert!(matches!(
            "redis".parse::<OtpStoreKind>(),
            Err(ConfigError::Invalid { name: "OTP_STORE", .. })
        ));
    }
}
