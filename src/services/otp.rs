// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Email one-time passwords.
//!
//! A code is issued per email address, mailed to it, and may be redeemed
//! exactly once before it expires. Only SHA-256 hashes of codes are kept.

use crate::config::MAX_TTL_SECS;
use crate::db::FirestoreDb;
use crate::error::AppError;
use crate::models::OtpRecord;
use crate::services::mail::{templates, Mailer, OutgoingEmail};
use crate::services::ttl_cache::TtlCache;
use crate::time_utils::{format_utc_rfc3339, parse_rfc3339};
use chrono::{DateTime, Duration, Utc};
use ring::rand::{SecureRandom, SystemRandom};
use serde::Serialize;
use sha2::{Digest, Sha256};
use subtle::ConstantTimeEq;

/// Number of digits in a generated code.
pub const OTP_DIGITS: usize = 6;

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct SendOtpResponse {
    pub success: bool,
    pub message: String,
}

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct VerifyOtpResponse {
    pub valid: bool,
}

/// Outcome of checking a submitted code against the store.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OtpCheck {
    /// Matched and consumed.
    Valid,
    /// No pending code for this address.
    NotFound,
    /// A code existed but had expired; it has been removed.
    Expired,
    /// Wrong code; the pending code is kept.
    Mismatch,
}

/// Hex SHA-256 of a code.
pub fn hash_otp(otp: &str) -> String {
    hex::encode(Sha256::digest(otp.as_bytes()))
}

fn hashes_match(stored: &str, submitted: &str) -> bool {
    stored.as_bytes().ct_eq(submitted.as_bytes()).into()
}

/// Store key for an address. Addresses compare case-insensitively.
fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

/// Generate a uniformly distributed numeric code.
pub fn generate_otp(rng: &SystemRandom) -> Result<String, AppError> {
    let mut code = String::with_capacity(OTP_DIGITS);
    let mut buf = [0u8; 1];
    while code.len() < OTP_DIGITS {
        rng.fill(&mut buf)
            .map_err(|_| AppError::Internal(anyhow::anyhow!("System RNG failure")))?;
        // Reject 250..=255 so every digit is equally likely.
        if buf[0] < 250 {
            code.push(char::from(b'0' + buf[0] % 10));
        }
    }
    Ok(code)
}

/// Process-local OTP store.
#[derive(Clone, Default)]
pub struct MemoryOtpStore {
    codes: TtlCache<String>,
}

impl MemoryOtpStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn put(&self, email: &str, otp_hash: String, expires_at: DateTime<Utc>) {
        self.codes.insert(email, otp_hash, expires_at);
    }

    fn check(&self, email: &str, otp_hash: &str, now: DateTime<Utc>) -> OtpCheck {
        let removed = self.codes.remove_if(email, |stored, expires_at| {
            now > expires_at || hashes_match(stored, otp_hash)
        });

        match removed {
            Some((_, expires_at)) if now > expires_at => OtpCheck::Expired,
            Some(_) => OtpCheck::Valid,
            None if self.codes.get_with_expiry(email).is_some() => OtpCheck::Mismatch,
            None => OtpCheck::NotFound,
        }
    }

    pub fn purge_expired(&self, now: DateTime<Utc>) -> usize {
        self.codes.purge_expired(now)
    }

    pub fn len(&self) -> usize {
        self.codes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.codes.is_empty()
    }
}

/// Where pending codes live.
#[derive(Clone)]
pub enum OtpStore {
    Memory(MemoryOtpStore),
    /// `otp_codes` collection, shared across instances.
    Firestore(FirestoreDb),
}

impl OtpStore {
    /// Store a code for `email`, replacing any pending one.
    pub async fn put(
        &self,
        email: &str,
        otp: &str,
        expires_at: DateTime<Utc>,
    ) -> Result<(), AppError> {
        let key = normalize_email(email);
        let otp_hash = hash_otp(otp);

        match self {
            OtpStore::Memory(store) => {
                store.put(&key, otp_hash, expires_at);
                Ok(())
            }
            OtpStore::Firestore(db) => {
                db.set_otp(&OtpRecord {
                    email: key,
                    otp_hash,
                    expires_at: format_utc_rfc3339(expires_at),
                })
                .await
            }
        }
    }

    /// Check `otp` for `email`, consuming it on success or expiry.
    pub async fn check(
        &self,
        email: &str,
        otp: &str,
        now: DateTime<Utc>,
    ) -> Result<OtpCheck, AppError> {
        let key = normalize_email(email);
        let otp_hash = hash_otp(otp);

        match self {
            OtpStore::Memory(store) => Ok(store.check(&key, &otp_hash, now)),
            OtpStore::Firestore(db) => {
                let Some(record) = db.get_otp(&key).await? else {
                    return Ok(OtpCheck::NotFound);
                };

                // An unparseable expiry is treated as already expired.
                let expired = match parse_rfc3339(&record.expires_at) {
                    Some(expires_at) => now > expires_at,
                    None => true,
                };
                if expired {
                    db.delete_otp(&key).await?;
                    return Ok(OtpCheck::Expired);
                }

                if !hashes_match(&record.otp_hash, &otp_hash) {
                    return Ok(OtpCheck::Mismatch);
                }

                // A concurrent verify may have consumed it first.
                if db.consume_otp(&key).await? {
                    Ok(OtpCheck::Valid)
                } else {
                    Ok(OtpCheck::NotFound)
                }
            }
        }
    }

    /// Drop expired codes. Firestore documents are removed lazily on read.
    pub fn purge_expired(&self, now: DateTime<Utc>) -> usize {
        match self {
            OtpStore::Memory(store) => store.purge_expired(now),
            OtpStore::Firestore(_) => 0,
        }
    }
}

/// Issues, mails, and verifies codes.
#[derive(Clone)]
pub struct OtpService {
    store: OtpStore,
    mailer: Mailer,
    ttl: Duration,
    rng: SystemRandom,
}

impl OtpService {
    pub fn new(store: OtpStore, mailer: Mailer, ttl_secs: i64) -> Self {
        Self {
            store,
            mailer,
            ttl: Duration::seconds(ttl_secs.clamp(1, MAX_TTL_SECS)),
            rng: SystemRandom::new(),
        }
    }

    pub fn store(&self) -> &OtpStore {
        &self.store
    }

    /// Store and mail a code. A code is generated when the caller omits one.
    pub async fn send_otp(
        &self,
        email: Option<&str>,
        otp: Option<&str>,
    ) -> Result<SendOtpResponse, AppError> {
        let email = email
            .map(str::trim)
            .filter(|e| !e.is_empty())
            .ok_or_else(|| AppError::InvalidArgument("Email is required".to_string()))?;

        let otp = match otp.map(str::trim).filter(|o| !o.is_empty()) {
            Some(otp) => otp.to_string(),
            None => generate_otp(&self.rng)?,
        };

        let expires_at = Utc::now()
            .checked_add_signed(self.ttl)
            .ok_or_else(|| AppError::Internal(anyhow::anyhow!("OTP expiry out of range")))?;
        self.store.put(email, &otp, expires_at).await?;

        let content = templates::otp_email(&otp, self.ttl.num_minutes().max(1))?;
        let message = OutgoingEmail::new(email, content);
        self.mailer.send(&message).await.map_err(|e| {
            tracing::error!(email, error = %e, "Error sending OTP email");
            AppError::Mail("Failed to send OTP email".to_string())
        })?;

        tracing::info!(email, "OTP issued");
        Ok(SendOtpResponse {
            success: true,
            message: "OTP email sent successfully".to_string(),
        })
    }

    pub async fn verify_otp(
        &self,
        email: Option<&str>,
        otp: Option<&str>,
    ) -> Result<VerifyOtpResponse, AppError> {
        self.verify_otp_at(email, otp, Utc::now()).await
    }

    /// `verify_otp` against an explicit clock.
    pub async fn verify_otp_at(
        &self,
        email: Option<&str>,
        otp: Option<&str>,
        now: DateTime<Utc>,
    ) -> Result<VerifyOtpResponse, AppError> {
        let (Some(email), Some(otp)) = (
            email.map(str::trim).filter(|e| !e.is_empty()),
            otp.map(str::trim).filter(|o| !o.is_empty()),
        ) else {
            return Err(AppError::InvalidArgument(
                "Email and OTP are required".to_string(),
            ));
        };

        match self.store.check(email, otp, now).await? {
            OtpCheck::Valid => {
                tracing::info!(email, "OTP verified");
                Ok(VerifyOtpResponse { valid: true })
            }
            OtpCheck::NotFound => Err(AppError::NotFound("OTP expired or not found".to_string())),
            OtpCheck::Expired => {
                tracing::info!(email, "Expired OTP presented");
                Err(AppError::DeadlineExceeded("OTP has expired".to_string()))
            }
            OtpCheck::Mismatch => {
                tracing::warn!(email, "Invalid OTP presented");
                Err(AppError::InvalidArgument("Invalid OTP".to_string()))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::mail::LogMailer;

    fn service() -> (OtpService, MemoryOtpStore, LogMailer) {
        let store = MemoryOtpStore::new();
        let log = LogMailer::default();
        let service = OtpService::new(
            OtpStore::Memory(store.clone()),
            Mailer::Log(log.clone()),
            300,
        );
        (service, store, log)
    }

    #[test]
    fn test_generate_otp_is_six_digits() {
        let rng = SystemRandom::new();
        for _ in 0..50 {
            let otp = generate_otp(&rng).unwrap();
            assert_eq!(otp.len(), OTP_DIGITS);
            assert!(otp.bytes().all(|b| b.is_ascii_digit()));
        }
    }

    #[test]
    fn test_memory_store_outcomes() {
        let store = MemoryOtpStore::new();
        let now = Utc::now();
        store.put("a@example.com", hash_otp("123456"), now + Duration::minutes(5));

        assert_eq!(
            store.check("a@example.com", &hash_otp("000000"), now),
            OtpCheck::Mismatch
        );
        assert_eq!(
            store.check("a@example.com", &hash_otp("123456"), now),
            OtpCheck::Valid
        );
        assert_eq!(
            store.check("a@example.com", &hash_otp("123456"), now),
            OtpCheck::NotFound
        );
    }

    #[test]
    fn test_memory_store_expiry_removes_record() {
        let store = MemoryOtpStore::new();
        let now = Utc::now();
        store.put("a@example.com", hash_otp("123456"), now + Duration::minutes(5));

        let later = now + Duration::minutes(6);
        assert_eq!(
            store.check("a@example.com", &hash_otp("123456"), later),
            OtpCheck::Expired
        );
        assert!(store.is_empty());
    }

    #[tokio::test]
    async fn test_send_generates_code_and_mails_it() {
        let (service, store, log) = service();

        let resp = service.send_otp(Some("Diner@Example.com"), None).await.unwrap();
        assert!(resp.success);
        assert_eq!(resp.message, "OTP email sent successfully");
        assert_eq!(store.len(), 1);

        let sent = log.sent().await;
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].to, "Diner@Example.com");
        assert_eq!(sent[0].subject, "Your DineInGo Verification Code");
    }

    #[tokio::test]
    async fn test_send_requires_email() {
        let (service, _, _) = service();
        let err = service.send_otp(Some("   "), Some("123456")).await.unwrap_err();
        assert!(matches!(err, AppError::InvalidArgument(ref m) if m == "Email is required"));
    }

    #[tokio::test]
    async fn test_address_match_is_case_insensitive() {
        let (service, _, _) = service();
        service
            .send_otp(Some("Diner@Example.com"), Some("654321"))
            .await
            .unwrap();
        let resp = service
            .verify_otp(Some("diner@example.com"), Some("654321"))
            .await
            .unwrap();
        assert!(resp.valid);
    }

    #[tokio::test]
    async fn test_verify_after_expiry_is_deadline_exceeded() {
        let (service, store, _) = service();
        service
            .send_otp(Some("a@example.com"), Some("123456"))
            .await
            .unwrap();

        let later = Utc::now() + Duration::minutes(6);
        let err = service
            .verify_otp_at(Some("a@example.com"), Some("123456"), later)
            .await
            .unwrap_err();
        assert_eq!(err.code(), "deadline-exceeded");
        assert!(store.is_empty());
    }

    #[tokio::test]
    async fn test_out_of_range_ttl_is_clamped() {
        let store = MemoryOtpStore::new();
        let service = OtpService::new(
            OtpStore::Memory(store.clone()),
            Mailer::Log(LogMailer::default()),
            9_000_000_000_000,
        );
        service
            .send_otp(Some("a@example.com"), Some("123456"))
            .await
            .unwrap();

        let past_max = Utc::now() + Duration::seconds(MAX_TTL_SECS) + Duration::minutes(1);
        let err = service
            .verify_otp_at(Some("a@example.com"), Some("123456"), past_max)
            .await
            .unwrap_err();
        assert_eq!(err.code(), "deadline-exceeded");
    }

    #[tokio::test]
    async fn test_negative_ttl_still_issues_a_live_code() {
        let service = OtpService::new(
            OtpStore::Memory(MemoryOtpStore::new()),
            Mailer::Log(LogMailer::default()),
            -1,
        );
        let sent_at = Utc::now();
        service
            .send_otp(Some("a@example.com"), Some("123456"))
            .await
            .unwrap();

        let resp = service
            .verify_otp_at(Some("a@example.com"), Some("123456"), sent_at)
            .await
            .unwrap();
        assert!(resp.valid);
    }
}
