//! One-time password record.

use serde::{Deserialize, Serialize};

/// Pending OTP for an email address.
///
/// Stored at `otp_codes/{urlencoded email}` when the Firestore store is
/// enabled. Only a SHA-256 hash of the code is persisted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OtpRecord {
    pub email: String,
    /// Hex SHA-256 of the code
    pub otp_hash: String,
    /// Expiry (RFC 3339)
    pub expires_at: String,
}
