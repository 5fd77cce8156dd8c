//! Database layer (Firestore).

pub mod firestore;

pub use firestore::FirestoreDb;

/// Collection names as constants.
pub mod collections {
    pub const USERS: &str = "users";
    pub const FAVORITES: &str = "favorites";
    /// Written by the web client; only read here for account cleanup
    pub const REVIEWS: &str = "reviews";
    pub const OTP_CODES: &str = "otp_codes";
    pub const RESERVATION_EMAILS: &str = "reservation_emails";
}
