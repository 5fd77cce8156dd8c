// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Reservation flow.
//!
//! A booking is assembled as a server-side draft across several requests:
//! slot -> guest details -> table (restaurants only) -> confirm. Drafts are
//! private to the user who started them and expire after a fixed lifetime.

use crate::config::MAX_TTL_SECS;
use crate::db::FirestoreDb;
use crate::error::{AppError, FieldErrors};
use crate::models::{
    DraftStep, GuestDetails, ItemKind, ReservationDraft, ReservationEmail, SlotSelection,
};
use crate::services::catalog;
use crate::services::forms::is_valid_email;
use crate::services::mail::{templates, Mailer, OutgoingEmail};
use crate::services::ttl_cache::TtlCache;
use crate::time_utils::{format_utc_rfc3339, parse_booking_date};
use chrono::{DateTime, Duration, Utc};
use ring::rand::{SecureRandom, SystemRandom};
use serde::Serialize;

pub const MAX_PARTY_SIZE: u32 = 8;

const DRAFT_NOT_FOUND: &str = "Reservation draft not found";

/// Result of a confirmed booking.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReservationConfirmation {
    pub reservation_id: String,
    /// Whether the confirmation email was accepted for delivery
    pub email_sent: bool,
    pub summary: ReservationDraft,
}

/// Digits with an optional leading `+`; spaces and dashes are ignored.
pub fn is_valid_phone(phone: &str) -> bool {
    let compact: String = phone
        .trim()
        .chars()
        .filter(|c| *c != ' ' && *c != '-')
        .collect();
    let digits = compact.strip_prefix('+').unwrap_or(&compact);
    (7..=15).contains(&digits.len()) && digits.bytes().all(|b| b.is_ascii_digit())
}

fn validate_guest(guest: &GuestDetails) -> Result<(), FieldErrors> {
    let mut fields = FieldErrors::new();

    if guest.full_name.trim().is_empty() {
        fields.insert("fullName".to_string(), "Full name is required".to_string());
    }

    if guest.email.trim().is_empty() {
        fields.insert("email".to_string(), "Email is required".to_string());
    } else if !is_valid_email(guest.email.trim()) {
        fields.insert("email".to_string(), "Invalid email format".to_string());
    }

    if guest.phone_number.trim().is_empty() {
        fields.insert(
            "phoneNumber".to_string(),
            "Phone number is required".to_string(),
        );
    } else if !is_valid_phone(&guest.phone_number) {
        fields.insert(
            "phoneNumber".to_string(),
            "Invalid phone number".to_string(),
        );
    }

    if fields.is_empty() {
        Ok(())
    } else {
        Err(fields)
    }
}

/// Trim free-text fields and drop empty optionals.
fn normalize_guest(guest: GuestDetails) -> GuestDetails {
    let optional = |v: Option<String>| {
        v.map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
    };
    GuestDetails {
        full_name: guest.full_name.trim().to_string(),
        email: guest.email.trim().to_string(),
        phone_number: guest.phone_number.trim().to_string(),
        occasion: optional(guest.occasion),
        special_request: optional(guest.special_request),
    }
}

/// Owns in-progress drafts and completes bookings.
#[derive(Clone)]
pub struct ReservationService {
    drafts: TtlCache<ReservationDraft>,
    ttl: Duration,
    rng: SystemRandom,
    db: FirestoreDb,
    mailer: Mailer,
}

impl ReservationService {
    pub fn new(db: FirestoreDb, mailer: Mailer, ttl_secs: i64) -> Self {
        Self {
            drafts: TtlCache::new(),
            ttl: Duration::seconds(ttl_secs.clamp(1, MAX_TTL_SECS)),
            rng: SystemRandom::new(),
            db,
            mailer,
        }
    }

    fn new_draft_id(&self) -> Result<String, AppError> {
        let mut bytes = [0u8; 16];
        self.rng
            .fill(&mut bytes)
            .map_err(|_| AppError::Internal(anyhow::anyhow!("System RNG failure")))?;
        Ok(hex::encode(bytes))
    }

    /// Begin a booking for a restaurant slot or an event.
    pub async fn start(
        &self,
        uid: &str,
        selection: SlotSelection,
    ) -> Result<ReservationDraft, AppError> {
        let now = Utc::now();
        let mut fields = FieldErrors::new();

        let (item_name, date, time, guests) = match selection.kind {
            ItemKind::Restaurant => {
                let restaurant = catalog::restaurant(&selection.id)
                    .ok_or_else(|| AppError::NotFound("Restaurant not found".to_string()))?;

                let date = selection.date.unwrap_or_default();
                if parse_booking_date(&date).is_none() {
                    fields.insert("date".to_string(), "Select a valid date".to_string());
                }
                let time = selection.time.unwrap_or_default();
                if !catalog::time_slots().contains(&time) {
                    fields.insert(
                        "time".to_string(),
                        "Select an available time slot".to_string(),
                    );
                }
                let guests = selection.guests.unwrap_or(0);
                if !(1..=MAX_PARTY_SIZE).contains(&guests) {
                    fields.insert(
                        "guests".to_string(),
                        format!("Guests must be between 1 and {}", MAX_PARTY_SIZE),
                    );
                }
                (restaurant.name.clone(), date.trim().to_string(), time, guests)
            }
            ItemKind::Event => {
                let event = catalog::event(&selection.id)
                    .ok_or_else(|| AppError::NotFound("Event not found".to_string()))?;

                if event.seats_left() == 0 {
                    return Err(AppError::InvalidArgument(
                        "Event is fully booked".to_string(),
                    ));
                }
                let guests = selection.guests.unwrap_or(1);
                if guests != 1 {
                    fields.insert(
                        "guests".to_string(),
                        "Event registration is for one guest".to_string(),
                    );
                }
                (event.name.clone(), event.date.clone(), event.time.clone(), 1)
            }
        };

        if !fields.is_empty() {
            return Err(AppError::Validation(fields));
        }

        let draft = ReservationDraft {
            id: self.new_draft_id()?,
            owner_uid: uid.to_string(),
            kind: selection.kind,
            item_id: selection.id,
            item_name,
            date,
            time,
            guests,
            guest: None,
            table: None,
            step: DraftStep::SlotChosen,
            created_at: format_utc_rfc3339(now),
        };

        let expires_at = now
            .checked_add_signed(self.ttl)
            .ok_or_else(|| AppError::Internal(anyhow::anyhow!("Draft expiry out of range")))?;
        self.drafts.insert(draft.id.clone(), draft.clone(), expires_at);

        tracing::info!(uid, draft_id = %draft.id, kind = draft.kind.as_str(), item_id = %draft.item_id, "Reservation draft started");
        Ok(draft)
    }

    /// Current state of a draft the caller owns.
    pub fn get(&self, uid: &str, draft_id: &str) -> Result<ReservationDraft, AppError> {
        self.drafts
            .get(draft_id, Utc::now())
            .filter(|d| d.owner_uid == uid)
            .ok_or_else(|| AppError::NotFound(DRAFT_NOT_FOUND.to_string()))
    }

    fn modify<F>(&self, uid: &str, draft_id: &str, f: F) -> Result<ReservationDraft, AppError>
    where
        F: FnOnce(&mut ReservationDraft) -> Result<(), AppError>,
    {
        self.drafts
            .update(draft_id, Utc::now(), |draft| {
                if draft.owner_uid != uid {
                    return Err(AppError::NotFound(DRAFT_NOT_FOUND.to_string()));
                }
                f(draft)?;
                Ok(draft.clone())
            })
            .unwrap_or_else(|| Err(AppError::NotFound(DRAFT_NOT_FOUND.to_string())))
    }

    /// Record (or edit) the contact form.
    pub fn set_guest_details(
        &self,
        uid: &str,
        draft_id: &str,
        guest: GuestDetails,
    ) -> Result<ReservationDraft, AppError> {
        let guest = normalize_guest(guest);
        validate_guest(&guest).map_err(AppError::Validation)?;

        let draft = self.modify(uid, draft_id, |draft| {
            draft.set_guest(guest);
            Ok(())
        })?;

        tracing::info!(uid, draft_id, "Reservation guest details entered");
        Ok(draft)
    }

    /// Choose a table for a restaurant booking.
    pub fn select_table(
        &self,
        uid: &str,
        draft_id: &str,
        table: &str,
    ) -> Result<ReservationDraft, AppError> {
        let table = table.trim();
        if table.is_empty() {
            return Err(AppError::field("table", "Select a table to proceed"));
        }
        if !catalog::is_valid_table(table) {
            return Err(AppError::field("table", "Unknown table"));
        }

        let draft = self.modify(uid, draft_id, |draft| {
            draft
                .set_table(table.to_string())
                .map_err(|e| AppError::InvalidArgument(e.to_string()))
        })?;

        tracing::info!(uid, draft_id, table, "Reservation table selected");
        Ok(draft)
    }

    /// Complete the booking and send the confirmation email.
    ///
    /// The draft is consumed; a second confirm finds nothing. Mail and
    /// bookkeeping failures are logged and do not fail the booking.
    pub async fn confirm(
        &self,
        uid: &str,
        draft_id: &str,
    ) -> Result<ReservationConfirmation, AppError> {
        let now = Utc::now();

        let taken = self.drafts.remove_if(draft_id, |draft, expires_at| {
            now <= expires_at && draft.owner_uid == uid && draft.ready_to_confirm().is_ok()
        });

        let draft = match taken {
            Some((draft, _)) => draft,
            None => {
                // Report why the draft could not be taken.
                let draft = self.get(uid, draft_id)?;
                return Err(match draft.ready_to_confirm() {
                    Err(e) => AppError::InvalidArgument(e.to_string()),
                    Ok(_) => AppError::NotFound(DRAFT_NOT_FOUND.to_string()),
                });
            }
        };

        let email_sent = self.send_confirmation(&draft).await;
        self.record_email(&draft, now).await;

        tracing::info!(uid, reservation_id = %draft.id, kind = draft.kind.as_str(), email_sent, "Reservation confirmed");

        Ok(ReservationConfirmation {
            reservation_id: draft.id.clone(),
            email_sent,
            summary: draft,
        })
    }

    async fn send_confirmation(&self, draft: &ReservationDraft) -> bool {
        let Some(guest) = draft.guest.as_ref() else {
            return false;
        };

        let details = templates::ConfirmationDetails {
            full_name: &guest.full_name,
            venue: &draft.item_name,
            date: &draft.date,
            time: &draft.time,
            guests: draft.guests,
            table: draft.table.as_deref(),
            occasion: guest.occasion.as_deref(),
            special_request: guest.special_request.as_deref(),
            reservation_id: &draft.id,
        };
        let content = match draft.kind {
            ItemKind::Restaurant => templates::reservation_confirmation(&details),
            ItemKind::Event => templates::event_registration(&details),
        };
        let content = match content {
            Ok(content) => content,
            Err(e) => {
                tracing::warn!(reservation_id = %draft.id, error = %e, "Failed to render confirmation email");
                return false;
            }
        };

        match self
            .mailer
            .send(&OutgoingEmail::new(&guest.email, content))
            .await
        {
            Ok(()) => true,
            Err(e) => {
                tracing::warn!(reservation_id = %draft.id, error = %e, "Failed to send confirmation email");
                false
            }
        }
    }

    async fn record_email(&self, draft: &ReservationDraft, now: DateTime<Utc>) {
        let Some(guest) = draft.guest.as_ref() else {
            return;
        };

        let record = ReservationEmail {
            email: guest.email.clone(),
            full_name: guest.full_name.clone(),
            reservation_id: draft.id.clone(),
            user_id: draft.owner_uid.clone(),
            timestamp: format_utc_rfc3339(now),
        };
        if let Err(e) = self.db.add_reservation_email(&record).await {
            tracing::warn!(reservation_id = %draft.id, error = %e, "Failed to record reservation email");
        }
    }

    pub fn purge_expired(&self, now: DateTime<Utc>) -> usize {
        self.drafts.purge_expired(now)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::mail::LogMailer;

    fn service() -> (ReservationService, LogMailer) {
        let log = LogMailer::default();
        let service = ReservationService::new(FirestoreDb::new_mock(), Mailer::Log(log.clone()), 1800);
        (service, log)
    }

    fn slot() -> SlotSelection {
        SlotSelection {
            kind: ItemKind::Restaurant,
            id: "1".to_string(),
            date: Some("2026-05-01".to_string()),
            time: Some("7:00 PM".to_string()),
            guests: Some(4),
        }
    }

    fn guest() -> GuestDetails {
        GuestDetails {
            full_name: " Asha Rao ".to_string(),
            email: "asha@example.com".to_string(),
            phone_number: "+91 98765-43210".to_string(),
            occasion: Some("".to_string()),
            special_request: Some("Window seat".to_string()),
        }
    }

    #[test]
    fn test_phone_rules() {
        assert!(is_valid_phone("+91 98765 43210"));
        assert!(is_valid_phone("080-2345-6789"));
        assert!(!is_valid_phone("12345"));
        assert!(!is_valid_phone("+91 (987) 654"));
        assert!(!is_valid_phone("++919876543210"));
    }

    #[tokio::test]
    async fn test_full_restaurant_flow() {
        let (service, log) = service();

        let draft = service.start("u1", slot()).await.unwrap();
        assert_eq!(draft.item_name, "Spice Garden");
        assert_eq!(draft.id.len(), 32);

        let draft = service.set_guest_details("u1", &draft.id, guest()).unwrap();
        let g = draft.guest.as_ref().unwrap();
        assert_eq!(g.full_name, "Asha Rao");
        assert_eq!(g.occasion, None);

        let draft = service.select_table("u1", &draft.id, "S4").unwrap();
        assert_eq!(draft.step, DraftStep::TableChosen);

        let confirmation = service.confirm("u1", &draft.id).await.unwrap();
        assert!(confirmation.email_sent);
        assert_eq!(confirmation.summary.table.as_deref(), Some("S4"));

        let sent = log.sent().await;
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].subject, "Booking Confirmation - Spice Garden");

        // Consumed
        let err = service.confirm("u1", &draft.id).await.unwrap_err();
        assert_eq!(err.code(), "not-found");
    }

    #[tokio::test]
    async fn test_huge_draft_ttl_is_clamped() {
        let service = ReservationService::new(
            FirestoreDb::new_mock(),
            Mailer::Log(LogMailer::default()),
            i64::MAX,
        );
        let draft = service.start("u1", slot()).await.unwrap();
        assert!(service.get("u1", &draft.id).is_ok());
        assert_eq!(service.ttl, Duration::seconds(MAX_TTL_SECS));
    }

    #[tokio::test]
    async fn test_confirm_before_table_is_rejected() {
        let (service, _) = service();
        let draft = service.start("u1", slot()).await.unwrap();
        service.set_guest_details("u1", &draft.id, guest()).unwrap();

        let err = service.confirm("u1", &draft.id).await.unwrap_err();
        assert!(matches!(err, AppError::InvalidArgument(_)));
        // Draft survives a failed confirm
        assert!(service.get("u1", &draft.id).is_ok());
    }

    #[tokio::test]
    async fn test_drafts_are_private() {
        let (service, _) = service();
        let draft = service.start("u1", slot()).await.unwrap();

        assert_eq!(service.get("u2", &draft.id).unwrap_err().code(), "not-found");
        let err = service
            .set_guest_details("u2", &draft.id, guest())
            .unwrap_err();
        assert_eq!(err.code(), "not-found");
    }

    #[tokio::test]
    async fn test_slot_validation() {
        let (service, _) = service();
        let mut bad = slot();
        bad.date = Some("01/05/2026".to_string());
        bad.time = Some("3:00 PM".to_string());
        bad.guests = Some(0);

        let err = service.start("u1", bad).await.unwrap_err();
        let AppError::Validation(fields) = err else {
            panic!("expected validation error");
        };
        assert!(fields.contains_key("date"));
        assert!(fields.contains_key("time"));
        assert!(fields.contains_key("guests"));
    }

    #[tokio::test]
    async fn test_event_flow_skips_tables() {
        let (service, log) = service();
        let selection = SlotSelection {
            kind: ItemKind::Event,
            id: "2".to_string(),
            date: None,
            time: None,
            guests: None,
        };

        let draft = service.start("u1", selection).await.unwrap();
        assert_eq!(draft.date, "2024-03-25");
        assert_eq!(draft.guests, 1);

        service.set_guest_details("u1", &draft.id, guest()).unwrap();
        let err = service.select_table("u1", &draft.id, "G1").unwrap_err();
        assert!(matches!(err, AppError::InvalidArgument(_)));

        let confirmation = service.confirm("u1", &draft.id).await.unwrap();
        assert_eq!(confirmation.summary.table, None);
        assert_eq!(
            log.sent().await[0].subject,
            "Registration Confirmed - Cooking Masterclass"
        );
    }

    #[tokio::test]
    async fn test_guest_field_errors() {
        let (service, _) = service();
        let draft = service.start("u1", slot()).await.unwrap();

        let err = service
            .set_guest_details("u1", &draft.id, GuestDetails::default())
            .unwrap_err();
        let AppError::Validation(fields) = err else {
            panic!("expected validation error");
        };
        assert_eq!(fields["fullName"], "Full name is required");
        assert_eq!(fields["email"], "Email is required");
        assert_eq!(fields["phoneNumber"], "Phone number is required");
    }

    #[tokio::test]
    async fn test_unknown_item() {
        let (service, _) = service();
        let mut s = slot();
        s.id = "99".to_string();
        assert_eq!(service.start("u1", s).await.unwrap_err().code(), "not-found");
    }
}
