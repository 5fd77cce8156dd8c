// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@kernel.org>

//! Reservation draft: the booking state carried between flow steps.
//!
//! Restaurant drafts go slot -> guest details -> table -> confirm.
//! Event drafts skip the table step.

use crate::models::ItemKind;
use serde::{Deserialize, Serialize};
#[cfg(feature = "binding-generation")]
use ts_rs::TS;

/// First step: what, when, and for how many.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SlotSelection {
    #[serde(rename = "type", default)]
    pub kind: ItemKind,
    pub id: String,
    /// YYYY-MM-DD; ignored for events
    #[serde(default)]
    pub date: Option<String>,
    /// One of the restaurant's time slots; ignored for events
    #[serde(default)]
    pub time: Option<String>,
    #[serde(default)]
    pub guests: Option<u32>,
}

/// Contact form.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct GuestDetails {
    #[serde(default)]
    pub full_name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub phone_number: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub occasion: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub special_request: Option<String>,
}

/// Last completed step.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub enum DraftStep {
    SlotChosen,
    DetailsEntered,
    TableChosen,
}

/// Booking in progress.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct ReservationDraft {
    pub id: String,
    #[serde(skip)]
    pub owner_uid: String,
    #[serde(rename = "type")]
    pub kind: ItemKind,
    pub item_id: String,
    pub item_name: String,
    pub date: String,
    pub time: String,
    pub guests: u32,
    pub guest: Option<GuestDetails>,
    pub table: Option<String>,
    pub step: DraftStep,
    pub created_at: String,
}

/// Confirmation email record at `reservation_emails/{reservation_id}`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReservationEmail {
    pub email: String,
    pub full_name: String,
    pub reservation_id: String,
    /// Owner; matched by account cleanup
    pub user_id: String,
    pub timestamp: String,
}

/// Step ordering violations.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DraftError {
    #[error("Guest details must be entered first")]
    DetailsMissing,

    #[error("Tables are only selected for restaurant reservations")]
    NoTablesForEvents,

    #[error("Select a table to proceed")]
    TableMissing,
}

impl ReservationDraft {
    /// Record the contact form. May be repeated to edit details.
    pub fn set_guest(&mut self, guest: GuestDetails) {
        self.guest = Some(guest);
        if self.step == DraftStep::SlotChosen {
            self.step = DraftStep::DetailsEntered;
        }
    }

    /// Choose a table. The caller checks the table exists.
    pub fn set_table(&mut self, table: String) -> Result<(), DraftError> {
        if self.kind == ItemKind::Event {
            return Err(DraftError::NoTablesForEvents);
        }
        if self.guest.is_none() {
            return Err(DraftError::DetailsMissing);
        }
        self.table = Some(table);
        self.step = DraftStep::TableChosen;
        Ok(())
    }

    /// Check that every step the draft's kind needs is done.
    pub fn ready_to_confirm(&self) -> Result<&GuestDetails, DraftError> {
        let guest = self.guest.as_ref().ok_or(DraftError::DetailsMissing)?;
        if self.kind == ItemKind::Restaurant && self.table.is_none() {
            return Err(DraftError::TableMissing);
        }
        Ok(guest)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn draft(kind: ItemKind) -> ReservationDraft {
        ReservationDraft {
            id: "d1".to_string(),
            owner_uid: "u1".to_string(),
            kind,
            item_id: "1".to_string(),
            item_name: "Spice Garden".to_string(),
            date: "2026-05-01".to_string(),
            time: "7:00 PM".to_string(),
            guests: 2,
            guest: None,
            table: None,
            step: DraftStep::SlotChosen,
            created_at: "2026-04-30T10:00:00Z".to_string(),
        }
    }

    fn guest() -> GuestDetails {
        GuestDetails {
            full_name: "Asha Rao".to_string(),
            email: "asha@example.com".to_string(),
            phone_number: "+91 98765 43210".to_string(),
            occasion: Some("birthday".to_string()),
            special_request: None,
        }
    }

    #[test]
    fn test_restaurant_flow_requires_table() {
        let mut d = draft(ItemKind::Restaurant);
        assert_eq!(d.set_table("G1".to_string()), Err(DraftError::DetailsMissing));

        d.set_guest(guest());
        assert_eq!(d.step, DraftStep::DetailsEntered);
        assert_eq!(d.ready_to_confirm().unwrap_err(), DraftError::TableMissing);

        d.set_table("G1".to_string()).unwrap();
        assert_eq!(d.step, DraftStep::TableChosen);
        assert!(d.ready_to_confirm().is_ok());
    }

    #[test]
    fn test_editing_details_keeps_table() {
        let mut d = draft(ItemKind::Restaurant);
        d.set_guest(guest());
        d.set_table("F3".to_string()).unwrap();

        let mut edited = guest();
        edited.special_request = Some("Window seat".to_string());
        d.set_guest(edited);

        assert_eq!(d.step, DraftStep::TableChosen);
        assert_eq!(d.table.as_deref(), Some("F3"));
    }

    #[test]
    fn test_event_flow_has_no_table_step() {
        let mut d = draft(ItemKind::Event);
        d.set_guest(guest());
        assert_eq!(
            d.set_table("G1".to_string()),
            Err(DraftError::NoTablesForEvents)
        );
        assert!(d.ready_to_confirm().is_ok());
    }
}
