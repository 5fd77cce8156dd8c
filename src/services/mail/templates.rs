// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! HTML email bodies, rendered from `templates/email/*.html`.
//!
//! askama escapes every interpolated value in `.html` templates.

use crate::error::AppError;
use askama::Template;

/// Subject and HTML body of a message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmailContent {
    pub subject: String,
    pub html: String,
}

/// Values shown on a booking or registration confirmation.
#[derive(Debug, Clone)]
pub struct ConfirmationDetails<'a> {
    pub full_name: &'a str,
    pub venue: &'a str,
    pub date: &'a str,
    pub time: &'a str,
    pub guests: u32,
    pub table: Option<&'a str>,
    pub occasion: Option<&'a str>,
    pub special_request: Option<&'a str>,
    pub reservation_id: &'a str,
}

#[derive(Template)]
#[template(path = "email/otp.html")]
struct OtpTemplate<'a> {
    otp: &'a str,
    ttl_minutes: i64,
}

#[derive(Template)]
#[template(path = "email/welcome.html")]
struct WelcomeTemplate<'a> {
    name: &'a str,
}

#[derive(Template)]
#[template(path = "email/confirmation.html")]
struct ConfirmationTemplate<'a> {
    is_event: bool,
    name: &'a str,
    venue: &'a str,
    rows: Vec<(&'static str, String)>,
}

fn render(template: &impl Template) -> Result<String, AppError> {
    template
        .render()
        .map_err(|e| AppError::Internal(anyhow::anyhow!("Email template render failed: {e}")))
}

pub fn otp_email(otp: &str, ttl_minutes: i64) -> Result<EmailContent, AppError> {
    Ok(EmailContent {
        subject: "Your DineInGo Verification Code".to_string(),
        html: render(&OtpTemplate { otp, ttl_minutes })?,
    })
}

pub fn welcome_email(display_name: Option<&str>) -> Result<EmailContent, AppError> {
    let name = display_name
        .map(str::trim)
        .filter(|n| !n.is_empty())
        .unwrap_or("Valued Customer");

    Ok(EmailContent {
        subject: "Welcome to DineInGo!".to_string(),
        html: render(&WelcomeTemplate { name })?,
    })
}

fn detail_rows(details: &ConfirmationDetails<'_>) -> Vec<(&'static str, String)> {
    let mut rows = vec![
        ("Date", details.date.to_string()),
        ("Time", details.time.to_string()),
        ("Number of Guests", details.guests.to_string()),
    ];
    if let Some(table) = details.table {
        rows.push(("Table", table.to_string()));
    }
    if let Some(occasion) = details.occasion.filter(|o| !o.is_empty()) {
        rows.push(("Occasion", occasion.to_string()));
    }
    if let Some(request) = details.special_request.filter(|r| !r.is_empty()) {
        rows.push(("Special Request", request.to_string()));
    }
    rows.push(("Reservation ID", details.reservation_id.to_string()));
    rows
}

fn confirmation_html(is_event: bool, details: &ConfirmationDetails<'_>) -> Result<String, AppError> {
    render(&ConfirmationTemplate {
        is_event,
        name: details.full_name,
        venue: details.venue,
        rows: detail_rows(details),
    })
}

pub fn reservation_confirmation(
    details: &ConfirmationDetails<'_>,
) -> Result<EmailContent, AppError> {
    Ok(EmailContent {
        subject: format!("Booking Confirmation - {}", details.venue),
        html: confirmation_html(false, details)?,
    })
}

pub fn event_registration(details: &ConfirmationDetails<'_>) -> Result<EmailContent, AppError> {
    Ok(EmailContent {
        subject: format!("Registration Confirmed - {}", details.venue),
        html: confirmation_html(true, details)?,
    })
}
