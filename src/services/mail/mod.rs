// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Outgoing email.
//!
//! Handles:
//! - Delivery through a transactional mail HTTP API
//! - A logging fallback (with an inspectable outbox) when no API key is set

pub mod templates;

use crate::config::Config;
use crate::error::AppError;
use anyhow::Context;
use serde::Serialize;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Mutex;

/// Upper bound on a single mail API call, connect through response body.
const MAIL_HTTP_TIMEOUT: Duration = Duration::from_secs(10);

/// A rendered message ready to send.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutgoingEmail {
    pub to: String,
    pub subject: String,
    pub html: String,
}

impl OutgoingEmail {
    pub fn new(to: &str, content: templates::EmailContent) -> Self {
        Self {
            to: to.to_string(),
            subject: content.subject,
            html: content.html,
        }
    }
}

/// Mail delivery backend.
#[derive(Clone)]
pub enum Mailer {
    Http(HttpMailer),
    Log(LogMailer),
}

impl Mailer {
    /// HTTP delivery when an API key is configured, logging otherwise.
    pub fn from_config(config: &Config) -> anyhow::Result<Self> {
        match &config.mail_api_key {
            Some(key) => Ok(Mailer::Http(HttpMailer::new(
                config.mail_api_url.clone(),
                key.clone(),
                config.mail_from.clone(),
            )?)),
            None => {
                tracing::warn!("MAIL_API_KEY not set; outgoing mail will only be logged");
                Ok(Mailer::Log(LogMailer::default()))
            }
        }
    }

    pub async fn send(&self, email: &OutgoingEmail) -> Result<(), AppError> {
        match self {
            Mailer::Http(mailer) => mailer.send(email).await,
            Mailer::Log(mailer) => {
                mailer.send(email).await;
                Ok(())
            }
        }
    }
}

/// Request body for the mail API.
#[derive(Serialize)]
struct SendRequest<'a> {
    from: &'a str,
    to: [&'a str; 1],
    subject: &'a str,
    html: &'a str,
}

/// Client for a Resend-style `POST /emails` JSON API.
#[derive(Clone)]
pub struct HttpMailer {
    http: reqwest::Client,
    api_url: String,
    api_key: String,
    from: String,
}

impl HttpMailer {
    pub fn new(api_url: String, api_key: String, from: String) -> anyhow::Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(MAIL_HTTP_TIMEOUT)
            .build()
            .context("failed building mail HTTP client")?;

        Ok(Self {
            http,
            api_url,
            api_key,
            from,
        })
    }

    pub async fn send(&self, email: &OutgoingEmail) -> Result<(), AppError> {
        let body = SendRequest {
            from: &self.from,
            to: [&email.to],
            subject: &email.subject,
            html: &email.html,
        };

        let response = self
            .http
            .post(&self.api_url)
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| AppError::Mail(e.to_string()))?;

        if !response.status().is_success() {
            let status = response.status();
            let text = response.text().await.unwrap_or_default();
            return Err(AppError::Mail(format!("HTTP {}: {}", status, text)));
        }

        tracing::info!(to = %email.to, subject = %email.subject, "Email sent");
        Ok(())
    }
}

/// Records messages instead of sending them.
#[derive(Clone, Default)]
pub struct LogMailer {
    outbox: Arc<Mutex<Vec<OutgoingEmail>>>,
}

impl LogMailer {
    pub async fn send(&self, email: &OutgoingEmail) {
        // Bodies may carry codes; only the envelope is logged.
        tracing::info!(to = %email.to, subject = %email.subject, "Email logged (not sent)");
        self.outbox.lock().await.push(email.clone());
    }

    /// Everything "sent" so far, oldest first.
    pub async fn sent(&self) -> Vec<OutgoingEmail> {
        self.outbox.lock().await.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_log_mailer_keeps_outbox() {
        let log = LogMailer::default();
        let mailer = Mailer::Log(log.clone());

        let email = OutgoingEmail::new("a@example.com", templates::welcome_email(None).unwrap());
        mailer.send(&email).await.unwrap();

        let sent = log.sent().await;
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].subject, "Welcome to DineInGo!");
    }

    #[tokio::test]
    async fn test_http_mailer_unreachable_is_mail_error() {
        // Port 9 (discard) on loopback is not listening in test environments.
        let mailer = HttpMailer::new(
            "http://127.0.0.1:9/emails".to_string(),
            "key".to_string(),
            "test@example.com".to_string(),
        )
        .unwrap();
        let email = OutgoingEmail::new("a@example.com", templates::otp_email("123456", 5).unwrap());
        let err = mailer.send(&email).await.unwrap_err();
        assert!(matches!(err, AppError::Mail(_)));
    }

    #[test]
    fn test_from_config_without_key_logs() {
        let config = Config::test_default();
        assert!(matches!(Mailer::from_config(&config).unwrap(), Mailer::Log(_)));
    }

    #[tokio::test]
    async fn test_http_mailer_stalled_api_times_out() {
        // Accepts the connection but never answers.
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let server = tokio::spawn(async move {
            let (_socket, _) = listener.accept().await.unwrap();
            tokio::time::sleep(MAIL_HTTP_TIMEOUT * 3).await;
        });

        let mailer = HttpMailer::new(
            format!("http://{addr}/emails"),
            "key".to_string(),
            "test@example.com".to_string(),
        )
        .unwrap();
        let email = OutgoingEmail::new("a@example.com", templates::welcome_email(None).unwrap());

        let started = std::time::Instant::now();
        let err = mailer.send(&email).await.unwrap_err();
        assert!(matches!(err, AppError::Mail(_)));
        assert!(started.elapsed() < MAIL_HTTP_TIMEOUT * 2);
        server.abort();
    }
}
