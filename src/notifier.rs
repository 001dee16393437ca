// SPDX-FileCopyrightText: 2025 Hyperpolymath
// SPDX-License-Identifier: PMPL-1.0-or-later

//! Delivery of accepted contact submissions.
//!
//! Two notifiers are provided:
//!
//! - [`LogNotifier`] writes the submission to the service log.
//! - [`EmailNotifier`] sends it through a Resend-compatible transactional
//!   email API to a fixed recipient.

use crate::config::{ConfigError, NotifierConfig, NotifierKind};
use crate::models::{ContactSubmission, Locale};
use crate::template;
use async_trait::async_trait;
use serde::Serialize;
use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, info};

/// Notification failures.
#[derive(Debug, Error)]
pub enum NotifyError {
    #[error("Email transport error: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("Email provider rejected message with status {status}: {body}")]
    Rejected { status: u16, body: String },
}

/// Receives every submission that passes validation.
#[async_trait]
pub trait Notifier: Send + Sync {
    async fn notify(&self, submission: &ContactSubmission) -> Result<(), NotifyError>;
}

/// Build the notifier selected by configuration.
pub fn from_config(config: &NotifierConfig) -> Result<Arc<dyn Notifier>, ConfigError> {
    match config.kind {
        NotifierKind::Log => Ok(Arc::new(LogNotifier)),
        NotifierKind::Email => Ok(Arc::new(EmailNotifier::new(config)?)),
    }
}

/// Writes submissions to the service log.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogNotifier;

#[async_trait]
impl Notifier for LogNotifier {
    async fn notify(&self, submission: &ContactSubmission) -> Result<(), NotifyError> {
        info!(
            inquiry_type = %submission.type_label,
            name = %submission.name,
            email = %submission.email,
            company = %submission.company_or_dash(),
            message = %submission.message,
            "New contact submission"
        );
        Ok(())
    }
}

/// Request body of the transactional email API.
#[derive(Debug, Serialize)]
struct OutgoingEmail<'a> {
    from: &'a str,
    to: [&'a str; 1],
    reply_to: &'a str,
    subject: String,
    text: String,
}

/// Sends submissions as email through a transactional email API.
#[derive(Debug, Clone)]
pub struct EmailNotifier {
    client: reqwest::Client,
    endpoint: String,
    api_key: String,
    sender: String,
    recipient: String,
    locale: Locale,
}

impl EmailNotifier {
    /// Create an email notifier. Fails when no API key is configured.
    pub fn new(config: &NotifierConfig) -> Result<Self, ConfigError> {
        let api_key = config
            .api_key
            .clone()
            .ok_or(ConfigError::MissingValue("RESEND_API_KEY"))?;

        let client = reqwest::Client::builder()
            .timeout(config.timeout())
            .build()?;

        Ok(Self {
            client,
            endpoint: format!("{}/emails", config.api_base.trim_end_matches('/')),
            api_key,
            sender: config.sender.clone(),
            recipient: config.recipient.clone(),
            locale: config.locale,
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

#[async_trait]
impl Notifier for EmailNotifier {
    async fn notify(&self, submission: &ContactSubmission) -> Result<(), NotifyError> {
        let content = template::render(self.locale, submission);
        let email = OutgoingEmail {
            from: &self.sender,
            to: [self.recipient.as_str()],
            reply_to: &submission.email,
            subject: content.subject,
            text: content.text,
        };

        let response = self
            .client
            .post(&self.endpoint)
            .bearer_auth(&self.api_key)
            .json(&email)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(NotifyError::Rejected {
                status: status.as_u16(),
                body,
            });
        }

        debug!(recipient = %self.recipient, "Notification email sent");
        Ok(())
    }
}
