//! Email provider implementations.
//!
//! This module contains the `EmailProvider` trait and the HTTP email API
//! client used to deliver alerts.

mod resend;

pub use resend::ResendProvider;

use crate::error::NotificationResult;
use async_trait::async_trait;

/// What a single delivery attempt did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeliveryOutcome {
    /// The API accepted the email.
    Sent {
        /// Provider-specific message ID for tracking.
        message_id: Option<String>,
    },
    /// Delivery is not configured; no request was made.
    Skipped,
}

/// Email content ready for sending.
#[derive(Debug, Clone, Default)]
pub struct EmailContent {
    /// Sender email address.
    pub from_email: String,
    /// Recipient email address.
    pub to_email: String,
    /// Email subject.
    pub subject: String,
    /// Plain text body content.
    pub text_body: String,
    /// HTML body content.
    pub html_body: String,
}

/// Trait for email sending providers.
///
/// `send` performs exactly one attempt. Retrying is the caller's job.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait EmailProvider: Send + Sync {
    /// Send an email once.
    async fn send(&self, email: &EmailContent) -> NotificationResult<DeliveryOutcome>;

    /// Get the provider name for logging.
    fn name(&self) -> &'static str;
}
