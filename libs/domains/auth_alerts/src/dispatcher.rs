//! Retrying dispatcher for authentication alerts.
//!
//! One dispatch call renders the alert once, then runs a bounded loop of
//! delivery attempts with linear backoff between failures. Only the error of
//! the final attempt leaves this module; earlier failures are logged and
//! retried. An unconfigured provider short-circuits to
//! [`DispatchOutcome::Skipped`] without retrying.
//!
//! No cancellation token is threaded through. The future is safe to drop at
//! either await point (the HTTP call or the backoff sleep), so an outer
//! `tokio::time::timeout` abandons the remaining attempts. Callers that want
//! the retries to keep running past their own deadline should
//! `tokio::spawn` the dispatch instead.

use std::sync::Arc;

use core_config::AlertEmailConfig;
use observability::{AlertMetrics, DispatchResultLabel};
use tokio::time::Instant;
use tracing::{error, info, instrument, warn};

use crate::error::{NotificationError, NotificationResult};
use crate::models::AuthEvent;
use crate::providers::{DeliveryOutcome, EmailContent, EmailProvider, ResendProvider};
use crate::retry::RetryPolicy;
use crate::templates::AlertRenderer;

/// Result of a dispatch call that did not fail.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DispatchOutcome {
    /// The alert was accepted on attempt `attempts`.
    Delivered {
        attempts: u32,
        message_id: Option<String>,
    },
    /// Delivery is not configured; nothing was sent.
    Skipped,
}

/// Sender and recipient of alert emails.
#[derive(Debug, Clone)]
pub struct AlertRecipients {
    pub from_email: String,
    pub to_email: String,
}

/// Renders auth events and delivers them with bounded retries.
pub struct AuthAlertDispatcher<P: EmailProvider> {
    provider: Arc<P>,
    renderer: AlertRenderer,
    recipients: AlertRecipients,
    policy: RetryPolicy,
}

impl<P: EmailProvider + 'static> AuthAlertDispatcher<P> {
    /// Create a new dispatcher.
    pub fn new(
        provider: P,
        renderer: AlertRenderer,
        recipients: AlertRecipients,
        policy: RetryPolicy,
    ) -> Self {
        Self {
            provider: Arc::new(provider),
            renderer,
            recipients,
            policy,
        }
    }

    /// Default retry policy used by [`dispatch`](Self::dispatch).
    pub fn policy(&self) -> RetryPolicy {
        self.policy
    }

    /// Get a reference to the email provider.
    pub fn provider(&self) -> &P {
        &self.provider
    }

    /// Dispatch with the default attempt budget.
    pub async fn dispatch(&self, event: &AuthEvent) -> NotificationResult<DispatchOutcome> {
        self.dispatch_with_attempts(event, None).await
    }

    /// Dispatch, optionally overriding the attempt budget for this call.
    ///
    /// Returns the last attempt's error once every attempt has failed.
    #[instrument(
        skip(self, event),
        fields(event_type = %event.event_type, user_id = %event.user_id)
    )]
    pub async fn dispatch_with_attempts(
        &self,
        event: &AuthEvent,
        max_attempts: Option<u32>,
    ) -> NotificationResult<DispatchOutcome> {
        let policy = match max_attempts {
            Some(n) => self.policy.with_max_attempts(n),
            None => self.policy,
        };
        let max_attempts = policy.max_attempts();
        let started = Instant::now();

        let rendered = self.renderer.render(event)?;
        let email = EmailContent {
            from_email: self.recipients.from_email.clone(),
            to_email: self.recipients.to_email.clone(),
            subject: rendered.subject,
            text_body: rendered.text,
            html_body: rendered.html,
        };

        let mut last_error = None;

        for attempt in 1..=max_attempts {
            match self.provider.send(&email).await {
                Ok(DeliveryOutcome::Sent { message_id }) => {
                    AlertMetrics::record_attempt(true);
                    AlertMetrics::record_dispatch(
                        DispatchResultLabel::Delivered,
                        elapsed_ms(started),
                    );
                    info!(
                        attempt,
                        max_attempts,
                        provider = self.provider.name(),
                        message_id = ?message_id,
                        "Auth alert delivered"
                    );
                    return Ok(DispatchOutcome::Delivered {
                        attempts: attempt,
                        message_id,
                    });
                }
                Ok(DeliveryOutcome::Skipped) => {
                    AlertMetrics::record_dispatch(DispatchResultLabel::Skipped, elapsed_ms(started));
                    warn!(
                        provider = self.provider.name(),
                        "Email delivery is not configured (no API key), skipping auth alert"
                    );
                    return Ok(DispatchOutcome::Skipped);
                }
                Err(e) => {
                    AlertMetrics::record_attempt(false);
                    error!(
                        attempt,
                        max_attempts,
                        provider = self.provider.name(),
                        status = ?e.status(),
                        error = %e,
                        "Auth alert delivery attempt failed"
                    );

                    if attempt < max_attempts {
                        tokio::time::sleep(policy.delay_after(attempt)).await;
                    }
                    last_error = Some(e);
                }
            }
        }

        AlertMetrics::record_dispatch(DispatchResultLabel::Failed, elapsed_ms(started));
        error!(max_attempts, "Auth alert delivery failed, attempts exhausted");

        Err(last_error.unwrap_or_else(|| {
            NotificationError::Internal("dispatch finished without an attempt".to_string())
        }))
    }
}

impl AuthAlertDispatcher<ResendProvider> {
    /// Build a Resend-backed dispatcher from resolved configuration.
    ///
    /// Fails when an API key is set but no recipient is, since every
    /// attempt would then be rejected.
    pub fn from_config(config: &AlertEmailConfig) -> NotificationResult<Self> {
        let to_email = match (&config.api_key, &config.to_email) {
            (_, Some(to)) => to.clone(),
            (None, None) => String::new(),
            (Some(_), None) => {
                return Err(NotificationError::ConfigError(
                    "ALERT_TO_EMAIL is required when RESEND_API_KEY is set".to_string(),
                ));
            }
        };

        let provider = ResendProvider::new(config.into())?;
        let recipients = AlertRecipients {
            from_email: config.from_email.clone(),
            to_email,
        };

        Ok(Self::new(
            provider,
            AlertRenderer::new()?,
            recipients,
            RetryPolicy::from(config),
        ))
    }
}

impl<P: EmailProvider> Clone for AuthAlertDispatcher<P> {
    fn clone(&self) -> Self {
        Self {
            provider: Arc::clone(&self.provider),
            renderer: self.renderer.clone(),
            recipients: self.recipients.clone(),
            policy: self.policy,
        }
    }
}

fn elapsed_ms(started: Instant) -> u64 {
    started.elapsed().as_millis() as u64
}
