//! Resend email provider implementation.

use super::{DeliveryOutcome, EmailContent, EmailProvider};
use crate::error::{NotificationError, NotificationResult};
use async_trait::async_trait;
use core_config::AlertEmailConfig;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{debug, info};

/// Resend API configuration.
#[derive(Clone)]
pub struct ResendConfig {
    /// API key. `None` turns every send into a no-op.
    pub api_key: Option<String>,
    /// API base URL (defaults to production).
    pub api_url: String,
    /// Timeout for a single request.
    pub timeout: Duration,
}

impl ResendConfig {
    pub fn new(api_key: Option<String>) -> Self {
        Self {
            api_key,
            api_url: core_config::email::DEFAULT_API_URL.to_string(),
            timeout: Duration::from_secs(core_config::email::DEFAULT_REQUEST_TIMEOUT_SECS),
        }
    }

    pub fn with_api_url(mut self, api_url: impl Into<String>) -> Self {
        self.api_url = api_url.into();
        self
    }
}

impl From<&AlertEmailConfig> for ResendConfig {
    fn from(config: &AlertEmailConfig) -> Self {
        Self {
            api_key: config.api_key.clone(),
            api_url: config.api_url.clone(),
            timeout: Duration::from_secs(config.request_timeout_secs),
        }
    }
}

impl std::fmt::Debug for ResendConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ResendConfig")
            .field("api_key", &self.api_key.as_ref().map(|_| "<redacted>"))
            .field("api_url", &self.api_url)
            .field("timeout", &self.timeout)
            .finish()
    }
}

/// Resend email provider.
#[derive(Debug)]
pub struct ResendProvider {
    config: ResendConfig,
    client: Client,
}

impl ResendProvider {
    /// Create a new Resend provider.
    pub fn new(config: ResendConfig) -> NotificationResult<Self> {
        let client = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| NotificationError::ConfigError(format!("HTTP client: {}", e)))?;

        Ok(Self { config, client })
    }

    /// Whether an API key is configured.
    pub fn is_configured(&self) -> bool {
        self.config.api_key.is_some()
    }

    fn endpoint(&self) -> String {
        format!("{}/emails", self.config.api_url.trim_end_matches('/'))
    }
}

// Resend API request/response structures

#[derive(Debug, Serialize)]
struct SendEmailRequest<'a> {
    from: &'a str,
    to: [&'a str; 1],
    subject: &'a str,
    text: &'a str,
    html: &'a str,
}

#[derive(Debug, Deserialize)]
struct SendEmailResponse {
    id: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ResendErrorBody {
    message: String,
    name: Option<String>,
}

/// Pull the human-readable message out of an error body, if it is Resend's JSON shape.
fn error_detail(body: &str) -> String {
    match serde_json::from_str::<ResendErrorBody>(body) {
        Ok(err) => match err.name {
            Some(name) => format!("{}: {}", name, err.message),
            None => err.message,
        },
        Err(_) if body.trim().is_empty() => "<empty response body>".to_string(),
        Err(_) => body.to_string(),
    }
}

#[async_trait]
impl EmailProvider for ResendProvider {
    async fn send(&self, email: &EmailContent) -> NotificationResult<DeliveryOutcome> {
        let Some(api_key) = self.config.api_key.as_deref() else {
            return Ok(DeliveryOutcome::Skipped);
        };

        let request = SendEmailRequest {
            from: &email.from_email,
            to: [&email.to_email],
            subject: &email.subject,
            text: &email.text_body,
            html: &email.html_body,
        };

        debug!(
            to = %email.to_email,
            subject = %email.subject,
            "Sending email via Resend"
        );

        let response = self
            .client
            .post(self.endpoint())
            .bearer_auth(api_key)
            .json(&request)
            .send()
            .await?;

        let status = response.status();

        if status.is_success() {
            // The body only carries the message id; a malformed one is not a failed delivery.
            let message_id = response
                .json::<SendEmailResponse>()
                .await
                .ok()
                .and_then(|body| body.id);

            info!(
                to = %email.to_email,
                message_id = ?message_id,
                "Email accepted by Resend"
            );
            Ok(DeliveryOutcome::Sent { message_id })
        } else {
            let body = response.text().await.unwrap_or_default();
            Err(NotificationError::DeliveryFailed {
                status: status.as_u16(),
                detail: error_detail(&body),
            })
        }
    }

    fn name(&self) -> &'static str {
        "Resend"
    }
}
