//! Data models for the auth alerts domain.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::str::FromStr;

use crate::error::NotificationError;

/// Which authentication action occurred.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum AuthEventType {
    /// An existing user signed in.
    Login,
    /// A new account was created.
    Signup,
}

impl AuthEventType {
    /// Human-readable label used in rendered alerts.
    pub fn label(&self) -> &'static str {
        match self {
            AuthEventType::Login => "User Login",
            AuthEventType::Signup => "New User Signup",
        }
    }
}

impl std::fmt::Display for AuthEventType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AuthEventType::Login => write!(f, "login"),
            AuthEventType::Signup => write!(f, "signup"),
        }
    }
}

impl FromStr for AuthEventType {
    type Err = NotificationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "login" | "signin" | "sign-in" => Ok(AuthEventType::Login),
            "signup" | "sign-up" => Ok(AuthEventType::Signup),
            other => Err(NotificationError::InvalidInput(format!(
                "unknown auth event type: {other}"
            ))),
        }
    }
}

/// An authentication event to alert on.
///
/// Field values are taken as supplied by the caller; nothing here is
/// validated. The dispatcher only borrows the event.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct AuthEvent {
    pub event_type: AuthEventType,
    pub name: String,
    pub email: String,
    pub user_id: String,
    pub occurred_at: DateTime<Utc>,
    pub ip_address: Option<String>,
    pub user_agent: Option<String>,
}

impl AuthEvent {
    /// Create an event stamped with the current time.
    pub fn new(
        event_type: AuthEventType,
        name: impl Into<String>,
        email: impl Into<String>,
        user_id: impl Into<String>,
    ) -> Self {
        Self {
            event_type,
            name: name.into(),
            email: email.into(),
            user_id: user_id.into(),
            occurred_at: Utc::now(),
            ip_address: None,
            user_agent: None,
        }
    }

    pub fn with_occurred_at(mut self, occurred_at: DateTime<Utc>) -> Self {
        self.occurred_at = occurred_at;
        self
    }

    pub fn with_ip_address(mut self, ip_address: impl Into<String>) -> Self {
        self.ip_address = Some(ip_address.into());
        self
    }

    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = Some(user_agent.into());
        self
    }
}
