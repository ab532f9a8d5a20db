//! Auth Alerts Domain
//!
//! Sends an email alert whenever a user signs in or signs up.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────┐
//! │ Auth Handler    │  ← Builds an AuthEvent
//! └────────┬────────┘
//!          │
//! ┌────────▼────────┐
//! │ AlertDispatcher │  ← Renders once, retries with linear backoff
//! └────────┬────────┘
//!          │
//! ┌────────▼────────┐
//! │ Email Provider  │  ← One HTTP request per attempt (Resend)
//! └─────────────────┘
//! ```
//!
//! # Usage
//!
//! ```rust,ignore
//! use core_config::{AlertEmailConfig, FromEnv};
//! use domain_auth_alerts::{AuthAlertDispatcher, AuthEvent, AuthEventType};
//!
//! let dispatcher = AuthAlertDispatcher::from_config(&AlertEmailConfig::from_env()?)?;
//! let event = AuthEvent::new(AuthEventType::Login, "Ada", "ada@example.com", "u_42")
//!     .with_ip_address("203.0.113.7");
//!
//! // Errors only after every attempt failed; the caller decides whether that matters.
//! if let Err(e) = dispatcher.dispatch(&event).await {
//!     tracing::error!(error = %e, "Auth alert was not delivered");
//! }
//! ```

pub mod dispatcher;
pub mod error;
pub mod models;
pub mod providers;
pub mod retry;
pub mod templates;

// Re-export commonly used types
pub use dispatcher::{AlertRecipients, AuthAlertDispatcher, DispatchOutcome};
pub use error::{NotificationError, NotificationResult};
pub use models::{AuthEvent, AuthEventType};
pub use providers::{DeliveryOutcome, EmailContent, EmailProvider, ResendProvider};
pub use retry::RetryPolicy;
pub use templates::{AlertRenderer, RenderedAlert};
