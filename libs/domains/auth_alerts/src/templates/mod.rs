//! Alert template rendering.
//!
//! Renders an [`AuthEvent`] into a plain-text body and an HTML body using
//! Handlebars. The HTML template goes through [`escape_html`] for every
//! interpolated field; the text template uses raw `{{{ }}}` interpolation so
//! values appear exactly as supplied.

use crate::error::NotificationResult;
use crate::models::AuthEvent;
use handlebars::Handlebars;
use serde::Serialize;
use std::sync::Arc;
use tracing::debug;

/// Subject line shared by every auth alert.
pub const ALERT_SUBJECT: &str = "Authentication Alert";

/// Shown in place of an absent IP address or user agent.
pub const UNAVAILABLE: &str = "Unavailable";

const HTML_TEMPLATE_NAME: &str = "auth_alert_html";
const TEXT_TEMPLATE_NAME: &str = "auth_alert_text";

/// Rendered alert content.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedAlert {
    /// Email subject line.
    pub subject: String,
    /// Plain text body content.
    pub text: String,
    /// HTML body content.
    pub html: String,
}

/// Escape the five markup-significant characters.
pub fn escape_html(input: &str) -> String {
    let mut escaped = String::with_capacity(input.len());
    for ch in input.chars() {
        match ch {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(ch),
        }
    }
    escaped
}

/// Values handed to the templates. Every row is always present.
#[derive(Debug, Serialize)]
struct AlertTemplateData<'a> {
    event_label: &'static str,
    name: &'a str,
    email: &'a str,
    user_id: &'a str,
    occurred_at: String,
    ip_address: &'a str,
    user_agent: &'a str,
}

impl<'a> AlertTemplateData<'a> {
    fn from_event(event: &'a AuthEvent) -> Self {
        Self {
            event_label: event.event_type.label(),
            name: &event.name,
            email: &event.email,
            user_id: &event.user_id,
            occurred_at: event.occurred_at.format("%Y-%m-%d %H:%M:%S UTC").to_string(),
            ip_address: event.ip_address.as_deref().unwrap_or(UNAVAILABLE),
            user_agent: event.user_agent.as_deref().unwrap_or(UNAVAILABLE),
        }
    }
}

/// Renders auth alerts from registered Handlebars templates.
#[derive(Clone)]
pub struct AlertRenderer {
    handlebars: Arc<Handlebars<'static>>,
}

impl AlertRenderer {
    /// Create a renderer with both alert templates registered.
    pub fn new() -> NotificationResult<Self> {
        let mut handlebars = Handlebars::new();
        handlebars.register_escape_fn(escape_html);
        handlebars.register_template_string(HTML_TEMPLATE_NAME, AUTH_ALERT_HTML_TEMPLATE)?;
        handlebars.register_template_string(TEXT_TEMPLATE_NAME, AUTH_ALERT_TEXT_TEMPLATE)?;

        Ok(Self {
            handlebars: Arc::new(handlebars),
        })
    }

    /// Render the subject, text and HTML bodies for one event.
    pub fn render(&self, event: &AuthEvent) -> NotificationResult<RenderedAlert> {
        debug!(
            event_type = %event.event_type,
            user_id = %event.user_id,
            "Rendering auth alert"
        );

        let data = AlertTemplateData::from_event(event);
        let html = self.handlebars.render(HTML_TEMPLATE_NAME, &data)?;
        let text = self.handlebars.render(TEXT_TEMPLATE_NAME, &data)?;

        Ok(RenderedAlert {
            subject: ALERT_SUBJECT.to_string(),
            text,
            html,
        })
    }
}

impl std::fmt::Debug for AlertRenderer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AlertRenderer").finish_non_exhaustive()
    }
}

// ============================================================================
// Alert Templates
// ============================================================================

const AUTH_ALERT_HTML_TEMPLATE: &str = r#"<!DOCTYPE html>
<html lang="en">
<head>
  <meta charset="UTF-8">
  <title>Authentication Alert</title>
</head>
<body style="margin: 0; padding: 0; font-family: -apple-system, BlinkMacSystemFont, 'Segoe UI', Roboto, sans-serif; background-color: #f4f4f5;">
  <table role="presentation" width="100%" cellspacing="0" cellpadding="0" style="max-width: 600px; margin: 0 auto; padding: 40px 20px;">
    <tr>
      <td style="background-color: #ffffff; border-radius: 8px; padding: 32px;">
        <h1 style="color: #18181b; font-size: 20px; font-weight: 600; margin: 0 0 24px 0;">
          {{event_label}}
        </h1>
        <table width="100%" cellspacing="0" cellpadding="0" style="font-size: 14px; color: #52525b;">
          <tr><td style="padding: 6px 0; width: 120px;"><strong>Event</strong></td><td style="padding: 6px 0;">{{event_label}}</td></tr>
          <tr><td style="padding: 6px 0;"><strong>Name</strong></td><td style="padding: 6px 0;">{{name}}</td></tr>
          <tr><td style="padding: 6px 0;"><strong>Email</strong></td><td style="padding: 6px 0;">{{email}}</td></tr>
          <tr><td style="padding: 6px 0;"><strong>User ID</strong></td><td style="padding: 6px 0;">{{user_id}}</td></tr>
          <tr><td style="padding: 6px 0;"><strong>Time</strong></td><td style="padding: 6px 0;">{{occurred_at}}</td></tr>
          <tr><td style="padding: 6px 0;"><strong>IP Address</strong></td><td style="padding: 6px 0;">{{ip_address}}</td></tr>
          <tr><td style="padding: 6px 0;"><strong>User Agent</strong></td><td style="padding: 6px 0;">{{user_agent}}</td></tr>
        </table>
      </td>
    </tr>
  </table>
</body>
</html>"#;

const AUTH_ALERT_TEXT_TEMPLATE: &str = r#"{{{event_label}}}

Event: {{{event_label}}}
Name: {{{name}}}
Email: {{{email}}}
User ID: {{{user_id}}}
Time: {{{occurred_at}}}
IP Address: {{{ip_address}}}
User Agent: {{{user_agent}}}
"#;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::AuthEventType;
    use chrono::TimeZone;
    use chrono::Utc;

    fn event(name: &str) -> AuthEvent {
        AuthEvent::new(AuthEventType::Login, name, "a@x.com", "u1")
            .with_occurred_at(Utc.with_ymd_and_hms(2025, 3, 14, 9, 26, 53).unwrap())
    }

    #[test]
    fn test_escape_html_covers_five_characters() {
        assert_eq!(
            escape_html(r#"& < > " '"#),
            "&amp; &lt; &gt; &quot; &#39;"
        );
        assert_eq!(escape_html("plain text / = `"), "plain text / = `");
    }

    #[test]
    fn test_escape_html_escapes_existing_entities() {
        // Already-escaped input is escaped again; the renderer never pre-escapes.
        assert_eq!(escape_html("&lt;"), "&amp;lt;");
    }

    #[test]
    fn test_renderer_creation() {
        assert!(AlertRenderer::new().is_ok());
    }

    #[test]
    fn test_subject_is_fixed() {
        let renderer = AlertRenderer::new().unwrap();
        let login = renderer.render(&event("Ada")).unwrap();
        let mut signup_event = event("<b>Eve</b>");
        signup_event.event_type = AuthEventType::Signup;
        let signup = renderer.render(&signup_event).unwrap();

        assert_eq!(login.subject, ALERT_SUBJECT);
        assert_eq!(signup.subject, ALERT_SUBJECT);
    }

    #[test]
    fn test_event_type_rendered_through_label() {
        let renderer = AlertRenderer::new().unwrap();
        let mut signup_event = event("Ada");
        signup_event.event_type = AuthEventType::Signup;

        let rendered = renderer.render(&signup_event).unwrap();
        assert!(rendered.text.contains("Event: New User Signup"));
        assert!(rendered.html.contains("New User Signup"));
        assert!(!rendered.text.contains("signup"));
    }

    #[test]
    fn test_html_escapes_every_user_field() {
        let renderer = AlertRenderer::new().unwrap();
        let hostile = AuthEvent {
            event_type: AuthEventType::Login,
            name: "<script>alert('x')</script>".to_string(),
            email: "\"quoted\"@x.com".to_string(),
            user_id: "u&1".to_string(),
            occurred_at: Utc.with_ymd_and_hms(2025, 1, 1, 0, 0, 0).unwrap(),
            ip_address: Some("<ip>".to_string()),
            user_agent: Some("Mozilla/5.0 <img src=x onerror='boom'>".to_string()),
        };

        let html = renderer.render(&hostile).unwrap().html;

        assert!(!html.contains("<script>"));
        assert!(html.contains("&lt;script&gt;alert(&#39;x&#39;)&lt;/script&gt;"));
        assert!(!html.contains("\"quoted\""));
        assert!(html.contains("&quot;quoted&quot;@x.com"));
        assert!(!html.contains("u&1"));
        assert!(html.contains("u&amp;1"));
        assert!(!html.contains("<ip>"));
        assert!(html.contains("&lt;ip&gt;"));
        assert!(!html.contains("<img"));
        assert!(html.contains("&lt;img src=x onerror=&#39;boom&#39;&gt;"));
    }

    #[test]
    fn test_text_reproduces_fields_verbatim() {
        let renderer = AlertRenderer::new().unwrap();
        let event = event("O'Brien & <Sons>")
            .with_ip_address("203.0.113.7")
            .with_user_agent("Agent \"quoted\"");

        let text = renderer.render(&event).unwrap().text;

        assert!(text.contains("Name: O'Brien & <Sons>"));
        assert!(text.contains("Email: a@x.com"));
        assert!(text.contains("User ID: u1"));
        assert!(text.contains("Time: 2025-03-14 09:26:53 UTC"));
        assert!(text.contains("IP Address: 203.0.113.7"));
        assert!(text.contains("User Agent: Agent \"quoted\""));
    }

    #[test]
    fn test_missing_optional_fields_use_placeholder() {
        let renderer = AlertRenderer::new().unwrap();
        let rendered = renderer.render(&event("Ada")).unwrap();

        assert!(rendered.text.contains("IP Address: Unavailable"));
        assert!(rendered.text.contains("User Agent: Unavailable"));
        assert!(rendered.html.contains(
            "<strong>IP Address</strong></td><td style=\"padding: 6px 0;\">Unavailable</td>"
        ));
        assert!(rendered.html.contains(
            "<strong>User Agent</strong></td><td style=\"padding: 6px 0;\">Unavailable</td>"
        ));
    }

    #[test]
    fn test_row_set_is_static() {
        let renderer = AlertRenderer::new().unwrap();
        let bare = renderer.render(&event("Ada")).unwrap();
        let full = renderer
            .render(&event("Ada").with_ip_address("10.0.0.1").with_user_agent("curl"))
            .unwrap();

        assert_eq!(bare.text.lines().count(), full.text.lines().count());
        assert_eq!(bare.html.lines().count(), full.html.lines().count());
    }
}
