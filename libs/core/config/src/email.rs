use crate::{env_or_default, env_optional, env_parse_or, ConfigError, FromEnv};
use std::fmt;

/// Sender used when `ALERT_FROM_EMAIL` is not set.
pub const DEFAULT_FROM_EMAIL: &str = "onboarding@resend.dev";
pub const DEFAULT_API_URL: &str = "https://api.resend.com";
pub const DEFAULT_MAX_ATTEMPTS: u32 = 3;
pub const DEFAULT_BASE_DELAY_MS: u64 = 500;
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 10;

/// Delivery settings for authentication alert emails.
///
/// A missing API key is not an error: it disables delivery, and the
/// dispatcher turns every alert into a logged no-op.
#[derive(Clone)]
pub struct AlertEmailConfig {
    pub api_key: Option<String>,
    pub from_email: String,
    pub to_email: Option<String>,
    pub api_url: String,
    pub max_attempts: u32,
    pub base_delay_ms: u64,
    pub request_timeout_secs: u64,
}

impl AlertEmailConfig {
    pub fn new(api_key: Option<String>, to_email: Option<String>) -> Self {
        Self {
            api_key,
            to_email,
            ..Self::default()
        }
    }

    /// Whether alerts will actually be sent.
    pub fn is_delivery_enabled(&self) -> bool {
        self.api_key.is_some()
    }
}

impl Default for AlertEmailConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            from_email: DEFAULT_FROM_EMAIL.to_string(),
            to_email: None,
            api_url: DEFAULT_API_URL.to_string(),
            max_attempts: DEFAULT_MAX_ATTEMPTS,
            base_delay_ms: DEFAULT_BASE_DELAY_MS,
            request_timeout_secs: DEFAULT_REQUEST_TIMEOUT_SECS,
        }
    }
}

impl FromEnv for AlertEmailConfig {
    /// Reads from environment variables:
    /// - RESEND_API_KEY: optional, absence disables delivery
    /// - ALERT_FROM_EMAIL: defaults to DEFAULT_FROM_EMAIL
    /// - ALERT_TO_EMAIL: optional here, required by the provider when a key is set
    /// - RESEND_API_URL: defaults to DEFAULT_API_URL
    /// - ALERT_MAX_ATTEMPTS: defaults to 3, must be at least 1
    /// - ALERT_BASE_DELAY_MS: defaults to 500
    /// - ALERT_REQUEST_TIMEOUT_SECS: defaults to 10
    fn from_env() -> Result<Self, ConfigError> {
        let max_attempts = env_parse_or("ALERT_MAX_ATTEMPTS", DEFAULT_MAX_ATTEMPTS)?;
        if max_attempts == 0 {
            return Err(ConfigError::ParseError {
                key: "ALERT_MAX_ATTEMPTS".to_string(),
                details: "must be at least 1".to_string(),
            });
        }

        Ok(Self {
            api_key: env_optional("RESEND_API_KEY"),
            from_email: env_or_default("ALERT_FROM_EMAIL", DEFAULT_FROM_EMAIL),
            to_email: env_optional("ALERT_TO_EMAIL"),
            api_url: env_or_default("RESEND_API_URL", DEFAULT_API_URL),
            max_attempts,
            base_delay_ms: env_parse_or("ALERT_BASE_DELAY_MS", DEFAULT_BASE_DELAY_MS)?,
            request_timeout_secs: env_parse_or(
                "ALERT_REQUEST_TIMEOUT_SECS",
                DEFAULT_REQUEST_TIMEOUT_SECS,
            )?,
        })
    }
}

// Keeps the API key out of logs.
impl fmt::Debug for AlertEmailConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AlertEmailConfig")
            .field("api_key", &self.api_key.as_ref().map(|_| "<redacted>"))
            .field("from_email", &self.from_email)
            .field("to_email", &self.to_email)
            .field("api_url", &self.api_url)
            .field("max_attempts", &self.max_attempts)
            .field("base_delay_ms", &self.base_delay_ms)
            .field("request_timeout_secs", &self.request_timeout_secs)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const VARS: [&str; 7] = [
        "RESEND_API_KEY",
        "ALERT_FROM_EMAIL",
        "ALERT_TO_EMAIL",
        "RESEND_API_URL",
        "ALERT_MAX_ATTEMPTS",
        "ALERT_BASE_DELAY_MS",
        "ALERT_REQUEST_TIMEOUT_SECS",
    ];

    // Every alert variable, unset unless overridden.
    fn alert_vars(
        overrides: &[(&'static str, &'static str)],
    ) -> Vec<(&'static str, Option<&'static str>)> {
        VARS.iter()
            .map(|key| {
                let value = overrides
                    .iter()
                    .find(|(name, _)| name == key)
                    .map(|(_, value)| *value);
                (*key, value)
            })
            .collect()
    }

    #[test]
    fn test_alert_config_from_env_with_defaults() {
        temp_env::with_vars(alert_vars(&[]), || {
            let config = AlertEmailConfig::from_env().unwrap();
            assert_eq!(config.api_key, None);
            assert_eq!(config.from_email, DEFAULT_FROM_EMAIL);
            assert_eq!(config.to_email, None);
            assert_eq!(config.api_url, DEFAULT_API_URL);
            assert_eq!(config.max_attempts, 3);
            assert_eq!(config.base_delay_ms, 500);
            assert_eq!(config.request_timeout_secs, 10);
            assert!(!config.is_delivery_enabled());
        });
    }

    #[test]
    fn test_alert_config_from_env_with_values() {
        let vars = alert_vars(&[
            ("RESEND_API_KEY", "re_test_key"),
            ("ALERT_FROM_EMAIL", "alerts@example.com"),
            ("ALERT_TO_EMAIL", "ops@example.com"),
            ("ALERT_MAX_ATTEMPTS", "5"),
            ("ALERT_BASE_DELAY_MS", "250"),
        ]);
        temp_env::with_vars(vars, || {
            let config = AlertEmailConfig::from_env().unwrap();
            assert_eq!(config.api_key.as_deref(), Some("re_test_key"));
            assert_eq!(config.from_email, "alerts@example.com");
            assert_eq!(config.to_email.as_deref(), Some("ops@example.com"));
            assert_eq!(config.max_attempts, 5);
            assert_eq!(config.base_delay_ms, 250);
            assert!(config.is_delivery_enabled());
        });
    }

    #[test]
    fn test_alert_config_blank_api_key_disables_delivery() {
        let vars = alert_vars(&[("RESEND_API_KEY", "")]);
        temp_env::with_vars(vars, || {
            let config = AlertEmailConfig::from_env().unwrap();
            assert!(!config.is_delivery_enabled());
        });
    }

    #[test]
    fn test_alert_config_rejects_zero_attempts() {
        let vars = alert_vars(&[("ALERT_MAX_ATTEMPTS", "0")]);
        temp_env::with_vars(vars, || {
            let err = AlertEmailConfig::from_env().unwrap_err();
            assert!(err.to_string().contains("ALERT_MAX_ATTEMPTS"));
        });
    }

    #[test]
    fn test_alert_config_invalid_delay() {
        let vars = alert_vars(&[("ALERT_BASE_DELAY_MS", "soon")]);
        temp_env::with_vars(vars, || {
            let err = AlertEmailConfig::from_env().unwrap_err();
            assert!(matches!(err, ConfigError::ParseError { ref key, .. } if key == "ALERT_BASE_DELAY_MS"));
        });
    }

    #[test]
    fn test_debug_redacts_api_key() {
        let config = AlertEmailConfig::new(
            Some("re_super_secret".to_string()),
            Some("ops@example.com".to_string()),
        );
        let debug = format!("{:?}", config);
        assert!(!debug.contains("re_super_secret"));
        assert!(debug.contains("<redacted>"));
        assert!(debug.contains("ops@example.com"));
    }
}
