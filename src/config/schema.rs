//! Configuration schema definitions.
//!
//! This module defines the complete configuration structure for the
//! gateway. All types derive Serde traits for deserialization from
//! config files, and every section has defaults so a minimal (or
//! empty) config file is valid.

use serde::{Deserialize, Serialize};

/// Root configuration for the lead gateway.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct GatewayConfig {
    /// Listener configuration (bind address).
    pub listener: ListenerConfig,

    /// Messaging service credentials and endpoint.
    pub messaging: MessagingConfig,

    /// Timeout configuration.
    pub timeouts: TimeoutConfig,

    /// Rate limiting configuration.
    pub rate_limit: RateLimitConfig,

    /// Submission validation policy.
    pub validation: ValidationConfig,

    /// Observability settings.
    pub observability: ObservabilityConfig,

    /// Request size limits.
    pub limits: LimitsConfig,
}

/// Listener configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ListenerConfig {
    /// Bind address (e.g., "0.0.0.0:3000").
    pub bind_address: String,
}

impl Default for ListenerConfig {
    fn default() -> Self {
        Self {
            bind_address: "0.0.0.0:3000".to_string(),
        }
    }
}

/// External messaging service configuration.
///
/// The bot token and chat id are required for delivery but optional
/// here: the server boots without them (the health endpoint stays up)
/// and submission endpoints answer with a configuration error until
/// both are supplied. They are usually injected via
/// `TELEGRAM_BOT_TOKEN` and `TELEGRAM_CHAT_ID` rather than written
/// into the config file.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct MessagingConfig {
    /// Bot API access token.
    pub bot_token: Option<String>,

    /// Target chat identifier for lead notifications.
    pub chat_id: Option<String>,

    /// Base URL of the messaging API.
    pub api_base: String,
}

impl Default for MessagingConfig {
    fn default() -> Self {
        Self {
            bot_token: None,
            chat_id: None,
            api_base: "https://api.telegram.org".to_string(),
        }
    }
}

impl MessagingConfig {
    /// Both credentials, if fully configured.
    pub fn credentials(&self) -> Option<Credentials> {
        match (&self.bot_token, &self.chat_id) {
            (Some(token), Some(chat_id)) if !token.is_empty() && !chat_id.is_empty() => {
                Some(Credentials {
                    bot_token: token.clone(),
                    chat_id: chat_id.clone(),
                })
            }
            _ => None,
        }
    }
}

/// Validated messaging credentials.
#[derive(Debug, Clone)]
pub struct Credentials {
    pub bot_token: String,
    pub chat_id: String,
}

/// Timeout configuration for various operations.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct TimeoutConfig {
    /// Total time allowed for an inbound request in seconds.
    pub request_secs: u64,

    /// Timeout for one outbound delivery attempt in seconds.
    pub notify_secs: u64,
}

impl Default for TimeoutConfig {
    fn default() -> Self {
        Self {
            request_secs: 30,
            notify_secs: 10,
        }
    }
}

/// Rate limiting configuration.
///
/// Two independent policies: a general one covering every `/api`
/// route and a stricter one for the primary submission route.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct RateLimitConfig {
    /// Enable rate limiting.
    pub enabled: bool,

    /// Policy applied to all routes under `/api`.
    pub general: RateLimitPolicyConfig,

    /// Policy applied to the submit-application route.
    pub submission: RateLimitPolicyConfig,
}

impl Default for RateLimitConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            general: RateLimitPolicyConfig {
                window_secs: 15 * 60,
                max_requests: 5,
            },
            submission: RateLimitPolicyConfig {
                window_secs: 60 * 60,
                max_requests: 3,
            },
        }
    }
}

/// One rate-limit window policy.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct RateLimitPolicyConfig {
    /// Window length in seconds.
    pub window_secs: u64,

    /// Maximum requests admitted per window per client.
    pub max_requests: u32,
}

/// Submission validation policy.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct ValidationConfig {
    /// Tariff allow-list. Empty means any non-empty tariff is
    /// accepted.
    pub allowed_tariffs: Vec<String>,
}

impl ValidationConfig {
    /// Whether the given tariff passes the configured allow-list.
    pub fn tariff_allowed(&self, tariff: &str) -> bool {
        self.allowed_tariffs.is_empty() || self.allowed_tariffs.iter().any(|t| t == tariff)
    }
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,

    /// Enable metrics endpoint.
    pub metrics_enabled: bool,

    /// Metrics endpoint bind address.
    pub metrics_address: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            metrics_enabled: false,
            metrics_address: "0.0.0.0:9090".to_string(),
        }
    }
}

/// Request size limits.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct LimitsConfig {
    /// Maximum request body size in bytes.
    pub max_body_size: usize,
}

impl Default for LimitsConfig {
    fn default() -> Self {
        Self {
            max_body_size: 2 * 1024 * 1024, // 2MB
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_has_spec_rate_limits() {
        let config = GatewayConfig::default();
        assert_eq!(config.rate_limit.general.window_secs, 900);
        assert_eq!(config.rate_limit.general.max_requests, 5);
        assert_eq!(config.rate_limit.submission.window_secs, 3600);
        assert_eq!(config.rate_limit.submission.max_requests, 3);
    }

    #[test]
    fn credentials_require_both_parts() {
        let mut messaging = MessagingConfig::default();
        assert!(messaging.credentials().is_none());

        messaging.bot_token = Some("123:abc".into());
        assert!(messaging.credentials().is_none());

        messaging.chat_id = Some("-100200300".into());
        let creds = messaging.credentials().expect("both parts set");
        assert_eq!(creds.bot_token, "123:abc");
        assert_eq!(creds.chat_id, "-100200300");
    }

    #[test]
    fn empty_credentials_do_not_count() {
        let messaging = MessagingConfig {
            bot_token: Some(String::new()),
            chat_id: Some("-1".into()),
            ..MessagingConfig::default()
        };
        assert!(messaging.credentials().is_none());
    }

    #[test]
    fn empty_allow_list_accepts_any_tariff() {
        let validation = ValidationConfig::default();
        assert!(validation.tariff_allowed("Стандарт"));
        assert!(validation.tariff_allowed("anything"));
    }

    #[test]
    fn allow_list_filters_tariffs() {
        let validation = ValidationConfig {
            allowed_tariffs: vec!["Стандарт".into(), "Премиум".into()],
        };
        assert!(validation.tariff_allowed("Премиум"));
        assert!(!validation.tariff_allowed("Безлимит"));
    }
}
