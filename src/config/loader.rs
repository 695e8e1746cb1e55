//! Configuration loading from disk and the environment.

use std::fs;
use std::path::Path;

use thiserror::Error;

use crate::config::schema::GatewayConfig;
use crate::config::validation::{validate_config, ValidationError};

/// Environment variable carrying the messaging bot token.
pub const ENV_BOT_TOKEN: &str = "TELEGRAM_BOT_TOKEN";

/// Environment variable carrying the target chat id.
pub const ENV_CHAT_ID: &str = "TELEGRAM_CHAT_ID";

/// Error type for configuration loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Parse error: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation failed: {}", join_errors(.0))]
    Validation(Vec<ValidationError>),
}

fn join_errors(errors: &[ValidationError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

/// Load and validate configuration.
///
/// Without a path, starts from defaults. Messaging credentials from
/// the environment override whatever the file carries, so tokens
/// never have to live on disk.
pub fn load_config(path: Option<&Path>) -> Result<GatewayConfig, ConfigError> {
    let mut config: GatewayConfig = match path {
        Some(p) => toml::from_str(&fs::read_to_string(p)?)?,
        None => GatewayConfig::default(),
    };

    apply_env_overrides(&mut config);

    validate_config(&config).map_err(ConfigError::Validation)?;

    Ok(config)
}

fn apply_env_overrides(config: &mut GatewayConfig) {
    if let Ok(token) = std::env::var(ENV_BOT_TOKEN) {
        if !token.is_empty() {
            config.messaging.bot_token = Some(token);
        }
    }
    if let Ok(chat_id) = std::env::var(ENV_CHAT_ID) {
        if !chat_id.is_empty() {
            config.messaging.chat_id = Some(chat_id);
        }
    }
}
