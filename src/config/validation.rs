//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Validate value ranges (windows > 0, timeouts > 0)
//! - Check addresses and the messaging API base parse
//!
//! # Design Decisions
//! - Returns all validation errors, not just the first
//! - Validation is a pure function: GatewayConfig → Result<(), Vec<ValidationError>>
//! - Runs before the config is accepted into the system

use std::net::SocketAddr;

use thiserror::Error;
use url::Url;

use crate::config::schema::GatewayConfig;

/// A single semantic configuration error.
#[derive(Debug, Error)]
pub enum ValidationError {
    #[error("listener.bind_address is not a valid socket address: {0}")]
    InvalidBindAddress(String),

    #[error("observability.metrics_address is not a valid socket address: {0}")]
    InvalidMetricsAddress(String),

    #[error("messaging.api_base is not a valid http(s) URL: {0}")]
    InvalidApiBase(String),

    #[error("{0} must be greater than zero")]
    ZeroDuration(&'static str),

    #[error("{0} must be greater than zero")]
    ZeroLimit(&'static str),
}

/// Validate a configuration, collecting every error found.
pub fn validate_config(config: &GatewayConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if config.listener.bind_address.parse::<SocketAddr>().is_err() {
        errors.push(ValidationError::InvalidBindAddress(
            config.listener.bind_address.clone(),
        ));
    }

    if config.observability.metrics_enabled
        && config.observability.metrics_address.parse::<SocketAddr>().is_err()
    {
        errors.push(ValidationError::InvalidMetricsAddress(
            config.observability.metrics_address.clone(),
        ));
    }

    match Url::parse(&config.messaging.api_base) {
        Ok(url) if url.scheme() == "http" || url.scheme() == "https" => {}
        _ => errors.push(ValidationError::InvalidApiBase(
            config.messaging.api_base.clone(),
        )),
    }

    if config.timeouts.request_secs == 0 {
        errors.push(ValidationError::ZeroDuration("timeouts.request_secs"));
    }
    if config.timeouts.notify_secs == 0 {
        errors.push(ValidationError::ZeroDuration("timeouts.notify_secs"));
    }

    if config.rate_limit.enabled {
        if config.rate_limit.general.window_secs == 0 {
            errors.push(ValidationError::ZeroDuration("rate_limit.general.window_secs"));
        }
        if config.rate_limit.general.max_requests == 0 {
            errors.push(ValidationError::ZeroLimit("rate_limit.general.max_requests"));
        }
        if config.rate_limit.submission.window_secs == 0 {
            errors.push(ValidationError::ZeroDuration(
                "rate_limit.submission.window_secs",
            ));
        }
        if config.rate_limit.submission.max_requests == 0 {
            errors.push(ValidationError::ZeroLimit("rate_limit.submission.max_requests"));
        }
    }

    if config.limits.max_body_size == 0 {
        errors.push(ValidationError::ZeroLimit("limits.max_body_size"));
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
