//! Lead Gateway Library
//!
//! An HTTP gateway that accepts customer lead-submission forms,
//! validates and sanitizes them, and forwards a formatted
//! notification to the Telegram Bot API.

pub mod config;
pub mod http;
pub mod lifecycle;
pub mod notify;
pub mod observability;
pub mod security;
pub mod submission;

pub use config::GatewayConfig;
pub use http::GatewayServer;
pub use lifecycle::Shutdown;
