//! Security subsystem.
//!
//! # Data Flow
//! ```text
//! Incoming request:
//!     → rate_limit.rs (per-IP window check, policy per route class)
//!     → Pass to the handler, or reject with 429 immediately
//! ```
//!
//! # Design Decisions
//! - Rejected requests never reach the validator or the notifier
//! - Fail closed: the window check happens before any body parsing
//! - No trust in client input

pub mod rate_limit;

pub use rate_limit::{rate_limit_middleware, RateLimitPolicy, RateLimiter};
