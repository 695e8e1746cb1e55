//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! All subsystems produce:
//!     → logging.rs (structured log events via tracing)
//!     → metrics.rs (counters, histograms)
//!
//! Consumers:
//!     → Log aggregation (stdout)
//!     → Metrics endpoint (Prometheus scrape)
//! ```
//!
//! # Design Decisions
//! - Structured key-value logging; the request ID flows through spans
//! - Metrics are cheap (atomic increments) and config-gated
//! - Raw messaging-service errors are logged, never returned to clients

pub mod logging;
pub mod metrics;
