//! Outbound notification subsystem.
//!
//! # Data Flow
//! ```text
//! NotificationMessage
//!     → telegram.rs (one POST to the Bot API, bounded timeout)
//!     → Ok(DeliveryAck) | Err(DeliveryError)
//! ```
//!
//! # Design Decisions
//! - Exactly one delivery attempt per call; no internal retry queue
//! - Credentials are checked at construction, not per request
//! - Transport failures and API rejections are distinct error variants

pub mod telegram;

pub use telegram::{DeliveryAck, DeliveryError, Notifier};
