//! HTTP protocol handling subsystem.
//!
//! # Data Flow
//! ```text
//! TCP connection
//!     → server.rs (Axum setup, middleware, rate-limit wiring)
//!     → handlers.rs (config guard → validate → sanitize → format → deliver)
//!     → response.rs (JSON success/error envelopes)
//!     → Send to client
//! ```

pub mod handlers;
pub mod request;
pub mod response;
pub mod server;

pub use request::{MakeRequestUuid, X_REQUEST_ID};
pub use response::{ApiError, ApiSuccess};
pub use server::{AppState, GatewayServer};
