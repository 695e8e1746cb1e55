//! Notification message templating.
//!
//! # Responsibilities
//! - Render a sanitized submission into the per-kind multi-line text
//! - Stamp the message with a local-time, human-readable timestamp
//!
//! # Design Decisions
//! - Field order is fixed by the kind's declaration order
//! - Every declared field gets a line; absent optionals show the
//!   sanitizer's placeholder, never a structural gap
//! - Timestamps render in Moscow time (UTC+3), DD.MM.YYYY, HH:MM:SS

use chrono::{DateTime, FixedOffset, Utc};

use crate::submission::{SanitizedSubmission, MISSING_PLACEHOLDER};

/// Seconds east of UTC for the deployment's locale (Moscow).
const LOCAL_UTC_OFFSET_SECS: i32 = 3 * 3600;

/// A formatted notification, addressed and ready for delivery.
///
/// Consumed exactly once by the notifier; never retried.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NotificationMessage {
    /// Target chat identifier.
    pub chat_id: String,
    /// Display-ready message text.
    pub text: String,
}

/// Current time in the deployment's locale.
pub fn local_now() -> DateTime<FixedOffset> {
    let offset = FixedOffset::east_opt(LOCAL_UTC_OFFSET_SECS).expect("static offset is in range");
    Utc::now().with_timezone(&offset)
}

/// Render the per-kind template for a sanitized submission.
pub fn format_message(
    sanitized: &SanitizedSubmission,
    chat_id: &str,
    timestamp: DateTime<FixedOffset>,
) -> NotificationMessage {
    let kind = sanitized.kind();

    let mut lines = Vec::with_capacity(kind.fields().len() + 4);
    lines.push(kind.header().to_string());
    lines.push(String::new());
    for spec in kind.fields() {
        let value = sanitized.get(spec.rule).unwrap_or(MISSING_PLACEHOLDER);
        lines.push(format!("{}: {}", spec.rule.label(), value));
    }
    lines.push(String::new());
    lines.push(format!(
        "🕐 Время заявки: {}",
        timestamp.format("%d.%m.%Y, %H:%M:%S")
    ));

    NotificationMessage {
        chat_id: chat_id.to_string(),
        text: lines.join("\n"),
    }
}
