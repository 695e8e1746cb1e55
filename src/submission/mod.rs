//! Lead-submission domain subsystem.
//!
//! # Data Flow
//! ```text
//! raw JSON object (untrusted)
//!     → validate.rs (constraint checks, ordered violation list)
//!     → ValidatedSubmission (every field satisfies its constraint)
//!     → sanitize.rs (trim, strip markup, placeholder for absent optionals)
//!     → SanitizedSubmission (safe to embed verbatim)
//!     → format.rs (per-kind template + timestamp)
//!     → NotificationMessage (handed to the notifier)
//! ```
//!
//! # Design Decisions
//! - One declarative field schema per kind; the pipeline itself is
//!   kind-agnostic
//! - Validation collects every violation, in field declaration order,
//!   and never fails
//! - Only sanitized data may cross into message formatting

pub mod format;
pub mod sanitize;
pub mod validate;

pub use format::{format_message, local_now, NotificationMessage};
pub use sanitize::{sanitize, SanitizedSubmission, MISSING_PLACEHOLDER};
pub use validate::{validate, ValidatedSubmission};

/// One of the supported lead-form variants.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SubmissionKind {
    /// Full connection application from the landing page.
    Application,
    /// Bare callback request (phone only).
    Callback,
    /// Callback request from the NGN tariff page.
    NgnCallback,
    /// WiMAX coverage request.
    Wimax,
    /// Full connection request from the partner form.
    ConnectionRequest,
}

/// Constraint vocabulary shared by all submission kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldRule {
    /// Required; 2..=50 letters (Latin or Cyrillic), hyphens, spaces.
    Name,
    /// Required; plausible phone number.
    Phone(PhoneRule),
    /// Required; 5..=200 characters.
    Address,
    /// Required; non-empty, optionally allow-listed.
    Tariff,
    /// Optional; at most 500 characters.
    Comment,
}

/// How strictly a phone field is checked.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PhoneRule {
    /// Must parse as a valid number (RU assumed when no country code).
    Strict,
    /// At least 9 digits after stripping separators.
    Loose,
}

/// One declared field of a submission kind: the JSON key it arrives
/// under and the constraint it must satisfy.
#[derive(Debug, Clone, Copy)]
pub struct FieldSpec {
    pub name: &'static str,
    pub rule: FieldRule,
}

const APPLICATION_FIELDS: &[FieldSpec] = &[
    FieldSpec { name: "name", rule: FieldRule::Name },
    FieldSpec { name: "phone", rule: FieldRule::Phone(PhoneRule::Strict) },
    FieldSpec { name: "address", rule: FieldRule::Address },
    FieldSpec { name: "selectedTariff", rule: FieldRule::Tariff },
    FieldSpec { name: "comment", rule: FieldRule::Comment },
];

const CALLBACK_FIELDS: &[FieldSpec] = &[FieldSpec {
    name: "phone",
    rule: FieldRule::Phone(PhoneRule::Loose),
}];

const NGN_CALLBACK_FIELDS: &[FieldSpec] = &[
    FieldSpec { name: "phone", rule: FieldRule::Phone(PhoneRule::Loose) },
    FieldSpec { name: "selectedTariff", rule: FieldRule::Tariff },
];

const WIMAX_FIELDS: &[FieldSpec] = &[
    FieldSpec { name: "name", rule: FieldRule::Name },
    FieldSpec { name: "phone", rule: FieldRule::Phone(PhoneRule::Loose) },
];

const CONNECTION_REQUEST_FIELDS: &[FieldSpec] = &[
    FieldSpec { name: "name", rule: FieldRule::Name },
    FieldSpec { name: "phone", rule: FieldRule::Phone(PhoneRule::Strict) },
    FieldSpec { name: "address", rule: FieldRule::Address },
    FieldSpec { name: "tariff", rule: FieldRule::Tariff },
    FieldSpec { name: "comment", rule: FieldRule::Comment },
];

impl SubmissionKind {
    pub const ALL: [SubmissionKind; 5] = [
        SubmissionKind::Application,
        SubmissionKind::Callback,
        SubmissionKind::NgnCallback,
        SubmissionKind::Wimax,
        SubmissionKind::ConnectionRequest,
    ];

    /// Route segment and metric label.
    pub fn as_str(&self) -> &'static str {
        match self {
            SubmissionKind::Application => "submit-application",
            SubmissionKind::Callback => "request-callback",
            SubmissionKind::NgnCallback => "request-ngn-callback",
            SubmissionKind::Wimax => "request-wimax",
            SubmissionKind::ConnectionRequest => "submit-connection-request",
        }
    }

    /// Declared fields, in template order.
    pub fn fields(&self) -> &'static [FieldSpec] {
        match self {
            SubmissionKind::Application => APPLICATION_FIELDS,
            SubmissionKind::Callback => CALLBACK_FIELDS,
            SubmissionKind::NgnCallback => NGN_CALLBACK_FIELDS,
            SubmissionKind::Wimax => WIMAX_FIELDS,
            SubmissionKind::ConnectionRequest => CONNECTION_REQUEST_FIELDS,
        }
    }

    /// First line of the notification template.
    pub fn header(&self) -> &'static str {
        match self {
            SubmissionKind::Application => "🔔 Новая заявка на подключение!",
            SubmissionKind::Callback => "📞 Запрос обратного звонка!",
            SubmissionKind::NgnCallback => "☎️ Запрос обратного звонка (NGN)!",
            SubmissionKind::Wimax => "📶 Заявка на подключение WiMAX!",
            SubmissionKind::ConnectionRequest => "🌐 Новая заявка на подключение!",
        }
    }

    /// User-facing confirmation returned on successful delivery.
    pub fn success_message(&self) -> &'static str {
        match self {
            SubmissionKind::Application | SubmissionKind::ConnectionRequest => {
                "Заявка успешно отправлена! Мы свяжемся с вами в ближайшее время."
            }
            SubmissionKind::Callback | SubmissionKind::NgnCallback => {
                "Запрос на обратный звонок отправлен! Мы перезвоним вам в ближайшее время."
            }
            SubmissionKind::Wimax => "Заявка отправлена! Мы свяжемся с вами в ближайшее время.",
        }
    }
}

impl FieldRule {
    /// Whether the field must be present.
    pub fn is_required(&self) -> bool {
        !matches!(self, FieldRule::Comment)
    }

    /// Template label, emoji included.
    pub fn label(&self) -> &'static str {
        match self {
            FieldRule::Name => "👤 Имя",
            FieldRule::Phone(_) => "📞 Телефон",
            FieldRule::Address => "🏠 Адрес",
            FieldRule::Tariff => "📡 Тариф",
            FieldRule::Comment => "💬 Комментарий",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_kind_declares_a_phone() {
        for kind in SubmissionKind::ALL {
            assert!(
                kind.fields()
                    .iter()
                    .any(|f| matches!(f.rule, FieldRule::Phone(_))),
                "{} has no phone field",
                kind.as_str()
            );
        }
    }

    #[test]
    fn field_order_is_template_order() {
        let names: Vec<_> = SubmissionKind::Application
            .fields()
            .iter()
            .map(|f| f.name)
            .collect();
        assert_eq!(
            names,
            ["name", "phone", "address", "selectedTariff", "comment"]
        );
    }

    #[test]
    fn only_comment_is_optional() {
        for kind in SubmissionKind::ALL {
            for spec in kind.fields() {
                assert_eq!(
                    spec.rule.is_required(),
                    !matches!(spec.rule, FieldRule::Comment)
                );
            }
        }
    }
}
