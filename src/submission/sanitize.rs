//! Defensive text cleaning for validated submissions.
//!
//! # Responsibilities
//! - Trim whitespace and drop control characters
//! - Strip HTML tags to a fixed point, then entity-encode leftovers
//! - Replace absent optional fields with an explicit placeholder
//!
//! # Design Decisions
//! - Total and pure: sanitization cannot fail
//! - Tag stripping loops until stable so split-tag input like
//!   `<scr<script>ipt>` cannot reassemble into a tag
//! - Downstream formatting never branches on absence: declared
//!   optional fields always carry a value after this pass

use once_cell::sync::Lazy;
use regex::Regex;

use crate::submission::{FieldRule, SubmissionKind, ValidatedSubmission};

/// Shown in place of a declared optional field the client omitted.
pub const MISSING_PLACEHOLDER: &str = "не указан";

static TAG_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"<[^>]*>").expect("static pattern compiles"));

/// A submission whose every string field is safe to embed verbatim in
/// an outbound message. The only representation the formatter accepts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SanitizedSubmission {
    kind: SubmissionKind,
    name: Option<String>,
    phone: Option<String>,
    address: Option<String>,
    tariff: Option<String>,
    comment: Option<String>,
}

impl SanitizedSubmission {
    pub fn kind(&self) -> SubmissionKind {
        self.kind
    }

    /// Field value by rule; `Some` for every field the kind declares.
    pub fn get(&self, rule: FieldRule) -> Option<&str> {
        match rule {
            FieldRule::Name => self.name.as_deref(),
            FieldRule::Phone(_) => self.phone.as_deref(),
            FieldRule::Address => self.address.as_deref(),
            FieldRule::Tariff => self.tariff.as_deref(),
            FieldRule::Comment => self.comment.as_deref(),
        }
    }
}

/// Clean every declared field of a validated submission.
///
/// Declared fields the client omitted (only optional ones can be)
/// come out as [`MISSING_PLACEHOLDER`]; fields the kind does not
/// declare stay `None`.
pub fn sanitize(validated: ValidatedSubmission) -> SanitizedSubmission {
    let kind = validated.kind();
    let mut sanitized = SanitizedSubmission {
        kind,
        name: None,
        phone: None,
        address: None,
        tariff: None,
        comment: None,
    };

    for spec in kind.fields() {
        let value = match validated.get(spec.rule) {
            Some(raw) => clean_text(raw),
            None => MISSING_PLACEHOLDER.to_string(),
        };
        match spec.rule {
            FieldRule::Name => sanitized.name = Some(value),
            FieldRule::Phone(_) => sanitized.phone = Some(value),
            FieldRule::Address => sanitized.address = Some(value),
            FieldRule::Tariff => sanitized.tariff = Some(value),
            FieldRule::Comment => sanitized.comment = Some(value),
        }
    }

    sanitized
}

/// Neutralize markup in one text field.
///
/// Newlines and tabs survive (comments may be multi-line); all other
/// control characters are dropped.
pub fn clean_text(input: &str) -> String {
    let filtered: String = input
        .trim()
        .chars()
        .filter(|&c| c == '\n' || c == '\t' || !c.is_control())
        .collect();

    let mut stripped = filtered;
    loop {
        let next = TAG_RE.replace_all(&stripped, "").into_owned();
        if next == stripped {
            break;
        }
        stripped = next;
    }

    html_escape::encode_text(&stripped).trim().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ValidationConfig;
    use serde_json::json;

    fn validated(kind: SubmissionKind, input: serde_json::Value) -> ValidatedSubmission {
        ValidatedSubmission::parse(
            kind,
            input.as_object().expect("test input is an object"),
            &ValidationConfig::default(),
        )
        .expect("test input is valid")
    }

    #[test]
    fn script_tags_are_removed() {
        assert_eq!(clean_text("<script>alert(1)</script>привет"), "alert(1)привет");
    }

    #[test]
    fn split_tags_cannot_reassemble() {
        let cleaned = clean_text("<scr<script>ipt>alert(1)</scr</script>ipt>");
        assert!(!cleaned.contains("<script>"));
        assert!(!cleaned.contains('<'));
    }

    #[test]
    fn leftover_brackets_are_encoded() {
        let cleaned = clean_text("1 < 2");
        assert!(!cleaned.contains('<'));
        assert!(cleaned.contains("&lt;"));
    }

    #[test]
    fn clean_input_is_untouched_and_idempotent() {
        let input = "Иван Иванов";
        let once = clean_text(input);
        assert_eq!(once, input);
        assert_eq!(clean_text(&once), once);
    }

    #[test]
    fn whitespace_is_trimmed_and_controls_dropped() {
        assert_eq!(clean_text("  Иван\u{0007} Иванов  "), "Иван Иванов");
        assert_eq!(clean_text("строка один\nстрока два"), "строка один\nстрока два");
    }

    #[test]
    fn absent_comment_becomes_placeholder() {
        let submission = sanitize(validated(
            SubmissionKind::Application,
            json!({
                "name": "Иван Иванов",
                "phone": "+79991234567",
                "address": "г. Москва, ул. Ленина, 1",
                "selectedTariff": "Стандарт"
            }),
        ));
        assert_eq!(submission.get(FieldRule::Comment), Some(MISSING_PLACEHOLDER));
    }

    #[test]
    fn undeclared_fields_stay_absent() {
        let submission = sanitize(validated(
            SubmissionKind::Callback,
            json!({ "phone": "+79991234567" }),
        ));
        assert_eq!(submission.get(FieldRule::Phone(crate::submission::PhoneRule::Loose)), Some("+79991234567"));
        assert_eq!(submission.get(FieldRule::Name), None);
        assert_eq!(submission.get(FieldRule::Address), None);
    }

    #[test]
    fn markup_in_fields_is_neutralized() {
        let submission = sanitize(validated(
            SubmissionKind::Application,
            json!({
                "name": "Иван Иванов",
                "phone": "+79991234567",
                "address": "г. Москва, ул. Ленина, 1",
                "selectedTariff": "Стандарт",
                "comment": "<script>alert('xss')</script>до связи"
            }),
        ));
        let comment = submission.get(FieldRule::Comment).unwrap();
        assert!(!comment.contains("<script>"));
        assert!(comment.contains("до связи"));
    }
}
