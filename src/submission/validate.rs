//! Submission input validation.
//!
//! # Responsibilities
//! - Check every declared field of a kind against its constraint
//! - Collect all violations, in field declaration order
//! - Build `ValidatedSubmission` only from violation-free input
//!
//! # Design Decisions
//! - Validation never fails: malformed input produces messages, not errors
//! - No short-circuiting: every field is checked independently
//! - Violation text is user-facing Russian; internals stay in logs

use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::{Map, Value};

use crate::config::ValidationConfig;
use crate::submission::{FieldRule, FieldSpec, PhoneRule, SubmissionKind};

static NAME_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[\p{L}\s\-]+$").expect("static pattern compiles"));

const NAME_MIN: usize = 2;
const NAME_MAX: usize = 50;
const ADDRESS_MIN: usize = 5;
const ADDRESS_MAX: usize = 200;
const COMMENT_MAX: usize = 500;
const LOOSE_PHONE_MIN_DIGITS: usize = 9;

/// A submission whose fields all satisfy their constraints.
///
/// Produced only by [`ValidatedSubmission::parse`]; fields a kind does
/// not declare stay `None`.
#[derive(Debug, Clone)]
pub struct ValidatedSubmission {
    kind: SubmissionKind,
    pub(crate) name: Option<String>,
    pub(crate) phone: Option<String>,
    pub(crate) address: Option<String>,
    pub(crate) tariff: Option<String>,
    pub(crate) comment: Option<String>,
}

impl ValidatedSubmission {
    /// Validate raw input for the given kind and construct the record.
    ///
    /// The only way to obtain a `ValidatedSubmission`.
    pub fn parse(
        kind: SubmissionKind,
        input: &Map<String, Value>,
        policy: &ValidationConfig,
    ) -> Result<Self, Vec<String>> {
        let violations = validate(kind, input, policy);
        if !violations.is_empty() {
            return Err(violations);
        }

        let mut submission = ValidatedSubmission {
            kind,
            name: None,
            phone: None,
            address: None,
            tariff: None,
            comment: None,
        };
        for spec in kind.fields() {
            let value = input
                .get(spec.name)
                .and_then(Value::as_str)
                .filter(|s| !s.trim().is_empty())
                .map(str::to_owned);
            match spec.rule {
                FieldRule::Name => submission.name = value,
                FieldRule::Phone(_) => submission.phone = value,
                FieldRule::Address => submission.address = value,
                FieldRule::Tariff => submission.tariff = value,
                FieldRule::Comment => submission.comment = value,
            }
        }
        Ok(submission)
    }

    pub fn kind(&self) -> SubmissionKind {
        self.kind
    }

    pub(crate) fn get(&self, rule: FieldRule) -> Option<&str> {
        match rule {
            FieldRule::Name => self.name.as_deref(),
            FieldRule::Phone(_) => self.phone.as_deref(),
            FieldRule::Address => self.address.as_deref(),
            FieldRule::Tariff => self.tariff.as_deref(),
            FieldRule::Comment => self.comment.as_deref(),
        }
    }
}

/// Check raw input against the kind's field schema.
///
/// Returns one human-readable violation per failed constraint, in
/// field declaration order. An empty list means the input is valid.
pub fn validate(
    kind: SubmissionKind,
    input: &Map<String, Value>,
    policy: &ValidationConfig,
) -> Vec<String> {
    let mut violations = Vec::new();
    for spec in kind.fields() {
        check_field(spec, input.get(spec.name), policy, &mut violations);
    }
    violations
}

fn check_field(
    spec: &FieldSpec,
    value: Option<&Value>,
    policy: &ValidationConfig,
    violations: &mut Vec<String>,
) {
    // JSON null is indistinguishable from an absent key here.
    let value = value.filter(|v| !v.is_null());

    let text = match value {
        None => {
            if let Some(message) = required_message(spec.rule) {
                violations.push(message.to_string());
            }
            return;
        }
        Some(Value::String(s)) => s.trim(),
        Some(_) => {
            violations.push(type_message(spec.rule).to_string());
            return;
        }
    };

    match spec.rule {
        FieldRule::Name => check_name(text, violations),
        FieldRule::Phone(rule) => check_phone(text, rule, violations),
        FieldRule::Address => check_address(text, violations),
        FieldRule::Tariff => check_tariff(text, policy, violations),
        FieldRule::Comment => check_comment(text, violations),
    }
}

fn required_message(rule: FieldRule) -> Option<&'static str> {
    match rule {
        FieldRule::Name => Some("Имя обязательно для заполнения"),
        FieldRule::Phone(_) => Some("Номер телефона обязателен для заполнения"),
        FieldRule::Address => Some("Адрес обязателен для заполнения"),
        FieldRule::Tariff => Some("Выберите тариф"),
        FieldRule::Comment => None,
    }
}

fn type_message(rule: FieldRule) -> &'static str {
    match rule {
        FieldRule::Name => "Имя должно быть строкой",
        FieldRule::Phone(_) => "Номер телефона должен быть строкой",
        FieldRule::Address => "Адрес должен быть строкой",
        FieldRule::Tariff => "Выберите тариф",
        FieldRule::Comment => "Комментарий должен быть строкой",
    }
}

fn check_name(text: &str, violations: &mut Vec<String>) {
    let length = text.chars().count();
    if length == 0 {
        violations.push("Имя обязательно для заполнения".to_string());
        return;
    }
    if !(NAME_MIN..=NAME_MAX).contains(&length) {
        violations.push(format!(
            "Имя должно содержать от {NAME_MIN} до {NAME_MAX} символов"
        ));
        return;
    }
    if !NAME_RE.is_match(text) {
        violations.push("Имя может содержать только буквы, дефис и пробел".to_string());
    }
}

fn check_phone(text: &str, rule: PhoneRule, violations: &mut Vec<String>) {
    if text.is_empty() {
        violations.push("Номер телефона обязателен для заполнения".to_string());
        return;
    }
    if !phone_plausible(text, rule) {
        violations.push("Укажите корректный номер телефона".to_string());
    }
}

fn phone_plausible(text: &str, rule: PhoneRule) -> bool {
    let cleaned: String = text
        .chars()
        .filter(|c| c.is_ascii_digit() || *c == '+')
        .collect();
    match rule {
        PhoneRule::Strict => phonenumber::parse(Some(phonenumber::country::Id::RU), &cleaned)
            .map(|number| phonenumber::is_valid(&number))
            .unwrap_or(false),
        PhoneRule::Loose => {
            cleaned.chars().filter(char::is_ascii_digit).count() >= LOOSE_PHONE_MIN_DIGITS
        }
    }
}

fn check_address(text: &str, violations: &mut Vec<String>) {
    let length = text.chars().count();
    if length == 0 {
        violations.push("Адрес обязателен для заполнения".to_string());
        return;
    }
    if !(ADDRESS_MIN..=ADDRESS_MAX).contains(&length) {
        violations.push(format!(
            "Адрес должен содержать от {ADDRESS_MIN} до {ADDRESS_MAX} символов"
        ));
    }
}

fn check_tariff(text: &str, policy: &ValidationConfig, violations: &mut Vec<String>) {
    if text.is_empty() {
        violations.push("Выберите тариф".to_string());
        return;
    }
    if !policy.tariff_allowed(text) {
        violations.push("Выбран недоступный тариф".to_string());
    }
}

fn check_comment(text: &str, violations: &mut Vec<String>) {
    if text.chars().count() > COMMENT_MAX {
        violations.push(format!(
            "Комментарий не должен превышать {COMMENT_MAX} символов"
        ));
    }
}
