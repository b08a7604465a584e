//! Declarative field validation
//!
//! A [`Validator`] is an ordered set of rules evaluated against one input
//! value. Every rule contributes at most one [`Violation`] and the validator
//! reports all of them at once, so callers can answer a request with the
//! complete list instead of failing on the first problem.

use std::sync::LazyLock;

use chrono::NaiveDate;
use regex::Regex;
use serde::{Deserialize, Serialize};

/// Which constraint a field broke
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum ViolationCode {
    NotBlank,
    Email,
    PastOrPresent,
}

/// A single failed constraint on a named field
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Violation {
    pub field: String,
    pub code: ViolationCode,
    pub message: String,
}

impl Violation {
    pub fn new(field: &str, code: ViolationCode, message: &str) -> Self {
        Self {
            field: field.to_string(),
            code,
            message: message.to_string(),
        }
    }
}

/// Values rules may depend on besides the input itself
#[derive(Debug, Clone, Copy)]
pub struct ValidationContext {
    pub today: NaiveDate,
}

impl ValidationContext {
    pub fn new(today: NaiveDate) -> Self {
        Self { today }
    }
}

type Rule<T> = Box<dyn Fn(&T, &ValidationContext) -> Option<Violation> + Send + Sync>;

/// Ordered, composable rule set for values of type `T`
pub struct Validator<T> {
    rules: Vec<Rule<T>>,
}

impl<T> Validator<T> {
    pub fn new() -> Self {
        Self { rules: Vec::new() }
    }

    /// Append a rule
    pub fn rule<F>(mut self, rule: F) -> Self
    where
        F: Fn(&T, &ValidationContext) -> Option<Violation> + Send + Sync + 'static,
    {
        self.rules.push(Box::new(rule));
        self
    }

    /// Evaluate every rule and collect all violations, in rule order
    pub fn violations(&self, input: &T, ctx: &ValidationContext) -> Vec<Violation> {
        self.rules.iter().filter_map(|rule| rule(input, ctx)).collect()
    }

    pub fn validate(&self, input: &T, ctx: &ValidationContext) -> Result<(), Vec<Violation>> {
        let violations = self.violations(input, ctx);
        if violations.is_empty() {
            Ok(())
        } else {
            Err(violations)
        }
    }
}

impl<T> Default for Validator<T> {
    fn default() -> Self {
        Self::new()
    }
}

/// Field must be present and contain a non-whitespace character
pub fn not_blank<T: 'static>(
    field: &'static str,
    get: fn(&T) -> Option<&str>,
) -> impl Fn(&T, &ValidationContext) -> Option<Violation> + Send + Sync + 'static {
    move |input, _| match get(input) {
        Some(value) if !value.trim().is_empty() => None,
        _ => Some(Violation::new(field, ViolationCode::NotBlank, "must not be blank")),
    }
}

/// Field, when present, must be a well-formed email address
pub fn email<T: 'static>(
    field: &'static str,
    get: fn(&T) -> Option<&str>,
) -> impl Fn(&T, &ValidationContext) -> Option<Violation> + Send + Sync + 'static {
    move |input, _| match get(input) {
        Some(value) if !is_valid_email(value) => Some(Violation::new(
            field,
            ViolationCode::Email,
            "must be a well-formed email address",
        )),
        _ => None,
    }
}

/// Field, when present, must not be after the context's `today`
pub fn past_or_present<T: 'static>(
    field: &'static str,
    get: fn(&T) -> Option<NaiveDate>,
) -> impl Fn(&T, &ValidationContext) -> Option<Violation> + Send + Sync + 'static {
    move |input, ctx| match get(input) {
        Some(date) if date > ctx.today => Some(Violation::new(
            field,
            ViolationCode::PastOrPresent,
            "must be a date in the past or in the present",
        )),
        _ => None,
    }
}

const MAX_EMAIL_LEN: usize = 254;
const MAX_LOCAL_PART_LEN: usize = 64;

static EMAIL_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(concat!(
        r"^[A-Za-z0-9.!#$%&'*+/=?^_`{|}~-]+",
        r"@[A-Za-z0-9](?:[A-Za-z0-9-]{0,61}[A-Za-z0-9])?",
        r"(?:\.[A-Za-z0-9](?:[A-Za-z0-9-]{0,61}[A-Za-z0-9])?)*$",
    ))
    .expect("email pattern is a valid regex")
});

/// Syntactic email check (no DNS lookup)
pub fn is_valid_email(value: &str) -> bool {
    if value.len() > MAX_EMAIL_LEN {
        return false;
    }
    match value.split_once('@') {
        Some((local, _)) if local.len() <= MAX_LOCAL_PART_LEN => {}
        _ => return false,
    }
    if value.starts_with('.') || value.contains(".@") || value.contains("..") {
        return false;
    }
    EMAIL_PATTERN.is_match(value)
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Form {
        name: Option<String>,
        contact: Option<String>,
        since: Option<NaiveDate>,
    }

    fn form_validator() -> Validator<Form> {
        Validator::new()
            .rule(not_blank("name", |f: &Form| f.name.as_deref()))
            .rule(email("contact", |f: &Form| f.contact.as_deref()))
            .rule(past_or_present("since", |f: &Form| f.since))
    }

    fn ctx() -> ValidationContext {
        ValidationContext::new(NaiveDate::from_ymd_opt(2024, 6, 1).unwrap())
    }

    #[test]
    fn valid_form_passes() {
        let form = Form {
            name: Some("Ada".into()),
            contact: Some("ada@example.org".into()),
            since: NaiveDate::from_ymd_opt(2024, 6, 1),
        };
        assert!(form_validator().validate(&form, &ctx()).is_ok());
    }

    #[test]
    fn all_violations_reported_in_rule_order() {
        let form = Form {
            name: Some("   ".into()),
            contact: Some("bad/email".into()),
            since: NaiveDate::from_ymd_opt(2024, 6, 2),
        };
        let violations = form_validator().validate(&form, &ctx()).unwrap_err();

        let codes: Vec<_> = violations.iter().map(|v| v.code).collect();
        assert_eq!(
            codes,
            vec![
                ViolationCode::NotBlank,
                ViolationCode::Email,
                ViolationCode::PastOrPresent
            ]
        );
        assert_eq!(violations[0].field, "name");
    }

    #[test]
    fn missing_optional_fields_are_fine() {
        let form = Form {
            name: Some("Ada".into()),
            contact: None,
            since: None,
        };
        assert!(form_validator().validate(&form, &ctx()).is_ok());
    }

    #[test]
    fn missing_required_field_is_blank() {
        let form = Form {
            name: None,
            contact: None,
            since: None,
        };
        let violations = form_validator().violations(&form, &ctx());
        assert_eq!(violations.len(), 1);
        assert_eq!(violations[0].code, ViolationCode::NotBlank);
    }

    #[test]
    fn email_syntax() {
        assert!(is_valid_email("phillip.spec@example.com"));
        assert!(is_valid_email("a+tag@sub.example.co.uk"));
        assert!(is_valid_email("someone@localhost"));

        assert!(!is_valid_email("bad/email"));
        assert!(!is_valid_email("no-at-sign.example.com"));
        assert!(!is_valid_email("two@@example.com"));
        assert!(!is_valid_email("@example.com"));
        assert!(!is_valid_email("user@"));
        assert!(!is_valid_email("user@-example.com"));
        assert!(!is_valid_email("user..dots@example.com"));
        assert!(!is_valid_email(".user@example.com"));
        assert!(!is_valid_email("user.@example.com"));
        assert!(!is_valid_email("with space@example.com"));
        assert!(!is_valid_email(&format!("{}@example.com", "a".repeat(65))));
    }
}
