//! Validator contract and the default rule engine
//!
//! The binder only consumes the pass/fail + violation-list contract of
//! [`Validator`]; [`RuleValidator`] is the bundled engine for the
//! [`Constraint`] set.

use lazy_static::lazy_static;
use regex::Regex;
use serde_json::Value;

use crate::payload::Payload;
use crate::rules::{Constraint, FieldRules, Rules};
use crate::violations::ViolationList;

lazy_static! {
    /// Pragmatic email shape: something@something.tld
    static ref EMAIL_REGEX: Regex = Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").unwrap();

    /// URL pattern for http(s) links
    static ref URL_REGEX: Regex = Regex::new(r"^https?://[^\s/$.?#].[^\s]*$").unwrap();
}

/// Runs a rule tree against a payload, producing an ordered violation list.
pub trait Validator: Send + Sync {
    fn validate(&self, payload: &Payload, rules: &Rules) -> ViolationList;
}

/// Default validation engine for the [`Constraint`] set.
///
/// Required fields that are missing (or JSON null) yield a single
/// "is required" violation and skip their remaining constraints; optional
/// missing fields are skipped entirely.
#[derive(Debug, Clone, Copy, Default)]
pub struct RuleValidator;

impl Validator for RuleValidator {
    fn validate(&self, payload: &Payload, rules: &Rules) -> ViolationList {
        let mut errors = ViolationList::new();
        for field in rules.fields() {
            check_field(payload, field, None, &mut errors);
        }
        errors
    }
}

fn check_field(payload: &Payload, field: &FieldRules, prefix: Option<&str>, errors: &mut ViolationList) {
    let path = match prefix {
        Some(prefix) => format!("{}.{}", prefix, field.path),
        None => field.path.clone(),
    };

    match payload.get(&field.path) {
        None | Some(Value::Null) => {
            if !field.optional {
                errors.add(path, "is required");
            }
        }
        Some(value) => check_value(&path, value, &field.constraints, errors),
    }
}

fn check_value(path: &str, value: &Value, constraints: &[Constraint], errors: &mut ViolationList) {
    for constraint in constraints {
        match constraint {
            Constraint::Nested(rules) => match Payload::from_value(value.clone()) {
                Some(nested) => {
                    for field in rules.fields() {
                        check_field(&nested, field, Some(path), errors);
                    }
                }
                None => errors.add(path, "must be an object"),
            },
            Constraint::Each(inner) => match value {
                Value::Array(items) => {
                    for (index, item) in items.iter().enumerate() {
                        check_value(&format!("{}[{}]", path, index), item, inner, errors);
                    }
                }
                _ => errors.add(path, "must be an array"),
            },
            scalar => {
                if let Err(message) = check_scalar(value, scalar) {
                    errors.add(path, message);
                }
            }
        }
    }
}

fn check_scalar(value: &Value, constraint: &Constraint) -> Result<(), String> {
    match constraint {
        Constraint::NotBlank => validate_not_blank(value),
        Constraint::Length { min, max } => validate_length(string_value(value)?, *min, *max),
        Constraint::Email => validate_email(string_value(value)?),
        Constraint::Url => validate_url(string_value(value)?),
        Constraint::Matches(pattern) => validate_pattern(string_value(value)?, pattern),
        Constraint::OneOf(options) => validate_one_of(string_value(value)?, options),
        // Handled structurally in check_value.
        Constraint::Nested(_) | Constraint::Each(_) => Ok(()),
    }
}

fn string_value(value: &Value) -> Result<&str, String> {
    value.as_str().ok_or_else(|| "must be a string".to_string())
}

fn validate_not_blank(value: &Value) -> Result<(), String> {
    let blank = match value {
        Value::String(s) => s.trim().is_empty(),
        Value::Null => true,
        _ => false,
    };
    if blank {
        return Err("must not be blank".to_string());
    }
    Ok(())
}

fn validate_length(value: &str, min: Option<usize>, max: Option<usize>) -> Result<(), String> {
    let len = value.chars().count();
    if let Some(min) = min {
        if len < min {
            return Err(format!("must be at least {} characters", min));
        }
    }
    if let Some(max) = max {
        if len > max {
            return Err(format!("must be at most {} characters", max));
        }
    }
    Ok(())
}

fn validate_email(value: &str) -> Result<(), String> {
    if !EMAIL_REGEX.is_match(value.trim()) {
        return Err("must be a valid email address".to_string());
    }
    Ok(())
}

fn validate_url(value: &str) -> Result<(), String> {
    if !URL_REGEX.is_match(value.trim()) {
        return Err("must be a valid URL (starting with http:// or https://)".to_string());
    }
    Ok(())
}

fn validate_pattern(value: &str, pattern: &Regex) -> Result<(), String> {
    if !pattern.is_match(value) {
        return Err(format!("must match pattern {}", pattern.as_str()));
    }
    Ok(())
}

fn validate_one_of(value: &str, options: &[String]) -> Result<(), String> {
    if !options.iter().any(|option| option == value) {
        return Err(format!("must be one of: {}", options.join(", ")));
    }
    Ok(())
}
