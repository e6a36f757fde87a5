//! Shape validation over JSON values
//!
//! Walks a value alongside its [`Shape`] and records a [`FieldIssue`] for
//! every rule it breaks. Checking is total: any JSON value produces either
//! `Ok(())` or a validation error, never a panic.

use super::{NumberRule, ObjectShape, Shape, Sign, StringRule, MAX_SAFE_INTEGER};
use crate::config::ValidationConfig;
use crate::errors::{ContractError, FieldIssue, IssueKind};
use regex::Regex;
use serde_json::{Map, Number, Value};
use std::sync::OnceLock;

static EMAIL_PATTERN: OnceLock<Option<Regex>> = OnceLock::new();

fn email_pattern() -> Option<&'static Regex> {
    EMAIL_PATTERN
        .get_or_init(|| {
            Regex::new(
                r"^[A-Za-z0-9_'+\-.]*[A-Za-z0-9_+\-]@([A-Za-z0-9][A-Za-z0-9\-]*\.)+[A-Za-z]{2,}$",
            )
            .ok()
        })
        .as_ref()
}

/// Email syntax check: local part must not start with a dot or contain `..`
pub fn is_valid_email(candidate: &str) -> bool {
    if candidate.starts_with('.') || candidate.contains("..") {
        return false;
    }
    email_pattern().is_some_and(|re| re.is_match(candidate))
}

/// Validate a value against a shape
pub fn validate_shape(
    shape: &Shape,
    value: &Value,
    config: &ValidationConfig,
) -> Result<(), ContractError> {
    let mut validator = ShapeValidator::new(config);
    validator.check(shape, value, "");
    validator.finish()
}

/// Validate an object against an object shape
pub fn validate_object(
    shape: &ObjectShape,
    value: &Value,
    config: &ValidationConfig,
) -> Result<(), ContractError> {
    let mut validator = ShapeValidator::new(config);
    validator.check_object(shape, value, "");
    validator.finish()
}

/// Recursive checker that accumulates issues
pub(crate) struct ShapeValidator<'a> {
    config: &'a ValidationConfig,
    issues: Vec<FieldIssue>,
}

impl<'a> ShapeValidator<'a> {
    pub(crate) fn new(config: &'a ValidationConfig) -> Self {
        Self {
            config,
            issues: Vec::new(),
        }
    }

    pub(crate) fn push(&mut self, issue: FieldIssue) {
        self.issues.push(issue);
    }

    pub(crate) fn finish(mut self) -> Result<(), ContractError> {
        if self.issues.is_empty() {
            return Ok(());
        }
        if !self.config.collect_all_issues {
            self.issues.truncate(1);
        }
        log::debug!(
            "Validation failed with {} issue(s), first at '{}'",
            self.issues.len(),
            self.issues[0].path
        );
        Err(ContractError::from_issues(self.issues))
    }

    pub(crate) fn check(&mut self, shape: &Shape, value: &Value, path: &str) {
        match shape {
            Shape::String(rule) => self.check_string(rule, value, path),
            Shape::Number(rule) => self.check_number(rule, value, path),
            Shape::Boolean => {
                if !value.is_boolean() {
                    self.wrong_type(shape, path);
                }
            }
            Shape::Enum { values } => match value.as_str() {
                Some(s) if values.iter().any(|allowed| *allowed == s) => {}
                Some(_) => self.push(FieldIssue::new(
                    path,
                    IssueKind::NotInEnum {
                        allowed: values.to_vec(),
                    },
                )),
                None => self.wrong_type(shape, path),
            },
            Shape::Literal { value: expected } => {
                if value != expected {
                    self.push(FieldIssue::new(
                        path,
                        IssueKind::LiteralMismatch {
                            expected: expected.clone(),
                        },
                    ));
                }
            }
            Shape::Array { items, min_items } => {
                let Some(elements) = value.as_array() else {
                    self.wrong_type(shape, path);
                    return;
                };
                if elements.len() < *min_items {
                    self.push(FieldIssue::new(
                        path,
                        IssueKind::TooFewItems {
                            min_items: *min_items,
                        },
                    ));
                }
                for (index, element) in elements.iter().enumerate() {
                    self.check(items, element, &format!("{}[{}]", path, index));
                }
            }
            Shape::Nullable { inner } => {
                if !value.is_null() {
                    self.check(inner, value, path);
                }
            }
            Shape::Object(object) => self.check_object(object, value, path),
        }
    }

    pub(crate) fn check_object(&mut self, shape: &ObjectShape, value: &Value, path: &str) {
        let Some(map) = value.as_object() else {
            self.push(FieldIssue::new(
                path,
                IssueKind::WrongType {
                    expected: "an object",
                },
            ));
            return;
        };

        for spec in &shape.fields {
            let field_path = join_path(path, spec.name);
            match map.get(spec.name) {
                None if spec.optional => {}
                None => self.push(FieldIssue::new(field_path, IssueKind::MissingField)),
                Some(field_value) => self.check(&spec.shape, field_value, &field_path),
            }
        }

        if self.config.strict {
            self.check_unknown_fields(shape, map, path);
        }
    }

    fn check_unknown_fields(&mut self, shape: &ObjectShape, map: &Map<String, Value>, path: &str) {
        for key in map.keys() {
            if !shape.has_field(key) {
                self.push(FieldIssue::new(
                    join_path(path, key),
                    IssueKind::UnknownField,
                ));
            }
        }
    }

    fn check_string(&mut self, rule: &StringRule, value: &Value, path: &str) {
        let Some(s) = value.as_str() else {
            self.push(FieldIssue::new(
                path,
                IssueKind::WrongType {
                    expected: "a string",
                },
            ));
            return;
        };

        if s.chars().count() < rule.min_len {
            self.push(FieldIssue::new(
                path,
                IssueKind::TooShort {
                    min_len: rule.min_len,
                },
            ));
        } else if rule.email && !is_valid_email(s) {
            self.push(FieldIssue::new(path, IssueKind::InvalidEmail));
        }
    }

    fn check_number(&mut self, rule: &NumberRule, value: &Value, path: &str) {
        let Value::Number(number) = value else {
            self.push(FieldIssue::new(
                path,
                IssueKind::WrongType {
                    expected: "a number",
                },
            ));
            return;
        };

        if rule.integer && !is_integral(number) {
            self.push(FieldIssue::new(path, IssueKind::NotInteger));
            return;
        }
        if rule.integer && !is_safe_integer(number) {
            self.push(FieldIssue::new(
                path,
                IssueKind::UnsafeInteger {
                    max: MAX_SAFE_INTEGER,
                },
            ));
            return;
        }

        let as_float = number.as_f64().unwrap_or(0.0);
        match rule.sign {
            Sign::Any => {}
            Sign::NonNegative if as_float < 0.0 => {
                self.push(FieldIssue::new(path, IssueKind::Negative));
            }
            Sign::Positive if as_float <= 0.0 => {
                self.push(FieldIssue::new(path, IssueKind::NotPositive));
            }
            _ => {}
        }
    }

    fn wrong_type(&mut self, shape: &Shape, path: &str) {
        self.push(FieldIssue::new(
            path,
            IssueKind::WrongType {
                expected: shape.type_name(),
            },
        ));
    }
}

fn is_integral(number: &Number) -> bool {
    number.is_i64()
        || number.is_u64()
        || number.as_f64().is_some_and(|f| f.is_finite() && f.fract() == 0.0)
}

fn is_safe_integer(number: &Number) -> bool {
    number
        .as_f64()
        .is_some_and(|f| f.abs() <= MAX_SAFE_INTEGER as f64)
}

pub(crate) fn join_path(parent: &str, field: &str) -> String {
    if parent.is_empty() {
        field.to_string()
    } else {
        format!("{}.{}", parent, field)
    }
}
