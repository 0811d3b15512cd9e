use crate::error::{IssueCode, ValidationIssue};
use itertools::Itertools;
use serde_json::{Map, Value};
use std::fmt::Display;

/// Appends a segment to a dot path.
pub(crate) fn join(path: &str, segment: impl Display) -> String {
    if path.is_empty() {
        segment.to_string()
    } else {
        format!("{}.{}", path, segment)
    }
}

pub(crate) fn kind_of(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

/// Accumulates issues while walking a raw document. Every check reports and keeps
/// going so one pass surfaces all independent problems.
#[derive(Debug, Default)]
pub(crate) struct Checker {
    issues: Vec<ValidationIssue>,
}

impl Checker {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn is_clean(&self) -> bool {
        self.issues.is_empty()
    }

    pub(crate) fn into_issues(self) -> Vec<ValidationIssue> {
        self.issues
    }

    pub(crate) fn report(&mut self, path: &str, code: IssueCode, message: impl Into<String>) {
        self.issues.push(ValidationIssue::new(path, code, message));
    }

    fn type_mismatch(&mut self, path: &str, expected: &str, found: &Value) {
        self.report(
            path,
            IssueCode::InvalidType,
            format!("Expected {}, received {}", expected, kind_of(found)),
        );
    }

    pub(crate) fn object<'v>(&mut self, value: &'v Value, path: &str) -> Option<&'v Map<String, Value>> {
        match value {
            Value::Object(map) => Some(map),
            other => {
                self.type_mismatch(path, "object", other);
                None
            }
        }
    }

    /// Looks up a mandatory key. Missing and `null` are both reported as required.
    pub(crate) fn required<'v>(
        &mut self,
        obj: &'v Map<String, Value>,
        key: &str,
        path: &str,
    ) -> Option<&'v Value> {
        match obj.get(key) {
            Some(Value::Null) | None => {
                self.report(&join(path, key), IssueCode::InvalidType, "Required");
                None
            }
            Some(value) => Some(value),
        }
    }

    pub(crate) fn string<'v>(&mut self, value: &'v Value, path: &str, min_len: usize) -> Option<&'v str> {
        let Some(text) = value.as_str() else {
            self.type_mismatch(path, "string", value);
            return None;
        };
        if text.chars().count() < min_len {
            self.report(
                path,
                IssueCode::TooSmall,
                format!("String must contain at least {} character(s)", min_len),
            );
            return None;
        }
        Some(text)
    }

    pub(crate) fn number(&mut self, value: &Value, path: &str) -> Option<f64> {
        match value.as_f64() {
            Some(n) if n.is_finite() => Some(n),
            Some(_) => {
                self.report(path, IssueCode::InvalidType, "Expected finite number");
                None
            }
            None => {
                self.type_mismatch(path, "number", value);
                None
            }
        }
    }

    pub(crate) fn count(&mut self, value: &Value, path: &str) -> Option<usize> {
        if let Some(n) = value.as_u64() {
            return usize::try_from(n).ok();
        }
        match value.as_f64() {
            Some(n) if n < 0.0 => {
                self.report(
                    path,
                    IssueCode::TooSmall,
                    "Number must be greater than or equal to 0",
                );
            }
            Some(_) => {
                self.report(path, IssueCode::InvalidType, "Expected integer, received float");
            }
            None => self.type_mismatch(path, "number", value),
        }
        None
    }

    pub(crate) fn boolean(&mut self, value: &Value, path: &str) -> Option<bool> {
        let flag = value.as_bool();
        if flag.is_none() {
            self.type_mismatch(path, "boolean", value);
        }
        flag
    }

    pub(crate) fn array<'v>(&mut self, value: &'v Value, path: &str, min_len: usize) -> Option<&'v [Value]> {
        let Some(items) = value.as_array() else {
            self.type_mismatch(path, "array", value);
            return None;
        };
        if items.len() < min_len {
            self.report(
                path,
                IssueCode::TooSmall,
                format!("Array must contain at least {} element(s)", min_len),
            );
        }
        Some(items)
    }

    pub(crate) fn literal(&mut self, value: &Value, path: &str, expected: &str) -> bool {
        if value.as_str() == Some(expected) {
            return true;
        }
        self.report(
            path,
            IssueCode::InvalidLiteral,
            format!("Invalid literal value, expected \"{}\"", expected),
        );
        false
    }

    pub(crate) fn one_of<'v>(&mut self, value: &'v Value, path: &str, options: &[&str]) -> Option<&'v str> {
        let Some(text) = value.as_str() else {
            self.type_mismatch(path, "string", value);
            return None;
        };
        if options.contains(&text) {
            return Some(text);
        }
        self.report(
            path,
            IssueCode::InvalidEnumValue,
            format!(
                "Invalid enum value. Expected {}, received '{}'",
                options.iter().map(|o| format!("'{}'", o)).join(" | "),
                text
            ),
        );
        None
    }

    /// Checks a key that may be absent. `null` counts as absent.
    pub(crate) fn optional<'v, T>(
        &mut self,
        obj: &'v Map<String, Value>,
        key: &str,
        path: &str,
        check: impl FnOnce(&mut Self, &'v Value, &str) -> Option<T>,
    ) -> Option<T> {
        match obj.get(key) {
            Some(Value::Null) | None => None,
            Some(value) => check(self, value, &join(path, key)),
        }
    }
}
