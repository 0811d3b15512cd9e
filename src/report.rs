use crate::error::{ImportError, ValidationIssue};
use itertools::Itertools;
use std::fmt;

/// Formats validation issues into human-readable lines.
pub struct IssueFormatter;

impl IssueFormatter {
    /// `path: message [code]`, with `(root)` standing in for the empty path.
    pub fn format_issue(issue: &ValidationIssue) -> String {
        format!(
            "{}: {} [{}]",
            Self::format_path(&issue.path),
            issue.message,
            issue.code
        )
    }

    /// One issue per line, in the order they were found.
    pub fn format_issues(issues: &[ValidationIssue]) -> String {
        issues.iter().map(Self::format_issue).join("\n")
    }

    fn format_path(path: &str) -> &str {
        if path.is_empty() { "(root)" } else { path }
    }
}

/// A renderable summary of a failed import.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidationReport {
    pub code: &'static str,
    pub headline: String,
    pub issues: Vec<ValidationIssue>,
}

impl ValidationReport {
    pub fn from_error(error: &ImportError) -> Self {
        Self {
            code: error.code(),
            headline: error.to_string(),
            issues: error.issues().to_vec(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.issues.is_empty()
    }
}

impl fmt::Display for ValidationReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.headline, self.code)?;
        for issue in &self.issues {
            write!(f, "\n  - {}", IssueFormatter::format_issue(issue))?;
        }
        Ok(())
    }
}

impl From<&ImportError> for ValidationReport {
    fn from(error: &ImportError) -> Self {
        Self::from_error(error)
    }
}
