use crate::report::IssueFormatter;
use crate::schema::Generation;
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Machine-readable classification of a single validation issue.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IssueCode {
    InvalidType,
    InvalidLiteral,
    InvalidEnumValue,
    InvalidString,
    InvalidDate,
    TooSmall,
    TooBig,
    Custom,
}

impl IssueCode {
    pub fn as_str(&self) -> &'static str {
        match self {
            IssueCode::InvalidType => "invalid_type",
            IssueCode::InvalidLiteral => "invalid_literal",
            IssueCode::InvalidEnumValue => "invalid_enum_value",
            IssueCode::InvalidString => "invalid_string",
            IssueCode::InvalidDate => "invalid_date",
            IssueCode::TooSmall => "too_small",
            IssueCode::TooBig => "too_big",
            IssueCode::Custom => "custom",
        }
    }
}

impl fmt::Display for IssueCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One field-level problem found while validating a document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationIssue {
    /// Dot-separated location, e.g. `nodes.2.data.type`. Empty for the root.
    pub path: String,
    pub message: String,
    pub code: IssueCode,
}

impl ValidationIssue {
    pub fn new(path: impl Into<String>, code: IssueCode, message: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            message: message.into(),
            code,
        }
    }
}

impl fmt::Display for ValidationIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&IssueFormatter::format_issue(self))
    }
}

/// Errors that terminate an import. No partial result accompanies them.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ImportError {
    #[error("Document is not valid JSON: {message}")]
    InvalidJson { message: String },

    #[error("Document failed {generation} validation with {} issue(s)", .issues.len())]
    SchemaValidationFailed {
        generation: Generation,
        issues: Vec<ValidationIssue>,
    },

    #[error("Document does not match any known format ({} issue(s))", .issues.len())]
    UnknownFormat { issues: Vec<ValidationIssue> },
}

impl ImportError {
    /// The stable taxonomy code the shell keys its error rendering on.
    pub fn code(&self) -> &'static str {
        match self {
            ImportError::InvalidJson { .. } => "invalid_json",
            ImportError::SchemaValidationFailed { .. } => "schema_validation_failed",
            ImportError::UnknownFormat { .. } => "unknown_format",
        }
    }

    pub fn issues(&self) -> &[ValidationIssue] {
        match self {
            ImportError::InvalidJson { .. } => &[],
            ImportError::SchemaValidationFailed { issues, .. }
            | ImportError::UnknownFormat { issues } => issues,
        }
    }
}

/// Errors raised while lifting a legacy document into the current shape.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConversionError {
    #[error("Legacy node '{node_id}' has no node type in either `data.type` or `type`")]
    MissingNodeType { node_id: String, index: usize },

    #[error("Legacy node '{node_id}' has an unknown node type: '{type_name}'")]
    UnknownNodeType {
        node_id: String,
        index: usize,
        type_name: String,
    },
}

impl ConversionError {
    pub fn into_issue(self) -> ValidationIssue {
        let message = self.to_string();
        match self {
            ConversionError::MissingNodeType { index, .. } => ValidationIssue::new(
                format!("nodes.{}.data.type", index),
                IssueCode::InvalidType,
                message,
            ),
            ConversionError::UnknownNodeType { index, .. } => ValidationIssue::new(
                format!("nodes.{}.data.type", index),
                IssueCode::InvalidEnumValue,
                message,
            ),
        }
    }
}

/// Errors raised while loading pipeline options from a host payload.
#[derive(Error, Debug)]
pub enum OptionsError {
    #[error("Failed to parse options JSON: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Target position must be finite, got ({x}, {y})")]
    NonFiniteTarget { x: f64, y: f64 },
}
