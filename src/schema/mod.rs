//! Format detection and structural validation.
//!
//! A raw value is tried against the three document generations in priority order and
//! the outcome is a single [`Detected`] variant. Each generation is validated in two
//! passes: a structural walk that collects every issue with its dot path, then a typed
//! decode into the model. The walk is what callers see when a document is rejected.

mod document;
mod issues;
mod legacy;

pub use legacy::looks_legacy;

use crate::convert::IntoWorkflowDocument;
use crate::error::{ImportError, IssueCode, ValidationIssue};
use crate::model::{
    Connection, LegacyDocument, PartialDocument, Viewport, VisualNode, WorkflowConfig,
    WorkflowDocument,
};
use issues::Checker;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;
use tracing::debug;

/// The document generations the engine understands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Generation {
    /// A complete export with a versioned header.
    Current,
    /// A selection-scoped export without workflow configuration.
    Partial,
    /// The oldest header-less shape.
    Legacy,
}

impl Generation {
    pub fn as_str(&self) -> &'static str {
        match self {
            Generation::Current => "current",
            Generation::Partial => "partial",
            Generation::Legacy => "legacy",
        }
    }
}

impl fmt::Display for Generation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Why a value matched none of the generations.
#[derive(Debug, Clone, PartialEq)]
pub struct Rejection {
    /// The generation whose issues are surfaced. `None` when the value is not even a
    /// JSON object and so resembles no generation at all.
    pub generation: Option<Generation>,
    pub issues: Vec<ValidationIssue>,
}

impl From<Rejection> for ImportError {
    fn from(rejection: Rejection) -> Self {
        match rejection.generation {
            Some(generation) => ImportError::SchemaValidationFailed {
                generation,
                issues: rejection.issues,
            },
            None => ImportError::UnknownFormat {
                issues: rejection.issues,
            },
        }
    }
}

/// Outcome of the format cascade. The first generation that matches wins.
#[derive(Debug, Clone, PartialEq)]
pub enum Detected {
    Full(WorkflowDocument),
    Partial(PartialDocument),
    /// A legacy document, already lifted into the current shape.
    Legacy(WorkflowDocument),
    Invalid(Rejection),
}

impl Detected {
    pub fn generation(&self) -> Option<Generation> {
        match self {
            Detected::Full(_) => Some(Generation::Current),
            Detected::Partial(_) => Some(Generation::Partial),
            Detected::Legacy(_) => Some(Generation::Legacy),
            Detected::Invalid(_) => None,
        }
    }

    pub fn is_valid(&self) -> bool {
        !matches!(self, Detected::Invalid(_))
    }

    pub fn is_partial(&self) -> bool {
        matches!(self, Detected::Partial(_))
    }

    /// Counted from the node array, never taken from the header.
    pub fn node_count(&self) -> usize {
        match self {
            Detected::Full(doc) | Detected::Legacy(doc) => doc.nodes.len(),
            Detected::Partial(doc) => doc.nodes.len(),
            Detected::Invalid(_) => 0,
        }
    }

    pub fn edge_count(&self) -> usize {
        match self {
            Detected::Full(doc) | Detected::Legacy(doc) => doc.edges.len(),
            Detected::Partial(doc) => doc.edges.len(),
            Detected::Invalid(_) => 0,
        }
    }

    pub fn nodes(&self) -> &[VisualNode] {
        match self {
            Detected::Full(doc) | Detected::Legacy(doc) => &doc.nodes,
            Detected::Partial(doc) => &doc.nodes,
            Detected::Invalid(_) => &[],
        }
    }

    /// A one-line description such as `current document: 4 node(s), 3 edge(s)`.
    pub fn summary(&self) -> String {
        match self {
            Detected::Invalid(rejection) => {
                format!("invalid document: {} issue(s)", rejection.issues.len())
            }
            valid => format!(
                "{} document: {} node(s), {} edge(s)",
                valid.generation().map_or("unknown", |g| g.as_str()),
                valid.node_count(),
                valid.edge_count()
            ),
        }
    }

    /// Converts the outcome into a plain result, lifting a rejection into an [`ImportError`].
    pub fn into_contents(self) -> Result<DocumentContents, ImportError> {
        match self {
            Detected::Full(doc) => Ok(DocumentContents::from_full(Generation::Current, doc)),
            Detected::Legacy(doc) => Ok(DocumentContents::from_full(Generation::Legacy, doc)),
            Detected::Partial(doc) => Ok(DocumentContents {
                generation: Generation::Partial,
                workflow_config: None,
                viewport: None,
                nodes: doc.nodes,
                edges: doc.edges,
            }),
            Detected::Invalid(rejection) => Err(rejection.into()),
        }
    }
}

/// The graph carried by an accepted document, independent of its generation.
#[derive(Debug, Clone, PartialEq)]
pub struct DocumentContents {
    pub generation: Generation,
    /// Present for full and legacy documents only.
    pub workflow_config: Option<WorkflowConfig>,
    pub viewport: Option<Viewport>,
    pub nodes: Vec<VisualNode>,
    pub edges: Vec<Connection>,
}

impl DocumentContents {
    fn from_full(generation: Generation, doc: WorkflowDocument) -> Self {
        Self {
            generation,
            workflow_config: Some(doc.workflow_config),
            viewport: doc.viewport,
            nodes: doc.nodes,
            edges: doc.edges,
        }
    }

    pub fn is_partial(&self) -> bool {
        self.generation == Generation::Partial
    }
}

/// Runs the format cascade over an already-parsed value.
///
/// On total failure the issues surfaced follow a shape heuristic: a value with root
/// `id` and `name` but no `header` reports the legacy issues, anything else reports
/// the full-document issues. The heuristic is best-effort and can misroute a document
/// that merely happens to carry those keys.
pub fn validate(value: &Value) -> Detected {
    let full_issues = match validate_full(value) {
        Ok(doc) => {
            debug!(generation = "current", node_count = doc.nodes.len(), "document matched");
            return Detected::Full(doc);
        }
        Err(issues) => issues,
    };

    // A document that declares workflow configuration is a full export; never downgrade it.
    let declares_config = value.get("workflowConfig").is_some_and(|v| !v.is_null());
    if !declares_config {
        if let Ok(doc) = validate_partial(value) {
            debug!(generation = "partial", node_count = doc.nodes.len(), "document matched");
            return Detected::Partial(doc);
        }
    }

    let legacy_issues = match validate_legacy(value) {
        Ok(doc) => {
            debug!(generation = "legacy", node_count = doc.nodes.len(), "document matched");
            return Detected::Legacy(doc);
        }
        Err(issues) => issues,
    };

    let rejection = if !value.is_object() {
        Rejection {
            generation: None,
            issues: full_issues,
        }
    } else if looks_legacy(value) {
        Rejection {
            generation: Some(Generation::Legacy),
            issues: legacy_issues,
        }
    } else {
        Rejection {
            generation: Some(Generation::Current),
            issues: full_issues,
        }
    };
    debug!(issue_count = rejection.issues.len(), "document matched no generation");
    Detected::Invalid(rejection)
}

/// Parses text and runs the cascade. Parse failures are terminal.
pub fn validate_text(text: &str) -> Result<Detected, ImportError> {
    let value: Value = serde_json::from_str(text).map_err(|e| ImportError::InvalidJson {
        message: e.to_string(),
    })?;
    Ok(validate(&value))
}

pub fn validate_full(value: &Value) -> Result<WorkflowDocument, Vec<ValidationIssue>> {
    let mut checker = Checker::new();
    document::check_full(&mut checker, value);
    decode(checker, value)
}

pub fn validate_partial(value: &Value) -> Result<PartialDocument, Vec<ValidationIssue>> {
    let mut checker = Checker::new();
    document::check_partial(&mut checker, value);
    decode(checker, value)
}

/// Validates the oldest generation and lifts it into the current shape.
pub fn validate_legacy(value: &Value) -> Result<WorkflowDocument, Vec<ValidationIssue>> {
    let mut checker = Checker::new();
    legacy::check_legacy(&mut checker, value);
    let legacy: LegacyDocument = decode(checker, value)?;
    legacy
        .into_workflow_document()
        .map_err(|e| vec![e.into_issue()])
}

fn decode<T: DeserializeOwned>(checker: Checker, value: &Value) -> Result<T, Vec<ValidationIssue>> {
    if !checker.is_clean() {
        return Err(checker.into_issues());
    }
    serde_json::from_value(value.clone())
        .map_err(|e| vec![ValidationIssue::new("", IssueCode::Custom, e.to_string())])
}
