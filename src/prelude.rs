//! Prelude module for convenient imports
//!
//! Re-exports the types most callers need to export and import workflow documents.
//!
//! # Example
//!
//! ```rust,no_run
//! use flowdoc::prelude::*;
//!
//! # fn run_example() -> Result<()> {
//! let text = std::fs::read_to_string("path/to/workflow.json")?;
//! let detected = validate_text(&text)?;
//! println!("{}", detected.summary());
//! # Ok(())
//! # }
//! ```

// Pipelines
pub use crate::export::{ExportOptions, Exporter};
pub use crate::import::{ConflictStrategy, ImportOptions, ImportedData, Importer};

// Document model
pub use crate::model::{
    Connection, LiveEdge, LiveNode, NodeStyle, NodeType, PartialDocument, Position, Viewport,
    VisualNode, WorkflowConfig, WorkflowDocument,
};

// Detection and geometry
pub use crate::geometry::{BoundingBox, compute_bounding_box, offset_to_position};
pub use crate::identity::IdGenerator;
pub use crate::schema::{Detected, Generation, validate, validate_text};

// Error types and reporting
pub use crate::error::{ImportError, ValidationIssue};
pub use crate::report::{IssueFormatter, ValidationReport};

// Result type alias for convenience
pub type Result<T> = std::result::Result<T, Box<dyn std::error::Error>>;
