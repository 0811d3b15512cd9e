//! # flowdoc - Workflow Document Persistence Engine
//!
//! **flowdoc** turns the live node-and-edge graph of an agent workflow editor into a
//! portable, versioned document, and turns such documents back into a graph fragment
//! that is safe to merge into an existing canvas.
//!
//! ## Core Workflow
//!
//! 1.  **Export**: An [`export::Exporter`] sanitizes live nodes and edges, drops
//!     session-only state, and stamps a versioned header. Whole canvases become a
//!     [`model::WorkflowDocument`], selections become a [`model::PartialDocument`].
//! 2.  **Detect**: [`schema::validate`] tries the current, partial, and legacy
//!     generations in that order. Legacy documents are lifted into the current shape
//!     through [`convert::IntoWorkflowDocument`].
//! 3.  **Import**: An [`import::Importer`] resolves id collisions per its
//!     [`import::ConflictStrategy`], optionally centers the graph on a drop point,
//!     and rebuilds edge visuals from the active [`style::EdgeStyleTable`].
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use flowdoc::prelude::*;
//! use ahash::AHashSet;
//!
//! fn main() -> Result<()> {
//!     let nodes = vec![
//!         LiveNode::new("agent-1", NodeType::Agent, "Planner", Position::new(0.0, 0.0)),
//!         LiveNode::new("tool-1", NodeType::Tool, "Search", Position::new(300.0, 0.0)),
//!     ];
//!     let edges = vec![LiveEdge::new("e1", "agent-1", "tool-1").with_type("tool")];
//!
//!     let document = Exporter::builder()
//!         .build()
//!         .export_full(&nodes, &edges, &WorkflowConfig::named("Research"), None);
//!     let text = document.to_json_pretty()?;
//!
//!     let existing: AHashSet<String> = nodes.iter().map(|n| n.id.clone()).collect();
//!     let importer = Importer::builder()
//!         .with_strategy(ConflictStrategy::Regenerate)
//!         .with_target(640.0, 360.0)
//!         .build()?;
//!
//!     match importer.import(&text, &existing, &AHashSet::new()) {
//!         Ok(imported) => println!("imported {} node(s)", imported.nodes.len()),
//!         Err(error) => eprintln!("{}", ValidationReport::from_error(&error)),
//!     }
//!     Ok(())
//! }
//! ```

pub mod convert;
pub mod error;
pub mod export;
pub mod geometry;
pub mod identity;
pub mod import;
pub mod model;
pub mod prelude;
pub mod report;
pub mod sanitize;
pub mod schema;
pub mod style;
