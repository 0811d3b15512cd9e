//! The import pipeline: parse, detect, resolve conflicts, place, reconstruct.
//!
//! Every stage is a pure transform over owned data. Nothing here touches the
//! destination graph; the caller receives an [`ImportedData`] fragment and decides
//! how to merge it.

mod conflict;
mod options;
mod reconstruct;

pub use options::{ConflictStrategy, ImportOptions};

use crate::error::{ImportError, OptionsError};
use crate::geometry::offset_to_position;
use crate::identity::IdGenerator;
use crate::model::{Connection, LiveEdge, LiveNode, Position, Viewport, VisualNode, WorkflowConfig};
use crate::schema::{self, DocumentContents, Generation};
use crate::style::{DefaultEdgeStyles, EdgeStyleTable};
use ahash::AHashSet;
use conflict::Resolution;
use serde::Serialize;
use serde_json::Value;
use std::fmt;
use std::sync::Arc;
use tracing::{info, warn};

/// Non-fatal findings about references the schema does not check.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum ImportWarning {
    /// An edge endpoint names a node that is not in the document.
    #[serde(rename_all = "camelCase")]
    DanglingEdge { edge_id: String, missing_node: String },
    /// A node's parent is not in the document.
    #[serde(rename_all = "camelCase")]
    MissingParent { node_id: String, parent_id: String },
}

impl fmt::Display for ImportWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ImportWarning::DanglingEdge {
                edge_id,
                missing_node,
            } => write!(f, "Edge '{}' references missing node '{}'", edge_id, missing_node),
            ImportWarning::MissingParent { node_id, parent_id } => {
                write!(f, "Node '{}' references missing parent '{}'", node_id, parent_id)
            }
        }
    }
}

/// Counters describing what an import did.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ImportStats {
    pub generation: Generation,
    pub nodes_imported: usize,
    pub nodes_skipped: usize,
    pub nodes_remapped: usize,
    pub edges_imported: usize,
    pub edges_dropped: usize,
    /// Edges that received a fresh id.
    pub edges_renamed: usize,
}

/// A graph fragment ready to merge into, or replace, the destination canvas.
#[derive(Debug, Clone, PartialEq)]
pub struct ImportedData {
    pub nodes: Vec<LiveNode>,
    pub edges: Vec<LiveEdge>,
    /// Only set for full, non-partial imports.
    pub workflow_config: Option<WorkflowConfig>,
    /// Only set for full, non-partial imports.
    pub viewport: Option<Viewport>,
    pub is_partial: bool,
    pub generation: Generation,
    pub stats: ImportStats,
    pub warnings: Vec<ImportWarning>,
}

pub struct Importer {
    options: ImportOptions,
    styles: Arc<dyn EdgeStyleTable>,
    ids: Arc<IdGenerator>,
}

pub struct ImporterBuilder {
    options: ImportOptions,
    styles: Arc<dyn EdgeStyleTable>,
    ids: Option<Arc<IdGenerator>>,
}

impl ImporterBuilder {
    pub fn new() -> Self {
        Self {
            options: ImportOptions::default(),
            styles: Arc::new(DefaultEdgeStyles),
            ids: None,
        }
    }

    pub fn with_options(mut self, options: ImportOptions) -> Self {
        self.options = options;
        self
    }

    pub fn with_strategy(mut self, strategy: ConflictStrategy) -> Self {
        self.options.conflict_strategy = strategy;
        self
    }

    pub fn with_target(mut self, x: f64, y: f64) -> Self {
        self.options.target_position = Some(Position::new(x, y));
        self
    }

    pub fn with_replace_canvas(mut self, replace: bool) -> Self {
        self.options.replace_canvas = replace;
        self
    }

    pub fn with_style_table(mut self, styles: Arc<dyn EdgeStyleTable>) -> Self {
        self.styles = styles;
        self
    }

    pub fn with_id_generator(mut self, ids: Arc<IdGenerator>) -> Self {
        self.ids = Some(ids);
        self
    }

    /// Fails when the assembled options are unusable, such as a non-finite target.
    pub fn build(self) -> Result<Importer, OptionsError> {
        self.options.validate()?;
        Ok(Importer {
            options: self.options,
            styles: self.styles,
            ids: self.ids.unwrap_or_else(IdGenerator::shared),
        })
    }
}

impl Default for ImporterBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl Default for Importer {
    fn default() -> Self {
        Importer {
            options: ImportOptions::default(),
            styles: Arc::new(DefaultEdgeStyles),
            ids: IdGenerator::shared(),
        }
    }
}

impl Importer {
    pub fn builder() -> ImporterBuilder {
        ImporterBuilder::new()
    }

    pub fn options(&self) -> &ImportOptions {
        &self.options
    }

    /// Imports document text against the destination's current id sets.
    pub fn import(
        &self,
        text: &str,
        existing_node_ids: &AHashSet<String>,
        existing_edge_ids: &AHashSet<String>,
    ) -> Result<ImportedData, ImportError> {
        let value: Value = serde_json::from_str(text).map_err(|e| ImportError::InvalidJson {
            message: e.to_string(),
        })?;
        self.import_value(&value, existing_node_ids, existing_edge_ids)
    }

    /// Imports an already-parsed document.
    pub fn import_value(
        &self,
        value: &Value,
        existing_node_ids: &AHashSet<String>,
        existing_edge_ids: &AHashSet<String>,
    ) -> Result<ImportedData, ImportError> {
        let contents = schema::validate(value).into_contents()?;
        if contents.generation == Generation::Legacy {
            warn!(
                node_count = contents.nodes.len(),
                "converted legacy document to the current format"
            );
        }
        Ok(self.assemble(contents, existing_node_ids, existing_edge_ids))
    }

    fn assemble(
        &self,
        contents: DocumentContents,
        existing_node_ids: &AHashSet<String>,
        existing_edge_ids: &AHashSet<String>,
    ) -> ImportedData {
        let DocumentContents {
            generation,
            workflow_config,
            viewport,
            nodes,
            edges,
        } = contents;
        let is_partial = generation == Generation::Partial;
        let warnings = find_dangling_references(&nodes, &edges);

        // A full replace leaves nothing on the canvas to collide with.
        let empty = AHashSet::new();
        let (existing_nodes, existing_edges) = if self.options.replace_canvas {
            (&empty, &empty)
        } else {
            (existing_node_ids, existing_edge_ids)
        };

        let strategy = self.options.conflict_strategy;
        let Resolution {
            nodes,
            edges,
            nodes_skipped,
            nodes_remapped,
            edges_dropped,
            edges_renamed,
        } = conflict::resolve(strategy, nodes, edges, existing_nodes, existing_edges, &self.ids);

        let nodes = match self.options.target_position {
            Some(target) if !self.options.replace_canvas => {
                offset_to_position(&nodes, target.x, target.y)
            }
            _ => nodes,
        };

        let nodes: Vec<LiveNode> = nodes.into_iter().map(reconstruct::reconstruct_node).collect();
        let edges: Vec<LiveEdge> = edges
            .into_iter()
            .map(|edge| reconstruct::reconstruct_edge(edge, self.styles.as_ref()))
            .collect();

        let stats = ImportStats {
            generation,
            nodes_imported: nodes.len(),
            nodes_skipped,
            nodes_remapped,
            edges_imported: edges.len(),
            edges_dropped,
            edges_renamed,
        };
        info!(
            %generation,
            %strategy,
            node_count = stats.nodes_imported,
            edge_count = stats.edges_imported,
            nodes_skipped,
            edges_dropped,
            "imported document"
        );

        let (workflow_config, viewport) = if is_partial {
            (None, None)
        } else {
            (workflow_config, viewport)
        };

        ImportedData {
            nodes,
            edges,
            workflow_config,
            viewport,
            is_partial,
            generation,
            stats,
            warnings,
        }
    }
}

/// Edges and parent links whose targets are absent from the document.
pub fn find_dangling_references(nodes: &[VisualNode], edges: &[Connection]) -> Vec<ImportWarning> {
    let known: AHashSet<&str> = nodes.iter().map(|node| node.id.as_str()).collect();
    let mut warnings = Vec::new();

    for node in nodes {
        if let Some(parent) = node.parent_id.as_deref() {
            if !known.contains(parent) {
                warnings.push(ImportWarning::MissingParent {
                    node_id: node.id.clone(),
                    parent_id: parent.to_string(),
                });
            }
        }
    }
    for edge in edges {
        for endpoint in [&edge.source, &edge.target] {
            if !known.contains(endpoint.as_str()) {
                warnings.push(ImportWarning::DanglingEdge {
                    edge_id: edge.id.clone(),
                    missing_node: endpoint.clone(),
                });
            }
        }
    }

    for warning in &warnings {
        warn!("{}", warning);
    }
    warnings
}
