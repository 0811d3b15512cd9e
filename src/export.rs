use crate::error::ValidationIssue;
use crate::model::{
    Connection, DocumentHeader, LiveEdge, LiveNode, PartialDocument, Viewport, VisualNode,
    WorkflowConfig, WorkflowDocument,
};
use crate::sanitize::{sanitize_edge, sanitize_node};
use crate::schema;
use ahash::AHashSet;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, warn};

/// Export-side settings. Deserializable from a host settings payload.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ExportOptions {
    /// Attach the caller's viewport to the document.
    pub include_viewport: bool,
    /// Re-validate every produced document and emit a diagnostic when it fails.
    pub validate_output: bool,
}

impl Default for ExportOptions {
    fn default() -> Self {
        Self {
            include_viewport: true,
            validate_output: true,
        }
    }
}

/// Turns a live graph snapshot into an immutable document.
///
/// Export is permissive: a document that fails its own validation is still returned,
/// with a `warn` diagnostic listing the issues.
#[derive(Debug, Clone, Default)]
pub struct Exporter {
    options: ExportOptions,
}

pub struct ExporterBuilder {
    options: ExportOptions,
}

impl ExporterBuilder {
    pub fn new() -> Self {
        Self {
            options: ExportOptions::default(),
        }
    }

    pub fn with_options(mut self, options: ExportOptions) -> Self {
        self.options = options;
        self
    }

    pub fn with_viewport(mut self, include: bool) -> Self {
        self.options.include_viewport = include;
        self
    }

    pub fn with_output_validation(mut self, enabled: bool) -> Self {
        self.options.validate_output = enabled;
        self
    }

    pub fn build(self) -> Exporter {
        Exporter {
            options: self.options,
        }
    }
}

impl Default for ExporterBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl Exporter {
    pub fn builder() -> ExporterBuilder {
        ExporterBuilder::new()
    }

    pub fn options(&self) -> &ExportOptions {
        &self.options
    }

    /// Exports the whole canvas.
    pub fn export_full(
        &self,
        nodes: &[LiveNode],
        edges: &[LiveEdge],
        workflow_config: &WorkflowConfig,
        viewport: Option<Viewport>,
    ) -> WorkflowDocument {
        self.export_full_at(nodes, edges, workflow_config, viewport, Utc::now())
    }

    /// Like [`Exporter::export_full`] with an explicit export time.
    pub fn export_full_at(
        &self,
        nodes: &[LiveNode],
        edges: &[LiveEdge],
        workflow_config: &WorkflowConfig,
        viewport: Option<Viewport>,
        exported_at: DateTime<Utc>,
    ) -> WorkflowDocument {
        let nodes: Vec<VisualNode> = nodes.iter().map(sanitize_node).collect();
        let edges: Vec<Connection> = edges.iter().map(sanitize_edge).collect();

        let document = WorkflowDocument {
            header: DocumentHeader::current(exported_at, nodes.len(), edges.len()),
            workflow_config: copy_config(workflow_config),
            viewport: self.viewport(viewport),
            nodes,
            edges,
        };
        debug!(
            node_count = document.nodes.len(),
            edge_count = document.edges.len(),
            "exported workflow"
        );

        if self.options.validate_output {
            self.check_output(serde_json::to_value(&document), "workflow", |value| {
                schema::validate_full(value).map(|_| ())
            });
        }
        document
    }

    /// Exports the selected nodes, their descendants, and the edges between them.
    pub fn export_selection(
        &self,
        all_nodes: &[LiveNode],
        all_edges: &[LiveEdge],
        selected_ids: &AHashSet<String>,
        viewport: Option<Viewport>,
    ) -> PartialDocument {
        self.export_selection_at(all_nodes, all_edges, selected_ids, viewport, Utc::now())
    }

    pub fn export_selection_at(
        &self,
        all_nodes: &[LiveNode],
        all_edges: &[LiveEdge],
        selected_ids: &AHashSet<String>,
        viewport: Option<Viewport>,
        exported_at: DateTime<Utc>,
    ) -> PartialDocument {
        let included = expand_selection(all_nodes, selected_ids);

        let nodes: Vec<VisualNode> = all_nodes
            .iter()
            .filter(|node| included.contains(&node.id))
            .map(sanitize_node)
            .collect();
        let edges: Vec<Connection> = all_edges
            .iter()
            .filter(|edge| included.contains(&edge.source) && included.contains(&edge.target))
            .map(sanitize_edge)
            .collect();

        let document = PartialDocument {
            header: DocumentHeader::current(exported_at, nodes.len(), edges.len()),
            viewport: self.viewport(viewport),
            nodes,
            edges,
        };
        debug!(
            selected = selected_ids.len(),
            node_count = document.nodes.len(),
            edge_count = document.edges.len(),
            "exported selection"
        );

        if self.options.validate_output {
            self.check_output(serde_json::to_value(&document), "selection", |value| {
                schema::validate_partial(value).map(|_| ())
            });
        }
        document
    }

    fn viewport(&self, viewport: Option<Viewport>) -> Option<Viewport> {
        viewport.filter(|_| self.options.include_viewport)
    }

    fn check_output<F>(&self, value: Result<Value, serde_json::Error>, kind: &str, check: F)
    where
        F: FnOnce(&Value) -> Result<(), Vec<ValidationIssue>>,
    {
        let value = match value {
            Ok(value) => value,
            Err(e) => {
                warn!(kind, error = %e, "exported document could not be serialized for validation");
                return;
            }
        };
        if let Err(issues) = check(&value) {
            for issue in &issues {
                warn!(kind, path = %issue.path, code = %issue.code, "{}", issue.message);
            }
            warn!(
                kind,
                issue_count = issues.len(),
                "exported document failed its own validation"
            );
        }
    }
}

/// Extends a selection with every descendant of a selected container.
///
/// Runs to a fixed point, so nesting depth and node order do not matter.
pub fn expand_selection(nodes: &[LiveNode], selected_ids: &AHashSet<String>) -> AHashSet<String> {
    let mut included: AHashSet<String> = nodes
        .iter()
        .filter(|node| selected_ids.contains(&node.id))
        .map(|node| node.id.clone())
        .collect();

    loop {
        let before = included.len();
        for node in nodes {
            let inside_selection = node
                .parent_id
                .as_ref()
                .is_some_and(|parent| included.contains(parent));
            if inside_selection && !included.contains(&node.id) {
                included.insert(node.id.clone());
            }
        }
        if included.len() == before {
            return included;
        }
    }
}

fn copy_config(config: &WorkflowConfig) -> WorkflowConfig {
    WorkflowConfig {
        name: config.name.clone(),
        description: config.description.clone(),
        version: config.version.clone(),
        framework: config.framework.clone(),
        schema_version: config.schema_version.clone(),
        settings: config.settings.clone(),
    }
}
