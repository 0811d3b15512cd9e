use crate::error::ConversionError;
use crate::model::{
    Connection, DEFAULT_EDGE_KIND, DocumentHeader, Extent, LegacyDocument, LegacyEdge, LegacyNode,
    NodeData, NodeStyle, NodeType, VisualNode, WorkflowConfig, WorkflowDocument,
};
use crate::sanitize::TRANSIENT_DATA_KEYS;
use chrono::Utc;
use serde_json::{Map, Value};
use std::str::FromStr;

/// Framework selected for workflows lifted from the oldest generation.
pub const LEGACY_FRAMEWORK: &str = "langgraph";
/// Schema selector stamped on workflows lifted from the oldest generation.
pub const LEGACY_SCHEMA_VERSION: &str = "1.0";
/// Version stamped on workflows lifted from the oldest generation.
pub const LEGACY_WORKFLOW_VERSION: &str = "1.0.0";

/// A trait for older document shapes that can be lifted into a current-generation
/// [`WorkflowDocument`].
///
/// The import pipeline only ever sees current-generation documents; every older
/// shape is absorbed by an implementation of this trait.
///
/// # Example
///
/// ```rust,no_run
/// use flowdoc::convert::IntoWorkflowDocument;
/// use flowdoc::model::LegacyDocument;
///
/// # fn run(legacy: LegacyDocument) -> Result<(), flowdoc::error::ConversionError> {
/// let document = legacy.into_workflow_document()?;
/// assert_eq!(document.header.node_count, document.nodes.len());
/// # Ok(())
/// # }
/// ```
pub trait IntoWorkflowDocument {
    fn into_workflow_document(self) -> Result<WorkflowDocument, ConversionError>;
}

impl IntoWorkflowDocument for LegacyDocument {
    fn into_workflow_document(self) -> Result<WorkflowDocument, ConversionError> {
        let exported_at = self.updated_at.to_datetime().unwrap_or_else(Utc::now);

        let nodes = self
            .nodes
            .into_iter()
            .enumerate()
            .map(|(index, node)| convert_node(index, node))
            .collect::<Result<Vec<_>, _>>()?;
        let edges: Vec<Connection> = self.edges.into_iter().map(convert_edge).collect();

        let workflow_config = WorkflowConfig {
            name: self.name,
            description: self.description,
            version: Some(LEGACY_WORKFLOW_VERSION.to_string()),
            framework: Some(LEGACY_FRAMEWORK.to_string()),
            schema_version: Some(LEGACY_SCHEMA_VERSION.to_string()),
            settings: Map::new(),
        };

        Ok(WorkflowDocument {
            header: DocumentHeader::current(exported_at, nodes.len(), edges.len()),
            workflow_config,
            viewport: None,
            nodes,
            edges,
        })
    }
}

fn semantic_type(index: usize, node: &LegacyNode) -> Result<NodeType, ConversionError> {
    let name = node
        .data
        .node_type
        .as_deref()
        .or(node.node_type.as_deref())
        .ok_or_else(|| ConversionError::MissingNodeType {
            node_id: node.id.clone(),
            index,
        })?;
    NodeType::from_str(name).map_err(|_| ConversionError::UnknownNodeType {
        node_id: node.id.clone(),
        index,
        type_name: name.to_string(),
    })
}

fn convert_node(index: usize, node: LegacyNode) -> Result<VisualNode, ConversionError> {
    let node_type = semantic_type(index, &node)?;

    let style = match node.style {
        Some(style) => Some(style),
        None if node_type.is_container() => {
            let (width, height) = node_type.default_dimensions();
            Some(NodeStyle::sized(width, height))
        }
        None => None,
    };

    let (extent, expand_parent) = match node.parent_id {
        Some(_) => (Some(Extent::Parent), Some(true)),
        None => (None, None),
    };

    let mut extra = node.data.extra;
    for key in TRANSIENT_DATA_KEYS {
        extra.remove(key);
    }
    // The legacy check only admits strings here.
    let mut take_text = |key: &str| match extra.remove(key) {
        Some(Value::String(text)) => Some(text),
        _ => None,
    };
    let repo = take_text("repo");
    let component_id = take_text("componentId");

    let label = node.data.label.unwrap_or_else(|| node.id.clone());
    Ok(VisualNode {
        id: node.id,
        render_type: Some(node_type.render_type().to_string()),
        position: node.position,
        data: NodeData {
            label,
            node_type,
            repo,
            config: node.data.config.unwrap_or_default(),
            component_id,
            extra,
        },
        parent_id: node.parent_id,
        extent,
        expand_parent,
        style,
    })
}

fn convert_edge(edge: LegacyEdge) -> Connection {
    Connection {
        edge_type: Some(edge.edge_type.unwrap_or_else(|| DEFAULT_EDGE_KIND.to_string())),
        source_handle: edge.source_handle,
        target_handle: edge.target_handle,
        animated: edge.animated,
        label: edge.label,
        data: edge.data,
        ..Connection::new(edge.id, edge.source, edge.target)
    }
}
