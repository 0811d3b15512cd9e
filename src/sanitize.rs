//! Projection of live canvas state onto its persistable form.
//!
//! Only session-local state is removed: the execution status and log buffer on a
//! node's data, plus canvas interaction flags. Everything else, including the
//! opaque `config` payload and any unknown data keys, passes through untouched.

use crate::model::{Connection, LiveEdge, LiveNode, NodeData, VisualNode};

/// Data keys that only make sense inside a running editor session.
pub const TRANSIENT_DATA_KEYS: [&str; 2] = ["status", "logs"];

pub fn sanitize_node(node: &LiveNode) -> VisualNode {
    let mut extra = node.data.extra.clone();
    for key in TRANSIENT_DATA_KEYS {
        extra.remove(key);
    }

    VisualNode {
        id: node.id.clone(),
        render_type: node.render_type.clone(),
        position: node.position,
        data: NodeData {
            label: node.data.label.clone(),
            node_type: node.data.node_type,
            repo: node.data.repo.clone(),
            config: node.data.config.clone(),
            component_id: node.data.component_id.clone(),
            extra,
        },
        parent_id: node.parent_id.clone(),
        extent: node.extent,
        expand_parent: node.expand_parent,
        style: node.style,
    }
}

/// Visual overrides survive only when the live edge actually carries them.
pub fn sanitize_edge(edge: &LiveEdge) -> Connection {
    Connection {
        id: edge.id.clone(),
        source: edge.source.clone(),
        target: edge.target.clone(),
        source_handle: edge.source_handle.clone(),
        target_handle: edge.target_handle.clone(),
        edge_type: edge.edge_type.clone(),
        animated: edge.animated,
        label: edge.label.clone(),
        style: edge.style.clone(),
        data: edge.data.clone(),
        marker_end: edge.marker_end.clone(),
        interaction_width: edge.interaction_width,
        z_index: edge.z_index,
    }
}
