use crate::model::{Connection, LiveEdge, LiveNode, LiveNodeData, VisualNode};
use crate::style::EdgeStyleTable;

/// Lifts a persisted node back onto the canvas with fresh session state.
pub(crate) fn reconstruct_node(node: VisualNode) -> LiveNode {
    let render_type = node
        .render_type
        .or_else(|| Some(node.data.node_type.render_type().to_string()));

    LiveNode {
        id: node.id,
        render_type,
        position: node.position,
        data: LiveNodeData {
            label: node.data.label,
            node_type: node.data.node_type,
            repo: node.data.repo,
            config: node.data.config,
            component_id: node.data.component_id,
            status: Default::default(),
            logs: Vec::new(),
            extra: node.data.extra,
        },
        parent_id: node.parent_id,
        extent: node.extent,
        expand_parent: node.expand_parent,
        style: node.style,
        selected: false,
        dragging: false,
        measured: None,
    }
}

/// Rebuilds an edge's visuals from its semantic kind. `data` is carried over verbatim.
pub(crate) fn reconstruct_edge(edge: Connection, styles: &dyn EdgeStyleTable) -> LiveEdge {
    let visual = styles.visual_for(&edge.semantic_kind());

    LiveEdge {
        style: Some(visual.to_style()),
        marker_end: Some(visual.to_marker()),
        animated: Some(edge.animated.unwrap_or(false) || visual.animated),
        id: edge.id,
        source: edge.source,
        target: edge.target,
        source_handle: edge.source_handle,
        target_handle: edge.target_handle,
        edge_type: edge.edge_type,
        label: edge.label,
        data: edge.data,
        interaction_width: edge.interaction_width,
        z_index: edge.z_index,
        selected: false,
    }
}
