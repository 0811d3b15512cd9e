//! Bounding box and placement tests
mod common;
use common::*;
use flowdoc::prelude::*;

fn placed(id: &str, x: f64, y: f64, style: Option<NodeStyle>) -> LiveNode {
    let node = LiveNode::new(id, NodeType::Agent, id, Position::new(x, y));
    match style {
        Some(style) => node.with_style(style),
        None => node,
    }
}

fn width_only(width: f64) -> NodeStyle {
    NodeStyle {
        width: Some(width),
        height: None,
    }
}

#[cfg(test)]
mod bounding_box_tests {
    use super::*;

    #[test]
    fn test_box_around_default_and_styled_nodes() {
        let nodes = vec![
            placed("a", 100.0, 50.0, None),
            placed("b", 400.0, 300.0, Some(width_only(200.0))),
        ];

        let bbox = compute_bounding_box(&nodes);
        assert_eq!(bbox.min_x, 100.0);
        assert_eq!(bbox.min_y, 50.0);
        assert_eq!(bbox.max_x, 600.0);
        assert_eq!(bbox.max_y, 380.0);
        assert_eq!(bbox.width, 500.0);
        assert_eq!(bbox.height, 330.0);
        assert_eq!((bbox.center_x, bbox.center_y), (350.0, 215.0));
    }

    #[test]
    fn test_explicit_height_extends_the_box() {
        let nodes = vec![
            placed("a", 100.0, 50.0, None),
            placed("b", 400.0, 300.0, Some(NodeStyle::sized(200.0, 300.0))),
        ];

        let bbox = compute_bounding_box(&nodes);
        assert_eq!((bbox.max_x, bbox.max_y), (600.0, 600.0));
    }

    #[test]
    fn test_children_do_not_skew_the_box() {
        let nodes = vec![
            placed("a", 100.0, 50.0, None),
            placed("child", 5000.0, 5000.0, None).within("a"),
        ];

        let bbox = compute_bounding_box(&nodes);
        assert_eq!((bbox.max_x, bbox.max_y), (300.0, 130.0));
    }

    #[test]
    fn test_all_children_fall_back_to_every_node() {
        let nodes = vec![
            placed("c1", 10.0, 10.0, None).within("gone"),
            placed("c2", 50.0, 20.0, None).within("gone"),
        ];

        let bbox = compute_bounding_box(&nodes);
        assert_eq!((bbox.min_x, bbox.min_y), (10.0, 10.0));
        assert_eq!((bbox.max_x, bbox.max_y), (250.0, 100.0));
    }

    #[test]
    fn test_empty_input_yields_zero_box() {
        let nodes: Vec<LiveNode> = Vec::new();
        assert_eq!(compute_bounding_box(&nodes), BoundingBox::default());
    }

    #[test]
    fn test_containers_without_style_use_container_size() {
        let nodes = vec![LiveNode::new("g", NodeType::Group, "G", Position::new(0.0, 0.0))];

        let bbox = compute_bounding_box(&nodes);
        assert_eq!((bbox.width, bbox.height), (400.0, 300.0));
    }

    #[test]
    fn test_works_on_persisted_nodes() {
        let document = flowdoc::schema::validate_full(&full_document_json()).unwrap();

        // group-1 at the origin, tool-1 and llm-1 at x=500.
        let bbox = compute_bounding_box(&document.nodes);
        assert_eq!((bbox.min_x, bbox.min_y), (0.0, 0.0));
        assert_eq!((bbox.max_x, bbox.max_y), (700.0, 380.0));
    }
}

#[cfg(test)]
mod offset_tests {
    use super::*;

    #[test]
    fn test_offset_centers_top_level_nodes_on_target() {
        let nodes = vec![
            placed("a", 100.0, 50.0, None),
            placed("b", 400.0, 300.0, Some(width_only(200.0))),
            placed("child", 15.0, 25.0, None).within("a"),
        ];

        let moved = offset_to_position(&nodes, 500.0, 400.0);
        let bbox = compute_bounding_box(&moved);
        assert_eq!((bbox.center_x, bbox.center_y), (500.0, 400.0));

        assert_eq!(moved[0].position, Position::new(250.0, 235.0));
        assert_eq!(moved[1].position, Position::new(550.0, 485.0));
        assert_eq!(moved[2].position, Position::new(15.0, 25.0));
    }

    #[test]
    fn test_offset_leaves_input_untouched() {
        let nodes = vec![placed("a", 0.0, 0.0, None)];
        let _ = offset_to_position(&nodes, 1000.0, 1000.0);
        assert_eq!(nodes[0].position, Position::new(0.0, 0.0));
    }
}
