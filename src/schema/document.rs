use super::issues::{Checker, join};
use crate::error::IssueCode;
use crate::model::{EXPORTED_FROM, FORMAT_VERSION, MAX_ZOOM, MIN_ZOOM, NodeType};
use ahash::AHashSet;
use chrono::DateTime;
use serde_json::{Map, Value};

pub(crate) fn node_type_names() -> [&'static str; 14] {
    NodeType::ALL.map(|t| t.as_str())
}

/// Structural check of a complete current-generation document.
pub(crate) fn check_full(checker: &mut Checker, value: &Value) {
    let Some(root) = checker.object(value, "") else {
        return;
    };
    let declared = check_header(checker, root);
    if let Some(config) = checker.required(root, "workflowConfig", "") {
        check_workflow_config(checker, config, "workflowConfig");
    }
    checker.optional(root, "viewport", "", |c, v, p| {
        check_viewport(c, v, p);
        Some(())
    });
    let actual = check_graph(checker, root, 0);
    check_counts(checker, declared, actual);
}

/// Structural check of a selection-scoped document.
pub(crate) fn check_partial(checker: &mut Checker, value: &Value) {
    let Some(root) = checker.object(value, "") else {
        return;
    };
    let declared = check_header(checker, root);
    checker.optional(root, "viewport", "", |c, v, p| {
        check_viewport(c, v, p);
        Some(())
    });
    let actual = check_graph(checker, root, 1);
    check_counts(checker, declared, actual);
}

type Counts = (Option<usize>, Option<usize>);

fn check_header(checker: &mut Checker, root: &Map<String, Value>) -> Counts {
    let Some(header) = checker
        .required(root, "header", "")
        .and_then(|h| checker.object(h, "header"))
    else {
        return (None, None);
    };

    if let Some(version) = checker.required(header, "formatVersion", "header") {
        checker.literal(version, "header.formatVersion", FORMAT_VERSION);
    }
    if let Some(from) = checker.required(header, "exportedFrom", "header") {
        checker.literal(from, "header.exportedFrom", EXPORTED_FROM);
    }
    if let Some(at) = checker
        .required(header, "exportedAt", "header")
        .and_then(|at| checker.string(at, "header.exportedAt", 1))
    {
        if DateTime::parse_from_rfc3339(at).is_err() {
            checker.report("header.exportedAt", IssueCode::InvalidString, "Invalid datetime");
        }
    }

    let node_count = checker
        .required(header, "nodeCount", "header")
        .and_then(|v| checker.count(v, "header.nodeCount"));
    let edge_count = checker
        .required(header, "edgeCount", "header")
        .and_then(|v| checker.count(v, "header.edgeCount"));
    (node_count, edge_count)
}

fn check_counts(checker: &mut Checker, declared: Counts, actual: Counts) {
    if let (Some(declared), Some(actual)) = (declared.0, actual.0) {
        if declared != actual {
            checker.report(
                "header.nodeCount",
                IssueCode::Custom,
                format!(
                    "Header declares {} node(s) but the document contains {}",
                    declared, actual
                ),
            );
        }
    }
    if let (Some(declared), Some(actual)) = (declared.1, actual.1) {
        if declared != actual {
            checker.report(
                "header.edgeCount",
                IssueCode::Custom,
                format!(
                    "Header declares {} edge(s) but the document contains {}",
                    declared, actual
                ),
            );
        }
    }
}

fn check_workflow_config(checker: &mut Checker, value: &Value, path: &str) {
    let Some(config) = checker.object(value, path) else {
        return;
    };
    if let Some(name) = checker.required(config, "name", path) {
        checker.string(name, &join(path, "name"), 1);
    }
    for key in ["description", "version", "framework", "schemaVersion"] {
        checker.optional(config, key, path, |c, v, p| c.string(v, p, 0));
    }
}

fn check_viewport(checker: &mut Checker, value: &Value, path: &str) {
    let Some(viewport) = checker.object(value, path) else {
        return;
    };
    for key in ["x", "y"] {
        if let Some(v) = checker.required(viewport, key, path) {
            checker.number(v, &join(path, key));
        }
    }
    let zoom_path = join(path, "zoom");
    let Some(zoom) = checker
        .required(viewport, "zoom", path)
        .and_then(|v| checker.number(v, &zoom_path))
    else {
        return;
    };
    if zoom < MIN_ZOOM {
        checker.report(
            &zoom_path,
            IssueCode::TooSmall,
            format!("Number must be greater than or equal to {}", MIN_ZOOM),
        );
    } else if zoom > MAX_ZOOM {
        checker.report(
            &zoom_path,
            IssueCode::TooBig,
            format!("Number must be less than or equal to {}", MAX_ZOOM),
        );
    }
}

/// Checks `nodes` and `edges`, returning their actual lengths.
fn check_graph(checker: &mut Checker, root: &Map<String, Value>, min_nodes: usize) -> Counts {
    let mut node_ids = AHashSet::new();
    let node_len = checker
        .required(root, "nodes", "")
        .and_then(|v| checker.array(v, "nodes", min_nodes))
        .map(|nodes| {
            for (i, node) in nodes.iter().enumerate() {
                check_node(checker, node, &join("nodes", i), &mut node_ids);
            }
            nodes.len()
        });

    let mut edge_ids = AHashSet::new();
    let edge_len = checker
        .required(root, "edges", "")
        .and_then(|v| checker.array(v, "edges", 0))
        .map(|edges| {
            for (i, edge) in edges.iter().enumerate() {
                check_edge(checker, edge, &join("edges", i), &mut edge_ids);
            }
            edges.len()
        });

    (node_len, edge_len)
}

pub(crate) fn check_position(checker: &mut Checker, node: &Map<String, Value>, path: &str) {
    let position_path = join(path, "position");
    let Some(position) = checker
        .required(node, "position", path)
        .and_then(|v| checker.object(v, &position_path))
    else {
        return;
    };
    for key in ["x", "y"] {
        if let Some(v) = checker.required(position, key, &position_path) {
            checker.number(v, &join(&position_path, key));
        }
    }
}

pub(crate) fn check_style(checker: &mut Checker, node: &Map<String, Value>, path: &str) {
    checker.optional(node, "style", path, |c, v, p| {
        let style = c.object(v, p)?;
        for key in ["width", "height"] {
            c.optional(style, key, p, |c, v, p| c.number(v, p));
        }
        Some(())
    });
}

/// Reports an id already seen within the same array.
pub(crate) fn check_unique(checker: &mut Checker, seen: &mut AHashSet<String>, id: &str, path: &str, what: &str) {
    if !seen.insert(id.to_string()) {
        checker.report(
            path,
            IssueCode::Custom,
            format!("Duplicate {} id '{}'", what, id),
        );
    }
}

fn check_node(checker: &mut Checker, value: &Value, path: &str, seen: &mut AHashSet<String>) {
    let Some(node) = checker.object(value, path) else {
        return;
    };

    let id_path = join(path, "id");
    if let Some(id) = checker
        .required(node, "id", path)
        .and_then(|v| checker.string(v, &id_path, 1))
    {
        check_unique(checker, seen, id, &id_path, "node");
    }
    checker.optional(node, "type", path, |c, v, p| c.string(v, p, 0));
    check_position(checker, node, path);

    let data_path = join(path, "data");
    if let Some(data) = checker
        .required(node, "data", path)
        .and_then(|v| checker.object(v, &data_path))
    {
        if let Some(label) = checker.required(data, "label", &data_path) {
            checker.string(label, &join(&data_path, "label"), 0);
        }
        if let Some(node_type) = checker.required(data, "type", &data_path) {
            checker.one_of(node_type, &join(&data_path, "type"), &node_type_names());
        }
        checker.optional(data, "repo", &data_path, |c, v, p| c.string(v, p, 0));
        checker.optional(data, "config", &data_path, |c, v, p| c.object(v, p).map(|_| ()));
        checker.optional(data, "componentId", &data_path, |c, v, p| c.string(v, p, 0));
    }

    let parent = checker.optional(node, "parentId", path, |c, v, p| c.string(v, p, 1));
    let extent = checker.optional(node, "extent", path, |c, v, p| {
        c.literal(v, p, "parent").then_some(())
    });
    let expand = checker.optional(node, "expandParent", path, |c, v, p| c.boolean(v, p));
    check_style(checker, node, path);

    if parent.is_some() {
        if extent.is_none() {
            checker.report(
                &join(path, "extent"),
                IssueCode::Custom,
                "Nodes with a parentId must declare extent 'parent'",
            );
        }
        if expand != Some(true) {
            checker.report(
                &join(path, "expandParent"),
                IssueCode::Custom,
                "Nodes with a parentId must set expandParent to true",
            );
        }
    }
}

fn check_edge(checker: &mut Checker, value: &Value, path: &str, seen: &mut AHashSet<String>) {
    let Some(edge) = checker.object(value, path) else {
        return;
    };

    let id_path = join(path, "id");
    if let Some(id) = checker
        .required(edge, "id", path)
        .and_then(|v| checker.string(v, &id_path, 1))
    {
        check_unique(checker, seen, id, &id_path, "edge");
    }
    for key in ["source", "target"] {
        if let Some(v) = checker.required(edge, key, path) {
            checker.string(v, &join(path, key), 1);
        }
    }
    for key in ["sourceHandle", "targetHandle", "type", "label"] {
        checker.optional(edge, key, path, |c, v, p| c.string(v, p, 0));
    }
    checker.optional(edge, "animated", path, |c, v, p| c.boolean(v, p));
    for key in ["style", "data"] {
        checker.optional(edge, key, path, |c, v, p| c.object(v, p).map(|_| ()));
    }
    checker.optional(edge, "markerEnd", path, |c, v, p| match v {
        Value::String(_) => Some(()),
        other => {
            let marker = c.object(other, p)?;
            if let Some(type_value) = c.required(marker, "type", p) {
                c.string(type_value, &join(p, "type"), 1);
            }
            c.optional(marker, "color", p, |c, v, p| c.string(v, p, 0));
            for key in ["width", "height"] {
                c.optional(marker, key, p, |c, v, p| c.number(v, p));
            }
            Some(())
        }
    });
    for key in ["interactionWidth", "zIndex"] {
        checker.optional(edge, key, path, |c, v, p| c.number(v, p));
    }
}
