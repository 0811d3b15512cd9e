use super::document::{check_position, check_style, check_unique, node_type_names};
use super::issues::{Checker, join, kind_of};
use crate::error::IssueCode;
use ahash::AHashSet;
use serde_json::Value;

/// The shape heuristic: root `id` and `name` without a `header`.
pub fn looks_legacy(value: &Value) -> bool {
    value.as_object().is_some_and(|root| {
        root.contains_key("id") && root.contains_key("name") && !root.contains_key("header")
    })
}

/// Structural check of the oldest, header-less generation.
pub(crate) fn check_legacy(checker: &mut Checker, value: &Value) {
    let Some(root) = checker.object(value, "") else {
        return;
    };

    if let Some(id) = checker.required(root, "id", "") {
        checker.string(id, "id", 1);
    }
    if let Some(name) = checker.required(root, "name", "") {
        checker.string(name, "name", 0);
    }
    checker.optional(root, "description", "", |c, v, p| c.string(v, p, 0));
    for key in ["createdAt", "updatedAt"] {
        if let Some(stamp) = checker.required(root, key, "") {
            check_timestamp(checker, stamp, key);
        }
    }
    checker.optional(root, "metadata", "", |c, v, p| c.object(v, p).map(|_| ()));

    let mut node_ids = AHashSet::new();
    if let Some(nodes) = checker
        .required(root, "nodes", "")
        .and_then(|v| checker.array(v, "nodes", 0))
    {
        for (i, node) in nodes.iter().enumerate() {
            check_legacy_node(checker, node, &join("nodes", i), &mut node_ids);
        }
    }

    let mut edge_ids = AHashSet::new();
    if let Some(edges) = checker
        .required(root, "edges", "")
        .and_then(|v| checker.array(v, "edges", 0))
    {
        for (i, edge) in edges.iter().enumerate() {
            check_legacy_edge(checker, edge, &join("edges", i), &mut edge_ids);
        }
    }
}

fn check_timestamp(checker: &mut Checker, value: &Value, path: &str) {
    match value {
        Value::String(_) => {}
        Value::Number(n) if n.as_f64().is_some_and(f64::is_finite) => {}
        other => checker.report(
            path,
            IssueCode::InvalidType,
            format!("Expected string or number, received {}", kind_of(other)),
        ),
    }
}

fn check_legacy_node(checker: &mut Checker, value: &Value, path: &str, seen: &mut AHashSet<String>) {
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
    check_position(checker, node, path);
    checker.optional(node, "parentId", path, |c, v, p| c.string(v, p, 1));
    check_style(checker, node, path);

    let data_path = join(path, "data");
    let data = checker.optional(node, "data", path, |c, v, p| c.object(v, p));
    if let Some(data) = data {
        checker.optional(data, "label", &data_path, |c, v, p| c.string(v, p, 0));
        checker.optional(data, "config", &data_path, |c, v, p| c.object(v, p).map(|_| ()));
        for key in ["repo", "componentId"] {
            checker.optional(data, key, &data_path, |c, v, p| c.string(v, p, 0));
        }
    }

    // Semantic type comes from `data.type`, falling back to the top-level `type`.
    let names = node_type_names();
    let data_type = data.and_then(|d| d.get("type")).filter(|v| !v.is_null());
    match (data_type, node.get("type").filter(|v| !v.is_null())) {
        (Some(semantic), top_level) => {
            checker.one_of(semantic, &join(&data_path, "type"), &names);
            if let Some(top_level) = top_level {
                checker.string(top_level, &join(path, "type"), 0);
            }
        }
        (None, Some(top_level)) => {
            checker.one_of(top_level, &join(path, "type"), &names);
        }
        (None, None) => checker.report(
            &join(&data_path, "type"),
            IssueCode::InvalidType,
            "Required",
        ),
    }
}

fn check_legacy_edge(checker: &mut Checker, value: &Value, path: &str, seen: &mut AHashSet<String>) {
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
    checker.optional(edge, "data", path, |c, v, p| c.object(v, p).map(|_| ()));
}
