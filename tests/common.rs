//! Common test utilities for building live graphs and raw documents.
use ahash::AHashSet;
use chrono::{DateTime, TimeZone, Utc};
use flowdoc::prelude::*;
use serde_json::{Value, json};
use std::sync::Arc;

/// The export time stamped on every fixture document.
#[allow(dead_code)]
pub fn fixed_time() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap()
}

/// A small canvas:
///
/// `group-1` (400x300 at the origin) contains `agent-1`. `tool-1` and `llm-1` sit
/// at the top level. `e1` links the agent to the tool, `e2` the tool to the model.
/// The agent carries session-only state that must never reach a document.
#[allow(dead_code)]
pub fn sample_graph() -> (Vec<LiveNode>, Vec<LiveEdge>) {
    let config = json!({
        "model": "gpt-4o",
        "temperature": 0.2,
        "tools": [{ "name": "search", "limit": 5 }]
    });

    let mut agent = LiveNode::new("agent-1", NodeType::Agent, "Planner", Position::new(20.0, 40.0))
        .within("group-1")
        .with_config(config.as_object().unwrap().clone());
    agent.data.status = flowdoc::model::ExecutionStatus::Running;
    agent.data.logs = vec!["step 1".to_string(), "step 2".to_string()];
    agent.selected = true;
    agent.dragging = true;

    let nodes = vec![
        LiveNode::new("group-1", NodeType::Group, "Crew", Position::new(0.0, 0.0))
            .with_style(NodeStyle::sized(400.0, 300.0)),
        agent,
        LiveNode::new("tool-1", NodeType::Tool, "Search", Position::new(500.0, 100.0)),
        LiveNode::new("llm-1", NodeType::Llm, "Writer", Position::new(500.0, 300.0)),
    ];

    let mut e2 = LiveEdge::new("e2", "tool-1", "llm-1").with_type("default");
    e2.data = Some(json!({ "type": "data", "note": "results" }).as_object().unwrap().clone());
    let edges = vec![LiveEdge::new("e1", "agent-1", "tool-1").with_type("tool"), e2];

    (nodes, edges)
}

#[allow(dead_code)]
pub fn sample_config() -> WorkflowConfig {
    let mut config = WorkflowConfig::named("Research Crew");
    config.description = Some("Plans, searches, and writes".to_string());
    config.framework = Some("langgraph".to_string());
    config
        .settings
        .insert("maxIterations".to_string(), json!(5));
    config
}

#[allow(dead_code)]
pub fn sample_viewport() -> Viewport {
    Viewport {
        x: -120.0,
        y: 40.0,
        zoom: 1.25,
    }
}

/// The sample graph exported as a full document, as raw JSON.
#[allow(dead_code)]
pub fn full_document_json() -> Value {
    let (nodes, edges) = sample_graph();
    let document = Exporter::default().export_full_at(
        &nodes,
        &edges,
        &sample_config(),
        Some(sample_viewport()),
        fixed_time(),
    );
    serde_json::to_value(&document).unwrap()
}

/// The sample graph exported as a selection of every node, as raw JSON.
#[allow(dead_code)]
pub fn partial_document_json() -> Value {
    let (nodes, edges) = sample_graph();
    let selected = id_set(&["group-1", "tool-1", "llm-1"]);
    let document =
        Exporter::default().export_selection_at(&nodes, &edges, &selected, None, fixed_time());
    serde_json::to_value(&document).unwrap()
}

/// An oldest-generation document: no header, root `id` and `name`.
#[allow(dead_code)]
pub fn legacy_document_json() -> Value {
    json!({
        "id": "wf-legacy",
        "name": "Legacy Flow",
        "description": "Saved before headers existed",
        "createdAt": "2023-01-10T08:00:00Z",
        "updatedAt": 1_700_000_000_000_i64,
        "nodes": [
            {
                "id": "loop-1",
                "type": "loop",
                "position": { "x": 0, "y": 0 },
                "data": { "label": "Retry" }
            },
            {
                "id": "code-1",
                "position": { "x": 30, "y": 60 },
                "parentId": "loop-1",
                "data": { "label": "Parse", "type": "code", "status": "error", "config": { "lang": "python" } }
            },
            {
                "id": "out-1",
                "type": "output",
                "position": { "x": 600, "y": 0 },
                "data": {}
            }
        ],
        "edges": [
            { "id": "l1", "source": "loop-1", "target": "out-1" }
        ]
    })
}

#[allow(dead_code)]
pub fn id_set(ids: &[&str]) -> AHashSet<String> {
    ids.iter().map(|id| id.to_string()).collect()
}

/// An importer with a deterministic id stream.
#[allow(dead_code)]
pub fn seeded_importer(strategy: ConflictStrategy) -> Importer {
    Importer::builder()
        .with_strategy(strategy)
        .with_id_generator(Arc::new(IdGenerator::seeded(42)))
        .build()
        .unwrap()
}

/// Paths of every issue, in report order.
#[allow(dead_code)]
pub fn issue_paths(issues: &[ValidationIssue]) -> Vec<&str> {
    issues.iter().map(|issue| issue.path.as_str()).collect()
}
