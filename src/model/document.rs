use super::edge::Connection;
use super::node::{NodeStyle, Position, VisualNode, null_as_default};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// The version literal every current-generation header carries.
pub const FORMAT_VERSION: &str = "1.0.0";
/// The origin tag every current-generation header carries.
pub const EXPORTED_FROM: &str = "agentflow-editor";

pub const MIN_ZOOM: f64 = 0.1;
pub const MAX_ZOOM: f64 = 4.0;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DocumentHeader {
    pub format_version: String,
    pub exported_at: DateTime<Utc>,
    pub exported_from: String,
    pub node_count: usize,
    pub edge_count: usize,
}

impl DocumentHeader {
    /// A current-generation header stamped with the given time and counts.
    pub fn current(exported_at: DateTime<Utc>, node_count: usize, edge_count: usize) -> Self {
        Self {
            format_version: FORMAT_VERSION.to_string(),
            exported_at,
            exported_from: EXPORTED_FROM.to_string(),
            node_count,
            edge_count,
        }
    }
}

/// Workflow-level metadata. Options beyond the named fields are kept as-is.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkflowConfig {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub framework: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub schema_version: Option<String>,
    #[serde(flatten)]
    pub settings: Map<String, Value>,
}

impl WorkflowConfig {
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Viewport {
    pub x: f64,
    pub y: f64,
    pub zoom: f64,
}

impl Viewport {
    pub fn zoom_in_range(&self) -> bool {
        (MIN_ZOOM..=MAX_ZOOM).contains(&self.zoom)
    }
}

/// A complete, current-generation export.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkflowDocument {
    pub header: DocumentHeader,
    pub workflow_config: WorkflowConfig,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub viewport: Option<Viewport>,
    pub nodes: Vec<VisualNode>,
    pub edges: Vec<Connection>,
}

impl WorkflowDocument {
    pub fn to_json_pretty(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Download name such as `research-crew-2024-05-01.json`.
    pub fn suggested_filename(&self) -> String {
        suggested_filename(&self.workflow_config.name, self.header.exported_at)
    }
}

/// A selection-scoped export. It inherits the destination's configuration on import.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PartialDocument {
    pub header: DocumentHeader,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub viewport: Option<Viewport>,
    pub nodes: Vec<VisualNode>,
    pub edges: Vec<Connection>,
}

impl PartialDocument {
    pub fn to_json_pretty(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    pub fn suggested_filename(&self) -> String {
        suggested_filename("selection", self.header.exported_at)
    }
}

fn suggested_filename(name: &str, exported_at: DateTime<Utc>) -> String {
    let mut slug = String::with_capacity(name.len());
    for c in name.trim().chars() {
        if c.is_ascii_alphanumeric() {
            slug.push(c.to_ascii_lowercase());
        } else if !slug.ends_with('-') && !slug.is_empty() {
            slug.push('-');
        }
    }
    let slug = slug.trim_end_matches('-');
    let slug = if slug.is_empty() { "workflow" } else { slug };
    format!("{}-{}.json", slug, exported_at.format("%Y-%m-%d"))
}

/// Timestamps in the oldest generation were either ISO strings or epoch milliseconds.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum LegacyTimestamp {
    Millis(f64),
    Text(String),
}

impl LegacyTimestamp {
    pub fn to_datetime(&self) -> Option<DateTime<Utc>> {
        match self {
            LegacyTimestamp::Millis(ms) if ms.is_finite() => {
                DateTime::<Utc>::from_timestamp_millis(*ms as i64)
            }
            LegacyTimestamp::Millis(_) => None,
            LegacyTimestamp::Text(text) => DateTime::parse_from_rfc3339(text)
                .ok()
                .map(|dt| dt.with_timezone(&Utc)),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LegacyNodeData {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub node_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub config: Option<Map<String, Value>>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LegacyNode {
    pub id: String,
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub node_type: Option<String>,
    pub position: Position,
    #[serde(default, deserialize_with = "null_as_default")]
    pub data: LegacyNodeData,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub style: Option<NodeStyle>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LegacyEdge {
    pub id: String,
    pub source: String,
    pub target: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source_handle: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target_handle: Option<String>,
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub edge_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub animated: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<Map<String, Value>>,
}

/// The oldest, header-less export shape.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LegacyDocument {
    pub id: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub nodes: Vec<LegacyNode>,
    pub edges: Vec<LegacyEdge>,
    pub created_at: LegacyTimestamp,
    pub updated_at: LegacyTimestamp,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metadata: Option<Map<String, Value>>,
}
