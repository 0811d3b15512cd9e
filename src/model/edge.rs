use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};
use std::fmt;

/// Semantic kind used when nothing on the edge names one.
pub const DEFAULT_EDGE_KIND: &str = "default";

/// The semantic kind of a connection. Unknown names are kept verbatim.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum EdgeKind {
    Default,
    Data,
    Control,
    Conditional,
    Tool,
    Memory,
    Error,
    Custom(String),
}

impl EdgeKind {
    pub fn from_name(name: &str) -> Self {
        match name {
            "default" => EdgeKind::Default,
            "data" => EdgeKind::Data,
            "control" => EdgeKind::Control,
            "conditional" => EdgeKind::Conditional,
            "tool" => EdgeKind::Tool,
            "memory" => EdgeKind::Memory,
            "error" => EdgeKind::Error,
            other => EdgeKind::Custom(other.to_string()),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            EdgeKind::Default => "default",
            EdgeKind::Data => "data",
            EdgeKind::Control => "control",
            EdgeKind::Conditional => "conditional",
            EdgeKind::Tool => "tool",
            EdgeKind::Memory => "memory",
            EdgeKind::Error => "error",
            EdgeKind::Custom(name) => name,
        }
    }
}

impl fmt::Display for EdgeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Visual override carried by a live edge.
///
/// Any CSS value is accepted. Named properties whose value has an unexpected type
/// stay in `extra` under their original key, so nothing is lost on a round trip.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EdgeStyle {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stroke: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stroke_width: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stroke_dasharray: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl<'de> Deserialize<'de> for EdgeStyle {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let mut extra = Map::<String, Value>::deserialize(deserializer)?;
        let stroke = take_typed(&mut extra, "stroke", |v| v.as_str().map(str::to_string));
        let stroke_width = take_typed(&mut extra, "strokeWidth", Value::as_f64);
        let stroke_dasharray =
            take_typed(&mut extra, "strokeDasharray", |v| v.as_str().map(str::to_string));
        Ok(Self {
            stroke,
            stroke_width,
            stroke_dasharray,
            extra,
        })
    }
}

/// Removes `key` only when `read` accepts its value.
fn take_typed<T>(
    map: &mut Map<String, Value>,
    key: &str,
    read: impl Fn(&Value) -> Option<T>,
) -> Option<T> {
    let typed = map.get(key).and_then(read)?;
    map.remove(key);
    Some(typed)
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MarkerSpec {
    #[serde(rename = "type")]
    pub marker_type: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub width: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub height: Option<f64>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Arrow marker, either a bare marker id or a full specification.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum EdgeMarker {
    Named(String),
    Spec(MarkerSpec),
}

/// A connection as it appears inside a document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Connection {
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
    pub style: Option<EdgeStyle>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<Map<String, Value>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub marker_end: Option<EdgeMarker>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub interaction_width: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub z_index: Option<f64>,
}

impl Connection {
    /// Minimal connection with no handles or visual overrides.
    pub fn new(id: impl Into<String>, source: impl Into<String>, target: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            source: source.into(),
            target: target.into(),
            source_handle: None,
            target_handle: None,
            edge_type: None,
            animated: None,
            label: None,
            style: None,
            data: None,
            marker_end: None,
            interaction_width: None,
            z_index: None,
        }
    }

    /// Semantic kind: `data.type`, then `data.edgeType`, then `type`, then `default`.
    pub fn semantic_kind(&self) -> EdgeKind {
        let from_data = |key: &str| {
            self.data
                .as_ref()
                .and_then(|data| data.get(key))
                .and_then(Value::as_str)
        };

        let name = from_data("type")
            .or_else(|| from_data("edgeType"))
            .or(self.edge_type.as_deref())
            .unwrap_or(DEFAULT_EDGE_KIND);
        EdgeKind::from_name(name)
    }

    pub fn touches(&self, node_id: &str) -> bool {
        self.source == node_id || self.target == node_id
    }
}
