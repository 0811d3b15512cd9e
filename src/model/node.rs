use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};
use std::fmt;
use std::str::FromStr;

/// Opaque, node-type-specific configuration payload.
pub type ConfigMap = Map<String, Value>;

/// Width used for ordinary nodes that carry no explicit style.
pub const DEFAULT_NODE_WIDTH: f64 = 200.0;
/// Height used for ordinary nodes that carry no explicit style.
pub const DEFAULT_NODE_HEIGHT: f64 = 80.0;
/// Width assigned to container nodes that carry no explicit style.
pub const CONTAINER_WIDTH: f64 = 400.0;
/// Height assigned to container nodes that carry no explicit style.
pub const CONTAINER_HEIGHT: f64 = 300.0;

/// Render tag for `group` containers.
pub const RENDER_GROUP: &str = "group";
/// Render tag for `loop` containers.
pub const RENDER_LOOP: &str = "loop";
/// Render tag shared by every non-container node.
pub const RENDER_GENERIC: &str = "custom";

/// The closed set of semantic node types understood by the editor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum NodeType {
    Agent,
    Llm,
    Tool,
    Memory,
    Prompt,
    Retriever,
    Router,
    Condition,
    HumanInput,
    Code,
    Input,
    Output,
    Group,
    Loop,
}

impl NodeType {
    pub const ALL: [NodeType; 14] = [
        NodeType::Agent,
        NodeType::Llm,
        NodeType::Tool,
        NodeType::Memory,
        NodeType::Prompt,
        NodeType::Retriever,
        NodeType::Router,
        NodeType::Condition,
        NodeType::HumanInput,
        NodeType::Code,
        NodeType::Input,
        NodeType::Output,
        NodeType::Group,
        NodeType::Loop,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            NodeType::Agent => "agent",
            NodeType::Llm => "llm",
            NodeType::Tool => "tool",
            NodeType::Memory => "memory",
            NodeType::Prompt => "prompt",
            NodeType::Retriever => "retriever",
            NodeType::Router => "router",
            NodeType::Condition => "condition",
            NodeType::HumanInput => "humanInput",
            NodeType::Code => "code",
            NodeType::Input => "input",
            NodeType::Output => "output",
            NodeType::Group => "group",
            NodeType::Loop => "loop",
        }
    }

    /// Containers hold child nodes positioned relative to themselves.
    pub fn is_container(&self) -> bool {
        matches!(self, NodeType::Group | NodeType::Loop)
    }

    /// The render tag the canvas uses to pick a node component.
    pub fn render_type(&self) -> &'static str {
        match self {
            NodeType::Group => RENDER_GROUP,
            NodeType::Loop => RENDER_LOOP,
            _ => RENDER_GENERIC,
        }
    }

    /// Fallback footprint when a node has no explicit style.
    pub fn default_dimensions(&self) -> (f64, f64) {
        if self.is_container() {
            (CONTAINER_WIDTH, CONTAINER_HEIGHT)
        } else {
            (DEFAULT_NODE_WIDTH, DEFAULT_NODE_HEIGHT)
        }
    }
}

impl FromStr for NodeType {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        NodeType::ALL
            .iter()
            .copied()
            .find(|t| t.as_str() == s)
            .ok_or(())
    }
}

impl fmt::Display for NodeType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Position {
    pub x: f64,
    pub y: f64,
}

impl Position {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// Containment mode of a child node. Only rigid containment exists.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Extent {
    Parent,
}

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct NodeStyle {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub width: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub height: Option<f64>,
}

impl NodeStyle {
    pub fn sized(width: f64, height: f64) -> Self {
        Self {
            width: Some(width),
            height: Some(height),
        }
    }
}

/// Persisted node payload. Unknown keys are carried through untouched.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NodeData {
    pub label: String,
    #[serde(rename = "type")]
    pub node_type: NodeType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub repo: Option<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub config: ConfigMap,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub component_id: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// A node as it appears inside a document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VisualNode {
    pub id: String,
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub render_type: Option<String>,
    pub position: Position,
    pub data: NodeData,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub extent: Option<Extent>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expand_parent: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub style: Option<NodeStyle>,
}

impl VisualNode {
    /// Width and height, falling back per dimension to the type's defaults.
    pub fn dimensions(&self) -> (f64, f64) {
        resolve_dimensions(self.data.node_type, self.style.as_ref())
    }

    pub fn is_top_level(&self) -> bool {
        self.parent_id.is_none()
    }
}

pub(crate) fn resolve_dimensions(node_type: NodeType, style: Option<&NodeStyle>) -> (f64, f64) {
    let (default_w, default_h) = node_type.default_dimensions();
    match style {
        Some(style) => (
            style.width.unwrap_or(default_w),
            style.height.unwrap_or(default_h),
        ),
        None => (default_w, default_h),
    }
}

/// Treats an explicit `null` like a missing key.
pub(crate) fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}
