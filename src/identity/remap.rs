use super::generator::IdGenerator;
use crate::model::{Connection, VisualNode};
use ahash::{AHashMap, AHashSet};

/// Prefix for regenerated node ids.
pub const NODE_ID_PREFIX: &str = "node";
/// Prefix for regenerated edge ids.
pub const EDGE_ID_PREFIX: &str = "edge";

/// `old id -> new id` mapping scoped to one import call.
///
/// Lookups are total: an id missing from the table resolves to itself.
#[derive(Debug, Clone, Default)]
pub struct RemapTable {
    entries: AHashMap<String, String>,
}

impl RemapTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Assigns one fresh id per node, avoiding everything in `taken`.
    pub fn for_nodes(nodes: &[VisualNode], generator: &IdGenerator, taken: &AHashSet<String>) -> Self {
        let mut table = Self::new();
        for node in nodes {
            if table.entries.contains_key(&node.id) {
                continue;
            }
            let fresh = generator.generate_avoiding(NODE_ID_PREFIX, taken);
            table.insert(node.id.clone(), fresh);
        }
        table
    }

    pub fn insert(&mut self, old: impl Into<String>, new: impl Into<String>) {
        self.entries.insert(old.into(), new.into());
    }

    pub fn get(&self, old: &str) -> Option<&str> {
        self.entries.get(old).map(String::as_str)
    }

    pub fn resolve<'a>(&'a self, id: &'a str) -> &'a str {
        self.get(id).unwrap_or(id)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Rewrites node ids and parent references.
    pub fn remap_nodes(&self, nodes: Vec<VisualNode>) -> Vec<VisualNode> {
        nodes
            .into_iter()
            .map(|mut node| {
                node.id = self.resolve(&node.id).to_string();
                if let Some(parent) = node.parent_id.as_deref() {
                    node.parent_id = Some(self.resolve(parent).to_string());
                }
                node
            })
            .collect()
    }

    /// Rewrites endpoints and gives every edge a fresh id.
    pub fn remap_edges(
        &self,
        edges: Vec<Connection>,
        generator: &IdGenerator,
        taken: &AHashSet<String>,
    ) -> Vec<Connection> {
        edges
            .into_iter()
            .map(|mut edge| {
                edge.id = generator.generate_avoiding(EDGE_ID_PREFIX, taken);
                edge.source = self.resolve(&edge.source).to_string();
                edge.target = self.resolve(&edge.target).to_string();
                edge
            })
            .collect()
    }
}
