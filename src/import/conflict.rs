use super::options::ConflictStrategy;
use crate::identity::{EDGE_ID_PREFIX, IdGenerator, RemapTable};
use crate::model::{Connection, VisualNode};
use ahash::AHashSet;

/// Graph after conflict resolution, with the counters the import reports.
#[derive(Debug, Clone, Default)]
pub(crate) struct Resolution {
    pub nodes: Vec<VisualNode>,
    pub edges: Vec<Connection>,
    pub nodes_skipped: usize,
    pub nodes_remapped: usize,
    pub edges_dropped: usize,
    pub edges_renamed: usize,
}

pub(crate) fn resolve(
    strategy: ConflictStrategy,
    nodes: Vec<VisualNode>,
    edges: Vec<Connection>,
    existing_nodes: &AHashSet<String>,
    existing_edges: &AHashSet<String>,
    generator: &IdGenerator,
) -> Resolution {
    match strategy {
        ConflictStrategy::Regenerate => {
            regenerate(nodes, edges, existing_nodes, existing_edges, generator)
        }
        ConflictStrategy::Skip => {
            let (nodes, skipped): (Vec<_>, Vec<_>) = nodes
                .into_iter()
                .partition(|node| !existing_nodes.contains(&node.id));
            let dropped: AHashSet<&str> = skipped.iter().map(|node| node.id.as_str()).collect();

            let before = edges.len();
            let edges: Vec<Connection> = edges
                .into_iter()
                .filter(|edge| {
                    !dropped.contains(edge.source.as_str()) && !dropped.contains(edge.target.as_str())
                })
                .collect();
            let edges_dropped = before - edges.len();

            let (edges, edges_renamed) = dedupe_edge_ids(edges, existing_edges, generator);
            Resolution {
                nodes,
                edges,
                nodes_skipped: skipped.len(),
                edges_dropped,
                edges_renamed,
                ..Resolution::default()
            }
        }
        ConflictStrategy::Overwrite => {
            let (edges, edges_renamed) = dedupe_edge_ids(edges, existing_edges, generator);
            Resolution {
                nodes,
                edges,
                edges_renamed,
                ..Resolution::default()
            }
        }
    }
}

fn regenerate(
    nodes: Vec<VisualNode>,
    edges: Vec<Connection>,
    existing_nodes: &AHashSet<String>,
    existing_edges: &AHashSet<String>,
    generator: &IdGenerator,
) -> Resolution {
    // Fresh ids must not collide with the destination or with ids still in the document.
    let mut taken_nodes = existing_nodes.clone();
    taken_nodes.extend(nodes.iter().map(|node| node.id.clone()));
    let mut taken_edges = existing_edges.clone();
    taken_edges.extend(edges.iter().map(|edge| edge.id.clone()));

    let table = RemapTable::for_nodes(&nodes, generator, &taken_nodes);
    let nodes = table.remap_nodes(nodes);
    let edges_renamed = edges.len();
    let edges = table.remap_edges(edges, generator, &taken_edges);

    Resolution {
        nodes_remapped: table.len(),
        nodes,
        edges,
        edges_renamed,
        ..Resolution::default()
    }
}

/// Renames edges whose id collides with the destination or repeats in the document.
fn dedupe_edge_ids(
    edges: Vec<Connection>,
    existing_edges: &AHashSet<String>,
    generator: &IdGenerator,
) -> (Vec<Connection>, usize) {
    let mut taken = existing_edges.clone();
    let mut renamed = 0;
    let edges = edges
        .into_iter()
        .map(|mut edge| {
            if taken.contains(&edge.id) {
                edge.id = generator.generate_avoiding(EDGE_ID_PREFIX, &taken);
                renamed += 1;
            }
            taken.insert(edge.id.clone());
            edge
        })
        .collect();
    (edges, renamed)
}
