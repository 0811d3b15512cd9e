use crate::model::{LiveNode, Position, VisualNode};
use serde::Serialize;

/// Anything with a canvas footprint that the bounding-box engine can measure.
pub trait Placement {
    fn position(&self) -> Position;
    fn set_position(&mut self, position: Position);
    /// Width and height with per-dimension defaults applied.
    fn footprint(&self) -> (f64, f64);
    fn is_nested(&self) -> bool;
}

impl Placement for VisualNode {
    fn position(&self) -> Position {
        self.position
    }
    fn set_position(&mut self, position: Position) {
        self.position = position;
    }
    fn footprint(&self) -> (f64, f64) {
        self.dimensions()
    }
    fn is_nested(&self) -> bool {
        self.parent_id.is_some()
    }
}

impl Placement for LiveNode {
    fn position(&self) -> Position {
        self.position
    }
    fn set_position(&mut self, position: Position) {
        self.position = position;
    }
    fn footprint(&self) -> (f64, f64) {
        self.dimensions()
    }
    fn is_nested(&self) -> bool {
        self.parent_id.is_some()
    }
}

/// Axis-aligned rectangle enclosing a node set. Derived, never stored.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BoundingBox {
    pub min_x: f64,
    pub min_y: f64,
    pub max_x: f64,
    pub max_y: f64,
    pub width: f64,
    pub height: f64,
    pub center_x: f64,
    pub center_y: f64,
}

impl BoundingBox {
    fn from_extents(min_x: f64, min_y: f64, max_x: f64, max_y: f64) -> Self {
        Self {
            min_x,
            min_y,
            max_x,
            max_y,
            width: max_x - min_x,
            height: max_y - min_y,
            center_x: (min_x + max_x) / 2.0,
            center_y: (min_y + max_y) / 2.0,
        }
    }
}

/// Computes the box around top-level nodes.
///
/// Nested nodes are positioned relative to their container and are ignored, unless
/// every node is nested, in which case all of them are measured. An empty set
/// yields the zero box.
pub fn compute_bounding_box<T: Placement>(nodes: &[T]) -> BoundingBox {
    let top_level: Vec<&T> = nodes.iter().filter(|n| !n.is_nested()).collect();
    let measured: Vec<&T> = if top_level.is_empty() {
        nodes.iter().collect()
    } else {
        top_level
    };

    if measured.is_empty() {
        return BoundingBox::default();
    }

    let (mut min_x, mut min_y) = (f64::INFINITY, f64::INFINITY);
    let (mut max_x, mut max_y) = (f64::NEG_INFINITY, f64::NEG_INFINITY);
    for node in measured {
        let Position { x, y } = node.position();
        let (w, h) = node.footprint();
        min_x = min_x.min(x);
        min_y = min_y.min(y);
        max_x = max_x.max(x + w);
        max_y = max_y.max(y + h);
    }
    BoundingBox::from_extents(min_x, min_y, max_x, max_y)
}

/// Translates top-level nodes so the set's box is centered on `(target_x, target_y)`.
///
/// Nested nodes keep their parent-relative coordinates.
pub fn offset_to_position<T: Placement + Clone>(nodes: &[T], target_x: f64, target_y: f64) -> Vec<T> {
    let bbox = compute_bounding_box(nodes);
    let dx = target_x - bbox.center_x;
    let dy = target_y - bbox.center_y;

    nodes
        .iter()
        .cloned()
        .map(|mut node| {
            if !node.is_nested() {
                let Position { x, y } = node.position();
                node.set_position(Position::new(x + dx, y + dy));
            }
            node
        })
        .collect()
}
