use crate::model::{EdgeKind, EdgeMarker, EdgeStyle, MarkerSpec};
use serde_json::Map;

/// Marker drawn at the target end of every reconstructed edge.
pub const ARROW_MARKER: &str = "arrowclosed";
const MARKER_SIZE: f64 = 20.0;

/// Canonical visual parameters for one edge kind.
#[derive(Debug, Clone, PartialEq)]
pub struct EdgeVisual {
    pub stroke: String,
    pub stroke_width: f64,
    pub stroke_dasharray: Option<String>,
    pub animated: bool,
}

impl EdgeVisual {
    fn solid(stroke: &str, stroke_width: f64) -> Self {
        Self {
            stroke: stroke.to_string(),
            stroke_width,
            stroke_dasharray: None,
            animated: false,
        }
    }

    fn dashed(stroke: &str, stroke_width: f64, dasharray: &str) -> Self {
        Self {
            stroke_dasharray: Some(dasharray.to_string()),
            ..Self::solid(stroke, stroke_width)
        }
    }

    fn animated(mut self) -> Self {
        self.animated = true;
        self
    }

    pub fn to_style(&self) -> EdgeStyle {
        EdgeStyle {
            stroke: Some(self.stroke.clone()),
            stroke_width: Some(self.stroke_width),
            stroke_dasharray: self.stroke_dasharray.clone(),
            extra: Map::new(),
        }
    }

    pub fn to_marker(&self) -> EdgeMarker {
        EdgeMarker::Spec(MarkerSpec {
            marker_type: ARROW_MARKER.to_string(),
            color: Some(self.stroke.clone()),
            width: Some(MARKER_SIZE),
            height: Some(MARKER_SIZE),
            extra: Map::new(),
        })
    }
}

/// Read-only lookup from an edge kind to its current theme.
///
/// The import pipeline consults this for every edge, so imported edges always render
/// with the active theme rather than whatever style was baked into the document.
pub trait EdgeStyleTable: Send + Sync {
    fn visual_for(&self, kind: &EdgeKind) -> EdgeVisual;
}

/// The editor's built-in palette. Unknown kinds render like `default`.
#[derive(Debug, Clone, Copy, Default)]
pub struct DefaultEdgeStyles;

impl EdgeStyleTable for DefaultEdgeStyles {
    fn visual_for(&self, kind: &EdgeKind) -> EdgeVisual {
        match kind {
            EdgeKind::Data => EdgeVisual::solid("#3b82f6", 2.0).animated(),
            EdgeKind::Control => EdgeVisual::solid("#8b5cf6", 2.0),
            EdgeKind::Conditional => EdgeVisual::dashed("#f59e0b", 2.0, "5,5"),
            EdgeKind::Tool => EdgeVisual::solid("#10b981", 2.0),
            EdgeKind::Memory => EdgeVisual::dashed("#ec4899", 2.0, "2,4"),
            EdgeKind::Error => EdgeVisual::dashed("#ef4444", 2.0, "8,4"),
            EdgeKind::Default | EdgeKind::Custom(_) => EdgeVisual::solid("#64748b", 1.5),
        }
    }
}
