//! Rolling index overlay: an anchor node for the selected pattern, linked to every shard
//! that belongs to it. It is decoration only and never feeds back into layout.

use crate::model::{EdgeCurve, LayoutPoint, NodeLabel, PositionedGraph, TextAnchor, edge_path};
use serde::{Deserialize, Serialize};
use shardmap_core::classify::Kind;
use shardmap_core::number::fmt_js;
use shardmap_core::{Filter, IndexCatalog, NodeId, ViewConfig};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RollingOverlay {
    pub pattern: String,
    pub anchor: OverlayAnchor,
    pub edges: Vec<OverlayEdge>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OverlayAnchor {
    pub x: f64,
    pub y: f64,
    pub radius: f64,
    pub kind: Kind,
    pub color: String,
    pub label: NodeLabel,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OverlayEdge {
    pub target: NodeId,
    pub from: LayoutPoint,
    pub to: LayoutPoint,
}

impl OverlayEdge {
    pub fn path_d(&self) -> String {
        edge_path(self.from, self.to, EdgeCurve::Horizontal)
    }
}

/// Builds the overlay for a rolling filter with a concrete, known pattern; `None` otherwise.
pub fn rolling_overlay(
    graph: &PositionedGraph,
    filter: &Filter,
    catalog: &IndexCatalog,
    config: &ViewConfig,
) -> Option<RollingOverlay> {
    let pattern = filter.rolling_pattern()?;
    let Some(members) = catalog.rolling.members(pattern) else {
        tracing::warn!(pattern, "no rolling index definition; overlay skipped");
        return None;
    };

    let anchor_at = LayoutPoint {
        x: config.width - config.overlay.offset_x,
        y: config.height / 2.0,
    };
    let text = match catalog.rolling.size(pattern) {
        Some(size) => format!("{pattern} ({} MB)", fmt_js(size)),
        None => pattern.to_string(),
    };
    let anchor = OverlayAnchor {
        x: anchor_at.x,
        y: anchor_at.y,
        radius: config.overlay.anchor_radius,
        kind: Kind::RollingAnchor,
        color: config.palette().color(Kind::RollingAnchor).to_string(),
        label: NodeLabel {
            text,
            dx: 15.0,
            dy: 0.35,
            anchor: TextAnchor::Start,
            font_size: 12.0,
            bold: true,
        },
    };

    let edges: Vec<OverlayEdge> = graph
        .nodes
        .iter()
        .filter(|n| n.depth >= 3 && members.contains(&n.name))
        .map(|n| OverlayEdge {
            target: n.id,
            from: anchor_at,
            to: LayoutPoint { x: n.x, y: n.y },
        })
        .collect();
    tracing::debug!(pattern, edges = edges.len(), "rolling overlay");

    Some(RollingOverlay {
        pattern: pattern.to_string(),
        anchor,
        edges,
    })
}
