use serde::{Deserialize, Serialize};
use shardmap_core::classify::{Kind, Palette, badge, classify_node, label_font_size};
use shardmap_core::number::fmt_js;
use shardmap_core::{Hierarchy, LayoutKind, NodeId, UtilizationBar, ViewConfig, utilization_bars};

use crate::overlay::RollingOverlay;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LayoutPoint {
    pub x: f64,
    pub y: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Bounds {
    pub min_x: f64,
    pub min_y: f64,
    pub max_x: f64,
    pub max_y: f64,
}

impl Bounds {
    pub fn from_points(points: impl IntoIterator<Item = (f64, f64)>) -> Option<Self> {
        let mut it = points.into_iter();
        let (x0, y0) = it.next()?;
        let mut b = Self {
            min_x: x0,
            min_y: y0,
            max_x: x0,
            max_y: y0,
        };
        for (x, y) in it {
            b.min_x = b.min_x.min(x);
            b.min_y = b.min_y.min(y);
            b.max_x = b.max_x.max(x);
            b.max_y = b.max_y.max(y);
        }
        Some(b)
    }

    pub fn width(&self) -> f64 {
        self.max_x - self.min_x
    }

    pub fn height(&self) -> f64 {
        self.max_y - self.min_y
    }
}

/// The drawing surface: the plot area plus the configured margin.
///
/// Node, edge and overlay coordinates are relative to the plot area; a host draws them under
/// a `translate(origin.x, origin.y)` on a `width` x `height` surface.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Canvas {
    pub width: f64,
    pub height: f64,
    pub origin: LayoutPoint,
}

impl Canvas {
    pub fn from_config(config: &ViewConfig) -> Self {
        let m = &config.margin;
        Self {
            width: config.width + m.left + m.right,
            height: config.height + m.top + m.bottom,
            origin: LayoutPoint {
                x: m.left,
                y: m.top,
            },
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TextAnchor {
    Start,
    End,
}

/// Text placed relative to a node center. `dy` is in em.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NodeLabel {
    pub text: String,
    pub dx: f64,
    pub dy: f64,
    pub anchor: TextAnchor,
    pub font_size: f64,
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub bold: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PositionedNode {
    pub id: NodeId,
    pub name: String,
    pub depth: usize,
    pub kind: Kind,
    pub color: String,
    pub radius: f64,
    /// Horizontal screen coordinate.
    pub x: f64,
    /// Vertical screen coordinate.
    pub y: f64,
    pub label: NodeLabel,
    /// Member count of a node-type group, e.g. `(3)`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub badge: Option<NodeLabel>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub bars: Vec<UtilizationBar>,
    pub pinned: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EdgeCurve {
    /// Cubic with both control points at the horizontal midpoint (`d3.linkHorizontal`).
    Horizontal,
    Line,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PositionedEdge {
    pub source: NodeId,
    pub target: NodeId,
    pub from: LayoutPoint,
    pub to: LayoutPoint,
    pub curve: EdgeCurve,
}

impl PositionedEdge {
    /// SVG path data for this edge.
    pub fn path_d(&self) -> String {
        edge_path(self.from, self.to, self.curve)
    }
}

pub fn edge_path(from: LayoutPoint, to: LayoutPoint, curve: EdgeCurve) -> String {
    match curve {
        EdgeCurve::Horizontal => {
            let mx = (from.x + to.x) / 2.0;
            format!(
                "M{},{}C{},{},{},{},{},{}",
                fmt_js(from.x),
                fmt_js(from.y),
                fmt_js(mx),
                fmt_js(from.y),
                fmt_js(mx),
                fmt_js(to.y),
                fmt_js(to.x),
                fmt_js(to.y)
            )
        }
        EdgeCurve::Line => format!(
            "M{},{}L{},{}",
            fmt_js(from.x),
            fmt_js(from.y),
            fmt_js(to.x),
            fmt_js(to.y)
        ),
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PositionedGraph {
    pub layout: LayoutKind,
    pub canvas: Canvas,
    pub nodes: Vec<PositionedNode>,
    pub edges: Vec<PositionedEdge>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub overlay: Option<RollingOverlay>,
    pub bounds: Option<Bounds>,
}

impl PositionedGraph {
    pub fn node(&self, id: NodeId) -> Option<&PositionedNode> {
        self.nodes.get(id.index()).filter(|n| n.id == id)
    }

    pub fn node_by_name(&self, name: &str) -> Option<&PositionedNode> {
        self.nodes.iter().find(|n| n.name == name)
    }
}

/// Turns per-node positions (indexed like the hierarchy arena) into a decorated graph.
pub(crate) fn positioned_graph(
    hierarchy: &Hierarchy,
    positions: &[LayoutPoint],
    pinned: impl Fn(NodeId) -> bool,
    layout: LayoutKind,
    config: &ViewConfig,
    palette: &Palette,
) -> PositionedGraph {
    let nodes: Vec<PositionedNode> = hierarchy
        .iter()
        .zip(positions)
        .map(|(node, p)| {
            let kind = classify_node(hierarchy, node);
            // Tree labels of inner nodes sit left of the circle; everything else sits right.
            let (dx, anchor) = match layout {
                LayoutKind::Tree if node.has_children() => (-13.0, TextAnchor::End),
                _ => (13.0, TextAnchor::Start),
            };
            let badge = badge(hierarchy, node.id).map(|text| NodeLabel {
                text,
                dx,
                dy: 1.5,
                anchor,
                font_size: label_font_size(node.depth),
                bold: false,
            });
            PositionedNode {
                id: node.id,
                name: node.name().to_string(),
                depth: node.depth,
                kind,
                color: palette.color(kind).to_string(),
                radius: config.node_radius,
                x: p.x,
                y: p.y,
                label: NodeLabel {
                    text: node.name().to_string(),
                    dx,
                    dy: 0.35,
                    anchor,
                    font_size: label_font_size(node.depth),
                    bold: false,
                },
                badge,
                bars: utilization_bars(hierarchy, node.id),
                pinned: pinned(node.id),
            }
        })
        .collect();

    let curve = match layout {
        LayoutKind::Tree => EdgeCurve::Horizontal,
        LayoutKind::Force => EdgeCurve::Line,
    };
    let edges = hierarchy
        .links()
        .into_iter()
        .map(|(source, target)| PositionedEdge {
            source,
            target,
            from: positions[source.index()],
            to: positions[target.index()],
            curve,
        })
        .collect();

    let bounds = Bounds::from_points(nodes.iter().map(|n| (n.x, n.y)));
    PositionedGraph {
        layout,
        canvas: Canvas::from_config(config),
        nodes,
        edges,
        overlay: None,
        bounds,
    }
}
