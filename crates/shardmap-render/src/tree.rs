//! Hierarchical tree layout.
//!
//! A tidy-tree pass over `[height, width - inset]` places the root vertically; every other
//! node is then placed on a fixed grid: `x = depth * level_spacing`, and children fan out
//! around their parent's `y` at `node_spacing` intervals. No randomness, no iteration.

use crate::Result;
use crate::model::{LayoutPoint, PositionedGraph, positioned_graph};
use shardmap_core::{Hierarchy, LayoutKind, ViewConfig};

pub fn layout_tree(hierarchy: &Hierarchy, config: &ViewConfig) -> Result<PositionedGraph> {
    let positions = tree_positions(hierarchy, config)?;
    let palette = config.palette();
    Ok(positioned_graph(
        hierarchy,
        &positions,
        |_| false,
        LayoutKind::Tree,
        config,
        &palette,
    ))
}

/// Positions indexed like the hierarchy arena.
pub fn tree_positions(hierarchy: &Hierarchy, config: &ViewConfig) -> Result<Vec<LayoutPoint>> {
    let tree = narwhal::Tree::from_children(hierarchy.child_indices())?;
    let tidy = narwhal::tree::layout(
        &tree,
        config.height,
        config.width - config.tree_width_inset,
    )?;

    let mut positions = vec![LayoutPoint { x: 0.0, y: 0.0 }; hierarchy.len()];
    let root = hierarchy.root();
    // The tidy pass is breadth-major; its breadth coordinate is our vertical axis.
    positions[root.id.index()] = LayoutPoint {
        x: root.depth as f64 * config.level_spacing,
        y: tidy[root.id.index()].x,
    };

    for id in hierarchy.pre_order() {
        let node = hierarchy.node(id)?;
        let parent_y = positions[id.index()].y;
        let k = node.children.len() as f64;
        for (i, &child) in node.children.iter().enumerate() {
            let depth = hierarchy.node(child)?.depth;
            positions[child.index()] = LayoutPoint {
                x: depth as f64 * config.level_spacing,
                y: parent_y + (i as f64 - (k - 1.0) / 2.0) * config.node_spacing,
            };
        }
    }

    tracing::debug!(nodes = positions.len(), "tree layout done");
    Ok(positions)
}
