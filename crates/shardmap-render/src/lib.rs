#![forbid(unsafe_code)]

//! Layout and view sessions for shardmap.
//!
//! `{snapshot, filter, layout}` -> filtered snapshot -> [`Hierarchy`] -> tree or force layout
//! -> decorated [`PositionedGraph`] (+ rolling overlay). Drawing is left to the host.

pub mod force;
pub mod model;
pub mod overlay;
pub mod tree;
pub mod view;

use crate::model::PositionedGraph;
use shardmap_core::{
    ClusterSnapshot, Hierarchy, IndexCatalog, LayoutKind, UnknownFilterValue, ViewConfig,
    ViewRequest, filter_snapshot,
};

pub use force::{ForceLayoutEngine, ForceSession};
pub use overlay::{RollingOverlay, rolling_overlay};
pub use tree::layout_tree;
pub use view::{Frame, Viewer};

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error(transparent)]
    Model(#[from] shardmap_core::Error),
    #[error("layout failed: {0}")]
    Layout(#[from] narwhal::Error),
}

pub type Result<T> = std::result::Result<T, Error>;

/// A finished layout together with the hierarchy it was computed from.
#[derive(Debug, Clone)]
pub struct LayoutedView {
    pub hierarchy: Hierarchy,
    pub graph: PositionedGraph,
    /// Set when the filter named a pattern or index the catalog does not know.
    pub notice: Option<UnknownFilterValue>,
}

/// Lays out `hierarchy` to completion; the force layout runs until it cools down.
pub fn layout_hierarchy(
    hierarchy: &Hierarchy,
    layout: LayoutKind,
    config: &ViewConfig,
) -> Result<PositionedGraph> {
    match layout {
        LayoutKind::Tree => layout_tree(hierarchy, config),
        LayoutKind::Force => Ok(ForceLayoutEngine::start(hierarchy, config)?.run_to_convergence()),
    }
}

/// One-shot pipeline: filter, build the hierarchy, lay it out and attach the overlay.
pub fn layout_view(
    snapshot: &ClusterSnapshot,
    request: &ViewRequest,
    catalog: &IndexCatalog,
    config: &ViewConfig,
) -> Result<LayoutedView> {
    snapshot.validate()?;
    config.validate()?;
    let filtered = filter_snapshot(snapshot, &request.filter, catalog);
    let hierarchy = Hierarchy::from_snapshot(&filtered.snapshot);
    let mut graph = layout_hierarchy(&hierarchy, request.layout, config)?;
    graph.overlay = rolling_overlay(&graph, &request.filter, catalog, config);
    tracing::debug!(
        filter = %request.filter,
        layout = %request.layout,
        nodes = graph.nodes.len(),
        "view laid out"
    );
    Ok(LayoutedView {
        hierarchy,
        graph,
        notice: filtered.unknown_value,
    })
}
