#![forbid(unsafe_code)]

//! `shardmap` turns a search cluster snapshot into a positioned node-link diagram.
//!
//! The core model (filtering, classification, tooltips, configuration) is always available.
//!
//! # Features
//!
//! - `render`: tree and force layouts, the rolling index overlay and view sessions
//!   (`shardmap::render`)

pub use shardmap_core::*;

#[cfg(feature = "render")]
pub mod render {
    pub use shardmap_render::force::{ForceLayoutEngine, ForceSession};
    pub use shardmap_render::model::{
        Bounds, Canvas, EdgeCurve, LayoutPoint, NodeLabel, PositionedEdge, PositionedGraph,
        PositionedNode, TextAnchor,
    };
    pub use shardmap_render::overlay::{OverlayAnchor, OverlayEdge, RollingOverlay};
    pub use shardmap_render::view::{Frame, Viewer};
    pub use shardmap_render::Error as RenderError;
    pub use shardmap_render::{LayoutedView, layout_hierarchy, layout_tree, layout_view, rolling_overlay};

    use shardmap_core::{
        ClusterSnapshot, IndexCatalog, RollingIndexDefinitions, ViewConfig, ViewRequest,
    };

    #[derive(Debug, thiserror::Error)]
    pub enum HeadlessError {
        #[error(transparent)]
        Model(#[from] shardmap_core::Error),
        #[error(transparent)]
        Render(#[from] shardmap_render::Error),
    }

    pub type Result<T> = std::result::Result<T, HeadlessError>;

    /// Inputs for a one-shot layout, as JSON text.
    #[derive(Debug, Clone, Copy, Default)]
    pub struct JsonInputs<'a> {
        pub snapshot: &'a str,
        /// `{"indices": {...}, "sizes": {...}}`; inferred from index names when absent.
        pub definitions: Option<&'a str>,
        /// Overrides deep-merged onto [`ViewConfig::default`].
        pub config: Option<&'a str>,
    }

    /// Parses JSON inputs into a snapshot, an index catalog and a view configuration.
    pub fn load_json(inputs: JsonInputs<'_>) -> Result<(ClusterSnapshot, IndexCatalog, ViewConfig)> {
        let snapshot = ClusterSnapshot::from_json_str(inputs.snapshot)?;
        let definitions = match inputs.definitions {
            Some(text) => RollingIndexDefinitions::from_json_str(text)?,
            None => RollingIndexDefinitions::infer(&snapshot, &Default::default()),
        };
        let config = match inputs.config {
            Some(text) => ViewConfig::from_json_str(text)?,
            None => ViewConfig::default(),
        };
        let catalog = IndexCatalog::from_snapshot(&snapshot, definitions);
        Ok((snapshot, catalog, config))
    }

    /// Synchronous end-to-end helper: parse, filter, lay out (force runs to convergence).
    pub fn layout_json_sync(inputs: JsonInputs<'_>, request: &ViewRequest) -> Result<LayoutedView> {
        let (snapshot, catalog, config) = load_json(inputs)?;
        Ok(layout_view(&snapshot, request, &catalog, &config)?)
    }
}
