//! Interactive view session.
//!
//! A [`Viewer`] owns at most one live layout. Every [`Viewer::update`] cancels the previous
//! one before filtering and laying out again, and bumps a generation counter; frames carry
//! the generation they were produced for, so a host can drop stale frames with
//! [`Viewer::accept_frame`].

use crate::force::{ForceLayoutEngine, ForceSession};
use crate::model::PositionedGraph;
use crate::overlay::rolling_overlay;
use crate::tree::layout_tree;
use crate::Result;
use shardmap_core::{
    ClusterSnapshot, Hierarchy, IndexCatalog, LayoutKind, NodeId, TooltipContent,
    UnknownFilterValue, ViewConfig, ViewRequest, build_tooltip, filter_snapshot,
};

#[derive(Debug, Clone)]
pub struct Frame {
    pub generation: u64,
    pub graph: PositionedGraph,
    pub notice: Option<UnknownFilterValue>,
    /// `false` once the layout is final (tree layouts, or a cooled force simulation).
    pub running: bool,
}

#[derive(Debug)]
enum Live {
    Static { hierarchy: Hierarchy },
    Force { session: ForceSession },
}

impl Live {
    fn hierarchy(&self) -> &Hierarchy {
        match self {
            Live::Static { hierarchy } => hierarchy,
            Live::Force { session } => session.hierarchy(),
        }
    }
}

#[derive(Debug)]
pub struct Viewer {
    snapshot: ClusterSnapshot,
    catalog: IndexCatalog,
    config: ViewConfig,
    request: ViewRequest,
    generation: u64,
    live: Option<Live>,
    notice: Option<UnknownFilterValue>,
}

impl Viewer {
    pub fn new(snapshot: ClusterSnapshot, catalog: IndexCatalog, config: ViewConfig) -> Result<Self> {
        snapshot.validate()?;
        config.validate()?;
        Ok(Self {
            snapshot,
            catalog,
            config,
            request: ViewRequest::default(),
            generation: 0,
            live: None,
            notice: None,
        })
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn request(&self) -> &ViewRequest {
        &self.request
    }

    pub fn catalog(&self) -> &IndexCatalog {
        &self.catalog
    }

    pub fn hierarchy(&self) -> Option<&Hierarchy> {
        self.live.as_ref().map(Live::hierarchy)
    }

    /// Replaces the current view. The previous layout is stopped and dropped first.
    pub fn update(&mut self, request: ViewRequest) -> Result<Frame> {
        self.cancel();
        self.generation += 1;
        self.request = request;

        let filtered = filter_snapshot(&self.snapshot, &self.request.filter, &self.catalog);
        self.notice = filtered.unknown_value;
        let hierarchy = Hierarchy::from_snapshot(&filtered.snapshot);

        let (live, graph, running) = match self.request.layout {
            LayoutKind::Tree => {
                let graph = layout_tree(&hierarchy, &self.config)?;
                (Live::Static { hierarchy }, graph, false)
            }
            LayoutKind::Force => {
                let session = ForceLayoutEngine::start(&hierarchy, &self.config)?;
                let graph = session.frame();
                (Live::Force { session }, graph, true)
            }
        };
        self.live = Some(live);
        tracing::debug!(
            generation = self.generation,
            filter = %self.request.filter,
            layout = %self.request.layout,
            "view updated"
        );
        Ok(self.frame_for(graph, running))
    }

    /// Advances a running force layout by one tick.
    pub fn tick(&mut self) -> Option<Frame> {
        let graph = match self.live.as_mut()? {
            Live::Force { session } => session.step()?,
            Live::Static { .. } => return None,
        };
        let running = matches!(&self.live, Some(Live::Force { session }) if session.is_running());
        Some(self.frame_for(graph, running))
    }

    /// Whether `frame` belongs to the current view.
    pub fn accept_frame(&self, frame: &Frame) -> bool {
        self.live.is_some() && frame.generation == self.generation
    }

    /// Stops and drops the live layout, if any.
    pub fn cancel(&mut self) {
        if let Some(Live::Force { session }) = self.live.as_mut() {
            session.stop();
        }
        self.live = None;
    }

    pub fn tooltip(&self, id: NodeId) -> Option<TooltipContent> {
        let hierarchy = self.hierarchy()?;
        hierarchy.get(id)?;
        Some(build_tooltip(hierarchy, id, &self.catalog))
    }

    pub fn drag_start(&mut self, id: NodeId) -> bool {
        self.with_session(|s| s.drag_start(id))
    }

    pub fn drag_move(&mut self, id: NodeId, x: f64, y: f64) -> bool {
        self.with_session(|s| s.drag_move(id, x, y))
    }

    pub fn drag_end(&mut self, id: NodeId) -> bool {
        self.with_session(|s| s.drag_end(id))
    }

    fn with_session(&mut self, f: impl FnOnce(&mut ForceSession) -> bool) -> bool {
        match self.live.as_mut() {
            Some(Live::Force { session }) => f(session),
            _ => false,
        }
    }

    fn frame_for(&self, mut graph: PositionedGraph, running: bool) -> Frame {
        graph.overlay = rolling_overlay(&graph, &self.request.filter, &self.catalog, &self.config);
        Frame {
            generation: self.generation,
            graph,
            notice: self.notice.clone(),
            running,
        }
    }
}
