//! Force-directed layout driven one frame at a time.

use crate::Result;
use crate::model::{LayoutPoint, PositionedGraph, positioned_graph};
use narwhal::{DragRelease, Edge, ForceOptions, Graph, Node, Point, Simulation, StepOutcome};
use shardmap_core::classify::Palette;
use shardmap_core::{DragReleasePolicy, Hierarchy, LayoutKind, NodeId, ViewConfig};

#[derive(Debug, Clone, Copy, Default)]
pub struct ForceLayoutEngine;

impl ForceLayoutEngine {
    pub fn options(config: &ViewConfig) -> ForceOptions {
        let f = &config.force;
        ForceOptions {
            link_distance: config.node_spacing,
            charge_strength: f.charge_strength,
            theta: f.theta,
            center: Some(Point {
                x: config.width / 2.0,
                y: config.height / 2.0,
            }),
            collision_buffer: f.collision.then_some(f.collision_buffer),
            alpha_min: f.alpha_min,
            alpha_decay: f
                .alpha_decay
                .unwrap_or_else(|| narwhal::force::default_alpha_decay(f.alpha_min)),
            velocity_decay: f.velocity_decay,
            drag_alpha_target: f.drag_alpha_target,
            drag_release: match f.drag_release {
                DragReleasePolicy::KeepPinned => DragRelease::KeepPinned,
                DragReleasePolicy::Release => DragRelease::Release,
            },
            max_steps: f.max_steps,
            random_seed: f.random_seed,
        }
    }

    /// Seeds a simulation for `hierarchy`. Invalid options or geometry are rejected here,
    /// before the first step.
    pub fn start(hierarchy: &Hierarchy, config: &ViewConfig) -> Result<ForceSession> {
        config.validate()?;
        let keys: Vec<String> = hierarchy.iter().map(|n| n.id.to_string()).collect();
        let graph = Graph {
            nodes: keys
                .iter()
                .map(|k| Node::new(k.clone(), config.node_radius))
                .collect(),
            edges: hierarchy
                .links()
                .into_iter()
                .map(|(p, c)| Edge::new(keys[p.index()].clone(), keys[c.index()].clone()))
                .collect(),
        };
        let sim = Simulation::new(&graph, Self::options(config))?;
        tracing::debug!(
            nodes = graph.nodes.len(),
            links = graph.edges.len(),
            "force simulation started"
        );
        Ok(ForceSession {
            hierarchy: hierarchy.clone(),
            config: config.clone(),
            palette: config.palette(),
            keys,
            sim,
        })
    }
}

#[derive(Debug)]
pub struct ForceSession {
    hierarchy: Hierarchy,
    config: ViewConfig,
    palette: Palette,
    keys: Vec<String>,
    sim: Simulation,
}

impl ForceSession {
    /// Advances one tick. Returns `None` once the simulation has stopped.
    pub fn step(&mut self) -> Option<PositionedGraph> {
        match self.sim.step() {
            StepOutcome::Stopped => None,
            StepOutcome::Running { .. } | StepOutcome::Converged { .. } => Some(self.frame()),
        }
    }

    /// The current positions, without stepping.
    pub fn frame(&self) -> PositionedGraph {
        let positions: Vec<LayoutPoint> = self
            .sim
            .positions()
            .map(|(_, p)| LayoutPoint { x: p.x, y: p.y })
            .collect();
        positioned_graph(
            &self.hierarchy,
            &positions,
            |id| self.sim.is_pinned(&self.keys[id.index()]),
            LayoutKind::Force,
            &self.config,
            &self.palette,
        )
    }

    pub fn run_to_convergence(&mut self) -> PositionedGraph {
        self.sim.run_to_convergence();
        self.frame()
    }

    pub fn is_running(&self) -> bool {
        !self.sim.is_stopped()
    }

    pub fn alpha(&self) -> f64 {
        self.sim.alpha()
    }

    pub fn steps(&self) -> usize {
        self.sim.steps()
    }

    /// Cancels the session; further `step` calls return `None`.
    pub fn stop(&mut self) {
        self.sim.stop();
    }

    pub fn hierarchy(&self) -> &Hierarchy {
        &self.hierarchy
    }

    pub fn drag_start(&mut self, id: NodeId) -> bool {
        match self.keys.get(id.index()) {
            Some(key) => self.sim.drag_start(key),
            None => false,
        }
    }

    pub fn drag_move(&mut self, id: NodeId, x: f64, y: f64) -> bool {
        match self.keys.get(id.index()) {
            Some(key) => self.sim.drag_move(key, x, y),
            None => false,
        }
    }

    pub fn drag_end(&mut self, id: NodeId) -> bool {
        match self.keys.get(id.index()) {
            Some(key) => self.sim.drag_end(key),
            None => false,
        }
    }
}
