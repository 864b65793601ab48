#![forbid(unsafe_code)]

//! Headless layout algorithms for hierarchical node-link views.
//!
//! - [`tree`]: tidy tree positioning with d3-hierarchy `tree()` semantics.
//! - [`force`]: a d3-force style simulation driven one step at a time by the host.
//!
//! Both are deterministic: the force simulation draws its jiggle from a seeded RNG.

pub mod error;
pub mod force;
pub mod graph;
pub mod tree;

pub use error::{Error, Result};
pub use force::{DragRelease, ForceOptions, Simulation, StepOutcome};
pub use graph::{Edge, Graph, LayoutResult, Node, Point};
pub use tree::{Tree, TreePoint};

/// Runs a force simulation until it cools down and returns the final positions.
pub fn layout_force(graph: &Graph, opts: &ForceOptions) -> Result<LayoutResult> {
    let mut sim = Simulation::new(graph, opts.clone())?;
    sim.run_to_convergence();
    Ok(sim.result())
}
