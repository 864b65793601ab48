use crate::error::{Error, Result};

#[derive(Debug, Clone, Default)]
pub struct Graph {
    pub nodes: Vec<Node>,
    pub edges: Vec<Edge>,
}

impl Graph {
    /// Rejects inputs that would otherwise leak `NaN` into the simulation.
    pub fn validate(&self) -> Result<()> {
        let mut node_exists: std::collections::BTreeSet<&str> = std::collections::BTreeSet::new();
        for n in &self.nodes {
            if !node_exists.insert(n.id.as_str()) {
                return Err(Error::DuplicateNode { id: n.id.clone() });
            }
            if !(n.radius.is_finite() && n.radius >= 0.0) {
                return Err(Error::NonFiniteNode {
                    id: n.id.clone(),
                    field: "radius",
                });
            }
            for (field, v) in [("x", n.x), ("y", n.y), ("fx", n.fx), ("fy", n.fy)] {
                if v.is_some_and(|v| !v.is_finite()) {
                    return Err(Error::NonFiniteNode {
                        id: n.id.clone(),
                        field,
                    });
                }
            }
        }
        for e in &self.edges {
            if !node_exists.contains(e.source.as_str()) || !node_exists.contains(e.target.as_str())
            {
                return Err(Error::MissingEndpoint {
                    source_id: e.source.clone(),
                    target_id: e.target.clone(),
                });
            }
            if e.source == e.target {
                return Err(Error::SelfLoop {
                    id: e.source.clone(),
                });
            }
        }
        Ok(())
    }
}

#[derive(Debug, Clone)]
pub struct Node {
    pub id: String,
    /// Collision radius (not including the configured buffer).
    pub radius: f64,
    /// Optional initial position. Missing coordinates are seeded on a phyllotaxis spiral.
    pub x: Option<f64>,
    pub y: Option<f64>,
    /// Optional pinned position.
    pub fx: Option<f64>,
    pub fy: Option<f64>,
}

impl Node {
    pub fn new(id: impl Into<String>, radius: f64) -> Self {
        Self {
            id: id.into(),
            radius,
            x: None,
            y: None,
            fx: None,
            fy: None,
        }
    }
}

#[derive(Debug, Clone)]
pub struct Edge {
    pub source: String,
    pub target: String,
}

impl Edge {
    pub fn new(source: impl Into<String>, target: impl Into<String>) -> Self {
        Self {
            source: source.into(),
            target: target.into(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

#[derive(Debug, Clone)]
pub struct LayoutResult {
    pub positions: std::collections::BTreeMap<String, Point>,
}
