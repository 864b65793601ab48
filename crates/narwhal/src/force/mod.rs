//! Force-directed simulation with d3-force semantics.
//!
//! Unlike d3 there is no internal timer: the host calls [`Simulation::step`] once per frame and
//! stops calling it to cancel. Each step cools `alpha`, applies the link, many-body, centering
//! and (optional) collision forces in that order, then integrates velocities.

use crate::error::{Error, Result};
use crate::graph::{Graph, LayoutResult, Point};
use rustc_hash::{FxHashMap, FxHashSet};

mod quadtree;

use quadtree::QuadTree;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DragRelease {
    /// The dragged node stays pinned where it was dropped.
    #[default]
    KeepPinned,
    /// The pin is cleared and the node rejoins the simulation.
    Release,
}

#[derive(Debug, Clone)]
pub struct ForceOptions {
    /// Target separation of linked nodes.
    pub link_distance: f64,
    /// Many-body strength; negative values repel.
    pub charge_strength: f64,
    /// Barnes-Hut accuracy: a cell is treated as one body when `width / distance < theta`.
    /// `0` sums every pair exactly.
    pub theta: f64,
    /// Centering target. `None` disables the centering force.
    pub center: Option<Point>,
    /// Extra padding added to each node radius by the collision force. `None` disables it.
    pub collision_buffer: Option<f64>,
    pub alpha_min: f64,
    pub alpha_decay: f64,
    /// Fraction of velocity lost per step.
    pub velocity_decay: f64,
    /// `alpha_target` applied while at least one drag is active.
    pub drag_alpha_target: f64,
    pub drag_release: DragRelease,
    /// Hard cap on the number of steps, on top of the cooling schedule.
    pub max_steps: usize,
    pub random_seed: u64,
}

impl Default for ForceOptions {
    fn default() -> Self {
        let alpha_min = 0.001;
        Self {
            link_distance: 30.0,
            charge_strength: -30.0,
            theta: 0.9,
            center: None,
            collision_buffer: None,
            alpha_min,
            alpha_decay: default_alpha_decay(alpha_min),
            velocity_decay: 0.4,
            drag_alpha_target: 0.3,
            drag_release: DragRelease::KeepPinned,
            max_steps: 10_000,
            random_seed: 1,
        }
    }
}

/// d3's schedule: alpha reaches `alpha_min` after 300 steps.
pub fn default_alpha_decay(alpha_min: f64) -> f64 {
    1.0 - alpha_min.powf(1.0 / 300.0)
}

impl ForceOptions {
    pub fn validate(&self) -> Result<()> {
        let checks: [(&'static str, f64, bool); 7] = [
            (
                "link_distance",
                self.link_distance,
                self.link_distance >= 0.0,
            ),
            ("charge_strength", self.charge_strength, true),
            ("theta", self.theta, self.theta >= 0.0),
            ("alpha_min", self.alpha_min, self.alpha_min > 0.0),
            (
                "alpha_decay",
                self.alpha_decay,
                self.alpha_decay > 0.0 && self.alpha_decay < 1.0,
            ),
            (
                "velocity_decay",
                self.velocity_decay,
                (0.0..=1.0).contains(&self.velocity_decay),
            ),
            (
                "drag_alpha_target",
                self.drag_alpha_target,
                (0.0..=1.0).contains(&self.drag_alpha_target),
            ),
        ];
        for (name, value, ok) in checks {
            if !(value.is_finite() && ok) {
                return Err(Error::InvalidOption { name, value });
            }
        }
        if let Some(c) = self.center {
            if !(c.x.is_finite() && c.y.is_finite()) {
                return Err(Error::InvalidOption {
                    name: "center",
                    value: if c.x.is_finite() { c.y } else { c.x },
                });
            }
        }
        if let Some(b) = self.collision_buffer {
            if !(b.is_finite() && b >= 0.0) {
                return Err(Error::InvalidOption {
                    name: "collision_buffer",
                    value: b,
                });
            }
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum StepOutcome {
    /// Positions were updated and the simulation is still warm.
    Running { alpha: f64 },
    /// Positions were updated and alpha fell below `alpha_min`; further steps are no-ops.
    Converged { alpha: f64 },
    /// Nothing happened: the simulation had already stopped.
    Stopped,
}

impl StepOutcome {
    pub fn moved(self) -> bool {
        !matches!(self, StepOutcome::Stopped)
    }
}

#[derive(Debug, Clone)]
struct SimNode {
    id: String,
    radius: f64,
    x: f64,
    y: f64,
    vx: f64,
    vy: f64,
    fx: Option<f64>,
    fy: Option<f64>,
}

#[derive(Debug, Clone, Copy)]
struct SimLink {
    source: usize,
    target: usize,
    strength: f64,
    bias: f64,
}

#[derive(Debug, Clone)]
pub struct Simulation {
    nodes: Vec<SimNode>,
    links: Vec<SimLink>,
    id_to_idx: FxHashMap<String, usize>,
    options: ForceOptions,
    alpha: f64,
    alpha_target: f64,
    dragging: FxHashSet<usize>,
    steps: usize,
    restarted_at: usize,
    stopped: bool,
    rng: XorShift64Star,
}

impl Simulation {
    const INITIAL_RADIUS: f64 = 10.0;
    const DISTANCE_MIN2: f64 = 1.0;
    const COLLIDE_STRENGTH: f64 = 1.0;

    pub fn new(graph: &Graph, options: ForceOptions) -> Result<Self> {
        graph.validate()?;
        options.validate()?;

        let initial_angle = std::f64::consts::PI * (3.0 - 5.0f64.sqrt());
        let mut nodes: Vec<SimNode> = Vec::with_capacity(graph.nodes.len());
        let mut id_to_idx: FxHashMap<String, usize> = FxHashMap::default();
        id_to_idx.reserve(graph.nodes.len());
        for (i, n) in graph.nodes.iter().enumerate() {
            let radius = Self::INITIAL_RADIUS * (0.5 + i as f64).sqrt();
            let angle = i as f64 * initial_angle;
            let (mut x, mut y) = match (n.x, n.y) {
                (Some(x), Some(y)) => (x, y),
                _ => (radius * angle.cos(), radius * angle.sin()),
            };
            if let Some(fx) = n.fx {
                x = fx;
            }
            if let Some(fy) = n.fy {
                y = fy;
            }
            nodes.push(SimNode {
                id: n.id.clone(),
                radius: n.radius,
                x,
                y,
                vx: 0.0,
                vy: 0.0,
                fx: n.fx,
                fy: n.fy,
            });
            id_to_idx.insert(n.id.clone(), i);
        }

        let mut degree = vec![0usize; nodes.len()];
        let mut endpoints: Vec<(usize, usize)> = Vec::with_capacity(graph.edges.len());
        for e in &graph.edges {
            // `validate` guarantees both endpoints exist.
            let (Some(&s), Some(&t)) = (id_to_idx.get(&e.source), id_to_idx.get(&e.target))
            else {
                continue;
            };
            degree[s] += 1;
            degree[t] += 1;
            endpoints.push((s, t));
        }
        let links = endpoints
            .into_iter()
            .map(|(s, t)| SimLink {
                source: s,
                target: t,
                strength: 1.0 / (degree[s].min(degree[t]) as f64),
                bias: degree[s] as f64 / (degree[s] + degree[t]) as f64,
            })
            .collect();

        let rng = XorShift64Star::new(options.random_seed);
        Ok(Self {
            nodes,
            links,
            id_to_idx,
            options,
            alpha: 1.0,
            alpha_target: 0.0,
            dragging: FxHashSet::default(),
            steps: 0,
            restarted_at: 0,
            stopped: false,
            rng,
        })
    }

    pub fn alpha(&self) -> f64 {
        self.alpha
    }

    pub fn alpha_target(&self) -> f64 {
        self.alpha_target
    }

    pub fn steps(&self) -> usize {
        self.steps
    }

    pub fn is_stopped(&self) -> bool {
        self.stopped
    }

    pub fn options(&self) -> &ForceOptions {
        &self.options
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Halts the simulation; `step` becomes a no-op until [`Simulation::restart`].
    pub fn stop(&mut self) {
        self.stopped = true;
    }

    pub fn restart(&mut self) {
        self.stopped = false;
        self.restarted_at = self.steps;
    }

    pub fn position(&self, id: &str) -> Option<Point> {
        let &i = self.id_to_idx.get(id)?;
        let n = &self.nodes[i];
        Some(Point { x: n.x, y: n.y })
    }

    pub fn is_pinned(&self, id: &str) -> bool {
        self.id_to_idx
            .get(id)
            .is_some_and(|&i| self.nodes[i].fx.is_some() || self.nodes[i].fy.is_some())
    }

    /// Positions in input order.
    pub fn positions(&self) -> impl Iterator<Item = (&str, Point)> + '_ {
        self.nodes
            .iter()
            .map(|n| (n.id.as_str(), Point { x: n.x, y: n.y }))
    }

    pub fn result(&self) -> LayoutResult {
        LayoutResult {
            positions: self
                .positions()
                .map(|(id, p)| (id.to_string(), p))
                .collect(),
        }
    }

    /// Advances the simulation by one tick.
    pub fn step(&mut self) -> StepOutcome {
        if self.stopped {
            return StepOutcome::Stopped;
        }

        self.alpha += (self.alpha_target - self.alpha) * self.options.alpha_decay;
        let alpha = self.alpha;

        self.apply_link(alpha);
        self.apply_many_body(alpha);
        if let Some(center) = self.options.center {
            self.apply_center(center);
        }
        if let Some(buffer) = self.options.collision_buffer {
            self.apply_collision(buffer);
        }
        self.integrate();
        self.steps += 1;

        if self.alpha < self.options.alpha_min
            || self.steps - self.restarted_at >= self.options.max_steps
        {
            self.stopped = true;
            StepOutcome::Converged { alpha }
        } else {
            StepOutcome::Running { alpha }
        }
    }

    /// Steps until the simulation stops and returns the number of steps taken.
    pub fn run_to_convergence(&mut self) -> usize {
        let timing_enabled = std::env::var("NARWHAL_FORCE_TIMING").ok().as_deref() == Some("1");
        let start = timing_enabled.then(std::time::Instant::now);

        let before = self.steps;
        while self.step().moved() {}

        if let Some(s) = start {
            eprintln!(
                "[narwhal-force-timing] total={:?} steps={} nodes={} links={} alpha={}",
                s.elapsed(),
                self.steps - before,
                self.nodes.len(),
                self.links.len(),
                self.alpha,
            );
        }
        self.steps - before
    }

    /// Pins `id` at its current position and reheats the simulation (first active drag only).
    pub fn drag_start(&mut self, id: &str) -> bool {
        let Some(&i) = self.id_to_idx.get(id) else {
            return false;
        };
        if self.dragging.is_empty() {
            self.alpha_target = self.options.drag_alpha_target;
            self.restart();
        }
        self.dragging.insert(i);
        let n = &mut self.nodes[i];
        n.fx = Some(n.x);
        n.fy = Some(n.y);
        true
    }

    pub fn is_dragging(&self, id: &str) -> bool {
        self.id_to_idx
            .get(id)
            .is_some_and(|i| self.dragging.contains(i))
    }

    /// Moves the pin of a dragged node. Nodes without an active drag and non-finite pointer
    /// coordinates are ignored.
    pub fn drag_move(&mut self, id: &str, x: f64, y: f64) -> bool {
        if !(x.is_finite() && y.is_finite()) {
            return false;
        }
        let Some(&i) = self.id_to_idx.get(id) else {
            return false;
        };
        if !self.dragging.contains(&i) {
            return false;
        }
        self.nodes[i].fx = Some(x);
        self.nodes[i].fy = Some(y);
        true
    }

    /// Ends a drag: stops reheating once no drag is active and applies the release policy.
    pub fn drag_end(&mut self, id: &str) -> bool {
        let Some(&i) = self.id_to_idx.get(id) else {
            return false;
        };
        if !self.dragging.remove(&i) {
            return false;
        }
        if self.dragging.is_empty() {
            self.alpha_target = 0.0;
        }
        if self.options.drag_release == DragRelease::Release {
            self.nodes[i].fx = None;
            self.nodes[i].fy = None;
        }
        true
    }

    fn jiggle(&mut self) -> f64 {
        (self.rng.next_f64_unit() - 0.5) * 1e-6
    }

    fn apply_link(&mut self, alpha: f64) {
        let distance = self.options.link_distance;
        for li in 0..self.links.len() {
            let link = self.links[li];
            let (s, t) = (link.source, link.target);
            let mut x = self.nodes[t].x + self.nodes[t].vx - self.nodes[s].x - self.nodes[s].vx;
            let mut y = self.nodes[t].y + self.nodes[t].vy - self.nodes[s].y - self.nodes[s].vy;
            if x == 0.0 {
                x = self.jiggle();
            }
            if y == 0.0 {
                y = self.jiggle();
            }
            let mut l = (x * x + y * y).sqrt();
            l = (l - distance) / l * alpha * link.strength;
            x *= l;
            y *= l;
            self.nodes[t].vx -= x * link.bias;
            self.nodes[t].vy -= y * link.bias;
            self.nodes[s].vx += x * (1.0 - link.bias);
            self.nodes[s].vy += y * (1.0 - link.bias);
        }
    }

    fn apply_many_body(&mut self, alpha: f64) {
        if self.options.charge_strength == 0.0 {
            return;
        }
        if self.options.theta == 0.0 {
            self.apply_many_body_exact(alpha);
        } else {
            self.apply_many_body_barnes_hut(alpha);
        }
    }

    fn apply_many_body_exact(&mut self, alpha: f64) {
        let strength = self.options.charge_strength;
        let n = self.nodes.len();
        for i in 0..n {
            for j in 0..n {
                if i == j {
                    continue;
                }
                let mut x = self.nodes[j].x - self.nodes[i].x;
                let mut y = self.nodes[j].y - self.nodes[i].y;
                let mut l = x * x + y * y;
                if x == 0.0 {
                    x = self.jiggle();
                    l += x * x;
                }
                if y == 0.0 {
                    y = self.jiggle();
                    l += y * y;
                }
                if l < Self::DISTANCE_MIN2 {
                    l = (Self::DISTANCE_MIN2 * l).sqrt();
                }
                let w = strength * alpha / l;
                self.nodes[i].vx += x * w;
                self.nodes[i].vy += y * w;
            }
        }
    }

    fn apply_many_body_barnes_hut(&mut self, alpha: f64) {
        let strength = self.options.charge_strength;
        let theta2 = self.options.theta * self.options.theta;
        let points: Vec<(f64, f64)> = self.nodes.iter().map(|n| (n.x, n.y)).collect();
        let Some(tree) = QuadTree::build(&points) else {
            return;
        };

        let mut stack = Vec::new();
        for i in 0..self.nodes.len() {
            stack.clear();
            stack.push(QuadTree::ROOT);
            while let Some(q) = stack.pop() {
                let quad = &tree.quads[q];
                let mut x = quad.x - self.nodes[i].x;
                let mut y = quad.y - self.nodes[i].y;
                let mut l = x * x + y * y;
                let far = quad.width * quad.width / theta2 < l;

                if !far && !quad.is_leaf() {
                    stack.extend(quad.children.iter().copied());
                    continue;
                }
                let others = if far {
                    quad.count
                } else {
                    quad.points.iter().filter(|&&p| p != i).count()
                };
                if others == 0 {
                    continue;
                }
                if x == 0.0 {
                    x = self.jiggle();
                    l += x * x;
                }
                if y == 0.0 {
                    y = self.jiggle();
                    l += y * y;
                }
                if l < Self::DISTANCE_MIN2 {
                    l = (Self::DISTANCE_MIN2 * l).sqrt();
                }
                let w = strength * others as f64 * alpha / l;
                self.nodes[i].vx += x * w;
                self.nodes[i].vy += y * w;
            }
        }
    }

    fn apply_center(&mut self, center: Point) {
        let n = self.nodes.len();
        if n == 0 {
            return;
        }
        let (mut sx, mut sy) = (0.0, 0.0);
        for node in &self.nodes {
            sx += node.x;
            sy += node.y;
        }
        let dx = sx / n as f64 - center.x;
        let dy = sy / n as f64 - center.y;
        for node in &mut self.nodes {
            node.x -= dx;
            node.y -= dy;
        }
    }

    fn apply_collision(&mut self, buffer: f64) {
        let n = self.nodes.len();
        for i in 0..n {
            let ri = self.nodes[i].radius + buffer;
            let ri2 = ri * ri;
            let xi = self.nodes[i].x + self.nodes[i].vx;
            let yi = self.nodes[i].y + self.nodes[i].vy;
            for j in (i + 1)..n {
                let rj = self.nodes[j].radius + buffer;
                let r = ri + rj;
                let mut x = xi - self.nodes[j].x - self.nodes[j].vx;
                let mut y = yi - self.nodes[j].y - self.nodes[j].vy;
                let mut l = x * x + y * y;
                if l >= r * r {
                    continue;
                }
                if x == 0.0 {
                    x = self.jiggle();
                    l += x * x;
                }
                if y == 0.0 {
                    y = self.jiggle();
                    l += y * y;
                }
                let d = l.sqrt();
                let k = (r - d) / d * Self::COLLIDE_STRENGTH;
                x *= k;
                y *= k;
                let rj2 = rj * rj;
                let share = rj2 / (ri2 + rj2);
                self.nodes[i].vx += x * share;
                self.nodes[i].vy += y * share;
                self.nodes[j].vx -= x * (1.0 - share);
                self.nodes[j].vy -= y * (1.0 - share);
            }
        }
    }

    fn integrate(&mut self) {
        let keep = 1.0 - self.options.velocity_decay;
        for node in &mut self.nodes {
            let (px, py) = (node.x, node.y);
            match node.fx {
                Some(fx) => {
                    node.x = fx;
                    node.vx = 0.0;
                }
                None => {
                    node.vx *= keep;
                    node.x += node.vx;
                }
            }
            match node.fy {
                Some(fy) => {
                    node.y = fy;
                    node.vy = 0.0;
                }
                None => {
                    node.vy *= keep;
                    node.y += node.vy;
                }
            }
            // Never publish NaN: fall back to the last finite position.
            if !node.x.is_finite() {
                node.x = px;
                node.vx = 0.0;
            }
            if !node.y.is_finite() {
                node.y = py;
                node.vy = 0.0;
            }
        }
    }
}

#[derive(Debug, Clone)]
struct XorShift64Star {
    state: u64,
}

impl XorShift64Star {
    fn new(seed: u64) -> Self {
        Self { state: seed.max(1) }
    }

    fn next_u64(&mut self) -> u64 {
        let mut x = self.state;
        x ^= x >> 12;
        x ^= x << 25;
        x ^= x >> 27;
        self.state = x;
        x.wrapping_mul(0x2545F4914F6CDD1D_u64)
    }

    fn next_f64_unit(&mut self) -> f64 {
        // Map to [0, 1) with 53 bits of precision.
        let u = self.next_u64() >> 11;
        (u as f64) / ((1u64 << 53) as f64)
    }
}

#[cfg(test)]
mod tests {
    use super::{ForceOptions, Simulation, XorShift64Star, default_alpha_decay};
    use crate::graph::{Edge, Graph, Node};

    #[test]
    fn xorshift64star_next_f64_unit_is_seeded() {
        let mut a = XorShift64Star::new(1);
        let mut b = XorShift64Star::new(1);
        for _ in 0..5 {
            let v = a.next_f64_unit();
            assert!((0.0..1.0).contains(&v));
            assert_eq!(v, b.next_f64_unit());
        }
        // Seed 0 is remapped so the generator never gets stuck at zero.
        assert_ne!(XorShift64Star::new(0).next_u64(), 0);
    }

    #[test]
    fn default_decay_cools_to_alpha_min_in_300_steps() {
        let d = default_alpha_decay(0.001);
        let alpha = (1.0 - d).powi(300);
        assert!((alpha - 0.001).abs() < 1e-12, "alpha after 300 steps: {alpha}");
    }

    #[test]
    fn initial_positions_follow_the_phyllotaxis_spiral() {
        let g = Graph {
            nodes: vec![Node::new("a", 1.0), Node::new("b", 1.0)],
            edges: vec![Edge::new("a", "b")],
        };
        let sim = Simulation::new(&g, ForceOptions::default()).unwrap();
        let a = sim.position("a").unwrap();
        assert!((a.x - 10.0 * 0.5f64.sqrt()).abs() < 1e-12);
        assert_eq!(a.y, 0.0);
        let b = sim.position("b").unwrap();
        assert!(b.x.is_finite() && b.y.is_finite());
        assert_ne!((a.x, a.y), (b.x, b.y));
    }

    #[test]
    fn link_strength_uses_the_smaller_endpoint_degree() {
        let g = Graph {
            nodes: vec![
                Node::new("hub", 1.0),
                Node::new("a", 1.0),
                Node::new("b", 1.0),
            ],
            edges: vec![Edge::new("hub", "a"), Edge::new("hub", "b")],
        };
        let sim = Simulation::new(&g, ForceOptions::default()).unwrap();
        assert_eq!(sim.links[0].strength, 1.0);
        assert!((sim.links[0].bias - 2.0 / 3.0).abs() < 1e-12);
    }

    #[test]
    fn barnes_hut_matches_exact_summation_for_two_bodies() {
        let g = Graph {
            nodes: vec![Node::new("a", 1.0), Node::new("b", 1.0)],
            edges: Vec::new(),
        };
        let run = |theta: f64| {
            let mut sim = Simulation::new(
                &g,
                ForceOptions {
                    theta,
                    ..ForceOptions::default()
                },
            )
            .unwrap();
            for _ in 0..5 {
                sim.step();
            }
            (sim.position("a").unwrap(), sim.position("b").unwrap())
        };
        assert_eq!(run(0.9), run(0.0));
    }
}
