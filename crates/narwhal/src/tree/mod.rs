//! Tidy tree positioning (Buchheim, Jünger & Leipert's linear-time Walker algorithm).
//!
//! Mirrors d3-hierarchy `tree().size([dx, dy])`: siblings are separated by 1, cousins by 2, and
//! the result is scaled so the extreme nodes span `dx` on the breadth axis while depth levels
//! span `dy`.

use crate::error::{Error, Result};

/// A rooted tree addressed by dense indices. Node `0` is the root.
#[derive(Debug, Clone)]
pub struct Tree {
    children: Vec<Vec<usize>>,
    parent: Vec<Option<usize>>,
    depth: Vec<usize>,
}

impl Tree {
    /// Builds a tree from per-node child lists. Every non-root node must be listed as a child
    /// exactly once and be reachable from node `0`.
    pub fn from_children(children: Vec<Vec<usize>>) -> Result<Self> {
        let n = children.len();
        if n == 0 {
            return Err(Error::MalformedTree {
                message: "tree has no root".to_string(),
            });
        }

        let mut parent: Vec<Option<usize>> = vec![None; n];
        for (p, kids) in children.iter().enumerate() {
            for &c in kids {
                if c >= n {
                    return Err(Error::MalformedTree {
                        message: format!("node {p} lists unknown child {c}"),
                    });
                }
                if c == 0 {
                    return Err(Error::MalformedTree {
                        message: format!("node {p} lists the root as a child"),
                    });
                }
                if parent[c].is_some() {
                    return Err(Error::MalformedTree {
                        message: format!("node {c} has more than one parent"),
                    });
                }
                parent[c] = Some(p);
            }
        }

        let mut depth = vec![usize::MAX; n];
        depth[0] = 0;
        let mut stack = vec![0usize];
        let mut seen = 1usize;
        while let Some(v) = stack.pop() {
            for &c in &children[v] {
                if depth[c] != usize::MAX {
                    return Err(Error::MalformedTree {
                        message: format!("cycle through node {c}"),
                    });
                }
                depth[c] = depth[v] + 1;
                seen += 1;
                stack.push(c);
            }
        }
        if seen != n {
            return Err(Error::MalformedTree {
                message: format!("{} node(s) are unreachable from the root", n - seen),
            });
        }

        Ok(Self {
            children,
            parent,
            depth,
        })
    }

    pub fn len(&self) -> usize {
        self.children.len()
    }

    pub fn is_empty(&self) -> bool {
        self.children.is_empty()
    }

    pub fn depth(&self, v: usize) -> usize {
        self.depth[v]
    }

    pub fn parent(&self, v: usize) -> Option<usize> {
        self.parent[v]
    }

    pub fn children(&self, v: usize) -> &[usize] {
        &self.children[v]
    }

    /// Pre-order (parent before child) traversal from the root.
    pub fn pre_order(&self) -> Vec<usize> {
        let mut out = Vec::with_capacity(self.len());
        let mut stack = vec![0usize];
        while let Some(v) = stack.pop() {
            out.push(v);
            for &c in self.children[v].iter().rev() {
                stack.push(c);
            }
        }
        out
    }

    /// Post-order (children before parent) traversal from the root.
    pub fn post_order(&self) -> Vec<usize> {
        let mut out = self.pre_order_right_first();
        out.reverse();
        out
    }

    fn pre_order_right_first(&self) -> Vec<usize> {
        let mut out = Vec::with_capacity(self.len());
        let mut stack = vec![0usize];
        while let Some(v) = stack.pop() {
            out.push(v);
            for &c in &self.children[v] {
                stack.push(c);
            }
        }
        out
    }
}

/// `x` runs along the breadth axis and `y` along the depth axis (d3 convention).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TreePoint {
    pub x: f64,
    pub y: f64,
}

/// Positions every node of `tree` inside a `[dx, dy]` box.
pub fn layout(tree: &Tree, dx: f64, dy: f64) -> Result<Vec<TreePoint>> {
    if !dx.is_finite() {
        return Err(Error::InvalidOption {
            name: "tree breadth",
            value: dx,
        });
    }
    if !dy.is_finite() {
        return Err(Error::InvalidOption {
            name: "tree depth",
            value: dy,
        });
    }

    let mut walk = Walk::new(tree);
    for v in tree.post_order() {
        walk.first_walk(v);
    }
    let sentinel = walk.sentinel();
    walk.modifier[sentinel] = -walk.prelim[0];
    let order = tree.pre_order();
    for &v in &order {
        walk.second_walk(v);
    }

    let x = walk.x;
    let mut left = 0usize;
    let mut right = 0usize;
    let mut bottom = 0usize;
    for &v in &order {
        if x[v] < x[left] {
            left = v;
        }
        if x[v] > x[right] {
            right = v;
        }
        if tree.depth(v) > tree.depth(bottom) {
            bottom = v;
        }
    }

    let s = if left == right {
        1.0
    } else {
        separation(tree, left, right) / 2.0
    };
    let tx = s - x[left];
    let kx = dx / (x[right] + s + tx);
    let ky = dy / (tree.depth(bottom).max(1) as f64);

    Ok((0..tree.len())
        .map(|v| TreePoint {
            x: (x[v] + tx) * kx,
            y: tree.depth(v) as f64 * ky,
        })
        .collect())
}

fn separation(tree: &Tree, a: usize, b: usize) -> f64 {
    if tree.parent(a) == tree.parent(b) {
        1.0
    } else {
        2.0
    }
}

/// Working state for the two walks. Slot `n` is a sentinel parent of the root.
struct Walk<'a> {
    tree: &'a Tree,
    parent: Vec<usize>,
    children: Vec<Vec<usize>>,
    sibling_index: Vec<usize>,
    ancestor: Vec<usize>,
    default_ancestor: Vec<Option<usize>>,
    prelim: Vec<f64>,
    modifier: Vec<f64>,
    change: Vec<f64>,
    shift: Vec<f64>,
    thread: Vec<Option<usize>>,
    x: Vec<f64>,
}

impl<'a> Walk<'a> {
    fn new(tree: &'a Tree) -> Self {
        let n = tree.len();
        let mut parent = vec![n; n + 1];
        let mut children: Vec<Vec<usize>> = Vec::with_capacity(n + 1);
        let mut sibling_index = vec![0usize; n + 1];
        for v in 0..n {
            children.push(tree.children(v).to_vec());
            for (i, &c) in tree.children(v).iter().enumerate() {
                parent[c] = v;
                sibling_index[c] = i;
            }
        }
        children.push(vec![0]);
        parent[0] = n;

        Self {
            tree,
            parent,
            children,
            sibling_index,
            ancestor: (0..=n).collect(),
            default_ancestor: vec![None; n + 1],
            prelim: vec![0.0; n + 1],
            modifier: vec![0.0; n + 1],
            change: vec![0.0; n + 1],
            shift: vec![0.0; n + 1],
            thread: vec![None; n + 1],
            x: vec![0.0; n],
        }
    }

    fn sentinel(&self) -> usize {
        self.tree.len()
    }

    fn next_left(&self, v: usize) -> Option<usize> {
        self.children[v].first().copied().or(self.thread[v])
    }

    fn next_right(&self, v: usize) -> Option<usize> {
        self.children[v].last().copied().or(self.thread[v])
    }

    fn first_walk(&mut self, v: usize) {
        let p = self.parent[v];
        let left_sibling = match self.sibling_index[v] {
            0 => None,
            i => Some(self.children[p][i - 1]),
        };

        if let (Some(&first), Some(&last)) = (self.children[v].first(), self.children[v].last()) {
            self.execute_shifts(v);
            let midpoint = (self.prelim[first] + self.prelim[last]) / 2.0;
            if let Some(w) = left_sibling {
                self.prelim[v] = self.prelim[w] + separation(self.tree, v, w);
                self.modifier[v] = self.prelim[v] - midpoint;
            } else {
                self.prelim[v] = midpoint;
            }
        } else if let Some(w) = left_sibling {
            self.prelim[v] = self.prelim[w] + separation(self.tree, v, w);
        }

        let fallback = self.default_ancestor[p].unwrap_or(self.children[p][0]);
        let next = self.apportion(v, left_sibling, fallback);
        self.default_ancestor[p] = Some(next);
    }

    fn second_walk(&mut self, v: usize) {
        let p = self.parent[v];
        self.x[v] = self.prelim[v] + self.modifier[p];
        self.modifier[v] += self.modifier[p];
    }

    fn execute_shifts(&mut self, v: usize) {
        let mut shift = 0.0;
        let mut change = 0.0;
        for i in (0..self.children[v].len()).rev() {
            let w = self.children[v][i];
            self.prelim[w] += shift;
            self.modifier[w] += shift;
            change += self.change[w];
            shift += self.shift[w] + change;
        }
    }

    fn move_subtree(&mut self, wm: usize, wp: usize, shift: f64) {
        let change = shift / (self.sibling_index[wp] as f64 - self.sibling_index[wm] as f64);
        self.change[wp] -= change;
        self.shift[wp] += shift;
        self.change[wm] += change;
        self.prelim[wp] += shift;
        self.modifier[wp] += shift;
    }

    fn next_ancestor(&self, vim: usize, v: usize, ancestor: usize) -> usize {
        let a = self.ancestor[vim];
        if self.parent[a] == self.parent[v] {
            a
        } else {
            ancestor
        }
    }

    fn apportion(&mut self, v: usize, left_sibling: Option<usize>, mut ancestor: usize) -> usize {
        let Some(w) = left_sibling else {
            return ancestor;
        };

        let mut vip = v;
        let mut vop = v;
        let mut vim = w;
        let mut vom = self.children[self.parent[v]][0];
        let mut sip = self.modifier[vip];
        let mut sop = self.modifier[vop];
        let mut sim = self.modifier[vim];
        let mut som = self.modifier[vom];

        let (mut next_im, mut next_ip);
        loop {
            next_im = self.next_right(vim);
            next_ip = self.next_left(vip);
            let (Some(im), Some(ip)) = (next_im, next_ip) else {
                break;
            };
            vim = im;
            vip = ip;
            // Both contours still exist at this depth, so the outer ones do too.
            vom = self.next_left(vom).unwrap_or(vom);
            vop = self.next_right(vop).unwrap_or(vop);
            self.ancestor[vop] = v;

            let shift =
                self.prelim[vim] + sim - self.prelim[vip] - sip + separation(self.tree, vim, vip);
            if shift > 0.0 {
                let a = self.next_ancestor(vim, v, ancestor);
                self.move_subtree(a, v, shift);
                sip += shift;
                sop += shift;
            }
            sim += self.modifier[vim];
            sip += self.modifier[vip];
            som += self.modifier[vom];
            sop += self.modifier[vop];
        }

        if let Some(im) = next_im {
            if self.next_right(vop).is_none() {
                self.thread[vop] = Some(im);
                self.modifier[vop] += sim - sop;
            }
        }
        if let Some(ip) = next_ip {
            if self.next_left(vom).is_none() {
                self.thread[vom] = Some(ip);
                self.modifier[vom] += sip - som;
                ancestor = v;
            }
        }
        ancestor
    }
}
