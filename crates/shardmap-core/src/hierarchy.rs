//! Arena tree built from a (filtered) snapshot.
//!
//! Nodes are stored in pre-order; a node's `parent` is an index into the arena, so the
//! structure has no owning back references. Depth is fixed at construction:
//! 0 cluster, 1 node-type group, 2 cluster member, 3 index shard.

use crate::error::{Error, Result};
use crate::model::{ClusterSnapshot, IndexShard, Node};
use serde::{Deserialize, Serialize};

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct NodeId(pub usize);

impl NodeId {
    pub const ROOT: NodeId = NodeId(0);

    pub fn index(self) -> usize {
        self.0
    }
}

impl std::fmt::Display for NodeId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum NodeData {
    Cluster { name: String },
    Group { name: String },
    /// A cluster member; its shard list lives in the arena, so `children` is always `None`.
    Member(Node),
    Shard(IndexShard),
}

impl NodeData {
    pub fn name(&self) -> &str {
        match self {
            Self::Cluster { name } | Self::Group { name } => name,
            Self::Member(node) => &node.name,
            Self::Shard(shard) => &shard.name,
        }
    }

    pub fn member(&self) -> Option<&Node> {
        match self {
            Self::Member(node) => Some(node),
            _ => None,
        }
    }

    pub fn shard(&self) -> Option<&IndexShard> {
        match self {
            Self::Shard(shard) => Some(shard),
            _ => None,
        }
    }

    pub fn size(&self) -> Option<f64> {
        self.shard().and_then(|s| s.size)
    }

    pub fn rolling_index(&self) -> Option<&str> {
        self.shard().and_then(|s| s.rolling_index.as_deref())
    }

    fn level(&self) -> usize {
        match self {
            Self::Cluster { .. } => 0,
            Self::Group { .. } => 1,
            Self::Member(_) => 2,
            Self::Shard(_) => 3,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct HierarchyNode {
    pub id: NodeId,
    pub depth: usize,
    pub parent: Option<NodeId>,
    pub children: Vec<NodeId>,
    pub data: NodeData,
}

impl HierarchyNode {
    pub fn name(&self) -> &str {
        self.data.name()
    }

    pub fn has_children(&self) -> bool {
        !self.children.is_empty()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Hierarchy {
    nodes: Vec<HierarchyNode>,
}

impl Hierarchy {
    pub fn from_snapshot(snapshot: &ClusterSnapshot) -> Self {
        let mut b = Builder::default();
        let root = b.push(
            None,
            NodeData::Cluster {
                name: snapshot.name.clone(),
            },
        );
        for group in &snapshot.children {
            let g = b.push(
                Some(root),
                NodeData::Group {
                    name: group.name.clone(),
                },
            );
            for node in &group.children {
                let member = Node {
                    children: None,
                    ..node.clone()
                };
                let m = b.push(Some(g), NodeData::Member(member));
                for shard in node.children.iter().flatten() {
                    b.push(Some(m), NodeData::Shard(shard.clone()));
                }
            }
        }
        tracing::debug!(nodes = b.nodes.len(), "built hierarchy");
        Self { nodes: b.nodes }
    }

    /// Builds a hierarchy from `(data, parent index)` entries; entry 0 is the root.
    ///
    /// Rejects dangling or cyclic parent references and levels that do not match the
    /// cluster -> group -> member -> shard shape.
    pub fn from_parents(entries: Vec<(NodeData, Option<usize>)>) -> Result<Self> {
        let n = entries.len();
        let malformed = |message: String| Error::MalformedSnapshot { message };
        if n == 0 {
            return Err(malformed("hierarchy is empty".to_string()));
        }

        let parents: Vec<Option<usize>> = entries.iter().map(|(_, p)| *p).collect();
        for (i, p) in parents.iter().enumerate() {
            match (i, p) {
                (0, None) => {}
                (0, Some(_)) => return Err(malformed("root has a parent".to_string())),
                (_, None) => return Err(malformed(format!("node {i} has no parent"))),
                (_, Some(p)) if *p >= n => {
                    return Err(malformed(format!("node {i} has unknown parent {p}")));
                }
                _ => {}
            }
        }

        let mut depth = vec![0usize; n];
        for (i, d) in depth.iter_mut().enumerate() {
            let mut cur = i;
            let mut steps = 0usize;
            while let Some(p) = parents[cur] {
                steps += 1;
                if steps > n {
                    return Err(malformed(format!("node {i} is part of a parent cycle")));
                }
                cur = p;
            }
            *d = steps;
        }

        let mut nodes: Vec<HierarchyNode> = entries
            .into_iter()
            .enumerate()
            .map(|(i, (data, parent))| HierarchyNode {
                id: NodeId(i),
                depth: depth[i],
                parent: parent.map(NodeId),
                children: Vec::new(),
                data,
            })
            .collect();
        for i in 1..n {
            if let Some(p) = parents[i] {
                nodes[p].children.push(NodeId(i));
            }
        }
        for node in &nodes {
            if node.data.level() != node.depth {
                return Err(malformed(format!(
                    "node {} ({}) sits at depth {}",
                    node.id,
                    node.name(),
                    node.depth
                )));
            }
        }
        Ok(Self { nodes })
    }

    pub fn root(&self) -> &HierarchyNode {
        &self.nodes[0]
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn get(&self, id: NodeId) -> Option<&HierarchyNode> {
        self.nodes.get(id.0)
    }

    pub fn node(&self, id: NodeId) -> Result<&HierarchyNode> {
        self.get(id).ok_or(Error::UnknownNode { id: id.0 })
    }

    pub fn parent(&self, id: NodeId) -> Option<&HierarchyNode> {
        self.get(id)?.parent.and_then(|p| self.get(p))
    }

    /// Nodes in arena order.
    pub fn iter(&self) -> impl Iterator<Item = &HierarchyNode> + '_ {
        self.nodes.iter()
    }

    /// Depth-first, parents before children, children in input order.
    pub fn pre_order(&self) -> Vec<NodeId> {
        let mut out = Vec::with_capacity(self.nodes.len());
        let mut stack = vec![NodeId::ROOT];
        while let Some(id) = stack.pop() {
            out.push(id);
            stack.extend(self.nodes[id.0].children.iter().rev().copied());
        }
        out
    }

    /// `(parent, child)` pairs in pre-order of the child.
    pub fn links(&self) -> Vec<(NodeId, NodeId)> {
        self.pre_order()
            .into_iter()
            .filter_map(|id| self.nodes[id.0].parent.map(|p| (p, id)))
            .collect()
    }

    /// Child lists indexed by node index.
    pub fn child_indices(&self) -> Vec<Vec<usize>> {
        self.nodes
            .iter()
            .map(|n| n.children.iter().map(|c| c.0).collect())
            .collect()
    }

    pub fn find_by_name(&self, name: &str) -> Option<&HierarchyNode> {
        self.nodes.iter().find(|n| n.name() == name)
    }
}

#[derive(Default)]
struct Builder {
    nodes: Vec<HierarchyNode>,
}

impl Builder {
    fn push(&mut self, parent: Option<NodeId>, data: NodeData) -> NodeId {
        let id = NodeId(self.nodes.len());
        let depth = parent.map_or(0, |p| self.nodes[p.0].depth + 1);
        if let Some(p) = parent {
            self.nodes[p.0].children.push(id);
        }
        self.nodes.push(HierarchyNode {
            id,
            depth,
            parent,
            children: Vec::new(),
            data,
        });
        id
    }
}
