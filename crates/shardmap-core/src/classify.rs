//! Node kinds, colors and label styling.

use crate::hierarchy::{Hierarchy, HierarchyNode, NodeData, NodeId};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Kind {
    Root,
    GroupHeader,
    Hot,
    Warm,
    Cold,
    OtherGroup,
    RollingShard,
    PlainShard,
    RollingAnchor,
}

impl Kind {
    pub const ALL: [Kind; 9] = [
        Kind::Root,
        Kind::GroupHeader,
        Kind::Hot,
        Kind::Warm,
        Kind::Cold,
        Kind::OtherGroup,
        Kind::RollingShard,
        Kind::PlainShard,
        Kind::RollingAnchor,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Kind::Root => "root",
            Kind::GroupHeader => "group-header",
            Kind::Hot => "hot",
            Kind::Warm => "warm",
            Kind::Cold => "cold",
            Kind::OtherGroup => "other-group",
            Kind::RollingShard => "rolling-shard",
            Kind::PlainShard => "plain-shard",
            Kind::RollingAnchor => "rolling-anchor",
        }
    }

    pub fn parse(value: &str) -> Option<Kind> {
        Kind::ALL.into_iter().find(|k| k.as_str() == value)
    }

    fn slot(self) -> usize {
        self as usize
    }
}

/// Member kinds keyed by the exact name of their group.
pub const GROUP_KINDS: [(&str, Kind); 3] = [
    ("Hot Nodes", Kind::Hot),
    ("Warm Nodes", Kind::Warm),
    ("Cold Nodes", Kind::Cold),
];

pub fn classify(hierarchy: &Hierarchy, id: NodeId) -> Kind {
    match hierarchy.get(id) {
        Some(node) => classify_node(hierarchy, node),
        None => Kind::PlainShard,
    }
}

pub fn classify_node(hierarchy: &Hierarchy, node: &HierarchyNode) -> Kind {
    match node.depth {
        0 => Kind::Root,
        1 => Kind::GroupHeader,
        2 => {
            let group = hierarchy.parent(node.id).map(HierarchyNode::name);
            GROUP_KINDS
                .iter()
                .find(|(name, _)| Some(*name) == group)
                .map_or(Kind::OtherGroup, |(_, kind)| *kind)
        }
        _ => match &node.data {
            NodeData::Shard(shard) if shard.rolling_index.is_some() => Kind::RollingShard,
            _ => Kind::PlainShard,
        },
    }
}

/// Number of members shown in a group header badge; `None` for every other level.
pub fn child_count(hierarchy: &Hierarchy, id: NodeId) -> Option<usize> {
    let node = hierarchy.get(id)?;
    (node.depth == 1).then_some(node.children.len())
}

pub fn badge(hierarchy: &Hierarchy, id: NodeId) -> Option<String> {
    child_count(hierarchy, id).map(|n| format!("({n})"))
}

/// Label font size in px.
pub fn label_font_size(depth: usize) -> f64 {
    if depth >= 3 { 10.0 } else { 12.0 }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Palette {
    colors: [String; 9],
}

impl Default for Palette {
    fn default() -> Self {
        Self {
            colors: [
                "#69b3a2", "#404080", "#ff4136", "#ff851b", "#0074d9", "#b10dc9", "#ffd700",
                "#aaa", "#404080",
            ]
            .map(str::to_string),
        }
    }
}

impl Palette {
    /// Default colors with overrides keyed by kind name (`hot`, `plain-shard`, ...).
    /// Unknown keys are ignored.
    pub fn with_overrides(overrides: &IndexMap<String, String>) -> Self {
        let mut palette = Self::default();
        for (key, color) in overrides {
            match Kind::parse(key) {
                Some(kind) => palette.set(kind, color.clone()),
                None => tracing::warn!(key = %key, "ignoring palette override for unknown kind"),
            }
        }
        palette
    }

    pub fn set(&mut self, kind: Kind, color: String) {
        self.colors[kind.slot()] = color;
    }

    pub fn color(&self, kind: Kind) -> &str {
        &self.colors[kind.slot()]
    }
}
