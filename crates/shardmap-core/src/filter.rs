//! Narrowing a snapshot to what the user asked to see.

use crate::catalog::IndexCatalog;
use crate::error::{Error, Result};
use crate::model::{ClusterSnapshot, IndexShard, Node, NodeTypeGroup};
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FilterKind {
    None,
    Rolling,
    Index,
}

impl FilterKind {
    pub fn parse(value: &str) -> Result<Self> {
        match value {
            "none" => Ok(Self::None),
            "rolling" => Ok(Self::Rolling),
            "index" => Ok(Self::Index),
            other => Err(Error::UnknownFilterType {
                value: other.to_string(),
            }),
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::None => "none",
            Self::Rolling => "rolling",
            Self::Index => "index",
        }
    }
}

impl fmt::Display for FilterKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FilterValue {
    All,
    Named(String),
}

impl FilterValue {
    pub fn parse(value: &str) -> Self {
        if value == "all" {
            Self::All
        } else {
            Self::Named(value.to_string())
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            Self::All => "all",
            Self::Named(name) => name,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum Filter {
    /// Hide the shard level entirely.
    #[default]
    None,
    /// Keep shards that belong to a rolling index pattern.
    Rolling(FilterValue),
    /// Keep shards of a single index.
    Index(FilterValue),
}

impl Filter {
    /// Parses the wire form used by the filter controls (`none|rolling|index`, `all|<name>`).
    pub fn parse(filter_type: &str, filter_value: &str) -> Result<Self> {
        let value = FilterValue::parse(filter_value);
        Ok(match FilterKind::parse(filter_type)? {
            FilterKind::None => Self::None,
            FilterKind::Rolling => Self::Rolling(value),
            FilterKind::Index => Self::Index(value),
        })
    }

    pub fn kind(&self) -> FilterKind {
        match self {
            Self::None => FilterKind::None,
            Self::Rolling(_) => FilterKind::Rolling,
            Self::Index(_) => FilterKind::Index,
        }
    }

    pub fn value(&self) -> &str {
        match self {
            Self::None => "all",
            Self::Rolling(v) | Self::Index(v) => v.as_str(),
        }
    }

    /// The concrete rolling pattern, if this filter selects one.
    pub fn rolling_pattern(&self) -> Option<&str> {
        match self {
            Self::Rolling(FilterValue::Named(p)) => Some(p),
            _ => None,
        }
    }

    pub fn available_values(kind: FilterKind, catalog: &IndexCatalog) -> Vec<String> {
        catalog.filter_values(kind)
    }
}

impl fmt::Display for Filter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}={}", self.kind(), self.value())
    }
}

/// A named filter value that the catalog does not know.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UnknownFilterValue {
    pub kind: FilterKind,
    pub value: String,
}

impl fmt::Display for UnknownFilterValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.kind {
            FilterKind::Rolling => write!(f, "no rolling index pattern named `{}`", self.value),
            _ => write!(f, "no index named `{}`", self.value),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct FilteredSnapshot {
    pub snapshot: ClusterSnapshot,
    /// Set when a named filter value was not in the catalog; the snapshot is then empty.
    pub unknown_value: Option<UnknownFilterValue>,
}

impl FilteredSnapshot {
    pub fn is_empty(&self) -> bool {
        self.snapshot.children.is_empty()
    }
}

/// Returns a filtered copy of `snapshot`; the input is never modified.
pub fn filter_snapshot(
    snapshot: &ClusterSnapshot,
    filter: &Filter,
    catalog: &IndexCatalog,
) -> FilteredSnapshot {
    let (snapshot, unknown_value) = match filter {
        Filter::None => (strip_shards(snapshot), None),
        Filter::Rolling(FilterValue::All) | Filter::Index(FilterValue::All) => {
            (snapshot.clone(), None)
        }
        Filter::Rolling(FilterValue::Named(pattern)) => match catalog.rolling.members(pattern) {
            Some(members) => (prune(snapshot, |s| members.contains(&s.name)), None),
            None => unknown(snapshot, FilterKind::Rolling, pattern),
        },
        Filter::Index(FilterValue::Named(index)) => {
            if catalog.knows_index(index) {
                (prune(snapshot, |s| s.name == *index), None)
            } else {
                unknown(snapshot, FilterKind::Index, index)
            }
        }
    };
    tracing::debug!(
        %filter,
        groups = snapshot.children.len(),
        nodes = snapshot.nodes().count(),
        "filtered snapshot"
    );
    FilteredSnapshot {
        snapshot,
        unknown_value,
    }
}

fn unknown(
    snapshot: &ClusterSnapshot,
    kind: FilterKind,
    value: &str,
) -> (ClusterSnapshot, Option<UnknownFilterValue>) {
    let notice = UnknownFilterValue {
        kind,
        value: value.to_string(),
    };
    tracing::warn!(%notice, "filter value not in catalog; showing an empty view");
    (prune(snapshot, |_| false), Some(notice))
}

fn strip_shards(snapshot: &ClusterSnapshot) -> ClusterSnapshot {
    ClusterSnapshot {
        name: snapshot.name.clone(),
        children: snapshot
            .children
            .iter()
            .map(|group| NodeTypeGroup {
                name: group.name.clone(),
                children: group
                    .children
                    .iter()
                    .map(|node| node_with_shards(node, None))
                    .collect(),
            })
            .collect(),
    }
}

/// Keeps matching shards, then drops nodes without shards and groups without nodes.
fn prune(snapshot: &ClusterSnapshot, keep: impl Fn(&IndexShard) -> bool) -> ClusterSnapshot {
    let children = snapshot
        .children
        .iter()
        .filter_map(|group| {
            let nodes: Vec<Node> = group
                .children
                .iter()
                .filter_map(|node| {
                    let shards: Vec<IndexShard> = node
                        .children
                        .iter()
                        .flatten()
                        .filter(|s| keep(s))
                        .cloned()
                        .collect();
                    (!shards.is_empty()).then(|| node_with_shards(node, Some(shards)))
                })
                .collect();
            (!nodes.is_empty()).then(|| NodeTypeGroup {
                name: group.name.clone(),
                children: nodes,
            })
        })
        .collect();
    ClusterSnapshot {
        name: snapshot.name.clone(),
        children,
    }
}

fn node_with_shards(node: &Node, shards: Option<Vec<IndexShard>>) -> Node {
    Node {
        name: node.name.clone(),
        cpu_usage: node.cpu_usage,
        cpu_free: node.cpu_free,
        memory_usage: node.memory_usage,
        memory_total: node.memory_total,
        disk_usage: node.disk_usage,
        disk_total: node.disk_total,
        memory_details: node.memory_details.clone(),
        children: shards,
    }
}
