//! Rolling index patterns and the set of known index names.
//!
//! Both tables are read-only for the lifetime of a view and are passed explicitly to the
//! filter, the tooltip builder and the overlay.

use crate::error::{Error, Result};
use crate::filter::FilterKind;
use crate::model::ClusterSnapshot;
use crate::number::{finite_or_zero, round2};
use indexmap::{IndexMap, IndexSet};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// `pattern -> member index names` plus `pattern -> total size (MB)`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RollingIndexDefinitions {
    #[serde(rename = "indices", default)]
    pub members: IndexMap<String, IndexSet<String>>,
    #[serde(default)]
    pub sizes: IndexMap<String, f64>,
}

impl RollingIndexDefinitions {
    pub fn from_json_str(text: &str) -> Result<Self> {
        serde_json::from_str(text).map_err(|e| Error::MalformedDefinitions {
            message: e.to_string(),
        })
    }

    /// Registers `members` under `pattern`, extending any existing member list.
    pub fn insert<I, S>(&mut self, pattern: impl Into<String>, members: I, size: Option<f64>)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let pattern = pattern.into();
        if let Some(size) = size {
            self.sizes.insert(pattern.clone(), size);
        }
        self.members
            .entry(pattern)
            .or_default()
            .extend(members.into_iter().map(Into::into));
    }

    pub fn contains_pattern(&self, pattern: &str) -> bool {
        self.members.contains_key(pattern)
    }

    pub fn members(&self, pattern: &str) -> Option<&IndexSet<String>> {
        self.members.get(pattern)
    }

    pub fn is_member(&self, pattern: &str, index: &str) -> bool {
        self.members
            .get(pattern)
            .is_some_and(|m| m.contains(index))
    }

    pub fn size(&self, pattern: &str) -> Option<f64> {
        self.sizes.get(pattern).copied()
    }

    pub fn patterns(&self) -> impl Iterator<Item = &str> + '_ {
        self.members.keys().map(String::as_str)
    }

    /// Derives definitions from index names: `logs-000001` belongs to pattern `logs`.
    ///
    /// Members come from the snapshot's shards and the keys of `index_sizes` (MB per index).
    /// An index's size is its `index_sizes` entry when present, else the largest `size` among
    /// the snapshot shards carrying its name (one index spans several nodes). Each pattern's
    /// size is the rounded sum over its members.
    pub fn infer(snapshot: &ClusterSnapshot, index_sizes: &IndexMap<String, f64>) -> Self {
        let mut per_index: IndexMap<&str, f64> = IndexMap::new();
        for shard in snapshot.shards() {
            let size = shard.size.map(finite_or_zero).unwrap_or(0.0);
            let entry = per_index.entry(shard.name.as_str()).or_insert(0.0);
            *entry = entry.max(size);
        }
        for (name, size) in index_sizes {
            per_index.insert(name.as_str(), finite_or_zero(*size));
        }

        let mut defs = Self::default();
        for (name, size) in per_index {
            if let Some(pattern) = rolling_pattern(name) {
                defs.members
                    .entry(pattern.to_string())
                    .or_default()
                    .insert(name.to_string());
                *defs.sizes.entry(pattern.to_string()).or_insert(0.0) += size;
            }
        }
        for total in defs.sizes.values_mut() {
            *total = round2(*total);
        }
        tracing::debug!(patterns = defs.members.len(), "inferred rolling index patterns");
        defs
    }
}

/// The rolling pattern an index name belongs to: everything before a numeric last `-` segment.
pub fn rolling_pattern(index: &str) -> Option<&str> {
    let (pattern, suffix) = index.rsplit_once('-')?;
    let numeric = !suffix.is_empty() && suffix.bytes().all(|b| b.is_ascii_digit());
    (numeric && !pattern.is_empty()).then_some(pattern)
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct IndexCatalog {
    pub rolling: RollingIndexDefinitions,
    pub all_indices: BTreeSet<String>,
}

impl IndexCatalog {
    pub fn new(rolling: RollingIndexDefinitions, indices: impl IntoIterator<Item = String>) -> Self {
        Self {
            rolling,
            all_indices: indices.into_iter().collect(),
        }
    }

    /// Collects every shard name in `snapshot` as a known index.
    pub fn from_snapshot(snapshot: &ClusterSnapshot, rolling: RollingIndexDefinitions) -> Self {
        Self::new(rolling, snapshot.shards().map(|s| s.name.clone()))
    }

    pub fn knows_index(&self, index: &str) -> bool {
        self.all_indices.contains(index)
    }

    /// Choices for the filter value menu of `kind`; `all` always comes first.
    pub fn filter_values(&self, kind: FilterKind) -> Vec<String> {
        let mut out = vec!["all".to_string()];
        match kind {
            FilterKind::None => {}
            FilterKind::Rolling => out.extend(self.rolling.patterns().map(str::to_string)),
            FilterKind::Index => out.extend(self.all_indices.iter().cloned()),
        }
        out
    }
}
