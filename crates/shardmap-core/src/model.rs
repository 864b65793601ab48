//! Cluster snapshot: cluster -> node-type groups -> nodes -> index shards.

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use serde_json::Value;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClusterSnapshot {
    pub name: String,
    pub children: Vec<NodeTypeGroup>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NodeTypeGroup {
    pub name: String,
    pub children: Vec<Node>,
}

/// One cluster member. All metrics are optional; percentages are 0..100, totals are bytes.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Node {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cpu_usage: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cpu_free: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub memory_usage: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub memory_total: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub disk_usage: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub disk_total: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub memory_details: Option<MemoryDetails>,
    /// `None` means the shard level is hidden; `Some(vec![])` means the node holds no shards.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub children: Option<Vec<IndexShard>>,
}

/// Memory breakdown in bytes.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MemoryDetails {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub jvm_heap: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub field_data_cache: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub query_cache: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub segment_memory: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IndexShard {
    pub name: String,
    /// Size in MB.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub size: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rolling_index: Option<String>,
}

impl IndexShard {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            size: None,
            rolling_index: None,
        }
    }
}

impl ClusterSnapshot {
    pub fn from_json_str(text: &str) -> Result<Self> {
        let snapshot: Self = serde_json::from_str(text).map_err(|e| Error::MalformedSnapshot {
            message: e.to_string(),
        })?;
        snapshot.validate()?;
        Ok(snapshot)
    }

    pub fn from_value(value: Value) -> Result<Self> {
        let snapshot: Self = serde_json::from_value(value).map_err(|e| Error::MalformedSnapshot {
            message: e.to_string(),
        })?;
        snapshot.validate()?;
        Ok(snapshot)
    }

    /// Every level must carry a non-blank name; labels and tooltips are keyed on it.
    pub fn validate(&self) -> Result<()> {
        fn check(name: &str, path: impl FnOnce() -> String) -> Result<()> {
            if name.trim().is_empty() {
                return Err(Error::MalformedSnapshot {
                    message: format!("empty name at {}", path()),
                });
            }
            Ok(())
        }

        check(&self.name, || "cluster".to_string())?;
        for (gi, group) in self.children.iter().enumerate() {
            check(&group.name, || format!("children[{gi}]"))?;
            for (ni, node) in group.children.iter().enumerate() {
                check(&node.name, || format!("children[{gi}].children[{ni}]"))?;
                for (si, shard) in node.children.iter().flatten().enumerate() {
                    check(&shard.name, || {
                        format!("children[{gi}].children[{ni}].children[{si}]")
                    })?;
                }
            }
        }
        Ok(())
    }

    pub fn nodes(&self) -> impl Iterator<Item = &Node> + '_ {
        self.children.iter().flat_map(|g| g.children.iter())
    }

    pub fn shards(&self) -> impl Iterator<Item = &IndexShard> + '_ {
        self.nodes().flat_map(|n| n.children.iter().flatten())
    }
}
