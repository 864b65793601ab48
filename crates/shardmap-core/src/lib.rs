#![forbid(unsafe_code)]

//! Cluster topology model for shardmap (headless).
//!
//! A [`ClusterSnapshot`] (cluster -> node-type groups -> nodes -> index shards) is narrowed by
//! a [`Filter`], turned into an arena [`Hierarchy`], and decorated with kinds, colors,
//! utilization bars and tooltip text. Layout lives in `shardmap-render`.

pub mod catalog;
pub mod classify;
pub mod config;
pub mod error;
pub mod filter;
pub mod hierarchy;
pub mod model;
pub mod number;
pub mod request;
pub mod tooltip;
pub mod utilization;

pub use catalog::{IndexCatalog, RollingIndexDefinitions, rolling_pattern};
pub use classify::{GROUP_KINDS, Kind, Palette, child_count, classify};
pub use config::{DragReleasePolicy, ForceConfig, Margin, OverlayConfig, ViewConfig};
pub use error::{Error, Result};
pub use filter::{
    Filter, FilterKind, FilterValue, FilteredSnapshot, UnknownFilterValue, filter_snapshot,
};
pub use hierarchy::{Hierarchy, HierarchyNode, NodeData, NodeId};
pub use model::{ClusterSnapshot, IndexShard, MemoryDetails, Node, NodeTypeGroup};
pub use number::finite_or_zero;
pub use request::{LayoutKind, ViewRequest};
pub use tooltip::{TooltipContent, build_tooltip};
pub use utilization::{Metric, UtilizationBar, utilization_bars};

#[cfg(test)]
mod tests;
