use crate::catalog::IndexCatalog;
use crate::hierarchy::{Hierarchy, HierarchyNode, NodeData, NodeId};
use crate::model::MemoryDetails;
use crate::number::{fmt_fixed2, fmt_js};
use serde::{Deserialize, Serialize};
use std::fmt;

const GIB: f64 = 1024.0 * 1024.0 * 1024.0;
const MIB: f64 = 1024.0 * 1024.0;

/// Ordered tooltip lines for one node.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TooltipContent {
    pub lines: Vec<String>,
}

impl TooltipContent {
    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    /// The markup a hover card renders: every line terminated by `<br/>`.
    pub fn to_html(&self) -> String {
        let mut out = String::new();
        for line in &self.lines {
            out.push_str(line);
            out.push_str("<br/>");
        }
        out
    }
}

impl fmt::Display for TooltipContent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.lines.join("\n"))
    }
}

pub fn build_tooltip(hierarchy: &Hierarchy, id: NodeId, catalog: &IndexCatalog) -> TooltipContent {
    match hierarchy.get(id) {
        Some(node) => build_node_tooltip(node, catalog),
        None => TooltipContent::default(),
    }
}

pub fn build_node_tooltip(node: &HierarchyNode, catalog: &IndexCatalog) -> TooltipContent {
    let mut lines = vec![node.name().to_string()];

    if node.depth == 1 {
        lines.push(format!("Total Nodes: {}", node.children.len()));
    }

    match &node.data {
        NodeData::Member(m) => {
            let percent = [
                ("CPU Usage", m.cpu_usage),
                ("CPU Free", m.cpu_free),
                ("Memory Usage", m.memory_usage),
            ];
            for (label, value) in percent {
                if let Some(v) = value {
                    lines.push(format!("{label}: {}%", fmt_js(v)));
                }
            }
            if let Some(v) = m.memory_total {
                lines.push(format!("Memory Total: {} GB", fmt_fixed2(v / GIB)));
            }
            if let Some(v) = m.disk_usage {
                lines.push(format!("Disk Usage: {}%", fmt_js(v)));
            }
            if let Some(v) = m.disk_total {
                lines.push(format!("Disk Total: {} GB", fmt_fixed2(v / GIB)));
            }
            if let Some(details) = &m.memory_details {
                push_memory_details(&mut lines, details);
            }
        }
        NodeData::Shard(shard) => {
            // A zero size reads as "unknown" and is left out.
            if let Some(size) = shard.size.filter(|s| *s != 0.0) {
                lines.push(format!("Size: {} MB", fmt_js(size)));
            }
            if let Some(pattern) = shard.rolling_index.as_deref() {
                lines.push(format!("Rolling Index: {pattern}"));
                if let Some(total) = catalog.rolling.size(pattern) {
                    lines.push(format!("Total Size: {} MB", fmt_js(total)));
                }
            }
        }
        NodeData::Cluster { .. } | NodeData::Group { .. } => {}
    }

    TooltipContent { lines }
}

fn push_memory_details(lines: &mut Vec<String>, details: &MemoryDetails) {
    let rows = [
        ("JVM Heap", details.jvm_heap),
        ("Field Data Cache", details.field_data_cache),
        ("Query Cache", details.query_cache),
        ("Segment Memory", details.segment_memory),
    ];
    for (label, bytes) in rows {
        if let Some(b) = bytes {
            lines.push(format!("{label}: {} MB", fmt_fixed2(b / MIB)));
        }
    }
}
