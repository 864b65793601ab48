//! Resource bars drawn next to cluster members (depth 2).

use crate::hierarchy::{Hierarchy, NodeId};
use crate::number::{finite_or_zero, fmt_js};
use serde::{Deserialize, Serialize};

pub const BAR_WIDTH: f64 = 60.0;
pub const BAR_HEIGHT: f64 = 5.0;
pub const BAR_GAP: f64 = 2.0;
/// Offset of the bar block from the node center.
pub const BAR_ORIGIN: (f64, f64) = (20.0, -30.0);
pub const LABEL_FONT_SIZE: f64 = 8.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Metric {
    Cpu,
    Memory,
    Disk,
}

impl Metric {
    pub const ALL: [Metric; 3] = [Metric::Cpu, Metric::Memory, Metric::Disk];

    pub fn label(self) -> &'static str {
        match self {
            Metric::Cpu => "CPU",
            Metric::Memory => "Memory",
            Metric::Disk => "Disk",
        }
    }

    pub fn color(self) -> &'static str {
        match self {
            Metric::Cpu => "#4CAF50",
            Metric::Memory => "#2196F3",
            Metric::Disk => "#FFC107",
        }
    }

    fn slot(self) -> usize {
        self as usize
    }
}

/// One bar, in coordinates relative to the owning node's center.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UtilizationBar {
    pub metric: Metric,
    pub color: String,
    /// `value / 100`, clamped to `[0, 1]`.
    pub fraction: f64,
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub fill_width: f64,
    pub height: f64,
    pub label: String,
    pub label_x: f64,
    pub label_y: f64,
}

impl UtilizationBar {
    pub fn new(metric: Metric, value: f64) -> Self {
        let value = finite_or_zero(value);
        let fraction = (value / 100.0).clamp(0.0, 1.0);
        let (ox, oy) = BAR_ORIGIN;
        let y = oy + metric.slot() as f64 * (BAR_HEIGHT + BAR_GAP);
        Self {
            metric,
            color: metric.color().to_string(),
            fraction,
            x: ox,
            y,
            width: BAR_WIDTH,
            fill_width: fraction * BAR_WIDTH,
            height: BAR_HEIGHT,
            label: format!("{}: {}%", metric.label(), fmt_js(value)),
            label_x: ox + BAR_WIDTH + 5.0,
            label_y: y + BAR_HEIGHT,
        }
    }
}

/// Bars for a cluster member; other levels and absent metrics get none.
pub fn utilization_bars(hierarchy: &Hierarchy, id: NodeId) -> Vec<UtilizationBar> {
    let Some(member) = hierarchy
        .get(id)
        .filter(|n| n.depth == 2)
        .and_then(|n| n.data.member())
    else {
        return Vec::new();
    };
    Metric::ALL
        .into_iter()
        .zip([member.cpu_usage, member.memory_usage, member.disk_usage])
        .filter_map(|(metric, value)| value.map(|v| UtilizationBar::new(metric, v)))
        .collect()
}
