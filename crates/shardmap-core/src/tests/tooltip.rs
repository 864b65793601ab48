use super::{fixture, fixture_catalog};
use crate::*;
use serde_json::json;

fn tooltip_lines(id: usize) -> Vec<String> {
    let h = Hierarchy::from_snapshot(&fixture());
    build_tooltip(&h, NodeId(id), &fixture_catalog()).lines
}

#[test]
fn member_tooltip_lists_metrics_in_order() {
    assert_eq!(
        tooltip_lines(2),
        vec![
            "es-hot-1",
            "CPU Usage: 45%",
            "CPU Free: 55%",
            "Memory Usage: 62.5%",
            "Memory Total: 16.00 GB",
            "Disk Usage: 70.25%",
            "Disk Total: 100.00 GB",
            "JVM Heap: 4096.00 MB",
            "Field Data Cache: 1.00 MB",
            "Query Cache: 0.00 MB",
            "Segment Memory: 0.50 MB",
        ]
    );
}

#[test]
fn rolling_shard_tooltip_includes_pattern_total() {
    assert_eq!(
        tooltip_lines(3),
        vec![
            "logs-000001",
            "Size: 120.5 MB",
            "Rolling Index: logs",
            "Total Size: 200.5 MB",
        ]
    );
}

#[test]
fn zero_size_and_unknown_totals_are_left_out() {
    assert_eq!(tooltip_lines(10), vec!["users"]);

    let h = Hierarchy::from_snapshot(&fixture());
    let bare_catalog = IndexCatalog::default();
    let lines = build_tooltip(&h, NodeId(3), &bare_catalog).lines;
    assert_eq!(lines, vec!["logs-000001", "Size: 120.5 MB", "Rolling Index: logs"]);
}

#[test]
fn group_tooltip_counts_members() {
    assert_eq!(tooltip_lines(1), vec!["Hot Nodes", "Total Nodes: 2"]);
    assert_eq!(tooltip_lines(0), vec!["Cluster"]);
}

#[test]
fn cpu_without_memory_has_no_memory_lines() {
    let s = ClusterSnapshot::from_value(json!({
        "name": "c",
        "children": [{"name": "Hot Nodes", "children": [{"name": "n", "cpuUsage": 42}]}]
    }))
    .unwrap();
    let h = Hierarchy::from_snapshot(&s);
    let content = build_tooltip(&h, NodeId(2), &IndexCatalog::default());
    assert!(content.lines().iter().any(|l| l == "CPU Usage: 42%"));
    assert!(!content.lines().iter().any(|l| l.contains("Memory")));
}

#[test]
fn tooltip_renders_as_text_or_html() {
    let content = TooltipContent {
        lines: vec!["a".to_string(), "b".to_string()],
    };
    assert_eq!(content.to_string(), "a\nb");
    assert_eq!(content.to_html(), "a<br/>b<br/>");
    let h = Hierarchy::from_snapshot(&fixture());
    assert!(build_tooltip(&h, NodeId(99), &fixture_catalog()).lines.is_empty());
}
