use indexmap::IndexMap;
use serde_json::json;
use shardmap_core::{ClusterSnapshot, FilterKind, IndexCatalog, RollingIndexDefinitions};

fn snapshot() -> ClusterSnapshot {
    ClusterSnapshot::from_value(json!({
        "name": "Cluster",
        "children": [{
            "name": "Warm Nodes",
            "children": [
                {"name": "w1", "children": [{"name": "metrics-2024"}, {"name": "users"}]},
                {"name": "w2", "children": [{"name": "metrics-2025"}, {"name": "audit-1"}]}
            ]
        }]
    }))
    .unwrap()
}

#[test]
fn definitions_parse_the_indices_and_sizes_tables() {
    let defs = RollingIndexDefinitions::from_json_str(
        r#"{"indices": {"logs": ["logs-1", "logs-2"], "metrics": ["metrics-2024"]},
            "sizes": {"logs": 12.5}}"#,
    )
    .unwrap();
    let patterns: Vec<&str> = defs.patterns().collect();
    assert_eq!(patterns, vec!["logs", "metrics"]);
    assert!(defs.is_member("logs", "logs-2"));
    assert!(!defs.is_member("metrics", "logs-2"));
    assert_eq!(defs.size("logs"), Some(12.5));
    assert_eq!(defs.size("metrics"), None);

    assert!(RollingIndexDefinitions::from_json_str(r#"{"indices": []}"#).is_err());
}

#[test]
fn infer_groups_numeric_suffixes_and_sums_sizes() {
    let mut sizes = IndexMap::new();
    sizes.insert("metrics-2024".to_string(), 10.111);
    sizes.insert("metrics-2025".to_string(), 5.0);
    sizes.insert("users".to_string(), 99.0);
    sizes.insert("events-7".to_string(), 1.0);

    let defs = RollingIndexDefinitions::infer(&snapshot(), &sizes);
    let patterns: Vec<&str> = defs.patterns().collect();
    assert_eq!(patterns, vec!["metrics", "audit", "events"]);
    let members: Vec<&str> = defs
        .members("metrics")
        .unwrap()
        .iter()
        .map(String::as_str)
        .collect();
    assert_eq!(members, vec!["metrics-2024", "metrics-2025"]);
    assert_eq!(defs.size("metrics"), Some(15.11));
    assert_eq!(defs.size("audit"), Some(0.0));
    assert_eq!(defs.size("events"), Some(1.0));
}

#[test]
fn infer_sums_shard_sizes_once_per_index() {
    let s = ClusterSnapshot::from_value(json!({
        "name": "Cluster",
        "children": [{
            "name": "Hot Nodes",
            "children": [
                {"name": "h1", "children": [
                    {"name": "logs-000001", "size": 120.5},
                    {"name": "logs-000002", "size": 80.25}
                ]},
                {"name": "h2", "children": [
                    {"name": "logs-000001", "size": 60},
                    {"name": "users", "size": 7}
                ]}
            ]
        }]
    }))
    .unwrap();

    let defs = RollingIndexDefinitions::infer(&s, &IndexMap::new());
    assert_eq!(defs.patterns().collect::<Vec<_>>(), vec!["logs"]);
    assert_eq!(defs.size("logs"), Some(200.75));

    let mut sizes = IndexMap::new();
    sizes.insert("logs-000002".to_string(), 19.5);
    let defs = RollingIndexDefinitions::infer(&s, &sizes);
    assert_eq!(defs.size("logs"), Some(140.0));
}

#[test]
fn catalog_lists_known_indices_sorted() {
    let catalog = IndexCatalog::from_snapshot(&snapshot(), RollingIndexDefinitions::default());
    assert_eq!(
        catalog.filter_values(FilterKind::Index),
        vec!["all", "audit-1", "metrics-2024", "metrics-2025", "users"]
    );
    assert!(catalog.knows_index("users"));
    assert!(!catalog.knows_index("logs"));
}
