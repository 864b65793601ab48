use serde_json::json;
use shardmap_core::{
    ClusterSnapshot, Filter, IndexCatalog, RollingIndexDefinitions, filter_snapshot,
};

fn snapshot() -> ClusterSnapshot {
    ClusterSnapshot::from_value(json!({
        "name": "Cluster",
        "children": [{
            "name": "Hot Nodes",
            "children": [{
                "name": "node-1",
                "children": [{"name": "idx1"}, {"name": "idx2"}]
            }]
        }]
    }))
    .unwrap()
}

fn catalog(s: &ClusterSnapshot) -> IndexCatalog {
    let defs = RollingIndexDefinitions::from_json_str(r#"{"indices": {"pattern-a": ["idx1"]}}"#)
        .unwrap();
    IndexCatalog::from_snapshot(s, defs)
}

fn only_node_shards(s: &ClusterSnapshot) -> Vec<String> {
    assert_eq!(s.children.len(), 1);
    assert_eq!(s.children[0].children.len(), 1);
    let node = &s.children[0].children[0];
    assert_eq!(node.name, "node-1");
    node.children
        .iter()
        .flatten()
        .map(|sh| sh.name.clone())
        .collect()
}

#[test]
fn rolling_pattern_keeps_its_member() {
    let s = snapshot();
    let out = filter_snapshot(&s, &Filter::parse("rolling", "pattern-a").unwrap(), &catalog(&s));
    assert_eq!(only_node_shards(&out.snapshot), vec!["idx1"]);
}

#[test]
fn index_filter_keeps_that_index() {
    let s = snapshot();
    let out = filter_snapshot(&s, &Filter::parse("index", "idx2").unwrap(), &catalog(&s));
    assert_eq!(only_node_shards(&out.snapshot), vec!["idx2"]);
}

#[test]
fn undefined_pattern_yields_empty_children_without_error() {
    let s = snapshot();
    let out = filter_snapshot(&s, &Filter::parse("rolling", "pattern-b").unwrap(), &catalog(&s));
    assert!(out.snapshot.children.is_empty());
    assert!(out.unknown_value.is_some());
}
