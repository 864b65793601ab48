use serde_json::json;
use shardmap_core::{ClusterSnapshot, IndexCatalog, NodeId, ViewConfig, ViewRequest};
use shardmap_render::Viewer;

fn viewer() -> Viewer {
    let s = ClusterSnapshot::from_value(json!({
        "name": "Cluster",
        "children": [
            {"name": "Hot Nodes", "children": [
                {"name": "h1", "cpuUsage": 42, "children": [{"name": "logs-1", "size": 3}]},
                {"name": "h2", "children": [{"name": "users"}]}
            ]}
        ]
    }))
    .unwrap();
    let catalog = IndexCatalog::from_snapshot(&s, Default::default());
    Viewer::new(s, catalog, ViewConfig::default()).unwrap()
}

#[test]
fn tree_update_produces_one_final_frame() {
    let mut v = viewer();
    assert_eq!(v.generation(), 0);
    let frame = v.update(ViewRequest::default()).unwrap();
    assert_eq!(frame.generation, 1);
    assert!(!frame.running);
    assert!(v.accept_frame(&frame));
    // `none` hides shards: cluster, group, two members.
    assert_eq!(frame.graph.nodes.len(), 4);
    assert!(v.tick().is_none());
}

#[test]
fn frames_from_a_replaced_view_are_rejected() {
    let mut v = viewer();
    let force = v
        .update(ViewRequest::parse("index", "all", "force").unwrap())
        .unwrap();
    let running = v.tick().unwrap();
    assert!(running.running);
    assert!(v.accept_frame(&running));

    let tree = v
        .update(ViewRequest::parse("index", "users", "tree").unwrap())
        .unwrap();
    assert_eq!(tree.generation, 2);
    assert!(!v.accept_frame(&force));
    assert!(!v.accept_frame(&running));
    assert!(v.accept_frame(&tree));
    // The force session was dropped with the old view.
    assert!(v.tick().is_none());
}

#[test]
fn force_view_ticks_until_cool() {
    let mut v = viewer();
    v.update(ViewRequest::parse("none", "all", "force").unwrap())
        .unwrap();
    let mut last = None;
    while let Some(frame) = v.tick() {
        assert!(v.accept_frame(&frame));
        last = Some(frame);
    }
    let last = last.unwrap();
    assert!(!last.running);
    assert!(last.graph.nodes.iter().all(|n| n.x.is_finite() && n.y.is_finite()));
}

#[test]
fn drag_reheats_a_cooled_force_view() {
    let mut v = viewer();
    v.update(ViewRequest::parse("none", "all", "force").unwrap())
        .unwrap();
    while v.tick().is_some() {}
    assert!(v.drag_start(NodeId(2)));
    assert!(v.drag_move(NodeId(2), 5.0, 6.0));
    let frame = v.tick().unwrap();
    let node = frame.graph.node(NodeId(2)).unwrap();
    assert_eq!((node.x, node.y), (5.0, 6.0));
    assert!(v.drag_end(NodeId(2)));
}

#[test]
fn drag_is_ignored_for_tree_views() {
    let mut v = viewer();
    v.update(ViewRequest::default()).unwrap();
    assert!(!v.drag_start(NodeId(1)));
}

#[test]
fn tooltip_reads_from_the_current_hierarchy() {
    let mut v = viewer();
    assert!(v.tooltip(NodeId(0)).is_none());
    v.update(ViewRequest::parse("index", "logs-1", "tree").unwrap())
        .unwrap();
    let t = v.tooltip(NodeId(2)).unwrap();
    assert_eq!(t.to_string(), "h1\nCPU Usage: 42%");
    let shard = v.tooltip(NodeId(3)).unwrap();
    assert_eq!(shard.lines(), ["logs-1", "Size: 3 MB"]);
    assert!(v.tooltip(NodeId(42)).is_none());
}

#[test]
fn unknown_index_sets_the_notice_on_every_frame() {
    let mut v = viewer();
    let frame = v
        .update(ViewRequest::parse("index", "nope", "tree").unwrap())
        .unwrap();
    assert_eq!(frame.notice.unwrap().to_string(), "no index named `nope`");
    assert_eq!(frame.graph.nodes.len(), 1);
}

#[test]
fn cancel_invalidates_outstanding_frames() {
    let mut v = viewer();
    let frame = v.update(ViewRequest::default()).unwrap();
    v.cancel();
    assert!(!v.accept_frame(&frame));
    assert!(v.hierarchy().is_none());
}
