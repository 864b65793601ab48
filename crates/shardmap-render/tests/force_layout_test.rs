use serde_json::json;
use shardmap_core::{ClusterSnapshot, Hierarchy, NodeId, ViewConfig};
use shardmap_render::model::EdgeCurve;
use shardmap_render::{Error, ForceLayoutEngine};

fn hierarchy() -> Hierarchy {
    let s = ClusterSnapshot::from_value(json!({
        "name": "Cluster",
        "children": [
            {"name": "Hot Nodes", "children": [
                {"name": "h1", "children": [{"name": "x"}, {"name": "y"}]},
                {"name": "h2", "children": [{"name": "x"}]}
            ]},
            {"name": "Cold Nodes", "children": [{"name": "c1"}]}
        ]
    }))
    .unwrap();
    Hierarchy::from_snapshot(&s)
}

#[test]
fn session_cools_down_and_then_stops_producing_frames() {
    let h = hierarchy();
    let mut session = ForceLayoutEngine::start(&h, &ViewConfig::default()).unwrap();
    let mut prev_alpha = session.alpha();
    let mut frames = 0usize;
    while let Some(frame) = session.step() {
        frames += 1;
        assert!(session.alpha() < prev_alpha);
        prev_alpha = session.alpha();
        for n in &frame.nodes {
            assert!(n.x.is_finite() && n.y.is_finite(), "{}: ({}, {})", n.name, n.x, n.y);
        }
        assert!(frames <= 400, "did not converge");
    }
    assert!((290..=310).contains(&frames), "frames: {frames}");
    assert!(!session.is_running());
    assert!(session.step().is_none());
}

#[test]
fn converged_layout_is_centered_in_the_viewport() {
    let h = hierarchy();
    let g = ForceLayoutEngine::start(&h, &ViewConfig::default())
        .unwrap()
        .run_to_convergence();
    let n = g.nodes.len() as f64;
    let cx = g.nodes.iter().map(|p| p.x).sum::<f64>() / n;
    let cy = g.nodes.iter().map(|p| p.y).sum::<f64>() / n;
    assert!((cx - 900.0).abs() < 1.0, "cx: {cx}");
    assert!((cy - 450.0).abs() < 1.0, "cy: {cy}");
    assert!(g.edges.iter().all(|e| e.curve == EdgeCurve::Line));
    assert_eq!(g.edges.len(), h.len() - 1);
}

#[test]
fn same_config_gives_identical_frames() {
    let h = hierarchy();
    let a = ForceLayoutEngine::start(&h, &ViewConfig::default())
        .unwrap()
        .run_to_convergence();
    let b = ForceLayoutEngine::start(&h, &ViewConfig::default())
        .unwrap()
        .run_to_convergence();
    assert_eq!(a, b);
}

#[test]
fn dragged_node_stays_pinned_by_default() {
    let h = hierarchy();
    let mut session = ForceLayoutEngine::start(&h, &ViewConfig::default()).unwrap();
    session.run_to_convergence();

    let leaf = NodeId(3);
    assert!(session.drag_start(leaf));
    assert!(session.is_running());
    assert!(session.drag_move(leaf, 100.0, 120.0));
    let frame = session.step().unwrap();
    let node = frame.node(leaf).unwrap();
    assert!(node.pinned);
    assert_eq!((node.x, node.y), (100.0, 120.0));

    assert!(session.drag_end(leaf));
    let frame = session.run_to_convergence();
    let node = frame.node(leaf).unwrap();
    assert!(node.pinned);
    assert_eq!((node.x, node.y), (100.0, 120.0));
}

#[test]
fn release_policy_unpins_after_the_drag() {
    let h = hierarchy();
    let cfg = ViewConfig::from_value(&json!({"force": {"dragRelease": "release"}})).unwrap();
    let mut session = ForceLayoutEngine::start(&h, &cfg).unwrap();
    session.drag_start(NodeId(2));
    session.drag_move(NodeId(2), 0.0, 0.0);
    session.step();
    session.drag_end(NodeId(2));
    let frame = session.step().unwrap();
    assert!(!frame.node(NodeId(2)).unwrap().pinned);
    assert!(!session.drag_start(NodeId(99)));
}

#[test]
fn invalid_options_are_rejected_before_the_first_step() {
    let h = hierarchy();
    let mut cfg = ViewConfig::default();
    cfg.force.velocity_decay = f64::NAN;
    assert!(matches!(
        ForceLayoutEngine::start(&h, &cfg),
        Err(Error::Layout(narwhal::Error::InvalidOption { .. }))
    ));

    let mut cfg = ViewConfig::default();
    cfg.force.charge_strength = -30.0;
    assert!(matches!(
        ForceLayoutEngine::start(&h, &cfg),
        Err(Error::Model(shardmap_core::Error::InvalidConfig { .. }))
    ));
}

#[test]
fn stop_cancels_the_session() {
    let h = hierarchy();
    let mut session = ForceLayoutEngine::start(&h, &ViewConfig::default()).unwrap();
    assert!(session.step().is_some());
    session.stop();
    assert!(session.step().is_none());
}
