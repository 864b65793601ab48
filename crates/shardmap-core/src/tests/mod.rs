use crate::*;
use serde_json::json;

mod tooltip;
mod utilization;

const GIB: f64 = 1024.0 * 1024.0 * 1024.0;

pub(crate) fn fixture() -> ClusterSnapshot {
    ClusterSnapshot::from_value(json!({
        "name": "Cluster",
        "children": [
            {
                "name": "Hot Nodes",
                "children": [
                    {
                        "name": "es-hot-1",
                        "cpuUsage": 45,
                        "cpuFree": 55,
                        "memoryUsage": 62.5,
                        "memoryTotal": 16.0 * GIB,
                        "diskUsage": 70.25,
                        "diskTotal": 100.0 * GIB,
                        "memoryDetails": {
                            "jvmHeap": 4294967296u64,
                            "fieldDataCache": 1048576,
                            "queryCache": 0,
                            "segmentMemory": 524288,
                            "used": 4295491584u64
                        },
                        "children": [
                            {"name": "logs-000001", "size": 120.5, "rollingIndex": "logs"},
                            {"name": "logs-000002", "size": 80, "rollingIndex": "logs"},
                            {"name": "users", "size": 5}
                        ]
                    },
                    {
                        "name": "es-hot-2",
                        "cpuUsage": 10,
                        "children": [
                            {"name": "logs-000002", "size": 80, "rollingIndex": "logs"}
                        ]
                    }
                ]
            },
            {
                "name": "Warm Nodes",
                "children": [
                    {"name": "es-warm-1", "children": [{"name": "users", "size": 0}]}
                ]
            },
            {
                "name": "Frozen Nodes",
                "children": [{"name": "es-frozen-1"}]
            }
        ]
    }))
    .unwrap()
}

pub(crate) fn fixture_catalog() -> IndexCatalog {
    let mut rolling = RollingIndexDefinitions::default();
    rolling.insert("logs", ["logs-000001", "logs-000002"], Some(200.5));
    IndexCatalog::from_snapshot(&fixture(), rolling)
}

#[test]
fn snapshot_ignores_unknown_fields_and_keeps_absent_metrics_absent() {
    let s = fixture();
    let frozen = &s.children[2].children[0];
    assert_eq!(frozen.cpu_usage, None);
    assert_eq!(frozen.children, None);
    assert_eq!(s.shards().count(), 5);
}

#[test]
fn snapshot_missing_required_fields_is_malformed() {
    let err = ClusterSnapshot::from_value(json!({"children": []})).unwrap_err();
    assert!(matches!(err, Error::MalformedSnapshot { .. }));

    let err = ClusterSnapshot::from_json_str("{\"name\": \"c\", \"children\": [").unwrap_err();
    assert!(matches!(err, Error::MalformedSnapshot { .. }));
}

#[test]
fn snapshot_with_blank_names_is_malformed() {
    let err = ClusterSnapshot::from_value(json!({
        "name": "Cluster",
        "children": [{"name": "Hot Nodes", "children": [{"name": "  "}]}]
    }))
    .unwrap_err();
    match err {
        Error::MalformedSnapshot { message } => {
            assert!(message.contains("children[0].children[0]"), "{message}")
        }
        other => panic!("unexpected error: {other:?}"),
    }
}
