use super::fixture;
use crate::utilization::{BAR_WIDTH, Metric, UtilizationBar};
use crate::*;

#[test]
fn member_with_all_metrics_gets_three_stacked_bars() {
    let h = Hierarchy::from_snapshot(&fixture());
    let bars = utilization_bars(&h, NodeId(2));
    let metrics: Vec<Metric> = bars.iter().map(|b| b.metric).collect();
    assert_eq!(metrics, vec![Metric::Cpu, Metric::Memory, Metric::Disk]);
    assert_eq!(bars[0].label, "CPU: 45%");
    assert_eq!(bars[0].color, "#4CAF50");
    assert_eq!(bars[0].fill_width, 0.45 * BAR_WIDTH);
    assert_eq!(bars[0].y, -30.0);
    assert_eq!(bars[1].y, -23.0);
    assert_eq!(bars[2].y, -16.0);
    assert_eq!(bars[2].label, "Disk: 70.25%");
}

#[test]
fn absent_metrics_have_no_bar_and_other_levels_have_none() {
    let h = Hierarchy::from_snapshot(&fixture());
    let bars = utilization_bars(&h, NodeId(6));
    assert_eq!(bars.len(), 1);
    assert_eq!(bars[0].metric, Metric::Cpu);
    assert!(utilization_bars(&h, NodeId(12)).is_empty());
    assert!(utilization_bars(&h, NodeId(1)).is_empty());
    assert!(utilization_bars(&h, NodeId(3)).is_empty());
}

#[test]
fn fraction_is_clamped_and_non_finite_reads_as_zero() {
    assert_eq!(UtilizationBar::new(Metric::Disk, 250.0).fraction, 1.0);
    assert_eq!(UtilizationBar::new(Metric::Disk, -5.0).fraction, 0.0);
    let nan = UtilizationBar::new(Metric::Memory, f64::NAN);
    assert_eq!(nan.fraction, 0.0);
    assert_eq!(nan.label, "Memory: 0%");
}
