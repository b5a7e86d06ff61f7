use insta::assert_snapshot;

use super::*;

fn classifier() -> Classifier {
    Classifier::new(QaThresholds::default(), 32_000, 330_000)
}

#[test]
fn severities_are_totally_ordered() {
    assert!(Severity::Fatal > Severity::Bad);
    assert!(Severity::Bad > Severity::Medium);
    assert!(Severity::Medium > Severity::Good);
    assert_eq!(Severity::worst([]), Severity::Good);
    assert_eq!(
        Severity::worst([Severity::Medium, Severity::Good, Severity::Bad]),
        Severity::Bad
    );
}

#[test]
fn dead_time_bands() {
    let c = classifier();
    assert_eq!(c.classify(&MetricInput::AvgDeadTimeIb(0.029)), Severity::Good);
    assert_eq!(c.classify(&MetricInput::AvgDeadTimeIb(0.03)), Severity::Medium);
    assert_eq!(c.classify(&MetricInput::AvgDeadTimeIb(0.10)), Severity::Bad);
    assert_eq!(c.classify(&MetricInput::AvgDeadTimeOb(0.04)), Severity::Good);
    assert_eq!(c.classify(&MetricInput::AvgDeadTimeOb(0.07)), Severity::Medium);
    assert_eq!(c.classify(&MetricInput::AvgDeadTimeOb(f64::NAN)), Severity::Bad);
}

#[test]
fn fully_dead_static_counts() {
    let c = classifier();
    let ib = |dead_lanes| c.classify(&MetricInput::FullyDeadIb { dead_lanes });
    assert_eq!(ib(8), Severity::Good);
    assert_eq!(ib(9), Severity::Medium);
    assert_eq!(ib(43), Severity::Medium);
    assert_eq!(ib(44), Severity::Bad);

    let ob = |lanes_with_dead| {
        c.classify(&MetricInput::FullyDeadOb {
            lanes_with_dead,
            total_lanes: 3816,
        })
    };
    assert_eq!(ob(76), Severity::Good);
    assert_eq!(ob(77), Severity::Bad);
}

#[test]
fn orbit_gap_compound_conditions() {
    let c = classifier();
    let gaps = |max_gap, over_nominal, steps| {
        c.classify(&MetricInput::OrbitGaps {
            max_gap,
            over_nominal,
            steps,
        })
    };
    assert_eq!(gaps(100_280, 1, 3), Severity::Bad);
    assert_eq!(gaps(100_280, 1, 100), Severity::Good);
    assert_eq!(gaps(100_280, 3, 100), Severity::Medium);
    assert_eq!(gaps(660_001, 0, 100), Severity::Bad);
    assert_eq!(gaps(32_000, 10, 100), Severity::Good);
}

#[test]
fn orbit_range_tolerances() {
    let c = classifier();
    let range = |map_s| {
        c.classify(&MetricInput::OrbitRange {
            map_s,
            reference_s: 600.0,
        })
    };
    assert_eq!(range(606.0), Severity::Medium);
    assert_eq!(range(605.0), Severity::Good);
    assert_eq!(range(595.0), Severity::Good);
    assert_eq!(range(580.0), Severity::Medium);
    assert_eq!(range(569.0), Severity::Bad);
}

#[test]
fn map_size_structural_cases() {
    let c = classifier();
    let size = |evolving, static_words| {
        c.classify(&MetricInput::MapSize {
            evolving,
            static_words,
        })
    };
    assert_eq!(size(0, 4), Severity::Fatal);
    assert_eq!(size(3, 0), Severity::Bad);
    assert_eq!(size(3, 4), Severity::Good);
}

#[test]
fn classification_is_idempotent() {
    let c = classifier();
    let inputs = [
        MetricInput::UnanchorableFraction(0.03),
        MetricInput::AvgDeadTimeIb(0.2),
        MetricInput::OrbitGaps {
            max_gap: 40_000,
            over_nominal: 3,
            steps: 50,
        },
    ];
    let mut first = QaReport::new();
    let mut second = QaReport::new();
    for input in &inputs {
        c.evaluate(input, &mut first);
    }
    for input in &inputs {
        c.evaluate(input, &mut second);
    }
    assert_eq!(first, second);
    assert_eq!(first.global_verdict(), Severity::Bad);
}

#[test]
fn report_keeps_worst_entry() {
    let mut report = QaReport::new();
    report.record(Metric::ChipInterval, Severity::Good);
    report.record(Metric::ChipInterval, Severity::Fatal);
    report.record(Metric::ChipInterval, Severity::Good);
    assert_eq!(report.severity(Metric::ChipInterval), Some(Severity::Fatal));
    assert!(report.is_fatal());
    assert_eq!(report.len(), 1);
}

#[test]
fn unavailable_metrics_do_not_change_verdict() {
    let mut report = QaReport::new();
    report.record(Metric::OrbitGaps, Severity::Medium);
    report.mark_unavailable(Metric::OrbitRange, "reference timing missing");
    assert_eq!(report.global_verdict(), Severity::Medium);
    assert_eq!(report.severity(Metric::OrbitRange), None);
    assert_eq!(
        report.unavailable_reason(Metric::OrbitRange),
        Some("reference timing missing")
    );
}

#[test]
fn summary_lists_checks_in_metric_order() {
    let mut report = QaReport::new();
    report.record(Metric::AvgDeadTimeOb, Severity::Medium);
    report.record(Metric::ChipInterval, Severity::Good);
    report.record(Metric::MapSize, Severity::Good);
    report.mark_unavailable(Metric::OrbitRange, "reference timing missing");
    assert_snapshot!(report.summary(), @r###"
    QA SUMMARY
    QA CHECK - map_size: GOOD
    QA CHECK - chip_interval: GOOD
    QA CHECK - avg_dead_time_ob: MEDIUM
    QA UNAVAILABLE - orbit_range: reference timing missing
    WARNING - Global quality is MEDIUM
    "###);
}

#[test]
fn report_serializes_with_metric_names() {
    let mut report = QaReport::new();
    report.record(Metric::DefaultObject, Severity::Fatal);
    let json = serde_json::to_string(&report).expect("serializable report");
    assert_eq!(
        json,
        r#"{"checks":{"default_object":"FATAL"},"unavailable":{}}"#
    );
    let back: QaReport = serde_json::from_str(&json).expect("round trip");
    assert_eq!(back, report);
}
