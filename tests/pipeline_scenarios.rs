use std::collections::BTreeSet;

use deadmap_qa::aggregate::EvolvingMap;
use deadmap_qa::pipeline::{DeadMapObject, DeadMapQa, MapSnapshot, QaOutcome, RunTiming, Stage};
use deadmap_qa::qa::{Classifier, Metric, MetricInput, QaReport, Severity};
use deadmap_qa::sanity::check_lookup;
use deadmap_qa::topology::{LaneId, Topology};
use deadmap_qa::QaConfig;
use proptest::prelude::*;

fn qa() -> DeadMapQa<'static> {
    DeadMapQa::new(QaConfig::default(), Topology::its()).expect("default config is valid")
}

fn object(version: &str, snapshots: Vec<(u64, Vec<u16>)>) -> DeadMapObject {
    DeadMapObject {
        version: version.to_string(),
        is_default: false,
        static_words: vec![0x8005, 0x0008],
        snapshots: snapshots
            .into_iter()
            .map(|(key, words)| MapSnapshot { key, words })
            .collect(),
    }
}

#[test]
fn placeholder_short_circuits_with_single_entry() {
    let mut placeholder = object("4", vec![(0, vec![0x81B0, 0x01B6])]);
    placeholder.is_default = true;
    let outcome = qa().run(Some(&placeholder), Some(&RunTiming::new(1, 2)));
    assert!(matches!(outcome, QaOutcome::Aborted { stage: Stage::Init, .. }));
    let report = outcome.report();
    assert_eq!(report.global_verdict(), Severity::Fatal);
    assert_eq!(
        report.checks().collect::<Vec<_>>(),
        vec![(Metric::DefaultObject, Severity::Fatal)]
    );
}

#[test]
fn aligned_outer_lane_is_decoded_without_fatal() {
    let outcome = qa().run(
        Some(&object("2", vec![(1_000, vec![0x81B0, 0x01B6]), (2_000, vec![])])),
        None,
    );
    assert_eq!(outcome.report().severity(Metric::ChipInterval), Some(Severity::Good));
    let products = outcome.products().expect("completed");
    let first = products.evolving.snapshot(1_000).expect("snapshot");
    assert_eq!(first.iter().copied().collect::<Vec<_>>(), vec![LaneId(432)]);
    assert_eq!(products.static_elements.len(), 4);
}

#[test]
fn misaligned_outer_lane_is_fatal() {
    let outcome = qa().run(
        Some(&object("3", vec![(1_000, vec![0x81B1, 0x01B6])])),
        None,
    );
    assert_eq!(outcome.verdict(), Severity::Fatal);
    assert_eq!(outcome.report().severity(Metric::ChipInterval), Some(Severity::Fatal));
    assert!(outcome.products().is_none());
}

#[test]
fn gap_scenario_through_the_pipeline() {
    let outcome = qa().run(
        Some(&object("4", vec![(0, vec![]), (100, vec![]), (100_380, vec![])])),
        None,
    );
    let gaps = &outcome.products().expect("completed").aggregates.gaps;
    assert_eq!(gaps.max_gap, 100_280);
    assert_eq!(gaps.over_nominal, 1);
}

#[test]
fn report_serializes_for_reporting_collaborators() {
    let outcome = qa().run(Some(&object("4", vec![(0, vec![]), (11_245, vec![])])), None);
    let json = serde_json::to_value(outcome.report()).expect("report serializes");
    assert_eq!(json["checks"]["chip_interval"], "GOOD");
    assert_eq!(
        json["unavailable"]["orbit_range"],
        "reference run timing unavailable"
    );
    let back: QaReport = serde_json::from_value(json).expect("report deserializes");
    assert_eq!(&back, outcome.report());
}

#[test]
fn lookup_check_accepts_identical_objects() {
    let map = object("4", (0..10).map(|step| (1 + step * 112_450, vec![])).collect());
    let timing = RunTiming::new(10_000, 10_000 + 90_000);
    let report = check_lookup(&map, &map, &timing, &QaConfig::default());
    assert_eq!(report.global_verdict(), Severity::Good);
}

#[test]
fn evolving_map_keeps_key_order() {
    let map: EvolvingMap = [(30u64, BTreeSet::new()), (10, BTreeSet::from([LaneId(2)]))]
        .into_iter()
        .collect();
    assert_eq!(map.keys().collect::<Vec<_>>(), vec![10, 30]);
}

fn arb_input() -> impl Strategy<Value = MetricInput> {
    prop_oneof![
        (0usize..5, 0usize..5).prop_map(|(evolving, static_words)| MetricInput::MapSize { evolving, static_words }),
        (0usize..100).prop_map(|dead_lanes| MetricInput::FullyDeadIb { dead_lanes }),
        (0usize..500).prop_map(|lanes_with_dead| MetricInput::FullyDeadOb { lanes_with_dead, total_lanes: 3816 }),
        (0u64..1_000_000, 0usize..50, 1usize..100).prop_map(|(max_gap, over_nominal, steps)| {
            MetricInput::OrbitGaps { max_gap, over_nominal, steps }
        }),
        (0.0f64..0.2).prop_map(MetricInput::UnanchorableFraction),
        (0.0f64..0.2).prop_map(MetricInput::AvgDeadTimeIb),
        (0.0f64..0.2).prop_map(MetricInput::AvgDeadTimeOb),
        (0.0f64..100.0, 0.0f64..100.0).prop_map(|(map_s, reference_s)| MetricInput::OrbitRange { map_s, reference_s }),
    ]
}

proptest! {
    #[test]
    fn classification_is_idempotent(inputs in prop::collection::vec(arb_input(), 1..16)) {
        let classifier: Classifier = QaConfig::default().classifier();
        let mut first = QaReport::new();
        let mut second = QaReport::new();
        for input in &inputs {
            let severity = classifier.evaluate(input, &mut first);
            prop_assert_eq!(severity, classifier.classify(input));
        }
        for input in &inputs {
            classifier.evaluate(input, &mut second);
        }
        prop_assert_eq!(&first, &second);
        let worst = first.checks().map(|(_, severity)| severity).max().unwrap_or(Severity::Good);
        prop_assert_eq!(first.global_verdict(), worst);
    }
}
