use super::*;
use crate::pipeline::MapSnapshot;

fn object(keys: &[u64]) -> DeadMapObject {
    DeadMapObject {
        version: "4".into(),
        is_default: false,
        static_words: vec![1],
        snapshots: keys
            .iter()
            .map(|&key| MapSnapshot {
                key,
                words: Vec::new(),
            })
            .collect(),
    }
}

fn placeholder() -> DeadMapObject {
    DeadMapObject {
        version: "4".into(),
        is_default: true,
        ..DeadMapObject::default()
    }
}

fn run(seconds: f64) -> RunTiming {
    RunTiming::new(1_000, 1_000 + (seconds * 1000.0) as i64)
}

fn check(start: &DeadMapObject, stop: &DeadMapObject, timing: &RunTiming) -> QaReport {
    check_lookup(start, stop, timing, &QaConfig::default())
}

/// 112450 orbits per step is just under ten seconds.
fn keys(first: u64, steps: u64) -> Vec<u64> {
    (0..=steps).map(|step| first + step * 112_450).collect()
}

#[test]
fn consistent_lookup_is_good() {
    let map = object(&keys(1_000, 10));
    let report = check(&map, &map, &run(100.0));
    assert_eq!(report.global_verdict(), Severity::Good);
    for metric in [
        Metric::ObjectLookup,
        Metric::EvolvingMap,
        Metric::LargeGaps,
        Metric::FirstOrbit,
        Metric::Duration,
    ] {
        assert_eq!(report.severity(metric), Some(Severity::Good), "{metric}");
    }
}

#[test]
fn default_or_mismatching_lookups_are_bad() {
    let map = object(&keys(1_000, 10));
    let report = check(&placeholder(), &placeholder(), &run(100.0));
    assert_eq!(report.severity(Metric::ObjectLookup), Some(Severity::Bad));
    assert_eq!(report.severity(Metric::EvolvingMap), Some(Severity::Bad));

    let report = check(&placeholder(), &map, &run(100.0));
    assert_eq!(report.severity(Metric::ObjectLookup), Some(Severity::Bad));
    assert_eq!(report.severity(Metric::Duration), None);

    let other = object(&keys(2_000, 10));
    let report = check(&other, &map, &run(100.0));
    assert_eq!(report.severity(Metric::ObjectLookup), Some(Severity::Bad));
}

#[test]
fn single_large_gap_is_tolerated_only_after_zero_first_orbit() {
    let gapped = object(&[0, 400_000, 512_450]);
    let report = check(&gapped, &gapped, &run(10.0));
    assert_eq!(report.severity(Metric::LargeGaps), Some(Severity::Good));
    assert_eq!(report.severity(Metric::FirstOrbit), Some(Severity::Medium));
    // duration measured from the second key
    assert_eq!(report.severity(Metric::Duration), Some(Severity::Good));

    let gapped = object(&[10, 400_010]);
    let report = check(&gapped, &gapped, &run(35.6));
    assert_eq!(report.severity(Metric::LargeGaps), Some(Severity::Bad));

    let twice = object(&[0, 400_000, 800_000]);
    let report = check(&twice, &twice, &run(35.6));
    assert_eq!(report.severity(Metric::LargeGaps), Some(Severity::Bad));
}

#[test]
fn duration_mismatch_is_graded() {
    let map = object(&keys(1_000, 10));
    // map spans about 100 s
    assert_eq!(
        check(&map, &map, &run(130.0)).severity(Metric::Duration),
        Some(Severity::Medium)
    );
    assert_eq!(
        check(&map, &map, &run(200.0)).severity(Metric::Duration),
        Some(Severity::Bad)
    );
}

#[test]
fn missing_run_boundaries_skip_the_check() {
    let map = object(&keys(1_000, 10));
    let report = check(&map, &map, &RunTiming::new(0, 5_000));
    assert!(report.is_empty());
    assert!(report.unavailable_reason(Metric::Duration).is_some());
    assert!(report.unavailable_reason(Metric::ObjectLookup).is_some());
}
