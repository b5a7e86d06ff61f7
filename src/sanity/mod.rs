//! Quick consistency check of the map served for one run.
//!
//! The storage collaborator is queried at the start and at the stop of the
//! run; both lookups must return the same, non-placeholder object. The stored
//! keys are then checked for a meaningful first orbit and for gaps beyond the
//! unanchorable threshold, and the map duration is compared with the run
//! duration. Findings are graded `GOOD`, `MEDIUM` or `BAD`; this check never
//! decodes word streams and never reports `FATAL`.

use tracing::{error, info, warn};

use crate::config::QaConfig;
use crate::pipeline::{DeadMapObject, RunTiming};
use crate::qa::{Metric, QaReport, Severity};
use crate::topology::TimeKey;

/// Grades the lookups returned at run start and run stop.
pub fn check_lookup(
    at_start: &DeadMapObject,
    at_stop: &DeadMapObject,
    timing: &RunTiming,
    config: &QaConfig,
) -> QaReport {
    let mut report = QaReport::new();
    if timing.start_ms == 0 || timing.stop_ms == 0 {
        error!("failed to fetch run boundaries");
        report.mark_unavailable(Metric::ObjectLookup, "run boundaries unavailable");
        report.mark_unavailable(Metric::Duration, "run boundaries unavailable");
        return report;
    }

    let keys: Vec<TimeKey> = at_stop.keys().collect();
    let lookup = if at_start.is_default && at_stop.is_default {
        error!("only the default object was found");
        Severity::Bad
    } else if at_start.is_default || at_stop.is_default || !at_start.keys().eq(keys.iter().copied()) {
        error!("run start and stop resolve to different objects");
        Severity::Bad
    } else {
        Severity::Good
    };
    report.record(Metric::ObjectLookup, lookup);

    let (first, last) = match (keys.first(), keys.last()) {
        (Some(&first), Some(&last)) => (first, last),
        _ => {
            error!("the time-evolving map is empty");
            report.record(Metric::EvolvingMap, Severity::Bad);
            return report;
        }
    };
    report.record(Metric::EvolvingMap, Severity::Good);
    if lookup != Severity::Good {
        return report;
    }
    info!(version = %at_stop.version, keys = keys.len(), "map found");

    let large_gaps = keys
        .windows(2)
        .filter(|pair| pair[1].saturating_sub(pair[0]) > config.unanchorable_gap)
        .count();
    let gaps = if (large_gaps > 0 && first > 0) || large_gaps > 1 {
        error!(large_gaps, threshold = config.unanchorable_gap, "orbit gaps above threshold");
        Severity::Bad
    } else {
        Severity::Good
    };
    report.record(Metric::LargeGaps, gaps);

    let mut map_s = config.orbits_to_seconds(last.saturating_sub(first));
    if first < 1 {
        warn!(first_orbit = first, "first orbit stored in the map is not meaningful");
        report.record(Metric::FirstOrbit, Severity::Medium);
        if keys.len() > 2 {
            map_s = config.orbits_to_seconds(last.saturating_sub(keys[1]));
        }
    } else {
        report.record(Metric::FirstOrbit, Severity::Good);
    }

    let run_s = timing.duration_s();
    let duration = config
        .thresholds
        .lookup_duration
        .grade_inclusive((run_s - map_s).abs());
    info!(run_s, map_s, %duration, "run and map duration");
    report.record(Metric::Duration, duration);
    report
}

#[cfg(test)]
mod tests;
