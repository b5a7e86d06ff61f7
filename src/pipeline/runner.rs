use std::collections::BTreeSet;

use tracing::{debug, error, info, warn};

use super::input::{DeadMapObject, MapWindow, RunTiming};
use super::stage::{QaOutcome, QaProducts, Stage};
use crate::aggregate::{AggregateError, Aggregates, Aggregator, EvolvingMap};
use crate::codec::{IntervalDecoder, MapVersion};
use crate::config::{ConfigError, QaConfig};
use crate::qa::{Classifier, Metric, MetricInput, QaReport, Severity};
use crate::topology::{ElementId, Topology};

/// Runs the decode, aggregate and classify stages over one object.
#[derive(Debug, Clone)]
pub struct DeadMapQa<'t> {
    config: QaConfig,
    classifier: Classifier,
    topology: &'t Topology,
}

impl<'t> DeadMapQa<'t> {
    /// Validates `config` and binds it to `topology`.
    pub fn new(config: QaConfig, topology: &'t Topology) -> Result<Self, ConfigError> {
        config.validate()?;
        let classifier = config.classifier();
        Ok(Self {
            config,
            classifier,
            topology,
        })
    }

    pub fn config(&self) -> &QaConfig {
        &self.config
    }

    /// Evaluates `object`; `timing` feeds the orbit-range check only.
    pub fn run(&self, object: Option<&DeadMapObject>, timing: Option<&RunTiming>) -> QaOutcome {
        let mut machine = Machine::new();

        let Some(object) = object else {
            error!("no dead-map object to check");
            machine.report.record(Metric::ObjectPresent, Severity::Fatal);
            return machine.abort();
        };
        info!(
            version = %object.version,
            is_default = object.is_default,
            evolving = object.evolving_len(),
            static_words = object.static_words.len(),
            "reading map info"
        );
        if object.is_default {
            error!("default object, nothing to check");
            machine.report.record(Metric::DefaultObject, Severity::Fatal);
            return machine.abort();
        }
        let size = MetricInput::MapSize {
            evolving: object.evolving_len(),
            static_words: object.static_words.len(),
        };
        if self.classifier.evaluate(&size, &mut machine.report) == Severity::Fatal {
            error!("evolving map is empty");
            return machine.abort();
        }

        machine.advance(Stage::Decoding);
        let Some((version, static_elements, evolving)) = self.decode(object, &mut machine.report)
        else {
            return machine.abort();
        };

        machine.advance(Stage::Aggregating);
        let aggregator = Aggregator::new(self.topology, &self.config);
        let aggregates = match aggregator.run(&static_elements, &evolving) {
            Ok(aggregates) => aggregates,
            Err(err) => {
                error!(%err, "aggregation failed");
                let metric = match err {
                    AggregateError::EmptyMap => Metric::MapSize,
                    _ => Metric::ChipInterval,
                };
                machine.report.record(metric, Severity::Fatal);
                return machine.abort();
            }
        };

        machine.advance(Stage::Classifying);
        self.classify(&aggregates, &mut machine.report);
        let map_window = match timing {
            Some(timing) => self.orbit_range(&aggregates, timing, &mut machine.report),
            None => {
                error!("reference run timing unavailable, orbit range not checked");
                machine
                    .report
                    .mark_unavailable(Metric::OrbitRange, "reference run timing unavailable");
                None
            }
        };

        machine.advance(Stage::Done);
        info!(verdict = %machine.report.global_verdict(), "quality run finished");
        QaOutcome::Completed(Box::new(QaProducts {
            report: machine.report,
            version,
            static_elements,
            evolving,
            aggregates,
            map_window,
        }))
    }

    /// Decodes the static stream at chip level and every snapshot at lane
    /// level. The first failure is recorded and nothing decoded is returned.
    fn decode(
        &self,
        object: &DeadMapObject,
        report: &mut QaReport,
    ) -> Option<(MapVersion, BTreeSet<ElementId>, EvolvingMap)> {
        report.record(Metric::ChipInterval, Severity::Good);
        let decoder = match IntervalDecoder::new(self.topology, &object.version) {
            Ok(decoder) => decoder,
            Err(err) => {
                error!(%err, "cannot decode map");
                report.record(Metric::MapVersion, Severity::Fatal);
                return None;
            }
        };

        let static_elements = match decoder.decode_elements(&object.static_words) {
            Ok(elements) => elements,
            Err(err) => {
                error!(%err, failure = ?err.failure(), "static map rejected");
                report.record(Metric::ChipInterval, Severity::Fatal);
                return None;
            }
        };
        debug!(chips = static_elements.len(), "static map imported");

        let mut evolving = EvolvingMap::new();
        for snapshot in &object.snapshots {
            match decoder.decode_lanes(&snapshot.words) {
                Ok(lanes) => evolving.insert(snapshot.key, lanes),
                Err(err) => {
                    error!(%err, key = snapshot.key, failure = ?err.failure(), "snapshot rejected");
                    report.record(Metric::ChipInterval, Severity::Fatal);
                    return None;
                }
            }
        }
        if evolving.len() != object.evolving_len() {
            warn!(
                stored = object.evolving_len(),
                distinct = evolving.len(),
                "repeated snapshot keys, keeping the last of each"
            );
        }
        debug!(snapshots = evolving.len(), "evolving map imported");
        Some((decoder.version(), static_elements, evolving))
    }

    fn classify(&self, aggregates: &Aggregates, report: &mut QaReport) {
        let static_map = &aggregates.static_map;
        let gaps = &aggregates.gaps;
        info!(
            inner = static_map.inner_lanes_with_dead,
            outer = static_map.outer_lanes_with_dead,
            "static map lanes with dead chips"
        );
        let inputs = [
            MetricInput::FullyDeadIb {
                dead_lanes: static_map.inner_lanes_with_dead,
            },
            MetricInput::FullyDeadOb {
                lanes_with_dead: static_map.outer_lanes_with_dead,
                total_lanes: self.topology.n_lanes(),
            },
            MetricInput::OrbitGaps {
                max_gap: gaps.max_gap,
                over_nominal: gaps.over_nominal,
                steps: aggregates.steps,
            },
            MetricInput::UnanchorableFraction(gaps.unanchorable_fraction),
            MetricInput::AvgDeadTimeIb(aggregates.dead_time.inner_average),
            MetricInput::AvgDeadTimeOb(aggregates.dead_time.outer_average),
        ];
        for input in &inputs {
            let severity = self.classifier.evaluate(input, report);
            debug!(metric = %input.metric(), %severity, "classified");
        }
    }

    fn orbit_range(
        &self,
        aggregates: &Aggregates,
        timing: &RunTiming,
        report: &mut QaReport,
    ) -> Option<MapWindow> {
        if !timing.is_available() {
            error!("failed to fetch reference run boundaries");
            report.mark_unavailable(Metric::OrbitRange, "reference run boundaries are zero");
            return None;
        }
        let reference_s = timing.duration_s();
        info!(
            run_s = reference_s,
            map_s = aggregates.span_s,
            difference_s = reference_s - aggregates.span_s,
            "comparing orbit range and run duration"
        );
        self.classifier.evaluate(
            &MetricInput::OrbitRange {
                map_s: aggregates.span_s,
                reference_s,
            },
            report,
        );

        let orbit_ns = self.config.orbit_ns;
        let start_ms = timing.orbit_to_ms(aggregates.first_key, orbit_ns)?;
        let stop_ms = timing.orbit_to_ms(aggregates.last_key, orbit_ns)?;
        debug!(start_ms, stop_ms, "map boundaries on the run clock");
        Some(MapWindow { start_ms, stop_ms })
    }
}

/// Stage bookkeeping for one run.
#[derive(Debug)]
struct Machine {
    stage: Stage,
    report: QaReport,
}

impl Machine {
    fn new() -> Self {
        Self {
            stage: Stage::Init,
            report: QaReport::new(),
        }
    }

    fn advance(&mut self, next: Stage) {
        debug_assert!(self.stage.can_advance_to(next), "{} -> {next}", self.stage);
        debug!(from = %self.stage, to = %next, "stage transition");
        self.stage = next;
    }

    fn abort(mut self) -> QaOutcome {
        let stage = self.stage;
        self.advance(Stage::FatalAbort);
        error!(%stage, "run aborted");
        QaOutcome::Aborted {
            stage,
            report: self.report,
        }
    }
}
