use core::fmt;
use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use super::input::MapWindow;
use crate::aggregate::{Aggregates, EvolvingMap};
use crate::codec::MapVersion;
use crate::qa::{QaReport, Severity};
use crate::topology::ElementId;

/// Position of a run in the quality state machine.
///
/// `Init → Decoding → Aggregating → Classifying → Done`, with `FatalAbort`
/// reachable from the first three and terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Stage {
    Init,
    Decoding,
    Aggregating,
    Classifying,
    Done,
    FatalAbort,
}

impl Stage {
    pub fn can_advance_to(self, next: Stage) -> bool {
        matches!(
            (self, next),
            (Stage::Init, Stage::Decoding)
                | (Stage::Decoding, Stage::Aggregating)
                | (Stage::Aggregating, Stage::Classifying)
                | (Stage::Classifying, Stage::Done)
                | (Stage::Init | Stage::Decoding | Stage::Aggregating, Stage::FatalAbort)
        )
    }

    pub fn is_terminal(self) -> bool {
        matches!(self, Stage::Done | Stage::FatalAbort)
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Stage::Init => "init",
            Stage::Decoding => "decoding",
            Stage::Aggregating => "aggregating",
            Stage::Classifying => "classifying",
            Stage::Done => "done",
            Stage::FatalAbort => "fatal-abort",
        };
        f.write_str(name)
    }
}

/// Decoded inputs and derived series of a completed run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QaProducts {
    pub report: QaReport,
    pub version: MapVersion,
    pub static_elements: BTreeSet<ElementId>,
    pub evolving: EvolvingMap,
    pub aggregates: Aggregates,
    /// Map boundaries on the run clock, when the orbit reset time is known.
    pub map_window: Option<MapWindow>,
}

/// Terminal result of one run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum QaOutcome {
    /// Every stage ran; the report holds all classified metrics.
    Completed(Box<QaProducts>),
    /// A structural failure stopped the run in `stage`; the report holds the
    /// checks recorded up to that point.
    Aborted { stage: Stage, report: QaReport },
}

impl QaOutcome {
    pub fn report(&self) -> &QaReport {
        match self {
            QaOutcome::Completed(products) => &products.report,
            QaOutcome::Aborted { report, .. } => report,
        }
    }

    pub fn into_report(self) -> QaReport {
        match self {
            QaOutcome::Completed(products) => products.report,
            QaOutcome::Aborted { report, .. } => report,
        }
    }

    pub fn verdict(&self) -> Severity {
        self.report().global_verdict()
    }

    pub fn products(&self) -> Option<&QaProducts> {
        match self {
            QaOutcome::Completed(products) => Some(products),
            QaOutcome::Aborted { .. } => None,
        }
    }

    pub fn is_aborted(&self) -> bool {
        matches!(self, QaOutcome::Aborted { .. })
    }

    /// Final state of the machine.
    pub fn stage(&self) -> Stage {
        match self {
            QaOutcome::Completed(_) => Stage::Done,
            QaOutcome::Aborted { .. } => Stage::FatalAbort,
        }
    }
}
