//! End-to-end quality run over one dead-map object.
//!
//! [`DeadMapQa::run`] drives a small state machine:
//!
//! ```text
//! Init -> Decoding -> Aggregating -> Classifying -> Done
//!   \________\___________\__________-> FatalAbort
//! ```
//!
//! Structural failures (missing or placeholder object, empty evolving map,
//! unknown version tag, malformed word stream) are recorded as `FATAL` and end
//! the run immediately with [`QaOutcome::Aborted`]; the report keeps every
//! check recorded before the failure. Threshold results never abort.

mod input;
mod runner;
mod stage;

pub use input::{DeadMapObject, MapSnapshot, MapWindow, RunTiming};
pub use runner::DeadMapQa;
pub use stage::{QaOutcome, QaProducts, Stage};
