//! Quality assessment of time-resolved dead-channel maps.
//!
//! A dead-channel map object carries a static set of permanently dead chips
//! and an evolving map: snapshots of the dead readout lanes keyed by orbit
//! counter. This crate decodes the interval-encoded word streams of such an
//! object, aggregates the snapshots into gap, dead-time and dead-fraction
//! statistics, and grades each statistic into a per-metric severity with a
//! single global verdict.
//!
//! Data flows strictly forward:
//!
//! ```text
//! words -> codec -> decoded sets -> aggregate -> metrics -> qa -> report
//! ```
//!
//! [`pipeline::DeadMapQa`] wires the stages together; every stage is also
//! usable on its own. The library only emits `tracing` events and never
//! installs a subscriber.

pub mod aggregate;
pub mod codec;
pub mod config;
pub mod pipeline;
pub mod qa;
pub mod sanity;
pub mod topology;
pub mod utils;

pub use aggregate::{Aggregates, Aggregator, EvolvingMap};
pub use codec::{Granularity, IntervalDecoder, MapVersion};
pub use config::{QaConfig, QaConfigBuilder};
pub use pipeline::{DeadMapObject, DeadMapQa, QaOutcome, RunTiming};
pub use qa::{Metric, QaReport, Severity};
pub use topology::Topology;
