use serde::{Deserialize, Serialize};

use super::Step;
use crate::topology::{Barrel, TimeKey};

/// Dead-lane fractions sampled at every snapshot.
///
/// All vectors share the time axis `time_s`, measured from the first key.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DeadFractionCurves {
    pub keys: Vec<TimeKey>,
    pub time_s: Vec<f64>,
    pub inner: Vec<f64>,
    pub outer: Vec<f64>,
    /// One curve per layer.
    pub per_layer: Vec<Vec<f64>>,
}

impl DeadFractionCurves {
    pub fn barrel(&self, barrel: Barrel) -> &[f64] {
        match barrel {
            Barrel::Inner => &self.inner,
            Barrel::Outer => &self.outer,
        }
    }

    pub fn len(&self) -> usize {
        self.keys.len()
    }

    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }
}

#[derive(Debug)]
pub(crate) struct CurveAccumulator {
    barrel_lanes: [usize; 2],
    layer_lanes: Vec<usize>,
    curves: DeadFractionCurves,
}

impl CurveAccumulator {
    pub(crate) fn new(barrel_lanes: [usize; 2], layer_lanes: Vec<usize>) -> Self {
        let curves = DeadFractionCurves {
            per_layer: vec![Vec::new(); layer_lanes.len()],
            ..DeadFractionCurves::default()
        };
        Self {
            barrel_lanes,
            layer_lanes,
            curves,
        }
    }

    pub(crate) fn observe(&mut self, step: &Step<'_>, dead_per_barrel: [usize; 2], dead_per_layer: &[usize]) {
        let curves = &mut self.curves;
        curves.keys.push(step.key);
        curves.time_s.push(step.time_s);
        curves.inner.push(fraction(
            dead_per_barrel[Barrel::Inner.index()],
            self.barrel_lanes[Barrel::Inner.index()],
        ));
        curves.outer.push(fraction(
            dead_per_barrel[Barrel::Outer.index()],
            self.barrel_lanes[Barrel::Outer.index()],
        ));
        for ((curve, &dead), &total) in curves
            .per_layer
            .iter_mut()
            .zip(dead_per_layer)
            .zip(&self.layer_lanes)
        {
            curve.push(fraction(dead, total));
        }
    }

    pub(crate) fn finish(self) -> DeadFractionCurves {
        self.curves
    }
}

fn fraction(dead: usize, total: usize) -> f64 {
    if total == 0 {
        0.0
    } else {
        dead as f64 / total as f64
    }
}
