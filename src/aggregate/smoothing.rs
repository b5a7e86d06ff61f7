use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors raised by [`rolling_average`].
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SmoothingError {
    #[error("series lengths differ: {x} abscissae for {y} values")]
    LengthMismatch { x: usize, y: usize },
    #[error("smoothing window must be finite and non-negative, got {got}")]
    InvalidWindow { got: f64 },
    #[error("decimation step must be at least 1")]
    ZeroDecimation,
}

/// Decimated output of [`rolling_average`].
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SmoothedSeries {
    pub x: Vec<f64>,
    pub y: Vec<f64>,
}

impl SmoothedSeries {
    pub fn len(&self) -> usize {
        self.x.len()
    }

    pub fn is_empty(&self) -> bool {
        self.x.is_empty()
    }
}

/// Time-weighted rolling average of an irregularly sampled series.
///
/// `x` must be non-decreasing. For every point the window covers the
/// contiguous run of neighbours within `window / 2` of `x[i]`, clamped at the
/// ends of the series, and `y` is integrated over it with the trapezoid rule
/// and divided by the covered width. A window holding only the point itself
/// returns `y[i]`; a window of several points but zero width yields NaN.
/// Only every `every`-th point, starting with the first, is kept.
pub fn rolling_average(
    x: &[f64],
    y: &[f64],
    window: f64,
    every: usize,
) -> Result<SmoothedSeries, SmoothingError> {
    if x.len() != y.len() {
        return Err(SmoothingError::LengthMismatch {
            x: x.len(),
            y: y.len(),
        });
    }
    if !window.is_finite() || window < 0.0 {
        return Err(SmoothingError::InvalidWindow { got: window });
    }
    if every == 0 {
        return Err(SmoothingError::ZeroDecimation);
    }

    let half = window / 2.0;
    let mut out = SmoothedSeries::default();
    for i in (0..x.len()).step_by(every) {
        let mut lo = i;
        while lo > 0 && x[i] - x[lo - 1] <= half {
            lo -= 1;
        }
        let mut hi = i;
        while hi + 1 < x.len() && x[hi + 1] - x[i] <= half {
            hi += 1;
        }
        out.x.push(x[i]);
        out.y.push(window_mean(&x[lo..=hi], &y[lo..=hi]));
    }
    Ok(out)
}

fn window_mean(x: &[f64], y: &[f64]) -> f64 {
    if x.len() == 1 {
        return y[0];
    }
    let width = x[x.len() - 1] - x[0];
    if width == 0.0 {
        return f64::NAN;
    }
    let area: f64 = x
        .windows(2)
        .zip(y.windows(2))
        .map(|(xs, ys)| 0.5 * (ys[0] + ys[1]) * (xs[1] - xs[0]))
        .sum();
    area / width
}
