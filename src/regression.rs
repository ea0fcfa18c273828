//! Ordinary least squares trend fitting over the series index.
//!
//! The independent variable is the 0-based position in the series, so a
//! yearly series `[a, b, c]` is fitted at `x = 0, 1, 2`.

use crate::coerce::{finite_or_zero, sanitize};
use crate::stats::{magnitude, mean};
use serde::{Deserialize, Serialize};

/// Confidence reported when there are too few points to measure residuals.
pub const DEFAULT_CONFIDENCE: f64 = 0.95;
pub const MIN_CONFIDENCE: f64 = 0.5;
pub const MAX_CONFIDENCE: f64 = 0.99;

/// Linear fit and one-step-ahead forecast of a series.
///
/// `confidence` is a presentation heuristic, not a statistical confidence
/// level: it is `1 - mse / max(max(series), 1)` clamped to
/// `[MIN_CONFIDENCE, MAX_CONFIDENCE]`, with no sample-size correction. Do not
/// base decisions on it.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Forecast {
    pub slope: f64,
    pub intercept: f64,
    pub next: f64,
    pub confidence: f64,
}

/// Fit `y = slope * x + intercept` and forecast the value at `x = n`.
pub fn forecast(series: &[f64]) -> Forecast {
    let ys = sanitize(series);
    // Fit in units of the largest magnitude so the sums cannot overflow.
    let scale = magnitude(&ys);
    let ys: Vec<f64> = ys.iter().map(|&y| y / scale).collect();
    let n_vals = ys.len();
    let n = n_vals as f64;

    let (mut sum_x, mut sum_y, mut sum_xy, mut sum_x2) = (0.0, 0.0, 0.0, 0.0);
    for (i, &y) in ys.iter().enumerate() {
        let x = i as f64;
        sum_x += x;
        sum_y += y;
        sum_xy += x * y;
        sum_x2 += x * x;
    }

    let denom = n * sum_x2 - sum_x * sum_x;
    if n_vals < 2 || denom == 0.0 {
        let intercept = finite_or_zero(mean(&ys) * scale);
        return Forecast {
            slope: 0.0,
            intercept,
            next: intercept,
            confidence: DEFAULT_CONFIDENCE,
        };
    }

    let slope = (n * sum_xy - sum_x * sum_y) / denom;
    let intercept = (sum_y - slope * sum_x) / n;

    Forecast {
        slope: finite_or_zero(slope * scale),
        intercept: finite_or_zero(intercept * scale),
        next: finite_or_zero((slope * n + intercept) * scale),
        confidence: residual_confidence(&ys, scale, slope, intercept),
    }
}

/// `ys`, `slope` and `intercept` are in units of `scale`.
fn residual_confidence(ys: &[f64], scale: f64, slope: f64, intercept: f64) -> f64 {
    if ys.len() < 3 {
        return DEFAULT_CONFIDENCE;
    }

    let mse = ys
        .iter()
        .enumerate()
        .map(|(i, &y)| (y - (slope * i as f64 + intercept)).powi(2))
        .sum::<f64>()
        / ys.len() as f64;

    let max = ys.iter().copied().fold(f64::NEG_INFINITY, f64::max) * scale;
    let denom = max.max(1.0);

    // mse is scaled by scale^2 and denom is in original units
    let confidence = finite_or_zero(1.0 - mse * scale * (scale / denom));
    confidence.clamp(MIN_CONFIDENCE, MAX_CONFIDENCE)
}

/// Coefficient of determination of the line `slope * x + intercept`.
///
/// Zero for fewer than two points or a constant series; negative values
/// (fits worse than the mean) are clamped to zero.
pub fn compute_r2(series: &[f64], slope: f64, intercept: f64) -> f64 {
    let ys = sanitize(series);
    if ys.len() < 2 {
        return 0.0;
    }

    // R² is scale invariant; rescale to keep the squared sums finite.
    let scale = magnitude(&ys);
    let ys: Vec<f64> = ys.iter().map(|&y| y / scale).collect();
    let (slope, intercept) = (slope / scale, intercept / scale);

    let y_mean = mean(&ys);
    let mut ss_tot = 0.0;
    let mut ss_res = 0.0;
    for (i, &y) in ys.iter().enumerate() {
        let fitted = slope * i as f64 + intercept;
        ss_tot += (y - y_mean).powi(2);
        ss_res += (y - fitted).powi(2);
    }

    if ss_tot == 0.0 {
        return 0.0;
    }
    finite_or_zero((1.0 - ss_res / ss_tot).max(0.0))
}
