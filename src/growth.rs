use crate::coerce::{finite_or_zero, sanitize};

/// Compound annual growth rate in percent.
///
/// Uses the first and the last non-zero values of the series and `n - 1`
/// years between them. Only meaningful for yearly series; callers decide
/// whether the timeframe qualifies.
pub fn compute_cagr(series: &[f64]) -> f64 {
    let vals = sanitize(series);
    let n_vals = vals.len();
    if n_vals < 2 {
        return 0.0;
    }

    let first = vals.iter().copied().find(|&val| val != 0.0).unwrap_or(0.0);
    let last = vals.iter().copied().rfind(|&val| val != 0.0).unwrap_or(0.0);
    let years = (n_vals - 1) as f64;

    if first <= 0.0 {
        return 0.0;
    }

    finite_or_zero(((last / first).powf(1.0 / years) - 1.0) * 100.0)
}

/// Largest peak-to-trough decline in percent (zero or negative).
pub fn compute_max_drawdown(series: &[f64]) -> f64 {
    let vals = sanitize(series);
    if vals.len() < 2 {
        return 0.0;
    }

    let mut peak = vals[0];
    let mut max_drawdown = 0.0_f64;
    for &val in &vals[1..] {
        if val > peak {
            peak = val;
        }
        // A non-positive peak has no meaningful relative decline.
        if peak > 0.0 {
            let drawdown = (val / peak - 1.0) * 100.0;
            max_drawdown = max_drawdown.min(drawdown);
        }
    }

    finite_or_zero(max_drawdown)
}
