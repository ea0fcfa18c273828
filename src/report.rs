use crate::coerce::{finite_or_zero, sanitize};
use crate::growth::{compute_cagr, compute_max_drawdown};
use crate::model::Timeframe;
use crate::regression::{compute_r2, forecast};
use crate::stats::describe;
use serde::{Deserialize, Serialize};

/// Every statistic derived from a single series.
///
/// Presentation code should display these values as they are instead of
/// recomputing any of them.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StatisticsResult {
    pub mean: f64,
    pub std: f64,
    /// Change of the last value against the previous one, in percent.
    pub trend: f64,
    pub max: f64,
    pub min: f64,
    /// Last value of the series.
    pub current: f64,
    /// One-step-ahead linear forecast.
    pub forecast: f64,
    pub slope: f64,
    /// Heuristic fit reliability, see [`crate::regression::Forecast`].
    pub confidence: f64,
    pub r2: f64,
    pub median: f64,
    pub q25: f64,
    pub q75: f64,
    pub iqr: f64,
    /// Zero unless the timeframe is yearly.
    pub cagr: f64,
    pub max_drawdown: f64,
    pub count: usize,
    pub non_zero_share: f64,
}

/// Compute all statistics of `series`.
pub fn compute_statistics(series: &[f64], timeframe: Timeframe) -> StatisticsResult {
    let vals = sanitize(series);
    let desc = describe(&vals);
    let fit = forecast(&vals);

    let cagr = match timeframe {
        Timeframe::Year => compute_cagr(&vals),
        Timeframe::Quarter | Timeframe::Month => 0.0,
    };

    StatisticsResult {
        mean: desc.mean,
        std: desc.std,
        trend: last_change(&vals),
        max: desc.max,
        min: desc.min,
        current: vals.last().copied().unwrap_or(0.0),
        forecast: fit.next,
        slope: fit.slope,
        confidence: fit.confidence,
        r2: compute_r2(&vals, fit.slope, fit.intercept),
        median: desc.median,
        q25: desc.q25,
        q75: desc.q75,
        iqr: desc.iqr,
        cagr,
        max_drawdown: compute_max_drawdown(&vals),
        count: desc.count,
        non_zero_share: desc.non_zero_share,
    }
}

fn last_change(vals: &[f64]) -> f64 {
    let [.., previous, current] = vals else {
        return 0.0;
    };
    if *previous == 0.0 {
        return 0.0;
    }
    finite_or_zero((current - previous) / previous.abs() * 100.0)
}
