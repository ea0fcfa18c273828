use crate::coerce::finite_or_zero;
use serde::{Deserialize, Serialize};

/// Running mean and population variance (Welford's algorithm).
#[derive(Debug, Clone, Default)]
pub struct Accumulator {
    n_vals: usize,
    mean: f64,
    diff_2_sum: f64,
}

impl Accumulator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, val: f64) {
        self.n_vals += 1;

        let diff_a = val - self.mean;
        self.mean += diff_a / self.n_vals as f64;

        let diff_b = val - self.mean;
        self.diff_2_sum += diff_a * diff_b;
    }

    pub fn count(&self) -> usize {
        self.n_vals
    }

    pub fn mean(&self) -> f64 {
        self.mean
    }

    /// Population standard deviation; zero for fewer than two values.
    pub fn std_dev(&self) -> f64 {
        if self.n_vals < 2 {
            return 0.0;
        }
        (self.diff_2_sum / self.n_vals as f64).max(0.0).sqrt()
    }
}

/// Summary statistics of a series.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DescriptiveStats {
    pub mean: f64,
    pub std: f64,
    pub median: f64,
    pub q25: f64,
    pub q75: f64,
    pub iqr: f64,
    pub count: usize,
    /// Percentage (0 to 100) of values different from zero.
    pub non_zero_share: f64,
    pub max: f64,
    pub min: f64,
}

/// Describe a series. An empty series yields all-zero statistics.
pub fn describe(series: &[f64]) -> DescriptiveStats {
    if series.is_empty() {
        return DescriptiveStats::default();
    }

    // Accumulate in units of the largest magnitude so huge values cannot overflow.
    let scale = magnitude(series);
    let mut acc = Accumulator::new();
    let mut max = f64::NEG_INFINITY;
    let mut min = f64::INFINITY;
    let mut n_non_zero = 0;
    let mut sorted = Vec::with_capacity(series.len());

    for &val in series {
        let val = finite_or_zero(val);
        acc.add(val / scale);
        max = max.max(val);
        min = min.min(val);
        if val != 0.0 {
            n_non_zero += 1;
        }
        sorted.push(val);
    }

    sorted.sort_by(f64::total_cmp);

    let q25 = quantile(&sorted, 0.25);
    let q75 = quantile(&sorted, 0.75);

    DescriptiveStats {
        mean: finite_or_zero(acc.mean() * scale),
        std: finite_or_zero(acc.std_dev() * scale),
        median: quantile(&sorted, 0.5),
        q25,
        q75,
        iqr: finite_or_zero(q75 - q25),
        count: acc.count(),
        non_zero_share: 100.0 * n_non_zero as f64 / series.len() as f64,
        max,
        min,
    }
}

/// Quantile `p` (in `[0, 1]`) of an ascending slice, interpolating linearly
/// between the neighbouring order statistics.
pub fn quantile(sorted: &[f64], p: f64) -> f64 {
    let n_vals = sorted.len();
    if n_vals == 0 {
        return 0.0;
    }

    let pos = p.clamp(0.0, 1.0) * (n_vals - 1) as f64;
    let lower = pos.floor() as usize;
    let upper = (pos.ceil() as usize).min(n_vals - 1);
    let frac = pos - lower as f64;

    sorted[lower] * (1.0 - frac) + sorted[upper] * frac
}

/// Arithmetic mean of a series, zero when empty.
pub fn mean(series: &[f64]) -> f64 {
    if series.is_empty() {
        return 0.0;
    }
    let scale = magnitude(series);
    let scaled_sum: f64 = series
        .iter()
        .map(|&val| finite_or_zero(val) / scale)
        .sum();
    finite_or_zero(scaled_sum / series.len() as f64 * scale)
}

/// Largest absolute finite value of a series, or `1.0` when all values are zero.
pub fn magnitude(series: &[f64]) -> f64 {
    let max_abs = series
        .iter()
        .map(|&val| finite_or_zero(val).abs())
        .fold(0.0, f64::max);
    if max_abs > 0.0 { max_abs } else { 1.0 }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_close(actual: f64, expected: f64) {
        assert!(
            (actual - expected).abs() < 1e-9,
            "expected {expected}, got {actual}"
        );
    }

    #[test]
    fn empty_series_is_all_zero() {
        let stats = describe(&[]);
        assert_eq!(stats, DescriptiveStats::default());
        assert_eq!(stats.count, 0);
        assert_eq!(stats.max, 0.0);
        assert_eq!(stats.min, 0.0);
    }

    #[test]
    fn single_value() {
        let stats = describe(&[4.0]);
        assert_eq!(stats.count, 1);
        assert_close(stats.mean, 4.0);
        assert_close(stats.std, 0.0);
        assert_close(stats.median, 4.0);
        assert_close(stats.q25, 4.0);
        assert_close(stats.q75, 4.0);
        assert_close(stats.iqr, 0.0);
        assert_close(stats.non_zero_share, 100.0);
    }

    #[test]
    fn known_series() {
        let stats = describe(&[2.0, 4.0, 4.0, 4.0, 5.0, 5.0, 7.0, 9.0]);
        assert_eq!(stats.count, 8);
        assert_close(stats.mean, 5.0);
        assert_close(stats.std, 2.0);
        assert_close(stats.median, 4.5);
        assert_close(stats.q25, 4.0);
        assert_close(stats.q75, 5.5);
        assert_close(stats.iqr, 1.5);
        assert_close(stats.max, 9.0);
        assert_close(stats.min, 2.0);
    }

    #[test]
    fn quantiles_interpolate() {
        let sorted = [10.0, 20.0, 30.0, 40.0];
        assert_close(quantile(&sorted, 0.0), 10.0);
        assert_close(quantile(&sorted, 0.25), 17.5);
        assert_close(quantile(&sorted, 0.5), 25.0);
        assert_close(quantile(&sorted, 1.0), 40.0);
    }

    #[test]
    fn non_zero_share_counts_exact_zeros() {
        let stats = describe(&[0.0, 1.0, 0.0, -2.0]);
        assert_close(stats.non_zero_share, 50.0);
        assert_close(describe(&[0.0, 0.0]).non_zero_share, 0.0);
    }

    #[test]
    fn median_lies_between_min_and_max() {
        let cases: [&[f64]; 4] = [
            &[3.0, -1.0, 8.0],
            &[5.0, 5.0, 5.0, 5.0],
            &[-10.0, 100.0, 0.5, 7.0, 7.0],
            &[1e9, -1e9],
        ];
        for series in cases {
            let stats = describe(series);
            assert!(stats.min <= stats.median && stats.median <= stats.max);
        }
    }

    #[test]
    fn non_finite_values_count_as_zero() {
        let stats = describe(&[f64::NAN, 4.0]);
        assert_close(stats.mean, 2.0);
        assert_close(stats.min, 0.0);
        assert_close(stats.non_zero_share, 50.0);
    }

    #[test]
    fn huge_values_do_not_overflow() {
        let stats = describe(&[1e308, -1e308, 1e308]);
        assert!((stats.mean - 1e308 / 3.0).abs() < 1e294);
        assert!(stats.std.is_finite() && stats.std > 9e307);
        assert_eq!(stats.median, 1e308);
        assert!(stats.q25.is_finite());
        assert!(stats.iqr.is_finite());
        assert!((mean(&[f64::MAX, f64::MAX]) - f64::MAX).abs() < 1e295);
    }

    #[test]
    fn magnitude_of_zero_series_is_one() {
        assert_eq!(magnitude(&[0.0, f64::NAN]), 1.0);
        assert_eq!(magnitude(&[-4.0, 2.0]), 4.0);
    }

    #[test]
    fn describe_does_not_mutate_input() {
        let series = vec![3.0, 1.0, 2.0];
        let first = describe(&series);
        let second = describe(&series);
        assert_eq!(first, second);
        assert_eq!(series, vec![3.0, 1.0, 2.0]);
    }
}
