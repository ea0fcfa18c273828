use crate::coerce::finite_or_zero;
use crate::model::{DataPoint, TrendType};

/// Window of the trailing moving average.
pub const MOVING_AVERAGE_WINDOW: usize = 3;

/// Transform a series of points for trend display.
///
/// The `kind` transform runs first, then the optional smoothing pass. Only
/// `actual` is touched, except by [`TrendType::Percentage`] which also rescales
/// `plan`. Non-finite `actual` and `plan` values are read as zero. The input is
/// left unchanged.
pub fn apply_trend_analysis(
    points: &[DataPoint],
    kind: TrendType,
    smoothing: bool,
) -> Vec<DataPoint> {
    let points: Vec<DataPoint> = points.iter().map(sanitized).collect();
    let mut out = match kind {
        TrendType::Absolute => points,
        TrendType::Percentage => percentage_of_max(&points),
        TrendType::MovingAverage => moving_average(&points),
    };

    if smoothing {
        smooth(&mut out);
    }

    out
}

fn sanitized(point: &DataPoint) -> DataPoint {
    let mut point = point.clone();
    point.actual = finite_or_zero(point.actual);
    point.plan = finite_or_zero(point.plan);
    point
}

fn percentage_of_max(points: &[DataPoint]) -> Vec<DataPoint> {
    let max = points
        .iter()
        .map(|point| point.actual)
        .fold(f64::NEG_INFINITY, f64::max);

    points
        .iter()
        .map(|point| {
            let mut point = point.clone();
            if max == 0.0 || !max.is_finite() {
                point.actual = 0.0;
                point.plan = 0.0;
            } else {
                point.actual = finite_or_zero(point.actual / max * 100.0);
                point.plan = finite_or_zero(point.plan / max * 100.0);
            }
            point
        })
        .collect()
}

fn moving_average(points: &[DataPoint]) -> Vec<DataPoint> {
    points
        .iter()
        .enumerate()
        .map(|(i, point)| {
            let window = MOVING_AVERAGE_WINDOW.min(i + 1) as f64;
            let avg: f64 = points[i + 1 - window as usize..=i]
                .iter()
                .map(|point| point.actual / window)
                .sum();
            let mut point = point.clone();
            point.actual = finite_or_zero(avg);
            point
        })
        .collect()
}

/// Three-point average of interior values; the endpoints stay as they are.
fn smooth(points: &mut [DataPoint]) {
    if points.len() <= 2 {
        return;
    }

    let actual: Vec<f64> = points.iter().map(|point| point.actual / 3.0).collect();
    for i in 1..points.len() - 1 {
        points[i].actual = finite_or_zero(actual[i - 1] + actual[i] + actual[i + 1]);
    }
}
