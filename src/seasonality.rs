use crate::coerce::finite_or_zero;

pub const MONTHS_PER_YEAR: usize = 12;

/// Average value per calendar month, assuming the series starts in January.
///
/// Returns `None` for less than a full year of points. The series is taken to
/// be monthly and gap free; this is not checked.
pub fn analyze_seasonality(series: &[f64]) -> Option<[f64; MONTHS_PER_YEAR]> {
    analyze_seasonality_from(series, 1)
}

/// Average value per calendar month for a monthly series whose first point
/// falls in `first_month` (1 = January). Bucket 0 of the result is January.
///
/// Months outside `1..=12` wrap around the year: 0 is December and 13 is
/// January.
pub fn analyze_seasonality_from(
    series: &[f64],
    first_month: u32,
) -> Option<[f64; MONTHS_PER_YEAR]> {
    if series.len() < MONTHS_PER_YEAR {
        return None;
    }

    let offset = (first_month as usize % MONTHS_PER_YEAR + MONTHS_PER_YEAR - 1) % MONTHS_PER_YEAR;
    let bucket_of = |i: usize| (i + offset) % MONTHS_PER_YEAR;

    let mut counts = [0usize; MONTHS_PER_YEAR];
    for i in 0..series.len() {
        counts[bucket_of(i)] += 1;
    }

    // Divide before summing so the average cannot overflow.
    let mut index = [0.0; MONTHS_PER_YEAR];
    for (i, &val) in series.iter().enumerate() {
        let bucket = bucket_of(i);
        index[bucket] += finite_or_zero(val) / counts[bucket] as f64;
    }
    for avg in &mut index {
        *avg = finite_or_zero(*avg);
    }
    Some(index)
}
