//! Plan-vs-actual aggregation: period values, totals, group rankings and
//! month-to-quarter-to-year rollups.

use crate::coerce::finite_or_zero;
use crate::model::DataPoint;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

pub const QUARTERS_PER_YEAR: usize = 4;

/// Plan, actual and their comparison for one period.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PeriodValue {
    pub plan: f64,
    pub actual: f64,
    /// `actual - plan`.
    pub variance: f64,
    /// Plan fulfilment in percent, zero when `plan <= 0`.
    pub procent: f64,
}

impl PeriodValue {
    pub fn new(plan: f64, actual: f64) -> Self {
        let plan = finite_or_zero(plan);
        let actual = finite_or_zero(actual);
        Self {
            plan,
            actual,
            variance: finite_or_zero(actual - plan),
            procent: if plan > 0.0 {
                finite_or_zero(actual / plan * 100.0)
            } else {
                0.0
            },
        }
    }

    fn add(self, other: Self) -> Self {
        Self::new(self.plan + other.plan, self.actual + other.actual)
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlanActualSummary {
    pub total_plan: f64,
    pub total_actual: f64,
    /// `total_actual - total_plan`.
    pub deviation: f64,
    /// Deviation relative to the total plan, zero when the plan is zero.
    pub deviation_percent: f64,
    pub count: usize,
}

/// Total plan and actual over all points.
pub fn summarize(points: &[DataPoint]) -> PlanActualSummary {
    let total = |select: fn(&DataPoint) -> f64| {
        finite_or_zero(points.iter().map(|point| finite_or_zero(select(point))).sum())
    };
    let total_plan = total(|point| point.plan);
    let total_actual = total(|point| point.actual);
    let deviation = finite_or_zero(total_actual - total_plan);

    PlanActualSummary {
        total_plan,
        total_actual,
        deviation,
        deviation_percent: if total_plan != 0.0 {
            finite_or_zero(deviation / total_plan * 100.0)
        } else {
            0.0
        },
        count: points.len(),
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GroupTotal {
    pub group: String,
    #[serde(flatten)]
    pub value: PeriodValue,
}

/// Totals per group (shop, category), largest actual first.
///
/// Points without a group are collected under the empty name. Ties keep
/// alphabetical order.
pub fn rank_groups(points: &[DataPoint]) -> Vec<GroupTotal> {
    let mut totals: BTreeMap<&str, PeriodValue> = BTreeMap::new();
    for point in points {
        let group = point.group.as_deref().unwrap_or("");
        let total = totals.entry(group).or_default();
        *total = total.add(PeriodValue::new(point.plan, point.actual));
    }

    let mut ranking: Vec<_> = totals
        .into_iter()
        .map(|(group, value)| GroupTotal {
            group: group.to_string(),
            value,
        })
        .collect();
    ranking.sort_by(|a, b| b.value.actual.total_cmp(&a.value.actual));
    ranking
}

/// Year, quarter and month values of a metric.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MetricPeriodValues {
    pub year: PeriodValue,
    pub quarters: [PeriodValue; QUARTERS_PER_YEAR],
    pub months: Vec<PeriodValue>,
}

/// Roll monthly values up into quarters and the year.
///
/// Only the first twelve months are used; missing months count as zero.
pub fn rollup_months(months: &[PeriodValue]) -> MetricPeriodValues {
    let months: Vec<PeriodValue> = (0..12)
        .map(|i_month| {
            months
                .get(i_month)
                .map(|month| PeriodValue::new(month.plan, month.actual))
                .unwrap_or_default()
        })
        .collect();

    let mut quarters = [PeriodValue::default(); QUARTERS_PER_YEAR];
    for (i_quarter, quarter) in quarters.iter_mut().enumerate() {
        *quarter = months[3 * i_quarter..3 * i_quarter + 3]
            .iter()
            .fold(PeriodValue::default(), |acc, &month| acc.add(month));
    }

    let year = quarters
        .iter()
        .fold(PeriodValue::default(), |acc, &quarter| acc.add(quarter));

    MetricPeriodValues {
        year,
        quarters,
        months,
    }
}
