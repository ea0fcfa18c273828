//! Data types shared by the engine.

use crate::coerce::{finite_or_zero, to_safe_number, try_finite};
use serde::{Deserialize, Serialize};
use serde_value::Value;

/// Plan and actual figures for one period of a series.
///
/// `deviation` is `actual - plan` and `percentage` is plan fulfilment
/// (`actual / plan * 100`, zero when `plan <= 0`), unless an upstream source
/// supplied them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DataPoint {
    pub label: String,
    pub plan: f64,
    pub actual: f64,
    pub deviation: f64,
    pub percentage: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub group: Option<String>,
}

impl DataPoint {
    /// Create a point with derived deviation and percentage. Non-finite plan
    /// and actual values are stored as zero.
    pub fn new(label: impl Into<String>, plan: f64, actual: f64) -> Self {
        let plan = finite_or_zero(plan);
        let actual = finite_or_zero(actual);
        Self {
            label: label.into(),
            plan,
            actual,
            deviation: derive_deviation(plan, actual),
            percentage: derive_percentage(plan, actual),
            group: None,
        }
    }

    /// Ingest an upstream point.
    ///
    /// Precomputed deviation and percentage are kept when present and finite,
    /// otherwise they are derived from the coerced plan and actual values.
    pub fn from_raw(raw: &RawDataPoint) -> Self {
        let plan = to_safe_number(&raw.plan);
        let actual = to_safe_number(&raw.actual);

        let deviation = raw
            .deviation
            .as_ref()
            .and_then(try_finite)
            .unwrap_or_else(|| derive_deviation(plan, actual));
        let percentage = raw
            .percentage
            .as_ref()
            .and_then(try_finite)
            .unwrap_or_else(|| derive_percentage(plan, actual));

        Self {
            label: raw.label.clone(),
            plan,
            actual,
            deviation,
            percentage,
            group: raw.group.clone(),
        }
    }

    pub fn with_group(mut self, group: impl Into<String>) -> Self {
        self.group = Some(group.into());
        self
    }
}

fn derive_deviation(plan: f64, actual: f64) -> f64 {
    finite_or_zero(actual - plan)
}

fn derive_percentage(plan: f64, actual: f64) -> f64 {
    if plan > 0.0 {
        finite_or_zero(actual / plan * 100.0)
    } else {
        0.0
    }
}

/// Point as delivered by an upstream data source, before coercion.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RawDataPoint {
    #[serde(default)]
    pub label: String,
    #[serde(default = "absent")]
    pub plan: Value,
    #[serde(default = "absent")]
    pub actual: Value,
    #[serde(default)]
    pub deviation: Option<Value>,
    #[serde(default)]
    pub percentage: Option<Value>,
    #[serde(default)]
    pub group: Option<String>,
}

fn absent() -> Value {
    Value::Unit
}

/// Contents of one input file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SeriesFile {
    pub points: Vec<RawDataPoint>,
}

impl SeriesFile {
    pub fn data_points(&self) -> Vec<DataPoint> {
        self.points.iter().map(DataPoint::from_raw).collect()
    }
}

/// Transform applied by the trend pipeline.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "snake_case")]
pub enum TrendType {
    #[default]
    Absolute,
    Percentage,
    MovingAverage,
}

/// Granularity of a series.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Timeframe {
    #[default]
    Year,
    Quarter,
    Month,
}
