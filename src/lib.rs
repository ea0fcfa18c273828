//! Statistics engine for plan-vs-actual retail finance series.
//!
//! All computations are pure functions of their input: they never fail, and
//! empty or malformed input degrades to zero instead of `NaN`. File handling
//! lives in [`manager`] and [`analysis`].

pub mod analysis;
pub mod coerce;
pub mod comparison;
pub mod config;
pub mod growth;
pub mod manager;
pub mod model;
pub mod regression;
pub mod report;
pub mod seasonality;
pub mod stats;
pub mod trend;

pub use coerce::{to_safe_number, try_finite};
pub use comparison::{
    GroupTotal, MetricPeriodValues, PeriodValue, PlanActualSummary, rank_groups, rollup_months,
    summarize,
};
pub use growth::{compute_cagr, compute_max_drawdown};
pub use model::{DataPoint, RawDataPoint, Timeframe, TrendType};
pub use regression::{Forecast, compute_r2, forecast};
pub use report::{StatisticsResult, compute_statistics};
pub use seasonality::{analyze_seasonality, analyze_seasonality_from};
pub use stats::{DescriptiveStats, describe};
pub use trend::apply_trend_analysis;
