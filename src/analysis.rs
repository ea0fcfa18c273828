use crate::comparison::{rank_groups, summarize};
use crate::config::Config;
use crate::model::{DataPoint, SeriesFile, Timeframe, TrendType};
use crate::report::compute_statistics;
use crate::seasonality::analyze_seasonality_from;
use crate::trend::apply_trend_analysis;
use anyhow::{Context, Result};
use serde_json::{Map, Value, json};
use std::{
    fs::File,
    io::{BufReader, BufWriter, Write},
    path::Path,
};

/// One section of the result document, fed point by point.
pub trait Section {
    fn update(&mut self, point: &DataPoint);
    fn report(&self) -> Value;
}

/// Statistics of either the actual or the plan values.
pub struct SeriesStats {
    key: &'static str,
    select: fn(&DataPoint) -> f64,
    timeframe: Timeframe,
    vals: Vec<f64>,
}

impl SeriesStats {
    pub fn actual(cfg: &Config) -> Self {
        Self {
            key: "statistics",
            select: |point| point.actual,
            timeframe: cfg.series.timeframe,
            vals: Vec::new(),
        }
    }

    pub fn plan(cfg: &Config) -> Self {
        Self {
            key: "planStatistics",
            select: |point| point.plan,
            timeframe: cfg.series.timeframe,
            vals: Vec::new(),
        }
    }
}

impl Section for SeriesStats {
    fn update(&mut self, point: &DataPoint) {
        self.vals.push((self.select)(point));
    }

    fn report(&self) -> Value {
        json!({ self.key: compute_statistics(&self.vals, self.timeframe) })
    }
}

/// Plan-vs-actual totals and the per-group ranking.
#[derive(Default)]
pub struct Comparison {
    points: Vec<DataPoint>,
}

impl Section for Comparison {
    fn update(&mut self, point: &DataPoint) {
        self.points.push(point.clone());
    }

    fn report(&self) -> Value {
        json!({
            "summary": summarize(&self.points),
            "groups": rank_groups(&self.points),
        })
    }
}

/// Monthly seasonality index of the actual values, null below a full year.
pub struct Seasonality {
    first_month: u32,
    vals: Vec<f64>,
}

impl Seasonality {
    pub fn new(cfg: &Config) -> Self {
        Self {
            first_month: cfg.series.first_month,
            vals: Vec::new(),
        }
    }
}

impl Section for Seasonality {
    fn update(&mut self, point: &DataPoint) {
        self.vals.push(point.actual);
    }

    fn report(&self) -> Value {
        json!({ "seasonality": analyze_seasonality_from(&self.vals, self.first_month) })
    }
}

/// Points after the configured trend transform.
pub struct Trend {
    kind: TrendType,
    smoothing: bool,
    points: Vec<DataPoint>,
}

impl Trend {
    pub fn new(kind: TrendType, smoothing: bool) -> Self {
        Self {
            kind,
            smoothing,
            points: Vec::new(),
        }
    }
}

impl Section for Trend {
    fn update(&mut self, point: &DataPoint) {
        self.points.push(point.clone());
    }

    fn report(&self) -> Value {
        json!({ "trend": apply_trend_analysis(&self.points, self.kind, self.smoothing) })
    }
}

/// Builds the result document of one input file.
pub struct Analyzer {
    pretty: bool,
    section_ptr_vec: Vec<Box<dyn Section>>,
}

impl Analyzer {
    pub fn new(cfg: &Config) -> Self {
        let section_ptr_vec: Vec<Box<dyn Section>> = vec![
            Box::new(SeriesStats::actual(cfg)),
            Box::new(SeriesStats::plan(cfg)),
            Box::new(Comparison::default()),
            Box::new(Seasonality::new(cfg)),
            Box::new(Trend::new(cfg.trend.kind, cfg.trend.smoothing)),
        ];
        Self {
            pretty: cfg.output.pretty,
            section_ptr_vec,
        }
    }

    pub fn add_points(&mut self, points: &[DataPoint]) {
        for point in points {
            for section in &mut self.section_ptr_vec {
                section.update(point);
            }
        }
    }

    /// Read a JSON series file and feed its points to every section.
    pub fn add_file<P: AsRef<Path>>(&mut self, file: P) -> Result<usize> {
        let points = read_points(file)?;
        self.add_points(&points);
        Ok(points.len())
    }

    /// Merge the reports of all sections into one JSON object.
    pub fn report(&self) -> Value {
        let mut document = Map::new();
        for section in &self.section_ptr_vec {
            if let Value::Object(fields) = section.report() {
                document.extend(fields);
            }
        }
        Value::Object(document)
    }

    pub fn save_results<P: AsRef<Path>>(&self, file: P) -> Result<()> {
        let file = file.as_ref();
        let file = File::create(file).with_context(|| format!("failed to create {file:?}"))?;
        let mut writer = BufWriter::new(file);

        let report = self.report();
        let written = if self.pretty {
            serde_json::to_writer_pretty(&mut writer, &report)
        } else {
            serde_json::to_writer(&mut writer, &report)
        };
        written.context("failed to serialize results")?;

        writer.flush().context("failed to flush writer stream")?;

        Ok(())
    }
}

/// Load and coerce the points of a JSON series file.
pub fn read_points<P: AsRef<Path>>(file: P) -> Result<Vec<DataPoint>> {
    let file = file.as_ref();
    let file = File::open(file).with_context(|| format!("failed to open {file:?}"))?;
    let reader = BufReader::new(file);

    let series: SeriesFile =
        serde_json::from_reader(reader).context("failed to deserialize series file")?;

    Ok(series.data_points())
}
