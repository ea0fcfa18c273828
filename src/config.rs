use crate::model::{Timeframe, TrendType};
use anyhow::{Context, Result, bail};
use serde::{Deserialize, Serialize};
use std::{fmt::Debug, fs, ops::RangeBounds, path::Path};

/// Analysis configuration.
///
/// Loaded from a TOML file and validated before use.
/// See [`Config::from_file`] for loading.
#[derive(Debug, Default, PartialEq, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    pub series: SeriesConfig,
    pub trend: TrendConfig,
    pub output: OutputConfig,
}

/// Shape of the input series.
#[derive(Debug, PartialEq, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SeriesConfig {
    /// Granularity of the series; CAGR is only reported for yearly series.
    pub timeframe: Timeframe,
    /// Calendar month (1 = January) of the first point, used for seasonality.
    pub first_month: u32,
}

impl Default for SeriesConfig {
    fn default() -> Self {
        Self {
            timeframe: Timeframe::Year,
            first_month: 1,
        }
    }
}

/// Trend transform applied to the reported points.
#[derive(Debug, Default, PartialEq, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct TrendConfig {
    pub kind: TrendType,
    pub smoothing: bool,
}

#[derive(Debug, PartialEq, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct OutputConfig {
    /// Verbose diagnostics, combined with the `--dev-mode` flag.
    pub dev_mode: bool,
    /// Write indented JSON results.
    pub pretty: bool,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            dev_mode: false,
            pretty: true,
        }
    }
}

impl Config {
    /// Load a [`Config`] from a TOML file and validate it.
    ///
    /// # Errors
    /// Returns an error if the file cannot be read, deserialized,
    /// or if the configuration values are invalid.
    pub fn from_file<P: AsRef<Path>>(file: P) -> Result<Self> {
        let file = file.as_ref();
        let contents =
            fs::read_to_string(file).with_context(|| format!("failed to read {file:?}"))?;

        contents.parse()
    }

    fn validate(&self) -> Result<()> {
        check_num(self.series.first_month, 1..=12).context("invalid first month")?;
        Ok(())
    }
}

impl std::str::FromStr for Config {
    type Err = anyhow::Error;

    fn from_str(contents: &str) -> Result<Self> {
        let config: Config = toml::from_str(contents).context("failed to deserialize config")?;

        config.validate().context("failed to validate config")?;

        Ok(config)
    }
}

fn check_num<T, R>(num: T, range: R) -> Result<()>
where
    T: PartialOrd + Debug,
    R: RangeBounds<T> + Debug,
{
    if !range.contains(&num) {
        bail!("number must be in the range {range:?}, but is {num:?}");
    }
    Ok(())
}
