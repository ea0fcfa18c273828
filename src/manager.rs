use crate::analysis::{Analyzer, read_points};
use crate::config::Config;
use crate::model::TrendType;
use crate::trend::apply_trend_analysis;
use anyhow::{Context, Result, bail};
use glob::glob;
use std::{
    fs,
    path::{Path, PathBuf},
};

/// Runs the analysis over a report directory.
///
/// The directory holds a `config.toml` (optional), input files named
/// `input-<name>.json` and, after analysis, one `result-<name>.json` per input.
pub struct Manager {
    report_dir: PathBuf,
    cfg: Config,
}

impl Manager {
    /// Read `config.toml` from the report directory, or the defaults when
    /// there is none.
    pub fn load_config<P: AsRef<Path>>(report_dir: P) -> Result<Config> {
        let config_file = config_file(report_dir.as_ref());
        if config_file.exists() {
            Config::from_file(&config_file)
        } else {
            Ok(Config::default())
        }
    }

    pub fn new<P: AsRef<Path>>(report_dir: P, cfg: Config) -> Result<Self> {
        let report_dir = report_dir.as_ref().to_path_buf();
        if !report_dir.is_dir() {
            bail!("{report_dir:?} is not a directory");
        }

        let config_file = config_file(&report_dir);
        if !config_file.exists() {
            log::info!("{config_file:?} not found, using defaults");
        }
        log::debug!("{cfg:#?}");

        Ok(Self { report_dir, cfg })
    }

    /// Analyze every input file and write its result next to it.
    pub fn analyze(&self) -> Result<usize> {
        let input_files = self.input_files().context("failed to list input files")?;
        if input_files.is_empty() {
            log::warn!("no input files in {:?}", self.report_dir);
        }

        for input_file in &input_files {
            let name = input_name(input_file)?;

            let mut analyzer = Analyzer::new(&self.cfg);
            let n_points = analyzer
                .add_file(input_file)
                .with_context(|| format!("failed to add {input_file:?}"))?;

            let results_file = self.results_file(name);
            analyzer
                .save_results(&results_file)
                .context("failed to save results")?;
            log::info!("analyzed {n_points} points into {results_file:?}");
        }

        Ok(input_files.len())
    }

    /// Transformed points of one input file, as JSON.
    pub fn trend(&self, name: &str, kind: TrendType, smoothing: bool) -> Result<String> {
        let input_file = self.input_file(name);
        let points =
            read_points(&input_file).with_context(|| format!("failed to read {input_file:?}"))?;

        let points = apply_trend_analysis(&points, kind, smoothing);
        log::debug!("applied {kind:?} trend (smoothing: {smoothing}) to {input_file:?}");

        serde_json::to_string_pretty(&points).context("failed to serialize points")
    }

    /// Remove all result files.
    pub fn clean(&self) -> Result<usize> {
        let results_files = self
            .glob_files("result-*.json")
            .context("failed to list result files")?;
        for results_file in &results_files {
            fs::remove_file(results_file)
                .with_context(|| format!("failed to remove {results_file:?}"))?;
            log::info!("removed {results_file:?}");
        }
        Ok(results_files.len())
    }

    fn input_files(&self) -> Result<Vec<PathBuf>> {
        self.glob_files("input-*.json")
    }

    fn glob_files(&self, pattern: &str) -> Result<Vec<PathBuf>> {
        let pattern = self.report_dir.join(pattern);
        let pattern = pattern.to_str().context("pattern is not valid UTF-8")?;
        let mut files: Vec<_> = glob(pattern)
            .context("failed to glob files")?
            .filter_map(Result::ok)
            .filter(|p| p.is_file())
            .collect();
        files.sort();
        Ok(files)
    }

    fn input_file(&self, name: &str) -> PathBuf {
        self.report_dir.join(format!("input-{name}.json"))
    }

    fn results_file(&self, name: &str) -> PathBuf {
        self.report_dir.join(format!("result-{name}.json"))
    }
}

fn input_name(input_file: &Path) -> Result<&str> {
    input_file
        .file_stem()
        .and_then(|stem| stem.to_str())
        .and_then(|stem| stem.strip_prefix("input-"))
        .with_context(|| format!("unexpected input file name {input_file:?}"))
}

fn config_file(report_dir: &Path) -> PathBuf {
    report_dir.join("config.toml")
}
