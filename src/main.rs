use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use planfact::config::Config;
use planfact::manager::Manager;
use planfact::model::TrendType;
use std::path::PathBuf;

#[derive(Debug, Parser)]
#[command(version, about)]
struct CLI {
    #[arg(long)]
    report_dir: PathBuf,

    /// Log debug diagnostics.
    #[arg(long)]
    dev_mode: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    Analyze,

    Trend {
        #[arg(long)]
        file: String,

        #[arg(long, value_enum, default_value_t = TrendType::Absolute)]
        kind: TrendType,

        #[arg(long)]
        smoothing: bool,
    },

    Clean,
}

fn init_logger(dev_mode: bool) {
    let level = if dev_mode {
        log::LevelFilter::Debug
    } else {
        log::LevelFilter::Info
    };
    env_logger::Builder::new()
        .format_timestamp_millis()
        .filter_level(level)
        .parse_default_env()
        .init();
}

fn main() {
    let args = CLI::parse();

    // Loaded before the logger exists; a load error is reported by run_cli.
    let cfg = Manager::load_config(&args.report_dir);
    init_logger(args.dev_mode || cfg.as_ref().is_ok_and(|cfg| cfg.output.dev_mode));

    if let Err(error) = run_cli(args, cfg) {
        log::error!("{error:#?}");
        std::process::exit(1);
    }
}

fn run_cli(args: CLI, cfg: Result<Config>) -> Result<()> {
    log::debug!("{args:#?}");

    let cfg = cfg.context("failed to construct cfg")?;
    let mgr = Manager::new(&args.report_dir, cfg).context("failed to construct mgr")?;

    match args.command {
        Command::Analyze => {
            let n_files = mgr.analyze()?;
            log::info!("analyzed {n_files} files");
        }
        Command::Trend {
            file,
            kind,
            smoothing,
        } => println!("{}", mgr.trend(&file, kind, smoothing)?),
        Command::Clean => {
            let n_files = mgr.clean()?;
            log::info!("removed {n_files} files");
        }
    }

    Ok(())
}
