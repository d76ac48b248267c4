//! Tip engine CLI.
//!
//! Reads a drawer record and a roster record, runs the tip pipeline, prints
//! the report and saves it next to the other reports.

use std::path::PathBuf;
use std::process::ExitCode;

use chrono::NaiveDate;
use clap::Parser;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use tip_engine::calculation::TipRun;
use tip_engine::config::{ConfigLoader, TipConfig};
use tip_engine::error::EngineResult;
use tip_engine::input::{read_drawer_record, read_roster_record};
use tip_engine::report::{render_json, render_report, write_report};

/// Split a cash tip pool by hours worked and work out who gets which bills
/// and coins.
#[derive(Parser, Debug)]
#[command(name = "tip-engine")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// YAML configuration file
    #[arg(short, long, env = "TIP_ENGINE_CONFIG")]
    config: Option<PathBuf>,

    /// Drawer record (eight counts, twenties down to nickels)
    #[arg(short, long)]
    drawer: Option<PathBuf>,

    /// Roster record (period dates, then name and hours lines)
    #[arg(short, long)]
    roster: Option<PathBuf>,

    /// Directory the report file is written into
    #[arg(short, long)]
    output_dir: Option<PathBuf>,

    /// Report date (YYYY-MM-DD), today if omitted
    #[arg(long)]
    date: Option<NaiveDate>,

    /// Skip re-batching surplus small coins
    #[arg(long)]
    no_correct: bool,

    /// Print the report without writing the report file
    #[arg(long)]
    no_write: bool,

    /// Print the report as JSON, audit trace included
    #[arg(long)]
    json: bool,

    /// Enable debug logging
    #[arg(short, long)]
    verbose: bool,
}

impl Cli {
    /// Loads the configuration file, if any, and applies the flags over it.
    fn resolve_config(&self) -> EngineResult<TipConfig> {
        let mut config = match &self.config {
            Some(path) => ConfigLoader::load(path)?.into_config(),
            None => TipConfig::default(),
        };
        if let Some(drawer) = &self.drawer {
            config.drawer_path = drawer.clone();
        }
        if let Some(roster) = &self.roster {
            config.roster_path = roster.clone();
        }
        if let Some(output_dir) = &self.output_dir {
            config.output_dir = output_dir.clone();
        }
        if self.no_correct {
            config.apply_correction = false;
        }
        if self.no_write {
            config.write_report = false;
        }
        Ok(config)
    }
}

fn run(cli: &Cli) -> EngineResult<()> {
    let config = cli.resolve_config()?;
    info!(
        drawer = %config.drawer_path.display(),
        roster = %config.roster_path.display(),
        "Reading input records"
    );

    let drawer = read_drawer_record(&config.drawer_path)?;
    let (period, roster) = read_roster_record(&config.roster_path)?;

    let mut tip_run = TipRun::new(drawer, roster, period).apply_correction(config.apply_correction);
    if let Some(date) = cli.date {
        tip_run = tip_run.report_date(date);
    }
    let report = tip_run.execute()?;

    if cli.json {
        println!("{}", render_json(&report)?);
    } else {
        println!();
        println!("{}", render_report(&report));
    }

    if config.write_report {
        write_report(&config.output_dir, &report)?;
    }
    Ok(())
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    // Logs go to stderr so stdout carries only the report.
    let default_level = if cli.verbose { "debug" } else { "info" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            error!(error = %err, "Tip run failed");
            ExitCode::FAILURE
        }
    }
}
