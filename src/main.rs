//! PVT - terminal psychomotor vigilance test
//!
//! Runs one session full-screen and appends its summary to the session log.

use anyhow::{Context, Result};
use clap::Parser;
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::time::{SystemTime, UNIX_EPOCH};

use pvt::{
    cli::{Cli, FILE_ENV},
    clock::MonotonicClock,
    config::FileConfig,
    engine::Session,
    input::{InputSource, TerminalInput},
    record::{format_record, LogSink},
    report::SessionReport,
    ui::{restore_terminal, Surface, TerminalSurface},
};

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) => {
            let _ = e.print();
            std::process::exit(1);
        }
    };

    if let Err(e) = run(cli) {
        log::error!("{:#}", e);
        eprintln!("pvt: {:#}", e);
        std::process::exit(1);
    }
}

fn wall_clock_seed() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_nanos() as u64)
        .unwrap_or_default()
}

fn run(cli: Cli) -> Result<()> {
    let defaults = match &cli.config {
        Some(path) => Some(
            FileConfig::load_from(path)
                .with_context(|| format!("reading {}", path.display()))?,
        ),
        None => FileConfig::load().unwrap_or_else(|e| {
            log::warn!("ignoring defaults file: {}", e);
            None
        }),
    };

    let config = cli.configuration(defaults.as_ref())?;
    log::debug!("configuration {}", config);

    // A bad output path must fail before any trial runs
    let env_file = std::env::var_os(FILE_ENV).map(Into::into);
    let mut sink = cli
        .output_file(env_file, defaults.as_ref())
        .map(LogSink::open)
        .transpose()?;
    let started_at = chrono::Local::now();

    let seed = cli.seed.unwrap_or_else(wall_clock_seed);
    log::debug!("interval seed {}", seed);
    let mut session = Session::new(config, StdRng::seed_from_u64(seed))?;

    ctrlc::set_handler(|| {
        let _ = restore_terminal();
        std::process::exit(130);
    })
    .context("installing interrupt handler")?;

    let mut surface = TerminalSurface::init()?;
    let mut input = TerminalInput::new();
    let stats = session.run(&MonotonicClock, &mut input, &mut surface)?;

    let summary = session.summary();
    surface.show_summary(&summary)?;

    if let Some(sink) = sink.as_mut() {
        let record = format_record(&started_at, session.config(), &stats)?;
        sink.append(&record)?;
    }
    if let Some(path) = &cli.report {
        SessionReport::new(started_at, session.config(), session.log().events())
            .export_json(path)
            .with_context(|| format!("writing report {}", path.display()))?;
    }

    input.read_key()?;
    surface.restore()?;

    println!("Test Configuration: {}", summary.configuration);
    println!("Event count: {}", stats.stimuli_count);
    println!("Lapses: {}", stats.lapses);
    println!("False starts: {}", stats.false_starts);
    println!("Extraneous keypresses: {}", stats.errors);
    if let Some(median) = summary.latency.median_ms {
        println!("Median RT: {:.0} ms", median);
    }
    if let Some(sink) = &sink {
        println!("Record appended to {}", sink.path().display());
    }

    Ok(())
}
