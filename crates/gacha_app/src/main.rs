mod config;
mod report;

use std::path::PathBuf;
use std::process::ExitCode;
use std::thread;
use std::time::Duration;

use anyhow::Context;
use clap::Parser;
use gacha_core::GachaReport;
use gacha_engine::{load_document, EngineEvent, SyncEngine, SyncEvent};
use sync_logging::{sync_debug, sync_error, LevelFilter, LogDestination};

const POLL_INTERVAL: Duration = Duration::from_millis(20);

/// Synchronize a player's gacha history and print a pity summary.
#[derive(Debug, Parser)]
#[command(name = "gacha-sync", version)]
struct Args {
    /// Player uid whose history is synchronized.
    #[arg(long)]
    player: String,

    /// Access token for the record service.
    #[arg(long, env = "GACHA_TOKEN", hide_env_values = true)]
    token: String,

    /// Directory holding one sub-directory per player.
    #[arg(long, default_value = "data")]
    data_dir: PathBuf,

    /// RON configuration file; defaults apply when it is missing.
    #[arg(long, default_value = "gacha_sync.ron")]
    config: PathBuf,

    /// Also write the log to this file.
    #[arg(long)]
    log_file: Option<PathBuf>,

    #[arg(short, long)]
    verbose: bool,
}

fn main() -> ExitCode {
    let args = Args::parse();

    let level = if args.verbose {
        LevelFilter::Debug
    } else {
        LevelFilter::Info
    };
    let destination = match &args.log_file {
        Some(path) => LogDestination::Both(path.clone()),
        None => LogDestination::Terminal,
    };
    if !sync_logging::initialize(destination, level) {
        eprintln!("Logging could not be initialized; continuing without it.");
    }

    match run(args) {
        Ok(code) => code,
        Err(err) => {
            sync_error!("{:#}", err);
            eprintln!("{err:#}");
            ExitCode::FAILURE
        }
    }
}

fn run(args: Args) -> anyhow::Result<ExitCode> {
    let config = config::load_config(&args.config);
    let engine = SyncEngine::new(config.engine_config(args.data_dir.clone()));

    engine
        .enqueue(args.player.as_str(), args.token)
        .context("could not start sync")?;

    let result = loop {
        match engine.try_recv() {
            Some(EngineEvent::Progress { event, .. }) => log_progress(&event),
            Some(EngineEvent::SyncCompleted { result, .. }) => break result,
            None => thread::sleep(POLL_INTERVAL),
        }
    };

    let outcome = match result {
        Ok(outcome) => outcome,
        Err(err) => {
            sync_error!("Sync for {} failed: {}", args.player, err);
            println!("{}", err.user_message());
            return Ok(ExitCode::FAILURE);
        }
    };

    let document = load_document(&outcome.document_path)
        .with_context(|| format!("synced document {:?} is unreadable", outcome.document_path))?;
    let report = GachaReport::build(&document, &config.catalog, &config.up_items);
    for line in report::summary_lines(&outcome, &report) {
        println!("{line}");
    }
    Ok(ExitCode::SUCCESS)
}

fn log_progress(event: &SyncEvent) {
    match event {
        SyncEvent::PageFetched {
            category,
            selector,
            page,
            accepted,
        } => sync_debug!(
            "Fetched {} page {} (selector {:?}): {} new",
            category,
            page,
            selector,
            accepted
        ),
        SyncEvent::CaughtUp {
            category,
            selector,
            known_max,
        } => sync_debug!(
            "{} records caught up at seq_id {} (selector {:?})",
            category,
            known_max,
            selector
        ),
    }
}
