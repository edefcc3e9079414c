//! Headless command-line driver.
//!
//! # Responsibility
//! - Probe core linkage (`ping`).
//! - Replay newline-delimited relay payloads through a headless scene
//!   (`replay`) and report what was admitted.
//!
//! # Invariants
//! - Malformed lines are counted, never fatal.
//! - Output is `key=value` lines for scripting.

use clap::{Parser, Subcommand};
use log::info;
use onosendai_core::db::{open_db, open_db_in_memory};
use onosendai_core::logging::init_logging_from_config;
use onosendai_core::{
    CoreConfig, HeadlessPresenter, HeadlessRenderer, IngestOutcome, SceneController,
    SqliteKvSink,
};
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Check that the core library links and report its version
    Ping,
    /// Feed newline-delimited relay events through a headless scene
    Replay {
        /// File with one JSON event per line
        events: PathBuf,
        /// JSON session config; defaults apply when omitted
        config: Option<PathBuf>,
    },
}

#[derive(Debug, Default)]
struct ReplaySummary {
    lines: usize,
    admitted: usize,
    duplicate: usize,
    malformed: usize,
    events: usize,
    bookmarks: usize,
}

fn main() -> ExitCode {
    let args = Args::parse();
    let result = match args.command {
        Command::Ping => {
            println!("onosendai_core ping={}", onosendai_core::ping());
            println!("onosendai_core version={}", onosendai_core::core_version());
            Ok(())
        }
        Command::Replay { events, config } => replay(&events, config.as_deref()),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(message) => {
            eprintln!("{message}");
            ExitCode::FAILURE
        }
    }
}

fn replay(events_path: &Path, config_path: Option<&Path>) -> Result<(), String> {
    let config = match config_path {
        Some(path) => CoreConfig::load_from_path(path).map_err(|err| err.to_string())?,
        None => CoreConfig::default(),
    };
    init_logging_from_config(&config)?;

    let conn = match config.db_path.as_ref() {
        Some(path) => open_db(path),
        None => open_db_in_memory(),
    }
    .map_err(|err| err.to_string())?;
    let sink = SqliteKvSink::new(&conn).with_quota(config.storage_quota_bytes);

    let mut controller = SceneController::with_config(
        HeadlessRenderer::new(),
        HeadlessPresenter::new(),
        sink,
        &config,
    );

    let file = File::open(events_path)
        .map_err(|err| format!("failed to open `{}`: {err}", events_path.display()))?;
    let mut summary = ReplaySummary::default();
    for line in BufReader::new(file).lines() {
        let line =
            line.map_err(|err| format!("failed to read `{}`: {err}", events_path.display()))?;
        if line.trim().is_empty() {
            continue;
        }
        summary.lines += 1;
        match controller.ingest_json(&line) {
            IngestOutcome::Admitted(_) => summary.admitted += 1,
            IngestOutcome::Duplicate => summary.duplicate += 1,
            IngestOutcome::Malformed(_) => summary.malformed += 1,
        }
    }
    summary.events = controller.event_count();
    summary.bookmarks = controller.bookmarks().len();

    info!(
        "event=replay module=cli status=ok session_id={} lines={} admitted={} duplicate={} malformed={}",
        controller.session_id(),
        summary.lines,
        summary.admitted,
        summary.duplicate,
        summary.malformed
    );
    print_summary(&summary);
    Ok(())
}

fn print_summary(summary: &ReplaySummary) {
    println!("lines={}", summary.lines);
    println!("admitted={}", summary.admitted);
    println!("duplicate={}", summary.duplicate);
    println!("malformed={}", summary.malformed);
    println!("events={}", summary.events);
    println!("bookmarks={}", summary.bookmarks);
}
