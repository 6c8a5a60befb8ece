mod baseline;
mod check;
mod cli;
mod dashboard;
mod diff;
mod event_log;
mod fingerprint;
mod report;
mod scan;
mod session;

use cli::{Cli, Command};
use event_log::EventLog;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use tracing::error;
use tracing_subscriber::filter::EnvFilter;
use tracing_subscriber::fmt as tracing_fmt;
use tracing_subscriber::prelude::*;

struct SentryExitCode;

impl SentryExitCode {
    /// Exit code used when a check found anomalies.
    fn anomalies_found() -> ExitCode {
        ExitCode::from(1)
    }

    /// Exit code used for other errors (I/O errors, invalid arguments, etc.).
    fn any_error() -> ExitCode {
        ExitCode::from(255)
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    init_tracing(cli.verbose);

    let result: anyhow::Result<ExitCode> = match cli.command {
        Command::Init => handle_init(&cli.directory, &cli.baseline, &cli.log),
        Command::Check => handle_check(&cli.directory, &cli.baseline, &cli.log),
        Command::Report => handle_report(&cli.log),
        Command::Serve { bind } => handle_serve(&bind, &cli.log),
    };

    match result {
        Ok(exit_code) => exit_code,
        Err(err) => {
            error!("{err}");
            SentryExitCode::any_error()
        }
    }
}

/// Creates the watched directory on first run so the user has somewhere to
/// put files before initializing a baseline.
fn ensure_watched_directory(dir: &Path) -> anyhow::Result<()> {
    if !dir.exists() {
        std::fs::create_dir_all(dir)?;
        println!("Created watched directory: {}", dir.display());
        println!(
            "Add files to {} and run 'dirsentry init' to build a baseline.",
            dir.display()
        );
    }
    Ok(())
}

fn handle_init(
    dir: &PathBuf,
    baseline_path: &PathBuf,
    log_path: &PathBuf,
) -> anyhow::Result<ExitCode> {
    ensure_watched_directory(dir)?;

    let mut log = EventLog::open(log_path)?;
    let result = check::init_baseline(dir, baseline_path, &mut log)?;

    println!("Baseline created for {} files.", result.files_baselined);

    Ok(ExitCode::SUCCESS)
}

fn handle_check(
    dir: &PathBuf,
    baseline_path: &PathBuf,
    log_path: &PathBuf,
) -> anyhow::Result<ExitCode> {
    ensure_watched_directory(dir)?;

    let mut log = EventLog::open(log_path)?;
    let result = check::check_integrity(dir, baseline_path, &mut log)?;

    println!(
        "Integrity check complete. See '{}' for details.",
        log_path.display()
    );

    if result.classification.anomaly_count() > 0 {
        Ok(SentryExitCode::anomalies_found())
    } else {
        Ok(ExitCode::SUCCESS)
    }
}

fn handle_report(log_path: &PathBuf) -> anyhow::Result<ExitCode> {
    let report = report::build_report(log_path)?;
    print!("{}", report::render_text(&report));
    Ok(ExitCode::SUCCESS)
}

fn handle_serve(bind: &str, log_path: &Path) -> anyhow::Result<ExitCode> {
    dashboard::serve(bind, log_path)?;
    Ok(ExitCode::SUCCESS)
}

fn init_tracing(verbose: u8) {
    let default_level = match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };

    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    let fmt_layer = tracing_fmt::layer()
        .without_time()
        .with_target(false)
        .with_writer(std::io::stderr);

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt_layer)
        .init();
}
