use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand, ValueEnum};
use log::LevelFilter;
use standoff::poller::{ConfigIoError, PollerError};
use standoff::{replay, PollerParams, ReplayReport, ReplayScenario, TickOutcome};

#[derive(Parser, Debug)]
#[command(name = "standoff", version, about = "Fiducial standoff targeting tools")]
struct Cli {
    /// Log verbosity for library messages.
    #[arg(long, value_enum, default_value_t = LogLevel::Warn, global = true)]
    log_level: LogLevel,

    /// Emit logs as JSON through `tracing` (requires the `tracing` feature).
    #[arg(long, global = true)]
    json_logs: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Replay a scenario file through the alignment poller.
    Replay {
        /// Scenario JSON: `{ "params": {...}, "frames": [...] }`.
        scenario: PathBuf,
        /// Write the full per-tick report as JSON.
        #[arg(long)]
        report: Option<PathBuf>,
    },
    /// Print the default poller params as JSON, or write them to a file.
    Params {
        #[arg(long)]
        output: Option<PathBuf>,
    },
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum LogLevel {
    Off,
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl From<LogLevel> for LevelFilter {
    fn from(level: LogLevel) -> Self {
        match level {
            LogLevel::Off => LevelFilter::Off,
            LogLevel::Error => LevelFilter::Error,
            LogLevel::Warn => LevelFilter::Warn,
            LogLevel::Info => LevelFilter::Info,
            LogLevel::Debug => LevelFilter::Debug,
            LogLevel::Trace => LevelFilter::Trace,
        }
    }
}

#[derive(thiserror::Error, Debug)]
enum CliError {
    #[error("{path}: {source}")]
    Config {
        path: PathBuf,
        #[source]
        source: ConfigIoError,
    },
    #[error(transparent)]
    Poller(#[from] PollerError),
    #[error(transparent)]
    Json(#[from] serde_json::Error),
    #[error(transparent)]
    Logger(#[from] log::SetLoggerError),
    #[cfg(not(feature = "tracing"))]
    #[error("--json-logs needs a build with the `tracing` feature")]
    TracingUnavailable,
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("error: {err}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<(), CliError> {
    init_logging(&cli)?;
    match cli.command {
        Command::Replay { scenario, report } => run_replay(scenario, report),
        Command::Params { output } => run_params(output),
    }
}

fn init_logging(cli: &Cli) -> Result<(), CliError> {
    if cli.json_logs {
        #[cfg(feature = "tracing")]
        {
            standoff::init_tracing(true);
            return Ok(());
        }
        #[cfg(not(feature = "tracing"))]
        return Err(CliError::TracingUnavailable);
    }
    standoff::init_with_level(cli.log_level.into())?;
    Ok(())
}

fn run_replay(scenario_path: PathBuf, report_path: Option<PathBuf>) -> Result<(), CliError> {
    let scenario = ReplayScenario::load_json(&scenario_path).map_err(|source| CliError::Config {
        path: scenario_path.clone(),
        source,
    })?;
    let report = replay(&scenario)?;
    print_summary(&report);

    if let Some(path) = report_path {
        report
            .write_json(&path)
            .map_err(|source| CliError::Config { path, source })?;
    }
    Ok(())
}

fn run_params(output: Option<PathBuf>) -> Result<(), CliError> {
    let params = PollerParams::default();
    match output {
        Some(path) => params
            .write_json(&path)
            .map_err(|source| CliError::Config { path, source })?,
        None => println!("{}", serde_json::to_string_pretty(&params)?),
    }
    Ok(())
}

fn print_summary(report: &ReplayReport) {
    if let Some(name) = &report.name {
        println!("scenario: {name}");
    }
    for rec in &report.ticks {
        let what = match rec.outcome {
            TickOutcome::Pending { cycles } => format!("no target (cycle {cycles})"),
            TickOutcome::Succeeded(pose) => format!("standoff pose {pose}"),
            TickOutcome::TimedOut { cycles } => format!("timed out after {cycles} cycles"),
            TickOutcome::Inactive => "inactive".to_owned(),
        };
        match rec.selected_id {
            Some(id) => println!("tick {:>3}: {} target(s), tag {id}: {what}", rec.tick, rec.targets),
            None => println!("tick {:>3}: {} target(s): {what}", rec.tick, rec.targets),
        }
    }
    println!("phase: {}", report.phase);
    println!("cycles: {}", report.cycles);
    match report.pose {
        Some(pose) => println!("pose: {pose}"),
        None => println!("pose: none"),
    }
    if report.frames_exhausted {
        println!("frames exhausted before the run ended");
    }
}
