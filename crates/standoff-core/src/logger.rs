//! Driver-station console logger.
//!
//! Lines look like `[  12.345s] DEBUG   poller: [align] cycle 3: no target`.
//! The elapsed time counts from installation, which on the robot is roughly
//! robot-code start, so lines can be matched against the match timeline.
//! The component is the module that logged (`select`, `resolve`, `poller`,
//! `lease`, ...).
//!
//! The console is shared with every other library in the robot program.
//! Records from outside the `standoff*` crates are only shown at `Warn` and
//! above, whatever the configured level.

use std::io::Write;
use std::sync::OnceLock;
use std::time::Instant;

use log::{Level, LevelFilter, Log, Metadata, Record};

#[cfg(feature = "tracing")]
use tracing_subscriber::fmt::format::FmtSpan;
#[cfg(feature = "tracing")]
use tracing_subscriber::util::SubscriberInitExt;
#[cfg(feature = "tracing")]
use tracing_subscriber::{fmt, EnvFilter};

const OWN_CRATE_PREFIX: &str = "standoff";

struct ConsoleLogger {
    level: LevelFilter,
    started: Instant,
}

impl Log for ConsoleLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        admits(self.level, metadata.level(), metadata.target())
    }

    fn log(&self, record: &Record) {
        if !self.enabled(record.metadata()) {
            return;
        }

        let line = format_line(
            self.started.elapsed().as_secs_f64(),
            record.level(),
            record.target(),
            record.args(),
        );
        let mut stderr = std::io::stderr().lock();
        let _ = writeln!(stderr, "{line}");
    }

    fn flush(&self) {
        let _ = std::io::stderr().flush();
    }
}

/// Whether a record at `level` from `target` passes `filter`.
fn admits(filter: LevelFilter, level: Level, target: &str) -> bool {
    if level > filter {
        return false;
    }
    target.starts_with(OWN_CRATE_PREFIX) || level <= Level::Warn
}

/// Short component label: the last module path segment, or the crate name
/// for records logged at a crate root.
fn component(target: &str) -> &str {
    target.rsplit("::").next().unwrap_or(target)
}

fn format_line(elapsed_s: f64, level: Level, target: &str, msg: impl std::fmt::Display) -> String {
    format!(
        "[{elapsed_s:9.3}s] {level:<5} {:>8}: {msg}",
        component(target)
    )
}

static LOGGER: OnceLock<ConsoleLogger> = OnceLock::new();

/// Install the console logger with the provided level filter.
///
/// Only the first call installs a logger; later calls are no-ops and keep
/// the first level.
pub fn init_with_level(level: LevelFilter) -> Result<(), log::SetLoggerError> {
    if LOGGER.get().is_none() {
        let logger = LOGGER.get_or_init(|| ConsoleLogger {
            level,
            started: Instant::now(),
        });
        log::set_logger(logger)?;
        log::set_max_level(level);
    }
    Ok(())
}

/// Install a `tracing` subscriber filtered by `RUST_LOG` (default `info`).
///
/// With `json = true` events and closed spans are emitted as flattened JSON
/// lines, suitable for post-match log scraping.
#[cfg(feature = "tracing")]
pub fn init_tracing(json: bool) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let builder = fmt()
        .with_env_filter(filter)
        .with_span_events(FmtSpan::CLOSE)
        .with_target(true);
    if json {
        let _ = builder.json().flatten_event(true).finish().try_init();
    } else {
        let _ = builder
            .with_timer(fmt::time::Uptime::default())
            .finish()
            .try_init();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn own_records_follow_the_filter() {
        assert!(admits(LevelFilter::Debug, Level::Debug, "standoff_poller::poller"));
        assert!(!admits(LevelFilter::Info, Level::Debug, "standoff_core::resolve"));
        assert!(!admits(LevelFilter::Off, Level::Error, "standoff_poller::lease"));
    }

    #[test]
    fn foreign_records_need_warn() {
        assert!(!admits(LevelFilter::Trace, Level::Info, "wpilib::scheduler"));
        assert!(admits(LevelFilter::Trace, Level::Warn, "wpilib::scheduler"));
        assert!(!admits(LevelFilter::Error, Level::Warn, "wpilib::scheduler"));
    }

    #[test]
    fn line_carries_component_label() {
        assert_eq!(component("standoff_poller::poller"), "poller");
        assert_eq!(component("standoff_core"), "standoff_core");
        let line = format_line(12.3456, Level::Debug, "standoff_poller::poller", "cycle 3");
        assert_eq!(line, "[   12.346s] DEBUG   poller: cycle 3");
    }
}
