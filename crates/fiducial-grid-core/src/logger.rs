//! Minimal logger.
//!
//! Prints `elapsed level target: message` lines to stderr. Install it once at
//! startup with [`init_with_level`]; library code only talks to the `log`
//! facade.

use std::io::Write;
use std::str::FromStr;
use std::sync::OnceLock;
use std::time::Instant;

use log::{LevelFilter, Log, Metadata, Record};

#[cfg(feature = "tracing")]
use tracing_subscriber::fmt::format::FmtSpan;
#[cfg(feature = "tracing")]
use tracing_subscriber::util::SubscriberInitExt;
#[cfg(feature = "tracing")]
use tracing_subscriber::{fmt, EnvFilter};

struct FrameLogger {
    level: LevelFilter,
    started: Instant,
}

/// `fiducial_grid_ellipse::detector` -> `ellipse::detector`.
fn short_target(target: &str) -> &str {
    target
        .strip_prefix("fiducial_grid_")
        .or_else(|| target.strip_prefix("fiducial_grid::"))
        .unwrap_or(target)
}

impl Log for FrameLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= self.level
    }

    fn log(&self, record: &Record) {
        if !self.enabled(record.metadata()) {
            return;
        }
        let ms = self.started.elapsed().as_millis();
        let mut stderr = std::io::stderr().lock();
        let _ = writeln!(
            stderr,
            "{:>7}ms {:<5} {}: {}",
            ms,
            record.level(),
            short_target(record.target()),
            record.args()
        );
    }

    fn flush(&self) {
        let _ = std::io::stderr().flush();
    }
}

static LOGGER: OnceLock<FrameLogger> = OnceLock::new();

/// Install the stderr logger.
///
/// Only the first call installs anything; later calls keep the first level.
pub fn init_with_level(level: LevelFilter) -> Result<(), log::SetLoggerError> {
    let mut fresh = false;
    let logger = LOGGER.get_or_init(|| {
        fresh = true;
        FrameLogger {
            level,
            started: Instant::now(),
        }
    });
    if fresh {
        log::set_logger(logger)?;
        log::set_max_level(logger.level);
    }
    Ok(())
}

/// Parse a level name (`"info"`, `"debug"`, ...) falling back to `Info`.
pub fn parse_level(name: &str) -> LevelFilter {
    LevelFilter::from_str(name).unwrap_or(LevelFilter::Info)
}

#[cfg(feature = "tracing")]
fn default_directive(level: LevelFilter) -> String {
    level.to_string().to_lowercase()
}

/// Install a `tracing` subscriber; `RUST_LOG` wins over `default_level`.
#[cfg(feature = "tracing")]
pub fn init_tracing_with_level(json: bool, default_level: LevelFilter) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_directive(default_level)));
    if json {
        let _ = fmt()
            .with_env_filter(filter)
            .with_span_events(FmtSpan::CLOSE)
            .json()
            .flatten_event(true)
            .finish()
            .try_init();
    } else {
        let _ = fmt()
            .with_env_filter(filter)
            .with_span_events(FmtSpan::CLOSE)
            .with_timer(fmt::time::Uptime::default())
            .finish()
            .try_init();
    }
}

#[cfg(feature = "tracing")]
pub fn init_tracing(json: bool) {
    init_tracing_with_level(json, LevelFilter::Info);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_level_accepts_names_and_falls_back() {
        assert_eq!(parse_level("debug"), LevelFilter::Debug);
        assert_eq!(parse_level("WARN"), LevelFilter::Warn);
        assert_eq!(parse_level("chatty"), LevelFilter::Info);
    }

    #[cfg(feature = "tracing")]
    #[test]
    fn tracing_filter_follows_the_requested_level() {
        assert_eq!(default_directive(parse_level("debug")), "debug");
        assert_eq!(default_directive(LevelFilter::Off), "off");
        assert!(EnvFilter::try_new(default_directive(LevelFilter::Warn)).is_ok());
    }

    #[test]
    fn targets_drop_the_workspace_prefix() {
        assert_eq!(short_target("fiducial_grid_ellipse::detector"), "ellipse::detector");
        assert_eq!(short_target("fiducial_grid::tracker"), "tracker");
        assert_eq!(short_target("fiducial_grid"), "fiducial_grid");
    }
}
