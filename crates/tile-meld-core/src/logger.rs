//! Stderr logging for the melding tools.
//!
//! [`init_with_level`] installs a `log` backend printing
//! `[elapsed LEVEL target] message`. Records from our own crates follow the
//! requested level; everything else is capped at `warn` so a `debug` run is
//! not flooded by image decoders. With the `tracing` feature,
//! [`init_tracing`] installs a `tracing-subscriber` instead.

use std::fmt;
use std::io::Write;
use std::sync::OnceLock;
use std::time::Instant;

use log::{Level, LevelFilter, Log, Metadata, Record};

#[cfg(feature = "tracing")]
use tracing_subscriber::fmt::format::FmtSpan;
#[cfg(feature = "tracing")]
use tracing_subscriber::util::SubscriberInitExt;
#[cfg(feature = "tracing")]
use tracing_subscriber::EnvFilter;

/// Environment variable read by [`level_from_env`].
pub const LOG_ENV: &str = "TILE_MELD_LOG";

const OWN_TARGET_PREFIX: &str = "tile_meld";
const FOREIGN_CAP: LevelFilter = LevelFilter::Warn;

struct MeldLogger {
    level: LevelFilter,
    started: Instant,
}

impl MeldLogger {
    fn max_level_for(&self, target: &str) -> LevelFilter {
        if target.starts_with(OWN_TARGET_PREFIX) {
            self.level
        } else {
            self.level.min(FOREIGN_CAP)
        }
    }
}

impl Log for MeldLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= self.max_level_for(metadata.target())
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
        let _ = std::io::stderr().lock().write_all(line.as_bytes());
    }

    fn flush(&self) {
        let _ = std::io::stderr().flush();
    }
}

fn format_line(elapsed: f64, level: Level, target: &str, args: &fmt::Arguments) -> String {
    format!("[{elapsed:7.3}s {level:>5} {target}] {args}\n")
}

/// Parse a level name, falling back to `default` when absent or unknown.
pub fn parse_level_or(value: Option<&str>, default: LevelFilter) -> LevelFilter {
    value
        .and_then(|v| v.trim().parse::<LevelFilter>().ok())
        .unwrap_or(default)
}

/// Level named by `TILE_MELD_LOG`, or `default`.
pub fn level_from_env(default: LevelFilter) -> LevelFilter {
    parse_level_or(std::env::var(LOG_ENV).ok().as_deref(), default)
}

static LOGGER: OnceLock<MeldLogger> = OnceLock::new();

/// Install the stderr logger. Calls after the first one are no-ops.
pub fn init_with_level(level: LevelFilter) -> Result<(), log::SetLoggerError> {
    if LOGGER.get().is_some() {
        return Ok(());
    }
    let logger = LOGGER.get_or_init(|| MeldLogger {
        level,
        started: Instant::now(),
    });
    log::set_logger(logger)?;
    log::set_max_level(level);
    Ok(())
}

/// `EnvFilter` directive used when `RUST_LOG` is unset.
#[cfg(feature = "tracing")]
fn default_directive(level: LevelFilter) -> String {
    level.as_str().to_ascii_lowercase()
}

/// Install a `tracing` subscriber on stderr.
///
/// `RUST_LOG` wins when set; otherwise `default_level` applies.
#[cfg(feature = "tracing")]
pub fn init_tracing(json: bool, default_level: LevelFilter) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_directive(default_level)));
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_span_events(FmtSpan::CLOSE)
        .with_writer(std::io::stderr);
    let _ = if json {
        builder.json().flatten_event(true).finish().try_init()
    } else {
        builder
            .with_timer(tracing_subscriber::fmt::time::Uptime::default())
            .finish()
            .try_init()
    };
}
