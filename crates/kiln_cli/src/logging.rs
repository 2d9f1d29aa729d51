//! Logging setup for the `kiln` binary.
//!
//! Uses the `log` facade with the `env_logger` backend. The level comes from,
//! in priority order:
//!
//! 1. the `RUST_LOG` environment variable,
//! 2. `--quiet` (errors only) or `-v` flags,
//! 3. `[log] level` in `kiln.toml` (default: warn).

use std::env;
use std::io::Write;

use env_logger::Builder;
use kiln_config::LogLevel;
use log::LevelFilter;

/// Initializes the global logger. Later calls are ignored.
pub fn init_logging(verbose: u8, quiet: bool, configured: LogLevel) {
    let mut builder = Builder::new();

    if env::var_os("RUST_LOG").is_some() {
        builder.parse_default_env();
    } else {
        builder.filter_level(determine_level(verbose, quiet, configured));
    }

    builder.format(|buf, record| {
        let level = record.level();
        let style = buf.default_level_style(level);
        writeln!(buf, "{style}{level:<5}{style:#} {}", record.args())
    });

    // Tests and embedders may have installed a logger already.
    let _ = builder.try_init();
}

/// Determines the log level from CLI flags and the configured default.
fn determine_level(verbose: u8, quiet: bool, configured: LogLevel) -> LevelFilter {
    if quiet {
        return LevelFilter::Error;
    }
    match verbose {
        0 => to_filter(configured),
        1 => LevelFilter::Info,
        2 => LevelFilter::Debug,
        _ => LevelFilter::Trace,
    }
}

fn to_filter(level: LogLevel) -> LevelFilter {
    match level {
        LogLevel::Error => LevelFilter::Error,
        LogLevel::Warn => LevelFilter::Warn,
        LogLevel::Info => LevelFilter::Info,
        LogLevel::Debug => LevelFilter::Debug,
        LogLevel::Trace => LevelFilter::Trace,
    }
}
