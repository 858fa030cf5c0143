#![deny(missing_docs)]
//! Shared logging utilities for the image checker workspace.
//!
//! Every crate logs through the `checker_*` macros. The binary picks a
//! [`LogDestination`] from its config; tests install a harness-captured logger.

use std::fs::File;
use std::path::PathBuf;

use log::LevelFilter;
use simplelog::{
    ColorChoice, CombinedLogger, Config, ConfigBuilder, SharedLogger, TermLogger, TerminalMode,
    TestLogger, WriteLogger,
};

/// File name used when logging to disk, relative to the working directory.
pub const LOG_FILE_NAME: &str = "image_checker.log";

/// Logs a trace-level message using the global logging facade.
#[macro_export]
macro_rules! checker_trace {
    ($($arg:tt)*) => {{
        log::trace!($($arg)*);
    }};
}

/// Logs an info-level message using the global logging facade.
#[macro_export]
macro_rules! checker_info {
    ($($arg:tt)*) => {{
        log::info!($($arg)*);
    }};
}

/// Logs a debug-level message using the global logging facade.
#[macro_export]
macro_rules! checker_debug {
    ($($arg:tt)*) => {{
        log::debug!($($arg)*);
    }};
}

/// Logs a warn-level message using the global logging facade.
#[macro_export]
macro_rules! checker_warn {
    ($($arg:tt)*) => {{
        log::warn!($($arg)*);
    }};
}

/// Logs an error-level message using the global logging facade.
#[macro_export]
macro_rules! checker_error {
    ($($arg:tt)*) => {{
        log::error!($($arg)*);
    }};
}

/// Where the checker writes its log lines.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogDestination {
    /// Only [`LOG_FILE_NAME`] in the working directory.
    File,
    /// Only the terminal; warnings and errors go to stderr.
    #[default]
    Terminal,
    /// The terminal and [`LOG_FILE_NAME`].
    Both,
}

/// Installs the global logger for the checker binary.
///
/// File destinations truncate [`LOG_FILE_NAME`] at startup. When the file cannot
/// be created, `Both` falls back to the terminal and `File` logs nothing. Only
/// the first call in a process takes effect.
pub fn initialize(destination: LogDestination, level: LevelFilter) {
    let config = build_config();

    let loggers: Vec<Box<dyn SharedLogger>> = match destination {
        LogDestination::File => match create_file_logger(level, config) {
            Some(file_logger) => vec![file_logger],
            None => return,
        },
        LogDestination::Terminal => vec![terminal_logger(level, config)],
        LogDestination::Both => {
            let mut loggers = vec![terminal_logger(level, config.clone())];
            if let Some(file_logger) = create_file_logger(level, config) {
                loggers.push(file_logger);
            }
            loggers
        }
    };

    let _ = CombinedLogger::init(loggers);
}

/// Routes checker log lines into the test harness output.
///
/// Each test binary calls this from a `Once`; a second install attempt is
/// harmless and leaves the first logger in place.
pub fn initialize_for_tests() {
    let level = if cfg!(debug_assertions) {
        LevelFilter::Debug
    } else {
        LevelFilter::Info
    };

    // `TestLogger` prints through the harness, so output shows up only for failing tests.
    let _ = TestLogger::init(level, build_config());
}

fn build_config() -> Config {
    ConfigBuilder::new()
        .set_time_format_rfc3339()
        .set_target_level(LevelFilter::Error)
        .build()
}

fn terminal_logger(level: LevelFilter, config: Config) -> Box<dyn SharedLogger> {
    TermLogger::new(level, config, TerminalMode::Mixed, ColorChoice::Auto)
}

fn create_file_logger(level: LevelFilter, config: Config) -> Option<Box<dyn SharedLogger>> {
    let log_path = PathBuf::from(".").join(LOG_FILE_NAME);
    match File::create(&log_path) {
        Ok(file) => {
            let logger: Box<dyn SharedLogger> = WriteLogger::new(level, config, file);
            Some(logger)
        }
        Err(err) => {
            // The logger is not up yet, so this goes straight to stderr.
            eprintln!("image_checker: no log file at {}: {err}", log_path.display());
            None
        }
    }
}
