//! Console logger used by the `greenmove` CLI.
//!
//! - `log-info` enables `info!` output (enabled by default).
//! - `log-debug` enables `debug!` output and a runtime debug flag.
//! - `file-logging` lets level-tagged messages go to a file instead of the console.
//! - `warn!` and `error!` are always active.
//!
//! Besides the levelled macros the crate prints the advisory lines a batch
//! report run shows to the user:
//! - `progress!` prints untagged progress text on stdout,
//! - `success!` prints a `✓` line on stdout,
//! - `failure!` prints a `✗` line on stderr.
//!
//! Quiet mode (`set_quiet(true)`) silences `progress!` and `success!`.
//! `failure!` always prints.

use std::fmt::Arguments;
use std::sync::atomic::{AtomicBool, AtomicU8, Ordering};

#[cfg(feature = "file-logging")]
use std::{
    fs::{File, OpenOptions},
    io::Write,
    sync::{LazyLock, Mutex},
};

/// Logging levels.
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord)]
pub enum Level {
    /// Error-level messages (always enabled).
    Error = 1,
    /// Warning-level messages (always enabled).
    Warn = 2,
    /// Info-level messages (requires `log-info` feature).
    Info = 3,
    /// Debug-level messages (requires `log-debug` feature and runtime flag).
    Debug = 4,
}

impl Level {
    /// Tag printed in front of messages at this level.
    #[must_use]
    pub const fn tag(self) -> &'static str {
        match self {
            Self::Error => "[ERROR]",
            Self::Warn => "[WARN]",
            Self::Info => "[INFO]",
            Self::Debug => "[DEBUG]",
        }
    }

    /// Parse a level name (case-insensitive).
    #[must_use]
    pub fn parse(name: &str) -> Option<Self> {
        match name.trim().to_ascii_lowercase().as_str() {
            "error" | "err" => Some(Self::Error),
            "warn" | "warning" => Some(Self::Warn),
            "info" => Some(Self::Info),
            "debug" => Some(Self::Debug),
            _ => None,
        }
    }
}

/// Status marker for advisory lines.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Status {
    /// Operation completed.
    Success,
    /// Operation failed.
    Failure,
}

impl Status {
    /// Glyph printed in front of the line.
    #[must_use]
    pub const fn marker(self) -> &'static str {
        match self {
            Self::Success => "✓",
            Self::Failure => "✗",
        }
    }
}

/// Determine the default logging level based on enabled features.
const fn default_level() -> u8 {
    if cfg!(feature = "log-debug") {
        Level::Debug as u8
    } else if cfg!(feature = "log-info") {
        Level::Info as u8
    } else {
        Level::Warn as u8
    }
}

/// Global storage for the current log level.
static LOG_LEVEL: AtomicU8 = AtomicU8::new(default_level());
/// Runtime flag controlling whether `debug!` messages should emit.
#[cfg(feature = "log-debug")]
static DEBUG_ENABLED: AtomicBool = AtomicBool::new(false);
/// Quiet mode: suppresses progress and success lines.
static QUIET: AtomicBool = AtomicBool::new(false);
/// Log file handle once `init_file_logging` succeeded.
#[cfg(feature = "file-logging")]
static LOG_FILE: LazyLock<Mutex<Option<File>>> = LazyLock::new(|| Mutex::new(None));

/// Set the global log level.
pub fn set_level(level: Level) {
    LOG_LEVEL.store(level as u8, Ordering::SeqCst);
}

/// Current global log level.
#[must_use]
pub fn level() -> Level {
    match LOG_LEVEL.load(Ordering::SeqCst) {
        1 => Level::Error,
        2 => Level::Warn,
        3 => Level::Info,
        _ => Level::Debug,
    }
}

/// Parse and set level from a string (case-insensitive). Returns true on success.
#[must_use]
pub fn set_level_from_str(level: &str) -> bool {
    Level::parse(level).is_some_and(|lvl| {
        set_level(lvl);
        true
    })
}

/// Enable debug logging at runtime (no-op when log-debug is disabled).
#[cfg(feature = "log-debug")]
pub fn enable_debug() {
    DEBUG_ENABLED.store(true, Ordering::SeqCst);
}
#[cfg(not(feature = "log-debug"))]
/// Enable debug logging at runtime (no-op when log-debug is disabled).
pub fn enable_debug() {}

/// Disable debug logging at runtime (no-op when log-debug is disabled).
#[cfg(feature = "log-debug")]
pub fn disable_debug() {
    DEBUG_ENABLED.store(false, Ordering::SeqCst);
}
#[cfg(not(feature = "log-debug"))]
/// Disable debug logging at runtime (no-op when log-debug is disabled).
pub fn disable_debug() {}

/// Returns whether debug logging is enabled (false if `log-debug` is disabled).
#[cfg(feature = "log-debug")]
pub fn is_debug_enabled() -> bool {
    DEBUG_ENABLED.load(Ordering::SeqCst)
}

/// Returns whether debug logging is enabled (false if `log-debug` is disabled).
#[cfg(not(feature = "log-debug"))]
pub const fn is_debug_enabled() -> bool {
    false
}

/// Turn quiet mode on or off.
pub fn set_quiet(quiet: bool) {
    QUIET.store(quiet, Ordering::SeqCst);
}

/// Returns whether quiet mode is on.
pub fn is_quiet() -> bool {
    QUIET.load(Ordering::SeqCst)
}

/// Initialize file logging to the specified path.
/// Returns true on success, false on failure.
#[cfg(feature = "file-logging")]
#[must_use]
pub fn init_file_logging(path: &std::path::Path) -> bool {
    let Ok(file) = OpenOptions::new().create(true).append(true).open(path) else {
        return false;
    };
    LOG_FILE.lock().is_ok_and(|mut log_file| {
        *log_file = Some(file);
        true
    })
}

/// Initialize file logging to the specified path.
/// Always fails when the `file-logging` feature is disabled.
#[cfg(not(feature = "file-logging"))]
#[must_use]
pub const fn init_file_logging(_path: &std::path::Path) -> bool {
    false
}

/// Stop writing to the log file; messages go back to the console.
#[cfg(feature = "file-logging")]
pub fn close_file_logging() {
    if let Ok(mut log_file) = LOG_FILE.lock() {
        *log_file = None;
    }
}

/// Stop writing to the log file (no-op when file logging is disabled).
#[cfg(not(feature = "file-logging"))]
pub const fn close_file_logging() {}

/// Write a line to the log file. Returns false when no file is active.
#[cfg(feature = "file-logging")]
fn write_to_file(message: &str) -> bool {
    let Ok(mut log_file) = LOG_FILE.lock() else {
        return false;
    };
    match log_file.as_mut() {
        Some(file) => {
            let _ = writeln!(file, "{message}");
            let _ = file.flush();
            true
        }
        None => false,
    }
}

#[cfg(not(feature = "file-logging"))]
const fn write_to_file(_message: &str) -> bool {
    false
}

/// Decide whether a message at `level` should be emitted.
fn should_log(level: Level) -> bool {
    match level {
        Level::Info if !cfg!(feature = "log-info") => return false,
        Level::Debug if !cfg!(feature = "log-debug") => return false,
        _ => {}
    }

    let current = LOG_LEVEL.load(Ordering::SeqCst);
    (level as u8) <= current && (level != Level::Debug || is_debug_enabled())
}

/// Internal logging dispatch used by the levelled macros.
///
/// Tagged messages go to the log file when one is active; otherwise warnings
/// and errors go to stderr and the rest to stdout.
pub fn log_impl(level: Level, args: Arguments) {
    if !should_log(level) {
        return;
    }
    let line = format!("{} {args}", level.tag());
    if write_to_file(&line) {
        return;
    }
    if level <= Level::Warn {
        eprintln!("{line}");
    } else {
        println!("{line}");
    }
}

/// Internal dispatch for `success!` / `failure!`.
///
/// The line is also copied to the log file when one is active, so a batch
/// run leaves a trace of every artifact it produced or skipped.
pub fn status_impl(status: Status, args: Arguments) {
    let line = format!("{} {args}", status.marker());
    let _ = write_to_file(&line);
    match status {
        Status::Success if !is_quiet() => println!("{line}"),
        Status::Success => {}
        Status::Failure => eprintln!("{line}"),
    }
}

/// Internal dispatch for `progress!`.
pub fn progress_impl(args: Arguments) {
    if !is_quiet() {
        println!("{args}");
    }
}

/// Logs an error-level message (always enabled). Emits to stderr on the console.
#[macro_export]
macro_rules! error {
    ($($arg:tt)*) => { $crate::log_impl($crate::Level::Error, format_args!($($arg)*)) };
}

/// Logs a warning-level message (always enabled). Emits to stderr on the console.
#[macro_export]
macro_rules! warn {
    ($($arg:tt)*) => { $crate::log_impl($crate::Level::Warn, format_args!($($arg)*)) };
}

/// Logs an info-level message (requires `log-info` feature).
#[macro_export]
macro_rules! info {
    ($($arg:tt)*) => { $crate::log_impl($crate::Level::Info, format_args!($($arg)*)) };
}

/// Logs a debug-level message (requires `log-debug` feature and runtime enablement).
#[macro_export]
macro_rules! debug {
    ($($arg:tt)*) => { $crate::log_impl($crate::Level::Debug, format_args!($($arg)*)) };
}

/// Prints untagged progress text; silent in quiet mode.
#[macro_export]
macro_rules! progress {
    ($($arg:tt)*) => { $crate::progress_impl(format_args!($($arg)*)) };
}

/// Prints a `✓`-prefixed line; silent in quiet mode.
#[macro_export]
macro_rules! success {
    ($($arg:tt)*) => { $crate::status_impl($crate::Status::Success, format_args!($($arg)*)) };
}

/// Prints a `✗`-prefixed line on stderr, even in quiet mode.
#[macro_export]
macro_rules! failure {
    ($($arg:tt)*) => { $crate::status_impl($crate::Status::Failure, format_args!($($arg)*)) };
}

#[cfg(test)]
mod tests {
    use super::{Level, Status};

    #[test]
    fn level_parse_is_case_insensitive() {
        assert_eq!(Level::parse("INFO"), Some(Level::Info));
        assert_eq!(Level::parse(" warning "), Some(Level::Warn));
        assert_eq!(Level::parse("err"), Some(Level::Error));
        assert_eq!(Level::parse("trace"), None);
    }

    #[test]
    fn levels_are_ordered_by_verbosity() {
        assert!(Level::Error < Level::Warn);
        assert!(Level::Warn < Level::Info);
        assert!(Level::Info < Level::Debug);
    }

    #[test]
    fn status_markers() {
        assert_eq!(Status::Success.marker(), "✓");
        assert_eq!(Status::Failure.marker(), "✗");
    }

    #[test]
    fn macros_do_not_panic() {
        crate::info!("info {}", 1);
        crate::warn!("warn {}", 2);
        crate::error!("error {}", 3);
        crate::success!("done {}", 4);
        crate::failure!("failed {}", 5);
        crate::progress!("step {}", 6);
    }
}
