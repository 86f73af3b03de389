#![deny(missing_docs)]
//! Shared logging utilities for the signage workspace.
//!
//! This crate provides the `signage_*` logging macros used across the codebase
//! and a minimal test initializer for the global logger. Every line is stamped
//! with the clock reading the current thread is working against, so logs from
//! simulated clocks line up with the scheduling decisions they describe.

use std::cell::Cell;

#[doc(hidden)]
pub use log as __log;

thread_local! {
    /// Thread-local storage for the epoch-millisecond reading being processed.
    static CLOCK_READING: Cell<i64> = const { Cell::new(0) };
}

/// Records the clock reading (epoch milliseconds) the current thread is
/// acting on. Runtime loops call this before dispatching timers or messages.
pub fn set_clock_reading(epoch_ms: i64) {
    CLOCK_READING.with(|v| v.set(epoch_ms));
}

/// Retrieves the clock reading for the current thread.
/// Returns 0 if no reading has been recorded.
pub fn clock_reading() -> i64 {
    CLOCK_READING.with(|v| v.get())
}

/// Logs a trace-level message stamped with the current clock reading.
#[macro_export]
macro_rules! signage_trace {
    ($($arg:tt)*) => {{
        $crate::__log::trace!("[t={}] {}", $crate::clock_reading(), format_args!($($arg)*));
    }};
}

/// Logs a debug-level message stamped with the current clock reading.
#[macro_export]
macro_rules! signage_debug {
    ($($arg:tt)*) => {{
        $crate::__log::debug!("[t={}] {}", $crate::clock_reading(), format_args!($($arg)*));
    }};
}

/// Logs an info-level message stamped with the current clock reading.
#[macro_export]
macro_rules! signage_info {
    ($($arg:tt)*) => {{
        $crate::__log::info!("[t={}] {}", $crate::clock_reading(), format_args!($($arg)*));
    }};
}

/// Logs a warn-level message stamped with the current clock reading.
#[macro_export]
macro_rules! signage_warn {
    ($($arg:tt)*) => {{
        $crate::__log::warn!("[t={}] {}", $crate::clock_reading(), format_args!($($arg)*));
    }};
}

/// Logs an error-level message stamped with the current clock reading.
#[macro_export]
macro_rules! signage_error {
    ($($arg:tt)*) => {{
        $crate::__log::error!("[t={}] {}", $crate::clock_reading(), format_args!($($arg)*));
    }};
}

/// Initializes a simple terminal logger for use in unit tests.
///
/// This safely no-ops if another logger has already been initialized.
pub fn initialize_for_tests() {
    use simplelog::{ColorChoice, CombinedLogger, Config, TermLogger, TerminalMode};

    // Use debug level in debug builds, info in release builds.
    let level = if cfg!(debug_assertions) {
        log::LevelFilter::Debug
    } else {
        log::LevelFilter::Info
    };

    // Ignore the error if a logger was already set by another test.
    let _ = CombinedLogger::init(vec![TermLogger::new(
        level,
        Config::default(),
        TerminalMode::Mixed,
        ColorChoice::Auto,
    )]);
}
