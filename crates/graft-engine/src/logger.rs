//! Init-time diagnostics logger
//!
//! Registration runs once at process startup, before the runtime's own
//! logging facilities exist, so this is a plain leveled stdout/stderr logger.
//! Debug output is gated by the `GRAFT_LOG` environment variable
//! (`GRAFT_LOG=debug`).

use once_cell::sync::Lazy;

static DEBUG_ENABLED: Lazy<bool> =
    Lazy::new(|| std::env::var("GRAFT_LOG").map(|v| v == "debug").unwrap_or(false));

/// Log a debug message to stdout (only when `GRAFT_LOG=debug`)
pub fn debug(message: &str) {
    if *DEBUG_ENABLED {
        println!("[DEBUG] {}", message);
    }
}

/// Log an info message to stdout
pub fn info(message: &str) {
    println!("{}", message);
}

/// Log a warning message to stderr
pub fn warn(message: &str) {
    eprintln!("[WARN] {}", message);
}

/// Log an error message to stderr
pub fn error(message: &str) {
    eprintln!("[ERROR] {}", message);
}
