//! Logging utilities for the ThingsDB Firebase module.
//!
//! The host owns the module's stdout for package traffic, so every log line
//! goes to stderr. ThingsDB forwards module stderr into its own log.

use tracing::{error, info, Level};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Crate targets that receive the default level directive.
const TARGETS: &[&str] = &[
    "timod_proto",
    "timod_common",
    "timod_config",
    "timod_firebase",
    "timod_firebase_module",
];

/// Initialize the tracing subscriber with the INFO level.
///
/// # Examples
///
/// ```
/// use timod_common::logging;
///
/// // Initialize with default log level (INFO)
/// logging::init();
///
/// // A second call is a no-op
/// logging::init_with_level(tracing::Level::DEBUG);
/// ```
pub fn init() {
    init_with_level(Level::INFO);
}

/// Initialize the tracing subscriber with a specific log level.
///
/// `RUST_LOG` directives are honoured; `level` applies to the module's own
/// crates.
///
/// # Arguments
///
/// * `level` - The minimum log level to display.
pub fn init_with_level(level: Level) {
    let mut filter = EnvFilter::from_default_env();
    for target in TARGETS {
        if let Ok(directive) = format!("{}={}", target, level).parse() {
            filter = filter.add_directive(directive);
        }
    }

    // Use try_init to handle the case where a global default subscriber has already been set
    let result = tracing_subscriber::registry()
        .with(
            fmt::layer()
                .with_writer(std::io::stderr)
                .with_ansi(false)
                .with_target(true)
                .with_line_number(true),
        )
        .with(filter)
        .try_init();

    if result.is_ok() {
        info!("Logging initialized at level: {}", level);
    }
}

/// Log an error with context at the ERROR level.
///
/// # Arguments
///
/// * `error` - The error to log.
/// * `context` - Additional context information about the error.
pub fn log_error<E: std::fmt::Display>(error: E, context: &str) {
    error!("{}: {}", context, error);
}
