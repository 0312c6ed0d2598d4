//! Structured logging setup for bootpack
//!
//! Logging goes through the `tracing` ecosystem. Output is either pretty
//! console text or JSON, written to stderr so that stdout stays free for
//! machine-readable command output.
//!
//! # Example
//!
//! ```no_run
//! use bootpack::util::logging;
//! use tracing::info;
//!
//! logging::init_from_env();
//! info!(app = "/workspace", "Detecting application");
//! ```

use std::env;
use std::sync::Once;
use tracing::Level;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

static INIT: Once = Once::new();

/// Configuration for logging initialization
#[derive(Debug, Clone)]
pub struct LoggingConfig {
    /// Minimum log level for the `bootpack` target
    pub level: Level,

    /// Use JSON output format
    pub use_json: bool,

    /// Include the module target (e.g., bootpack::springboot) in logs
    pub include_target: bool,

    /// Include file and line number information
    pub include_location: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: Level::INFO,
            use_json: false,
            include_target: true,
            include_location: false,
        }
    }
}

impl LoggingConfig {
    pub fn with_level(level: Level) -> Self {
        Self {
            level,
            ..Default::default()
        }
    }

    /// JSON output with source locations, for build platforms that collect logs.
    pub fn production() -> Self {
        Self {
            level: Level::INFO,
            use_json: true,
            include_target: true,
            include_location: true,
        }
    }
}

/// Parses a log level from a string, case-insensitively.
///
/// Returns `None` for anything that is not one of trace, debug, info, warn, error.
pub fn try_parse_level(level_str: &str) -> Option<Level> {
    match level_str.to_lowercase().as_str() {
        "trace" => Some(Level::TRACE),
        "debug" => Some(Level::DEBUG),
        "info" => Some(Level::INFO),
        "warn" => Some(Level::WARN),
        "error" => Some(Level::ERROR),
        _ => None,
    }
}

/// Parses a log level from a string, falling back to INFO
///
/// ```
/// use bootpack::util::logging::parse_level;
/// use tracing::Level;
///
/// assert_eq!(parse_level("debug"), Level::DEBUG);
/// assert_eq!(parse_level("invalid"), Level::INFO);
/// ```
pub fn parse_level(level_str: &str) -> Level {
    try_parse_level(level_str).unwrap_or_else(|| {
        eprintln!(
            "Invalid log level '{}', defaulting to INFO. Valid levels: trace, debug, info, warn, error",
            level_str
        );
        Level::INFO
    })
}

/// Initializes the tracing subscriber. Only the first call has any effect.
pub fn init_logging(config: LoggingConfig) {
    INIT.call_once(|| {
        let mut filter = EnvFilter::from_default_env();
        if env::var("RUST_LOG").is_err() {
            if let Ok(directive) = format!("bootpack={}", config.level).parse() {
                filter = filter.add_directive(directive);
            }
        }

        if config.use_json {
            tracing_subscriber::registry()
                .with(filter)
                .with(
                    fmt::layer()
                        .json()
                        .with_writer(std::io::stderr)
                        .with_target(config.include_target)
                        .with_file(config.include_location)
                        .with_line_number(config.include_location),
                )
                .init();
        } else {
            tracing_subscriber::registry()
                .with(filter)
                .with(
                    fmt::layer()
                        .with_writer(std::io::stderr)
                        .with_target(config.include_target)
                        .with_file(config.include_location)
                        .with_line_number(config.include_location),
                )
                .init();
        }
    });
}

pub fn init_default() {
    init_logging(LoggingConfig::default());
}

/// Initializes logging from `BOOTPACK_LOG_LEVEL` and `BOOTPACK_LOG_JSON`.
///
/// `RUST_LOG`, when set, takes precedence over the level.
pub fn init_from_env() {
    let level_str = env::var("BOOTPACK_LOG_LEVEL").unwrap_or_else(|_| "info".to_string());
    let use_json = env::var("BOOTPACK_LOG_JSON")
        .ok()
        .and_then(|v| v.parse::<bool>().ok())
        .unwrap_or(false);

    init_logging(LoggingConfig {
        level: parse_level(&level_str),
        use_json,
        ..Default::default()
    });
}
