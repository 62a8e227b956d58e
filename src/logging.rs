//! Logging configuration and initialization.
//!
//! Audit events (see [`crate::audit`]) get their own level so they stay
//! visible when the rest of the server is quieted.

use std::fs::{self, File};
use std::path::Path;
use std::sync::Arc;

use tracing::Level;
use tracing_subscriber::filter::Directive;
use tracing_subscriber::fmt::writer::MakeWriterExt;
use tracing_subscriber::prelude::*;
use tracing_subscriber::EnvFilter;

use crate::config::LoggingConfig;
use crate::Result;

/// Parse log level string to tracing Level.
fn parse_level(level: &str) -> Level {
    match level.to_lowercase().as_str() {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "info" => Level::INFO,
        "warn" | "warning" => Level::WARN,
        "error" => Level::ERROR,
        _ => Level::INFO,
    }
}

/// Build the event filter from `RUST_LOG`, the global level and the audit level.
fn build_filter(config: &LoggingConfig) -> EnvFilter {
    let level = parse_level(&config.level);
    let audit_level = parse_level(&config.audit_level);
    let filter = EnvFilter::from_default_env().add_directive(level.into());

    let audit = format!("audit={}", audit_level.as_str().to_lowercase());
    match audit.parse::<Directive>() {
        Ok(directive) => filter.add_directive(directive),
        Err(e) => {
            eprintln!("Ignoring audit log level {}: {e}", config.audit_level);
            filter
        }
    }
}

/// Initialize logging to both stdout and the configured log file.
pub fn init(config: &LoggingConfig) -> Result<()> {
    let filter = build_filter(config);

    if let Some(parent) = Path::new(&config.file).parent() {
        if !parent.as_os_str().is_empty() && !parent.exists() {
            fs::create_dir_all(parent)?;
        }
    }

    let log_file = Arc::new(File::create(&config.file)?);
    let writer = std::io::stdout.and(log_file);

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(writer)
                .with_ansi(false)
                .with_target(true),
        )
        .with(filter)
        .init();

    Ok(())
}

/// Initialize console-only logging, used when the log file cannot be opened.
pub fn init_console_only(config: &LoggingConfig) {
    let filter = build_filter(config);

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stdout)
                .with_ansi(true)
                .with_target(true),
        )
        .with(filter)
        .init();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_level_trace() {
        assert_eq!(parse_level("trace"), Level::TRACE);
        assert_eq!(parse_level("TRACE"), Level::TRACE);
    }

    #[test]
    fn test_parse_level_debug() {
        assert_eq!(parse_level("debug"), Level::DEBUG);
        assert_eq!(parse_level("DEBUG"), Level::DEBUG);
    }

    #[test]
    fn test_parse_level_info() {
        assert_eq!(parse_level("info"), Level::INFO);
        assert_eq!(parse_level("INFO"), Level::INFO);
    }

    #[test]
    fn test_parse_level_warn() {
        assert_eq!(parse_level("warn"), Level::WARN);
        assert_eq!(parse_level("warning"), Level::WARN);
    }

    #[test]
    fn test_parse_level_error() {
        assert_eq!(parse_level("error"), Level::ERROR);
        assert_eq!(parse_level("ERROR"), Level::ERROR);
    }

    #[test]
    fn test_parse_level_default() {
        assert_eq!(parse_level("invalid"), Level::INFO);
        assert_eq!(parse_level(""), Level::INFO);
    }

    #[test]
    fn test_filter_carries_audit_level() {
        let config = LoggingConfig {
            level: "error".to_string(),
            audit_level: "debug".to_string(),
            ..LoggingConfig::default()
        };

        let filter = build_filter(&config).to_string().to_lowercase();
        assert!(filter.contains("audit=debug"), "{filter}");
        assert!(filter.contains("error"), "{filter}");
    }

    #[test]
    fn test_filter_unknown_audit_level_falls_back_to_info() {
        let config = LoggingConfig {
            audit_level: "loud".to_string(),
            ..LoggingConfig::default()
        };

        let filter = build_filter(&config).to_string().to_lowercase();
        assert!(filter.contains("audit=info"), "{filter}");
    }
}
