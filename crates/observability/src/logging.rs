//! Logging initialization and configuration

use std::fmt as std_fmt;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Log output format
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum LogFormat {
    /// Human-readable format with colors (default)
    #[default]
    Pretty,
    /// One JSON object per event
    Json,
    /// Single-line events
    Compact,
}

impl LogFormat {
    /// Parse from string (case-insensitive)
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "pretty" => Some(Self::Pretty),
            "json" => Some(Self::Json),
            "compact" => Some(Self::Compact),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pretty => "pretty",
            Self::Json => "json",
            Self::Compact => "compact",
        }
    }
}

impl std::str::FromStr for LogFormat {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        Self::parse(s).ok_or_else(|| format!("unknown log format: {}", s))
    }
}

impl std_fmt::Display for LogFormat {
    fn fmt(&self, f: &mut std_fmt::Formatter<'_>) -> std_fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Filter used when `RUST_LOG` is not set
///
/// The matching loop logs every fill at `info`, which would drown a long run,
/// so the quiet default only lets warnings through.
fn default_filter(quiet: bool) -> EnvFilter {
    EnvFilter::new(if quiet { "warn" } else { "info" })
}

/// Initialize the logging system
///
/// Output goes to stderr. The level is taken from `RUST_LOG` when set,
/// otherwise `warn` when `quiet` and `info` when not.
///
/// # Environment Variables
///
/// * `RUST_LOG` - Controls log level (e.g., `info`, `matching_engine=debug,warn`)
pub fn init_logging(service_name: &str, format: LogFormat, quiet: bool) -> anyhow::Result<()> {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| default_filter(quiet));

    let registry = tracing_subscriber::registry().with(env_filter);
    let result = match format {
        LogFormat::Pretty => registry
            .with(
                fmt::layer()
                    .with_writer(std::io::stderr)
                    .with_target(true)
                    .with_file(true)
                    .with_line_number(true)
                    .with_ansi(true),
            )
            .try_init(),
        LogFormat::Json => registry
            .with(fmt::layer().json().with_writer(std::io::stderr))
            .try_init(),
        LogFormat::Compact => registry
            .with(fmt::layer().compact().with_writer(std::io::stderr))
            .try_init(),
    };
    result.map_err(|e| anyhow::anyhow!("failed to install log subscriber: {}", e))?;

    tracing::debug!(
        service = service_name,
        format = %format,
        "Logging initialized"
    );

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_log_format_from_str() {
        assert_eq!(LogFormat::parse("pretty"), Some(LogFormat::Pretty));
        assert_eq!(LogFormat::parse("PRETTY"), Some(LogFormat::Pretty));
        assert_eq!(LogFormat::parse("json"), Some(LogFormat::Json));
        assert_eq!(LogFormat::parse("compact"), Some(LogFormat::Compact));
        assert_eq!(LogFormat::parse("invalid"), None);

        assert_eq!("compact".parse::<LogFormat>(), Ok(LogFormat::Compact));
        assert!("invalid".parse::<LogFormat>().is_err());
    }

    #[test]
    fn test_display_round_trips() {
        for format in [LogFormat::Pretty, LogFormat::Json, LogFormat::Compact] {
            assert_eq!(LogFormat::parse(&format.to_string()), Some(format));
        }
    }

    #[test]
    fn test_second_init_is_an_error() {
        // whichever test installs first wins; the other call must not panic
        let first = init_logging("test", LogFormat::Compact, true);
        let second = init_logging("test", LogFormat::Json, true);
        assert!(first.is_err() || second.is_err());
    }
}
