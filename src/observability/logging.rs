//! Structured logging configuration.

use std::path::PathBuf;

use tracing_subscriber::EnvFilter;

use crate::config::LoggingSettings;

/// Environment variable holding the log filter, checked before `RUST_LOG`.
pub const ENV_LOG_FILTER: &str = "PAL_LOG";

const DEFAULT_LEVEL: &str = "info";
const VERBOSE_LEVEL: &str = "debug";

/// Log output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    /// Human-readable multi-line output.
    #[default]
    Pretty,
    /// One JSON object per event.
    Json,
}

impl LogFormat {
    /// Parses a format name. Unknown names fall back to `Pretty`.
    #[must_use]
    pub fn parse(s: &str) -> Self {
        match s.trim().to_lowercase().as_str() {
            "json" => Self::Json,
            _ => Self::Pretty,
        }
    }
}

/// Resolved logging configuration.
#[derive(Debug)]
pub struct LoggingConfig {
    /// Output format.
    pub format: LogFormat,
    /// Event filter.
    pub filter: EnvFilter,
    /// Optional log file; stderr when absent.
    pub file: Option<PathBuf>,
}

impl LoggingConfig {
    /// Builds logging configuration from settings.
    ///
    /// The filter comes from `PAL_LOG`, then `RUST_LOG`, then `debug` when
    /// `verbose` is set, then the configured level, else `info`.
    #[must_use]
    pub fn from_settings(settings: &LoggingSettings, verbose: bool) -> Self {
        let from_env = std::env::var(ENV_LOG_FILTER)
            .ok()
            .or_else(|| std::env::var(EnvFilter::DEFAULT_ENV).ok());

        Self {
            format: settings
                .format
                .as_deref()
                .map_or(LogFormat::Pretty, LogFormat::parse),
            filter: build_filter(&filter_directive(from_env, verbose, settings.level.as_deref())),
            file: settings.file.clone(),
        }
    }
}

/// Picks the filter directive: environment, then `--verbose`, then the
/// configured level.
fn filter_directive(from_env: Option<String>, verbose: bool, configured: Option<&str>) -> String {
    if let Some(directive) = from_env.filter(|v| !v.trim().is_empty()) {
        return directive;
    }
    if verbose {
        return VERBOSE_LEVEL.to_string();
    }
    configured
        .filter(|v| !v.trim().is_empty())
        .unwrap_or(DEFAULT_LEVEL)
        .to_string()
}

fn build_filter(directive: &str) -> EnvFilter {
    EnvFilter::try_new(directive).unwrap_or_else(|_| EnvFilter::new(DEFAULT_LEVEL))
}
