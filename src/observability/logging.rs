//! Log output settings.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

/// Log line format.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    /// Human-readable multi-line output.
    #[default]
    Pretty,
    /// One JSON object per line.
    Json,
}

impl LogFormat {
    /// Parses a format name, case-insensitively.
    #[must_use]
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_lowercase().as_str() {
            "pretty" | "text" => Some(Self::Pretty),
            "json" => Some(Self::Json),
            _ => None,
        }
    }
}

/// Logging configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct LoggingConfig {
    /// Line format.
    pub format: LogFormat,
    /// `EnvFilter` directives; `RUST_LOG` takes precedence.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub filter: Option<String>,
    /// Append logs to this file instead of stderr.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub file: Option<PathBuf>,
}

impl LoggingConfig {
    /// Builds the filter directives in precedence order: `rust_log`, the
    /// configured filter, then `debug` when verbose or `info` otherwise.
    #[must_use]
    pub fn directives(&self, rust_log: Option<&str>, verbose: bool) -> String {
        rust_log
            .filter(|value| !value.trim().is_empty())
            .map(str::to_string)
            .or_else(|| self.filter.clone())
            .unwrap_or_else(|| if verbose { "debug" } else { "info" }.to_string())
    }

    /// Builds the `EnvFilter` for the subscriber.
    ///
    /// Unparseable directives fall back to `info`.
    #[must_use]
    pub fn env_filter(&self, rust_log: Option<&str>, verbose: bool) -> EnvFilter {
        EnvFilter::try_new(self.directives(rust_log, verbose))
            .unwrap_or_else(|_| EnvFilter::new("info"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_case::test_case;

    #[test_case("json", Some(LogFormat::Json); "json")]
    #[test_case("Pretty", Some(LogFormat::Pretty); "pretty mixed case")]
    #[test_case(" text ", Some(LogFormat::Pretty); "text alias")]
    #[test_case("xml", None; "unknown")]
    fn test_parse(value: &str, expected: Option<LogFormat>) {
        assert_eq!(LogFormat::parse(value), expected);
    }

    #[test]
    fn test_directive_precedence() {
        let config = LoggingConfig {
            filter: Some("backoffice_export=trace".to_string()),
            ..LoggingConfig::default()
        };
        assert_eq!(config.directives(Some("warn"), true), "warn");
        assert_eq!(config.directives(Some("  "), false), "backoffice_export=trace");
        assert_eq!(config.directives(None, true), "backoffice_export=trace");

        let plain = LoggingConfig::default();
        assert_eq!(plain.directives(None, true), "debug");
        assert_eq!(plain.directives(None, false), "info");
    }
}
