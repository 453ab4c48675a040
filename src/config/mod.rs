//! Configuration management.
//!
//! Settings come from an optional TOML file, then environment variables:
//!
//! | Variable | Overrides |
//! |----------|-----------|
//! | `BACKOFFICE_EXPORT_GROUP_SEPARATOR` | `format.group_separator` |
//! | `BACKOFFICE_EXPORT_DB` | `storage.database_path` |
//! | `BACKOFFICE_EXPORT_LOG_FORMAT` | `logging.format` |
//!
//! `RUST_LOG`, when set, replaces `logging.filter` at subscriber start-up.

use crate::io::formats::{DEFAULT_MAX_COLUMN_WIDTH, RenderSettings};
use crate::observability::{LogFormat, LoggingConfig};
use crate::security::RolePermissions;
use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

/// Environment variable overriding the digit group separator.
pub const ENV_GROUP_SEPARATOR: &str = "BACKOFFICE_EXPORT_GROUP_SEPARATOR";
/// Environment variable pointing at the `SQLite` record database.
pub const ENV_DATABASE: &str = "BACKOFFICE_EXPORT_DB";
/// Environment variable selecting `pretty` or `json` logs.
pub const ENV_LOG_FORMAT: &str = "BACKOFFICE_EXPORT_LOG_FORMAT";

const APP_DIR: &str = "backoffice-export";

/// Main configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ExportConfig {
    /// Number formatting.
    pub format: FormatConfig,
    /// Spreadsheet layout.
    pub spreadsheet: SpreadsheetConfig,
    /// Record storage.
    pub storage: StorageConfig,
    /// Log output.
    pub logging: LoggingConfig,
    /// Per-role overrides of the permission table: role → category tags.
    pub permissions: BTreeMap<String, Vec<String>>,
    /// File the configuration was read from, if any.
    #[serde(skip)]
    pub source_path: Option<PathBuf>,
}

/// Number formatting settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FormatConfig {
    /// Digit group separator.
    pub group_separator: String,
    /// Decimal separator for money.
    pub decimal_separator: String,
}

/// Spreadsheet settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SpreadsheetConfig {
    /// Widest column, in characters.
    pub max_column_width: usize,
}

/// Storage settings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct StorageConfig {
    /// `SQLite` database with the category tables; the demo source is used
    /// when unset.
    pub database_path: Option<PathBuf>,
}

/// Configuration file structure (for TOML parsing).
#[derive(Debug, Deserialize, Default)]
#[serde(deny_unknown_fields)]
pub struct ConfigFile {
    /// `[format]` section.
    pub format: Option<ConfigFileFormat>,
    /// `[spreadsheet]` section.
    pub spreadsheet: Option<ConfigFileSpreadsheet>,
    /// `[storage]` section.
    pub storage: Option<ConfigFileStorage>,
    /// `[logging]` section.
    pub logging: Option<ConfigFileLogging>,
    /// `[permissions]` section.
    pub permissions: Option<BTreeMap<String, Vec<String>>>,
}

/// `[format]` section in config file.
#[derive(Debug, Deserialize, Default)]
pub struct ConfigFileFormat {
    /// Group separator.
    pub group_separator: Option<String>,
    /// Decimal separator.
    pub decimal_separator: Option<String>,
}

/// `[spreadsheet]` section in config file.
#[derive(Debug, Deserialize, Default)]
pub struct ConfigFileSpreadsheet {
    /// Column width cap.
    pub max_column_width: Option<usize>,
}

/// `[storage]` section in config file.
#[derive(Debug, Deserialize, Default)]
pub struct ConfigFileStorage {
    /// Database path.
    pub database_path: Option<String>,
}

/// `[logging]` section in config file.
#[derive(Debug, Deserialize, Default)]
pub struct ConfigFileLogging {
    /// `pretty` or `json`.
    pub format: Option<String>,
    /// `EnvFilter` directives.
    pub filter: Option<String>,
    /// Log file path.
    pub file: Option<String>,
}

impl Default for FormatConfig {
    fn default() -> Self {
        Self {
            group_separator: " ".to_string(),
            decimal_separator: ".".to_string(),
        }
    }
}

impl Default for SpreadsheetConfig {
    fn default() -> Self {
        Self {
            max_column_width: DEFAULT_MAX_COLUMN_WIDTH,
        }
    }
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            format: FormatConfig::default(),
            spreadsheet: SpreadsheetConfig::default(),
            storage: StorageConfig::default(),
            logging: LoggingConfig::default(),
            permissions: BTreeMap::new(),
            source_path: None,
        }
    }
}

impl ExportConfig {
    /// Creates a configuration with default values.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Loads configuration from a file path.
    ///
    /// # Errors
    ///
    /// Returns [`Error::OperationFailed`] if the file cannot be read or is
    /// not valid TOML, and [`Error::InvalidInput`] if a value is unusable
    /// (unknown category in `[permissions]`, bad separator, bad log format).
    pub fn load_from_file(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path).map_err(|e| Error::OperationFailed {
            operation: "read_config_file".to_string(),
            cause: format!("{}: {e}", path.display()),
        })?;
        let mut config = Self::parse(&contents)?;
        config.source_path = Some(path.to_path_buf());
        Ok(config)
    }

    /// Parses configuration from TOML text.
    ///
    /// # Errors
    ///
    /// Same as [`Self::load_from_file`], minus the read error.
    pub fn parse(contents: &str) -> Result<Self> {
        let file: ConfigFile = toml::from_str(contents).map_err(|e| Error::OperationFailed {
            operation: "parse_config_file".to_string(),
            cause: e.to_string(),
        })?;
        let config = Self::from_config_file(file)?;
        config.validate()?;
        Ok(config)
    }

    /// Loads configuration from the default location.
    ///
    /// Checks the following paths in order:
    /// 1. Platform config dir (`~/Library/Application Support/backoffice-export/` on macOS)
    /// 2. `~/.config/backoffice-export/` for Unix compatibility
    ///
    /// Falls back to defaults when neither exists or loads cleanly.
    #[must_use]
    pub fn load_default() -> Self {
        let Some(base_dirs) = directories::BaseDirs::new() else {
            return Self::default();
        };

        let candidates = [
            base_dirs.config_dir().join(APP_DIR).join("config.toml"),
            base_dirs
                .home_dir()
                .join(".config")
                .join(APP_DIR)
                .join("config.toml"),
        ];
        for path in candidates.iter().filter(|p| p.exists()) {
            match Self::load_from_file(path) {
                Ok(config) => return config,
                Err(e) => {
                    tracing::warn!(path = %path.display(), error = %e, "Ignoring unusable config file");
                },
            }
        }
        Self::default()
    }

    /// Applies overrides from the process environment.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidInput`] if an override value is unusable.
    pub fn apply_env_overrides(&mut self) -> Result<()> {
        self.apply_overrides_from(|key| std::env::var(key).ok())
    }

    /// Applies overrides from any key lookup.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidInput`] if an override value is unusable.
    pub fn apply_overrides_from(&mut self, lookup: impl Fn(&str) -> Option<String>) -> Result<()> {
        if let Some(separator) = lookup(ENV_GROUP_SEPARATOR) {
            self.format.group_separator = separator;
        }
        if let Some(path) = lookup(ENV_DATABASE).filter(|p| !p.trim().is_empty()) {
            self.storage.database_path = Some(PathBuf::from(path));
        }
        if let Some(format) = lookup(ENV_LOG_FORMAT) {
            self.logging.format = parse_log_format(&format)?;
        }
        self.validate()
    }

    /// Render settings for the export service.
    #[must_use]
    pub fn render_settings(&self) -> RenderSettings {
        RenderSettings {
            group_separator: self.format.group_separator.clone(),
            decimal_separator: self.format.decimal_separator.clone(),
            max_column_width: self.spreadsheet.max_column_width,
        }
    }

    /// The default permission table with this configuration's overrides.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidInput`] if an override names an unknown
    /// category.
    pub fn role_permissions(&self) -> Result<RolePermissions> {
        let mut permissions = RolePermissions::new();
        for (role, tags) in &self.permissions {
            permissions.set_from_tags(role, tags)?;
        }
        Ok(permissions)
    }

    /// Renders the effective configuration as TOML.
    ///
    /// # Errors
    ///
    /// Returns [`Error::OperationFailed`] if serialization fails.
    pub fn to_toml(&self) -> Result<String> {
        toml::to_string_pretty(self).map_err(|e| Error::OperationFailed {
            operation: "serialize_config".to_string(),
            cause: e.to_string(),
        })
    }

    fn validate(&self) -> Result<()> {
        self.render_settings().formatter()?;
        if self.spreadsheet.max_column_width == 0 {
            return Err(Error::InvalidInput(
                "spreadsheet.max_column_width must be positive".to_string(),
            ));
        }
        self.role_permissions()?;
        Ok(())
    }

    /// Converts a `ConfigFile` to `ExportConfig`.
    fn from_config_file(file: ConfigFile) -> Result<Self> {
        let mut config = Self::default();

        if let Some(format) = file.format {
            if let Some(separator) = format.group_separator {
                config.format.group_separator = separator;
            }
            if let Some(separator) = format.decimal_separator {
                config.format.decimal_separator = separator;
            }
        }
        if let Some(width) = file.spreadsheet.and_then(|s| s.max_column_width) {
            config.spreadsheet.max_column_width = width;
        }
        if let Some(path) = file.storage.and_then(|s| s.database_path) {
            config.storage.database_path = Some(PathBuf::from(path));
        }
        if let Some(logging) = file.logging {
            if let Some(format) = logging.format {
                config.logging.format = parse_log_format(&format)?;
            }
            config.logging.filter = logging.filter;
            config.logging.file = logging.file.map(PathBuf::from);
        }
        if let Some(permissions) = file.permissions {
            config.permissions = permissions;
        }

        Ok(config)
    }
}

fn parse_log_format(value: &str) -> Result<LogFormat> {
    LogFormat::parse(value)
        .ok_or_else(|| Error::InvalidInput(format!("unknown log format '{value}'")))
}
