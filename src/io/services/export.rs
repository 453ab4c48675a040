//! Export orchestrator.
//!
//! The single entry point callers use: resolves the category, role and
//! format, collects headers and records, and hands the job to the matching
//! renderer. Validation happens before any record is read, in this order:
//!
//! 1. category tag parses
//! 2. role may export the category
//! 3. format tag parses
//! 4. the header registry and the record source both know the category

use crate::config::ExportConfig;
use crate::io::formats::{RenderSettings, create_renderer};
use crate::models::{ExportCategory, ExportFormat, ExportJob, ExportResult};
use crate::observability::metrics::{
    EXPORT_DURATION_MS, EXPORT_REQUESTS_TOTAL, EXPORT_ROWS_TOTAL, EXPORT_TRUNCATED_TOTAL,
};
use crate::schema::HeaderRegistry;
use crate::security::RolePermissions;
use crate::storage::{MockRecordSource, RecordSource, SqliteRecordSource};
use crate::{Error, Result};
use chrono::{Local, NaiveDateTime};
use once_cell::sync::Lazy;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::sync::Arc;
use std::time::Instant;
use tracing::instrument;

static DEFAULT_SERVICE: Lazy<ExportService> =
    Lazy::new(|| ExportService::new(Arc::new(MockRecordSource::new())));

/// Builds an export with the default permission table, default settings and
/// the demo record source.
///
/// # Errors
///
/// See [`ExportService::build`].
///
/// # Example
///
/// ```rust,ignore
/// let result = backoffice_export::build_export("orders", "csv", "manager")?;
/// assert!(result.filename.starts_with("orders_"));
/// ```
pub fn build_export(category: &str, format: &str, role: &str) -> Result<ExportResult> {
    DEFAULT_SERVICE.build(category, format, role)
}

/// Stateless export orchestrator.
///
/// Holds only read-only collaborators, so one instance can serve concurrent
/// requests from many threads.
#[derive(Clone)]
pub struct ExportService {
    source: Arc<dyn RecordSource>,
    registry: HeaderRegistry,
    permissions: RolePermissions,
    settings: RenderSettings,
}

impl std::fmt::Debug for ExportService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ExportService")
            .field("categories", &self.registry.categories())
            .field("roles", &self.permissions.roles())
            .field("settings", &self.settings)
            .finish_non_exhaustive()
    }
}

impl ExportService {
    /// Creates a service over `source` with default registry, permissions and
    /// settings.
    #[must_use]
    pub fn new(source: Arc<dyn RecordSource>) -> Self {
        Self {
            source,
            registry: HeaderRegistry::default(),
            permissions: RolePermissions::default(),
            settings: RenderSettings::default(),
        }
    }

    /// Creates a service from configuration.
    ///
    /// Uses the `SQLite` source when a database path is configured, the demo
    /// source otherwise.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidInput`] for bad settings or permissions and
    /// [`Error::OperationFailed`] if the database cannot be opened.
    pub fn from_config(config: &ExportConfig) -> Result<Self> {
        let source: Arc<dyn RecordSource> = match &config.storage.database_path {
            Some(path) => Arc::new(SqliteRecordSource::new(path)?),
            None => Arc::new(MockRecordSource::new()),
        };
        let settings = config.render_settings();
        settings.formatter()?;
        Ok(Self::new(source)
            .with_permissions(config.role_permissions()?)
            .with_settings(settings))
    }

    /// Replaces the permission table.
    #[must_use]
    pub fn with_permissions(mut self, permissions: RolePermissions) -> Self {
        self.permissions = permissions;
        self
    }

    /// Replaces the render settings.
    #[must_use]
    pub fn with_settings(mut self, settings: RenderSettings) -> Self {
        self.settings = settings;
        self
    }

    /// Replaces the header registry.
    #[must_use]
    pub fn with_registry(mut self, registry: HeaderRegistry) -> Self {
        self.registry = registry;
        self
    }

    /// Returns the permission table.
    #[must_use]
    pub const fn permissions(&self) -> &RolePermissions {
        &self.permissions
    }

    /// Returns the render settings.
    #[must_use]
    pub const fn settings(&self) -> &RenderSettings {
        &self.settings
    }

    /// Categories `role` can export, with their report titles.
    #[must_use]
    pub fn categories(&self, role: &str) -> Vec<(ExportCategory, &'static str)> {
        self.permissions
            .categories_for(role)
            .into_iter()
            .filter(|category| self.source.supports(*category))
            .filter_map(|category| {
                self.registry
                    .title(category)
                    .ok()
                    .map(|title| (category, title))
            })
            .collect()
    }

    /// Builds an export stamped with the current local time.
    ///
    /// # Errors
    ///
    /// - [`Error::UnknownCategory`]: bad tag, not permitted for the role, or
    ///   not served by the registry or source
    /// - [`Error::UnknownFormat`]: bad format tag
    /// - [`Error::RenderFailure`]: the renderer failed
    /// - [`Error::OperationFailed`]: the record source could not be read
    pub fn build(&self, category: &str, format: &str, role: &str) -> Result<ExportResult> {
        self.build_at(category, format, role, Local::now().naive_local())
    }

    /// Builds an export stamped with `generated_at`.
    ///
    /// # Errors
    ///
    /// Same as [`Self::build`].
    #[instrument(skip_all, fields(category = %category, format = %format, role = %role))]
    pub fn build_at(
        &self,
        category: &str,
        format: &str,
        role: &str,
        generated_at: NaiveDateTime,
    ) -> Result<ExportResult> {
        let start = Instant::now();
        let result = self.run(category, format, role, generated_at);

        let format_label = ExportFormat::from_str(format).map_or("unknown", |f| f.as_str());
        let outcome = match &result {
            Ok(_) => "success",
            Err(Error::UnknownCategory(_)) => "unknown_category",
            Err(Error::UnknownFormat(_)) => "unknown_format",
            Err(Error::RenderFailure { .. }) => "render_failure",
            Err(_) => "error",
        };
        metrics::counter!(
            EXPORT_REQUESTS_TOTAL,
            "format" => format_label,
            "outcome" => outcome
        )
        .increment(1);
        metrics::histogram!(EXPORT_DURATION_MS, "format" => format_label)
            .record(start.elapsed().as_secs_f64() * 1000.0);

        match &result {
            Ok(export) => tracing::info!(
                filename = %export.filename,
                rows = export.rendered_records,
                total = export.total_records,
                bytes = export.bytes.len(),
                "Export built"
            ),
            Err(e) => tracing::warn!(error = %e, outcome, "Export rejected"),
        }
        result
    }

    /// Builds an export and writes it into `dir` under its filename.
    ///
    /// # Errors
    ///
    /// Same as [`Self::build`], plus [`Error::OperationFailed`] if the file
    /// cannot be written.
    pub fn export_to_dir(
        &self,
        category: &str,
        format: &str,
        role: &str,
        dir: &Path,
    ) -> Result<(ExportResult, PathBuf)> {
        let result = self.build(category, format, role)?;
        let path = dir.join(&result.filename);
        std::fs::write(&path, &result.bytes).map_err(|e| Error::OperationFailed {
            operation: "write_export_file".to_string(),
            cause: format!("{}: {e}", path.display()),
        })?;
        Ok((result, path))
    }

    fn run(
        &self,
        category: &str,
        format: &str,
        role: &str,
        generated_at: NaiveDateTime,
    ) -> Result<ExportResult> {
        let category = ExportCategory::from_str(category)?;
        self.permissions.check(role, category)?;
        let format = ExportFormat::from_str(format)?;

        let schema = self.registry.schema(category)?;
        if !self.source.supports(category) {
            return Err(Error::UnknownCategory(format!(
                "{category} (no record source)"
            )));
        }
        let renderer = create_renderer(format, &self.settings)?;

        let records = self.source.records(category)?;
        let job = ExportJob::new(
            category,
            format,
            generated_at,
            schema.title,
            schema.headers(),
        )
        .with_records(records);
        let bytes = renderer.render(&job)?;

        let total_records = job.records.len();
        let rendered_records = renderer
            .row_cap()
            .map_or(total_records, |cap| total_records.min(cap));
        metrics::counter!(EXPORT_ROWS_TOTAL, "category" => category.as_str())
            .increment(u64::try_from(rendered_records).unwrap_or(u64::MAX));
        if rendered_records < total_records {
            metrics::counter!(EXPORT_TRUNCATED_TOTAL, "format" => format.as_str()).increment(1);
            tracing::warn!(
                shown = rendered_records,
                total = total_records,
                "Export truncated to the format's row cap"
            );
        }

        Ok(ExportResult {
            bytes,
            filename: job.filename(),
            format,
            total_records,
            rendered_records,
        })
    }
}
