//! CLI command implementations.
//!
//! The binary parses arguments and dispatches here. Each command writes its
//! human-readable output to a caller-supplied writer so it can be tested
//! without touching stdout.
//!
//! # Commands
//!
//! | Command | Description |
//! |---------|-------------|
//! | `export` | Build one export and save it to a directory |
//! | `categories` | List the categories a role may export |
//! | `seed` | Fill a `SQLite` database with the demo records |
//! | `config` | Show the effective configuration |
//!
//! # Example Usage
//!
//! ```bash
//! backoffice-export export --category orders --format pdf --role manager --out ./reports
//! backoffice-export categories --role warehouse --format json
//! backoffice-export seed --database ./records.db
//! ```

mod categories;
mod config;
mod export;
mod seed;

pub use categories::{
    CategoriesOutputFormat, CategoryInfo, cmd_categories, list_categories, write_json, write_table,
};
pub use config::cmd_config;
pub use export::{ExportArgs, cmd_export};
pub use seed::{SeedReport, cmd_seed};
