//! Startup configuration
//!
//! Resolved once from the environment, with platform defaults:
//! - Linux: ~/.local/share/item-catalog/item_catalog.db
//! - macOS: ~/Library/Application Support/item-catalog/item_catalog.db
//! - Windows: %APPDATA%\item-catalog\item_catalog.db

use std::path::PathBuf;

/// Overrides the data directory
pub const DATA_DIR_ENV: &str = "ITEM_CATALOG_DATA_DIR";

const APP_DIR: &str = "item-catalog";
const DB_FILE: &str = "item_catalog.db";
const DEFAULT_LOG_FILTER: &str = "item_catalog=info";

#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    /// Directory holding the catalog database
    pub data_dir: PathBuf,
    /// `tracing_subscriber::EnvFilter` directives
    pub log_filter: String,
}

impl Config {
    /// Read configuration from the process environment
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let data_dir = lookup(DATA_DIR_ENV)
            .filter(|dir| !dir.trim().is_empty())
            .map(PathBuf::from)
            .unwrap_or_else(default_data_dir);

        let log_filter = lookup("RUST_LOG")
            .filter(|filter| !filter.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_LOG_FILTER.to_string());

        Config {
            data_dir,
            log_filter,
        }
    }

    /// Path of the SQLite database file
    pub fn db_path(&self) -> PathBuf {
        self.data_dir.join(DB_FILE)
    }
}

/// Platform data directory, or the home directory (or cwd) as a fallback
fn default_data_dir() -> PathBuf {
    let mut path = dirs::data_dir()
        .or_else(dirs::home_dir)
        .unwrap_or_else(|| PathBuf::from("."));
    path.push(APP_DIR);
    path
}
