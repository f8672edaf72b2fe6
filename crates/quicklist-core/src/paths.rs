//! Platform-specific filesystem locations for the shortcut store.

use crate::config::StoreConfig;
use crate::error::{Result, ShortcutError};
use std::path::PathBuf;

/// Get the quicklist configuration directory.
///
/// - Linux: `~/.config/quicklist`
/// - macOS: `~/Library/Application Support/quicklist`
/// - Windows: `%APPDATA%\quicklist`
///
/// The directory is not created by this function; callers that write into
/// it are responsible for creating it first.
pub fn quicklist_config_dir() -> Result<PathBuf> {
    let base = dirs::config_dir().ok_or_else(|| ShortcutError::Config {
        message: "Could not determine platform config directory".to_string(),
    })?;
    Ok(base.join(StoreConfig::APP_CONFIG_DIR_NAME))
}

/// Get the path of the default SQLite shortcut store.
pub fn default_store_path() -> Result<PathBuf> {
    Ok(quicklist_config_dir()?.join(StoreConfig::DB_FILENAME))
}
