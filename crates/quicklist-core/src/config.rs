//! Centralized configuration constants for quicklist.
//!
//! Gathers the tunable values in one place so callers (and tests) agree on
//! defaults without digging through the modules that consume them.

/// Persistent store configuration.
pub struct StoreConfig;

impl StoreConfig {
    /// Directory name under the platform config dir.
    pub const APP_CONFIG_DIR_NAME: &'static str = "quicklist";

    /// Filename of the SQLite shortcut store.
    pub const DB_FILENAME: &'static str = "shortcuts.db";

    /// SQLite busy timeout in milliseconds.
    ///
    /// The store may be opened by several processes at once (WAL mode);
    /// writers wait this long for the lock before giving up.
    pub const BUSY_TIMEOUT_MS: u32 = 5_000;
}
