//! SQLite-backed shortcut host.

use super::traits::{HostConfig, ShortcutHost};
use crate::config::StoreConfig;
use crate::entry::{ShortcutAction, ShortcutEntry, ShortcutIcon};
use crate::error::{Result, ShortcutError};
use crate::pin::{PinReceipt, PinTicket};
use chrono::Utc;
use rusqlite::{params, Connection, OptionalExtension};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::sync::{Arc, Mutex, MutexGuard};
use tracing::debug;

/// A pending pin request row from the store.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PendingPinRequest {
    pub shortcut_id: String,
    pub label: String,
    pub request_code: u16,
    pub callback: String,
    pub receipt: String,
    pub requested_at: String,
}

/// Persistent shortcut host backed by SQLite.
///
/// Uses WAL mode so several processes can share one store, and an
/// `Arc<Mutex<Connection>>` for thread safety within a process. Insertion
/// order is tracked with a monotonic `position` column; listing returns
/// rows in position order, which makes the first row the eviction
/// candidate.
pub struct SqliteHost {
    conn: Arc<Mutex<Connection>>,
    config: HostConfig,
}

impl SqliteHost {
    /// Open the store at the default platform location.
    ///
    /// See [`crate::paths::default_store_path`] for where that is.
    pub fn open() -> Result<Self> {
        let db_path = crate::paths::default_store_path()?;
        Self::open_with_config(&db_path, HostConfig::default())
    }

    /// Open the store at `db_path` with the default configuration.
    pub fn open_at(db_path: &Path) -> Result<Self> {
        Self::open_with_config(db_path, HostConfig::default())
    }

    /// Open the store at `db_path` with explicit configuration.
    ///
    /// Creates the database and parent directories if needed. Configuration
    /// is written with INSERT OR IGNORE, so an existing store keeps the
    /// limits and capability flags it was created with; the values in
    /// `config` only seed a fresh store.
    pub fn open_with_config(db_path: &Path, config: HostConfig) -> Result<Self> {
        if let Some(parent) = db_path.parent() {
            if !parent.exists() {
                std::fs::create_dir_all(parent)
                    .map_err(|e| ShortcutError::io_with_path(e, parent))?;
            }
        }

        let conn = Connection::open(db_path)?;
        Self::configure_connection(&conn)?;
        Self::ensure_schema(&conn)?;
        Self::seed_config(&conn, &config)?;
        let effective = Self::load_config(&conn, &config)?;
        debug!(
            "Opened shortcut store at {} (capacity {})",
            db_path.display(),
            effective.max_dynamic
        );

        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
            config: effective,
        })
    }

    /// Effective configuration of this store.
    ///
    /// Persisted values win over the values passed at open time.
    pub fn config(&self) -> &HostConfig {
        &self.config
    }

    fn configure_connection(conn: &Connection) -> Result<()> {
        conn.execute_batch(&format!(
            "PRAGMA journal_mode=WAL;
             PRAGMA busy_timeout={};
             PRAGMA synchronous=NORMAL;",
            StoreConfig::BUSY_TIMEOUT_MS
        ))?;
        Ok(())
    }

    fn ensure_schema(conn: &Connection) -> Result<()> {
        conn.execute_batch(
            "CREATE TABLE IF NOT EXISTS dynamic_shortcuts (
                id TEXT PRIMARY KEY,
                label TEXT NOT NULL,
                icon BLOB NOT NULL,
                action TEXT NOT NULL,
                position INTEGER NOT NULL,
                added_at TEXT NOT NULL,
                updated_at TEXT NOT NULL
            );

            CREATE INDEX IF NOT EXISTS idx_dynamic_shortcuts_position
                ON dynamic_shortcuts(position);

            CREATE TABLE IF NOT EXISTS pin_requests (
                shortcut_id TEXT PRIMARY KEY,
                label TEXT NOT NULL,
                request_code INTEGER NOT NULL,
                callback TEXT NOT NULL,
                receipt TEXT NOT NULL,
                requested_at TEXT NOT NULL
            );

            CREATE TABLE IF NOT EXISTS host_config (
                key TEXT PRIMARY KEY,
                value TEXT NOT NULL
            );",
        )?;
        Ok(())
    }

    fn seed_config(conn: &Connection, config: &HostConfig) -> Result<()> {
        let defaults = [
            ("max_dynamic", config.max_dynamic.to_string()),
            ("pin_supported", config.pin_supported.to_string()),
            ("dynamic_supported", config.dynamic_supported.to_string()),
        ];
        for (key, value) in defaults {
            conn.execute(
                "INSERT OR IGNORE INTO host_config (key, value) VALUES (?1, ?2)",
                params![key, value],
            )?;
        }
        Ok(())
    }

    fn load_config(conn: &Connection, fallback: &HostConfig) -> Result<HostConfig> {
        let fetch = |key: &str| -> Result<Option<String>> {
            conn.query_row(
                "SELECT value FROM host_config WHERE key = ?1",
                params![key],
                |row| row.get(0),
            )
            .optional()
            .map_err(ShortcutError::from)
        };
        Ok(HostConfig {
            max_dynamic: fetch("max_dynamic")?
                .and_then(|v| v.parse().ok())
                .unwrap_or(fallback.max_dynamic),
            pin_supported: fetch("pin_supported")?
                .and_then(|v| v.parse().ok())
                .unwrap_or(fallback.pin_supported),
            dynamic_supported: fetch("dynamic_supported")?
                .and_then(|v| v.parse().ok())
                .unwrap_or(fallback.dynamic_supported),
        })
    }

    fn lock_conn(&self) -> Result<MutexGuard<'_, Connection>> {
        self.conn.lock().map_err(|_| ShortcutError::Database {
            message: "Failed to acquire store connection lock".to_string(),
            source: None,
        })
    }

    /// Pending pin requests, oldest first.
    ///
    /// At most one row per shortcut id; a re-request overwrites the row and
    /// moves it to the back of the queue.
    pub fn pending_pin_requests(&self) -> Result<Vec<PendingPinRequest>> {
        let conn = self.lock_conn()?;
        let mut stmt = conn.prepare(
            "SELECT shortcut_id, label, request_code, callback, receipt, requested_at
             FROM pin_requests ORDER BY requested_at ASC, shortcut_id ASC",
        )?;
        let rows = stmt.query_map([], |row| {
            Ok(PendingPinRequest {
                shortcut_id: row.get(0)?,
                label: row.get(1)?,
                request_code: row.get(2)?,
                callback: row.get(3)?,
                receipt: row.get(4)?,
                requested_at: row.get(5)?,
            })
        })?;

        let mut requests = Vec::new();
        for row in rows {
            requests.push(row?);
        }
        Ok(requests)
    }
}

impl ShortcutHost for SqliteHost {
    fn is_dynamic_supported(&self) -> bool {
        self.config.dynamic_supported
    }

    fn is_pin_supported(&self) -> bool {
        self.config.pin_supported
    }

    fn list_dynamic_shortcuts(&self) -> Result<Vec<ShortcutEntry>> {
        let conn = self.lock_conn()?;
        let mut stmt = conn.prepare(
            "SELECT id, label, icon, action FROM dynamic_shortcuts ORDER BY position ASC",
        )?;
        let rows = stmt.query_map([], |row| {
            Ok(ShortcutEntry {
                id: row.get(0)?,
                label: row.get(1)?,
                icon: ShortcutIcon::from_bytes(row.get::<_, Vec<u8>>(2)?),
                action: ShortcutAction::new(row.get::<_, String>(3)?),
            })
        })?;

        let mut entries = Vec::new();
        for row in rows {
            entries.push(row?);
        }
        Ok(entries)
    }

    fn add_dynamic_shortcuts(&self, entries: &[ShortcutEntry]) -> Result<()> {
        for entry in entries {
            entry.validate()?;
        }

        let mut conn = self.lock_conn()?;
        let tx = conn.transaction()?;

        // Net growth of the batch: ids already stored, or repeated within
        // the batch, are updates and take no slot.
        let held: i64 = tx.query_row("SELECT COUNT(*) FROM dynamic_shortcuts", [], |row| {
            row.get(0)
        })?;
        let mut new_ids: Vec<&str> = Vec::new();
        for entry in entries {
            let stored: Option<i64> = tx
                .query_row(
                    "SELECT 1 FROM dynamic_shortcuts WHERE id = ?1",
                    params![entry.id],
                    |row| row.get(0),
                )
                .optional()?;
            if stored.is_none() && !new_ids.contains(&entry.id.as_str()) {
                new_ids.push(&entry.id);
            }
        }
        if held as usize + new_ids.len() > self.config.max_dynamic {
            // Transaction rolls back on drop; the set is unchanged.
            return Err(ShortcutError::CapacityExceeded {
                limit: self.config.max_dynamic,
            });
        }

        let now = Utc::now().to_rfc3339();
        for entry in entries {
            let updated = tx.execute(
                "UPDATE dynamic_shortcuts
                 SET label = ?1, icon = ?2, action = ?3, updated_at = ?4
                 WHERE id = ?5",
                params![
                    entry.label,
                    entry.icon.as_bytes(),
                    entry.action.as_str(),
                    now,
                    entry.id
                ],
            )?;
            if updated == 0 {
                // New entries go to the back of the position order.
                tx.execute(
                    "INSERT INTO dynamic_shortcuts
                         (id, label, icon, action, position, added_at, updated_at)
                     VALUES (?1, ?2, ?3, ?4,
                         (SELECT COALESCE(MAX(position), 0) + 1 FROM dynamic_shortcuts),
                         ?5, ?5)",
                    params![
                        entry.id,
                        entry.label,
                        entry.icon.as_bytes(),
                        entry.action.as_str(),
                        now
                    ],
                )?;
            }
        }

        tx.commit()?;
        Ok(())
    }

    fn remove_dynamic_shortcuts(&self, ids: &[String]) -> Result<()> {
        let conn = self.lock_conn()?;
        for id in ids {
            conn.execute("DELETE FROM dynamic_shortcuts WHERE id = ?1", params![id])?;
        }
        Ok(())
    }

    fn create_pin_receipt(&self, entry: &ShortcutEntry) -> Result<PinReceipt> {
        entry.validate()?;
        // Opaque to callers; this host encodes the identity it will echo
        // back when the launcher resolves the request.
        let payload = serde_json::json!({
            "store": "sqlite",
            "shortcut_id": entry.id,
            "label": entry.label,
        });
        Ok(PinReceipt::new(serde_json::to_string(&payload)?))
    }

    fn request_pin_shortcut(&self, entry: &ShortcutEntry, ticket: PinTicket) -> Result<()> {
        entry.validate()?;
        let conn = self.lock_conn()?;
        let now = Utc::now().to_rfc3339();
        conn.execute(
            "INSERT INTO pin_requests
                 (shortcut_id, label, request_code, callback, receipt, requested_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6)
             ON CONFLICT(shortcut_id) DO UPDATE SET
                 label = excluded.label,
                 request_code = excluded.request_code,
                 callback = excluded.callback,
                 receipt = excluded.receipt,
                 requested_at = excluded.requested_at",
            params![
                entry.id,
                entry.label,
                ticket.request_code,
                ticket.callback.as_str(),
                ticket.receipt.as_str(),
                now
            ],
        )?;
        debug!("Recorded pin request for '{}'", entry.id);
        Ok(())
    }
}
