//! Shortcut host backends.
//!
//! A host is the launcher-side collaborator that actually stores shortcuts
//! and receives pin requests. Two implementations ship with the crate:
//! [`MemoryHost`] for tests and embedders with their own persistence, and
//! [`SqliteHost`] for a durable store shared across processes. Launcher
//! integrations implement [`ShortcutHost`] themselves.

mod memory;
mod sqlite;
mod traits;

pub use memory::{MemoryHost, MemoryHostBuilder, PinRequest};
pub use sqlite::{PendingPinRequest, SqliteHost};
pub use traits::{HostConfig, ShortcutHost};
