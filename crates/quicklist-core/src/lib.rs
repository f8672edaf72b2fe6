//! Quicklist - headless launcher shortcut publishing.
//!
//! Launchers expose two kinds of application shortcuts: pinned shortcuts
//! the user places through an approval flow, and dynamic shortcuts an
//! application suggests, kept in a small insertion-ordered set bounded by
//! the launcher. This crate fronts both behind a [`ShortcutPublisher`]
//! facade over a pluggable [`ShortcutHost`] backend, with no UI and no
//! launcher-specific code of its own.
//!
//! The publisher enforces the one non-trivial policy: when the host
//! reports the dynamic set full, the oldest entry is evicted and the
//! insertion retried exactly once. Hosts that don't support a capability
//! are skipped silently rather than errored on.
//!
//! Two hosts ship with the crate: [`MemoryHost`] (a `Vec`-backed test
//! double) and [`SqliteHost`] (a durable store shared across processes).
//!
//! # Example
//!
//! ```rust
//! use quicklist::{MemoryHost, PinCallback, ShortcutEntry, ShortcutPublisher};
//! use std::sync::Arc;
//!
//! fn main() -> quicklist::Result<()> {
//!     let host = Arc::new(MemoryHost::new());
//!     let publisher = ShortcutPublisher::new(host);
//!
//!     let entry = ShortcutEntry::builder("open-notes")
//!         .label("Open Notes")
//!         .action("app://notes")
//!         .build();
//!
//!     publisher.add_dynamic_shortcut(entry.clone())?;
//!     if publisher.is_pin_supported() {
//!         publisher.request_pinned_shortcut(entry, PinCallback::new("notify://pinned"))?;
//!     }
//!     Ok(())
//! }
//! ```

pub mod config;
pub mod entry;
pub mod error;
pub mod host;
pub mod paths;
pub mod pin;
pub mod publisher;

pub use entry::{ShortcutAction, ShortcutEntry, ShortcutEntryBuilder, ShortcutIcon};
pub use error::{Result, ShortcutError};
pub use host::{
    HostConfig, MemoryHost, MemoryHostBuilder, PendingPinRequest, PinRequest, ShortcutHost,
    SqliteHost,
};
pub use pin::{request_code, PinCallback, PinReceipt, PinTicket};
pub use publisher::ShortcutPublisher;
