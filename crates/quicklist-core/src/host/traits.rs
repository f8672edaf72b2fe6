//! Host trait and configuration.

use crate::entry::ShortcutEntry;
use crate::error::Result;
use crate::pin::{PinReceipt, PinTicket};
use serde::{Deserialize, Serialize};

/// Configuration for a bundled shortcut host.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HostConfig {
    /// Maximum number of dynamic shortcuts the host accepts.
    ///
    /// Zero is a legal value. Every insertion then fails with
    /// `CapacityExceeded` and eviction cannot free a slot, so the failure
    /// reaches the caller.
    pub max_dynamic: usize,
    /// Whether the host supports the pin-request flow.
    pub pin_supported: bool,
    /// Whether the host accepts dynamic shortcuts at all.
    pub dynamic_supported: bool,
}

impl HostConfig {
    /// Conventional launcher limit for app-suggested shortcuts.
    pub const DEFAULT_MAX_DYNAMIC: usize = 15;
}

impl Default for HostConfig {
    fn default() -> Self {
        Self {
            max_dynamic: Self::DEFAULT_MAX_DYNAMIC,
            pin_supported: true,
            dynamic_supported: true,
        }
    }
}

/// Launcher-side shortcut registry.
///
/// A host owns the dynamic shortcut set (bounded, insertion-ordered) and
/// the pin request pipeline. [`ShortcutPublisher`] drives a host through
/// this trait and never assumes a particular backend.
///
/// All operations are synchronous to match rusqlite's API; callers that
/// need async can wrap calls in `spawn_blocking`.
///
/// Contract, in addition to the per-method docs:
/// - The dynamic set is ordered oldest first, and surviving entries keep
///   their relative order across inserts, updates, and removals.
/// - Capability flags are allowed to change between calls (a launcher can
///   revoke support at runtime), so callers must not cache them.
///
/// [`ShortcutPublisher`]: crate::publisher::ShortcutPublisher
pub trait ShortcutHost: Send + Sync {
    /// Whether this host accepts dynamic shortcuts.
    fn is_dynamic_supported(&self) -> bool;

    /// Whether this host supports the pin-request flow.
    fn is_pin_supported(&self) -> bool;

    /// Current dynamic shortcut set, oldest first.
    fn list_dynamic_shortcuts(&self) -> Result<Vec<ShortcutEntry>>;

    /// Add a batch of dynamic shortcuts, updating entries whose id already
    /// exists.
    ///
    /// The batch is all-or-nothing: validation and the capacity check run
    /// before anything is applied, and on failure the set is unchanged.
    /// Updates do not consume capacity and keep the entry's original
    /// position. Fails with [`ShortcutError::CapacityExceeded`] when the
    /// genuinely new ids would push the set past the host's limit.
    ///
    /// [`ShortcutError::CapacityExceeded`]: crate::error::ShortcutError::CapacityExceeded
    fn add_dynamic_shortcuts(&self, entries: &[ShortcutEntry]) -> Result<()>;

    /// Remove dynamic shortcuts by id.
    ///
    /// Ids not present in the set are ignored.
    fn remove_dynamic_shortcuts(&self, ids: &[String]) -> Result<()>;

    /// Mint the opaque payload the launcher echoes back when a pin request
    /// for `entry` completes.
    fn create_pin_receipt(&self, entry: &ShortcutEntry) -> Result<PinReceipt>;

    /// Submit a pin request.
    ///
    /// Re-requesting a shortcut id with a pending request replaces that
    /// request instead of queueing a duplicate.
    fn request_pin_shortcut(&self, entry: &ShortcutEntry, ticket: PinTicket) -> Result<()>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_matches_launcher_convention() {
        let config = HostConfig::default();
        assert_eq!(config.max_dynamic, HostConfig::DEFAULT_MAX_DYNAMIC);
        assert!(config.pin_supported);
        assert!(config.dynamic_supported);
    }
}
