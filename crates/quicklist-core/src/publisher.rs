//! Caller-facing facade for publishing shortcuts.

use crate::entry::ShortcutEntry;
use crate::error::{Result, ShortcutError};
use crate::host::ShortcutHost;
use crate::pin::{PinCallback, PinTicket};
use std::sync::{Arc, Mutex, MutexGuard};
use tracing::{debug, info};

/// Publishes shortcuts to a launcher through a [`ShortcutHost`].
///
/// The publisher owns the one non-trivial policy in the crate: the dynamic
/// shortcut set is bounded by the host, and when an insertion overflows it
/// the oldest entry is evicted and the insertion retried exactly once. A
/// second overflow, which can only mean eviction freed nothing, reaches the
/// caller unchanged.
///
/// Capability flags are read from the host on every call and never cached;
/// a launcher may grant or revoke support at runtime. Calls that need an
/// unsupported capability are silent no-ops: dynamic publishing returns
/// `Ok(())` without touching the host, pin requests return `Ok(false)`.
///
/// The publisher is cheap to clone and clones share the host and the
/// publish lock.
#[derive(Clone)]
pub struct ShortcutPublisher {
    host: Arc<dyn ShortcutHost>,
    // Serializes the overflow path; see add_dynamic_shortcut.
    publish_lock: Arc<Mutex<()>>,
}

impl ShortcutPublisher {
    /// Create a publisher over the given host.
    pub fn new(host: Arc<dyn ShortcutHost>) -> Self {
        Self {
            host,
            publish_lock: Arc::new(Mutex::new(())),
        }
    }

    /// Whether the host supports the pin-request flow.
    pub fn is_pin_supported(&self) -> bool {
        self.host.is_pin_supported()
    }

    /// Whether the host accepts dynamic shortcuts.
    pub fn is_dynamic_supported(&self) -> bool {
        self.host.is_dynamic_supported()
    }

    /// Ask the launcher to pin `entry`.
    ///
    /// Returns `Ok(false)` without touching the host when pinning is
    /// unsupported. Otherwise obtains the host's receipt, assembles a
    /// [`PinTicket`] whose request code is derived from the entry id, and
    /// submits the request; `Ok(true)` means the host accepted it.
    /// Re-requesting an id with a pending request replaces that request,
    /// so callers may retry freely without queueing duplicates.
    pub fn request_pinned_shortcut(
        &self,
        entry: ShortcutEntry,
        callback: PinCallback,
    ) -> Result<bool> {
        if !self.host.is_pin_supported() {
            debug!("Host does not support pin requests, ignoring '{}'", entry.id);
            return Ok(false);
        }

        let receipt = self.host.create_pin_receipt(&entry)?;
        let ticket = PinTicket::new(&entry.id, callback, receipt);
        debug!(
            "Submitting pin request for '{}' (code {})",
            entry.id, ticket.request_code
        );
        self.host.request_pin_shortcut(&entry, ticket)?;
        Ok(true)
    }

    /// Publish a dynamic shortcut, evicting the oldest entry on overflow.
    ///
    /// Inserting an id the host already holds is an in-place update: it
    /// takes no slot and never triggers eviction. When the host reports the
    /// set full, the oldest entry is removed and the insertion retried
    /// once. Any other error, and a second overflow, propagate to the
    /// caller. Returns `Ok(())` without touching the host when dynamic
    /// shortcuts are unsupported.
    pub fn add_dynamic_shortcut(&self, entry: ShortcutEntry) -> Result<()> {
        if !self.host.is_dynamic_supported() {
            debug!(
                "Host does not support dynamic shortcuts, ignoring '{}'",
                entry.id
            );
            return Ok(());
        }

        // The evict-then-retry pair must not interleave across callers:
        // two threads observing one full set would otherwise evict two
        // entries for a single freed slot.
        let _guard = self.lock_publish()?;

        match self.host.add_dynamic_shortcuts(std::slice::from_ref(&entry)) {
            Err(err) if err.is_capacity_exceeded() => {
                debug!("Dynamic set full, evicting oldest before retrying '{}'", entry.id);
                self.evict_oldest()?;
                self.host.add_dynamic_shortcuts(std::slice::from_ref(&entry))
            }
            other => other,
        }
    }

    /// Current dynamic shortcut set, oldest first.
    pub fn dynamic_shortcuts(&self) -> Result<Vec<ShortcutEntry>> {
        self.host.list_dynamic_shortcuts()
    }

    /// Remove one dynamic shortcut; an unknown id is ignored.
    pub fn remove_dynamic_shortcut(&self, id: &str) -> Result<()> {
        self.host.remove_dynamic_shortcuts(&[id.to_string()])
    }

    /// Remove every dynamic shortcut.
    pub fn clear_dynamic_shortcuts(&self) -> Result<()> {
        // Taken so a clear cannot run between another caller's eviction
        // and retry.
        let _guard = self.lock_publish()?;
        let ids: Vec<String> = self
            .host
            .list_dynamic_shortcuts()?
            .into_iter()
            .map(|entry| entry.id)
            .collect();
        if ids.is_empty() {
            return Ok(());
        }
        info!("Clearing {} dynamic shortcuts", ids.len());
        self.host.remove_dynamic_shortcuts(&ids)
    }

    fn lock_publish(&self) -> Result<MutexGuard<'_, ()>> {
        self.publish_lock
            .lock()
            .map_err(|_| ShortcutError::Other("Failed to acquire publish lock".to_string()))
    }

    fn evict_oldest(&self) -> Result<()> {
        let held = self.host.list_dynamic_shortcuts()?;
        let Some(oldest) = held.first() else {
            // Nothing to evict; the retried insertion surfaces the real
            // failure (a zero-capacity host, for one).
            return Ok(());
        };
        info!("Evicting oldest dynamic shortcut '{}'", oldest.id);
        self.host
            .remove_dynamic_shortcuts(std::slice::from_ref(&oldest.id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::host::MemoryHost;
    use crate::pin::{request_code, PinReceipt};
    use std::collections::VecDeque;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn entry(id: &str, label: &str) -> ShortcutEntry {
        ShortcutEntry::builder(id).label(label).build()
    }

    fn publisher_with_capacity(max_dynamic: usize) -> (ShortcutPublisher, Arc<MemoryHost>) {
        let host = Arc::new(MemoryHost::builder().capacity(max_dynamic).build());
        (ShortcutPublisher::new(host.clone()), host)
    }

    /// Host wrapper that fails `add_dynamic_shortcuts` with scripted errors
    /// before delegating, and counts attempts.
    struct ScriptedHost {
        inner: MemoryHost,
        add_attempts: AtomicUsize,
        scripted: Mutex<VecDeque<ShortcutError>>,
    }

    impl ScriptedHost {
        fn new(inner: MemoryHost, scripted: Vec<ShortcutError>) -> Self {
            Self {
                inner,
                add_attempts: AtomicUsize::new(0),
                scripted: Mutex::new(scripted.into()),
            }
        }

        fn attempts(&self) -> usize {
            self.add_attempts.load(Ordering::SeqCst)
        }
    }

    impl ShortcutHost for ScriptedHost {
        fn is_dynamic_supported(&self) -> bool {
            self.inner.is_dynamic_supported()
        }

        fn is_pin_supported(&self) -> bool {
            self.inner.is_pin_supported()
        }

        fn list_dynamic_shortcuts(&self) -> Result<Vec<ShortcutEntry>> {
            self.inner.list_dynamic_shortcuts()
        }

        fn add_dynamic_shortcuts(&self, entries: &[ShortcutEntry]) -> Result<()> {
            self.add_attempts.fetch_add(1, Ordering::SeqCst);
            if let Some(err) = self.scripted.lock().unwrap().pop_front() {
                return Err(err);
            }
            self.inner.add_dynamic_shortcuts(entries)
        }

        fn remove_dynamic_shortcuts(&self, ids: &[String]) -> Result<()> {
            self.inner.remove_dynamic_shortcuts(ids)
        }

        fn create_pin_receipt(&self, entry: &ShortcutEntry) -> Result<PinReceipt> {
            self.inner.create_pin_receipt(entry)
        }

        fn request_pin_shortcut(&self, entry: &ShortcutEntry, ticket: PinTicket) -> Result<()> {
            self.inner.request_pin_shortcut(entry, ticket)
        }
    }

    fn listed_ids(publisher: &ShortcutPublisher) -> Vec<String> {
        publisher
            .dynamic_shortcuts()
            .unwrap()
            .into_iter()
            .map(|e| e.id)
            .collect()
    }

    #[test]
    fn test_insert_below_capacity_keeps_every_entry() {
        let (publisher, _) = publisher_with_capacity(3);
        publisher.add_dynamic_shortcut(entry("a", "A")).unwrap();
        publisher.add_dynamic_shortcut(entry("b", "B")).unwrap();
        assert_eq!(listed_ids(&publisher), ["a", "b"]);
    }

    #[test]
    fn test_overflow_evicts_exactly_the_oldest() {
        let (publisher, _) = publisher_with_capacity(3);
        for (id, label) in [("a", "A"), ("b", "B"), ("c", "C")] {
            publisher.add_dynamic_shortcut(entry(id, label)).unwrap();
        }

        publisher.add_dynamic_shortcut(entry("d", "D")).unwrap();

        assert_eq!(listed_ids(&publisher), ["b", "c", "d"]);
    }

    #[test]
    fn test_repeated_overflow_rotates_in_insertion_order() {
        let (publisher, _) = publisher_with_capacity(2);
        for (id, label) in [("a", "A"), ("b", "B"), ("c", "C"), ("d", "D")] {
            publisher.add_dynamic_shortcut(entry(id, label)).unwrap();
        }
        assert_eq!(listed_ids(&publisher), ["c", "d"]);
    }

    #[test]
    fn test_update_at_capacity_neither_grows_nor_evicts() {
        let (publisher, _) = publisher_with_capacity(2);
        publisher.add_dynamic_shortcut(entry("a", "A")).unwrap();
        publisher.add_dynamic_shortcut(entry("b", "B")).unwrap();

        publisher.add_dynamic_shortcut(entry("a", "A prime")).unwrap();

        let entries = publisher.dynamic_shortcuts().unwrap();
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].id, "a");
        assert_eq!(entries[0].label, "A prime");
        assert_eq!(entries[1].id, "b");
    }

    #[test]
    fn test_zero_capacity_failure_reaches_caller() {
        let (publisher, _) = publisher_with_capacity(0);
        let err = publisher.add_dynamic_shortcut(entry("a", "A")).unwrap_err();
        assert!(matches!(err, ShortcutError::CapacityExceeded { limit: 0 }));
    }

    #[test]
    fn test_capacity_error_retried_exactly_once() {
        let host = Arc::new(ScriptedHost::new(
            MemoryHost::new(),
            vec![
                ShortcutError::CapacityExceeded { limit: 15 },
                ShortcutError::CapacityExceeded { limit: 15 },
            ],
        ));
        let publisher = ShortcutPublisher::new(host.clone());

        let err = publisher.add_dynamic_shortcut(entry("a", "A")).unwrap_err();
        assert!(err.is_capacity_exceeded());
        assert_eq!(host.attempts(), 2);
    }

    #[test]
    fn test_capacity_error_then_success_inserts() {
        let host = Arc::new(ScriptedHost::new(
            MemoryHost::new(),
            vec![ShortcutError::CapacityExceeded { limit: 15 }],
        ));
        let publisher = ShortcutPublisher::new(host.clone());

        publisher.add_dynamic_shortcut(entry("a", "A")).unwrap();
        assert_eq!(host.attempts(), 2);
        assert_eq!(listed_ids(&publisher), ["a"]);
    }

    #[test]
    fn test_other_errors_are_not_retried() {
        let host = Arc::new(ScriptedHost::new(
            MemoryHost::new(),
            vec![ShortcutError::Database {
                message: "disk I/O error".to_string(),
                source: None,
            }],
        ));
        let publisher = ShortcutPublisher::new(host.clone());

        let err = publisher.add_dynamic_shortcut(entry("a", "A")).unwrap_err();
        assert!(matches!(err, ShortcutError::Database { .. }));
        assert_eq!(host.attempts(), 1);
    }

    #[test]
    fn test_unsupported_dynamic_is_a_silent_noop() {
        let host = Arc::new(MemoryHost::builder().dynamic_supported(false).build());
        let publisher = ShortcutPublisher::new(host.clone());

        publisher.add_dynamic_shortcut(entry("a", "A")).unwrap();

        assert!(!publisher.is_dynamic_supported());
        assert!(host.list_dynamic_shortcuts().unwrap().is_empty());
    }

    #[test]
    fn test_unsupported_pin_returns_false_without_submitting() {
        let host = Arc::new(MemoryHost::builder().pin_supported(false).build());
        let publisher = ShortcutPublisher::new(host.clone());

        let submitted = publisher
            .request_pinned_shortcut(entry("a", "A"), PinCallback::new("notify://pinned"))
            .unwrap();

        assert!(!submitted);
        assert_eq!(host.pin_submission_count().unwrap(), 0);
    }

    #[test]
    fn test_pin_request_carries_derived_code_and_receipt() {
        let (publisher, host) = publisher_with_capacity(5);

        let submitted = publisher
            .request_pinned_shortcut(entry("pin-me", "Pin Me"), PinCallback::new("notify://done"))
            .unwrap();
        assert!(submitted);

        let pins = host.pin_requests().unwrap();
        assert_eq!(pins.len(), 1);
        assert_eq!(pins[0].ticket.request_code, request_code("pin-me"));
        assert_eq!(pins[0].ticket.callback.as_str(), "notify://done");
        assert_eq!(pins[0].ticket.receipt.as_str(), "memory:pin:pin-me");
    }

    #[test]
    fn test_pin_rerequest_replaces_instead_of_queueing() {
        let (publisher, host) = publisher_with_capacity(5);

        for callback in ["notify://one", "notify://two"] {
            publisher
                .request_pinned_shortcut(entry("pin-me", "Pin Me"), PinCallback::new(callback))
                .unwrap();
        }

        let pins = host.pin_requests().unwrap();
        assert_eq!(pins.len(), 1);
        assert_eq!(pins[0].ticket.callback.as_str(), "notify://two");
        assert_eq!(host.pin_submission_count().unwrap(), 2);
    }

    #[test]
    fn test_remove_and_clear() {
        let (publisher, _) = publisher_with_capacity(5);
        for (id, label) in [("a", "A"), ("b", "B"), ("c", "C")] {
            publisher.add_dynamic_shortcut(entry(id, label)).unwrap();
        }

        publisher.remove_dynamic_shortcut("b").unwrap();
        assert_eq!(listed_ids(&publisher), ["a", "c"]);

        publisher.remove_dynamic_shortcut("ghost").unwrap();
        assert_eq!(listed_ids(&publisher), ["a", "c"]);

        publisher.clear_dynamic_shortcuts().unwrap();
        assert!(listed_ids(&publisher).is_empty());
    }

    #[test]
    fn test_clones_share_host_state() {
        let (publisher, _) = publisher_with_capacity(3);
        let clone = publisher.clone();

        publisher.add_dynamic_shortcut(entry("a", "A")).unwrap();
        clone.add_dynamic_shortcut(entry("b", "B")).unwrap();

        assert_eq!(listed_ids(&publisher), ["a", "b"]);
        assert_eq!(listed_ids(&clone), ["a", "b"]);
    }

    #[test]
    fn test_capability_flags_pass_through() {
        let host = Arc::new(
            MemoryHost::builder()
                .pin_supported(false)
                .dynamic_supported(true)
                .build(),
        );
        let publisher = ShortcutPublisher::new(host);
        assert!(!publisher.is_pin_supported());
        assert!(publisher.is_dynamic_supported());
    }
}
