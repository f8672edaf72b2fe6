//! In-memory shortcut host.

use super::traits::{HostConfig, ShortcutHost};
use crate::entry::ShortcutEntry;
use crate::error::{Result, ShortcutError};
use crate::pin::{PinReceipt, PinTicket};
use std::sync::{Mutex, MutexGuard};
use tracing::debug;

/// A pin request recorded by [`MemoryHost`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PinRequest {
    /// The entry the caller asked to pin.
    pub entry: ShortcutEntry,
    /// The ticket submitted with the request.
    pub ticket: PinTicket,
}

/// In-process shortcut host with no persistence.
///
/// Keeps the dynamic set in a `Vec` so iteration order is insertion order.
/// Useful as a test double and for embedders that bring their own
/// persistence; everything is lost when the host is dropped.
pub struct MemoryHost {
    config: HostConfig,
    inner: Mutex<Inner>,
}

#[derive(Default)]
struct Inner {
    dynamic: Vec<ShortcutEntry>,
    pins: Vec<PinRequest>,
    pin_submissions: usize,
}

impl MemoryHost {
    /// Create a host with the default configuration.
    pub fn new() -> Self {
        Self::with_config(HostConfig::default())
    }

    /// Create a host with explicit configuration.
    pub fn with_config(config: HostConfig) -> Self {
        Self {
            config,
            inner: Mutex::new(Inner::default()),
        }
    }

    /// Create a builder for configuring a host.
    pub fn builder() -> MemoryHostBuilder {
        MemoryHostBuilder::new()
    }

    /// The configuration this host was created with.
    pub fn config(&self) -> &HostConfig {
        &self.config
    }

    /// Pin requests currently held, oldest first.
    ///
    /// At most one request per shortcut id; a re-request replaces the
    /// earlier one in place.
    pub fn pin_requests(&self) -> Result<Vec<PinRequest>> {
        Ok(self.lock_inner()?.pins.clone())
    }

    /// Number of times [`ShortcutHost::request_pin_shortcut`] was invoked,
    /// including replacements.
    pub fn pin_submission_count(&self) -> Result<usize> {
        Ok(self.lock_inner()?.pin_submissions)
    }

    fn lock_inner(&self) -> Result<MutexGuard<'_, Inner>> {
        self.inner
            .lock()
            .map_err(|_| ShortcutError::Other("Shortcut host state lock poisoned".to_string()))
    }
}

impl Default for MemoryHost {
    fn default() -> Self {
        Self::new()
    }
}

/// Builder for [`MemoryHost`].
pub struct MemoryHostBuilder {
    config: HostConfig,
}

impl MemoryHostBuilder {
    /// Start from the default configuration.
    pub fn new() -> Self {
        Self {
            config: HostConfig::default(),
        }
    }

    /// Set the dynamic shortcut capacity.
    pub fn capacity(mut self, max_dynamic: usize) -> Self {
        self.config.max_dynamic = max_dynamic;
        self
    }

    /// Enable or disable the pin-request flow.
    pub fn pin_supported(mut self, supported: bool) -> Self {
        self.config.pin_supported = supported;
        self
    }

    /// Enable or disable dynamic shortcuts.
    pub fn dynamic_supported(mut self, supported: bool) -> Self {
        self.config.dynamic_supported = supported;
        self
    }

    /// Finish building the host.
    pub fn build(self) -> MemoryHost {
        MemoryHost::with_config(self.config)
    }
}

impl Default for MemoryHostBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl ShortcutHost for MemoryHost {
    fn is_dynamic_supported(&self) -> bool {
        self.config.dynamic_supported
    }

    fn is_pin_supported(&self) -> bool {
        self.config.pin_supported
    }

    fn list_dynamic_shortcuts(&self) -> Result<Vec<ShortcutEntry>> {
        Ok(self.lock_inner()?.dynamic.clone())
    }

    fn add_dynamic_shortcuts(&self, entries: &[ShortcutEntry]) -> Result<()> {
        for entry in entries {
            entry.validate()?;
        }

        let mut inner = self.lock_inner()?;

        // Capacity check runs on the batch's net growth, before anything is
        // applied. Ids already stored (or repeated within the batch) are
        // updates and take no slot.
        let mut new_ids: Vec<&str> = Vec::new();
        for entry in entries {
            let known = inner.dynamic.iter().any(|held| held.id == entry.id)
                || new_ids.contains(&entry.id.as_str());
            if !known {
                new_ids.push(&entry.id);
            }
        }
        if inner.dynamic.len() + new_ids.len() > self.config.max_dynamic {
            return Err(ShortcutError::CapacityExceeded {
                limit: self.config.max_dynamic,
            });
        }

        for entry in entries {
            if let Some(held) = inner.dynamic.iter_mut().find(|held| held.id == entry.id) {
                // Update in place keeps the original insertion position.
                *held = entry.clone();
            } else {
                inner.dynamic.push(entry.clone());
            }
        }
        debug!(
            "Dynamic set now holds {} of {} entries",
            inner.dynamic.len(),
            self.config.max_dynamic
        );
        Ok(())
    }

    fn remove_dynamic_shortcuts(&self, ids: &[String]) -> Result<()> {
        let mut inner = self.lock_inner()?;
        inner.dynamic.retain(|entry| !ids.contains(&entry.id));
        Ok(())
    }

    fn create_pin_receipt(&self, entry: &ShortcutEntry) -> Result<PinReceipt> {
        entry.validate()?;
        Ok(PinReceipt::new(format!("memory:pin:{}", entry.id)))
    }

    fn request_pin_shortcut(&self, entry: &ShortcutEntry, ticket: PinTicket) -> Result<()> {
        entry.validate()?;
        let mut inner = self.lock_inner()?;
        inner.pin_submissions += 1;
        let request = PinRequest {
            entry: entry.clone(),
            ticket,
        };
        if let Some(held) = inner.pins.iter_mut().find(|held| held.entry.id == entry.id) {
            debug!("Replacing pending pin request for '{}'", entry.id);
            *held = request;
        } else {
            debug!("Recording pin request for '{}'", entry.id);
            inner.pins.push(request);
        }
        Ok(())
    }
}
