//! Shortcut entry model and builder.

use crate::error::{Result, ShortcutError};
use serde::{Deserialize, Serialize};

/// Opaque icon resource attached to a shortcut.
///
/// The library never decodes or renders icon bytes; hosts store and return
/// them untouched. An empty icon is valid and means "launcher default".
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ShortcutIcon(Vec<u8>);

impl ShortcutIcon {
    /// Wrap raw icon bytes.
    pub fn from_bytes(bytes: impl Into<Vec<u8>>) -> Self {
        Self(bytes.into())
    }

    /// Borrow the raw icon bytes.
    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    /// Consume the icon, returning the raw bytes.
    pub fn into_bytes(self) -> Vec<u8> {
        self.0
    }

    /// Whether any icon data is attached.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl From<Vec<u8>> for ShortcutIcon {
    fn from(bytes: Vec<u8>) -> Self {
        Self(bytes)
    }
}

impl From<&[u8]> for ShortcutIcon {
    fn from(bytes: &[u8]) -> Self {
        Self(bytes.to_vec())
    }
}

/// Opaque invocation descriptor carried by a shortcut.
///
/// A host passes the descriptor through to the launcher when the shortcut
/// activates; the library attaches no meaning to its contents. Embedders
/// typically put a command line or a URI here.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ShortcutAction(String);

impl ShortcutAction {
    /// Wrap an invocation descriptor.
    pub fn new(action: impl Into<String>) -> Self {
        Self(action.into())
    }

    /// Borrow the descriptor text.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<String> for ShortcutAction {
    fn from(action: String) -> Self {
        Self(action)
    }
}

impl From<&str> for ShortcutAction {
    fn from(action: &str) -> Self {
        Self(action.to_string())
    }
}

/// A launcher shortcut record.
///
/// An entry's `id` is its identity everywhere in the library: dynamic
/// inserts with an existing id are in-place updates, pin re-requests with
/// an existing id replace the pending request, and the pin request code is
/// derived from it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShortcutEntry {
    /// Unique key within a host's shortcut set.
    pub id: String,
    /// Label shown by the launcher.
    pub label: String,
    /// Opaque icon resource.
    pub icon: ShortcutIcon,
    /// Opaque invocation descriptor.
    pub action: ShortcutAction,
}

impl ShortcutEntry {
    /// Create a builder for an entry with the given id.
    pub fn builder(id: impl Into<String>) -> ShortcutEntryBuilder {
        ShortcutEntryBuilder::new(id)
    }

    /// Check that the entry is well formed.
    ///
    /// Hosts run this before accepting an entry: `id` and `label` must be
    /// non-blank. Icon and action may be empty.
    pub fn validate(&self) -> Result<()> {
        if self.id.trim().is_empty() {
            return Err(ShortcutError::validation("id", "must not be blank"));
        }
        if self.label.trim().is_empty() {
            return Err(ShortcutError::validation("label", "must not be blank"));
        }
        Ok(())
    }
}

/// Builder for [`ShortcutEntry`].
pub struct ShortcutEntryBuilder {
    entry: ShortcutEntry,
}

impl ShortcutEntryBuilder {
    /// Start a builder for the given shortcut id.
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            entry: ShortcutEntry {
                id: id.into(),
                ..ShortcutEntry::default()
            },
        }
    }

    /// Set the launcher label.
    pub fn label(mut self, label: impl Into<String>) -> Self {
        self.entry.label = label.into();
        self
    }

    /// Attach an icon resource.
    pub fn icon(mut self, icon: impl Into<ShortcutIcon>) -> Self {
        self.entry.icon = icon.into();
        self
    }

    /// Set the invocation descriptor.
    pub fn action(mut self, action: impl Into<ShortcutAction>) -> Self {
        self.entry.action = action.into();
        self
    }

    /// Finish building the entry.
    ///
    /// Validation is deferred to the host boundary, so a builder can hold a
    /// partially filled entry without erroring.
    pub fn build(self) -> ShortcutEntry {
        self.entry
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder_sets_all_fields() {
        let entry = ShortcutEntry::builder("run-script")
            .label("Run Script")
            .icon(vec![0x89, 0x50, 0x4e, 0x47])
            .action("quicklist://run/script")
            .build();

        assert_eq!(entry.id, "run-script");
        assert_eq!(entry.label, "Run Script");
        assert_eq!(entry.icon.as_bytes(), &[0x89, 0x50, 0x4e, 0x47]);
        assert_eq!(entry.action.as_str(), "quicklist://run/script");
        assert!(entry.validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_blank_id() {
        let entry = ShortcutEntry::builder("   ").label("Something").build();
        let err = entry.validate().unwrap_err();
        assert!(matches!(err, ShortcutError::Validation { ref field, .. } if field == "id"));
    }

    #[test]
    fn test_validate_rejects_blank_label() {
        let entry = ShortcutEntry::builder("run-script").build();
        let err = entry.validate().unwrap_err();
        assert!(matches!(err, ShortcutError::Validation { ref field, .. } if field == "label"));
    }

    #[test]
    fn test_icon_and_action_may_be_empty() {
        let entry = ShortcutEntry::builder("run-script").label("Run Script").build();
        assert!(entry.icon.is_empty());
        assert_eq!(entry.action.as_str(), "");
        assert!(entry.validate().is_ok());
    }
}
