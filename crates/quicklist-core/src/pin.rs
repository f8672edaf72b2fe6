//! Pin request descriptors and the deterministic request code.

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

/// Caller-supplied completion target for a pin request.
///
/// Opaque to the library: the host delivers the completion notice to
/// whatever this names (a callback URI, a channel id, a broadcast topic).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PinCallback(String);

impl PinCallback {
    /// Wrap a completion target.
    pub fn new(target: impl Into<String>) -> Self {
        Self(target.into())
    }

    /// Borrow the target text.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<String> for PinCallback {
    fn from(target: String) -> Self {
        Self(target)
    }
}

impl From<&str> for PinCallback {
    fn from(target: &str) -> Self {
        Self(target.to_string())
    }
}

/// Host-minted payload echoed back when a pin request completes.
///
/// Only the issuing host interprets the contents; the publisher threads the
/// receipt through [`PinTicket`] without looking inside.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PinReceipt(String);

impl PinReceipt {
    /// Wrap a receipt payload.
    pub fn new(payload: impl Into<String>) -> Self {
        Self(payload.into())
    }

    /// Borrow the payload text.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Consume the receipt, returning the payload.
    pub fn into_inner(self) -> String {
        self.0
    }
}

/// Delivery token submitted alongside a pin request.
///
/// Bundles the caller's completion target with the host's receipt and a
/// request code derived from the shortcut id.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PinTicket {
    /// 16-bit code derived from the shortcut id; see [`request_code`].
    pub request_code: u16,
    /// Where the host delivers the completion notice.
    pub callback: PinCallback,
    /// Host-minted payload echoed back on completion.
    pub receipt: PinReceipt,
}

impl PinTicket {
    /// Assemble a ticket for the given shortcut id.
    pub fn new(shortcut_id: &str, callback: PinCallback, receipt: PinReceipt) -> Self {
        Self {
            request_code: request_code(shortcut_id),
            callback,
            receipt,
        }
    }
}

/// Derive the 16-bit request code for a shortcut id.
///
/// The code is the first two bytes of the SHA-256 digest of the id, read
/// big-endian, so it is stable across processes, runs, and platforms.
/// Distinct ids may collide; the code disambiguates concurrent requests at
/// the launcher, it does not identify entries.
pub fn request_code(id: &str) -> u16 {
    let digest = Sha256::digest(id.as_bytes());
    u16::from_be_bytes([digest[0], digest[1]])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_code_is_deterministic() {
        assert_eq!(request_code("run-script"), request_code("run-script"));
        assert_ne!(request_code("run-script"), request_code("run-script-2"));
    }

    #[test]
    fn test_request_code_known_values() {
        // First two bytes of sha256("run-script") are 0x6b 0xdb.
        assert_eq!(request_code("run-script"), 0x6bdb);
        // First two bytes of sha256("alpha") are 0x8e 0xd3.
        assert_eq!(request_code("alpha"), 0x8ed3);
    }

    #[test]
    fn test_ticket_carries_code_for_id() {
        let ticket = PinTicket::new(
            "alpha",
            PinCallback::new("notify://pinned"),
            PinReceipt::new("receipt-1"),
        );
        assert_eq!(ticket.request_code, request_code("alpha"));
        assert_eq!(ticket.callback.as_str(), "notify://pinned");
        assert_eq!(ticket.receipt.as_str(), "receipt-1");
    }
}
