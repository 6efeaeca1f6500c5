//! Selector and topic derivation.
//!
//! Both are Keccak-256 digests of the exact signature text, using the
//! original Keccak padding that Ethereum adopted before NIST finalised
//! SHA3-256. The two variants produce different digests for every input, so
//! `tiny_keccak::Keccak` is used here and never `Sha3`.
//!
//! ```text
//!   selector("transfer(address,uint256)")  → a9059cbb
//!   topic("Transfer(address,address,uint256)")
//!     → 0xddf252ad1be2c89b69c2b068fc378daa952ba7f163c4a11628f55a4df523b3ef
//! ```
//!
//! No validation happens on the signature text. `transfer(address, uint)`
//! derives a perfectly consistent selector that no contract will ever
//! dispatch on. Callers must pass canonical ABI signatures: no whitespace,
//! canonical type names (`uint256`, not `uint`).

use serde::{Deserialize, Serialize};
use tiny_keccak::{Hasher, Keccak};

/// Keccak-256 digest of `input`.
pub fn keccak256(input: &[u8]) -> [u8; 32] {
    let mut hasher = Keccak::v256();
    let mut output = [0u8; 32];
    hasher.update(input);
    hasher.finalize(&mut output);
    output
}

/// Derive the 4-byte function selector of a signature.
pub fn selector(signature: &str) -> Selector {
    let digest = keccak256(signature.as_bytes());
    Selector(hex::encode(&digest[..4]))
}

/// Derive the 32-byte event topic of a signature.
pub fn topic(signature: &str) -> Topic {
    let digest = keccak256(signature.as_bytes());
    Topic(format!("0x{}", hex::encode(digest)))
}

/// A 4-byte function selector, stored as 8 lowercase hex chars without `0x`.
///
/// Deserialization goes through [`Selector::parse`].
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(into = "String", try_from = "String")]
pub struct Selector(String);

impl Selector {
    /// Parse a stored selector. Accepts an optional `0x` prefix and any hex
    /// case; returns `None` unless exactly 4 bytes of hex remain.
    pub fn parse(s: &str) -> Option<Self> {
        let hex = s.strip_prefix("0x").unwrap_or(s);
        if hex.len() == 8 && hex.chars().all(|c| c.is_ascii_hexdigit()) {
            Some(Self(hex.to_ascii_lowercase()))
        } else {
            None
        }
    }

    pub fn as_hex(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for Selector {
    type Error = String;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        Self::parse(&s).ok_or_else(|| format!("\"{s}\" is not a 4-byte hex selector"))
    }
}

impl From<Selector> for String {
    fn from(s: Selector) -> Self {
        s.0
    }
}

impl std::fmt::Display for Selector {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A 32-byte event topic, `0x`-prefixed lowercase hex.
///
/// Topics loaded from a registry config are kept verbatim, so a hand-edited
/// file may carry a placeholder that is not a real digest.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Topic(String);

impl Topic {
    pub fn new(hex: impl Into<String>) -> Self {
        Self(hex.into())
    }

    pub fn as_hex(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for Topic {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}
