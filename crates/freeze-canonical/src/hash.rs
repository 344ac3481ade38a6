//! Content hashes of frozen values.
//!
//! Hashes are computed as `sha256(domain_separator || compact rendering)`
//! over the stringified frozen form, so they are reproducible across
//! processes and never depend on allocation addresses.

use base64::Engine;
use serde::{Deserialize, Serialize};
use sha2::{Digest as Sha2Digest, Sha256};

use crate::freeze::freeze_stringified;
use crate::frozen::Frozen;
use crate::sort::recursive_sort;
use crate::value::Value;

/// Domain separator for order-independent hashes: `b"freeze:stable:v1\0"`.
const STABLE_DOMAIN_SEPARATOR: &[u8] = b"freeze:stable:v1\0";

/// Domain separator for order-sensitive hashes: `b"freeze:recursive:v1\0"`.
const RECURSIVE_DOMAIN_SEPARATOR: &[u8] = b"freeze:recursive:v1\0";

/// Supported digest algorithms.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum DigestAlg {
    /// SHA-256.
    #[serde(rename = "sha-256")]
    Sha256,
}

/// Algorithm + digest bytes, encoded as base64url without padding.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Fingerprint {
    /// Digest algorithm.
    pub alg: DigestAlg,
    /// Base64URL (no padding) digest bytes.
    pub b64: String,
}

impl Fingerprint {
    fn from_bytes(bytes: &[u8; 32]) -> Self {
        Self {
            alg: DigestAlg::Sha256,
            b64: base64::engine::general_purpose::URL_SAFE_NO_PAD.encode(bytes),
        }
    }
}

fn digest_bytes(separator: &[u8], frozen: &Frozen) -> [u8; 32] {
    let mut hasher = Sha256::new();
    hasher.update(separator);
    hasher.update(frozen.to_string().as_bytes());
    hasher.finalize().into()
}

fn leading_u64(bytes: &[u8; 32]) -> u64 {
    let mut head = [0u8; 8];
    head.copy_from_slice(&bytes[..8]);
    u64::from_be_bytes(head)
}

fn stable_bytes(value: &Value) -> [u8; 32] {
    digest_bytes(
        STABLE_DOMAIN_SEPARATOR,
        &recursive_sort(&freeze_stringified(value), false),
    )
}

fn recursive_bytes(value: &Value) -> [u8; 32] {
    digest_bytes(RECURSIVE_DOMAIN_SEPARATOR, &freeze_stringified(value))
}

/// Order-independent fingerprint of the sorted frozen form.
pub fn stable_digest(value: &Value) -> Fingerprint {
    Fingerprint::from_bytes(&stable_bytes(value))
}

/// Order-sensitive fingerprint of the frozen form.
pub fn recursive_digest(value: &Value) -> Fingerprint {
    Fingerprint::from_bytes(&recursive_bytes(value))
}

/// Order-independent hash: equal for values that differ only in sibling order.
pub fn stable_hash(value: &Value) -> u64 {
    leading_u64(&stable_bytes(value))
}

/// Order-sensitive hash of the frozen form.
pub fn recursive_hash(value: &Value) -> u64 {
    leading_u64(&recursive_bytes(value))
}

/// [`stable_hash`] and [`stable_digest`] from a single freeze and digest.
pub fn stable_hash_and_digest(value: &Value) -> (u64, Fingerprint) {
    let bytes = stable_bytes(value);
    (leading_u64(&bytes), Fingerprint::from_bytes(&bytes))
}

/// [`recursive_hash`] and [`recursive_digest`] from a single freeze and digest.
pub fn recursive_hash_and_digest(value: &Value) -> (u64, Fingerprint) {
    let bytes = recursive_bytes(value);
    (leading_u64(&bytes), Fingerprint::from_bytes(&bytes))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stable_hash_ignores_sibling_order() {
        let a = Value::list([Value::from(1), Value::map([("x", 1), ("y", 2)])]);
        let b = Value::list([Value::map([("y", 2), ("x", 1)]), Value::from(1)]);
        assert_eq!(stable_hash(&a), stable_hash(&b));
        assert_ne!(recursive_hash(&a), recursive_hash(&b));
    }

    #[test]
    fn stable_and_recursive_hashes_are_separated() {
        let value = Value::from("same");
        assert_ne!(stable_hash(&value), recursive_hash(&value));
    }

    #[test]
    fn combined_helpers_match_separate_calls() {
        let value = Value::list([Value::from(2), Value::map([("k", "v")])]);
        assert_eq!(
            stable_hash_and_digest(&value),
            (stable_hash(&value), stable_digest(&value))
        );
        assert_eq!(
            recursive_hash_and_digest(&value),
            (recursive_hash(&value), recursive_digest(&value))
        );
    }

    #[test]
    fn fingerprint_is_base64url() {
        let fingerprint = stable_digest(&Value::list([1, 2, 3]));
        assert_eq!(fingerprint.alg, DigestAlg::Sha256);
        assert_eq!(fingerprint.b64.len(), 43);
        assert!(fingerprint
            .b64
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_'));
    }
}
