//! Output formatting utilities.

use freeze_canonical::{vformat, DigestAlg, Fingerprint, FreezeError, Frozen};

/// Formats a frozen tree as canonical JSON or as the narrow rendering.
pub fn format_frozen(frozen: &Frozen, json: bool) -> Result<String, FreezeError> {
    if json {
        frozen.to_canonical_json()
    } else {
        Ok(vformat(frozen))
    }
}

/// Formats a hash and its fingerprint as `HASH  ALG:B64`.
pub fn format_hash(hash: u64, fingerprint: &Fingerprint) -> String {
    format!("{:016x}  {}:{}", hash, alg_name(fingerprint.alg), fingerprint.b64)
}

fn alg_name(alg: DigestAlg) -> &'static str {
    match alg {
        DigestAlg::Sha256 => "sha-256",
    }
}
