//! Cache key derivation.
//!
//! Keys are derived from the request kind and the prompt, normalised by
//! lower-casing and trimming surrounding whitespace, so that
//! `"Area of a triangle"` and `"  area of a triangle  "` share an entry.

use sha2::{Digest, Sha256};

use crate::storage::CACHE_PREFIX;
use crate::types::AiKind;

/// Lower-case and trim a prompt for keying.
pub fn normalize_prompt(prompt: &str) -> String {
    prompt.to_lowercase().trim().to_string()
}

fn composite(kind: AiKind, prompt: &str) -> String {
    format!("{}:{}", kind.as_str(), normalize_prompt(prompt))
}

/// Storage key for a cached response: `ai-cache-` + 16 hex chars of SHA-256.
pub fn cache_key(kind: AiKind, prompt: &str) -> String {
    let digest = Sha256::digest(composite(kind, prompt).as_bytes());
    format!("{CACHE_PREFIX}{}", hex::encode(&digest[..8]))
}

/// Key format written by earlier app versions: a 32-bit `h * 31 + unit`
/// rolling hash over UTF-16 code units, printed as a signed decimal.
///
/// Only used to find and migrate entries from existing installs.
pub fn legacy_cache_key(kind: AiKind, prompt: &str) -> String {
    format!("{CACHE_PREFIX}{}", legacy_hash(&composite(kind, prompt)))
}

fn legacy_hash(s: &str) -> i32 {
    s.encode_utf16().fold(0i32, |hash, unit| {
        hash.wrapping_mul(31).wrapping_add(i32::from(unit))
    })
}
