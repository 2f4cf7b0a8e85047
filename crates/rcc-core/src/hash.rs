//! 64-bit content hashing and the fixed-width filename encoding of hashes
//!
//! Hashes are FNV-1a over raw bytes. Encoded hashes are 11 characters drawn from
//! `A-Z a-z 0-9 + _`, least significant 6 bits first. Since 11 * 6 = 66, the last
//! character only ever sees the top 4 bits of the hash and is therefore limited to
//! the first 16 symbols of the alphabet. Existing caches on disk depend on this
//! exact layout.

use std::fmt;

const FNV_OFFSET: u64 = 14_695_981_039_346_656_037;
const FNV_PRIME: u64 = 1_099_511_628_211;

/// Alphabet of the encoded form, indexed by 6-bit groups
pub const ALPHABET: &[u8; 64] =
    b"ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789+_";

/// Length of every encoded hash
pub const ENCODED_LEN: usize = 11;

/// FNV-1a 64-bit hash of `bytes`
///
/// Bytes are taken as unsigned, so keys for non-ASCII input differ from a
/// hash over sign-extended `char`s.
pub fn fnv1a_64(bytes: &[u8]) -> u64 {
    let mut hash = FNV_OFFSET;
    for &b in bytes {
        hash ^= u64::from(b);
        hash = hash.wrapping_mul(FNV_PRIME);
    }
    hash
}

/// Encode a hash as exactly [`ENCODED_LEN`] characters of [`ALPHABET`]
pub fn encode(mut value: u64) -> String {
    let mut out = String::with_capacity(ENCODED_LEN);
    for _ in 0..ENCODED_LEN {
        out.push(ALPHABET[(value & 0x3F) as usize] as char);
        value >>= 6;
    }
    out
}

/// Hash then encode
pub fn hash_encode(text: &str) -> String {
    encode(fnv1a_64(text.as_bytes()))
}

/// Filename stem identifying an ephemeral artifact
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CacheKey(String);

impl CacheKey {
    /// Derive a key from the canonical request text
    pub fn from_canonical(text: &str) -> Self {
        Self(hash_encode(text))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CacheKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Configuration-only hash embedded verbatim in the rendered source
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct IdentifierTag(String);

impl IdentifierTag {
    pub fn from_canonical(text: &str) -> Self {
        Self(hash_encode(text))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for IdentifierTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
