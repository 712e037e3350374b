//! Content digests for archive bytes.
//!
//! npm manifests advertise a `shasum`: the SHA-1 of the tarball bytes,
//! hex-lowercase, 40 characters. The digest is always computed over the
//! final byte sequence that gets cached and served.

use sha1::{Digest, Sha1};

/// SHA-1 of `bytes`, hex-lowercase.
pub fn sha1_hex(bytes: &[u8]) -> String {
    hex::encode(Sha1::digest(bytes))
}
