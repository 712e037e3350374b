//! Deterministic gzip compression.
//!
//! The gzip stream carries a fixed mtime (0) and OS byte (255, "unknown") so
//! that identical tar bytes always compress to identical output. The digest
//! advertised in a manifest covers these compressed bytes, which are exactly
//! what the cache stores and the tarball endpoint serves.

use std::io::Write;

use flate2::{Compression, GzBuilder};

/// Compress `bytes` into a gzip stream.
pub fn gzip(bytes: &[u8]) -> std::io::Result<Vec<u8>> {
    let mut encoder = GzBuilder::new()
        .mtime(0)
        .operating_system(255)
        .write(Vec::new(), Compression::best());
    encoder.write_all(bytes)?;
    encoder.finish()
}
