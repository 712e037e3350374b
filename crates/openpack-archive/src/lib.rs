//! Archive materialization primitives for openpack.
//!
//! This crate owns the byte-exact parts of the package pipeline:
//!
//! - [`ArchiveBuilder`]: encodes an ordered list of (path, bytes) entries
//!   into a tar stream with hand-written 512-byte headers. The header
//!   layout, checksum algorithm, block padding and end-of-archive marker
//!   are the product contract here, so they are encoded directly rather
//!   than delegated to a tar library.
//! - [`compress::gzip`]: deterministic gzip compression of the finished
//!   tar bytes (fixed gzip mtime and OS byte).
//! - [`digest::sha1_hex`]: the 160-bit content digest advertised in
//!   package manifests, computed over the exact bytes that are cached
//!   and later served.
//!
//! The total encoded length is computable in advance:
//! `sum(512 + round_up(len, 512)) + 1024` for the two trailing zero blocks.

pub mod compress;
pub mod digest;
mod error;
pub mod tar;

pub use error::ArchiveError;
pub use tar::{ArchiveBuilder, ArchiveEntry, BLOCK_SIZE};
