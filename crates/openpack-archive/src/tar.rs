//! Tar stream encoding with hand-written headers.
//!
//! Each entry is a 512-byte header followed by its content, zero-padded to
//! the next block boundary. Two all-zero blocks terminate the archive.
//!
//! Header fields (offsets within the 512-byte block):
//!
//! | field    | offset    | encoding                                  |
//! |----------|-----------|-------------------------------------------|
//! | name     | 0..100    | raw bytes, truncated to 100               |
//! | mode     | 100..108  | `"0000644 "`                              |
//! | size     | 124..136  | 11-digit zero-padded octal + space        |
//! | mtime    | 136..148  | same encoding as size                     |
//! | checksum | 148..156  | 6-digit octal, NUL, space (see below)     |
//! | typeflag | 156       | `'0'` (regular file)                      |
//!
//! The checksum is the unsigned byte sum of the full header with the
//! checksum field treated as eight ASCII spaces during the sum.

use crate::error::{ArchiveError, ArchiveResult};

/// Tar block size in bytes.
pub const BLOCK_SIZE: usize = 512;

/// One file inside an archive: a relative path and its content bytes.
#[derive(Debug, Clone)]
pub struct ArchiveEntry {
    pub path: String,
    pub content: Vec<u8>,
}

/// Encodes an ordered list of entries into a tar stream.
///
/// Entry paths must be unique within one archive; [`ArchiveBuilder::append`]
/// rejects duplicates. Entries are emitted in append order.
#[derive(Debug, Default)]
pub struct ArchiveBuilder {
    entries: Vec<ArchiveEntry>,
}

impl ArchiveBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an entry. Fails if `path` is already present.
    pub fn append(
        &mut self,
        path: impl Into<String>,
        content: impl Into<Vec<u8>>,
    ) -> ArchiveResult<()> {
        let path = path.into();
        if self.entries.iter().any(|e| e.path == path) {
            return Err(ArchiveError::DuplicatePath { path });
        }
        self.entries.push(ArchiveEntry {
            path,
            content: content.into(),
        });
        Ok(())
    }

    /// Number of entries appended so far.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Total encoded length: one header block plus padded content per entry,
    /// plus the two trailing zero blocks.
    pub fn encoded_len(&self) -> usize {
        self.entries
            .iter()
            .map(|e| BLOCK_SIZE + padded_len(e.content.len()))
            .sum::<usize>()
            + 2 * BLOCK_SIZE
    }

    /// Encode all entries into the final tar byte stream.
    ///
    /// `mtime` is the Unix timestamp stamped into every header.
    pub fn finish(self, mtime: u64) -> Vec<u8> {
        let total = self.encoded_len();
        let mut out = Vec::with_capacity(total);

        for entry in &self.entries {
            out.extend_from_slice(&encode_header(&entry.path, entry.content.len(), mtime));
            out.extend_from_slice(&entry.content);
            out.resize(out.len() + padded_len(entry.content.len()) - entry.content.len(), 0);
        }

        // End-of-archive marker.
        out.resize(out.len() + 2 * BLOCK_SIZE, 0);

        debug_assert_eq!(out.len(), total);
        out
    }
}

fn padded_len(content_len: usize) -> usize {
    content_len.div_ceil(BLOCK_SIZE) * BLOCK_SIZE
}

/// Encode one 512-byte header.
fn encode_header(path: &str, size: usize, mtime: u64) -> [u8; BLOCK_SIZE] {
    let mut header = [0_u8; BLOCK_SIZE];

    let name = path.as_bytes();
    let name_len = name.len().min(100);
    header[..name_len].copy_from_slice(&name[..name_len]);

    header[100..108].copy_from_slice(b"0000644 ");
    write_octal_field(&mut header[124..136], size as u64);
    write_octal_field(&mut header[136..148], mtime);
    header[156] = b'0';

    // Sum with the checksum field blanked to spaces, then write the result
    // over it as six zero-padded octal digits, a NUL and a space.
    header[148..156].copy_from_slice(b"        ");
    let sum: u32 = header.iter().map(|&b| u32::from(b)).sum();
    let field = format!("{sum:06o}\0 ");
    header[148..156].copy_from_slice(field.as_bytes());

    header
}

/// 11-digit zero-padded octal followed by a space, into a 12-byte field.
fn write_octal_field(field: &mut [u8], value: u64) {
    let encoded = format!("{value:011o} ");
    field.copy_from_slice(encoded.as_bytes());
}
