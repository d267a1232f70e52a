//! # Archive Errors
//!
//! Format mismatches (wrong magic or version) are kept apart from faults
//! in an archive that is otherwise recognised.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Errors that can occur while opening or decoding a BIF archive.
///
/// The variants fall into three classes:
///
/// - **Format mismatch** ([`NotAnArchive`](Self::NotAnArchive),
///   [`UnsupportedVersion`](Self::UnsupportedVersion)): the stream is not a
///   BIF archive this reader understands.
/// - **Unsupported feature** ([`FixedResources`](Self::FixedResources)): a
///   well-formed archive that uses the fixed-resource table.
/// - **I/O** ([`Open`](Self::Open), [`Read`](Self::Read)): the header looked
///   fine but the bytes behind it are missing or unreadable.
#[derive(Debug, Error)]
pub enum ArchiveError {
    #[error("failed to open '{}': {source}", path.display())]
    Open { path: PathBuf, source: io::Error },

    #[error("not a BIF archive (magic {})", fourcc(*found))]
    NotAnArchive { found: u32 },

    #[error("unsupported BIF version {}", fourcc(*found))]
    UnsupportedVersion { found: u32 },

    #[error("fixed resources are not supported ({count} declared)")]
    FixedResources { count: u32 },

    #[error("read error: {0}")]
    Read(#[from] io::Error),

    #[error("no resource at index {index} (archive has {count})")]
    NoSuchResource { index: usize, count: usize },
}

impl ArchiveError {
    /// Whether this error means "not an archive of the expected kind", as
    /// opposed to a broken archive or an I/O problem.
    pub fn is_format_mismatch(&self) -> bool {
        matches!(
            self,
            ArchiveError::NotAnArchive { .. } | ArchiveError::UnsupportedVersion { .. }
        )
    }
}

pub type Result<T> = std::result::Result<T, ArchiveError>;

/// Render a big-endian tag as `'ABCD'`, or as hex if it isn't printable.
pub(crate) fn fourcc(tag: u32) -> String {
    let bytes = tag.to_be_bytes();
    if bytes.iter().all(|b| b.is_ascii_graphic() || *b == b' ') {
        format!("'{}'", String::from_utf8_lossy(&bytes))
    } else {
        format!("{tag:#010x}")
    }
}
