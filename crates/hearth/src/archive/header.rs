//! # BIF Header
//!
//! ```text
//! 0   magic        "BIFF"          big-endian tag
//! 4   version      "V1  " | "V1.1" big-endian tag
//! 8   var count    u32 LE
//! 12  fixed count  u32 LE          must be 0
//! 16  table offset u32 LE          absolute
//! ```

use std::io::{Read, Seek};

use serde::Serialize;

use super::error::{ArchiveError, Result};
use super::stream::StreamExt;

/// `BIFF`, read big-endian.
pub const BIF_MAGIC: u32 = u32::from_be_bytes(*b"BIFF");

/// Size of the fixed header in bytes.
pub const HEADER_SIZE: u64 = 20;

/// The two archive revisions this reader understands.
///
/// They differ only in the width of a resource table entry: V1.1 inserts a
/// 4-byte flags field after the resource ID.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum BifVersion {
    /// `V1  `
    V1,
    /// `V1.1`
    V11,
}

impl BifVersion {
    /// Decode a big-endian version tag.
    pub fn from_tag(tag: u32) -> Option<Self> {
        match &tag.to_be_bytes() {
            b"V1  " => Some(Self::V1),
            b"V1.1" => Some(Self::V11),
            _ => None,
        }
    }

    /// The tag as it appears on disk (big-endian).
    pub fn tag(self) -> u32 {
        match self {
            Self::V1 => u32::from_be_bytes(*b"V1  "),
            Self::V11 => u32::from_be_bytes(*b"V1.1"),
        }
    }

    /// Byte width of one variable-resource table entry.
    pub fn record_size(self) -> u64 {
        match self {
            Self::V1 => 16,
            Self::V11 => 20,
        }
    }

    /// Whether entries carry a flags field between ID and offset.
    pub fn has_flags(self) -> bool {
        matches!(self, Self::V11)
    }
}

/// The fixed 20-byte header at the start of every BIF archive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct BifHeader {
    pub version: BifVersion,
    pub var_res_count: u32,
    pub fix_res_count: u32,
    /// Absolute byte offset of the variable-resource table.
    pub var_table_offset: u32,
}

impl BifHeader {
    /// Decode the header from the current stream position.
    ///
    /// Structural checks happen as soon as each field is read, so a wrong
    /// magic is reported as [`ArchiveError::NotAnArchive`] even if the rest of
    /// the header is missing. A non-zero fixed-resource count is rejected
    /// before the table offset is read.
    pub fn read<R: Read + Seek + ?Sized>(stream: &mut R) -> Result<Self> {
        let magic = stream.read_u32_be()?;
        if magic != BIF_MAGIC {
            return Err(ArchiveError::NotAnArchive { found: magic });
        }

        let tag = stream.read_u32_be()?;
        let version =
            BifVersion::from_tag(tag).ok_or(ArchiveError::UnsupportedVersion { found: tag })?;

        let var_res_count = stream.read_u32_le()?;
        let fix_res_count = stream.read_u32_le()?;
        if fix_res_count != 0 {
            return Err(ArchiveError::FixedResources {
                count: fix_res_count,
            });
        }

        let var_table_offset = stream.read_u32_le()?;

        Ok(Self {
            version,
            var_res_count,
            fix_res_count,
            var_table_offset,
        })
    }
}
