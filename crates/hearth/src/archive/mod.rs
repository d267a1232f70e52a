//! # BIF Archives
//!
//! A BIF file packs many game resources into one blob. It carries no names:
//! the resource's position in the table is its identity, and a separate index
//! (out of scope here) maps names onto `(archive, position)` pairs.
//!
//! ## Layout
//!
//! ```text
//! offset  field                     encoding
//! 0       magic "BIFF"              4 bytes, big-endian
//! 4       version "V1  " / "V1.1"   4 bytes, big-endian
//! 8       variable resource count   u32 LE
//! 12      fixed resource count      u32 LE   (must be 0)
//! 16      variable table offset     u32 LE   (absolute)
//! ...
//! table   entries                   V1:   id, offset, size, type      (16 bytes)
//!                                   V1.1: id, flags, offset, size, type (20 bytes)
//! ```
//!
//! The mixed byte order is part of the format. The two tags are compared as
//! big-endian words, every number after them is little-endian.
//!
//! ## Failure Classes
//!
//! [`BifFile::load`] distinguishes "this isn't a BIF we understand"
//! ([`ArchiveError::is_format_mismatch`]) from "this BIF is damaged"
//! ([`ArchiveError::Read`]), and reports the unsupported fixed-resource table
//! separately from both. Every failure is logged as a warning.
//!
//! A failed load may leave a partially filled table behind. Callers must treat
//! the error as authoritative and not look at the table.

mod error;
mod file_type;
mod header;
mod stream;

use std::fs::File;
use std::io::{BufReader, Read, Seek};
use std::path::Path;

use serde::Serialize;

pub use error::{ArchiveError, Result};
pub use file_type::FileType;
pub use header::{BIF_MAGIC, BifHeader, BifVersion, HEADER_SIZE};

use stream::StreamExt;

/// Upper bound on the capacity reserved from the header's declared count.
/// Larger tables still load, they just grow as entries are decoded.
const MAX_RESERVE: usize = 1 << 16;

/// One entry of the variable-resource table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Resource {
    /// Byte offset of the resource data from the start of the archive.
    pub offset: u32,
    /// Byte length of the resource data.
    pub size: u32,
    pub file_type: FileType,
    /// The entry's on-disk ID. Only filled in when the reader was built
    /// [`with_raw_ids`](BifFile::with_raw_ids).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub raw_id: Option<u32>,
}

/// A decoded BIF resource table.
///
/// ```ignore
/// let bif = BifFile::open("data/2da.bif")?;
/// for (index, res) in bif.resources().iter().enumerate() {
///     println!("{index}: {} bytes of {}", res.size, res.file_type);
/// }
/// ```
#[derive(Debug, Default, Clone)]
pub struct BifFile {
    resources: Vec<Resource>,
    version: Option<BifVersion>,
    keep_raw_ids: bool,
}

impl BifFile {
    /// An empty reader. Nothing is decoded until [`load`](Self::load).
    pub fn new() -> Self {
        Self::default()
    }

    /// Keep each entry's on-disk ID in [`Resource::raw_id`].
    pub fn with_raw_ids(mut self, keep: bool) -> Self {
        self.keep_raw_ids = keep;
        self
    }

    /// Open and decode the archive at `path`.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let mut bif = Self::new();
        bif.load_path(path)?;
        Ok(bif)
    }

    /// Decode an archive from an already open stream.
    pub fn from_reader<R: Read + Seek + ?Sized>(stream: &mut R) -> Result<Self> {
        let mut bif = Self::new();
        bif.load(stream)?;
        Ok(bif)
    }

    /// Open `path` and [`load`](Self::load) it, keeping this reader's settings.
    pub fn load_path(&mut self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        let file = match File::open(path) {
            Ok(f) => f,
            Err(source) => {
                log::warn!("Cannot open BIF '{}': {source}", path.display());
                return Err(ArchiveError::Open {
                    path: path.to_path_buf(),
                    source,
                });
            }
        };
        self.load(&mut BufReader::new(file))
    }

    /// Decode the header and variable-resource table from `stream`,
    /// replacing whatever table was loaded before.
    pub fn load<R: Read + Seek + ?Sized>(&mut self, stream: &mut R) -> Result<()> {
        self.clear();

        match self.decode(stream) {
            Ok(()) => {
                log::debug!(
                    "Loaded BIF {:?} with {} resources",
                    self.version,
                    self.resources.len()
                );
                Ok(())
            }
            Err(e) => {
                log::warn!("BIF load failed: {e}");
                Err(e)
            }
        }
    }

    fn decode<R: Read + Seek + ?Sized>(&mut self, stream: &mut R) -> Result<()> {
        let header = BifHeader::read(stream)?;
        self.version = Some(header.version);

        let count = header.var_res_count as usize;
        self.resources.reserve(count.min(MAX_RESERVE));

        stream.seek_to(u64::from(header.var_table_offset))?;
        self.read_var_res_table(stream, header.version, header.var_res_count)
    }

    fn read_var_res_table<R: Read + Seek + ?Sized>(
        &mut self,
        stream: &mut R,
        version: BifVersion,
        count: u32,
    ) -> Result<()> {
        for _ in 0..count {
            let id = stream.read_u32_le()?;

            if version.has_flags() {
                stream.skip(4)?;
            }

            let offset = stream.read_u32_le()?;
            let size = stream.read_u32_le()?;
            let file_type = FileType(stream.read_u32_le()?);

            self.resources.push(Resource {
                offset,
                size,
                file_type,
                raw_id: self.keep_raw_ids.then_some(id),
            });
        }

        Ok(())
    }

    /// Drop the decoded table. Safe to call repeatedly.
    pub fn clear(&mut self) {
        self.resources.clear();
        self.version = None;
    }

    /// The decoded table, in on-disk order.
    pub fn resources(&self) -> &[Resource] {
        &self.resources
    }

    /// The entry at `index`, if there is one.
    pub fn resource(&self, index: usize) -> Option<&Resource> {
        self.resources.get(index)
    }

    /// Version of the header decoded by the last `load`, if any.
    pub fn version(&self) -> Option<BifVersion> {
        self.version
    }

    pub fn len(&self) -> usize {
        self.resources.len()
    }

    pub fn is_empty(&self) -> bool {
        self.resources.is_empty()
    }

    /// Read the data of the resource at `index` from `stream`, which must be
    /// the same archive the table was decoded from.
    pub fn read_resource<R: Read + Seek + ?Sized>(
        &self,
        stream: &mut R,
        index: usize,
    ) -> Result<Vec<u8>> {
        let res = self.resource(index).ok_or(ArchiveError::NoSuchResource {
            index,
            count: self.resources.len(),
        })?;

        stream.seek_to(u64::from(res.offset))?;

        let mut data = Vec::new();
        Read::take(&mut *stream, u64::from(res.size)).read_to_end(&mut data)?;

        if data.len() != res.size as usize {
            return Err(ArchiveError::Read(std::io::Error::new(
                std::io::ErrorKind::UnexpectedEof,
                format!(
                    "resource {index} wants {} bytes at {:#x}, only {} available",
                    res.size,
                    res.offset,
                    data.len()
                ),
            )));
        }

        Ok(data)
    }
}
