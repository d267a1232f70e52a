//! # Stream Reads
//!
//! Primitive reads over a seekable byte stream.
//!
//! BIF mixes byte orders: the two leading tags are big-endian, everything
//! after them is little-endian. Both flavours are exposed here so the decoder
//! spells out which one each field uses.

use std::io::{self, Read, Seek, SeekFrom};

/// Fixed-width reads on top of any [`Read`] + [`Seek`] stream.
pub(crate) trait StreamExt: Read + Seek {
    fn read_u32_be(&mut self) -> io::Result<u32> {
        let mut bytes = [0u8; 4];
        self.read_exact(&mut bytes)?;
        Ok(u32::from_be_bytes(bytes))
    }

    fn read_u32_le(&mut self) -> io::Result<u32> {
        let mut bytes = [0u8; 4];
        self.read_exact(&mut bytes)?;
        Ok(u32::from_le_bytes(bytes))
    }

    /// Skip `n` bytes forward.
    fn skip(&mut self, n: i64) -> io::Result<()> {
        self.seek(SeekFrom::Current(n))?;
        Ok(())
    }

    /// Seek to an absolute position.
    fn seek_to(&mut self, pos: u64) -> io::Result<()> {
        self.seek(SeekFrom::Start(pos))?;
        Ok(())
    }
}

impl<S: Read + Seek + ?Sized> StreamExt for S {}
