//! Forward-only primitive reader for TER byte streams.
//!
//! All integers are little-endian. Text is length-prefixed and encoded with the
//! Windows-1252 code page.

use std::io::{Cursor, Read};

use byteorder::{LittleEndian, ReadBytesExt};
use encoding_rs::WINDOWS_1252;

use crate::error::{TerError, TerResult};

/// Bytes with no assigned character in Windows-1252.
const UNDEFINED_WINDOWS_1252: [u8; 5] = [0x81, 0x8D, 0x8F, 0x90, 0x9D];

/// Cursor over an in-memory TER file.
///
/// Every read checks the remaining length first, so a short buffer fails with
/// [`TerError::TruncatedInput`] and never leaves a half-read field behind.
///
/// # Example
///
/// ```
/// use bevy_ter_terrain::reader::TerReader;
///
/// let bytes = [3u8, 2, 0, b'o', b'k'];
/// let mut reader = TerReader::new(&bytes);
/// assert_eq!(reader.read_u8().unwrap(), 3);
/// assert_eq!(reader.read_u16s(1).unwrap(), vec![2]);
/// ```
pub struct TerReader<'a> {
    cursor: Cursor<&'a [u8]>,
}

impl<'a> TerReader<'a> {
    pub fn new(bytes: &'a [u8]) -> Self {
        Self {
            cursor: Cursor::new(bytes),
        }
    }

    /// Byte offset of the next read.
    pub fn position(&self) -> usize {
        self.cursor.position() as usize
    }

    /// Bytes left between the cursor and the end of the buffer.
    pub fn remaining(&self) -> usize {
        self.cursor.get_ref().len().saturating_sub(self.position())
    }

    fn ensure(&self, needed: usize) -> TerResult<()> {
        let available = self.remaining();
        if available < needed {
            return Err(TerError::TruncatedInput {
                offset: self.position(),
                needed,
                available,
            });
        }
        Ok(())
    }

    pub fn read_u8(&mut self) -> TerResult<u8> {
        self.ensure(1)?;
        Ok(self.cursor.read_u8()?)
    }

    pub fn read_u32(&mut self) -> TerResult<u32> {
        self.ensure(4)?;
        Ok(self.cursor.read_u32::<LittleEndian>()?)
    }

    /// Reads `count` unsigned bytes.
    pub fn read_u8s(&mut self, count: usize) -> TerResult<Vec<u8>> {
        self.ensure(count)?;
        let mut values = vec![0u8; count];
        self.cursor.read_exact(&mut values)?;
        Ok(values)
    }

    /// Reads `count` little-endian `u16` values.
    pub fn read_u16s(&mut self, count: usize) -> TerResult<Vec<u16>> {
        self.ensure(count * 2)?;
        let mut values = vec![0u16; count];
        self.cursor.read_u16_into::<LittleEndian>(&mut values)?;
        Ok(values)
    }

    /// Reads `count` little-endian `u32` values.
    pub fn read_u32s(&mut self, count: usize) -> TerResult<Vec<u32>> {
        self.ensure(count * 4)?;
        let mut values = vec![0u32; count];
        self.cursor.read_u32_into::<LittleEndian>(&mut values)?;
        Ok(values)
    }

    /// Reads text prefixed by an 8-bit length. May return an empty string.
    pub fn read_text8(&mut self) -> TerResult<String> {
        let len = self.read_u8()? as usize;
        self.read_text(len)
    }

    /// Reads text prefixed by a 32-bit length.
    pub fn read_text32(&mut self) -> TerResult<String> {
        let len = self.read_u32()? as usize;
        self.read_text(len)
    }

    fn read_text(&mut self, len: usize) -> TerResult<String> {
        let offset = self.position();
        let bytes = self.read_u8s(len)?;
        decode_windows_1252(&bytes, offset)
    }
}

/// Decodes Windows-1252 bytes, rejecting the five unassigned code points.
///
/// `offset` is the stream position of `bytes[0]`, used for error reporting.
pub fn decode_windows_1252(bytes: &[u8], offset: usize) -> TerResult<String> {
    if let Some(pos) = bytes
        .iter()
        .position(|byte| UNDEFINED_WINDOWS_1252.contains(byte))
    {
        return Err(TerError::TextDecode {
            offset: offset + pos,
            byte: bytes[pos],
        });
    }
    let (text, _) = WINDOWS_1252.decode_without_bom_handling(bytes);
    Ok(text.into_owned())
}
