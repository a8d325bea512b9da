use crate::error::{Error, Result};

/// Cursor-based byte reader over an in-memory block
///
/// Every read is bounds-checked: running off the end of the buffer yields
/// `Error::TruncatedInput` rather than a panic or a silent zero.
#[derive(Debug, Clone)]
pub struct ByteReader<'a> {
    data: &'a [u8],
    /// Offset of the next unread byte
    pos: usize,
}

impl<'a> ByteReader<'a> {
    pub fn new(data: &'a [u8]) -> Self {
        Self { data, pos: 0 }
    }

    #[inline]
    fn ensure(&self, n: usize) -> Result<()> {
        let available = self.remaining();
        if available < n {
            return Err(Error::TruncatedInput { needed: n, available });
        }
        Ok(())
    }

    /// Read a single byte
    #[inline]
    pub fn read_u8(&mut self) -> Result<u8> {
        self.ensure(1)?;
        let b = self.data[self.pos];
        self.pos += 1;
        Ok(b)
    }

    /// Read a 32-bit little-endian value
    pub fn read_u32_le(&mut self) -> Result<u32> {
        let bytes = self.read_bytes(4)?;
        Ok(u32::from_le_bytes([bytes[0], bytes[1], bytes[2], bytes[3]]))
    }

    /// Read a variable-length unsigned integer in 7-bit groups
    ///
    /// The least-significant group comes first; a set high bit means another
    /// group follows. Values wider than 32 bits are rejected.
    pub fn read_uint7(&mut self) -> Result<u32> {
        let mut value = 0u32;
        let mut shift = 0u32;
        loop {
            let c = self.read_u8()?;
            let group = (c & 0x7f) as u32;
            if shift > 28 || (shift == 28 && group > 0x0f) {
                return Err(Error::MalformedHeader(format!(
                    "uint7 value overflows 32 bits at offset {}",
                    self.pos - 1
                )));
            }
            value |= group << shift;
            shift += 7;
            if c & 0x80 == 0 {
                return Ok(value);
            }
        }
    }

    /// Read a length-prefixed variable integer (ITF8)
    ///
    /// The leading bits of the first byte give the total length:
    /// `0xxxxxxx` = 1 byte, `10xxxxxx` = 2, `110xxxxx` = 3, `1110xxxx` = 4,
    /// `1111xxxx` = 5. In the 5-byte form only the high nibble of the final
    /// byte carries value bits.
    pub fn read_itf8(&mut self) -> Result<u32> {
        let first = self.read_u8()? as u32;

        let value = if first >= 0xf0 {
            let b = self.read_bytes(4)?;
            ((first & 0x0f) << 28)
                | ((b[0] as u32) << 20)
                | ((b[1] as u32) << 12)
                | ((b[2] as u32) << 4)
                | ((b[3] as u32) >> 4)
        } else if first >= 0xe0 {
            let b = self.read_bytes(3)?;
            ((first & 0x0f) << 24) | ((b[0] as u32) << 16) | ((b[1] as u32) << 8) | b[2] as u32
        } else if first >= 0xc0 {
            let b = self.read_bytes(2)?;
            ((first & 0x1f) << 16) | ((b[0] as u32) << 8) | b[1] as u32
        } else if first >= 0x80 {
            let b = self.read_u8()? as u32;
            ((first & 0x3f) << 8) | b
        } else {
            first
        };

        Ok(value)
    }

    /// Borrow the next `n` bytes and advance past them
    pub fn read_bytes(&mut self, n: usize) -> Result<&'a [u8]> {
        self.ensure(n)?;
        let bytes = &self.data[self.pos..self.pos + n];
        self.pos += n;
        Ok(bytes)
    }

    /// Offset of the next unread byte
    pub fn position(&self) -> usize {
        self.pos
    }

    /// Bytes left to read
    pub fn remaining(&self) -> usize {
        self.data.len() - self.pos
    }

    /// Check whether every byte has been consumed
    pub fn is_exhausted(&self) -> bool {
        self.pos == self.data.len()
    }
}
