use crate::error::{Error, Result};

/// Growable byte writer producing a compressed block
pub struct ByteWriter {
    /// Accumulated output bytes
    output: Vec<u8>,
}

impl ByteWriter {
    pub fn new() -> Self {
        Self { output: Vec::new() }
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self { output: Vec::with_capacity(capacity) }
    }

    /// Write a single byte
    #[inline]
    pub fn write_u8(&mut self, byte: u8) {
        self.output.push(byte);
    }

    /// Write a 32-bit value in little-endian
    pub fn write_u32_le(&mut self, value: u32) {
        self.output.extend_from_slice(&value.to_le_bytes());
    }

    /// Write a variable-length unsigned integer in 7-bit groups,
    /// least-significant group first
    pub fn write_uint7(&mut self, value: u32) {
        let mut v = value;
        loop {
            let mut byte = (v & 0x7f) as u8;
            v >>= 7;
            if v > 0 {
                byte |= 0x80;
            }
            self.output.push(byte);
            if v == 0 {
                break;
            }
        }
    }

    /// Write a length-prefixed variable integer (ITF8)
    ///
    /// Inverse of `ByteReader::read_itf8`: the 5-byte form keeps the low
    /// nibble in the high half of the final byte.
    pub fn write_itf8(&mut self, value: u32) {
        let v = value;
        if v <= 0x7f {
            self.output.push(v as u8);
        } else if v <= 0x3fff {
            self.output.extend_from_slice(&[0x80 | (v >> 8) as u8, v as u8]);
        } else if v <= 0x1f_ffff {
            self.output.extend_from_slice(&[0xc0 | (v >> 16) as u8, (v >> 8) as u8, v as u8]);
        } else if v <= 0x0fff_ffff {
            self.output.extend_from_slice(&[
                0xe0 | (v >> 24) as u8,
                (v >> 16) as u8,
                (v >> 8) as u8,
                v as u8,
            ]);
        } else {
            self.output.extend_from_slice(&[
                0xf0 | (v >> 28) as u8,
                (v >> 20) as u8,
                (v >> 12) as u8,
                (v >> 4) as u8,
                ((v & 0x0f) << 4) as u8,
            ]);
        }
    }

    /// Write raw bytes
    pub fn write_bytes(&mut self, bytes: &[u8]) {
        self.output.extend_from_slice(bytes);
    }

    /// Get current output length in bytes
    pub fn len(&self) -> usize {
        self.output.len()
    }

    /// Check if empty
    pub fn is_empty(&self) -> bool {
        self.output.is_empty()
    }

    /// Peek at output without consuming
    pub fn as_bytes(&self) -> &[u8] {
        &self.output
    }

    /// Finish and return the output bytes
    pub fn finish(self) -> Vec<u8> {
        self.output
    }
}

impl Default for ByteWriter {
    fn default() -> Self {
        Self::new()
    }
}

/// Fixed-capacity writer that fills its buffer from the end backwards
///
/// Interleaved rANS streams are produced last symbol first, so their bytes
/// are prepended rather than appended.
pub struct ReverseWriter {
    buffer: Vec<u8>,
    /// Offset of the first written byte; starts at the capacity
    pos: usize,
}

impl ReverseWriter {
    pub fn new(capacity: usize) -> Self {
        Self { buffer: vec![0u8; capacity], pos: capacity }
    }

    /// Prepend a single byte
    pub fn write_u8_back(&mut self, byte: u8) -> Result<()> {
        if self.pos == 0 {
            return Err(Error::OutputOverflow { capacity: self.buffer.len() });
        }
        self.pos -= 1;
        self.buffer[self.pos] = byte;
        Ok(())
    }

    /// Prepend a 32-bit little-endian value, so it reads forwards as LE
    pub fn write_u32_le_back(&mut self, value: u32) -> Result<()> {
        if self.pos < 4 {
            return Err(Error::OutputOverflow { capacity: self.buffer.len() });
        }
        self.pos -= 4;
        self.buffer[self.pos..self.pos + 4].copy_from_slice(&value.to_le_bytes());
        Ok(())
    }

    /// Bytes written so far
    pub fn len(&self) -> usize {
        self.buffer.len() - self.pos
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Peek at the written tail in forward order
    pub fn as_bytes(&self) -> &[u8] {
        &self.buffer[self.pos..]
    }

    /// Finish and return the written bytes in forward order
    pub fn finish(mut self) -> Vec<u8> {
        self.buffer.split_off(self.pos)
    }
}
