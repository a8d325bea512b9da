//! Carry-propagating range coder (Schindler / Shelwien style).
//!
//! The encoder keeps a 32-bit `low` and detects overflow by unsigned
//! wraparound. A byte is not emitted while it may still be bumped by a later
//! carry: the most recent settled byte is held in `cache` and a run of 0xFF
//! bytes behind it is only counted until the carry is known.

use crate::error::Result;
use crate::stream::{ByteReader, ByteWriter};

/// Renormalize whenever the range drops below this bound
pub const RANGE_TOP: u32 = 1 << 24;

/// Number of bytes primed by the decoder and flushed by the encoder
pub const FLUSH_BYTES: usize = 5;

/// Range encoder state
#[derive(Debug, Clone)]
pub struct RangeEncoder {
    low: u32,
    range: u32,
    /// Pending carry into `cache`
    carry: u32,
    /// Last settled byte, not yet written
    cache: u8,
    /// Number of deferred 0xFF bytes following `cache`
    ff_num: u32,
}

impl RangeEncoder {
    pub fn new() -> Self {
        Self { low: 0, range: u32::MAX, carry: 0, cache: 0, ff_num: 0 }
    }

    /// Narrow the interval to `[sym_low, sym_low + sym_freq)` out of `total`
    pub fn encode(&mut self, out: &mut ByteWriter, sym_low: u32, sym_freq: u32, total: u32) {
        debug_assert!(sym_freq > 0 && sym_low + sym_freq <= total);

        let previous = self.low;
        self.range /= total;
        self.low = self.low.wrapping_add(sym_low * self.range);
        self.range *= sym_freq;

        if self.low < previous {
            self.carry += 1;
        }

        while self.range < RANGE_TOP {
            self.range <<= 8;
            self.shift_low(out);
        }
    }

    /// Move the top byte of `low` into the deferred output
    fn shift_low(&mut self, out: &mut ByteWriter) {
        if self.low < 0xff00_0000 || self.carry != 0 {
            out.write_u8(self.cache.wrapping_add(self.carry as u8));

            // Deferred 0xFFs become 0x00 if a carry arrived
            let filler = (self.carry as u8).wrapping_sub(1);
            while self.ff_num > 0 {
                out.write_u8(filler);
                self.ff_num -= 1;
            }

            self.cache = (self.low >> 24) as u8;
            self.carry = 0;
        } else {
            self.ff_num += 1;
        }
        self.low <<= 8;
    }

    /// Flush all buffered state
    pub fn finish(mut self, out: &mut ByteWriter) {
        for _ in 0..FLUSH_BYTES {
            self.shift_low(out);
        }
    }
}

impl Default for RangeEncoder {
    fn default() -> Self {
        Self::new()
    }
}

/// Range decoder state
#[derive(Debug, Clone)]
pub struct RangeDecoder {
    range: u32,
    code: u32,
}

impl RangeDecoder {
    /// Prime the decoder from the first five bytes of the payload
    ///
    /// Only four bytes fit in `code`; the first one (always the encoder's
    /// initial cache byte) is shifted straight out again.
    pub fn start(src: &mut ByteReader<'_>) -> Result<Self> {
        let mut code = 0u32;
        for _ in 0..FLUSH_BYTES {
            code = (code << 8) | src.read_u8()? as u32;
        }
        Ok(Self { range: u32::MAX, code })
    }

    /// Scale the range to `total` and return the current cumulative target
    ///
    /// The scaled range is kept for the following `decode` call.
    #[inline]
    pub fn get_frequency(&mut self, total: u32) -> u32 {
        self.range /= total;
        self.code / self.range
    }

    /// Consume the symbol occupying `[sym_low, sym_low + sym_freq)`
    pub fn decode(&mut self, src: &mut ByteReader<'_>, sym_low: u32, sym_freq: u32) -> Result<()> {
        // Corrupt input may push `code` outside the interval; it then decodes
        // to garbage and is caught by the model's bounds checks.
        self.code = self.code.wrapping_sub(sym_low.wrapping_mul(self.range));
        self.range = self.range.wrapping_mul(sym_freq);

        while self.range < RANGE_TOP {
            self.range <<= 8;
            self.code = (self.code << 8) | src.read_u8()? as u32;
        }
        Ok(())
    }
}
