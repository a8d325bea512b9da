//! Adaptive range coder and block transforms for CRAM arith-coded blocks.
//!
//! The crate is layered leaves first: [`stream`] for byte-level I/O,
//! [`range`] for the range coder and its adaptive frequency model, and
//! [`block`] for the flag-driven block format built on top of them. The
//! lower layers are public so that other CRAM codecs can drive the same
//! coder with their own context models.

pub mod block;
pub mod error;
pub mod range;
pub mod stream;

pub use block::{decode, decode_legacy, decode_with_len, encode, encode_legacy, Flags};
pub use error::{Error, Result};
pub use range::{ByteModel, RangeDecoder, RangeEncoder};
pub use stream::{ByteReader, ByteWriter, ReverseWriter};

/// Context order of the entropy loop
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
#[repr(u8)]
pub enum Order {
    /// No context: one frequency table
    #[default]
    Zero = 0,
    /// Previous symbol selects the frequency table
    One = 1,
}

impl Order {
    /// Create from a numeric order, clamped to 0 or 1
    pub fn from_level(level: u8) -> Self {
        match level {
            0 => Self::Zero,
            _ => Self::One,
        }
    }

    /// Get numeric order
    pub fn level(&self) -> u8 {
        *self as u8
    }

    pub fn is_order1(&self) -> bool {
        matches!(self, Self::One)
    }
}

/// Configuration for block encoding
#[derive(Clone, Debug, Default)]
pub struct CodecConfig {
    /// Entropy context order
    pub order: Order,
    /// Run-length escape repeated bytes
    pub rle: bool,
    /// Store bytes uncompressed
    pub cat: bool,
    /// Omit the length from the block; the decoder must be told it
    pub external_size: bool,
}

impl CodecConfig {
    /// Header flags this configuration encodes with
    pub fn flags(&self) -> Flags {
        let mut flags = Flags::NONE;
        if self.order.is_order1() {
            flags |= Flags::ORDER;
        }
        if self.rle {
            flags |= Flags::RLE;
        }
        if self.cat {
            flags |= Flags::CAT;
        }
        if self.external_size {
            flags |= Flags::NOSIZE;
        }
        flags
    }
}

/// Trait for a whole-block compressor
pub trait BlockCodec {
    /// Compress one block
    fn compress(&mut self, input: &[u8]) -> Result<Vec<u8>>;

    /// Decompress one block; `len` is required when the format omits it
    fn decompress(&mut self, input: &[u8], len: Option<usize>) -> Result<Vec<u8>>;
}

/// Flag-driven arith block codec
#[derive(Clone, Debug, Default)]
pub struct ArithCodec {
    config: CodecConfig,
}

impl ArithCodec {
    pub fn new(config: CodecConfig) -> Self {
        Self { config }
    }
}

impl BlockCodec for ArithCodec {
    fn compress(&mut self, input: &[u8]) -> Result<Vec<u8>> {
        encode(input, self.config.flags())
    }

    fn decompress(&mut self, input: &[u8], len: Option<usize>) -> Result<Vec<u8>> {
        match len {
            Some(n) => decode_with_len(input, n),
            None => decode(input),
        }
    }
}

/// Codec for the legacy fixed-header stream
#[derive(Clone, Debug, Default)]
pub struct LegacyArithCodec {
    order: Order,
}

impl LegacyArithCodec {
    pub fn new(order: Order) -> Self {
        Self { order }
    }
}

impl BlockCodec for LegacyArithCodec {
    fn compress(&mut self, input: &[u8]) -> Result<Vec<u8>> {
        encode_legacy(input, self.order)
    }

    /// The legacy header always carries the length, so `len` is ignored
    fn decompress(&mut self, input: &[u8], _len: Option<usize>) -> Result<Vec<u8>> {
        decode_legacy(input, self.order)
    }
}
