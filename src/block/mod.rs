//! Flag-driven block codec.
//!
//! A block is a flag byte, an optional `uint7` output length, optional
//! transform metadata and a payload. The flags select one of three layouts
//! (X4 striping, raw CAT copy, or the entropy path); on the entropy path the
//! optional PACK and DICT transforms run as an ordered pipeline after the
//! range decoder.
//!
//! Only the plain and RLE order-0/1 entropy paths (and raw CAT) can be
//! encoded. PACK, DICT and X4 streams are produced elsewhere and are
//! decode-only here.

pub mod dict;
pub mod entropy;
pub mod flags;
pub mod legacy;
pub mod pack;
pub mod stripe;

pub use dict::DictTable;
pub use entropy::EntropyMode;
pub use flags::{Flags, Layout};
pub use legacy::{decode_legacy, encode_legacy};
pub use pack::PackTable;
pub use stripe::StripeHeader;

use crate::error::{Error, Result};
use crate::stream::{ByteReader, ByteWriter};

/// Post-entropy transform applied on decode
#[derive(Debug, Clone)]
pub enum Transform {
    Pack(PackTable),
    Dict(DictTable),
}

impl Transform {
    /// Apply the inverse transform, producing `len` output bytes
    pub fn apply(&self, data: Vec<u8>, len: usize) -> Result<Vec<u8>> {
        match self {
            Transform::Pack(table) => table.unpack(data, len),
            Transform::Dict(table) => table.expand(&data, len),
        }
    }
}

/// A transform together with the number of bytes it must produce
#[derive(Debug, Clone)]
pub struct Stage {
    pub transform: Transform,
    pub output_len: usize,
}

/// Parsed entropy-path metadata: the payload length and the transforms to run
#[derive(Debug, Clone)]
pub struct Pipeline {
    /// Number of symbols the entropy loop must produce
    pub payload_len: usize,
    /// Stages in application order (PACK before DICT)
    pub stages: Vec<Stage>,
}

impl Pipeline {
    /// Read DICT then PACK metadata, as they appear in the stream
    ///
    /// When DICT follows PACK, PACK only yields the dictionary indices, one
    /// per `stride` output bytes.
    pub fn parse(src: &mut ByteReader<'_>, flags: Flags, n_out: usize) -> Result<Self> {
        let mut payload_len = n_out;

        let dict = if flags.has_dict() {
            let table = DictTable::parse(src)?;
            payload_len = n_out.div_ceil(4);
            Some(table)
        } else {
            None
        };

        let mut stages = Vec::with_capacity(2);
        if flags.has_pack() {
            let table = PackTable::parse(src)?;
            payload_len = table.payload_len;
            let output_len = dict.as_ref().map_or(n_out, |d| n_out.div_ceil(d.stride));
            stages.push(Stage { transform: Transform::Pack(table), output_len });
        }
        if let Some(table) = dict {
            stages.push(Stage { transform: Transform::Dict(table), output_len: n_out });
        }

        Ok(Self { payload_len, stages })
    }

    /// Run every stage in order
    pub fn run(&self, data: Vec<u8>) -> Result<Vec<u8>> {
        self.stages.iter().try_fold(data, |data, s| s.transform.apply(data, s.output_len))
    }
}

/// Compress `src` into a single block
pub fn encode(src: &[u8], flags: Flags) -> Result<Vec<u8>> {
    if flags.intersects(Flags::PACK | Flags::DICT | Flags::X4) {
        return Err(Error::UnsupportedEncode(flags.bits()));
    }

    let mut out = ByteWriter::with_capacity(src.len() + src.len() / 10 + 16);
    out.write_u8(flags.bits());
    if !flags.has_external_size() {
        let n_in = u32::try_from(src.len()).map_err(|_| {
            Error::MalformedHeader(format!("block of {} bytes exceeds u32 length", src.len()))
        })?;
        out.write_uint7(n_in);
    }

    if flags.is_cat() {
        out.write_bytes(src);
    } else {
        let mode = EntropyMode { order1: flags.is_order1(), rle: flags.has_rle() };
        entropy::encode(src, mode, &mut out)?;
    }

    Ok(out.finish())
}

/// Decompress a block that records its own length
pub fn decode(src: &[u8]) -> Result<Vec<u8>> {
    let mut reader = ByteReader::new(src);
    decode_block(&mut reader, None, 0)
}

/// Decompress a block, supplying the length for NOSIZE blocks
///
/// A block that records its own length uses that instead of `n_out`.
pub fn decode_with_len(src: &[u8], n_out: usize) -> Result<Vec<u8>> {
    let mut reader = ByteReader::new(src);
    decode_block(&mut reader, Some(n_out), 0)
}

/// Decode one block from the current position of `src`
///
/// `depth` is 0 for a top-level block and 1 for an X4 sub-block.
pub fn decode_block(
    src: &mut ByteReader<'_>,
    external_len: Option<usize>,
    depth: usize,
) -> Result<Vec<u8>> {
    let flags = Flags::from_byte(src.read_u8()?)?;

    let n_out = if flags.has_external_size() {
        external_len.ok_or_else(|| {
            Error::MalformedHeader("NOSIZE block decoded without an external length".to_string())
        })?
    } else {
        src.read_uint7()? as usize
    };

    match flags.layout() {
        Layout::Striped => {
            if depth > 0 {
                return Err(Error::MalformedHeader("nested X4 block".to_string()));
            }
            decode_striped(src, n_out)
        }
        Layout::Raw => Ok(src.read_bytes(n_out)?.to_vec()),
        Layout::Entropy => {
            let pipeline = Pipeline::parse(src, flags, n_out)?;
            let mode = EntropyMode { order1: flags.is_order1(), rle: flags.has_rle() };
            let data = entropy::decode(src, pipeline.payload_len, mode)?;
            pipeline.run(data)
        }
    }
}

fn decode_striped(src: &mut ByteReader<'_>, n_out: usize) -> Result<Vec<u8>> {
    let _header = StripeHeader::parse(src)?;
    let lane_len = stripe::lane_len(n_out);

    let lanes = [
        decode_block(src, Some(lane_len), 1)?,
        decode_block(src, Some(lane_len), 1)?,
        decode_block(src, Some(lane_len), 1)?,
        decode_block(src, Some(lane_len), 1)?,
    ];
    stripe::interleave(&lanes, n_out)
}
