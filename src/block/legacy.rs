//! Older standalone arith stream framing.
//!
//! Layout: `u32` LE output length, a reserved `u32` (written as zero), then an
//! order-0 or order-1 payload coded with full 256-symbol models. There is no
//! flag byte, so the order must be known out of band.

use super::entropy::{self, EntropyMode};
use crate::error::{Error, Result};
use crate::stream::{ByteReader, ByteWriter};
use crate::Order;

const ALPHABET: usize = 256;

pub fn encode_legacy(src: &[u8], order: Order) -> Result<Vec<u8>> {
    let n_in = u32::try_from(src.len()).map_err(|_| {
        Error::MalformedHeader(format!("block of {} bytes exceeds u32 length", src.len()))
    })?;

    let mut out = ByteWriter::with_capacity(src.len() + src.len() / 10 + 16);
    out.write_u32_le(n_in);
    out.write_u32_le(0);

    let mode = EntropyMode { order1: order.is_order1(), rle: false };
    entropy::encode_payload(src, ALPHABET, mode, &mut out)?;
    Ok(out.finish())
}

pub fn decode_legacy(src: &[u8], order: Order) -> Result<Vec<u8>> {
    let mut reader = ByteReader::new(src);
    let n_out = reader.read_u32_le()? as usize;
    let _reserved = reader.read_u32_le()?;

    let mode = EntropyMode { order1: order.is_order1(), rle: false };
    entropy::decode_payload(&mut reader, n_out, ALPHABET, mode)
}
