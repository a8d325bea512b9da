use crate::error::{Error, Result};
use crate::stream::ByteReader;

/// Number of interleaved sub-blocks in an X4 block
pub const LANES: usize = 4;

/// Compressed sizes recorded ahead of the four X4 sub-blocks
///
/// Decoding walks the sub-blocks back to back and does not need these; they
/// are kept so callers can inspect or skip a striped block.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StripeHeader {
    pub sub_lengths: [u32; LANES],
}

impl StripeHeader {
    pub fn parse(src: &mut ByteReader<'_>) -> Result<Self> {
        let mut sub_lengths = [0u32; LANES];
        for len in sub_lengths.iter_mut() {
            *len = src.read_uint7()?;
        }
        Ok(Self { sub_lengths })
    }
}

/// Symbols each sub-block must supply for a block of `len` bytes
pub fn lane_len(len: usize) -> usize {
    len.div_ceil(LANES)
}

/// Interleave four sub-blocks: output byte `4k + p` is byte `k` of lane `p`
pub fn interleave(lanes: &[Vec<u8>; LANES], len: usize) -> Result<Vec<u8>> {
    for (p, lane) in lanes.iter().enumerate() {
        let needed = len / LANES + usize::from(p < len % LANES);
        if lane.len() < needed {
            return Err(Error::TruncatedInput { needed: needed - lane.len(), available: 0 });
        }
    }

    let mut out = Vec::with_capacity(len);
    for i in 0..len {
        out.push(lanes[i % LANES][i / LANES]);
    }
    Ok(out)
}
