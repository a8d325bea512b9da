//! Order-0 / order-1 entropy loops, with and without run-length escaping.
//!
//! Payload layout: one `max_sym` byte (largest symbol + 1, with 256 stored
//! as 0) followed by the range-coded symbols.

use crate::error::{Error, Result};
use crate::range::{ByteModel, RangeDecoder, RangeEncoder};
use crate::stream::{ByteReader, ByteWriter};

/// Alphabet of a run-length part: 0..=2 plus the escape
const RUN_ALPHABET: usize = 4;
/// Part value meaning "more length follows"
const RUN_ESCAPE: u8 = 3;
/// Context of the first continuation part
const RUN_CONTINUE_FIRST: usize = 256;
/// Context of every later continuation part
const RUN_CONTINUE_REST: usize = 257;
const RUN_CONTEXTS: usize = 258;

/// Upper bound on output buffer space reserved before decoding starts
const MAX_PREALLOC: usize = 1 << 20;

/// Entropy loop variant selected by the ORDER and RLE flags
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct EntropyMode {
    pub order1: bool,
    pub rle: bool,
}

/// Literal models indexed by the previous symbol (order-1) or a single one
struct LiteralModels {
    models: Vec<ByteModel>,
    order1: bool,
}

impl LiteralModels {
    fn new(max_sym: usize, order1: bool) -> Self {
        let count = if order1 { max_sym } else { 1 };
        Self { models: (0..count).map(|_| ByteModel::new(max_sym)).collect(), order1 }
    }

    fn get(&mut self, last: u8) -> Result<&mut ByteModel> {
        let ctx = if self.order1 { last as usize } else { 0 };
        let limit = self.models.len();
        self.models.get_mut(ctx).ok_or(Error::InvalidSymbol { index: ctx, limit })
    }
}

fn run_models() -> Vec<ByteModel> {
    (0..RUN_CONTEXTS).map(|_| ByteModel::new(RUN_ALPHABET)).collect()
}

/// Largest symbol + 1, i.e. the alphabet size the models need
pub fn alphabet_size(src: &[u8]) -> usize {
    src.iter().copied().max().map_or(0, |m| m as usize) + 1
}

/// Encode `src` as a `max_sym` byte plus range-coded payload
pub fn encode(src: &[u8], mode: EntropyMode, out: &mut ByteWriter) -> Result<()> {
    let max_sym = alphabet_size(src);
    out.write_u8(max_sym as u8);
    encode_payload(src, max_sym, mode, out)
}

/// Range-code `src` with models over `0..max_sym`
///
/// Every byte of `src` must be below `max_sym`.
pub fn encode_payload(
    src: &[u8],
    max_sym: usize,
    mode: EntropyMode,
    out: &mut ByteWriter,
) -> Result<()> {
    let mut rc = RangeEncoder::new();
    let mut literals = LiteralModels::new(max_sym, mode.order1);

    if mode.rle {
        let mut runs = run_models();
        let mut last = 0u8;
        let mut i = 0;
        while i < src.len() {
            let sym = src[i];
            literals.get(last)?.encode(out, &mut rc, sym)?;

            let run = src[i..].iter().take_while(|&&b| b == sym).count() - 1;
            encode_run(&mut runs, out, &mut rc, sym, run)?;

            last = sym;
            i += run + 1;
        }
    } else {
        let mut last = 0u8;
        for &sym in src {
            literals.get(last)?.encode(out, &mut rc, sym)?;
            last = sym;
        }
    }

    rc.finish(out);
    Ok(())
}

/// Emit `run` as a chain of parts capped at 3
fn encode_run(
    runs: &mut [ByteModel],
    out: &mut ByteWriter,
    rc: &mut RangeEncoder,
    literal: u8,
    run: usize,
) -> Result<()> {
    let mut remaining = run;
    let mut part = remaining.min(RUN_ESCAPE as usize) as u8;
    runs[literal as usize].encode(out, rc, part)?;
    remaining -= part as usize;

    let mut ctx = RUN_CONTINUE_FIRST;
    while part == RUN_ESCAPE {
        part = remaining.min(RUN_ESCAPE as usize) as u8;
        runs[ctx].encode(out, rc, part)?;
        remaining -= part as usize;
        ctx = RUN_CONTINUE_REST;
    }
    Ok(())
}

/// Decode `n_out` symbols from a `max_sym` byte plus range-coded payload
pub fn decode(src: &mut ByteReader<'_>, n_out: usize, mode: EntropyMode) -> Result<Vec<u8>> {
    let max_sym = match src.read_u8()? {
        0 => 256,
        m => m as usize,
    };
    decode_payload(src, n_out, max_sym, mode)
}

/// Decode `n_out` symbols range-coded with models over `0..max_sym`
pub fn decode_payload(
    src: &mut ByteReader<'_>,
    n_out: usize,
    max_sym: usize,
    mode: EntropyMode,
) -> Result<Vec<u8>> {
    let mut literals = LiteralModels::new(max_sym, mode.order1);
    let mut rc = RangeDecoder::start(src)?;

    // The declared length is untrusted; grow as symbols actually decode
    let mut output = Vec::with_capacity(n_out.min(MAX_PREALLOC));

    if mode.rle {
        let mut runs = run_models();
        let mut last = 0u8;
        while output.len() < n_out {
            let i = output.len();
            let sym = literals.get(last)?.decode(src, &mut rc)?;
            last = sym;

            let mut part = runs[sym as usize].decode(src, &mut rc)?;
            let mut run = part as usize;
            let mut ctx = RUN_CONTINUE_FIRST;
            while part == RUN_ESCAPE {
                if i + run >= n_out {
                    return Err(Error::RunOverflow { position: i, run, limit: n_out });
                }
                part = runs[ctx].decode(src, &mut rc)?;
                ctx = RUN_CONTINUE_REST;
                run += part as usize;
            }

            if i + run + 1 > n_out {
                return Err(Error::RunOverflow { position: i, run, limit: n_out });
            }
            output.resize(i + run + 1, sym);
        }
    } else {
        let mut last = 0u8;
        for _ in 0..n_out {
            let sym = literals.get(last)?.decode(src, &mut rc)?;
            output.push(sym);
            last = sym;
        }
    }

    Ok(output)
}
