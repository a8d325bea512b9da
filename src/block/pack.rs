use crate::error::{Error, Result};
use crate::stream::ByteReader;

/// Largest symbol table that still packs below 8 bits per value
pub const MAX_PACKED_SYMBOLS: usize = 16;

/// Longest output a single-symbol table may expand to
///
/// Such a table carries no payload, so the length comes only from the
/// block header.
pub const MAX_CONSTANT_FILL: usize = 1 << 28;

/// Symbol table for the PACK transform
///
/// Values `0..nsym` in the entropy payload index into `symbols`; the width of
/// each packed value follows from `nsym`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PackTable {
    pub symbols: Vec<u8>,
    /// Length of the entropy-coded (still packed) payload
    pub payload_len: usize,
}

impl PackTable {
    /// Parse `nsym`, the symbol list, and the packed payload length
    pub fn parse(src: &mut ByteReader<'_>) -> Result<Self> {
        let nsym = src.read_u8()? as usize;
        if nsym == 0 {
            return Err(Error::MalformedHeader("PACK table has no symbols".to_string()));
        }
        let symbols = src.read_bytes(nsym)?.to_vec();
        let payload_len = src.read_uint7()? as usize;
        Ok(Self { symbols, payload_len })
    }

    /// Bits per packed value: 0 for a constant, then 1, 2, 4 or 8
    pub fn bits_per_value(&self) -> u32 {
        match self.symbols.len() {
            0 | 1 => 0,
            2 => 1,
            3..=4 => 2,
            5..=MAX_PACKED_SYMBOLS => 4,
            _ => 8,
        }
    }

    /// Expand packed data into `len` symbols
    ///
    /// Values are taken least-significant bits first within each byte, so
    /// with 1 bit per value the first output comes from bit 0.
    pub fn unpack(&self, data: Vec<u8>, len: usize) -> Result<Vec<u8>> {
        let bits = self.bits_per_value();

        match bits {
            0 => {
                let sym = self.symbols.first().copied().ok_or_else(|| {
                    Error::MalformedHeader("PACK table has no symbols".to_string())
                })?;
                if len > MAX_CONSTANT_FILL {
                    return Err(Error::MalformedHeader(format!(
                        "constant PACK fill of {len} bytes exceeds {MAX_CONSTANT_FILL}"
                    )));
                }
                return Ok(vec![sym; len]);
            }
            8 => {
                // Wide tables are stored unpacked and unmapped
                let mut data = data;
                if data.len() < len {
                    return Err(Error::TruncatedInput {
                        needed: len - data.len(),
                        available: 0,
                    });
                }
                data.truncate(len);
                return Ok(data);
            }
            _ => {}
        }

        let per_byte = (8 / bits) as usize;
        let needed = len.div_ceil(per_byte);
        if data.len() < needed {
            return Err(Error::TruncatedInput { needed: needed - data.len(), available: 0 });
        }

        let mask = (1u8 << bits) - 1;
        let mut out = Vec::with_capacity(len);
        for i in 0..len {
            let shift = (i % per_byte) as u32 * bits;
            let v = ((data[i / per_byte] >> shift) & mask) as usize;
            let sym = self
                .symbols
                .get(v)
                .ok_or(Error::InvalidSymbol { index: v, limit: self.symbols.len() })?;
            out.push(*sym);
        }
        Ok(out)
    }
}
