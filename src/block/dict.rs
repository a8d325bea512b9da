use crate::error::{Error, Result};
use crate::stream::ByteReader;

/// Dictionary for the DICT transform
///
/// Each decoded byte is an index into `entries`, which expands to a
/// `stride`-byte little-endian value in the output.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DictTable {
    pub stride: usize,
    pub entries: Vec<u32>,
}

impl DictTable {
    /// Parse the stride, entry count and the literal/run coded entry list
    ///
    /// Each group starts with a byte whose low nibble counts `uint7` literal
    /// entries and whose high nibble counts entries that follow on from their
    /// predecessor (previous + 1).
    pub fn parse(src: &mut ByteReader<'_>) -> Result<Self> {
        let stride = src.read_u8()? as usize;
        if !(1..=4).contains(&stride) {
            return Err(Error::MalformedHeader(format!("DICT stride {stride} not in 1..=4")));
        }

        let count = src.read_u8()? as usize;
        let mut entries = Vec::with_capacity(count);
        while entries.len() < count {
            let group = src.read_u8()?;
            let literals = (group & 0x0f) as usize;
            let run = (group >> 4) as usize;

            if group == 0 {
                return Err(Error::MalformedHeader("empty DICT entry group".to_string()));
            }
            if entries.len() + literals + run > count {
                return Err(Error::MalformedHeader(format!(
                    "DICT group overruns table of {count} entries"
                )));
            }

            for _ in 0..literals {
                entries.push(src.read_uint7()?);
            }
            for _ in 0..run {
                let previous = entries.last().copied().ok_or_else(|| {
                    Error::MalformedHeader("DICT run with no preceding entry".to_string())
                })?;
                entries.push(previous.wrapping_add(1));
            }
        }

        Ok(Self { stride, entries })
    }

    /// Expand one index per `stride` output bytes into `len` bytes
    pub fn expand(&self, indices: &[u8], len: usize) -> Result<Vec<u8>> {
        if !(1..=4).contains(&self.stride) {
            return Err(Error::MalformedHeader(format!("DICT stride {} not in 1..=4", self.stride)));
        }
        let needed = len.div_ceil(self.stride);
        if indices.len() < needed {
            return Err(Error::TruncatedInput { needed: needed - indices.len(), available: 0 });
        }

        let mut out = vec![0u8; len];
        for (j, offset) in (0..len).step_by(self.stride).enumerate() {
            let index = indices[j] as usize;
            let value = self
                .entries
                .get(index)
                .ok_or(Error::InvalidSymbol { index, limit: self.entries.len() })?;

            let width = self.stride.min(len - offset);
            out[offset..offset + width].copy_from_slice(&value.to_le_bytes()[..width]);
        }

        Ok(out)
    }
}
