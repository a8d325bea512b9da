use super::coder::{RangeDecoder, RangeEncoder};
use crate::error::{Error, Result};
use crate::stream::{ByteReader, ByteWriter};

/// Frequency increment applied to a symbol each time it is coded
pub const STEP: u32 = 8;

/// Total frequency ceiling; exceeding it halves every count
pub const MAX_FREQ: u32 = (1 << 16) - 16;

/// Largest supported alphabet
pub const MAX_SYMBOLS: usize = 256;

/// Adaptive frequency model over an alphabet of up to 256 symbols
///
/// Symbols are kept approximately sorted by descending frequency: after each
/// update the coded entry may swap with its left neighbour, never more. The
/// encoder and decoder must apply the exact same update sequence, so this
/// ordering is part of the bitstream and cannot be replaced by a real sort.
#[derive(Debug, Clone)]
pub struct ByteModel {
    /// Symbol held in each slot
    symbols: Vec<u8>,
    /// Frequency of each slot, always >= 1
    freqs: Vec<u32>,
    total_freq: u32,
}

impl ByteModel {
    /// Create a model over symbols `0..max_sym`
    ///
    /// `max_sym` is clamped to `1..=256`.
    pub fn new(max_sym: usize) -> Self {
        let n = max_sym.clamp(1, MAX_SYMBOLS);
        Self { symbols: (0..n).map(|s| s as u8).collect(), freqs: vec![1; n], total_freq: n as u32 }
    }

    /// Alphabet size
    pub fn max_sym(&self) -> usize {
        self.symbols.len()
    }

    pub fn total_freq(&self) -> u32 {
        self.total_freq
    }

    /// Symbols in current slot order
    pub fn symbols(&self) -> &[u8] {
        &self.symbols
    }

    /// Frequencies in current slot order
    pub fn frequencies(&self) -> &[u32] {
        &self.freqs
    }

    /// Decode one symbol
    pub fn decode(&mut self, src: &mut ByteReader<'_>, rc: &mut RangeDecoder) -> Result<u8> {
        let target = rc.get_frequency(self.total_freq);
        if target >= self.total_freq {
            return Err(Error::InvalidSymbol {
                index: target as usize,
                limit: self.total_freq as usize,
            });
        }

        // Linear scan for the slot covering `target`
        let mut acc = 0u32;
        let mut x = 0usize;
        while acc + self.freqs[x] <= target {
            acc += self.freqs[x];
            x += 1;
        }

        rc.decode(src, acc, self.freqs[x])?;

        let sym = self.symbols[x];
        self.update(x)?;
        Ok(sym)
    }

    /// Encode one symbol
    pub fn encode(&mut self, out: &mut ByteWriter, rc: &mut RangeEncoder, sym: u8) -> Result<()> {
        let mut acc = 0u32;
        let mut slot = None;
        for (x, &s) in self.symbols.iter().enumerate() {
            if s == sym {
                slot = Some(x);
                break;
            }
            acc += self.freqs[x];
        }
        let x = slot
            .ok_or(Error::InvalidSymbol { index: sym as usize, limit: self.symbols.len() })?;

        rc.encode(out, acc, self.freqs[x], self.total_freq);
        self.update(x)
    }

    /// Bump slot `x`, renormalize if needed, then bubble it one place left
    fn update(&mut self, x: usize) -> Result<()> {
        self.freqs[x] += STEP;
        self.total_freq += STEP;
        if self.total_freq > MAX_FREQ {
            self.renormalize()?;
        }

        if x > 0 && self.freqs[x] > self.freqs[x - 1] {
            self.freqs.swap(x, x - 1);
            self.symbols.swap(x, x - 1);
        }
        Ok(())
    }

    /// Halve all frequencies, rounding up so none reaches zero
    fn renormalize(&mut self) -> Result<()> {
        let mut total = 0u32;
        for f in self.freqs.iter_mut() {
            *f -= *f / 2;
            total += *f;
        }
        self.total_freq = total;

        if total > MAX_FREQ {
            return Err(Error::FrequencyOverflow { total, max: MAX_FREQ });
        }
        Ok(())
    }
}
