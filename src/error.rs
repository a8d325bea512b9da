use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    // I/O errors (CLI file handling only)
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    // Header and metadata errors
    #[error("Malformed block header: {0}")]
    MalformedHeader(String),

    #[error("Cannot encode with flags 0x{0:02x}: PACK, DICT and X4 have no encoder")]
    UnsupportedEncode(u8),

    // Stream errors
    #[error("Out of data: needed {needed} more byte(s), {available} available")]
    TruncatedInput { needed: usize, available: usize },

    #[error("Output buffer full: capacity {capacity} bytes")]
    OutputOverflow { capacity: usize },

    // Model errors
    #[error("Invalid symbol index {index} (limit {limit})")]
    InvalidSymbol { index: usize, limit: usize },

    #[error("Model frequency total {total} exceeds maximum {max}")]
    FrequencyOverflow { total: u32, max: u32 },

    #[error("Run of {run} at position {position} overruns block length {limit}")]
    RunOverflow { position: usize, run: usize, limit: usize },
}

pub type Result<T> = std::result::Result<T, Error>;
