use crate::error::{Error, Result};
use std::fmt;
use std::ops::{BitOr, BitOrAssign};

/// Block header flag byte
///
/// Each bit toggles one stage of the block codec independently.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
pub struct Flags(u8);

impl Flags {
    /// Plain order-0 entropy coding
    pub const NONE: Flags = Flags(0);
    /// Order-1 context (previous symbol)
    pub const ORDER: Flags = Flags(1 << 0);
    /// Dictionary substitution of multi-byte values
    pub const DICT: Flags = Flags(1 << 2);
    /// Four interleaved sub-blocks
    pub const X4: Flags = Flags(1 << 3);
    /// Output length supplied out of band
    pub const NOSIZE: Flags = Flags(1 << 4);
    /// Uncompressed pass-through
    pub const CAT: Flags = Flags(1 << 5);
    /// Run-length escaping inside the entropy loop
    pub const RLE: Flags = Flags(1 << 6);
    /// Bit-packing of small alphabets
    pub const PACK: Flags = Flags(1 << 7);

    const KNOWN: u8 = 0b1111_1101;

    /// Parse a header byte, rejecting unassigned bits
    pub fn from_byte(byte: u8) -> Result<Self> {
        if byte & !Self::KNOWN != 0 {
            return Err(Error::MalformedHeader(format!("unknown flag bits in 0x{byte:02x}")));
        }
        Ok(Flags(byte))
    }

    /// Raw header byte
    pub fn bits(&self) -> u8 {
        self.0
    }

    pub fn contains(&self, other: Flags) -> bool {
        self.0 & other.0 == other.0
    }

    pub fn intersects(&self, other: Flags) -> bool {
        self.0 & other.0 != 0
    }

    /// Whether the entropy loop conditions on the previous symbol
    pub fn is_order1(&self) -> bool {
        self.contains(Self::ORDER)
    }

    pub fn has_dict(&self) -> bool {
        self.contains(Self::DICT)
    }

    pub fn is_striped(&self) -> bool {
        self.contains(Self::X4)
    }

    pub fn has_external_size(&self) -> bool {
        self.contains(Self::NOSIZE)
    }

    pub fn is_cat(&self) -> bool {
        self.contains(Self::CAT)
    }

    pub fn has_rle(&self) -> bool {
        self.contains(Self::RLE)
    }

    pub fn has_pack(&self) -> bool {
        self.contains(Self::PACK)
    }

    /// Which top-level path the block takes
    pub fn layout(&self) -> Layout {
        if self.is_striped() {
            Layout::Striped
        } else if self.is_cat() {
            Layout::Raw
        } else {
            Layout::Entropy
        }
    }
}

impl BitOr for Flags {
    type Output = Flags;

    fn bitor(self, rhs: Flags) -> Flags {
        Flags(self.0 | rhs.0)
    }
}

impl BitOrAssign for Flags {
    fn bitor_assign(&mut self, rhs: Flags) {
        self.0 |= rhs.0;
    }
}

impl fmt::Display for Flags {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        const NAMES: [(Flags, &str); 7] = [
            (Flags::ORDER, "ORDER"),
            (Flags::DICT, "DICT"),
            (Flags::X4, "X4"),
            (Flags::NOSIZE, "NOSIZE"),
            (Flags::CAT, "CAT"),
            (Flags::RLE, "RLE"),
            (Flags::PACK, "PACK"),
        ];

        let names: Vec<&str> =
            NAMES.iter().filter(|(flag, _)| self.contains(*flag)).map(|(_, name)| *name).collect();
        if names.is_empty() {
            write!(f, "ORDER0")
        } else {
            write!(f, "{}", names.join("|"))
        }
    }
}

/// Mutually exclusive top-level block layouts
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Layout {
    /// Four sub-blocks, byte-interleaved
    Striped,
    /// Raw bytes
    Raw,
    /// Range-coded payload with optional transforms
    Entropy,
}
