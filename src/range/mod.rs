pub mod coder;
pub mod model;

pub use coder::{RangeDecoder, RangeEncoder};
pub use model::ByteModel;
