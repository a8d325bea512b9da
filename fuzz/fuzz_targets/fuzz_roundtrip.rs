#![no_main]

use cram_arith::{decode, decode_with_len, encode, Flags};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    // First byte picks the flags, the rest is the payload
    let Some((&selector, input)) = data.split_first() else {
        return;
    };

    let mut flags = Flags::NONE;
    if selector & 1 != 0 {
        flags |= Flags::ORDER;
    }
    if selector & 2 != 0 {
        flags |= Flags::RLE;
    }
    if selector & 4 != 0 {
        flags |= Flags::CAT;
    }
    let nosize = selector & 8 != 0;
    if nosize {
        flags |= Flags::NOSIZE;
    }

    let encoded = encode(input, flags).expect("encode must accept any input");
    let decoded = if nosize {
        decode_with_len(&encoded, input.len())
    } else {
        decode(&encoded)
    }
    .expect("decode must accept its own output");

    assert_eq!(decoded, input, "roundtrip mismatch for {flags}");
});
