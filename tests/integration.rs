//! End-to-end integration tests for cram-arith.
//!
//! Exercises every encodable flag combination with synthetic genomic data,
//! the decode-only transforms through hand-assembled blocks, and the CLI.

use std::process::Command;

use cram_arith::{
    decode, decode_legacy, decode_with_len, encode, encode_legacy, ArithCodec, BlockCodec,
    ByteWriter, CodecConfig, Error, Flags, Order,
};

// ============================================================================
// Test Data Generators
// ============================================================================

/// Generate random data using a simple PRNG
fn generate_random_data(size: usize, seed: u64) -> Vec<u8> {
    let mut data = Vec::with_capacity(size);
    let mut state = seed;
    for _ in 0..size {
        // Simple xorshift PRNG
        state ^= state << 13;
        state ^= state >> 7;
        state ^= state << 17;
        data.push((state & 0xFF) as u8);
    }
    data
}

/// Generate FASTQ-formatted data
fn generate_fastq_data(num_reads: usize, read_length: usize) -> Vec<u8> {
    let mut data = Vec::new();
    let bases = [b'A', b'C', b'G', b'T'];

    for i in 0..num_reads {
        data.extend_from_slice(format!("@read_{}\n", i).as_bytes());
        for j in 0..read_length {
            data.push(bases[(i * 7 + j * j) % 4]);
        }
        data.extend_from_slice(b"\n+\n");
        for j in 0..read_length {
            // Quality falls off towards the end of the read
            data.push(b'I' - (j * 30 / read_length) as u8);
        }
        data.push(b'\n');
    }
    data
}

/// Generate quality-like data with long runs (RLE friendly)
fn generate_run_data(size: usize) -> Vec<u8> {
    let mut data = Vec::with_capacity(size);
    let mut i = 0usize;
    while data.len() < size {
        let value = b'#' + (i % 5) as u8 * 10;
        let run = 1 + (i * 13) % 40;
        data.extend(std::iter::repeat(value).take(run.min(size - data.len())));
        i += 1;
    }
    data
}

fn encodable_flags() -> Vec<Flags> {
    vec![Flags::NONE, Flags::ORDER, Flags::RLE, Flags::ORDER | Flags::RLE]
}

fn assert_roundtrip(data: &[u8], flags: Flags) -> Vec<u8> {
    let encoded = encode(data, flags).unwrap();
    let decoded = decode(&encoded).unwrap();
    assert_eq!(decoded, data, "roundtrip failed for {flags} on {} bytes", data.len());
    encoded
}

// ============================================================================
// Round-trip
// ============================================================================

#[test]
fn test_roundtrip_empty() {
    for flags in encodable_flags() {
        let encoded = assert_roundtrip(&[], flags);
        assert_eq!(encoded[1], 0, "n_out must be recorded as zero");
    }
}

#[test]
fn test_roundtrip_single_byte() {
    for b in [0u8, 1, 65, 254, 255] {
        for flags in encodable_flags() {
            assert_roundtrip(&[b], flags);
        }
    }
}

#[test]
fn test_roundtrip_random() {
    for (size, seed) in [(1usize, 1u64), (17, 2), (1000, 3), (70_000, 4)] {
        let data = generate_random_data(size, seed);
        for flags in encodable_flags() {
            assert_roundtrip(&data, flags);
        }
    }
}

#[test]
fn test_roundtrip_fastq() {
    let data = generate_fastq_data(500, 100);
    for flags in encodable_flags() {
        let encoded = assert_roundtrip(&data, flags);
        assert!(encoded.len() < data.len() * 3 / 4, "{flags}: {} => {}", data.len(), encoded.len());
    }
}

#[test]
fn test_order1_beats_order0_on_context_data() {
    // Each byte is fully determined by its predecessor
    let data: Vec<u8> = (0..20_000u32).map(|i| b"ACGT"[(i % 4) as usize]).collect();
    let o0 = assert_roundtrip(&data, Flags::NONE);
    let o1 = assert_roundtrip(&data, Flags::ORDER);
    assert!(o1.len() < o0.len());
}

#[test]
fn test_rle_shrinks_runs() {
    let data = generate_run_data(50_000);
    let plain = assert_roundtrip(&data, Flags::NONE);
    let rle = assert_roundtrip(&data, Flags::RLE);
    assert!(rle.len() < plain.len(), "rle {} vs plain {}", rle.len(), plain.len());
    assert_roundtrip(&data, Flags::ORDER | Flags::RLE);
}

#[test]
fn test_roundtrip_long_run_past_renormalization() {
    // Long enough that the run models renormalize many times
    let mut data = vec![0u8; 300_000];
    data.extend(vec![255u8; 300_000]);
    for flags in encodable_flags() {
        assert_roundtrip(&data, flags);
    }
}

#[test]
fn test_encoding_is_deterministic() {
    let data = generate_fastq_data(100, 75);
    for flags in encodable_flags() {
        assert_eq!(encode(&data, flags).unwrap(), encode(&data, flags).unwrap());
    }
}

#[test]
fn test_nosize_requires_length() {
    let data = generate_random_data(300, 9);
    let flags = Flags::NOSIZE | Flags::ORDER;
    let encoded = encode(&data, flags).unwrap();
    assert_eq!(decode_with_len(&encoded, data.len()).unwrap(), data);
    assert!(matches!(decode(&encoded), Err(Error::MalformedHeader(_))));
}

#[test]
fn test_decode_with_len_prefers_recorded_length() {
    let data = b"ACGTACGT".to_vec();
    let encoded = encode(&data, Flags::NONE).unwrap();
    assert_eq!(decode_with_len(&encoded, 3).unwrap(), data);
}

// ============================================================================
// Decode-only transforms
// ============================================================================

#[test]
fn test_cat_fixture() {
    assert_eq!(decode(&[0x20, 5, 1, 2, 3, 4, 5]).unwrap(), vec![1, 2, 3, 4, 5]);
}

#[test]
fn test_pack_fixture() {
    // An order-0 payload for the single packed byte 0b01010101
    let inner = encode(&[0b0101_0101], Flags::NONE).unwrap();

    let mut block = vec![Flags::PACK.bits(), 8, 2, 10, 20, 1];
    // Skip the inner flag byte and length, keep max_sym and coder bytes
    block.extend_from_slice(&inner[2..]);

    assert_eq!(decode(&block).unwrap(), vec![20, 10, 20, 10, 20, 10, 20, 10]);
}

#[test]
fn test_x4_byte_planes() {
    // 32-bit little-endian values whose high bytes are constant
    let values: Vec<u32> = (0..1000).map(|i| 0x0100_0000 + (i * 37) % 5000).collect();
    let original: Vec<u8> = values.iter().flat_map(|v| v.to_le_bytes()).collect();

    let lanes: Vec<Vec<u8>> =
        (0..4).map(|p| original.iter().skip(p).step_by(4).copied().collect()).collect();
    let subs: Vec<Vec<u8>> =
        lanes.iter().map(|lane| encode(lane, Flags::NOSIZE | Flags::RLE).unwrap()).collect();

    let mut out = ByteWriter::new();
    out.write_u8(Flags::X4.bits());
    out.write_uint7(original.len() as u32);
    for sub in &subs {
        out.write_uint7(sub.len() as u32);
    }
    for sub in &subs {
        out.write_bytes(sub);
    }

    assert_eq!(decode(&out.finish()).unwrap(), original);
}

#[test]
fn test_unsupported_encoders() {
    for flags in [Flags::PACK, Flags::DICT, Flags::X4] {
        assert!(matches!(encode(b"abc", flags), Err(Error::UnsupportedEncode(_))));
    }
}

// ============================================================================
// Corruption
// ============================================================================

#[test]
fn test_truncation_fails_cleanly() {
    let data = generate_fastq_data(20, 50);
    for flags in encodable_flags() {
        let encoded = encode(&data, flags).unwrap();
        for cut in [1, 2, 3, encoded.len() / 2, encoded.len() - 1] {
            assert!(decode(&encoded[..cut]).is_err(), "{flags} cut at {cut}");
        }
    }
}

#[test]
fn test_bit_flips_never_panic() {
    let data = generate_fastq_data(10, 40);
    for flags in encodable_flags() {
        let encoded = encode(&data, flags).unwrap();
        for pos in 0..encoded.len() {
            let mut corrupt = encoded.clone();
            corrupt[pos] ^= 0x5a;
            // Any outcome but a panic is acceptable
            let _ = decode(&corrupt);
        }
    }
}

// ============================================================================
// Legacy framing and trait
// ============================================================================

#[test]
fn test_legacy_roundtrip() {
    let data = generate_fastq_data(200, 60);
    for order in [Order::Zero, Order::One] {
        let encoded = encode_legacy(&data, order).unwrap();
        assert_eq!(u32::from_le_bytes(encoded[..4].try_into().unwrap()) as usize, data.len());
        assert_eq!(decode_legacy(&encoded, order).unwrap(), data);
    }
}

#[test]
fn test_codec_trait_matches_free_functions() {
    let data = generate_run_data(5000);
    let config = CodecConfig { order: Order::One, rle: true, ..Default::default() };
    let mut codec = ArithCodec::new(config.clone());
    assert_eq!(codec.compress(&data).unwrap(), encode(&data, config.flags()).unwrap());
}

// ============================================================================
// CLI
// ============================================================================

fn cli() -> Command {
    Command::new(env!("CARGO_BIN_EXE_cram-arith"))
}

#[test]
fn test_cli_roundtrip() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("reads.fq");
    let packed = dir.path().join("reads.arith");
    let restored = dir.path().join("reads.out");

    let data = generate_fastq_data(300, 80);
    std::fs::write(&input, &data).unwrap();

    let status = cli()
        .args(["-O", "1", "--rle", "-i"])
        .arg(&input)
        .arg("-o")
        .arg(&packed)
        .status()
        .expect("Failed to run CLI");
    assert!(status.success());

    let status =
        cli().arg("-d").arg("-i").arg(&packed).arg("-o").arg(&restored).status().unwrap();
    assert!(status.success());

    assert_eq!(std::fs::read(&restored).unwrap(), data);
    assert_eq!(std::fs::read(&packed).unwrap()[0], (Flags::ORDER | Flags::RLE).bits());
}

#[test]
fn test_cli_nosize_needs_size() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("in.bin");
    let packed = dir.path().join("in.arith");
    let restored = dir.path().join("in.out");

    let data = generate_random_data(1000, 77);
    std::fs::write(&input, &data).unwrap();

    let status =
        cli().arg("--nosize").arg("-i").arg(&input).arg("-o").arg(&packed).status().unwrap();
    assert!(status.success());

    let output =
        cli().arg("-d").arg("-i").arg(&packed).arg("-o").arg(&restored).output().unwrap();
    assert_eq!(output.status.code(), Some(2));
    assert!(String::from_utf8_lossy(&output.stderr).starts_with("Error:"));

    let status = cli()
        .args(["-d", "--size", "1000", "-i"])
        .arg(&packed)
        .arg("-o")
        .arg(&restored)
        .status()
        .unwrap();
    assert!(status.success());
    assert_eq!(std::fs::read(&restored).unwrap(), data);
}

#[test]
fn test_cli_legacy_verbose() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("in.txt");
    let packed = dir.path().join("in.arith");

    std::fs::write(&input, b"hello hello hello").unwrap();

    let output = cli()
        .args(["--legacy", "-v", "-i"])
        .arg(&input)
        .arg("-o")
        .arg(&packed)
        .output()
        .unwrap();
    assert!(output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("Compress order 0, 17 =>"));

    let packed_bytes = std::fs::read(&packed).unwrap();
    assert_eq!(&packed_bytes[..4], &17u32.to_le_bytes());
}
