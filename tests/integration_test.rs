//! Integration tests for huffpack

use std::fs::File;
use std::io::{Cursor, Read, Write};

use huffpack::config::HuffConfig;
use huffpack::container;
use huffpack::message::CodeBook;
use huffpack::*;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

const MODES: [Mode; 2] = [Mode::Verbose, Mode::Compact];

fn round_trip(data: &[u8], mode: Mode) -> Vec<u8> {
    let packed = compress_bytes(data, mode).unwrap();
    decompress_bytes(&packed).unwrap()
}

#[test]
fn test_full_lifecycle() {
    let data = b"the quick brown fox jumps over the lazy dog".repeat(50);
    for mode in MODES {
        let packed = compress_bytes(&data, mode).unwrap();
        assert!(packed.len() < data.len(), "{mode} should shrink english text");
        assert_eq!(decompress_bytes(&packed).unwrap(), data);
    }
}

#[test]
fn test_concrete_three_symbol_scenario() {
    let tree = Tree::from_bytes(b"AAABBC").unwrap();
    assert_eq!(tree.node_count(), 5);
    let book = CodeBook::new(&tree);
    let len = |b| book.code(b).unwrap().len();
    assert!(len(b'A') < len(b'B'));
    assert!(len(b'C') >= len(b'B'));
    for mode in MODES {
        assert_eq!(round_trip(b"AAABBC", mode), b"AAABBC");
    }
}

#[test]
fn test_degenerate_inputs() {
    for mode in MODES {
        assert_eq!(round_trip(b"ZZZ", mode), b"ZZZ");
        assert_eq!(round_trip(b"", mode), b"");
        assert_eq!(round_trip(b"Q", mode), b"Q");
    }
}

#[test]
fn test_random_round_trips() {
    let mut rng = StdRng::seed_from_u64(0x5eed);
    for _ in 0..50 {
        let len = rng.gen_range(0..2048);
        let alphabet = rng.gen_range(1..=256u32);
        let data: Vec<u8> = (0..len).map(|_| rng.gen_range(0..alphabet) as u8).collect();
        for mode in MODES {
            assert_eq!(round_trip(&data, mode), data, "{mode} failed for len {len}");
        }
    }
}

#[test]
fn test_skewed_distribution_round_trip() {
    // Doubling counts give the deepest possible tree for 30 symbols.
    let mut data = Vec::new();
    for symbol in 0..30u8 {
        data.extend(std::iter::repeat(symbol).take(1 << (symbol / 2)));
    }
    for mode in MODES {
        assert_eq!(round_trip(&data, mode), data);
    }
}

#[test]
fn test_large_data() {
    let data = vec![0xABu8; 100_000];
    let mut out = Vec::new();
    let report = compress(Cursor::new(&data), &mut out, Mode::Compact).unwrap();
    assert!(report.ratio < 0.01, "uniform data should compress well");
    assert_eq!(decompress_bytes(&out).unwrap(), data);
}

#[test]
fn test_binary_data() {
    let data: Vec<u8> = (0..=255).cycle().take(2000).collect();
    for mode in MODES {
        assert_eq!(round_trip(&data, mode), data);
    }
}

#[test]
fn test_file_round_trip() {
    let dir = tempfile::tempdir().unwrap();
    let original = dir.path().join("input.txt");
    let packed = dir.path().join("input.txt.huf");
    let restored = dir.path().join("restored.txt");
    let data = b"file backed round trip, file backed round trip".repeat(20);
    File::create(&original).unwrap().write_all(&data).unwrap();

    let compressor = Compressor::new(HuffConfig {
        mode: Mode::Compact,
        buffer_size: 37,
        ..HuffConfig::default()
    });
    let report = compressor
        .compress(File::open(&original).unwrap(), File::create(&packed).unwrap())
        .unwrap();
    assert_eq!(report.compressed_size, std::fs::metadata(&packed).unwrap().len());

    compressor
        .decompress(File::open(&packed).unwrap(), File::create(&restored).unwrap())
        .unwrap();
    let mut restored_bytes = Vec::new();
    File::open(&restored)
        .unwrap()
        .read_to_end(&mut restored_bytes)
        .unwrap();
    assert_eq!(restored_bytes, data);
}

#[test]
fn test_reconstructed_tree_matches_built_tree() {
    let data = b"she sells sea shells by the sea shore";
    let built = Tree::from_bytes(data).unwrap();
    let shape = |tree: &Tree| -> Vec<Option<u8>> {
        tree.preorder()
            .map(|n| if n.is_leaf() { Some(n.value) } else { None })
            .collect()
    };
    for mode in MODES {
        let packed = compress_bytes(data, mode).unwrap();
        let (header, rebuilt) = container::read_tree(packed.as_slice()).unwrap();
        assert_eq!(header.mode, mode);
        assert_eq!(header.message_size as usize, data.len());
        assert_eq!(shape(&rebuilt), shape(&built));
    }
}

#[test]
fn test_wrong_magic_produces_no_output() {
    let mut packed = compress_bytes(b"some text", Mode::Verbose).unwrap();
    packed[0] = b'Z';
    let mut out = Vec::new();
    let err = decompress(packed.as_slice(), &mut out).unwrap_err();
    assert!(matches!(err, HuffError::Format(_)));
    assert!(out.is_empty());
    assert!(err.to_string().starts_with("wrong file format"));
}

#[test]
fn test_truncated_payload_is_an_error() {
    let data = b"a message long enough to span several payload bytes".repeat(4);
    for mode in MODES {
        let packed = compress_bytes(&data, mode).unwrap();
        let cut = &packed[..packed.len() - 3];
        assert!(matches!(decompress_bytes(cut), Err(HuffError::Truncated)));
    }
}

#[test]
fn test_short_header_is_io_error() {
    assert!(matches!(decompress_bytes(b"HUF1"), Err(HuffError::Io(_))));
}

#[test]
fn test_report_serializes() {
    let mut out = Vec::new();
    let report = compress(Cursor::new(b"json report"), &mut out, Mode::Verbose).unwrap();
    let json = serde_json::to_string(&report).unwrap();
    assert!(json.contains("\"mode\":\"verbose\""));
    let back: CompressionReport = serde_json::from_str(&json).unwrap();
    assert_eq!(back.original_size, 11);
    assert_eq!(back.compressed_size, out.len() as u64);
}
