use std::{fs, path::PathBuf};

use proptest::prelude::*;
use rand::{Rng, SeedableRng, rngs::StdRng};

use crate::{bitstreams::{BinaryReader, BinaryWriterBuilder}, huffman_tree::HuffmanTree, stats::CodecReport, SECTION_DELIMITER};

use super::*;

/// A fresh directory under the system temp dir, removed on drop.
struct Scratch(PathBuf);

impl Scratch {
    fn new(name: &str) -> Self {
        let dir = std::env::temp_dir().join(format!("huffman_rust_{}_{}_{}", name, std::process::id(), rand::random::<u32>()));
        fs::create_dir_all(&dir).unwrap();
        Scratch(dir)
    }

    fn file(&self, name: &str, contents: &[u8]) -> PathBuf {
        let path = self.0.join(name);
        fs::write(&path, contents).unwrap();
        path
    }
}

impl Drop for Scratch {
    fn drop(&mut self) {
        let _ = fs::remove_dir_all(&self.0);
    }
}

fn skewed_bytes(len: usize, seed: u64) -> Vec<u8> {
    let mut rng = StdRng::seed_from_u64(seed);
    (0..len).map(|_| {
        let r: f64 = rng.gen();
        (r * r * r * 256.0) as u8
    }).collect()
}

#[test]
fn test_concrete_scenario_roundtrip() {
    let input = [65, 65, 65, 66, 66, 67];

    let compressed = compress_bytes(&input).unwrap();

    // 43 tree bits -> 6 bytes, delimiter, 13 payload bits -> 2 bytes
    assert_eq!(compressed.len(), 9);
    assert_eq!(compressed[6], SECTION_DELIMITER);
    assert_eq!(decompress_bytes(&compressed).unwrap(), input);
}

#[test]
fn test_concrete_scenario_payload_bits() {
    let (compressed, sections) = compress_sections(&[65, 65, 65, 66, 66, 67]).unwrap();

    assert_eq!(sections, Sections { distinct_symbols: 4, header_bits: 43, payload_bits: 13 });
    // A A A B B C EOS = 0 0 0 10 10 110 111
    assert_eq!(&compressed[7..], &[0b0001_0101, 0b1011_1000]);
}

#[test]
fn test_both_directions_report_the_same_sections() {
    let input = skewed_bytes(3000, 5);

    let (compressed, written) = compress_sections(&input).unwrap();
    let (_, read) = decompress_sections(&compressed).unwrap();

    assert_eq!(written, read);
}

#[test]
fn test_empty_input() {
    let compressed = compress_bytes(&[]).unwrap();

    // Internal(Leaf 0x00, Leaf EOS): 21 bits -> 3 bytes, delimiter, one payload byte.
    assert_eq!(compressed.len(), 5);
    assert_eq!(compressed[4], 0b1000_0000);
    assert!(decompress_bytes(&compressed).unwrap().is_empty());
}

#[test]
fn test_single_repeated_byte() {
    let input = vec![0x7Fu8; 5000];

    let compressed = compress_bytes(&input).unwrap();
    let mut reader = BinaryReader::new(&compressed);
    let decoder = HuffmanDecoder::decode_header(&mut reader).unwrap();

    assert_eq!(decoder.tree().num_leaves(), 2);
    assert!(compressed.len() < 700);
    assert_eq!(decompress_bytes(&compressed).unwrap(), input);
}

#[test]
fn test_input_containing_every_byte() {
    let mut input: Vec<u8> = (0..=255).collect();
    input.extend(skewed_bytes(10_000, 7));

    assert_eq!(decompress_bytes(&compress_bytes(&input).unwrap()).unwrap(), input);
}

#[test]
fn test_former_sentinel_byte_is_plain_data() {
    // Low byte values are ordinary data, never an end marker.
    let input = [1, 0, 1, 1, 0, 0, 1, 255, 1];

    assert_eq!(decompress_bytes(&compress_bytes(&input).unwrap()).unwrap(), input);
}

#[test]
fn test_skewed_input_shrinks() {
    let input = skewed_bytes(100_000, 42);

    let compressed = compress_bytes(&input).unwrap();

    assert!(compressed.len() < input.len());
    assert_eq!(decompress_bytes(&compressed).unwrap(), input);
}

#[test]
fn test_compression_is_deterministic() {
    let input = skewed_bytes(20_000, 3);

    assert_eq!(compress_bytes(&input).unwrap(), compress_bytes(&input).unwrap());
}

#[test]
fn test_truncated_payload() {
    let input = b"the quick brown fox jumps over the lazy dog".to_vec();
    let compressed = compress_bytes(&input).unwrap();
    let (_, sections) = compress_sections(&input).unwrap();
    let header_len = (sections.header_bits + 7) / 8 + 1;

    for cut in header_len..compressed.len() {
        let err = decompress_bytes(&compressed[..cut]).unwrap_err();
        assert!(matches!(err, HuffmanError::TruncatedStream { .. }), "cut at {}: {}", cut, err);
    }
}

#[test]
fn test_truncated_header() {
    let compressed = compress_bytes(b"mississippi").unwrap();

    assert!(matches!(decompress_bytes(&[]), Err(HuffmanError::MalformedTree { .. })));
    assert!(matches!(decompress_bytes(&compressed[..2]), Err(HuffmanError::MalformedTree { .. })));
}

#[test]
fn test_missing_delimiter() {
    let (compressed, sections) = compress_sections(b"mississippi").unwrap();
    let header_len = (sections.header_bits + 7) / 8;

    let err = decompress_bytes(&compressed[..header_len]).unwrap_err();
    assert!(matches!(err, HuffmanError::MalformedTree { reason: "missing section delimiter", .. }));

    let mut corrupted = compressed.clone();
    corrupted[header_len] = 0x21;
    let err = decompress_bytes(&corrupted).unwrap_err();
    assert!(matches!(err, HuffmanError::MalformedTree { reason: "unexpected section delimiter", .. }));
}

#[test]
fn test_trailing_bytes_are_ignored() {
    let input = b"abcabcabd".to_vec();
    let mut compressed = compress_bytes(&input).unwrap();
    compressed.extend_from_slice(&[0xDE, 0xAD]);

    assert_eq!(decompress_bytes(&compressed).unwrap(), input);
}

#[test]
fn test_encode_with_foreign_tree() {
    let tree = HuffmanTree::build(&crate::frequency::FrequencyTable::build(b"aaaa")).unwrap();
    let mut writer = BinaryWriterBuilder::new();

    let err = encode(b"ab", &tree, &mut writer).unwrap_err();
    assert!(matches!(err, HuffmanError::MissingCode(crate::Symbol::Byte(b'b'))));
}

#[test]
fn test_decode_with_known_tree() {
    let input = b"hello, huffman".to_vec();
    let tree = HuffmanTree::build(&crate::frequency::FrequencyTable::build(&input)).unwrap();

    let mut writer = BinaryWriterBuilder::new();
    encode(&input, &tree, &mut writer).unwrap();
    let payload = writer.build().os;

    let mut out = Vec::new();
    decode(&mut BinaryReader::new(&payload), tree, &mut out).unwrap();
    assert_eq!(out, input);
}

#[test]
fn test_file_roundtrip_with_derived_names() {
    let scratch = Scratch::new("derived");
    let input = skewed_bytes(4096, 11);
    let original = scratch.file("notes.dat", &input);
    let config = CodecConfig::default();

    let compressed = compress(&original, &config).unwrap();
    assert_eq!(compressed, scratch.0.join("notes.mcf"));

    let restored = decompress(&compressed, &config).unwrap();
    assert_eq!(restored, scratch.0.join("notes.txt"));
    assert_eq!(fs::read(restored).unwrap(), input);
}

#[test]
fn test_file_report_and_stats() {
    let scratch = Scratch::new("stats");
    let original = scratch.file("in.bin", &[65, 65, 65, 66, 66, 67]);
    let output = scratch.0.join("in.mcf");
    let config = CodecConfig { write_stats: true, ..CodecConfig::default() };

    let report = compress_to(&original, &output, &config).unwrap();

    assert_eq!(report.input_bytes, 6);
    assert_eq!(report.output_bytes, 9);
    assert_eq!(report.header_bits, 43);
    assert_eq!(report.payload_bits, 13);

    let stored: CodecReport = serde_json::from_slice(&fs::read(report.stats_path()).unwrap()).unwrap();
    assert_eq!(stored, report);
}

#[test]
fn test_refuses_to_overwrite_by_default() {
    let scratch = Scratch::new("overwrite");
    let original = scratch.file("a.txt", b"some text");
    let existing = scratch.file("a.mcf", b"keep me");

    let err = compress(&original, &CodecConfig::default()).unwrap_err();
    assert!(matches!(err, HuffmanError::Io { op: IoOp::Write, .. }));
    assert_eq!(fs::read(&existing).unwrap(), b"keep me");

    let config = CodecConfig { overwrite: true, ..CodecConfig::default() };
    compress(&original, &config).unwrap();
    assert_ne!(fs::read(&existing).unwrap(), b"keep me");
}

#[test]
fn test_missing_input_file() {
    let scratch = Scratch::new("missing");

    let err = compress(scratch.0.join("nope.txt"), &CodecConfig::default()).unwrap_err();

    assert!(matches!(err, HuffmanError::Io { op: IoOp::Read, .. }));
    assert!(!scratch.0.join("nope.mcf").exists());
}

#[test]
fn test_corrupt_file_leaves_no_output() {
    let scratch = Scratch::new("corrupt");
    let compressed = compress_bytes(b"some payload that will be cut").unwrap();
    let broken = scratch.file("broken.mcf", &compressed[..compressed.len() - 2]);

    let err = decompress(&broken, &CodecConfig::default()).unwrap_err();

    assert!(matches!(err.kind(), HuffmanError::TruncatedStream { .. }));
    assert!(matches!(err, HuffmanError::File { ref path, .. } if *path == broken));
    assert!(!scratch.0.join("broken.txt").exists());
}

#[test]
fn test_unwritable_stats_removes_output() {
    let scratch = Scratch::new("stats_dir");
    let original = scratch.file("in.bin", b"some text to compress");
    let output = scratch.0.join("in.mcf");
    fs::create_dir(scratch.0.join("in.mcf.stats.json")).unwrap();
    let config = CodecConfig { write_stats: true, ..CodecConfig::default() };

    let err = compress_to(&original, &output, &config).unwrap_err();

    assert!(matches!(err, HuffmanError::Io { op: IoOp::Write, .. }));
    assert!(!output.exists());

    // Nothing is left behind, so a retry without stats goes through.
    compress_to(&original, &output, &CodecConfig::default()).unwrap();
    assert!(output.exists());
}

#[test]
fn test_existing_stats_file_is_kept_without_overwrite() {
    let scratch = Scratch::new("stats_keep");
    let original = scratch.file("in.bin", b"some text to compress");
    let output = scratch.0.join("in.mcf");
    let stats = scratch.file("in.mcf.stats.json", b"precious");
    let config = CodecConfig { write_stats: true, ..CodecConfig::default() };

    let err = compress_to(&original, &output, &config).unwrap_err();

    assert!(matches!(err, HuffmanError::Io { op: IoOp::Write, ref path, .. } if *path == stats));
    assert_eq!(fs::read(&stats).unwrap(), b"precious");
    assert!(!output.exists());

    let config = CodecConfig { overwrite: true, ..config };
    let report = compress_to(&original, &output, &config).unwrap();
    let stored: CodecReport = serde_json::from_slice(&fs::read(&stats).unwrap()).unwrap();
    assert_eq!(stored, report);
}

proptest! {
    #[test]
    fn prop_roundtrip(input in proptest::collection::vec(any::<u8>(), 0..4096)) {
        let compressed = compress_bytes(&input).unwrap();
        prop_assert_eq!(decompress_bytes(&compressed).unwrap(), input);
    }

    #[test]
    fn prop_roundtrip_small_alphabet(input in proptest::collection::vec(0u8..4, 0..4096)) {
        let compressed = compress_bytes(&input).unwrap();
        prop_assert_eq!(decompress_bytes(&compressed).unwrap(), input);
    }

    #[test]
    fn prop_deterministic(input in proptest::collection::vec(any::<u8>(), 0..1024)) {
        prop_assert_eq!(compress_bytes(&input).unwrap(), compress_bytes(&input).unwrap());
    }

    #[test]
    fn prop_garbage_never_panics(data in proptest::collection::vec(any::<u8>(), 0..256)) {
        let _ = decompress_bytes(&data);
    }
}
