pub mod bitstreams;
pub mod config;
pub mod error;
pub mod frequency;
pub mod huffman_codec;
pub mod huffman_tree;
pub mod stats;
pub mod utils;

pub use config::CodecConfig;
pub use error::HuffmanError;
pub use huffman_codec::{compress, compress_bytes, compress_to, decompress, decompress_bytes, decompress_to};
pub use stats::CodecReport;

/// Number of distinct data byte values.
pub const NUM_BYTES: usize = 256;
/// Data bytes plus the end-of-stream marker.
pub const NUM_SYMBOLS: usize = NUM_BYTES + 1;
/// Width of a symbol in the serialized tree.
pub const SYMBOL_BITS: u64 = 9;
/// Separates the tree header from the payload.
pub const SECTION_DELIMITER: u8 = 0x20;

/// A leaf value: one of the 256 data bytes, or the end-of-stream marker that
/// terminates the payload. The marker never collides with a data byte.
///
/// The derived order (all bytes ascending, then the marker) is the tie-break
/// key used when building trees.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Symbol {
    Byte(u8),
    EndOfStream,
}

impl Symbol {
    /// Dense index in `0..NUM_SYMBOLS`, also the serialized value.
    #[inline(always)]
    pub fn index(self) -> usize {
        match self {
            Symbol::Byte(b) => b as usize,
            Symbol::EndOfStream => NUM_BYTES,
        }
    }

    pub fn from_index(index: usize) -> Option<Self> {
        match index {
            i if i < NUM_BYTES => Some(Symbol::Byte(i as u8)),
            NUM_BYTES => Some(Symbol::EndOfStream),
            _ => None,
        }
    }
}

impl std::fmt::Display for Symbol {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Symbol::Byte(b) if b.is_ascii_graphic() => write!(f, "'{}'", *b as char),
            Symbol::Byte(b) => write!(f, "0x{:02x}", b),
            Symbol::EndOfStream => write!(f, "EOS"),
        }
    }
}

#[test]
fn test_symbol_index_roundtrip() {
    assert_eq!(Symbol::Byte(0).index(), 0);
    assert_eq!(Symbol::Byte(255).index(), 255);
    assert_eq!(Symbol::EndOfStream.index(), 256);
    assert_eq!(Symbol::from_index(65), Some(Symbol::Byte(b'A')));
    assert_eq!(Symbol::from_index(256), Some(Symbol::EndOfStream));
    assert_eq!(Symbol::from_index(257), None);
    assert!(Symbol::Byte(255) < Symbol::EndOfStream);
}
