use tracing::{debug, warn};

use crate::{bitstreams::BinaryReader, error::{HuffmanError, Result}, huffman_tree::{deserialize, HuffmanTree, Node}, Symbol, SECTION_DELIMITER, SYMBOL_BITS};

pub struct HuffmanDecoder {
    tree: HuffmanTree,
    header_bits: usize,
}

impl HuffmanDecoder {
    /// Rebuilds the tree from the header and checks the delimiter, leaving
    /// `reader` at the first payload byte.
    pub fn decode_header(reader: &mut BinaryReader) -> Result<Self> {
        let tree = deserialize(reader)?;
        // One tag bit per node plus a symbol per leaf.
        let header_bits = tree.num_nodes() + tree.num_leaves() * SYMBOL_BITS as usize;

        let bit_offset = reader.read_bits;
        let delimiter = reader.read_byte().map_err(|_| HuffmanError::MalformedTree {
            bit_offset,
            reason: "missing section delimiter",
        })?;
        if delimiter != SECTION_DELIMITER {
            return Err(HuffmanError::MalformedTree { bit_offset, reason: "unexpected section delimiter" });
        }

        debug!(leaves = tree.num_leaves(), header_bits, "read tree header");
        Ok(Self { tree, header_bits })
    }

    pub fn tree(&self) -> &HuffmanTree {
        &self.tree
    }

    /// Serialized tree bits, padding and delimiter excluded.
    pub fn header_bits(&self) -> usize {
        self.header_bits
    }

    /// Walks the tree one payload bit at a time, appending a byte to `out`
    /// at every data leaf and stopping at the end-of-stream leaf. Returns
    /// the payload bits consumed, padding excluded.
    pub fn read_body(&self, reader: &mut BinaryReader, out: &mut Vec<u8>) -> Result<usize> {
        let start = reader.read_bits;
        let root = self.tree.root();
        let mut current = root;

        loop {
            let bit_offset = reader.read_bits;
            let bit = reader.read_bit().map_err(|_| HuffmanError::TruncatedStream { bit_offset })?;

            current = self.tree.child(current, bit).ok_or(HuffmanError::InvalidCode { bit_offset })?;

            match self.tree.node(current) {
                Node::Leaf { symbol: Symbol::EndOfStream, .. } => break,
                Node::Leaf { symbol: Symbol::Byte(b), .. } => {
                    out.push(*b);
                    current = root;
                }
                Node::Internal { .. } => {}
            }
        }

        let payload_bits = reader.read_bits - start;
        reader.align();

        if reader.remaining_bytes() > 0 {
            warn!(trailing_bytes = reader.remaining_bytes(), "ignoring bytes after the end-of-stream marker");
        }

        debug!(decoded = out.len(), payload_bits, "read payload");
        Ok(payload_bits)
    }
}

/// Decodes the payload under an already known `tree`.
pub fn decode(reader: &mut BinaryReader, tree: HuffmanTree, out: &mut Vec<u8>) -> Result<usize> {
    HuffmanDecoder { tree, header_bits: 0 }.read_body(reader, out)
}
