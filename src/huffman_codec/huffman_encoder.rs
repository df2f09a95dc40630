use tracing::debug;

use crate::{bitstreams::BinaryWriterBuilder, error::{HuffmanError, Result}, huffman_tree::{serialize, CodeTable, HuffmanTree}, Symbol, SECTION_DELIMITER};

/// Writes a tree header and payload using a code table derived once from
/// the tree.
pub struct HuffmanEncoder<'t> {
    tree: &'t HuffmanTree,
    codes: CodeTable,
}

impl<'t> HuffmanEncoder<'t> {
    pub fn new(tree: &'t HuffmanTree) -> Self {
        Self { tree, codes: tree.code_table() }
    }

    pub fn codes(&self) -> &CodeTable {
        &self.codes
    }

    /// Serialized tree, padding, then the delimiter byte. Returns the tree
    /// bits, padding and delimiter excluded.
    pub fn write_header(&self, writer: &mut BinaryWriterBuilder) -> usize {
        let tree_bits = serialize(self.tree, writer);
        writer.write_byte(SECTION_DELIMITER);

        debug!(tree_bits, header_bytes = writer.len(), "wrote tree header");
        tree_bits
    }

    /// Codes of every byte of `input` followed by the end-of-stream code,
    /// padded to a byte boundary. Returns the payload bits, padding excluded.
    pub fn write_body(&self, input: &[u8], writer: &mut BinaryWriterBuilder) -> Result<usize> {
        let start = writer.written_bits;

        for &b in input {
            writer.write_bits(self.code(Symbol::Byte(b))?);
        }
        writer.write_bits(self.code(Symbol::EndOfStream)?);

        let payload_bits = writer.written_bits - start;
        writer.flush();

        debug!(symbols = input.len(), payload_bits, "wrote payload");
        Ok(payload_bits)
    }

    #[inline(always)]
    fn code(&self, symbol: Symbol) -> Result<&[bool]> {
        self.codes.get(symbol).ok_or(HuffmanError::MissingCode(symbol))
    }
}

/// Writes the payload for `input` under `tree`.
pub fn encode(input: &[u8], tree: &HuffmanTree, writer: &mut BinaryWriterBuilder) -> Result<usize> {
    HuffmanEncoder::new(tree).write_body(input, writer)
}
