//! Preorder bit encoding of a [`HuffmanTree`].
//!
//! An internal node is a `0` bit followed by its left and right subtrees; a
//! leaf is a `1` bit followed by its symbol in [`SYMBOL_BITS`] bits. The
//! encoding needs no length prefix: the reader knows the tree is complete
//! once every internal node has received both children.

use crate::{bitstreams::{BinaryReader, BinaryWriterBuilder}, error::{HuffmanError, Result}, Symbol, NUM_SYMBOLS, SYMBOL_BITS};

use super::{HuffmanTree, Node, NodeId, MAX_NODES};

/// Writes `tree` and pads the writer to a byte boundary. Returns the number
/// of tree bits, padding excluded.
pub fn serialize(tree: &HuffmanTree, writer: &mut BinaryWriterBuilder) -> usize {
    let start = writer.written_bits;
    let mut stack = vec![tree.root()];

    while let Some(id) = stack.pop() {
        match tree.node(id) {
            Node::Leaf { symbol, .. } => {
                writer.write_bit(true);
                writer.push_bits(symbol.index() as u64, SYMBOL_BITS);
            }
            Node::Internal { left, right, .. } => {
                writer.write_bit(false);
                stack.push(*right);
                stack.push(*left);
            }
        }
    }

    let tree_bits = writer.written_bits - start;
    writer.flush();
    tree_bits
}

/// Reads a tree written by [`serialize`] and realigns the reader to the next
/// byte boundary. Weights are not stored, so every node comes back with
/// weight 0.
pub fn deserialize(reader: &mut BinaryReader) -> Result<HuffmanTree> {
    let mut nodes: Vec<Node> = Vec::new();
    let mut seen = [false; NUM_SYMBOLS];
    // Internal nodes still waiting for children, with their left child once known.
    let mut pending: Vec<(NodeId, Option<NodeId>)> = Vec::new();

    let root = loop {
        let bit_offset = reader.read_bits;
        if nodes.len() >= MAX_NODES {
            return Err(malformed(bit_offset, "more nodes than a tree over 257 symbols can have"));
        }

        let id = NodeId(nodes.len() as u16);
        let is_leaf = reader.read_bit().map_err(|_| malformed(bit_offset, "stream ended inside the tree"))?;

        if !is_leaf {
            nodes.push(Node::Internal { weight: 0, left: id, right: id });
            pending.push((id, None));
            continue;
        }

        if nodes.is_empty() {
            return Err(malformed(bit_offset, "root is a leaf"));
        }

        let value = reader.read_int(SYMBOL_BITS).map_err(|_| malformed(bit_offset, "stream ended inside a leaf"))?;
        let symbol = Symbol::from_index(value as usize).ok_or_else(|| malformed(bit_offset, "symbol value out of range"))?;
        if std::mem::replace(&mut seen[symbol.index()], true) {
            return Err(malformed(bit_offset, "symbol appears in more than one leaf"));
        }
        nodes.push(Node::Leaf { symbol, weight: 0 });

        // Hand the finished subtree to its parent, closing every internal
        // node that now has both children.
        let mut child = id;
        let finished = loop {
            match pending.last_mut() {
                None => break Some(child),
                Some((_, left @ None)) => {
                    *left = Some(child);
                    break None;
                }
                Some((parent, Some(left))) => {
                    let (parent, left) = (*parent, *left);
                    nodes[parent.idx()] = Node::Internal { weight: 0, left, right: child };
                    pending.pop();
                    child = parent;
                }
            }
        };

        if let Some(root) = finished {
            break root;
        }
    };

    if !seen[Symbol::EndOfStream.index()] {
        return Err(malformed(reader.read_bits, "tree has no end-of-stream leaf"));
    }

    reader.align();

    Ok(HuffmanTree::from_arena(nodes, root))
}

fn malformed(bit_offset: usize, reason: &'static str) -> HuffmanError {
    HuffmanError::MalformedTree { bit_offset, reason }
}
