mod serialization;

use std::{collections::BinaryHeap, cmp::Reverse};

use tracing::debug;

use crate::{error::{HuffmanError, Result}, frequency::FrequencyTable, Symbol, NUM_SYMBOLS};

pub use serialization::{deserialize, serialize};

/// Index of a node inside a [`HuffmanTree`] arena.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct NodeId(u16);

impl NodeId {
    #[inline(always)]
    fn idx(self) -> usize {
        self.0 as usize
    }
}

/// Upper bound on the nodes of a full binary tree over every symbol.
pub const MAX_NODES: usize = 2 * NUM_SYMBOLS - 1;

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Node {
    Leaf {
        symbol: Symbol,
        weight: u64,
    },
    Internal {
        weight: u64,
        left: NodeId,
        right: NodeId,
    },
}

impl Node {
    pub fn weight(&self) -> u64 {
        match self {
            Node::Leaf { weight, .. } | Node::Internal { weight, .. } => *weight,
        }
    }

    pub fn is_leaf(&self) -> bool {
        matches!(self, Node::Leaf { .. })
    }
}

/// Secondary heap key for equal weights: leaves first by symbol, then
/// internal nodes by creation order.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord)]
enum TieBreak {
    Leaf(Symbol),
    Internal(usize),
}

#[derive(Debug, PartialEq, Eq, PartialOrd, Ord)]
struct HeapNode {
    weight: u64,
    key: TieBreak,
    id: NodeId,
}

/// A full binary tree stored in a flat arena. Every internal node has
/// exactly two children and the root is never a leaf.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct HuffmanTree {
    nodes: Vec<Node>,
    root: NodeId,
}

impl HuffmanTree {
    /// Builds the tree bottom-up, always merging the two lightest nodes. The
    /// first one extracted becomes the left child.
    pub fn build(table: &FrequencyTable) -> Result<Self> {
        let mut nodes: Vec<Node> = Vec::with_capacity(MAX_NODES);
        let mut freq_tree = BinaryHeap::with_capacity(NUM_SYMBOLS);

        for (symbol, weight) in table.symbols() {
            freq_tree.push(Reverse(Self::push_node(&mut nodes, Node::Leaf { symbol, weight }, TieBreak::Leaf(symbol))));
        }

        let lone = match nodes.as_slice() {
            [] => return Err(HuffmanError::EmptyAlphabet),
            [Node::Leaf { symbol, .. }] => Some(*symbol),
            _ => None,
        };

        // A lone leaf cannot be the root, so pair it with a zero-weight filler.
        if let Some(symbol) = lone {
            let filler = match symbol {
                Symbol::EndOfStream => Symbol::Byte(0),
                Symbol::Byte(_) => Symbol::EndOfStream,
            };
            freq_tree.push(Reverse(Self::push_node(&mut nodes, Node::Leaf { symbol: filler, weight: 0 }, TieBreak::Leaf(filler))));
        }

        let mut merged = 0;
        let root = loop {
            let Some(Reverse(node1)) = freq_tree.pop() else {
                return Err(HuffmanError::EmptyAlphabet);
            };
            let Some(Reverse(node2)) = freq_tree.pop() else {
                break node1.id;
            };

            let internal = Node::Internal {
                weight: node1.weight + node2.weight,
                left: node1.id,
                right: node2.id,
            };
            freq_tree.push(Reverse(Self::push_node(&mut nodes, internal, TieBreak::Internal(merged))));
            merged += 1;
        };

        debug!(leaves = nodes.len() - merged, nodes = nodes.len(), "built huffman tree");

        Ok(HuffmanTree { nodes, root })
    }

    fn push_node(nodes: &mut Vec<Node>, node: Node, key: TieBreak) -> HeapNode {
        let id = NodeId(nodes.len() as u16);
        let weight = node.weight();
        nodes.push(node);
        HeapNode { weight, key, id }
    }

    /// Wraps an arena that was already checked to be a full binary tree.
    pub(crate) fn from_arena(nodes: Vec<Node>, root: NodeId) -> Self {
        HuffmanTree { nodes, root }
    }

    pub fn root(&self) -> NodeId {
        self.root
    }

    pub fn node(&self, id: NodeId) -> &Node {
        &self.nodes[id.idx()]
    }

    /// Child of `id` along `bit` (`false` = left). `None` for leaves and
    /// for ids outside the arena.
    #[inline(always)]
    pub fn child(&self, id: NodeId, bit: bool) -> Option<NodeId> {
        match self.nodes.get(id.idx())? {
            Node::Leaf { .. } => None,
            Node::Internal { left, right, .. } => Some(if bit { *right } else { *left }),
        }
    }

    pub fn num_nodes(&self) -> usize {
        self.nodes.len()
    }

    pub fn num_leaves(&self) -> usize {
        self.nodes.iter().filter(|n| n.is_leaf()).count()
    }

    pub fn weight(&self) -> u64 {
        self.node(self.root).weight()
    }

    /// Every leaf with its root-to-leaf path, in preorder.
    pub fn leaves(&self) -> Vec<(Symbol, Vec<bool>)> {
        let mut leaves = Vec::new();
        let mut stack = vec![(self.root, Vec::new())];

        while let Some((id, path)) = stack.pop() {
            match self.node(id) {
                Node::Leaf { symbol, .. } => leaves.push((*symbol, path)),
                Node::Internal { left, right, .. } => {
                    let mut right_path = path.clone();
                    right_path.push(true);
                    stack.push((*right, right_path));

                    let mut left_path = path;
                    left_path.push(false);
                    stack.push((*left, left_path));
                }
            }
        }

        leaves
    }

    /// Records every leaf's path in one traversal.
    pub fn code_table(&self) -> CodeTable {
        let mut codes = vec![None; NUM_SYMBOLS];

        for (symbol, path) in self.leaves() {
            codes[symbol.index()] = Some(path.into_boxed_slice());
        }

        CodeTable { codes }
    }

    /// Depth of the deepest leaf.
    pub fn height(&self) -> usize {
        self.leaves().iter().map(|(_, path)| path.len()).max().unwrap_or(0)
    }

    /// Indented dump of the tree, one node per line.
    pub fn structure(&self) -> String {
        let mut out = String::new();
        let mut stack = vec![(self.root, 0usize, "root")];

        while let Some((id, depth, label)) = stack.pop() {
            let indent = "  ".repeat(depth);
            match self.node(id) {
                Node::Leaf { symbol, weight } => {
                    out.push_str(&format!("{}{} -> Leaf {} [weight: {}]\n", indent, label, symbol, weight));
                }
                Node::Internal { weight, left, right } => {
                    out.push_str(&format!("{}{} -> Internal [weight: {}]\n", indent, label, weight));
                    stack.push((*right, depth + 1, "R"));
                    stack.push((*left, depth + 1, "L"));
                }
            }
        }

        out
    }
}

/// Root-to-leaf path of every symbol in a tree, indexed by [`Symbol::index`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CodeTable {
    codes: Vec<Option<Box<[bool]>>>,
}

impl CodeTable {
    #[inline(always)]
    pub fn get(&self, symbol: Symbol) -> Option<&[bool]> {
        self.codes[symbol.index()].as_deref()
    }

    pub fn iter(&self) -> impl Iterator<Item = (Symbol, &[bool])> + '_ {
        self.codes.iter()
            .enumerate()
            .filter_map(|(i, code)| Some((Symbol::from_index(i)?, code.as_deref()?)))
    }

    pub fn len(&self) -> usize {
        self.codes.iter().flatten().count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Number of payload bits needed to encode the symbols counted in `table`.
    pub fn encoded_bits(&self, table: &FrequencyTable) -> u64 {
        table.symbols()
            .filter_map(|(symbol, count)| Some(count * self.get(symbol)?.len() as u64))
            .sum()
    }
}
