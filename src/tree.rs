//! Huffman tree construction and code derivation.
//!
//! The tree lives in an arena: nodes are stored in a `Vec` and refer to their
//! children by [`NodeId`]. Leaves are pushed first, one per symbol in
//! ascending byte order, so a leaf's id is stable for a given table.

use std::collections::BTreeMap;
use std::fmt;

use tracing::trace;

use crate::frequency::FrequencyTable;
use crate::min_heap::MinHeap;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeId(usize);

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Node {
    Leaf {
        symbol: u8,
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

    pub fn symbol(&self) -> Option<u8> {
        match self {
            Node::Leaf { symbol, .. } => Some(*symbol),
            Node::Internal { .. } => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HuffmanTree {
    nodes: Vec<Node>,
    root: NodeId,
}

impl HuffmanTree {
    /// Builds the tree for `table`, or `None` when the table is empty.
    ///
    /// The two lightest nodes are merged until one remains; the first one
    /// extracted becomes the left child. Equal weights leave the heap in
    /// insertion order, which makes the shape a pure function of the table.
    pub fn build(table: &FrequencyTable) -> Option<Self> {
        let mut nodes = Vec::with_capacity(table.len().saturating_mul(2));
        let mut heap = MinHeap::with_capacity(table.len());

        for (symbol, weight) in table.iter() {
            let id = NodeId(nodes.len());
            nodes.push(Node::Leaf { symbol, weight });
            heap.insert(weight, id);
        }

        while heap.len() > 1 {
            let (left_weight, left) = heap.extract_min()?;
            let (right_weight, right) = heap.extract_min()?;
            let weight = left_weight + right_weight;

            let id = NodeId(nodes.len());
            nodes.push(Node::Internal {
                weight,
                left,
                right,
            });
            heap.insert(weight, id);
        }

        let (_, root) = heap.extract_min()?;
        trace!(nodes = nodes.len(), "built huffman tree");
        Some(HuffmanTree { nodes, root })
    }

    pub fn root(&self) -> NodeId {
        self.root
    }

    pub fn node(&self, id: NodeId) -> &Node {
        &self.nodes[id.0]
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// A tree for a single distinct symbol is just that symbol's leaf.
    pub fn is_single_leaf(&self) -> bool {
        matches!(self.node(self.root), Node::Leaf { .. })
    }

    /// Follows one edge: `false` goes left, `true` goes right.
    ///
    /// When the root is itself a leaf, the symbol's code is "0", so bit 0 at
    /// the root lands on that leaf and bit 1 has nowhere to go.
    pub fn step(&self, from: NodeId, bit: bool) -> Option<NodeId> {
        match self.node(from) {
            Node::Internal { left, right, .. } => Some(if bit { *right } else { *left }),
            Node::Leaf { .. } if from == self.root && !bit => Some(from),
            Node::Leaf { .. } => None,
        }
    }

    /// Derives the code of every leaf from its root-to-leaf path.
    ///
    /// Walks in preorder with an explicit stack, so skewed trees cannot
    /// exhaust the call stack.
    pub fn code_table(&self) -> CodeTable {
        let mut codes = BTreeMap::new();
        let mut stack = vec![(self.root, Vec::new())];

        while let Some((id, path)) = stack.pop() {
            match self.node(id) {
                Node::Leaf { symbol, .. } => {
                    let bits = if path.is_empty() { vec![false] } else { path };
                    codes.insert(*symbol, Code(bits));
                }
                Node::Internal { left, right, .. } => {
                    let mut right_path = path.clone();
                    right_path.push(true);
                    let mut left_path = path;
                    left_path.push(false);
                    // left is popped first
                    stack.push((*right, right_path));
                    stack.push((*left, left_path));
                }
            }
        }

        CodeTable { codes }
    }
}

/// The bit string assigned to one symbol.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Code(Vec<bool>);

impl Code {
    pub fn bits(&self) -> &[bool] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn is_prefix_of(&self, other: &Code) -> bool {
        other.0.starts_with(&self.0)
    }
}

impl fmt::Display for Code {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for &bit in &self.0 {
            f.write_str(if bit { "1" } else { "0" })?;
        }
        Ok(())
    }
}

/// Symbol to code mapping, iterated in ascending symbol order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CodeTable {
    codes: BTreeMap<u8, Code>,
}

impl CodeTable {
    /// Codes for `table`; empty when the table is.
    pub fn from_frequencies(table: &FrequencyTable) -> Self {
        HuffmanTree::build(table)
            .map(|tree| tree.code_table())
            .unwrap_or_default()
    }

    pub fn get(&self, symbol: u8) -> Option<&Code> {
        self.codes.get(&symbol)
    }

    pub fn len(&self) -> usize {
        self.codes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.codes.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (u8, &Code)> + '_ {
        self.codes.iter().map(|(&symbol, code)| (symbol, code))
    }

    pub fn max_len(&self) -> usize {
        self.codes.values().map(Code::len).max().unwrap_or(0)
    }

    /// Length in bits of the payload these codes produce for `table`.
    pub fn encoded_bits(&self, table: &FrequencyTable) -> u64 {
        table
            .iter()
            .filter_map(|(symbol, count)| self.get(symbol).map(|c| count * c.len() as u64))
            .sum()
    }

    pub fn is_prefix_free(&self) -> bool {
        let codes: Vec<&Code> = self.codes.values().collect();
        codes.iter().enumerate().all(|(i, a)| {
            codes
                .iter()
                .enumerate()
                .all(|(j, b)| i == j || !a.is_prefix_of(b))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn codes_for(data: &[u8]) -> CodeTable {
        CodeTable::from_frequencies(&FrequencyTable::from_bytes(data))
    }

    /// Recursive preorder, kept only to check the stack-based walk.
    fn recursive_codes(tree: &HuffmanTree, id: NodeId, path: Vec<bool>, out: &mut Vec<(u8, Vec<bool>)>) {
        match tree.node(id) {
            Node::Leaf { symbol, .. } => out.push((*symbol, path)),
            Node::Internal { left, right, .. } => {
                let mut l = path.clone();
                l.push(false);
                recursive_codes(tree, *left, l, out);
                let mut r = path;
                r.push(true);
                recursive_codes(tree, *right, r, out);
            }
        }
    }

    #[test]
    fn empty_table_has_no_tree() {
        assert!(HuffmanTree::build(&FrequencyTable::default()).is_none());
        assert!(codes_for(b"").is_empty());
    }

    #[test]
    fn single_symbol_gets_one_bit_code() {
        let table = FrequencyTable::from_bytes(b"zzzz");
        let tree = HuffmanTree::build(&table).unwrap();
        assert!(tree.is_single_leaf());
        assert_eq!(tree.node_count(), 1);

        let codes = tree.code_table();
        assert_eq!(codes.get(b'z').unwrap().to_string(), "0");
        assert_eq!(tree.step(tree.root(), false), Some(tree.root()));
        assert_eq!(tree.step(tree.root(), true), None);
    }

    #[test]
    fn aaabbc_codes() {
        let codes = codes_for(b"aaabbc");
        // c(1) and b(2) merge first, then a(3) is extracted before the merged node(3)
        assert_eq!(codes.get(b'a').unwrap().to_string(), "0");
        assert_eq!(codes.get(b'c').unwrap().to_string(), "10");
        assert_eq!(codes.get(b'b').unwrap().to_string(), "11");
        assert_eq!(codes.max_len(), 2);
        assert_eq!(codes.encoded_bits(&FrequencyTable::from_bytes(b"aaabbc")), 9);
    }

    #[test]
    fn root_weight_is_input_length() {
        let data = b"the quick brown fox jumps over the lazy dog";
        let tree = HuffmanTree::build(&FrequencyTable::from_bytes(data)).unwrap();
        assert_eq!(tree.node(tree.root()).weight(), data.len() as u64);
        assert_eq!(tree.node(tree.root()).symbol(), None);
    }

    #[test]
    fn codes_are_prefix_free() {
        let codes = codes_for(b"this is an example for huffman encoding");
        assert!(codes.is_prefix_free());
        for byte in b"this is an example for huffman encoding" {
            assert!(codes.get(*byte).is_some(), "missing code for {byte}");
        }
    }

    #[test]
    fn stack_walk_matches_recursive_preorder() {
        let data: Vec<u8> = (0u32..2000).map(|i| ((i * i + 7 * i) % 97) as u8).collect();
        let tree = HuffmanTree::build(&FrequencyTable::from_bytes(&data)).unwrap();

        let mut expected = Vec::new();
        recursive_codes(&tree, tree.root(), Vec::new(), &mut expected);
        expected.sort_by_key(|(s, _)| *s);

        let got: Vec<(u8, Vec<bool>)> = tree
            .code_table()
            .iter()
            .map(|(s, c)| (s, c.bits().to_vec()))
            .collect();
        assert_eq!(got, expected);
    }

    #[test]
    fn skewed_weights_build_deep_tree() {
        // Fibonacci weights give the most unbalanced shape possible
        let mut fib = vec![1u64, 1];
        while fib.len() < 40 {
            let n = fib[fib.len() - 1] + fib[fib.len() - 2];
            fib.push(n);
        }
        let table = FrequencyTable::from_pairs(fib.iter().enumerate().map(|(i, &f)| (i as u8, f))).unwrap();
        let codes = CodeTable::from_frequencies(&table);
        assert_eq!(codes.len(), 40);
        assert_eq!(codes.max_len(), 39);
        assert!(codes.is_prefix_free());
    }

    #[test]
    fn build_is_deterministic() {
        let table = FrequencyTable::from_bytes(b"abcdefgh abcd ab a");
        assert_eq!(HuffmanTree::build(&table), HuffmanTree::build(&table));
    }
}
