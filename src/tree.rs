//! Huffman tree construction
//!
//! A [`Tree`] is the per-operation context: the arena that owns every node
//! plus the index of the root, if any.

use std::io::BufRead;

use tracing::debug;

use crate::arena::{Arena, Node, NodeId};
use crate::error::Result;

#[derive(Debug, Clone, Default)]
pub struct Tree {
    arena: Arena,
    root: Option<NodeId>,
}

impl Tree {
    pub(crate) fn from_parts(arena: Arena, root: Option<NodeId>) -> Self {
        Self { arena, root }
    }

    /// Counts `data` and builds its tree.
    pub fn from_bytes(data: &[u8]) -> Result<Self> {
        let mut arena = Arena::new();
        arena.count_all(data)?;
        Self::build(arena)
    }

    /// Counts everything `reader` yields and builds the tree. Returns the tree
    /// together with the number of bytes consumed.
    pub fn from_reader<R: BufRead>(mut reader: R) -> Result<(Self, u64)> {
        let mut arena = Arena::new();
        let mut total = 0u64;
        loop {
            let chunk = reader.fill_buf()?;
            if chunk.is_empty() {
                break;
            }
            arena.count_all(chunk)?;
            let len = chunk.len();
            total += len as u64;
            reader.consume(len);
        }
        Ok((Self::build(arena)?, total))
    }

    /// Merges the two lightest parentless nodes until one remains.
    ///
    /// Ties go to the node created first. An arena without nodes yields a
    /// tree without a root; a single leaf becomes the root on its own.
    pub fn build(mut arena: Arena) -> Result<Self> {
        let root = loop {
            let Some(a) = lightest_orphan(&arena, None) else {
                break None;
            };
            let Some(b) = lightest_orphan(&arena, Some(a)) else {
                break Some(a);
            };
            arena.merge(a, b)?;
        };

        let tree = Self { arena, root };
        debug!(
            leaves = tree.leaf_count(),
            nodes = tree.node_count(),
            "built huffman tree"
        );
        Ok(tree)
    }

    /// Index of the root, `None` for an empty input
    pub fn root(&self) -> Option<NodeId> {
        self.root
    }

    /// Node at `id`
    pub fn node(&self, id: NodeId) -> &Node {
        self.arena.get(id)
    }

    /// The arena owning every node of this tree
    pub fn arena(&self) -> &Arena {
        &self.arena
    }

    /// True when there is no root
    pub fn is_empty(&self) -> bool {
        self.root.is_none()
    }

    /// Sum of leaf weights below the root; the input length for a built tree.
    pub fn total_weight(&self) -> u64 {
        self.root.map_or(0, |root| self.node(root).weight)
    }

    /// Nodes reachable from the root, visiting a node before its left subtree
    /// and the left subtree before the right one.
    pub fn preorder(&self) -> Preorder<'_> {
        Preorder {
            tree: self,
            stack: self.root.into_iter().collect(),
        }
    }

    /// Number of nodes reachable from the root
    pub fn node_count(&self) -> usize {
        self.preorder().count()
    }

    /// Number of reachable leaves
    pub fn leaf_count(&self) -> usize {
        self.preorder().filter(|n| n.is_leaf()).count()
    }

    /// Number of reachable internal nodes
    pub fn internal_count(&self) -> usize {
        self.preorder().filter(|n| !n.is_leaf()).count()
    }
}

pub struct Preorder<'a> {
    tree: &'a Tree,
    stack: Vec<NodeId>,
}

impl<'a> Iterator for Preorder<'a> {
    type Item = &'a Node;

    fn next(&mut self) -> Option<Self::Item> {
        let tree = self.tree;
        let node = tree.node(self.stack.pop()?);
        if let Some((left, right)) = node.children() {
            self.stack.push(right);
            self.stack.push(left);
        }
        Some(node)
    }
}

fn lightest_orphan(arena: &Arena, exclude: Option<NodeId>) -> Option<NodeId> {
    let mut best: Option<&Node> = None;
    for node in arena.nodes() {
        if node.parent.is_some() || Some(node.id) == exclude {
            continue;
        }
        match best {
            Some(current) if current.weight <= node.weight => {}
            _ => best = Some(node),
        }
    }
    best.map(|n| n.id)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeSet;

    fn assert_valid(tree: &Tree, data: &[u8]) {
        let root = tree.root().expect("non-empty input has a root");
        assert_eq!(tree.node(root).parent, None);
        for node in tree.preorder() {
            if node.id != root {
                let parent = tree.node(node.parent.expect("non-root has a parent"));
                let (left, right) = parent.children().unwrap();
                assert!(left == node.id || right == node.id);
            }
            if let Some((left, right)) = node.children() {
                let sum = tree.node(left).weight + tree.node(right).weight;
                assert_eq!(node.weight, sum, "internal weight is the sum of its children");
            } else {
                assert!(node.right.is_none(), "no node has exactly one child");
            }
        }
        let leaves: Vec<u8> = tree.preorder().filter(|n| n.is_leaf()).map(|n| n.value).collect();
        let distinct: BTreeSet<u8> = data.iter().copied().collect();
        assert_eq!(leaves.len(), distinct.len(), "no duplicate leaves");
        assert_eq!(leaves.into_iter().collect::<BTreeSet<_>>(), distinct);
        assert_eq!(tree.total_weight(), data.len() as u64);
    }

    #[test]
    fn test_three_symbol_tree_shape() {
        let tree = Tree::from_bytes(b"AAABBC").unwrap();
        assert_eq!(tree.node_count(), 5);
        assert_eq!(tree.leaf_count(), 3);
        assert_eq!(tree.internal_count(), 2);

        // C(1) and B(2) merge first, then A(3) wins the tie against the new node.
        let root = tree.node(tree.root().unwrap());
        let (left, right) = root.children().unwrap();
        assert_eq!(tree.node(left).value, b'A');
        let (rl, rr) = tree.node(right).children().unwrap();
        assert_eq!(tree.node(rl).value, b'C');
        assert_eq!(tree.node(rr).value, b'B');
        assert_valid(&tree, b"AAABBC");
    }

    #[test]
    fn test_single_symbol_is_its_own_root() {
        let tree = Tree::from_bytes(b"ZZZ").unwrap();
        let root = tree.node(tree.root().unwrap());
        assert!(root.is_leaf());
        assert_eq!(root.value, b'Z');
        assert_eq!(root.weight, 3);
        assert_eq!(tree.internal_count(), 0);
    }

    #[test]
    fn test_empty_input_has_no_root() {
        let tree = Tree::from_bytes(b"").unwrap();
        assert!(tree.is_empty());
        assert_eq!(tree.node_count(), 0);
        assert_eq!(tree.total_weight(), 0);
    }

    #[test]
    fn test_ties_prefer_earlier_nodes() {
        // Four equal weights: (a,b) then (c,d) then the two parents.
        let tree = Tree::from_bytes(b"abcd").unwrap();
        let root = tree.node(tree.root().unwrap());
        let (left, right) = root.children().unwrap();
        let pair = |id| {
            let (l, r) = tree.node(id).children().unwrap();
            (tree.node(l).value, tree.node(r).value)
        };
        assert_eq!(pair(left), (b'a', b'b'));
        assert_eq!(pair(right), (b'c', b'd'));
    }

    #[test]
    fn test_full_alphabet_is_valid() {
        let data: Vec<u8> = (0..=255u8).flat_map(|b| std::iter::repeat(b).take(b as usize % 7 + 1)).collect();
        let tree = Tree::from_bytes(&data).unwrap();
        assert_eq!(tree.leaf_count(), 256);
        assert_eq!(tree.internal_count(), 255);
        assert_valid(&tree, &data);
    }

    #[test]
    fn test_from_reader_counts_bytes() {
        let data = b"hello world hello world".repeat(40);
        let (tree, total) = Tree::from_reader(std::io::BufReader::with_capacity(16, data.as_slice())).unwrap();
        assert_eq!(total, data.len() as u64);
        assert_valid(&tree, &data);
    }

    #[test]
    fn test_skewed_weights_build_a_deep_chain() {
        // Fibonacci-like counts force a maximally unbalanced tree.
        let mut data = Vec::new();
        let (mut a, mut b) = (1usize, 1usize);
        for symbol in 0..20u8 {
            data.extend(std::iter::repeat(symbol).take(a));
            (a, b) = (b, a + b);
        }
        let tree = Tree::from_bytes(&data).unwrap();
        assert_valid(&tree, &data);
    }
}
