//! Node arena and frequency table
//!
//! Every node of one compress/decompress call lives in a single `Vec`; the
//! parent and child links are indices into it. Leaves double as the frequency
//! table entries while the input is being counted.

use crate::error::{HuffError, Result};

/// Index of a node inside its [`Arena`].
pub type NodeId = usize;

/// Value stored in internal nodes, which carry no byte of their own.
pub const INTERNAL_PLACEHOLDER: u8 = b'&';

/// Upper bound on the node count of a proper tree over a byte alphabet.
pub const MAX_NODES: usize = 2 * 256 - 1;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Node {
    /// Creation sequence number, equal to the node's arena index.
    pub id: NodeId,
    pub value: u8,
    pub weight: u64,
    pub left: Option<NodeId>,
    pub right: Option<NodeId>,
    pub parent: Option<NodeId>,
}

impl Node {
    /// True for a node without children
    pub fn is_leaf(&self) -> bool {
        self.left.is_none()
    }

    /// Both children of an internal node, `None` for a leaf.
    pub fn children(&self) -> Option<(NodeId, NodeId)> {
        match (self.left, self.right) {
            (Some(left), Some(right)) => Some((left, right)),
            _ => None,
        }
    }
}

/// Which child slot of a parent a node occupies.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Side {
    Left,
    Right,
}

#[derive(Debug, Clone)]
pub struct Arena {
    nodes: Vec<Node>,
    leaf_by_value: [Option<NodeId>; 256],
}

impl Default for Arena {
    fn default() -> Self {
        Self::new()
    }
}

impl Arena {
    /// Create an empty arena
    pub fn new() -> Self {
        Self {
            nodes: Vec::new(),
            leaf_by_value: [None; 256],
        }
    }

    /// Records one occurrence of `byte`, creating its leaf with weight 1 on
    /// first sight.
    pub fn count(&mut self, byte: u8) -> Result<NodeId> {
        match self.find_leaf(byte) {
            Some(id) => {
                self.nodes[id].weight += 1;
                Ok(id)
            }
            None => self.push_leaf(byte, 1),
        }
    }

    /// Counts every byte of `chunk`.
    pub fn count_all(&mut self, chunk: &[u8]) -> Result<()> {
        for &byte in chunk {
            self.count(byte)?;
        }
        Ok(())
    }

    /// The first leaf created for `byte`, if any
    pub fn find_leaf(&self, byte: u8) -> Option<NodeId> {
        self.leaf_by_value[usize::from(byte)]
    }

    /// Append a leaf holding `value` with the given weight
    pub fn push_leaf(&mut self, value: u8, weight: u64) -> Result<NodeId> {
        let id = self.push(Node {
            id: self.nodes.len(),
            value,
            weight,
            left: None,
            right: None,
            parent: None,
        })?;
        let slot = &mut self.leaf_by_value[usize::from(value)];
        if slot.is_none() {
            *slot = Some(id);
        }
        Ok(id)
    }

    /// Creates a childless node that [`Arena::attach`] will later turn into an
    /// internal node.
    pub fn push_internal(&mut self) -> Result<NodeId> {
        self.push(Node {
            id: self.nodes.len(),
            value: INTERNAL_PLACEHOLDER,
            weight: 0,
            left: None,
            right: None,
            parent: None,
        })
    }

    /// Creates the parent of `left` and `right`, weighing their sum.
    pub fn merge(&mut self, left: NodeId, right: NodeId) -> Result<NodeId> {
        let id = self.push_internal()?;
        self.attach(id, Side::Left, left);
        self.attach(id, Side::Right, right);
        self.nodes[id].weight = self.nodes[left].weight + self.nodes[right].weight;
        Ok(id)
    }

    /// Link `child` into the `side` slot of `parent` and set its parent link
    pub fn attach(&mut self, parent: NodeId, side: Side, child: NodeId) {
        match side {
            Side::Left => self.nodes[parent].left = Some(child),
            Side::Right => self.nodes[parent].right = Some(child),
        }
        self.nodes[child].parent = Some(parent);
    }

    /// Node at `id`
    pub fn get(&self, id: NodeId) -> &Node {
        &self.nodes[id]
    }

    /// All nodes in creation order
    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    /// Leaves in creation order
    pub fn leaves(&self) -> impl Iterator<Item = &Node> {
        self.nodes.iter().filter(|n| n.is_leaf())
    }

    /// Number of nodes ever created
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    fn push(&mut self, node: Node) -> Result<NodeId> {
        self.nodes
            .try_reserve(1)
            .map_err(|_| HuffError::AllocationFailure)?;
        let id = node.id;
        self.nodes.push(node);
        Ok(id)
    }
}
