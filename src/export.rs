//! Graphviz export of a Huffman tree, for inspection only.

use std::fmt;

use crate::arena::Node;
use crate::tree::Tree;

/// Renders a tree as a DOT `digraph`.
///
/// Internal nodes are drawn as points, leaves as boxes labelled with the byte
/// and its weight, and the root as a double circle. Trees rebuilt from a
/// container carry no weights, so their leaves show the byte only.
pub struct Dot<'a>(pub &'a Tree);

impl fmt::Display for Dot<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let tree = self.0;
        writeln!(f, "digraph G {{")?;
        let Some(root) = tree.root() else {
            return writeln!(f, "}}");
        };
        writeln!(f, "Node [label=\"\" shape=point]")?;
        let weighted = tree.total_weight() > 0;
        for node in tree.preorder() {
            match node.children() {
                Some((left, right)) => {
                    writeln!(f, "Node_{} -> Node_{}", node.id, left)?;
                    writeln!(f, "Node_{} -> Node_{}", node.id, right)?;
                }
                None => writeln!(
                    f,
                    "Node_{} [label=\"{}\" shape=box]",
                    node.id,
                    LeafLabel { node, weighted }
                )?,
            }
        }
        writeln!(f, "Node_{root} [shape=doublecircle label=Root]")?;
        writeln!(f, "}}")
    }
}

struct LeafLabel<'a> {
    node: &'a Node,
    weighted: bool,
}

impl fmt::Display for LeafLabel<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let node = self.node;
        // Quotes and backslashes would need escaping inside a DOT string.
        if node.value.is_ascii_graphic() && node.value != b'"' && node.value != b'\\' {
            write!(f, "{} ${:02X}", node.value as char, node.value)?;
        } else {
            write!(f, "{:02X}", node.value)?;
        }
        if self.weighted {
            write!(f, "\\n{}", node.weight)?;
        }
        Ok(())
    }
}
