//! Tree serialization
//!
//! Both variants walk the tree in pre-order. The verbose form spends a
//! flag byte and a value byte on every node; the compact form spends one flag
//! bit per node plus eight value bits per leaf and pads the section to a byte
//! boundary so the payload starts aligned.

use std::io::{Read, Write};

use tracing::debug;

use crate::arena::{Arena, NodeId, Side, MAX_NODES};
use crate::bitio::{BitSink, BitSource};
use crate::container::Mode;
use crate::error::{HuffError, Result};
use crate::tree::Tree;

const LEAF: u8 = 0;
const INTERNAL: u8 = 1;

/// One pre-order record as read back from a container.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Record {
    Leaf(u8),
    Internal,
}

/// Serializes `tree` in the given variant and returns the number of bits the
/// section occupies, padding included. An empty tree writes nothing.
pub fn write_tree<W: Write>(tree: &Tree, mode: Mode, sink: &mut BitSink<W>) -> Result<u64> {
    let start = sink.bits_written();
    match mode {
        Mode::Verbose => {
            for node in tree.preorder() {
                let flag = if node.is_leaf() { LEAF } else { INTERNAL };
                sink.write_bytes(&[flag, node.value])?;
            }
        }
        Mode::Compact => {
            for node in tree.preorder() {
                if node.is_leaf() {
                    sink.write_bit(false)?;
                    sink.write_byte(node.value)?;
                } else {
                    sink.write_bit(true)?;
                }
            }
            sink.align()?;
        }
    }
    let bits = sink.bits_written() - start;
    debug!(%mode, bits, "wrote tree");
    Ok(bits)
}

/// Rebuilds a tree from its serialized form. The first node read is the root.
pub fn read_tree<R: Read>(mode: Mode, source: &mut BitSource<R>) -> Result<Tree> {
    let tree = match mode {
        Mode::Verbose => rebuild(|| {
            let flag = source.read_byte()?;
            let value = source.read_byte()?;
            match flag {
                LEAF => Ok(Record::Leaf(value)),
                INTERNAL => Ok(Record::Internal),
                other => Err(HuffError::Format(format!("invalid node flag {other}"))),
            }
        })?,
        Mode::Compact => {
            let tree = rebuild(|| {
                if source.read_bit()? {
                    Ok(Record::Internal)
                } else {
                    Ok(Record::Leaf(source.read_byte()?))
                }
            })?;
            source.align();
            tree
        }
    };
    debug!(%mode, nodes = tree.node_count(), "read tree");
    Ok(tree)
}

/// Pre-order reconstruction with an explicit stack of open child slots.
fn rebuild<F>(mut next: F) -> Result<Tree>
where
    F: FnMut() -> Result<Record>,
{
    let mut arena = Arena::new();
    let mut open: Vec<(NodeId, Side)> = Vec::new();

    let root = place(&mut arena, next()?, &mut open)?;
    while let Some((parent, side)) = open.pop() {
        if arena.len() >= MAX_NODES {
            return Err(HuffError::Format(format!(
                "tree has more than {MAX_NODES} nodes"
            )));
        }
        let child = place(&mut arena, next()?, &mut open)?;
        arena.attach(parent, side, child);
    }
    Ok(Tree::from_parts(arena, Some(root)))
}

fn place(arena: &mut Arena, record: Record, open: &mut Vec<(NodeId, Side)>) -> Result<NodeId> {
    match record {
        Record::Leaf(value) => arena.push_leaf(value, 0),
        Record::Internal => {
            let id = arena.push_internal()?;
            open.push((id, Side::Right));
            open.push((id, Side::Left));
            Ok(id)
        }
    }
}
