//! Message encoding and decoding
//!
//! A byte's code is the path from the root to its leaf, `1` for a left turn
//! and `0` for a right one. Codes are found by walking parent links up from
//! the leaf and reversing the recorded turns.

use std::io::{BufRead, Read, Write};

use tracing::debug;

use crate::arena::NodeId;
use crate::bitio::{BitSink, BitSource};
use crate::error::{HuffError, Result};
use crate::tree::Tree;

/// Root-to-leaf codes for every byte present in a tree.
#[derive(Debug, Clone)]
pub struct CodeBook {
    codes: Vec<Option<Vec<bool>>>,
}

impl CodeBook {
    pub fn new(tree: &Tree) -> Self {
        let codes = (0..=255u8)
            .map(|byte| {
                let leaf = tree.arena().find_leaf(byte)?;
                // A leaf that never got attached would be a second root.
                if Some(leaf) != tree.root() && tree.node(leaf).parent.is_none() {
                    return None;
                }
                Some(path_to_root(tree, leaf))
            })
            .collect();
        Self { codes }
    }

    /// The code for `byte`. A tree consisting of a single leaf gives that
    /// leaf an empty code.
    pub fn code(&self, byte: u8) -> Option<&[bool]> {
        self.codes[usize::from(byte)].as_deref()
    }

    pub fn iter(&self) -> impl Iterator<Item = (u8, &[bool])> {
        self.codes
            .iter()
            .enumerate()
            .filter_map(|(byte, code)| code.as_deref().map(|c| (byte as u8, c)))
    }
}

fn path_to_root(tree: &Tree, leaf: NodeId) -> Vec<bool> {
    let mut turns = Vec::new();
    let mut current = leaf;
    while let Some(parent) = tree.node(current).parent {
        turns.push(tree.node(parent).left == Some(current));
        current = parent;
    }
    turns.reverse();
    turns
}

/// Encodes every byte of `input` and pads the final byte. `expected` is the
/// length recorded in the header; the input must still have exactly that many
/// bytes. Returns the payload size in bits, padding included.
pub fn encode<R: BufRead, W: Write>(
    tree: &Tree,
    mut input: R,
    expected: u64,
    sink: &mut BitSink<W>,
) -> Result<u64> {
    let book = CodeBook::new(tree);
    let start = sink.bits_written();
    let mut seen = 0u64;
    loop {
        let chunk = input.fill_buf()?;
        if chunk.is_empty() {
            break;
        }
        for &byte in chunk {
            let code = book.code(byte).ok_or(HuffError::MissingSymbol(byte))?;
            for &bit in code {
                sink.write_bit(bit)?;
            }
        }
        let len = chunk.len();
        seen += len as u64;
        input.consume(len);
    }
    if seen != expected {
        return Err(HuffError::SizeMismatch {
            expected,
            actual: seen,
        });
    }
    sink.align()?;
    let bits = sink.bits_written() - start;
    debug!(bytes = seen, bits, "encoded message");
    Ok(bits)
}

/// Decodes exactly `message_size` bytes into `output`.
///
/// Each byte starts at the root and follows one bit per level down to a leaf.
/// A root that is itself a leaf matches immediately without consuming input.
pub fn decode<R: Read, W: Write>(
    tree: &Tree,
    source: &mut BitSource<R>,
    message_size: u32,
    output: &mut W,
) -> Result<()> {
    if message_size == 0 {
        return Ok(());
    }
    let root = tree
        .root()
        .ok_or_else(|| HuffError::Format("missing tree for non-empty message".into()))?;

    for _ in 0..message_size {
        let mut node = tree.node(root);
        while let Some((left, right)) = node.children() {
            node = if source.read_bit()? {
                tree.node(left)
            } else {
                tree.node(right)
            };
        }
        output.write_all(&[node.value])?;
    }
    debug!(bytes = message_size, bits = source.bits_read(), "decoded message");
    Ok(())
}
