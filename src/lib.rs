//! huffpack: byte-oriented Huffman compression.
//!
//! The pipeline, in order:
//! - count byte frequencies into a node arena
//! - merge the two lightest parentless nodes until one root remains
//! - write the container header, then the tree in the chosen variant
//! - re-read the input and emit every byte's root-to-leaf code
//!
//! Decompression reads the header, rebuilds the tree and walks it once per
//! original byte.

pub mod arena;
pub mod bitio;
pub mod config;
pub mod container;
pub mod error;
pub mod export;
pub mod message;
pub mod tree;
pub mod tree_codec;

use std::io::{BufReader, BufWriter, Cursor, Read, Seek, SeekFrom, Write};

use tracing::{field, info, info_span};

use crate::bitio::{BitSink, BitSource};
use crate::config::HuffConfig;
pub use crate::container::{Header, Mode};
pub use crate::error::{HuffError, Result};
pub use crate::tree::Tree;

/// Outcome of a successful compression.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct CompressionReport {
    pub mode: Mode,
    pub original_size: u64,
    pub compressed_size: u64,
    pub tree_bits: u64,
    pub payload_bits: u64,
    pub leaf_count: usize,
    pub node_count: usize,
    pub ratio: f64,
    pub entropy_bits: f64,
}

/// Outcome of a successful decompression.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct DecompressionReport {
    pub mode: Mode,
    pub message_size: u64,
    pub compressed_size: u64,
}

/// The compression engine. Holds configuration only; every call builds its
/// own tree and bit cursor.
#[derive(Debug, Clone, Default)]
pub struct Compressor {
    config: HuffConfig,
}

impl Compressor {
    /// Create a new compressor with the given configuration
    ///
    /// A zero `buffer_size` is raised to 1; an empty read buffer would look
    /// like end of input.
    pub fn new(mut config: HuffConfig) -> Self {
        config.buffer_size = config.buffer_size.max(1);
        Self { config }
    }

    /// The configuration in effect
    pub fn config(&self) -> &HuffConfig {
        &self.config
    }

    /// Compresses `input` into `output`.
    ///
    /// The input is read twice: once to count, once to encode after seeking
    /// back to where it started.
    pub fn compress<R, W>(&self, mut input: R, output: W) -> Result<CompressionReport>
    where
        R: Read + Seek,
        W: Write,
    {
        let mode = self.config.mode;
        let span = info_span!("compress", %mode);
        let _enter = span.enter();

        let start = input.stream_position()?;
        let (tree, original_size) =
            Tree::from_reader(BufReader::with_capacity(self.config.buffer_size, &mut input))?;
        let limit = self.config.max_input_size.min(u64::from(u32::MAX));
        if original_size > limit {
            return Err(HuffError::InputTooLarge {
                size: original_size,
                limit,
            });
        }

        let mut sink = BitSink::new(BufWriter::with_capacity(self.config.buffer_size, output));
        Header {
            mode,
            message_size: original_size as u32,
        }
        .write(&mut sink)?;
        let tree_bits = tree_codec::write_tree(&tree, mode, &mut sink)?;

        input.seek(SeekFrom::Start(start))?;
        let payload_bits = message::encode(
            &tree,
            BufReader::with_capacity(self.config.buffer_size, &mut input),
            original_size,
            &mut sink,
        )?;
        let compressed_size = sink.bits_written() / 8;
        sink.finish()?;

        let report = CompressionReport {
            mode,
            original_size,
            compressed_size,
            tree_bits,
            payload_bits,
            leaf_count: tree.leaf_count(),
            node_count: tree.node_count(),
            ratio: if original_size == 0 {
                1.0
            } else {
                compressed_size as f64 / original_size as f64
            },
            entropy_bits: entropy_bits(&tree),
        };
        info!(
            original = report.original_size,
            compressed = report.compressed_size,
            "compressed"
        );
        Ok(report)
    }

    /// Decompresses a container from `input` into `output`. Nothing is
    /// written unless the header is valid.
    pub fn decompress<R, W>(&self, input: R, output: W) -> Result<DecompressionReport>
    where
        R: Read,
        W: Write,
    {
        let span = info_span!("decompress", mode = field::Empty);
        let _enter = span.enter();

        let mut source = BitSource::new(BufReader::with_capacity(self.config.buffer_size, input));
        let (header, tree) = container::read_head(&mut source)?;
        span.record("mode", field::display(header.mode));

        let mut output = BufWriter::with_capacity(self.config.buffer_size, output);
        message::decode(&tree, &mut source, header.message_size, &mut output)?;
        output.flush()?;

        let report = DecompressionReport {
            mode: header.mode,
            message_size: u64::from(header.message_size),
            compressed_size: source.bits_read().div_ceil(8),
        };
        info!(
            compressed = report.compressed_size,
            original = report.message_size,
            "decompressed"
        );
        Ok(report)
    }

    /// Counts `input` and builds its tree without writing anything.
    pub fn analyze<R: Read>(&self, input: R) -> Result<Tree> {
        let (tree, _) = Tree::from_reader(BufReader::with_capacity(self.config.buffer_size, input))?;
        Ok(tree)
    }
}

/// Compresses `input` into `output` with the given tree variant.
pub fn compress<R, W>(input: R, output: W, mode: Mode) -> Result<CompressionReport>
where
    R: Read + Seek,
    W: Write,
{
    Compressor::new(HuffConfig {
        mode,
        ..HuffConfig::default()
    })
    .compress(input, output)
}

/// Decompresses a container from `input` into `output`.
pub fn decompress<R: Read, W: Write>(input: R, output: W) -> Result<DecompressionReport> {
    Compressor::default().decompress(input, output)
}

/// Compress an in-memory buffer into a new container
pub fn compress_bytes(data: &[u8], mode: Mode) -> Result<Vec<u8>> {
    let mut out = Vec::new();
    compress(Cursor::new(data), &mut out, mode)?;
    Ok(out)
}

/// Decompress an in-memory container
pub fn decompress_bytes(data: &[u8]) -> Result<Vec<u8>> {
    let mut out = Vec::new();
    decompress(data, &mut out)?;
    Ok(out)
}

/// Shannon entropy of the leaf weights in bits per byte.
fn entropy_bits(tree: &Tree) -> f64 {
    let total = tree.total_weight();
    if total == 0 {
        return 0.0;
    }
    let len = total as f64;
    let mut entropy = 0.0;
    for leaf in tree.preorder().filter(|n| n.is_leaf()) {
        let p = leaf.weight as f64 / len;
        entropy -= p * p.log2();
    }
    entropy
}
