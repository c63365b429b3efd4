//! Container format
//!
//! ```text
//! offset 0  magic         3 bytes  "HUF"
//! offset 3  mode          1 byte   '1' verbose tree, '2' compact tree
//! offset 4  message_size  4 bytes  original length, big-endian
//! offset 8  tree          serialized tree (absent for empty input)
//!           payload       packed codes, zero-padded to a byte
//! ```

use std::fmt;
use std::io::{Read, Write};

use serde::{Deserialize, Serialize};

use crate::bitio::{BitSink, BitSource};
use crate::error::{HuffError, Result};
use crate::tree::Tree;
use crate::tree_codec;

pub const MAGIC: [u8; 3] = *b"HUF";
pub const HEADER_LEN: usize = 8;

/// Tree serialization variant recorded in the header.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Mode {
    /// Two bytes per node: a child flag and a value.
    #[default]
    Verbose,
    /// One flag bit per node, leaves followed by their 8 value bits.
    Compact,
}

impl Mode {
    pub fn as_byte(self) -> u8 {
        match self {
            Mode::Verbose => b'1',
            Mode::Compact => b'2',
        }
    }

    pub fn from_byte(byte: u8) -> Result<Self> {
        match byte {
            b'1' => Ok(Mode::Verbose),
            b'2' => Ok(Mode::Compact),
            other => Err(HuffError::Format(format!(
                "unknown mode byte 0x{other:02X}"
            ))),
        }
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Mode::Verbose => f.write_str("verbose"),
            Mode::Compact => f.write_str("compact"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Header {
    pub mode: Mode,
    pub message_size: u32,
}

impl Header {
    pub fn to_bytes(self) -> [u8; HEADER_LEN] {
        let mut bytes = [0u8; HEADER_LEN];
        bytes[..3].copy_from_slice(&MAGIC);
        bytes[3] = self.mode.as_byte();
        bytes[4..].copy_from_slice(&self.message_size.to_be_bytes());
        bytes
    }

    /// Parses a header, checking the magic before anything else.
    pub fn from_bytes(bytes: &[u8; HEADER_LEN]) -> Result<Self> {
        if bytes[..3] != MAGIC {
            return Err(HuffError::Format("bad magic".into()));
        }
        let mode = Mode::from_byte(bytes[3])?;
        let message_size = u32::from_be_bytes([bytes[4], bytes[5], bytes[6], bytes[7]]);
        Ok(Self { mode, message_size })
    }

    pub fn write<W: Write>(self, sink: &mut BitSink<W>) -> Result<()> {
        sink.write_bytes(&self.to_bytes())
    }

    pub fn read<R: Read>(source: &mut BitSource<R>) -> Result<Self> {
        let mut bytes = [0u8; HEADER_LEN];
        source.read_bytes(&mut bytes)?;
        Self::from_bytes(&bytes)
    }
}

/// Reads the header and the tree section of a container, leaving `source`
/// positioned at the first payload byte.
pub fn read_head<R: Read>(source: &mut BitSource<R>) -> Result<(Header, Tree)> {
    let header = Header::read(source)?;
    let tree = if header.message_size == 0 {
        Tree::default()
    } else {
        tree_codec::read_tree(header.mode, source)?
    };
    Ok((header, tree))
}

/// Reconstructs the tree stored in a container without decoding its payload.
pub fn read_tree<R: Read>(input: R) -> Result<(Header, Tree)> {
    read_head(&mut BitSource::new(input))
}
