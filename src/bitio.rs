//! Bit stream I/O
//!
//! Single bits are packed into bytes most-significant-bit first on the way out
//! and unpacked in the same order on the way in. Both ends count the bits they
//! have moved so callers can report section sizes.

use std::io::{Read, Write};

use bitstream_io::{BigEndian, BitRead, BitReader, BitWrite, BitWriter};

use crate::error::{HuffError, Result};

/// Write half of the bit cursor.
pub struct BitSink<W: Write> {
    writer: BitWriter<W, BigEndian>,
    bits_written: u64,
}

impl<W: Write> BitSink<W> {
    pub fn new(writer: W) -> Self {
        Self {
            writer: BitWriter::endian(writer, BigEndian),
            bits_written: 0,
        }
    }

    pub fn write_bit(&mut self, bit: bool) -> Result<()> {
        self.writer.write_bit(bit)?;
        self.bits_written += 1;
        Ok(())
    }

    /// Writes all eight bits of `value`, starting from the MSB.
    pub fn write_byte(&mut self, value: u8) -> Result<()> {
        self.writer.write(8, value)?;
        self.bits_written += 8;
        Ok(())
    }

    pub fn write_bytes(&mut self, bytes: &[u8]) -> Result<()> {
        self.writer.write_bytes(bytes)?;
        self.bits_written += 8 * bytes.len() as u64;
        Ok(())
    }

    /// Zero-pads a partially filled byte and returns the number of padding
    /// bits. A sink already on a byte boundary is left untouched.
    pub fn align(&mut self) -> Result<u32> {
        let pad = self.pending_padding();
        if pad > 0 {
            self.writer.byte_align()?;
            self.bits_written += u64::from(pad);
        }
        Ok(pad)
    }

    pub fn is_aligned(&self) -> bool {
        self.writer.byte_aligned()
    }

    /// Total bits emitted so far, padding included.
    pub fn bits_written(&self) -> u64 {
        self.bits_written
    }

    /// Pads the last byte, flushes and hands back the underlying writer.
    pub fn finish(mut self) -> Result<W> {
        self.align()?;
        let mut inner = self.writer.into_writer();
        inner.flush()?;
        Ok(inner)
    }

    fn pending_padding(&self) -> u32 {
        ((8 - self.bits_written % 8) % 8) as u32
    }
}

/// Read half of the bit cursor.
pub struct BitSource<R: Read> {
    reader: BitReader<R, BigEndian>,
    bits_read: u64,
}

impl<R: Read> BitSource<R> {
    pub fn new(reader: R) -> Self {
        Self {
            reader: BitReader::endian(reader, BigEndian),
            bits_read: 0,
        }
    }

    /// Reads one bit. Running out of input is reported as
    /// [`HuffError::Truncated`].
    pub fn read_bit(&mut self) -> Result<bool> {
        let bit = self.reader.read_bit().map_err(HuffError::from_read)?;
        self.bits_read += 1;
        Ok(bit)
    }

    pub fn read_byte(&mut self) -> Result<u8> {
        let value = self.reader.read::<u8>(8).map_err(HuffError::from_read)?;
        self.bits_read += 8;
        Ok(value)
    }

    /// Fills `buf` completely. A short read surfaces as an I/O error, which is
    /// what a damaged fixed-size header should produce.
    pub fn read_bytes(&mut self, buf: &mut [u8]) -> Result<()> {
        self.reader.read_bytes(buf)?;
        self.bits_read += 8 * buf.len() as u64;
        Ok(())
    }

    /// Drops the unread remainder of the current byte.
    pub fn align(&mut self) {
        let skipped = (8 - self.bits_read % 8) % 8;
        if skipped > 0 {
            self.reader.byte_align();
            self.bits_read += skipped;
        }
    }

    pub fn bits_read(&self) -> u64 {
        self.bits_read
    }
}
