pub mod local_channel;
pub mod net_channel;

pub use local_channel::*;
pub use net_channel::*;

use std::io::{Error, ErrorKind, Read, Result, Write};

use num_bigint::BigUint;

use crate::aead::{Ciphertext, CIPHERTEXT_SIZE};
use crate::Block;

/// Upper bound on the byte length of a big integer read from a channel.
pub const MAX_BIGUINT_BYTES: usize = 1 << 16;

/// A trait for I/O channel.
pub trait AbstractChannel {
    /// Write bytes slice to the channel.
    fn write_bytes(&mut self, bytes: &[u8]) -> Result<()>;
    /// Read bytes slice from the channel.
    fn read_bytes(&mut self, bytes: &mut [u8]) -> Result<()>;
    /// Flush the channel.
    fn flush(&mut self) -> Result<()>;

    /// Write a `bool` to the channel.
    #[inline(always)]
    fn write_bool(&mut self, b: bool) -> Result<()> {
        self.write_bytes(&[b as u8])
    }

    /// Read a 'bool' from the channel.
    #[inline(always)]
    fn read_bool(&mut self) -> Result<bool> {
        let mut data = [0u8; 1];
        self.read_bytes(&mut data)?;
        Ok(data[0] != 0)
    }

    /// Write a `Block` to the channel.
    #[inline(always)]
    fn write_block(&mut self, blk: &Block) -> Result<()> {
        self.write_bytes(blk.as_ref())
    }

    /// Read a `Block` from the channel.
    #[inline(always)]
    fn read_block(&mut self) -> Result<Block> {
        let mut blk = Block::default();
        self.read_bytes(blk.as_mut())?;
        Ok(blk)
    }

    /// Write a `usize` as 8 little-endian bytes.
    #[inline(always)]
    fn write_usize(&mut self, x: usize) -> Result<()> {
        self.write_bytes(&(x as u64).to_le_bytes())
    }

    /// Read a `usize` written by `write_usize`.
    #[inline(always)]
    fn read_usize(&mut self) -> Result<usize> {
        let mut data = [0u8; 8];
        self.read_bytes(&mut data)?;
        usize::try_from(u64::from_le_bytes(data))
            .map_err(|e| Error::new(ErrorKind::InvalidData, e))
    }

    /// Write a big integer as its byte length followed by its big-endian magnitude.
    fn write_biguint(&mut self, x: &BigUint) -> Result<()> {
        let bytes = x.to_bytes_be();
        self.write_usize(bytes.len())?;
        self.write_bytes(&bytes)
    }

    /// Read a big integer written by `write_biguint`.
    fn read_biguint(&mut self) -> Result<BigUint> {
        let len = self.read_usize()?;
        if len > MAX_BIGUINT_BYTES {
            return Err(Error::new(
                ErrorKind::InvalidData,
                format!("big integer of {} bytes exceeds limit", len),
            ));
        }
        let mut bytes = vec![0u8; len];
        self.read_bytes(&mut bytes)?;
        Ok(BigUint::from_bytes_be(&bytes))
    }

    /// Write a ciphertext in its fixed-width encoding.
    #[inline(always)]
    fn write_ciphertext(&mut self, ct: &Ciphertext) -> Result<()> {
        self.write_bytes(&ct.to_bytes())
    }

    /// Read a ciphertext written by `write_ciphertext`.
    #[inline(always)]
    fn read_ciphertext(&mut self) -> Result<Ciphertext> {
        let mut bytes = [0u8; CIPHERTEXT_SIZE];
        self.read_bytes(&mut bytes)?;
        Ciphertext::from_bytes(&bytes).map_err(|e| Error::new(ErrorKind::InvalidData, e))
    }
}

/// A standard channel that implements `AbstractChannel`
pub struct StdChannel<R, W> {
    reader: R,
    writer: W,

    read_bytes: usize,
    write_bytes: usize,
}

impl<R: Read, W: Write> StdChannel<R, W> {
    /// New a `StdChannel`
    pub fn new(reader: R, writer: W) -> Self {
        Self {
            reader,
            writer,
            read_bytes: 0,
            write_bytes: 0,
        }
    }

    /// Return the number of bytes written so far.
    pub fn written_bytes(&self) -> usize {
        self.write_bytes
    }

    /// Return the number of bytes read so far.
    pub fn read_count(&self) -> usize {
        self.read_bytes
    }
}

impl<R: Read, W: Write> AbstractChannel for StdChannel<R, W> {
    #[inline(always)]
    fn write_bytes(&mut self, bytes: &[u8]) -> Result<()> {
        self.writer.write_all(bytes)?;
        self.write_bytes += bytes.len();
        Ok(())
    }

    #[inline(always)]
    fn read_bytes(&mut self, bytes: &mut [u8]) -> Result<()> {
        self.reader.read_exact(bytes)?;
        self.read_bytes += bytes.len();
        Ok(())
    }

    #[inline(always)]
    fn flush(&mut self) -> Result<()> {
        self.writer.flush()
    }
}
