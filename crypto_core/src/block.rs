//! Defines a block as a 128-bit value, stored as its big-endian byte encoding.

use rand::distributions::{Distribution, Standard};
use rand::Rng;
use serde::{Deserialize, Serialize};

/// Number of bytes in a block.
pub const BLOCK_SIZE: usize = 16;

/// A 128-bit chunk.
#[derive(Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Block(pub(crate) [u8; BLOCK_SIZE]);

impl Block {
    /// The least significant bit of the block.
    #[inline]
    pub fn lsb(&self) -> bool {
        self.0[BLOCK_SIZE - 1] & 1 == 1
    }

    /// Keep only the lowest `bits` bits of the block.
    #[inline]
    pub fn truncate(self, bits: usize) -> Self {
        if bits >= 128 {
            return self;
        }
        let mask = (1u128 << bits) - 1;
        Block::from(u128::from(self) & mask)
    }

    /// Try to build a block from a slice of exactly 16 bytes.
    #[inline]
    pub fn try_from_slice(bytes_slice: &[u8]) -> Option<Self> {
        if bytes_slice.len() != BLOCK_SIZE {
            return None;
        }
        let mut bytes = [0u8; BLOCK_SIZE];
        bytes.copy_from_slice(bytes_slice);
        Some(Block(bytes))
    }

    /// Build a block from a big-endian magnitude of at most 16 bytes.
    /// Shorter inputs are left padded with zeroes.
    pub fn from_be_slice(bytes_slice: &[u8]) -> Option<Self> {
        // Strip leading zeroes first so that a padded encoding is accepted.
        let start = bytes_slice
            .iter()
            .position(|b| *b != 0)
            .unwrap_or(bytes_slice.len());
        let bytes_slice = &bytes_slice[start..];
        if bytes_slice.len() > BLOCK_SIZE {
            return None;
        }
        let mut bytes = [0u8; BLOCK_SIZE];
        bytes[BLOCK_SIZE - bytes_slice.len()..].copy_from_slice(bytes_slice);
        Some(Block(bytes))
    }
}

impl AsRef<[u8]> for Block {
    #[inline]
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

impl AsMut<[u8]> for Block {
    #[inline]
    fn as_mut(&mut self) -> &mut [u8] {
        &mut self.0
    }
}

impl std::ops::BitXor for Block {
    type Output = Block;

    #[inline]
    fn bitxor(self, rhs: Self) -> Self::Output {
        Block::from(u128::from(self) ^ u128::from(rhs))
    }
}

impl std::ops::BitXorAssign for Block {
    #[inline]
    fn bitxor_assign(&mut self, rhs: Self) {
        *self = *self ^ rhs;
    }
}

impl std::fmt::Debug for Block {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        for byte in self.0.iter() {
            write!(f, "{:02X}", byte)?;
        }
        Ok(())
    }
}

impl std::fmt::Display for Block {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        std::fmt::Debug::fmt(self, f)
    }
}

impl Distribution<Block> for Standard {
    #[inline]
    fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> Block {
        Block::from(rng.gen::<u128>())
    }
}

impl From<Block> for u128 {
    #[inline]
    fn from(b: Block) -> u128 {
        u128::from_be_bytes(b.0)
    }
}

impl From<u128> for Block {
    #[inline]
    fn from(m: u128) -> Self {
        Block(m.to_be_bytes())
    }
}

impl From<Block> for [u8; BLOCK_SIZE] {
    #[inline]
    fn from(m: Block) -> [u8; BLOCK_SIZE] {
        m.0
    }
}

impl From<[u8; BLOCK_SIZE]> for Block {
    #[inline]
    fn from(m: [u8; BLOCK_SIZE]) -> Self {
        Block(m)
    }
}
