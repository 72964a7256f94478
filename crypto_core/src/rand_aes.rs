//! AES-128 counter-mode random number generator.

use crate::Block;
use cipher::{generic_array::GenericArray, BlockEncrypt, KeyInit};
use aes::Aes128;
use rand::{CryptoRng, Error, Rng, RngCore, SeedableRng};
use rand_core::block::{BlockRng, BlockRngCore};

/// Random number generator built from AES-128 in counter mode.
#[derive(Clone)]
pub struct AesRng(BlockRng<AesRngCore>);

impl RngCore for AesRng {
    #[inline]
    fn next_u32(&mut self) -> u32 {
        self.0.next_u32()
    }

    #[inline]
    fn next_u64(&mut self) -> u64 {
        self.0.next_u64()
    }

    #[inline]
    fn fill_bytes(&mut self, dest: &mut [u8]) {
        self.0.fill_bytes(dest)
    }

    #[inline]
    fn try_fill_bytes(&mut self, dest: &mut [u8]) -> Result<(), Error> {
        self.0.try_fill_bytes(dest)
    }
}

impl SeedableRng for AesRng {
    type Seed = Block;

    #[inline]
    fn from_seed(seed: Self::Seed) -> Self {
        AesRng(BlockRng::<AesRngCore>::from_seed(seed))
    }
}

impl CryptoRng for AesRng {}

impl AesRng {
    /// Create a new generator seeded from the thread-local OS-seeded generator.
    #[inline]
    pub fn new() -> Self {
        let seed = rand::random::<Block>();
        AesRng::from_seed(seed)
    }

    /// Create a new generator seeded from this one.
    #[inline]
    pub fn fork(&mut self) -> Self {
        let seed = self.gen::<Block>();
        AesRng::from_seed(seed)
    }

    /// Generate `num` random blocks.
    pub fn gen_blocks(&mut self, num: usize) -> Vec<Block> {
        (0..num).map(|_| self.gen::<Block>()).collect()
    }
}

impl Default for AesRng {
    #[inline]
    fn default() -> Self {
        Self::new()
    }
}

/// The core of `AesRng`, used with `BlockRng`.
#[derive(Clone)]
pub struct AesRngCore {
    aes: Aes128,
    counter: u128,
}

impl BlockRngCore for AesRngCore {
    type Item = u32;
    type Results = [u32; 16];

    // Encrypt four consecutive counter values.
    #[inline]
    fn generate(&mut self, results: &mut Self::Results) {
        for chunk in results.chunks_mut(4) {
            let mut blk = GenericArray::from(self.counter.to_le_bytes());
            self.counter = self.counter.wrapping_add(1);
            self.aes.encrypt_block(&mut blk);

            for (word, bytes) in chunk.iter_mut().zip(blk.chunks(4)) {
                let mut buf = [0u8; 4];
                buf.copy_from_slice(bytes);
                *word = u32::from_le_bytes(buf);
            }
        }
    }
}

impl SeedableRng for AesRngCore {
    type Seed = Block;

    #[inline]
    fn from_seed(seed: Self::Seed) -> Self {
        let key: [u8; 16] = seed.into();
        let aes = Aes128::new(&GenericArray::from(key));
        AesRngCore { aes, counter: 0 }
    }
}

impl CryptoRng for AesRngCore {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generate() {
        let mut rng = AesRng::new();
        let a = rng.gen::<[Block; 8]>();
        let b = rng.gen::<[Block; 8]>();
        assert_ne!(a, b);
    }

    #[test]
    fn test_seeded_is_deterministic() {
        let seed = rand::random::<Block>();
        let mut rng1 = AesRng::from_seed(seed);
        let mut rng2 = AesRng::from_seed(seed);
        assert_eq!(rng1.gen_blocks(10), rng2.gen_blocks(10));
    }

    #[test]
    fn test_mixed_word_sizes() {
        // Byte arrays are drawn one u32 at a time; reads must keep walking
        // through many generated blocks.
        let seed = rand::random::<Block>();
        let mut rng1 = AesRng::from_seed(seed);
        let mut rng2 = AesRng::from_seed(seed);
        for _ in 0..100 {
            assert_eq!(rng1.gen::<[u8; 12]>(), rng2.gen::<[u8; 12]>());
            assert_eq!(rng1.next_u32(), rng2.next_u32());
            assert_eq!(rng1.next_u64(), rng2.next_u64());
        }
        let mut buf = vec![0u8; 1000];
        rng1.fill_bytes(&mut buf);
        assert!(buf.iter().any(|b| *b != 0));
    }

    #[test]
    fn test_fork_diverges() {
        let mut rng = AesRng::new();
        let mut forked = rng.fork();
        assert_ne!(rng.gen::<Block>(), forked.gen::<Block>());
    }
}
