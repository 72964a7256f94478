//! Wire labels and the derivation of row keys from them.

use crypto_core::aead::KEY_SIZE;
use crypto_core::Block;
use rand::{CryptoRng, Rng};
use sha3::{Digest, Sha3_256};

use super::errors::GeneratorError;

/// Largest supported label size.
pub const MAX_LABEL_BITS: usize = 128;

/// The pair of labels of every wire seen so far in a garbling session,
/// addressed by wire index. Index `0` of a pair encodes `false`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LabelTable {
    label_bits: usize,
    pairs: Vec<Option<[Block; 2]>>,
}

impl LabelTable {
    pub fn new(nwires: usize, label_bits: usize) -> Result<Self, GeneratorError> {
        if label_bits == 0 || label_bits > MAX_LABEL_BITS {
            return Err(GeneratorError::InvalidLabelBits(label_bits));
        }
        Ok(Self {
            label_bits,
            pairs: vec![None; nwires],
        })
    }

    pub fn label_bits(&self) -> usize {
        self.label_bits
    }

    /// Number of wire slots.
    pub fn len(&self) -> usize {
        self.pairs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }

    /// Return the label pair of `wire`, drawing two distinct random labels
    /// on first use.
    pub fn get_or_create<R: Rng + CryptoRng>(&mut self, wire: usize, rng: &mut R) -> [Block; 2] {
        if wire >= self.pairs.len() {
            self.pairs.resize(wire + 1, None);
        }
        if let Some(pair) = self.pairs[wire] {
            return pair;
        }

        let zero = rng.gen::<Block>().truncate(self.label_bits);
        let mut one = rng.gen::<Block>().truncate(self.label_bits);
        while one == zero {
            one = rng.gen::<Block>().truncate(self.label_bits);
        }
        let pair = [zero, one];
        self.pairs[wire] = Some(pair);
        pair
    }

    pub fn get(&self, wire: usize) -> Option<[Block; 2]> {
        self.pairs.get(wire).copied().flatten()
    }

    /// The label encoding `value` on `wire`.
    pub fn label(&self, wire: usize, value: bool) -> Option<Block> {
        self.get(wire).map(|pair| pair[value as usize])
    }

    /// The plaintext bit `label` stands for on `wire`, if it is one of its labels.
    pub fn decode(&self, wire: usize, label: &Block) -> Option<bool> {
        let pair = self.get(wire)?;
        if pair[0] == *label {
            Some(false)
        } else if pair[1] == *label {
            Some(true)
        } else {
            None
        }
    }
}

/// Derive a row key: SHA3-256 over the big-endian encoding of each label,
/// in the gate's input order.
pub fn combine_keys(labels: &[Block]) -> [u8; KEY_SIZE] {
    let mut hasher = Sha3_256::new();
    for label in labels.iter() {
        hasher.update(label.as_ref());
    }
    let mut key = [0u8; KEY_SIZE];
    key.copy_from_slice(&hasher.finalize());
    key
}

#[cfg(test)]
mod tests {
    use super::*;
    use crypto_core::AesRng;

    #[test]
    fn test_labels_cached() {
        let mut rng = AesRng::new();
        let mut table = LabelTable::new(4, 128).unwrap();
        assert_eq!(table.get(2), None);

        let pair = table.get_or_create(2, &mut rng);
        assert_ne!(pair[0], pair[1]);
        assert_eq!(table.get_or_create(2, &mut rng), pair);
        assert_eq!(table.label(2, true), Some(pair[1]));
        assert_eq!(table.decode(2, &pair[0]), Some(false));
        assert_eq!(table.decode(2, &pair[1]), Some(true));
        assert_eq!(table.decode(2, &rng.gen::<Block>()), None);

        table.get_or_create(10, &mut rng);
        assert_eq!(table.len(), 11);
    }

    #[test]
    fn test_label_bits() {
        let mut rng = AesRng::new();
        for bits in [1usize, 7, 64, 127] {
            let mut table = LabelTable::new(64, bits).unwrap();
            for wire in 0..64 {
                let pair = table.get_or_create(wire, &mut rng);
                assert_ne!(pair[0], pair[1]);
                assert!(u128::from(pair[0]) < 1u128 << bits);
                assert!(u128::from(pair[1]) < 1u128 << bits);
            }
        }
        assert_eq!(LabelTable::new(1, 0), Err(GeneratorError::InvalidLabelBits(0)));
        assert_eq!(LabelTable::new(1, 129), Err(GeneratorError::InvalidLabelBits(129)));
    }

    #[test]
    fn test_combine_keys() {
        let a = Block::from(1u128);
        let b = Block::from(2u128);
        assert_eq!(combine_keys(&[a, b]), combine_keys(&[a, b]));
        assert_ne!(combine_keys(&[a, b]), combine_keys(&[b, a]));
        assert_ne!(combine_keys(&[a]), combine_keys(&[a, b]));

        // SHA3-256 of the empty string.
        assert_eq!(
            hex::encode(combine_keys(&[])),
            "a7ffc6f8bf1ed76651c14756a061d662f580ff4de43b49fa82d80a4b80f8434a"
        );
    }
}
