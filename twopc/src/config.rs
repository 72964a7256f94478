//! Parameters both parties must agree on before running the protocol.

use serde::{Deserialize, Serialize};

use crate::garble::MAX_LABEL_BITS;

/// Widest integer input a party can supply.
pub const MAX_INPUT_WIDTH: usize = 64;

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("label size must be between 1 and 128 bits, got {0}")]
    InvalidLabelBits(usize),

    #[error("input width must be between 1 and 64 bits, got {0}")]
    InvalidWidth(usize),

    #[error("{rsa_bits}-bit RSA modulus cannot carry {label_bits}-bit labels")]
    ModulusTooSmall { rsa_bits: usize, label_bits: usize },

    #[error("garbler and evaluator share the input prefix {0}")]
    SharedPrefix(String),

    #[error("input prefix must not be empty")]
    EmptyPrefix,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProtocolConfig {
    /// Size of a wire label in bits.
    pub label_bits: usize,
    /// Size of the RSA modulus used by the oblivious transfers.
    pub rsa_bits: usize,
    pub miller_rabin_rounds: usize,
    pub garbler_width: usize,
    pub evaluator_width: usize,
    /// Input wires `<garbler_prefix>_<i>` belong to the garbler.
    pub garbler_prefix: String,
    /// Input wires `<evaluator_prefix>_<i>` belong to the evaluator.
    pub evaluator_prefix: String,
}

impl Default for ProtocolConfig {
    fn default() -> Self {
        Self {
            label_bits: MAX_LABEL_BITS,
            rsa_bits: 2048,
            miller_rabin_rounds: crypto_core::prime::MILLER_RABIN_ROUNDS,
            garbler_width: 32,
            evaluator_width: 32,
            garbler_prefix: "x".to_string(),
            evaluator_prefix: "y".to_string(),
        }
    }
}

impl ProtocolConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.label_bits == 0 || self.label_bits > MAX_LABEL_BITS {
            return Err(ConfigError::InvalidLabelBits(self.label_bits));
        }
        for width in [self.garbler_width, self.evaluator_width] {
            if width == 0 || width > MAX_INPUT_WIDTH {
                return Err(ConfigError::InvalidWidth(width));
            }
        }
        // Every label must stay below N, whose top bit is set.
        if self.rsa_bits <= self.label_bits + 1 {
            return Err(ConfigError::ModulusTooSmall {
                rsa_bits: self.rsa_bits,
                label_bits: self.label_bits,
            });
        }
        if self.garbler_prefix.is_empty() || self.evaluator_prefix.is_empty() {
            return Err(ConfigError::EmptyPrefix);
        }
        if self.garbler_prefix == self.evaluator_prefix {
            return Err(ConfigError::SharedPrefix(self.garbler_prefix.clone()));
        }
        Ok(())
    }

    /// Input prefix and width of `party`.
    pub fn input_layout(&self, party: crate::Party) -> (&str, usize) {
        match party {
            crate::Party::Garbler => (&self.garbler_prefix, self.garbler_width),
            crate::Party::Evaluator => (&self.evaluator_prefix, self.evaluator_width),
        }
    }
}
