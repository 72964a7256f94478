use circuit::{Circuit, GateKind};
use crypto_core::{aead, Block, Ciphertext};
use rand::seq::SliceRandom;
use rand::{CryptoRng, Rng};

use super::errors::GeneratorError;
use super::gc::{GarbledCircuit, GarbledWire, Garbling};
use super::labels::{combine_keys, LabelTable, MAX_LABEL_BITS};

pub trait GCGenerator {
    /// Generate a garbled circuit
    fn garble<R: Rng + CryptoRng>(
        &self,
        rng: &mut R,
        circ: &Circuit,
    ) -> Result<Garbling, GeneratorError>;
}

/// Garbles every gate as a full shuffled table of AEAD-encrypted output labels.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct YaoGenerator {
    label_bits: usize,
}

impl Default for YaoGenerator {
    fn default() -> Self {
        Self {
            label_bits: MAX_LABEL_BITS,
        }
    }
}

impl YaoGenerator {
    pub fn new(label_bits: usize) -> Result<Self, GeneratorError> {
        if label_bits == 0 || label_bits > MAX_LABEL_BITS {
            return Err(GeneratorError::InvalidLabelBits(label_bits));
        }
        Ok(Self { label_bits })
    }

    pub fn label_bits(&self) -> usize {
        self.label_bits
    }

    /// Encrypt the output label of every row of `kind`'s truth table under
    /// the key of that row's input labels, then shuffle the rows.
    pub fn garble_gate<R: Rng + CryptoRng>(
        &self,
        rng: &mut R,
        kind: GateKind,
        output: [Block; 2],
        inputs: &[[Block; 2]],
    ) -> Result<Vec<Ciphertext>, GeneratorError> {
        let arity = inputs.len();
        let truth_table = kind.truth_table();
        debug_assert_eq!(truth_table.len(), 1 << arity);

        let mut table = Vec::with_capacity(1 << arity);
        let mut row_labels = Vec::with_capacity(arity);
        for (row, value) in truth_table.iter().enumerate() {
            row_labels.clear();
            for (j, pair) in inputs.iter().enumerate() {
                // The first input is the most significant bit of the row.
                let bit = (row >> (arity - 1 - j)) & 1;
                row_labels.push(pair[bit]);
            }
            let key = combine_keys(&row_labels);
            table.push(aead::encrypt(rng, &key, output[*value as usize])?);
        }

        table.shuffle(rng);
        Ok(table)
    }
}

impl GCGenerator for YaoGenerator {
    fn garble<R: Rng + CryptoRng>(
        &self,
        rng: &mut R,
        circ: &Circuit,
    ) -> Result<Garbling, GeneratorError> {
        let wire_index = circ.wire_index();
        let mut labels = LabelTable::new(wire_index.len(), self.label_bits)?;
        let mut wires = Vec::with_capacity(wire_index.len());

        for (id, name) in wire_index.wires().iter().enumerate() {
            let gate = match circ.gate(name) {
                None => {
                    labels.get_or_create(id, rng);
                    wires.push(GarbledWire::Input);
                    continue;
                }
                Some(gate) => gate,
            };

            let output = labels.get_or_create(id, rng);
            let mut input_ids = Vec::with_capacity(gate.inputs.len());
            let mut input_pairs = Vec::with_capacity(gate.inputs.len());
            for input in gate.inputs.iter() {
                let in_id = wire_index
                    .index_of(input)
                    .ok_or(GeneratorError::UninitializedLabel(id))?;
                input_pairs.push(
                    labels
                        .get(in_id)
                        .ok_or(GeneratorError::UninitializedLabel(in_id))?,
                );
                input_ids.push(in_id);
            }

            let table = self.garble_gate(rng, gate.kind, output, &input_pairs)?;
            log::debug!(
                "garbled wire {} ({}) over {:?}: {} rows",
                id,
                gate.kind,
                input_ids,
                table.len()
            );
            wires.push(GarbledWire::Gate {
                table,
                inputs: input_ids,
            });
        }

        let gc = GarbledCircuit::new(wires);
        log::info!(
            "garbled circuit with {} wires, {} gates, {} rows",
            gc.len(),
            gc.ngates(),
            gc.nrows()
        );

        Ok(Garbling {
            gc,
            labels,
            wire_index: wire_index.clone(),
        })
    }
}
