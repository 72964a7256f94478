//! Define the struct of garbled circuit.

use circuit::WireIndex;
use crypto_core::{Block, Ciphertext};
use serde::{Deserialize, Serialize};

use super::errors::GeneratorError;
use super::labels::LabelTable;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct WireLabel {
    /// wire id
    pub id: usize,
    ///  wire label
    pub label: Block,
}

/// A garbled wire. Gates carry their shuffled rows and the indices of their
/// input wires, in declared order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum GarbledWire {
    Input,
    Gate {
        table: Vec<Ciphertext>,
        inputs: Vec<usize>,
    },
}

/// garbled tables (independent of the inputs) sent to the evaluator,
/// one entry per wire in index order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GarbledCircuit {
    pub wires: Vec<GarbledWire>,
}

impl GarbledCircuit {
    pub fn new(wires: Vec<GarbledWire>) -> Self {
        Self { wires }
    }

    pub fn len(&self) -> usize {
        self.wires.len()
    }

    pub fn is_empty(&self) -> bool {
        self.wires.is_empty()
    }

    pub fn ngates(&self) -> usize {
        self.wires
            .iter()
            .filter(|w| matches!(w, GarbledWire::Gate { .. }))
            .count()
    }

    /// Total number of encrypted rows.
    pub fn nrows(&self) -> usize {
        self.wires
            .iter()
            .map(|w| match w {
                GarbledWire::Input => 0,
                GarbledWire::Gate { table, .. } => table.len(),
            })
            .sum()
    }
}

/// Everything produced by garbling a circuit. Only `gc` leaves the generator.
#[derive(Debug, Clone)]
pub struct Garbling {
    pub gc: GarbledCircuit,
    pub labels: LabelTable,
    pub wire_index: WireIndex,
}

impl Garbling {
    /// The label of wire `id` carrying `value`.
    pub fn encode(&self, id: usize, value: bool) -> Result<WireLabel, GeneratorError> {
        let label = self
            .labels
            .label(id, value)
            .ok_or(GeneratorError::UninitializedLabel(id))?;
        Ok(WireLabel { id, label })
    }

    /// Both labels of wire `id`.
    pub fn label_pair(&self, id: usize) -> Result<[Block; 2], GeneratorError> {
        self.labels
            .get(id)
            .ok_or(GeneratorError::UninitializedLabel(id))
    }

    /// Map output labels back to their plaintext bits.
    pub fn decode(&self, outputs: &[WireLabel]) -> Result<Vec<bool>, GeneratorError> {
        outputs
            .iter()
            .map(|wl| {
                self.labels
                    .decode(wl.id, &wl.label)
                    .ok_or(GeneratorError::UnknownOutputLabel(wl.id))
            })
            .collect()
    }
}
