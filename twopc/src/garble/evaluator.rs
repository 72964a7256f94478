use std::collections::HashMap;

use crypto_core::{aead, Block, Ciphertext};

use super::errors::EvaluatorError;
use super::gc::{GarbledCircuit, GarbledWire, WireLabel};
use super::labels::combine_keys;

pub trait GCEvaluator {
    /// Evaluate a garbled circuit, returning the labels of `output_ids`.
    fn eval(
        &self,
        gc: &GarbledCircuit,
        input_labels: &[WireLabel],
        output_ids: &[usize],
    ) -> Result<Vec<WireLabel>, EvaluatorError>;
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct YaoEvaluator;

impl YaoEvaluator {
    pub fn new() -> Self {
        Self
    }

    /// Try every row under the key of `inputs`. The first row that
    /// authenticates yields the output label.
    #[inline]
    pub fn eval_gate(table: &[Ciphertext], inputs: &[Block]) -> Option<Block> {
        let key = combine_keys(inputs);
        table.iter().find_map(|row| aead::decrypt(&key, row).ok())
    }
}

impl GCEvaluator for YaoEvaluator {
    fn eval(
        &self,
        gc: &GarbledCircuit,
        input_labels: &[WireLabel],
        output_ids: &[usize],
    ) -> Result<Vec<WireLabel>, EvaluatorError> {
        let supplied: HashMap<usize, Block> =
            input_labels.iter().map(|wl| (wl.id, wl.label)).collect();
        let mut resolved: Vec<Block> = Vec::with_capacity(gc.len());

        for (id, wire) in gc.wires.iter().enumerate() {
            let label = match wire {
                GarbledWire::Input => *supplied
                    .get(&id)
                    .ok_or(EvaluatorError::MissingInputLabel(id))?,
                GarbledWire::Gate { table, inputs } => {
                    let labels = inputs
                        .iter()
                        .map(|i| {
                            resolved
                                .get(*i)
                                .copied()
                                .ok_or(EvaluatorError::UninitializedLabel(*i))
                        })
                        .collect::<Result<Vec<Block>, _>>()?;
                    let label = Self::eval_gate(table, &labels)
                        .ok_or(EvaluatorError::TableExhausted { wire: id })?;
                    log::debug!("evaluated wire {} over {:?}", id, inputs);
                    label
                }
            };
            resolved.push(label);
        }

        output_ids
            .iter()
            .map(|id| {
                resolved
                    .get(*id)
                    .map(|label| WireLabel {
                        id: *id,
                        label: *label,
                    })
                    .ok_or(EvaluatorError::UnknownOutputWire(*id))
            })
            .collect()
    }
}
