//! Topological indexing of circuit wires.

use std::collections::{HashMap, HashSet};

use crate::errors::CircuitError;
use crate::gate::Gate;

#[derive(Clone, Copy, PartialEq, Eq)]
enum Mark {
    Visiting,
    Done,
}

/// A bijection between wire names and `0..len`, such that every gate's
/// inputs have a smaller index than the gate's output wire.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct WireIndex {
    wires: Vec<String>,
    index: HashMap<String, usize>,
}

impl WireIndex {
    /// Depth-first post-order from each output in declaration order, then
    /// any declared input no output depends on.
    pub fn build(
        inputs: &[String],
        outputs: &[String],
        gates: &HashMap<String, Gate>,
    ) -> Result<Self, CircuitError> {
        let mut marks: HashMap<&str, Mark> = HashMap::with_capacity(gates.len() + inputs.len());
        let mut order: Vec<&str> = Vec::with_capacity(gates.len() + inputs.len());
        let mut stack: Vec<(&str, usize)> = Vec::new();
        let declared: HashSet<&str> = inputs.iter().map(String::as_str).collect();

        for output in outputs.iter() {
            if marks.contains_key(output.as_str()) {
                continue;
            }
            marks.insert(output, Mark::Visiting);
            stack.push((output, 0));

            while let Some(&(wire, next)) = stack.last() {
                let deps: &[String] = match gates.get(wire) {
                    Some(gate) => &gate.inputs,
                    None if declared.contains(wire) => &[],
                    None => {
                        return Err(match stack.len() {
                            1 => CircuitError::UndeclaredOutput(wire.to_string()),
                            n => CircuitError::DanglingWire {
                                wire: wire.to_string(),
                                referenced_by: stack[n - 2].0.to_string(),
                            },
                        });
                    }
                };

                if next < deps.len() {
                    if let Some(top) = stack.last_mut() {
                        top.1 += 1;
                    }
                    let dep = deps[next].as_str();
                    match marks.get(dep) {
                        Some(Mark::Visiting) => return Err(CircuitError::Cycle(dep.to_string())),
                        Some(Mark::Done) => {}
                        None => {
                            marks.insert(dep, Mark::Visiting);
                            stack.push((dep, 0));
                        }
                    }
                } else {
                    marks.insert(wire, Mark::Done);
                    order.push(wire);
                    stack.pop();
                }
            }
        }

        for input in inputs.iter() {
            if !marks.contains_key(input.as_str()) {
                log::trace!("input wire {} is not used by any output", input);
                marks.insert(input, Mark::Done);
                order.push(input);
            }
        }

        let wires: Vec<String> = order.into_iter().map(String::from).collect();
        let index = wires
            .iter()
            .enumerate()
            .map(|(i, w)| (w.clone(), i))
            .collect();
        Ok(Self { wires, index })
    }

    pub fn len(&self) -> usize {
        self.wires.len()
    }

    pub fn is_empty(&self) -> bool {
        self.wires.is_empty()
    }

    pub fn index_of(&self, wire: &str) -> Option<usize> {
        self.index.get(wire).copied()
    }

    pub fn name_of(&self, id: usize) -> Option<&str> {
        self.wires.get(id).map(String::as_str)
    }

    /// Wire names in index order.
    pub fn wires(&self) -> &[String] {
        &self.wires
    }

    pub fn as_map(&self) -> &HashMap<String, usize> {
        &self.index
    }
}
