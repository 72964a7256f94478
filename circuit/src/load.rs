//! Load circuits from their JSON description:
//!
//! ```json
//! {
//!   "inputs": ["x_0", "x_1", "y_0"],
//!   "outputs": ["out"],
//!   "gates": {
//!     "a": ["and", "x_0", "y_0"],
//!     "n": ["not", "x_1"],
//!     "out": ["xor", "a", "n"]
//!   }
//! }
//! ```
//!
//! Each gate entry maps the driven wire to its kind followed by its inputs.

use std::collections::{BTreeMap, HashMap};
use std::fs;
use std::path::Path;

use anyhow::{anyhow, Context};
use serde::{Deserialize, Serialize};

use crate::errors::CircuitLoadError;
use crate::gate::{Circuit, Gate, GateKind};

#[derive(Debug, Serialize, Deserialize)]
struct CircuitFile {
    inputs: Vec<String>,
    outputs: Vec<String>,
    #[serde(default)]
    gates: BTreeMap<String, Vec<String>>,
}

impl Circuit {
    /// Load and parse a JSON circuit file.
    pub fn load<P: AsRef<Path>>(filename: P) -> Result<Self, CircuitLoadError> {
        let filename = filename.as_ref();
        let json = fs::read_to_string(filename)
            .with_context(|| format!("Failed to read circuit from {}", filename.display()))?;
        let circ = Self::from_json(&json)?;
        log::info!(
            "loaded circuit {}: {} inputs, {} outputs, {} gates",
            filename.display(),
            circ.inputs().len(),
            circ.outputs().len(),
            circ.ngates()
        );
        Ok(circ)
    }

    /// Parse a circuit from its JSON description.
    pub fn from_json(json: &str) -> Result<Self, CircuitLoadError> {
        let file: CircuitFile =
            serde_json::from_str(json).context("Failed to parse circuit description")?;

        let mut gates = HashMap::with_capacity(file.gates.len());
        for (wire, def) in file.gates.into_iter() {
            let (kind, inputs) = def
                .split_first()
                .ok_or_else(|| anyhow!("Empty gate definition for wire {}", wire))?;
            let kind: GateKind = kind
                .parse()
                .with_context(|| format!("Invalid gate on wire {}", wire))?;
            gates.insert(wire, Gate::new(kind, inputs.iter().cloned()));
        }

        Ok(Circuit::new(file.inputs, file.outputs, gates)?)
    }

    /// Serialize the circuit back into its JSON description.
    pub fn to_json(&self) -> Result<String, CircuitLoadError> {
        let file = CircuitFile {
            inputs: self.inputs().to_vec(),
            outputs: self.outputs().to_vec(),
            gates: self
                .gates()
                .iter()
                .map(|(wire, gate)| {
                    let mut def = Vec::with_capacity(gate.inputs.len() + 1);
                    def.push(gate.kind.name().to_string());
                    def.extend(gate.inputs.iter().cloned());
                    (wire.clone(), def)
                })
                .collect(),
        };
        Ok(serde_json::to_string_pretty(&file).context("Failed to serialize circuit")?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::CircuitError;

    fn eval_u64(circ: &Circuit, inputs: &[(&str, u64, usize)]) -> u64 {
        let mut values = HashMap::new();
        for (prefix, value, width) in inputs.iter() {
            for i in 0..*width {
                values.insert(format!("{}_{}", prefix, i), (value >> i) & 1 == 1);
            }
        }
        circ.eval(&values)
            .unwrap()
            .iter()
            .enumerate()
            .fold(0, |acc, (i, b)| acc | ((*b as u64) << i))
    }

    #[test]
    fn test_load_example() {
        let circ = Circuit::load("circuit_files/example.json").unwrap();
        assert_eq!(circ.inputs().len(), 3);
        assert_eq!(circ.outputs(), &["out".to_string()][..]);
        assert_eq!(circ.ngates(), 3);
        assert_eq!(eval_u64(&circ, &[("x", 0b01, 2), ("y", 1, 1)]), 0);
        assert_eq!(eval_u64(&circ, &[("x", 0b00, 2), ("y", 1, 1)]), 1);
    }

    #[test]
    fn test_load_and32() {
        let circ = Circuit::load("circuit_files/and32.json").unwrap();
        assert_eq!(circ.inputs().len(), 64);
        assert_eq!(circ.outputs().len(), 32);
        assert_eq!(eval_u64(&circ, &[("x", 9001, 32), ("y", 1337, 32)]), 9001 & 1337);
    }

    #[test]
    fn test_load_adder32() {
        let circ = Circuit::load("circuit_files/adder32.json").unwrap();
        assert_eq!(circ.inputs().len(), 64);
        assert_eq!(circ.outputs().len(), 33);
        for (x, y) in [(0u64, 0u64), (1, 1), (9001, 1337), (0xffff_ffff, 1), (0xdead_beef, 0xcafe_babe)] {
            assert_eq!(eval_u64(&circ, &[("x", x, 32), ("y", y, 32)]), x + y);
        }
    }

    #[test]
    fn test_json_roundtrip() {
        let circ = Circuit::load("circuit_files/example.json").unwrap();
        let again = Circuit::from_json(&circ.to_json().unwrap()).unwrap();
        assert_eq!(again.inputs(), circ.inputs());
        assert_eq!(again.outputs(), circ.outputs());
        assert_eq!(again.gates(), circ.gates());
        assert_eq!(again.wire_index(), circ.wire_index());
    }

    #[test]
    fn test_parse_errors() {
        let err = Circuit::from_json(r#"{"inputs": ["a"], "outputs": ["o"], "gates": {"o": ["mux", "a"]}}"#)
            .unwrap_err();
        assert!(matches!(err, CircuitLoadError::ParsingError(_)));

        let err = Circuit::from_json(r#"{"inputs": ["a"], "outputs": ["o"], "gates": {"o": []}}"#)
            .unwrap_err();
        assert!(matches!(err, CircuitLoadError::ParsingError(_)));

        let err = Circuit::from_json("not json").unwrap_err();
        assert!(matches!(err, CircuitLoadError::ParsingError(_)));

        let err = Circuit::from_json(
            r#"{"inputs": ["a"], "outputs": ["o"], "gates": {"o": ["and", "a", "o"]}}"#,
        )
        .unwrap_err();
        assert!(matches!(
            err,
            CircuitLoadError::InvalidStructure(CircuitError::Cycle(_))
        ));

        assert!(Circuit::load("circuit_files/missing.json").is_err());
    }

    #[test]
    fn test_case_insensitive_kinds() {
        let circ = Circuit::from_json(
            r#"{"inputs": ["a"], "outputs": ["o", "one"], "gates": {"o": ["NOT", "a"], "one": ["Const_1"]}}"#,
        )
        .unwrap();
        let mut inputs = HashMap::new();
        inputs.insert("a".to_string(), true);
        assert_eq!(circ.eval(&inputs).unwrap(), vec![false, true]);
    }
}
