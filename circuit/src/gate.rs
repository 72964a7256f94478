//! Define the structure of gates and circuits.

use std::collections::{HashMap, HashSet};
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::errors::{CircuitError, CircuitEvalError};
use crate::topology::WireIndex;

/// Supported gate kinds.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GateKind {
    Not,
    And,
    Or,
    Xor,
    Nand,
    Nor,
    Xnor,
    /// `a AND NOT b`
    AndNot,
    /// `a OR NOT b`
    OrNot,
    Const0,
    Const1,
}

impl GateKind {
    pub const ALL: [GateKind; 11] = [
        GateKind::Not,
        GateKind::And,
        GateKind::Or,
        GateKind::Xor,
        GateKind::Nand,
        GateKind::Nor,
        GateKind::Xnor,
        GateKind::AndNot,
        GateKind::OrNot,
        GateKind::Const0,
        GateKind::Const1,
    ];

    /// Number of input wires.
    pub fn arity(&self) -> usize {
        match self {
            GateKind::Const0 | GateKind::Const1 => 0,
            GateKind::Not => 1,
            _ => 2,
        }
    }

    /// Output bit for every input combination. Row `r` holds the output for
    /// the inputs whose bits, first input most significant, spell `r`.
    pub fn truth_table(&self) -> &'static [bool] {
        match self {
            GateKind::And => &[false, false, false, true],
            GateKind::Or => &[false, true, true, true],
            GateKind::Nand => &[true, true, true, false],
            GateKind::Nor => &[true, false, false, false],
            GateKind::Xor => &[false, true, true, false],
            GateKind::Xnor => &[true, false, false, true],
            GateKind::AndNot => &[false, false, true, false],
            GateKind::OrNot => &[true, false, true, true],
            GateKind::Not => &[true, false],
            GateKind::Const0 => &[false],
            GateKind::Const1 => &[true],
        }
    }

    /// Evaluate the gate in plaintext.
    #[inline]
    pub fn eval(&self, inputs: &[bool]) -> bool {
        debug_assert_eq!(inputs.len(), self.arity());
        self.truth_table()[row_index(inputs)]
    }

    pub fn name(&self) -> &'static str {
        match self {
            GateKind::Not => "not",
            GateKind::And => "and",
            GateKind::Or => "or",
            GateKind::Xor => "xor",
            GateKind::Nand => "nand",
            GateKind::Nor => "nor",
            GateKind::Xnor => "xnor",
            GateKind::AndNot => "andnot",
            GateKind::OrNot => "ornot",
            GateKind::Const0 => "const0",
            GateKind::Const1 => "const1",
        }
    }
}

/// Row of the truth table selected by `bits`, first bit most significant.
#[inline]
pub fn row_index(bits: &[bool]) -> usize {
    bits.iter().fold(0, |acc, b| (acc << 1) | (*b as usize))
}

impl fmt::Display for GateKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for GateKind {
    type Err = CircuitError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let kind = match s.to_ascii_lowercase().as_str() {
            "not" => GateKind::Not,
            "and" => GateKind::And,
            "or" => GateKind::Or,
            "xor" => GateKind::Xor,
            "nand" => GateKind::Nand,
            "nor" => GateKind::Nor,
            "xnor" => GateKind::Xnor,
            "andnot" => GateKind::AndNot,
            "ornot" => GateKind::OrNot,
            "const0" | "const_0" => GateKind::Const0,
            "const1" | "const_1" => GateKind::Const1,
            _ => return Err(CircuitError::UnsupportedGate(s.to_string())),
        };
        Ok(kind)
    }
}

/// A gate driving one wire: its kind and its ordered input wires.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Gate {
    pub kind: GateKind,
    pub inputs: Vec<String>,
}

impl Gate {
    pub fn new<S: Into<String>>(kind: GateKind, inputs: impl IntoIterator<Item = S>) -> Self {
        Self {
            kind,
            inputs: inputs.into_iter().map(Into::into).collect(),
        }
    }
}

/// A boolean circuit: named wires, each either a declared input or driven
/// by exactly one gate, with a fixed topological index.
#[derive(Clone, Debug)]
pub struct Circuit {
    inputs: Vec<String>,
    outputs: Vec<String>,
    gates: HashMap<String, Gate>,
    wire_index: WireIndex,
}

impl Circuit {
    /// Validate the structure and index the wires.
    pub fn new(
        inputs: Vec<String>,
        outputs: Vec<String>,
        gates: HashMap<String, Gate>,
    ) -> Result<Self, CircuitError> {
        let mut declared = HashSet::with_capacity(inputs.len());
        for input in inputs.iter() {
            if !declared.insert(input.as_str()) {
                return Err(CircuitError::DuplicateWire(input.clone()));
            }
            if gates.contains_key(input) {
                return Err(CircuitError::InputHasGate(input.clone()));
            }
        }

        for (wire, gate) in gates.iter() {
            if gate.inputs.len() != gate.kind.arity() {
                return Err(CircuitError::ArityMismatch {
                    wire: wire.clone(),
                    kind: gate.kind,
                    expected: gate.kind.arity(),
                    found: gate.inputs.len(),
                });
            }
            for input in gate.inputs.iter() {
                if !declared.contains(input.as_str()) && !gates.contains_key(input) {
                    return Err(CircuitError::DanglingWire {
                        wire: input.clone(),
                        referenced_by: wire.clone(),
                    });
                }
            }
        }

        for output in outputs.iter() {
            if !declared.contains(output.as_str()) && !gates.contains_key(output) {
                return Err(CircuitError::UndeclaredOutput(output.clone()));
            }
        }

        let wire_index = WireIndex::build(&inputs, &outputs, &gates)?;
        log::debug!(
            "indexed circuit: {} inputs, {} outputs, {} gates, {} wires",
            inputs.len(),
            outputs.len(),
            gates.len(),
            wire_index.len()
        );

        Ok(Self {
            inputs,
            outputs,
            gates,
            wire_index,
        })
    }

    /// Declared input wires, in declaration order.
    pub fn inputs(&self) -> &[String] {
        &self.inputs
    }

    /// Declared output wires, in declaration order.
    pub fn outputs(&self) -> &[String] {
        &self.outputs
    }

    pub fn gate(&self, wire: &str) -> Option<&Gate> {
        self.gates.get(wire)
    }

    pub fn gates(&self) -> &HashMap<String, Gate> {
        &self.gates
    }

    pub fn is_input(&self, wire: &str) -> bool {
        self.inputs.iter().any(|w| w == wire)
    }

    pub fn ngates(&self) -> usize {
        self.gates.len()
    }

    /// Topological index of every wire reachable from the outputs, plus all
    /// declared inputs.
    pub fn wire_index(&self) -> &WireIndex {
        &self.wire_index
    }

    /// Evaluate the circuit in plaintext with the provided input values.
    /// Returns the output values in declaration order.
    pub fn eval(&self, inputs: &HashMap<String, bool>) -> Result<Vec<bool>, CircuitEvalError> {
        let mut wires: Vec<Option<bool>> = vec![None; self.wire_index.len()];

        for (id, wire) in self.wire_index.wires().iter().enumerate() {
            let value = match self.gates.get(wire) {
                None => *inputs
                    .get(wire)
                    .ok_or_else(|| CircuitEvalError::MissingInput(wire.clone()))?,
                Some(gate) => {
                    let mut bits = Vec::with_capacity(gate.inputs.len());
                    for input in gate.inputs.iter() {
                        let in_id = self
                            .wire_index
                            .index_of(input)
                            .ok_or(CircuitEvalError::UninitializedValue(id))?;
                        bits.push(wires[in_id].ok_or(CircuitEvalError::UninitializedValue(in_id))?);
                    }
                    gate.kind.eval(&bits)
                }
            };
            wires[id] = Some(value);
        }

        self.outputs
            .iter()
            .map(|w| {
                let id = self
                    .wire_index
                    .index_of(w)
                    .ok_or_else(|| CircuitEvalError::MissingInput(w.clone()))?;
                wires[id].ok_or(CircuitEvalError::UninitializedValue(id))
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::CircuitBuilder;

    #[test]
    fn test_truth_tables() {
        let cases: [(GateKind, [bool; 4]); 8] = [
            (GateKind::And, [false, false, false, true]),
            (GateKind::Or, [false, true, true, true]),
            (GateKind::Nand, [true, true, true, false]),
            (GateKind::Nor, [true, false, false, false]),
            (GateKind::Xor, [false, true, true, false]),
            (GateKind::Xnor, [true, false, false, true]),
            (GateKind::AndNot, [false, false, true, false]),
            (GateKind::OrNot, [true, false, true, true]),
        ];
        for (kind, expected) in cases.iter() {
            for (row, (a, b)) in [(false, false), (false, true), (true, false), (true, true)]
                .iter()
                .enumerate()
            {
                assert_eq!(kind.eval(&[*a, *b]), expected[row], "{kind} {a} {b}");
            }
        }
        assert!(GateKind::Not.eval(&[false]));
        assert!(!GateKind::Not.eval(&[true]));
        assert!(!GateKind::Const0.eval(&[]));
        assert!(GateKind::Const1.eval(&[]));
    }

    #[test]
    fn test_parse_kind() {
        for kind in GateKind::ALL.iter() {
            assert_eq!(kind.name().parse::<GateKind>(), Ok(*kind));
            assert_eq!(kind.name().to_uppercase().parse::<GateKind>(), Ok(*kind));
        }
        assert_eq!("const_0".parse::<GateKind>(), Ok(GateKind::Const0));
        assert_eq!("const_1".parse::<GateKind>(), Ok(GateKind::Const1));
        assert_eq!(
            "mux".parse::<GateKind>(),
            Err(CircuitError::UnsupportedGate("mux".to_string()))
        );
    }

    #[test]
    fn test_structural_errors() {
        let res = CircuitBuilder::new()
            .input("a")
            .gate("o", GateKind::And, &["a"])
            .output("o")
            .build();
        assert_eq!(
            res.unwrap_err(),
            CircuitError::ArityMismatch {
                wire: "o".to_string(),
                kind: GateKind::And,
                expected: 2,
                found: 1
            }
        );

        let res = CircuitBuilder::new()
            .input("a")
            .gate("o", GateKind::Xor, &["a", "b"])
            .output("o")
            .build();
        assert_eq!(
            res.unwrap_err(),
            CircuitError::DanglingWire {
                wire: "b".to_string(),
                referenced_by: "o".to_string()
            }
        );

        let res = CircuitBuilder::new().input("a").output("o").build();
        assert_eq!(res.unwrap_err(), CircuitError::UndeclaredOutput("o".to_string()));

        let res = CircuitBuilder::new()
            .input("a")
            .gate("a", GateKind::Const1, &[])
            .output("a")
            .build();
        assert_eq!(res.unwrap_err(), CircuitError::InputHasGate("a".to_string()));

        let res = CircuitBuilder::new().input("a").input("a").output("a").build();
        assert_eq!(res.unwrap_err(), CircuitError::DuplicateWire("a".to_string()));
    }

    #[test]
    fn test_plaintext_eval() {
        // out = (x_0 AND y_0) XOR NOT x_1
        let circ = CircuitBuilder::new()
            .inputs("x", 2)
            .inputs("y", 1)
            .gate("a", GateKind::And, &["x_0", "y_0"])
            .gate("n", GateKind::Not, &["x_1"])
            .gate("out", GateKind::Xor, &["a", "n"])
            .output("out")
            .build()
            .unwrap();

        for v in 0..8u8 {
            let (x0, x1, y0) = (v & 1 == 1, v & 2 == 2, v & 4 == 4);
            let inputs: HashMap<String, bool> = [("x_0", x0), ("x_1", x1), ("y_0", y0)]
                .iter()
                .map(|(k, v)| (k.to_string(), *v))
                .collect();
            assert_eq!(circ.eval(&inputs).unwrap(), vec![(x0 & y0) ^ !x1]);
        }

        let mut inputs = HashMap::new();
        inputs.insert("x_0".to_string(), true);
        assert!(matches!(
            circ.eval(&inputs),
            Err(CircuitEvalError::MissingInput(_))
        ));
    }
}
