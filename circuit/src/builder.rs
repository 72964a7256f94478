use std::collections::HashMap;

use crate::errors::CircuitError;
use crate::gate::{Circuit, Gate, GateKind};

/// Name of bit `i` of a multi-bit value: `<prefix>_<i>`.
pub fn bit_wire(prefix: &str, i: usize) -> String {
    format!("{}_{}", prefix, i)
}

/// Inverse of `bit_wire`: split `<prefix>_<i>` into its prefix and bit position.
pub fn split_bit_wire(wire: &str) -> Option<(&str, usize)> {
    let (prefix, index) = wire.rsplit_once('_')?;
    if prefix.is_empty() || index.is_empty() || !index.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    Some((prefix, index.parse().ok()?))
}

/// Incremental construction of a `Circuit`. Structural checks run in `build`.
#[derive(Debug, Default)]
pub struct CircuitBuilder {
    inputs: Vec<String>,
    outputs: Vec<String>,
    gates: HashMap<String, Gate>,
    reassigned: Option<String>,
}

impl CircuitBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn input(mut self, wire: &str) -> Self {
        self.inputs.push(wire.to_string());
        self
    }

    /// Declare inputs `<prefix>_0 .. <prefix>_<width - 1>`.
    pub fn inputs(mut self, prefix: &str, width: usize) -> Self {
        self.inputs.extend((0..width).map(|i| bit_wire(prefix, i)));
        self
    }

    pub fn output(mut self, wire: &str) -> Self {
        self.outputs.push(wire.to_string());
        self
    }

    pub fn outputs(mut self, prefix: &str, width: usize) -> Self {
        self.outputs.extend((0..width).map(|i| bit_wire(prefix, i)));
        self
    }

    /// Drive `wire` with a gate of `kind` over `inputs`.
    pub fn gate(mut self, wire: &str, kind: GateKind, inputs: &[&str]) -> Self {
        let gate = Gate::new(kind, inputs.iter().copied());
        if self.gates.insert(wire.to_string(), gate).is_some() && self.reassigned.is_none() {
            self.reassigned = Some(wire.to_string());
        }
        self
    }

    pub fn build(self) -> Result<Circuit, CircuitError> {
        if let Some(wire) = self.reassigned {
            return Err(CircuitError::DuplicateWire(wire));
        }
        Circuit::new(self.inputs, self.outputs, self.gates)
    }
}

/// `out_i = kind(lhs_i, rhs_i)` for every bit `i < width`.
pub fn bitwise_circuit(
    kind: GateKind,
    width: usize,
    lhs: &str,
    rhs: &str,
    out: &str,
) -> Result<Circuit, CircuitError> {
    let mut builder = CircuitBuilder::new()
        .inputs(lhs, width)
        .inputs(rhs, width)
        .outputs(out, width);
    for i in 0..width {
        let (a, b) = (bit_wire(lhs, i), bit_wire(rhs, i));
        builder = builder.gate(&bit_wire(out, i), kind, &[&a, &b]);
    }
    builder.build()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_split_bit_wire() {
        assert_eq!(split_bit_wire("x_0"), Some(("x", 0)));
        assert_eq!(split_bit_wire("carry_out_31"), Some(("carry_out", 31)));
        assert_eq!(split_bit_wire(&bit_wire("y", 7)), Some(("y", 7)));
        assert_eq!(split_bit_wire("out"), None);
        assert_eq!(split_bit_wire("x_"), None);
        assert_eq!(split_bit_wire("_3"), None);
        assert_eq!(split_bit_wire("x_+3"), None);
    }

    #[test]
    fn test_reassigned_wire() {
        let res = CircuitBuilder::new()
            .input("a")
            .gate("o", GateKind::Not, &["a"])
            .gate("o", GateKind::Const0, &[])
            .output("o")
            .build();
        assert_eq!(res.unwrap_err(), CircuitError::DuplicateWire("o".to_string()));
    }

    #[test]
    fn test_bitwise_and() {
        let circ = bitwise_circuit(GateKind::And, 32, "x", "y", "out").unwrap();
        assert_eq!(circ.inputs().len(), 64);
        assert_eq!(circ.outputs().len(), 32);
        assert_eq!(circ.ngates(), 32);

        let (x, y) = (9001u64, 1337u64);
        let mut inputs = HashMap::new();
        for i in 0..32 {
            inputs.insert(bit_wire("x", i), (x >> i) & 1 == 1);
            inputs.insert(bit_wire("y", i), (y >> i) & 1 == 1);
        }
        let out = circ.eval(&inputs).unwrap();
        let value = out
            .iter()
            .enumerate()
            .fold(0u64, |acc, (i, b)| acc | ((*b as u64) << i));
        assert_eq!(value, 9001 & 1337);
    }
}
