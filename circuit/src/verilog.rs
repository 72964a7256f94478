//! Load circuits from the flat gate-level Verilog emitted by yosys
//! (`write_verilog -noattr` after `abc -g AND,NAND,OR,NOR,XOR,XNOR,ANDNOT,ORNOT`).
//!
//! Only `input`, `output`, `wire` declarations of single-bit nets and
//! `assign` statements with one gate on the right-hand side are accepted.

use std::collections::{HashMap, HashSet};
use std::fs;
use std::path::Path;

use anyhow::{anyhow, Context};
use regex::Regex;

use crate::errors::{CircuitError, CircuitLoadError};
use crate::gate::{Circuit, Gate, GateKind};

struct Patterns {
    block_comment: Regex,
    line_comment: Regex,
    rules: Vec<(Regex, GateKind)>,
    constant: Regex,
}

impl Patterns {
    fn new() -> Result<Self, CircuitLoadError> {
        let net = r"([\w$]+)";
        let rule = |pattern: String, kind| -> Result<(Regex, GateKind), CircuitLoadError> {
            let re = Regex::new(&format!("^{}$", pattern)).context("Failed to compile regex")?;
            Ok((re, kind))
        };
        let rules = vec![
            rule(format!(r"~{}", net), GateKind::Not)?,
            rule(format!(r"{}&{}", net, net), GateKind::And)?,
            rule(format!(r"{}\|{}", net, net), GateKind::Or)?,
            rule(format!(r"{}\^{}", net, net), GateKind::Xor)?,
            rule(format!(r"{}&~\({}\)", net, net), GateKind::AndNot)?,
            rule(format!(r"{}\|~\({}\)", net, net), GateKind::OrNot)?,
            rule(format!(r"~\({}&{}\)", net, net), GateKind::Nand)?,
            rule(format!(r"~\({}\|{}\)", net, net), GateKind::Nor)?,
            rule(format!(r"~\({}\^{}\)", net, net), GateKind::Xnor)?,
        ];
        Ok(Self {
            block_comment: Regex::new(r"(?s)/\*.*?\*/").context("Failed to compile regex")?,
            line_comment: Regex::new(r"(?m)//.*$").context("Failed to compile regex")?,
            rules,
            constant: Regex::new(r"^1'h([01])$").context("Failed to compile regex")?,
        })
    }

    /// Parse the right-hand side of an assignment, whitespace removed.
    fn gate(&self, rhs: &str) -> Result<Gate, CircuitError> {
        if let Some(cap) = self.constant.captures(rhs) {
            let kind = if &cap[1] == "1" {
                GateKind::Const1
            } else {
                GateKind::Const0
            };
            return Ok(Gate::new(kind, Vec::<String>::new()));
        }
        for (re, kind) in self.rules.iter() {
            if let Some(cap) = re.captures(rhs) {
                let inputs = cap.iter().skip(1).flatten().map(|m| m.as_str());
                return Ok(Gate::new(*kind, inputs));
            }
        }
        Err(CircuitError::UnsupportedGate(rhs.to_string()))
    }
}

impl Circuit {
    /// Load and parse a gate-level Verilog netlist.
    pub fn load_verilog<P: AsRef<Path>>(filename: P) -> Result<Self, CircuitLoadError> {
        let filename = filename.as_ref();
        let source = fs::read_to_string(filename)
            .with_context(|| format!("Failed to read circuit from {}", filename.display()))?;
        let circ = Self::from_verilog(&source)?;
        log::info!(
            "loaded verilog circuit {}: {} inputs, {} outputs, {} gates",
            filename.display(),
            circ.inputs().len(),
            circ.outputs().len(),
            circ.ngates()
        );
        Ok(circ)
    }

    pub fn from_verilog(source: &str) -> Result<Self, CircuitLoadError> {
        let patterns = Patterns::new()?;

        let mut inputs = Vec::new();
        let mut outputs = Vec::new();
        let mut declared: Vec<String> = Vec::new();
        let mut known: HashSet<String> = HashSet::new();
        let mut gates: HashMap<String, Gate> = HashMap::new();

        let source = patterns.block_comment.replace_all(source, "");
        let source = patterns.line_comment.replace_all(&source, "");

        for statement in source.split(';') {
            let statement = statement.trim();
            if statement.is_empty() {
                continue;
            }
            let tokens: Vec<&str> = statement.split_whitespace().collect();
            match tokens[0] {
                "module" | "endmodule" => continue,
                "input" | "output" | "wire" => {
                    if tokens.len() != 2 {
                        return Err(CircuitLoadError::ParsingError(anyhow!(
                            "Unsupported statement: {}",
                            statement
                        )));
                    }
                    let name = tokens[1].to_string();
                    match tokens[0] {
                        "input" => inputs.push(name.clone()),
                        "output" => outputs.push(name.clone()),
                        _ => {}
                    }
                    if known.insert(name.clone()) {
                        declared.push(name);
                    }
                }
                "assign" => {
                    if tokens.len() < 4 || tokens[2] != "=" {
                        return Err(CircuitLoadError::ParsingError(anyhow!(
                            "Unsupported statement: {}",
                            statement
                        )));
                    }
                    let lhs = tokens[1];
                    if lhs.contains('[') || lhs.contains(':') {
                        return Err(CircuitLoadError::ParsingError(anyhow!(
                            "Unsupported statement: {}",
                            statement
                        )));
                    }
                    let rhs: String = tokens[3..].concat();
                    let gate = patterns.gate(&rhs)?;
                    if let Some(undefined) = gate.inputs.iter().find(|w| !known.contains(*w)) {
                        return Err(CircuitError::DanglingWire {
                            wire: undefined.clone(),
                            referenced_by: lhs.to_string(),
                        }
                        .into());
                    }
                    if known.insert(lhs.to_string()) {
                        declared.push(lhs.to_string());
                    }
                    if gates.insert(lhs.to_string(), gate).is_some() {
                        return Err(CircuitError::DuplicateWire(lhs.to_string()).into());
                    }
                }
                _ => {
                    return Err(CircuitLoadError::ParsingError(anyhow!(
                        "Unsupported statement: {}",
                        statement
                    )))
                }
            }
        }

        let input_set: HashSet<&String> = inputs.iter().collect();
        if let Some(wire) = declared
            .iter()
            .find(|w| !gates.contains_key(*w) && !input_set.contains(w))
        {
            return Err(CircuitError::UnassignedWire(wire.clone()).into());
        }

        Ok(Circuit::new(inputs, outputs, gates)?)
    }
}
