use std::collections::HashMap;

use circuit::{split_bit_wire, Circuit};
use crypto_core::utils::{fits_in_bits, u64_to_bits};
use crypto_core::{AbstractChannel, Block};
use rand::{CryptoRng, Rng};
use serde::{Deserialize, Serialize};

use crate::{
    receive_gc, receive_indices, receive_wirelabels, send_gc, send_indices, send_wirelabels,
    ConfigError, EvaluatorError, GCEvaluator, GCGenerator, GeneratorError, OTReceiverError,
    OTSenderError, OtReceiver, OtSender, ProtocolConfig, RsaOtReceiver, RsaOtSender, WireLabel,
    YaoEvaluator, YaoGenerator,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Party {
    Garbler,
    Evaluator,
}

#[derive(Debug, thiserror::Error)]
pub enum TwopcError {
    #[error("invalid protocol configuration")]
    ConfigError(#[from] ConfigError),

    #[error("input wire {0} belongs to neither party")]
    UnownedInput(String),

    #[error("input wire {wire} is beyond the {width}-bit input of its party")]
    InputOutOfRange { wire: String, width: usize },

    #[error("input value {value} does not fit in {width} bits")]
    ValueTooWide { value: u64, width: usize },

    #[error("wire {0} has no index")]
    UnindexedWire(String),

    #[error("output group {0} is wider than 64 bits")]
    OutputTooWide(String),

    #[error("peer announced {found} evaluator inputs, expected {expected}")]
    InputCountMismatch { expected: usize, found: usize },

    #[error("peer returned labels for unexpected output wires")]
    OutputMismatch,

    #[error("garbling error")]
    GeneratorError(#[from] GeneratorError),

    #[error("evaluation error")]
    EvaluatorError(#[from] EvaluatorError),

    #[error("OT sender error")]
    OTSenderError(#[from] OTSenderError),

    #[error("OT receiver error")]
    OTReceiverError(#[from] OTReceiverError),

    #[error("IO error")]
    IoError(#[from] std::io::Error),
}

/// Declared circuit inputs split between the parties, each with the bit of
/// its party's integer it carries. Declaration order is kept.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InputAssignment {
    pub garbler: Vec<(String, usize)>,
    pub evaluator: Vec<(String, usize)>,
}

impl InputAssignment {
    /// Every declared input must be `<prefix>_<i>` for one party's prefix
    /// and a bit `i` within that party's width.
    pub fn new(circ: &Circuit, config: &ProtocolConfig) -> Result<Self, TwopcError> {
        let mut assignment = Self::default();
        for wire in circ.inputs().iter() {
            let (prefix, bit) =
                split_bit_wire(wire).ok_or_else(|| TwopcError::UnownedInput(wire.clone()))?;
            let (owner, width) = if prefix == config.garbler_prefix {
                (&mut assignment.garbler, config.garbler_width)
            } else if prefix == config.evaluator_prefix {
                (&mut assignment.evaluator, config.evaluator_width)
            } else {
                return Err(TwopcError::UnownedInput(wire.clone()));
            };
            if bit >= width {
                return Err(TwopcError::InputOutOfRange {
                    wire: wire.clone(),
                    width,
                });
            }
            owner.push((wire.clone(), bit));
        }
        Ok(assignment)
    }

    pub fn of(&self, party: Party) -> &[(String, usize)] {
        match party {
            Party::Garbler => &self.garbler,
            Party::Evaluator => &self.evaluator,
        }
    }
}

/// Decoded circuit outputs, revealed to the garbler.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProtocolOutput {
    /// Every output wire with its bit, in declaration order.
    pub bits: Vec<(String, bool)>,
    /// Outputs `<prefix>_<i>` assembled LSB-first per prefix. Any other
    /// output forms a group of its own.
    pub values: Vec<(String, u64)>,
}

impl ProtocolOutput {
    pub fn new(wires: &[String], bits: Vec<bool>) -> Result<Self, TwopcError> {
        let mut values: Vec<(String, u64)> = Vec::new();
        let mut groups: HashMap<String, usize> = HashMap::new();

        for (wire, bit) in wires.iter().zip(bits.iter()) {
            let (group, pos) = split_bit_wire(wire).unwrap_or((wire.as_str(), 0));
            if pos >= 64 {
                return Err(TwopcError::OutputTooWide(group.to_string()));
            }
            let slot = *groups.entry(group.to_string()).or_insert_with(|| {
                values.push((group.to_string(), 0));
                values.len() - 1
            });
            values[slot].1 |= (*bit as u64) << pos;
        }

        Ok(Self {
            bits: wires.iter().cloned().zip(bits.into_iter()).collect(),
            values,
        })
    }

    /// The integer assembled from the output group `name`.
    pub fn value(&self, name: &str) -> Option<u64> {
        self.values
            .iter()
            .find(|(group, _)| group == name)
            .map(|(_, value)| *value)
    }

    pub fn bit(&self, wire: &str) -> Option<bool> {
        self.bits.iter().find(|(w, _)| w == wire).map(|(_, b)| *b)
    }
}

pub struct TwopcProtocol<C: AbstractChannel> {
    pub channel: C,
    pub party: Party,
    config: ProtocolConfig,
}

impl<C: AbstractChannel> TwopcProtocol<C> {
    pub fn new(channel: C, party: Party, config: ProtocolConfig) -> Result<Self, TwopcError> {
        config.validate()?;
        Ok(Self {
            channel,
            party,
            config,
        })
    }

    pub fn config(&self) -> &ProtocolConfig {
        &self.config
    }

    /// Jointly evaluate `circ` on this party's `input` and the peer's.
    /// The garbler receives the outputs; the evaluator gets `None`.
    pub fn compute<R: Rng + CryptoRng>(
        &mut self,
        rng: &mut R,
        circ: &Circuit,
        input: u64,
    ) -> Result<Option<ProtocolOutput>, TwopcError> {
        let assignment = InputAssignment::new(circ, &self.config)?;
        let (_, width) = self.config.input_layout(self.party);
        if !fits_in_bits(input, width) {
            return Err(TwopcError::ValueTooWide {
                value: input,
                width,
            });
        }
        let bits = u64_to_bits(input, width);

        match self.party {
            Party::Garbler => self.garbler_compute(rng, circ, &assignment, &bits).map(Some),
            Party::Evaluator => self
                .evaluator_compute(rng, &assignment, &bits)
                .map(|_| None),
        }
    }

    fn garbler_compute<R: Rng + CryptoRng>(
        &mut self,
        rng: &mut R,
        circ: &Circuit,
        assignment: &InputAssignment,
        bits: &[bool],
    ) -> Result<ProtocolOutput, TwopcError> {
        let gen = YaoGenerator::new(self.config.label_bits)?;
        let garbling = gen.garble(rng, circ)?;
        let index_of = |wire: &str| {
            garbling
                .wire_index
                .index_of(wire)
                .ok_or_else(|| TwopcError::UnindexedWire(wire.to_string()))
        };

        let own_labels = assignment
            .garbler
            .iter()
            .map(|(wire, bit)| Ok(garbling.encode(index_of(wire)?, bits[*bit])?))
            .collect::<Result<Vec<WireLabel>, TwopcError>>()?;

        let mut evaluator_ids = Vec::with_capacity(assignment.evaluator.len());
        let mut pairs: Vec<(Block, Block)> = Vec::with_capacity(assignment.evaluator.len());
        for (wire, _) in assignment.evaluator.iter() {
            let id = index_of(wire)?;
            let [zero, one] = garbling.label_pair(id)?;
            evaluator_ids.push(id);
            pairs.push((zero, one));
        }

        let output_ids = circ
            .outputs()
            .iter()
            .map(|wire| index_of(wire))
            .collect::<Result<Vec<usize>, TwopcError>>()?;

        let mut ot = RsaOtSender::generate(rng, self.config.rsa_bits, self.config.miller_rabin_rounds)?;
        ot.send(&mut self.channel, &pairs, rng)?;

        send_gc(&mut self.channel, &garbling.gc)?;
        send_wirelabels(&mut self.channel, &own_labels)?;
        send_indices(&mut self.channel, &evaluator_ids)?;
        send_indices(&mut self.channel, &output_ids)?;
        self.channel.flush()?;
        log::info!(
            "sent garbled tables, {} garbler labels, {} evaluator and {} output indices",
            own_labels.len(),
            evaluator_ids.len(),
            output_ids.len()
        );

        let output_labels = receive_wirelabels(&mut self.channel)?;
        if !output_labels
            .iter()
            .map(|wl| wl.id)
            .eq(output_ids.iter().copied())
        {
            return Err(TwopcError::OutputMismatch);
        }
        let output_bits = garbling.decode(&output_labels)?;
        log::info!("decoded {} output bits", output_bits.len());

        ProtocolOutput::new(circ.outputs(), output_bits)
    }

    fn evaluator_compute<R: Rng + CryptoRng>(
        &mut self,
        rng: &mut R,
        assignment: &InputAssignment,
        bits: &[bool],
    ) -> Result<(), TwopcError> {
        let choices: Vec<bool> = assignment
            .evaluator
            .iter()
            .map(|(_, bit)| bits[*bit])
            .collect();
        let mut ot = RsaOtReceiver;
        let ot_labels = ot.receive(&mut self.channel, &choices, rng)?;

        let gc = receive_gc(&mut self.channel)?;
        let mut input_labels = receive_wirelabels(&mut self.channel)?;
        let evaluator_ids = receive_indices(&mut self.channel)?;
        let output_ids = receive_indices(&mut self.channel)?;
        log::info!(
            "received garbled circuit with {} wires and {} output indices",
            gc.len(),
            output_ids.len()
        );

        if evaluator_ids.len() != ot_labels.len() {
            return Err(TwopcError::InputCountMismatch {
                expected: ot_labels.len(),
                found: evaluator_ids.len(),
            });
        }
        input_labels.extend(
            evaluator_ids
                .into_iter()
                .zip(ot_labels.into_iter())
                .map(|(id, label)| WireLabel { id, label }),
        );

        let output_labels = YaoEvaluator::new().eval(&gc, &input_labels, &output_ids)?;
        send_wirelabels(&mut self.channel, &output_labels)?;
        self.channel.flush()?;
        log::info!("returned {} output labels", output_labels.len());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::thread;

    use circuit::{Circuit, CircuitBuilder, GateKind};
    use crypto_core::{local_channel_pair, AesRng};

    use super::*;

    fn test_config() -> ProtocolConfig {
        ProtocolConfig {
            rsa_bits: 512,
            ..Default::default()
        }
    }

    fn run_protocol(
        circ: Circuit,
        config: ProtocolConfig,
        x: u64,
        y: u64,
    ) -> Result<ProtocolOutput, TwopcError> {
        let (garbler_channel, evaluator_channel) = local_channel_pair().unwrap();
        let evaluator_circ = circ.clone();
        let evaluator_config = config.clone();

        let handle = thread::spawn(move || {
            let mut rng = AesRng::new();
            let mut prot =
                TwopcProtocol::new(evaluator_channel, Party::Evaluator, evaluator_config)?;
            prot.compute(&mut rng, &evaluator_circ, y)
        });

        let mut rng = AesRng::new();
        let mut prot = TwopcProtocol::new(garbler_channel, Party::Garbler, config)?;
        let output = prot.compute(&mut rng, &circ, x)?;

        assert_eq!(handle.join().unwrap()?, None);
        Ok(output.unwrap())
    }

    #[test]
    fn twopc_example_test() {
        let circ = Circuit::load("../circuit/circuit_files/example.json").unwrap();
        let config = ProtocolConfig {
            garbler_width: 2,
            evaluator_width: 1,
            ..test_config()
        };
        // x = [1, 0], y = [1]
        let output = run_protocol(circ, config, 0b01, 1).unwrap();
        assert_eq!(output.bits, vec![("out".to_string(), false)]);
        assert_eq!(output.value("out"), Some(0));
    }

    #[test]
    fn twopc_and32_test() {
        let circ = Circuit::load("../circuit/circuit_files/and32.json").unwrap();
        let output = run_protocol(circ, test_config(), 9001, 1337).unwrap();
        assert_eq!(output.value("out"), Some(9001 & 1337));
        assert_eq!(output.bits.len(), 32);
        assert_eq!(output.bit("out_0"), Some(true));
    }

    #[test]
    fn twopc_adder32_test() {
        let circ = Circuit::load("../circuit/circuit_files/adder32.json").unwrap();
        let config = ProtocolConfig {
            label_bits: 80,
            ..test_config()
        };
        let output = run_protocol(circ, config, 0xffff_ffff, 0xdead_beef).unwrap();
        assert_eq!(output.value("out"), Some(0xffff_ffff + 0xdead_beef));
    }

    #[test]
    fn twopc_input_checks_test() {
        let (channel, _peer) = local_channel_pair().unwrap();
        let mut rng = AesRng::new();
        let mut prot = TwopcProtocol::new(channel, Party::Garbler, test_config()).unwrap();

        let circ = CircuitBuilder::new()
            .input("x_0")
            .input("z_0")
            .gate("o", GateKind::Xor, &["x_0", "z_0"])
            .output("o")
            .build()
            .unwrap();
        assert!(matches!(
            prot.compute(&mut rng, &circ, 1),
            Err(TwopcError::UnownedInput(w)) if w == "z_0"
        ));

        let circ = CircuitBuilder::new()
            .input("x_40")
            .gate("o", GateKind::Not, &["x_40"])
            .output("o")
            .build()
            .unwrap();
        assert!(matches!(
            prot.compute(&mut rng, &circ, 1),
            Err(TwopcError::InputOutOfRange { width: 32, .. })
        ));

        let circ = Circuit::load("../circuit/circuit_files/and32.json").unwrap();
        assert!(matches!(
            prot.compute(&mut rng, &circ, 1 << 32),
            Err(TwopcError::ValueTooWide { width: 32, .. })
        ));

        // Nothing was sent to the peer.
        assert_eq!(prot.channel.written_bytes(), 0);
    }

    #[test]
    fn twopc_invalid_config_test() {
        let (channel, _peer) = local_channel_pair().unwrap();
        let config = ProtocolConfig {
            rsa_bits: 128,
            ..Default::default()
        };
        assert!(matches!(
            TwopcProtocol::new(channel, Party::Evaluator, config),
            Err(TwopcError::ConfigError(ConfigError::ModulusTooSmall { .. }))
        ));
    }

    #[test]
    fn output_grouping_test() {
        let wires: Vec<String> = ["s_0", "s_1", "carry", "s_2", "t_0"]
            .iter()
            .map(|s| s.to_string())
            .collect();
        let output = ProtocolOutput::new(&wires, vec![true, false, true, true, false]).unwrap();
        assert_eq!(
            output.values,
            vec![
                ("s".to_string(), 0b101),
                ("carry".to_string(), 1),
                ("t".to_string(), 0)
            ]
        );
        assert_eq!(output.bit("s_1"), Some(false));

        let wires = vec!["w_64".to_string()];
        assert!(matches!(
            ProtocolOutput::new(&wires, vec![true]),
            Err(TwopcError::OutputTooWide(_))
        ));
    }
}
