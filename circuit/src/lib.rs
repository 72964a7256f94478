//! Boolean circuits over named wires.

pub mod builder;
pub mod errors;
pub mod gate;
pub mod load;
pub mod topology;
pub mod verilog;

pub use builder::{bit_wire, bitwise_circuit, split_bit_wire, CircuitBuilder};
pub use errors::{CircuitError, CircuitEvalError, CircuitLoadError};
pub use gate::{Circuit, Gate, GateKind};
pub use topology::WireIndex;
