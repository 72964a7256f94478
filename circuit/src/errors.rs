use crate::gate::GateKind;

/// Malformed circuit structure. Always fatal.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum CircuitError {
    #[error("unsupported gate type: {0}")]
    UnsupportedGate(String),

    #[error("gate {kind} on wire {wire} expects {expected} inputs, found {found}")]
    ArityMismatch {
        wire: String,
        kind: GateKind,
        expected: usize,
        found: usize,
    },

    #[error("wire {wire} referenced by {referenced_by} is never defined")]
    DanglingWire { wire: String, referenced_by: String },

    #[error("wire {0} was never assigned")]
    UnassignedWire(String),

    #[error("output wire {0} is neither a declared input nor driven by a gate")]
    UndeclaredOutput(String),

    #[error("input wire {0} is also assigned a gate")]
    InputHasGate(String),

    #[error("wire {0} is declared more than once")]
    DuplicateWire(String),

    #[error("circuit contains a cycle through wire {0}")]
    Cycle(String),
}

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum CircuitEvalError {
    #[error("uninitialized value, wire {0}")]
    UninitializedValue(usize),

    #[error("no value supplied for input wire {0}")]
    MissingInput(String),
}

#[derive(Debug, thiserror::Error)]
pub enum CircuitLoadError {
    #[error("encountered error while parsing circuit")]
    ParsingError(#[from] anyhow::Error),
    /// An I/O error occurred.
    #[error("encountered io error while loading circuit")]
    IoError(#[from] std::io::Error),
    /// The description parsed but does not form a valid circuit.
    #[error("invalid circuit structure")]
    InvalidStructure(#[from] CircuitError),
}
