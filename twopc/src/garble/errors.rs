use crypto_core::CipherError;

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum GeneratorError {
    #[error("label size must be between 1 and 128 bits, got {0}")]
    InvalidLabelBits(usize),

    #[error("wire {0} has no label pair")]
    UninitializedLabel(usize),

    #[error("output label for wire {0} matches neither of its labels")]
    UnknownOutputLabel(usize),

    #[error("encryption error")]
    CipherError(#[from] CipherError),
}

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum EvaluatorError {
    #[error("no label supplied for input wire {0}")]
    MissingInputLabel(usize),

    #[error("wire {0} is read before it is resolved")]
    UninitializedLabel(usize),

    #[error("no row of the garbled table for wire {wire} decrypts under the resolved labels")]
    TableExhausted { wire: usize },

    #[error("output wire {0} is not part of the garbled circuit")]
    UnknownOutputWire(usize),
}
