use crypto_core::RsaError;

#[derive(Debug, thiserror::Error)]
pub enum OTSenderError {
    #[error("OT sender channel error")]
    IoError(std::io::Error),

    #[error("Message does not fit below the RSA modulus")]
    MessageTooLarge,

    #[error("Receiver query is not reduced modulo N")]
    InvalidQuery,

    #[error("RSA parameter generation failed")]
    RsaError(#[from] RsaError),
}

#[derive(Debug, thiserror::Error)]
pub enum OTReceiverError {
    #[error("OT batch size does not match the number of choice bits")]
    InvalidInputLength,

    #[error("OT receiver channel error")]
    IoError(std::io::Error),

    #[error("Choice bit must be 0 or 1, got {0}")]
    InvalidChoice(u8),

    #[error("Sender public key is malformed")]
    InvalidPublicKey,

    #[error("Received message does not fit in a block")]
    MessageOutOfRange,
}

impl From<std::io::Error> for OTSenderError {
    fn from(e: std::io::Error) -> OTSenderError {
        OTSenderError::IoError(e)
    }
}

impl From<std::io::Error> for OTReceiverError {
    fn from(e: std::io::Error) -> OTReceiverError {
        OTReceiverError::IoError(e)
    }
}
