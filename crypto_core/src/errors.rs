#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum ArithmeticError {
    #[error("element is not invertible modulo the given modulus")]
    NotInvertible,

    #[error("modulus must be non-zero")]
    ZeroModulus,

    #[error("a prime needs at least 2 bits, got {0}")]
    TooFewBits(usize),
}

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum RsaError {
    #[error("RSA modulus size {0} is too small, need at least 16 bits")]
    ModulusTooSmall(usize),

    #[error("arithmetic error while deriving the private exponent")]
    Arithmetic(#[from] ArithmeticError),

    #[error("the two generated primes are equal")]
    EqualPrimes,
}

/// Cipher failures. `Mismatch` under a wrong key is an expected outcome,
/// not a fault.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum CipherError {
    #[error("authentication failed")]
    Mismatch,

    #[error("encryption failed")]
    EncryptionFailed,

    #[error("malformed ciphertext of {0} bytes")]
    MalformedCiphertext(usize),
}
