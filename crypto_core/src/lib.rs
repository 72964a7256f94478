pub mod aead;
pub mod block;
pub mod channel;
pub mod errors;
pub mod prime;
pub mod rand_aes;
pub mod rsa;
pub mod utils;

pub use crate::{
    aead::Ciphertext,
    block::Block,
    errors::{ArithmeticError, CipherError, RsaError},
    rand_aes::AesRng,
    rsa::{RsaParams, RsaPublicKey},
};

pub use channel::*;
