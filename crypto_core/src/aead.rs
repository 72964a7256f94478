//! Authenticated encryption of a single block under a 256-bit key (AES-256-GCM).

use crate::errors::CipherError;
use crate::Block;
use aes_gcm::aead::{generic_array::GenericArray, AeadInPlace, KeyInit};
use aes_gcm::Aes256Gcm;
use rand::{CryptoRng, Rng};
use serde::{Deserialize, Serialize};

pub const KEY_SIZE: usize = 32;
pub const TAG_SIZE: usize = 16;
pub const NONCE_SIZE: usize = 12;
/// Wire size of a `Ciphertext`.
pub const CIPHERTEXT_SIZE: usize = 16 + TAG_SIZE + NONCE_SIZE;

/// Ciphertext of one block: `(ciphertext, tag, nonce)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Ciphertext {
    pub ciphertext: [u8; 16],
    pub tag: [u8; TAG_SIZE],
    pub nonce: [u8; NONCE_SIZE],
}

/// Encrypt `payload` under `key` with a fresh random nonce.
pub fn encrypt<R: Rng + CryptoRng>(
    rng: &mut R,
    key: &[u8; KEY_SIZE],
    payload: Block,
) -> Result<Ciphertext, CipherError> {
    let cipher = Aes256Gcm::new(GenericArray::from_slice(key));
    let nonce = rng.gen::<[u8; NONCE_SIZE]>();

    let mut buffer: [u8; 16] = payload.into();
    let tag = cipher
        .encrypt_in_place_detached(GenericArray::from_slice(&nonce), &[], &mut buffer)
        .map_err(|_| CipherError::EncryptionFailed)?;

    let mut tag_bytes = [0u8; TAG_SIZE];
    tag_bytes.copy_from_slice(tag.as_slice());
    Ok(Ciphertext {
        ciphertext: buffer,
        tag: tag_bytes,
        nonce,
    })
}

/// Decrypt and verify a ciphertext. A wrong key yields `CipherError::Mismatch`.
pub fn decrypt(key: &[u8; KEY_SIZE], ct: &Ciphertext) -> Result<Block, CipherError> {
    let cipher = Aes256Gcm::new(GenericArray::from_slice(key));
    let mut buffer = ct.ciphertext;
    cipher
        .decrypt_in_place_detached(
            GenericArray::from_slice(&ct.nonce),
            &[],
            &mut buffer,
            GenericArray::from_slice(&ct.tag),
        )
        .map_err(|_| CipherError::Mismatch)?;
    Ok(Block::from(buffer))
}

impl Ciphertext {
    /// Fixed-width encoding `ciphertext || tag || nonce`.
    pub fn to_bytes(&self) -> [u8; CIPHERTEXT_SIZE] {
        let mut bytes = [0u8; CIPHERTEXT_SIZE];
        bytes[..16].copy_from_slice(&self.ciphertext);
        bytes[16..16 + TAG_SIZE].copy_from_slice(&self.tag);
        bytes[16 + TAG_SIZE..].copy_from_slice(&self.nonce);
        bytes
    }

    pub fn from_bytes(bytes: &[u8]) -> Result<Self, CipherError> {
        if bytes.len() != CIPHERTEXT_SIZE {
            return Err(CipherError::MalformedCiphertext(bytes.len()));
        }
        let mut ct = Ciphertext {
            ciphertext: [0u8; 16],
            tag: [0u8; TAG_SIZE],
            nonce: [0u8; NONCE_SIZE],
        };
        ct.ciphertext.copy_from_slice(&bytes[..16]);
        ct.tag.copy_from_slice(&bytes[16..16 + TAG_SIZE]);
        ct.nonce.copy_from_slice(&bytes[16 + TAG_SIZE..]);
        Ok(ct)
    }
}
