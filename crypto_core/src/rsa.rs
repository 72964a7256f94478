//! RSA parameter generation, used as the trapdoor of the 1-2 oblivious transfer.

use crate::errors::RsaError;
use crate::prime::{generate_prime, modular_inverse, MILLER_RABIN_ROUNDS};
use num_bigint::BigUint;
use num_traits::One;
use rand::{CryptoRng, Rng};

/// Fixed public exponent.
pub const PUBLIC_EXPONENT: u32 = 65537;

/// The public half of an RSA key: `(e, N)`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RsaPublicKey {
    pub e: BigUint,
    pub n: BigUint,
}

/// RSA parameters `(e, d, N)` with `e * d = 1 mod (p - 1)(q - 1)`.
#[derive(Clone)]
pub struct RsaParams {
    pub e: BigUint,
    pub d: BigUint,
    pub n: BigUint,
    bits: usize,
}

impl RsaParams {
    /// Generate parameters for a `bits`-bit modulus, drawing fresh primes
    /// until the public exponent is invertible.
    pub fn generate<R: Rng + CryptoRng>(rng: &mut R, bits: usize) -> Result<Self, RsaError> {
        Self::generate_with_rounds(rng, bits, MILLER_RABIN_ROUNDS)
    }

    pub fn generate_with_rounds<R: Rng + CryptoRng>(
        rng: &mut R,
        bits: usize,
        rounds: usize,
    ) -> Result<Self, RsaError> {
        loop {
            match Self::try_generate(rng, bits, rounds) {
                Ok(params) => return Ok(params),
                Err(RsaError::ModulusTooSmall(bits)) => return Err(RsaError::ModulusTooSmall(bits)),
                Err(e) => log::debug!("regenerating RSA primes: {}", e),
            }
        }
    }

    /// A single generation attempt. Fails if `e` is not invertible modulo
    /// `(p - 1)(q - 1)` or if both primes coincide.
    pub fn try_generate<R: Rng + CryptoRng>(
        rng: &mut R,
        bits: usize,
        rounds: usize,
    ) -> Result<Self, RsaError> {
        if bits < 16 {
            return Err(RsaError::ModulusTooSmall(bits));
        }

        let p = generate_prime(rng, bits / 2, rounds)?;
        let q = generate_prime(rng, bits - bits / 2, rounds)?;
        if p == q {
            return Err(RsaError::EqualPrimes);
        }

        Self::from_primes(&p, &q, bits)
    }

    /// Derive the parameters from two known primes.
    pub fn from_primes(p: &BigUint, q: &BigUint, bits: usize) -> Result<Self, RsaError> {
        let n = p * q;
        let e = BigUint::from(PUBLIC_EXPONENT);
        let phi = (p - BigUint::one()) * (q - BigUint::one());
        let d = modular_inverse(&e, &phi)?;
        Ok(Self { e, d, n, bits })
    }

    /// Requested modulus size in bits.
    pub fn bits(&self) -> usize {
        self.bits
    }

    pub fn public_key(&self) -> RsaPublicKey {
        RsaPublicKey {
            e: self.e.clone(),
            n: self.n.clone(),
        }
    }
}

impl std::fmt::Debug for RsaParams {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RsaParams")
            .field("e", &self.e)
            .field("n", &self.n)
            .finish_non_exhaustive()
    }
}
