//! Probabilistic prime generation and modular arithmetic over big integers.

use crate::errors::ArithmeticError;
use num_bigint::{BigInt, BigUint, RandBigInt, ToBigUint};
use num_integer::Integer;
use num_traits::{One, Zero};
use once_cell::sync::Lazy;
use rand::{CryptoRng, Rng};

/// Default number of Miller-Rabin rounds.
pub const MILLER_RABIN_ROUNDS: usize = 40;

const SMALL_PRIME_BOUND: usize = 2000;

/// Primes below `SMALL_PRIME_BOUND`, used for trial division.
static SMALL_PRIMES: Lazy<Vec<u32>> = Lazy::new(|| {
    let mut sieve = vec![true; SMALL_PRIME_BOUND];
    sieve[0] = false;
    sieve[1] = false;
    let mut i = 2;
    while i * i < SMALL_PRIME_BOUND {
        if sieve[i] {
            let mut j = i * i;
            while j < SMALL_PRIME_BOUND {
                sieve[j] = false;
                j += i;
            }
        }
        i += 1;
    }
    sieve
        .iter()
        .enumerate()
        .filter(|(_, p)| **p)
        .map(|(i, _)| i as u32)
        .collect()
});

/// Generate a random prime of exactly `bits` bits.
pub fn generate_prime<R: Rng + CryptoRng>(
    rng: &mut R,
    bits: usize,
    rounds: usize,
) -> Result<BigUint, ArithmeticError> {
    if bits < 2 {
        return Err(ArithmeticError::TooFewBits(bits));
    }
    let top = BigUint::one() << (bits - 1);
    let mut attempts = 0usize;
    loop {
        attempts += 1;
        let candidate = rng.gen_biguint(bits as u64) | &top | BigUint::one();
        if is_prime(rng, &candidate, rounds) {
            log::trace!("found {}-bit prime after {} candidates", bits, attempts);
            return Ok(candidate);
        }
    }
}

/// Miller-Rabin primality test with `rounds` random witnesses, preceded by
/// trial division by small primes.
pub fn is_prime<R: Rng + CryptoRng>(rng: &mut R, n: &BigUint, rounds: usize) -> bool {
    let two = BigUint::from(2u32);
    if *n < two {
        return false;
    }
    if *n == two {
        return true;
    }
    if n.is_even() {
        return false;
    }

    for p in SMALL_PRIMES.iter() {
        let p = BigUint::from(*p);
        if *n == p {
            return true;
        }
        if (n % &p).is_zero() {
            return false;
        }
    }

    // n - 1 = 2^r * s with s odd.
    let n_minus_one = n - BigUint::one();
    let mut s = n_minus_one.clone();
    let mut r = 0usize;
    while s.is_even() {
        s >>= 1usize;
        r += 1;
    }

    // n > SMALL_PRIME_BOUND here, so [2, n - 2] is never empty.
    for _ in 0..rounds {
        let a = rng.gen_biguint_range(&two, &n_minus_one);
        let mut x = a.modpow(&s, n);
        if x.is_one() || x == n_minus_one {
            continue;
        }

        let mut witness = true;
        for _ in 0..r.saturating_sub(1) {
            x = x.modpow(&two, n);
            if x == n_minus_one {
                witness = false;
                break;
            }
        }
        if witness {
            return false;
        }
    }
    true
}

/// Compute `a^-1 mod m` with the extended Euclidean algorithm.
pub fn modular_inverse(a: &BigUint, m: &BigUint) -> Result<BigUint, ArithmeticError> {
    if m.is_zero() {
        return Err(ArithmeticError::ZeroModulus);
    }

    let modulus = BigInt::from(m.clone());
    let (mut old_r, mut r) = (BigInt::from(a % m), modulus.clone());
    let (mut old_s, mut s) = (BigInt::one(), BigInt::zero());

    while !r.is_zero() {
        let q = &old_r / &r;
        let next_r = &old_r - &q * &r;
        old_r = std::mem::replace(&mut r, next_r);
        let next_s = &old_s - &q * &s;
        old_s = std::mem::replace(&mut s, next_s);
    }

    if !old_r.is_one() {
        return Err(ArithmeticError::NotInvertible);
    }

    old_s
        .mod_floor(&modulus)
        .to_biguint()
        .ok_or(ArithmeticError::NotInvertible)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::AesRng;

    #[test]
    fn test_small_numbers() {
        let mut rng = AesRng::new();
        let primes = [2u32, 3, 5, 7, 11, 13, 1999, 2003, 7919, 104_729];
        for p in primes.iter() {
            assert!(is_prime(&mut rng, &BigUint::from(*p), MILLER_RABIN_ROUNDS), "{p}");
        }

        let composites = [0u32, 1, 4, 9, 15, 1001, 2001, 4_000_037 * 3];
        for c in composites.iter() {
            assert!(!is_prime(&mut rng, &BigUint::from(*c), MILLER_RABIN_ROUNDS), "{c}");
        }
    }

    #[test]
    fn test_carmichael_numbers() {
        let mut rng = AesRng::new();
        // Chernick form (6k+1)(12k+1)(18k+1) with k = 370, all factors above the
        // trial-division bound.
        let n = BigUint::from(2_221u64 * 4_441 * 6_661);
        assert!(!is_prime(&mut rng, &n, MILLER_RABIN_ROUNDS));
        let n = BigUint::from(4_294_967_291u64) * BigUint::from(4_294_967_279u64);
        assert!(!is_prime(&mut rng, &n, MILLER_RABIN_ROUNDS));
    }

    #[test]
    fn test_mersenne_prime() {
        let mut rng = AesRng::new();
        let m127 = (BigUint::one() << 127usize) - BigUint::one();
        assert!(is_prime(&mut rng, &m127, MILLER_RABIN_ROUNDS));
        let m128 = (BigUint::one() << 128usize) - BigUint::one();
        assert!(!is_prime(&mut rng, &m128, MILLER_RABIN_ROUNDS));
    }

    #[test]
    fn test_generate_prime() {
        let mut rng = AesRng::new();
        for bits in [16usize, 64, 256].iter() {
            let p = generate_prime(&mut rng, *bits, MILLER_RABIN_ROUNDS).unwrap();
            assert_eq!(p.bits(), *bits as u64);
            assert!(p.is_odd());
            assert!(is_prime(&mut rng, &p, MILLER_RABIN_ROUNDS));
        }
    }

    #[test]
    fn test_generate_prime_too_few_bits() {
        let mut rng = AesRng::new();
        for bits in [0usize, 1].iter() {
            assert_eq!(
                generate_prime(&mut rng, *bits, MILLER_RABIN_ROUNDS),
                Err(ArithmeticError::TooFewBits(*bits))
            );
        }
        assert_eq!(
            generate_prime(&mut rng, 2, MILLER_RABIN_ROUNDS).unwrap().bits(),
            2
        );
    }

    #[test]
    fn test_modular_inverse() {
        let a = BigUint::from(65537u32);
        let m = BigUint::from(3_120u32 * 7);
        let inv = modular_inverse(&a, &m).unwrap();
        assert!(((&a * &inv) % &m).is_one());

        let mut rng = AesRng::new();
        let p = generate_prime(&mut rng, 128, MILLER_RABIN_ROUNDS).unwrap();
        for _ in 0..20 {
            let a = rng.gen_biguint_range(&BigUint::one(), &p);
            let inv = modular_inverse(&a, &p).unwrap();
            assert!(((&a * &inv) % &p).is_one());
        }
    }

    #[test]
    fn test_modular_inverse_failure() {
        assert_eq!(
            modular_inverse(&BigUint::from(6u32), &BigUint::from(9u32)),
            Err(ArithmeticError::NotInvertible)
        );
        assert_eq!(
            modular_inverse(&BigUint::from(6u32), &BigUint::zero()),
            Err(ArithmeticError::ZeroModulus)
        );
        assert_eq!(
            modular_inverse(&BigUint::from(5u32), &BigUint::one()),
            Ok(BigUint::zero())
        );
    }
}
