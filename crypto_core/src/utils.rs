//! Useful utility functions.

/// Decompose `value` into `width` bits, least significant bit first.
/// Bits of `value` above `width` are dropped.
pub fn u64_to_bits(value: u64, width: usize) -> Vec<bool> {
    (0..width)
        .map(|i| i < 64 && (value >> i) & 1 == 1)
        .collect()
}

/// Recompose a least-significant-bit-first bit slice into an integer.
/// Only the first 64 bits are used.
pub fn bits_to_u64(bits: &[bool]) -> u64 {
    bits.iter()
        .take(64)
        .enumerate()
        .fold(0u64, |acc, (i, b)| acc | ((*b as u64) << i))
}

/// Whether `value` fits in `width` bits.
pub fn fits_in_bits(value: u64, width: usize) -> bool {
    width >= 64 || value >> width == 0
}
