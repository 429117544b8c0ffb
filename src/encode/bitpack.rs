//! 8 cells per byte, most significant bit first.

use super::DecodeError;
use crate::raster::Grid;

/// Number of bytes needed for `bits` packed bits
pub fn packed_len(bits: usize) -> usize {
    bits.div_ceil(8)
}

/// Pack a grid row-major. Padding bits at the end are 0 (water).
pub fn bitpack(grid: &Grid) -> Vec<u8> {
    bitpack_bits(grid.cells())
}

pub fn bitpack_bits(bits: &[bool]) -> Vec<u8> {
    bits.chunks(8)
        .map(|chunk| {
            chunk
                .iter()
                .enumerate()
                .fold(0u8, |byte, (i, &bit)| byte | (u8::from(bit) << (7 - i)))
        })
        .collect()
}

/// Unpack the first `len` bits of `bytes`, ignoring any padding.
pub fn unpack(bytes: &[u8], len: usize) -> Result<Vec<bool>, DecodeError> {
    let expected = packed_len(len);
    if bytes.len() < expected {
        return Err(DecodeError::LengthMismatch {
            expected,
            actual: bytes.len(),
        });
    }

    Ok((0..len)
        .map(|i| bytes[i / 8] & (0x80 >> (i % 8)) != 0)
        .collect())
}
