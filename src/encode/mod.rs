//! Encoder chain: bit-pack, run-length encode, base64.
//!
//! Each stage has an exact inverse so consumers can rebuild the grid.

mod bitpack;
mod rle;

pub use bitpack::{bitpack, bitpack_bits, packed_len, unpack};
pub use rle::{pair_count, rle_decode, rle_encode, MAX_RUN};

use base64::{engine::general_purpose::STANDARD, Engine};
use tracing::info;

use crate::raster::Grid;

/// Name of the emitted JavaScript constant
pub const CONSTANT_NAME: &str = "LAND_BITMAP_RLE_B64";

#[derive(Debug, thiserror::Error)]
pub enum DecodeError {
    #[error("invalid base64: {0}")]
    Base64(#[from] base64::DecodeError),

    #[error("RLE data has odd length {0}")]
    OddRleLength(usize),

    #[error("RLE pair {pair} has a zero run length")]
    ZeroRun { pair: usize },

    #[error("packed bitmap is {actual} bytes, expected {expected}")]
    LengthMismatch { expected: usize, actual: usize },

    #[error("no LAND_BITMAP_RLE_B64 constant found")]
    MissingConstant,
}

pub fn base64_encode(bytes: &[u8]) -> String {
    STANDARD.encode(bytes)
}

pub fn base64_decode(text: &str) -> Result<Vec<u8>, DecodeError> {
    Ok(STANDARD.decode(text)?)
}

/// Output of the full encoder chain
#[derive(Debug, Clone)]
pub struct EncodedBitmap {
    pub packed_len: usize,
    pub rle_len: usize,
    pub base64: String,
}

impl EncodedBitmap {
    /// The `const LAND_BITMAP_RLE_B64 = "...";` line
    pub fn js_constant(&self) -> String {
        js_constant(&self.base64)
    }
}

/// Run a grid through bit-pack, RLE and base64
pub fn encode_grid(grid: &Grid) -> EncodedBitmap {
    info!("Bitpacking...");
    let packed = bitpack(grid);
    info!("  Packed size: {} bytes", packed.len());

    info!("RLE encoding...");
    let rle = rle_encode(&packed);
    let ratio = if packed.is_empty() {
        0.0
    } else {
        rle.len() as f64 / packed.len() as f64 * 100.0
    };
    info!("  RLE size: {} bytes ({:.1}% of packed)", rle.len(), ratio);

    info!("Base64 encoding...");
    let base64 = base64_encode(&rle);
    info!("  Base64 size: {} chars", base64.len());

    EncodedBitmap {
        packed_len: packed.len(),
        rle_len: rle.len(),
        base64,
    }
}

pub fn js_constant(b64: &str) -> String {
    format!("const {} = \"{}\";", CONSTANT_NAME, b64)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::raster::GridSpec;

    #[test]
    fn test_all_water_sixteen_cells() {
        let packed = bitpack_bits(&[false; 16]);
        assert_eq!(packed, vec![0x00, 0x00]);

        let rle = rle_encode(&packed);
        assert_eq!(rle, vec![0x00, 0x02]);

        assert_eq!(base64_encode(&rle), "AAI=");
    }

    #[test]
    fn test_alternating_grid_runs_count_bytes() {
        // 2 x 4 grid at 90°: 8 cells, a single 0xAA byte
        let spec = GridSpec::new(2, 4, 90.0).unwrap();
        let cells: Vec<bool> = (0..8).map(|i| i % 2 == 0).collect();
        let grid = Grid::from_cells(spec, cells).unwrap();

        let packed = bitpack(&grid);
        assert_eq!(packed, vec![0xAA]);
        assert_eq!(rle_encode(&packed), vec![0xAA, 1]);

        let bits: Vec<bool> = (0..8 * 40).map(|i| i % 2 == 0).collect();
        assert_eq!(rle_encode(&bitpack_bits(&bits)), vec![0xAA, 40]);
    }

    #[test]
    fn test_base64_round_trip() {
        let bytes: Vec<u8> = (0..=255).collect();
        let text = base64_encode(&bytes);
        assert!(!text.contains('\n'));
        assert_eq!(base64_decode(&text).unwrap(), bytes);
    }

    #[test]
    fn test_base64_rejects_garbage() {
        assert!(matches!(
            base64_decode("not base64!"),
            Err(DecodeError::Base64(_))
        ));
    }

    #[test]
    fn test_encode_grid_chain_inverts() {
        let spec = GridSpec::new(18, 36, 10.0).unwrap();
        let cells: Vec<bool> = (0..spec.cell_count()).map(|i| (i / 50) % 3 == 0).collect();
        let grid = Grid::from_cells(spec, cells.clone()).unwrap();

        let encoded = encode_grid(&grid);
        assert_eq!(encoded.packed_len, packed_len(cells.len()));

        let rle = base64_decode(&encoded.base64).unwrap();
        assert_eq!(rle.len(), encoded.rle_len);
        let packed = rle_decode(&rle).unwrap();
        assert_eq!(unpack(&packed, cells.len()).unwrap(), cells);
    }

    #[test]
    fn test_js_constant() {
        assert_eq!(js_constant("AAI="), "const LAND_BITMAP_RLE_B64 = \"AAI=\";");
    }
}
