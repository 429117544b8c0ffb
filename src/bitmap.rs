//! Decoding an emitted bitmap constant back into a lookup table.

use crate::encode::{
    base64_decode, packed_len, rle_decode, unpack, DecodeError, CONSTANT_NAME,
};
use crate::raster::{Grid, GridSpec};

/// A decoded land bitmap answering point lookups
#[derive(Debug, Clone)]
pub struct LandBitmap {
    grid: Grid,
}

impl LandBitmap {
    /// Reverse the encoder chain for a bare base64 string.
    ///
    /// The packed length must match `spec` exactly, padding included.
    pub fn decode(b64: &str, spec: GridSpec) -> Result<Self, DecodeError> {
        let rle = base64_decode(b64.trim())?;
        let packed = rle_decode(&rle)?;

        let expected = packed_len(spec.cell_count());
        if packed.len() != expected {
            return Err(DecodeError::LengthMismatch {
                expected,
                actual: packed.len(),
            });
        }

        let cells = unpack(&packed, spec.cell_count())?;
        let grid = Grid::from_cells(spec, cells).ok_or(DecodeError::LengthMismatch {
            expected,
            actual: packed.len(),
        })?;

        Ok(Self { grid })
    }

    /// Decode either a full `const LAND_BITMAP_RLE_B64 = "...";` line or a
    /// bare base64 string.
    pub fn parse_constant(text: &str, spec: GridSpec) -> Result<Self, DecodeError> {
        Self::decode(extract_payload(text)?, spec)
    }

    pub fn is_land(&self, lat: f64, lng: f64) -> bool {
        self.grid.lookup(lat, lng)
    }

    pub fn grid(&self) -> &Grid {
        &self.grid
    }
}

fn extract_payload(text: &str) -> Result<&str, DecodeError> {
    let text = text.trim();
    // Base64 padding also uses '=', so only the name marks a declaration.
    let Some(name_at) = text.find(CONSTANT_NAME) else {
        return Ok(text);
    };

    let rest = &text[name_at..];
    let start = rest.find('"').ok_or(DecodeError::MissingConstant)? + 1;
    let len = rest[start..].find('"').ok_or(DecodeError::MissingConstant)?;
    Ok(&rest[start..start + len])
}
