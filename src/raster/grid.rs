//! Grid dimensions and the boolean land/water grid.

use std::fmt;

/// Tolerance when checking that a grid covers the whole sphere
const COVERAGE_EPSILON: f64 = 1e-9;

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum GridError {
    #[error("invalid grid {rows}x{cols} at {res}°: {reason}")]
    InvalidSpec {
        rows: usize,
        cols: usize,
        res: f64,
        reason: &'static str,
    },
}

/// Dimensions and resolution of a full-sphere lat/lng grid.
///
/// Row 0 is the band just south of latitude 90°, column 0 the band just
/// east of longitude -180°.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GridSpec {
    pub rows: usize,
    pub cols: usize,
    /// Degrees per cell along both axes
    pub res: f64,
}

impl GridSpec {
    pub fn new(rows: usize, cols: usize, res: f64) -> Result<Self, GridError> {
        let invalid = |reason| GridError::InvalidSpec {
            rows,
            cols,
            res,
            reason,
        };

        if rows == 0 || cols == 0 {
            return Err(invalid("grid must have at least one row and column"));
        }
        if !(res.is_finite() && res > 0.0) {
            return Err(invalid("resolution must be a positive number"));
        }
        if (rows as f64 * res - 180.0).abs() > COVERAGE_EPSILON {
            return Err(invalid("rows * res must equal 180"));
        }
        if (cols as f64 * res - 360.0).abs() > COVERAGE_EPSILON {
            return Err(invalid("cols * res must equal 360"));
        }

        Ok(Self { rows, cols, res })
    }

    /// Full-sphere grid at the given resolution, e.g. 0.25° gives 720x1440
    pub fn with_resolution(res: f64) -> Result<Self, GridError> {
        if !(res.is_finite() && res > 0.0) {
            return Err(GridError::InvalidSpec {
                rows: 0,
                cols: 0,
                res,
                reason: "resolution must be a positive number",
            });
        }
        let rows = (180.0 / res).round() as usize;
        let cols = (360.0 / res).round() as usize;
        Self::new(rows, cols, res)
    }

    pub fn cell_count(&self) -> usize {
        self.rows * self.cols
    }

    /// Map a coordinate to its `(row, col)` cell.
    ///
    /// Indices are truncated toward zero and clamped into range, so any
    /// input (including out-of-range or NaN coordinates) yields a valid cell.
    pub fn cell_index(&self, lat: f64, lng: f64) -> (usize, usize) {
        let row = ((90.0 - lat) / self.res) as i64;
        let col = ((lng + 180.0) / self.res) as i64;
        (
            row.clamp(0, self.rows as i64 - 1) as usize,
            col.clamp(0, self.cols as i64 - 1) as usize,
        )
    }
}

impl Default for GridSpec {
    fn default() -> Self {
        Self {
            rows: 1800,
            cols: 3600,
            res: 0.1,
        }
    }
}

impl fmt::Display for GridSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x{} at {}°", self.rows, self.cols, self.res)
    }
}

/// Row-major boolean land/water grid
#[derive(Debug, Clone, PartialEq)]
pub struct Grid {
    spec: GridSpec,
    cells: Vec<bool>,
}

impl Grid {
    /// An all-water grid
    pub fn new(spec: GridSpec) -> Self {
        Self {
            spec,
            cells: vec![false; spec.cell_count()],
        }
    }

    /// Wrap existing row-major cells. Returns `None` on a size mismatch.
    pub fn from_cells(spec: GridSpec, cells: Vec<bool>) -> Option<Self> {
        (cells.len() == spec.cell_count()).then_some(Self { spec, cells })
    }

    pub fn spec(&self) -> &GridSpec {
        &self.spec
    }

    pub fn rows(&self) -> usize {
        self.spec.rows
    }

    pub fn cols(&self) -> usize {
        self.spec.cols
    }

    pub fn get(&self, row: usize, col: usize) -> bool {
        self.cells[row * self.spec.cols + col]
    }

    /// Land/water value of the cell containing `(lat, lng)`
    pub fn lookup(&self, lat: f64, lng: f64) -> bool {
        let (row, col) = self.spec.cell_index(lat, lng);
        self.get(row, col)
    }

    /// All cells in row-major order
    pub fn cells(&self) -> &[bool] {
        &self.cells
    }

    pub(crate) fn cells_mut(&mut self) -> &mut [bool] {
        &mut self.cells
    }

    pub fn land_count(&self) -> usize {
        self.cells.iter().filter(|&&c| c).count()
    }
}
