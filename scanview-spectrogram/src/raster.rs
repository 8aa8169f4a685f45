/// Dense row-major matrix of levels where missing cells are masked.
///
/// Row 0 is the oldest retained position, the last row the newest sweep.
#[derive(Debug, Clone, PartialEq)]
pub struct Raster {
    rows: usize,
    cols: usize,
    cells: Vec<Option<f32>>,
}

impl Raster {
    /// A raster with every cell masked.
    pub fn masked(rows: usize, cols: usize) -> Self {
        Self {
            rows,
            cols,
            cells: vec![None; rows * cols],
        }
    }

    /// (rows, columns)
    pub fn shape(&self) -> (usize, usize) {
        (self.rows, self.cols)
    }

    pub fn get(&self, row: usize, col: usize) -> Option<f32> {
        if row >= self.rows || col >= self.cols {
            return None;
        }
        self.cells[row * self.cols + col]
    }

    /// Unmask a cell. Out of range writes are ignored.
    pub fn set(&mut self, row: usize, col: usize, value: f32) {
        if row < self.rows && col < self.cols {
            self.cells[row * self.cols + col] = Some(value);
        }
    }

    pub fn row(&self, row: usize) -> &[Option<f32>] {
        let start = row * self.cols;
        &self.cells[start..start + self.cols]
    }

    pub fn is_row_masked(&self, row: usize) -> bool {
        self.row(row).iter().all(Option::is_none)
    }

    /// Cells in row-major order.
    pub fn cells(&self) -> &[Option<f32>] {
        &self.cells
    }

    /// Smallest and largest unmasked value.
    pub fn value_range(&self) -> Option<(f32, f32)> {
        self.cells
            .iter()
            .flatten()
            .filter(|v| v.is_finite())
            .fold(None, |range, &v| match range {
                None => Some((v, v)),
                Some((lo, hi)) => Some((lo.min(v), hi.max(v))),
            })
    }
}

/// Where a raster sits in plot coordinates.
///
/// `y_bottom` is the newest capture time and `y_top` the oldest, so row 0
/// is placed at `y_top`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Extent {
    pub x_min: f64,
    pub x_max: f64,
    pub y_bottom: f64,
    pub y_top: f64,
}

impl Extent {
    /// `[x_min, x_max, y_bottom, y_top]`
    pub fn to_array(self) -> [f64; 4] {
        [self.x_min, self.x_max, self.y_bottom, self.y_top]
    }
}
