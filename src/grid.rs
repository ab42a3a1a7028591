//! Fixed-size binary cell grid.
//!
//! The grid owns a `width * height` matrix of on/off cells stored as a flat
//! row-major buffer (`index = y * width + x`). Dimensions are fixed at
//! construction; the only mutation is [`Grid::toggle`].
//!
//! Quick start:
//!
//! ```
//! use bitpaint::Grid;
//!
//! let mut grid = Grid::new(3, 2).expect("non-empty grid");
//! grid.toggle(1, 0).expect("in bounds");
//! let rows: Vec<String> = grid.render("#", ".").collect();
//! assert_eq!(rows, vec![".#.".to_string(), "...".to_string()]);
//! ```

use std::iter::FusedIterator;

/// Errors raised by grid construction and cell access.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum GridError {
    /// Width or height was zero.
    #[error("grid dimensions must be positive (got {width}x{height})")]
    EmptyDimensions { width: usize, height: usize },

    /// Rows handed to [`Matrix::from_rows`] differ in length.
    #[error("row {row} has {found} cells, expected {expected}")]
    RaggedRows {
        row: usize,
        expected: usize,
        found: usize,
    },

    /// `width * height` cells do not fit in memory addressing.
    #[error("grid of {width}x{height} cells is too large")]
    TooLarge { width: usize, height: usize },

    /// A coordinate fell outside `[0, width) x [0, height)`.
    #[error("cell ({x}, {y}) is outside the {width}x{height} grid")]
    OutOfBounds {
        x: usize,
        y: usize,
        width: usize,
        height: usize,
    },
}

/// An owned, immutable copy of a grid's cells.
///
/// Produced by [`Grid::snapshot`] and by the format decoders; it never shares
/// storage with a live grid.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Matrix {
    width: usize,
    height: usize,
    cells: Vec<bool>,
}

impl Matrix {
    /// Build a matrix from rows indexed by `y`, each holding the `x` values.
    ///
    /// All rows must share the same non-zero length.
    pub fn from_rows(rows: Vec<Vec<bool>>) -> Result<Self, GridError> {
        let height = rows.len();
        let width = rows.first().map_or(0, Vec::len);
        if width == 0 || height == 0 {
            return Err(GridError::EmptyDimensions { width, height });
        }
        if let Some((row, r)) = rows.iter().enumerate().find(|(_, r)| r.len() != width) {
            return Err(GridError::RaggedRows {
                row,
                expected: width,
                found: r.len(),
            });
        }
        Ok(Self {
            width,
            height,
            cells: rows.into_iter().flatten().collect(),
        })
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    /// Value at `(x, y)`, or `None` outside the matrix.
    pub fn get(&self, x: usize, y: usize) -> Option<bool> {
        (x < self.width && y < self.height).then(|| self.cells[y * self.width + x])
    }

    /// Iterate rows in increasing `y`; each row yields cells in increasing `x`.
    pub fn rows(&self) -> impl Iterator<Item = &[bool]> + '_ {
        self.cells.chunks(self.width)
    }

    pub fn count_set(&self) -> usize {
        self.cells.iter().filter(|&&c| c).count()
    }

    pub fn is_empty(&self) -> bool {
        self.count_set() == 0
    }
}

/// The editable on/off matrix.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Grid {
    width: usize,
    height: usize,
    cells: Vec<bool>,
}

impl Grid {
    /// Create a `width x height` grid with every cell off.
    pub fn new(width: usize, height: usize) -> Result<Self, GridError> {
        if width == 0 || height == 0 {
            return Err(GridError::EmptyDimensions { width, height });
        }
        let len = width
            .checked_mul(height)
            .filter(|&len| len <= isize::MAX as usize)
            .ok_or(GridError::TooLarge { width, height })?;
        Ok(Self {
            width,
            height,
            cells: vec![false; len],
        })
    }

    /// Create a grid holding a copy of `matrix`.
    pub fn from_matrix(matrix: &Matrix) -> Self {
        Self {
            width: matrix.width,
            height: matrix.height,
            cells: matrix.cells.clone(),
        }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    fn index(&self, x: usize, y: usize) -> Result<usize, GridError> {
        if x >= self.width || y >= self.height {
            return Err(GridError::OutOfBounds {
                x,
                y,
                width: self.width,
                height: self.height,
            });
        }
        Ok(y * self.width + x)
    }

    /// Flip the cell at `(x, y)` and return its new value.
    pub fn toggle(&mut self, x: usize, y: usize) -> Result<bool, GridError> {
        let idx = self.index(x, y)?;
        self.cells[idx] = !self.cells[idx];
        Ok(self.cells[idx])
    }

    pub fn is_set(&self, x: usize, y: usize) -> Result<bool, GridError> {
        let idx = self.index(x, y)?;
        Ok(self.cells[idx])
    }

    /// Number of cells currently on.
    pub fn count_set(&self) -> usize {
        self.cells.iter().filter(|&&c| c).count()
    }

    /// Lazily render the grid as `height` strings of `width` glyphs each.
    ///
    /// Rows come out in increasing `y`, glyphs within a row in increasing `x`.
    /// The returned iterator is `Clone`, so a render can be restarted from
    /// any point without touching the grid.
    pub fn render<'a>(&'a self, on_glyph: &'a str, off_glyph: &'a str) -> Render<'a> {
        Render {
            grid: self,
            on_glyph,
            off_glyph,
            next_row: 0,
        }
    }

    /// Copy the current cells out into an independent [`Matrix`].
    pub fn snapshot(&self) -> Matrix {
        Matrix {
            width: self.width,
            height: self.height,
            cells: self.cells.clone(),
        }
    }
}

/// Row iterator returned by [`Grid::render`].
#[derive(Debug, Clone)]
pub struct Render<'a> {
    grid: &'a Grid,
    on_glyph: &'a str,
    off_glyph: &'a str,
    next_row: usize,
}

impl Iterator for Render<'_> {
    type Item = String;

    fn next(&mut self) -> Option<Self::Item> {
        if self.next_row >= self.grid.height {
            return None;
        }
        let start = self.next_row * self.grid.width;
        let row = &self.grid.cells[start..start + self.grid.width];
        self.next_row += 1;

        let mut line = String::with_capacity(
            self.grid.width * self.on_glyph.len().max(self.off_glyph.len()),
        );
        for &cell in row {
            line.push_str(if cell { self.on_glyph } else { self.off_glyph });
        }
        Some(line)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.grid.height - self.next_row;
        (remaining, Some(remaining))
    }
}

impl ExactSizeIterator for Render<'_> {}
impl FusedIterator for Render<'_> {}
