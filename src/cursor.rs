//! Cursor position and derived display state.
//!
//! The cursor always sits inside the grid: every step is clamped to
//! `[0, width) x [0, height)`, and stepping into a wall leaves that axis
//! unchanged.

use crate::grid::Grid;

/// One-cell movement directions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

/// Whether the cell under the cursor is on or off. Drives the cursor color.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CellState {
    OnCell,
    #[default]
    OffCell,
}

impl CellState {
    pub fn from_cell(set: bool) -> Self {
        if set { CellState::OnCell } else { CellState::OffCell }
    }

    pub fn label(self) -> &'static str {
        match self {
            CellState::OnCell => "on",
            CellState::OffCell => "off",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Cursor {
    x: usize,
    y: usize,
    width: usize,
    height: usize,
    state: CellState,
}

impl Cursor {
    /// Place a cursor at the top-left cell of a `width x height` grid.
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            x: 0,
            y: 0,
            width: width.max(1),
            height: height.max(1),
            state: CellState::OffCell,
        }
    }

    pub fn position(&self) -> (usize, usize) {
        (self.x, self.y)
    }

    pub fn state(&self) -> CellState {
        self.state
    }

    /// Move one cell in `dir`, clamped to the grid. Returns `true` if the
    /// position changed.
    pub fn step(&mut self, dir: Direction) -> bool {
        let before = (self.x, self.y);
        match dir {
            Direction::Up => self.y = self.y.saturating_sub(1),
            Direction::Down => self.y = (self.y + 1).min(self.height - 1),
            Direction::Left => self.x = self.x.saturating_sub(1),
            Direction::Right => self.x = (self.x + 1).min(self.width - 1),
        }
        before != (self.x, self.y)
    }

    /// Recompute the display state from the cell under the cursor.
    pub fn refresh(&mut self, grid: &Grid) {
        let set = grid
            .is_set(self.x, self.y)
            .expect("cursor is clamped inside the grid");
        self.state = CellState::from_cell(set);
    }
}
