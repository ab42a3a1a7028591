//! The editing session: one grid, one cursor, and the name/format the result
//! will be saved under.

use crossterm::event::{KeyCode, KeyEvent};

use crate::cursor::{CellState, Cursor};
use crate::format::Format;
use crate::grid::{Grid, Matrix};
use crate::input::{self, Action};

/// How an editing loop ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionEnd {
    /// Enter: save under the session name.
    Confirmed,
    /// `:`: ask for a name, then save.
    SaveAs,
    /// Ctrl+C or end of input: nothing is saved.
    Interrupted,
}

impl SessionEnd {
    pub fn from_action(action: Action) -> Option<Self> {
        match action {
            Action::Confirm => Some(SessionEnd::Confirmed),
            Action::StartSave => Some(SessionEnd::SaveAs),
            _ => None,
        }
    }
}

#[derive(Debug, Clone)]
pub struct Session {
    name: String,
    format: Format,
    grid: Grid,
    cursor: Cursor,
    last_key: Option<KeyCode>,
}

impl Session {
    /// Start a session on `grid`, cursor at the top-left cell.
    pub fn new(name: impl Into<String>, format: Format, grid: Grid) -> Self {
        let mut cursor = Cursor::new(grid.width(), grid.height());
        cursor.refresh(&grid);
        Self {
            name: name.into(),
            format,
            grid,
            cursor,
            last_key: None,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn format(&self) -> Format {
        self.format
    }

    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    pub fn cursor(&self) -> &Cursor {
        &self.cursor
    }

    pub fn cell_state(&self) -> CellState {
        self.cursor.state()
    }

    pub fn last_key(&self) -> Option<&KeyCode> {
        self.last_key.as_ref()
    }

    /// Map `key` to an action and apply it.
    ///
    /// Moves are clamped to the grid; a toggle flips the cell under the
    /// cursor. The cursor's display state is recomputed whenever the cell
    /// under it may have changed. Session-ending actions are returned
    /// unapplied for the caller to act on.
    pub fn handle_key(&mut self, key: &KeyEvent) -> Action {
        self.last_key = Some(key.code);
        let action = input::action_for(key);
        match action {
            Action::ToggleCell => {
                let (x, y) = self.cursor.position();
                self.grid
                    .toggle(x, y)
                    .expect("cursor is clamped inside the grid");
                self.cursor.refresh(&self.grid);
            }
            other => {
                if let Some(dir) = other.direction() {
                    if self.cursor.step(dir) {
                        self.cursor.refresh(&self.grid);
                    }
                }
            }
        }
        action
    }

    /// Snapshot of the grid for saving.
    pub fn matrix(&self) -> Matrix {
        self.grid.snapshot()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::KeyModifiers;

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn session(w: usize, h: usize) -> Session {
        Session::new("test", Format::ArrayOfInts, Grid::new(w, h).unwrap())
    }

    #[test]
    fn toggle_applies_at_cursor_and_updates_state() {
        let mut s = session(3, 3);
        s.handle_key(&key(KeyCode::Right));
        s.handle_key(&key(KeyCode::Down));
        assert_eq!(s.handle_key(&key(KeyCode::Char(' '))), Action::ToggleCell);
        assert_eq!(s.grid().is_set(1, 1), Ok(true));
        assert_eq!(s.cell_state(), CellState::OnCell);

        s.handle_key(&key(KeyCode::Left));
        assert_eq!(s.cell_state(), CellState::OffCell);
        s.handle_key(&key(KeyCode::Right));
        assert_eq!(s.cell_state(), CellState::OnCell);
    }

    #[test]
    fn moves_into_walls_are_clamped() {
        let mut s = session(2, 2);
        for _ in 0..5 {
            s.handle_key(&key(KeyCode::Up));
            s.handle_key(&key(KeyCode::Left));
        }
        assert_eq!(s.cursor().position(), (0, 0));
        for _ in 0..5 {
            s.handle_key(&key(KeyCode::Down));
            s.handle_key(&key(KeyCode::Right));
        }
        assert_eq!(s.cursor().position(), (1, 1));
    }

    #[test]
    fn confirm_and_save_do_not_touch_the_grid() {
        let mut s = session(2, 2);
        assert_eq!(s.handle_key(&key(KeyCode::Enter)), Action::Confirm);
        assert_eq!(s.handle_key(&key(KeyCode::Char(':'))), Action::StartSave);
        assert_eq!(s.handle_key(&key(KeyCode::Char('x'))), Action::NoOp);
        assert_eq!(s.grid().count_set(), 0);
        assert_eq!(s.last_key(), Some(&KeyCode::Char('x')));
    }

    #[test]
    fn starting_on_a_set_cell_reports_on_state() {
        let mut grid = Grid::new(2, 1).unwrap();
        grid.toggle(0, 0).unwrap();
        let s = Session::new("open", Format::String, grid);
        assert_eq!(s.cell_state(), CellState::OnCell);
        assert_eq!(s.matrix().count_set(), 1);
    }
}
