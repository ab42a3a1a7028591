//! A terminal editor for binary cell patterns.
//!
//! A session paints a `W x H` grid of on/off cells with the keyboard and saves
//! the result into a JSON pattern store: one object mapping pattern names to
//! serialized matrices in one of four formats (see [`Format`]).
//!
//! Features and behaviors:
//! - Arrow keys move a clamped cursor; Space toggles the cell under it.
//! - Enter saves under the session name; `:` asks for a name first.
//! - The cursor is drawn in a different color over set and unset cells.
//! - Empty patterns and taken names are confirmed before saving.
//! - The store is rewritten through a temporary file and an atomic rename.
//!
//! Quick start:
//!
//! ```no_run
//! use bitpaint::{Format, Grid, Resolution, SavePrompt};
//!
//! struct AlwaysOverwrite;
//!
//! impl SavePrompt for AlwaysOverwrite {
//!     fn confirm_empty(&mut self) -> bool { false }
//!     fn resolve_conflict(&mut self, _name: &str) -> Resolution { Resolution::Overwrite }
//! }
//!
//! let mut grid = Grid::new(3, 3).expect("non-empty grid");
//! grid.toggle(1, 0).expect("inside the grid");
//! let saved = bitpaint::store::save("savedpresets.json", "dot", &grid.snapshot(), Format::ArrayOfInts, &mut AlwaysOverwrite)
//!     .expect("store should be writable");
//! println!("saved {saved}");
//! ```

pub mod bare;
pub mod cli_util;
pub mod commands;
pub mod config;
pub mod cursor;
pub mod format;
pub mod grid;
pub mod input;
pub mod prompt;
pub mod session;
pub mod store;
pub mod theme;
pub mod tui;

pub use cursor::{CellState, Cursor, Direction};
pub use format::{Format, FormatError};
pub use grid::{Grid, GridError, Matrix};
pub use input::Action;
pub use session::{Session, SessionEnd};
pub use store::{AbortReason, PatternStore, Resolution, SavePrompt, StoreError};
