//! Key-to-action mapping.
//!
//! Key contract:
//! - Arrow keys move the cursor one cell.
//! - Space toggles the cell under the cursor.
//! - Enter ends the session and saves under the active name.
//! - `:` ends the session and asks for a name before saving.
//! - Everything else is ignored.

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use crate::cursor::Direction;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    MoveUp,
    MoveDown,
    MoveLeft,
    MoveRight,
    ToggleCell,
    Confirm,
    StartSave,
    NoOp,
}

impl Action {
    pub fn direction(self) -> Option<Direction> {
        match self {
            Action::MoveUp => Some(Direction::Up),
            Action::MoveDown => Some(Direction::Down),
            Action::MoveLeft => Some(Direction::Left),
            Action::MoveRight => Some(Direction::Right),
            _ => None,
        }
    }

    /// `Confirm` and `StartSave` end the editing loop.
    pub fn ends_session(self) -> bool {
        matches!(self, Action::Confirm | Action::StartSave)
    }
}

/// Map a key event to an [`Action`]. Total: unknown keys are `NoOp`.
pub fn action_for(key: &KeyEvent) -> Action {
    // Ctrl/Alt combinations never edit.
    if key
        .modifiers
        .intersects(KeyModifiers::CONTROL | KeyModifiers::ALT)
    {
        return Action::NoOp;
    }
    match key.code {
        KeyCode::Up => Action::MoveUp,
        KeyCode::Down => Action::MoveDown,
        KeyCode::Left => Action::MoveLeft,
        KeyCode::Right => Action::MoveRight,
        KeyCode::Char(' ') => Action::ToggleCell,
        KeyCode::Enter => Action::Confirm,
        KeyCode::Char(':') => Action::StartSave,
        _ => Action::NoOp,
    }
}

/// Translate a bare-mode token (`up`, `toggle`, `enter`, ...) into the key it
/// stands for. Unknown tokens become `None`.
pub fn key_for_token(token: &str) -> Option<KeyEvent> {
    let code = match token.to_ascii_lowercase().as_str() {
        "up" => KeyCode::Up,
        "down" => KeyCode::Down,
        "left" => KeyCode::Left,
        "right" => KeyCode::Right,
        "toggle" | "space" => KeyCode::Char(' '),
        "enter" | "confirm" => KeyCode::Enter,
        "save" | ":" => KeyCode::Char(':'),
        _ => return None,
    };
    Some(KeyEvent::new(code, KeyModifiers::NONE))
}

/// Short printable name for a key code, shown in the status line.
pub fn describe_key(code: &KeyCode) -> String {
    match code {
        KeyCode::Char(' ') => "Space".to_string(),
        KeyCode::Char(c) => c.to_string(),
        KeyCode::F(n) => format!("F{n}"),
        other => format!("{other:?}"),
    }
}
