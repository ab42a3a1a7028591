//! Line-driven surface for pipes and scripts.
//!
//! Each whitespace-separated token on stdin is one key press: `up`, `down`,
//! `left`, `right`, `toggle` (or `space`), `enter` (or `confirm`) and `save`
//! (or `:`). Unknown tokens are ignored. Prompts are written to stderr so
//! stdout only carries the final grid.

use std::collections::VecDeque;
use std::io::{self, BufRead, Write};

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use crate::input;
use crate::prompt::LineInput;
use crate::session::{Session, SessionEnd};

pub struct BareTerminal<R: BufRead> {
    reader: R,
    pending: VecDeque<String>,
}

impl<R: BufRead> BareTerminal<R> {
    pub fn new(reader: R) -> Self {
        Self {
            reader,
            pending: VecDeque::new(),
        }
    }

    fn read_line(&mut self) -> io::Result<Option<String>> {
        let mut buf = String::new();
        let n = self.reader.read_line(&mut buf)?;
        if n == 0 {
            return Ok(None);
        }
        Ok(Some(buf.trim_end_matches(['\r', '\n']).to_string()))
    }

    /// Next key press, or `None` once input is exhausted.
    pub fn next_key(&mut self) -> io::Result<Option<KeyEvent>> {
        while self.pending.is_empty() {
            let Some(line) = self.read_line()? else {
                return Ok(None);
            };
            self.pending
                .extend(line.split_whitespace().map(str::to_string));
        }
        let token = self.pending.pop_front().unwrap_or_default();
        Ok(Some(input::key_for_token(&token).unwrap_or_else(|| {
            log::debug!("ignoring unknown token '{token}'");
            KeyEvent::new(KeyCode::Null, KeyModifiers::NONE)
        })))
    }
}

impl<R: BufRead> LineInput for BareTerminal<R> {
    fn ask(&mut self, question: &str) -> io::Result<Option<String>> {
        eprintln!("{question}");
        let _ = io::stderr().flush();
        // Answers start on a fresh line; leftover key tokens are dropped.
        if !self.pending.is_empty() {
            log::debug!("dropping {} unread token(s)", self.pending.len());
            self.pending.clear();
        }
        self.read_line()
    }
}

/// Feed key tokens into `session` until a session-ending key or EOF.
pub fn run<R: BufRead>(session: &mut Session, term: &mut BareTerminal<R>) -> io::Result<SessionEnd> {
    while let Some(key) = term.next_key()? {
        let action = session.handle_key(&key);
        log::trace!("{:?} -> {action:?}", key.code);
        if let Some(end) = SessionEnd::from_action(action) {
            return Ok(end);
        }
    }
    Ok(SessionEnd::Interrupted)
}
