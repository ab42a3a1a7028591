//! Line-oriented prompts: grid size, yes/no questions, name conflicts.
//!
//! Prompts read through a [`LineInput`], which is either a reedline editor
//! (interactive terminals) or plain buffered stdin (pipes, see
//! [`crate::bare`]). Selection between the two follows [`select_mode`].

use std::env;
use std::io::{self, IsTerminal, Write};

use reedline::{DefaultPrompt, DefaultPromptSegment, Reedline, Signal};

use crate::store::{Resolution, SavePrompt};
use crate::theme;

/// Source of answers for prompts.
pub trait LineInput {
    /// Show `question` and read one line of input, without its line ending.
    ///
    /// `Ok(None)` means the user closed the input (EOF, Ctrl+D or Ctrl+C).
    fn ask(&mut self, question: &str) -> io::Result<Option<String>>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputMode {
    Bare,
    Editor,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModeFlagOverride {
    None,
    Bare,
    Editor,
}

/// Pick the input mode: `--bare`/`--editor`, then `BITPAINT_MODE`, then
/// whether stdin is a terminal.
pub fn select_mode(flag: ModeFlagOverride) -> Result<InputMode, String> {
    let env_mode = env::var("BITPAINT_MODE").ok();
    resolve_mode(flag, env_mode.as_deref(), io::stdin().is_terminal())
}

fn resolve_mode(flag: ModeFlagOverride, env_mode: Option<&str>, stdin_tty: bool) -> Result<InputMode, String> {
    let requested = match flag {
        ModeFlagOverride::Bare => Some(InputMode::Bare),
        ModeFlagOverride::Editor => Some(InputMode::Editor),
        ModeFlagOverride::None => match env_mode {
            None => None,
            Some(val) => match val.trim().to_ascii_lowercase().as_str() {
                "bare" => Some(InputMode::Bare),
                "editor" => Some(InputMode::Editor),
                _ => return Err(format!("invalid BITPAINT_MODE value: {val}, must be 'bare' or 'editor'")),
            },
        },
    };

    match requested {
        Some(InputMode::Editor) if !stdin_tty => {
            Err("cannot start editor: stdin is not a TTY (use --bare or BITPAINT_MODE=bare)".to_string())
        }
        Some(mode) => Ok(mode),
        None if stdin_tty => Ok(InputMode::Editor),
        None => Ok(InputMode::Bare),
    }
}

/// Interactive prompts backed by reedline.
pub struct EditorInput {
    editor: Reedline,
}

impl EditorInput {
    pub fn new() -> Self {
        Self {
            editor: Reedline::create(),
        }
    }
}

impl Default for EditorInput {
    fn default() -> Self {
        Self::new()
    }
}

impl LineInput for EditorInput {
    fn ask(&mut self, question: &str) -> io::Result<Option<String>> {
        let styles = if io::stderr().is_terminal() { theme::mocha() } else { theme::plain() };
        eprintln!("{}", styles.question.paint(question));
        let _ = io::stderr().flush();

        let prompt = DefaultPrompt::new(
            DefaultPromptSegment::Basic("bitpaint".to_string()),
            DefaultPromptSegment::Empty,
        );
        match self.editor.read_line(&prompt)? {
            Signal::Success(line) => Ok(Some(line.trim_end_matches(['\r', '\n']).to_string())),
            Signal::CtrlC | Signal::CtrlD => Ok(None),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DimensionError {
    #[error("expected <width>,<height>, got '{0}'")]
    Syntax(String),
    #[error("'{0}' is not a positive whole number")]
    NotPositive(String),
}

/// Parse a `"<width>,<height>"` answer.
pub fn parse_dimensions(s: &str) -> Result<(usize, usize), DimensionError> {
    let (w, h) = s
        .trim()
        .split_once(',')
        .ok_or_else(|| DimensionError::Syntax(s.trim().to_string()))?;
    let dim = |part: &str| {
        let part = part.trim();
        match part.parse::<usize>() {
            Ok(n) if n > 0 => Ok(n),
            _ => Err(DimensionError::NotPositive(part.to_string())),
        }
    };
    Ok((dim(w)?, dim(h)?))
}

/// Ask for grid dimensions until a valid answer arrives. `None` on EOF.
pub fn ask_dimensions(input: &mut dyn LineInput) -> io::Result<Option<(usize, usize)>> {
    loop {
        let Some(answer) = input.ask("Grid size as <width>,<height>:")? else {
            return Ok(None);
        };
        match parse_dimensions(&answer) {
            Ok(dims) => return Ok(Some(dims)),
            Err(e) => eprintln!("{e}"),
        }
    }
}

/// Ask a yes/no question; only y/yes/n/no are accepted. EOF means no.
pub fn ask_yes_no(input: &mut dyn LineInput, question: &str) -> io::Result<bool> {
    let question = format!("{question} [y/n]");
    loop {
        let Some(answer) = input.ask(&question)? else {
            return Ok(false);
        };
        match answer.trim().to_ascii_lowercase().as_str() {
            "y" | "yes" => return Ok(true),
            "n" | "no" => return Ok(false),
            _ => eprintln!("please answer y or n"),
        }
    }
}

/// Ask for a pattern name; an empty answer keeps `default`. `None` on EOF.
pub fn ask_name(input: &mut dyn LineInput, default: &str) -> io::Result<Option<String>> {
    let answer = input.ask(&format!("Save as (empty keeps '{default}'):"))?;
    Ok(answer.map(|a| {
        let a = a.trim();
        if a.is_empty() { default.to_string() } else { a.to_string() }
    }))
}

/// [`SavePrompt`] that asks the user through a [`LineInput`].
pub struct Prompter<'a> {
    input: &'a mut dyn LineInput,
}

impl<'a> Prompter<'a> {
    pub fn new(input: &'a mut dyn LineInput) -> Self {
        Self { input }
    }

    fn ask_new_name(&mut self) -> Option<String> {
        loop {
            match self.input.ask("New name:") {
                Ok(Some(name)) if !name.trim().is_empty() => return Some(name.trim().to_string()),
                Ok(Some(_)) => eprintln!("the name cannot be empty"),
                Ok(None) => return None,
                Err(e) => {
                    log::warn!("prompt failed: {e}");
                    return None;
                }
            }
        }
    }
}

impl SavePrompt for Prompter<'_> {
    fn confirm_empty(&mut self) -> bool {
        ask_yes_no(self.input, "The pattern has no set cells. Save it anyway?").unwrap_or_else(|e| {
            log::warn!("prompt failed: {e}");
            false
        })
    }

    fn resolve_conflict(&mut self, name: &str) -> Resolution {
        let question = format!("Pattern '{name}' already exists: [o]verwrite, [r]ename or [a]bort?");
        loop {
            let answer = match self.input.ask(&question) {
                Ok(Some(a)) => a,
                Ok(None) => return Resolution::Abort,
                Err(e) => {
                    log::warn!("prompt failed: {e}");
                    return Resolution::Abort;
                }
            };
            match answer.trim().to_ascii_lowercase().as_str() {
                "o" | "overwrite" => return Resolution::Overwrite,
                "a" | "abort" => return Resolution::Abort,
                "r" | "rename" => {
                    return match self.ask_new_name() {
                        Some(new_name) => Resolution::RenameTo(new_name),
                        None => Resolution::Abort,
                    };
                }
                _ => eprintln!("please answer o, r or a"),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::VecDeque;

    /// Canned answers; `None` entries and running out both mean EOF.
    struct Answers {
        lines: VecDeque<Option<&'static str>>,
        asked: Vec<String>,
    }

    impl Answers {
        fn new(lines: &[Option<&'static str>]) -> Self {
            Self {
                lines: lines.iter().copied().collect(),
                asked: Vec::new(),
            }
        }
    }

    impl LineInput for Answers {
        fn ask(&mut self, question: &str) -> io::Result<Option<String>> {
            self.asked.push(question.to_string());
            Ok(self.lines.pop_front().flatten().map(str::to_string))
        }
    }

    #[test]
    fn flags_beat_environment_and_detection() {
        assert_eq!(resolve_mode(ModeFlagOverride::Bare, Some("editor"), true), Ok(InputMode::Bare));
        assert_eq!(resolve_mode(ModeFlagOverride::Editor, None, true), Ok(InputMode::Editor));
        assert!(resolve_mode(ModeFlagOverride::Editor, None, false).unwrap_err().contains("not a TTY"));
    }

    #[test]
    fn environment_beats_detection() {
        assert_eq!(resolve_mode(ModeFlagOverride::None, Some(" Bare "), true), Ok(InputMode::Bare));
        assert!(resolve_mode(ModeFlagOverride::None, Some("editor"), false).is_err());
        assert!(resolve_mode(ModeFlagOverride::None, Some("fancy"), true).unwrap_err().contains("fancy"));
    }

    #[test]
    fn detection_follows_stdin() {
        assert_eq!(resolve_mode(ModeFlagOverride::None, None, true), Ok(InputMode::Editor));
        assert_eq!(resolve_mode(ModeFlagOverride::None, None, false), Ok(InputMode::Bare));
    }

    #[test]
    fn dimensions_parse_with_whitespace() {
        assert_eq!(parse_dimensions("20,10"), Ok((20, 10)));
        assert_eq!(parse_dimensions(" 3 , 4 \n"), Ok((3, 4)));
    }

    #[test]
    fn bad_dimensions_are_rejected() {
        assert!(matches!(parse_dimensions("20x10"), Err(DimensionError::Syntax(_))));
        assert!(matches!(parse_dimensions("0,5"), Err(DimensionError::NotPositive(_))));
        assert!(matches!(parse_dimensions("5,-1"), Err(DimensionError::NotPositive(_))));
        assert!(matches!(parse_dimensions("a,b"), Err(DimensionError::NotPositive(_))));
    }

    #[test]
    fn dimension_prompt_reasks_until_valid() {
        let mut input = Answers::new(&[Some("nope"), Some("0,1"), Some("4,2")]);
        assert_eq!(ask_dimensions(&mut input).unwrap(), Some((4, 2)));
        assert_eq!(input.asked.len(), 3);
    }

    #[test]
    fn dimension_prompt_eof_is_none() {
        let mut input = Answers::new(&[]);
        assert_eq!(ask_dimensions(&mut input).unwrap(), None);
    }

    #[test]
    fn yes_no_only_accepts_yes_or_no() {
        let mut input = Answers::new(&[Some("maybe"), Some(""), Some("YES")]);
        assert!(ask_yes_no(&mut input, "Save?").unwrap());
        assert_eq!(input.asked.len(), 3);

        let mut input = Answers::new(&[Some("n")]);
        assert!(!ask_yes_no(&mut input, "Save?").unwrap());

        let mut input = Answers::new(&[None]);
        assert!(!ask_yes_no(&mut input, "Save?").unwrap());
    }

    #[test]
    fn empty_name_answer_keeps_default() {
        let mut input = Answers::new(&[Some("  ")]);
        assert_eq!(ask_name(&mut input, "default").unwrap().as_deref(), Some("default"));
        let mut input = Answers::new(&[Some("glider ")]);
        assert_eq!(ask_name(&mut input, "default").unwrap().as_deref(), Some("glider"));
        let mut input = Answers::new(&[]);
        assert_eq!(ask_name(&mut input, "default").unwrap(), None);
    }

    #[test]
    fn conflict_prompt_resolutions() {
        let mut input = Answers::new(&[Some("x"), Some("O")]);
        assert_eq!(Prompter::new(&mut input).resolve_conflict("g"), Resolution::Overwrite);

        let mut input = Answers::new(&[Some("r"), Some(""), Some("glider2")]);
        assert_eq!(
            Prompter::new(&mut input).resolve_conflict("glider"),
            Resolution::RenameTo("glider2".to_string())
        );
        assert_eq!(input.asked.len(), 3);

        let mut input = Answers::new(&[Some("abort")]);
        assert_eq!(Prompter::new(&mut input).resolve_conflict("g"), Resolution::Abort);

        let mut input = Answers::new(&[Some("rename")]);
        assert_eq!(Prompter::new(&mut input).resolve_conflict("g"), Resolution::Abort);
    }

    #[test]
    fn empty_confirmation_goes_through_yes_no() {
        let mut input = Answers::new(&[Some("y")]);
        assert!(Prompter::new(&mut input).confirm_empty());
        assert!(input.asked[0].ends_with("[y/n]"));

        let mut input = Answers::new(&[]);
        assert!(!Prompter::new(&mut input).confirm_empty());
    }
}
