use std::io::{self, StdinLock, Write};
use std::path::PathBuf;

use clap::Args;

use crate::bare::{self, BareTerminal};
use crate::cli_util::{report_error, report_notice, report_store_error, report_success};
use crate::config::Config;
use crate::format::Format;
use crate::grid::Grid;
use crate::prompt::{self, EditorInput, InputMode, LineInput, ModeFlagOverride, Prompter, select_mode};
use crate::session::{Session, SessionEnd};
use crate::store::{self, PatternStore};
use crate::tui;

/// Exit code for an interrupted session (128 + SIGINT).
pub const EXIT_INTERRUPTED: i32 = 130;

#[derive(Args, Debug)]
#[command(disable_help_flag = true)]
pub struct EditArgs {
    /// Pattern name to save under (and to load with --open)
    #[arg(value_name = "NAME", default_value = "default")]
    pub name: String,

    /// Serialization format: ai, as, s or i
    #[arg(value_name = "FORMAT", default_value = "ai")]
    pub format: String,

    /// Pattern store file (fallback BITPAINT_STORE, then the config file)
    #[arg(short = 's', long = "store", value_name = "PATH")]
    pub store: Option<PathBuf>,

    /// Grid size as <width>,<height>; skips the size prompt. With --open it
    /// gives the width of a pattern stored as 'i'
    #[arg(short = 'd', long = "size", value_name = "W,H")]
    pub size: Option<String>,

    /// Start from the stored pattern NAME instead of a blank grid
    #[arg(short = 'o', long = "open")]
    pub open: bool,

    /// Create the store file if it does not exist
    #[arg(long = "create")]
    pub create: bool,

    /// Force non-interactive bare mode
    #[arg(long = "bare", conflicts_with = "editor")]
    pub bare: bool,

    /// Force interactive editor mode (errors if stdin is not a TTY)
    #[arg(long = "editor", conflicts_with = "bare")]
    pub editor: bool,

    /// Show this help
    #[arg(short = 'h', long = "help", action = clap::ArgAction::SetTrue)]
    pub help: bool,
}

impl EditArgs {
    fn mode_flag(&self) -> ModeFlagOverride {
        if self.bare {
            ModeFlagOverride::Bare
        } else if self.editor {
            ModeFlagOverride::Editor
        } else {
            ModeFlagOverride::None
        }
    }
}

/// The front end a session runs on. Both double as the line input for the
/// size, name and save prompts.
enum Surface {
    Editor(EditorInput),
    Bare(BareTerminal<StdinLock<'static>>),
}

impl Surface {
    fn input(&mut self) -> &mut dyn LineInput {
        match self {
            Surface::Editor(input) => input,
            Surface::Bare(term) => term,
        }
    }
}

pub fn run(program: &str, args: EditArgs) -> i32 {
    if args.help {
        usage_and_exit(program, 0);
    }

    let format: Format = match args.format.parse() {
        Ok(f) => f,
        Err(e) => {
            report_error(program, &format!("{e}"));
            usage_and_exit(program, 2);
        }
    };

    let size = match args.size.as_deref().map(prompt::parse_dimensions).transpose() {
        Ok(size) => size,
        Err(e) => {
            report_error(program, &format!("invalid --size: {e}"));
            usage_and_exit(program, 2);
        }
    };

    // Determine mode: flags -> env -> auto-detect via is_terminal()
    let mode = match select_mode(args.mode_flag()) {
        Ok(m) => m,
        Err(msg) => {
            report_error(program, &msg);
            return 1;
        }
    };

    if mode == InputMode::Bare {
        // Install SIGINT (ctrl+c) handler to flush and exit(130) immediately
        if let Err(e) = ctrlc::set_handler(|| {
            let _ = io::stdout().flush();
            let _ = io::stderr().flush();
            std::process::exit(EXIT_INTERRUPTED);
        }) {
            report_error(program, &format!("failed to set ctrl+c handler: {e}"));
            return 1;
        }
    }

    let config = Config::load();
    let store_path = config.store_path(args.store);
    let store = if args.create {
        PatternStore::create(&store_path)
    } else {
        PatternStore::load(&store_path)
    };
    let store = match store {
        Ok(s) => s,
        Err(e) => {
            report_store_error(program, &e);
            return 1;
        }
    };

    let mut surface = match mode {
        InputMode::Editor => Surface::Editor(EditorInput::new()),
        InputMode::Bare => Surface::Bare(BareTerminal::new(io::stdin().lock())),
    };

    let grid = if args.open {
        // `i` rows drop leading zeros, so only --size can restore their width.
        let stored_format = store.get(&args.name).and_then(Format::detect);
        if size.is_some() && stored_format.is_some_and(|f| f != Format::Integer) {
            report_error(program, "--size with --open only applies to patterns stored as 'i'");
            usage_and_exit(program, 2);
        }
        let matrix = match store.pattern(&args.name, size.map(|(width, _)| width)) {
            Ok(matrix) => matrix,
            Err(e) => {
                report_store_error(program, &e);
                return 1;
            }
        };
        if let Some((_, height)) = size {
            if matrix.height() != height {
                report_error(
                    program,
                    &format!("--size height {height} does not match the {} stored rows", matrix.height()),
                );
                return 2;
            }
        }
        Grid::from_matrix(&matrix)
    } else {
        let dims = match size {
            Some(dims) => dims,
            None => match prompt::ask_dimensions(surface.input()) {
                Ok(Some(dims)) => dims,
                Ok(None) => {
                    report_error(program, "no grid size given");
                    return 2;
                }
                Err(e) => {
                    report_error(program, &format!("failed reading the grid size: {e}"));
                    return 1;
                }
            },
        };
        match Grid::new(dims.0, dims.1) {
            Ok(g) => g,
            Err(e) => {
                report_error(program, &e.to_string());
                return 2;
            }
        }
    };

    if let Err(e) = format.check_width(grid.width()) {
        report_error(program, &e.to_string());
        return 2;
    }

    let mut session = Session::new(args.name, format, grid);
    log::debug!(
        "session '{}' started: {}x{} grid, format {format}",
        session.name(),
        session.grid().width(),
        session.grid().height()
    );

    let end = match &mut surface {
        Surface::Editor(_) => tui::run(&mut session, &config),
        Surface::Bare(term) => bare::run(&mut session, term),
    };
    let end = match end {
        Ok(end) => end,
        Err(e) => {
            report_error(program, &format!("terminal error: {e}"));
            return 1;
        }
    };
    log::debug!("session '{}' ended: {end:?}", session.name());

    if matches!(surface, Surface::Bare(_)) && end != SessionEnd::Interrupted {
        print_grid(&session);
    }

    let name = match end {
        SessionEnd::Interrupted => {
            report_notice(program, "interrupted, nothing saved");
            return EXIT_INTERRUPTED;
        }
        SessionEnd::Confirmed => session.name().to_string(),
        SessionEnd::SaveAs => match prompt::ask_name(surface.input(), session.name()) {
            Ok(Some(name)) => name,
            Ok(None) => {
                report_notice(program, "save aborted: no name given");
                return 0;
            }
            Err(e) => {
                report_error(program, &format!("failed reading the pattern name: {e}"));
                return 1;
            }
        },
    };

    let mut prompter = Prompter::new(surface.input());
    match store::save(store.path(), &name, &session.matrix(), format, &mut prompter) {
        Ok(saved) => {
            report_success(
                program,
                &format!("saved '{saved}' ({format}) to {}", store.path().display()),
            );
            0
        }
        Err(e) if e.is_abort() => {
            report_notice(program, &e.to_string());
            0
        }
        Err(e) => {
            report_store_error(program, &e);
            1
        }
    }
}

fn print_grid(session: &Session) {
    let mut stdout = io::stdout().lock();
    for row in session.grid().render("#", ".") {
        let _ = writeln!(stdout, "{row}");
    }
    let _ = stdout.flush();
}

pub fn usage_and_exit(program: &str, code: i32) -> ! {
    eprintln!(
        r#"Usage:
  {0} [OPTIONS] [NAME] [FORMAT]   # Paint a binary pattern and save it as NAME

Arguments:
  NAME    Pattern name (default: "default")
  FORMAT  ai (array of ints, default) | as (array of strings) | s (string) | i (integer)

Options:
  --store,  -s <PATH>  Pattern store file (fallback BITPAINT_STORE, then config, then ./savedpresets.json)
  --size,   -d <W,H>   Grid size; skips the size prompt (with --open: width of an 'i' pattern)
  --open,   -o         Start from the stored pattern NAME
  --create             Create the store file if it does not exist
  --bare               Force non-interactive bare mode
  --editor             Force interactive editor mode (errors if stdin is not a TTY)
  --help,   -h         Show this help

Keys:
  Arrows   Move the cursor
  Space    Toggle the cell under the cursor
  Enter    Save under NAME
  :        Save under a new name (asked after the editor closes)
  Ctrl+C   Quit without saving
  F1       Toggle the help overlay (editor mode)

Notes:
  - Bare mode reads key tokens from stdin: up down left right toggle enter save.
    Unknown tokens are ignored; the final grid is printed to stdout.
  - Mode selection:
      * Flags: --bare|--editor override environment and auto-detection.
      * Env: BITPAINT_MODE=bare|editor overrides auto-detection.
      * Auto-detect: if stdin is a TTY, starts the editor; otherwise, bare mode.
  - Config: bitpaint.toml in the user config directory (override with BITPAINT_CONFIG).
  - Logging: BITPAINT_LOG=debug

Exit codes:
  0 saved or aborted, 1 store error, 2 usage error, 130 interrupted
"#,
        program
    );
    let _ = io::stderr().flush();
    std::process::exit(code);
}
