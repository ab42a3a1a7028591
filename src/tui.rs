use std::io;

use crossterm::{
    event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    backend::{Backend, CrosstermBackend},
    layout::{Constraint, Direction, Layout, Rect},
    style::{Style, Stylize},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Wrap},
    Frame, Terminal,
};

use crate::config::Config;
use crate::cursor::CellState;
use crate::input::describe_key;
use crate::session::{Session, SessionEnd};

/// Scroll offsets and overlay state; the grid itself lives in the session.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct View {
    pub show_help: bool,
    pub scroll_x: usize,
    pub scroll_y: usize,
}

pub fn run(session: &mut Session, config: &Config) -> io::Result<SessionEnd> {
    // terminal setup
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;
    terminal.clear()?;

    let res = run_app(&mut terminal, session, config, event::read);

    // restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    res
}

/// Draw and dispatch events until the session ends.
pub fn run_app<B: Backend>(
    terminal: &mut Terminal<B>,
    session: &mut Session,
    config: &Config,
    mut next_event: impl FnMut() -> io::Result<Event>,
) -> io::Result<SessionEnd> {
    let mut view = View::default();

    loop {
        terminal.draw(|f| ui(f, session, config, &mut view))?;

        let Event::Key(key) = next_event()? else {
            // Resize and focus events only need a redraw.
            continue;
        };
        if key.kind != KeyEventKind::Press {
            continue;
        }
        if let Some(end) = handle_key(session, &mut view, key) {
            log::debug!("editor loop ended: {end:?}");
            return Ok(end);
        }
    }
}

fn handle_key(session: &mut Session, view: &mut View, key: KeyEvent) -> Option<SessionEnd> {
    if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
        return Some(SessionEnd::Interrupted);
    }
    match key.code {
        KeyCode::F(1) => {
            view.show_help = !view.show_help;
            None
        }
        KeyCode::Esc => {
            view.show_help = false;
            None
        }
        _ => SessionEnd::from_action(session.handle_key(&key)),
    }
}

/// Smallest change to `offset` that keeps `cursor` inside a window of
/// `visible` cells.
pub fn scroll_to_cursor(offset: usize, cursor: usize, visible: usize) -> usize {
    if visible == 0 {
        offset
    } else if cursor < offset {
        cursor
    } else if cursor >= offset + visible {
        cursor + 1 - visible
    } else {
        offset
    }
}

fn ui(f: &mut Frame, session: &Session, config: &Config, view: &mut View) {
    let size = f.area();

    // Root: vertical layout -> grid + status bar
    let root = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(3), Constraint::Length(1)].as_ref())
        .split(size);

    draw_grid(f, root[0], session, config, view);
    draw_status(f, root[1], session, config);

    if view.show_help {
        draw_help_overlay(f, size, config);
    }
}

fn draw_grid(f: &mut Frame, area: Rect, session: &Session, config: &Config, view: &mut View) {
    let colors = &config.colors;
    let block = Block::default()
        .title(Span::styled(
            format!("{} [{}]", session.name(), session.format()),
            Style::default().fg(colors.border).bold(),
        ))
        .borders(Borders::ALL)
        .border_style(Style::default().fg(colors.border));
    let inner = block.inner(area);
    f.render_widget(block, area);

    let cell_width = config.glyphs.cell_width();
    let (on, off) = config.glyphs.padded();
    let grid = session.grid();
    let visible_cols = (inner.width as usize / cell_width).min(grid.width());
    let visible_rows = (inner.height as usize).min(grid.height());

    let (cx, cy) = session.cursor().position();
    view.scroll_x = scroll_to_cursor(view.scroll_x, cx, visible_cols);
    view.scroll_y = scroll_to_cursor(view.scroll_y, cy, visible_rows);

    let on_style = Style::default().fg(colors.cell_on);
    let lines: Vec<Line> = (view.scroll_y..view.scroll_y + visible_rows)
        .map(|y| {
            let spans: Vec<Span> = (view.scroll_x..view.scroll_x + visible_cols)
                .map(|x| match grid.is_set(x, y) {
                    Ok(true) => Span::styled(on.clone(), on_style),
                    _ => Span::raw(off.clone()),
                })
                .collect();
            Line::from(spans)
        })
        .collect();
    f.render_widget(Paragraph::new(lines), inner);

    if visible_cols == 0 || visible_rows == 0 {
        return;
    }
    let cursor_color = match session.cell_state() {
        CellState::OnCell => colors.cursor_on,
        CellState::OffCell => colors.cursor_off,
    };
    let cursor_rect = Rect {
        x: inner.x + ((cx - view.scroll_x) * cell_width) as u16,
        y: inner.y + (cy - view.scroll_y) as u16,
        width: cell_width as u16,
        height: 1,
    }
    .intersection(inner);
    f.buffer_mut()
        .set_style(cursor_rect, Style::default().fg(cursor_color).bg(cursor_color));
}

fn draw_status(f: &mut Frame, area: Rect, session: &Session, config: &Config) {
    let (x, y) = session.cursor().position();
    let key = session
        .last_key()
        .map(describe_key)
        .unwrap_or_else(|| "-".to_string());
    let status = format!(
        " {x:03} | {y:03} | {} | set: {} | key: {key} ",
        session.cell_state().label(),
        session.grid().count_set(),
    );
    let line = Line::from(vec![
        Span::styled(status, Style::default().fg(config.colors.status_text)),
        Span::styled(
            "| Space toggle, Enter save, : save as, F1 help",
            Style::default().fg(config.colors.help_hint),
        ),
    ]);
    f.render_widget(Paragraph::new(line), area);
}

fn draw_help_overlay(f: &mut Frame, area: Rect, config: &Config) {
    let block = Block::default()
        .title("Help")
        .borders(Borders::ALL)
        .border_style(Style::default().fg(config.colors.border));

    let w = area.width.saturating_sub(area.width / 4);
    let h = area.height.saturating_sub(area.height / 3);
    let x = area.x + (area.width - w) / 2;
    let y = area.y + (area.height - h) / 2;
    let rect = Rect { x, y, width: w, height: h };
    f.render_widget(Clear, rect);
    f.render_widget(block, rect);

    let text = vec![
        Line::raw("Arrows: Move the cursor"),
        Line::raw("Space: Toggle the cell under the cursor"),
        Line::raw("Enter: Save under the current name"),
        Line::raw(":  Save under a new name"),
        Line::raw("Ctrl+C: Quit without saving"),
        Line::raw("F1: Toggle this help  Esc: Close it"),
    ];
    let inner = Rect {
        x: rect.x + 2,
        y: rect.y + 1,
        width: rect.width.saturating_sub(4),
        height: rect.height.saturating_sub(2),
    };
    f.render_widget(
        Paragraph::new(text)
            .style(Style::default().fg(config.colors.help_hint))
            .wrap(Wrap { trim: false }),
        inner,
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Glyphs;
    use crate::format::Format;
    use crate::grid::Grid;
    use ratatui::backend::TestBackend;
    use ratatui::style::Color;

    fn press(code: KeyCode) -> io::Result<Event> {
        Ok(Event::Key(KeyEvent::new(code, KeyModifiers::NONE)))
    }

    fn ascii_config() -> Config {
        Config {
            glyphs: Glyphs { on: "#".to_string(), off: ".".to_string() },
            ..Config::default()
        }
    }

    fn drive(session: &mut Session, width: u16, height: u16, events: Vec<io::Result<Event>>) -> (SessionEnd, Terminal<TestBackend>) {
        let mut terminal = Terminal::new(TestBackend::new(width, height)).unwrap();
        let mut events = events.into_iter();
        let end = run_app(&mut terminal, session, &ascii_config(), || {
            events.next().unwrap_or_else(|| Err(io::Error::other("no more events")))
        })
        .unwrap();
        (end, terminal)
    }

    #[test]
    fn enter_confirms_after_edits() {
        let mut s = Session::new("glider", Format::ArrayOfInts, Grid::new(3, 2).unwrap());
        let (end, terminal) = drive(
            &mut s,
            30,
            6,
            vec![press(KeyCode::Right), press(KeyCode::Char(' ')), press(KeyCode::Enter)],
        );
        assert_eq!(end, SessionEnd::Confirmed);
        assert_eq!(s.grid().is_set(1, 0), Ok(true));

        // Last frame was drawn before Enter: cursor on the set cell at (1, 0).
        let buffer = terminal.backend().buffer();
        let on = buffer.cell((2, 1)).unwrap();
        assert_eq!(on.symbol(), "#");
        assert_eq!(on.bg, Color::Magenta);
        let off = buffer.cell((1, 1)).unwrap();
        assert_eq!(off.symbol(), ".");
        assert_eq!(off.bg, Color::Reset);
    }

    #[test]
    fn cursor_over_unset_cell_uses_the_off_color() {
        let mut s = Session::new("t", Format::String, Grid::new(2, 2).unwrap());
        let (end, terminal) = drive(&mut s, 20, 6, vec![press(KeyCode::Char(':'))]);
        assert_eq!(end, SessionEnd::SaveAs);
        assert_eq!(terminal.backend().buffer().cell((1, 1)).unwrap().bg, Color::Red);
    }

    #[test]
    fn ctrl_c_interrupts() {
        let mut s = Session::new("t", Format::String, Grid::new(2, 2).unwrap());
        let ctrl_c = Ok(Event::Key(KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL)));
        let (end, _) = drive(&mut s, 20, 6, vec![press(KeyCode::Char(' ')), ctrl_c]);
        assert_eq!(end, SessionEnd::Interrupted);
    }

    #[test]
    fn help_keys_do_not_reach_the_grid() {
        let mut s = Session::new("t", Format::String, Grid::new(2, 2).unwrap());
        let mut view = View::default();
        assert_eq!(handle_key(&mut s, &mut view, KeyEvent::new(KeyCode::F(1), KeyModifiers::NONE)), None);
        assert!(view.show_help);
        assert_eq!(handle_key(&mut s, &mut view, KeyEvent::new(KeyCode::Esc, KeyModifiers::NONE)), None);
        assert!(!view.show_help);
        assert!(s.last_key().is_none());
    }

    #[test]
    fn status_line_reports_position_and_count() {
        let mut s = Session::new("t", Format::String, Grid::new(4, 2).unwrap());
        let (_, terminal) = drive(
            &mut s,
            80,
            6,
            vec![press(KeyCode::Down), press(KeyCode::Char(' ')), press(KeyCode::Enter)],
        );
        let buffer = terminal.backend().buffer();
        let status: String = (0..80).map(|x| buffer.cell((x, 5)).unwrap().symbol()).collect();
        assert!(status.contains("000 | 001 | on | set: 1 | key: Space"), "{status}");
    }

    #[test]
    fn scrolling_follows_the_cursor() {
        assert_eq!(scroll_to_cursor(0, 3, 5), 0);
        assert_eq!(scroll_to_cursor(0, 7, 5), 3);
        assert_eq!(scroll_to_cursor(4, 2, 5), 2);
        assert_eq!(scroll_to_cursor(4, 9, 0), 4);
    }

    #[test]
    fn large_grids_scroll_to_keep_the_cursor_visible() {
        let mut s = Session::new("big", Format::ArrayOfInts, Grid::new(40, 3).unwrap());
        let mut events: Vec<io::Result<Event>> = (0..30).map(|_| press(KeyCode::Right)).collect();
        events.push(press(KeyCode::Enter));
        let (_, terminal) = drive(&mut s, 12, 6, events);
        // 10 visible columns: cursor at x=30 sits in the last one.
        let cell = terminal.backend().buffer().cell((10, 1)).unwrap();
        assert_eq!(cell.bg, Color::Red);
    }
}
