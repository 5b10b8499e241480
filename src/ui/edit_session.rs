//! Full-screen terminal implementation of the editing session.
//!
//! Runs on the alternate screen in raw mode, renders the widget through
//! [`GridWidget`], and speaks to the command editor only through the
//! [`EditSession`] trait — the selection algebra underneath is the same
//! code the tests drive headlessly.
//!
//! Interaction model: arrows move the cursor, Shift+arrows grow a
//! selection from an anchor, typing a printable character fills the
//! selection (or overwrites the cell under the cursor), Ctrl+z undoes,
//! Ctrl+s records the save point, Esc closes.  Only the save point is
//! ever handed back to the draft.

use std::io;
use std::time::Duration;

use crossterm::{
    event::{self, Event, KeyEvent, KeyEventKind, KeyModifiers},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    backend::CrosstermBackend,
    layout::Rect,
    widgets::{Block, Borders, Paragraph},
    Terminal,
};

use crate::app::session::{EditSession, SessionOutcome};
use crate::config::{Action, AppConfig};
use crate::core::grid::{self, Position, Selection};

use super::grid_widget::{GridWidget, GridWidgetState};
use super::theme::Theme;

/// Terminal-backed editing session.
pub struct TerminalSession<'a> {
    config: &'a AppConfig,
}

impl<'a> TerminalSession<'a> {
    pub fn new(config: &'a AppConfig) -> Self {
        Self { config }
    }
}

impl EditSession for TerminalSession<'_> {
    fn edit(&mut self, name: &str, lines: &[String]) -> anyhow::Result<SessionOutcome> {
        tracing::debug!(name, rows = lines.len(), "starting terminal editing session");

        // ── terminal setup ────────────────────────────────────
        enable_raw_mode()?;
        execute!(io::stdout(), EnterAlternateScreen)?;
        let backend = CrosstermBackend::new(io::stdout());
        let mut terminal = Terminal::new(backend)?;

        let mut state = SessionState::new(self.config, name, lines);
        let outcome = state.run(&mut terminal);

        // ── teardown (on success and on error alike) ──────────
        disable_raw_mode()?;
        execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
        terminal.show_cursor()?;

        tracing::debug!(name, saved = matches!(outcome, Ok(SessionOutcome::Saved(_))), "session closed");
        outcome
    }
}

// ───────────────────────────────────────── session state ─────

struct SessionState<'a> {
    config: &'a AppConfig,
    name: String,
    lines: Vec<String>,
    /// Declared width, fixed when the session starts.
    width: usize,
    /// Cursor as (0-indexed row, 0-indexed column).
    cursor: (usize, usize),
    /// Where the active selection started, if any.
    anchor: Option<(usize, usize)>,
    undo: Vec<Vec<String>>,
    /// The last explicitly saved grid — what the draft receives.
    saved: Option<Vec<String>>,
    dirty: bool,
    grid_state: GridWidgetState,
}

impl<'a> SessionState<'a> {
    fn new(config: &'a AppConfig, name: &str, lines: &[String]) -> Self {
        let width = lines.first().map_or(0, |l| l.chars().count());
        Self {
            config,
            name: name.to_string(),
            lines: lines.to_vec(),
            width,
            cursor: (0, 0),
            anchor: None,
            undo: Vec::new(),
            saved: None,
            dirty: false,
            grid_state: GridWidgetState::default(),
        }
    }

    fn run(
        &mut self,
        terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    ) -> anyhow::Result<SessionOutcome> {
        loop {
            self.draw(terminal)?;

            if !event::poll(Duration::from_millis(100))? {
                continue;
            }
            match event::read()? {
                Event::Key(key) if key.kind == KeyEventKind::Press => {
                    if self.handle_key(key) {
                        break;
                    }
                }
                _ => {}
            }
        }

        Ok(match self.saved.take() {
            Some(lines) => SessionOutcome::Saved(lines),
            None => SessionOutcome::Discarded,
        })
    }

    fn draw(
        &mut self,
        terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    ) -> anyhow::Result<()> {
        let title = format!(
            " {}{} — {}x{} ",
            self.name,
            if self.dirty { "*" } else { "" },
            self.width,
            self.lines.len(),
        );
        let title_style = if self.dirty {
            Theme::dirty_title_style()
        } else {
            Theme::title_style()
        };
        let selection = self.selection();
        let hint = self.config.status_bar_hint();

        terminal.draw(|frame| {
            let area = frame.area();
            let grid_area = Rect {
                height: area.height.saturating_sub(1),
                ..area
            };
            let status_area = Rect {
                y: area.y + area.height.saturating_sub(1),
                height: 1,
                ..area
            };

            let block = Block::default()
                .title(title.as_str())
                .title_style(title_style)
                .borders(Borders::ALL)
                .border_style(Theme::border_style());
            let grid = GridWidget::new(&self.lines, self.cursor, self.width)
                .selection(selection)
                .block(block);
            frame.render_stateful_widget(grid, grid_area, &mut self.grid_state);

            let status = Paragraph::new(hint.as_str()).style(Theme::status_bar_style());
            frame.render_widget(status, status_area);
        })?;
        Ok(())
    }

    /// Handle one key press.  Returns `true` when the session should end.
    fn handle_key(&mut self, key: KeyEvent) -> bool {
        // A binding that names Shift explicitly wins; otherwise Shift on a
        // movement key means "extend the selection".
        if let Some(action) = self.config.match_key(key) {
            return self.apply_action(action, false);
        }

        let shifted = key.modifiers.contains(KeyModifiers::SHIFT);
        if shifted {
            let stripped = KeyEvent::new(key.code, key.modifiers & !KeyModifiers::SHIFT);
            if let Some(action) = self.config.match_key(stripped) {
                return self.apply_action(action, true);
            }
        }

        if let event::KeyCode::Char(c) = key.code {
            let plain = key.modifiers & (KeyModifiers::CONTROL | KeyModifiers::ALT);
            if plain.is_empty() {
                self.input_char(c);
            }
        }
        false
    }

    fn apply_action(&mut self, action: Action, extend: bool) -> bool {
        match action {
            Action::MoveUp => self.move_cursor(-1, 0, extend),
            Action::MoveDown => self.move_cursor(1, 0, extend),
            Action::MoveLeft => self.move_cursor(0, -1, extend),
            Action::MoveRight => self.move_cursor(0, 1, extend),
            Action::Undo => {
                if let Some(previous) = self.undo.pop() {
                    self.lines = previous;
                    self.anchor = None;
                    self.dirty = true;
                    tracing::debug!("undid one grid edit");
                }
            }
            Action::Save => {
                self.saved = Some(self.lines.clone());
                self.dirty = false;
                tracing::debug!(name = %self.name, "recorded session save point");
            }
            Action::Quit => return true,
        }
        false
    }

    fn move_cursor(&mut self, dy: isize, dx: isize, extend: bool) {
        if self.lines.is_empty() {
            return;
        }
        if extend && self.anchor.is_none() {
            self.anchor = Some(self.cursor);
        }
        if !extend {
            self.anchor = None;
        }

        let max_row = self.lines.len() - 1;
        let max_col = self.width.saturating_sub(1);
        let (row, col) = self.cursor;
        let row = row.saturating_add_signed(dy).min(max_row);
        let col = col.saturating_add_signed(dx).min(max_col);
        self.cursor = (row, col);
    }

    /// The active selection between anchor and cursor, in reading order,
    /// inclusive of both endpoint cells.
    fn selection(&self) -> Option<Selection> {
        let anchor = self.anchor?;
        let (a, b) = if anchor <= self.cursor {
            (anchor, self.cursor)
        } else {
            (self.cursor, anchor)
        };
        Some(Selection::new(
            Position::new(a.0 + 1, a.1),
            Position::new(b.0 + 1, b.1 + 1),
        ))
    }

    fn input_char(&mut self, c: char) {
        if self.lines.is_empty() {
            return;
        }
        match self.selection() {
            Some(selection) => {
                // Whole-span fill through the same algebra the tests use.
                match grid::fill(&self.lines, Some(&selection), c, self.width) {
                    Ok(filled) => {
                        self.undo.push(std::mem::replace(&mut self.lines, filled));
                        self.anchor = None;
                        self.dirty = true;
                    }
                    Err(err) => tracing::warn!(%err, "selection fill rejected"),
                }
            }
            None => {
                let (row, col) = self.cursor;
                let current: Vec<char> = self.lines[row].chars().collect();
                if col >= current.len() {
                    return;
                }
                let mut updated = current;
                updated[col] = c;
                let mut next = self.lines.clone();
                next[row] = updated.into_iter().collect();
                self.undo.push(std::mem::replace(&mut self.lines, next));
                self.dirty = true;
                // Advance like a typewriter.
                self.move_cursor(0, 1, false);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::ramp::DEFAULT_RAMP;

    fn session_state<'a>(config: &'a AppConfig, rows: &[&str]) -> SessionState<'a> {
        let lines: Vec<String> = rows.iter().map(|s| s.to_string()).collect();
        SessionState::new(config, "test", &lines)
    }

    fn config() -> AppConfig {
        AppConfig {
            bindings: AppConfig::default_bindings(),
            scale_x: crate::config::DEFAULT_SCALE_X,
            scale_y: crate::config::DEFAULT_SCALE_Y,
            ramp: DEFAULT_RAMP.to_string(),
        }
    }

    #[test]
    fn extending_movement_builds_an_ordered_selection() {
        let config = config();
        let mut s = session_state(&config, &["....", "....", "...."]);
        s.move_cursor(1, 2, false);
        s.move_cursor(1, 1, true);
        let sel = s.selection().unwrap();
        assert_eq!(sel.first, Position::new(2, 2));
        assert_eq!(sel.last, Position::new(3, 4));
    }

    #[test]
    fn selection_is_ordered_even_when_dragged_backwards() {
        let config = config();
        let mut s = session_state(&config, &["....", "....", "...."]);
        s.move_cursor(2, 3, false);
        s.move_cursor(-1, -2, true);
        let sel = s.selection().unwrap();
        assert_eq!(sel.first, Position::new(2, 1));
        assert_eq!(sel.last, Position::new(3, 4));
    }

    #[test]
    fn typing_with_a_selection_fills_it() {
        let config = config();
        let mut s = session_state(&config, &["....", "....", "...."]);
        s.move_cursor(0, 1, false);
        s.move_cursor(0, 1, true); // select cells (1,1)..=(1,2)
        s.input_char('x');
        assert_eq!(s.lines, vec![".xx.", "....", "...."]);
        assert!(s.anchor.is_none());
        assert!(s.dirty);
    }

    #[test]
    fn typing_without_a_selection_overwrites_one_cell() {
        let config = config();
        let mut s = session_state(&config, &["....", "...."]);
        s.input_char('#');
        assert_eq!(s.lines, vec!["#...", "...."]);
        assert_eq!(s.cursor, (0, 1));
    }

    #[test]
    fn undo_restores_the_previous_grid() {
        let config = config();
        let mut s = session_state(&config, &["...."]);
        s.input_char('#');
        s.input_char('#');
        assert_eq!(s.lines, vec!["##.."]);
        s.apply_action(Action::Undo, false);
        assert_eq!(s.lines, vec!["#..."]);
        s.apply_action(Action::Undo, false);
        assert_eq!(s.lines, vec!["...."]);
    }

    #[test]
    fn only_the_save_point_is_returned() {
        let config = config();
        let mut s = session_state(&config, &["...."]);
        s.input_char('a');
        s.apply_action(Action::Save, false);
        s.input_char('b');
        // The save point predates the second edit.
        assert_eq!(s.saved.as_deref().unwrap(), &["a..."]);
        assert_eq!(s.lines, vec!["ab.."]);
    }

    #[test]
    fn cursor_stays_inside_the_grid() {
        let config = config();
        let mut s = session_state(&config, &["..", ".."]);
        s.move_cursor(-5, -5, false);
        assert_eq!(s.cursor, (0, 0));
        s.move_cursor(9, 9, false);
        assert_eq!(s.cursor, (1, 1));
    }
}
