//! Custom Ratatui widget that renders a widget's character grid with a
//! cursor, an optional selection highlight, and scrolling.
//!
//! The widget itself is created fresh each frame; scroll position lives
//! in [`GridWidgetState`] across frames.

use ratatui::{
    buffer::Buffer,
    layout::{Position as BufPos, Rect},
    widgets::{Block, StatefulWidget, Widget},
};

use crate::core::grid::Selection;

use super::theme::Theme;

// ───────────────────────────────────────── state ─────────────

/// Persistent state for the grid view (scroll offsets).
#[derive(Debug, Default)]
pub struct GridWidgetState {
    /// First visible row (0-indexed).
    pub offset_y: usize,
    /// First visible column.
    pub offset_x: usize,
}

impl GridWidgetState {
    /// Keep the cursor inside the viewport of `width` × `height` cells.
    pub fn clamp_scroll(&mut self, cursor: (usize, usize), width: usize, height: usize) {
        let (row, col) = cursor;
        if height > 0 {
            if row < self.offset_y {
                self.offset_y = row;
            } else if row >= self.offset_y + height {
                self.offset_y = row - height + 1;
            }
        }
        if width > 0 {
            if col < self.offset_x {
                self.offset_x = col;
            } else if col >= self.offset_x + width {
                self.offset_x = col - width + 1;
            }
        }
    }
}

// ───────────────────────────────────────── widget ────────────

/// The grid view itself.
pub struct GridWidget<'a> {
    lines: &'a [String],
    /// Cursor as (0-indexed row, 0-indexed column).
    cursor: (usize, usize),
    selection: Option<Selection>,
    /// Declared widget width; ragged rows render void cells up to it.
    width: usize,
    block: Option<Block<'a>>,
}

impl<'a> GridWidget<'a> {
    pub fn new(lines: &'a [String], cursor: (usize, usize), width: usize) -> Self {
        Self {
            lines,
            cursor,
            selection: None,
            width,
            block: None,
        }
    }

    pub fn selection(mut self, selection: Option<Selection>) -> Self {
        self.selection = selection;
        self
    }

    pub fn block(mut self, block: Block<'a>) -> Self {
        self.block = Some(block);
        self
    }

    /// Is the cell at (0-indexed row, col) inside the selection?
    fn selected(&self, row: usize, col: usize) -> bool {
        let Some(sel) = self.selection else {
            return false;
        };
        let line = row + 1;
        if line < sel.first.line || line > sel.last.line {
            return false;
        }
        if sel.first.line == sel.last.line {
            return col >= sel.first.col && col < sel.last.col;
        }
        if line == sel.first.line {
            col >= sel.first.col
        } else if line == sel.last.line {
            col < sel.last.col
        } else {
            true
        }
    }
}

impl<'a> StatefulWidget for GridWidget<'a> {
    type State = GridWidgetState;

    fn render(mut self, area: Rect, buf: &mut Buffer, state: &mut Self::State) {
        let inner = match &self.block {
            Some(b) => b.inner(area),
            None => area,
        };
        if let Some(b) = self.block.take() {
            b.render(area, buf);
        }
        if inner.width == 0 || inner.height == 0 {
            return;
        }

        state.clamp_scroll(self.cursor, inner.width as usize, inner.height as usize);

        for screen_row in 0..inner.height as usize {
            let row = state.offset_y + screen_row;
            if row >= self.lines.len() {
                break;
            }
            let chars: Vec<char> = self.lines[row].chars().collect();
            for screen_col in 0..inner.width as usize {
                let col = state.offset_x + screen_col;
                if col >= self.width.max(chars.len()) {
                    break;
                }
                // Ragged rows show a faint placeholder past their end.
                let (ch, mut style) = match chars.get(col) {
                    Some(&c) => (c, Theme::grid_style()),
                    None => ('·', Theme::void_style()),
                };
                if self.selected(row, col) {
                    style = Theme::selection_style();
                }
                if (row, col) == self.cursor {
                    style = Theme::cursor_style();
                }
                let pos = BufPos::new(
                    inner.x + screen_col as u16,
                    inner.y + screen_row as u16,
                );
                if let Some(cell) = buf.cell_mut(pos) {
                    cell.set_char(ch).set_style(style);
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::grid::Position;

    fn widget_with_selection(sel: Selection) -> GridWidget<'static> {
        const LINES: &[String] = &[];
        GridWidget::new(LINES, (0, 0), 10).selection(Some(sel))
    }

    #[test]
    fn selection_membership_single_line() {
        let w = widget_with_selection(Selection::new(Position::new(2, 3), Position::new(2, 6)));
        assert!(!w.selected(1, 2));
        assert!(w.selected(1, 3));
        assert!(w.selected(1, 5));
        assert!(!w.selected(1, 6));
        assert!(!w.selected(0, 4));
    }

    #[test]
    fn selection_membership_multi_line() {
        let w = widget_with_selection(Selection::new(Position::new(1, 7), Position::new(3, 4)));
        assert!(w.selected(0, 7));
        assert!(!w.selected(0, 6));
        assert!(w.selected(1, 0));
        assert!(w.selected(1, 9));
        assert!(w.selected(2, 3));
        assert!(!w.selected(2, 4));
    }

    #[test]
    fn scroll_follows_the_cursor() {
        let mut state = GridWidgetState::default();
        state.clamp_scroll((12, 0), 10, 5);
        assert_eq!(state.offset_y, 8);
        state.clamp_scroll((2, 15), 10, 5);
        assert_eq!(state.offset_y, 2);
        assert_eq!(state.offset_x, 6);
    }
}
