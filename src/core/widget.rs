//! The widget value type — an ordered sequence of row strings plus the
//! attributes derived from it.
//!
//! Widgets are never forced rectangular: `is_proper` is a read-only check
//! the user consults before relying on the shape, not a write-time
//! invariant.  A persisted widget may well be ragged.

use serde::{Deserialize, Serialize};

use super::error::Result;
use super::grid::{self, Selection};

/// A named character-grid artifact.  Serialises as a bare JSON array of
/// row strings — the name lives in the enclosing document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Widget {
    lines: Vec<String>,
}

impl Widget {
    pub fn new(lines: Vec<String>) -> Self {
        Self { lines }
    }

    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    /// Declared width: the character count of the first row (0 when empty).
    pub fn width(&self) -> usize {
        self.lines.first().map_or(0, |l| l.chars().count())
    }

    pub fn height(&self) -> usize {
        self.lines.len()
    }

    /// True when every row has the declared width.
    pub fn is_proper(&self) -> bool {
        let width = self.width();
        self.lines.iter().all(|l| l.chars().count() == width)
    }

    /// Full text with rows joined by `\n` (display form).
    pub fn joined(&self) -> String {
        self.lines.join("\n")
    }

    /// Derived attributes for the `info` command.
    pub fn info(&self, name: &str) -> WidgetInfo {
        WidgetInfo {
            name: name.to_string(),
            shape: (self.width(), self.height()),
            size: self.width() * self.height(),
            is_proper: self.is_proper(),
        }
    }

    /// Replace every occurrence of every source character with `dest`
    /// across the whole widget text.  The replacement text is built in
    /// full before the widget is touched, so a caller never observes a
    /// half-replaced grid.
    pub fn replace_chars(&mut self, sources: &[char], dest: char) {
        let mut text = self.joined();
        for &source in sources {
            text = text.replace(source, &dest.to_string());
        }
        self.lines = text.split('\n').map(str::to_string).collect();
    }

    /// Fill the selected span with `ch` (see [`grid::fill`]).  The grid is
    /// swapped in whole or not at all.
    pub fn fill_selection(&mut self, selection: Option<&Selection>, ch: char) -> Result<()> {
        self.lines = grid::fill(&self.lines, selection, ch, self.width())?;
        Ok(())
    }
}

/// What `info` reports about a stored widget.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WidgetInfo {
    pub name: String,
    /// `(width, height)` in characters.
    pub shape: (usize, usize),
    /// `width * height`.
    pub size: usize,
    pub is_proper: bool,
}

impl std::fmt::Display for WidgetInfo {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "name: \t{}", self.name)?;
        writeln!(f, "shape: \t({}, {})", self.shape.0, self.shape.1)?;
        writeln!(f, "size: \t{}", self.size)?;
        write!(f, "is_proper: \t{}", self.is_proper)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn widget(rows: &[&str]) -> Widget {
        Widget::new(rows.iter().map(|s| s.to_string()).collect())
    }

    #[test]
    fn derived_attributes() {
        let w = widget(&["abcd", "efgh", "ijkl"]);
        let info = w.info("block");
        assert_eq!(info.shape, (4, 3));
        assert_eq!(info.size, 12);
        assert!(info.is_proper);
    }

    #[test]
    fn ragged_widget_is_improper() {
        let w = widget(&["abcd", "ef", "ijkl"]);
        assert!(!w.is_proper());
        // Width still comes from the first row.
        assert_eq!(w.width(), 4);
    }

    #[test]
    fn empty_widget_has_zero_shape() {
        let w = widget(&[]);
        assert_eq!(w.info("void").shape, (0, 0));
        assert!(w.is_proper());
    }

    #[test]
    fn replace_chars_hits_every_occurrence() {
        let mut w = widget(&["a b", "b a"]);
        w.replace_chars(&['a', 'b'], 'x');
        assert_eq!(w.lines(), &["x x", "x x"]);
    }

    #[test]
    fn space_replacement_round_trips() {
        let original = widget(&["  #  ", " ### ", "  #  "]);
        let mut w = original.clone();
        // No 'm' anywhere up front, so m → space is an exact inverse.
        w.replace_chars(&[' '], 'm');
        assert_eq!(w.lines(), &["mm#mm", "m###m", "mm#mm"]);
        w.replace_chars(&['m'], ' ');
        assert_eq!(w, original);
    }
}
