//! Line/column addressing over a widget's character grid, and the
//! selection fill that the editing session is built on.
//!
//! Positions keep the text-index convention the rest of the system uses:
//! lines are 1-indexed, columns 0-indexed.  A fill is computed as one new
//! grid and handed back whole — callers swap it in, so a partially applied
//! fill is never observable.

use super::error::{Error, Result};

// ───────────────────────────────────────── addressing ────────

/// One cell address: 1-indexed line, 0-indexed column.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Position {
    pub line: usize,
    pub col: usize,
}

impl Position {
    pub fn new(line: usize, col: usize) -> Self {
        Self { line, col }
    }
}

/// An inclusive-exclusive span between two positions in reading order.
/// `first` must not come after `last`; a reversed pair is an error, not a
/// silent no-op.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Selection {
    pub first: Position,
    pub last: Position,
}

impl Selection {
    pub fn new(first: Position, last: Position) -> Self {
        Self { first, last }
    }
}

// ───────────────────────────────────────── fill ──────────────

/// Replace the selected span of `lines` with `ch`, returning the new grid.
///
/// `width` is the widget's declared width (`line_char`): on a multi-line
/// selection the first line fills to `width` and the interior lines fill
/// across `[0, width)`.  Spans clamp to each row's actual length, so a
/// ragged widget fills as far as its rows reach instead of panicking.
///
/// With no selection the grid is returned unchanged.
pub fn fill(
    lines: &[String],
    selection: Option<&Selection>,
    ch: char,
    width: usize,
) -> Result<Vec<String>> {
    let Some(sel) = selection else {
        return Ok(lines.to_vec());
    };

    let (first, last) = (sel.first, sel.last);
    if first.line > last.line || (first.line == last.line && first.col > last.col) {
        return Err(Error::SelectionOrder);
    }
    if first.line == 0 || last.line > lines.len() {
        return Err(Error::SelectionBounds);
    }

    let mut out = lines.to_vec();
    if first.line == last.line {
        out[first.line - 1] = fill_span(&lines[first.line - 1], first.col, last.col, ch);
    } else {
        out[first.line - 1] = fill_span(&lines[first.line - 1], first.col, width, ch);
        for line in first.line + 1..last.line {
            out[line - 1] = fill_span(&lines[line - 1], 0, width, ch);
        }
        out[last.line - 1] = fill_span(&lines[last.line - 1], 0, last.col, ch);
    }
    Ok(out)
}

/// Rewrite columns `[from, to)` of one row to `ch`, leaving the rest.
fn fill_span(row: &str, from: usize, to: usize, ch: char) -> String {
    row.chars()
        .enumerate()
        .map(|(col, c)| if col >= from && col < to { ch } else { c })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn grid(rows: &[&str]) -> Vec<String> {
        rows.iter().map(|s| s.to_string()).collect()
    }

    fn sel(l0: usize, c0: usize, l1: usize, c1: usize) -> Selection {
        Selection::new(Position::new(l0, c0), Position::new(l1, c1))
    }

    #[test]
    fn no_selection_is_a_no_op() {
        let lines = grid(&["abc", "def"]);
        assert_eq!(fill(&lines, None, 'x', 3).unwrap(), lines);
    }

    #[test]
    fn single_line_fill_touches_exactly_the_span() {
        let lines = grid(&["..........", "..........", ".........."]);
        let out = fill(&lines, Some(&sel(2, 3, 2, 6)), 'x', 10).unwrap();
        assert_eq!(out[0], "..........");
        assert_eq!(out[1], "...xxx....");
        assert_eq!(out[2], "..........");
    }

    #[test]
    fn multi_line_fill_covers_head_body_and_tail() {
        let lines = grid(&["..........", "..........", ".........."]);
        let out = fill(&lines, Some(&sel(1, 7, 3, 4)), 'y', 10).unwrap();
        assert_eq!(out[0], ".......yyy");
        assert_eq!(out[1], "yyyyyyyyyy");
        assert_eq!(out[2], "yyyy......");
    }

    #[test]
    fn zero_width_span_changes_nothing() {
        let lines = grid(&["abcdef"]);
        let out = fill(&lines, Some(&sel(1, 2, 1, 2)), 'x', 6).unwrap();
        assert_eq!(out[0], "abcdef");
    }

    #[test]
    fn reversed_lines_are_rejected() {
        let lines = grid(&["aaa", "bbb"]);
        let err = fill(&lines, Some(&sel(2, 0, 1, 2)), 'x', 3).unwrap_err();
        assert!(matches!(err, Error::SelectionOrder));
    }

    #[test]
    fn reversed_columns_on_one_line_are_rejected() {
        let lines = grid(&["aaaa"]);
        let err = fill(&lines, Some(&sel(1, 3, 1, 1)), 'x', 4).unwrap_err();
        assert!(matches!(err, Error::SelectionOrder));
    }

    #[test]
    fn out_of_range_lines_are_rejected() {
        let lines = grid(&["aaa"]);
        assert!(matches!(
            fill(&lines, Some(&sel(1, 0, 2, 1)), 'x', 3),
            Err(Error::SelectionBounds)
        ));
        assert!(matches!(
            fill(&lines, Some(&sel(0, 0, 1, 1)), 'x', 3),
            Err(Error::SelectionBounds)
        ));
    }

    #[test]
    fn ragged_rows_clamp_instead_of_panicking() {
        let lines = grid(&["aaaaaa", "bb", "cccccc"]);
        let out = fill(&lines, Some(&sel(1, 4, 3, 2)), 'x', 6).unwrap();
        assert_eq!(out[0], "aaaaxx");
        assert_eq!(out[1], "xx");
        assert_eq!(out[2], "xxcccc");
    }
}
