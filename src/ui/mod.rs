//! UI / rendering layer — everything that touches Ratatui widgets.
//!
//! This layer takes the *core* data structures and turns them into cells
//! on the terminal.  No store I/O happens here; the editing session talks
//! to the command editor only through the session trait.

pub mod edit_session;
pub mod grid_widget;
pub mod theme;
