//! widget-forge — image-to-character-art widgets with a JSON store and
//! an interactive refinement editor.
//!
//! Module structure:
//! - `core`: ramp mapping, the widget document, selection algebra
//! - `app`: command loop, grammar, editing-session boundary
//! - `ui`: Ratatui grid editor
//! - `config`: generation defaults and keybindings
//! - `keyboard`: pollable background key monitor

pub mod app;
pub mod config;
pub mod core;
pub mod keyboard;
pub mod ui;
