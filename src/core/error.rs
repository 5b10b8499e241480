//! Error taxonomy shared by the core modules.
//!
//! Everything recoverable at the command loop surfaces as one of these
//! variants; the loop reports it and keeps running.  A malformed store
//! document is the only failure that is fatal to its caller.

use thiserror::Error;

/// Errors produced by ramp configuration, the widget document, and the
/// selection algebra.
#[derive(Debug, Error)]
pub enum Error {
    /// A ramp must map at least one brightness level.
    #[error("ramp must contain at least one character")]
    EmptyRamp,

    /// Substitution and replacement tokens must each be a single character
    /// (`/SPC` stands for a literal space).
    #[error("token {0:?} is not a single character")]
    BadToken(String),

    /// `-` is the command delimiter and can never appear in a widget name.
    #[error("widget name {0:?} must not contain '-'")]
    BadName(String),

    /// Lookup of a widget name that is not in the document.
    #[error("no widget named {0:?}")]
    NotFound(String),

    /// A verb received the wrong number of `-` separated arguments.
    #[error("expected {expected} argument(s), got {got}")]
    Arity { expected: usize, got: usize },

    /// Selection whose end precedes its start in reading order.
    #[error("selection end precedes its start")]
    SelectionOrder,

    /// Selection that addresses lines outside the widget grid.
    #[error("selection is outside the widget grid")]
    SelectionBounds,

    /// The persisted document exists but is not valid JSON of the expected
    /// shape.  Fatal to the load call.
    #[error("malformed widget store: {0}")]
    Malformed(#[from] serde_json::Error),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
