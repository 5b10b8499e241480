//! Brightness ramp — the ordered character sequence that turns pixel
//! intensities into display characters.
//!
//! A [`Ramp`] is validated once at construction and immutable afterwards,
//! so every quantisation call operates on known-good data.  The optional
//! [`Substitution`] rewrites designated "background" ramp characters to a
//! single replacement before any pixel is mapped — it is a string-level
//! rewrite of the ramp, never a per-pixel pass.

use super::error::{Error, Result};

/// Default ramp, darkest (space) to brightest (`m`).  Tuned for white
/// glyphs on a dark terminal background.
pub const DEFAULT_RAMP: &str = " }||||=_)(*&^%$#@12354098akpqm";

// ───────────────────────────────────────── ramp ──────────────

/// An ordered, non-empty character sequence mapping quantised brightness
/// to a display character.  Index 0 renders the darkest pixel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Ramp {
    chars: Vec<char>,
}

impl Ramp {
    /// Build a ramp from its character sequence.  Rejects empty input —
    /// a ramp with no characters cannot map anything.
    pub fn new(chars: &str) -> Result<Self> {
        let chars: Vec<char> = chars.chars().collect();
        if chars.is_empty() {
            return Err(Error::EmptyRamp);
        }
        Ok(Self { chars })
    }

    /// Quantise one intensity to its display character:
    /// `floor(v / 255 * (M-1))`, clamped into the ramp.
    pub fn char_for(&self, intensity: u8) -> char {
        let last = self.chars.len() - 1;
        let index = (f64::from(intensity) / 255.0 * last as f64) as usize;
        self.chars[index.min(last)]
    }

    /// Apply a base→newbase substitution, yielding the effective ramp.
    /// Positions whose character matches no base token are untouched.
    pub fn substitute(&self, sub: &Substitution) -> Ramp {
        let chars = self
            .chars
            .iter()
            .map(|&c| if sub.bases.contains(&c) { sub.newbase } else { c })
            .collect();
        Ramp { chars }
    }
}

impl std::fmt::Display for Ramp {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for c in &self.chars {
            write!(f, "{c}")?;
        }
        Ok(())
    }
}

// ───────────────────────────────────────── substitution ──────

/// A base→newbase rewrite rule: every ramp position holding one of the
/// `bases` characters is replaced by `newbase`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Substitution {
    bases: Vec<char>,
    newbase: char,
}

impl Substitution {
    /// Build a substitution from raw tokens.  Each token must resolve to
    /// exactly one character; `/SPC` stands for a literal space.
    pub fn new<S: AsRef<str>>(bases: &[S], newbase: &str) -> Result<Self> {
        let bases = bases
            .iter()
            .map(|t| parse_char_token(t.as_ref()))
            .collect::<Result<Vec<char>>>()?;
        Ok(Self {
            bases,
            newbase: parse_char_token(newbase)?,
        })
    }
}

/// Parse a single-character token, accepting `/SPC` as a literal space.
/// Anything longer (or empty) is rejected before mapping begins.
pub fn parse_char_token(token: &str) -> Result<char> {
    if token == "/SPC" {
        return Ok(' ');
    }
    let mut chars = token.chars();
    match (chars.next(), chars.next()) {
        (Some(c), None) => Ok(c),
        _ => Err(Error::BadToken(token.to_string())),
    }
}

// ───────────────────────────────────────── tests ─────────────
