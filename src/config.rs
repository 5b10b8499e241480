//! User configuration — generation defaults and session keybindings.
//!
//! Stored as a simple key-value text file at
//! `$XDG_CONFIG_HOME/widget-forge/config.toml` (default
//! `~/.config/widget-forge/config.toml`).  The scale factors compensate
//! for the tall aspect ratio of monospace cells; they are configuration
//! precisely so nobody has to patch the mapping algorithm to tune them.

use std::collections::HashMap;
use std::path::PathBuf;

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use crate::core::ramp::DEFAULT_RAMP;

/// Horizontal pre-scale applied before mapping (58/80).
pub const DEFAULT_SCALE_X: f64 = 58.0 / 80.0;
/// Vertical pre-scale applied before mapping (33/92).
pub const DEFAULT_SCALE_Y: f64 = 33.0 / 92.0;

// ───────────────────────────────────────── actions ───────────

/// All configurable user actions in the grid-editing session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Action {
    MoveUp,
    MoveDown,
    MoveLeft,
    MoveRight,
    Undo,
    Save,
    Quit,
}

impl Action {
    /// Ordered list of all actions (config file output order).
    pub const ALL: &[Action] = &[
        Action::MoveUp,
        Action::MoveDown,
        Action::MoveLeft,
        Action::MoveRight,
        Action::Undo,
        Action::Save,
        Action::Quit,
    ];

    /// Key used in the config file.
    fn config_key(self) -> &'static str {
        match self {
            Action::MoveUp => "move_up",
            Action::MoveDown => "move_down",
            Action::MoveLeft => "move_left",
            Action::MoveRight => "move_right",
            Action::Undo => "undo",
            Action::Save => "save",
            Action::Quit => "quit",
        }
    }

    fn from_config_key(s: &str) -> Option<Self> {
        match s {
            "move_up" => Some(Action::MoveUp),
            "move_down" => Some(Action::MoveDown),
            "move_left" => Some(Action::MoveLeft),
            "move_right" => Some(Action::MoveRight),
            "undo" => Some(Action::Undo),
            "save" => Some(Action::Save),
            "quit" => Some(Action::Quit),
            _ => None,
        }
    }
}

// ───────────────────────────────────────── key bind ──────────

/// A single key binding — key code + modifier combination.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct KeyBind {
    pub code: KeyCode,
    pub modifiers: KeyModifiers,
}

impl KeyBind {
    pub fn new(code: KeyCode, modifiers: KeyModifiers) -> Self {
        Self { code, modifiers }
    }

    /// Does this binding match a key event?  Only CTRL/ALT/SHIFT modifiers
    /// are compared (platform-specific modifiers like SUPER are ignored).
    pub fn matches(&self, event: KeyEvent) -> bool {
        let mask = KeyModifiers::CONTROL | KeyModifiers::ALT | KeyModifiers::SHIFT;
        self.code == event.code && (self.modifiers & mask) == (event.modifiers & mask)
    }

    /// Display string, also the config-file format (e.g. `"Ctrl+s"`,
    /// `"Up"`, `"Esc"`).
    pub fn display(&self) -> String {
        let mut s = String::new();
        if self.modifiers.contains(KeyModifiers::CONTROL) {
            s.push_str("Ctrl+");
        }
        if self.modifiers.contains(KeyModifiers::ALT) {
            s.push_str("Alt+");
        }
        if self.modifiers.contains(KeyModifiers::SHIFT) {
            s.push_str("Shift+");
        }
        s.push_str(&match self.code {
            KeyCode::Char(' ') => "Space".into(),
            KeyCode::Char(c) => c.to_string(),
            KeyCode::Up => "Up".into(),
            KeyCode::Down => "Down".into(),
            KeyCode::Left => "Left".into(),
            KeyCode::Right => "Right".into(),
            KeyCode::Enter => "Enter".into(),
            KeyCode::Esc => "Esc".into(),
            KeyCode::Tab => "Tab".into(),
            KeyCode::Backspace => "Backspace".into(),
            KeyCode::Delete => "Delete".into(),
            other => format!("{other:?}"),
        });
        s
    }

    /// Parse a key string like `"Ctrl+s"`, `"Up"`, `"Esc"`.
    fn parse(s: &str) -> Option<Self> {
        let mut modifiers = KeyModifiers::NONE;
        let parts: Vec<&str> = s.split('+').collect();
        let key_part = parts.last()?;

        for &part in &parts[..parts.len() - 1] {
            match part.to_lowercase().as_str() {
                "ctrl" => modifiers |= KeyModifiers::CONTROL,
                "alt" => modifiers |= KeyModifiers::ALT,
                "shift" => modifiers |= KeyModifiers::SHIFT,
                _ => return None,
            }
        }

        let code = match key_part.to_lowercase().as_str() {
            "up" => KeyCode::Up,
            "down" => KeyCode::Down,
            "left" => KeyCode::Left,
            "right" => KeyCode::Right,
            "enter" | "return" => KeyCode::Enter,
            "esc" | "escape" => KeyCode::Esc,
            "tab" => KeyCode::Tab,
            "backspace" => KeyCode::Backspace,
            "delete" | "del" => KeyCode::Delete,
            "space" => KeyCode::Char(' '),
            s if s.len() == 1 => KeyCode::Char(s.chars().next()?),
            _ => return None,
        };

        Some(KeyBind { code, modifiers })
    }
}

// ───────────────────────────────────────── config ────────────

/// Application configuration — generation defaults plus session bindings.
pub struct AppConfig {
    pub bindings: HashMap<Action, Vec<KeyBind>>,
    /// Horizontal resample factor applied before mapping.
    pub scale_x: f64,
    /// Vertical resample factor applied before mapping.
    pub scale_y: f64,
    /// Default brightness ramp, darkest first.
    pub ramp: String,
}

impl AppConfig {
    /// Hard-coded defaults.
    pub fn default_bindings() -> HashMap<Action, Vec<KeyBind>> {
        use Action::*;
        use KeyCode::*;
        let n = KeyModifiers::NONE;
        let ctrl = KeyModifiers::CONTROL;
        let mut m = HashMap::new();

        m.insert(MoveUp, vec![KeyBind::new(Up, n)]);
        m.insert(MoveDown, vec![KeyBind::new(Down, n)]);
        m.insert(MoveLeft, vec![KeyBind::new(Left, n)]);
        m.insert(MoveRight, vec![KeyBind::new(Right, n)]);
        m.insert(Undo, vec![KeyBind::new(Char('z'), ctrl)]);
        m.insert(Save, vec![KeyBind::new(Char('s'), ctrl)]);
        m.insert(Quit, vec![KeyBind::new(Esc, n), KeyBind::new(Char('q'), ctrl)]);

        m
    }

    /// Find the action that matches a key event.  When multiple bindings
    /// match, the one with the most modifiers wins (so `Ctrl+s` beats a
    /// bare `s` binding).
    pub fn match_key(&self, event: KeyEvent) -> Option<Action> {
        let mut best: Option<Action> = None;
        let mut best_mod_count = 0;

        for (&action, binds) in &self.bindings {
            for bind in binds {
                if bind.matches(event) {
                    let mc = bind.modifiers.bits().count_ones();
                    if best.is_none() || mc > best_mod_count {
                        best = Some(action);
                        best_mod_count = mc;
                    }
                }
            }
        }
        best
    }

    /// Short display of the first binding only (for the status bar).
    fn short_binding(&self, action: Action) -> String {
        match self.bindings.get(&action) {
            Some(binds) if !binds.is_empty() => binds[0].display(),
            _ => "?".into(),
        }
    }

    /// Build the session status-bar hint string from current bindings.
    pub fn status_bar_hint(&self) -> String {
        format!(
            "{}/{}/{}/{}: move | Shift+move: select | type: fill | {}: undo | {}: save | {}: close",
            self.short_binding(Action::MoveUp),
            self.short_binding(Action::MoveDown),
            self.short_binding(Action::MoveLeft),
            self.short_binding(Action::MoveRight),
            self.short_binding(Action::Undo),
            self.short_binding(Action::Save),
            self.short_binding(Action::Quit),
        )
    }

    // ── persistence ─────────────────────────────────────────────

    /// Load config from disk, falling back to defaults.  On first run the
    /// defaults are written out so the knobs are discoverable.
    pub fn load() -> Self {
        let path = config_path();
        if path.exists() {
            if let Ok(contents) = std::fs::read_to_string(&path) {
                return Self::parse_config(&contents);
            }
        }
        let defaults = Self {
            bindings: Self::default_bindings(),
            scale_x: DEFAULT_SCALE_X,
            scale_y: DEFAULT_SCALE_Y,
            ramp: DEFAULT_RAMP.to_string(),
        };
        if let Err(err) = defaults.save() {
            tracing::debug!(%err, "could not write default config");
        }
        defaults
    }

    /// Persist current config to disk.
    pub fn save(&self) -> anyhow::Result<()> {
        let path = config_path();
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(&path, self.serialise())?;
        Ok(())
    }

    fn parse_config(s: &str) -> Self {
        let mut bindings = Self::default_bindings();
        let mut scale_x = DEFAULT_SCALE_X;
        let mut scale_y = DEFAULT_SCALE_Y;
        let mut ramp = DEFAULT_RAMP.to_string();

        for line in s.lines() {
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') || line.starts_with('[') {
                continue;
            }
            let Some((key, value)) = line.split_once('=') else {
                continue;
            };
            let key = key.trim();
            let value = value.trim();

            // Generation settings.
            match key {
                "scale_x" => {
                    if let Ok(v) = value.parse::<f64>() {
                        // Keep this bounded so a typo can't produce a
                        // zero-width or absurdly wide widget.
                        scale_x = v.clamp(0.01, 10.0);
                    }
                    continue;
                }
                "scale_y" => {
                    if let Ok(v) = value.parse::<f64>() {
                        scale_y = v.clamp(0.01, 10.0);
                    }
                    continue;
                }
                "ramp" => {
                    let v = value.trim_matches('"');
                    if !v.is_empty() {
                        ramp = v.to_string();
                    }
                    continue;
                }
                _ => {}
            }

            let Some(action) = Action::from_config_key(key) else {
                continue;
            };

            let mut parsed = Vec::new();
            for part in value.split(',') {
                let part = part.trim().trim_matches('"');
                if let Some(bind) = KeyBind::parse(part) {
                    parsed.push(bind);
                }
            }
            if !parsed.is_empty() {
                bindings.insert(action, parsed);
            }
        }

        Self { bindings, scale_x, scale_y, ramp }
    }

    fn serialise(&self) -> String {
        let mut lines = vec![
            "# widget-forge configuration".to_string(),
            String::new(),
            "# Generation settings".to_string(),
            format!("scale_x = {}", self.scale_x),
            format!("scale_y = {}", self.scale_y),
            format!("ramp = \"{}\"", self.ramp),
            String::new(),
            "# Grid-editor key bindings".to_string(),
            "# Format: action = Key1, Key2, ...".to_string(),
            "# Modifiers: Ctrl+, Alt+, Shift+ (prefix)".to_string(),
            "# Special keys: Up, Down, Left, Right, Enter, Esc, Tab,".to_string(),
            "#   Backspace, Delete, Space".to_string(),
            String::new(),
        ];

        for &action in Action::ALL {
            if let Some(binds) = self.bindings.get(&action) {
                let keys: Vec<String> = binds.iter().map(|b| b.display()).collect();
                lines.push(format!("{} = {}", action.config_key(), keys.join(", ")));
            }
        }
        lines.push(String::new());
        lines.join("\n")
    }
}

/// Return the config file path (`$XDG_CONFIG_HOME/widget-forge/config.toml`).
fn config_path() -> PathBuf {
    let config_dir = std::env::var("XDG_CONFIG_HOME")
        .map(PathBuf::from)
        .unwrap_or_else(|_| {
            let home = std::env::var("HOME").unwrap_or_else(|_| ".".into());
            PathBuf::from(home).join(".config")
        });
    config_dir.join("widget-forge").join("config.toml")
}
