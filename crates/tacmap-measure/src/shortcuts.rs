//! Keyboard shortcuts handled by the engine.

use std::fmt;
use std::str::FromStr;

/// A key press with its modifier state.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct KeyChord {
    /// Key name as reported by the host, e.g. `"z"` or `"Z"`.
    pub key: String,
    pub ctrl: bool,
    /// Command key on macOS, Super elsewhere.
    pub meta: bool,
    pub shift: bool,
    pub alt: bool,
}

impl KeyChord {
    pub fn new(key: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            ..Self::default()
        }
    }

    pub fn with_ctrl(mut self) -> Self {
        self.ctrl = true;
        self
    }

    pub fn with_meta(mut self) -> Self {
        self.meta = true;
        self
    }

    pub fn with_shift(mut self) -> Self {
        self.shift = true;
        self
    }

    pub fn with_alt(mut self) -> Self {
        self.alt = true;
        self
    }
}

impl fmt::Display for KeyChord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.ctrl {
            write!(f, "Ctrl+")?;
        }
        if self.meta {
            write!(f, "Cmd+")?;
        }
        if self.alt {
            write!(f, "Alt+")?;
        }
        if self.shift {
            write!(f, "Shift+")?;
        }
        write!(f, "{}", self.key.to_uppercase())
    }
}

/// Parses `"Ctrl+Z"`-style accelerator strings.
impl FromStr for KeyChord {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut parts: Vec<&str> = s.split('+').map(str::trim).collect();
        let key = parts
            .pop()
            .filter(|k| !k.is_empty())
            .ok_or_else(|| format!("Missing key in shortcut: {}", s))?;

        let mut chord = KeyChord::new(key);
        for modifier in parts {
            match modifier.to_lowercase().as_str() {
                "ctrl" | "control" => chord.ctrl = true,
                "cmd" | "meta" | "super" => chord.meta = true,
                "shift" => chord.shift = true,
                "alt" | "option" => chord.alt = true,
                other => return Err(format!("Unknown modifier: {}", other)),
            }
        }
        Ok(chord)
    }
}

/// Engine actions bound to keys.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Shortcut {
    /// Remove the most recently created shape.
    Undo,
}

impl Shortcut {
    /// Maps a chord to an action. Undo is Ctrl+Z or Cmd+Z with neither
    /// Shift nor Alt held.
    pub fn from_chord(chord: &KeyChord) -> Option<Self> {
        let primary = chord.ctrl || chord.meta;
        if primary && !chord.shift && !chord.alt && chord.key.eq_ignore_ascii_case("z") {
            Some(Self::Undo)
        } else {
            None
        }
    }
}
