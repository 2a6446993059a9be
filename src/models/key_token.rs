//! Key tokens sent from the surface to the store.

use super::keyboard_layout::{BACKSPACE, ENTER, SPACE};

/// A single key press, parsed from the raw glyph text the surface emits.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum KeyToken {
    /// Delete the selection, or the character before the caret
    Backspace,
    /// Insert one space
    Space,
    /// Insert a newline
    Enter,
    /// Insert literal text (normally one glyph)
    Text(String),
}

impl KeyToken {
    /// Parses a raw token. The reserved words are matched exactly; anything
    /// else is literal text.
    #[must_use]
    pub fn parse(raw: &str) -> Self {
        match raw {
            BACKSPACE => Self::Backspace,
            SPACE => Self::Space,
            ENTER => Self::Enter,
            text => Self::Text(text.to_string()),
        }
    }

    /// Text this token inserts, if any.
    #[must_use]
    pub fn inserted_text(&self) -> Option<&str> {
        match self {
            Self::Backspace => None,
            Self::Space => Some(" "),
            Self::Enter => Some("\n"),
            Self::Text(text) => Some(text),
        }
    }
}

impl From<&str> for KeyToken {
    fn from(raw: &str) -> Self {
        Self::parse(raw)
    }
}

impl From<char> for KeyToken {
    fn from(c: char) -> Self {
        Self::Text(c.to_string())
    }
}
