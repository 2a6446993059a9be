//! Keyboard layouts and their static key tables.
//!
//! The two glyph grids are immutable configuration data. The surface picks
//! one of them based on the store's current [`KeyboardLayout`].

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Token the surface sends for the dedicated backspace control.
pub const BACKSPACE: &str = "Backspace";

/// Token the surface sends for the space bar.
pub const SPACE: &str = "Space";

/// Token the surface sends for the enter control.
pub const ENTER: &str = "Enter";

/// An ordered row of key glyphs.
pub type KeyRow = &'static [&'static str];

/// Alphabetic layout: a digit row followed by three QWERTY rows (10/10/9/7).
pub const ALPHA_ROWS: &[KeyRow] = &[
    &["1", "2", "3", "4", "5", "6", "7", "8", "9", "0"],
    &["q", "w", "e", "r", "t", "y", "u", "i", "o", "p"],
    &["a", "s", "d", "f", "g", "h", "j", "k", "l"],
    &["z", "x", "c", "v", "b", "n", "m"],
];

/// Row of the alphabetic layout that carries the trailing backspace key.
pub const ALPHA_BACKSPACE_ROW: usize = 2;

/// Numeric dial pad, three columns wide.
///
/// An empty string is a blank placeholder cell; [`BACKSPACE`] is the
/// backspace cell.
pub const NUMERIC_PAD: &[KeyRow] = &[
    &["1", "2", "3"],
    &["4", "5", "6"],
    &["7", "8", "9"],
    &["", "0", BACKSPACE],
];

/// Which glyph grid the on-screen keyboard shows.
///
/// The layout also drives validation: numeric entry only accepts digits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum KeyboardLayout {
    /// Alphabetic QWERTY-style grid
    #[default]
    Default,
    /// Three-column dial pad
    Numeric,
}

impl KeyboardLayout {
    /// Returns the glyph rows for this layout.
    #[must_use]
    pub const fn rows(self) -> &'static [KeyRow] {
        match self {
            Self::Default => ALPHA_ROWS,
            Self::Numeric => NUMERIC_PAD,
        }
    }

    /// Returns true for the numeric dial pad.
    #[must_use]
    pub const fn is_numeric(self) -> bool {
        matches!(self, Self::Numeric)
    }

    /// Stable lowercase name used in config files and CLI output.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Default => "default",
            Self::Numeric => "numeric",
        }
    }
}

impl fmt::Display for KeyboardLayout {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for KeyboardLayout {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "default" | "alpha" | "text" => Ok(Self::Default),
            "numeric" | "number" | "tel" => Ok(Self::Numeric),
            other => {
                anyhow::bail!("Unknown keyboard layout '{other}' (expected default or numeric)")
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_alpha_row_lengths() {
        let lengths: Vec<usize> = ALPHA_ROWS.iter().map(|row| row.len()).collect();
        assert_eq!(lengths, vec![10, 10, 9, 7]);
    }

    #[test]
    fn test_numeric_pad_is_three_columns() {
        assert!(NUMERIC_PAD.iter().all(|row| row.len() == 3));

        let digits: Vec<&str> = NUMERIC_PAD
            .iter()
            .flat_map(|row| row.iter().copied())
            .filter(|glyph| glyph.len() == 1)
            .collect();
        assert_eq!(digits.len(), 10);
        assert!(NUMERIC_PAD[3].contains(&BACKSPACE));
    }

    #[test]
    fn test_rows_follow_layout() {
        assert_eq!(KeyboardLayout::Default.rows().len(), 4);
        assert_eq!(KeyboardLayout::Numeric.rows()[0], &["1", "2", "3"]);
    }

    #[test]
    fn test_parse_layout() {
        assert_eq!("numeric".parse::<KeyboardLayout>().unwrap(), KeyboardLayout::Numeric);
        assert_eq!(" Default ".parse::<KeyboardLayout>().unwrap(), KeyboardLayout::Default);
        assert!("dvorak".parse::<KeyboardLayout>().is_err());
    }
}
