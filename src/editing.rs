//! Selection-aware text editing for on-screen key presses.
//!
//! [`apply_key`] is a pure function over a value and a selection. The store
//! reads both from the live field, runs the edit here and writes the result
//! back, so every rule below can be tested without a document.
//!
//! Offsets are counted in characters (Unicode scalar values), never bytes.

use std::fmt;

use crate::field::Selection;
use crate::models::{KeyToken, KeyboardLayout};

/// Result of an accepted key press.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Edit {
    /// Full field value after the edit
    pub value: String,
    /// Collapsed caret position after the edit
    pub caret: usize,
}

/// Reasons a key press is silently dropped.
///
/// None of these are faults. The user-facing behaviour for all of them is
/// that nothing happens.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Declined {
    /// No field has been captured yet
    NoTarget,
    /// The captured field was removed from its document
    TargetDetached,
    /// Backspace with an empty selection at offset 0
    NothingToDelete,
    /// Space while the numeric pad is active
    SpaceInNumeric,
    /// Anything but a single decimal digit while the numeric pad is active
    NonDigitInNumeric,
    /// The field reported a selection outside its value
    SelectionOutOfRange,
    /// An empty text token
    EmptyText,
}

impl fmt::Display for Declined {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let reason = match self {
            Self::NoTarget => "no active field",
            Self::TargetDetached => "active field is no longer in the document",
            Self::NothingToDelete => "nothing before the caret",
            Self::SpaceInNumeric => "space is not allowed on the numeric pad",
            Self::NonDigitInNumeric => "only digits are allowed on the numeric pad",
            Self::SelectionOutOfRange => "selection is outside the field value",
            Self::EmptyText => "empty key",
        };
        f.write_str(reason)
    }
}

/// Returns true if `text` is exactly one ASCII decimal digit.
#[must_use]
pub fn is_single_digit(text: &str) -> bool {
    let mut chars = text.chars();
    matches!((chars.next(), chars.next()), (Some(c), None) if c.is_ascii_digit())
}

/// Applies one key press to `value`.
///
/// A missing selection is treated as a caret at the end of the text.
pub fn apply_key(
    value: &str,
    selection: Option<Selection>,
    key: &KeyToken,
    layout: KeyboardLayout,
) -> Result<Edit, Declined> {
    let len = value.chars().count();
    let Selection { start, end } = selection.unwrap_or_else(|| Selection::caret(len));
    if start > end || end > len {
        return Err(Declined::SelectionOutOfRange);
    }

    match key {
        KeyToken::Backspace => {
            if !Selection::new(start, end).is_collapsed() {
                Ok(splice(value, start, end, "", start))
            } else if start > 0 {
                Ok(splice(value, start - 1, end, "", start - 1))
            } else {
                Err(Declined::NothingToDelete)
            }
        }
        KeyToken::Space if layout.is_numeric() => Err(Declined::SpaceInNumeric),
        KeyToken::Space | KeyToken::Enter => {
            let text = key.inserted_text().unwrap_or_default();
            Ok(splice(value, start, end, text, start + text.chars().count()))
        }
        KeyToken::Text(text) => {
            if text.is_empty() {
                return Err(Declined::EmptyText);
            }
            if layout.is_numeric() && !is_single_digit(text) {
                return Err(Declined::NonDigitInNumeric);
            }
            let caret = start + text.chars().count();
            Ok(splice(value, start, end, text, caret))
        }
    }
}

/// Replaces the character range `[start, end)` with `insert`.
fn splice(value: &str, start: usize, end: usize, insert: &str, caret: usize) -> Edit {
    let from = byte_offset(value, start);
    let to = byte_offset(value, end);

    let mut out = String::with_capacity(value.len() - (to - from) + insert.len());
    out.push_str(&value[..from]);
    out.push_str(insert);
    out.push_str(&value[to..]);

    Edit { value: out, caret }
}

/// Byte index of the `chars`-th character, or the end of the string.
fn byte_offset(value: &str, chars: usize) -> usize {
    value
        .char_indices()
        .nth(chars)
        .map_or(value.len(), |(idx, _)| idx)
}
