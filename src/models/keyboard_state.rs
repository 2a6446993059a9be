//! Observable keyboard state.

use serde::{Deserialize, Serialize};

use super::KeyboardLayout;

/// Visibility and layout of the on-screen keyboard.
///
/// The two axes are independent: hiding the keyboard keeps the layout, and
/// switching the layout never touches visibility.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct KeyboardState {
    /// Whether the surface is mounted
    pub visible: bool,
    /// Glyph grid currently selected
    pub layout: KeyboardLayout,
}

impl KeyboardState {
    /// Creates a hidden keyboard with the given layout.
    #[must_use]
    pub const fn new(layout: KeyboardLayout) -> Self {
        Self {
            visible: false,
            layout,
        }
    }
}
