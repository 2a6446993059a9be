//! Data models for the on-screen keyboard.
//!
//! These types carry no behaviour beyond parsing and lookups, so they are
//! shared freely between the store, the editing engine and the surface.

pub mod key_token;
pub mod keyboard_layout;
pub mod keyboard_state;

pub use key_token::KeyToken;
pub use keyboard_layout::{
    KeyRow, KeyboardLayout, ALPHA_BACKSPACE_ROW, ALPHA_ROWS, BACKSPACE, ENTER, NUMERIC_PAD, SPACE,
};
pub use keyboard_state::KeyboardState;
