//! Kioskboard Library
//!
//! A page-agnostic on-screen keyboard for touch kiosks. A single
//! [`store::KeyboardStore`] holds the keyboard's visibility, its layout and
//! a weak handle to the field keys are typed into. The
//! [`store::KeyboardProvider`] watches focus across a [`document::Document`]
//! so ordinary fields get the keyboard without any wiring, while
//! [`keyboard_input::KeyboardInput`] lets a page register a field explicitly.
//! The terminal kiosk in [`tui`] draws the keyboard surface and demo screens.

// Module declarations
pub mod cli;
pub mod config;
pub mod constants;
pub mod document;
pub mod editing;
pub mod field;
pub mod keyboard_input;
pub mod logging;
pub mod models;
pub mod store;
#[cfg(feature = "ratatui")]
pub mod tui;
