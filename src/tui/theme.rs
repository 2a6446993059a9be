//! Colors for the kiosk screens and the keyboard surface.
//!
//! Follows the OS dark/light preference unless the config forces a mode.

use ratatui::style::Color;

use crate::config::ThemeMode;

/// Semantic colors used by every widget.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Theme {
    /// Borders and titles
    pub primary: Color,
    /// Focused field border and caret
    pub accent: Color,
    /// Opt-out panels
    pub muted_panel: Color,

    /// Primary text
    pub text: Color,
    /// Labels and hints
    pub text_muted: Color,

    /// Screen background
    pub background: Color,
    /// Keyboard tray background
    pub surface: Color,

    /// Glyph key background
    pub key_bg: Color,
    /// Glyph key label
    pub key_fg: Color,
    /// Hide/Space/Enter/Backspace background
    pub control_bg: Color,
}

/// Theme variant identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ThemeVariant {
    /// Dark terminal backgrounds
    Dark,
    /// Light terminal backgrounds
    Light,
}

impl Theme {
    /// Detects the OS theme via `dark-light`, falling back to dark.
    #[must_use]
    pub fn detect() -> Self {
        match dark_light::detect() {
            Ok(dark_light::Mode::Light) => Self::light(),
            Ok(dark_light::Mode::Dark | dark_light::Mode::Unspecified) | Err(_) => Self::dark(),
        }
    }

    /// Resolves the configured mode.
    #[must_use]
    pub fn from_mode(mode: ThemeMode) -> Self {
        match mode {
            ThemeMode::Auto => Self::detect(),
            ThemeMode::Dark => Self::dark(),
            ThemeMode::Light => Self::light(),
        }
    }

    /// Dark theme.
    #[must_use]
    pub const fn dark() -> Self {
        Self {
            primary: Color::Cyan,
            accent: Color::Yellow,
            muted_panel: Color::DarkGray,

            text: Color::White,
            text_muted: Color::Gray,

            background: Color::Black,
            surface: Color::Rgb(30, 30, 30),

            key_bg: Color::Rgb(60, 60, 60),
            key_fg: Color::White,
            control_bg: Color::Rgb(45, 45, 70),
        }
    }

    /// Light theme, close to the gray-on-white kiosk tray.
    #[must_use]
    pub const fn light() -> Self {
        Self {
            primary: Color::Blue,
            accent: Color::Rgb(180, 100, 0),
            muted_panel: Color::Rgb(180, 180, 180),

            text: Color::Black,
            text_muted: Color::Rgb(90, 90, 90),

            background: Color::White,
            surface: Color::Rgb(245, 245, 245),

            key_bg: Color::Rgb(229, 231, 235),
            key_fg: Color::Black,
            control_bg: Color::Rgb(209, 213, 219),
        }
    }

    /// Variant, judged by the background color.
    #[must_use]
    pub const fn variant(&self) -> ThemeVariant {
        match self.background {
            Color::White | Color::Rgb(255, 255, 255) => ThemeVariant::Light,
            _ => ThemeVariant::Dark,
        }
    }
}

impl Default for Theme {
    fn default() -> Self {
        Self::detect()
    }
}
