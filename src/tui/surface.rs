//! On-screen keyboard surface.
//!
//! Renders the current layout as a grid of buttons and turns activations into
//! store calls. It keeps no state and does no validation: every glyph button
//! sends its glyph text verbatim and the store decides what happens.

use ratatui::{
    layout::{Alignment, Rect},
    style::{Modifier, Style},
    widgets::{Block, Borders, Clear, Paragraph},
    Frame,
};

use crate::models::{
    KeyboardLayout, KeyboardState, ALPHA_BACKSPACE_ROW, ALPHA_ROWS, BACKSPACE, ENTER, NUMERIC_PAD,
    SPACE,
};
use crate::store::{KeyOutcome, KeyboardStore};

use super::Theme;

/// Terminal rows taken by one key.
const KEY_HEIGHT: u16 = 3;
/// Columns between neighbouring keys.
const KEY_GAP: u16 = 1;
/// Glyph key width on the alphabetic grid.
const ALPHA_KEY_WIDTH: u16 = 5;
/// Cell width on the numeric pad.
const PAD_KEY_WIDTH: u16 = 9;

/// Label shown on backspace keys.
pub const BACKSPACE_LABEL: &str = "⌫";

/// What a surface button does when activated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SurfaceAction {
    /// Send this key token to the store
    Press(String),
    /// Hide the keyboard
    Hide,
}

/// A positioned button.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SurfaceButton {
    /// Text drawn on the key
    pub label: String,
    /// Activation behaviour
    pub action: SurfaceAction,
    /// Screen area
    pub area: Rect,
    /// Control keys (hide, space, enter, backspace) are styled differently
    pub control: bool,
}

/// Buttons laid out for one frame.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SurfacePlan {
    /// Tray area, empty when hidden
    pub area: Rect,
    /// Buttons in row-major order
    pub buttons: Vec<SurfaceButton>,
}

impl SurfacePlan {
    /// Action of the button under (`column`, `row`), if any.
    #[must_use]
    pub fn hit_test(&self, column: u16, row: u16) -> Option<&SurfaceAction> {
        self.buttons
            .iter()
            .find(|button| contains(button.area, column, row))
            .map(|button| &button.action)
    }

    /// True if the point is anywhere on the tray.
    #[must_use]
    pub fn covers(&self, column: u16, row: u16) -> bool {
        contains(self.area, column, row)
    }
}

pub(crate) fn contains(area: Rect, column: u16, row: u16) -> bool {
    column >= area.x
        && column < area.x.saturating_add(area.width)
        && row >= area.y
        && row < area.y.saturating_add(area.height)
}

/// Static description of one key before layout.
struct KeySpec {
    label: String,
    action: Option<SurfaceAction>,
    width: u16,
    control: bool,
}

impl KeySpec {
    fn glyph(glyph: &str, width: u16) -> Self {
        Self {
            label: glyph.to_string(),
            action: Some(SurfaceAction::Press(glyph.to_string())),
            width,
            control: false,
        }
    }

    fn control(label: &str, action: SurfaceAction, width: u16) -> Self {
        Self {
            label: label.to_string(),
            action: Some(action),
            width,
            control: true,
        }
    }

    fn backspace(width: u16) -> Self {
        Self::control(BACKSPACE_LABEL, SurfaceAction::Press(BACKSPACE.to_string()), width)
    }

    fn blank(width: u16) -> Self {
        Self {
            label: String::new(),
            action: None,
            width,
            control: false,
        }
    }
}

/// Keyboard surface widget.
pub struct KeyboardSurface;

impl KeyboardSurface {
    /// Rows the surface needs, or 0 when hidden.
    #[must_use]
    pub fn height(state: KeyboardState) -> u16 {
        if !state.visible {
            return 0;
        }
        let rows = Self::key_rows(state.layout).len() as u16;
        rows * KEY_HEIGHT + 2
    }

    fn key_rows(layout: KeyboardLayout) -> Vec<Vec<KeySpec>> {
        match layout {
            KeyboardLayout::Default => {
                let mut rows: Vec<Vec<KeySpec>> = ALPHA_ROWS
                    .iter()
                    .map(|row| row.iter().map(|g| KeySpec::glyph(g, ALPHA_KEY_WIDTH)).collect())
                    .collect();
                rows[ALPHA_BACKSPACE_ROW].push(KeySpec::backspace(ALPHA_KEY_WIDTH + 2));
                rows.push(vec![
                    KeySpec::control("Hide", SurfaceAction::Hide, 8),
                    KeySpec::control("Space", SurfaceAction::Press(SPACE.to_string()), 29),
                    KeySpec::control("Enter", SurfaceAction::Press(ENTER.to_string()), 9),
                ]);
                rows
            }
            KeyboardLayout::Numeric => {
                let mut rows: Vec<Vec<KeySpec>> = NUMERIC_PAD
                    .iter()
                    .map(|row| {
                        row.iter()
                            .map(|cell| match *cell {
                                "" => KeySpec::blank(PAD_KEY_WIDTH),
                                BACKSPACE => KeySpec::backspace(PAD_KEY_WIDTH),
                                glyph => KeySpec::glyph(glyph, PAD_KEY_WIDTH),
                            })
                            .collect()
                    })
                    .collect();
                rows.push(vec![
                    KeySpec::control("Hide", SurfaceAction::Hide, 8),
                    KeySpec::control("Enter", SurfaceAction::Press(ENTER.to_string()), 9),
                ]);
                rows
            }
        }
    }

    /// Lays out the buttons for `state` inside `area`.
    ///
    /// Rows are centred horizontally. Keys that would overflow the tray are
    /// dropped rather than squeezed.
    #[must_use]
    pub fn plan(state: KeyboardState, area: Rect) -> SurfacePlan {
        if !state.visible || area.width < 3 || area.height < 3 {
            return SurfacePlan::default();
        }

        let inner = Rect {
            x: area.x + 1,
            y: area.y + 1,
            width: area.width - 2,
            height: area.height - 2,
        };
        let inner_right = inner.x + inner.width;
        let inner_bottom = inner.y + inner.height;

        let mut buttons = Vec::new();
        for (row_idx, row) in Self::key_rows(state.layout).into_iter().enumerate() {
            let y = inner.y + row_idx as u16 * KEY_HEIGHT;
            if y + KEY_HEIGHT > inner_bottom {
                break;
            }

            let total: u16 = row.iter().map(|k| k.width).sum::<u16>()
                + KEY_GAP * (row.len() as u16).saturating_sub(1);
            let mut x = inner.x + inner.width.saturating_sub(total) / 2;

            for key in row {
                let fits = x + key.width <= inner_right;
                if let (true, Some(action)) = (fits, key.action) {
                    buttons.push(SurfaceButton {
                        label: key.label,
                        action,
                        area: Rect::new(x, y, key.width, KEY_HEIGHT),
                        control: key.control,
                    });
                }
                x = x.saturating_add(key.width + KEY_GAP);
            }
        }

        SurfacePlan { area, buttons }
    }

    /// Draws the surface and returns the plan used, for hit testing.
    pub fn render(f: &mut Frame, area: Rect, state: KeyboardState, theme: &Theme) -> SurfacePlan {
        let plan = Self::plan(state, area);
        if plan.buttons.is_empty() {
            return plan;
        }

        f.render_widget(Clear, area);
        let title = match state.layout {
            KeyboardLayout::Default => " Keyboard ",
            KeyboardLayout::Numeric => " Number pad ",
        };
        let tray = Block::default()
            .title(title)
            .borders(Borders::ALL)
            .border_style(Style::default().fg(theme.primary))
            .style(Style::default().bg(theme.surface));
        f.render_widget(tray, area);

        for button in &plan.buttons {
            let bg = if button.control {
                theme.control_bg
            } else {
                theme.key_bg
            };
            let key = Paragraph::new(button.label.as_str())
                .alignment(Alignment::Center)
                .style(
                    Style::default()
                        .fg(theme.key_fg)
                        .bg(bg)
                        .add_modifier(Modifier::BOLD),
                )
                .block(
                    Block::default()
                        .borders(Borders::ALL)
                        .border_style(Style::default().fg(theme.text_muted).bg(bg)),
                );
            f.render_widget(key, button.area);
        }

        plan
    }

    /// Performs `action` against the store.
    ///
    /// Returns the key outcome for presses and `None` for hide.
    pub fn activate(action: &SurfaceAction, store: &KeyboardStore) -> Option<KeyOutcome> {
        match action {
            SurfaceAction::Press(token) => Some(store.press_key(token)),
            SurfaceAction::Hide => {
                store.hide_keyboard();
                None
            }
        }
    }
}
