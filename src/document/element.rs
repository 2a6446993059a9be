//! Element roles and declarative attributes.

use serde::{Deserialize, Serialize};

use crate::models::KeyboardLayout;

/// What kind of element a node is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Role {
    /// Grouping element (page, panel, dialog)
    Container,
    /// Activatable control
    Button,
    /// Single-line text field
    TextField,
    /// Multi-line text field
    TextArea,
    /// The on-screen keyboard's own subtree
    KeyboardSurface,
}

impl Role {
    /// Returns true for single-line and multi-line text fields.
    #[must_use]
    pub const fn is_text_field(self) -> bool {
        matches!(self, Self::TextField | Self::TextArea)
    }

    /// Returns true if the element can hold focus.
    #[must_use]
    pub const fn is_focusable(self) -> bool {
        matches!(self, Self::TextField | Self::TextArea | Self::Button)
    }
}

/// Declared input hint of a text field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InputMode {
    /// Free text
    Text,
    /// Digits only
    Numeric,
}

/// Declared kind of a text field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InputType {
    /// Plain text
    #[default]
    Text,
    /// Telephone number
    Tel,
    /// Masked text
    Password,
    /// Search query
    Search,
    /// E-mail address
    Email,
}

/// Attributes the keyboard reads off an element.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Attributes {
    /// Opt-out marker: this element and its subtree never trigger the keyboard
    pub no_osk: bool,
    /// Explicit input hint
    pub input_mode: Option<InputMode>,
    /// Field kind
    pub input_type: InputType,
    /// Forces the numeric pad on or off regardless of the hint and kind
    pub numeric_override: Option<bool>,
    /// Human-readable label
    pub label: Option<String>,
}

impl Attributes {
    /// Keyboard layout this element asks for.
    ///
    /// A numeric hint or a telephone kind selects the numeric pad; an
    /// explicit override beats both.
    #[must_use]
    pub fn requested_layout(&self) -> KeyboardLayout {
        let numeric = self.numeric_override.unwrap_or(
            self.input_mode == Some(InputMode::Numeric) || self.input_type == InputType::Tel,
        );
        if numeric {
            KeyboardLayout::Numeric
        } else {
            KeyboardLayout::Default
        }
    }
}

/// A node's role plus its attributes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Element {
    /// Element role
    pub role: Role,
    /// Declarative attributes
    pub attributes: Attributes,
}

impl Element {
    /// Creates an element with default attributes.
    #[must_use]
    pub fn new(role: Role) -> Self {
        Self {
            role,
            attributes: Attributes::default(),
        }
    }

    /// Creates a container element.
    #[must_use]
    pub fn container() -> Self {
        Self::new(Role::Container)
    }

    /// Creates a single-line text field element.
    #[must_use]
    pub fn text_field() -> Self {
        Self::new(Role::TextField)
    }

    /// Creates a multi-line text field element.
    #[must_use]
    pub fn text_area() -> Self {
        Self::new(Role::TextArea)
    }

    /// Creates a button element.
    #[must_use]
    pub fn button(label: impl Into<String>) -> Self {
        Self::new(Role::Button).with_label(label)
    }

    /// Sets the label.
    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.attributes.label = Some(label.into());
        self
    }

    /// Marks this element's subtree as excluded from the on-screen keyboard.
    pub const fn no_osk(mut self) -> Self {
        self.attributes.no_osk = true;
        self
    }

    /// Sets the explicit input hint.
    pub const fn with_input_mode(mut self, mode: InputMode) -> Self {
        self.attributes.input_mode = Some(mode);
        self
    }

    /// Sets the field kind.
    pub const fn with_input_type(mut self, input_type: InputType) -> Self {
        self.attributes.input_type = input_type;
        self
    }

    /// Forces the numeric pad on or off.
    pub const fn with_numeric_override(mut self, numeric: bool) -> Self {
        self.attributes.numeric_override = Some(numeric);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_requested_layout_defaults_to_alpha() {
        let element = Element::text_field();
        assert_eq!(element.attributes.requested_layout(), KeyboardLayout::Default);
    }

    #[test]
    fn test_tel_and_numeric_hints_select_numeric() {
        let tel = Element::text_field().with_input_type(InputType::Tel);
        assert_eq!(tel.attributes.requested_layout(), KeyboardLayout::Numeric);

        let numeric = Element::text_field().with_input_mode(InputMode::Numeric);
        assert_eq!(numeric.attributes.requested_layout(), KeyboardLayout::Numeric);
    }

    #[test]
    fn test_text_hint_does_not_hide_tel() {
        let element = Element::text_field()
            .with_input_type(InputType::Tel)
            .with_input_mode(InputMode::Text);
        assert_eq!(element.attributes.requested_layout(), KeyboardLayout::Numeric);
    }

    #[test]
    fn test_numeric_override_beats_inference() {
        let off = Element::text_field()
            .with_input_type(InputType::Tel)
            .with_input_mode(InputMode::Numeric)
            .with_numeric_override(false);
        assert_eq!(off.attributes.requested_layout(), KeyboardLayout::Default);

        let on = Element::text_field().with_numeric_override(true);
        assert_eq!(on.attributes.requested_layout(), KeyboardLayout::Numeric);
    }

    #[test]
    fn test_roles() {
        assert!(Role::TextArea.is_text_field());
        assert!(!Role::Button.is_text_field());
        assert!(Role::Button.is_focusable());
        assert!(!Role::KeyboardSurface.is_focusable());
    }
}
