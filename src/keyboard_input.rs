//! Text-field wrapper that registers itself with the keyboard store.
//!
//! Pages use [`KeyboardInput`] instead of mounting bare fields. On mount it
//! creates the field node, hands its handle to the store, and listens for
//! focus (show the keyboard in the right layout) and touch-end (take focus
//! back from hosts that would blur the field). Unmounting removes the node
//! and the listeners.

use anyhow::Result;
use std::cell::RefCell;
use std::rc::Rc;

use crate::document::{
    Document, Element, EventKind, InputMode, InputType, ListenerId, ListenerScope, NodeId,
};
use crate::field::{
    request_focus, EditableField, FieldHandle, FieldKind, SubscriptionId, TextField,
};
use crate::models::KeyboardLayout;
use crate::store::KeyboardStore;

/// Declarative props for [`KeyboardInput`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InputProps {
    /// Label shown next to the field
    pub label: String,
    /// Field kind
    pub input_type: InputType,
    /// Explicit input hint
    pub input_mode: Option<InputMode>,
    /// Forces the numeric pad on (`Some(true)`) or off (`Some(false)`)
    pub numeric_only: Option<bool>,
    /// Show the keyboard when this field gains focus
    pub show_keyboard_on_focus: bool,
    /// Multi-line field
    pub multiline: bool,
    /// Initial value
    pub initial_value: String,
}

impl Default for InputProps {
    fn default() -> Self {
        Self {
            label: String::new(),
            input_type: InputType::Text,
            input_mode: None,
            numeric_only: None,
            show_keyboard_on_focus: true,
            multiline: false,
            initial_value: String::new(),
        }
    }
}

impl InputProps {
    /// Props for a labelled single-line field.
    pub fn new(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            ..Self::default()
        }
    }

    /// Sets the field kind.
    #[must_use]
    pub const fn input_type(mut self, input_type: InputType) -> Self {
        self.input_type = input_type;
        self
    }

    /// Sets the explicit input hint.
    #[must_use]
    pub const fn input_mode(mut self, mode: InputMode) -> Self {
        self.input_mode = Some(mode);
        self
    }

    /// Forces the numeric pad on or off.
    #[must_use]
    pub const fn numeric_only(mut self, numeric: bool) -> Self {
        self.numeric_only = Some(numeric);
        self
    }

    /// Makes the field multi-line.
    #[must_use]
    pub const fn multiline(mut self) -> Self {
        self.multiline = true;
        self
    }

    /// Disables showing the keyboard on focus.
    #[must_use]
    pub const fn without_keyboard_on_focus(mut self) -> Self {
        self.show_keyboard_on_focus = false;
        self
    }

    /// Sets the initial value.
    #[must_use]
    pub fn value(mut self, value: impl Into<String>) -> Self {
        self.initial_value = value.into();
        self
    }

    /// Layout this field asks for when focused.
    ///
    /// `numeric_only` wins over both the declared hint and the field kind.
    #[must_use]
    pub fn resolved_layout(&self) -> KeyboardLayout {
        self.element().attributes.requested_layout()
    }

    fn element(&self) -> Element {
        let base = if self.multiline {
            Element::text_area()
        } else {
            Element::text_field()
        };
        let mut element = base
            .with_label(self.label.clone())
            .with_input_type(self.input_type);
        element.attributes.input_mode = self.input_mode;
        element.attributes.numeric_override = self.numeric_only;
        element
    }

    fn field(&self) -> TextField {
        let kind = if self.multiline {
            FieldKind::MultiLine
        } else {
            FieldKind::SingleLine
        };
        TextField::new(kind).with_value(self.initial_value.clone())
    }
}

/// A mounted, keyboard-aware text field.
#[derive(Debug)]
pub struct KeyboardInput {
    node: NodeId,
    field: Rc<RefCell<TextField>>,
    props: InputProps,
    document: Rc<Document>,
    store: KeyboardStore,
    listeners: Vec<ListenerId>,
}

impl KeyboardInput {
    /// Mounts a field under `parent` and registers it with `store`.
    pub fn mount(
        document: &Rc<Document>,
        parent: NodeId,
        props: InputProps,
        store: &KeyboardStore,
    ) -> Result<Self> {
        let field = Rc::new(RefCell::new(props.field()));
        let handle: FieldHandle = field.clone();
        let node = document.append_field(parent, props.element(), Rc::clone(&handle))?;
        if !opted_out(document, node) {
            store.set_input_ref(&handle);
        }

        let mut input = Self {
            node,
            field,
            props,
            document: Rc::clone(document),
            store: store.clone(),
            listeners: Vec::new(),
        };
        input.attach_listeners();
        tracing::debug!(node = %node, label = %input.props.label, "mounted keyboard input");
        Ok(input)
    }

    fn attach_listeners(&mut self) {
        let node = self.node;
        let store = self.store.clone();
        let show_on_focus = self.props.show_keyboard_on_focus;
        let layout = self.props.resolved_layout();
        let focus = self.document.add_listener(
            ListenerScope::Node(self.node),
            EventKind::FocusIn,
            move |event, doc| {
                if show_on_focus && event.target == node && !opted_out(doc, node) {
                    store.show_keyboard();
                    store.set_layout(layout);
                }
            },
        );

        let touch = self.document.add_listener(
            ListenerScope::Node(self.node),
            EventKind::TouchEnd,
            move |event, doc| {
                if event.target == node {
                    if let Some(field) = doc.field(node) {
                        request_focus(&field);
                    }
                }
            },
        );

        self.listeners = vec![focus, touch];
    }

    /// Runs the focus behaviour explicitly.
    pub fn on_focus(&self) {
        if self.props.show_keyboard_on_focus && !opted_out(&self.document, self.node) {
            self.store.show_keyboard();
            self.store.set_layout(self.props.resolved_layout());
        }
    }

    /// Swaps in a new field and registers it with the store.
    ///
    /// Subscriptions made through [`Self::on_change`] move to the new field.
    pub fn rebind(&mut self, field: TextField) -> bool {
        let field = Rc::new(RefCell::new(field));
        let handle: FieldHandle = field.clone();
        if !self.document.replace_field(self.node, Rc::clone(&handle)) {
            return false;
        }
        field.borrow().adopt_subscribers(&self.field.borrow());
        self.store.set_input_ref(&handle);
        self.field = field;
        true
    }

    /// Node hosting the field.
    #[must_use]
    pub const fn node(&self) -> NodeId {
        self.node
    }

    /// The wrapped field.
    #[must_use]
    pub fn field(&self) -> Rc<RefCell<TextField>> {
        Rc::clone(&self.field)
    }

    /// Props the input was mounted with.
    #[must_use]
    pub const fn props(&self) -> &InputProps {
        &self.props
    }

    /// Current value.
    #[must_use]
    pub fn value(&self) -> String {
        self.field.borrow().value().to_string()
    }

    /// Subscribes to value changes of the current field.
    pub fn on_change(&self, callback: impl Fn(&str) + 'static) -> SubscriptionId {
        self.field.borrow().on_change(callback)
    }

    /// True if the field currently has document focus.
    #[must_use]
    pub fn has_focus(&self) -> bool {
        self.field.borrow().has_focus()
    }
}

/// True if `node` sits inside a subtree carrying the opt-out marker.
fn opted_out(document: &Document, node: NodeId) -> bool {
    document
        .closest(node, |element| element.attributes.no_osk)
        .is_some()
}

impl Drop for KeyboardInput {
    fn drop(&mut self) {
        for id in self.listeners.drain(..) {
            self.document.remove_listener(id);
        }
        self.document.remove(self.node);
    }
}
