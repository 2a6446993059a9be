//! Kiosk screens.
//!
//! Each screen is a container node holding keyboard-aware inputs. Only the
//! active screen is mounted; switching screens drops the old inputs, which
//! removes their nodes just like navigating away from a page.

use anyhow::Result;
use std::cell::RefCell;
use std::collections::BTreeMap;
use std::rc::Rc;

use crate::document::{Document, Element, InputType, NodeId};
use crate::keyboard_input::{InputProps, KeyboardInput};
use crate::store::KeyboardStore;

/// Screens the kiosk can show.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ScreenKind {
    /// Patient login by phone number
    Login,
    /// Doctor search
    Search,
    /// Consultation notes and prescription
    Consultation,
    /// Administrative screen, excluded from the on-screen keyboard
    Admin,
}

impl ScreenKind {
    /// All screens in tab order.
    pub const ALL: [Self; 4] = [Self::Login, Self::Search, Self::Consultation, Self::Admin];

    /// Tab title.
    #[must_use]
    pub const fn title(self) -> &'static str {
        match self {
            Self::Login => "Login",
            Self::Search => "Find a doctor",
            Self::Consultation => "Consultation",
            Self::Admin => "Admin",
        }
    }

    /// True for screens marked with the opt-out marker.
    #[must_use]
    pub const fn opts_out(self) -> bool {
        matches!(self, Self::Admin)
    }

    fn fields(self) -> Vec<InputProps> {
        match self {
            Self::Login => vec![
                InputProps::new("Phone number").input_type(InputType::Tel),
                InputProps::new("Full name"),
            ],
            Self::Search => vec![
                InputProps::new("Search doctors").input_type(InputType::Search),
                InputProps::new("Specialty"),
            ],
            Self::Consultation => vec![
                InputProps::new("Symptoms").multiline(),
                InputProps::new("Dosage (mg)").numeric_only(true),
                InputProps::new("Instructions"),
            ],
            Self::Admin => vec![
                InputProps::new("Admin email").input_type(InputType::Email),
                InputProps::new("Password").input_type(InputType::Password),
            ],
        }
    }
}

/// Field values as seen by the page through change notifications.
pub type FormState = Rc<RefCell<BTreeMap<String, String>>>;

/// A mounted screen.
#[derive(Debug)]
pub struct Screen {
    kind: ScreenKind,
    node: NodeId,
    document: Rc<Document>,
    inputs: Vec<KeyboardInput>,
    form: FormState,
}

impl Screen {
    /// Mounts `kind` under the document root.
    pub fn mount(kind: ScreenKind, document: &Rc<Document>, store: &KeyboardStore) -> Result<Self> {
        let mut container = Element::container().with_label(kind.title());
        if kind.opts_out() {
            container = container.no_osk();
        }
        let node = document.append(document.root(), container)?;

        let form: FormState = Rc::new(RefCell::new(BTreeMap::new()));
        let mut inputs = Vec::new();
        for props in kind.fields() {
            let label = props.label.clone();
            let input = KeyboardInput::mount(document, node, props, store)?;
            let form_clone = Rc::clone(&form);
            input.on_change(move |value| {
                form_clone.borrow_mut().insert(label.clone(), value.to_string());
            });
            inputs.push(input);
        }

        Ok(Self {
            kind,
            node,
            document: Rc::clone(document),
            inputs,
            form,
        })
    }

    /// Screen kind.
    #[must_use]
    pub const fn kind(&self) -> ScreenKind {
        self.kind
    }

    /// Container node.
    #[must_use]
    pub const fn node(&self) -> NodeId {
        self.node
    }

    /// Mounted inputs in display order.
    #[must_use]
    pub fn inputs(&self) -> &[KeyboardInput] {
        &self.inputs
    }

    /// The input hosted by `node`, if it belongs to this screen.
    #[must_use]
    pub fn input(&self, node: NodeId) -> Option<&KeyboardInput> {
        self.inputs.iter().find(|input| input.node() == node)
    }

    /// Values reported through change notifications so far.
    #[must_use]
    pub fn form_values(&self) -> BTreeMap<String, String> {
        self.form.borrow().clone()
    }
}

impl Drop for Screen {
    fn drop(&mut self) {
        self.inputs.clear();
        self.document.remove(self.node);
    }
}
