//! Shared test fixtures for integration tests.
//!
//! Builds documents with mounted fields so tests exercise the same focus and
//! liveness paths the kiosk does.

#![allow(dead_code)]

use std::cell::RefCell;
use std::rc::Rc;

use kioskboard::config::Config;
use kioskboard::document::{Document, Element, NodeId};
use kioskboard::field::{FieldHandle, TextField};
use kioskboard::models::KeyboardLayout;
use kioskboard::store::{KeyboardProvider, KeyboardStore};
use tempfile::TempDir;

/// A field mounted in a document.
pub struct MountedField {
    pub node: NodeId,
    pub field: Rc<RefCell<TextField>>,
}

impl MountedField {
    pub fn handle(&self) -> FieldHandle {
        self.field.clone()
    }

    pub fn value(&self) -> String {
        use kioskboard::field::EditableField;
        self.field.borrow().value().to_string()
    }

    pub fn caret(&self) -> usize {
        self.field.borrow().caret()
    }

    pub fn select(&self, start: usize, end: usize) {
        self.field.borrow_mut().set_selection(start, end);
    }
}

/// Mounts `field` under `parent` with `element`.
pub fn mount_field(
    doc: &Rc<Document>,
    parent: NodeId,
    element: Element,
    field: TextField,
) -> MountedField {
    let field = Rc::new(RefCell::new(field));
    let node = doc
        .append_field(parent, element, field.clone())
        .expect("Failed to mount field");
    MountedField { node, field }
}

/// Mounts a plain text field holding `value` under the root.
pub fn text_field(doc: &Rc<Document>, value: &str) -> MountedField {
    mount_field(
        doc,
        doc.root(),
        Element::text_field(),
        TextField::single_line().with_value(value),
    )
}

/// A store with `field` as its target, in `layout`.
pub fn store_targeting(field: &MountedField, layout: KeyboardLayout) -> KeyboardStore {
    let store = KeyboardStore::new(layout);
    store.set_input_ref(&field.handle());
    store
}

/// A fresh document with the provider mounted.
pub fn kiosk() -> (Rc<Document>, KeyboardProvider) {
    let doc = Document::new();
    let provider = KeyboardProvider::mount(Rc::clone(&doc));
    (doc, provider)
}

/// Creates a temporary config directory holding `config`.
pub fn temp_config_dir(config: &Config) -> TempDir {
    let dir = TempDir::new().expect("Failed to create temp dir");
    config
        .save_to(&dir.path().join("config.toml"))
        .expect("Failed to write config");
    dir
}
