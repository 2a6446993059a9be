//! Binds a [`KeyboardStore`] to a [`Document`].
//!
//! The provider is created once at the application root. Mounting attaches
//! one document-wide `FocusIn` listener and one `PointerDown` listener;
//! dropping the provider detaches them again.

use std::rc::Rc;

use crate::document::{Document, DocumentEvent, EventKind, ListenerId, ListenerScope, Role};
use crate::models::KeyboardState;

use super::KeyboardStore;

/// Owner of the process-wide keyboard store and its global listeners.
#[derive(Debug)]
pub struct KeyboardProvider {
    store: KeyboardStore,
    document: Rc<Document>,
    listeners: Vec<ListenerId>,
}

impl KeyboardProvider {
    /// Mounts a fresh, hidden keyboard on `document`.
    pub fn mount(document: Rc<Document>) -> Self {
        Self::mount_with_state(document, KeyboardState::default())
    }

    /// Mounts a keyboard with an explicit initial state.
    pub fn mount_with_state(document: Rc<Document>, initial: KeyboardState) -> Self {
        let store = KeyboardStore::with_state(initial);

        let focus_store = store.clone();
        let focus = document.add_listener(
            ListenerScope::Document,
            EventKind::FocusIn,
            move |event, doc| handle_focus_in(&focus_store, event, doc),
        );
        let pointer = document.add_listener(
            ListenerScope::Document,
            EventKind::PointerDown,
            handle_pointer_down,
        );
        tracing::debug!("keyboard provider mounted");

        Self {
            store,
            document,
            listeners: vec![focus, pointer],
        }
    }

    /// The shared store. Clones are cheap and all see the same state.
    #[must_use]
    pub fn store(&self) -> KeyboardStore {
        self.store.clone()
    }

    /// The document the provider listens on.
    #[must_use]
    pub const fn document(&self) -> &Rc<Document> {
        &self.document
    }

    /// Detaches the global listeners. Same as dropping the provider.
    pub fn unmount(self) {}
}

impl Drop for KeyboardProvider {
    fn drop(&mut self) {
        for id in self.listeners.drain(..) {
            self.document.remove_listener(id);
        }
        tracing::debug!("keyboard provider unmounted");
    }
}

/// Adopts any focused text field outside an opt-out subtree.
fn handle_focus_in(store: &KeyboardStore, event: &DocumentEvent, doc: &Document) {
    if doc.closest(event.target, |el| el.attributes.no_osk).is_some() {
        tracing::trace!(node = %event.target, "focus inside opt-out subtree, ignoring");
        return;
    }
    let Some(element) = doc.element(event.target) else {
        return;
    };
    if !element.role.is_text_field() {
        return;
    }
    let Some(field) = doc.field(event.target) else {
        return;
    };

    let layout = element.attributes.requested_layout();
    tracing::debug!(node = %event.target, %layout, "captured focused field");
    store.capture_focus(&field, layout);
}

/// Observes pointer-downs outside the keyboard and text fields.
///
/// Kiosk terminals keep the keyboard up until it is explicitly hidden, so this
/// never hides anything.
fn handle_pointer_down(event: &DocumentEvent, doc: &Document) {
    let on_keyboard = doc
        .closest(event.target, |el| el.role == Role::KeyboardSurface)
        .is_some();
    let on_field = doc
        .element(event.target)
        .is_some_and(|el| el.role.is_text_field());
    if !on_keyboard && !on_field {
        tracing::trace!(node = %event.target, "pointer down outside keyboard; keeping it open");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;

    use crate::document::{Element, InputType};
    use crate::field::{FieldHandle, TextField};
    use crate::models::KeyboardLayout;

    fn field() -> FieldHandle {
        Rc::new(RefCell::new(TextField::single_line()))
    }

    #[test]
    fn test_mount_and_unmount_listeners() {
        let doc = Document::new();
        let provider = KeyboardProvider::mount(Rc::clone(&doc));
        assert_eq!(doc.listener_count(), 2);
        provider.unmount();
        assert_eq!(doc.listener_count(), 0);
    }

    #[test]
    fn test_focus_captures_field_and_layout() {
        let doc = Document::new();
        let provider = KeyboardProvider::mount(Rc::clone(&doc));
        let store = provider.store();
        let tel = Element::text_field().with_input_type(InputType::Tel);
        let phone = doc.append_field(doc.root(), tel, field()).unwrap();

        doc.focus(phone);
        assert!(store.is_visible());
        assert_eq!(store.layout(), KeyboardLayout::Numeric);
        assert!(store.has_target());
    }

    #[test]
    fn test_unmounted_provider_ignores_focus() {
        let doc = Document::new();
        let store = KeyboardProvider::mount(Rc::clone(&doc)).store();
        let name = doc.append_field(doc.root(), Element::text_field(), field()).unwrap();

        doc.focus(name);
        assert!(!store.is_visible());
        assert!(!store.has_target());
    }

    #[test]
    fn test_focus_on_button_does_nothing() {
        let doc = Document::new();
        let provider = KeyboardProvider::mount(Rc::clone(&doc));
        let button = doc.append(doc.root(), Element::button("Book")).unwrap();

        doc.focus(button);
        assert!(!provider.store().is_visible());
    }

    #[test]
    fn test_pointer_down_outside_keeps_keyboard() {
        let doc = Document::new();
        let provider = KeyboardProvider::mount(Rc::clone(&doc));
        let store = provider.store();
        let name = doc.append_field(doc.root(), Element::text_field(), field()).unwrap();
        let page = doc.append(doc.root(), Element::container()).unwrap();

        doc.focus(name);
        doc.pointer_down(page);
        assert!(store.is_visible());
    }
}
