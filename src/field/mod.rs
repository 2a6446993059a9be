//! The capability set the keyboard needs from a focused text field.
//!
//! The store never branches on what kind of field it is editing. Anything
//! implementing [`EditableField`] is edited the same way, whether it is a
//! single-line input, a multi-line area, or a test double.

pub mod text_field;

use std::cell::RefCell;
use std::rc::{Rc, Weak};

use crate::document::FocusLink;

pub use text_field::{FieldKind, SubscriptionId, TextField};

/// Shared handle to a field. The hosting document owns it.
pub type FieldHandle = Rc<RefCell<dyn EditableField>>;

/// Non-owning handle to a field, as held by the keyboard store.
pub type WeakFieldHandle = Weak<RefCell<dyn EditableField>>;

/// A half-open character range `[start, end)` within a field value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Selection {
    /// First selected character
    pub start: usize,
    /// One past the last selected character
    pub end: usize,
}

impl Selection {
    /// Creates a selection.
    #[must_use]
    pub const fn new(start: usize, end: usize) -> Self {
        Self { start, end }
    }

    /// A collapsed selection (plain caret).
    #[must_use]
    pub const fn caret(at: usize) -> Self {
        Self { start: at, end: at }
    }

    /// True if nothing is selected.
    #[must_use]
    pub const fn is_collapsed(&self) -> bool {
        self.start == self.end
    }
}

/// Callback run with the field value after an accepted edit.
pub type ChangeListener = Rc<dyn Fn(&str)>;

/// A focusable text-input-like object.
///
/// Focus and change announcements involve foreign callbacks that may borrow
/// the field again. Implementations therefore hand out owned data
/// ([`FocusLink`], cloned listeners) and [`request_focus`] and
/// [`announce_change`] run them after the field borrow has ended.
pub trait EditableField {
    /// Current text.
    fn value(&self) -> &str;

    /// Current selection, or `None` if the field does not track one.
    fn selection(&self) -> Option<Selection>;

    /// Replaces the text and collapses the selection to `caret`.
    fn set_value_and_selection(&mut self, value: String, caret: usize);

    /// Where focus requests for this field go, if it is mounted.
    fn focus_link(&self) -> Option<FocusLink>;

    /// True while the field can still receive focus and edits.
    fn is_connected(&self) -> bool;

    /// Everything bound to value changes of this field.
    fn change_listeners(&self) -> Vec<ChangeListener> {
        Vec::new()
    }

    /// Called by the document when the field is mounted under a node.
    fn attach(&mut self, _link: FocusLink) {}
}

/// Focuses `field` through its document. A no-op if it is already focused
/// or not mounted.
pub fn request_focus(field: &FieldHandle) -> bool {
    let link = field.borrow().focus_link();
    link.is_some_and(|link| link.focus())
}

/// Runs the change listeners of `field` with a snapshot of its value.
pub fn announce_change(field: &FieldHandle) {
    let (value, listeners) = {
        let current = field.borrow();
        (current.value().to_string(), current.change_listeners())
    };
    for listener in listeners {
        listener(&value);
    }
}

/// True if both handles point at the same field.
#[must_use]
pub fn same_field(a: &FieldHandle, b: &FieldHandle) -> bool {
    Rc::as_ptr(a).cast::<()>() == Rc::as_ptr(b).cast::<()>()
}

/// True if the weak handle points at `field`.
#[must_use]
pub fn weak_points_to(weak: &WeakFieldHandle, field: &FieldHandle) -> bool {
    Weak::as_ptr(weak).cast::<()>() == Rc::as_ptr(field).cast::<()>()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_selection_helpers() {
        assert!(Selection::caret(3).is_collapsed());
        assert!(!Selection::new(1, 3).is_collapsed());
        assert_eq!(Selection::default(), Selection::caret(0));
    }

    #[test]
    fn test_handle_identity() {
        let a: FieldHandle = Rc::new(RefCell::new(TextField::single_line()));
        let b: FieldHandle = Rc::new(RefCell::new(TextField::single_line()));
        let a2 = Rc::clone(&a);

        assert!(same_field(&a, &a2));
        assert!(!same_field(&a, &b));
        assert!(weak_points_to(&Rc::downgrade(&a), &a2));
        assert!(!weak_points_to(&Rc::downgrade(&b), &a));
    }

    #[test]
    fn test_listener_may_write_back_to_its_field() {
        let field = Rc::new(RefCell::new(TextField::single_line().with_value("abc")));
        let weak = Rc::downgrade(&field);
        field.borrow().on_change(move |value| {
            if let Some(field) = weak.upgrade() {
                field.borrow_mut().set_value(value.to_uppercase());
            }
        });

        let handle: FieldHandle = field.clone();
        announce_change(&handle);
        assert_eq!(field.borrow().value(), "ABC");
    }

    #[test]
    fn test_unmounted_field_ignores_focus_requests() {
        let handle: FieldHandle = Rc::new(RefCell::new(TextField::single_line()));
        assert!(!request_focus(&handle));
    }
}
