//! Concrete text field used by kiosk pages.

use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;
use std::sync::atomic::{AtomicU64, Ordering};

use super::{ChangeListener, EditableField, Selection};
use crate::document::FocusLink;

/// Single-line or multi-line field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum FieldKind {
    /// One line of text
    #[default]
    SingleLine,
    /// Multiple lines of text
    MultiLine,
}

/// Handle returned by [`TextField::on_change`]. Unique across all fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

static NEXT_SUBSCRIPTION: AtomicU64 = AtomicU64::new(0);

/// A text field with a value, a selection, and change subscribers.
///
/// Once mounted in a document its focus requests go through the document,
/// so focusing it dispatches the same `FocusIn` a click would.
pub struct TextField {
    kind: FieldKind,
    value: String,
    selection: Selection,
    tracks_selection: bool,
    link: Option<FocusLink>,
    subscribers: RefCell<Vec<(SubscriptionId, ChangeListener)>>,
}

impl fmt::Debug for TextField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TextField")
            .field("kind", &self.kind)
            .field("value", &self.value)
            .field("selection", &self.selection)
            .field("tracks_selection", &self.tracks_selection)
            .field("node", &self.link.as_ref().map(FocusLink::node))
            .finish_non_exhaustive()
    }
}

impl TextField {
    /// Creates an empty field.
    #[must_use]
    pub fn new(kind: FieldKind) -> Self {
        Self {
            kind,
            value: String::new(),
            selection: Selection::default(),
            tracks_selection: true,
            link: None,
            subscribers: RefCell::new(Vec::new()),
        }
    }

    /// Creates an empty single-line field.
    #[must_use]
    pub fn single_line() -> Self {
        Self::new(FieldKind::SingleLine)
    }

    /// Creates an empty multi-line field.
    #[must_use]
    pub fn multi_line() -> Self {
        Self::new(FieldKind::MultiLine)
    }

    /// Sets the initial value with the caret at the end.
    #[must_use]
    pub fn with_value(mut self, value: impl Into<String>) -> Self {
        self.set_value(value);
        self
    }

    /// Makes the field report no selection, like inputs that do not expose one.
    #[must_use]
    pub const fn without_selection(mut self) -> Self {
        self.tracks_selection = false;
        self
    }

    /// Field kind.
    #[must_use]
    pub const fn kind(&self) -> FieldKind {
        self.kind
    }

    /// Replaces the value and moves the caret to the end. Does not notify.
    pub fn set_value(&mut self, value: impl Into<String>) {
        self.value = value.into();
        self.selection = Selection::caret(self.char_len());
    }

    /// Sets the selection, clamped to the value and ordered.
    pub fn set_selection(&mut self, start: usize, end: usize) {
        let len = self.char_len();
        let (a, b) = (start.min(len), end.min(len));
        self.selection = Selection::new(a.min(b), a.max(b));
    }

    /// Caret position (end of the selection).
    #[must_use]
    pub const fn caret(&self) -> usize {
        self.selection.end
    }

    /// Value length in characters.
    #[must_use]
    pub fn char_len(&self) -> usize {
        self.value.chars().count()
    }

    /// True if this field currently has document focus.
    #[must_use]
    pub fn has_focus(&self) -> bool {
        self.link.as_ref().is_some_and(FocusLink::is_focused)
    }

    /// Subscribes to value-changed notifications.
    pub fn on_change(&self, callback: impl Fn(&str) + 'static) -> SubscriptionId {
        let id = SubscriptionId(NEXT_SUBSCRIPTION.fetch_add(1, Ordering::Relaxed));
        self.subscribers.borrow_mut().push((id, Rc::new(callback)));
        id
    }

    /// Removes a subscription. Returns false if it was already gone.
    pub fn unsubscribe(&self, id: SubscriptionId) -> bool {
        let mut subscribers = self.subscribers.borrow_mut();
        let before = subscribers.len();
        subscribers.retain(|(sub, _)| *sub != id);
        subscribers.len() != before
    }

    /// Moves every subscription of `other` onto this field. Their ids stay valid.
    pub fn adopt_subscribers(&self, other: &Self) {
        let moved = std::mem::take(&mut *other.subscribers.borrow_mut());
        self.subscribers.borrow_mut().extend(moved);
    }
}

impl EditableField for TextField {
    fn value(&self) -> &str {
        &self.value
    }

    fn selection(&self) -> Option<Selection> {
        self.tracks_selection.then_some(self.selection)
    }

    fn set_value_and_selection(&mut self, value: String, caret: usize) {
        self.value = value;
        let caret = caret.min(self.char_len());
        self.selection = Selection::caret(caret);
    }

    fn focus_link(&self) -> Option<FocusLink> {
        self.link.clone()
    }

    fn is_connected(&self) -> bool {
        self.link.as_ref().is_some_and(FocusLink::is_connected)
    }

    fn change_listeners(&self) -> Vec<ChangeListener> {
        self.subscribers
            .borrow()
            .iter()
            .map(|(_, listener)| Rc::clone(listener))
            .collect()
    }

    fn attach(&mut self, link: FocusLink) {
        self.link = Some(link);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::field::{announce_change, FieldHandle};

    #[test]
    fn test_with_value_places_caret_at_end() {
        let field = TextField::single_line().with_value("héllo");
        assert_eq!(field.selection(), Some(Selection::caret(5)));
        assert_eq!(field.caret(), 5);
    }

    #[test]
    fn test_set_selection_clamps_and_orders() {
        let mut field = TextField::single_line().with_value("abc");
        field.set_selection(9, 1);
        assert_eq!(field.selection(), Some(Selection::new(1, 3)));
    }

    #[test]
    fn test_without_selection_reports_none() {
        let field = TextField::single_line().with_value("abc").without_selection();
        assert_eq!(field.selection(), None);
    }

    #[test]
    fn test_unmounted_field_is_not_connected() {
        let field = TextField::multi_line();
        assert!(!field.is_connected());
        assert!(!field.has_focus());
        assert!(field.focus_link().is_none());
    }

    #[test]
    fn test_notify_and_unsubscribe() {
        let field = Rc::new(RefCell::new(TextField::single_line().with_value("42")));
        let seen = Rc::new(RefCell::new(Vec::new()));
        let seen_clone = Rc::clone(&seen);
        let id = field
            .borrow()
            .on_change(move |value| seen_clone.borrow_mut().push(value.to_string()));
        let handle: FieldHandle = field.clone();

        announce_change(&handle);
        assert!(field.borrow().unsubscribe(id));
        announce_change(&handle);

        assert_eq!(*seen.borrow(), vec!["42".to_string()]);
    }

    #[test]
    fn test_set_value_and_selection_clamps_caret() {
        let mut field = TextField::single_line();
        field.set_value_and_selection("ab".to_string(), 10);
        assert_eq!(field.caret(), 2);
    }

    #[test]
    fn test_adopted_subscribers_keep_their_ids() {
        let old = TextField::single_line();
        let seen = Rc::new(RefCell::new(Vec::new()));
        let seen_clone = Rc::clone(&seen);
        let id = old.on_change(move |value| seen_clone.borrow_mut().push(value.to_string()));

        let new = Rc::new(RefCell::new(TextField::single_line().with_value("moved")));
        new.borrow().adopt_subscribers(&old);
        assert!(!old.unsubscribe(id));

        let handle: FieldHandle = new.clone();
        announce_change(&handle);
        assert!(new.borrow().unsubscribe(id));
        assert_eq!(*seen.borrow(), vec!["moved".to_string()]);
    }
}
