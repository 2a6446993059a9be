//! Keyboard state store.
//!
//! [`KeyboardStore`] owns visibility and layout and mediates every text edit
//! against the currently captured field. It is a cheap clonable handle; all
//! clones share one state. Construct it through [`KeyboardProvider`] to get
//! automatic focus capture, or directly with [`KeyboardStore::new`] when the
//! document wiring is not wanted (tests, embedding).
//!
//! The target field is held weakly and re-validated before every edit. A
//! field that was dropped or removed from its document is treated exactly
//! like no field at all.

pub mod provider;

use std::cell::RefCell;
use std::rc::{Rc, Weak};

use crate::editing::{apply_key, Declined, Edit};
use crate::field::{
    announce_change, request_focus, weak_points_to, FieldHandle, WeakFieldHandle,
};
use crate::models::{KeyToken, KeyboardLayout, KeyboardState};

pub use provider::KeyboardProvider;

/// Outcome of [`KeyboardStore::press_key`].
///
/// Callers are free to ignore it; a declined press is not an error.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum KeyOutcome {
    /// The field was edited
    Applied(Edit),
    /// Nothing happened
    Declined(Declined),
}

impl KeyOutcome {
    /// True if the field was edited.
    #[must_use]
    pub const fn is_applied(&self) -> bool {
        matches!(self, Self::Applied(_))
    }
}

/// Handle returned by [`KeyboardStore::subscribe`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ObserverId(u64);

type Observer = Rc<dyn Fn(KeyboardState)>;

struct StoreInner {
    state: KeyboardState,
    target: Option<WeakFieldHandle>,
    observers: Vec<(ObserverId, Observer)>,
    next_observer: u64,
}

/// Shared on-screen keyboard state.
#[derive(Clone)]
pub struct KeyboardStore {
    inner: Rc<RefCell<StoreInner>>,
}

impl std::fmt::Debug for KeyboardStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let inner = self.inner.borrow();
        f.debug_struct("KeyboardStore")
            .field("state", &inner.state)
            .field("has_target", &inner.target.is_some())
            .field("observers", &inner.observers.len())
            .finish()
    }
}

impl Default for KeyboardStore {
    fn default() -> Self {
        Self::new(KeyboardLayout::Default)
    }
}

impl KeyboardStore {
    /// Creates a hidden keyboard with no target.
    #[must_use]
    pub fn new(layout: KeyboardLayout) -> Self {
        Self::with_state(KeyboardState::new(layout))
    }

    /// Creates a store with an explicit initial state.
    #[must_use]
    pub fn with_state(state: KeyboardState) -> Self {
        Self {
            inner: Rc::new(RefCell::new(StoreInner {
                state,
                target: None,
                observers: Vec::new(),
                next_observer: 0,
            })),
        }
    }

    // ------------------------------------------------------------------
    // State
    // ------------------------------------------------------------------

    /// Current visibility and layout.
    #[must_use]
    pub fn snapshot(&self) -> KeyboardState {
        self.inner.borrow().state
    }

    /// True if the surface should be shown.
    #[must_use]
    pub fn is_visible(&self) -> bool {
        self.inner.borrow().state.visible
    }

    /// Current layout.
    #[must_use]
    pub fn layout(&self) -> KeyboardLayout {
        self.inner.borrow().state.layout
    }

    /// Shows the keyboard. Idempotent.
    pub fn show_keyboard(&self) {
        self.update(|state| state.visible = true);
    }

    /// Hides the keyboard. Keeps the target so showing it again resumes editing.
    pub fn hide_keyboard(&self) {
        self.update(|state| state.visible = false);
    }

    /// Selects a layout. Never touches the target's content.
    pub fn set_layout(&self, layout: KeyboardLayout) {
        self.update(|state| state.layout = layout);
    }

    /// Subscribes to visibility/layout changes.
    pub fn subscribe(&self, observer: impl Fn(KeyboardState) + 'static) -> ObserverId {
        let mut inner = self.inner.borrow_mut();
        let id = ObserverId(inner.next_observer);
        inner.next_observer += 1;
        inner.observers.push((id, Rc::new(observer)));
        id
    }

    /// Removes an observer. Returns false if it was already gone.
    pub fn unsubscribe(&self, id: ObserverId) -> bool {
        let mut inner = self.inner.borrow_mut();
        let before = inner.observers.len();
        inner.observers.retain(|(observer, _)| *observer != id);
        inner.observers.len() != before
    }

    /// Applies `change` and notifies observers if the state actually changed.
    fn update(&self, change: impl FnOnce(&mut KeyboardState)) {
        let (state, observers) = {
            let mut inner = self.inner.borrow_mut();
            let before = inner.state;
            change(&mut inner.state);
            if inner.state == before {
                return;
            }
            let observers: Vec<Observer> = inner
                .observers
                .iter()
                .map(|(_, o)| Rc::clone(o))
                .collect();
            (inner.state, observers)
        };
        tracing::trace!(visible = state.visible, layout = %state.layout, "keyboard state changed");
        for observer in observers {
            observer(state);
        }
    }

    // ------------------------------------------------------------------
    // Target
    // ------------------------------------------------------------------

    /// Records `field` as the target. The store keeps only a weak reference.
    pub fn set_input_ref(&self, field: &FieldHandle) {
        let mut inner = self.inner.borrow_mut();
        if inner.target.as_ref().is_some_and(|t| weak_points_to(t, field)) {
            return;
        }
        inner.target = Some(Rc::downgrade(field));
        tracing::debug!("registered keyboard target");
    }

    /// Forgets the target.
    pub fn clear_input_ref(&self) {
        self.inner.borrow_mut().target = None;
    }

    /// The target, if it is still alive and connected to its document.
    #[must_use]
    pub fn target(&self) -> Option<FieldHandle> {
        self.live_target().ok()
    }

    /// True if a live target is captured.
    #[must_use]
    pub fn has_target(&self) -> bool {
        self.live_target().is_ok()
    }

    fn live_target(&self) -> Result<FieldHandle, Declined> {
        let weak = self
            .inner
            .borrow()
            .target
            .clone()
            .ok_or(Declined::NoTarget)?;
        let field = Weak::upgrade(&weak).ok_or(Declined::TargetDetached)?;
        if !field.borrow().is_connected() {
            return Err(Declined::TargetDetached);
        }
        Ok(field)
    }

    /// Adopts a field that just received focus: target, visibility and layout together.
    pub(crate) fn capture_focus(&self, field: &FieldHandle, layout: KeyboardLayout) {
        self.set_input_ref(field);
        self.update(|state| {
            state.visible = true;
            state.layout = layout;
        });
    }

    // ------------------------------------------------------------------
    // Editing
    // ------------------------------------------------------------------

    /// Applies a raw key token (`"Backspace"`, `"Space"`, `"Enter"` or a glyph)
    /// to the target.
    pub fn press_key(&self, key: &str) -> KeyOutcome {
        self.press(&KeyToken::parse(key))
    }

    /// Applies a parsed key token to the target.
    ///
    /// Declined presses leave the field untouched and surface nothing to the
    /// user. Accepted ones write the new value and caret, re-focus the field
    /// and announce the change to its subscribers. No borrow of the field is
    /// held while focus listeners or change subscribers run, so they may read
    /// or edit the field themselves.
    pub fn press(&self, key: &KeyToken) -> KeyOutcome {
        let layout = self.layout();
        let field = match self.live_target() {
            Ok(field) => field,
            Err(reason) => {
                tracing::debug!(?key, %reason, "key press ignored");
                return KeyOutcome::Declined(reason);
            }
        };

        let result = {
            let current = field.borrow();
            apply_key(current.value(), current.selection(), key, layout)
        };
        let edit = match result {
            Ok(edit) => edit,
            Err(reason) => {
                tracing::debug!(?key, %layout, %reason, "key press declined");
                return KeyOutcome::Declined(reason);
            }
        };

        field
            .borrow_mut()
            .set_value_and_selection(edit.value.clone(), edit.caret);
        request_focus(&field);
        announce_change(&field);
        tracing::trace!(?key, caret = edit.caret, "key press applied");

        KeyOutcome::Applied(edit)
    }
}
