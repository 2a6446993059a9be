//! Automatic focus capture by the provider and explicit registration by the
//! text-field wrapper.

mod fixtures;
use fixtures::*;

use std::cell::RefCell;
use std::rc::Rc;

use kioskboard::document::{Element, EventKind, InputMode, InputType, ListenerScope};
use kioskboard::field::TextField;
use kioskboard::keyboard_input::{InputProps, KeyboardInput};
use kioskboard::models::{KeyboardLayout, KeyboardState};
use kioskboard::store::KeyboardProvider;

// ============================================================================
// Global focus listener
// ============================================================================

#[test]
fn test_focus_captures_plain_field() {
    let (doc, provider) = kiosk();
    let store = provider.store();
    let field = text_field(&doc, "abc");

    assert!(doc.focus(field.node));
    assert!(store.is_visible());
    assert_eq!(store.layout(), KeyboardLayout::Default);

    store.press_key("d");
    assert_eq!(field.value(), "abcd");
}

#[test]
fn test_layout_hints_pick_numeric_pad() {
    let (doc, provider) = kiosk();
    let store = provider.store();
    let tel = mount_field(
        &doc,
        doc.root(),
        Element::text_field().with_input_type(InputType::Tel),
        TextField::single_line(),
    );
    let pin = mount_field(
        &doc,
        doc.root(),
        Element::text_field().with_input_mode(InputMode::Numeric),
        TextField::single_line(),
    );
    let name = text_field(&doc, "");

    doc.focus(tel.node);
    assert_eq!(store.layout(), KeyboardLayout::Numeric);
    doc.focus(name.node);
    assert_eq!(store.layout(), KeyboardLayout::Default);
    doc.focus(pin.node);
    assert_eq!(store.layout(), KeyboardLayout::Numeric);
}

#[test]
fn test_telephone_kind_beats_text_hint() {
    let (doc, provider) = kiosk();
    let store = provider.store();
    let field = mount_field(
        &doc,
        doc.root(),
        Element::text_field()
            .with_input_type(InputType::Tel)
            .with_input_mode(InputMode::Text),
        TextField::single_line(),
    );

    doc.focus(field.node);
    assert_eq!(store.layout(), KeyboardLayout::Numeric);
}

#[test]
fn test_opt_out_subtree_is_ignored() {
    let (doc, provider) = kiosk();
    let store = provider.store();
    let outside = text_field(&doc, "");
    let admin = doc.append(doc.root(), Element::container().no_osk()).unwrap();
    let panel = doc.append(admin, Element::container()).unwrap();
    let inside = mount_field(&doc, panel, Element::text_field(), TextField::single_line());

    doc.focus(inside.node);
    assert!(!store.is_visible());
    assert!(!store.has_target());

    doc.focus(outside.node);
    store.hide_keyboard();
    doc.focus(inside.node);
    assert!(!store.is_visible());
    let target = store.target().unwrap();
    assert!(kioskboard::field::same_field(&target, &outside.handle()));
}

#[test]
fn test_opt_out_marker_added_later_is_honoured() {
    let (doc, provider) = kiosk();
    let store = provider.store();
    let section = doc.append(doc.root(), Element::container()).unwrap();
    let field = mount_field(&doc, section, Element::text_field(), TextField::single_line());

    doc.update_attributes(section, |attrs| attrs.no_osk = true);
    doc.focus(field.node);
    assert!(!store.is_visible());
}

#[test]
fn test_buttons_do_not_capture() {
    let (doc, provider) = kiosk();
    let store = provider.store();
    let field = text_field(&doc, "");
    let button = doc.append(doc.root(), Element::button("Next")).unwrap();

    doc.focus(field.node);
    doc.focus(button);
    assert!(store.is_visible());
    assert!(store.has_target());

    store.press_key("z");
    assert_eq!(field.value(), "z");
}

#[test]
fn test_most_recent_focus_wins() {
    let (doc, provider) = kiosk();
    let store = provider.store();
    let first = text_field(&doc, "");
    let second = text_field(&doc, "");

    doc.focus(first.node);
    doc.focus(second.node);
    store.press_key("x");

    assert_eq!(first.value(), "");
    assert_eq!(second.value(), "x");
}

#[test]
fn test_pointer_down_outside_keeps_keyboard() {
    let (doc, provider) = kiosk();
    let store = provider.store();
    let field = text_field(&doc, "");
    let backdrop = doc.append(doc.root(), Element::container()).unwrap();

    doc.focus(field.node);
    doc.pointer_down(backdrop);
    assert!(store.is_visible());
    assert!(store.has_target());
}

#[test]
fn test_unmount_detaches_listeners() {
    let doc = kioskboard::document::Document::new();
    let provider = KeyboardProvider::mount(Rc::clone(&doc));
    let store = provider.store();
    assert_eq!(doc.listener_count(), 2);

    provider.unmount();
    assert_eq!(doc.listener_count(), 0);

    let field = text_field(&doc, "");
    doc.focus(field.node);
    assert!(!store.is_visible());
}

#[test]
fn test_observers_see_focus_transitions() {
    let (doc, provider) = kiosk();
    let store = provider.store();
    let seen = Rc::new(RefCell::new(Vec::new()));
    let seen_clone = Rc::clone(&seen);
    store.subscribe(move |state| seen_clone.borrow_mut().push(state));
    let tel = mount_field(
        &doc,
        doc.root(),
        Element::text_field().with_input_type(InputType::Tel),
        TextField::single_line(),
    );

    doc.focus(tel.node);
    store.hide_keyboard();
    store.hide_keyboard();

    assert_eq!(
        *seen.borrow(),
        vec![
            KeyboardState {
                visible: true,
                layout: KeyboardLayout::Numeric
            },
            KeyboardState {
                visible: false,
                layout: KeyboardLayout::Numeric
            },
        ]
    );
}

// ============================================================================
// Text-field wrapper
// ============================================================================

#[test]
fn test_wrapper_and_listener_agree_on_numeric_only() {
    let (doc, provider) = kiosk();
    let store = provider.store();
    let input = KeyboardInput::mount(
        &doc,
        doc.root(),
        InputProps::new("Phone")
            .input_type(InputType::Tel)
            .numeric_only(false),
        &store,
    )
    .unwrap();

    doc.focus(input.node());
    assert!(store.is_visible());
    assert_eq!(store.layout(), KeyboardLayout::Default);

    store.press_key("a");
    assert_eq!(input.value(), "a");
}

#[test]
fn test_wrapper_registers_on_mount_without_focus() {
    let (doc, provider) = kiosk();
    let store = provider.store();
    let input = KeyboardInput::mount(&doc, doc.root(), InputProps::new("Note"), &store).unwrap();

    store.press_key("h");
    store.press_key("i");
    assert_eq!(input.value(), "hi");
    assert_eq!(doc.focused(), Some(input.node()));
}

#[test]
fn test_wrapper_touch_end_refocuses_field() {
    let (doc, provider) = kiosk();
    let store = provider.store();
    let input = KeyboardInput::mount(&doc, doc.root(), InputProps::new("Name"), &store).unwrap();
    let button = doc.append(doc.root(), Element::button("Next")).unwrap();

    doc.focus(button);
    assert!(!input.has_focus());
    doc.touch_end(input.node());
    assert!(input.has_focus());
    assert!(store.is_visible());
}

#[test]
fn test_wrapper_rebind_swaps_target() {
    let (doc, provider) = kiosk();
    let store = provider.store();
    let mut input =
        KeyboardInput::mount(&doc, doc.root(), InputProps::new("Name"), &store).unwrap();
    let old = input.field();

    assert!(input.rebind(TextField::single_line().with_value("new")));
    store.press_key("!");

    assert_eq!(input.value(), "new!");
    use kioskboard::field::EditableField;
    assert_eq!(old.borrow().value(), "");
}

#[test]
fn test_wrapper_rebind_keeps_change_subscribers() {
    let (doc, provider) = kiosk();
    let store = provider.store();
    let mut input =
        KeyboardInput::mount(&doc, doc.root(), InputProps::new("Name"), &store).unwrap();
    let seen = Rc::new(RefCell::new(Vec::new()));
    let seen_clone = Rc::clone(&seen);
    let id = input.on_change(move |value| seen_clone.borrow_mut().push(value.to_string()));

    assert!(input.rebind(TextField::single_line().with_value("ab")));
    store.press_key("c");

    assert_eq!(*seen.borrow(), vec!["abc".to_string()]);
    assert!(input.field().borrow().unsubscribe(id));
}

#[test]
fn test_wrapper_touch_end_survives_select_all_listener() {
    let (doc, provider) = kiosk();
    let store = provider.store();
    let input = KeyboardInput::mount(
        &doc,
        doc.root(),
        InputProps::new("PIN").numeric_only(true).value("12"),
        &store,
    )
    .unwrap();
    let button = doc.append(doc.root(), Element::button("Next")).unwrap();
    let field = Rc::downgrade(&input.field());
    doc.add_listener(
        ListenerScope::Node(input.node()),
        EventKind::FocusIn,
        move |_, _| {
            if let Some(field) = field.upgrade() {
                field.borrow_mut().set_selection(0, usize::MAX);
            }
        },
    );

    doc.focus(button);
    doc.touch_end(input.node());
    assert!(input.has_focus());

    store.press_key("7");
    assert_eq!(input.value(), "7");
}

#[test]
fn test_unmounted_wrapper_is_fail_soft() {
    let (doc, provider) = kiosk();
    let store = provider.store();
    let input = KeyboardInput::mount(&doc, doc.root(), InputProps::new("Name"), &store).unwrap();
    doc.focus(input.node());
    drop(input);

    assert!(!store.has_target());
    assert!(!store.press_key("a").is_applied());
    assert!(store.is_visible());
}
