//! A small focus tree standing in for the host UI's document.
//!
//! The keyboard only needs to know which element has focus, what that element
//! declares about itself, and whether an ancestor opted out. `Document` keeps
//! exactly that: an element tree, the focused node, and listeners for the
//! handful of events the keyboard reacts to.
//!
//! Every method takes `&self`. State lives behind `RefCell`/`Cell` and no
//! borrow is held while a listener runs, so a listener may call back into the
//! document (for example to move focus) without panicking.

pub mod element;

use anyhow::Result;
use std::cell::{Cell, RefCell};
use std::fmt;
use std::rc::{Rc, Weak};

use crate::field::FieldHandle;

pub use element::{Attributes, Element, InputMode, InputType, Role};

/// Identifier of a node. Ids are never reused, so a removed node's id stays stale.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(usize);

impl NodeId {
    /// Raw index, mostly useful for logging.
    #[must_use]
    pub const fn index(self) -> usize {
        self.0
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Events the document dispatches.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventKind {
    /// An element received focus
    FocusIn,
    /// A pointer went down on an element
    PointerDown,
    /// A touch ended on an element
    TouchEnd,
}

/// A dispatched event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DocumentEvent {
    /// Event kind
    pub kind: EventKind,
    /// Element the event originated on
    pub target: NodeId,
}

/// Where a listener is attached.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListenerScope {
    /// Fires for events on this node or any descendant
    Node(NodeId),
    /// Fires for every event, after node listeners
    Document,
}

/// Handle returned by [`Document::add_listener`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ListenerId(u64);

/// Listener callback.
pub type Callback = Rc<dyn Fn(&DocumentEvent, &Document)>;

struct Listener {
    id: ListenerId,
    scope: ListenerScope,
    kind: EventKind,
    callback: Callback,
}

struct Node {
    element: Element,
    parent: Option<NodeId>,
    children: Vec<NodeId>,
    field: Option<FieldHandle>,
}

/// Link from a field back to the node that hosts it.
///
/// Holds the document weakly; a field never keeps its document alive.
#[derive(Debug, Clone)]
pub struct FocusLink {
    document: Weak<Document>,
    node: NodeId,
}

impl FocusLink {
    /// Node hosting the field.
    #[must_use]
    pub const fn node(&self) -> NodeId {
        self.node
    }

    /// True while the document is alive and still contains the node.
    #[must_use]
    pub fn is_connected(&self) -> bool {
        self.document
            .upgrade()
            .is_some_and(|doc| doc.contains(self.node))
    }

    /// True if the hosting node currently has focus.
    #[must_use]
    pub fn is_focused(&self) -> bool {
        self.document
            .upgrade()
            .is_some_and(|doc| doc.focused() == Some(self.node))
    }

    /// Moves document focus to the hosting node.
    pub fn focus(&self) -> bool {
        self.document
            .upgrade()
            .is_some_and(|doc| doc.focus(self.node))
    }
}

/// Element tree with focus tracking and event dispatch.
pub struct Document {
    this: Weak<Document>,
    nodes: RefCell<Vec<Option<Node>>>,
    focused: Cell<Option<NodeId>>,
    listeners: RefCell<Vec<Listener>>,
    next_listener: Cell<u64>,
}

impl fmt::Debug for Document {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Document")
            .field("nodes", &self.nodes.borrow().iter().flatten().count())
            .field("focused", &self.focused.get())
            .field("listeners", &self.listeners.borrow().len())
            .finish()
    }
}

impl Document {
    /// Creates an empty document with a root container.
    #[must_use]
    pub fn new() -> Rc<Self> {
        Rc::new_cyclic(|this| Self {
            this: this.clone(),
            nodes: RefCell::new(vec![Some(Node {
                element: Element::container(),
                parent: None,
                children: Vec::new(),
                field: None,
            })]),
            focused: Cell::new(None),
            listeners: RefCell::new(Vec::new()),
            next_listener: Cell::new(0),
        })
    }

    /// The root container.
    #[must_use]
    pub const fn root(&self) -> NodeId {
        NodeId(0)
    }

    // ------------------------------------------------------------------
    // Tree
    // ------------------------------------------------------------------

    /// Appends an element under `parent`.
    pub fn append(&self, parent: NodeId, element: Element) -> Result<NodeId> {
        self.insert(parent, element, None)
    }

    /// Appends a text-field element that hosts `field`.
    ///
    /// The document keeps the only required strong reference to the field;
    /// removing the node releases it.
    pub fn append_field(
        &self,
        parent: NodeId,
        element: Element,
        field: FieldHandle,
    ) -> Result<NodeId> {
        if !element.role.is_text_field() {
            anyhow::bail!("Element with role {:?} cannot host a text field", element.role);
        }
        let node = self.insert(parent, element, Some(Rc::clone(&field)))?;
        field.borrow_mut().attach(FocusLink {
            document: self.this.clone(),
            node,
        });
        Ok(node)
    }

    fn insert(
        &self,
        parent: NodeId,
        element: Element,
        field: Option<FieldHandle>,
    ) -> Result<NodeId> {
        let mut nodes = self.nodes.borrow_mut();
        let id = NodeId(nodes.len());
        match nodes.get_mut(parent.0).and_then(Option::as_mut) {
            Some(parent_node) => parent_node.children.push(id),
            None => anyhow::bail!("Parent node {parent} is not in the document"),
        }
        nodes.push(Some(Node {
            element,
            parent: Some(parent),
            children: Vec::new(),
            field,
        }));
        Ok(id)
    }

    /// Replaces the field hosted by `node`, returning false if the node cannot host one.
    pub fn replace_field(&self, node: NodeId, field: FieldHandle) -> bool {
        {
            let mut nodes = self.nodes.borrow_mut();
            let Some(slot) = nodes.get_mut(node.0).and_then(Option::as_mut) else {
                return false;
            };
            if !slot.element.role.is_text_field() {
                return false;
            }
            slot.field = Some(Rc::clone(&field));
        }
        field.borrow_mut().attach(FocusLink {
            document: self.this.clone(),
            node,
        });
        true
    }

    /// Removes `node` and its subtree. The root cannot be removed.
    pub fn remove(&self, node: NodeId) -> bool {
        if node == self.root() || !self.contains(node) {
            return false;
        }

        let removed_fields = {
            let mut nodes = self.nodes.borrow_mut();
            let parent = nodes[node.0].as_ref().and_then(|n| n.parent);
            if let Some(parent_node) = parent.and_then(|p| nodes[p.0].as_mut()) {
                parent_node.children.retain(|child| *child != node);
            }

            let mut fields = Vec::new();
            let mut stack = vec![node];
            while let Some(id) = stack.pop() {
                if let Some(removed) = nodes[id.0].take() {
                    stack.extend(removed.children);
                    fields.extend(removed.field);
                }
            }
            fields
        };

        if self.focused.get().is_some_and(|id| !self.contains(id)) {
            self.focused.set(None);
        }
        self.listeners.borrow_mut().retain(|listener| match listener.scope {
            ListenerScope::Node(id) => self.contains(id),
            ListenerScope::Document => true,
        });

        tracing::trace!(node = %node, fields = removed_fields.len(), "removed subtree");
        // Strong references held by the tree are released here, outside any borrow.
        drop(removed_fields);
        true
    }

    /// True if `node` is in the document.
    #[must_use]
    pub fn contains(&self, node: NodeId) -> bool {
        self.nodes
            .borrow()
            .get(node.0)
            .is_some_and(Option::is_some)
    }

    /// Returns a copy of the node's element.
    #[must_use]
    pub fn element(&self, node: NodeId) -> Option<Element> {
        self.nodes
            .borrow()
            .get(node.0)
            .and_then(Option::as_ref)
            .map(|n| n.element.clone())
    }

    /// Edits the node's attributes in place.
    pub fn update_attributes(&self, node: NodeId, update: impl FnOnce(&mut Attributes)) -> bool {
        let mut nodes = self.nodes.borrow_mut();
        match nodes.get_mut(node.0).and_then(Option::as_mut) {
            Some(n) => {
                update(&mut n.element.attributes);
                true
            }
            None => false,
        }
    }

    /// Field hosted by the node, if any.
    #[must_use]
    pub fn field(&self, node: NodeId) -> Option<FieldHandle> {
        self.nodes
            .borrow()
            .get(node.0)
            .and_then(Option::as_ref)
            .and_then(|n| n.field.clone())
    }

    /// Parent of the node.
    #[must_use]
    pub fn parent(&self, node: NodeId) -> Option<NodeId> {
        self.nodes
            .borrow()
            .get(node.0)
            .and_then(Option::as_ref)
            .and_then(|n| n.parent)
    }

    /// Children of the node in insertion order.
    #[must_use]
    pub fn children(&self, node: NodeId) -> Vec<NodeId> {
        self.nodes
            .borrow()
            .get(node.0)
            .and_then(Option::as_ref)
            .map(|n| n.children.clone())
            .unwrap_or_default()
    }

    /// The node followed by its ancestors up to the root.
    #[must_use]
    pub fn ancestry(&self, node: NodeId) -> Vec<NodeId> {
        let nodes = self.nodes.borrow();
        let mut path = Vec::new();
        let mut current = Some(node);
        while let Some(id) = current {
            let Some(n) = nodes.get(id.0).and_then(Option::as_ref) else {
                break;
            };
            path.push(id);
            current = n.parent;
        }
        path
    }

    /// Nearest node, starting at `node` itself, whose element matches `predicate`.
    pub fn closest(&self, node: NodeId, predicate: impl Fn(&Element) -> bool) -> Option<NodeId> {
        let nodes = self.nodes.borrow();
        let mut current = Some(node);
        while let Some(id) = current {
            let n = nodes.get(id.0).and_then(Option::as_ref)?;
            if predicate(&n.element) {
                return Some(id);
            }
            current = n.parent;
        }
        None
    }

    /// Focusable nodes in document order.
    #[must_use]
    pub fn focusable_nodes(&self) -> Vec<NodeId> {
        let nodes = self.nodes.borrow();
        let mut out = Vec::new();
        let mut stack = vec![self.root()];
        while let Some(id) = stack.pop() {
            let Some(n) = nodes.get(id.0).and_then(Option::as_ref) else {
                continue;
            };
            if n.element.role.is_focusable() {
                out.push(id);
            }
            stack.extend(n.children.iter().rev().copied());
        }
        out
    }

    // ------------------------------------------------------------------
    // Focus
    // ------------------------------------------------------------------

    /// Currently focused node.
    #[must_use]
    pub fn focused(&self) -> Option<NodeId> {
        self.focused.get()
    }

    /// Moves focus to `node` and dispatches `FocusIn` if focus actually moved.
    ///
    /// Returns false if the node is gone or not focusable.
    pub fn focus(&self, node: NodeId) -> bool {
        let focusable = self
            .element(node)
            .is_some_and(|element| element.role.is_focusable());
        if !focusable {
            return false;
        }
        if self.focused.get() == Some(node) {
            return true;
        }
        self.focused.set(Some(node));
        self.dispatch(EventKind::FocusIn, node);
        true
    }

    /// Moves focus to the next focusable node, wrapping around.
    pub fn focus_next(&self) -> Option<NodeId> {
        self.focus_step(true)
    }

    /// Moves focus to the previous focusable node, wrapping around.
    pub fn focus_previous(&self) -> Option<NodeId> {
        self.focus_step(false)
    }

    fn focus_step(&self, forward: bool) -> Option<NodeId> {
        let order = self.focusable_nodes();
        if order.is_empty() {
            return None;
        }
        let position = self
            .focused
            .get()
            .and_then(|current| order.iter().position(|id| *id == current));
        let next = match (position, forward) {
            (None, true) => 0,
            (None, false) => order.len() - 1,
            (Some(i), true) => (i + 1) % order.len(),
            (Some(i), false) => (i + order.len() - 1) % order.len(),
        };
        let target = order[next];
        self.focus(target);
        Some(target)
    }

    // ------------------------------------------------------------------
    // Pointer input
    // ------------------------------------------------------------------

    /// Dispatches `PointerDown` on `node`.
    pub fn pointer_down(&self, node: NodeId) {
        if self.contains(node) {
            self.dispatch(EventKind::PointerDown, node);
        }
    }

    /// Dispatches `TouchEnd` on `node`.
    pub fn touch_end(&self, node: NodeId) {
        if self.contains(node) {
            self.dispatch(EventKind::TouchEnd, node);
        }
    }

    // ------------------------------------------------------------------
    // Listeners
    // ------------------------------------------------------------------

    /// Registers a listener and returns its id.
    pub fn add_listener(
        &self,
        scope: ListenerScope,
        kind: EventKind,
        callback: impl Fn(&DocumentEvent, &Document) + 'static,
    ) -> ListenerId {
        let id = ListenerId(self.next_listener.get());
        self.next_listener.set(id.0 + 1);
        self.listeners.borrow_mut().push(Listener {
            id,
            scope,
            kind,
            callback: Rc::new(callback),
        });
        id
    }

    /// Removes a listener. Returns false if it was already gone.
    pub fn remove_listener(&self, id: ListenerId) -> bool {
        let mut listeners = self.listeners.borrow_mut();
        let before = listeners.len();
        listeners.retain(|listener| listener.id != id);
        listeners.len() != before
    }

    /// Number of registered listeners.
    #[must_use]
    pub fn listener_count(&self) -> usize {
        self.listeners.borrow().len()
    }

    /// Runs node listeners from the target up through its ancestors, then
    /// document listeners.
    fn dispatch(&self, kind: EventKind, target: NodeId) {
        let path = self.ancestry(target);
        let callbacks: Vec<Callback> = {
            let listeners = self.listeners.borrow();
            let on_path = path.iter().flat_map(|node| {
                listeners
                    .iter()
                    .filter(move |l| l.kind == kind && l.scope == ListenerScope::Node(*node))
            });
            let global = listeners
                .iter()
                .filter(|l| l.kind == kind && l.scope == ListenerScope::Document);
            on_path.chain(global).map(|l| Rc::clone(&l.callback)).collect()
        };

        let event = DocumentEvent { kind, target };
        for callback in callbacks {
            callback(&event, self);
        }
    }
}
