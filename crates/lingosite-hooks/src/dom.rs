//! A minimal element tree with document-level pointer listeners.
//!
//! Listeners are registered on the document and receive every event of
//! their kind. Each event carries the path from its target up to the root,
//! so listeners can test containment without reaching back into the tree.

use std::{
    cell::RefCell,
    fmt,
    rc::{Rc, Weak},
};

use tracing::trace;

/// Handle to an element of a [`Document`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeId(usize);

/// Pointer event kinds listeners can subscribe to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PointerEventKind {
    MouseDown,
    TouchStart,
    Click,
}

/// A dispatched pointer event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PointerEvent {
    pub kind: PointerEventKind,
    pub target: NodeId,
    /// `target` followed by its ancestors up to the root.
    pub path: Vec<NodeId>,
}

impl PointerEvent {
    /// Whether the event target is `node` or one of its descendants.
    pub fn is_within(&self, node: NodeId) -> bool {
        self.path.contains(&node)
    }
}

type Listener = Rc<dyn Fn(&PointerEvent)>;

struct Registration {
    id: u64,
    kind: PointerEventKind,
    listener: Listener,
}

#[derive(Default)]
struct Inner {
    parents: Vec<Option<NodeId>>,
    listeners: Vec<Registration>,
    next_listener: u64,
}

/// Shared element tree. Cloning yields another handle to the same document.
#[derive(Clone)]
pub struct Document {
    inner: Rc<RefCell<Inner>>,
}

impl fmt::Debug for Document {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let inner = self.inner.borrow();
        f.debug_struct("Document")
            .field("nodes", &inner.parents.len())
            .field("listeners", &inner.listeners.len())
            .finish()
    }
}

impl Default for Document {
    fn default() -> Self {
        Self::new()
    }
}

impl Document {
    /// Document holding only the root element.
    pub fn new() -> Self {
        let inner = Inner {
            parents: vec![None],
            ..Inner::default()
        };
        Self {
            inner: Rc::new(RefCell::new(inner)),
        }
    }

    /// The root element.
    pub fn root(&self) -> NodeId {
        NodeId(0)
    }

    /// Append a new element under `parent`.
    pub fn create_element(&self, parent: NodeId) -> NodeId {
        let mut inner = self.inner.borrow_mut();
        let id = NodeId(inner.parents.len());
        inner.parents.push(Some(parent));
        id
    }

    /// `node` followed by its ancestors.
    pub fn path(&self, node: NodeId) -> Vec<NodeId> {
        let inner = self.inner.borrow();
        let mut path = vec![node];
        let mut current = node;
        while let Some(Some(parent)) = inner.parents.get(current.0) {
            path.push(*parent);
            current = *parent;
        }
        path
    }

    /// Whether `node` is `ancestor` or lies below it.
    pub fn contains(&self, ancestor: NodeId, node: NodeId) -> bool {
        self.path(node).contains(&ancestor)
    }

    /// Register a listener; it stays registered until the returned
    /// subscription is dropped.
    #[must_use = "dropping the subscription removes the listener"]
    pub fn add_listener(
        &self,
        kind: PointerEventKind,
        listener: impl Fn(&PointerEvent) + 'static,
    ) -> Subscription {
        let mut inner = self.inner.borrow_mut();
        let id = inner.next_listener;
        inner.next_listener += 1;
        inner.listeners.push(Registration {
            id,
            kind,
            listener: Rc::new(listener),
        });
        trace!(id, ?kind, "listener added");

        Subscription {
            document: Rc::downgrade(&self.inner),
            id,
        }
    }

    /// Dispatch an event at `target`; returns how many listeners ran.
    pub fn dispatch(&self, kind: PointerEventKind, target: NodeId) -> usize {
        let event = PointerEvent {
            kind,
            target,
            path: self.path(target),
        };

        // Listeners may subscribe or unsubscribe while running.
        let listeners: Vec<Listener> = self
            .inner
            .borrow()
            .listeners
            .iter()
            .filter(|r| r.kind == kind)
            .map(|r| Rc::clone(&r.listener))
            .collect();

        for listener in &listeners {
            listener(&event);
        }
        listeners.len()
    }

    /// Number of registered listeners.
    pub fn listener_count(&self) -> usize {
        self.inner.borrow().listeners.len()
    }
}

/// Keeps a listener registered; dropping it unsubscribes.
#[derive(Debug)]
pub struct Subscription {
    document: Weak<RefCell<Inner>>,
    id: u64,
}

impl Subscription {
    /// Remove the listener now.
    pub fn unsubscribe(self) {}
}

impl Drop for Subscription {
    fn drop(&mut self) {
        if let Some(inner) = self.document.upgrade() {
            inner.borrow_mut().listeners.retain(|r| r.id != self.id);
            trace!(id = self.id, "listener removed");
        }
    }
}

#[cfg(test)]
mod tests {
    use std::cell::Cell;

    use super::*;

    #[test]
    fn test_contains() {
        let doc = Document::new();
        let panel = doc.create_element(doc.root());
        let button = doc.create_element(panel);
        let other = doc.create_element(doc.root());

        assert!(doc.contains(panel, button));
        assert!(doc.contains(panel, panel));
        assert!(!doc.contains(panel, other));
        assert!(doc.contains(doc.root(), other));
        assert_eq!(doc.path(button), vec![button, panel, doc.root()]);
    }

    #[test]
    fn test_listener_lifecycle() {
        let doc = Document::new();
        let hits = Rc::new(Cell::new(0));

        let sub = {
            let hits = Rc::clone(&hits);
            doc.add_listener(PointerEventKind::MouseDown, move |_| hits.set(hits.get() + 1))
        };
        assert_eq!(doc.listener_count(), 1);

        assert_eq!(doc.dispatch(PointerEventKind::MouseDown, doc.root()), 1);
        assert_eq!(doc.dispatch(PointerEventKind::TouchStart, doc.root()), 0);
        assert_eq!(hits.get(), 1);

        sub.unsubscribe();
        assert_eq!(doc.listener_count(), 0);
        doc.dispatch(PointerEventKind::MouseDown, doc.root());
        assert_eq!(hits.get(), 1);
    }

    #[test]
    fn test_subscription_outlives_document() {
        let doc = Document::new();
        let sub = doc.add_listener(PointerEventKind::Click, |_| {});
        drop(doc);
        drop(sub);
    }
}
