//! Detect pointer presses outside an element.

use std::rc::Rc;

use tracing::debug;

use crate::dom::{Document, NodeId, PointerEvent, PointerEventKind, Subscription};

const EVENTS: [PointerEventKind; 2] = [PointerEventKind::MouseDown, PointerEventKind::TouchStart];

/// Invokes a callback for mouse-down and touch-start events whose target lies
/// outside the tracked element.
///
/// Listeners exist only while enabled. Disabling or dropping the detector
/// removes every listener it registered.
pub struct ClickOutside {
    document: Document,
    element: NodeId,
    callback: Rc<dyn Fn(&PointerEvent)>,
    subscriptions: Vec<Subscription>,
}

impl std::fmt::Debug for ClickOutside {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ClickOutside")
            .field("element", &self.element)
            .field("enabled", &self.is_enabled())
            .finish_non_exhaustive()
    }
}

impl ClickOutside {
    /// Track `element`, enabled immediately.
    pub fn new(
        document: &Document,
        element: NodeId,
        callback: impl Fn(&PointerEvent) + 'static,
    ) -> Self {
        let mut detector = Self {
            document: document.clone(),
            element,
            callback: Rc::new(callback),
            subscriptions: Vec::new(),
        };
        detector.enable();
        detector
    }

    /// Subscribe to document events. No-op when already enabled.
    pub fn enable(&mut self) {
        if self.is_enabled() {
            return;
        }

        for kind in EVENTS {
            let element = self.element;
            let callback = Rc::clone(&self.callback);
            let sub = self.document.add_listener(kind, move |event| {
                if !event.is_within(element) {
                    callback(event);
                }
            });
            self.subscriptions.push(sub);
        }
        debug!(element = ?self.element, "click-outside enabled");
    }

    /// Remove all listeners.
    pub fn disable(&mut self) {
        if self.subscriptions.is_empty() {
            return;
        }
        self.subscriptions.clear();
        debug!(element = ?self.element, "click-outside disabled");
    }

    /// Enable or disable.
    pub fn set_enabled(&mut self, enabled: bool) {
        if enabled {
            self.enable();
        } else {
            self.disable();
        }
    }

    /// Whether listeners are registered.
    pub fn is_enabled(&self) -> bool {
        !self.subscriptions.is_empty()
    }
}
