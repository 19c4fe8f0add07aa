//! Visible/hidden state machine.

use tracing::trace;

/// `{visible, hidden}` with explicit transitions.
///
/// The change callback receives the new visibility and only runs when the
/// state actually changes.
pub struct Visibility {
    visible: bool,
    on_change: Option<Box<dyn FnMut(bool)>>,
}

impl std::fmt::Debug for Visibility {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Visibility")
            .field("visible", &self.visible)
            .finish_non_exhaustive()
    }
}

impl Visibility {
    pub fn new(visible: bool) -> Self {
        Self {
            visible,
            on_change: None,
        }
    }

    #[must_use]
    pub fn with_on_change(mut self, on_change: impl FnMut(bool) + 'static) -> Self {
        self.on_change = Some(Box::new(on_change));
        self
    }

    pub fn is_visible(&self) -> bool {
        self.visible
    }

    pub fn show(&mut self) -> bool {
        self.set(true)
    }

    pub fn hide(&mut self) -> bool {
        self.set(false)
    }

    pub fn toggle(&mut self) -> bool {
        self.set(!self.visible)
    }

    /// Move to `visible`; returns whether the state changed.
    pub fn set(&mut self, visible: bool) -> bool {
        if self.visible == visible {
            return false;
        }
        self.visible = visible;
        trace!(visible, "visibility changed");
        if let Some(on_change) = self.on_change.as_mut() {
            on_change(visible);
        }
        true
    }
}
