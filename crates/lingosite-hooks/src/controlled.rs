//! Values that are either owned by a parent or held internally.

use tracing::warn;

/// Effective value is the controlled prop when present, else internal state.
///
/// Call [`sync`](Self::sync) on every render with the current prop. A value
/// that switches between controlled and uncontrolled is misuse; it is logged
/// once and otherwise tolerated.
pub struct ControllableState<T> {
    prop: Option<T>,
    internal: T,
    was_controlled: bool,
    warned: bool,
    on_change: Option<Box<dyn FnMut(&T)>>,
}

impl<T: std::fmt::Debug> std::fmt::Debug for ControllableState<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ControllableState")
            .field("prop", &self.prop)
            .field("internal", &self.internal)
            .finish_non_exhaustive()
    }
}

impl<T> ControllableState<T> {
    /// Start from an optional controlled `prop` and a `default` for the
    /// uncontrolled case.
    pub fn new(prop: Option<T>, default: T) -> Self {
        Self {
            was_controlled: prop.is_some(),
            prop,
            internal: default,
            warned: false,
            on_change: None,
        }
    }

    /// Callback invoked on every [`set_value`](Self::set_value).
    #[must_use]
    pub fn with_on_change(mut self, on_change: impl FnMut(&T) + 'static) -> Self {
        self.on_change = Some(Box::new(on_change));
        self
    }

    /// Feed the prop for the current render.
    pub fn sync(&mut self, prop: Option<T>) {
        let controlled = prop.is_some();
        if controlled != self.was_controlled && !self.warned {
            let (from, to) = if controlled {
                ("uncontrolled", "controlled")
            } else {
                ("controlled", "uncontrolled")
            };
            warn!(from, to, "value switched between controlled and uncontrolled");
            self.warned = true;
        }
        self.was_controlled = controlled;
        self.prop = prop;
    }

    /// The effective value.
    pub fn value(&self) -> &T {
        self.prop.as_ref().unwrap_or(&self.internal)
    }

    /// Whether a controlled prop is present.
    pub fn is_controlled(&self) -> bool {
        self.prop.is_some()
    }

    /// Request a new value. Internal state changes only when uncontrolled;
    /// the change callback always runs.
    pub fn set_value(&mut self, value: T) {
        if let Some(on_change) = self.on_change.as_mut() {
            on_change(&value);
        }
        if self.prop.is_none() {
            self.internal = value;
        }
    }

    /// Request a value computed from the effective one.
    pub fn update(&mut self, f: impl FnOnce(&T) -> T) {
        let next = f(self.value());
        self.set_value(next);
    }
}
