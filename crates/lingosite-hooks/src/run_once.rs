//! Effects that run once per lifetime.

use tracing::trace;

/// Runs an effect the first time it is asked to and ignores later calls.
///
/// An effect may leave a cleanup behind; it runs on [`teardown`](Self::teardown)
/// or when the value is dropped.
#[derive(Default)]
pub struct RunOnce {
    ran: bool,
    cleanup: Option<Box<dyn FnOnce()>>,
}

impl std::fmt::Debug for RunOnce {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RunOnce")
            .field("ran", &self.ran)
            .field("has_cleanup", &self.cleanup.is_some())
            .finish()
    }
}

impl RunOnce {
    pub fn new() -> Self {
        Self::default()
    }

    /// Run `effect` unless something already ran. Returns whether it ran.
    pub fn run(&mut self, effect: impl FnOnce()) -> bool {
        self.run_with_cleanup(|| {
            effect();
            || {}
        })
    }

    /// Like [`run`](Self::run); the effect returns its cleanup.
    pub fn run_with_cleanup<C>(&mut self, effect: impl FnOnce() -> C) -> bool
    where
        C: FnOnce() + 'static,
    {
        if self.ran {
            return false;
        }
        self.ran = true;
        self.cleanup = Some(Box::new(effect()));
        trace!("run-once effect executed");
        true
    }

    pub fn has_run(&self) -> bool {
        self.ran
    }

    /// Run the pending cleanup, if any. The effect stays spent.
    pub fn teardown(&mut self) {
        if let Some(cleanup) = self.cleanup.take() {
            cleanup();
        }
    }
}

impl Drop for RunOnce {
    fn drop(&mut self) {
        self.teardown();
    }
}
