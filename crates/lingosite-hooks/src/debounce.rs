//! Trailing-edge debounce over tokio timers.

use std::{sync::Arc, time::Duration};

use tokio::{sync::watch, task::JoinHandle};
use tracing::trace;

/// Publishes the last value set once no new value arrived for `delay`.
///
/// A zero delay publishes every value immediately. Pending timers are
/// aborted when a new value arrives and when the debouncer is dropped.
/// With a non-zero delay, [`set`](Self::set) must be called inside a tokio
/// runtime.
#[derive(Debug)]
pub struct Debounced<T> {
    delay: Duration,
    sender: Arc<watch::Sender<T>>,
    pending: Option<JoinHandle<()>>,
}

impl<T> Debounced<T>
where
    T: Send + Sync + 'static,
{
    pub fn new(initial: T, delay: Duration) -> Self {
        let (sender, _) = watch::channel(initial);
        Self {
            delay,
            sender: Arc::new(sender),
            pending: None,
        }
    }

    /// Receiver of published values.
    pub fn subscribe(&self) -> watch::Receiver<T> {
        self.sender.subscribe()
    }

    /// Feed a new input value.
    pub fn set(&mut self, value: T) {
        self.cancel();

        if self.delay.is_zero() {
            self.sender.send_replace(value);
            return;
        }

        let sender = Arc::clone(&self.sender);
        let delay = self.delay;
        trace!(?delay, "debounce timer started");
        self.pending = Some(tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            sender.send_replace(value);
        }));
    }

    /// Drop the pending value, if any.
    pub fn cancel(&mut self) {
        if let Some(handle) = self.pending.take() {
            handle.abort();
        }
    }

    /// Whether a value is waiting for its timer.
    pub fn is_pending(&self) -> bool {
        self.pending.as_ref().is_some_and(|h| !h.is_finished())
    }

    pub fn delay(&self) -> Duration {
        self.delay
    }
}

impl<T: Clone> Debounced<T> {
    /// Most recently published value.
    pub fn value(&self) -> T {
        self.sender.borrow().clone()
    }
}

impl<T> Drop for Debounced<T> {
    fn drop(&mut self) {
        if let Some(handle) = self.pending.take() {
            handle.abort();
        }
    }
}
