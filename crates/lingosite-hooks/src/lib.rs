//! Lingosite Hooks
//!
//! Small UI state primitives for interactive site components. Each one owns
//! its state and tears down its listeners and timers when dropped.
//!
//! # Modules
//!
//! - [`dom`] - Element tree and document-level pointer listeners
//! - [`click_outside`] - Pointer presses outside an element
//! - [`controlled`] - Controlled/uncontrolled values
//! - [`counter`] - Bounded stepping counter
//! - [`debounce`] - Trailing-edge debounce
//! - [`run_once`] - Effects that run once per lifetime
//! - [`toggle`] - Visible/hidden state

pub mod click_outside;
pub mod controlled;
pub mod counter;
pub mod debounce;
pub mod dom;
pub mod run_once;
pub mod toggle;

pub use click_outside::ClickOutside;
pub use controlled::ControllableState;
pub use counter::{Counter, CounterError, CounterOptions};
pub use debounce::Debounced;
pub use dom::{Document, NodeId, PointerEvent, PointerEventKind, Subscription};
pub use run_once::RunOnce;
pub use toggle::Visibility;
