//! Viewport resize notifications
//!
//! A [`ResizeSignal`] belongs to the host. Every renderer subscribes once and
//! gets a [`ResizeSubscription`], a guard that unregisters itself when dropped.
//! Emitting marks each live subscription as pending; the renderer picks the
//! flag up on its own thread of control, so no callback ever re-enters it.

use std::cell::{Cell, RefCell};
use std::collections::BTreeMap;
use std::rc::{Rc, Weak};

#[derive(Debug, Default)]
struct Listeners {
    next_id: u64,
    pending: BTreeMap<u64, Rc<Cell<bool>>>,
}

/// Host-owned broadcaster for viewport resize events.
#[derive(Debug, Clone, Default)]
pub struct ResizeSignal {
    listeners: Rc<RefCell<Listeners>>,
}

impl ResizeSignal {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a new listener.
    pub fn subscribe(&self) -> ResizeSubscription {
        let mut listeners = self.listeners.borrow_mut();
        let id = listeners.next_id;
        listeners.next_id += 1;

        let pending = Rc::new(Cell::new(false));
        listeners.pending.insert(id, Rc::clone(&pending));

        ResizeSubscription {
            id,
            pending,
            listeners: Rc::downgrade(&self.listeners),
        }
    }

    /// Notify every live subscription that the viewport changed size.
    pub fn emit(&self) {
        for pending in self.listeners.borrow().pending.values() {
            pending.set(true);
        }
    }

    pub fn listener_count(&self) -> usize {
        self.listeners.borrow().pending.len()
    }
}

/// A live registration on a [`ResizeSignal`]. Dropping it unsubscribes.
#[derive(Debug)]
pub struct ResizeSubscription {
    id: u64,
    pending: Rc<Cell<bool>>,
    listeners: Weak<RefCell<Listeners>>,
}

impl ResizeSubscription {
    /// Return whether a resize arrived since the last call, clearing the flag.
    pub fn take_pending(&self) -> bool {
        self.pending.replace(false)
    }
}

impl Drop for ResizeSubscription {
    fn drop(&mut self) {
        // The signal may already be gone if the host tore it down first
        if let Some(listeners) = self.listeners.upgrade() {
            listeners.borrow_mut().pending.remove(&self.id);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_emit_marks_all_subscriptions() {
        let signal = ResizeSignal::new();
        let a = signal.subscribe();
        let b = signal.subscribe();
        assert!(!a.take_pending());

        signal.emit();
        assert!(a.take_pending());
        assert!(!a.take_pending());
        assert!(b.take_pending());
    }

    #[test]
    fn test_repeated_emits_coalesce() {
        let signal = ResizeSignal::new();
        let sub = signal.subscribe();
        signal.emit();
        signal.emit();
        assert!(sub.take_pending());
        assert!(!sub.take_pending());
    }

    #[test]
    fn test_drop_unsubscribes() {
        let signal = ResizeSignal::new();
        let a = signal.subscribe();
        let b = signal.subscribe();
        assert_eq!(signal.listener_count(), 2);

        drop(a);
        assert_eq!(signal.listener_count(), 1);
        signal.emit();
        assert!(b.take_pending());
    }

    #[test]
    fn test_subscription_outlives_signal() {
        let signal = ResizeSignal::new();
        let sub = signal.subscribe();
        drop(signal);
        assert!(!sub.take_pending());
        drop(sub);
    }

    #[test]
    fn test_cloned_signal_shares_listeners() {
        let signal = ResizeSignal::new();
        let host_copy = signal.clone();
        let sub = signal.subscribe();
        host_copy.emit();
        assert!(sub.take_pending());
        assert_eq!(host_copy.listener_count(), 1);
    }
}
