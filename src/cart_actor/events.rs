//! Change notifications published by the cart actor.

use std::fmt;
use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;

use tracing::error;

use crate::checkout::OrderConfirmation;
use crate::domain::CartSnapshot;

pub type SubscriptionId = u64;

/// Something a listener should react to.
///
/// `Changed` follows every committed mutation, including the settlement that
/// accompanies a successful checkout. Calls that change nothing publish
/// nothing.
#[derive(Debug, Clone, PartialEq)]
pub enum CartEvent {
    Changed(CartSnapshot),
    CheckoutStarted { total_items: u64, total_price: f64 },
    CheckoutSucceeded(OrderConfirmation),
    CheckoutFailed { reason: String, retryable: bool },
}

/// A registered callback. Runs on the actor task, so it should be quick and
/// must not call back into the cart and wait for the reply.
///
/// A panic inside the callback is caught and logged. The cart and the other
/// listeners keep running.
#[derive(Clone)]
pub struct CartListener(Arc<dyn Fn(&CartEvent) + Send + Sync>);

impl CartListener {
    pub fn new(callback: impl Fn(&CartEvent) + Send + Sync + 'static) -> Self {
        Self(Arc::new(callback))
    }

    fn notify(&self, event: &CartEvent) {
        (self.0)(event)
    }
}

impl fmt::Debug for CartListener {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("CartListener")
    }
}

#[derive(Debug)]
pub(crate) struct Listeners {
    next_id: SubscriptionId,
    entries: Vec<(SubscriptionId, CartListener)>,
}

impl Default for Listeners {
    fn default() -> Self {
        Self {
            next_id: 1,
            entries: Vec::new(),
        }
    }
}

impl Listeners {
    pub(crate) fn add(&mut self, listener: CartListener) -> SubscriptionId {
        let id = self.next_id;
        self.next_id += 1;
        self.entries.push((id, listener));
        id
    }

    pub(crate) fn remove(&mut self, id: SubscriptionId) -> bool {
        let before = self.entries.len();
        self.entries.retain(|(entry_id, _)| *entry_id != id);
        self.entries.len() != before
    }

    #[cfg(test)]
    pub(crate) fn len(&self) -> usize {
        self.entries.len()
    }

    pub(crate) fn publish(&self, event: &CartEvent) {
        for (id, listener) in &self.entries {
            if panic::catch_unwind(AssertUnwindSafe(|| listener.notify(event))).is_err() {
                error!(subscription_id = id, "Cart listener panicked");
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    #[test]
    fn test_listeners_receive_in_registration_order() {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let mut listeners = Listeners::default();

        for tag in ["first", "second"] {
            let seen = Arc::clone(&seen);
            listeners.add(CartListener::new(move |_| seen.lock().unwrap().push(tag)));
        }

        listeners.publish(&CartEvent::CheckoutStarted {
            total_items: 1,
            total_price: 2.0,
        });
        assert_eq!(*seen.lock().unwrap(), vec!["first", "second"]);
    }

    #[test]
    fn test_panicking_listener_is_isolated() {
        let seen = Arc::new(Mutex::new(0));
        let mut listeners = Listeners::default();
        listeners.add(CartListener::new(|_| panic!("listener bug")));
        {
            let seen = Arc::clone(&seen);
            listeners.add(CartListener::new(move |_| *seen.lock().unwrap() += 1));
        }

        let event = CartEvent::CheckoutFailed {
            reason: "declined".to_string(),
            retryable: true,
        };
        listeners.publish(&event);
        listeners.publish(&event);
        assert_eq!(*seen.lock().unwrap(), 2);
    }

    #[test]
    fn test_remove_listener() {
        let mut listeners = Listeners::default();
        let a = listeners.add(CartListener::new(|_| {}));
        let b = listeners.add(CartListener::new(|_| {}));
        assert_ne!(a, b);

        assert!(listeners.remove(a));
        assert!(!listeners.remove(a));
        assert_eq!(listeners.len(), 1);
    }
}
