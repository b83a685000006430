//! Typed in-process notification channel.
//!
//! SYSTEM CONTEXT
//! ==============
//! The request gateway publishes [`LogoutNotice`] when the server rejects a
//! bearer token; the session context and UI layers subscribe. Session state
//! changes are published on the same kind of bus so Leptos signals can mirror
//! them.
//!
//! DESIGN
//! ======
//! Subscriptions are RAII handles: dropping a [`Subscription`] removes its
//! listener. Listeners are cloned out of the lock before being invoked, so a
//! listener may subscribe, unsubscribe, or emit again without deadlocking.

#[cfg(test)]
#[path = "events_test.rs"]
mod events_test;

use std::sync::{Arc, Mutex, PoisonError, Weak};

/// Emitted when an authenticated request comes back `401 Unauthorized`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LogoutNotice {
    /// Bearer token the rejected request carried, if any.
    pub rejected_token: Option<String>,
}

type Listener<T> = Arc<dyn Fn(&T) + Send + Sync>;

struct BusInner<T> {
    next_id: u64,
    listeners: Vec<(u64, Listener<T>)>,
}

/// Multi-subscriber broadcast bus. Cloning shares the same subscriber list.
pub struct EventBus<T> {
    inner: Arc<Mutex<BusInner<T>>>,
}

impl<T> Clone for EventBus<T> {
    fn clone(&self) -> Self {
        Self { inner: Arc::clone(&self.inner) }
    }
}

impl<T> Default for EventBus<T> {
    fn default() -> Self {
        Self { inner: Arc::new(Mutex::new(BusInner { next_id: 0, listeners: Vec::new() })) }
    }
}

impl<T: 'static> std::fmt::Debug for EventBus<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EventBus").field("subscribers", &self.subscriber_count()).finish()
    }
}

impl<T: 'static> EventBus<T> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `listener` until the returned handle is dropped.
    #[must_use = "dropping the subscription unsubscribes immediately"]
    pub fn subscribe<F>(&self, listener: F) -> Subscription
    where
        F: Fn(&T) + Send + Sync + 'static,
    {
        let mut inner = self.inner.lock().unwrap_or_else(PoisonError::into_inner);
        let id = inner.next_id;
        inner.next_id += 1;
        inner.listeners.push((id, Arc::new(listener)));
        drop(inner);

        let weak: Weak<Mutex<BusInner<T>>> = Arc::downgrade(&self.inner);
        Subscription {
            unsubscribe: Some(Box::new(move || {
                if let Some(inner) = weak.upgrade() {
                    let mut inner = inner.lock().unwrap_or_else(PoisonError::into_inner);
                    inner.listeners.retain(|(lid, _)| *lid != id);
                }
            })),
        }
    }

    /// Deliver `event` to every current subscriber. Returns the number of
    /// listeners invoked.
    pub fn emit(&self, event: &T) -> usize {
        let listeners: Vec<Listener<T>> = {
            let inner = self.inner.lock().unwrap_or_else(PoisonError::into_inner);
            inner.listeners.iter().map(|(_, l)| Arc::clone(l)).collect()
        };
        for listener in &listeners {
            listener(event);
        }
        listeners.len()
    }

    pub fn subscriber_count(&self) -> usize {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner).listeners.len()
    }
}

/// Handle that keeps a listener registered.
pub struct Subscription {
    unsubscribe: Option<Box<dyn FnOnce() + Send + Sync>>,
}

impl Subscription {
    /// Keep the listener registered for the life of the bus.
    pub fn detach(mut self) {
        self.unsubscribe = None;
    }
}

impl std::fmt::Debug for Subscription {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Subscription").field("active", &self.unsubscribe.is_some()).finish()
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        if let Some(unsubscribe) = self.unsubscribe.take() {
            unsubscribe();
        }
    }
}

/// Bus carrying gateway-initiated logout notices.
pub type LogoutBus = EventBus<LogoutNotice>;
