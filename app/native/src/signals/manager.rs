//! Subscription bookkeeping with symmetric teardown.

use std::fmt;
use std::sync::{Arc, Weak};

use super::{ConnectionId, Dispatcher, SignalArgs, SignalCallback, SignalSource};

/// Opaque handle for one subscription made through a [`SignalManager`].
///
/// Handles are cheap to clone. Cancelling the same handle twice is harmless:
/// the second [`SignalManager::unsubscribe`] reports `false`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SubscriptionHandle {
    id: u64,
    event: Arc<str>,
}

impl SubscriptionHandle {
    /// Name of the subscribed signal.
    #[must_use]
    pub fn event(&self) -> &str { &self.event }
}

struct Subscription {
    id: u64,
    event: Arc<str>,
    source: Arc<dyn SignalSource>,
    connection: ConnectionId,
}

impl Subscription {
    fn disconnect(&self) {
        if !self.source.disconnect(self.connection) {
            tracing::debug!(event = %self.event, "source had already dropped the connection");
        }
    }
}

/// Tracks every connection made on behalf of one receiver.
///
/// Callbacks receive the receiver context (`&mut R`) through the receiver's
/// [`Dispatcher`]. The manager only holds a weak reference to it, so sources
/// that outlive the receiver never keep it alive; their callbacks become no-ops.
///
/// Every tracked connection is disconnected exactly once: either by
/// [`unsubscribe`](Self::unsubscribe), by [`clear_all`](Self::clear_all), or
/// as a last resort when the manager is dropped.
pub struct SignalManager<R> {
    receiver: Weak<Dispatcher<R>>,
    subscriptions: Vec<Subscription>,
    next_id: u64,
}

impl<R: Send + 'static> SignalManager<R> {
    /// Connects `callback` to `event` on `source`.
    ///
    /// The callback runs with the receiver context whenever the source emits.
    pub fn subscribe<F>(
        &mut self,
        source: &Arc<dyn SignalSource>,
        event: &str,
        callback: F,
    ) -> SubscriptionHandle
    where
        F: Fn(&mut R, &SignalArgs) + Send + Sync + 'static,
    {
        let receiver = Weak::clone(&self.receiver);
        let callback = Arc::new(callback);
        let forward: SignalCallback = Arc::new(move |args: &SignalArgs| {
            let Some(dispatcher) = receiver.upgrade() else {
                return;
            };
            let callback = Arc::clone(&callback);
            let args = *args;
            dispatcher.dispatch(move |target: &mut R| callback(target, &args));
        });

        let connection = source.connect(event, forward);
        self.next_id += 1;
        let event: Arc<str> = Arc::from(event);
        self.subscriptions.push(Subscription {
            id: self.next_id,
            event: Arc::clone(&event),
            source: Arc::clone(source),
            connection,
        });

        tracing::trace!(event = %event, id = self.next_id, "subscribed");
        SubscriptionHandle { id: self.next_id, event }
    }
}

impl<R> SignalManager<R> {
    /// Creates a manager delivering callbacks to `receiver`.
    #[must_use]
    pub const fn new(receiver: Weak<Dispatcher<R>>) -> Self {
        Self {
            receiver,
            subscriptions: Vec::new(),
            next_id: 0,
        }
    }

    /// Disconnects exactly the subscription behind `handle`.
    ///
    /// Returns whether the handle was still registered.
    pub fn unsubscribe(&mut self, handle: &SubscriptionHandle) -> bool {
        let Some(position) = self.subscriptions.iter().position(|s| s.id == handle.id) else {
            return false;
        };
        let subscription = self.subscriptions.remove(position);
        subscription.disconnect();
        tracing::trace!(event = %subscription.event, id = subscription.id, "unsubscribed");
        true
    }

    /// Disconnects every tracked subscription and empties the registry.
    ///
    /// Returns the number of connections that were disconnected.
    pub fn clear_all(&mut self) -> usize {
        let subscriptions = std::mem::take(&mut self.subscriptions);
        for subscription in &subscriptions {
            subscription.disconnect();
        }
        if !subscriptions.is_empty() {
            tracing::debug!(count = subscriptions.len(), "cleared subscriptions");
        }
        subscriptions.len()
    }

    /// Returns whether `handle` is still registered.
    #[must_use]
    pub fn contains(&self, handle: &SubscriptionHandle) -> bool {
        self.subscriptions.iter().any(|s| s.id == handle.id)
    }

    /// Number of tracked subscriptions.
    #[must_use]
    pub fn len(&self) -> usize { self.subscriptions.len() }

    /// Returns whether no subscription is tracked.
    #[must_use]
    pub fn is_empty(&self) -> bool { self.subscriptions.is_empty() }
}

impl<R> Drop for SignalManager<R> {
    fn drop(&mut self) {
        if !self.subscriptions.is_empty() {
            tracing::debug!(count = self.subscriptions.len(), "releasing subscriptions on drop");
            self.clear_all();
        }
    }
}

impl<R> fmt::Debug for SignalManager<R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SignalManager")
            .field("subscriptions", &self.subscriptions.len())
            .finish_non_exhaustive()
    }
}
