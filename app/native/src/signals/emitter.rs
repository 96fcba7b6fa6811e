//! Reusable signal registry for sources implemented in this crate.

use std::fmt;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use parking_lot::Mutex;
use smallvec::SmallVec;

use super::{ConnectionId, SignalArgs, SignalCallback};

struct Handler {
    id: ConnectionId,
    event: String,
    callback: SignalCallback,
}

/// Keeps the connected handlers of one source and emits signals to them.
///
/// Handlers run without the registry lock held, so a handler may connect or
/// disconnect while a signal is being emitted. A handler disconnected during
/// an emission is not invoked afterwards.
#[derive(Default)]
pub struct SignalEmitter {
    next_id: AtomicU64,
    handlers: Mutex<Vec<Handler>>,
}

impl SignalEmitter {
    /// Creates an emitter with no handlers.
    #[must_use]
    pub fn new() -> Self { Self::default() }

    /// Connects `callback` to `event`.
    pub fn connect(&self, event: &str, callback: SignalCallback) -> ConnectionId {
        let id = ConnectionId(self.next_id.fetch_add(1, Ordering::Relaxed) + 1);
        self.handlers.lock().push(Handler { id, event: event.to_owned(), callback });
        id
    }

    /// Disconnects a handler. Returns `false` if it was not connected.
    pub fn disconnect(&self, id: ConnectionId) -> bool {
        let mut handlers = self.handlers.lock();
        let before = handlers.len();
        handlers.retain(|h| h.id != id);
        handlers.len() != before
    }

    /// Returns whether `id` is still connected.
    #[must_use]
    pub fn is_connected(&self, id: ConnectionId) -> bool {
        self.handlers.lock().iter().any(|h| h.id == id)
    }

    /// Emits `event` to every connected handler and returns how many ran.
    pub fn emit(&self, event: &str, args: &SignalArgs) -> usize {
        let targets: SmallVec<[(ConnectionId, SignalCallback); 4]> = self
            .handlers
            .lock()
            .iter()
            .filter(|h| h.event == event)
            .map(|h| (h.id, Arc::clone(&h.callback)))
            .collect();

        let mut invoked = 0;
        for (id, callback) in targets {
            if !self.is_connected(id) {
                continue;
            }
            callback(args);
            invoked += 1;
        }
        invoked
    }

    /// Number of connected handlers across all events.
    #[must_use]
    pub fn handler_count(&self) -> usize { self.handlers.lock().len() }

    /// Number of handlers connected to `event`.
    #[must_use]
    pub fn handler_count_for(&self, event: &str) -> usize {
        self.handlers.lock().iter().filter(|h| h.event == event).count()
    }
}

impl fmt::Debug for SignalEmitter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SignalEmitter").field("handlers", &self.handler_count()).finish()
    }
}
