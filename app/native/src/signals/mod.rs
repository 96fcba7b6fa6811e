//! Signal plumbing between host event sources and the indicator controller.
//!
//! # Architecture
//!
//! ```text
//! ┌────────────────────────────────────────────────────────────┐
//! │  Host sources (workspace manager, settings, panel, row)    │
//! │  implement SignalSource: connect / disconnect               │
//! └──────────────────────────┬─────────────────────────────────┘
//!                            │ SignalCallback(&SignalArgs)
//!                            ▼
//! ┌────────────────────────────────────────────────────────────┐
//! │  SignalManager<R>                                           │
//! │  - owns every SubscriptionHandle                            │
//! │  - symmetric teardown (unsubscribe / clear_all)             │
//! └──────────────────────────┬─────────────────────────────────┘
//!                            │ job(&mut R)
//!                            ▼
//! ┌────────────────────────────────────────────────────────────┐
//! │  Dispatcher<R>                                              │
//! │  - serializes jobs onto the receiver, queues re-entrant ones│
//! └────────────────────────────────────────────────────────────┘
//! ```

mod dispatch;
mod emitter;
mod manager;

use std::sync::Arc;

pub use dispatch::Dispatcher;
pub use emitter::SignalEmitter;
pub use manager::{SignalManager, SubscriptionHandle};

use crate::scroll::ScrollDirection;

/// Identifier of one connection on a [`SignalSource`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ConnectionId(pub u64);

/// Payload delivered with a signal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SignalArgs {
    /// The signal carries no data.
    None,
    /// A scroll gesture in the given direction.
    Scroll(ScrollDirection),
    /// A button release over the indicator at `index`.
    ButtonRelease { index: usize },
}

/// Callback invoked by a [`SignalSource`] when a connected signal fires.
pub type SignalCallback = Arc<dyn Fn(&SignalArgs) + Send + Sync>;

/// An external object that emits named signals.
pub trait SignalSource: Send + Sync {
    /// Connects `callback` to `event` and returns the connection id.
    fn connect(&self, event: &str, callback: SignalCallback) -> ConnectionId;

    /// Disconnects a connection. Returns `false` if it was not connected.
    fn disconnect(&self, id: ConnectionId) -> bool;
}
