//! Serialized delivery of signal callbacks to a single receiver.

use std::collections::VecDeque;
use std::fmt;

use parking_lot::Mutex;

type Job<R> = Box<dyn FnOnce(&mut R) + Send>;

/// Owns the receiver context and runs jobs against it one at a time.
///
/// A job dispatched while another job is running (typically because a host
/// call made from inside a handler emitted a signal synchronously) is queued
/// and runs right after the current one, in arrival order. Nothing is dropped
/// and the receiver is never borrowed twice.
pub struct Dispatcher<R> {
    receiver: Mutex<R>,
    pending: Mutex<VecDeque<Job<R>>>,
}

impl<R> Dispatcher<R> {
    /// Wraps `receiver`.
    pub fn new(receiver: R) -> Self {
        Self {
            receiver: Mutex::new(receiver),
            pending: Mutex::new(VecDeque::new()),
        }
    }

    /// Queues `job` and runs every pending job if the receiver is free.
    pub fn dispatch<F>(&self, job: F)
    where F: FnOnce(&mut R) + Send + 'static {
        self.pending.lock().push_back(Box::new(job));
        self.drain();
    }

    /// Runs `f` against the receiver directly, then flushes queued jobs.
    ///
    /// Must not be called from inside a dispatched job: the receiver is
    /// already locked there.
    pub fn with<T>(&self, f: impl FnOnce(&mut R) -> T) -> T {
        let out = {
            let mut receiver = self.receiver.lock();
            f(&mut receiver)
        };
        self.drain();
        out
    }

    /// Number of jobs waiting for the receiver.
    #[must_use]
    pub fn pending(&self) -> usize { self.pending.lock().len() }

    fn drain(&self) {
        loop {
            // Whoever holds the receiver drains the queue before releasing it.
            let Some(mut receiver) = self.receiver.try_lock() else {
                return;
            };

            loop {
                let next = self.pending.lock().pop_front();
                let Some(job) = next else {
                    break;
                };
                job(&mut receiver);
            }

            drop(receiver);

            // A job may have been queued between the last pop and the unlock.
            if self.pending.lock().is_empty() {
                return;
            }
        }
    }
}

impl<R> fmt::Debug for Dispatcher<R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Dispatcher").field("pending", &self.pending()).finish_non_exhaustive()
    }
}
