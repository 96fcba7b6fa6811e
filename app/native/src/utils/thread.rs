use std::io;
use std::thread::{self, JoinHandle};

/// Prefix of every thread this crate spawns.
const THREAD_PREFIX: &str = "dotspaces-";

/// Spawns a thread named `dotspaces-<name>`.
///
/// Returns `None` (after logging) if the OS refuses to create the thread.
pub fn spawn_named_thread<F>(name: &str, task: F) -> Option<JoinHandle<()>>
where F: FnOnce() + Send + 'static {
    let thread_name = format!("{THREAD_PREFIX}{name}");

    match thread::Builder::new().name(thread_name.clone()).spawn(task) {
        Ok(handle) => Some(handle),
        Err(err) => {
            log_spawn_failure(&thread_name, &err);
            None
        }
    }
}

fn log_spawn_failure(thread_name: &str, err: &io::Error) {
    tracing::warn!(thread = thread_name, error = %err, "failed to spawn thread");
}
