//! Configuration file watcher for hot-reloading.
//!
//! Watches the configuration file and hands every successfully parsed
//! revision to a callback.

use std::ffi::OsString;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use notify::{RecommendedWatcher, RecursiveMode, Watcher};

use super::types::{DotspacesConfig, load_config_from_path};
use crate::utils::thread::spawn_named_thread;

/// Debounce duration for config file changes.
/// Some editors trigger multiple events per save (write to temp, rename, etc.).
const CONFIG_DEBOUNCE_MS: u64 = 200;

/// Drops events arriving within the debounce window of the last accepted one.
#[derive(Debug)]
struct Debounce {
    window: Duration,
    last: Option<Instant>,
}

impl Debounce {
    const fn new(window: Duration) -> Self { Self { window, last: None } }

    fn accept(&mut self, now: Instant) -> bool {
        if self.last.is_some_and(|t| now.duration_since(t) < self.window) {
            return false;
        }
        self.last = Some(now);
        true
    }
}

/// Whether an event on `paths` touches the file named `config_filename`.
fn affects_config(paths: &[PathBuf], config_filename: &OsString) -> bool {
    paths.iter().any(|p| p.file_name().is_some_and(|name| name == config_filename))
}

/// Starts watching `config_path` on a background thread.
///
/// Each change is re-read and passed to `on_reload`. Files that fail to parse
/// are logged and skipped; the previous configuration stays in effect.
pub fn watch_config_file<F>(config_path: PathBuf, on_reload: F)
where F: Fn(DotspacesConfig) + Send + 'static {
    let config_filename =
        config_path.file_name().map(std::ffi::OsStr::to_os_string).unwrap_or_default();

    spawn_named_thread("config-watcher", move || {
        let (tx, rx) = std::sync::mpsc::channel();

        let mut watcher: RecommendedWatcher = match notify::recommended_watcher(tx) {
            Ok(w) => w,
            Err(err) => {
                tracing::warn!(error = %err, "failed to create config watcher");
                return;
            }
        };

        // Watch the parent directory to catch editors that save by renaming.
        let watch_path = config_path.parent().unwrap_or(&config_path);

        if let Err(err) = watcher.watch(watch_path, RecursiveMode::NonRecursive) {
            tracing::warn!(error = %err, path = %watch_path.display(), "failed to watch config file");
            return;
        }

        let mut debounce = Debounce::new(Duration::from_millis(CONFIG_DEBOUNCE_MS));

        loop {
            match rx.recv() {
                Ok(Ok(event)) => {
                    if !affects_config(&event.paths, &config_filename)
                        || !debounce.accept(Instant::now())
                    {
                        continue;
                    }
                    reload(&config_path, &on_reload);
                }
                Ok(Err(err)) => {
                    tracing::warn!(error = %err, "config watch error");
                }
                Err(_) => {
                    // Channel closed, watcher dropped
                    break;
                }
            }
        }
    });
}

fn reload(config_path: &Path, on_reload: &impl Fn(DotspacesConfig)) {
    match load_config_from_path(config_path) {
        Ok((config, _)) => {
            tracing::info!(path = %config_path.display(), "configuration reloaded");
            on_reload(config);
        }
        Err(err) => {
            tracing::warn!(error = %err, "ignoring invalid configuration");
        }
    }
}
