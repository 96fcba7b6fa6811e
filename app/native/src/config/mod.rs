//! Configuration module for Dotspaces.
//!
//! This module provides configuration types, loading functionality, and file watching
//! for hot-reloading configuration changes.
//!
//! The configuration file supports JSONC format (JSON with comments).
//! Both single-line (`//`) and multi-line (`/* */`) comments are allowed.

pub mod template;
pub mod types;
mod watcher;

use std::fmt;
use std::path::PathBuf;
use std::sync::mpsc::{self, Receiver, Sender};
use std::sync::{Arc, OnceLock};

pub use types::{
    ConfigError, DotspacesConfig, SettingsConfig, config_paths, load_config as load_config_default,
    load_config_from_path, parse_config,
};
pub use watcher::watch_config_file;

use crate::settings::MemorySettingsStore;

/// Global configuration instance, loaded once at startup.
static CONFIG: OnceLock<DotspacesConfig> = OnceLock::new();

/// Path to the currently loaded configuration file.
static CONFIG_PATH: OnceLock<PathBuf> = OnceLock::new();

/// Custom config path override.
static CUSTOM_CONFIG_PATH: OnceLock<PathBuf> = OnceLock::new();

/// Sets a custom configuration file path to use instead of the default search paths.
///
/// This must be called before `init()` or `get_config()` to take effect.
///
/// # Returns
///
/// `true` if the path was set successfully, `false` if a path was already set.
pub fn set_custom_config_path(path: PathBuf) -> bool { CUSTOM_CONFIG_PATH.set(path).is_ok() }

/// Loads the configuration from disk.
///
/// Returns the loaded configuration, or a default configuration if loading fails.
/// If no configuration file exists, creates a template configuration file.
fn load_or_default() -> DotspacesConfig {
    let result = CUSTOM_CONFIG_PATH
        .get()
        .map_or_else(load_config_default, |path| load_config_from_path(path));

    match result {
        Ok((config, path)) => {
            let _ = CONFIG_PATH.set(path);
            config
        }
        Err(ConfigError::NotFound) => {
            create_default_config_file();
            DotspacesConfig::default()
        }
        Err(err) => {
            tracing::warn!(error = %err, "failed to load configuration, using defaults");
            DotspacesConfig::default()
        }
    }
}

/// Creates a template configuration file at the default location.
///
/// This is called when no configuration file is found during startup.
fn create_default_config_file() {
    let Some(config_path) = config_paths().into_iter().next() else {
        tracing::debug!("no config path available for creating template");
        return;
    };

    if config_path.exists() {
        return;
    }

    match template::create_config_file(&config_path) {
        Ok(()) => {
            let _ = CONFIG_PATH.set(config_path.clone());
            tracing::info!(path = %config_path.display(), "created default configuration file");
        }
        Err(err) => {
            tracing::debug!(
                error = %err,
                path = %config_path.display(),
                "failed to create default configuration file"
            );
        }
    }
}

/// Initializes and returns the global configuration instance.
///
/// This function is idempotent - calling it multiple times will return
/// the same configuration instance.
pub fn init() -> &'static DotspacesConfig { CONFIG.get_or_init(load_or_default) }

/// Returns the global configuration instance, initializing it if necessary.
pub fn get_config() -> &'static DotspacesConfig { CONFIG.get_or_init(load_or_default) }

/// Returns the path to the loaded configuration file, if any.
pub fn get_config_path() -> Option<&'static PathBuf> { CONFIG_PATH.get() }

/// Writes the configured toggles into the stores.
///
/// Each store only takes the keys of its own schema and only notifies keys
/// whose value changed. Returns the number of keys that changed.
pub fn apply_settings(settings: &SettingsConfig, stores: &[&MemorySettingsStore]) -> usize {
    let values = settings.values();
    stores.iter().map(|store| store.apply(values.iter().copied())).sum()
}

/// Settings revisions read by the watcher thread, held until the host's main
/// loop applies them.
///
/// Store notifications drive the indicator row, so [`apply_pending`] must be
/// called from the thread that owns the row (an idle or timeout source on the
/// shell's main loop).
///
/// [`apply_pending`]: SettingsReloads::apply_pending
pub struct SettingsReloads {
    receiver: Receiver<SettingsConfig>,
    stores: Vec<Arc<MemorySettingsStore>>,
}

impl SettingsReloads {
    fn channel(stores: Vec<Arc<MemorySettingsStore>>) -> (Sender<SettingsConfig>, Self) {
        let (sender, receiver) = mpsc::channel();
        (sender, Self { receiver, stores })
    }

    /// Applies the newest pending revision on the calling thread. Older
    /// pending revisions are superseded and skipped.
    ///
    /// Returns the number of keys that changed.
    pub fn apply_pending(&self) -> usize {
        let Some(latest) = self.receiver.try_iter().last() else {
            return 0;
        };
        let stores: Vec<&MemorySettingsStore> = self.stores.iter().map(Arc::as_ref).collect();
        let changed = apply_settings(&latest, &stores);
        tracing::debug!(changed, "applied reloaded settings");
        changed
    }
}

impl fmt::Debug for SettingsReloads {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SettingsReloads").field("stores", &self.stores.len()).finish_non_exhaustive()
    }
}

/// Watches the loaded configuration file and queues every revision's toggles
/// for `stores`.
///
/// The watcher thread never touches the stores. Returns `None` when no
/// configuration file was loaded.
#[must_use]
pub fn watch_settings(stores: Vec<Arc<MemorySettingsStore>>) -> Option<SettingsReloads> {
    let config_path = get_config_path().cloned()?;
    let (sender, reloads) = SettingsReloads::channel(stores);

    watch_config_file(config_path, move |config| {
        if sender.send(config.settings).is_err() {
            tracing::debug!("settings receiver dropped, reload discarded");
        }
    });

    Some(reloads)
}
