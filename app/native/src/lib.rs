//! Dotspaces - workspace dot indicators for a desktop shell panel.
//!
//! One dot per workspace sits in the panel. Dots show whether their workspace
//! is active, holds windows of its own, or is the trailing dynamic workspace.
//! Clicking a dot switches to its workspace (or toggles the overview for the
//! active one) and scrolling over the dots, or optionally the whole panel,
//! cycles through workspaces.
//!
//! The shell is reached only through the capability traits in [`host`]. A host
//! binding implements them, then drives the crate through [`Extension`]:
//!
//! ```ignore
//! let config = dotspaces::config::init();
//! dotspaces::config::apply_settings(&config.settings, &[&extension_store, &mutter_store]);
//! let extension = dotspaces::Extension::enable(host, config)?;
//!
//! // Config reloads are read on a watcher thread and applied from the main loop.
//! let reloads = dotspaces::config::watch_settings(vec![extension_store, mutter_store]);
//! main_loop.add_idle(move || reloads.as_ref().map_or(0, |r| r.apply_pending()));
//! ```

// Core modules
pub mod config;
pub mod constants;
pub mod error;
pub mod events;
pub mod logging;
pub mod schema;

// Engine
pub mod activities;
pub mod container;
pub mod extension;
pub mod host;
pub mod indicator;
pub mod reconcile;
pub mod scroll;
pub mod settings;
pub mod signals;
pub mod snapshot;

mod utils;

#[cfg(any(test, feature = "test-support"))]
pub mod testing;

pub use container::DotspaceContainer;
pub use error::DotspacesError;
pub use extension::Extension;
pub use host::Host;
