//! Centralized signal names for host event sources.
//!
//! Every signal this crate connects to is defined here so the fakes, the
//! container, and the host bindings agree on the exact strings.
//!
//! ## Naming Convention
//!
//! Names follow the host toolkit's conventions:
//!
//! - `notify::<property>` - a property of the source changed
//! - `changed::<key>` - a settings key changed
//! - `<noun>-<verb>` - a plain signal (e.g. `window-added`)

/// Workspace manager signals.
pub mod workspace {
    /// Emitted when the active workspace changes.
    ///
    /// Payload: none.
    pub const ACTIVE_CHANGED: &str = "active-workspace-changed";

    /// Emitted when the number of workspaces changes.
    ///
    /// Payload: none.
    pub const COUNT_CHANGED: &str = "notify::n-workspaces";

    /// Emitted when a window is added to any workspace.
    ///
    /// Payload: none.
    pub const WINDOW_ADDED: &str = "window-added";

    /// Emitted when a window is removed from any workspace.
    ///
    /// Payload: none.
    pub const WINDOW_REMOVED: &str = "window-removed";
}

/// Pointer input signals emitted by the panel and the indicator row.
pub mod input {
    /// Emitted when the pointer scrolls over the source.
    ///
    /// Payload: `SignalArgs::Scroll`.
    pub const SCROLL: &str = "scroll-event";

    /// Emitted when a mouse button is released over an indicator.
    ///
    /// Payload: `SignalArgs::ButtonRelease { index }`.
    pub const BUTTON_RELEASE: &str = "button-release-event";
}

/// Settings store signals.
pub mod settings {
    /// Prefix of per-key change signals (`changed::<key>`).
    pub const CHANGED_PREFIX: &str = "changed::";
}
