//! Capabilities the host shell provides.
//!
//! Everything this crate knows about the shell goes through these traits, so
//! the engine can run against the real shell bindings or against the fakes in
//! [`crate::testing`].

use std::fmt;
use std::sync::Arc;

use serde::Serialize;

use crate::error::DotspacesError;
use crate::indicator::{IconSpec, IndicatorState, StyleClass};
use crate::settings::SettingsFacade;
use crate::signals::SignalSource;

/// A window as listed by the display, reduced to what occupancy needs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WindowInfo {
    /// Window class, if the window set one.
    pub wm_class: Option<String>,
    /// Whether the window is shown on every workspace.
    pub on_all_workspaces: bool,
}

impl WindowInfo {
    /// A window living on a single workspace.
    #[must_use]
    pub fn regular(wm_class: impl Into<String>) -> Self {
        Self {
            wm_class: Some(wm_class.into()),
            on_all_workspaces: false,
        }
    }

    /// A window shown on every workspace.
    #[must_use]
    pub fn pinned(wm_class: impl Into<String>) -> Self {
        Self {
            wm_class: Some(wm_class.into()),
            on_all_workspaces: true,
        }
    }
}

/// One workspace of the window manager.
pub trait Workspace: Send + Sync {
    /// Zero-based position of the workspace.
    fn index(&self) -> usize;

    /// Number of windows on the workspace, including windows shown on every
    /// workspace.
    fn window_count(&self) -> usize;

    /// Whether this is the active workspace.
    fn is_active(&self) -> bool;

    /// Switches to this workspace.
    ///
    /// # Errors
    ///
    /// Returns an error if the window manager refuses the switch.
    fn activate(&self, timestamp: u32) -> Result<(), DotspacesError>;
}

/// The window manager's live workspace model.
///
/// Emits the signals in [`crate::events::workspace`].
pub trait WorkspaceManager: SignalSource {
    /// Number of workspaces.
    fn n_workspaces(&self) -> usize;

    /// Index of the active workspace.
    fn active_workspace_index(&self) -> usize;

    /// Workspace at `index`, if it exists.
    fn workspace(&self, index: usize) -> Option<Arc<dyn Workspace>>;

    /// Every window known to the display, on any workspace.
    fn list_all_windows(&self) -> Vec<WindowInfo>;

    /// Timestamp of the event currently being handled.
    fn current_time(&self) -> u32;
}

/// The shell's overview (workspace/window picker).
pub trait Overview: Send + Sync {
    fn is_visible(&self) -> bool;
    fn show(&self);
    fn hide(&self);
}

/// The panel's built-in activities button.
pub trait ActivitiesButton: Send + Sync {
    fn show(&self);
    fn hide(&self);
}

/// Side of the panel a status item is inserted into.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum PanelSide {
    Left,
    Center,
    Right,
}

/// The top panel.
///
/// Emits [`crate::events::input::SCROLL`] for scrolls anywhere over it.
pub trait Panel: SignalSource {
    /// Inserts the status item `id` at `position` on `side`.
    ///
    /// # Errors
    ///
    /// Returns an error if the panel already holds an item with that id.
    fn add_status_item(&self, id: &str, position: usize, side: PanelSide)
    -> Result<(), DotspacesError>;

    /// Removes the status item `id`. Returns `false` if it wasn't present.
    fn remove_status_item(&self, id: &str) -> bool;

    /// The activities button, if the panel has one.
    fn activities(&self) -> Option<Arc<dyn ActivitiesButton>>;

    /// Whether the session is locked.
    fn is_session_locked(&self) -> bool;
}

/// One rendered indicator.
pub trait IndicatorWidget: Send {
    /// Replaces the widget's style classes.
    fn set_style_classes(&mut self, classes: &[StyleClass]);

    /// Replaces the widget's icon.
    fn set_icon(&mut self, icon: IconSpec);

    /// Removes the widget from the row and frees it.
    fn destroy(self: Box<Self>);
}

/// The container holding the indicators.
///
/// Emits [`crate::events::input::SCROLL`] for scrolls over the row and
/// [`crate::events::input::BUTTON_RELEASE`] with the clicked indicator's index.
pub trait IndicatorRow: SignalSource {
    /// Creates a widget for `state` at the end of the row.
    fn append(&self, state: &IndicatorState) -> Box<dyn IndicatorWidget>;

    /// Shows or hides the whole row.
    fn set_visible(&self, visible: bool);
}

/// Every capability the container needs, bundled.
#[derive(Clone)]
pub struct Host {
    pub workspaces: Arc<dyn WorkspaceManager>,
    pub panel: Arc<dyn Panel>,
    pub overview: Arc<dyn Overview>,
    pub row: Arc<dyn IndicatorRow>,
    pub settings: SettingsFacade,
}

impl fmt::Debug for Host {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Host")
            .field("workspaces", &self.workspaces.n_workspaces())
            .field("settings", &self.settings)
            .finish_non_exhaustive()
    }
}
