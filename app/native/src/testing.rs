//! In-memory stand-ins for the shell, used by the unit and integration tests.
//!
//! The fakes emit their signals synchronously from inside the mutating call,
//! like the real shell does, so re-entrant delivery is exercised as well.

use std::collections::BTreeMap;
use std::sync::atomic::{AtomicBool, AtomicU32, AtomicUsize, Ordering};
use std::sync::{Arc, Weak};

use parking_lot::Mutex;

use crate::constants::RESERVED_WINDOW_CLASSES;
use crate::error::DotspacesError;
use crate::events;
use crate::host::{
    ActivitiesButton, Host, IndicatorRow, IndicatorWidget, Overview, Panel, PanelSide, WindowInfo,
    Workspace, WorkspaceManager,
};
use crate::indicator::{IconSpec, IndicatorState, StyleClass, StyleClasses};
use crate::scroll::ScrollDirection;
use crate::settings::{MemorySettingsStore, SettingsFacade, SettingsSchema};
use crate::signals::{ConnectionId, SignalArgs, SignalCallback, SignalEmitter, SignalSource};

// ============================================================================
// Workspaces
// ============================================================================

#[derive(Debug, Default)]
struct WorkspaceModel {
    window_counts: Vec<usize>,
    active: usize,
    windows: Vec<WindowInfo>,
    activations: Vec<usize>,
    fail_activation: bool,
}

/// Workspace manager backed by plain counters.
#[derive(Debug)]
pub struct FakeWorkspaceManager {
    this: Weak<Self>,
    model: Mutex<WorkspaceModel>,
    time: AtomicU32,
    emitter: SignalEmitter,
}

impl FakeWorkspaceManager {
    /// Creates a manager with one workspace per entry, each holding that many
    /// regular windows. The first workspace is active.
    #[must_use]
    pub fn new(window_counts: &[usize]) -> Arc<Self> {
        let windows = window_counts
            .iter()
            .flat_map(|count| (0..*count).map(|_| WindowInfo::regular("App")))
            .collect();
        Arc::new_cyclic(|this| Self {
            this: Weak::clone(this),
            model: Mutex::new(WorkspaceModel {
                window_counts: window_counts.to_vec(),
                windows,
                ..WorkspaceModel::default()
            }),
            time: AtomicU32::new(1),
            emitter: SignalEmitter::new(),
        })
    }

    /// Makes `index` active and emits `active-workspace-changed`.
    pub fn set_active(&self, index: usize) {
        self.model.lock().active = index;
        self.emit(events::workspace::ACTIVE_CHANGED);
    }

    /// Resizes to `count` workspaces and emits `notify::n-workspaces`.
    ///
    /// New workspaces start empty. The active index is clamped to the new range.
    pub fn set_workspace_count(&self, count: usize) {
        {
            let mut model = self.model.lock();
            model.window_counts.resize(count, 0);
            model.active = model.active.min(count.saturating_sub(1));
        }
        self.emit(events::workspace::COUNT_CHANGED);
    }

    /// Appends an empty workspace.
    pub fn add_workspace(&self) { self.set_workspace_count(self.n_workspaces() + 1); }

    /// Drops the last workspace.
    pub fn remove_workspace(&self) {
        self.set_workspace_count(self.n_workspaces().saturating_sub(1));
    }

    /// Opens a regular window on `index` and emits `window-added`.
    pub fn add_window(&self, index: usize) {
        {
            let mut model = self.model.lock();
            if let Some(count) = model.window_counts.get_mut(index) {
                *count += 1;
            }
            model.windows.push(WindowInfo::regular("App"));
        }
        self.emit(events::workspace::WINDOW_ADDED);
    }

    /// Closes a regular window on `index` and emits `window-removed`.
    pub fn remove_window(&self, index: usize) {
        {
            let mut model = self.model.lock();
            if let Some(count) = model.window_counts.get_mut(index) {
                *count = count.saturating_sub(1);
            }
            if let Some(position) = model.windows.iter().position(|w| !w.on_all_workspaces) {
                model.windows.remove(position);
            }
        }
        self.emit(events::workspace::WINDOW_REMOVED);
    }

    /// Opens a window shown on every workspace and emits `window-added`.
    ///
    /// Shell-owned classes only appear in the global window list, never in a
    /// workspace's own list.
    pub fn add_pinned_window(&self, wm_class: &str) {
        {
            let mut model = self.model.lock();
            if !RESERVED_WINDOW_CLASSES.contains(&wm_class) {
                for count in &mut model.window_counts {
                    *count += 1;
                }
            }
            model.windows.push(WindowInfo::pinned(wm_class));
        }
        self.emit(events::workspace::WINDOW_ADDED);
    }

    /// Makes every later [`Workspace::activate`] fail.
    pub fn fail_activations(&self, fail: bool) { self.model.lock().fail_activation = fail; }

    /// Indices passed to [`Workspace::activate`], in call order.
    #[must_use]
    pub fn activations(&self) -> Vec<usize> { self.model.lock().activations.clone() }

    /// Number of connected handlers.
    #[must_use]
    pub fn handler_count(&self) -> usize { self.emitter.handler_count() }

    fn activate(&self, index: usize) -> Result<(), DotspacesError> {
        {
            let mut model = self.model.lock();
            if model.fail_activation {
                return Err(DotspacesError::HostError(format!("activation of {index} refused")));
            }
            model.activations.push(index);
        }
        self.time.fetch_add(1, Ordering::SeqCst);
        self.set_active(index);
        Ok(())
    }

    fn emit(&self, event: &str) { self.emitter.emit(event, &SignalArgs::None); }
}

impl SignalSource for FakeWorkspaceManager {
    fn connect(&self, event: &str, callback: SignalCallback) -> ConnectionId {
        self.emitter.connect(event, callback)
    }

    fn disconnect(&self, id: ConnectionId) -> bool { self.emitter.disconnect(id) }
}

impl WorkspaceManager for FakeWorkspaceManager {
    fn n_workspaces(&self) -> usize { self.model.lock().window_counts.len() }

    fn active_workspace_index(&self) -> usize { self.model.lock().active }

    fn workspace(&self, index: usize) -> Option<Arc<dyn Workspace>> {
        if index >= self.n_workspaces() {
            return None;
        }
        Some(Arc::new(FakeWorkspace {
            manager: Weak::clone(&self.this),
            index,
        }))
    }

    fn list_all_windows(&self) -> Vec<WindowInfo> { self.model.lock().windows.clone() }

    fn current_time(&self) -> u32 { self.time.load(Ordering::SeqCst) }
}

struct FakeWorkspace {
    manager: Weak<FakeWorkspaceManager>,
    index: usize,
}

impl Workspace for FakeWorkspace {
    fn index(&self) -> usize { self.index }

    fn window_count(&self) -> usize {
        self.manager.upgrade().map_or(0, |manager| {
            manager.model.lock().window_counts.get(self.index).copied().unwrap_or(0)
        })
    }

    fn is_active(&self) -> bool {
        self.manager.upgrade().is_some_and(|m| m.active_workspace_index() == self.index)
    }

    fn activate(&self, _timestamp: u32) -> Result<(), DotspacesError> {
        let manager = self
            .manager
            .upgrade()
            .ok_or_else(|| DotspacesError::HostError("workspace manager is gone".into()))?;
        manager.activate(self.index)
    }
}

// ============================================================================
// Panel, overview, activities
// ============================================================================

/// Activities button that records its visibility.
#[derive(Debug)]
pub struct FakeActivities {
    visible: AtomicBool,
}

impl FakeActivities {
    /// Whether the button is currently shown.
    #[must_use]
    pub fn is_visible(&self) -> bool { self.visible.load(Ordering::SeqCst) }
}

impl ActivitiesButton for FakeActivities {
    fn show(&self) { self.visible.store(true, Ordering::SeqCst); }

    fn hide(&self) { self.visible.store(false, Ordering::SeqCst); }
}

/// A status item inserted into the fake panel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusItem {
    pub id: String,
    pub position: usize,
    pub side: PanelSide,
}

/// Panel with a status area, an activities button and a lock flag.
#[derive(Debug)]
pub struct FakePanel {
    items: Mutex<Vec<StatusItem>>,
    activities: Option<Arc<FakeActivities>>,
    locked: AtomicBool,
    emitter: SignalEmitter,
}

impl FakePanel {
    /// Creates a panel with a visible activities button.
    #[must_use]
    pub fn new() -> Arc<Self> {
        Arc::new(Self::build(Some(Arc::new(FakeActivities {
            visible: AtomicBool::new(true),
        }))))
    }

    /// Creates a panel without an activities button.
    #[must_use]
    pub fn without_activities() -> Arc<Self> { Arc::new(Self::build(None)) }

    fn build(activities: Option<Arc<FakeActivities>>) -> Self {
        Self {
            items: Mutex::new(Vec::new()),
            activities,
            locked: AtomicBool::new(false),
            emitter: SignalEmitter::new(),
        }
    }

    /// Scrolls over the panel.
    pub fn scroll(&self, direction: ScrollDirection) {
        self.emitter.emit(events::input::SCROLL, &SignalArgs::Scroll(direction));
    }

    /// Locks or unlocks the session.
    pub fn set_locked(&self, locked: bool) { self.locked.store(locked, Ordering::SeqCst); }

    /// The concrete activities button.
    #[must_use]
    pub fn activities_button(&self) -> Option<&Arc<FakeActivities>> { self.activities.as_ref() }

    /// Status items in insertion order.
    #[must_use]
    pub fn status_items(&self) -> Vec<StatusItem> { self.items.lock().clone() }

    /// Number of connected handlers.
    #[must_use]
    pub fn handler_count(&self) -> usize { self.emitter.handler_count() }
}

impl SignalSource for FakePanel {
    fn connect(&self, event: &str, callback: SignalCallback) -> ConnectionId {
        self.emitter.connect(event, callback)
    }

    fn disconnect(&self, id: ConnectionId) -> bool { self.emitter.disconnect(id) }
}

impl Panel for FakePanel {
    fn add_status_item(
        &self,
        id: &str,
        position: usize,
        side: PanelSide,
    ) -> Result<(), DotspacesError> {
        let mut items = self.items.lock();
        if items.iter().any(|item| item.id == id) {
            return Err(DotspacesError::HostError(format!("status item {id} already exists")));
        }
        items.push(StatusItem {
            id: id.to_string(),
            position,
            side,
        });
        Ok(())
    }

    fn remove_status_item(&self, id: &str) -> bool {
        let mut items = self.items.lock();
        let before = items.len();
        items.retain(|item| item.id != id);
        items.len() != before
    }

    fn activities(&self) -> Option<Arc<dyn ActivitiesButton>> {
        self.activities.clone().map(|button| button as Arc<dyn ActivitiesButton>)
    }

    fn is_session_locked(&self) -> bool { self.locked.load(Ordering::SeqCst) }
}

/// Overview that counts how often it was shown and hidden.
#[derive(Debug, Default)]
pub struct FakeOverview {
    visible: AtomicBool,
    toggles: AtomicUsize,
}

impl FakeOverview {
    #[must_use]
    pub fn new() -> Arc<Self> { Arc::new(Self::default()) }

    /// Number of show and hide calls.
    #[must_use]
    pub fn toggles(&self) -> usize { self.toggles.load(Ordering::SeqCst) }
}

impl Overview for FakeOverview {
    fn is_visible(&self) -> bool { self.visible.load(Ordering::SeqCst) }

    fn show(&self) {
        self.visible.store(true, Ordering::SeqCst);
        self.toggles.fetch_add(1, Ordering::SeqCst);
    }

    fn hide(&self) {
        self.visible.store(false, Ordering::SeqCst);
        self.toggles.fetch_add(1, Ordering::SeqCst);
    }
}

// ============================================================================
// Indicator row
// ============================================================================

/// What a live fake widget currently displays.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedWidget {
    pub icon: IconSpec,
    pub style_classes: StyleClasses,
}

#[derive(Debug)]
struct RowModel {
    next_id: u64,
    widgets: BTreeMap<u64, RenderedWidget>,
    created: usize,
    destroyed: usize,
    patches: usize,
    visible: bool,
    visibility_changes: usize,
}

/// Indicator row that tracks widget lifecycles and mutations.
#[derive(Debug)]
pub struct FakeIndicatorRow {
    model: Arc<Mutex<RowModel>>,
    emitter: SignalEmitter,
}

impl FakeIndicatorRow {
    /// Creates an empty, visible row.
    #[must_use]
    pub fn new() -> Arc<Self> {
        Arc::new(Self {
            model: Arc::new(Mutex::new(RowModel {
                next_id: 0,
                widgets: BTreeMap::new(),
                created: 0,
                destroyed: 0,
                patches: 0,
                visible: true,
                visibility_changes: 0,
            })),
            emitter: SignalEmitter::new(),
        })
    }

    /// Clicks the dot at `index`.
    pub fn click(&self, index: usize) {
        self.emitter.emit(events::input::BUTTON_RELEASE, &SignalArgs::ButtonRelease { index });
    }

    /// Scrolls over the row.
    pub fn scroll(&self, direction: ScrollDirection) {
        self.emitter.emit(events::input::SCROLL, &SignalArgs::Scroll(direction));
    }

    /// Widgets created so far.
    #[must_use]
    pub fn created(&self) -> usize { self.model.lock().created }

    /// Widgets destroyed so far.
    #[must_use]
    pub fn destroyed(&self) -> usize { self.model.lock().destroyed }

    /// Widgets currently alive.
    #[must_use]
    pub fn live_widgets(&self) -> usize { self.model.lock().widgets.len() }

    /// Attribute writes made to existing widgets.
    #[must_use]
    pub fn patches(&self) -> usize { self.model.lock().patches }

    /// Whether the row is shown.
    #[must_use]
    pub fn is_visible(&self) -> bool { self.model.lock().visible }

    /// Number of `set_visible` calls.
    #[must_use]
    pub fn visibility_changes(&self) -> usize { self.model.lock().visibility_changes }

    /// What each live widget displays, in row order.
    #[must_use]
    pub fn rendered(&self) -> Vec<RenderedWidget> {
        self.model.lock().widgets.values().cloned().collect()
    }

    /// Number of connected handlers.
    #[must_use]
    pub fn handler_count(&self) -> usize { self.emitter.handler_count() }
}

impl SignalSource for FakeIndicatorRow {
    fn connect(&self, event: &str, callback: SignalCallback) -> ConnectionId {
        self.emitter.connect(event, callback)
    }

    fn disconnect(&self, id: ConnectionId) -> bool { self.emitter.disconnect(id) }
}

impl IndicatorRow for FakeIndicatorRow {
    fn append(&self, state: &IndicatorState) -> Box<dyn IndicatorWidget> {
        let mut model = self.model.lock();
        model.next_id += 1;
        model.created += 1;
        let id = model.next_id;
        model.widgets.insert(id, RenderedWidget {
            icon: state.icon,
            style_classes: state.style_classes.clone(),
        });
        Box::new(FakeIndicatorWidget {
            id,
            model: Arc::clone(&self.model),
        })
    }

    fn set_visible(&self, visible: bool) {
        let mut model = self.model.lock();
        model.visible = visible;
        model.visibility_changes += 1;
    }
}

struct FakeIndicatorWidget {
    id: u64,
    model: Arc<Mutex<RowModel>>,
}

impl IndicatorWidget for FakeIndicatorWidget {
    fn set_style_classes(&mut self, classes: &[StyleClass]) {
        let mut model = self.model.lock();
        model.patches += 1;
        if let Some(widget) = model.widgets.get_mut(&self.id) {
            widget.style_classes = classes.iter().copied().collect();
        }
    }

    fn set_icon(&mut self, icon: IconSpec) {
        let mut model = self.model.lock();
        model.patches += 1;
        if let Some(widget) = model.widgets.get_mut(&self.id) {
            widget.icon = icon;
        }
    }

    fn destroy(self: Box<Self>) {
        let mut model = self.model.lock();
        if model.widgets.remove(&self.id).is_some() {
            model.destroyed += 1;
        }
    }
}

// ============================================================================
// Bundle
// ============================================================================

/// Every fake, wired together.
#[derive(Debug, Clone)]
pub struct FakeShell {
    pub workspaces: Arc<FakeWorkspaceManager>,
    pub panel: Arc<FakePanel>,
    pub overview: Arc<FakeOverview>,
    pub row: Arc<FakeIndicatorRow>,
    pub extension_settings: Arc<MemorySettingsStore>,
    pub window_manager_settings: Arc<MemorySettingsStore>,
}

impl FakeShell {
    /// Creates a shell with one workspace per entry of `window_counts`.
    #[must_use]
    pub fn new(window_counts: &[usize]) -> Self {
        Self {
            workspaces: FakeWorkspaceManager::new(window_counts),
            panel: FakePanel::new(),
            overview: FakeOverview::new(),
            row: FakeIndicatorRow::new(),
            extension_settings: Arc::new(MemorySettingsStore::new(SettingsSchema::Extension)),
            window_manager_settings: Arc::new(MemorySettingsStore::new(
                SettingsSchema::WindowManager,
            )),
        }
    }

    /// The capabilities as the container sees them.
    #[must_use]
    pub fn host(&self) -> Host {
        Host {
            workspaces: self.workspaces.clone(),
            panel: self.panel.clone(),
            overview: self.overview.clone(),
            row: self.row.clone(),
            settings: SettingsFacade::new(
                self.extension_settings.clone(),
                self.window_manager_settings.clone(),
            ),
        }
    }
}
