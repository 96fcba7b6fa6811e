//! The indicator container: owns the row, listens to the shell and keeps the
//! dots in sync.
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────┐   notify::n-workspaces, active-workspace-changed,
//! │ WorkspaceManager │── window-added, window-removed ─────────┐
//! └──────────────────┘                                         │
//! ┌──────────────────┐   changed::<key>                        ▼
//! │ SettingsFacade   │──────────────────────────────▶ ┌────────────────┐
//! └──────────────────┘                                │   Dispatcher   │
//! ┌──────────────────┐   scroll-event (routed),       │  (serialized)  │
//! │ Panel / Row      │── button-release-event ──────▶ └───────┬────────┘
//! └──────────────────┘                                        ▼
//!                                                      ┌─────────────┐
//!                         snapshot ▶ compute ▶ reconcile│  Controller │
//!                                                      └─────────────┘
//! ```
//!
//! Every handler runs on the controller through its [`Dispatcher`], one at a
//! time. Host calls made from a handler may emit signals synchronously; those
//! are queued and handled right after the current one.

use std::sync::{Arc, Weak};

use crate::activities::toggle_activities;
use crate::error::DotspacesError;
use crate::events;
use crate::host::Host;
use crate::indicator::{
    IconSizePolicy, IndicatorAction, IndicatorState, compute_indicators, row_visible,
};
use crate::reconcile::{ReconcileReport, Reconciler};
use crate::scroll::{ScrollRouter, ScrollSource, cycle_target};
use crate::settings::SettingKey;
use crate::signals::{Dispatcher, SignalArgs, SignalManager, SignalSource};
use crate::snapshot::WorkspaceSnapshot;

/// Settings whose change only requires a refresh.
const REFRESH_KEYS: [SettingKey; 3] = [
    SettingKey::IgnoreInactiveOccupiedWorkspaces,
    SettingKey::HideDotsOnSingle,
    SettingKey::DynamicWorkspaces,
];

/// Workspace manager signals that require a refresh.
const WORKSPACE_EVENTS: [&str; 4] = [
    events::workspace::ACTIVE_CHANGED,
    events::workspace::COUNT_CHANGED,
    events::workspace::WINDOW_ADDED,
    events::workspace::WINDOW_REMOVED,
];

struct Controller {
    host: Host,
    policy: IconSizePolicy,
    signals: SignalManager<Self>,
    reconciler: Reconciler,
    router: ScrollRouter,
    last_report: Option<ReconcileReport>,
    destroyed: bool,
}

impl Controller {
    fn new(host: Host, policy: IconSizePolicy, receiver: Weak<Dispatcher<Self>>) -> Self {
        let reconciler = Reconciler::new(Arc::clone(&host.row));
        Self {
            host,
            policy,
            signals: SignalManager::new(receiver),
            reconciler,
            router: ScrollRouter::new(),
            last_report: None,
            destroyed: false,
        }
    }

    fn connect_signals(&mut self) {
        let workspaces: Arc<dyn SignalSource> = self.host.workspaces.clone();
        for event in WORKSPACE_EVENTS {
            self.signals.subscribe(&workspaces, event, |controller: &mut Self, _| {
                controller.refresh();
            });
        }

        for key in REFRESH_KEYS {
            let source = self.host.settings.source_for(key);
            self.signals.subscribe(&source, &key.changed_signal(), |controller: &mut Self, _| {
                controller.refresh();
            });
        }

        let key = SettingKey::PanelScroll;
        let source = self.host.settings.source_for(key);
        self.signals.subscribe(&source, &key.changed_signal(), |controller: &mut Self, _| {
            controller.route_scroll();
        });

        let key = SettingKey::KeepActivities;
        let source = self.host.settings.source_for(key);
        self.signals.subscribe(&source, &key.changed_signal(), |controller: &mut Self, _| {
            controller.sync_activities();
        });

        let row: Arc<dyn SignalSource> = self.host.row.clone();
        self.signals.subscribe(&row, events::input::BUTTON_RELEASE, Self::on_button_release);

        self.route_scroll();
    }

    /// Recomputes every dot and applies the result.
    fn refresh(&mut self) -> Option<ReconcileReport> {
        if self.destroyed {
            return None;
        }

        let snapshot = WorkspaceSnapshot::capture(&*self.host.workspaces);
        let settings = self.host.settings.snapshot();
        let states = compute_indicators(&snapshot, &settings, &self.policy);
        let visible = row_visible(&settings, snapshot.count);

        let report = self.reconciler.reconcile(states, visible);
        tracing::trace!(
            count = snapshot.count,
            active = snapshot.active_index,
            created = report.created,
            destroyed = report.destroyed,
            patched = report.patched,
            "refreshed indicators"
        );
        self.last_report = Some(report);
        Some(report)
    }

    /// Binds scroll handling to the surface chosen by `panel-scroll`.
    fn route_scroll(&mut self) {
        if self.destroyed {
            return;
        }

        let source = ScrollSource::from_panel_scroll(self.host.settings.get(SettingKey::PanelScroll));
        let target: Arc<dyn SignalSource> = match source {
            ScrollSource::Panel => self.host.panel.clone(),
            ScrollSource::Indicators => self.host.row.clone(),
        };

        self.router.route(source, &target, &mut self.signals, move |controller: &mut Self, args| {
            controller.on_scroll(source, args);
        });
    }

    fn sync_activities(&self) {
        if self.destroyed {
            return;
        }
        let keep = self.host.settings.get(SettingKey::KeepActivities);
        if !toggle_activities(&*self.host.panel, keep) {
            tracing::debug!(keep, "activities button left untouched");
        }
    }

    fn on_scroll(&mut self, source: ScrollSource, args: &SignalArgs) {
        if self.destroyed || !self.router.accepts(source) {
            return;
        }
        let SignalArgs::Scroll(direction) = *args else {
            return;
        };

        let manager = &self.host.workspaces;
        // Read fresh: wrap-workspaces has no subscription of its own.
        let wrap = self.host.settings.get(SettingKey::WrapWorkspaces);
        let Some(target) =
            cycle_target(direction, manager.active_workspace_index(), manager.n_workspaces(), wrap)
        else {
            return;
        };

        if let Err(err) = self.activate(target) {
            tracing::warn!(error = %err, target, "failed to switch workspace on scroll");
        }
    }

    fn on_button_release(&mut self, args: &SignalArgs) {
        if self.destroyed {
            return;
        }
        let SignalArgs::ButtonRelease { index } = *args else {
            return;
        };

        match self.reconciler.action_at(index) {
            Some(IndicatorAction::ToggleOverview) => self.toggle_overview(),
            Some(IndicatorAction::ActivateWorkspace(target)) => {
                if let Err(err) = self.activate(target) {
                    tracing::warn!(error = %err, target, "failed to switch workspace on click");
                }
            }
            None => tracing::debug!(index, "click on unknown indicator"),
        }
    }

    fn toggle_overview(&self) {
        let overview = &self.host.overview;
        if overview.is_visible() {
            overview.hide();
        } else {
            overview.show();
        }
    }

    fn activate(&self, index: usize) -> Result<(), DotspacesError> {
        let manager = &self.host.workspaces;
        let workspace = manager.workspace(index).ok_or(DotspacesError::WorkspaceNotFound(index))?;
        workspace.activate(manager.current_time())
    }

    fn destroy(&mut self) -> bool {
        if self.destroyed {
            return false;
        }
        self.destroyed = true;

        self.router.release(&mut self.signals);
        let released = self.signals.clear_all();
        let removed = self.reconciler.clear();
        tracing::debug!(released, removed, "indicator container destroyed");
        true
    }
}

/// The indicator row plus everything that keeps it current.
///
/// Creating the container connects every signal and renders the row once.
/// [`destroy`](Self::destroy) (or dropping the container) disconnects every
/// signal and frees every dot.
pub struct DotspaceContainer {
    dispatcher: Arc<Dispatcher<Controller>>,
}

impl DotspaceContainer {
    /// Connects to `host` and renders the initial row.
    #[must_use]
    pub fn new(host: Host, policy: IconSizePolicy) -> Self {
        let dispatcher = Arc::new_cyclic(|receiver: &Weak<Dispatcher<Controller>>| {
            Dispatcher::new(Controller::new(host, policy, Weak::clone(receiver)))
        });

        dispatcher.with(|controller| {
            controller.connect_signals();
            controller.refresh();
        });
        tracing::debug!("indicator container created");

        Self { dispatcher }
    }

    /// Recomputes and reapplies every dot. `None` once destroyed.
    pub fn refresh(&self) -> Option<ReconcileReport> { self.dispatcher.with(Controller::refresh) }

    /// Replaces the icon sizes and refreshes.
    pub fn set_policy(&self, policy: IconSizePolicy) {
        self.dispatcher.with(|controller| {
            if controller.policy != policy {
                controller.policy = policy;
                controller.refresh();
            }
        });
    }

    /// Number of dots on screen.
    #[must_use]
    pub fn indicator_count(&self) -> usize { self.dispatcher.with(|c| c.reconciler.len()) }

    /// States of the dots on screen, in row order.
    #[must_use]
    pub fn indicator_states(&self) -> Vec<IndicatorState> {
        self.dispatcher.with(|c| c.reconciler.states().cloned().collect())
    }

    /// Number of live signal connections.
    #[must_use]
    pub fn subscription_count(&self) -> usize { self.dispatcher.with(|c| c.signals.len()) }

    /// Surface currently delivering scroll events.
    #[must_use]
    pub fn scroll_source(&self) -> Option<ScrollSource> {
        self.dispatcher.with(|c| c.router.source())
    }

    /// Outcome of the most recent reconciliation.
    #[must_use]
    pub fn last_report(&self) -> Option<ReconcileReport> {
        self.dispatcher.with(|c| c.last_report)
    }

    /// Disconnects every signal and frees every dot.
    ///
    /// Returns `false` if the container was already destroyed.
    pub fn destroy(&self) -> bool { self.dispatcher.with(Controller::destroy) }

    /// Whether [`destroy`](Self::destroy) has run.
    #[must_use]
    pub fn is_destroyed(&self) -> bool { self.dispatcher.with(|c| c.destroyed) }
}

impl Drop for DotspaceContainer {
    fn drop(&mut self) { self.destroy(); }
}

impl std::fmt::Debug for DotspaceContainer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DotspaceContainer")
            .field("dispatcher", &self.dispatcher)
            .finish()
    }
}
