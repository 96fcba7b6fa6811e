//! Applies computed indicator states to the live row with minimal churn.
//!
//! # Plans
//!
//! Given `previous` rendered dots and `next` computed states:
//!
//! | Transition          | Plan                   | Effect                                  |
//! |---------------------|------------------------|-----------------------------------------|
//! | `previous > next`   | [`ReconcilePlan::Rebuild`] | destroy every dot, create `next` fresh |
//! | `previous == next`  | [`ReconcilePlan::Patch`]   | mutate only attributes that differ     |
//! | `previous < next`   | [`ReconcilePlan::Grow`]    | append the missing dots, patch the rest |
//!
//! Shrinking always rebuilds so trailing dots are removed unambiguously.

use std::fmt;
use std::sync::Arc;

use serde::Serialize;

use crate::host::{IndicatorRow, IndicatorWidget};
use crate::indicator::{IndicatorAction, IndicatorState};

/// Phase of the reconciler.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub enum ReconcilePhase {
    #[default]
    Idle,
    Rebuilding,
}

/// How a reconciliation pass mutates the row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum ReconcilePlan {
    /// Destroy every rendered dot and recreate the row.
    Rebuild,
    /// Patch the rendered dots in place.
    Patch,
    /// Append `append` dots, then patch the existing ones.
    Grow { append: usize },
}

impl ReconcilePlan {
    /// Picks the plan for going from `previous` rendered dots to `next`.
    #[must_use]
    pub const fn decide(previous: usize, next: usize) -> Self {
        if previous > next {
            Self::Rebuild
        } else if previous == next {
            Self::Patch
        } else {
            Self::Grow {
                append: next - previous,
            }
        }
    }
}

/// What one reconciliation pass did.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReconcileReport {
    /// Dots created.
    pub created: usize,
    /// Dots destroyed.
    pub destroyed: usize,
    /// Existing dots with at least one attribute changed.
    pub patched: usize,
    /// Whether the row is visible after the pass.
    pub visible: bool,
}

struct RenderedIndicator {
    widget: Box<dyn IndicatorWidget>,
    state: IndicatorState,
}

impl RenderedIndicator {
    /// Pushes only the attributes that differ. Returns whether anything changed.
    fn patch(&mut self, next: IndicatorState) -> bool {
        let mut changed = false;

        if self.state.style_classes != next.style_classes {
            self.widget.set_style_classes(&next.style_classes);
            changed = true;
        }
        if self.state.icon != next.icon {
            self.widget.set_icon(next.icon);
            changed = true;
        }
        // The click action lives here, not on the widget: the row reports the
        // clicked index and the container looks the action up.
        if self.state.on_activate != next.on_activate {
            changed = true;
        }

        self.state = next;
        changed
    }
}

/// Owns the rendered dots and keeps them in step with computed state.
pub struct Reconciler {
    row: Arc<dyn IndicatorRow>,
    rendered: Vec<RenderedIndicator>,
    phase: ReconcilePhase,
    visible: Option<bool>,
}

impl Reconciler {
    /// Creates a reconciler for an empty `row`.
    #[must_use]
    pub fn new(row: Arc<dyn IndicatorRow>) -> Self {
        Self {
            row,
            rendered: Vec::new(),
            phase: ReconcilePhase::Idle,
            visible: None,
        }
    }

    /// Brings the row to `states` and sets its visibility.
    pub fn reconcile(&mut self, states: Vec<IndicatorState>, visible: bool) -> ReconcileReport {
        debug_assert_eq!(self.phase, ReconcilePhase::Idle);
        self.phase = ReconcilePhase::Rebuilding;

        let plan = ReconcilePlan::decide(self.rendered.len(), states.len());
        let mut report = ReconcileReport::default();

        match plan {
            ReconcilePlan::Rebuild => {
                tracing::debug!(from = self.rendered.len(), to = states.len(), "rebuilding dots");
                report.destroyed = self.destroy_all();
                report.created = self.append(states);
            }
            ReconcilePlan::Patch => {
                tracing::trace!(count = states.len(), "patching dots");
                report.patched = self.patch(states);
            }
            ReconcilePlan::Grow { append } => {
                tracing::debug!(append, "growing dots");
                let mut states = states;
                let appended = states.split_off(self.rendered.len());
                report.created = self.append(appended);
                report.patched = self.patch(states);
            }
        }

        if self.visible != Some(visible) {
            self.row.set_visible(visible);
            self.visible = Some(visible);
        }
        report.visible = visible;

        self.phase = ReconcilePhase::Idle;
        report
    }

    /// Destroys every rendered dot. Returns how many were destroyed.
    pub fn clear(&mut self) -> usize { self.destroy_all() }

    /// Click action of the dot at `index`.
    #[must_use]
    pub fn action_at(&self, index: usize) -> Option<IndicatorAction> {
        self.rendered.get(index).map(|r| r.state.on_activate)
    }

    /// Currently rendered states, in row order.
    pub fn states(&self) -> impl Iterator<Item = &IndicatorState> {
        self.rendered.iter().map(|r| &r.state)
    }

    /// Number of rendered dots.
    #[must_use]
    pub fn len(&self) -> usize { self.rendered.len() }

    /// Returns whether no dot is rendered.
    #[must_use]
    pub fn is_empty(&self) -> bool { self.rendered.is_empty() }

    /// Current phase.
    #[must_use]
    pub const fn phase(&self) -> ReconcilePhase { self.phase }

    fn destroy_all(&mut self) -> usize {
        let count = self.rendered.len();
        for rendered in self.rendered.drain(..) {
            rendered.widget.destroy();
        }
        count
    }

    fn append(&mut self, states: Vec<IndicatorState>) -> usize {
        let count = states.len();
        self.rendered.extend(states.into_iter().map(|state| RenderedIndicator {
            widget: self.row.append(&state),
            state,
        }));
        count
    }

    fn patch(&mut self, states: Vec<IndicatorState>) -> usize {
        self.rendered
            .iter_mut()
            .zip(states)
            .map(|(rendered, next)| rendered.patch(next))
            .filter(|changed| *changed)
            .count()
    }
}

impl fmt::Debug for Reconciler {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Reconciler")
            .field("rendered", &self.rendered.len())
            .field("phase", &self.phase)
            .field("visible", &self.visible)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::indicator::{IconSizePolicy, compute_indicators};
    use crate::settings::Settings;
    use crate::snapshot::WorkspaceSnapshot;
    use crate::testing::FakeIndicatorRow;

    fn states(count: usize, active_index: usize) -> Vec<IndicatorState> {
        let snapshot = WorkspaceSnapshot {
            count,
            active_index,
            window_count_by_index: vec![0; count],
            pinned_window_count: 0,
        };
        compute_indicators(&snapshot, &Settings::default(), &IconSizePolicy::default())
    }

    fn reconciler() -> (Arc<FakeIndicatorRow>, Reconciler) {
        let row = FakeIndicatorRow::new();
        let reconciler = Reconciler::new(row.clone());
        (row, reconciler)
    }

    #[test]
    fn plan_decision() {
        assert_eq!(ReconcilePlan::decide(5, 3), ReconcilePlan::Rebuild);
        assert_eq!(ReconcilePlan::decide(5, 5), ReconcilePlan::Patch);
        assert_eq!(ReconcilePlan::decide(3, 5), ReconcilePlan::Grow { append: 2 });
        assert_eq!(ReconcilePlan::decide(0, 0), ReconcilePlan::Patch);
    }

    #[test]
    fn shrinking_rebuilds_everything() {
        let (row, mut reconciler) = reconciler();
        reconciler.reconcile(states(5, 0), true);

        let report = reconciler.reconcile(states(3, 0), true);

        assert_eq!(report.destroyed, 5);
        assert_eq!(report.created, 3);
        assert_eq!(report.patched, 0);
        assert_eq!(row.live_widgets(), 3);
        assert_eq!(reconciler.len(), 3);
    }

    #[test]
    fn switching_active_patches_two_dots() {
        let (row, mut reconciler) = reconciler();
        reconciler.reconcile(states(5, 0), true);
        let created_before = row.created();

        let report = reconciler.reconcile(states(5, 3), true);

        assert_eq!(report.created, 0);
        assert_eq!(report.destroyed, 0);
        assert_eq!(report.patched, 2);
        assert_eq!(row.created(), created_before);
        assert_eq!(reconciler.action_at(0), Some(IndicatorAction::ActivateWorkspace(0)));
        assert_eq!(reconciler.action_at(3), Some(IndicatorAction::ToggleOverview));
    }

    #[test]
    fn unchanged_state_patches_nothing() {
        let (_, mut reconciler) = reconciler();
        reconciler.reconcile(states(4, 1), true);
        let report = reconciler.reconcile(states(4, 1), true);
        assert_eq!(report, ReconcileReport { visible: true, ..ReconcileReport::default() });
    }

    #[test]
    fn growing_appends_and_patches() {
        let (row, mut reconciler) = reconciler();
        reconciler.reconcile(states(2, 0), true);

        let report = reconciler.reconcile(states(4, 1), true);

        assert_eq!(report.created, 2);
        assert_eq!(report.destroyed, 0);
        assert_eq!(report.patched, 2);
        assert_eq!(row.live_widgets(), 4);
        let indices: Vec<_> = reconciler.states().map(|s| s.index).collect();
        assert_eq!(indices, vec![0, 1, 2, 3]);
    }

    #[test]
    fn visibility_is_only_pushed_on_change() {
        let (row, mut reconciler) = reconciler();
        reconciler.reconcile(states(1, 0), false);
        reconciler.reconcile(states(1, 0), false);
        assert_eq!(row.visibility_changes(), 1);
        assert!(!row.is_visible());

        let report = reconciler.reconcile(states(2, 0), true);
        assert!(report.visible);
        assert_eq!(row.visibility_changes(), 2);
    }

    #[test]
    fn clear_destroys_every_dot() {
        let (row, mut reconciler) = reconciler();
        reconciler.reconcile(states(3, 0), true);
        assert_eq!(reconciler.clear(), 3);
        assert!(reconciler.is_empty());
        assert_eq!(row.live_widgets(), 0);
        assert_eq!(reconciler.phase(), ReconcilePhase::Idle);
    }
}
