//! Scroll-to-switch: mapping scroll gestures to workspace indices, and routing
//! the scroll signal from either the indicator row or the whole panel.

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::events;
use crate::signals::{SignalArgs, SignalManager, SignalSource, SubscriptionHandle};

/// Direction of a scroll gesture, as reported by the host toolkit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ScrollDirection {
    Up,
    Down,
    Left,
    Right,
    /// Smooth (touchpad) scrolling with no discrete direction.
    Smooth,
}

impl ScrollDirection {
    /// Index offset this direction applies, if it moves between workspaces.
    #[must_use]
    pub const fn step(self) -> Option<i64> {
        match self {
            Self::Up => Some(-1),
            Self::Down => Some(1),
            Self::Left | Self::Right | Self::Smooth => None,
        }
    }
}

/// Computes the workspace to activate for a scroll gesture.
///
/// `Up` moves to the previous workspace and `Down` to the next one. With
/// `wrap` the index cycles around both ends; without it the index is clamped
/// to `[0, count - 1]`. Returns `None` when there is nothing to activate:
/// no workspaces, or a direction that doesn't switch workspaces.
#[must_use]
pub fn cycle_target(
    direction: ScrollDirection,
    active_index: usize,
    count: usize,
    wrap: bool,
) -> Option<usize> {
    let step = direction.step()?;
    let len = i64::try_from(count).ok().filter(|c| *c > 0)?;
    let index = i64::try_from(active_index).ok()? + step;

    let index = if wrap { index.rem_euclid(len) } else { index.clamp(0, len - 1) };

    usize::try_from(index).ok().filter(|i| *i < count)
}

/// Which surface delivers scroll events.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ScrollSource {
    /// Only scrolling over the indicator row switches workspaces.
    Indicators,
    /// Scrolling anywhere over the panel switches workspaces.
    Panel,
}

impl ScrollSource {
    /// Maps the `panel-scroll` setting to a source.
    #[must_use]
    pub const fn from_panel_scroll(panel_scroll: bool) -> Self {
        if panel_scroll { Self::Panel } else { Self::Indicators }
    }
}

/// Owns the single scroll subscription and swaps it between sources.
///
/// The callback passed to [`route`](Self::route) should check
/// [`accepts`](Self::accepts) with the source it was bound for. That way an
/// event already in flight from the previous source is ignored after a swap,
/// and exactly one source is effective at any time.
#[derive(Debug, Default)]
pub struct ScrollRouter {
    source: Option<ScrollSource>,
    handle: Option<SubscriptionHandle>,
}

impl ScrollRouter {
    /// Creates a router with no source bound.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            source: None,
            handle: None,
        }
    }

    /// Binds scroll handling to `source`, connecting to `target`.
    ///
    /// The new subscription is made before the old one is released. Returns
    /// `false` if `source` was already bound.
    pub fn route<R, F>(
        &mut self,
        source: ScrollSource,
        target: &Arc<dyn SignalSource>,
        signals: &mut SignalManager<R>,
        callback: F,
    ) -> bool
    where
        R: Send + 'static,
        F: Fn(&mut R, &SignalArgs) + Send + Sync + 'static,
    {
        if self.source == Some(source) && self.handle.is_some() {
            return false;
        }

        let handle = signals.subscribe(target, events::input::SCROLL, callback);
        let previous = self.handle.replace(handle);
        self.source = Some(source);

        if let Some(previous) = previous {
            signals.unsubscribe(&previous);
        }

        tracing::debug!(?source, "scroll routed");
        true
    }

    /// Releases the current subscription, if any.
    pub fn release<R>(&mut self, signals: &mut SignalManager<R>) -> bool {
        self.source = None;
        self.handle.take().is_some_and(|handle| signals.unsubscribe(&handle))
    }

    /// Returns whether scroll events from `source` should be handled.
    #[must_use]
    pub fn accepts(&self, source: ScrollSource) -> bool {
        self.handle.is_some() && self.source == Some(source)
    }

    /// The currently bound source.
    #[must_use]
    pub const fn source(&self) -> Option<ScrollSource> { self.source }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::signals::{ConnectionId, Dispatcher, SignalCallback, SignalEmitter};

    #[test]
    fn wrap_moves_up_from_first_to_last() {
        assert_eq!(cycle_target(ScrollDirection::Up, 0, 4, true), Some(3));
        assert_eq!(cycle_target(ScrollDirection::Down, 0, 4, true), Some(1));
    }

    #[test]
    fn wrap_moves_down_from_last_to_first() {
        assert_eq!(cycle_target(ScrollDirection::Down, 3, 4, true), Some(0));
    }

    #[test]
    fn clamp_stays_on_last_workspace() {
        assert_eq!(cycle_target(ScrollDirection::Down, 3, 4, false), Some(3));
    }

    #[test]
    fn clamp_stays_on_first_workspace() {
        assert_eq!(cycle_target(ScrollDirection::Up, 0, 4, false), Some(0));
    }

    #[test]
    fn clamp_never_targets_count() {
        // Clamping to `count` instead of `count - 1` would request a workspace
        // that doesn't exist.
        for active in 0..5 {
            let target = cycle_target(ScrollDirection::Down, active, 5, false);
            assert!(target.is_some_and(|t| t < 5));
        }
    }

    #[test]
    fn horizontal_and_smooth_scrolls_are_ignored() {
        assert_eq!(cycle_target(ScrollDirection::Left, 1, 4, true), None);
        assert_eq!(cycle_target(ScrollDirection::Right, 1, 4, false), None);
        assert_eq!(cycle_target(ScrollDirection::Smooth, 1, 4, true), None);
    }

    #[test]
    fn no_workspaces_means_no_target() {
        assert_eq!(cycle_target(ScrollDirection::Down, 0, 0, true), None);
        assert_eq!(cycle_target(ScrollDirection::Up, 0, 0, false), None);
    }

    #[test]
    fn single_workspace_always_targets_itself() {
        assert_eq!(cycle_target(ScrollDirection::Up, 0, 1, true), Some(0));
        assert_eq!(cycle_target(ScrollDirection::Down, 0, 1, false), Some(0));
    }

    #[test]
    fn source_follows_panel_scroll_setting() {
        assert_eq!(ScrollSource::from_panel_scroll(true), ScrollSource::Panel);
        assert_eq!(ScrollSource::from_panel_scroll(false), ScrollSource::Indicators);
    }

    struct Surface(SignalEmitter);

    impl SignalSource for Surface {
        fn connect(&self, event: &str, callback: SignalCallback) -> ConnectionId {
            self.0.connect(event, callback)
        }

        fn disconnect(&self, id: ConnectionId) -> bool { self.0.disconnect(id) }
    }

    #[test]
    fn route_swaps_subscription_between_sources() {
        let dispatcher = Arc::new(Dispatcher::new(()));
        let mut signals = SignalManager::new(Arc::downgrade(&dispatcher));
        let row = Arc::new(Surface(SignalEmitter::new()));
        let panel = Arc::new(Surface(SignalEmitter::new()));
        let row_source: Arc<dyn SignalSource> = row.clone();
        let panel_source: Arc<dyn SignalSource> = panel.clone();
        let mut router = ScrollRouter::new();

        assert!(router.route(ScrollSource::Indicators, &row_source, &mut signals, |_: &mut (), _| {}));
        assert!(!router.route(ScrollSource::Indicators, &row_source, &mut signals, |_: &mut (), _| {}));
        assert_eq!(row.0.handler_count(), 1);
        assert!(router.accepts(ScrollSource::Indicators));

        assert!(router.route(ScrollSource::Panel, &panel_source, &mut signals, |_: &mut (), _| {}));
        assert_eq!(row.0.handler_count(), 0);
        assert_eq!(panel.0.handler_count(), 1);
        assert_eq!(signals.len(), 1);
        assert!(router.accepts(ScrollSource::Panel));
        assert!(!router.accepts(ScrollSource::Indicators));

        assert!(router.release(&mut signals));
        assert!(signals.is_empty());
        assert_eq!(router.source(), None);
    }
}
