//! Transient success/error alerts attached to the common model state.
//!
//! Each alert kind has at most one pending auto-clear timer. Showing a new
//! alert cancels the previous timer of the same kind; a timer only clears
//! the alert if it is still the registered timer when it fires.

use std::sync::Arc;
use std::time::Duration;

use parking_lot::Mutex;

use super::holder::StateHolder;
use super::scope::{TaskGroup, TaskHandle};
use super::state::{ModelState, ViewState};

/// How long an alert stays visible unless superseded.
pub const ALERT_DISPLAY_TIME: Duration = Duration::from_millis(4_000);

/// Alert fields shared by every screen that opts into alerts.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CommonModelState {
    pub error_alert: Option<String>,
    pub success_alert: Option<String>,
}

impl CommonModelState {
    pub fn to_view_state(&self, top_bar: Option<TopBarViewState>) -> CommonViewState {
        CommonViewState {
            top_bar,
            error_alert: self.error_alert.clone(),
            success_alert: self.success_alert.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct TopBarViewState {
    pub title: String,
    pub back_enabled: bool,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct CommonViewState {
    pub top_bar: Option<TopBarViewState>,
    pub error_alert: Option<String>,
    pub success_alert: Option<String>,
}

impl CommonViewState {
    /// The alert to show at the bottom of the screen. Errors win.
    pub fn visible_alert(&self) -> Option<&str> {
        self.error_alert
            .as_deref()
            .or(self.success_alert.as_deref())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AlertKind {
    Success,
    Error,
}

impl AlertKind {
    fn field(self, common: &mut CommonModelState) -> &mut Option<String> {
        match self {
            AlertKind::Success => &mut common.success_alert,
            AlertKind::Error => &mut common.error_alert,
        }
    }
}

#[derive(Default)]
struct PendingTimers {
    success: Option<TaskHandle>,
    error: Option<TaskHandle>,
}

impl PendingTimers {
    fn slot(&mut self, kind: AlertKind) -> &mut Option<TaskHandle> {
        match kind {
            AlertKind::Success => &mut self.success,
            AlertKind::Error => &mut self.error,
        }
    }
}

pub struct AlertLifecycle {
    display_time: Duration,
    pending: Arc<Mutex<PendingTimers>>,
}

impl AlertLifecycle {
    pub fn new(display_time: Duration) -> Self {
        Self {
            display_time,
            pending: Arc::new(Mutex::new(PendingTimers::default())),
        }
    }

    pub fn display_time(&self) -> Duration {
        self.display_time
    }

    /// Write `text` into the alert field for `kind` and schedule its
    /// auto-clear timer in `group`.
    ///
    /// No-op when the model state carries no common state. Returns the
    /// timer handle when one was scheduled.
    pub fn show<M, V>(
        &self,
        kind: AlertKind,
        text: String,
        holder: &Arc<StateHolder<M, V>>,
        group: &TaskGroup,
    ) -> Option<TaskHandle>
    where
        M: ModelState,
        V: ViewState,
    {
        if holder.current_model_state().common_state().is_none() {
            tracing::debug!(?kind, "Model state has no common state, alert ignored");
            return None;
        }

        // Held until the new timer is registered, so a timer firing early
        // cannot observe the slot before it names its successor.
        let mut pending = self.pending.lock();
        if let Some(previous) = pending.slot(kind).take() {
            previous.cancel();
        }

        holder.update_state(|mut state| {
            if let Some(common) = state.common_state_mut() {
                *kind.field(common) = Some(text);
            }
            state
        });

        let holder = Arc::clone(holder);
        let timers = Arc::clone(&self.pending);
        let display_time = self.display_time;
        let handle = group.spawn_with_id(move |id| async move {
            tokio::time::sleep(display_time).await;

            let mut timers = timers.lock();
            let slot = timers.slot(kind);
            if slot.as_ref().map(TaskHandle::id) != Some(id) {
                tracing::debug!(?kind, task = %id, "Alert timer superseded");
                return;
            }
            slot.take();

            holder.update_state(|mut state| {
                if let Some(common) = state.common_state_mut() {
                    *kind.field(common) = None;
                }
                state
            });
        });

        *pending.slot(kind) = handle.clone();
        handle
    }
}
