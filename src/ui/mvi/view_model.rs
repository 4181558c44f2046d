//! Generic view model runtime.
//!
//! ```text
//! on_intent ──→ launch (lifetime group) ──→ Screen::handle_intent
//!                                              │
//!                 update_state / reduce ←──────┤
//!                 navigate / show_* ←──────────┘
//!                        │
//!                        ↓
//!                 StateHolder ──→ map_view_state ──→ view_states()
//! ```

use std::future::Future;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use tokio::sync::watch;

use crate::config::{AlertConfig, NavigationConfig};

use super::alert::{AlertKind, AlertLifecycle, ALERT_DISPLAY_TIME};
use super::holder::StateHolder;
use super::intent::Intent;
use super::navigation::{Navigation, NavigationBus, NavigationStream, NAVIGATION_REPLAY};
use super::reducer::Reducer;
use super::scope::{TaskGroup, TaskHandle};
use super::state::{ModelState, ViewState};

/// Per-screen business logic driven by a [`ViewModel`].
#[async_trait]
pub trait Screen: Sized + Send + Sync + 'static {
    type Intent: Intent;
    type Model: ModelState;
    type View: ViewState;
    type Navigation: Navigation;

    /// Name used in lifecycle logs.
    fn name(&self) -> &'static str;

    /// Derive the view state. Must be pure and cheap; it runs on every
    /// commit, under the state lock.
    fn map_view_state(&self, state: &Self::Model) -> Self::View;

    /// Handle one intent. `state` is the model state captured when the
    /// intent was scheduled; re-read through `vm` after any await.
    ///
    /// Failures the screen can foresee (network errors) must be turned into
    /// state here. A panic aborts only this handler's task.
    async fn handle_intent(&self, vm: &ViewModel<Self>, state: Self::Model, intent: Self::Intent);

    /// Called once, right after the view model is built.
    fn on_created(&self, _vm: &ViewModel<Self>) {}

    /// Called on every `on_start`, after the started group is entered.
    fn on_start(&self, _vm: &ViewModel<Self>) {}
}

/// Tunables for the runtime.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ViewModelOptions {
    pub alert_display_time: Duration,
    pub navigation_replay: usize,
}

impl ViewModelOptions {
    pub fn from_config(alerts: &AlertConfig, navigation: &NavigationConfig) -> Self {
        Self {
            alert_display_time: Duration::from_millis(alerts.display_ms),
            navigation_replay: navigation.replay_capacity,
        }
    }
}

impl Default for ViewModelOptions {
    fn default() -> Self {
        Self {
            alert_display_time: ALERT_DISPLAY_TIME,
            navigation_replay: NAVIGATION_REPLAY,
        }
    }
}

pub struct ViewModel<S: Screen> {
    inner: Arc<Inner<S>>,
}

struct Inner<S: Screen> {
    screen: Arc<S>,
    holder: Arc<StateHolder<S::Model, S::View>>,
    navigation: NavigationBus<S::Navigation>,
    alerts: AlertLifecycle,
    lifetime: TaskGroup,
    started: TaskGroup,
    cleared: AtomicBool,
}

impl<S: Screen> Clone for ViewModel<S> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<S: Screen> ViewModel<S> {
    /// Build a view model with default options. Must be called from within
    /// a Tokio runtime.
    pub fn new(screen: S, initial: S::Model) -> Self {
        Self::with_options(screen, initial, ViewModelOptions::default())
    }

    pub fn with_options(screen: S, initial: S::Model, options: ViewModelOptions) -> Self {
        let screen = Arc::new(screen);
        let mapper = Arc::clone(&screen);
        let holder = StateHolder::new(initial, move |state: &S::Model| mapper.map_view_state(state));

        let vm = Self {
            inner: Arc::new(Inner {
                screen,
                holder: Arc::new(holder),
                navigation: NavigationBus::new(options.navigation_replay),
                alerts: AlertLifecycle::new(options.alert_display_time),
                lifetime: TaskGroup::new("lifetime"),
                started: TaskGroup::inactive("started"),
                cleared: AtomicBool::new(false),
            }),
        };
        vm.inner.screen.on_created(&vm);
        vm
    }

    pub fn screen(&self) -> &S {
        &self.inner.screen
    }

    /// Latest committed model state.
    pub fn model_state(&self) -> S::Model {
        self.inner.holder.current_model_state()
    }

    /// Latest derived view state.
    pub fn view_state(&self) -> S::View {
        self.inner.holder.current_view_state()
    }

    pub fn view_states(&self) -> watch::Receiver<S::View> {
        self.inner.holder.view_states()
    }

    pub fn navigation(&self) -> NavigationStream<S::Navigation> {
        self.inner.navigation.observe()
    }

    pub fn update_state(&self, update: impl FnOnce(S::Model) -> S::Model) {
        self.inner.holder.update_state(update);
    }

    /// Fold `event` into the committed state with reducer `R`.
    pub fn reduce<R>(&self, event: R::Event)
    where
        R: Reducer<State = S::Model>,
    {
        tracing::trace!(screen = self.inner.screen.name(), ?event, "Reduce");
        self.inner.holder.update_state(|state| R::reduce(state, event));
    }

    pub fn navigate(&self, navigation: S::Navigation) {
        self.inner.navigation.emit(navigation);
    }

    pub fn show_success(&self, text: impl Into<String>) -> Option<TaskHandle> {
        self.show_alert(AlertKind::Success, text.into())
    }

    pub fn show_error(&self, text: impl Into<String>) -> Option<TaskHandle> {
        self.show_alert(AlertKind::Error, text.into())
    }

    fn show_alert(&self, kind: AlertKind, text: String) -> Option<TaskHandle> {
        self.inner
            .alerts
            .show(kind, text, &self.inner.holder, &self.inner.lifetime)
    }

    /// Schedule `intent` for handling in the lifetime group.
    pub fn on_intent(&self, intent: S::Intent) -> Option<TaskHandle> {
        tracing::debug!(screen = self.inner.screen.name(), ?intent, "onIntent");
        let vm = self.clone();
        self.launch(move |state| async move {
            let screen = Arc::clone(&vm.inner.screen);
            screen.handle_intent(&vm, state, intent).await;
        })
    }

    /// Run `task` in the lifetime group with the state committed now.
    pub fn launch<F, Fut>(&self, task: F) -> Option<TaskHandle>
    where
        F: FnOnce(S::Model) -> Fut,
        Fut: Future<Output = ()> + Send + 'static,
    {
        let state = self.inner.holder.current_model_state();
        self.inner.lifetime.spawn(task(state))
    }

    /// Run `task` in the started group. Returns `None` while the screen is
    /// stopped.
    pub fn launch_on_started<F, Fut>(&self, task: F) -> Option<TaskHandle>
    where
        F: FnOnce(S::Model) -> Fut,
        Fut: Future<Output = ()> + Send + 'static,
    {
        let state = self.inner.holder.current_model_state();
        self.inner.started.spawn(task(state))
    }

    pub fn on_start(&self) {
        if self.is_cleared() {
            return;
        }
        self.inner.started.enter();
        tracing::info!(screen = self.inner.screen.name(), "onStart");
        self.inner.screen.on_start(self);
    }

    pub fn on_stop(&self) {
        let cancelled = self.inner.started.drain();
        tracing::info!(screen = self.inner.screen.name(), cancelled, "onStop");
    }

    /// Permanently tear the screen down: both groups are drained and stay
    /// closed.
    pub fn clear(&self) {
        if self.inner.cleared.swap(true, Ordering::SeqCst) {
            return;
        }
        let started = self.inner.started.drain();
        let lifetime = self.inner.lifetime.drain();
        tracing::info!(
            screen = self.inner.screen.name(),
            started,
            lifetime,
            "onCleared"
        );
    }

    pub fn is_cleared(&self) -> bool {
        self.inner.cleared.load(Ordering::SeqCst)
    }

    pub fn lifetime_scope(&self) -> &TaskGroup {
        &self.inner.lifetime
    }

    pub fn started_scope(&self) -> &TaskGroup {
        &self.inner.started
    }
}
