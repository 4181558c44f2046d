//! Single-writer model state container with a derived view state.
//!
//! The holder is the serialization point for every transition: each
//! [`StateHolder::update_state`] call is a complete read-transform-write
//! against the committed value, and the derived view state is republished
//! before the call returns.

use parking_lot::Mutex;
use tokio::sync::watch;

use super::state::{ModelState, ViewState};

type ViewMapper<M, V> = Box<dyn Fn(&M) -> V + Send + Sync>;

pub struct StateHolder<M, V> {
    model: Mutex<M>,
    view: watch::Sender<V>,
    map_view_state: ViewMapper<M, V>,
}

impl<M: ModelState, V: ViewState> StateHolder<M, V> {
    pub fn new(initial: M, map_view_state: impl Fn(&M) -> V + Send + Sync + 'static) -> Self {
        let view = map_view_state(&initial);
        let (sender, _) = watch::channel(view);
        Self {
            model: Mutex::new(initial),
            view: sender,
            map_view_state: Box::new(map_view_state),
        }
    }

    /// Latest committed model state.
    pub fn current_model_state(&self) -> M {
        self.model.lock().clone()
    }

    /// View state derived from the latest commit.
    pub fn current_view_state(&self) -> V {
        self.view.borrow().clone()
    }

    /// Apply `update` to the committed state and commit its result.
    ///
    /// Concurrent callers are not merged: each call sees whatever value is
    /// committed when it runs, so `update` must derive the next state from
    /// its argument only. `update` runs under the holder lock and must not
    /// call back into the holder.
    pub fn update_state(&self, update: impl FnOnce(M) -> M) {
        let mut model = self.model.lock();
        let next = update(model.clone());
        tracing::debug!(model_state = ?next, "ModelState");

        let view = (self.map_view_state)(&next);
        *model = next;

        self.view.send_if_modified(|current| {
            if *current == view {
                return false;
            }
            tracing::debug!(view_state = ?view, "ViewState");
            *current = view;
            true
        });
    }

    /// Observe view states: the latest value first, then every distinct
    /// recomputation.
    pub fn view_states(&self) -> watch::Receiver<V> {
        self.view.subscribe()
    }
}
