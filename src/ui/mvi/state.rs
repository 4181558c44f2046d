//! Model and view state traits.

use std::fmt::Debug;

use super::alert::CommonModelState;

/// Authoritative, screen-private state.
///
/// Model states are immutable snapshots: every transition builds a new
/// value that replaces the previous one wholesale.
pub trait ModelState: Clone + Debug + Send + Sync + 'static {
    /// Shared alert state, for screens that carry one.
    ///
    /// The default opts the screen out of alerts, which turns
    /// `show_success`/`show_error` into no-ops.
    fn common_state(&self) -> Option<&CommonModelState> {
        None
    }

    /// Mutable access to the shared alert state of a fresh snapshot.
    ///
    /// Must return `Some` exactly when [`ModelState::common_state`] does.
    fn common_state_mut(&mut self) -> Option<&mut CommonModelState> {
        None
    }
}

/// Render-facing projection of a model state.
///
/// States should be:
/// - Derived only (recomputed from the model state on every commit)
/// - Self-contained (all data needed to render the view)
/// - Comparable (PartialEq for suppressing identical frames)
pub trait ViewState: Clone + PartialEq + Debug + Send + Sync + 'static {}
