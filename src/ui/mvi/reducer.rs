//! Reducer trait for the synchronous part of screen logic.

use std::fmt::Debug;

use super::state::ModelState;

/// Pure transition function over a model state.
///
/// Handlers apply reducers through [`super::ViewModel::reduce`], which runs
/// them against the value committed at call time rather than against a
/// snapshot taken before an await.
pub trait Reducer {
    /// The model state this reducer transforms.
    type State: ModelState;

    /// Facts the reducer folds into the state (results, toggles, loads).
    type Event: Debug + Send + 'static;

    /// Produce the next state. Must not perform side effects.
    fn reduce(state: Self::State, event: Self::Event) -> Self::State;
}
