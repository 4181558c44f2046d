//! Movie list screen.
//!
//! Top rated movies, paged and filtered by rating, with expandable detail
//! cards and genre chips that highlight matching movies.
//!
//! # Architecture
//!
//! Uses MVI (Model-View-Intent) pattern:
//! - `state.rs` - Model state, view state and the derived chips/items
//! - `intent.rs` - User actions
//! - `reducer.rs` - State transitions
//! - `screen.rs` - Intent handling and catalog/pager calls

mod intent;
mod reducer;
mod screen;
mod state;

pub use intent::ListIntent;
pub use reducer::{ListEvent, ListReducer};
pub use screen::{ListScreen, ListViewModel, GENRES_ERROR};
pub use state::{
    GenreChipViewState, ListModelState, ListNavigation, ListViewState, MovieItemViewState,
    LIST_TITLE,
};
