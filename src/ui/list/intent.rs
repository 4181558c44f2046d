//! Intents for the movie list screen.

use crate::catalog::{Genre, Movie};
use crate::ui::mvi::Intent;

#[derive(Debug, Clone)]
pub enum ListIntent {
    /// Toggle the movie's expanded card, loading details on first expand.
    MovieClicked(Movie),

    /// Select the genre, or clear the selection if it is already selected.
    GenreClicked(Genre),

    /// The list was scrolled near its end.
    LoadMore,

    /// Repeat the page request that failed.
    Retry,

    /// Reload the list near the item at `anchor`.
    Refresh { anchor: Option<usize> },
}

impl Intent for ListIntent {}
