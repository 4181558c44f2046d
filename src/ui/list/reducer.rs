//! Reducer for the movie list screen.

use crate::catalog::{Genre, Movie, MovieDetails, MovieId};
use crate::paging::{LoadType, PagingSnapshot};
use crate::ui::mvi::{Reducer, Resource};

use super::state::ListModelState;

/// Facts folded into the list model state.
#[derive(Debug, Clone)]
pub enum ListEvent {
    GenresLoaded(Vec<Genre>),

    /// Expand or collapse a movie. Expanding a movie whose details are
    /// absent or failed marks them `Loading`.
    MovieToggled(MovieId),

    DetailsLoaded(MovieId, MovieDetails),

    DetailsFailed(MovieId),

    GenreToggled(Genre),

    /// A page request of this kind was issued.
    PagingStarted(LoadType),

    /// A pager call of this kind settled. Snapshots older than the
    /// committed one are dropped, but the request still counts as settled.
    PagingSettled(LoadType, PagingSnapshot<Movie>),
}

pub struct ListReducer;

impl ListReducer {
    /// Whether toggling `id` in `state` expands it and needs a detail fetch.
    pub fn needs_details(state: &ListModelState, id: MovieId) -> bool {
        !state.expanded_movie_ids.contains(&id)
            && state
                .movie_details
                .get(&id)
                .map_or(true, Resource::is_error)
    }
}

impl Reducer for ListReducer {
    type State = ListModelState;
    type Event = ListEvent;

    fn reduce(mut state: Self::State, event: Self::Event) -> Self::State {
        match event {
            ListEvent::GenresLoaded(genres) => {
                state.genres = Some(genres.into_iter().map(|g| (g.id, g)).collect());
            }

            ListEvent::MovieToggled(id) => {
                if Self::needs_details(&state, id) {
                    state.movie_details.insert(id, Resource::Loading);
                }
                if !state.expanded_movie_ids.remove(&id) {
                    state.expanded_movie_ids.insert(id);
                }
            }

            ListEvent::DetailsLoaded(id, details) => {
                state.movie_details.insert(id, Resource::Loaded(details));
            }

            ListEvent::DetailsFailed(id) => {
                state.movie_details.insert(id, Resource::Error);
            }

            ListEvent::GenreToggled(genre) => {
                state.selected_genre = match state.selected_genre {
                    Some(selected) if selected == genre => None,
                    _ => Some(genre),
                };
            }

            ListEvent::PagingStarted(LoadType::Refresh) => {
                state.refreshes_in_flight += 1;
            }

            ListEvent::PagingStarted(LoadType::Append) => {
                state.appends_in_flight += 1;
            }

            ListEvent::PagingSettled(kind, snapshot) => {
                match kind {
                    LoadType::Refresh => {
                        state.refreshes_in_flight = state.refreshes_in_flight.saturating_sub(1)
                    }
                    LoadType::Append => {
                        state.appends_in_flight = state.appends_in_flight.saturating_sub(1)
                    }
                }

                if snapshot.generation >= state.paging.generation {
                    state.paging = snapshot;
                } else {
                    tracing::debug!(
                        stale = snapshot.generation,
                        current = state.paging.generation,
                        "Dropping stale page snapshot"
                    );
                }
            }
        }
        state
    }
}
