//! Model and view state of the movie list screen.

use std::collections::{HashMap, HashSet};

use crate::catalog::{Genre, GenreId, Movie, MovieDetails, MovieId};
use crate::paging::{LoadState, PagingSnapshot};
use crate::ui::mvi::{
    CommonModelState, CommonViewState, ModelState, Navigation, Resource, TopBarViewState,
    ViewState,
};

pub const LIST_TITLE: &str = "Movies";

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ListModelState {
    pub common: CommonModelState,
    /// Known genres by id; `None` until the genre list has loaded.
    pub genres: Option<HashMap<GenreId, Genre>>,
    pub selected_genre: Option<Genre>,
    pub expanded_movie_ids: HashSet<MovieId>,
    pub movie_details: HashMap<MovieId, Resource<MovieDetails>>,
    pub paging: PagingSnapshot<Movie>,
    /// Page requests issued but not yet settled, by kind.
    pub refreshes_in_flight: usize,
    pub appends_in_flight: usize,
}

impl ListModelState {
    /// Refresh state as rendered: `Loading` while any refresh is in flight,
    /// else the state of the last settled pager call.
    pub fn refresh_state(&self) -> LoadState {
        in_flight_or(self.refreshes_in_flight, &self.paging.refresh)
    }

    pub fn append_state(&self) -> LoadState {
        in_flight_or(self.appends_in_flight, &self.paging.append)
    }
}

fn in_flight_or(in_flight: usize, settled: &LoadState) -> LoadState {
    if in_flight > 0 {
        LoadState::Loading
    } else {
        settled.clone()
    }
}

impl ModelState for ListModelState {
    fn common_state(&self) -> Option<&CommonModelState> {
        Some(&self.common)
    }

    fn common_state_mut(&mut self) -> Option<&mut CommonModelState> {
        Some(&mut self.common)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct MovieItemViewState {
    pub movie: Movie,
    /// Carries the selected genre.
    pub highlighted: bool,
    pub expanded: bool,
    pub details: Option<Resource<MovieDetails>>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct GenreChipViewState {
    pub genre: Genre,
    /// Loaded movies carrying this genre.
    pub count: usize,
    pub selected: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ListViewState {
    pub common: CommonViewState,
    pub movies: Vec<MovieItemViewState>,
    pub genre_chips: Vec<GenreChipViewState>,
    pub genres_loaded: bool,
    pub selected_genre: Option<Genre>,
    pub refresh: LoadState,
    pub append: LoadState,
    pub loaded_pages: usize,
}

impl ViewState for ListViewState {}

impl ListViewState {
    pub fn from_model(state: &ListModelState) -> Self {
        let selected_id = state.selected_genre.as_ref().map(|genre| genre.id);

        let movies = state
            .paging
            .items
            .iter()
            .map(|movie| MovieItemViewState {
                highlighted: selected_id.is_some_and(|id| movie.genre_ids.contains(&id)),
                expanded: state.expanded_movie_ids.contains(&movie.id),
                details: state.movie_details.get(&movie.id).cloned(),
                movie: movie.clone(),
            })
            .collect();

        Self {
            common: state.common.to_view_state(Some(TopBarViewState {
                title: LIST_TITLE.to_string(),
                back_enabled: false,
            })),
            movies,
            genre_chips: genre_chips(state, selected_id),
            genres_loaded: state.genres.is_some(),
            selected_genre: state.selected_genre.clone(),
            refresh: state.refresh_state(),
            append: state.append_state(),
            loaded_pages: state.paging.loaded_pages,
        }
    }

    /// Shown while the first page is in flight and nothing is loaded yet.
    pub fn is_waiting_for_first_page(&self) -> bool {
        self.refresh.is_loading() && self.movies.is_empty()
    }
}

/// One chip per known genre found on loaded movies, in order of first
/// appearance.
fn genre_chips(state: &ListModelState, selected_id: Option<GenreId>) -> Vec<GenreChipViewState> {
    let Some(genres) = &state.genres else {
        return Vec::new();
    };

    let mut chips: Vec<GenreChipViewState> = Vec::new();
    let mut index_by_id: HashMap<GenreId, usize> = HashMap::new();
    for genre_id in state.paging.items.iter().flat_map(|movie| &movie.genre_ids) {
        let Some(genre) = genres.get(genre_id) else {
            continue;
        };
        match index_by_id.get(genre_id) {
            Some(&index) => chips[index].count += 1,
            None => {
                index_by_id.insert(*genre_id, chips.len());
                chips.push(GenreChipViewState {
                    genre: genre.clone(),
                    count: 1,
                    selected: selected_id == Some(*genre_id),
                });
            }
        }
    }
    chips
}

/// The list screen has no outgoing routes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ListNavigation {}

impl Navigation for ListNavigation {}
