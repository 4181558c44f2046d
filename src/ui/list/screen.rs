//! Business logic of the movie list screen.

use std::sync::Arc;

use async_trait::async_trait;

use crate::catalog::{CatalogService, Movie, MovieId};
use crate::config::Config;
use crate::paging::{LoadType, MovieListPagingSource, Pager, PagingSnapshot};
use crate::ui::mvi::{Reducer, Screen, ViewModel, ViewModelOptions};

use super::intent::ListIntent;
use super::reducer::{ListEvent, ListReducer};
use super::state::{ListModelState, ListNavigation, ListViewState};

pub const GENRES_ERROR: &str = "Failed to load genres";

pub type ListViewModel = ViewModel<ListScreen>;

pub struct ListScreen {
    catalog: Arc<dyn CatalogService>,
    pager: Pager<u32, Movie>,
}

impl ListScreen {
    pub fn new(catalog: Arc<dyn CatalogService>, pager: Pager<u32, Movie>) -> Self {
        Self { catalog, pager }
    }

    /// Wire the screen over `catalog` with the paging, alert and navigation
    /// settings from `config`. Starts loading genres and the first page.
    pub fn view_model(catalog: Arc<dyn CatalogService>, config: &Config) -> ListViewModel {
        let source = MovieListPagingSource::new(Arc::clone(&catalog), &config.paging);
        let pager = Pager::new(Arc::new(source));
        ViewModel::with_options(
            Self::new(catalog, pager),
            ListModelState::default(),
            ViewModelOptions::from_config(&config.alerts, &config.navigation),
        )
    }

    async fn load_genres(&self, vm: &ListViewModel) {
        match self.catalog.get_genres().await {
            Ok(list) => vm.reduce::<ListReducer>(ListEvent::GenresLoaded(list.genres)),
            Err(err) => {
                tracing::warn!(error = %err, "Genre load failed");
                vm.show_error(GENRES_ERROR);
            }
        }
    }

    async fn load_details(&self, vm: &ListViewModel, id: MovieId) {
        match self.catalog.get_movie_details(id).await {
            Ok(details) => vm.reduce::<ListReducer>(ListEvent::DetailsLoaded(id, details)),
            Err(err) => {
                tracing::warn!(movie_id = id, error = %err, "Movie details load failed");
                vm.reduce::<ListReducer>(ListEvent::DetailsFailed(id));
            }
        }
    }

    fn settle(&self, vm: &ListViewModel, kind: LoadType, snapshot: PagingSnapshot<Movie>) {
        vm.reduce::<ListReducer>(ListEvent::PagingSettled(kind, snapshot));
    }
}

#[async_trait]
impl Screen for ListScreen {
    type Intent = ListIntent;
    type Model = ListModelState;
    type View = ListViewState;
    type Navigation = ListNavigation;

    fn name(&self) -> &'static str {
        "list"
    }

    fn map_view_state(&self, state: &ListModelState) -> ListViewState {
        ListViewState::from_model(state)
    }

    fn on_created(&self, vm: &ListViewModel) {
        let genres_vm = vm.clone();
        vm.launch(move |_| async move {
            genres_vm.screen().load_genres(&genres_vm).await;
        });

        vm.reduce::<ListReducer>(ListEvent::PagingStarted(LoadType::Refresh));
        let paging_vm = vm.clone();
        vm.launch(move |_| async move {
            let screen = paging_vm.screen();
            let snapshot = screen.pager.refresh(None).await;
            screen.settle(&paging_vm, LoadType::Refresh, snapshot);
        });
    }

    async fn handle_intent(&self, vm: &ListViewModel, state: ListModelState, intent: ListIntent) {
        match intent {
            ListIntent::MovieClicked(movie) => {
                let id = movie.id;
                // Decide against the committed state, not the snapshot, so two
                // quick clicks cannot both start a fetch.
                let mut fetch = false;
                vm.update_state(|current| {
                    fetch = ListReducer::needs_details(&current, id);
                    ListReducer::reduce(current, ListEvent::MovieToggled(id))
                });
                if fetch {
                    self.load_details(vm, id).await;
                }
            }

            ListIntent::GenreClicked(genre) => {
                vm.reduce::<ListReducer>(ListEvent::GenreToggled(genre));
            }

            ListIntent::LoadMore => {
                if state.paging.append.is_end() || state.paging.append.is_error() {
                    return;
                }
                vm.reduce::<ListReducer>(ListEvent::PagingStarted(LoadType::Append));
                let snapshot = self.pager.load_more().await;
                self.settle(vm, LoadType::Append, snapshot);
            }

            ListIntent::Retry => {
                let kind = if state.paging.refresh.is_error() {
                    LoadType::Refresh
                } else if state.paging.append.is_error() {
                    LoadType::Append
                } else {
                    return;
                };
                vm.reduce::<ListReducer>(ListEvent::PagingStarted(kind));
                let snapshot = self.pager.retry().await;
                self.settle(vm, kind, snapshot);
            }

            ListIntent::Refresh { anchor } => {
                vm.reduce::<ListReducer>(ListEvent::PagingStarted(LoadType::Refresh));
                let snapshot = self.pager.refresh(anchor).await;
                self.settle(vm, LoadType::Refresh, snapshot);
            }
        }
    }
}
