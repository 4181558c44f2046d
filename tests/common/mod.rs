//! Shared test utilities and fake catalog.

#![allow(dead_code, unused_imports)]

pub mod mock_catalog;

use async_trait::async_trait;
use movie_shelf::catalog::{
    CatalogError, CatalogService, Genre, GenreId, GenreList, Movie, MovieDetails, MovieId,
    MoviePage, ProductionCompany,
};
use movie_shelf::ui::mvi::{Screen, ViewModel};
use parking_lot::Mutex;
use std::collections::{HashMap, VecDeque};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::oneshot;

pub const WAIT: Duration = Duration::from_secs(5);

/// A scripted answer for a details request: pending until the test sends
/// the outcome (`Err` carries an HTTP status).
pub type DetailsGate = oneshot::Sender<Result<MovieDetails, u16>>;

/// In-memory catalog with call counters.
///
/// Pages and genres answer immediately from the script. Details answer from
/// a gate when one is queued for the id, else from `details`, else 404.
#[derive(Default)]
pub struct FakeCatalog {
    pages: Mutex<HashMap<u32, Result<Vec<Movie>, u16>>>,
    genres: Mutex<Option<Result<Vec<Genre>, u16>>>,
    details: Mutex<HashMap<MovieId, MovieDetails>>,
    gates: Mutex<HashMap<MovieId, VecDeque<oneshot::Receiver<Result<MovieDetails, u16>>>>>,
    page_calls: Mutex<Vec<u32>>,
    genre_calls: AtomicUsize,
    detail_calls: Mutex<Vec<MovieId>>,
}

impl FakeCatalog {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn with_page(self: &Arc<Self>, page: u32, movies: Vec<Movie>) -> Arc<Self> {
        self.pages.lock().insert(page, Ok(movies));
        Arc::clone(self)
    }

    pub fn fail_page(self: &Arc<Self>, page: u32, status: u16) -> Arc<Self> {
        self.pages.lock().insert(page, Err(status));
        Arc::clone(self)
    }

    pub fn with_genres(self: &Arc<Self>, genres: Vec<Genre>) -> Arc<Self> {
        *self.genres.lock() = Some(Ok(genres));
        Arc::clone(self)
    }

    pub fn fail_genres(self: &Arc<Self>, status: u16) -> Arc<Self> {
        *self.genres.lock() = Some(Err(status));
        Arc::clone(self)
    }

    pub fn with_details(self: &Arc<Self>, id: MovieId, details: MovieDetails) -> Arc<Self> {
        self.details.lock().insert(id, details);
        Arc::clone(self)
    }

    /// Queue a gate for the next details request of `id`.
    pub fn gate_details(&self, id: MovieId) -> DetailsGate {
        let (tx, rx) = oneshot::channel();
        self.gates.lock().entry(id).or_default().push_back(rx);
        tx
    }

    pub fn page_calls(&self) -> Vec<u32> {
        self.page_calls.lock().clone()
    }

    pub fn genre_calls(&self) -> usize {
        self.genre_calls.load(Ordering::SeqCst)
    }

    pub fn detail_calls(&self, id: MovieId) -> usize {
        self.detail_calls.lock().iter().filter(|c| **c == id).count()
    }
}

fn status_error(endpoint: &str, status: u16) -> CatalogError {
    CatalogError::Status {
        endpoint: endpoint.to_string(),
        status,
        message: "scripted failure".to_string(),
    }
}

#[async_trait]
impl CatalogService for FakeCatalog {
    async fn get_top_movies(&self, page: u32) -> Result<MoviePage, CatalogError> {
        self.page_calls.lock().push(page);
        let scripted = self.pages.lock().get(&page).cloned();
        match scripted {
            Some(Ok(results)) => Ok(MoviePage {
                page,
                results,
                total_pages: None,
            }),
            Some(Err(status)) => Err(status_error("/movie/top_rated", status)),
            None => Ok(MoviePage {
                page,
                results: Vec::new(),
                total_pages: None,
            }),
        }
    }

    async fn get_genres(&self) -> Result<GenreList, CatalogError> {
        self.genre_calls.fetch_add(1, Ordering::SeqCst);
        let scripted = self.genres.lock().clone();
        match scripted {
            Some(Ok(genres)) => Ok(GenreList { genres }),
            Some(Err(status)) => Err(status_error("/genre/movie/list", status)),
            None => Ok(GenreList { genres: Vec::new() }),
        }
    }

    async fn get_movie_details(&self, id: MovieId) -> Result<MovieDetails, CatalogError> {
        self.detail_calls.lock().push(id);
        let gate = self.gates.lock().get_mut(&id).and_then(VecDeque::pop_front);
        let endpoint = format!("/movie/{}", id);
        if let Some(gate) = gate {
            return match gate.await {
                Ok(Ok(details)) => Ok(details),
                Ok(Err(status)) => Err(status_error(&endpoint, status)),
                Err(_) => Err(status_error(&endpoint, 499)),
            };
        }
        self.details
            .lock()
            .get(&id)
            .cloned()
            .ok_or_else(|| status_error(&endpoint, 404))
    }
}

pub fn movie(id: MovieId, rating: f64, genre_ids: &[GenreId]) -> Movie {
    Movie {
        id,
        title: format!("Title {}", id),
        overview: format!("Overview {}", id),
        poster: None,
        backdrop: None,
        rating,
        genre_ids: genre_ids.to_vec(),
    }
}

/// `count` movies rated 8.0 with ids starting at `first_id`.
pub fn good_movies(first_id: MovieId, count: u64) -> Vec<Movie> {
    (first_id..first_id + count)
        .map(|id| movie(id, 8.0, &[1]))
        .collect()
}

pub fn genre(id: GenreId) -> Genre {
    Genre {
        id,
        name: format!("Genre {}", id),
    }
}

pub fn details(company: &str) -> MovieDetails {
    MovieDetails {
        production_company: Some(ProductionCompany {
            name: company.to_string(),
            logo: None,
        }),
        ..MovieDetails::default()
    }
}

/// Wait until the latest view state satisfies `done`.
pub async fn wait_for_view<S: Screen>(vm: &ViewModel<S>, done: impl FnMut(&S::View) -> bool) {
    let mut views = vm.view_states();
    tokio::time::timeout(WAIT, views.wait_for(done))
        .await
        .expect("view state did not settle in time")
        .expect("view state channel closed");
}
