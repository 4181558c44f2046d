//! Movie catalog collaborator.
//!
//! The state engine only depends on [`CatalogService`]; [`TmdbClient`] is
//! the HTTP implementation used by the binary.

mod client;
mod error;
mod types;

use async_trait::async_trait;

pub use client::TmdbClient;
pub use error::CatalogError;
pub use types::{
    Genre, GenreId, GenreList, Movie, MovieDetails, MovieId, MoviePage, Person,
    ProductionCompany,
};

/// The three catalog operations the list screen depends on.
#[async_trait]
pub trait CatalogService: Send + Sync {
    /// One page of top rated movies. Pages start at 1.
    async fn get_top_movies(&self, page: u32) -> Result<MoviePage, CatalogError>;

    async fn get_genres(&self) -> Result<GenreList, CatalogError>;

    async fn get_movie_details(&self, id: MovieId) -> Result<MovieDetails, CatalogError>;
}
