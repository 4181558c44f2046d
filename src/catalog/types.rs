use serde::{Deserialize, Serialize};

pub type MovieId = u64;
pub type GenreId = u64;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Movie {
    pub id: MovieId,
    pub title: String,
    pub overview: String,
    /// Full poster URL.
    pub poster: Option<String>,
    /// Full backdrop URL.
    pub backdrop: Option<String>,
    /// Average vote, 0.0 to 10.0.
    pub rating: f64,
    pub genre_ids: Vec<GenreId>,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Genre {
    pub id: GenreId,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductionCompany {
    pub name: String,
    pub logo: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Person {
    pub id: u64,
    pub name: String,
    pub department: Option<String>,
    pub image: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct MovieDetails {
    pub production_company: Option<ProductionCompany>,
    pub director: Option<Person>,
    /// Cast in billing order.
    pub actors: Vec<Person>,
}

/// One page of the top rated listing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MoviePage {
    pub page: u32,
    pub results: Vec<Movie>,
    /// Total pages reported by the catalog, when known.
    pub total_pages: Option<u32>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GenreList {
    pub genres: Vec<Genre>,
}
