//! HTTP implementation of [`CatalogService`] for the TMDB v3 API.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, Url};
use serde::de::DeserializeOwned;
use serde::Deserialize;

use crate::catalog::error::CatalogError;
use crate::catalog::types::{
    Genre, GenreList, Movie, MovieDetails, MovieId, MoviePage, Person, ProductionCompany,
};
use crate::catalog::CatalogService;
use crate::config::CatalogConfig;

pub struct TmdbClient {
    client: Client,
    base_url: String,
    image_base_url: String,
    api_key: String,
    language: String,
}

impl TmdbClient {
    pub fn new(config: &CatalogConfig) -> Result<Self, CatalogError> {
        let api_key = config
            .resolve_api_key()
            .ok_or_else(|| CatalogError::MissingApiKey {
                env_var: config.api_key_env.clone(),
            })?;

        let client = Client::builder()
            .connect_timeout(Duration::from_secs(u64::from(config.connect_timeout_seconds)))
            .timeout(Duration::from_secs(u64::from(config.timeout_seconds)))
            .build()
            .map_err(CatalogError::Client)?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            image_base_url: config.image_base_url.trim_end_matches('/').to_string(),
            api_key,
            language: config.language.clone(),
        })
    }

    fn endpoint_url(&self, path: &str, query: &[(&str, String)]) -> Result<Url, CatalogError> {
        let raw = format!("{}{}", self.base_url, path);
        let mut url = Url::parse(&raw).map_err(|e| CatalogError::InvalidUrl {
            url: raw.clone(),
            reason: e.to_string(),
        })?;
        {
            let mut pairs = url.query_pairs_mut();
            pairs.append_pair("api_key", &self.api_key);
            pairs.append_pair("language", &self.language);
            for (name, value) in query {
                pairs.append_pair(name, value);
            }
        }
        Ok(url)
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, String)],
    ) -> Result<T, CatalogError> {
        let url = self.endpoint_url(path, query)?;
        tracing::debug!(endpoint = path, "Catalog request");

        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| CatalogError::Transport {
                endpoint: path.to_string(),
                source: e.without_url(),
            })?;

        let status = response.status();
        let body = response.bytes().await.map_err(|e| CatalogError::Transport {
            endpoint: path.to_string(),
            source: e.without_url(),
        })?;

        if !status.is_success() {
            return Err(CatalogError::Status {
                endpoint: path.to_string(),
                status: status.as_u16(),
                message: error_message(&body),
            });
        }

        serde_json::from_slice(&body).map_err(|e| CatalogError::Decode {
            endpoint: path.to_string(),
            source: e,
        })
    }

    fn image_url(&self, path: Option<String>) -> Option<String> {
        path.filter(|p| !p.is_empty())
            .map(|p| format!("{}/{}", self.image_base_url, p.trim_start_matches('/')))
    }

    fn movie(&self, raw: RawMovie) -> Movie {
        Movie {
            id: raw.id,
            title: raw.title,
            overview: raw.overview,
            poster: self.image_url(raw.poster_path),
            backdrop: self.image_url(raw.backdrop_path),
            rating: raw.vote_average,
            genre_ids: raw.genre_ids,
        }
    }

    fn person(&self, id: u64, name: String, department: Option<String>, profile: Option<String>) -> Person {
        Person {
            id,
            name,
            department,
            image: self.image_url(profile),
        }
    }

    fn details(&self, raw: RawDetails) -> MovieDetails {
        let production_company = raw
            .production_companies
            .into_iter()
            .next()
            .map(|company| ProductionCompany {
                name: company.name,
                logo: self.image_url(company.logo_path),
            });

        let director = raw
            .credits
            .crew
            .into_iter()
            .find(|member| member.job.as_deref() == Some("Director"))
            .map(|member| {
                self.person(member.id, member.name, member.department, member.profile_path)
            });

        let mut cast = raw.credits.cast;
        cast.sort_by_key(|member| member.order.unwrap_or(u32::MAX));
        let actors = cast
            .into_iter()
            .map(|member| {
                self.person(
                    member.id,
                    member.name,
                    member.known_for_department,
                    member.profile_path,
                )
            })
            .collect();

        MovieDetails {
            production_company,
            director,
            actors,
        }
    }
}

#[async_trait]
impl CatalogService for TmdbClient {
    async fn get_top_movies(&self, page: u32) -> Result<MoviePage, CatalogError> {
        let raw: RawMoviePage = self
            .get_json("/movie/top_rated", &[("page", page.to_string())])
            .await?;
        Ok(MoviePage {
            page: raw.page.unwrap_or(page),
            results: raw.results.into_iter().map(|m| self.movie(m)).collect(),
            total_pages: raw.total_pages,
        })
    }

    async fn get_genres(&self) -> Result<GenreList, CatalogError> {
        let raw: RawGenreList = self.get_json("/genre/movie/list", &[]).await?;
        Ok(GenreList { genres: raw.genres })
    }

    async fn get_movie_details(&self, id: MovieId) -> Result<MovieDetails, CatalogError> {
        let path = format!("/movie/{}", id);
        let raw: RawDetails = self
            .get_json(&path, &[("append_to_response", "credits".to_string())])
            .await?;
        Ok(self.details(raw))
    }
}

/// TMDB error bodies carry `status_message`; anything else is passed through.
fn error_message(body: &[u8]) -> String {
    #[derive(Deserialize)]
    struct ErrorBody {
        status_message: String,
    }

    match serde_json::from_slice::<ErrorBody>(body) {
        Ok(parsed) => parsed.status_message,
        Err(_) => String::from_utf8_lossy(body).chars().take(200).collect(),
    }
}

#[derive(Deserialize)]
struct RawMoviePage {
    #[serde(default)]
    page: Option<u32>,
    #[serde(default)]
    results: Vec<RawMovie>,
    #[serde(default)]
    total_pages: Option<u32>,
}

#[derive(Deserialize)]
struct RawMovie {
    id: u64,
    #[serde(default)]
    title: String,
    #[serde(default)]
    overview: String,
    #[serde(default)]
    poster_path: Option<String>,
    #[serde(default)]
    backdrop_path: Option<String>,
    #[serde(default)]
    vote_average: f64,
    #[serde(default)]
    genre_ids: Vec<u64>,
}

#[derive(Deserialize)]
struct RawGenreList {
    #[serde(default)]
    genres: Vec<Genre>,
}

#[derive(Deserialize)]
struct RawDetails {
    #[serde(default)]
    production_companies: Vec<RawCompany>,
    #[serde(default)]
    credits: RawCredits,
}

#[derive(Deserialize)]
struct RawCompany {
    name: String,
    #[serde(default)]
    logo_path: Option<String>,
}

#[derive(Deserialize, Default)]
struct RawCredits {
    #[serde(default)]
    cast: Vec<RawCast>,
    #[serde(default)]
    crew: Vec<RawCrew>,
}

#[derive(Deserialize)]
struct RawCast {
    id: u64,
    name: String,
    #[serde(default)]
    known_for_department: Option<String>,
    #[serde(default)]
    profile_path: Option<String>,
    #[serde(default)]
    order: Option<u32>,
}

#[derive(Deserialize)]
struct RawCrew {
    id: u64,
    name: String,
    #[serde(default)]
    job: Option<String>,
    #[serde(default)]
    department: Option<String>,
    #[serde(default)]
    profile_path: Option<String>,
}
