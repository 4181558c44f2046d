//! Top rated movies as a paged sequence.

use std::sync::Arc;

use async_trait::async_trait;

use super::source::{LoadParams, Page, PagingError, PagingSource, PagingState};
use crate::catalog::{CatalogService, Movie};
use crate::config::PagingConfig;

/// Pages of top rated movies with low rated entries filtered out.
///
/// With `require_full_page` set, a page that loses any movie to the rating
/// filter is the last page: the listing is sorted by rating, so the first
/// gap means the threshold has been crossed.
pub struct MovieListPagingSource {
    catalog: Arc<dyn CatalogService>,
    min_rating: f64,
    require_full_page: bool,
    initial_key: u32,
}

impl MovieListPagingSource {
    pub fn new(catalog: Arc<dyn CatalogService>, config: &PagingConfig) -> Self {
        Self {
            catalog,
            min_rating: config.min_rating,
            require_full_page: config.require_full_page,
            initial_key: config.initial_key,
        }
    }
}

#[async_trait]
impl PagingSource<u32, Movie> for MovieListPagingSource {
    async fn load(&self, params: LoadParams<u32>) -> Result<Page<u32, Movie>, PagingError> {
        let page = params.key.unwrap_or(self.initial_key);
        let response = self
            .catalog
            .get_top_movies(page)
            .await
            .map_err(|source| PagingError {
                key: page.to_string(),
                source,
            })?;

        let total = response.results.len();
        let data: Vec<Movie> = response
            .results
            .into_iter()
            .filter(|movie| movie.rating >= self.min_rating)
            .collect();

        let has_more_pages = response.total_pages.map_or(true, |last| page < last);
        let page_intact = !self.require_full_page || data.len() == total;
        let next_key = (total > 0 && page_intact && has_more_pages)
            .then(|| page.checked_add(1))
            .flatten();

        tracing::debug!(
            page,
            load_type = ?params.load_type,
            received = total,
            kept = data.len(),
            ?next_key,
            "Loaded movie page"
        );

        Ok(Page {
            data,
            prev_key: None,
            next_key,
        })
    }

    fn refresh_key(&self, state: &PagingState<'_, u32, Movie>) -> Option<u32> {
        let page = state.closest_page_to_position(state.anchor_position?)?;
        page.prev_key
            .and_then(|key| key.checked_add(1))
            .or_else(|| page.next_key.and_then(|key| key.checked_sub(1)))
    }
}
