//! Paging primitives shared by every paged list.

use async_trait::async_trait;
use thiserror::Error;

use crate::catalog::CatalogError;

/// An ordered slice of items plus the keys of its neighbours.
///
/// A `None` next key is terminal: nothing is requested after this page.
#[derive(Debug, Clone, PartialEq)]
pub struct Page<K, T> {
    pub data: Vec<T>,
    pub prev_key: Option<K>,
    pub next_key: Option<K>,
}

impl<K, T> Page<K, T> {
    pub fn is_terminal(&self) -> bool {
        self.next_key.is_none()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadType {
    Refresh,
    Append,
}

#[derive(Debug, Clone, PartialEq)]
pub struct LoadParams<K> {
    /// Page to load; `None` means the source's first page.
    pub key: Option<K>,
    pub load_type: LoadType,
}

/// A single page request failed. The sequence itself stays usable: the same
/// key can be requested again.
#[derive(Debug, Error)]
#[error("Failed to load page {key}: {source}")]
pub struct PagingError {
    pub key: String,
    #[source]
    pub source: CatalogError,
}

/// Loaded pages plus the position the user is looking at.
#[derive(Debug)]
pub struct PagingState<'a, K, T> {
    pub pages: &'a [Page<K, T>],
    /// Index of an item in the flattened list of loaded items.
    pub anchor_position: Option<usize>,
}

impl<'a, K, T> PagingState<'a, K, T> {
    /// The page containing `position`, or the last page when `position` is
    /// past the loaded items.
    pub fn closest_page_to_position(&self, position: usize) -> Option<&'a Page<K, T>> {
        let mut start = 0;
        for page in self.pages {
            if position < start + page.data.len() {
                return Some(page);
            }
            start += page.data.len();
        }
        self.pages.last()
    }
}

#[async_trait]
pub trait PagingSource<K, T>: Send + Sync
where
    K: Send + Sync + 'static,
    T: Send + Sync + 'static,
{
    async fn load(&self, params: LoadParams<K>) -> Result<Page<K, T>, PagingError>;

    /// Key to restart from so a refresh lands near the anchor position.
    fn refresh_key(&self, state: &PagingState<'_, K, T>) -> Option<K>;
}
