//! Cursor-based incremental loader.
//!
//! A [`Pager`] owns the pages loaded so far and serializes every load on an
//! async mutex, so appends, retries and refreshes never interleave. Each
//! call returns a [`PagingSnapshot`] whose generation orders it against
//! snapshots produced by other calls.

use std::fmt::Debug;
use std::sync::Arc;

use tokio::sync::Mutex;

use super::source::{LoadParams, LoadType, Page, PagingSource, PagingState};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadState {
    NotLoading { end_of_pagination: bool },
    Loading,
    Error(String),
}

impl LoadState {
    pub fn is_loading(&self) -> bool {
        matches!(self, LoadState::Loading)
    }

    pub fn is_error(&self) -> bool {
        matches!(self, LoadState::Error(_))
    }

    pub fn is_end(&self) -> bool {
        matches!(
            self,
            LoadState::NotLoading {
                end_of_pagination: true
            }
        )
    }
}

impl Default for LoadState {
    fn default() -> Self {
        LoadState::NotLoading {
            end_of_pagination: false,
        }
    }
}

/// Settled view of a pager, flattened for rendering.
#[derive(Debug, Clone, PartialEq)]
pub struct PagingSnapshot<T> {
    pub generation: u64,
    pub items: Vec<T>,
    pub loaded_pages: usize,
    pub refresh: LoadState,
    pub append: LoadState,
}

impl<T> Default for PagingSnapshot<T> {
    fn default() -> Self {
        Self {
            generation: 0,
            items: Vec::new(),
            loaded_pages: 0,
            refresh: LoadState::default(),
            append: LoadState::default(),
        }
    }
}

pub struct Pager<K, T> {
    source: Arc<dyn PagingSource<K, T>>,
    state: Mutex<PagerState<K, T>>,
}

struct PagerState<K, T> {
    pages: Vec<Page<K, T>>,
    refresh: LoadState,
    append: LoadState,
    last_refresh_key: Option<K>,
    generation: u64,
}

impl<K, T: Clone> PagerState<K, T> {
    fn snapshot(&self) -> PagingSnapshot<T> {
        PagingSnapshot {
            generation: self.generation,
            items: self
                .pages
                .iter()
                .flat_map(|page| page.data.iter().cloned())
                .collect(),
            loaded_pages: self.pages.len(),
            refresh: self.refresh.clone(),
            append: self.append.clone(),
        }
    }
}

impl<K, T> Pager<K, T>
where
    K: Clone + Debug + Send + Sync + 'static,
    T: Clone + Send + Sync + 'static,
{
    pub fn new(source: Arc<dyn PagingSource<K, T>>) -> Self {
        Self {
            source,
            state: Mutex::new(PagerState {
                pages: Vec::new(),
                refresh: LoadState::default(),
                append: LoadState::default(),
                last_refresh_key: None,
                generation: 0,
            }),
        }
    }

    pub async fn snapshot(&self) -> PagingSnapshot<T> {
        self.state.lock().await.snapshot()
    }

    /// Drop every loaded page and reload starting near `anchor`, or from the
    /// first page when there is no anchor or the source cannot place it.
    pub async fn refresh(&self, anchor: Option<usize>) -> PagingSnapshot<T> {
        let mut state = self.state.lock().await;
        let key = anchor.and_then(|position| {
            self.source.refresh_key(&PagingState {
                pages: &state.pages,
                anchor_position: Some(position),
            })
        });
        self.load_refresh(&mut state, key).await;
        state.snapshot()
    }

    /// Load the page after the last loaded one.
    ///
    /// Starts the initial load when nothing is loaded yet. Does nothing at
    /// the end of pagination or while the previous request has failed; use
    /// [`Pager::retry`] to resume after a failure.
    pub async fn load_more(&self) -> PagingSnapshot<T> {
        let mut state = self.state.lock().await;
        if state.pages.is_empty() {
            if !state.refresh.is_error() {
                self.load_refresh(&mut state, None).await;
            }
            return state.snapshot();
        }
        if state.append.is_error() {
            return state.snapshot();
        }

        match state.pages.last().and_then(|page| page.next_key.clone()) {
            Some(key) => self.load_append(&mut state, key).await,
            None => {
                state.append = LoadState::NotLoading {
                    end_of_pagination: true,
                }
            }
        }
        state.snapshot()
    }

    /// Repeat the request that failed last, with the same key.
    pub async fn retry(&self) -> PagingSnapshot<T> {
        let mut state = self.state.lock().await;
        if state.refresh.is_error() {
            let key = state.last_refresh_key.clone();
            self.load_refresh(&mut state, key).await;
        } else if state.append.is_error() {
            if let Some(key) = state.pages.last().and_then(|page| page.next_key.clone()) {
                self.load_append(&mut state, key).await;
            }
        }
        state.snapshot()
    }

    async fn load_refresh(&self, state: &mut PagerState<K, T>, key: Option<K>) {
        tracing::debug!(?key, "Refreshing pages");
        state.last_refresh_key = key.clone();

        let params = LoadParams {
            key,
            load_type: LoadType::Refresh,
        };
        match self.source.load(params).await {
            Ok(page) => {
                let end_of_pagination = page.is_terminal();
                state.pages = vec![page];
                state.refresh = LoadState::default();
                state.append = LoadState::NotLoading { end_of_pagination };
            }
            Err(err) => {
                tracing::warn!(
                    error = %err,
                    transient = err.source.is_transient(),
                    "Page refresh failed"
                );
                state.refresh = LoadState::Error(err.to_string());
            }
        }
        state.generation += 1;
    }

    async fn load_append(&self, state: &mut PagerState<K, T>, key: K) {
        tracing::debug!(?key, "Appending page");

        let params = LoadParams {
            key: Some(key),
            load_type: LoadType::Append,
        };
        match self.source.load(params).await {
            Ok(page) => {
                let end_of_pagination = page.is_terminal();
                state.pages.push(page);
                state.append = LoadState::NotLoading { end_of_pagination };
            }
            Err(err) => {
                tracing::warn!(
                    error = %err,
                    transient = err.source.is_transient(),
                    "Page append failed"
                );
                state.append = LoadState::Error(err.to_string());
            }
        }
        state.generation += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::CatalogError;
    use crate::paging::source::PagingError;
    use async_trait::async_trait;
    use parking_lot::Mutex as SyncMutex;
    use std::collections::VecDeque;

    /// Source that answers from a script and records requested keys.
    struct ScriptedSource {
        responses: SyncMutex<VecDeque<Result<Page<u32, u32>, u16>>>,
        requested: SyncMutex<Vec<Option<u32>>>,
    }

    impl ScriptedSource {
        fn new(responses: Vec<Result<Page<u32, u32>, u16>>) -> Arc<Self> {
            Arc::new(Self {
                responses: SyncMutex::new(responses.into()),
                requested: SyncMutex::new(Vec::new()),
            })
        }

        fn requested(&self) -> Vec<Option<u32>> {
            self.requested.lock().clone()
        }
    }

    #[async_trait]
    impl PagingSource<u32, u32> for ScriptedSource {
        async fn load(&self, params: LoadParams<u32>) -> Result<Page<u32, u32>, PagingError> {
            self.requested.lock().push(params.key);
            let next = self.responses.lock().pop_front().unwrap_or(Err(404));
            next.map_err(|status| PagingError {
                key: format!("{:?}", params.key),
                source: CatalogError::Status {
                    endpoint: "/scripted".to_string(),
                    status,
                    message: "scripted failure".to_string(),
                },
            })
        }

        fn refresh_key(&self, state: &PagingState<'_, u32, u32>) -> Option<u32> {
            let page = state.closest_page_to_position(state.anchor_position?)?;
            page.next_key.map(|key| key - 1)
        }
    }

    fn page(items: &[u32], next: Option<u32>) -> Page<u32, u32> {
        Page {
            data: items.to_vec(),
            prev_key: None,
            next_key: next,
        }
    }

    #[tokio::test]
    async fn load_more_starts_with_the_first_page_then_appends() {
        let source = ScriptedSource::new(vec![Ok(page(&[1, 2], Some(2))), Ok(page(&[3], None))]);
        let pager = Pager::new(source.clone());

        let first = pager.load_more().await;
        assert_eq!(first.items, vec![1, 2]);
        assert_eq!(first.append, LoadState::default());

        let second = pager.load_more().await;
        assert_eq!(second.items, vec![1, 2, 3]);
        assert!(second.append.is_end());
        assert!(second.generation > first.generation);

        let third = pager.load_more().await;
        assert_eq!(third.items, vec![1, 2, 3]);
        assert_eq!(source.requested(), vec![None, Some(2)]);
    }

    #[tokio::test]
    async fn failed_append_is_resumed_from_the_same_key_by_retry() {
        let source = ScriptedSource::new(vec![
            Ok(page(&[1], Some(2))),
            Err(503),
            Ok(page(&[2], Some(3))),
        ]);
        let pager = Pager::new(source.clone());

        pager.load_more().await;
        let failed = pager.load_more().await;
        assert!(failed.append.is_error());
        assert_eq!(failed.items, vec![1]);

        // No automatic retry.
        let still_failed = pager.load_more().await;
        assert!(still_failed.append.is_error());

        let retried = pager.retry().await;
        assert_eq!(retried.items, vec![1, 2]);
        assert_eq!(retried.append, LoadState::default());
        assert_eq!(source.requested(), vec![None, Some(2), Some(2)]);
    }

    #[tokio::test]
    async fn failed_refresh_keeps_loaded_items_and_retries_same_key() {
        let source = ScriptedSource::new(vec![
            Ok(page(&[1, 2], Some(2))),
            Ok(page(&[3, 4], Some(3))),
            Err(500),
            Ok(page(&[3, 4], Some(3))),
        ]);
        let pager = Pager::new(source.clone());
        pager.load_more().await;
        pager.load_more().await;

        let failed = pager.refresh(Some(3)).await;
        assert!(failed.refresh.is_error());
        assert_eq!(failed.items, vec![1, 2, 3, 4]);

        let retried = pager.retry().await;
        assert_eq!(retried.items, vec![3, 4]);
        assert_eq!(retried.refresh, LoadState::default());
        assert_eq!(source.requested(), vec![None, Some(2), Some(2), Some(2)]);
    }

    #[tokio::test]
    async fn refresh_without_anchor_restarts_from_the_first_page() {
        let source = ScriptedSource::new(vec![Ok(page(&[1], Some(2))), Ok(page(&[1], None))]);
        let pager = Pager::new(source.clone());
        pager.load_more().await;

        let refreshed = pager.refresh(None).await;
        assert_eq!(refreshed.items, vec![1]);
        assert_eq!(refreshed.loaded_pages, 1);
        assert!(refreshed.append.is_end());
        assert_eq!(source.requested(), vec![None, None]);
    }
}
