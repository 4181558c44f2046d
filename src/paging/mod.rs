//! Incremental loading of keyed pages.

mod movie_source;
mod pager;
mod source;

pub use movie_source::MovieListPagingSource;
pub use pager::{LoadState, Pager, PagingSnapshot};
pub use source::{LoadParams, LoadType, Page, PagingError, PagingSource, PagingState};
