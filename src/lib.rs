//! Model-View-Intent state engine for a movie browsing client, with the
//! paged top rated list screen built on it.

pub mod catalog;
pub mod config;
pub mod logging;
pub mod paging;
pub mod ui;
