//! Base trait for intents in the MVI runtime.

use std::fmt::Debug;

/// Marker trait for intent objects.
///
/// Intents represent:
/// - User actions (item clicks, filter toggles, pull to refresh)
/// - Host requests (load the next page, retry a failed load)
///
/// Intents are handed to [`super::ViewModel::on_intent`] and processed
/// asynchronously by the screen's [`super::Screen::handle_intent`].
pub trait Intent: Debug + Send + 'static {}
