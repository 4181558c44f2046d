//! Model-View-Intent (MVI) runtime.
//!
//! This module provides the generic engine every screen is built on.
//!
//! # Architecture
//!
//! ```text
//! Intent ──→ Screen::handle_intent ──→ Reducer ──→ ModelState ──→ ViewState ──→ View
//!    ↑                  │                                                      │
//!    │                  └──→ NavigationBus / alerts                            │
//!    └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! - **ModelState**: immutable, screen-private source of truth
//! - **ViewState**: pure projection of the model state for rendering
//! - **Intent**: user actions or host requests
//! - **Reducer**: pure transition function applied through the state holder
//! - **TaskGroup**: the lifetime and started concurrency scopes

mod alert;
mod holder;
mod intent;
mod navigation;
mod reducer;
mod resource;
mod scope;
mod state;
mod view_model;

pub use alert::{
    AlertKind, AlertLifecycle, CommonModelState, CommonViewState, TopBarViewState,
    ALERT_DISPLAY_TIME,
};
pub use holder::StateHolder;
pub use intent::Intent;
pub use navigation::{
    Navigation, NavigationBus, NavigationEvent, NavigationStream, NAVIGATION_REPLAY,
};
pub use reducer::Reducer;
pub use resource::Resource;
pub use scope::{TaskGroup, TaskHandle, TaskId};
pub use state::{ModelState, ViewState};
pub use view_model::{Screen, ViewModel, ViewModelOptions};
