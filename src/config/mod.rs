mod loader;
mod types;

pub use loader::ConfigError;
pub use types::{AlertConfig, CatalogConfig, Config, NavigationConfig, PagingConfig};
