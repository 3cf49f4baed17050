//! Configuration: API endpoint, pagination and storage settings.

mod loader;
mod types;

pub use loader::ConfigError;
pub use types::{ApiConfig, CatalogConfig, Config, StorageConfig, DEFAULT_BASE_URL};
