//! Client for the remote commerce API.
//!
//! Fetches are normalized into typed records; every failure surfaces as an
//! [`ApiError`] so callers decide how (and whether) to present it.

mod client;
pub mod envelope;
mod error;
mod types;

pub use client::CatalogClient;
pub use error::ApiError;
pub use types::{Amount, AppSettings, Category, ItemId, Page, Product, ProductQuery, SettingsLink};
