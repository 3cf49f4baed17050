//! Shared test utilities and mock infrastructure.

#![allow(dead_code, unused_imports)]

pub mod mock_api;
pub mod scripted;

use storefront::api::{CatalogClient, Product};
use storefront::config::ApiConfig;

/// Client pointed at a mock server, with a short timeout.
pub fn client_for(base_url: &str, timeout_seconds: u32) -> CatalogClient {
    let config = ApiConfig {
        base_url: base_url.to_string(),
        timeout_seconds,
        connect_timeout_seconds: 1,
    };
    CatalogClient::new(&config).expect("Failed to build client")
}

/// JSON array of `count` products with consecutive ids starting at `first_id`.
pub fn products_json(first_id: i64, count: usize) -> String {
    let items: Vec<serde_json::Value> = (0..count as i64)
        .map(|i| {
            let id = first_id + i;
            serde_json::json!({"id": id, "name": format!("Product {}", id), "price": "10.00"})
        })
        .collect();
    serde_json::Value::Array(items).to_string()
}

pub fn product(id: i64) -> Product {
    Product::new(id, format!("Product {}", id))
}
