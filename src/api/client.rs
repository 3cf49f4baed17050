use std::time::Duration;

use reqwest::{Client, Url};
use serde_json::Value;
use tokio::time::timeout;

use crate::api::envelope;
use crate::api::error::ApiError;
use crate::api::types::{AppSettings, Category, ItemId, Page, Product, ProductQuery};
use crate::config::ApiConfig;

/// Client for the storefront's commerce API.
///
/// Cheap to clone: the underlying connection pool is shared.
#[derive(Clone)]
pub struct CatalogClient {
    client: Client,
    base_url: Url,
    timeout: Duration,
}

impl CatalogClient {
    pub fn new(config: &ApiConfig) -> Result<Self, ApiError> {
        let raw = config.base_url.trim();
        let base_url = Url::parse(raw).map_err(|e| ApiError::InvalidUrl {
            url: raw.to_string(),
            reason: e.to_string(),
        })?;

        let client = Client::builder()
            .connect_timeout(config.connect_timeout())
            .build()
            .map_err(ApiError::Setup)?;

        Ok(Self {
            client,
            base_url,
            timeout: config.timeout(),
        })
    }

    pub fn base_url(&self) -> &str {
        self.base_url.as_str()
    }

    /// `GET /products?page=N` with optional search and category filters.
    pub async fn products(&self, page: u32, query: &ProductQuery) -> Result<Page<Product>, ApiError> {
        let mut params = vec![("page", page.to_string())];
        params.extend(query.params());

        let payload = self.get_json(&["products"], &params).await?;
        Ok(Page {
            items: envelope::decode_items(envelope::extract_list(&payload, "products"), "product"),
            meta: envelope::extract_meta(&payload),
        })
    }

    /// `GET /products/trending`. The endpoint is not paginated.
    pub async fn trending(&self) -> Result<Page<Product>, ApiError> {
        let payload = self.get_json(&["products", "trending"], &[]).await?;
        Ok(Page {
            items: envelope::decode_items(envelope::extract_list(&payload, "products"), "product"),
            meta: envelope::extract_meta(&payload),
        })
    }

    /// `GET /products/{id}`.
    pub async fn product(&self, id: &ItemId) -> Result<Product, ApiError> {
        let id_segment = id.to_string();
        let payload = self.get_json(&["products", id_segment.as_str()], &[]).await?;

        let not_found = || ApiError::NotFound {
            what: format!("Product {}", id),
        };
        let object = envelope::extract_object(&payload, "product").ok_or_else(not_found)?;
        if !object.contains_key("id") {
            return Err(not_found());
        }

        serde_json::from_value(Value::Object(object.clone())).map_err(|e| ApiError::Decode {
            path: format!("/products/{}", id),
            reason: e.to_string(),
        })
    }

    /// `GET /categories`. The endpoint is not paginated.
    pub async fn categories(&self) -> Result<Page<Category>, ApiError> {
        let payload = self.get_json(&["categories"], &[]).await?;
        Ok(Page {
            items: envelope::decode_items(
                envelope::extract_list(&payload, "categories"),
                "category",
            ),
            meta: envelope::extract_meta(&payload),
        })
    }

    /// `GET /app/settings`.
    pub async fn app_settings(&self) -> Result<AppSettings, ApiError> {
        let payload = self.get_json(&["app", "settings"], &[]).await?;
        let settings = envelope::extract_settings(&payload);

        serde_json::from_value(Value::Object(settings)).map_err(|e| ApiError::Decode {
            path: "/app/settings".to_string(),
            reason: e.to_string(),
        })
    }

    /// Issue a GET and return the JSON payload of a successful envelope.
    async fn get_json(&self, segments: &[&str], params: &[(&str, String)]) -> Result<Value, ApiError> {
        let url = self.endpoint(segments, params)?;
        let path = url.path().to_string();

        tracing::debug!(url = %url, "GET");

        let result = timeout(self.timeout, self.do_get(&path, url)).await;
        let payload = match result {
            Ok(payload) => payload?,
            Err(_) => {
                return Err(ApiError::Timeout {
                    duration: self.timeout.as_secs(),
                })
            }
        };

        if !envelope::is_success(&payload) {
            return Err(ApiError::Rejected {
                message: envelope::rejection_message(&payload),
            });
        }

        Ok(payload)
    }

    async fn do_get(&self, path: &str, url: Url) -> Result<Value, ApiError> {
        let response = self
            .client
            .get(url)
            .header(reqwest::header::ACCEPT, "application/json")
            .send()
            .await
            .map_err(|e| ApiError::Transport {
                path: path.to_string(),
                source: e,
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(ApiError::Status {
                path: path.to_string(),
                status: status.as_u16(),
            });
        }

        let body = response.bytes().await.map_err(|e| ApiError::Transport {
            path: path.to_string(),
            source: e,
        })?;

        // An empty body is treated like `{}`: successful, with nothing in it.
        if body.iter().all(u8::is_ascii_whitespace) {
            return Ok(Value::Object(Default::default()));
        }

        serde_json::from_slice(&body).map_err(|e| ApiError::Decode {
            path: path.to_string(),
            reason: e.to_string(),
        })
    }

    fn endpoint(&self, segments: &[&str], params: &[(&str, String)]) -> Result<Url, ApiError> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| ApiError::InvalidUrl {
                url: self.base_url.to_string(),
                reason: "URL cannot be a base".to_string(),
            })?
            .pop_if_empty()
            .extend(segments);

        if !params.is_empty() {
            let mut pairs = url.query_pairs_mut();
            for (key, value) in params {
                pairs.append_pair(key, value);
            }
        }

        Ok(url)
    }
}
