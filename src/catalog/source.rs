//! Paged data sources backing a [`ListController`](super::ListController).

use async_trait::async_trait;

use crate::api::{ApiError, CatalogClient, Category, Page, Product, ProductQuery};

/// A remote collection that can be fetched one page at a time.
///
/// Pages are numbered from 1.
#[async_trait]
pub trait PageSource: Send + Sync {
    type Item: Clone + PartialEq + Send + Sync + 'static;
    type Query: Clone + PartialEq + Send + Sync + 'static;

    /// Name of this source for logging.
    fn name(&self) -> &'static str;

    async fn fetch_page(&self, query: &Self::Query, page: u32) -> Result<Page<Self::Item>, ApiError>;
}

/// Product listing, filtered by search text and/or category.
#[derive(Clone)]
pub struct ProductPages {
    client: CatalogClient,
}

impl ProductPages {
    pub fn new(client: CatalogClient) -> Self {
        Self { client }
    }
}

#[async_trait]
impl PageSource for ProductPages {
    type Item = Product;
    type Query = ProductQuery;

    fn name(&self) -> &'static str {
        "products"
    }

    async fn fetch_page(&self, query: &ProductQuery, page: u32) -> Result<Page<Product>, ApiError> {
        self.client.products(page, query).await
    }
}

/// Trending products. The endpoint returns everything at once, so only
/// page 1 issues a request and later pages are empty.
#[derive(Clone)]
pub struct TrendingPages {
    client: CatalogClient,
}

impl TrendingPages {
    pub fn new(client: CatalogClient) -> Self {
        Self { client }
    }
}

#[async_trait]
impl PageSource for TrendingPages {
    type Item = Product;
    type Query = ();

    fn name(&self) -> &'static str {
        "trending"
    }

    async fn fetch_page(&self, _query: &(), page: u32) -> Result<Page<Product>, ApiError> {
        if page > 1 {
            return Ok(Page::empty());
        }
        self.client.trending().await
    }
}

/// All categories; single-page like [`TrendingPages`].
#[derive(Clone)]
pub struct CategoryPages {
    client: CatalogClient,
}

impl CategoryPages {
    pub fn new(client: CatalogClient) -> Self {
        Self { client }
    }
}

#[async_trait]
impl PageSource for CategoryPages {
    type Item = Category;
    type Query = ();

    fn name(&self) -> &'static str {
        "categories"
    }

    async fn fetch_page(&self, _query: &(), page: u32) -> Result<Page<Category>, ApiError> {
        if page > 1 {
            return Ok(Page::empty());
        }
        self.client.categories().await
    }
}
