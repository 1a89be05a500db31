//! Read-only client for the remote product catalog.
//!
//! The catalog speaks a small JSON REST API (dummyjson-compatible):
//!
//! | Operation | Request |
//! |---|---|
//! | [`CatalogClient::get_products`] | `GET /products?skip=&limit=` |
//! | [`CatalogClient::get_product`] | `GET /products/{id}` |
//! | [`CatalogClient::search_products`] | `GET /products/search?q=` |
//! | [`CatalogClient::products_by_category`] | `GET /products/category/{slug}` |
//! | [`CatalogClient::categories`] | `GET /products/categories` |

mod error;

pub use error::CatalogError;

use std::time::Duration;

use serde::de::DeserializeOwned;
use tracing::{debug, instrument};

use crate::domain::{Category, Product, ProductId, ProductPage};

#[derive(Clone)]
pub struct CatalogClient {
    client: reqwest::Client,
    base_url: String,
}

impl CatalogClient {
    /// Builds a client rooted at `base_url`; every request is bounded by
    /// `timeout`.
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self, CatalogError> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Ok(Self { client, base_url })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    #[instrument(skip(self))]
    pub async fn get_products(&self, skip: u32, limit: u32) -> Result<ProductPage, CatalogError> {
        let request = self.products_request(skip, limit)?;
        self.fetch(request, "products").await
    }

    #[instrument(skip(self))]
    pub async fn get_product(&self, id: ProductId) -> Result<Product, CatalogError> {
        let request = self.product_request(id)?;
        self.fetch(request, "product").await
    }

    #[instrument(skip(self))]
    pub async fn search_products(&self, query: &str) -> Result<ProductPage, CatalogError> {
        let request = self.search_request(query)?;
        self.fetch(request, "search results").await
    }

    #[instrument(skip(self))]
    pub async fn products_by_category(&self, category: &str) -> Result<ProductPage, CatalogError> {
        let request = self.category_request(category)?;
        self.fetch(request, "products by category").await
    }

    #[instrument(skip(self))]
    pub async fn categories(&self) -> Result<Vec<Category>, CatalogError> {
        let request = self.categories_request()?;
        self.fetch(request, "categories").await
    }

    fn products_request(&self, skip: u32, limit: u32) -> Result<reqwest::Request, CatalogError> {
        Ok(self
            .client
            .get(self.url("/products"))
            .query(&[("skip", skip), ("limit", limit)])
            .build()?)
    }

    fn product_request(&self, id: ProductId) -> Result<reqwest::Request, CatalogError> {
        Ok(self.client.get(self.url(&format!("/products/{}", id))).build()?)
    }

    fn search_request(&self, query: &str) -> Result<reqwest::Request, CatalogError> {
        Ok(self
            .client
            .get(self.url("/products/search"))
            .query(&[("q", query)])
            .build()?)
    }

    fn category_request(&self, category: &str) -> Result<reqwest::Request, CatalogError> {
        let mut url = reqwest::Url::parse(&self.url("/products/category"))
            .map_err(|e| CatalogError::InvalidUrl(e.to_string()))?;
        // Push as a path segment so the slug is percent-encoded
        url.path_segments_mut()
            .map_err(|_| CatalogError::InvalidUrl(format!("{} cannot take a path", self.base_url)))?
            .push(category);
        Ok(self.client.get(url).build()?)
    }

    fn categories_request(&self) -> Result<reqwest::Request, CatalogError> {
        Ok(self.client.get(self.url("/products/categories")).build()?)
    }

    async fn fetch<T: DeserializeOwned>(
        &self,
        request: reqwest::Request,
        what: &'static str,
    ) -> Result<T, CatalogError> {
        let response = self.client.execute(request).await?;

        let status = response.status();
        if !status.is_success() {
            return Err(CatalogError::Status { what, status });
        }

        let body = response.text().await?;
        debug!(bytes = body.len(), "Catalog response received");
        Ok(serde_json::from_str(&body)?)
    }
}
