//! Typed catalog operations over an injected [`Transport`].
//!
//! # Design
//! `CatalogClient` holds only its transport and carries no state between
//! calls. Each operation builds a resource path, encodes or decodes JSON, and
//! makes exactly one transport call. Transport failures come back unchanged
//! inside [`ApiError::Transport`]; nothing is retried.
//!
//! `get_products` takes a ready-made URL (for following `meta.next` cursors
//! or URLs from elsewhere) while every other operation builds its own;
//! `list_products` is the path-building counterpart.

use serde::de::DeserializeOwned;
use tracing::{debug, instrument};

use crate::error::ApiError;
use crate::transport::{Query, Transport};
use crate::types::{Product, ProductList};

const PRODUCT_PATH: &str = "product/";

/// Client for the product catalog.
#[derive(Debug, Clone)]
pub struct CatalogClient<T> {
    transport: T,
}

impl<T: Transport> CatalogClient<T> {
    pub fn new(transport: T) -> Self {
        Self { transport }
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    pub fn into_transport(self) -> T {
        self.transport
    }

    /// Fetch one page of products from a fully formed `url`.
    #[instrument(skip(self), err)]
    pub fn get_products(&self, url: &str) -> Result<ProductList, ApiError> {
        let body = self.transport.get(url)?;
        decode(&body)
    }

    /// Fetch one page of products, building the URL from `query`
    /// (e.g. `limit`, `offset`).
    #[instrument(skip(self), err)]
    pub fn list_products(&self, query: &Query) -> Result<ProductList, ApiError> {
        let url = self.transport.url(PRODUCT_PATH, query)?;
        self.get_products(&url)
    }

    #[instrument(skip(self), err)]
    pub fn get_product(&self, id: u64) -> Result<Product, ApiError> {
        let url = self.product_url(id)?;
        let body = self.transport.get(&url)?;
        decode(&body)
    }

    #[instrument(skip_all, fields(title = %product.title), err)]
    pub fn create_product(&self, product: &Product) -> Result<(), ApiError> {
        let body = encode(product)?;
        let url = self.transport.url(PRODUCT_PATH, &Query::new())?;
        self.transport.post(&url, body)?;
        Ok(())
    }

    #[instrument(skip(self, product), err)]
    pub fn update_product(&self, id: u64, product: &Product) -> Result<(), ApiError> {
        let body = encode(product)?;
        let url = self.product_url(id)?;
        self.transport.put(&url, body)?;
        Ok(())
    }

    #[instrument(skip(self), err)]
    pub fn delete_product(&self, id: u64) -> Result<(), ApiError> {
        let url = self.product_url(id)?;
        self.transport.delete(&url)?;
        Ok(())
    }

    fn product_url(&self, id: u64) -> Result<String, ApiError> {
        Ok(self.transport.url(&format!("{PRODUCT_PATH}{id}"), &Query::new())?)
    }
}

fn encode(product: &Product) -> Result<Vec<u8>, ApiError> {
    let body = serde_json::to_vec(product).map_err(ApiError::Encode)?;
    debug!(body_len = body.len(), "encoded product");
    Ok(body)
}

fn decode<D: DeserializeOwned>(body: &[u8]) -> Result<D, ApiError> {
    serde_json::from_slice(body).map_err(ApiError::Decode)
}
