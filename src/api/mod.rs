//! Catalog/Sales backend client.
//!
//! [`CatalogApi`] is the seam between the counter workflow and the REST
//! backend. [`HttpCatalogApi`] talks to the real service; tests plug in
//! their own implementations.

pub mod dto;
mod http;

use async_trait::async_trait;
use thiserror::Error;
use crate::domain::{Category, CategoryDraft, CategoryId, Product, ProductDraft, ProductError, ProductId, SaleRecord, SaleRequest};
use crate::report::ReportRange;

pub use http::HttpCatalogApi;

#[derive(Error, Debug)]
pub enum ApiError {
    #[error("Transport error: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("Backend answered {status}: {body}")]
    Status { status: u16, body: String },

    #[error("Undecodable response: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("Invalid product record: {0}")]
    InvalidProduct(#[from] ProductError),

    #[error("Rejected before sending: {0}")]
    Invalid(#[from] validator::ValidationErrors),
}

impl ApiError {
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::Status { status: 404, .. })
    }
}

#[async_trait]
pub trait CatalogApi: Send + Sync {
    /// `GET /products/search?name=`
    async fn search_products(&self, name: &str) -> Result<Vec<Product>, ApiError>;

    /// `POST /sales`
    async fn create_sale(&self, sale: &SaleRequest) -> Result<(), ApiError>;

    async fn list_products(&self) -> Result<Vec<Product>, ApiError>;
    async fn get_product(&self, id: ProductId) -> Result<Product, ApiError>;
    async fn create_product(&self, draft: &ProductDraft) -> Result<(), ApiError>;
    async fn update_product(&self, id: ProductId, draft: &ProductDraft) -> Result<(), ApiError>;
    async fn delete_product(&self, id: ProductId) -> Result<(), ApiError>;

    async fn list_categories(&self) -> Result<Vec<Category>, ApiError>;
    async fn create_category(&self, draft: &CategoryDraft) -> Result<(), ApiError>;
    async fn update_category(&self, id: CategoryId, draft: &CategoryDraft) -> Result<(), ApiError>;
    async fn delete_category(&self, id: CategoryId) -> Result<(), ApiError>;

    /// `GET /reports?start=&end=`
    async fn sales_report(&self, range: &ReportRange) -> Result<Vec<SaleRecord>, ApiError>;
}
