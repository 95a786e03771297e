use async_trait::async_trait;
use reqwest::{Client, Response};
use serde::de::DeserializeOwned;
use tracing::{debug, instrument};
use validator::Validate;
use crate::api::dto::{products_from_values, Page, ProductPayload};
use crate::api::{ApiError, CatalogApi};
use crate::config::Config;
use crate::domain::{Category, CategoryDraft, CategoryId, Product, ProductDraft, ProductId, SaleRecord, SaleRequest};
use crate::report::ReportRange;

/// reqwest-backed client for the catalog/sales REST service.
#[derive(Clone, Debug)]
pub struct HttpCatalogApi {
    client: Client,
    base_url: String,
}

impl HttpCatalogApi {
    pub fn new(config: &Config) -> Result<Self, ApiError> {
        let client = Client::builder().timeout(config.http_timeout).build()?;
        Ok(Self { client, base_url: config.api_url.trim_end_matches('/').to_string() })
    }

    pub fn base_url(&self) -> &str { &self.base_url }

    fn url(&self, path: &str) -> String { format!("{}{}", self.base_url, path) }

    async fn json<T: DeserializeOwned>(resp: Response) -> Result<T, ApiError> {
        let bytes = ensure_success(resp).await?.bytes().await?;
        Ok(serde_json::from_slice(&bytes)?)
    }
}

async fn ensure_success(resp: Response) -> Result<Response, ApiError> {
    let status = resp.status();
    if status.is_success() {
        return Ok(resp);
    }
    let body = resp.text().await.unwrap_or_default();
    Err(ApiError::Status { status: status.as_u16(), body })
}

#[async_trait]
impl CatalogApi for HttpCatalogApi {
    #[instrument(skip(self))]
    async fn search_products(&self, name: &str) -> Result<Vec<Product>, ApiError> {
        debug!("Sending request");
        let resp = self.client.get(self.url("/products/search")).query(&[("name", name)]).send().await?;
        let page: Page<serde_json::Value> = Self::json(resp).await?;
        Ok(products_from_values(page.content))
    }

    #[instrument(skip(self, sale), fields(items = sale.items.len(), total = %sale.total()))]
    async fn create_sale(&self, sale: &SaleRequest) -> Result<(), ApiError> {
        debug!("Sending request");
        let resp = self.client.post(self.url("/sales")).json(sale).send().await?;
        ensure_success(resp).await?;
        Ok(())
    }

    #[instrument(skip(self))]
    async fn list_products(&self) -> Result<Vec<Product>, ApiError> {
        debug!("Sending request");
        let resp = self.client.get(self.url("/products")).send().await?;
        let page: Page<serde_json::Value> = Self::json(resp).await?;
        Ok(products_from_values(page.content))
    }

    #[instrument(skip(self))]
    async fn get_product(&self, id: ProductId) -> Result<Product, ApiError> {
        debug!("Sending request");
        let resp = self.client.get(self.url(&format!("/products/{id}"))).send().await?;
        let payload: ProductPayload = Self::json(resp).await?;
        Ok(Product::try_from(payload)?)
    }

    #[instrument(skip(self))]
    async fn create_product(&self, draft: &ProductDraft) -> Result<(), ApiError> {
        draft.validate()?;
        debug!("Sending request");
        let resp = self.client.post(self.url("/products")).json(draft).send().await?;
        ensure_success(resp).await?;
        Ok(())
    }

    #[instrument(skip(self))]
    async fn update_product(&self, id: ProductId, draft: &ProductDraft) -> Result<(), ApiError> {
        draft.validate()?;
        debug!("Sending request");
        let resp = self.client.put(self.url(&format!("/products/{id}"))).json(draft).send().await?;
        ensure_success(resp).await?;
        Ok(())
    }

    #[instrument(skip(self))]
    async fn delete_product(&self, id: ProductId) -> Result<(), ApiError> {
        debug!("Sending request");
        let resp = self.client.delete(self.url(&format!("/products/{id}"))).send().await?;
        ensure_success(resp).await?;
        Ok(())
    }

    #[instrument(skip(self))]
    async fn list_categories(&self) -> Result<Vec<Category>, ApiError> {
        debug!("Sending request");
        let resp = self.client.get(self.url("/categories")).send().await?;
        Self::json(resp).await
    }

    #[instrument(skip(self))]
    async fn create_category(&self, draft: &CategoryDraft) -> Result<(), ApiError> {
        draft.validate()?;
        debug!("Sending request");
        let resp = self.client.post(self.url("/categories")).json(draft).send().await?;
        ensure_success(resp).await?;
        Ok(())
    }

    #[instrument(skip(self))]
    async fn update_category(&self, id: CategoryId, draft: &CategoryDraft) -> Result<(), ApiError> {
        draft.validate()?;
        debug!("Sending request");
        let resp = self.client.put(self.url(&format!("/categories/{id}"))).json(draft).send().await?;
        ensure_success(resp).await?;
        Ok(())
    }

    #[instrument(skip(self))]
    async fn delete_category(&self, id: CategoryId) -> Result<(), ApiError> {
        debug!("Sending request");
        let resp = self.client.delete(self.url(&format!("/categories/{id}"))).send().await?;
        ensure_success(resp).await?;
        Ok(())
    }

    #[instrument(skip(self))]
    async fn sales_report(&self, range: &ReportRange) -> Result<Vec<SaleRecord>, ApiError> {
        debug!("Sending request");
        let resp = self.client.get(self.url("/reports")).query(&range.query()).send().await?;
        Self::json(resp).await
    }
}
