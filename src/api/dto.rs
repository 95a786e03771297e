//! Wire payloads of the catalog backend and their conversion into domain
//! records.

use rust_decimal::Decimal;
use serde::Deserialize;
use tracing::warn;
use crate::domain::{Category, Product, ProductError};

/// `{content: [...]}` envelope of the paginated endpoints.
#[derive(Debug, Deserialize)]
pub struct Page<T> {
    #[serde(default = "Vec::new")]
    pub content: Vec<T>,
}

/// Product as the backend sends it, before validation.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductPayload {
    pub id: Option<i64>,
    pub name: Option<String>,
    pub price: Option<Decimal>,
    pub stock_quantity: Option<i64>,
    pub category: Option<Category>,
}

impl TryFrom<ProductPayload> for Product {
    type Error = ProductError;

    fn try_from(p: ProductPayload) -> Result<Self, Self::Error> {
        let id = p.id.ok_or(ProductError::MissingField("id"))?;
        let name = p.name.ok_or(ProductError::MissingField("name"))?;
        let price = p.price.ok_or(ProductError::MissingField("price"))?;
        // Missing or negative stock means nothing can be sold.
        let stock = p.stock_quantity.unwrap_or(0).clamp(0, i64::from(u32::MAX)) as u32;
        let product = Product::new(id, name, price, stock)?;
        Ok(match p.category {
            Some(category) => product.with_category(category),
            None => product,
        })
    }
}

/// Converts a raw product list, dropping entries that fail validation.
pub fn products_from_values(values: Vec<serde_json::Value>) -> Vec<Product> {
    values
        .into_iter()
        .filter_map(|value| {
            let converted = serde_json::from_value::<ProductPayload>(value)
                .map_err(|e| e.to_string())
                .and_then(|payload| Product::try_from(payload).map_err(|e| e.to_string()));
            match converted {
                Ok(product) => Some(product),
                Err(reason) => {
                    warn!(%reason, "Dropping malformed product record");
                    None
                }
            }
        })
        .collect()
}
