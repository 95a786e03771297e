//! Product Aggregate
//!
//! Products are owned by the backend. The client only ever holds read-only
//! snapshots of them, plus drafts that are validated before being sent.

use rust_decimal::Decimal;
use serde::Serialize;
use validator::{Validate, ValidationError};
use crate::domain::aggregates::category::Category;
use crate::domain::value_objects::{CategoryId, Money, ProductId};

#[derive(Clone, Debug, PartialEq)]
pub struct Product {
    id: ProductId,
    name: String,
    price: Decimal,
    stock_quantity: u32,
    category: Option<Category>,
}

impl Product {
    pub fn new(id: i64, name: impl Into<String>, price: Decimal, stock_quantity: u32) -> Result<Self, ProductError> {
        let name = name.into();
        if name.trim().is_empty() { return Err(ProductError::MissingName); }
        if price.is_sign_negative() && !price.is_zero() { return Err(ProductError::NegativePrice); }
        Ok(Self { id: ProductId::new(id), name, price, stock_quantity, category: None })
    }

    pub fn with_category(mut self, category: Category) -> Self {
        self.category = Some(category);
        self
    }

    pub fn id(&self) -> ProductId { self.id }
    pub fn name(&self) -> &str { &self.name }
    pub fn price(&self) -> Decimal { self.price }
    pub fn price_in(&self, currency: &str) -> Money { Money::new(self.price, currency) }
    pub fn stock_quantity(&self) -> u32 { self.stock_quantity }
    pub fn category(&self) -> Option<&Category> { self.category.as_ref() }
    pub fn is_in_stock(&self) -> bool { self.stock_quantity > 0 }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProductError { MissingField(&'static str), MissingName, NegativePrice }
impl std::error::Error for ProductError {}
impl std::fmt::Display for ProductError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::MissingField(field) => write!(f, "Missing field: {field}"),
            Self::MissingName => write!(f, "Missing name"),
            Self::NegativePrice => write!(f, "Negative price"),
        }
    }
}

/// Body of `POST /products` and `PUT /products/{id}`.
#[derive(Clone, Debug, Serialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct ProductDraft {
    #[validate(custom = "not_blank")]
    pub name: String,
    #[validate(custom = "non_negative")]
    pub price: Decimal,
    pub stock_quantity: u32,
    pub category_id: Option<CategoryId>,
}

impl ProductDraft {
    pub fn new(name: impl Into<String>, price: Decimal, stock_quantity: u32) -> Self {
        Self { name: name.into().trim().to_string(), price, stock_quantity, category_id: None }
    }

    pub fn in_category(mut self, category_id: CategoryId) -> Self {
        self.category_id = Some(category_id);
        self
    }
}

impl From<&Product> for ProductDraft {
    fn from(p: &Product) -> Self {
        Self {
            name: p.name.clone(),
            price: p.price,
            stock_quantity: p.stock_quantity,
            category_id: p.category.as_ref().map(|c| c.id()),
        }
    }
}

pub(crate) fn not_blank(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        let mut err = ValidationError::new("required");
        err.message = Some("name is required".into());
        return Err(err);
    }
    Ok(())
}

fn non_negative(value: &Decimal) -> Result<(), ValidationError> {
    if value.is_sign_negative() && !value.is_zero() {
        let mut err = ValidationError::new("range");
        err.message = Some("price must not be negative".into());
        return Err(err);
    }
    Ok(())
}
