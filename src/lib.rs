//! OpenSASE POS
//!
//! Counter-side client of the OpenSASE point-of-sale backend.
//!
//! ## Features
//! - Debounced product search with stale-response suppression
//! - Cart bounded by product stock
//! - Single payment method checkout (cash, card, pix)
//! - Catalog administration calls (products, categories)
//! - Sales report over a date range

pub mod api;
pub mod composer;
pub mod config;
pub mod domain;
pub mod report;
pub mod search;

pub use api::{ApiError, CatalogApi, HttpCatalogApi};
pub use composer::{CheckoutError, SaleComposer, SalePhase, SaleSession};
pub use config::{Config, ConfigError};
pub use domain::{Cart, CartError, Money, Notice, NoticeLevel, PaymentMethod, Product, ProductId, SaleRequest};
pub use report::{ReportError, ReportRange, SalesReport};

use thiserror::Error;

// =============================================================================
// Error Types
// =============================================================================

#[derive(Error, Debug)]
pub enum PosError {
    #[error(transparent)]
    Api(#[from] ApiError),

    #[error(transparent)]
    Cart(#[from] CartError),

    #[error(transparent)]
    Checkout(#[from] CheckoutError),

    #[error(transparent)]
    Report(#[from] ReportError),

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("Invalid payment method: {0}")]
    PaymentMethod(#[from] domain::PaymentMethodError),
}

pub type Result<T> = std::result::Result<T, PosError>;
