//! Aggregates module
pub mod product;
pub mod category;
pub mod cart;
pub mod sale;

pub use product::{Product, ProductDraft, ProductError};
pub use category::{Category, CategoryDraft};
pub use cart::{Cart, CartError, CartLine, UnitRemoval};
pub use sale::{PaymentEntry, SaleItem, SaleRecord, SaleRecordItem, SaleRequest};
