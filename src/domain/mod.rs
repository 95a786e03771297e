//! Point-of-sale domain: catalog snapshots, the cart and sale payloads
pub mod aggregates;
pub mod events;
pub mod value_objects;

pub use aggregates::*;
pub use events::{Notice, NoticeLevel};
pub use value_objects::{CategoryId, Money, MoneyError, PaymentMethod, PaymentMethodError, ProductId};
