//! Sale Aggregate
//!
//! `SaleRequest` is what the counter submits; `SaleRecord` is what the
//! backend reports back for a closed sale.

use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Deserializer, Serialize};
use crate::domain::aggregates::cart::Cart;
use crate::domain::value_objects::{PaymentMethod, ProductId};

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SaleItem { pub product_id: ProductId, pub quantity: u32 }

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentEntry { pub amount_to_pay: Decimal, pub amount_paid: Decimal, pub payment_method: PaymentMethod }

/// Body of `POST /sales`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SaleRequest {
    pub items: Vec<SaleItem>,
    pub payments: Vec<PaymentEntry>,
}

impl SaleRequest {
    /// Single full payment of the cart total; split payments are not offered.
    pub fn from_cart(cart: &Cart, method: PaymentMethod) -> Self {
        let total = cart.total().amount();
        Self {
            items: cart.sale_items(),
            payments: vec![PaymentEntry { amount_to_pay: total, amount_paid: total, payment_method: method }],
        }
    }

    pub fn total(&self) -> Decimal { self.payments.iter().map(|p| p.amount_to_pay).sum() }
}

#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SaleRecordItem {
    pub product_id: ProductId,
    #[serde(default)]
    pub product_name_at_sale: String,
    pub quantity: u32,
    #[serde(default)]
    pub subtotal: Decimal,
}

#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SaleRecord {
    pub id: i64,
    #[serde(deserialize_with = "sale_timestamp")]
    pub date: DateTime<Utc>,
    pub total_amount: Decimal,
    #[serde(default)]
    pub items: Vec<SaleRecordItem>,
}

impl SaleRecord {
    pub fn items_sold(&self) -> u32 { self.items.iter().map(|i| i.quantity).sum() }
    pub fn day(&self) -> NaiveDate { self.date.date_naive() }
}

/// The backend emits either RFC 3339 or a zone-less local timestamp.
fn sale_timestamp<'de, D: Deserializer<'de>>(deserializer: D) -> Result<DateTime<Utc>, D::Error> {
    let raw = String::deserialize(deserializer)?;
    if let Ok(dt) = DateTime::parse_from_rfc3339(&raw) {
        return Ok(dt.with_timezone(&Utc));
    }
    NaiveDateTime::parse_from_str(&raw, "%Y-%m-%dT%H:%M:%S%.f")
        .map(|naive| naive.and_utc())
        .or_else(|_| NaiveDate::parse_from_str(&raw, "%Y-%m-%d").map(|d| d.and_time(NaiveTime::MIN).and_utc()))
        .map_err(serde::de::Error::custom)
}
