//! Sales report over a closed date range.

use chrono::{Duration, NaiveDate};
use rust_decimal::Decimal;
use thiserror::Error;
use crate::domain::{Money, SaleRecord};

pub const DEFAULT_REPORT_DAYS: i64 = 7;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ReportError {
    #[error("start date cannot be after end date ({start} > {end})")]
    InvalidRange { start: NaiveDate, end: NaiveDate },
}

/// Inclusive `[start, end]` day range.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ReportRange {
    start: NaiveDate,
    end: NaiveDate,
}

impl ReportRange {
    pub fn new(start: NaiveDate, end: NaiveDate) -> Result<Self, ReportError> {
        if start > end {
            return Err(ReportError::InvalidRange { start, end });
        }
        Ok(Self { start, end })
    }

    pub fn last_days(days: i64, today: NaiveDate) -> Self {
        let start = today - Duration::days(days.max(0));
        Self { start, end: today }
    }

    pub fn start(&self) -> NaiveDate { self.start }
    pub fn end(&self) -> NaiveDate { self.end }

    /// Query pair for `GET /reports`.
    pub fn query(&self) -> [(&'static str, String); 2] {
        [
            ("start", self.start.format("%Y-%m-%d").to_string()),
            ("end", self.end.format("%Y-%m-%d").to_string()),
        ]
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct SalesReport {
    pub range: ReportRange,
    pub sales: Vec<SaleRecord>,
    pub sale_count: usize,
    pub items_sold: u32,
    pub total: Decimal,
    pub average: Decimal,
}

impl SalesReport {
    pub fn from_sales(range: ReportRange, sales: Vec<SaleRecord>) -> Self {
        let total: Decimal = sales.iter().map(|s| s.total_amount).sum();
        let items_sold = sales.iter().map(SaleRecord::items_sold).sum();
        let average = if sales.is_empty() { Decimal::ZERO } else { total / Decimal::from(sales.len()) };
        Self { range, sale_count: sales.len(), items_sold, total, average, sales }
    }

    pub fn total_in(&self, currency: &str) -> Money { Money::new(self.total, currency) }
    pub fn average_in(&self, currency: &str) -> Money { Money::new(self.average, currency) }
}
