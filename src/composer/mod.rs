//! Sale Composer
//!
//! State of the sale being assembled at the counter: search box, cart,
//! payment method and the submission guard. Every operation is a plain
//! state transition so the whole workflow can be exercised without a
//! network or a screen. [`SaleSession`] adds the async side.
//!
//! ```text
//!   IDLE ──add──▶ BUILDING ──pay──▶ READY ──submit──▶ SUBMITTING
//!    ▲               │                 │                 │   │
//!    └──cancel/empty─┴─────────────────┘      failure ◀──┘   │
//!    └────────────────────────── success ────────────────────┘
//! ```

mod session;

use thiserror::Error;
use tracing::{error, info, warn};
use uuid::Uuid;
use crate::api::ApiError;
use crate::domain::{Cart, CartError, Money, Notice, PaymentMethod, Product, ProductId, SaleRequest, UnitRemoval};
use crate::search::{SearchCommand, SearchState};

pub use session::SaleSession;

pub const SALE_COMPLETED: &str = "sale completed";
pub const SALE_FAILED: &str = "failed to complete the sale";

#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum CheckoutError {
    #[error("no product added to the sale")]
    EmptyCart,

    #[error("select a payment method")]
    NoPaymentMethod,

    #[error("a sale is already being submitted")]
    AlreadySubmitting,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SalePhase {
    Idle,
    Building,
    Ready,
    Submitting,
}

#[derive(Debug)]
pub struct SaleComposer {
    session_id: Uuid,
    cart: Cart,
    payment: Option<PaymentMethod>,
    search: SearchState,
    submitting: bool,
    notices: Vec<Notice>,
}

impl SaleComposer {
    pub fn new(currency: &str) -> Self {
        Self {
            session_id: Uuid::now_v7(),
            cart: Cart::new(currency),
            payment: None,
            search: SearchState::default(),
            submitting: false,
            notices: vec![],
        }
    }

    pub fn session_id(&self) -> Uuid { self.session_id }
    pub fn cart(&self) -> &Cart { &self.cart }
    pub fn payment_method(&self) -> Option<PaymentMethod> { self.payment }
    pub fn search(&self) -> &SearchState { &self.search }
    pub fn total(&self) -> Money { self.cart.total() }
    pub fn is_submitting(&self) -> bool { self.submitting }

    pub fn phase(&self) -> SalePhase {
        if self.submitting {
            SalePhase::Submitting
        } else if self.cart.is_empty() {
            SalePhase::Idle
        } else if self.payment.is_some() {
            SalePhase::Ready
        } else {
            SalePhase::Building
        }
    }

    /// Whether the submit trigger should be enabled.
    pub fn can_submit(&self) -> bool { !self.submitting }

    pub fn type_query(&mut self, query: &str) -> SearchCommand { self.search.input(query) }

    pub fn apply_search(&mut self, seq: u64, result: Result<Vec<Product>, ApiError>) -> bool {
        self.search.apply(seq, result)
    }

    /// Adds one unit of `product`. A successful pick resets the search box.
    pub fn add_product(&mut self, product: &Product) -> Result<(), CartError> {
        match self.cart.add_product(product) {
            Ok(line) => {
                info!(session = %self.session_id, product_id = %line.product_id, quantity = line.quantity, "Added to cart");
                self.search.reset();
                Ok(())
            }
            Err(e) => {
                warn!(session = %self.session_id, product_id = %product.id(), error = %e, "Add rejected");
                self.notices.push(Notice::warning(e.to_string()));
                Err(e)
            }
        }
    }

    pub fn remove_one_unit(&mut self, product_id: ProductId) -> UnitRemoval {
        let outcome = self.cart.remove_one_unit(product_id);
        if outcome != UnitRemoval::NotInCart {
            info!(session = %self.session_id, %product_id, ?outcome, "Removed one unit");
        }
        outcome
    }

    /// Selects `method`, or clears the selection when it is already active.
    pub fn toggle_payment_method(&mut self, method: PaymentMethod) -> Option<PaymentMethod> {
        self.payment = if self.payment == Some(method) { None } else { Some(method) };
        self.payment
    }

    pub fn cancel_sale(&mut self) {
        self.cart.clear();
        self.payment = None;
    }

    /// Validates the sale and arms the submission guard. The caller sends
    /// the returned request and reports back through [`Self::finish_submit`].
    pub fn begin_submit(&mut self) -> Result<SaleRequest, CheckoutError> {
        let checked = if self.submitting {
            Err(CheckoutError::AlreadySubmitting)
        } else if self.cart.is_empty() {
            Err(CheckoutError::EmptyCart)
        } else {
            self.payment.ok_or(CheckoutError::NoPaymentMethod)
        };
        let method = match checked {
            Ok(method) => method,
            Err(e) => {
                warn!(session = %self.session_id, error = %e, "Checkout rejected");
                self.notices.push(Notice::error(e.to_string()));
                return Err(e);
            }
        };
        self.submitting = true;
        Ok(SaleRequest::from_cart(&self.cart, method))
    }

    /// Returns whether the sale went through. On failure the cart and the
    /// payment method are left as they were so the operator can retry.
    pub fn finish_submit(&mut self, result: Result<(), ApiError>) -> bool {
        self.submitting = false;
        match result {
            Ok(()) => {
                info!(session = %self.session_id, total = %self.cart.total(), "Sale completed");
                self.notices.push(Notice::success(SALE_COMPLETED));
                self.cancel_sale();
                true
            }
            Err(e) => {
                error!(session = %self.session_id, error = %e, "Sale submission failed");
                self.notices.push(Notice::error(SALE_FAILED));
                false
            }
        }
    }

    pub fn take_notices(&mut self) -> Vec<Notice> { std::mem::take(&mut self.notices) }
}

impl Default for SaleComposer {
    fn default() -> Self { Self::new(crate::config::DEFAULT_CURRENCY) }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::NoticeLevel;
    use rust_decimal::Decimal;

    fn product(id: i64, price: i64, stock: u32) -> Product {
        Product::new(id, format!("Product {id}"), Decimal::new(price, 0), stock).unwrap()
    }

    #[test]
    fn test_add_twice_then_reject() {
        let mut composer = SaleComposer::default();
        let p = product(1, 5, 2);
        composer.add_product(&p).unwrap();
        composer.add_product(&p).unwrap();
        assert_eq!(composer.add_product(&p), Err(CartError::StockLimitReached { product_id: p.id(), stock: 2 }));
        let line = composer.cart().line(p.id()).unwrap();
        assert_eq!(line.quantity, 2);
        assert_eq!(line.subtotal().amount(), Decimal::new(10, 0));
        let notices = composer.take_notices();
        assert_eq!(notices, vec![Notice::warning("maximum stock quantity reached")]);
        assert!(composer.take_notices().is_empty());
    }

    #[test]
    fn test_pick_resets_search() {
        let mut composer = SaleComposer::default();
        let SearchCommand::Schedule { seq, .. } = composer.type_query("cox") else { panic!("expected schedule") };
        let p = product(1, 5, 2);
        assert!(composer.apply_search(seq, Ok(vec![p.clone()])));
        composer.add_product(&p).unwrap();
        assert_eq!(composer.search().query(), "");
        assert!(composer.search().results().is_empty());
    }

    #[test]
    fn test_rejected_pick_keeps_search() {
        let mut composer = SaleComposer::default();
        let p = product(1, 5, 1);
        composer.add_product(&p).unwrap();
        let SearchCommand::Schedule { seq, .. } = composer.type_query("prod") else { panic!("expected schedule") };
        composer.apply_search(seq, Ok(vec![p.clone()]));
        assert!(composer.add_product(&p).is_err());
        assert_eq!(composer.search().results().len(), 1);
    }

    #[test]
    fn test_toggle_payment_method() {
        let mut composer = SaleComposer::default();
        assert_eq!(composer.toggle_payment_method(PaymentMethod::Cash), Some(PaymentMethod::Cash));
        assert_eq!(composer.toggle_payment_method(PaymentMethod::Pix), Some(PaymentMethod::Pix));
        assert_eq!(composer.toggle_payment_method(PaymentMethod::Pix), None);
    }

    #[test]
    fn test_phases() {
        let mut composer = SaleComposer::default();
        assert_eq!(composer.phase(), SalePhase::Idle);
        let p = product(1, 5, 3);
        composer.add_product(&p).unwrap();
        assert_eq!(composer.phase(), SalePhase::Building);
        composer.toggle_payment_method(PaymentMethod::Card);
        assert_eq!(composer.phase(), SalePhase::Ready);
        composer.add_product(&p).unwrap();
        composer.remove_one_unit(p.id());
        assert_eq!(composer.phase(), SalePhase::Ready);
        composer.begin_submit().unwrap();
        assert_eq!(composer.phase(), SalePhase::Submitting);
        assert!(!composer.can_submit());
        composer.finish_submit(Err(ApiError::Status { status: 503, body: String::new() }));
        assert_eq!(composer.phase(), SalePhase::Ready);
        composer.remove_one_unit(p.id());
        assert_eq!(composer.phase(), SalePhase::Idle);
    }

    #[test]
    fn test_cancel_is_idempotent() {
        let mut composer = SaleComposer::default();
        composer.add_product(&product(1, 5, 3)).unwrap();
        composer.toggle_payment_method(PaymentMethod::Pix);
        composer.cancel_sale();
        let once = (composer.cart().line_count(), composer.payment_method(), composer.total());
        composer.cancel_sale();
        assert_eq!((composer.cart().line_count(), composer.payment_method(), composer.total()), once);
        assert_eq!(once, (0, None, Money::brl(Decimal::ZERO)));
    }

    #[test]
    fn test_submit_rejections() {
        let mut composer = SaleComposer::default();
        composer.toggle_payment_method(PaymentMethod::Cash);
        assert_eq!(composer.begin_submit(), Err(CheckoutError::EmptyCart));
        composer.toggle_payment_method(PaymentMethod::Cash);
        composer.add_product(&product(1, 5, 3)).unwrap();
        composer.add_product(&product(1, 5, 3)).unwrap();
        assert_eq!(composer.begin_submit(), Err(CheckoutError::NoPaymentMethod));
        assert!(!composer.is_submitting());
        let messages: Vec<String> = composer.take_notices().into_iter().map(|n| n.message).collect();
        assert_eq!(messages, vec!["no product added to the sale", "select a payment method"]);
    }

    #[test]
    fn test_duplicate_submit_guarded() {
        let mut composer = SaleComposer::default();
        composer.add_product(&product(1, 10, 3)).unwrap();
        composer.toggle_payment_method(PaymentMethod::Pix);
        assert!(composer.begin_submit().is_ok());
        assert_eq!(composer.begin_submit(), Err(CheckoutError::AlreadySubmitting));
    }

    #[test]
    fn test_successful_submit_clears() {
        let mut composer = SaleComposer::default();
        composer.add_product(&product(1, 10, 3)).unwrap();
        composer.toggle_payment_method(PaymentMethod::Pix);
        let request = composer.begin_submit().unwrap();
        assert_eq!(request.payments[0].payment_method, PaymentMethod::Pix);
        assert_eq!(request.payments[0].amount_paid, Decimal::new(10, 0));
        assert!(composer.finish_submit(Ok(())));
        assert!(composer.cart().is_empty());
        assert_eq!(composer.payment_method(), None);
        assert_eq!(composer.take_notices()[0].level, NoticeLevel::Success);
    }

    #[test]
    fn test_failed_submit_preserves_state() {
        let mut composer = SaleComposer::default();
        composer.add_product(&product(1, 10, 3)).unwrap();
        composer.toggle_payment_method(PaymentMethod::Card);
        let first = composer.begin_submit().unwrap();
        assert!(!composer.finish_submit(Err(ApiError::Status { status: 500, body: "down".into() })));
        assert_eq!(composer.cart().unit_count(), 1);
        assert_eq!(composer.payment_method(), Some(PaymentMethod::Card));
        assert_eq!(composer.take_notices(), vec![Notice::error(SALE_FAILED)]);
        assert_eq!(composer.begin_submit().unwrap(), first);
    }
}
