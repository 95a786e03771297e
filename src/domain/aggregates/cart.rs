//! Cart Aggregate
//!
//! In-memory lines of the sale being composed at the counter. Lines keep
//! insertion order and are keyed by product id. A line never holds zero
//! units and never more units than the product had in stock at the time of
//! the last add.

use crate::domain::aggregates::product::Product;
use crate::domain::aggregates::sale::SaleItem;
use crate::domain::value_objects::{Money, ProductId};

#[derive(Clone, Debug)]
pub struct Cart {
    lines: Vec<CartLine>,
    currency: String,
}

#[derive(Clone, Debug, PartialEq)]
pub struct CartLine {
    pub product_id: ProductId,
    pub name: String,
    pub quantity: u32,
    /// Price when the product was first added.
    pub unit_price: Money,
}

impl CartLine {
    pub fn subtotal(&self) -> Money { self.unit_price.multiply(self.quantity) }
}

/// Result of removing one unit from the cart.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum UnitRemoval {
    Decremented { remaining: u32 },
    LineRemoved,
    NotInCart,
}

impl Cart {
    pub fn new(currency: &str) -> Self {
        Self { lines: vec![], currency: currency.to_string() }
    }

    pub fn currency(&self) -> &str { &self.currency }
    pub fn lines(&self) -> &[CartLine] { &self.lines }
    pub fn line(&self, product_id: ProductId) -> Option<&CartLine> { self.lines.iter().find(|l| l.product_id == product_id) }
    pub fn line_count(&self) -> usize { self.lines.len() }
    pub fn unit_count(&self) -> u32 { self.lines.iter().map(|l| l.quantity).sum() }
    pub fn is_empty(&self) -> bool { self.lines.is_empty() }

    /// Adds one unit of `product`, bounded by its current stock.
    pub fn add_product(&mut self, product: &Product) -> Result<&CartLine, CartError> {
        let stock = product.stock_quantity();
        let idx = match self.lines.iter().position(|l| l.product_id == product.id()) {
            Some(idx) => {
                let line = &mut self.lines[idx];
                if line.quantity >= stock {
                    return Err(CartError::StockLimitReached { product_id: product.id(), stock });
                }
                line.quantity += 1;
                idx
            }
            None => {
                if stock == 0 { return Err(CartError::OutOfStock(product.id())); }
                self.lines.push(CartLine {
                    product_id: product.id(),
                    name: product.name().to_string(),
                    quantity: 1,
                    unit_price: product.price_in(&self.currency),
                });
                self.lines.len() - 1
            }
        };
        Ok(&self.lines[idx])
    }

    pub fn remove_one_unit(&mut self, product_id: ProductId) -> UnitRemoval {
        let Some(idx) = self.lines.iter().position(|l| l.product_id == product_id) else {
            return UnitRemoval::NotInCart;
        };
        let line = &mut self.lines[idx];
        line.quantity -= 1;
        if line.quantity == 0 {
            self.lines.remove(idx);
            UnitRemoval::LineRemoved
        } else {
            UnitRemoval::Decremented { remaining: line.quantity }
        }
    }

    pub fn clear(&mut self) { self.lines.clear(); }

    /// Sum of every line subtotal, recomputed on each call.
    pub fn total(&self) -> Money {
        self.lines.iter().fold(Money::zero(&self.currency), |acc, l| acc.add(&l.subtotal()).unwrap_or(acc))
    }

    pub fn sale_items(&self) -> Vec<SaleItem> {
        self.lines.iter().map(|l| SaleItem { product_id: l.product_id, quantity: l.quantity }).collect()
    }
}

impl Default for Cart { fn default() -> Self { Self::new("BRL") } }

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CartError {
    StockLimitReached { product_id: ProductId, stock: u32 },
    OutOfStock(ProductId),
}
impl std::error::Error for CartError {}
impl std::fmt::Display for CartError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::StockLimitReached { .. } => write!(f, "maximum stock quantity reached"),
            Self::OutOfStock(_) => write!(f, "product out of stock"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal::Decimal;

    fn product(id: i64, price: i64, stock: u32) -> Product {
        Product::new(id, format!("Product {id}"), Decimal::new(price, 0), stock).unwrap()
    }

    #[test]
    fn test_add_up_to_stock() {
        let mut cart = Cart::default();
        let p = product(1, 5, 2);
        cart.add_product(&p).unwrap();
        cart.add_product(&p).unwrap();
        assert_eq!(cart.line(p.id()).unwrap().quantity, 2);
        assert_eq!(cart.line(p.id()).unwrap().subtotal().amount(), Decimal::new(10, 0));
        assert_eq!(cart.add_product(&p), Err(CartError::StockLimitReached { product_id: p.id(), stock: 2 }));
        assert_eq!(cart.line(p.id()).unwrap().quantity, 2);
        assert_eq!(cart.line_count(), 1);
    }

    #[test]
    fn test_quantity_never_exceeds_stock() {
        for stock in 1..8u32 {
            let mut cart = Cart::default();
            let p = product(7, 3, stock);
            let accepted = (0..stock + 5).filter(|_| cart.add_product(&p).is_ok()).count() as u32;
            assert_eq!(accepted, stock);
            assert_eq!(cart.line(p.id()).unwrap().quantity, stock);
        }
    }

    #[test]
    fn test_out_of_stock_product_is_not_added() {
        let mut cart = Cart::default();
        assert_eq!(cart.add_product(&product(3, 1, 0)), Err(CartError::OutOfStock(ProductId::new(3))));
        assert!(cart.is_empty());
    }

    #[test]
    fn test_stock_shrink_blocks_further_adds() {
        let mut cart = Cart::default();
        for _ in 0..3 { cart.add_product(&product(1, 2, 5)).unwrap(); }
        assert!(cart.add_product(&product(1, 2, 3)).is_err());
        assert_eq!(cart.unit_count(), 3);
    }

    #[test]
    fn test_price_snapshot_kept_on_increment() {
        let mut cart = Cart::default();
        cart.add_product(&product(1, 5, 9)).unwrap();
        cart.add_product(&product(1, 6, 9)).unwrap();
        let line = cart.line(ProductId::new(1)).unwrap();
        assert_eq!(line.unit_price.amount(), Decimal::new(5, 0));
        assert_eq!(cart.total().amount(), Decimal::new(10, 0));
    }

    #[test]
    fn test_remove_until_gone() {
        let mut cart = Cart::default();
        let p = product(1, 5, 3);
        for _ in 0..3 { cart.add_product(&p).unwrap(); }
        assert_eq!(cart.remove_one_unit(p.id()), UnitRemoval::Decremented { remaining: 2 });
        assert_eq!(cart.remove_one_unit(p.id()), UnitRemoval::Decremented { remaining: 1 });
        assert_eq!(cart.remove_one_unit(p.id()), UnitRemoval::LineRemoved);
        assert!(cart.line(p.id()).is_none());
        assert_eq!(cart.remove_one_unit(p.id()), UnitRemoval::NotInCart);
        assert!(cart.is_empty());
    }

    #[test]
    fn test_total_tracks_mutations() {
        let mut cart = Cart::default();
        let a = product(1, 5, 10);
        let b = Product::new(2, "Suco", Decimal::new(725, 2), 10).unwrap();
        cart.add_product(&a).unwrap();
        cart.add_product(&b).unwrap();
        cart.add_product(&b).unwrap();
        cart.remove_one_unit(a.id());
        let expected = cart.lines().iter().map(|l| l.unit_price.amount() * Decimal::from(l.quantity)).sum::<Decimal>();
        assert_eq!(cart.total().amount(), expected);
        assert_eq!(cart.total().amount(), Decimal::new(1450, 2));
        cart.clear();
        assert_eq!(cart.total().amount(), Decimal::ZERO);
    }

    #[test]
    fn test_lines_keep_insertion_order() {
        let mut cart = Cart::default();
        for id in [3, 1, 2] { cart.add_product(&product(id, 1, 5)).unwrap(); }
        cart.add_product(&product(1, 1, 5)).unwrap();
        let ids: Vec<i64> = cart.lines().iter().map(|l| l.product_id.value()).collect();
        assert_eq!(ids, vec![3, 1, 2]);
    }
}
