//! Cart line model.
//!
//! `CartLines` is the single cart representation shared by both sides of the
//! reconciliation engine: the anonymous cart (serialized into the session as
//! a JSON array of `{product_id, quantity}`) and the persisted cart (rows in
//! `cart_item`, one per `(user, product)` pair). Keeping the mutation rules
//! here means both modes behave identically and can be tested without a
//! database.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::types::ProductId;

/// One product/quantity pair in a cart.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartLine {
    pub product_id: ProductId,
    pub quantity: u32,
}

/// An ordered set of cart lines with at most one line per product.
///
/// Insertion order is preserved so a cart renders stably while the shopper
/// edits quantities.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CartLines(Vec<CartLine>);

impl CartLines {
    /// Empty cart.
    #[must_use]
    pub const fn new() -> Self {
        Self(Vec::new())
    }

    /// Add `quantity` of a product, incrementing the existing line if the
    /// product is already present. Never creates a duplicate line.
    pub fn add(&mut self, product_id: ProductId, quantity: u32) {
        match self.0.iter_mut().find(|l| l.product_id == product_id) {
            Some(line) => line.quantity = line.quantity.saturating_add(quantity),
            None => self.0.push(CartLine {
                product_id,
                quantity,
            }),
        }
    }

    /// Set the absolute quantity for a product. A quantity of zero removes
    /// the line entirely; setting a quantity for an absent product inserts
    /// it.
    pub fn set_quantity(&mut self, product_id: ProductId, quantity: u32) {
        if quantity == 0 {
            self.remove(product_id);
            return;
        }
        match self.0.iter_mut().find(|l| l.product_id == product_id) {
            Some(line) => line.quantity = quantity,
            None => self.0.push(CartLine {
                product_id,
                quantity,
            }),
        }
    }

    /// Remove the line for a product, if present.
    pub fn remove(&mut self, product_id: ProductId) {
        self.0.retain(|l| l.product_id != product_id);
    }

    /// Empty the cart.
    pub fn clear(&mut self) {
        self.0.clear();
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Sum of all line quantities.
    #[must_use]
    pub fn item_count(&self) -> u64 {
        self.0.iter().map(|l| u64::from(l.quantity)).sum()
    }

    /// Sum of `price x quantity` over all lines whose product resolves.
    ///
    /// Lines whose product cannot be resolved (deleted since the line was
    /// added) contribute zero rather than erroring.
    #[must_use]
    pub fn subtotal<F>(&self, price_of: F) -> Decimal
    where
        F: Fn(ProductId) -> Option<Decimal>,
    {
        self.0
            .iter()
            .filter_map(|l| price_of(l.product_id).map(|p| p * Decimal::from(l.quantity)))
            .sum()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, CartLine> {
        self.0.iter()
    }
}

impl<'a> IntoIterator for &'a CartLines {
    type Item = &'a CartLine;
    type IntoIter = std::slice::Iter<'a, CartLine>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

impl FromIterator<CartLine> for CartLines {
    fn from_iter<T: IntoIterator<Item = CartLine>>(iter: T) -> Self {
        let mut lines = Self::new();
        for line in iter {
            lines.add(line.product_id, line.quantity);
        }
        lines
    }
}

/// How a local (anonymous) line is folded into a pre-existing persisted line
/// for the same product during merge-on-login.
///
/// The original behavior is `Replace`: the local quantity overwrites the
/// server quantity. That loses any quantity the user accumulated on another
/// device, which may not be intended, so the strategy is configurable
/// (`CART_MERGE_STRATEGY`) rather than silently "fixed".
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MergeStrategy {
    /// Local quantity wins over the persisted quantity.
    #[default]
    Replace,
    /// Local and persisted quantities are summed.
    Add,
}

impl MergeStrategy {
    /// Quantity a persisted line ends up with after merging a local line.
    #[must_use]
    pub fn merged_quantity(self, existing: u32, incoming: u32) -> u32 {
        match self {
            Self::Replace => incoming,
            Self::Add => existing.saturating_add(incoming),
        }
    }
}

impl std::str::FromStr for MergeStrategy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "replace" => Ok(Self::Replace),
            "add" => Ok(Self::Add),
            _ => Err(format!("invalid merge strategy: {s} (expected replace|add)")),
        }
    }
}

#[cfg(test)]
mod tests {
    use rust_decimal_macros::dec;

    use super::*;

    fn pid() -> ProductId {
        ProductId::generate()
    }

    #[test]
    fn add_accumulates_per_product_regardless_of_order() {
        let p1 = pid();
        let p2 = pid();

        let mut forward = CartLines::new();
        forward.add(p1, 2);
        forward.add(p2, 1);
        forward.add(p1, 3);

        let mut shuffled = CartLines::new();
        shuffled.add(p1, 3);
        shuffled.add(p1, 2);
        shuffled.add(p2, 1);

        for cart in [&forward, &shuffled] {
            assert_eq!(cart.len(), 2);
            let q1 = cart.iter().find(|l| l.product_id == p1).map(|l| l.quantity);
            let q2 = cart.iter().find(|l| l.product_id == p2).map(|l| l.quantity);
            assert_eq!(q1, Some(5));
            assert_eq!(q2, Some(1));
        }
    }

    #[test]
    fn set_quantity_zero_equals_remove() {
        let p = pid();

        let mut via_set = CartLines::new();
        via_set.add(p, 4);
        via_set.set_quantity(p, 0);

        let mut via_remove = CartLines::new();
        via_remove.add(p, 4);
        via_remove.remove(p);

        assert_eq!(via_set, via_remove);
        assert!(via_set.is_empty());
    }

    #[test]
    fn set_quantity_is_absolute_not_additive() {
        let p = pid();
        let mut cart = CartLines::new();
        cart.add(p, 2);
        cart.set_quantity(p, 7);
        assert_eq!(cart.item_count(), 7);
    }

    #[test]
    fn item_count_sums_quantities() {
        let mut cart = CartLines::new();
        cart.add(pid(), 2);
        cart.add(pid(), 5);
        assert_eq!(cart.item_count(), 7);
    }

    #[test]
    fn subtotal_treats_unresolved_products_as_zero() {
        let known = pid();
        let deleted = pid();
        let mut cart = CartLines::new();
        cart.add(known, 3);
        cart.add(deleted, 2);

        let subtotal = cart.subtotal(|id| (id == known).then(|| dec!(19.99)));
        assert_eq!(subtotal, dec!(59.97));
    }

    #[test]
    fn clear_empties_everything() {
        let mut cart = CartLines::new();
        cart.add(pid(), 1);
        cart.add(pid(), 2);
        cart.clear();
        assert!(cart.is_empty());
        assert_eq!(cart.item_count(), 0);
    }

    #[test]
    fn from_iter_collapses_duplicate_products() {
        let p = pid();
        let cart: CartLines = [
            CartLine {
                product_id: p,
                quantity: 1,
            },
            CartLine {
                product_id: p,
                quantity: 2,
            },
        ]
        .into_iter()
        .collect();
        assert_eq!(cart.len(), 1);
        assert_eq!(cart.item_count(), 3);
    }

    #[test]
    fn serializes_as_plain_array() {
        let p = pid();
        let mut cart = CartLines::new();
        cart.add(p, 2);

        let json = serde_json::to_value(&cart).expect("serialize");
        assert_eq!(
            json,
            serde_json::json!([{ "product_id": p, "quantity": 2 }])
        );

        let back: CartLines = serde_json::from_value(json).expect("deserialize");
        assert_eq!(back, cart);
    }

    #[test]
    fn merge_strategy_replace_overwrites() {
        assert_eq!(MergeStrategy::Replace.merged_quantity(3, 2), 2);
    }

    #[test]
    fn merge_strategy_add_sums() {
        assert_eq!(MergeStrategy::Add.merged_quantity(3, 2), 5);
    }

    #[test]
    fn merge_strategy_parses_from_config_values() {
        assert_eq!("replace".parse::<MergeStrategy>(), Ok(MergeStrategy::Replace));
        assert_eq!("add".parse::<MergeStrategy>(), Ok(MergeStrategy::Add));
        assert!("sum".parse::<MergeStrategy>().is_err());
    }
}
