//! Shipping, tax, and total computation.
//!
//! Pure and deterministic: the same subtotal always quotes the same numbers.
//! Orders store the quoted values at creation time, so this module is only
//! consulted at quote time and at order creation - historical orders are
//! never re-derived.

use rust_decimal::{Decimal, RoundingStrategy};
use rust_decimal_macros::dec;
use serde::Serialize;

/// Orders at or above this subtotal ship free.
pub const FREE_SHIPPING_THRESHOLD: Decimal = dec!(100.00);

/// Flat shipping cost below the free-shipping threshold (USD).
pub const FLAT_SHIPPING: Decimal = dec!(9.99);

/// Flat tax rate. No jurisdiction logic.
pub const TAX_RATE: Decimal = dec!(0.08);

/// Computed price breakdown for a cart subtotal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Quote {
    pub subtotal: Decimal,
    pub shipping: Decimal,
    pub tax: Decimal,
    pub total: Decimal,
}

/// Quote shipping, tax, and total for a subtotal.
///
/// Tax is rounded to cents (midpoint away from zero) so the stored value
/// matches what the shopper was shown.
#[must_use]
pub fn quote(subtotal: Decimal) -> Quote {
    let shipping = if subtotal >= FREE_SHIPPING_THRESHOLD {
        Decimal::ZERO
    } else {
        FLAT_SHIPPING
    };
    let tax = (subtotal * TAX_RATE)
        .round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);

    Quote {
        subtotal,
        shipping,
        tax,
        total: subtotal + shipping + tax,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn just_below_threshold_pays_flat_shipping() {
        assert_eq!(quote(dec!(99.99)).shipping, dec!(9.99));
    }

    #[test]
    fn threshold_and_above_ship_free() {
        assert_eq!(quote(dec!(100.00)).shipping, Decimal::ZERO);
        assert_eq!(quote(dec!(250.50)).shipping, Decimal::ZERO);
    }

    #[test]
    fn fifty_dollar_cart() {
        let q = quote(dec!(50.00));
        assert_eq!(q.tax, dec!(4.00));
        assert_eq!(q.shipping, dec!(9.99));
        assert_eq!(q.total, dec!(63.99));
    }

    #[test]
    fn one_twenty_cart_matches_checkout_expectation() {
        let q = quote(dec!(120.00));
        assert_eq!(q.shipping, Decimal::ZERO);
        assert_eq!(q.tax, dec!(9.60));
        assert_eq!(q.total, dec!(129.60));
    }

    #[test]
    fn tax_rounds_to_cents() {
        // 19.99 * 0.08 = 1.5992 -> 1.60
        assert_eq!(quote(dec!(19.99)).tax, dec!(1.60));
        // 0.06 * 0.08 = 0.0048 -> 0.00
        assert_eq!(quote(dec!(0.06)).tax, dec!(0.00));
    }

    #[test]
    fn zero_subtotal_quotes_flat_shipping_only() {
        let q = quote(Decimal::ZERO);
        assert_eq!(q.tax, Decimal::ZERO);
        assert_eq!(q.total, FLAT_SHIPPING);
    }

    #[test]
    fn quote_is_deterministic() {
        assert_eq!(quote(dec!(73.21)), quote(dec!(73.21)));
    }
}
