//! # Pricing
//!
//! Reduces a cart to a total. All arithmetic is `Decimal`; amounts only
//! become integer minor units at the gateway boundary.

use crate::cart::Cart;
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};

/// Compute the cart total: Σ(unit price × quantity).
///
/// Pure reduction; an empty cart yields zero.
pub fn compute_total(cart: &Cart) -> Decimal {
    cart.iter().map(|(_, entry)| entry.total()).sum()
}

/// Convert a rupee total to integer paise: round(total × 100).
///
/// Midpoint rounds away from zero, so a 3-decimal total like 10.005
/// becomes 1001 paise rather than silently under-charging.
pub fn minor_units(total: Decimal) -> i64 {
    (total * Decimal::ONE_HUNDRED)
        .round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero)
        .to_i64()
        .unwrap_or(0)
}
