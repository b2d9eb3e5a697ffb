//! # Cart Types
//!
//! Session-scoped shopping cart for storefront-rs.
//!
//! The cart itself is plain data keyed by product id; where it lives
//! (the session) is behind the [`CartStore`] trait so the orchestrator
//! never touches session infrastructure directly.

use crate::error::CheckoutResult;
use crate::product::Product;
use async_trait::async_trait;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Quantity bounds enforced on every cart mutation.
pub const MIN_QUANTITY: u32 = 1;
pub const MAX_QUANTITY: u32 = 10;

/// A single cart line: price snapshotted at add time, never re-fetched
/// from the catalog on checkout.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CartEntry {
    /// Product name (denormalized for display)
    pub name: String,

    /// Unit price in rupees at the time the item was added
    pub unit_price: Decimal,

    /// Quantity, always within `[MIN_QUANTITY, MAX_QUANTITY]`
    pub quantity: u32,
}

impl CartEntry {
    /// Line total (unit price × quantity), decimal-exact
    pub fn total(&self) -> Decimal {
        self.unit_price * Decimal::from(self.quantity)
    }
}

/// Clamp a requested quantity into the allowed range.
pub fn clamp_quantity(requested: u32) -> u32 {
    requested.clamp(MIN_QUANTITY, MAX_QUANTITY)
}

/// The session cart: product id → entry.
///
/// `BTreeMap` keeps listings stable across requests; insertion order
/// carries no meaning.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Cart {
    #[serde(default)]
    entries: BTreeMap<String, CartEntry>,
}

impl Cart {
    /// Create an empty cart
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a product, snapshotting its name and price.
    ///
    /// The requested quantity is clamped to `[1, 10]`; adding a product
    /// already in the cart merges quantities, capped at 10 so the
    /// invariant survives repeated adds.
    pub fn add(&mut self, product: &Product, quantity: u32) {
        let quantity = clamp_quantity(quantity);
        match self.entries.get_mut(&product.id) {
            Some(entry) => {
                entry.quantity = (entry.quantity + quantity).min(MAX_QUANTITY);
            }
            None => {
                self.entries.insert(
                    product.id.clone(),
                    CartEntry {
                        name: product.name.clone(),
                        unit_price: product.price,
                        quantity,
                    },
                );
            }
        }
    }

    /// Remove a product entirely. Removing an absent id is a no-op.
    pub fn remove(&mut self, product_id: &str) -> Option<CartEntry> {
        self.entries.remove(product_id)
    }

    /// Look up an entry by product id
    pub fn get(&self, product_id: &str) -> Option<&CartEntry> {
        self.entries.get(product_id)
    }

    /// Iterate over (product id, entry) pairs
    pub fn iter(&self) -> impl Iterator<Item = (&String, &CartEntry)> {
        self.entries.iter()
    }

    /// Check if the cart has no entries
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Number of distinct products
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Total number of units across all entries
    pub fn item_count(&self) -> u32 {
        self.entries.values().map(|e| e.quantity).sum()
    }
}

/// Read/write/clear access to the session-scoped cart.
///
/// Implemented by the HTTP layer over its session infrastructure; the
/// orchestrator only ever sees this interface. `clear` must replace the
/// whole cart in one write.
#[async_trait]
pub trait CartStore: Send + Sync {
    /// Load the cart, creating an empty one on first access
    async fn load(&self) -> CheckoutResult<Cart>;

    /// Persist the whole cart as one unit
    async fn save(&self, cart: &Cart) -> CheckoutResult<()>;

    /// Drop the cart. Called exactly once per successful checkout.
    async fn clear(&self) -> CheckoutResult<()>;
}
