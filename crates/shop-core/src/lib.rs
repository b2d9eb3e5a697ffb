//! # shop-core
//!
//! Core types and checkout orchestration for storefront-rs.
//!
//! This crate provides:
//! - `Cart`, `CartEntry` and the `CartStore` trait for the session cart
//! - `pricing` for decimal-exact totals and paise conversion
//! - `PaymentGateway` trait for payment providers
//! - `Checkout` — the orchestrator deciding which payment path runs
//! - `CheckoutError` for typed error handling
//!
//! ## Example
//!
//! ```rust,ignore
//! use shop_core::{Cart, Checkout, DirectTransfer, PaymentMethod, PaymentSubmission};
//!
//! // Resolve capabilities once at startup
//! let checkout = Checkout::new(gateway, qr_renderer, DirectTransfer::new(upi_id, "Ecommerce"));
//!
//! // Per request: enter the payment step
//! let page = checkout.payment_page(&cart, user_id.as_deref()).await?;
//!
//! // On submission: conclude it
//! let method = checkout.confirm(&cart_store, &submission).await?;
//! ```

pub mod cart;
pub mod checkout;
pub mod error;
pub mod gateway;
pub mod method;
pub mod pricing;
pub mod product;

// Re-exports for convenience
pub use cart::{clamp_quantity, Cart, CartEntry, CartStore, MAX_QUANTITY, MIN_QUANTITY};
pub use checkout::{
    BoxedQrRenderer, Checkout, DirectTransfer, PaymentPage, PaymentSubmission, QrRenderer,
    FALLBACK_PAYEE_ID,
};
pub use error::{CheckoutError, CheckoutResult};
pub use gateway::{BoxedGateway, PaymentConfirmation, PaymentGateway, PaymentIntent, CURRENCY};
pub use method::PaymentMethod;
pub use pricing::{compute_total, minor_units};
pub use product::{Category, Product, ProductCatalog};
