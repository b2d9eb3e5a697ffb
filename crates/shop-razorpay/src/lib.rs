//! # shop-razorpay
//!
//! Razorpay payment gateway adapter for storefront-rs.
//!
//! This crate provides:
//!
//! - **`RazorpayConfig`** — env-driven configuration that only
//!   constructs when the gateway is genuinely usable (both keys set and
//!   not placeholders). A config error is the signal to degrade to the
//!   COD/QR payment path, never a fatal fault.
//! - **`RazorpayGateway`** — `shop_core::PaymentGateway` implementation:
//!   order creation over the Orders API, payment-signature verification
//!   via HMAC-SHA256.
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use shop_razorpay::RazorpayGateway;
//! use shop_core::BoxedGateway;
//! use std::sync::Arc;
//!
//! let gateway: Option<BoxedGateway> = match RazorpayGateway::from_env() {
//!     Ok(gateway) => Some(Arc::new(gateway)),
//!     Err(e) => {
//!         tracing::warn!("razorpay unavailable, online payments disabled: {e}");
//!         None
//!     }
//! };
//! ```

pub mod client;
pub mod config;
pub mod signature;

// Re-exports
pub use client::RazorpayGateway;
pub use config::RazorpayConfig;
pub use signature::{compute_signature, verify_signature};
