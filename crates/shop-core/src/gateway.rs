//! # Payment Gateway Seam
//!
//! Trait boundary between the checkout orchestrator and whichever payment
//! provider backs online payments. The orchestrator holds an
//! `Option<BoxedGateway>` resolved once at startup — `None` means every
//! request degrades to the COD/QR path without touching the provider.

use crate::error::CheckoutResult;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// The only currency this storefront charges in.
pub const CURRENCY: &str = "INR";

/// A gateway-side payment intent ("order" in Razorpay terms).
///
/// Created transiently per payment-page view; reloading the page creates
/// a fresh one. Never persisted locally.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PaymentIntent {
    /// Provider's order id (e.g. `order_EKwxwAgItmmXdp`)
    pub id: String,

    /// Amount in minor units (paise)
    pub amount: i64,

    /// ISO currency code, always `"INR"` here
    pub currency: String,

    /// Receipt reference we handed the provider
    pub receipt: String,

    /// When the provider created the intent
    pub created_at: DateTime<Utc>,
}

/// Client-supplied proof that an external payment flow completed.
///
/// All three fields are opaque until `verify_signature` accepts them.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PaymentConfirmation {
    pub payment_id: String,
    pub order_id: String,
    pub signature: String,
}

/// A payment provider capable of creating intents and verifying
/// completed payments.
#[async_trait]
pub trait PaymentGateway: Send + Sync {
    /// Create a payment intent for `amount` minor units.
    ///
    /// Any error here is caught at the orchestrator and degrades the
    /// payment page to the unconfigured path; it must never surface as a
    /// hard fault to the customer.
    async fn create_intent(
        &self,
        amount: i64,
        currency: &str,
        receipt: &str,
    ) -> CheckoutResult<PaymentIntent>;

    /// Verify a payment confirmation's signature.
    ///
    /// Returns `Ok(())` for an authentic confirmation,
    /// `Err(SignatureInvalid)` for a mismatch, and `Err(Verification)`
    /// for anything that stopped the check from producing a clean answer.
    async fn verify_signature(&self, confirmation: &PaymentConfirmation) -> CheckoutResult<()>;

    /// Public key identifier handed to the client for its checkout widget.
    fn key_id(&self) -> &str;

    /// Provider name (for logging)
    fn provider_name(&self) -> &'static str;
}

/// Type alias for a shared gateway (dynamic dispatch)
pub type BoxedGateway = Arc<dyn PaymentGateway>;
