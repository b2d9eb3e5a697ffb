//! # Razorpay Gateway Client
//!
//! Implementation of the Razorpay Orders API and payment-signature
//! verification behind the `PaymentGateway` trait.

use crate::config::RazorpayConfig;
use crate::signature;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use shop_core::{
    CheckoutError, CheckoutResult, PaymentConfirmation, PaymentGateway, PaymentIntent,
};
use tracing::{debug, error, info, instrument};

/// Gateway calls that hang past this are treated as failures and
/// degrade to the fallback payment path.
const REQUEST_TIMEOUT_SECS: u64 = 10;

/// Razorpay payment gateway
///
/// Creates orders (payment intents) over the Orders API and verifies
/// completed payments locally via HMAC.
pub struct RazorpayGateway {
    config: RazorpayConfig,
    client: Client,
}

impl RazorpayGateway {
    /// Create a new gateway from a validated config
    pub fn new(config: RazorpayConfig) -> CheckoutResult<Self> {
        let client = Client::builder()
            .timeout(std::time::Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()
            .map_err(|e| CheckoutError::Configuration(format!("HTTP client: {e}")))?;

        Ok(Self { config, client })
    }

    /// Create from environment variables.
    ///
    /// Fails when the keys are absent, empty, or placeholders — the
    /// caller degrades to the COD/QR path on any error here.
    pub fn from_env() -> CheckoutResult<Self> {
        let config = RazorpayConfig::from_env()?;
        Self::new(config)
    }
}

#[async_trait]
impl PaymentGateway for RazorpayGateway {
    #[instrument(skip(self), fields(amount = amount, receipt = receipt))]
    async fn create_intent(
        &self,
        amount: i64,
        currency: &str,
        receipt: &str,
    ) -> CheckoutResult<PaymentIntent> {
        let url = format!("{}/v1/orders", self.config.api_base_url);

        let request = CreateOrderRequest {
            amount,
            currency,
            receipt,
            payment_capture: 1,
        };

        debug!("creating razorpay order: amount={} {}", amount, currency);

        let response = self
            .client
            .post(&url)
            .basic_auth(&self.config.key_id, Some(&self.config.key_secret))
            .json(&request)
            .send()
            .await
            .map_err(|e| CheckoutError::Network(e.to_string()))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| CheckoutError::Network(e.to_string()))?;

        if !status.is_success() {
            error!("razorpay API error: status={}, body={}", status, body);

            if let Ok(envelope) = serde_json::from_str::<RazorpayErrorResponse>(&body) {
                return Err(CheckoutError::Gateway {
                    provider: "razorpay".to_string(),
                    message: envelope.error.description,
                });
            }

            return Err(CheckoutError::Gateway {
                provider: "razorpay".to_string(),
                message: format!("HTTP {status}: {body}"),
            });
        }

        let order: OrderResponse = serde_json::from_str(&body).map_err(|e| {
            CheckoutError::Serialization(format!("Failed to parse razorpay response: {e}"))
        })?;

        info!("created razorpay order: id={}", order.id);

        let created_at = order
            .created_at
            .and_then(|ts| DateTime::from_timestamp(ts, 0))
            .unwrap_or_else(Utc::now);

        Ok(PaymentIntent {
            id: order.id,
            amount: order.amount,
            currency: order.currency,
            receipt: order.receipt.unwrap_or_else(|| receipt.to_string()),
            created_at,
        })
    }

    async fn verify_signature(&self, confirmation: &PaymentConfirmation) -> CheckoutResult<()> {
        signature::verify_signature(&self.config.key_secret, confirmation)
    }

    fn key_id(&self) -> &str {
        &self.config.key_id
    }

    fn provider_name(&self) -> &'static str {
        "razorpay"
    }
}

// =============================================================================
// Razorpay API Types
// =============================================================================

#[derive(Debug, Serialize)]
struct CreateOrderRequest<'a> {
    amount: i64,
    currency: &'a str,
    receipt: &'a str,
    payment_capture: u8,
}

#[derive(Debug, Deserialize)]
struct OrderResponse {
    id: String,
    amount: i64,
    currency: String,
    #[serde(default)]
    receipt: Option<String>,
    #[serde(default)]
    created_at: Option<i64>,
}

#[derive(Debug, Deserialize)]
struct RazorpayErrorResponse {
    error: RazorpayError,
}

#[derive(Debug, Deserialize)]
struct RazorpayError {
    #[serde(default)]
    code: Option<String>,
    description: String,
}
