//! # Razorpay Configuration
//!
//! Configuration management for the Razorpay integration.
//! All secrets are loaded from environment variables.
//!
//! A config only constructs when the gateway is genuinely usable: the
//! key id and key secret must both be present, non-empty, and not the
//! placeholder values shipped in example env files. Each condition is
//! checked on its own so a misconfiguration names the exact culprit —
//! and so the caller can degrade to the COD/QR path instead of failing.

use shop_core::CheckoutError;
use std::env;

/// Placeholder values from the example env file; either one present
/// means "not configured".
pub const KEY_ID_PLACEHOLDER: &str = "your_razorpay_key_id_here";
pub const KEY_SECRET_PLACEHOLDER: &str = "your_razorpay_key_secret_here";

const DEFAULT_API_BASE: &str = "https://api.razorpay.com";

/// Razorpay API configuration
#[derive(Debug, Clone)]
pub struct RazorpayConfig {
    /// Key id (rzp_test_... or rzp_live_...), also the public key the
    /// client-side widget uses
    pub key_id: String,

    /// Key secret, never sent to the client
    pub key_secret: String,

    /// API base URL (overridable for testing/mocking)
    pub api_base_url: String,
}

impl RazorpayConfig {
    /// Load configuration from environment variables.
    ///
    /// Env vars:
    /// - `RAZORPAY_KEY_ID`
    /// - `RAZORPAY_KEY_SECRET`
    /// - `RAZORPAY_API_BASE` (optional)
    pub fn from_env() -> Result<Self, CheckoutError> {
        dotenvy::dotenv().ok(); // Load .env file if present

        let config = Self::from_values(
            env::var("RAZORPAY_KEY_ID").ok(),
            env::var("RAZORPAY_KEY_SECRET").ok(),
        )?;

        Ok(match env::var("RAZORPAY_API_BASE") {
            Ok(base) if !base.is_empty() => config.with_api_base_url(base),
            _ => config,
        })
    }

    /// Validate explicit values (also the test entry point — env-free).
    pub fn from_values(
        key_id: Option<String>,
        key_secret: Option<String>,
    ) -> Result<Self, CheckoutError> {
        let key_id = key_id
            .filter(|v| !v.is_empty())
            .ok_or_else(|| CheckoutError::Configuration("RAZORPAY_KEY_ID not set".to_string()))?;

        let key_secret = key_secret.filter(|v| !v.is_empty()).ok_or_else(|| {
            CheckoutError::Configuration("RAZORPAY_KEY_SECRET not set".to_string())
        })?;

        if key_id == KEY_ID_PLACEHOLDER {
            return Err(CheckoutError::Configuration(
                "RAZORPAY_KEY_ID is still the placeholder value".to_string(),
            ));
        }

        if key_secret == KEY_SECRET_PLACEHOLDER {
            return Err(CheckoutError::Configuration(
                "RAZORPAY_KEY_SECRET is still the placeholder value".to_string(),
            ));
        }

        Ok(Self {
            key_id,
            key_secret,
            api_base_url: DEFAULT_API_BASE.to_string(),
        })
    }

    /// Create config with explicit values (for testing)
    pub fn new(key_id: impl Into<String>, key_secret: impl Into<String>) -> Self {
        Self {
            key_id: key_id.into(),
            key_secret: key_secret.into(),
            api_base_url: DEFAULT_API_BASE.to_string(),
        }
    }

    /// Check if using test keys
    pub fn is_test_mode(&self) -> bool {
        self.key_id.starts_with("rzp_test_")
    }

    /// Builder: set custom API base URL (for testing)
    pub fn with_api_base_url(mut self, url: impl Into<String>) -> Self {
        self.api_base_url = url.into();
        self
    }
}
