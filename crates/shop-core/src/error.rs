//! # Checkout Error Types
//!
//! Typed error handling for the storefront checkout flow.
//! All checkout operations return `Result<T, CheckoutError>`.

use thiserror::Error;

/// Core error type for all checkout and payment operations
#[derive(Debug, Error)]
pub enum CheckoutError {
    /// Checkout was entered with an empty cart
    #[error("Your cart is empty!")]
    CartEmpty,

    /// Configuration errors (missing keys, placeholder values)
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Online payment was chosen but no gateway is configured
    #[error("Payment gateway not configured. Please use Cash on Delivery.")]
    GatewayNotConfigured,

    /// Payment provider API error
    #[error("Gateway error [{provider}]: {message}")]
    Gateway { provider: String, message: String },

    /// Network/HTTP error communicating with the provider
    #[error("Network error: {0}")]
    Network(String),

    /// One or more payment confirmation fields are missing
    #[error("Payment details missing. Please try again.")]
    ConfirmationIncomplete,

    /// Payment signature did not match (forgery or corruption in transit)
    #[error("Payment verification failed! Please try again.")]
    SignatureInvalid,

    /// Signature verification aborted for a reason other than a mismatch
    #[error("Error verifying payment: {0}")]
    Verification(String),

    /// Serialization/deserialization error
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// Session cart store failure
    #[error("Cart store error: {0}")]
    Store(String),
}

impl CheckoutError {
    /// Returns true if the user can retry from the payment page.
    ///
    /// The cart is untouched on every one of these, so re-submission
    /// (or switching to Cash on Delivery) is always safe.
    pub fn allows_retry(&self) -> bool {
        matches!(
            self,
            CheckoutError::ConfirmationIncomplete
                | CheckoutError::SignatureInvalid
                | CheckoutError::Verification(_)
                | CheckoutError::GatewayNotConfigured
        )
    }

    /// Returns the HTTP status code appropriate for this error
    pub fn status_code(&self) -> u16 {
        match self {
            CheckoutError::CartEmpty => 400,
            CheckoutError::Configuration(_) => 500,
            CheckoutError::GatewayNotConfigured => 503,
            CheckoutError::Gateway { .. } => 502,
            CheckoutError::Network(_) => 503,
            CheckoutError::ConfirmationIncomplete => 400,
            CheckoutError::SignatureInvalid => 401,
            CheckoutError::Verification(_) => 502,
            CheckoutError::Serialization(_) => 500,
            CheckoutError::Store(_) => 500,
        }
    }
}

/// Result type alias for checkout operations
pub type CheckoutResult<T> = Result<T, CheckoutError>;
