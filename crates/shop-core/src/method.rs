//! # Payment Method
//!
//! The two payment paths the storefront offers.

use serde::{Deserialize, Serialize};
use tracing::debug;

/// How the customer chose to pay.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PaymentMethod {
    /// Cash on delivery. No external verification; trust is implicit.
    Cod,
    /// Online payment through the gateway, confirmed by signature.
    Upi,
}

impl PaymentMethod {
    /// Resolve the `payment_method` form field.
    ///
    /// Policy: a missing or unrecognized value is treated as cash on
    /// delivery. A bare form post cannot distinguish "field omitted" from
    /// "field mangled", so both coerce to the path that needs no
    /// verification; the coercion is logged so it stays visible in traces.
    pub fn from_form(value: Option<&str>) -> Self {
        match value {
            Some("cod") | None => PaymentMethod::Cod,
            Some("upi") => PaymentMethod::Upi,
            Some(other) => {
                debug!("unrecognized payment_method {:?}, defaulting to cod", other);
                PaymentMethod::Cod
            }
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            PaymentMethod::Cod => "cod",
            PaymentMethod::Upi => "upi",
        }
    }
}

impl std::fmt::Display for PaymentMethod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_known_methods() {
        assert_eq!(PaymentMethod::from_form(Some("cod")), PaymentMethod::Cod);
        assert_eq!(PaymentMethod::from_form(Some("upi")), PaymentMethod::Upi);
    }

    #[test]
    fn test_missing_defaults_to_cod() {
        assert_eq!(PaymentMethod::from_form(None), PaymentMethod::Cod);
    }

    #[test]
    fn test_unrecognized_defaults_to_cod() {
        assert_eq!(
            PaymentMethod::from_form(Some("bitcoin")),
            PaymentMethod::Cod
        );
        assert_eq!(PaymentMethod::from_form(Some("")), PaymentMethod::Cod);
        assert_eq!(PaymentMethod::from_form(Some("UPI")), PaymentMethod::Cod);
    }
}
