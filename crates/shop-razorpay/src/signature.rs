//! # Payment Signature Verification
//!
//! Razorpay signs a completed payment as
//! `hex(hmac_sha256(key_secret, "{order_id}|{payment_id}"))` and hands
//! the signature back through the client. Verifying it proves the
//! confirmation originated from the gateway and matches the intent.

use shop_core::{CheckoutError, CheckoutResult, PaymentConfirmation};

/// Compute the expected signature for a confirmation.
///
/// A key the HMAC backend refuses is a `Verification` error, not a
/// mismatch — the caller must be able to tell corruption from forgery.
pub fn compute_signature(key_secret: &str, order_id: &str, payment_id: &str) -> CheckoutResult<String> {
    use hmac::{Hmac, Mac};
    use sha2::Sha256;

    type HmacSha256 = Hmac<Sha256>;

    let mut mac = HmacSha256::new_from_slice(key_secret.as_bytes())
        .map_err(|e| CheckoutError::Verification(format!("HMAC init failed: {e}")))?;
    mac.update(order_id.as_bytes());
    mac.update(b"|");
    mac.update(payment_id.as_bytes());
    Ok(hex::encode(mac.finalize().into_bytes()))
}

/// Verify a payment confirmation against the key secret.
pub fn verify_signature(key_secret: &str, confirmation: &PaymentConfirmation) -> CheckoutResult<()> {
    let expected = compute_signature(key_secret, &confirmation.order_id, &confirmation.payment_id)?;

    if constant_time_compare(&expected, &confirmation.signature) {
        Ok(())
    } else {
        Err(CheckoutError::SignatureInvalid)
    }
}

fn constant_time_compare(a: &str, b: &str) -> bool {
    if a.len() != b.len() {
        return false;
    }
    a.bytes()
        .zip(b.bytes())
        .fold(0, |acc, (x, y)| acc | (x ^ y))
        == 0
}

#[cfg(test)]
mod tests {
    use super::*;

    fn confirmation(signature: &str) -> PaymentConfirmation {
        PaymentConfirmation {
            payment_id: "pay_29QQoUBi66xm2f".into(),
            order_id: "order_9A33XWu170gUtm".into(),
            signature: signature.into(),
        }
    }

    #[test]
    fn test_roundtrip_verifies() {
        let secret = "test_secret";
        let signature =
            compute_signature(secret, "order_9A33XWu170gUtm", "pay_29QQoUBi66xm2f").unwrap();

        verify_signature(secret, &confirmation(&signature)).unwrap();
    }

    #[test]
    fn test_tampered_signature_rejected() {
        let secret = "test_secret";
        let mut signature =
            compute_signature(secret, "order_9A33XWu170gUtm", "pay_29QQoUBi66xm2f").unwrap();

        // flip one hex digit
        let last = signature.pop().unwrap();
        signature.push(if last == '0' { '1' } else { '0' });

        let err = verify_signature(secret, &confirmation(&signature)).unwrap_err();
        assert!(matches!(err, CheckoutError::SignatureInvalid));
    }

    #[test]
    fn test_wrong_secret_rejected() {
        let signature =
            compute_signature("right_secret", "order_9A33XWu170gUtm", "pay_29QQoUBi66xm2f")
                .unwrap();

        let err = verify_signature("wrong_secret", &confirmation(&signature)).unwrap_err();
        assert!(matches!(err, CheckoutError::SignatureInvalid));
    }

    #[test]
    fn test_signature_is_order_pipe_payment() {
        // same inputs in the other order must not verify
        let secret = "test_secret";
        let forward =
            compute_signature(secret, "order_9A33XWu170gUtm", "pay_29QQoUBi66xm2f").unwrap();
        let swapped =
            compute_signature(secret, "pay_29QQoUBi66xm2f", "order_9A33XWu170gUtm").unwrap();
        assert_ne!(forward, swapped);
    }

    #[test]
    fn test_constant_time_compare() {
        assert!(constant_time_compare("abcd", "abcd"));
        assert!(!constant_time_compare("abcd", "abce"));
        assert!(!constant_time_compare("abcd", "abcde"));
        assert!(!constant_time_compare("", "a"));
    }
}
