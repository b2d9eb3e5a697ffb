//! # Checkout Orchestration
//!
//! Drives the cart → payment → confirmation flow:
//!
//! ```text
//! ENTERING_CHECKOUT ──► AWAITING_PAYMENT_METHOD ──► COD_CONFIRMED ──► SUCCESS
//!        │                        │
//!        │ (empty cart)           └─────────────────► UPI_VERIFYING ─► SUCCESS | FAILED
//!        ▼
//!   back to cart
//! ```
//!
//! The orchestrator owns the payment-path decision: whether the gateway
//! is usable, whether the QR fallback renders, and when the cart is
//! cleared. The cart is cleared if and only if a payment path concludes
//! successfully — every failure leaves it untouched so the customer can
//! retry or switch method.

use crate::cart::{Cart, CartStore};
use crate::error::{CheckoutError, CheckoutResult};
use crate::gateway::{BoxedGateway, PaymentConfirmation, CURRENCY};
use crate::method::PaymentMethod;
use crate::pricing;
use rust_decimal::Decimal;
use serde::Serialize;
use std::sync::Arc;
use tracing::{debug, info, warn};
use url::Url;

/// Shown as the payee when no real UPI id is configured.
pub const FALLBACK_PAYEE_ID: &str = "your-upi@paytm";

/// Renders a payment URI as a scannable image.
///
/// Optional capability: absence (or failure) only removes the QR image
/// from the payment page, never the page itself.
pub trait QrRenderer: Send + Sync {
    /// Encode `uri` as a PNG and return it as a `data:image/png;base64,…` string
    fn render_data_uri(&self, uri: &str) -> CheckoutResult<String>;
}

/// Type alias for a shared QR renderer
pub type BoxedQrRenderer = Arc<dyn QrRenderer>;

/// Direct bank-transfer details for the QR fallback path.
#[derive(Debug, Clone)]
pub struct DirectTransfer {
    /// Configured UPI payee id; `None` when unset or left at the
    /// placeholder value
    pub payee_id: Option<String>,

    /// Display name shown in the customer's UPI app
    pub payee_name: String,
}

impl DirectTransfer {
    pub fn new(payee_id: Option<String>, payee_name: impl Into<String>) -> Self {
        Self {
            payee_id,
            payee_name: payee_name.into(),
        }
    }

    /// Build the UPI deep link for `total`, or `None` when no payee id
    /// is configured.
    pub fn payment_uri(&self, total: Decimal) -> Option<String> {
        let payee_id = self.payee_id.as_deref()?;

        let mut uri = Url::parse("upi://pay").ok()?;
        uri.query_pairs_mut()
            .append_pair("pa", payee_id)
            .append_pair("pn", &self.payee_name)
            .append_pair("am", &format!("{total:.2}"))
            .append_pair("cu", CURRENCY)
            .append_pair("tn", "Order Payment");

        Some(uri.to_string())
    }

    /// Payee id for display, falling back to the documented placeholder
    pub fn display_payee_id(&self) -> String {
        self.payee_id
            .clone()
            .unwrap_or_else(|| FALLBACK_PAYEE_ID.to_string())
    }
}

/// Rendering context for the payment page.
///
/// `order_id`, `gateway_key`, `qr_image` and `payment_uri` serialize as
/// `null` when the corresponding capability is unavailable — the client
/// decides which payment options to draw from exactly these fields.
#[derive(Debug, Clone, Serialize)]
pub struct PaymentPage {
    /// Cart total in rupees
    pub total: Decimal,

    /// Total in integer paise, as handed to the gateway
    pub amount: i64,

    /// Gateway order id, when an intent was created
    pub order_id: Option<String>,

    /// Public key for the client-side checkout widget
    pub gateway_key: Option<String>,

    /// Whether the online payment path is live for this page
    pub gateway_enabled: bool,

    /// QR PNG as a data URI
    pub qr_image: Option<String>,

    /// UPI deep link behind the QR image
    pub payment_uri: Option<String>,

    /// Payee id for display (placeholder when unconfigured)
    pub payee_id: String,

    /// Degrade notice when intent creation failed
    #[serde(skip_serializing_if = "Option::is_none")]
    pub warning: Option<String>,
}

/// The `payment_method` form post, with the optional confirmation fields.
#[derive(Debug, Clone)]
pub struct PaymentSubmission {
    pub method: PaymentMethod,
    pub payment_id: Option<String>,
    pub order_id: Option<String>,
    pub signature: Option<String>,
}

impl PaymentSubmission {
    /// A submission with no confirmation fields (the COD case)
    pub fn new(method: PaymentMethod) -> Self {
        Self {
            method,
            payment_id: None,
            order_id: None,
            signature: None,
        }
    }

    /// All three confirmation fields, present and non-empty, or `None`.
    ///
    /// Browsers post empty strings for untouched inputs; an empty field
    /// counts as missing.
    pub fn confirmation(&self) -> Option<PaymentConfirmation> {
        let field = |v: &Option<String>| v.clone().filter(|s| !s.is_empty());
        Some(PaymentConfirmation {
            payment_id: field(&self.payment_id)?,
            order_id: field(&self.order_id)?,
            signature: field(&self.signature)?,
        })
    }
}

/// The checkout orchestrator.
///
/// Capabilities are resolved once at startup and injected; per-request
/// logic only branches on their presence.
pub struct Checkout {
    gateway: Option<BoxedGateway>,
    qr: Option<BoxedQrRenderer>,
    transfer: DirectTransfer,
}

impl Checkout {
    pub fn new(
        gateway: Option<BoxedGateway>,
        qr: Option<BoxedQrRenderer>,
        transfer: DirectTransfer,
    ) -> Self {
        Self {
            gateway,
            qr,
            transfer,
        }
    }

    /// Whether the online payment path is configured at all
    pub fn gateway_configured(&self) -> bool {
        self.gateway.is_some()
    }

    /// Enter the payment step: validate the cart, price it, resolve the
    /// available payment paths, and emit the page context.
    ///
    /// Gateway trouble of any kind degrades to a usable page offering
    /// COD and (when configured) the QR fallback; only an empty cart is
    /// a hard failure.
    pub async fn payment_page(
        &self,
        cart: &Cart,
        user: Option<&str>,
    ) -> CheckoutResult<PaymentPage> {
        if cart.is_empty() {
            return Err(CheckoutError::CartEmpty);
        }

        let total = pricing::compute_total(cart);
        let amount = pricing::minor_units(total);

        // QR fallback context, best effort.
        let payment_uri = self.transfer.payment_uri(total);
        let qr_image = match (&self.qr, &payment_uri) {
            (Some(renderer), Some(uri)) => match renderer.render_data_uri(uri) {
                Ok(image) => Some(image),
                Err(e) => {
                    debug!("QR render failed, continuing without image: {}", e);
                    None
                }
            },
            _ => None,
        };

        let mut order_id = None;
        let mut gateway_key = None;
        let mut gateway_enabled = false;
        let mut warning = None;

        if let Some(gateway) = &self.gateway {
            let receipt = format!("order_{}_{}", user.unwrap_or("guest"), total);
            match gateway.create_intent(amount, CURRENCY, &receipt).await {
                Ok(intent) => {
                    info!(
                        "created payment intent: id={}, amount={}, receipt={}",
                        intent.id, intent.amount, intent.receipt
                    );
                    order_id = Some(intent.id);
                    gateway_key = Some(gateway.key_id().to_string());
                    gateway_enabled = true;
                }
                Err(e) => {
                    warn!(
                        "{} intent creation failed, degrading to simple payment: {}",
                        gateway.provider_name(),
                        e
                    );
                    warning = Some(format!("{e}. Using simple payment method."));
                }
            }
        }

        Ok(PaymentPage {
            total,
            amount,
            order_id,
            gateway_key,
            gateway_enabled,
            qr_image,
            payment_uri,
            payee_id: self.transfer.display_payee_id(),
            warning,
        })
    }

    /// Conclude checkout for a submitted payment method.
    ///
    /// Clears the cart exactly when this returns `Ok`; every error path
    /// leaves the cart as it was.
    pub async fn confirm(
        &self,
        store: &dyn CartStore,
        submission: &PaymentSubmission,
    ) -> CheckoutResult<PaymentMethod> {
        match submission.method {
            PaymentMethod::Cod => {
                store.clear().await?;
                info!("order placed with cash on delivery");
                Ok(PaymentMethod::Cod)
            }
            PaymentMethod::Upi => {
                let confirmation = submission
                    .confirmation()
                    .ok_or(CheckoutError::ConfirmationIncomplete)?;
                let gateway = self
                    .gateway
                    .as_ref()
                    .ok_or(CheckoutError::GatewayNotConfigured)?;

                gateway.verify_signature(&confirmation).await?;

                store.clear().await?;
                info!(
                    "online payment verified: payment_id={}, order_id={}",
                    confirmation.payment_id, confirmation.order_id
                );
                Ok(PaymentMethod::Upi)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gateway::{PaymentGateway, PaymentIntent};
    use crate::product::Product;
    use async_trait::async_trait;
    use chrono::Utc;
    use rust_decimal_macros::dec;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;

    // -------------------------------------------------------------------------
    // Test doubles
    // -------------------------------------------------------------------------

    #[derive(Default)]
    struct MemoryCartStore {
        cart: Mutex<Cart>,
        clears: AtomicUsize,
    }

    impl MemoryCartStore {
        fn with_cart(cart: Cart) -> Self {
            Self {
                cart: Mutex::new(cart),
                clears: AtomicUsize::new(0),
            }
        }

        fn snapshot(&self) -> Cart {
            self.cart.lock().unwrap().clone()
        }

        fn clear_count(&self) -> usize {
            self.clears.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl CartStore for MemoryCartStore {
        async fn load(&self) -> CheckoutResult<Cart> {
            Ok(self.cart.lock().unwrap().clone())
        }

        async fn save(&self, cart: &Cart) -> CheckoutResult<()> {
            *self.cart.lock().unwrap() = cart.clone();
            Ok(())
        }

        async fn clear(&self) -> CheckoutResult<()> {
            *self.cart.lock().unwrap() = Cart::new();
            self.clears.fetch_add(1, Ordering::SeqCst);
            Ok(())
        }
    }

    enum VerifyBehavior {
        Accept,
        Reject,
        Break,
    }

    struct StubGateway {
        fail_create: bool,
        verify: VerifyBehavior,
        last_create: Mutex<Option<(i64, String, String)>>,
    }

    impl StubGateway {
        fn new() -> Self {
            Self {
                fail_create: false,
                verify: VerifyBehavior::Accept,
                last_create: Mutex::new(None),
            }
        }

        fn failing_create() -> Self {
            Self {
                fail_create: true,
                ..Self::new()
            }
        }

        fn rejecting() -> Self {
            Self {
                verify: VerifyBehavior::Reject,
                ..Self::new()
            }
        }

        fn broken_verify() -> Self {
            Self {
                verify: VerifyBehavior::Break,
                ..Self::new()
            }
        }
    }

    #[async_trait]
    impl PaymentGateway for StubGateway {
        async fn create_intent(
            &self,
            amount: i64,
            currency: &str,
            receipt: &str,
        ) -> CheckoutResult<PaymentIntent> {
            *self.last_create.lock().unwrap() =
                Some((amount, currency.to_string(), receipt.to_string()));

            if self.fail_create {
                return Err(CheckoutError::Network("connection refused".into()));
            }

            Ok(PaymentIntent {
                id: "order_test123".into(),
                amount,
                currency: currency.into(),
                receipt: receipt.into(),
                created_at: Utc::now(),
            })
        }

        async fn verify_signature(
            &self,
            _confirmation: &PaymentConfirmation,
        ) -> CheckoutResult<()> {
            match self.verify {
                VerifyBehavior::Accept => Ok(()),
                VerifyBehavior::Reject => Err(CheckoutError::SignatureInvalid),
                VerifyBehavior::Break => {
                    Err(CheckoutError::Verification("hmac backend exploded".into()))
                }
            }
        }

        fn key_id(&self) -> &str {
            "rzp_test_key"
        }

        fn provider_name(&self) -> &'static str {
            "stub"
        }
    }

    struct FixedQr;

    impl QrRenderer for FixedQr {
        fn render_data_uri(&self, _uri: &str) -> CheckoutResult<String> {
            Ok("data:image/png;base64,AAAA".into())
        }
    }

    struct BrokenQr;

    impl QrRenderer for BrokenQr {
        fn render_data_uri(&self, _uri: &str) -> CheckoutResult<String> {
            Err(CheckoutError::Serialization("png encoder failed".into()))
        }
    }

    fn shirt_cart() -> Cart {
        let mut cart = Cart::new();
        cart.add(&Product::new("7", "Shirt", dec!(499.00)), 2);
        cart
    }

    fn transfer() -> DirectTransfer {
        DirectTransfer::new(Some("shop@upi".into()), "Ecommerce")
    }

    fn checkout_with(gateway: Option<StubGateway>, qr: bool) -> (Checkout, Option<Arc<StubGateway>>) {
        let gateway = gateway.map(Arc::new);
        let handle = gateway.clone();
        let checkout = Checkout::new(
            gateway.map(|g| g as BoxedGateway),
            qr.then(|| Arc::new(FixedQr) as BoxedQrRenderer),
            transfer(),
        );
        (checkout, handle)
    }

    // -------------------------------------------------------------------------
    // Payment page
    // -------------------------------------------------------------------------

    #[tokio::test]
    async fn test_empty_cart_never_renders_payment_page() {
        let (checkout, _) = checkout_with(Some(StubGateway::new()), true);

        let err = checkout.payment_page(&Cart::new(), None).await.unwrap_err();
        assert!(matches!(err, CheckoutError::CartEmpty));
    }

    #[tokio::test]
    async fn test_intent_created_with_paise_amount() {
        let (checkout, gateway) = checkout_with(Some(StubGateway::new()), true);

        let page = checkout.payment_page(&shirt_cart(), None).await.unwrap();

        assert_eq!(page.total, dec!(998.00));
        assert_eq!(page.amount, 99800);
        assert_eq!(page.order_id.as_deref(), Some("order_test123"));
        assert_eq!(page.gateway_key.as_deref(), Some("rzp_test_key"));
        assert!(page.gateway_enabled);
        assert!(page.warning.is_none());

        let (amount, currency, receipt) =
            gateway.unwrap().last_create.lock().unwrap().clone().unwrap();
        assert_eq!(amount, 99800);
        assert_eq!(currency, "INR");
        assert_eq!(receipt, "order_guest_998.00");
    }

    #[tokio::test]
    async fn test_receipt_carries_user_id() {
        let (checkout, gateway) = checkout_with(Some(StubGateway::new()), true);

        checkout
            .payment_page(&shirt_cart(), Some("ravi"))
            .await
            .unwrap();

        let (_, _, receipt) = gateway.unwrap().last_create.lock().unwrap().clone().unwrap();
        assert_eq!(receipt, "order_ravi_998.00");
    }

    #[tokio::test]
    async fn test_create_failure_degrades_with_warning() {
        let (checkout, _) = checkout_with(Some(StubGateway::failing_create()), true);

        let page = checkout.payment_page(&shirt_cart(), None).await.unwrap();

        assert!(!page.gateway_enabled);
        assert!(page.order_id.is_none());
        assert!(page.gateway_key.is_none());
        let warning = page.warning.unwrap();
        assert!(warning.contains("Using simple payment method"));
        // degraded page still offers the fallback paths
        assert!(page.payment_uri.is_some());
        assert!(page.qr_image.is_some());
        assert_eq!(page.amount, 99800);
    }

    #[tokio::test]
    async fn test_unconfigured_gateway_page() {
        let (checkout, _) = checkout_with(None, true);

        let page = checkout.payment_page(&shirt_cart(), None).await.unwrap();

        assert!(!page.gateway_enabled);
        assert!(page.order_id.is_none());
        assert!(page.gateway_key.is_none());
        assert!(page.warning.is_none());
        assert_eq!(page.payee_id, "shop@upi");
        let uri = page.payment_uri.unwrap();
        assert!(uri.starts_with("upi://pay?"));
        assert!(uri.contains("pa=shop%40upi"));
        assert!(uri.contains("am=998.00"));
        assert!(uri.contains("cu=INR"));
    }

    #[tokio::test]
    async fn test_no_payee_id_drops_qr_context() {
        let checkout = Checkout::new(
            None,
            Some(Arc::new(FixedQr)),
            DirectTransfer::new(None, "Ecommerce"),
        );

        let page = checkout.payment_page(&shirt_cart(), None).await.unwrap();

        assert!(page.payment_uri.is_none());
        assert!(page.qr_image.is_none());
        assert_eq!(page.payee_id, FALLBACK_PAYEE_ID);
    }

    #[tokio::test]
    async fn test_qr_failure_only_removes_image() {
        let checkout = Checkout::new(None, Some(Arc::new(BrokenQr)), transfer());

        let page = checkout.payment_page(&shirt_cart(), None).await.unwrap();

        assert!(page.qr_image.is_none());
        assert!(page.payment_uri.is_some());
    }

    #[tokio::test]
    async fn test_missing_renderer_only_removes_image() {
        let (checkout, _) = checkout_with(None, false);

        let page = checkout.payment_page(&shirt_cart(), None).await.unwrap();

        assert!(page.qr_image.is_none());
        assert!(page.payment_uri.is_some());
    }

    // -------------------------------------------------------------------------
    // Confirmation
    // -------------------------------------------------------------------------

    fn upi_submission() -> PaymentSubmission {
        PaymentSubmission {
            method: PaymentMethod::Upi,
            payment_id: Some("pay_1".into()),
            order_id: Some("order_test123".into()),
            signature: Some("cafe".into()),
        }
    }

    #[tokio::test]
    async fn test_cod_clears_cart_regardless_of_gateway() {
        for gateway in [None, Some(StubGateway::new())] {
            let (checkout, _) = checkout_with(gateway, false);
            let store = MemoryCartStore::with_cart(shirt_cart());

            let method = checkout
                .confirm(&store, &PaymentSubmission::new(PaymentMethod::Cod))
                .await
                .unwrap();

            assert_eq!(method, PaymentMethod::Cod);
            assert!(store.snapshot().is_empty());
            assert_eq!(store.clear_count(), 1);
        }
    }

    #[tokio::test]
    async fn test_upi_valid_signature_clears_exactly_once() {
        let (checkout, _) = checkout_with(Some(StubGateway::new()), false);
        let store = MemoryCartStore::with_cart(shirt_cart());

        let method = checkout.confirm(&store, &upi_submission()).await.unwrap();

        assert_eq!(method, PaymentMethod::Upi);
        assert!(store.snapshot().is_empty());
        assert_eq!(store.clear_count(), 1);
    }

    #[tokio::test]
    async fn test_upi_invalid_signature_keeps_cart() {
        let (checkout, _) = checkout_with(Some(StubGateway::rejecting()), false);
        let store = MemoryCartStore::with_cart(shirt_cart());

        let err = checkout.confirm(&store, &upi_submission()).await.unwrap_err();

        assert!(matches!(err, CheckoutError::SignatureInvalid));
        assert_eq!(store.snapshot(), shirt_cart());
        assert_eq!(store.clear_count(), 0);
    }

    #[tokio::test]
    async fn test_upi_verification_error_surfaces_cause() {
        let (checkout, _) = checkout_with(Some(StubGateway::broken_verify()), false);
        let store = MemoryCartStore::with_cart(shirt_cart());

        let err = checkout.confirm(&store, &upi_submission()).await.unwrap_err();

        match err {
            CheckoutError::Verification(msg) => assert!(msg.contains("hmac backend exploded")),
            other => panic!("expected Verification, got {other:?}"),
        }
        assert_eq!(store.clear_count(), 0);
    }

    #[tokio::test]
    async fn test_upi_missing_any_field_is_incomplete() {
        let (checkout, _) = checkout_with(Some(StubGateway::new()), false);

        for strip in 0..3 {
            let mut submission = upi_submission();
            match strip {
                0 => submission.payment_id = None,
                1 => submission.order_id = Some(String::new()),
                _ => submission.signature = None,
            }

            let store = MemoryCartStore::with_cart(shirt_cart());
            let err = checkout.confirm(&store, &submission).await.unwrap_err();

            assert!(matches!(err, CheckoutError::ConfirmationIncomplete));
            assert_eq!(store.snapshot(), shirt_cart());
            assert_eq!(store.clear_count(), 0);
        }
    }

    #[tokio::test]
    async fn test_upi_without_gateway_is_rejected() {
        let (checkout, _) = checkout_with(None, false);
        let store = MemoryCartStore::with_cart(shirt_cart());

        let err = checkout.confirm(&store, &upi_submission()).await.unwrap_err();

        assert!(matches!(err, CheckoutError::GatewayNotConfigured));
        assert_eq!(store.clear_count(), 0);
    }

    #[tokio::test]
    async fn test_failed_submission_can_retry() {
        let (checkout, _) = checkout_with(Some(StubGateway::rejecting()), false);
        let store = MemoryCartStore::with_cart(shirt_cart());

        let err = checkout.confirm(&store, &upi_submission()).await.unwrap_err();
        assert!(err.allows_retry());

        // switching to COD after a failed verification still succeeds
        checkout
            .confirm(&store, &PaymentSubmission::new(PaymentMethod::Cod))
            .await
            .unwrap();
        assert!(store.snapshot().is_empty());
    }

    // -------------------------------------------------------------------------
    // Direct transfer URI
    // -------------------------------------------------------------------------

    #[test]
    fn test_payment_uri_encodes_payee_name() {
        let transfer = DirectTransfer::new(Some("shop@upi".into()), "Fashion Hub");
        let uri = transfer.payment_uri(dec!(998.00)).unwrap();

        assert!(uri.contains("pn=Fashion+Hub"));
        assert!(uri.contains("tn=Order+Payment"));
    }

    #[test]
    fn test_payment_uri_amount_has_two_decimals() {
        let transfer = DirectTransfer::new(Some("shop@upi".into()), "Ecommerce");

        let uri = transfer.payment_uri(dec!(998)).unwrap();
        assert!(uri.contains("am=998.00"));

        let uri = transfer.payment_uri(dec!(10.5)).unwrap();
        assert!(uri.contains("am=10.50"));
    }

    #[test]
    fn test_confirmation_requires_non_empty_fields() {
        let submission = PaymentSubmission {
            method: PaymentMethod::Upi,
            payment_id: Some("pay_1".into()),
            order_id: Some("".into()),
            signature: Some("cafe".into()),
        };
        assert!(submission.confirmation().is_none());
        assert!(upi_submission().confirmation().is_some());
    }
}
